//! 遊戲核心模組
//!
//! - `constants`: 規則與 observation 常量
//! - `tile`: 方塊與足跡相交判定
//! - `level`: 關卡配置與形狀計算
//! - `layout`: 佈局生成
//! - `occlusion`: 遮擋/可見性解析
//! - `error`: 類型化錯誤

pub mod constants;
pub mod error;
pub mod layout;
pub mod level;
pub mod occlusion;
pub mod tile;

pub use constants::*;
pub use error::{SheepError, SheepResult};
pub use layout::{generate, Board};
pub use level::LevelConfig;
pub use occlusion::resolve;
pub use tile::Tile;

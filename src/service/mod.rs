//! 服務層模組
//!
//! 提供 gRPC 服務所需的狀態管理、觀測構建、動作遮罩、
//! 參考策略與批量評估

pub mod action_mask;
pub mod observation;
pub mod policy;
pub mod rollout;
pub mod state;

pub use action_mask::action_mask_from_state;
pub use observation::{observation_from_state, EnvObs};
pub use policy::{FirstLegal, Policy, RandomPolicy};
pub use rollout::{evaluate_random, run_episode, EpisodeStats};
pub use state::{EnvState, GameEnd, Phase};

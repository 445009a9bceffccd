//! 佈局生成
//!
//! 依關卡排程生成初始方塊多重集合：每種圖案 6 枚，
//! 偏移與行/列均從關卡池中均勻抽取。相同 RNG 流可完整重現。

use rand::{rngs::StdRng, Rng};

use super::constants::COPIES_PER_ICON;
use super::level::LevelConfig;
use super::tile::Tile;

/// 固定長度的槽位序列；被拾取的槽位變為 `None`，動作索引整局穩定
pub type Board = Vec<Option<Tile>>;

/// 生成 `total_item_num` 枚方塊，槽位順序即堆疊順序（後生成者在上層）
pub fn generate(config: &LevelConfig, rng: &mut StdRng) -> Board {
    let offsets = config.offset_pool();
    let mut board = Vec::with_capacity(config.total_item_num);

    for icon in 0..config.icon_pool_len() {
        for _ in 0..COPIES_PER_ICON {
            let offset = offsets[rng.gen_range(0..offsets.len())];
            let row = rng.gen_range(config.range_lo..config.range_hi);
            let column = rng.gen_range(config.range_lo..config.range_hi);
            board.push(Some(Tile::new(icon, offset, row, column)));
        }
    }
    board
}

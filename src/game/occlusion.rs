//! 遮擋解析
//!
//! 每次呼叫都從頭重算整個棋盤的 `accessible` / `visible` 旗標。
//! 移除一枚方塊會全局改變遮擋圖，增量維護不划算（槽位數 <= 60）。
//!
//! 可見性規則：對每個覆蓋者計算相對偏移 Δx = B.x - A.x（為負時 +100），
//! Δy 同理；兩個軸向的偏移集合都「含 0 或有重複」時方塊才可拾取。
//! 此規則是對外行為契約的一部分，需原樣保留，不得自行「修正」。

use super::layout::Board;
use super::constants::TILE_SIZE;

/// 重算所有存活方塊的旗標，只改旗標不做移除
pub fn resolve(board: &mut Board) {
    let n = board.len();
    for i in 0..n {
        let tile = match &board[i] {
            Some(t) => t.clone(),
            None => continue,
        };

        // 槽位順序即堆疊順序：只有更高索引的方塊能覆蓋 i
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for cover in board[i + 1..].iter().flatten() {
            if tile.overlaps(cover) {
                xs.push(normalize_delta(cover.x - tile.x));
                ys.push(normalize_delta(cover.y - tile.y));
            }
        }

        let accessible = xs.is_empty();
        let visible = accessible || (has_zero_or_duplicate(&mut xs) && has_zero_or_duplicate(&mut ys));
        if let Some(t) = &mut board[i] {
            t.accessible = accessible;
            t.visible = visible;
        }
    }
}

/// 覆蓋者相對偏移歸一化到單一方向
fn normalize_delta(delta: i32) -> i32 {
    if delta < 0 {
        delta + TILE_SIZE
    } else {
        delta
    }
}

fn has_zero_or_duplicate(values: &mut [i32]) -> bool {
    if values.contains(&0) {
        return true;
    }
    values.sort_unstable();
    values.windows(2).any(|w| w[0] == w[1])
}

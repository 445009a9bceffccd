//! Action Mask 構建
//!
//! mask 是唯一權威的合法性信號：策略不得選取 mask 為 0 的槽位。
//! 狀態機信任 mask 已被遵守，不在 step 內重驗 visible。

use super::state::{EnvState, Phase};

/// 每個槽位一個旗標：存活且 visible 的方塊為 1
pub fn action_mask_from_state(state: &EnvState) -> Vec<u8> {
    if let Phase::End(_) = state.phase {
        // 終局後沒有合法動作
        return vec![0; state.config.total_item_num];
    }
    state
        .scene
        .iter()
        .map(|slot| match slot {
            Some(tile) if tile.visible => 1,
            _ => 0,
        })
        .collect()
}

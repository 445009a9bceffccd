//! Observation 構建
//!
//! 把狀態機內部狀態投影成固定形狀的數值表示：
//! - 每槽位特徵列（icon one-hot + 格內座標 one-hot + accessible/visible one-hot）
//! - 暫存槽直方圖（每種圖案持有數的 one-hot over {0,1,2}）
//! - 全局進度向量（剩餘組數 + 暫存槽大小）
//! - 動作合法性 mask
//!
//! 純投影、無副作用；形狀只取決於關卡，整局固定。

use crate::game::{BUCKET_FEATURES, COPIES_PER_ICON, HIDDEN_MARK, ICON_COUNT, ICON_FEATURES, REMOVED_MARK};

use super::action_mask::action_mask_from_state;
use super::state::EnvState;

/// 編碼後的 observation，佈局見 `LevelConfig` 的形狀方法
#[derive(Clone, Debug, PartialEq)]
pub struct EnvObs {
    /// row-major [total_item_num, item_feature_size]
    pub item_obs: Vec<f32>,
    pub item_shape: [usize; 2],
    pub bucket_obs: Vec<f32>,
    pub global_obs: Vec<f32>,
    /// 槽位有存活且 visible 的方塊時為 1
    pub action_mask: Vec<u8>,
}

/// 從遊戲狀態構建 observation
pub fn observation_from_state(state: &EnvState) -> EnvObs {
    let config = &state.config;
    let n = config.range_width();
    let item_size = config.item_feature_size();

    // 列內偏移：icon | grid_x | grid_y | accessible | visible
    let p1 = ICON_FEATURES + n;
    let p2 = p1 + n;
    let p3 = p2 + 2;

    let mut item_obs = vec![0.0f32; config.total_item_num * item_size];
    for (slot, row) in item_obs.chunks_mut(item_size).enumerate() {
        match &state.scene[slot] {
            None => row[REMOVED_MARK] = 1.0,
            Some(tile) => {
                row[ICON_FEATURES + tile.grid_x as usize] = 1.0;
                row[p1 + tile.grid_y as usize] = 1.0;
                row[p3 + tile.visible as usize] = 1.0;
                if tile.visible {
                    row[tile.icon] = 1.0;
                    row[p2 + tile.accessible as usize] = 1.0;
                } else {
                    // 不可拾取的方塊隱藏圖案，只給哨兵位
                    row[HIDDEN_MARK] = 1.0;
                }
            }
        }
    }

    let mut bucket_obs = vec![0.0f32; BUCKET_FEATURES];
    let mut bucket_stat = [0usize; ICON_COUNT];
    for tile in &state.bucket {
        bucket_stat[tile.icon] += 1;
    }
    for (icon, &count) in bucket_stat.iter().enumerate() {
        bucket_obs[icon * 3 + count] = 1.0;
    }

    let mut global_obs = vec![0.0f32; config.global_obs_size()];
    let groups = state.cur_item_num / COPIES_PER_ICON;
    global_obs[groups] = 1.0;
    global_obs[groups + state.bucket.len()] = 1.0;

    EnvObs {
        item_obs,
        item_shape: config.item_obs_shape(),
        bucket_obs,
        global_obs,
        action_mask: action_mask_from_state(state),
    }
}

// ============================================================================
// 單元測試
// ============================================================================

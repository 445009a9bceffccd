//! 關卡配置
//!
//! level ∈ [1, 5] 決定圖案池大小、偏移池與行/列範圍。
//! Observation 形狀只取決於關卡，因此在 reset 時計算一次並整局沿用。

use super::constants::{
    BUCKET_FEATURES, BUCKET_LENGTH, COPIES_PER_ICON, ICON_FEATURES, MAX_LEVEL, OFFSET_POOL,
    RANGE_TABLE,
};
use super::error::{SheepError, SheepResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelConfig {
    pub level: i32,
    /// 行/列範圍 [lo, hi)
    pub range_lo: i32,
    pub range_hi: i32,
    pub total_item_num: usize,
}

impl LevelConfig {
    pub fn new(level: i32) -> SheepResult<Self> {
        if !(1..=MAX_LEVEL).contains(&level) {
            return Err(SheepError::InvalidLevel { level });
        }
        let range = RANGE_TABLE[(level - 1) as usize];
        Ok(Self {
            level,
            range_lo: range[0],
            range_hi: range[1],
            total_item_num: 2 * level as usize * COPIES_PER_ICON,
        })
    }

    /// 本關使用的圖案數
    pub fn icon_pool_len(&self) -> usize {
        2 * self.level as usize
    }

    /// 本關可用的像素偏移
    pub fn offset_pool(&self) -> &'static [i32] {
        &OFFSET_POOL[..(1 + self.level) as usize]
    }

    /// 行/列範圍寬度 N
    pub fn range_width(&self) -> usize {
        (self.range_hi - self.range_lo) as usize
    }

    // ------------------------------------------------------------------
    // Observation 形狀（整局固定）
    // ------------------------------------------------------------------

    /// 單一槽位特徵長度：
    /// icon one-hot (12) + grid_x (N) + grid_y (N) + accessible (2) + visible (2)
    pub fn item_feature_size(&self) -> usize {
        ICON_FEATURES + 2 * self.range_width() + 2 + 2
    }

    pub fn item_obs_shape(&self) -> [usize; 2] {
        [self.total_item_num, self.item_feature_size()]
    }

    pub fn bucket_obs_size(&self) -> usize {
        BUCKET_FEATURES
    }

    pub fn global_obs_size(&self) -> usize {
        self.total_item_num / COPIES_PER_ICON + BUCKET_LENGTH
    }

    /// 動作空間 = 固定槽位數
    pub fn action_space(&self) -> usize {
        self.total_item_num
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_out_of_range_rejected() {
        assert!(matches!(
            LevelConfig::new(0),
            Err(SheepError::InvalidLevel { level: 0 })
        ));
        assert!(matches!(
            LevelConfig::new(6),
            Err(SheepError::InvalidLevel { level: 6 })
        ));
    }

    #[test]
    fn test_level_schedule() {
        for level in 1..=5 {
            let cfg = LevelConfig::new(level).unwrap();
            assert_eq!(cfg.total_item_num, 12 * level as usize);
            assert_eq!(cfg.total_item_num % 6, 0);
            assert_eq!(cfg.icon_pool_len(), 2 * level as usize);
            assert_eq!(cfg.offset_pool().len(), 1 + level as usize);
        }
    }

    #[test]
    fn test_level_one_shapes() {
        let cfg = LevelConfig::new(1).unwrap();
        assert_eq!(cfg.range_width(), 4);
        // 12 icon + 4 + 4 + 2 + 2
        assert_eq!(cfg.item_feature_size(), 24);
        assert_eq!(cfg.item_obs_shape(), [12, 24]);
        assert_eq!(cfg.bucket_obs_size(), 30);
        // 12/6 + 7
        assert_eq!(cfg.global_obs_size(), 9);
        assert_eq!(cfg.action_space(), 12);
    }
}

//! 遊戲常量定義

// ============================================================================
// 遊戲規則常量
// ============================================================================

pub const MAX_LEVEL: i32 = 5;            // 關卡範圍 [1, 5]
pub const ICON_COUNT: usize = 10;        // 全局圖案種類（關卡取前 2*level 種）
pub const COPIES_PER_ICON: usize = 6;    // 每種圖案的方塊數（3 的倍數，保證可消除）
pub const BUCKET_LENGTH: usize = 7;      // 暫存槽容量，滿則失敗
pub const TILE_SIZE: i32 = 100;          // 方塊邊長（像素）
pub const R: f32 = 10.0;                 // 獎勵基準：通關 +R，爆槽 -R

/// 像素偏移池（關卡取前 1+level 個）
pub static OFFSET_POOL: [i32; 5] = [0, 25, -25, 50, -50];

/// 各關卡的行/列範圍 [lo, hi)，index = level - 1
pub const RANGE_TABLE: [[i32; 2]; 5] = [[2, 6], [1, 6], [1, 7], [0, 7], [0, 8]];

// ============================================================================
// Observation 常量
// ============================================================================

// 圖案 one-hot 預留兩個哨兵位：倒數第二位 = 不可見，最後一位 = 已移除
pub const ICON_FEATURES: usize = ICON_COUNT + 2;
pub const HIDDEN_MARK: usize = ICON_FEATURES - 2;
pub const REMOVED_MARK: usize = ICON_FEATURES - 1;

// 每種圖案在暫存槽中的數量 one-hot over {0, 1, 2}
pub const BUCKET_FEATURES: usize = 3 * ICON_COUNT;

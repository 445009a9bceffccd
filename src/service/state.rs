//! 遊戲狀態管理

use rand::{rngs::StdRng, SeedableRng};
use serde_json::{json, Value};

use crate::game::{
    generate, resolve, Board, LevelConfig, SheepError, SheepResult, Tile, BUCKET_LENGTH, R,
};

use super::observation::{observation_from_state, EnvObs};

/// 終局原因
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEnd {
    /// 棋盤清空，+R 通關獎勵
    Clear,
    /// 暫存槽溢出，-R
    Overflow,
}

/// 狀態機只有兩個狀態：Active 可 step，End 只接受 reset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Active,
    End(GameEnd),
}

/// 單一對局的環境狀態
///
/// 一個實例獨佔 Board 與 Bucket，同一時間只能由一個呼叫方驅動；
/// 多對局併發時各自持有獨立實例（session 層負責隔離）。
pub struct EnvState {
    pub rng: StdRng,
    pub config: LevelConfig,

    /// 固定長度槽位序列，被拾取的槽位為 None
    pub scene: Board,
    /// 有界 FIFO 暫存槽
    pub bucket: Vec<Tile>,
    pub bucket_length: usize,

    pub cur_item_num: usize,
    /// 每湊成一組三消的獎勵：R * 0.5 / (total / 3)，整盤清完恰為 R/2
    pub reward_3tiles: f32,
    pub phase: Phase,
}

impl EnvState {
    pub fn new(seed: u64) -> Self {
        let config = LevelConfig::new(1).expect("level 1 is always valid");
        let mut state = Self {
            rng: StdRng::seed_from_u64(seed),
            config,
            scene: Vec::new(),
            bucket: Vec::new(),
            bucket_length: BUCKET_LENGTH,
            cur_item_num: 0,
            reward_3tiles: 0.0,
            phase: Phase::Active,
        };
        state.make_game();
        state
    }

    fn make_game(&mut self) {
        self.scene = generate(&self.config, &mut self.rng);
        resolve(&mut self.scene);
        self.bucket.clear();
        self.cur_item_num = self.config.total_item_num;
        self.reward_3tiles = R * 0.5 / (self.config.total_item_num / 3) as f32;
        self.phase = Phase::Active;
    }

    /// 重開一局；`level` 為 None 時沿用當前關卡
    ///
    /// 關卡驗證先於任何狀態改動（原子的 validate-then-apply）。
    pub fn reset(&mut self, level: Option<i32>) -> SheepResult<EnvObs> {
        let config = LevelConfig::new(level.unwrap_or(self.config.level))?;
        self.config = config;
        self.make_game();
        Ok(observation_from_state(self))
    }

    /// 拾取一枚方塊
    ///
    /// 合法性（mask）由呼叫方負責；狀態機只驗證槽位存在，
    /// 不重新檢查 visible——這是對參考行為的保留。
    pub fn step(&mut self, action: i64) -> SheepResult<(EnvObs, f32, bool)> {
        if let Phase::End(_) = self.phase {
            return Err(SheepError::IllegalState {
                message: "episode finished, reset first",
            });
        }
        if action < 0 || action >= self.config.total_item_num as i64 {
            return Err(SheepError::InvalidAction {
                action,
                reason: "slot index out of range",
            });
        }
        let idx = action as usize;
        if self.scene[idx].is_none() {
            return Err(SheepError::InvalidAction {
                action,
                reason: "slot already picked",
            });
        }

        let mut reward = match self.scene[idx].take() {
            Some(tile) => {
                self.cur_item_num -= 1;
                self.bucket_interact(tile)
            }
            None => 0.0, // 上面已驗證非空
        };
        resolve(&mut self.scene);

        let done = if self.cur_item_num == 0 {
            reward += R;
            self.phase = Phase::End(GameEnd::Clear);
            true
        } else if self.bucket.len() == self.bucket_length {
            reward -= R;
            self.phase = Phase::End(GameEnd::Overflow);
            true
        } else {
            false
        };

        Ok((observation_from_state(self), reward, done))
    }

    /// 暫存槽互動：槽內恰有兩枚同圖案時三消（不放入新方塊），否則追加
    fn bucket_interact(&mut self, tile: Tile) -> f32 {
        let matches = self.bucket.iter().filter(|t| t.icon == tile.icon).count();
        if matches == 2 {
            self.bucket.retain(|t| t.icon != tile.icon);
            self.reward_3tiles
        } else {
            self.bucket.push(tile);
            0.0
        }
    }

    /// EnvInfo 的終局代碼：0 = active, 1 = cleared, 2 = overflow
    pub fn game_end_code(&self) -> i32 {
        match self.phase {
            Phase::Active => 0,
            Phase::End(GameEnd::Clear) => 1,
            Phase::End(GameEnd::Overflow) => 2,
        }
    }

    /// 場景 + 暫存槽 JSON（與 Python 端 item.to_json() 介面對齊，給 UI 用）
    pub fn scene_json(&self) -> Value {
        let scene: Vec<Value> = self
            .scene
            .iter()
            .enumerate()
            .filter_map(|(uid, slot)| slot.as_ref().map(|t| t.to_json(uid)))
            .collect();
        let bucket: Vec<Value> = self
            .bucket
            .iter()
            .enumerate()
            .map(|(i, t)| t.to_json(i))
            .collect();
        json!({ "scene": scene, "bucket": bucket })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 測試用：把場景換成手工構造的佈局（槽位數保持 total_item_num）
    fn install_scene(state: &mut EnvState, tiles: Vec<Option<Tile>>) {
        assert_eq!(tiles.len(), state.config.total_item_num);
        state.cur_item_num = tiles.iter().flatten().count();
        state.scene = tiles;
        resolve(&mut state.scene);
    }

    /// 互不重疊的散開位置（level 1 範圍 [2,6)）
    fn spread_tile(icon: usize, i: usize) -> Tile {
        Tile::new(icon, 0, 2 + (i / 4) as i32, 2 + (i % 4) as i32)
    }

    #[test]
    fn test_reset_rejects_bad_level() {
        let mut state = EnvState::new(0);
        let before = state.config;
        assert!(state.reset(Some(0)).is_err());
        assert!(state.reset(Some(9)).is_err());
        // 被拒絕的 reset 不改動狀態
        assert_eq!(state.config, before);
        assert_eq!(state.cur_item_num, 12);
    }

    #[test]
    fn test_reset_every_level_has_legal_move() {
        let mut state = EnvState::new(42);
        for level in 1..=5 {
            let obs = state.reset(Some(level)).unwrap();
            assert_eq!(state.cur_item_num, 12 * level as usize);
            // 初始佈局至少要有一個合法動作（最高層方塊恆可拾取）
            assert!(obs.action_mask.iter().any(|&m| m == 1));
        }
    }

    #[test]
    fn test_invalid_action_leaves_state_unchanged() {
        let mut state = EnvState::new(7);
        state.reset(Some(1)).unwrap();

        // 先清空一個槽位製造 "already picked"
        let (_, _, _) = state.step(0).unwrap();
        let remaining = state.cur_item_num;
        let bucket_len = state.bucket.len();
        let flags: Vec<bool> = state.scene.iter().flatten().map(|t| t.visible).collect();

        assert!(matches!(
            state.step(0),
            Err(SheepError::InvalidAction { .. })
        ));
        assert!(matches!(
            state.step(-1),
            Err(SheepError::InvalidAction { .. })
        ));
        assert!(matches!(
            state.step(12),
            Err(SheepError::InvalidAction { .. })
        ));

        assert_eq!(state.cur_item_num, remaining);
        assert_eq!(state.bucket.len(), bucket_len);
        let after: Vec<bool> = state.scene.iter().flatten().map(|t| t.visible).collect();
        assert_eq!(flags, after);
    }

    #[test]
    fn test_remaining_count_strictly_decreases() {
        let mut state = EnvState::new(3);
        state.reset(Some(2)).unwrap();
        let mut prev = state.cur_item_num;
        for _ in 0..6 {
            let action = state
                .scene
                .iter()
                .position(|s| s.as_ref().map(|t| t.visible).unwrap_or(false))
                .unwrap() as i64;
            let (_, _, done) = state.step(action).unwrap();
            assert_eq!(state.cur_item_num, prev - 1);
            prev = state.cur_item_num;
            if done {
                break;
            }
        }
    }

    #[test]
    fn test_triple_completion_reward_and_bucket_shrink() {
        let mut state = EnvState::new(5);
        state.reset(Some(1)).unwrap();

        // icon 0 與 icon 1 交替，第 5 步湊成 icon 0 的三消；icon 2 留在盤上避免清空
        let icons = [0usize, 1, 0, 1, 0, 2];
        let mut tiles: Vec<Option<Tile>> = icons
            .iter()
            .enumerate()
            .map(|(i, &icon)| Some(spread_tile(icon, i)))
            .collect();
        tiles.resize(12, None);
        install_scene(&mut state, tiles);

        for action in 0..4 {
            let (_, reward, done) = state.step(action).unwrap();
            // 未湊滿三枚前沒有任何獎勵
            assert_eq!(reward, 0.0);
            assert!(!done);
        }
        assert_eq!(state.bucket.len(), 4);

        let (_, reward, done) = state.step(4).unwrap();
        // R_triple = 10 * 0.5 / (12 / 3) = 1.25，三消後槽內淨減 2
        assert_eq!(reward, 1.25);
        assert!(!done);
        assert_eq!(state.bucket.len(), 2);
        assert!(state.bucket.iter().all(|t| t.icon == 1));
    }

    #[test]
    fn test_clearing_board_awards_bonus() {
        let mut state = EnvState::new(11);
        state.reset(Some(1)).unwrap();

        let mut tiles: Vec<Option<Tile>> = (0..3).map(|i| Some(spread_tile(4, i))).collect();
        tiles.resize(12, None);
        install_scene(&mut state, tiles);

        assert_eq!(state.step(0).unwrap().1, 0.0);
        assert_eq!(state.step(1).unwrap().1, 0.0);
        let (_, reward, done) = state.step(2).unwrap();
        assert!(done);
        // 三消 1.25 + 通關 10
        assert_eq!(reward, 1.25 + R);
        assert_eq!(state.phase, Phase::End(GameEnd::Clear));
        assert_eq!(state.cur_item_num, 0);
    }

    #[test]
    fn test_bucket_overflow_ends_episode() {
        let mut state = EnvState::new(13);
        state.reset(Some(1)).unwrap();

        let mut tiles: Vec<Option<Tile>> = vec![
            Some(spread_tile(6, 0)),
            Some(spread_tile(7, 1)),
        ];
        tiles.resize(12, None);
        install_scene(&mut state, tiles);
        // 槽內已有 6 枚、任一圖案至多兩枚 → 下一枚即溢出
        state.bucket = vec![
            spread_tile(0, 2),
            spread_tile(0, 3),
            spread_tile(1, 4),
            spread_tile(1, 5),
            spread_tile(2, 6),
            spread_tile(2, 7),
        ];

        let (_, reward, done) = state.step(0).unwrap();
        assert!(done);
        assert_eq!(reward, -R);
        assert_eq!(state.phase, Phase::End(GameEnd::Overflow));
        assert_eq!(state.bucket.len(), BUCKET_LENGTH);
    }

    #[test]
    fn test_step_after_end_is_illegal() {
        let mut state = EnvState::new(17);
        state.reset(Some(1)).unwrap();
        let mut tiles: Vec<Option<Tile>> = (0..3).map(|i| Some(spread_tile(2, i))).collect();
        tiles.resize(12, None);
        install_scene(&mut state, tiles);

        for action in 0..3 {
            state.step(action).unwrap();
        }
        assert!(matches!(
            state.step(3),
            Err(SheepError::IllegalState { .. })
        ));

        // reset 之後恢復可玩
        state.reset(None).unwrap();
        assert_eq!(state.phase, Phase::Active);
        assert_eq!(state.cur_item_num, 12);
    }

    #[test]
    fn test_same_seed_same_episode() {
        let mut a = EnvState::new(2024);
        let mut b = EnvState::new(2024);
        a.reset(Some(3)).unwrap();
        b.reset(Some(3)).unwrap();
        assert_eq!(a.scene_json(), b.scene_json());
    }
}

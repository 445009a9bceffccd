//! 參考策略
//!
//! 真正的決策方（神經網路策略）是外部協作者，只透過
//! `decide(observation) -> action` 這個窄介面接觸環境。
//! 這裡提供兩個參考實作：mask 加權的均勻隨機（對齊 Python 端
//! `random_action`），以及測試用的最小合法索引。

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::observation::EnvObs;

pub trait Policy {
    /// 從合法動作中選一個；mask 全零時回傳 None
    fn decide(&mut self, obs: &EnvObs) -> Option<i64>;
}

/// 均勻隨機選取合法槽位
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn decide(&mut self, obs: &EnvObs) -> Option<i64> {
        let legal: Vec<i64> = obs
            .action_mask
            .iter()
            .enumerate()
            .filter(|(_, &m)| m == 1)
            .map(|(i, _)| i as i64)
            .collect();
        if legal.is_empty() {
            return None;
        }
        Some(legal[self.rng.gen_range(0..legal.len())])
    }
}

/// 最小合法索引（確定性測試替身）
pub struct FirstLegal;

impl Policy for FirstLegal {
    fn decide(&mut self, obs: &EnvObs) -> Option<i64> {
        obs.action_mask.iter().position(|&m| m == 1).map(|i| i as i64)
    }
}

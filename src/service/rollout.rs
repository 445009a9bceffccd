//! 批量對局評估
//!
//! 各對局實例完全隔離、無共享可變狀態，可用 rayon 平行展開。
//! 主要用於衡量參考策略的勝率與獎勵分佈。

use rayon::prelude::*;

use crate::game::SheepResult;

use super::policy::{Policy, RandomPolicy};
use super::state::{EnvState, GameEnd, Phase};

#[derive(Clone, Copy, Debug)]
pub struct EpisodeStats {
    pub seed: u64,
    pub steps: u32,
    pub total_reward: f32,
    pub cleared: bool,
}

/// 用給定策略跑完一整局
pub fn run_episode<P: Policy>(seed: u64, level: i32, policy: &mut P) -> SheepResult<EpisodeStats> {
    let mut env = EnvState::new(seed);
    let mut obs = env.reset(Some(level))?;

    let mut steps = 0u32;
    let mut total_reward = 0.0f32;
    loop {
        let action = match policy.decide(&obs) {
            Some(a) => a,
            None => break, // 不應發生：有存活方塊時最高層恆可拾取
        };
        let (next_obs, reward, done) = env.step(action)?;
        obs = next_obs;
        steps += 1;
        total_reward += reward;
        if done {
            break;
        }
    }

    Ok(EpisodeStats {
        seed,
        steps,
        total_reward,
        cleared: env.phase == Phase::End(GameEnd::Clear),
    })
}

/// 隨機策略在一批種子上平行評估
pub fn evaluate_random(level: i32, seeds: &[u64]) -> SheepResult<Vec<EpisodeStats>> {
    seeds
        .par_iter()
        .map(|&seed| {
            let mut policy = RandomPolicy::new(seed);
            run_episode(seed, level, &mut policy)
        })
        .collect()
}

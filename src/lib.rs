//! SheepEnv 遊戲引擎
//!
//! 三消收集類益智遊戲（羊了個羊）的狀態機引擎：
//! 佈局生成、遮擋/可見性解析、reset/step 狀態轉移、
//! 獎勵計算與固定形狀的 observation / action mask 編碼。

pub mod game;
pub mod service;

pub mod proto {
    tonic::include_proto!("sheep_env");
}

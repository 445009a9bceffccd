use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tonic::{Request, Response, Status};

use sheep_env::proto::sheep_env_server::{SheepEnv, SheepEnvServer};
use sheep_env::proto::{
    EnvInfo, GetSpecRequest, GetSpecResponse, Observation, ResetRequest, ResetResponse,
    StepRequest, StepResponse, Tensor, TensorSpec,
};

use sheep_env::game::LevelConfig;
use sheep_env::service::{EnvObs, EnvState, Policy, RandomPolicy};

// ============================================================================
// Session 管理
// ============================================================================

const MAX_ENV_NUM: usize = 50;
const ENV_TIMEOUT: Duration = Duration::from_secs(60);
const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

struct SessionEntry {
    env: EnvState,
    policy: RandomPolicy,
    update_time: Instant,
}

type Sessions = Arc<DashMap<String, Mutex<SessionEntry>>>;

// ============================================================================
// gRPC 服務
// ============================================================================

struct EnvService {
    sessions: Sessions,
}

impl EnvService {
    fn new(sessions: Sessions) -> Self {
        Self { sessions }
    }
}

fn tensor_1d(data: Vec<f32>) -> Tensor {
    let shape = vec![data.len() as i64];
    Tensor { data, shape }
}

fn obs_to_proto(obs: &EnvObs) -> Observation {
    Observation {
        item_obs: Some(Tensor {
            data: obs.item_obs.clone(),
            shape: obs.item_shape.iter().map(|&d| d as i64).collect(),
        }),
        bucket_obs: Some(tensor_1d(obs.bucket_obs.clone())),
        global_obs: Some(tensor_1d(obs.global_obs.clone())),
        action_mask: Some(tensor_1d(
            obs.action_mask.iter().map(|&m| m as f32).collect(),
        )),
    }
}

fn info_from_state(state: &EnvState) -> EnvInfo {
    EnvInfo {
        level: state.config.level,
        total_item_num: state.config.total_item_num as i32,
        remaining: state.cur_item_num as i32,
        bucket_size: state.bucket.len() as i32,
        game_end: state.game_end_code(),
    }
}

#[tonic::async_trait]
impl SheepEnv for EnvService {
    async fn reset(
        &self,
        request: Request<ResetRequest>,
    ) -> Result<Response<ResetResponse>, Status> {
        let ResetRequest {
            session_id,
            seed,
            level,
        } = request.into_inner();

        if !self.sessions.contains_key(&session_id) {
            if self.sessions.len() >= MAX_ENV_NUM {
                return Err(Status::resource_exhausted(
                    "No enough env resource, please wait a moment",
                ));
            }
            self.sessions.insert(
                session_id.clone(),
                Mutex::new(SessionEntry {
                    env: EnvState::new(seed),
                    policy: RandomPolicy::new(seed),
                    update_time: Instant::now(),
                }),
            );
        }

        let entry = self
            .sessions
            .get(&session_id)
            .ok_or_else(|| Status::internal("session vanished"))?;
        let mut session = entry
            .lock()
            .map_err(|_| Status::internal("lock error"))?;
        session.update_time = Instant::now();

        let obs = session.env.reset(Some(level))?;
        let suggested_action = session.policy.decide(&obs).unwrap_or(-1) as i32;

        Ok(Response::new(ResetResponse {
            observation: Some(obs_to_proto(&obs)),
            info: Some(info_from_state(&session.env)),
            scene: session.env.scene_json().to_string(),
            suggested_action,
        }))
    }

    async fn step(&self, request: Request<StepRequest>) -> Result<Response<StepResponse>, Status> {
        let StepRequest { session_id, action } = request.into_inner();

        let entry = self.sessions.get(&session_id).ok_or_else(|| {
            Status::failed_precondition("No response for too long time, please reset the game")
        })?;
        let mut session = entry
            .lock()
            .map_err(|_| Status::internal("lock error"))?;
        session.update_time = Instant::now();

        let (obs, reward, done) = session.env.step(action as i64)?;
        let suggested_action = if done {
            -1
        } else {
            session.policy.decide(&obs).unwrap_or(-1) as i32
        };

        Ok(Response::new(StepResponse {
            observation: Some(obs_to_proto(&obs)),
            reward,
            done,
            info: Some(info_from_state(&session.env)),
            scene: session.env.scene_json().to_string(),
            suggested_action,
        }))
    }

    async fn get_spec(
        &self,
        request: Request<GetSpecRequest>,
    ) -> Result<Response<GetSpecResponse>, Status> {
        let level = request.into_inner().level;
        let config = LevelConfig::new(level).map_err(Status::from)?;

        let spec = |shape: Vec<i64>| TensorSpec {
            shape,
            dtype: "f32".to_string(),
        };
        let [rows, cols] = config.item_obs_shape();

        Ok(Response::new(GetSpecResponse {
            item_obs: Some(spec(vec![rows as i64, cols as i64])),
            bucket_obs: Some(spec(vec![config.bucket_obs_size() as i64])),
            global_obs: Some(spec(vec![config.global_obs_size() as i64])),
            action_mask: Some(spec(vec![config.action_space() as i64])),
            action_space: config.action_space() as i32,
        }))
    }
}

/// 閒置 session 的背景清掃（對齊 Python 端 env_monitor）
fn spawn_session_sweeper(sessions: Sessions) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let before = sessions.len();
            sessions.retain(|_, entry| match entry.get_mut() {
                Ok(session) => session.update_time.elapsed() < ENV_TIMEOUT,
                Err(_) => false,
            });
            let evicted = before.saturating_sub(sessions.len());
            if evicted > 0 {
                println!("evicted {} idle session(s), {} alive", evicted, sessions.len());
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let addr = "127.0.0.1:50051".parse()?;
    let sessions: Sessions = Arc::new(DashMap::new());
    spawn_session_sweeper(sessions.clone());

    let service = EnvService::new(sessions);
    println!("SheepEnv gRPC server listening on {}", addr);
    println!("Sessions: max {}, idle timeout {:?}", MAX_ENV_NUM, ENV_TIMEOUT);

    tonic::transport::Server::builder()
        .add_service(SheepEnvServer::new(service))
        .serve(addr)
        .await?;

    Ok(())
}

//! 錯誤定義
//!
//! 三種錯誤都是同步的驗證失敗，不可重試；被拒絕的呼叫不得改動任何狀態。

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheepError {
    /// reset 的關卡超出 [1, 5]
    InvalidLevel { level: i32 },
    /// step 的槽位越界或已被拾取
    InvalidAction { action: i64, reason: &'static str },
    /// 終局後除 reset 外的操作
    IllegalState { message: &'static str },
}

impl fmt::Display for SheepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheepError::InvalidLevel { level } => {
                write!(f, "Invalid level {}: expected 1..=5", level)
            }
            SheepError::InvalidAction { action, reason } => {
                write!(f, "Invalid action {}: {}", action, reason)
            }
            SheepError::IllegalState { message } => {
                write!(f, "Illegal state: {}", message)
            }
        }
    }
}

impl std::error::Error for SheepError {}

pub type SheepResult<T> = Result<T, SheepError>;

impl From<SheepError> for tonic::Status {
    fn from(err: SheepError) -> tonic::Status {
        match err {
            SheepError::InvalidLevel { .. } | SheepError::InvalidAction { .. } => {
                tonic::Status::invalid_argument(err.to_string())
            }
            SheepError::IllegalState { .. } => tonic::Status::failed_precondition(err.to_string()),
        }
    }
}

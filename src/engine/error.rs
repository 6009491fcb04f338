// ==========================================
// 加权槽位调度系统 - 引擎层错误类型
// ==========================================
// 说明: 引擎本身是确定性内存计算，只有输入形状不一致才会失败
// ==========================================

use crate::config::ConfigError;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("配置校验失败: {0}")]
    Config(#[from] ConfigError),

    #[error("长度不一致 ({what}): expected={expected}, actual={actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("周期事件无效: interval={interval}, {message}")]
    InvalidEvents { interval: u64, message: String },

    #[error("指标导出失败: {0}")]
    Export(String),
}

impl From<csv::Error> for SchedulerError {
    fn from(err: csv::Error) -> Self {
        SchedulerError::Export(err.to_string())
    }
}

impl From<serde_json::Error> for SchedulerError {
    fn from(err: serde_json::Error) -> Self {
        SchedulerError::Export(err.to_string())
    }
}

impl From<std::io::Error> for SchedulerError {
    fn from(err: std::io::Error) -> Self {
        SchedulerError::Export(err.to_string())
    }
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;

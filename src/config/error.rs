// ==========================================
// 加权槽位调度系统 - 配置层错误类型
// ==========================================
// 职责: 启动前的前置条件校验失败（任何周期执行前即失败）
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    // ===== 规模错误 =====
    #[error("队列数量必须大于 0")]
    NoQueues,

    #[error("区间无效 ({field}): min={min} > max={max}")]
    InvalidRange { field: String, min: u64, max: u64 },

    #[error("字段值错误 (field={field}): {message}")]
    FieldValueError { field: String, message: String },

    // ===== 权重错误 =====
    #[error("权重数量与队列数量不一致: weights={weights}, queues={queues}")]
    WeightCountMismatch { weights: usize, queues: usize },

    #[error("权重必须为正有限数: queue={queue_id}, weight={weight}")]
    InvalidWeight { queue_id: usize, weight: f64 },

    #[error("权重之和必须为 1: sum={sum}")]
    WeightSumMismatch { sum: f64 },

    // ===== 加载错误 =====
    #[error("配置文件读取失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("环境变量无效 ({key}={value}): {message}")]
    InvalidEnv {
        key: String,
        value: String,
        message: String,
    },
}

// ==========================================
// 加权槽位调度系统 - 模拟配置
// ==========================================
// 职责: 一组命名的数值上下界 + 策略 + 随机种子
// 红线: 配置非法必须在任何周期执行前失败
// ==========================================

use crate::config::error::ConfigError;
use crate::domain::capacity::CapacityWindow;
use crate::domain::types::EligibilityPolicy;
use serde::{Deserialize, Serialize};

/// 权重之和允许的浮点误差
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

// ==========================================
// 默认值
// ==========================================
pub mod defaults {
    pub const QUEUE_COUNT: usize = 10;
    pub const INTERVALS: u64 = 1000;
    pub const MIN_CAPACITY: u64 = 200;
    pub const MAX_CAPACITY: u64 = 300;
    pub const CAPACITY_STEP: u64 = 10;
    pub const MIN_WEIGHT: u32 = 1;
    pub const MAX_WEIGHT: u32 = 10;
    pub const MIN_ARRIVALS: u64 = 0;
    pub const MAX_ARRIVALS: u64 = 10;
    pub const COMPLETION_DIVISOR: u64 = 3;
    pub const SEED: u64 = 0;
}

fn default_queue_count() -> usize {
    defaults::QUEUE_COUNT
}
fn default_intervals() -> u64 {
    defaults::INTERVALS
}
fn default_min_capacity() -> u64 {
    defaults::MIN_CAPACITY
}
fn default_max_capacity() -> u64 {
    defaults::MAX_CAPACITY
}
fn default_capacity_step() -> u64 {
    defaults::CAPACITY_STEP
}
fn default_min_weight() -> u32 {
    defaults::MIN_WEIGHT
}
fn default_max_weight() -> u32 {
    defaults::MAX_WEIGHT
}
fn default_max_arrivals() -> u64 {
    defaults::MAX_ARRIVALS
}
fn default_completion_divisor() -> u64 {
    defaults::COMPLETION_DIVISOR
}

// ==========================================
// SimulationConfig - 模拟配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// 队列数量
    #[serde(default = "default_queue_count")]
    pub queue_count: usize,

    /// 周期数量
    #[serde(default = "default_intervals")]
    pub intervals: u64,

    /// 系统容量下界（含）
    #[serde(default = "default_min_capacity")]
    pub min_capacity: u64,

    /// 系统容量上界（含）
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,

    /// 容量量化步长
    #[serde(default = "default_capacity_step")]
    pub capacity_step: u64,

    /// 原始整数权重下界（生成后归一化）
    #[serde(default = "default_min_weight")]
    pub min_weight: u32,

    /// 原始整数权重上界
    #[serde(default = "default_max_weight")]
    pub max_weight: u32,

    /// 每周期每队列新到达任务数下界
    #[serde(default)]
    pub min_arrivals: u64,

    /// 每周期每队列新到达任务数上界
    #[serde(default = "default_max_arrivals")]
    pub max_arrivals: u64,

    /// 完成数上界 = active / completion_divisor
    #[serde(default = "default_completion_divisor")]
    pub completion_divisor: u64,

    /// 准入策略
    #[serde(default)]
    pub policy: EligibilityPolicy,

    /// 随机种子（所有随机外部源共用）
    #[serde(default)]
    pub seed: u64,

    /// 显式权重（设置后不再随机生成，必须归一化）
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            queue_count: defaults::QUEUE_COUNT,
            intervals: defaults::INTERVALS,
            min_capacity: defaults::MIN_CAPACITY,
            max_capacity: defaults::MAX_CAPACITY,
            capacity_step: defaults::CAPACITY_STEP,
            min_weight: defaults::MIN_WEIGHT,
            max_weight: defaults::MAX_WEIGHT,
            min_arrivals: defaults::MIN_ARRIVALS,
            max_arrivals: defaults::MAX_ARRIVALS,
            completion_divisor: defaults::COMPLETION_DIVISOR,
            policy: EligibilityPolicy::default(),
            seed: defaults::SEED,
            weights: None,
        }
    }
}

impl SimulationConfig {
    /// 容量取值区间
    pub fn capacity_window(&self) -> CapacityWindow {
        CapacityWindow::new(self.min_capacity, self.max_capacity, self.capacity_step)
    }

    /// 校验配置
    ///
    /// # 返回
    /// - Ok(()): 所有前置条件成立
    /// - Err(ConfigError): 第一条违反的前置条件
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_count == 0 {
            return Err(ConfigError::NoQueues);
        }

        check_range("capacity", self.min_capacity, self.max_capacity)?;
        check_range("weight", self.min_weight as u64, self.max_weight as u64)?;
        check_range("arrivals", self.min_arrivals, self.max_arrivals)?;

        if self.capacity_step == 0 {
            return Err(ConfigError::FieldValueError {
                field: "capacity_step".to_string(),
                message: "步长必须大于 0".to_string(),
            });
        }

        if self.completion_divisor == 0 {
            return Err(ConfigError::FieldValueError {
                field: "completion_divisor".to_string(),
                message: "除数必须大于 0".to_string(),
            });
        }

        // 权重下界为 0 时可能生成零权重队列
        if self.min_weight == 0 {
            return Err(ConfigError::FieldValueError {
                field: "min_weight".to_string(),
                message: "权重下界必须大于 0".to_string(),
            });
        }

        if let Some(weights) = &self.weights {
            if weights.len() != self.queue_count {
                return Err(ConfigError::WeightCountMismatch {
                    weights: weights.len(),
                    queues: self.queue_count,
                });
            }
            validate_weights(weights)?;
        }

        Ok(())
    }
}

fn check_range(field: &str, min: u64, max: u64) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvalidRange {
            field: field.to_string(),
            min,
            max,
        });
    }
    Ok(())
}

/// 校验权重向量：每个权重为正有限数，且总和为 1
pub fn validate_weights(weights: &[f64]) -> Result<(), ConfigError> {
    if weights.is_empty() {
        return Err(ConfigError::NoQueues);
    }

    for (queue_id, &weight) in weights.iter().enumerate() {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(ConfigError::InvalidWeight { queue_id, weight });
        }
    }

    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ConfigError::WeightSumMismatch { sum });
    }

    Ok(())
}

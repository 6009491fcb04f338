// ==========================================
// 加权槽位调度系统 - 领域类型定义
// ==========================================
// 职责: 准入策略枚举（决定哪些队列参与配额计算）
// ==========================================

use crate::domain::queue::QueueState;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 准入策略 (Eligibility Policy)
// ==========================================
// 顺序: All < NonEmpty < NonEmptyOrActive（需求感知程度递增）
// 序列化格式: kebab-case（与命令行/配置文件一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EligibilityPolicy {
    /// 所有队列均参与，不考虑需求
    All,
    /// 仅 backlog > 0 的队列参与
    #[serde(rename = "nonempty", alias = "non_empty", alias = "non-empty")]
    NonEmpty,
    /// backlog + active > 0 的队列参与（默认，需求感知最强）
    #[serde(
        rename = "nonempty-or-active",
        alias = "nonempty_or_active",
        alias = "non-empty-or-active"
    )]
    NonEmptyOrActive,
}

impl EligibilityPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EligibilityPolicy::All => "all",
            EligibilityPolicy::NonEmpty => "nonempty",
            EligibilityPolicy::NonEmptyOrActive => "nonempty-or-active",
        }
    }

    /// 判断队列在本次配额计算中是否有资格
    pub fn is_eligible(&self, queue: &QueueState) -> bool {
        match self {
            EligibilityPolicy::All => true,
            EligibilityPolicy::NonEmpty => queue.backlog > 0,
            EligibilityPolicy::NonEmptyOrActive => queue.demand() > 0,
        }
    }

    /// 队列配额上限（None 表示不受需求约束）
    ///
    /// # 返回
    /// - `All`: None
    /// - `NonEmpty`: Some(backlog)
    /// - `NonEmptyOrActive`: Some(backlog + active)
    pub fn demand_cap(&self, queue: &QueueState) -> Option<u64> {
        match self {
            EligibilityPolicy::All => None,
            EligibilityPolicy::NonEmpty => Some(queue.backlog),
            EligibilityPolicy::NonEmptyOrActive => Some(queue.demand()),
        }
    }
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        EligibilityPolicy::NonEmptyOrActive
    }
}

impl fmt::Display for EligibilityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EligibilityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(EligibilityPolicy::All),
            "nonempty" | "non_empty" | "non-empty" => Ok(EligibilityPolicy::NonEmpty),
            "nonempty-or-active" | "nonempty_or_active" | "non-empty-or-active" => {
                Ok(EligibilityPolicy::NonEmptyOrActive)
            }
            other => Err(format!("未知准入策略: {}", other)),
        }
    }
}

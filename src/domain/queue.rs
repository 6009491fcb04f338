// ==========================================
// 加权槽位调度系统 - 队列领域模型
// ==========================================
// 职责: 队列状态与跨周期运行状态
// 红线: backlog/active 不可为负（u64 保证），deficit 在 backlog 归零时立即清零
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// QueueState - 单个需求队列
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueState {
    pub queue_id: usize, // 队列下标（同时作为并列时的裁决键）
    pub weight: f64,     // 权重 (0, 1]，生命周期内固定
    pub backlog: u64,    // 待服务任务数
    pub active: u64,     // 占用中的槽位数
    pub deficit: i64,    // 累计欠额（正数=欠服务）
}

impl QueueState {
    /// 创建空队列（backlog/active/deficit 均为 0）
    pub fn new(queue_id: usize, weight: f64) -> Self {
        Self {
            queue_id,
            weight,
            backlog: 0,
            active: 0,
            deficit: 0,
        }
    }

    /// 总需求 = 待服务 + 占用中
    pub fn demand(&self) -> u64 {
        self.backlog + self.active
    }

    pub fn is_empty(&self) -> bool {
        self.backlog == 0
    }
}

// ==========================================
// SimulationState - 运行状态
// ==========================================
// 每个周期作为输入传入、作为输出返回，不做隐式共享修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub interval: u64,            // 下一个待执行的周期序号
    pub queues: Vec<QueueState>,  // 全部队列（运行期间不增不减）
}

impl SimulationState {
    /// 以给定权重创建初始状态
    pub fn initial(weights: &[f64]) -> Self {
        Self {
            interval: 0,
            queues: weights
                .iter()
                .enumerate()
                .map(|(queue_id, &weight)| QueueState::new(queue_id, weight))
                .collect(),
        }
    }

    pub fn queue_count(&self) -> usize {
        self.queues.len()
    }

    pub fn total_active(&self) -> u64 {
        self.queues.iter().map(|q| q.active).sum()
    }

    pub fn total_backlog(&self) -> u64 {
        self.queues.iter().map(|q| q.backlog).sum()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.queues.iter().map(|q| q.weight).collect()
    }
}

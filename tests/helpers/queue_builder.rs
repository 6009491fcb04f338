// ==========================================
// 队列状态构建器 - 用于集成测试
// ==========================================

use fair_slot_scheduler::domain::QueueState;

// ==========================================
// QueueState 构建器
// ==========================================

pub struct QueueBuilder {
    queue_id: usize,
    weight: f64,
    backlog: u64,
    active: u64,
    deficit: i64,
}

impl QueueBuilder {
    pub fn new(queue_id: usize, weight: f64) -> Self {
        Self {
            queue_id,
            weight,
            backlog: 0,
            active: 0,
            deficit: 0,
        }
    }

    pub fn backlog(mut self, backlog: u64) -> Self {
        self.backlog = backlog;
        self
    }

    pub fn active(mut self, active: u64) -> Self {
        self.active = active;
        self
    }

    pub fn deficit(mut self, deficit: i64) -> Self {
        self.deficit = deficit;
        self
    }

    pub fn build(self) -> QueueState {
        QueueState {
            queue_id: self.queue_id,
            weight: self.weight,
            backlog: self.backlog,
            active: self.active,
            deficit: self.deficit,
        }
    }
}

/// 按权重批量创建队列，backlog 统一设置
pub fn queues(weights: &[f64], backlog: u64) -> Vec<QueueState> {
    weights
        .iter()
        .enumerate()
        .map(|(i, &w)| QueueBuilder::new(i, w).backlog(backlog).build())
        .collect()
}

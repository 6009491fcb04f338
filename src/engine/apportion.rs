// ==========================================
// 加权槽位调度系统 - 配额分配引擎
// ==========================================
// 职责: Huntington-Hill 比例分配，把连续权重换算为整数配额
// 输入: 本周期容量 + 队列权重/需求
// 输出: 每队列配额 (should-be)，总和不超过容量
// 红线: 需求感知模式下配额不超过队列自身需求
// ==========================================
//
// 优先数采用平方形式: A_1 = w^2 / 2, A_n = A_{n-1} * (n-1)/(n+1)
// 与 w / sqrt(n(n+1)) 单调等价，避免开方。

use crate::domain::queue::QueueState;
use crate::domain::types::EligibilityPolicy;
use crate::engine::priority::QuotaPriority;
use serde::{Deserialize, Serialize};
use std::collections::BinaryHeap;
use tracing::{debug, instrument, trace};

// ==========================================
// ApportionResult - 配额分配结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApportionResult {
    pub quotas: Vec<u64>,        // 每队列配额
    pub eligible: Vec<bool>,     // 每队列是否参与本次分配
    pub threshold: Option<f64>,  // 资格阈值（容量为 0 或无合格队列时为 None）
    pub assigned_total: u64,     // 已分配配额总和
    pub unassigned: u64,         // 因需求不足未分配的容量
}

impl ApportionResult {
    fn empty(capacity: u64, eligible: Vec<bool>) -> Self {
        Self {
            quotas: vec![0; eligible.len()],
            eligible,
            threshold: None,
            assigned_total: 0,
            unassigned: capacity,
        }
    }
}

// ==========================================
// ApportionmentEngine - 配额分配引擎
// ==========================================
pub struct ApportionmentEngine {
    policy: EligibilityPolicy,
}

impl ApportionmentEngine {
    /// 构造函数
    ///
    /// # 参数
    /// - `policy`: 准入策略
    pub fn new(policy: EligibilityPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> EligibilityPolicy {
        self.policy
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算配额
    ///
    /// 规则:
    /// 1) capacity == 0: 全部为 0（不做除法）
    /// 2) threshold = 合格队列权重和 / capacity
    /// 3) weight >= threshold 的合格队列先得 1 个槽位
    /// 4) 其余槽位逐个给当前优先数最大的队列，并列时下标小者优先
    /// 5) 需求感知模式下，剩余需求耗尽的队列退出本次分配
    ///
    /// # 参数
    /// - `capacity`: 本周期系统容量
    /// - `queues`: 队列状态（只读）
    ///
    /// # 返回
    /// 配额分配结果，sum(quotas) <= capacity
    #[instrument(level = "debug", skip(self, queues), fields(
        policy = %self.policy,
        queue_count = queues.len()
    ))]
    pub fn apportion(&self, capacity: u64, queues: &[QueueState]) -> ApportionResult {
        let eligible: Vec<bool> = queues.iter().map(|q| self.policy.is_eligible(q)).collect();

        if capacity == 0 {
            debug!("容量为 0，配额全部清零");
            return ApportionResult::empty(capacity, eligible);
        }

        // 1. 资格阈值（仅合格队列计入权重和）
        let weight_sum: f64 = queues
            .iter()
            .zip(&eligible)
            .filter(|(_, ok)| **ok)
            .map(|(q, _)| q.weight)
            .sum();

        if weight_sum <= 0.0 {
            debug!("无合格队列，配额全部清零");
            return ApportionResult::empty(capacity, eligible);
        }

        let threshold = weight_sum / capacity as f64;
        let mut quotas = vec![0u64; queues.len()];
        let mut remaining = capacity;
        let mut heap = BinaryHeap::with_capacity(queues.len());

        // 2. 初始槽位 + A_1
        for (idx, (queue, &ok)) in queues.iter().zip(&eligible).enumerate() {
            if !ok || queue.weight <= 0.0 || queue.weight < threshold {
                continue;
            }
            // 浮点误差可能让合格队列数略超容量
            if remaining == 0 {
                break;
            }

            quotas[idx] = 1;
            remaining -= 1;

            if self.has_room(queue, 1) {
                heap.push(QuotaPriority {
                    priority: queue.weight * queue.weight / 2.0,
                    queue_id: idx,
                });
            }
        }

        // 3. 逐个分配剩余槽位
        while remaining > 0 {
            let Some(entry) = heap.pop() else {
                break;
            };

            let idx = entry.queue_id;
            quotas[idx] += 1;
            remaining -= 1;

            let n = quotas[idx];
            trace!(queue_id = idx, quota = n, priority = entry.priority, "分配槽位");

            if self.has_room(&queues[idx], n) {
                heap.push(QuotaPriority {
                    priority: entry.priority * (n - 1) as f64 / (n + 1) as f64,
                    queue_id: idx,
                });
            }
        }

        let assigned_total = capacity - remaining;
        debug!(
            capacity,
            threshold,
            assigned_total,
            unassigned = remaining,
            "配额分配完成"
        );

        ApportionResult {
            quotas,
            eligible,
            threshold: Some(threshold),
            assigned_total,
            unassigned: remaining,
        }
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 队列在当前配额下是否还能再接收槽位
    fn has_room(&self, queue: &QueueState, quota: u64) -> bool {
        match self.policy.demand_cap(queue) {
            Some(cap) => quota < cap,
            None => true,
        }
    }
}

impl Default for ApportionmentEngine {
    fn default() -> Self {
        Self::new(EligibilityPolicy::default())
    }
}

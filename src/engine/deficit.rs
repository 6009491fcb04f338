// ==========================================
// 加权槽位调度系统 - 欠额补偿调度引擎
// ==========================================
// 职责: 按配额更新欠额，再把空闲槽位分给欠额最大的队列
// 输入: 队列状态 + 本周期配额 + 本周期容量
// 输出: 新队列状态（backlog/active/deficit）+ 分配明细
// 红线: 已占用槽位不抢占；backlog 归零的队列 deficit 立即清零
// ==========================================

use crate::domain::capacity::{SlotConstraint, SlotPool};
use crate::domain::queue::QueueState;
use crate::engine::error::{SchedulerError, SchedulerResult};
use crate::engine::priority::DeficitPriority;
use serde::{Deserialize, Serialize};
use std::collections::BinaryHeap;
use tracing::{debug, instrument, trace};

// ==========================================
// AssignmentOutcome - 槽位分配结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentOutcome {
    pub queues: Vec<QueueState>, // 分配后的队列状态
    pub assigned: Vec<u64>,      // 每队列本周期新分配的槽位
    pub available: u64,          // 本周期可分配槽位
    pub assigned_total: u64,     // 实际分配总数
    pub forfeited: u64,          // 因候选耗尽而作废的槽位（不结转）
}

// ==========================================
// ScheduleOutcome - 单周期调度结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    pub deficits_before_assign: Vec<i64>, // 欠额更新后、分配前
    pub assignment: AssignmentOutcome,
}

// ==========================================
// DeficitScheduler - 欠额补偿调度引擎
// ==========================================
pub struct DeficitScheduler {
    // 无状态引擎，欠额随队列状态传入传出
}

impl DeficitScheduler {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 完整调度：先更新欠额，再分配槽位
    ///
    /// # 参数
    /// - `queues`: 当前队列状态
    /// - `quotas`: 本周期配额（与队列一一对应）
    /// - `capacity`: 本周期系统容量
    #[instrument(level = "debug", skip(self, queues, quotas), fields(queue_count = queues.len()))]
    pub fn schedule(
        &self,
        queues: &[QueueState],
        quotas: &[u64],
        capacity: u64,
    ) -> SchedulerResult<ScheduleOutcome> {
        let updated = self.update_deficits(queues, quotas)?;
        let deficits_before_assign = updated.iter().map(|q| q.deficit).collect();
        let assignment = self.assign(&updated, capacity);

        Ok(ScheduleOutcome {
            deficits_before_assign,
            assignment,
        })
    }

    /// 步骤A: 欠额更新
    ///
    /// 规则:
    /// - backlog > 0: deficit += quota - active
    /// - backlog == 0: deficit = 0
    pub fn update_deficits(
        &self,
        queues: &[QueueState],
        quotas: &[u64],
    ) -> SchedulerResult<Vec<QueueState>> {
        if queues.len() != quotas.len() {
            return Err(SchedulerError::LengthMismatch {
                what: "quotas",
                expected: queues.len(),
                actual: quotas.len(),
            });
        }

        let updated = queues
            .iter()
            .zip(quotas)
            .map(|(queue, &quota)| {
                let mut next = queue.clone();
                if next.backlog > 0 {
                    next.deficit += quota as i64 - next.active as i64;
                } else {
                    next.deficit = 0;
                }
                trace!(
                    queue_id = next.queue_id,
                    quota,
                    active = next.active,
                    deficit = next.deficit,
                    "欠额更新"
                );
                next
            })
            .collect();

        Ok(updated)
    }

    /// 步骤B: 按欠额分配空闲槽位
    ///
    /// 规则:
    /// 1) available = capacity - sum(active)，不抢占
    /// 2) 候选为 backlog > 0 的队列，欠额大者优先，并列时下标小者优先
    /// 3) 每分配 1 个槽位: backlog -1, active +1, deficit -1
    /// 4) backlog 归零: deficit 清零并退出候选
    /// 5) 候选耗尽即停止，剩余槽位作废
    pub fn assign(&self, queues: &[QueueState], capacity: u64) -> AssignmentOutcome {
        let mut queues = queues.to_vec();
        let pool = SlotPool {
            capacity,
            active_total: queues.iter().map(|q| q.active).sum(),
        };
        let available = pool.available_slots();

        let mut heap: BinaryHeap<DeficitPriority> = queues
            .iter()
            .enumerate()
            .filter(|(_, q)| q.backlog > 0)
            .map(|(idx, q)| DeficitPriority {
                deficit: q.deficit,
                queue_id: idx,
            })
            .collect();

        let mut assigned = vec![0u64; queues.len()];
        let mut assigned_total = 0u64;

        while assigned_total < available {
            let Some(entry) = heap.pop() else {
                break;
            };

            let queue = &mut queues[entry.queue_id];
            queue.backlog -= 1;
            queue.active += 1;
            queue.deficit -= 1;
            assigned[entry.queue_id] += 1;
            assigned_total += 1;

            if queue.backlog == 0 {
                queue.deficit = 0;
            } else {
                heap.push(DeficitPriority {
                    deficit: queue.deficit,
                    queue_id: entry.queue_id,
                });
            }
        }

        let forfeited = available - assigned_total;
        debug!(
            capacity,
            available,
            assigned_total,
            forfeited,
            overcommitted = pool.is_overcommitted(),
            "槽位分配完成"
        );

        AssignmentOutcome {
            queues,
            assigned,
            available,
            assigned_total,
            forfeited,
        }
    }
}

impl Default for DeficitScheduler {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn create_queues(backlog: &[u64], active: &[u64], deficit: &[i64]) -> Vec<QueueState> {
        (0..backlog.len())
            .map(|i| QueueState {
                queue_id: i,
                weight: 1.0 / backlog.len() as f64,
                backlog: backlog[i],
                active: active[i],
                deficit: deficit[i],
            })
            .collect()
    }

    // ==========================================
    // 欠额更新测试
    // ==========================================

    #[test]
    fn test_update_adds_quota_minus_active() {
        let scheduler = DeficitScheduler::new();
        let queues = create_queues(&[3, 2], &[1, 5], &[2, 0]);

        let updated = scheduler.update_deficits(&queues, &[4, 2]).unwrap();

        assert_eq!(updated[0].deficit, 2 + 4 - 1);
        // 已超额服务：欠额变为负数
        assert_eq!(updated[1].deficit, 2 - 5);
    }

    #[test]
    fn test_update_resets_empty_queue() {
        let scheduler = DeficitScheduler::new();
        let queues = create_queues(&[0], &[4], &[7]);

        let updated = scheduler.update_deficits(&queues, &[9]).unwrap();
        assert_eq!(updated[0].deficit, 0);
    }

    #[test]
    fn test_update_rejects_length_mismatch() {
        let scheduler = DeficitScheduler::new();
        let queues = create_queues(&[1, 1], &[0, 0], &[0, 0]);

        let result = scheduler.update_deficits(&queues, &[1]);
        assert!(matches!(
            result,
            Err(SchedulerError::LengthMismatch { expected: 2, actual: 1, .. })
        ));
    }

    // ==========================================
    // 槽位分配测试
    // ==========================================

    #[test]
    fn test_worked_scheduling_example() {
        // backlog [5,5], quota [6,4], capacity 10 → 全部排空
        let scheduler = DeficitScheduler::new();
        let queues = create_queues(&[5, 5], &[0, 0], &[0, 0]);

        let outcome = scheduler.schedule(&queues, &[6, 4], 10).unwrap();

        assert_eq!(outcome.deficits_before_assign, vec![6, 4]);
        let result = outcome.assignment;
        assert_eq!(result.available, 10);
        assert_eq!(result.assigned, vec![5, 5]);
        assert_eq!(result.forfeited, 0);
        assert_eq!(
            result.queues.iter().map(|q| q.backlog).collect::<Vec<_>>(),
            vec![0, 0]
        );
        assert_eq!(
            result.queues.iter().map(|q| q.active).collect::<Vec<_>>(),
            vec![5, 5]
        );
        assert_eq!(
            result.queues.iter().map(|q| q.deficit).collect::<Vec<_>>(),
            vec![0, 0]
        );
    }

    #[test]
    fn test_highest_deficit_served_first() {
        let scheduler = DeficitScheduler::new();
        let queues = create_queues(&[10, 10], &[0, 0], &[1, 5]);

        let result = scheduler.assign(&queues, 4);

        // 5,4,3,2 全部高于队列0的 1
        assert_eq!(result.assigned, vec![0, 4]);
        assert_eq!(result.queues[1].deficit, 1);
        assert_eq!(result.queues[0].deficit, 1);
    }

    #[test]
    fn test_tie_goes_to_lower_index() {
        let scheduler = DeficitScheduler::new();
        let queues = create_queues(&[10, 10], &[0, 0], &[3, 3]);

        let result = scheduler.assign(&queues, 1);
        assert_eq!(result.assigned, vec![1, 0]);
    }

    #[test]
    fn test_active_slots_not_preempted() {
        let scheduler = DeficitScheduler::new();
        let queues = create_queues(&[5, 5], &[4, 4], &[0, 0]);

        let result = scheduler.assign(&queues, 10);
        assert_eq!(result.available, 2);
        assert_eq!(result.assigned_total, 2);

        // 容量低于已占用：不分配，也不回收
        let result = scheduler.assign(&queues, 6);
        assert_eq!(result.available, 0);
        assert_eq!(result.assigned_total, 0);
        assert_eq!(result.queues[0].active, 4);
    }

    #[test]
    fn test_unused_capacity_forfeited() {
        let scheduler = DeficitScheduler::new();
        let queues = create_queues(&[2, 0], &[0, 3], &[1, 0]);

        let result = scheduler.assign(&queues, 20);

        assert_eq!(result.available, 17);
        assert_eq!(result.assigned_total, 2);
        assert_eq!(result.forfeited, 15);
        assert_eq!(result.assigned, vec![2, 0]);
        assert_eq!(result.queues[0].backlog, 0);
        assert_eq!(result.queues[0].deficit, 0);
    }

    #[test]
    fn test_negative_deficit_still_served_when_spare() {
        let scheduler = DeficitScheduler::new();
        let queues = create_queues(&[3], &[0], &[-4]);

        let result = scheduler.assign(&queues, 2);
        assert_eq!(result.assigned, vec![2]);
        assert_eq!(result.queues[0].deficit, -6);
        assert_eq!(result.queues[0].backlog, 1);
    }

    #[test]
    fn test_input_not_mutated() {
        let scheduler = DeficitScheduler::new();
        let queues = create_queues(&[3, 3], &[0, 0], &[0, 0]);
        let before = queues.clone();

        let _ = scheduler.schedule(&queues, &[2, 2], 4).unwrap();
        assert_eq!(queues, before);
    }
}

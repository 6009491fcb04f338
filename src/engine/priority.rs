// ==========================================
// 加权槽位调度系统 - 优先级条目
// ==========================================
// 职责: 为 BinaryHeap 提供显式的大顶堆比较规则
// 红线: 键相等时下标小的队列先出堆（确定性裁决）
// ==========================================

use std::cmp::Ordering;

// ==========================================
// QuotaPriority - 配额优先数条目
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct QuotaPriority {
    pub priority: f64,
    pub queue_id: usize,
}

impl Ord for QuotaPriority {
    /// 比较两个条目
    ///
    /// 1. priority 大者优先 (total_cmp)
    /// 2. queue_id 小者优先
    ///
    /// # 返回
    /// Ordering::Greater 表示 self 先于 other 出堆
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| other.queue_id.cmp(&self.queue_id))
    }
}

impl PartialOrd for QuotaPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QuotaPriority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QuotaPriority {}

// ==========================================
// DeficitPriority - 欠额条目
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeficitPriority {
    pub deficit: i64,
    pub queue_id: usize,
}

impl Ord for DeficitPriority {
    /// 1. deficit 大者优先
    /// 2. queue_id 小者优先
    fn cmp(&self, other: &Self) -> Ordering {
        match self.deficit.cmp(&other.deficit) {
            Ordering::Equal => other.queue_id.cmp(&self.queue_id),
            other => other,
        }
    }
}

impl PartialOrd for DeficitPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn test_quota_priority_pops_max_then_lower_index() {
        let mut heap = BinaryHeap::new();
        heap.push(QuotaPriority { priority: 0.08, queue_id: 1 });
        heap.push(QuotaPriority { priority: 0.18, queue_id: 2 });
        heap.push(QuotaPriority { priority: 0.18, queue_id: 0 });

        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|e| e.queue_id)).collect();
        assert_eq!(order, vec![0, 2, 1]);
    }

    #[test]
    fn test_deficit_priority_handles_negative_and_ties() {
        let mut heap = BinaryHeap::new();
        heap.push(DeficitPriority { deficit: -3, queue_id: 0 });
        heap.push(DeficitPriority { deficit: 4, queue_id: 3 });
        heap.push(DeficitPriority { deficit: 4, queue_id: 1 });
        heap.push(DeficitPriority { deficit: 0, queue_id: 2 });

        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|e| e.queue_id)).collect();
        assert_eq!(order, vec![1, 3, 2, 0]);
    }
}

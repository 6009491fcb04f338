// ==========================================
// 加权槽位调度系统 - 欠额轨迹
// ==========================================
// 职责: 按队列追加每周期分配后的欠额（只追加）
// ==========================================

use crate::engine::error::SchedulerResult;
use crate::engine::metrics::{IntervalRecord, MetricsSink};
use std::io::Write;

// ==========================================
// DeficitTracker - 欠额轨迹接收器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct DeficitTracker {
    traces: Vec<Vec<i64>>, // traces[i]: 队列 i 的欠额序列
}

impl DeficitTracker {
    pub fn new(queue_count: usize) -> Self {
        Self {
            traces: vec![Vec::new(); queue_count],
        }
    }

    /// 队列 i 的欠额序列
    pub fn trace(&self, queue_id: usize) -> Option<&[i64]> {
        self.traces.get(queue_id).map(|t| t.as_slice())
    }

    pub fn traces(&self) -> &[Vec<i64>] {
        &self.traces
    }

    pub fn into_traces(self) -> Vec<Vec<i64>> {
        self.traces
    }

    /// 已记录的周期数
    pub fn len(&self) -> usize {
        self.traces.first().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 写出 CSV 欠额表
    pub fn write_csv<W: Write>(&self, writer: W) -> SchedulerResult<()> {
        write_deficit_table(&self.traces, writer)
    }
}

/// CSV 欠额表
///
/// 格式: 每行一个周期，首列 interval，其后每队列一列 (queue_0, queue_1, ...)
pub fn write_deficit_table<W: Write>(traces: &[Vec<i64>], writer: W) -> SchedulerResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["interval".to_string()];
    header.extend((0..traces.len()).map(|i| format!("queue_{}", i)));
    wtr.write_record(&header)?;

    let rows = traces.first().map(|t| t.len()).unwrap_or(0);
    for row in 0..rows {
        let mut record = vec![row.to_string()];
        record.extend(traces.iter().map(|t| t[row].to_string()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

impl MetricsSink for DeficitTracker {
    fn record(&mut self, record: &IntervalRecord) {
        // 首次记录时按实际队列数扩展
        if self.traces.len() < record.deficits.len() {
            self.traces.resize(record.deficits.len(), Vec::new());
        }
        for (trace, &deficit) in self.traces.iter_mut().zip(&record.deficits) {
            trace.push(deficit);
        }
    }
}

// ==========================================
// ServiceCounter - 服务量累计
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ServiceCounter {
    pub assigned: Vec<u64>,  // 每队列累计分配槽位
    pub forfeited: u64,      // 累计作废槽位
    pub capacity_total: u64, // 累计容量
}

impl MetricsSink for ServiceCounter {
    fn record(&mut self, record: &IntervalRecord) {
        if self.assigned.len() < record.assigned.len() {
            self.assigned.resize(record.assigned.len(), 0);
        }
        for (total, &n) in self.assigned.iter_mut().zip(&record.assigned) {
            *total += n;
        }
        self.forfeited += record.forfeited;
        self.capacity_total += record.capacity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(interval: u64, deficits: Vec<i64>, assigned: Vec<u64>) -> IntervalRecord {
        let n = deficits.len();
        IntervalRecord {
            interval,
            capacity: 10,
            available: 10,
            quotas: vec![0; n],
            deficits_before_assign: deficits.clone(),
            deficits,
            assigned,
            backlog: vec![0; n],
            active: vec![0; n],
            forfeited: 1,
        }
    }

    #[test]
    fn test_tracker_appends_per_queue() {
        let mut tracker = DeficitTracker::new(2);
        tracker.record(&record(0, vec![3, -1], vec![1, 1]));
        tracker.record(&record(1, vec![2, 0], vec![1, 1]));

        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.trace(0), Some(&[3, 2][..]));
        assert_eq!(tracker.trace(1), Some(&[-1, 0][..]));
        assert_eq!(tracker.trace(2), None);
    }

    #[test]
    fn test_tracker_grows_from_default() {
        let mut tracker = DeficitTracker::default();
        assert!(tracker.is_empty());
        tracker.record(&record(0, vec![1, 2, 3], vec![0, 0, 0]));
        assert_eq!(tracker.traces().len(), 3);
    }

    #[test]
    fn test_csv_layout() {
        let mut tracker = DeficitTracker::new(2);
        tracker.record(&record(0, vec![3, -1], vec![0, 0]));
        tracker.record(&record(1, vec![2, 0], vec![0, 0]));

        let mut buf = Vec::new();
        tracker.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text, "interval,queue_0,queue_1\n0,3,-1\n1,2,0\n");
    }

    #[test]
    fn test_service_counter_accumulates() {
        let mut counter = ServiceCounter::default();
        counter.record(&record(0, vec![0, 0], vec![2, 3]));
        counter.record(&record(1, vec![0, 0], vec![1, 0]));

        assert_eq!(counter.assigned, vec![3, 3]);
        assert_eq!(counter.forfeited, 2);
        assert_eq!(counter.capacity_total, 20);
    }
}

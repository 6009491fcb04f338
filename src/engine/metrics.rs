// ==========================================
// 加权槽位调度系统 - 引擎层指标出口
// ==========================================
// 职责: 定义周期记录与指标接收 trait，实现依赖倒置
// 说明: Engine 层定义 trait，report 层实现欠额轨迹等接收器
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// IntervalRecord - 单周期记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRecord {
    /// 周期序号
    pub interval: u64,
    /// 本周期系统容量
    pub capacity: u64,
    /// 扣除已占用后的可分配槽位
    pub available: u64,
    /// 配额 (should-be)
    pub quotas: Vec<u64>,
    /// 欠额更新后、分配前
    pub deficits_before_assign: Vec<i64>,
    /// 分配后欠额（对外观测值）
    pub deficits: Vec<i64>,
    /// 本周期新分配槽位
    pub assigned: Vec<u64>,
    /// 分配后 backlog
    pub backlog: Vec<u64>,
    /// 分配后 active
    pub active: Vec<u64>,
    /// 作废槽位
    pub forfeited: u64,
}

impl IntervalRecord {
    pub fn assigned_total(&self) -> u64 {
        self.assigned.iter().sum()
    }
}

// ==========================================
// 指标接收 Trait
// ==========================================

/// 周期指标接收者
///
/// 每个周期结束时按顺序调用一次，只追加不回写
pub trait MetricsSink {
    fn record(&mut self, record: &IntervalRecord);
}

/// 空操作接收者
///
/// 用于只关心最终状态的场景（如单元测试）
#[derive(Debug, Clone, Default)]
pub struct NoOpMetricsSink;

impl MetricsSink for NoOpMetricsSink {
    fn record(&mut self, record: &IntervalRecord) {
        tracing::trace!(interval = record.interval, "NoOpMetricsSink: 跳过周期记录");
    }
}

/// 收集全部周期记录
#[derive(Debug, Clone, Default)]
pub struct RecordCollector {
    pub records: Vec<IntervalRecord>,
}

impl MetricsSink for RecordCollector {
    fn record(&mut self, record: &IntervalRecord) {
        self.records.push(record.clone());
    }
}

/// 同时转发给两个接收者
pub struct TeeSink<'a, A: MetricsSink + ?Sized, B: MetricsSink + ?Sized> {
    pub first: &'a mut A,
    pub second: &'a mut B,
}

impl<A: MetricsSink + ?Sized, B: MetricsSink + ?Sized> MetricsSink for TeeSink<'_, A, B> {
    fn record(&mut self, record: &IntervalRecord) {
        self.first.record(record);
        self.second.record(record);
    }
}

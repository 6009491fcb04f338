// ==========================================
// 加权槽位调度系统 - 报告层
// ==========================================
// 职责: 实现引擎层定义的 MetricsSink，汇总并导出运行结果
// ==========================================

pub mod deficit_tracker;
pub mod summary;

pub use deficit_tracker::{write_deficit_table, DeficitTracker, ServiceCounter};
pub use summary::{QueueSummary, SimulationReport};

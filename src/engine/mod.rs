// ==========================================
// 加权槽位调度系统 - 引擎层
// ==========================================
// 职责: 配额分配、欠额补偿调度、周期循环
// 红线: 引擎为纯内存计算，状态显式传入传出，不持有跨周期可变状态
// ==========================================

pub mod apportion;
pub mod deficit;
pub mod error;
pub mod interval_loop;
pub mod metrics;
pub mod orchestrator;
pub mod priority;
pub mod workload;

// 重导出核心引擎
pub use apportion::{ApportionResult, ApportionmentEngine};
pub use deficit::{AssignmentOutcome, DeficitScheduler, ScheduleOutcome};
pub use error::{SchedulerError, SchedulerResult};
pub use interval_loop::IntervalLoop;
pub use metrics::{IntervalRecord, MetricsSink, NoOpMetricsSink, RecordCollector, TeeSink};
pub use orchestrator::{run_batch, SimulationOrchestrator};
pub use priority::{DeficitPriority, QuotaPriority};
pub use workload::{
    generate_weights, IntervalEvents, ScriptedWorkload, SeededWorkload, WorkloadSource,
};

// ==========================================
// 加权槽位调度系统 - 核心库
// ==========================================
// 配额: Huntington-Hill 比例分配（带准入策略与需求上限）
// 调度: 欠额补偿，已占用槽位不抢占
// 模拟: 固定周期数的顺序循环，随机源显式播种
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 队列/容量/策略
pub mod domain;

// 配置层 - 模拟配置与加载
pub mod config;

// 引擎层 - 配额分配与调度
pub mod engine;

// 报告层 - 欠额轨迹与导出
pub mod report;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{CapacityWindow, EligibilityPolicy, QueueState, SimulationState, SlotPool};

// 配置
pub use config::{ConfigError, ConfigManager, SimulationConfig};

// 引擎
pub use engine::{
    run_batch, ApportionmentEngine, DeficitScheduler, IntervalLoop, SchedulerError,
    SchedulerResult, SimulationOrchestrator,
};

// 报告
pub use report::{DeficitTracker, QueueSummary, SimulationReport};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "加权槽位调度系统";

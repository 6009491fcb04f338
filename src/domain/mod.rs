// ==========================================
// 加权槽位调度系统 - 领域模型层
// ==========================================
// 职责: 定义队列、容量、策略等领域实体
// 红线: 不含引擎逻辑,不含 I/O
// ==========================================

pub mod capacity;
pub mod queue;
pub mod types;

// 重导出核心类型
pub use capacity::{CapacityWindow, SlotConstraint, SlotPool};
pub use queue::{QueueState, SimulationState};
pub use types::EligibilityPolicy;

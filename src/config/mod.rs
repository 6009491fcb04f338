// ==========================================
// 加权槽位调度系统 - 配置层
// ==========================================
// 职责: 模拟配置定义、加载、覆写与启动前校验
// ==========================================

pub mod config_manager;
pub mod error;
pub mod simulation_config;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use error::ConfigError;
pub use simulation_config::{validate_weights, SimulationConfig, WEIGHT_SUM_TOLERANCE};

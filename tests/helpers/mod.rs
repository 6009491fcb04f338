// ==========================================
// 集成测试共享辅助
// ==========================================

#![allow(dead_code)]

pub mod queue_builder;

pub use queue_builder::QueueBuilder;

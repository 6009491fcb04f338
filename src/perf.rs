// ==========================================
// 加权槽位调度系统 - 性能统计
// ==========================================
// 开关:
// - Debug 默认开启；Release 默认关闭
// - `FAIR_SLOT_PERF=1` 强制开启，`FAIR_SLOT_PERF=0` 强制关闭
// ==========================================

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

pub const PERF_ENV: &str = "FAIR_SLOT_PERF";

static PERF_ENABLED: AtomicBool = AtomicBool::new(cfg!(debug_assertions));

thread_local! {
    static PERF_DEPTH: Cell<u32> = Cell::new(0);
    static INTERVAL_COUNT: Cell<u64> = Cell::new(0);
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 按环境变量设置开关（未设置时保持构建默认值）
pub fn configure_from_env() {
    if let Ok(v) = std::env::var(PERF_ENV) {
        set_enabled(is_true(&v));
    }
}

pub fn set_enabled(enabled: bool) {
    PERF_ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    PERF_ENABLED.load(Ordering::Relaxed)
}

/// 周期计数 +1（仅在 PerfGuard 作用域内计数）
pub fn record_interval() {
    let active = PERF_DEPTH.with(|d| d.get() > 0);
    if active {
        INTERVAL_COUNT.with(|c| c.set(c.get().saturating_add(1)));
    }
}

/// 性能统计 Guard：记录 elapsed_ms + 周期数
///
/// 使用方式：
/// ```ignore
/// let _perf = fair_slot_scheduler::perf::PerfGuard::new("simulation_run");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    interval_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        PERF_DEPTH.with(|d| d.set(d.get().saturating_add(1)));
        let interval_start = INTERVAL_COUNT.with(|c| c.get());
        Self {
            op,
            start: Instant::now(),
            interval_start,
        }
    }

    /// 本 Guard 创建以来执行的周期数
    pub fn intervals(&self) -> u64 {
        INTERVAL_COUNT
            .with(|c| c.get())
            .saturating_sub(self.interval_start)
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        if is_enabled() {
            let elapsed_ms = self.start.elapsed().as_millis() as u64;
            tracing::info!(
                target: "perf",
                op = self.op,
                elapsed_ms,
                interval_count = self.intervals(),
                "done"
            );
        }

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

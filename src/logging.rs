// ==========================================
// 加权槽位调度系统 - 日志初始化
// ==========================================
// 级别约定: 运行起止 info / 单周期汇总 debug / 单槽位明细 trace
// 性能统计走 target "perf"（见 perf.rs）
// 输出: stderr，stdout 只留给 CLI 汇总表
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 测试默认过滤: 本 crate 打到周期级，不展开单槽位明细
const TEST_FILTER: &str = "fair_slot_scheduler=debug,perf=info";

/// 安装全局订阅者（进程内只调用一次）
///
/// `RUST_LOG` 未设置或无法解析时退回 `info`。
/// 查看单个周期: `RUST_LOG=fair_slot_scheduler::engine::interval_loop=debug`
///
/// ```no_run
/// fair_slot_scheduler::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

/// 测试用订阅者，输出交给 libtest 捕获
///
/// 多个测试重复调用时只有第一次生效，其余静默忽略。
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new(TEST_FILTER))
        .with_test_writer()
        .try_init();
}

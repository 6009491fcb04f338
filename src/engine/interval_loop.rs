// ==========================================
// 加权槽位调度系统 - 周期循环
// ==========================================
// 流程: 到达/完成 → 配额分配 → 欠额更新与分配 → 指标记录
// 红线: 周期之间严格顺序执行，状态显式传入传出
// ==========================================

use crate::config::{validate_weights, SimulationConfig};
use crate::domain::queue::SimulationState;
use crate::domain::types::EligibilityPolicy;
use crate::engine::apportion::ApportionmentEngine;
use crate::engine::deficit::DeficitScheduler;
use crate::engine::error::{SchedulerError, SchedulerResult};
use crate::engine::metrics::{IntervalRecord, MetricsSink};
use crate::engine::workload::{IntervalEvents, WorkloadSource};
use crate::perf;
use tracing::{debug, info, warn};

// ==========================================
// IntervalLoop - 周期循环
// ==========================================
pub struct IntervalLoop {
    intervals: u64,
    apportion: ApportionmentEngine,
    scheduler: DeficitScheduler,
}

impl IntervalLoop {
    /// 创建周期循环
    ///
    /// # 参数
    /// - policy: 准入策略
    /// - intervals: 周期数
    pub fn new(policy: EligibilityPolicy, intervals: u64) -> Self {
        Self {
            intervals,
            apportion: ApportionmentEngine::new(policy),
            scheduler: DeficitScheduler::new(),
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.policy, config.intervals)
    }

    pub fn intervals(&self) -> u64 {
        self.intervals
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行单个周期
    ///
    /// # 参数
    /// - state: 周期开始时的运行状态（按值传入）
    /// - events: 本周期外部事件
    ///
    /// # 返回
    /// (周期结束后的运行状态, 周期记录)
    pub fn step(
        &self,
        state: SimulationState,
        events: &IntervalEvents,
    ) -> SchedulerResult<(SimulationState, IntervalRecord)> {
        let interval = state.interval;
        let queue_count = state.queue_count();

        if events.arrivals.len() != queue_count || events.completions.len() != queue_count {
            return Err(SchedulerError::InvalidEvents {
                interval,
                message: format!(
                    "事件长度与队列数不一致: queues={}, arrivals={}, completions={}",
                    queue_count,
                    events.arrivals.len(),
                    events.completions.len()
                ),
            });
        }

        // ==========================================
        // 阶段1: 到达与完成
        // ==========================================
        let mut queues = state.queues;
        for ((queue, &arrived), &completed) in queues
            .iter_mut()
            .zip(&events.arrivals)
            .zip(&events.completions)
        {
            queue.backlog += arrived;

            if completed > queue.active {
                warn!(
                    interval,
                    queue_id = queue.queue_id,
                    completed,
                    active = queue.active,
                    "完成数超过占用数，按占用数截断"
                );
            }
            queue.active -= completed.min(queue.active);
        }

        // ==========================================
        // 阶段2: 配额分配
        // ==========================================
        let apportioned = self.apportion.apportion(events.capacity, &queues);

        // ==========================================
        // 阶段3: 欠额更新与槽位分配
        // ==========================================
        let outcome = self
            .scheduler
            .schedule(&queues, &apportioned.quotas, events.capacity)?;
        let assignment = outcome.assignment;

        // ==========================================
        // 阶段4: 指标记录
        // ==========================================
        let record = IntervalRecord {
            interval,
            capacity: events.capacity,
            available: assignment.available,
            quotas: apportioned.quotas,
            deficits_before_assign: outcome.deficits_before_assign,
            deficits: assignment.queues.iter().map(|q| q.deficit).collect(),
            assigned: assignment.assigned,
            backlog: assignment.queues.iter().map(|q| q.backlog).collect(),
            active: assignment.queues.iter().map(|q| q.active).collect(),
            forfeited: assignment.forfeited,
        };

        debug!(
            interval,
            capacity = events.capacity,
            available = record.available,
            assigned = assignment.assigned_total,
            forfeited = record.forfeited,
            deficits = ?record.deficits,
            "周期完成"
        );

        let next = SimulationState {
            interval: interval + 1,
            queues: assignment.queues,
        };

        Ok((next, record))
    }

    /// 执行完整循环（固定周期数，无提前终止）
    ///
    /// # 参数
    /// - initial: 初始运行状态
    /// - source: 外部事件来源
    /// - sink: 指标接收者
    ///
    /// # 返回
    /// 最后一个周期结束后的运行状态；初始权重非法时不执行任何周期
    pub fn run<W, M>(
        &self,
        initial: SimulationState,
        source: &mut W,
        sink: &mut M,
    ) -> SchedulerResult<SimulationState>
    where
        W: WorkloadSource + ?Sized,
        M: MetricsSink + ?Sized,
    {
        validate_weights(&initial.weights())?;

        info!(
            intervals = self.intervals,
            queue_count = initial.queue_count(),
            policy = %self.apportion.policy(),
            "开始执行周期循环"
        );

        let mut state = initial;
        for _ in 0..self.intervals {
            let events = source.next_events(state.interval, &state.queues);
            let (next, record) = self.step(state, &events)?;
            sink.record(&record);
            perf::record_interval();
            state = next;
        }

        info!(
            final_interval = state.interval,
            total_backlog = state.total_backlog(),
            total_active = state.total_active(),
            "周期循环完成"
        );

        Ok(state)
    }
}

// ==========================================
// 加权槽位调度系统 - 模拟编排器
// ==========================================
// 用途: 由配置组装负载源、周期循环与指标接收者，产出运行报告
// 流程: 校验配置 → 权重 → 周期循环 → 汇总报告
// ==========================================

use crate::config::{validate_weights, ConfigError, SimulationConfig};
use crate::domain::queue::SimulationState;
use crate::engine::error::SchedulerResult;
use crate::engine::interval_loop::IntervalLoop;
use crate::engine::metrics::TeeSink;
use crate::engine::workload::{SeededWorkload, WorkloadSource};
use crate::perf::PerfGuard;
use crate::report::{DeficitTracker, ServiceCounter, SimulationReport};
use chrono::Utc;
use tracing::{info, instrument};

// ==========================================
// SimulationOrchestrator - 模拟编排器
// ==========================================
pub struct SimulationOrchestrator {
    config: SimulationConfig,
}

impl SimulationOrchestrator {
    /// 创建编排器（配置在此处校验，失败即返回）
    pub fn new(config: SimulationConfig) -> SchedulerResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    // ==========================================
    // 主流程
    // ==========================================

    /// 以播种随机负载执行一次完整模拟
    ///
    /// 权重: 配置中显式给出则直接使用，否则由同一随机流生成
    #[instrument(skip(self), fields(seed = self.config.seed, policy = %self.config.policy))]
    pub fn run(&self) -> SchedulerResult<SimulationReport> {
        let mut source = SeededWorkload::from_config(&self.config);
        let weights = match &self.config.weights {
            Some(weights) => weights.clone(),
            None => source.generate_weights(
                self.config.queue_count,
                self.config.min_weight,
                self.config.max_weight,
            ),
        };

        self.run_with(weights, &mut source)
    }

    /// 以给定权重和负载源执行一次完整模拟
    ///
    /// # 参数
    /// - weights: 队列权重（长度即队列数）
    /// - source: 外部事件来源
    pub fn run_with<W>(&self, weights: Vec<f64>, source: &mut W) -> SchedulerResult<SimulationReport>
    where
        W: WorkloadSource + ?Sized,
    {
        // 外部传入的权重同样在任何周期执行前校验
        if weights.len() != self.config.queue_count {
            return Err(ConfigError::WeightCountMismatch {
                weights: weights.len(),
                queues: self.config.queue_count,
            }
            .into());
        }
        validate_weights(&weights)?;

        let started_at = Utc::now();
        let _perf = PerfGuard::new("simulation_run");

        let initial = SimulationState::initial(&weights);
        let looper = IntervalLoop::from_config(&self.config);

        let mut tracker = DeficitTracker::new(weights.len());
        let mut counter = ServiceCounter::default();
        let final_state = {
            let mut sink = TeeSink {
                first: &mut tracker,
                second: &mut counter,
            };
            looper.run(initial, source, &mut sink)?
        };

        let report =
            SimulationReport::build(&self.config, weights, started_at, &final_state, tracker, counter);

        info!(
            run_id = %report.run_id,
            total_assigned = report.total_assigned,
            total_forfeited = report.total_forfeited,
            "模拟完成"
        );

        Ok(report)
    }
}

// ==========================================
// 批量模拟
// ==========================================

/// 连续执行 runs 次独立模拟，第 i 次使用种子 seed + i
pub fn run_batch(config: &SimulationConfig, runs: u32) -> SchedulerResult<Vec<SimulationReport>> {
    config.validate()?;
    info!(runs, base_seed = config.seed, "开始批量模拟");

    (0..runs)
        .map(|i| {
            let run_config = SimulationConfig {
                seed: config.seed.wrapping_add(u64::from(i)),
                ..config.clone()
            };
            SimulationOrchestrator::new(run_config)?.run()
        })
        .collect()
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::SchedulerError;
    use crate::engine::workload::{IntervalEvents, ScriptedWorkload};

    fn small_config(seed: u64) -> SimulationConfig {
        SimulationConfig {
            queue_count: 4,
            intervals: 50,
            seed,
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig {
            queue_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            SimulationOrchestrator::new(config),
            Err(SchedulerError::Config(ConfigError::NoQueues))
        ));
    }

    #[test]
    fn test_run_is_deterministic_per_seed() {
        let a = SimulationOrchestrator::new(small_config(5)).unwrap().run().unwrap();
        let b = SimulationOrchestrator::new(small_config(5)).unwrap().run().unwrap();

        assert_eq!(a.weights, b.weights);
        assert_eq!(a.deficit_traces, b.deficit_traces);
        assert_eq!(a.queues, b.queues);
        assert_ne!(a.run_id, b.run_id);
    }

    #[test]
    fn test_run_shape() {
        let report = SimulationOrchestrator::new(small_config(1)).unwrap().run().unwrap();

        assert_eq!(report.intervals, 50);
        assert_eq!(report.weights.len(), 4);
        assert_eq!(report.queues.len(), 4);
        assert!(report.deficit_traces.iter().all(|t| t.len() == 50));
    }

    #[test]
    fn test_explicit_weights_used() {
        let config = SimulationConfig {
            queue_count: 2,
            intervals: 10,
            weights: Some(vec![0.25, 0.75]),
            ..Default::default()
        };
        let report = SimulationOrchestrator::new(config).unwrap().run().unwrap();
        assert_eq!(report.weights, vec![0.25, 0.75]);
    }

    #[test]
    fn test_run_with_scripted_source() {
        let config = SimulationConfig {
            queue_count: 2,
            intervals: 1,
            policy: crate::domain::types::EligibilityPolicy::All,
            ..Default::default()
        };
        let mut source = ScriptedWorkload::new(vec![IntervalEvents {
            capacity: 10,
            arrivals: vec![5, 5],
            completions: vec![0, 0],
        }]);

        let report = SimulationOrchestrator::new(config)
            .unwrap()
            .run_with(vec![0.6, 0.4], &mut source)
            .unwrap();

        assert_eq!(report.deficit_traces, vec![vec![0], vec![0]]);
        assert_eq!(report.total_assigned, 10);
        assert_eq!(report.queues[0].final_active, 5);
    }

    #[test]
    fn test_batch_uses_consecutive_seeds() {
        let reports = run_batch(&small_config(10), 3).unwrap();

        assert_eq!(
            reports.iter().map(|r| r.seed).collect::<Vec<_>>(),
            vec![10, 11, 12]
        );
        let single = SimulationOrchestrator::new(small_config(11)).unwrap().run().unwrap();
        assert_eq!(reports[1].deficit_traces, single.deficit_traces);
    }
}

// ==========================================
// 加权槽位调度系统 - 运行报告
// ==========================================
// 职责: 汇总单次运行的元数据、每队列统计与欠额轨迹
// 导出: JSON (serde_json) / CSV 欠额表 (csv)
// ==========================================

use crate::config::SimulationConfig;
use crate::domain::queue::SimulationState;
use crate::domain::types::EligibilityPolicy;
use crate::engine::error::SchedulerResult;
use crate::report::deficit_tracker::{write_deficit_table, DeficitTracker, ServiceCounter};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use uuid::Uuid;

// ==========================================
// QueueSummary - 单队列统计
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueSummary {
    pub queue_id: usize,
    pub weight: f64,
    pub final_deficit: i64,
    pub min_deficit: i64,
    pub max_deficit: i64,
    pub mean_deficit: f64,
    pub total_assigned: u64,
    pub final_backlog: u64,
    pub final_active: u64,
}

impl QueueSummary {
    /// 由欠额序列与最终状态计算统计
    ///
    /// 空序列时各欠额统计均为 0
    pub fn from_trace(
        queue_id: usize,
        weight: f64,
        trace: &[i64],
        total_assigned: u64,
        final_backlog: u64,
        final_active: u64,
    ) -> Self {
        let (min_deficit, max_deficit, mean_deficit) = if trace.is_empty() {
            (0, 0, 0.0)
        } else {
            let min = trace.iter().copied().min().unwrap_or(0);
            let max = trace.iter().copied().max().unwrap_or(0);
            let mean = trace.iter().map(|&d| d as f64).sum::<f64>() / trace.len() as f64;
            (min, max, mean)
        };

        Self {
            queue_id,
            weight,
            final_deficit: trace.last().copied().unwrap_or(0),
            min_deficit,
            max_deficit,
            mean_deficit,
            total_assigned,
            final_backlog,
            final_active,
        }
    }
}

// ==========================================
// SimulationReport - 运行报告
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub run_id: String,
    pub config: SimulationConfig, // 完整配置快照，按此可复现本次运行
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub seed: u64,
    pub policy: EligibilityPolicy,
    pub intervals: u64,
    pub weights: Vec<f64>,
    pub queues: Vec<QueueSummary>,
    pub total_capacity: u64,
    pub total_assigned: u64,
    pub total_forfeited: u64,
    pub deficit_traces: Vec<Vec<i64>>,
}

impl SimulationReport {
    /// 由运行结果组装报告
    ///
    /// # 参数
    /// - config: 本次运行配置（整体快照写入报告）
    /// - weights: 实际使用的队列权重
    /// - started_at: 运行开始时间
    /// - final_state: 最后一个周期结束后的状态
    /// - tracker: 欠额轨迹
    /// - counter: 服务量累计
    pub fn build(
        config: &SimulationConfig,
        weights: Vec<f64>,
        started_at: DateTime<Utc>,
        final_state: &SimulationState,
        tracker: DeficitTracker,
        counter: ServiceCounter,
    ) -> Self {
        let traces = tracker.into_traces();

        let queues = final_state
            .queues
            .iter()
            .enumerate()
            .map(|(i, q)| {
                QueueSummary::from_trace(
                    q.queue_id,
                    q.weight,
                    traces.get(i).map(|t| t.as_slice()).unwrap_or(&[]),
                    counter.assigned.get(i).copied().unwrap_or(0),
                    q.backlog,
                    q.active,
                )
            })
            .collect();

        Self {
            run_id: Uuid::new_v4().to_string(),
            config: config.clone(),
            started_at,
            finished_at: Utc::now(),
            seed: config.seed,
            policy: config.policy,
            intervals: final_state.interval,
            weights,
            queues,
            total_capacity: counter.capacity_total,
            total_assigned: counter.assigned.iter().sum(),
            total_forfeited: counter.forfeited,
            deficit_traces: traces,
        }
    }

    // ==========================================
    // 导出
    // ==========================================

    pub fn write_json<W: Write>(&self, writer: W) -> SchedulerResult<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn write_json_file(&self, path: &Path) -> SchedulerResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_json(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// CSV 欠额表: 每行一个周期，每列一个队列
    pub fn write_csv<W: Write>(&self, writer: W) -> SchedulerResult<()> {
        write_deficit_table(&self.deficit_traces, writer)
    }

    pub fn write_csv_file(&self, path: &Path) -> SchedulerResult<()> {
        self.write_csv(File::create(path)?)
    }

    /// 文本汇总表（CLI 输出）
    pub fn summary_table(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "run={} seed={} policy={} intervals={}\n",
            self.run_id, self.seed, self.policy, self.intervals
        ));
        out.push_str(&format!(
            "{:>5} {:>8} {:>8} {:>8} {:>8} {:>10} {:>10} {:>8} {:>8}\n",
            "queue", "weight", "final", "min", "max", "mean", "assigned", "backlog", "active"
        ));
        for q in &self.queues {
            out.push_str(&format!(
                "{:>5} {:>8.4} {:>8} {:>8} {:>8} {:>10.3} {:>10} {:>8} {:>8}\n",
                q.queue_id,
                q.weight,
                q.final_deficit,
                q.min_deficit,
                q.max_deficit,
                q.mean_deficit,
                q.total_assigned,
                q.final_backlog,
                q.final_active
            ));
        }
        out.push_str(&format!(
            "capacity={} assigned={} forfeited={}\n",
            self.total_capacity, self.total_assigned, self.total_forfeited
        ));
        out
    }
}

// ==========================================
// 加权槽位调度系统 - 外部负载源
// ==========================================
// 职责: 每周期的容量、到达、完成事件；初始化时的队列权重
// 红线: 随机源必须显式播种，同一种子同一结果
// ==========================================

use crate::config::SimulationConfig;
use crate::domain::capacity::CapacityWindow;
use crate::domain::queue::QueueState;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

// ==========================================
// IntervalEvents - 单周期外部事件
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntervalEvents {
    pub capacity: u64,         // 本周期系统容量
    pub arrivals: Vec<u64>,    // 每队列新到达任务数（加到 backlog）
    pub completions: Vec<u64>, // 每队列完成数（从 active 扣除）
}

impl IntervalEvents {
    /// 无到达、无完成的事件
    pub fn idle(capacity: u64, queue_count: usize) -> Self {
        Self {
            capacity,
            arrivals: vec![0; queue_count],
            completions: vec![0; queue_count],
        }
    }
}

// ==========================================
// Trait: WorkloadSource
// ==========================================
// 用途: IntervalLoop 的外部事件来源（随机生成/脚本回放）
pub trait WorkloadSource {
    /// 生成第 interval 个周期的事件
    ///
    /// # 参数
    /// - `interval`: 周期序号
    /// - `queues`: 周期开始时的队列状态（完成数不应超过 active）
    fn next_events(&mut self, interval: u64, queues: &[QueueState]) -> IntervalEvents;
}

// ==========================================
// SeededWorkload - 播种随机负载
// ==========================================
pub struct SeededWorkload {
    rng: ChaCha8Rng,
    window: CapacityWindow,
    min_arrivals: u64,
    max_arrivals: u64,
    completion_divisor: u64,
}

impl SeededWorkload {
    /// 按配置创建（种子取 config.seed）
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            window: config.capacity_window(),
            min_arrivals: config.min_arrivals,
            max_arrivals: config.max_arrivals,
            completion_divisor: config.completion_divisor.max(1),
        }
    }

    /// 生成归一化权重（与事件共用同一随机流，先于第一个周期调用）
    pub fn generate_weights(&mut self, queue_count: usize, min_weight: u32, max_weight: u32) -> Vec<f64> {
        generate_weights(&mut self.rng, queue_count, min_weight, max_weight)
    }

    /// 从容量区间中均匀取一个量化值
    fn draw_capacity(&mut self) -> u64 {
        let k = self.rng.gen_range(0..self.window.levels());
        self.window.level(k)
    }
}

impl WorkloadSource for SeededWorkload {
    fn next_events(&mut self, _interval: u64, queues: &[QueueState]) -> IntervalEvents {
        let mut arrivals = Vec::with_capacity(queues.len());
        let mut completions = Vec::with_capacity(queues.len());

        for queue in queues {
            arrivals.push(self.rng.gen_range(self.min_arrivals..=self.max_arrivals));
            completions.push(self.rng.gen_range(0..=queue.active / self.completion_divisor));
        }

        IntervalEvents {
            capacity: self.draw_capacity(),
            arrivals,
            completions,
        }
    }
}

// ==========================================
// ScriptedWorkload - 事件回放
// ==========================================
// 脚本耗尽后返回容量为 0 的空事件
pub struct ScriptedWorkload {
    events: Vec<IntervalEvents>,
}

impl ScriptedWorkload {
    pub fn new(events: Vec<IntervalEvents>) -> Self {
        Self { events }
    }
}

impl WorkloadSource for ScriptedWorkload {
    fn next_events(&mut self, interval: u64, queues: &[QueueState]) -> IntervalEvents {
        usize::try_from(interval)
            .ok()
            .and_then(|i| self.events.get(i))
            .cloned()
            .unwrap_or_else(|| IntervalEvents::idle(0, queues.len()))
    }
}

// ==========================================
// 权重生成
// ==========================================

/// 每队列取 [min_weight, max_weight] 内的整数，再归一化为总和 1
pub fn generate_weights<R: Rng>(
    rng: &mut R,
    queue_count: usize,
    min_weight: u32,
    max_weight: u32,
) -> Vec<f64> {
    let raw: Vec<u32> = (0..queue_count)
        .map(|_| rng.gen_range(min_weight..=max_weight))
        .collect();
    let total: u64 = raw.iter().map(|&w| w as u64).sum();

    if total == 0 {
        return vec![1.0 / queue_count as f64; queue_count];
    }

    raw.iter().map(|&w| w as f64 / total as f64).collect()
}

// ==========================================
// 加权槽位调度系统 - 槽位容量领域模型
// ==========================================
// 红线: 已占用槽位不可抢占，只能再分配剩余部分
// 用途: 容量区间（外部容量源取值范围）与单周期槽位池
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// CapacityWindow - 容量取值区间
// ==========================================
// 取值: min, min+step, ..., 不超过 max（闭区间，按 step 量化）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityWindow {
    pub min: u64,
    pub max: u64,
    pub step: u64,
}

impl CapacityWindow {
    pub fn new(min: u64, max: u64, step: u64) -> Self {
        Self { min, max, step }
    }

    /// 可取值的个数（step 为 0 或 min > max 时视为只有 min 一个取值）
    pub fn levels(&self) -> u64 {
        if self.step == 0 || self.min > self.max {
            return 1;
        }
        (self.max - self.min) / self.step + 1
    }

    /// 第 k 个取值（k 超出范围时取最后一个）
    pub fn level(&self, k: u64) -> u64 {
        let k = k.min(self.levels() - 1);
        self.min + k * self.step
    }

    /// 判断容量是否为区间内的合法取值
    pub fn contains(&self, capacity: u64) -> bool {
        if capacity < self.min || capacity > self.max {
            return false;
        }
        self.step == 0 || (capacity - self.min) % self.step == 0
    }
}

// ==========================================
// Trait: SlotConstraint
// ==========================================
// 用途: DeficitScheduler 计算可分配槽位
pub trait SlotConstraint {
    /// 本周期可再分配的槽位数
    fn available_slots(&self) -> u64;

    /// 判断当前占用是否已超过容量（容量下调导致）
    fn is_overcommitted(&self) -> bool;
}

// ==========================================
// SlotPool - 单周期槽位池
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPool {
    pub capacity: u64,     // 本周期系统总槽位
    pub active_total: u64, // 已占用槽位（不可抢占）
}

impl SlotConstraint for SlotPool {
    /// 剩余可分配槽位
    ///
    /// # 返回
    /// capacity - active_total，容量低于占用时为 0
    fn available_slots(&self) -> u64 {
        self.capacity.saturating_sub(self.active_total)
    }

    fn is_overcommitted(&self) -> bool {
        self.active_total > self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_levels() {
        let window = CapacityWindow::new(200, 300, 10);
        assert_eq!(window.levels(), 11);
        assert_eq!(window.level(0), 200);
        assert_eq!(window.level(10), 300);
        assert_eq!(window.level(99), 300);

        // max 不在步长网格上时向下截断
        let window = CapacityWindow::new(0, 25, 10);
        assert_eq!(window.levels(), 3);
        assert_eq!(window.level(2), 20);
    }

    #[test]
    fn test_window_contains() {
        let window = CapacityWindow::new(200, 300, 10);
        assert!(window.contains(200));
        assert!(window.contains(250));
        assert!(window.contains(300));
        assert!(!window.contains(255));
        assert!(!window.contains(190));
        assert!(!window.contains(310));
    }

    #[test]
    fn test_available_slots() {
        let pool = SlotPool {
            capacity: 10,
            active_total: 4,
        };
        assert_eq!(pool.available_slots(), 6);
        assert!(!pool.is_overcommitted());

        // 容量下调到占用以下：不抢占，可分配为 0
        let pool = SlotPool {
            capacity: 3,
            active_total: 4,
        };
        assert_eq!(pool.available_slots(), 0);
        assert!(pool.is_overcommitted());
    }
}

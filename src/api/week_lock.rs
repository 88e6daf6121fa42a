// ==========================================
// 会众聚会安排系统 - 周级生成互斥
// ==========================================
// 职责: 同一周同一时刻最多一个生成流程
// 红线: 获取失败立即返回（不排队等待）；Guard drop 时释放
// ==========================================

use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct WeekLockRegistry {
    active: Arc<Mutex<HashSet<NaiveDate>>>,
}

impl WeekLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 尝试占用某周
    ///
    /// # 返回
    /// - Some(WeekLockGuard): 占用成功
    /// - None: 该周已有进行中的生成
    pub fn try_acquire(&self, week: NaiveDate) -> Option<WeekLockGuard> {
        // 锁中毒时沿用内部数据
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if !active.insert(week) {
            debug!(week = %week, "周安排生成互斥: 已被占用");
            return None;
        }

        Some(WeekLockGuard {
            week,
            active: Arc::clone(&self.active),
        })
    }

    pub fn is_locked(&self, week: NaiveDate) -> bool {
        self.active
            .lock()
            .map(|active| active.contains(&week))
            .unwrap_or_else(|e| e.into_inner().contains(&week))
    }
}

/// 周占用凭证
#[derive(Debug)]
pub struct WeekLockGuard {
    week: NaiveDate,
    active: Arc<Mutex<HashSet<NaiveDate>>>,
}

impl WeekLockGuard {
    pub fn week(&self) -> NaiveDate {
        self.week
    }
}

impl Drop for WeekLockGuard {
    fn drop(&mut self) {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        active.remove(&self.week);
        debug!(week = %self.week, "周安排生成互斥: 已释放");
    }
}

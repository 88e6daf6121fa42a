// ==========================================
// 会众聚会安排系统 - 公平轮换排序引擎
// ==========================================
// 职责: 按轮换公平性对合格候选人排序（最该轮到者在前）
// 输入: 候选人 + 节目类型 + 历史快照
// 输出: 严格全序的候选人列表
// ==========================================
// 红线: 排序必须是严格全序，保证同输入同输出（可复现）
// ==========================================

use crate::domain::history::{HistoryEntry, HistorySnapshot};
use crate::domain::student::Student;
use crate::domain::types::PartType;
use chrono::NaiveDate;
use std::cmp::Ordering;

// ==========================================
// FairnessBalancer - 公平轮换排序
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct FairnessBalancer;

impl FairnessBalancer {
    pub fn new() -> Self {
        Self
    }

    /// 排序候选人
    ///
    /// 排序键:
    /// 1) 该节目类型最近安排日期升序（从未安排视为 NaiveDate::MIN，排最前）
    /// 2) 该节目类型累计次数升序
    /// 3) 学员 id 字典序升序
    pub fn rank<'a>(
        &self,
        candidates: Vec<&'a Student>,
        part_type: PartType,
        history: &HistorySnapshot,
    ) -> Vec<&'a Student> {
        // 预取历史，避免 sort_by 中重复查表
        let mut keyed: Vec<(HistoryEntry, &'a Student)> = candidates
            .into_iter()
            .map(|s| (history.entry(&s.id, part_type), s))
            .collect();

        keyed.sort_by(|a, b| self.compare(a, b));
        keyed.into_iter().map(|(_, s)| s).collect()
    }

    /// 比较两名候选人
    ///
    /// # 返回
    /// Ordering::Less 表示 a 优先于 b
    fn compare(&self, a: &(HistoryEntry, &Student), b: &(HistoryEntry, &Student)) -> Ordering {
        let (entry_a, student_a) = a;
        let (entry_b, student_b) = b;

        // 1. 最近安排日期升序
        let last_a = entry_a.last_assigned.unwrap_or(NaiveDate::MIN);
        let last_b = entry_b.last_assigned.unwrap_or(NaiveDate::MIN);
        match last_a.cmp(&last_b) {
            Ordering::Equal => {}
            other => return other,
        }

        // 2. 累计次数升序
        match entry_a.count.cmp(&entry_b.count) {
            Ordering::Equal => {}
            other => return other,
        }

        // 3. id 字典序
        student_a.id.cmp(&student_b.id)
    }
}

/// 距上次同类型安排的天数（从未安排返回 None）
pub fn days_since_last(
    history: &HistorySnapshot,
    student_id: &str,
    part_type: PartType,
    reference: NaiveDate,
) -> Option<i64> {
    history
        .entry(student_id, part_type)
        .last_assigned
        .map(|d| (reference - d).num_days())
}

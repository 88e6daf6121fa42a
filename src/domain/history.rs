// ==========================================
// 会众聚会安排系统 - 安排历史快照
// ==========================================
// 职责: 按 (学员, 节目类型) 记录最近安排日期与累计次数
// 用途: 公平轮换排序的唯一输入
// ==========================================

use crate::domain::types::PartType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 单个 (学员, 节目类型) 的历史
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub last_assigned: Option<NaiveDate>,
    pub count: u32,
}

/// 存储/传输形式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub student_id: String,
    pub part_type: PartType,
    pub last_assigned: Option<NaiveDate>,
    pub count: u32,
}

// ==========================================
// HistorySnapshot - 历史快照
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct HistorySnapshot {
    entries: HashMap<(String, PartType), HistoryEntry>,
}

impl HistorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = HistoryRecord>) -> Self {
        let mut snapshot = Self::new();
        for r in records {
            snapshot.insert(
                &r.student_id,
                r.part_type,
                HistoryEntry {
                    last_assigned: r.last_assigned,
                    count: r.count,
                },
            );
        }
        snapshot
    }

    pub fn insert(&mut self, student_id: &str, part_type: PartType, entry: HistoryEntry) {
        self.entries.insert((student_id.to_string(), part_type), entry);
    }

    /// 查询历史；不存在时返回空记录（从未安排）
    pub fn entry(&self, student_id: &str, part_type: PartType) -> HistoryEntry {
        self.entries
            .get(&(student_id.to_string(), part_type))
            .copied()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ==========================================
// 会众聚会安排系统 - 安排结果
// ==========================================
// 职责: 单个节目的安排 + 诊断信息 + 运行结果聚合
// 红线: 结果构造后不再修改，交由调用方持久化
// 红线: pending 必须给出原因（可解释性）
// ==========================================

use crate::domain::types::{
    AssignmentStatus, Gender, PendingReason, QualificationTier, RunStatus,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// Assignment - 节目安排
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub part_id: String,
    pub week: NaiveDate,
    /// 仅在无合格主讲人时为 None
    pub primary_student_id: Option<String>,
    pub assistant_student_id: Option<String>,
    pub status: AssignmentStatus,
    pub reason: Option<PendingReason>,
}

impl Assignment {
    pub fn assigned(
        part_id: &str,
        week: NaiveDate,
        primary: &str,
        assistant: Option<&str>,
    ) -> Self {
        Self {
            part_id: part_id.to_string(),
            week,
            primary_student_id: Some(primary.to_string()),
            assistant_student_id: assistant.map(str::to_string),
            status: AssignmentStatus::Assigned,
            reason: None,
        }
    }

    pub fn pending(
        part_id: &str,
        week: NaiveDate,
        primary: Option<&str>,
        reason: PendingReason,
    ) -> Self {
        Self {
            part_id: part_id.to_string(),
            week,
            primary_student_id: primary.map(str::to_string),
            assistant_student_id: None,
            status: AssignmentStatus::Pending,
            reason: Some(reason),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == AssignmentStatus::Pending
    }

    /// 本安排占用的所有学员 id（主讲人在前）
    pub fn student_ids(&self) -> impl Iterator<Item = &str> {
        self.primary_student_id
            .as_deref()
            .into_iter()
            .chain(self.assistant_student_id.as_deref())
    }
}

// ==========================================
// 诊断信息
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticKind {
    NoEligibleCandidate,
    NoFamilySafeAssistant,
    /// 入选学员近期已安排过同类型节目
    RecentAssignment { student_id: String, days_since: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartDiagnostic {
    pub part_id: String,
    pub order: u32,
    pub severity: DiagnosticSeverity,
    pub kind: DiagnosticKind,
    pub message: String,
}

// ==========================================
// RunStatistics - 运行统计
// ==========================================
// BTreeMap 保证序列化顺序稳定
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub total_parts: u32,
    pub assigned_count: u32,
    pub pending_count: u32,
    pub primaries_by_gender: BTreeMap<Gender, u32>,
    pub primaries_by_tier: BTreeMap<QualificationTier, u32>,
    pub pairs_formed: u32,
    /// 有亲属关系记录的搭档数
    pub family_pairs: u32,
}

// ==========================================
// AssignmentRunResult - 运行结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRunResult {
    pub week: NaiveDate,
    /// 按节目 order 升序
    pub assignments: Vec<Assignment>,
    pub diagnostics: Vec<PartDiagnostic>,
    pub status: RunStatus,
    pub statistics: RunStatistics,
}

impl AssignmentRunResult {
    pub fn is_complete(&self) -> bool {
        self.status == RunStatus::Complete
    }

    pub fn pending(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter().filter(|a| a.is_pending())
    }

    pub fn find_by_part(&self, part_id: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.part_id == part_id)
    }
}

// ==========================================
// 会众聚会安排系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、只读快照
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod assignment;
pub mod family;
pub mod history;
pub mod program;
pub mod student;
pub mod types;

// 重导出核心类型
pub use assignment::{
    Assignment, AssignmentRunResult, DiagnosticKind, DiagnosticSeverity, PartDiagnostic,
    RunStatistics,
};
pub use family::{FamilyRelation, RawFamilyRelation};
pub use history::{HistoryEntry, HistoryRecord, HistorySnapshot};
pub use program::{Part, PartRule, Program, RawPart};
pub use student::{RawStudent, RosterSnapshot, Student};
pub use types::{
    AssignmentStatus, Gender, GenderRestriction, ParseEnumError, PartType, PendingReason,
    QualificationTier, RelationKind, RunStatus, Section,
};

// ==========================================
// 会众聚会安排系统 - 引擎层错误类型
// ==========================================
// 职责: 结构性（致命）错误，在计算开始前拒绝输入
// 说明: 单个节目找不到人选不是错误，记录为 pending 诊断
// ==========================================

use crate::domain::types::{ParseEnumError, PartType, RelationKind};
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    // ===== 名册 =====
    #[error("在册学员为空，无法生成安排")]
    EmptyActiveRoster,

    #[error("学员 id 重复: {0}")]
    DuplicateStudentId(String),

    // ===== 节目单 =====
    #[error("节目顺序重复: order={order}, parts=[{first_part_id}, {second_part_id}]")]
    DuplicatePartOrder {
        order: u32,
        first_part_id: String,
        second_part_id: String,
    },

    #[error("节目 id 重复: {0}")]
    DuplicatePartId(String),

    #[error("同一节目类型规则不一致: part_type={part_type}, parts=[{first_part_id}, {second_part_id}]")]
    InconsistentPartRule {
        part_type: PartType,
        first_part_id: String,
        second_part_id: String,
    },

    // ===== 亲属关系 =====
    #[error("亲属关系冲突: {student_a}-{student_b} 同时记录为 {existing} 和 {conflicting}")]
    ConflictingFamilyRelation {
        student_a: String,
        student_b: String,
        existing: RelationKind,
        conflicting: RelationKind,
    },

    #[error("亲属关系不能指向自身: {0}")]
    SelfRelation(String),

    // ===== 边界输入 =====
    #[error(transparent)]
    UnknownValue(#[from] ParseEnumError),
}

pub type EngineResult<T> = Result<T, EngineError>;

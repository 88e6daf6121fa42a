// ==========================================
// 会众聚会安排系统 - 亲属关系
// ==========================================
// 红线: 关系无序且对称；同一对学员最多一种关系
// ==========================================

use crate::domain::types::{ParseEnumError, RelationKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyRelation {
    pub student_a: String,
    pub student_b: String,
    pub kind: RelationKind,
}

impl FamilyRelation {
    pub fn new(a: &str, b: &str, kind: RelationKind) -> Self {
        Self {
            student_a: a.to_string(),
            student_b: b.to_string(),
            kind,
        }
    }

    /// 规范化键（字典序小者在前），用于对称查找
    pub fn pair_key(&self) -> (String, String) {
        pair_key(&self.student_a, &self.student_b)
    }
}

pub fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// 边界输入形式
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFamilyRelation {
    pub student_a: String,
    pub student_b: String,
    pub kind: String,
}

impl TryFrom<RawFamilyRelation> for FamilyRelation {
    type Error = ParseEnumError;

    fn try_from(raw: RawFamilyRelation) -> Result<Self, Self::Error> {
        Ok(FamilyRelation {
            kind: raw.kind.parse()?,
            student_a: raw.student_a,
            student_b: raw.student_b,
        })
    }
}

// ==========================================
// 会众聚会安排系统 - 亲属搭档校验
// ==========================================
// 规则:
// - 同性搭档始终允许
// - 异性搭档仅当二人之间记录了 spouse / parent_child / sibling 关系
// - other_supervised 默认不足以支持异性搭档（失败即关闭）
// 红线: 纯函数、全域定义、不抛错
// ==========================================

use crate::config::EngineConfig;
use crate::domain::family::{pair_key, FamilyRelation};
use crate::domain::student::Student;
use crate::domain::types::RelationKind;
use crate::engine::error::{EngineError, EngineResult};
use std::collections::HashMap;

// ==========================================
// FamilyGraph - 对称亲属关系索引
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct FamilyGraph {
    pairs: HashMap<(String, String), RelationKind>,
}

impl FamilyGraph {
    /// 构建索引
    ///
    /// 重复记录同一关系视为幂等；同一对学员记录了不同关系、
    /// 或关系指向自身，均为结构性错误。
    pub fn build(relations: &[FamilyRelation]) -> EngineResult<Self> {
        let mut pairs: HashMap<(String, String), RelationKind> =
            HashMap::with_capacity(relations.len());

        for rel in relations {
            if rel.student_a == rel.student_b {
                return Err(EngineError::SelfRelation(rel.student_a.clone()));
            }

            let key = rel.pair_key();
            match pairs.get(&key) {
                Some(existing) if *existing != rel.kind => {
                    return Err(EngineError::ConflictingFamilyRelation {
                        student_a: key.0,
                        student_b: key.1,
                        existing: *existing,
                        conflicting: rel.kind,
                    });
                }
                Some(_) => {}
                None => {
                    pairs.insert(key, rel.kind);
                }
            }
        }

        Ok(Self { pairs })
    }

    pub fn relation(&self, a: &str, b: &str) -> Option<RelationKind> {
        self.pairs.get(&pair_key(a, b)).copied()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

// ==========================================
// FamilyRelationValidator - 搭档校验
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct FamilyRelationValidator {
    other_supervised_counts_as_family: bool,
}

impl FamilyRelationValidator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            other_supervised_counts_as_family: config.other_supervised_counts_as_family,
        }
    }

    /// 判断主讲人与助手能否搭档
    pub fn is_pairing_allowed(
        &self,
        primary: &Student,
        assistant: &Student,
        relations: &FamilyGraph,
    ) -> bool {
        if primary.gender == assistant.gender {
            return true;
        }

        match relations.relation(&primary.id, &assistant.id) {
            Some(kind) if kind.is_immediate_family() => true,
            Some(RelationKind::OtherSupervised) => self.other_supervised_counts_as_family,
            _ => false,
        }
    }
}

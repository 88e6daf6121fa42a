// ==========================================
// 会众聚会安排系统 - 资格筛选引擎
// ==========================================
// 职责: 给定节目与名册，返回结构上合格的候选人
// 规则: 在册 + 性别限制 + 最低资格等级 + 本周未被占用
// 红线: 无状态、无副作用；空结果不是错误，交由上层记录
// ==========================================

use crate::domain::program::Part;
use crate::domain::student::{RosterSnapshot, Student};
use crate::domain::types::{Gender, GenderRestriction, QualificationTier};
use std::collections::HashSet;
use std::fmt;

/// 不合格原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligibility {
    Inactive,
    GenderMismatch {
        required: GenderRestriction,
        actual: Gender,
    },
    BelowMinimumTier {
        required: QualificationTier,
        actual: QualificationTier,
    },
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ineligibility::Inactive => write!(f, "学员不在册"),
            Ineligibility::GenderMismatch { required, actual } => {
                write!(f, "性别不符: 要求 {}, 实际 {}", required, actual)
            }
            Ineligibility::BelowMinimumTier { required, actual } => {
                write!(f, "资格等级不足: 要求 >= {}, 实际 {}", required, actual)
            }
        }
    }
}

// ==========================================
// EligibilityFilter - 资格筛选
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityFilter;

impl EligibilityFilter {
    pub fn new() -> Self {
        Self
    }

    /// 判定学员能否担任该节目的主讲人
    pub fn check(&self, part: &Part, student: &Student) -> Result<(), Ineligibility> {
        if !student.active {
            return Err(Ineligibility::Inactive);
        }

        if !part.gender_restriction.permits(student.gender) {
            return Err(Ineligibility::GenderMismatch {
                required: part.gender_restriction,
                actual: student.gender,
            });
        }

        if let Some(min_tier) = part.min_qualification {
            if student.tier < min_tier {
                return Err(Ineligibility::BelowMinimumTier {
                    required: min_tier,
                    actual: student.tier,
                });
            }
        }

        Ok(())
    }

    /// 判定学员能否担任该节目的助手
    ///
    /// 助手不受最低资格等级约束；性别限制仅在
    /// `assistant_gender_must_match_restriction` 时生效。
    pub fn check_assistant(&self, part: &Part, student: &Student) -> Result<(), Ineligibility> {
        if !student.active {
            return Err(Ineligibility::Inactive);
        }

        if part.assistant_gender_must_match_restriction
            && !part.gender_restriction.permits(student.gender)
        {
            return Err(Ineligibility::GenderMismatch {
                required: part.gender_restriction,
                actual: student.gender,
            });
        }

        Ok(())
    }

    /// 主讲人候选集（保持名册顺序，排序由公平轮换决定）
    ///
    /// # 参数
    /// - part: 节目
    /// - roster: 名册快照
    /// - already_used: 本次运行已占用的学员 id
    pub fn filter<'a>(
        &self,
        part: &Part,
        roster: &'a RosterSnapshot,
        already_used: &HashSet<String>,
    ) -> Vec<&'a Student> {
        roster
            .active()
            .filter(|s| !already_used.contains(&s.id))
            .filter(|s| self.check(part, s).is_ok())
            .collect()
    }

    /// 助手候选集（排除主讲人本人及已占用学员）
    pub fn filter_assistants<'a>(
        &self,
        part: &Part,
        roster: &'a RosterSnapshot,
        primary: &Student,
        already_used: &HashSet<String>,
    ) -> Vec<&'a Student> {
        roster
            .active()
            .filter(|s| s.id != primary.id && !already_used.contains(&s.id))
            .filter(|s| self.check_assistant(part, s).is_ok())
            .collect()
    }
}

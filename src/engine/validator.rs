// ==========================================
// 会众聚会安排系统 - 安排结果校验器
// ==========================================
// 职责: 对已生成（或人工改动后）的结果重新核对全部规则
// 用途: 持久化前的最后一道关卡 + 测试断言
// ==========================================

use crate::config::EngineConfig;
use crate::domain::assignment::AssignmentRunResult;
use crate::domain::family::FamilyRelation;
use crate::domain::program::Program;
use crate::domain::student::RosterSnapshot;
use crate::engine::eligibility::{EligibilityFilter, Ineligibility};
use crate::engine::error::EngineResult;
use crate::engine::family::{FamilyGraph, FamilyRelationValidator};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ==========================================
// ViolationRule - 违规规则
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationRule {
    UnknownPart,
    UnknownStudent,
    InactiveStudent,
    GenderMismatch,
    BelowMinimumTier,
    DoubleBooking,
    UnsafePairing,
    MissingAssistant,
    SelfPairing,
}

impl fmt::Display for ViolationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ViolationRule::UnknownPart => "UNKNOWN_PART",
            ViolationRule::UnknownStudent => "UNKNOWN_STUDENT",
            ViolationRule::InactiveStudent => "INACTIVE_STUDENT",
            ViolationRule::GenderMismatch => "GENDER_MISMATCH",
            ViolationRule::BelowMinimumTier => "BELOW_MINIMUM_TIER",
            ViolationRule::DoubleBooking => "DOUBLE_BOOKING",
            ViolationRule::UnsafePairing => "UNSAFE_PAIRING",
            ViolationRule::MissingAssistant => "MISSING_ASSISTANT",
            ViolationRule::SelfPairing => "SELF_PAIRING",
        };
        write!(f, "{}", s)
    }
}

impl From<Ineligibility> for ViolationRule {
    fn from(value: Ineligibility) -> Self {
        match value {
            Ineligibility::Inactive => ViolationRule::InactiveStudent,
            Ineligibility::GenderMismatch { .. } => ViolationRule::GenderMismatch,
            Ineligibility::BelowMinimumTier { .. } => ViolationRule::BelowMinimumTier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub part_id: String,
    pub rule: ViolationRule,
    pub student_id: Option<String>,
    pub detail: String,
}

impl RuleViolation {
    fn new(part_id: &str, rule: ViolationRule, student_id: Option<&str>, detail: String) -> Self {
        Self {
            part_id: part_id.to_string(),
            rule,
            student_id: student_id.map(str::to_string),
            detail,
        }
    }
}

// ==========================================
// AssignmentValidator - 结果校验器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentValidator {
    eligibility: EligibilityFilter,
    family: FamilyRelationValidator,
    allow_reassignment: bool,
}

impl AssignmentValidator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            eligibility: EligibilityFilter::new(),
            family: FamilyRelationValidator::new(config),
            allow_reassignment: config.reassignment_override,
        }
    }

    /// 校验运行结果
    ///
    /// # 返回
    /// - Ok(vec![]): 全部通过
    /// - Ok(violations): 违规列表（按节目顺序）
    /// - Err: 亲属关系本身不合法
    pub fn validate(
        &self,
        result: &AssignmentRunResult,
        program: &Program,
        roster: &RosterSnapshot,
        relations: &[FamilyRelation],
    ) -> EngineResult<Vec<RuleViolation>> {
        let graph = FamilyGraph::build(relations)?;
        let parts: HashMap<&str, _> = program.parts.iter().map(|p| (p.id.as_str(), p)).collect();

        let mut violations = Vec::new();
        let mut booked: HashMap<&str, &str> = HashMap::new();

        for assignment in &result.assignments {
            let part_id = assignment.part_id.as_str();
            let part = match parts.get(part_id) {
                Some(p) => *p,
                None => {
                    violations.push(RuleViolation::new(
                        part_id,
                        ViolationRule::UnknownPart,
                        None,
                        "节目不在节目单中".to_string(),
                    ));
                    continue;
                }
            };

            // 重复安排
            if !self.allow_reassignment {
                for id in assignment.student_ids() {
                    if let Some(first) = booked.insert(id, part_id) {
                        violations.push(RuleViolation::new(
                            part_id,
                            ViolationRule::DoubleBooking,
                            Some(id),
                            format!("同一周已安排在节目 {}", first),
                        ));
                    }
                }
            }

            let primary = match assignment.primary_student_id.as_deref() {
                Some(id) => match roster.get(id) {
                    Some(s) => Some(s),
                    None => {
                        violations.push(RuleViolation::new(
                            part_id,
                            ViolationRule::UnknownStudent,
                            Some(id),
                            "主讲人不在名册中".to_string(),
                        ));
                        None
                    }
                },
                None => None,
            };

            if let Some(primary) = primary {
                if let Err(reason) = self.eligibility.check(part, primary) {
                    violations.push(RuleViolation::new(
                        part_id,
                        reason.into(),
                        Some(&primary.id),
                        format!("主讲人不合格: {}", reason),
                    ));
                }
            }

            match assignment.assistant_student_id.as_deref() {
                Some(assistant_id) => {
                    let assistant = match roster.get(assistant_id) {
                        Some(s) => s,
                        None => {
                            violations.push(RuleViolation::new(
                                part_id,
                                ViolationRule::UnknownStudent,
                                Some(assistant_id),
                                "助手不在名册中".to_string(),
                            ));
                            continue;
                        }
                    };

                    if let Err(reason) = self.eligibility.check_assistant(part, assistant) {
                        violations.push(RuleViolation::new(
                            part_id,
                            reason.into(),
                            Some(assistant_id),
                            format!("助手不合格: {}", reason),
                        ));
                    }

                    if let Some(primary) = primary {
                        if primary.id == assistant.id {
                            violations.push(RuleViolation::new(
                                part_id,
                                ViolationRule::SelfPairing,
                                Some(assistant_id),
                                "主讲人与助手为同一人".to_string(),
                            ));
                        } else if !self.family.is_pairing_allowed(primary, assistant, &graph) {
                            violations.push(RuleViolation::new(
                                part_id,
                                ViolationRule::UnsafePairing,
                                Some(assistant_id),
                                format!("异性搭档 {} / {} 无直系亲属关系", primary.id, assistant.id),
                            ));
                        }
                    }
                }
                None if part.requires_assistant && !assignment.is_pending() => {
                    violations.push(RuleViolation::new(
                        part_id,
                        ViolationRule::MissingAssistant,
                        None,
                        "节目需要助手但状态为已安排".to_string(),
                    ));
                }
                None => {}
            }
        }

        Ok(violations)
    }
}

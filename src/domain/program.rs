// ==========================================
// 会众聚会安排系统 - 周聚会节目
// ==========================================
// 职责: 节目（Part）与周节目单（Program）定义 + 标准节目规则目录
// 红线: 同一节目单内 order 唯一；性别限制/资格要求由节目类型决定
// ==========================================

use crate::domain::types::{
    GenderRestriction, ParseEnumError, PartType, QualificationTier, Section,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// PartRule - 节目类型规则
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRule {
    pub section: Section,
    pub gender_restriction: GenderRestriction,
    pub min_qualification: Option<QualificationTier>,
    pub requires_assistant: bool,
    pub assistant_gender_must_match_restriction: bool,
    /// 建议的同类型最短间隔（周），仅用于提示
    pub cooldown_weeks: u32,
}

impl PartType {
    /// 标准规则目录
    pub fn default_rule(&self) -> PartRule {
        use GenderRestriction::{Any, Male};
        use QualificationTier::*;

        let (section, gender_restriction, min_qualification, requires_assistant, cooldown_weeks) =
            match self {
                PartType::BibleReading => {
                    (Section::Treasures, Male, Some(UnbaptizedPublisher), false, 4)
                }
                PartType::TreasuresTalk => {
                    (Section::Treasures, Male, Some(MinisterialServant), false, 6)
                }
                PartType::SpiritualGems => {
                    (Section::Treasures, Male, Some(MinisterialServant), false, 6)
                }
                PartType::InitialCall => (Section::ApplyYourself, Any, None, true, 2),
                PartType::ReturnVisit => (Section::ApplyYourself, Any, None, true, 3),
                PartType::BibleStudy => (Section::ApplyYourself, Any, None, true, 4),
                PartType::Demonstration => (Section::ApplyYourself, Any, None, true, 2),
                PartType::ExplainingBeliefs => (Section::ApplyYourself, Any, None, true, 4),
                PartType::Talk => (Section::ApplyYourself, Male, Some(BaptizedPublisher), false, 6),
                PartType::CongregationBibleStudy => {
                    (Section::LivingAsChristians, Male, Some(Elder), false, 8)
                }
            };

        PartRule {
            section,
            gender_restriction,
            min_qualification,
            requires_assistant,
            assistant_gender_must_match_restriction: false,
            cooldown_weeks,
        }
    }
}

// ==========================================
// Part - 节目
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub id: String,
    pub section: Section,
    pub part_type: PartType,
    pub order: u32,
    pub duration_minutes: u32,
    pub gender_restriction: GenderRestriction,
    pub min_qualification: Option<QualificationTier>,
    pub requires_assistant: bool,
    pub assistant_gender_must_match_restriction: bool,
}

impl Part {
    /// 按标准规则目录构建节目
    pub fn from_catalog(id: &str, part_type: PartType, order: u32, duration_minutes: u32) -> Self {
        let rule = part_type.default_rule();
        Self {
            id: id.to_string(),
            section: rule.section,
            part_type,
            order,
            duration_minutes,
            gender_restriction: rule.gender_restriction,
            min_qualification: rule.min_qualification,
            requires_assistant: rule.requires_assistant,
            assistant_gender_must_match_restriction: rule.assistant_gender_must_match_restriction,
        }
    }
}

/// 边界输入形式（节目单解析子系统输出）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPart {
    pub id: String,
    pub section: String,
    pub part_type: String,
    pub order: u32,
    pub duration_minutes: u32,
    pub gender_restriction: String,
    #[serde(default)]
    pub min_qualification: Option<String>,
    #[serde(default)]
    pub requires_assistant: bool,
    #[serde(default)]
    pub assistant_gender_must_match_restriction: bool,
}

impl TryFrom<RawPart> for Part {
    type Error = ParseEnumError;

    fn try_from(raw: RawPart) -> Result<Self, Self::Error> {
        let min_qualification = match raw.min_qualification.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(s.parse()?),
        };

        Ok(Part {
            section: raw.section.parse()?,
            part_type: raw.part_type.parse()?,
            gender_restriction: raw.gender_restriction.parse()?,
            min_qualification,
            id: raw.id,
            order: raw.order,
            duration_minutes: raw.duration_minutes,
            requires_assistant: raw.requires_assistant,
            assistant_gender_must_match_restriction: raw.assistant_gender_must_match_restriction,
        })
    }
}

// ==========================================
// Program - 周节目单
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// 周起始日期（周标识）
    pub week_start: NaiveDate,
    pub parts: Vec<Part>,
}

impl Program {
    pub fn new(week_start: NaiveDate, parts: Vec<Part>) -> Self {
        Self { week_start, parts }
    }

    /// 按 order 升序返回节目引用
    pub fn parts_in_order(&self) -> Vec<&Part> {
        let mut parts: Vec<&Part> = self.parts.iter().collect();
        parts.sort_by_key(|p| p.order);
        parts
    }
}

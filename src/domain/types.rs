// ==========================================
// 会众聚会安排系统 - 领域类型定义
// ==========================================
// 职责: 定义封闭枚举（性别/资格等级/节目类型/亲属关系等）
// 红线: 字符串形式只出现在边界（导入/存储），引擎内部一律使用枚举
// 序列化格式: snake_case (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 枚举字符串解析失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("未知的{kind}取值: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

// ==========================================
// 性别 (Gender)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(ParseEnumError::new("gender", s)),
        }
    }
}

// ==========================================
// 资格等级 (Qualification Tier)
// ==========================================
// 顺序: NewStudent < UnbaptizedPublisher < BaptizedPublisher < MinisterialServant < Elder
// 红线: 声明顺序即比较顺序，不得调整
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualificationTier {
    NewStudent,          // 新学员
    UnbaptizedPublisher, // 未受浸传道员
    BaptizedPublisher,   // 受浸传道员
    MinisterialServant,  // 助理仆人
    Elder,               // 长老
}

impl QualificationTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualificationTier::NewStudent => "new_student",
            QualificationTier::UnbaptizedPublisher => "unbaptized_publisher",
            QualificationTier::BaptizedPublisher => "baptized_publisher",
            QualificationTier::MinisterialServant => "ministerial_servant",
            QualificationTier::Elder => "elder",
        }
    }
}

impl fmt::Display for QualificationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QualificationTier {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new_student" => Ok(QualificationTier::NewStudent),
            "unbaptized_publisher" => Ok(QualificationTier::UnbaptizedPublisher),
            "baptized_publisher" => Ok(QualificationTier::BaptizedPublisher),
            "ministerial_servant" => Ok(QualificationTier::MinisterialServant),
            "elder" => Ok(QualificationTier::Elder),
            _ => Err(ParseEnumError::new("qualification_tier", s)),
        }
    }
}

// ==========================================
// 性别限制 (Gender Restriction)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderRestriction {
    Any,
    Male,
    Female,
}

impl GenderRestriction {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenderRestriction::Any => "any",
            GenderRestriction::Male => "male",
            GenderRestriction::Female => "female",
        }
    }

    /// 判断某性别是否满足该限制
    pub fn permits(&self, gender: Gender) -> bool {
        match self {
            GenderRestriction::Any => true,
            GenderRestriction::Male => gender == Gender::Male,
            GenderRestriction::Female => gender == Gender::Female,
        }
    }
}

impl fmt::Display for GenderRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GenderRestriction {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "any" => Ok(GenderRestriction::Any),
            "male" => Ok(GenderRestriction::Male),
            "female" => Ok(GenderRestriction::Female),
            _ => Err(ParseEnumError::new("gender_restriction", s)),
        }
    }
}

// ==========================================
// 节目段落 (Section)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Treasures,          // 上帝话语的宝藏
    ApplyYourself,      // 用心准备传道
    LivingAsChristians, // 基督徒的生活
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Treasures => "treasures",
            Section::ApplyYourself => "apply_yourself",
            Section::LivingAsChristians => "living_as_christians",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Section {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "treasures" => Ok(Section::Treasures),
            "apply_yourself" => Ok(Section::ApplyYourself),
            "living_as_christians" => Ok(Section::LivingAsChristians),
            _ => Err(ParseEnumError::new("section", s)),
        }
    }
}

// ==========================================
// 节目类型 (Part Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartType {
    BibleReading,           // 经文朗读
    InitialCall,            // 开始交谈
    ReturnVisit,            // 继续交谈
    BibleStudy,             // 培养门徒
    Talk,                   // 演讲
    Demonstration,          // 示范
    ExplainingBeliefs,      // 解释信仰
    TreasuresTalk,          // 宝藏演讲
    SpiritualGems,          // 挖掘属灵宝石
    CongregationBibleStudy, // 会众研经班
}

impl PartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartType::BibleReading => "bible_reading",
            PartType::InitialCall => "initial_call",
            PartType::ReturnVisit => "return_visit",
            PartType::BibleStudy => "bible_study",
            PartType::Talk => "talk",
            PartType::Demonstration => "demonstration",
            PartType::ExplainingBeliefs => "explaining_beliefs",
            PartType::TreasuresTalk => "treasures_talk",
            PartType::SpiritualGems => "spiritual_gems",
            PartType::CongregationBibleStudy => "congregation_bible_study",
        }
    }
}

impl fmt::Display for PartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PartType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bible_reading" => Ok(PartType::BibleReading),
            "initial_call" => Ok(PartType::InitialCall),
            "return_visit" => Ok(PartType::ReturnVisit),
            "bible_study" => Ok(PartType::BibleStudy),
            "talk" => Ok(PartType::Talk),
            "demonstration" => Ok(PartType::Demonstration),
            "explaining_beliefs" => Ok(PartType::ExplainingBeliefs),
            "treasures_talk" => Ok(PartType::TreasuresTalk),
            "spiritual_gems" => Ok(PartType::SpiritualGems),
            "congregation_bible_study" => Ok(PartType::CongregationBibleStudy),
            _ => Err(ParseEnumError::new("part_type", s)),
        }
    }
}

// ==========================================
// 亲属关系类型 (Relation Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Spouse,          // 配偶
    ParentChild,     // 父母/子女
    Sibling,         // 兄弟姐妹
    OtherSupervised, // 其他（需外部确认）
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Spouse => "spouse",
            RelationKind::ParentChild => "parent_child",
            RelationKind::Sibling => "sibling",
            RelationKind::OtherSupervised => "other_supervised",
        }
    }

    /// 是否属于直系家庭关系（可单独支持异性搭档）
    pub fn is_immediate_family(&self) -> bool {
        matches!(
            self,
            RelationKind::Spouse | RelationKind::ParentChild | RelationKind::Sibling
        )
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spouse" => Ok(RelationKind::Spouse),
            "parent_child" => Ok(RelationKind::ParentChild),
            "sibling" => Ok(RelationKind::Sibling),
            "other_supervised" => Ok(RelationKind::OtherSupervised),
            _ => Err(ParseEnumError::new("relation_kind", s)),
        }
    }
}

// ==========================================
// 安排状态 (Assignment Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Assigned, // 已安排
    Pending,  // 待人工处理
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Assigned => "assigned",
            AssignmentStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssignmentStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "assigned" => Ok(AssignmentStatus::Assigned),
            "pending" => Ok(AssignmentStatus::Pending),
            _ => Err(ParseEnumError::new("assignment_status", s)),
        }
    }
}

// ==========================================
// 待处理原因 (Pending Reason)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingReason {
    NoEligibleCandidate,   // 无合格主讲人
    NoFamilySafeAssistant, // 无可安全搭配的助手
}

impl PendingReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            PendingReason::NoEligibleCandidate => "no_eligible_candidate",
            PendingReason::NoFamilySafeAssistant => "no_family_safe_assistant",
        }
    }
}

impl fmt::Display for PendingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PendingReason {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "no_eligible_candidate" => Ok(PendingReason::NoEligibleCandidate),
            "no_family_safe_assistant" => Ok(PendingReason::NoFamilySafeAssistant),
            _ => Err(ParseEnumError::new("pending_reason", s)),
        }
    }
}

// ==========================================
// 运行结果状态 (Run Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Complete, // 全部安排
    Partial,  // 存在待处理节目
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Complete => write!(f, "complete"),
            RunStatus::Partial => write!(f, "partial"),
        }
    }
}

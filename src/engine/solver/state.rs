use crate::domain::assignment::Assignment;
use crate::domain::student::Student;

// ==========================================
// PartState - 单个节目的求解状态
// ==========================================
// Unassigned → PrimarySelected → (AssistantSelected | AssistantSkippedNotRequired) → Finalized
// Unassigned → Finalized(pending)
// PrimarySelected → Finalized(pending)  (无可安全搭配的助手)
#[derive(Debug, Clone)]
pub enum PartState<'a> {
    Unassigned,
    PrimarySelected {
        primary: &'a Student,
    },
    AssistantSelected {
        primary: &'a Student,
        assistant: &'a Student,
    },
    AssistantSkippedNotRequired {
        primary: &'a Student,
    },
    Finalized(Assignment),
}

impl PartState<'_> {
    pub fn is_final(&self) -> bool {
        matches!(self, PartState::Finalized(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            PartState::Unassigned => "UNASSIGNED",
            PartState::PrimarySelected { .. } => "PRIMARY_SELECTED",
            PartState::AssistantSelected { .. } => "ASSISTANT_SELECTED",
            PartState::AssistantSkippedNotRequired { .. } => "ASSISTANT_SKIPPED_NOT_REQUIRED",
            PartState::Finalized(_) => "FINALIZED",
        }
    }
}

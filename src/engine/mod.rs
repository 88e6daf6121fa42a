// ==========================================
// 会众聚会安排系统 - 引擎层
// ==========================================
// 职责: 实现安排规则引擎（资格筛选 / 公平轮换 / 亲属搭档 / 求解）
// 红线: Engine 不拼 SQL、不读全局状态，所有 pending 必须输出 reason
// ==========================================

pub mod eligibility;
pub mod error;
pub mod fairness;
pub mod family;
pub mod precondition;
pub mod solver;
pub mod statistics;
pub mod validator;

// 重导出核心引擎
pub use eligibility::{EligibilityFilter, Ineligibility};
pub use error::{EngineError, EngineResult};
pub use fairness::{days_since_last, FairnessBalancer};
pub use family::{FamilyGraph, FamilyRelationValidator};
pub use solver::{generate_assignments, AssignmentSolver, GenerationOptions, PartState};
pub use statistics::compute_statistics;
pub use validator::{AssignmentValidator, RuleViolation, ViolationRule};

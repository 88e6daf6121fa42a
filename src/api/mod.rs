// ==========================================
// 会众聚会安排系统 - API 层
// ==========================================
// 职责: 提供生成/预览/发布接口，供 CLI 及上层界面调用
// ==========================================

pub mod assignment_api;
pub mod error;
pub mod week_lock;

// 重导出核心类型
pub use assignment_api::AssignmentApi;
pub use error::{ApiError, ApiResult};
pub use week_lock::{WeekLockGuard, WeekLockRegistry};

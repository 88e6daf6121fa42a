// ==========================================
// 会众聚会安排系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 每周聚会节目自动安排（人工最终确认）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 安排规则
pub mod engine;

// 配置层 - 引擎参数
pub mod config;

// 数据仓储层 - 数据访问
pub mod repository;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - 共享状态
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AssignmentStatus, Gender, GenderRestriction, PartType, PendingReason, QualificationTier,
    RelationKind, RunStatus, Section,
};

// 领域实体
pub use domain::{
    Assignment, AssignmentRunResult, FamilyRelation, HistorySnapshot, Part, PartDiagnostic,
    Program, RosterSnapshot, Student,
};

// 引擎
pub use engine::{
    generate_assignments, AssignmentSolver, AssignmentValidator, EngineError, GenerationOptions,
};

// 配置
pub use config::EngineConfig;

// API
pub use api::{ApiError, AssignmentApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "会众聚会安排系统";

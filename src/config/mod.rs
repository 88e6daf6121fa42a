// ==========================================
// 会众聚会安排系统 - 配置层
// ==========================================
// 职责: 引擎参数定义 + 持久化覆写读取
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod config_reader;
pub mod engine_config;

pub use config_manager::{config_keys, ConfigManager};
pub use config_reader::EngineConfigReader;
pub use engine_config::{EngineConfig, DEFAULT_RECENT_ASSIGNMENT_WARNING_DAYS};

// ==========================================
// 会众聚会安排系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{AssignmentApi, ApiResult};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "ASSIGNMENT_ENGINE_DB_PATH";

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 周安排API
    pub assignment_api: Arc<AssignmentApi>,
}

impl AppState {
    /// 打开数据库并组装全部 API
    pub fn new(db_path: String) -> ApiResult<Self> {
        tracing::info!(db_path = %db_path, "初始化应用状态");
        let assignment_api = Arc::new(AssignmentApi::open(&db_path)?);

        Ok(Self {
            db_path,
            assignment_api,
        })
    }
}

/// 默认数据库路径
///
/// 优先级:
/// 1) 环境变量 ASSIGNMENT_ENGINE_DB_PATH
/// 2) 用户数据目录（Debug 使用独立的 -dev 目录）
/// 3) 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./assignment_engine.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir_name = if cfg!(debug_assertions) {
            "assignment-engine-dev"
        } else {
            "assignment-engine"
        };
        let dir = data_dir.join(dir_name);

        // 目录创建失败时保留当前目录回退值
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("assignment_engine.db");
        }
    }

    path.to_string_lossy().to_string()
}

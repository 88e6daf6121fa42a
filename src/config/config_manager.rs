// ==========================================
// 会众聚会安排系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 说明: 缺失或无法解析的值回落到 EngineConfig 默认值
// ==========================================

use crate::config::config_reader::EngineConfigReader;
use crate::config::engine_config::{EngineConfig, DEFAULT_RECENT_ASSIGNMENT_WARNING_DAYS};
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        Ok(())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    fn get_bool_or_default(&self, key: &str, default: bool) -> Result<bool, Box<dyn Error>> {
        let value = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        Ok(match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => true,
            "false" | "0" | "no" | "off" => false,
            _ => default,
        })
    }

    /// 同步读取完整引擎配置（CLI / 测试使用）
    pub fn load_engine_config(&self) -> Result<EngineConfig, Box<dyn Error>> {
        let defaults = EngineConfig::default();

        let recent_days = self
            .get_config_or_default(
                config_keys::RECENT_ASSIGNMENT_WARNING_DAYS,
                &DEFAULT_RECENT_ASSIGNMENT_WARNING_DAYS.to_string(),
            )?
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|d| *d >= 0)
            .unwrap_or(defaults.recent_assignment_warning_days);

        Ok(EngineConfig {
            recent_assignment_warning_days: recent_days,
            other_supervised_counts_as_family: self.get_bool_or_default(
                config_keys::OTHER_SUPERVISED_COUNTS_AS_FAMILY,
                defaults.other_supervised_counts_as_family,
            )?,
            reassignment_override: self.get_bool_or_default(
                config_keys::REASSIGNMENT_OVERRIDE,
                defaults.reassignment_override,
            )?,
        })
    }

    /// 获取所有 global 配置的快照（JSON，键有序）
    ///
    /// # 用途
    /// - 生成记录中保存当时生效的配置
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 覆盖同名 global 配置，单事务
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> Result<usize, Box<dyn Error>> {
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                params![key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }
}

// ==========================================
// EngineConfigReader 实现
// ==========================================
#[async_trait]
impl EngineConfigReader for ConfigManager {
    async fn get_recent_assignment_warning_days(&self) -> Result<i64, Box<dyn Error>> {
        Ok(self.load_engine_config()?.recent_assignment_warning_days)
    }

    async fn get_other_supervised_counts_as_family(&self) -> Result<bool, Box<dyn Error>> {
        self.get_bool_or_default(config_keys::OTHER_SUPERVISED_COUNTS_AS_FAMILY, false)
    }

    async fn get_reassignment_override(&self) -> Result<bool, Box<dyn Error>> {
        self.get_bool_or_default(config_keys::REASSIGNMENT_OVERRIDE, false)
    }

    async fn get_engine_config(&self) -> Result<EngineConfig, Box<dyn Error>> {
        self.load_engine_config()
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const RECENT_ASSIGNMENT_WARNING_DAYS: &str = "recent_assignment_warning_days";
    pub const OTHER_SUPERVISED_COUNTS_AS_FAMILY: &str = "other_supervised_counts_as_family";
    pub const REASSIGNMENT_OVERRIDE: &str = "reassignment_override";
}

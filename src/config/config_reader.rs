// ==========================================
// 会众聚会安排系统 - 引擎配置读取 Trait
// ==========================================
// 职责: 定义 API 层所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::engine_config::EngineConfig;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// EngineConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait EngineConfigReader: Send + Sync {
    /// 近期安排提示阈值（天）
    ///
    /// # 默认值
    /// - 14
    async fn get_recent_assignment_warning_days(&self) -> Result<i64, Box<dyn Error>>;

    /// other_supervised 是否视为亲属
    ///
    /// # 默认值
    /// - false
    async fn get_other_supervised_counts_as_family(&self) -> Result<bool, Box<dyn Error>>;

    /// 是否允许同周跨节目重复安排
    ///
    /// # 默认值
    /// - false
    async fn get_reassignment_override(&self) -> Result<bool, Box<dyn Error>>;

    /// 组装完整引擎配置
    async fn get_engine_config(&self) -> Result<EngineConfig, Box<dyn Error>> {
        let recent_assignment_warning_days = self.get_recent_assignment_warning_days().await?;
        let other_supervised_counts_as_family =
            self.get_other_supervised_counts_as_family().await?;
        let reassignment_override = self.get_reassignment_override().await?;

        Ok(EngineConfig {
            recent_assignment_warning_days,
            other_supervised_counts_as_family,
            reassignment_override,
        })
    }
}

// ==========================================
// 会众聚会安排系统 - 引擎配置
// ==========================================
// 职责: 引擎可调参数（均有默认值，缺省即安全行为）
// 存储: config_kv 表（见 ConfigManager）
// ==========================================

use serde::{Deserialize, Serialize};

/// 近期安排提示阈值默认值（天）
pub const DEFAULT_RECENT_ASSIGNMENT_WARNING_DAYS: i64 = 14;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 入选学员距上次同类型安排不足该天数时输出提示（不影响选择）
    #[serde(default = "default_recent_days")]
    pub recent_assignment_warning_days: i64,

    /// other_supervised 关系是否可单独支持异性搭档（默认否：失败即关闭）
    #[serde(default)]
    pub other_supervised_counts_as_family: bool,

    /// 重新安排覆盖：允许同一学员在同一周跨节目重复出现
    #[serde(default)]
    pub reassignment_override: bool,
}

fn default_recent_days() -> i64 {
    DEFAULT_RECENT_ASSIGNMENT_WARNING_DAYS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            recent_assignment_warning_days: DEFAULT_RECENT_ASSIGNMENT_WARNING_DAYS,
            other_supervised_counts_as_family: false,
            reassignment_override: false,
        }
    }
}

// ==========================================
// 会众聚会安排系统 - 周安排 API
// ==========================================
// 职责: 装载快照 → 调用引擎 → 校验 → 原子持久化
// 红线: 同一周同一时刻最多一个生成流程（WeekLockRegistry）
// 红线: 已发布周必须显式 overwrite 才能重新生成
// ==========================================

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rusqlite::Connection;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::week_lock::WeekLockRegistry;
use crate::config::{ConfigManager, EngineConfig, EngineConfigReader};
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::assignment::AssignmentRunResult;
use crate::domain::program::Program;
use crate::engine::solver::{AssignmentSolver, GenerationOptions};
use crate::engine::validator::AssignmentValidator;
use crate::perf::{install_sqlite_tracing, PerfGuard, SqlPerfSettings};
use crate::repository::{AssignmentRepository, ProgramRepository, RosterRepository, StoredWeek};

// ==========================================
// AssignmentApi - 周安排 API
// ==========================================
pub struct AssignmentApi {
    roster_repo: Arc<RosterRepository>,
    program_repo: Arc<ProgramRepository>,
    assignment_repo: Arc<AssignmentRepository>,
    config_reader: Arc<dyn EngineConfigReader>,
    week_locks: WeekLockRegistry,
}

impl AssignmentApi {
    pub fn new(
        roster_repo: Arc<RosterRepository>,
        program_repo: Arc<ProgramRepository>,
        assignment_repo: Arc<AssignmentRepository>,
        config_reader: Arc<dyn EngineConfigReader>,
        week_locks: WeekLockRegistry,
    ) -> Self {
        Self {
            roster_repo,
            program_repo,
            assignment_repo,
            config_reader,
            week_locks,
        }
    }

    /// 基于共享连接组装全部仓储
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ApiResult<Self> {
        let config_manager = ConfigManager::from_connection(conn.clone())
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        Ok(Self::new(
            Arc::new(RosterRepository::new(conn.clone())),
            Arc::new(ProgramRepository::new(conn.clone())),
            Arc::new(AssignmentRepository::new(conn)),
            Arc::new(config_manager),
            WeekLockRegistry::new(),
        ))
    }

    /// 打开数据库（建表幂等）并组装 API
    pub fn open(db_path: &str) -> ApiResult<Self> {
        let mut conn = open_sqlite_connection(db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn).map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        install_sqlite_tracing(&mut conn, SqlPerfSettings::from_env());

        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    pub fn week_locks(&self) -> &WeekLockRegistry {
        &self.week_locks
    }

    async fn load_config(&self) -> ApiResult<EngineConfig> {
        self.config_reader
            .get_engine_config()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    fn load_program(&self, week: NaiveDate) -> ApiResult<Program> {
        self.program_repo
            .find_by_week(week)?
            .ok_or_else(|| ApiError::NotFound(format!("节目单(week={})不存在", week)))
    }

    /// 装载快照并运行引擎（不写库）
    fn run_engine(
        &self,
        week: NaiveDate,
        config: &EngineConfig,
        options: &GenerationOptions,
    ) -> ApiResult<AssignmentRunResult> {
        let program = self.load_program(week)?;
        let roster = self.roster_repo.load_roster()?;
        let history = self.roster_repo.load_history()?;
        let relations = self.roster_repo.load_relations()?;

        let result = AssignmentSolver::new(config.clone()).solve(
            &program, &roster, &history, &relations, options,
        )?;

        let violations = AssignmentValidator::new(config).validate(
            &result, &program, &roster, &relations,
        )?;
        if !violations.is_empty() {
            warn!(week = %week, violations = violations.len(), "生成结果未通过规则校验");
            return Err(ApiError::ValidationFailed { week, violations });
        }

        Ok(result)
    }

    // ==========================================
    // 预览
    // ==========================================

    /// 预览一周安排（只读）
    pub async fn preview_week(&self, week: NaiveDate) -> ApiResult<AssignmentRunResult> {
        self.preview_week_with_options(week, &GenerationOptions::default())
            .await
    }

    #[instrument(skip(self, options), fields(week = %week))]
    pub async fn preview_week_with_options(
        &self,
        week: NaiveDate,
        options: &GenerationOptions,
    ) -> ApiResult<AssignmentRunResult> {
        let config = self.load_config().await?;

        let _perf = PerfGuard::new("api.preview_week");
        self.run_engine(week, &config, options)
    }

    // ==========================================
    // 生成
    // ==========================================

    /// 生成并保存一周安排
    ///
    /// # 参数
    /// - week: 周起始日期
    /// - overwrite: 已发布周是否允许覆盖
    ///
    /// # 返回
    /// - Ok((generation_id, result))
    /// - Err(GenerationInProgress): 该周已有进行中的生成
    /// - Err(WeekAlreadyPublished): 已发布且未要求覆盖
    pub async fn generate_week(
        &self,
        week: NaiveDate,
        overwrite: bool,
    ) -> ApiResult<(String, AssignmentRunResult)> {
        self.generate_week_with_options(week, overwrite, &GenerationOptions::default())
            .await
    }

    #[instrument(skip(self, options), fields(week = %week))]
    pub async fn generate_week_with_options(
        &self,
        week: NaiveDate,
        overwrite: bool,
        options: &GenerationOptions,
    ) -> ApiResult<(String, AssignmentRunResult)> {
        let _guard = self
            .week_locks
            .try_acquire(week)
            .ok_or(ApiError::GenerationInProgress { week })?;

        let config = self.load_config().await?;
        self.generate_locked(week, overwrite, &config, options)
    }

    fn generate_locked(
        &self,
        week: NaiveDate,
        overwrite: bool,
        config: &EngineConfig,
        options: &GenerationOptions,
    ) -> ApiResult<(String, AssignmentRunResult)> {
        let _perf = PerfGuard::new("api.generate_week");

        if self.assignment_repo.is_week_published(week)? {
            if !overwrite {
                return Err(ApiError::WeekAlreadyPublished { week });
            }
            warn!(week = %week, "覆盖已发布的周安排");
        }

        let result = self.run_engine(week, config, options)?;

        let generation_id = Uuid::new_v4().to_string();
        self.assignment_repo.replace_week(&result, &generation_id)?;

        info!(
            week = %week,
            generation_id = %generation_id,
            status = %result.status,
            pending_count = result.statistics.pending_count,
            "周安排已生成"
        );

        Ok((generation_id, result))
    }

    // ==========================================
    // 发布 / 查询
    // ==========================================

    /// 发布一周安排并回写历史
    ///
    /// # 返回
    /// - Ok(usize): 回写的历史条数
    #[instrument(skip(self), fields(week = %week))]
    pub async fn publish_week(&self, week: NaiveDate) -> ApiResult<usize> {
        let _guard = self
            .week_locks
            .try_acquire(week)
            .ok_or(ApiError::GenerationInProgress { week })?;

        let _perf = PerfGuard::new("api.publish_week");
        Ok(self.assignment_repo.publish_week(week)?)
    }

    pub fn find_week(&self, week: NaiveDate) -> ApiResult<Option<StoredWeek>> {
        Ok(self.assignment_repo.find_by_week(week)?)
    }
}

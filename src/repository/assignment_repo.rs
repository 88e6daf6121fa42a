// ==========================================
// 会众聚会安排系统 - 周安排数据仓储
// ==========================================
// 职责: week_assignment 表读写 + 发布时回写 assignment_history
// 红线: 整周写入必须单事务（含 pending 行），不存在半写状态
// ==========================================

use crate::domain::assignment::{Assignment, AssignmentRunResult};
use crate::domain::types::{AssignmentStatus, PendingReason};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::info;

/// 已持久化的一周安排
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredWeek {
    pub week: NaiveDate,
    pub generation_id: String,
    pub published: bool,
    /// 按节目 order 升序
    pub assignments: Vec<Assignment>,
}

pub struct AssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AssignmentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 整周替换写入
    ///
    /// 已发布周被覆盖时，旧行连同其历史计数一并删除。
    ///
    /// # 参数
    /// - result: 引擎运行结果
    /// - generation_id: 本次生成标识
    ///
    /// # 返回
    /// - Ok(usize): 写入行数
    pub fn replace_week(
        &self,
        result: &AssignmentRunResult,
        generation_id: &str,
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM week_assignment WHERE week_start = ?1",
            params![result.week],
        )?;

        let mut count = 0;
        for a in &result.assignments {
            count += tx.execute(
                r#"
                INSERT INTO week_assignment (
                    week_start, part_id, generation_id, primary_student_id,
                    assistant_student_id, status, reason
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    result.week,
                    a.part_id,
                    generation_id,
                    a.primary_student_id,
                    a.assistant_student_id,
                    a.status.as_str(),
                    a.reason.map(|r| r.as_str()),
                ],
            )?;
        }

        tx.commit()?;

        info!(week = %result.week, generation_id, rows = count, "周安排已写入");
        Ok(count)
    }

    /// 该周是否已发布
    pub fn is_week_published(&self, week: NaiveDate) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let published: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM week_assignment WHERE week_start = ?1 AND published = 1)",
            params![week],
            |row| row.get(0),
        )?;
        Ok(published)
    }

    /// 发布一周安排
    ///
    /// 单事务内标记该周所有行已发布，并记录各行节目类型。
    /// 已发布的 assigned 行即历史计数来源（见 RosterRepository::load_history），
    /// 覆盖重排时旧行被删除，其计数随之撤销。
    ///
    /// # 返回
    /// - Ok(usize): 计入历史的学员人次（主讲人 + 助手）
    /// - Err(NotFound): 该周没有安排
    /// - Err(InvalidStateTransition): 该周已发布
    pub fn publish_week(&self, week: NaiveDate) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let (total, published): (i64, i64) = tx.query_row(
            "SELECT COUNT(*), COALESCE(SUM(published), 0) FROM week_assignment WHERE week_start = ?1",
            params![week],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        if total == 0 {
            return Err(RepositoryError::NotFound {
                entity: "week_assignment".to_string(),
                id: week.to_string(),
            });
        }
        if published > 0 {
            return Err(RepositoryError::InvalidStateTransition {
                from: "published".to_string(),
                to: "published".to_string(),
            });
        }

        tx.execute(
            r#"
            UPDATE week_assignment
            SET published = 1,
                published_at = datetime('now'),
                part_type = (
                    SELECT mp.part_type FROM meeting_part mp
                    WHERE mp.week_start = week_assignment.week_start
                      AND mp.part_id = week_assignment.part_id
                )
            WHERE week_start = ?1
            "#,
            params![week],
        )?;

        let history_credits: i64 = tx.query_row(
            r#"
            SELECT COALESCE(SUM(
                (primary_student_id IS NOT NULL) + (assistant_student_id IS NOT NULL)
            ), 0)
            FROM week_assignment
            WHERE week_start = ?1 AND status = ?2 AND part_type IS NOT NULL
            "#,
            params![week, AssignmentStatus::Assigned.as_str()],
            |row| row.get(0),
        )?;

        tx.commit()?;

        info!(week = %week, history_credits, "周安排已发布");
        Ok(history_credits as usize)
    }

    /// 读取一周安排
    pub fn find_by_week(&self, week: NaiveDate) -> RepositoryResult<Option<StoredWeek>> {
        let conn = self.get_conn()?;

        let header: Option<(String, bool)> = conn
            .query_row(
                "SELECT generation_id, MAX(published) FROM week_assignment WHERE week_start = ?1 GROUP BY generation_id",
                params![week],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let (generation_id, published) = match header {
            Some(h) => h,
            None => return Ok(None),
        };

        let mut stmt = conn.prepare(
            r#"
            SELECT wa.part_id, wa.primary_student_id, wa.assistant_student_id, wa.status, wa.reason
            FROM week_assignment wa
            LEFT JOIN meeting_part mp
              ON mp.week_start = wa.week_start AND mp.part_id = wa.part_id
            WHERE wa.week_start = ?1
            ORDER BY mp.part_order, wa.part_id
            "#,
        )?;

        let rows = stmt
            .query_map(params![week], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let assignments = rows
            .into_iter()
            .map(|(part_id, primary, assistant, status, reason)| {
                let status = status
                    .parse::<AssignmentStatus>()
                    .map_err(|e| RepositoryError::field_value("week_assignment.status", e))?;
                let reason = reason
                    .map(|r| r.parse::<PendingReason>())
                    .transpose()
                    .map_err(|e| RepositoryError::field_value("week_assignment.reason", e))?;

                Ok(Assignment {
                    part_id,
                    week,
                    primary_student_id: primary,
                    assistant_student_id: assistant,
                    status,
                    reason,
                })
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok(Some(StoredWeek {
            week,
            generation_id,
            published,
            assignments,
        }))
    }
}

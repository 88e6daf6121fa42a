// ==========================================
// 会众聚会安排系统 - 节目单数据仓储
// ==========================================
// 职责: meeting_part 表读写（一周一份节目单）
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::program::{Part, Program, RawPart};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub struct ProgramRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProgramRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 保存一周节目单（整周替换，单事务）
    pub fn save_program(&self, program: &Program) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM meeting_part WHERE week_start = ?1",
            params![program.week_start],
        )?;

        let mut count = 0;
        for part in &program.parts {
            count += tx.execute(
                r#"
                INSERT INTO meeting_part (
                    week_start, part_id, section, part_type, part_order, duration_minutes,
                    gender_restriction, min_qualification, requires_assistant,
                    assistant_gender_must_match
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
                params![
                    program.week_start,
                    part.id,
                    part.section.as_str(),
                    part.part_type.as_str(),
                    part.order,
                    part.duration_minutes,
                    part.gender_restriction.as_str(),
                    part.min_qualification.map(|t| t.as_str()),
                    part.requires_assistant,
                    part.assistant_gender_must_match_restriction,
                ],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 读取一周节目单
    ///
    /// # 返回
    /// - Ok(Some(Program)): 按 order 升序
    /// - Ok(None): 该周无节目单
    pub fn find_by_week(&self, week_start: NaiveDate) -> RepositoryResult<Option<Program>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT part_id, section, part_type, part_order, duration_minutes,
                   gender_restriction, min_qualification, requires_assistant,
                   assistant_gender_must_match
            FROM meeting_part
            WHERE week_start = ?1
            ORDER BY part_order
            "#,
        )?;

        let raws = stmt
            .query_map(params![week_start], |row| {
                Ok(RawPart {
                    id: row.get(0)?,
                    section: row.get(1)?,
                    part_type: row.get(2)?,
                    order: row.get(3)?,
                    duration_minutes: row.get(4)?,
                    gender_restriction: row.get(5)?,
                    min_qualification: row.get(6)?,
                    requires_assistant: row.get(7)?,
                    assistant_gender_must_match_restriction: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if raws.is_empty() {
            return Ok(None);
        }

        let parts = raws
            .into_iter()
            .map(|raw| Part::try_from(raw).map_err(|e| RepositoryError::field_value("meeting_part", e)))
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok(Some(Program::new(week_start, parts)))
    }

    /// 已录入节目单的周（升序）
    pub fn list_weeks(&self) -> RepositoryResult<Vec<NaiveDate>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT DISTINCT week_start FROM meeting_part ORDER BY week_start")?;
        let weeks = stmt
            .query_map([], |row| row.get::<_, NaiveDate>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(weeks)
    }
}

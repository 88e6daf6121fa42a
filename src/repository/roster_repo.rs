// ==========================================
// 会众聚会安排系统 - 名册数据仓储
// ==========================================
// 职责: student / family_relation / assignment_history 表读写，历史汇总已发布周
// 红线: Repository 不含业务逻辑，只负责快照装载与写入
// ==========================================

use crate::domain::family::{pair_key, FamilyRelation, RawFamilyRelation};
use crate::domain::history::{HistoryRecord, HistorySnapshot};
use crate::domain::student::{RawStudent, RosterSnapshot, Student};
use crate::domain::types::{AssignmentStatus, PartType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// RosterRepository - 名册仓储
// ==========================================
pub struct RosterRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RosterRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ===== 学员 =====

    /// 批量写入学员（单事务，存在即覆盖）
    pub fn upsert_students(&self, students: &[Student]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for s in students {
            count += tx.execute(
                r#"
                INSERT INTO student (
                    student_id, display_name, gender, tier, birth_date, active, family_group_id
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(student_id) DO UPDATE SET
                    display_name = excluded.display_name,
                    gender = excluded.gender,
                    tier = excluded.tier,
                    birth_date = excluded.birth_date,
                    active = excluded.active,
                    family_group_id = excluded.family_group_id,
                    updated_at = datetime('now')
                "#,
                params![
                    s.id,
                    s.display_name,
                    s.gender.as_str(),
                    s.tier.as_str(),
                    s.birth_date,
                    s.active,
                    s.family_group_id,
                ],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 设置学员在册状态
    pub fn set_active(&self, student_id: &str, active: bool) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE student SET active = ?2, updated_at = datetime('now') WHERE student_id = ?1",
            params![student_id, active],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "student".to_string(),
                id: student_id.to_string(),
            });
        }
        Ok(())
    }

    /// 读取全部学员（按 id 排序）
    pub fn load_students(&self) -> RepositoryResult<Vec<Student>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT student_id, display_name, gender, tier, birth_date, active, family_group_id
            FROM student
            ORDER BY student_id
            "#,
        )?;

        let raws = stmt
            .query_map([], |row| {
                Ok(RawStudent {
                    id: row.get(0)?,
                    display_name: row.get(1)?,
                    gender: row.get(2)?,
                    tier: row.get(3)?,
                    birth_date: row.get(4)?,
                    active: row.get(5)?,
                    family_group_id: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raws.into_iter()
            .map(|raw| Student::try_from(raw).map_err(|e| RepositoryError::field_value("student", e)))
            .collect()
    }

    /// 装载名册快照
    pub fn load_roster(&self) -> RepositoryResult<RosterSnapshot> {
        Ok(RosterSnapshot::new(self.load_students()?))
    }

    // ===== 亲属关系 =====

    /// 写入亲属关系（按规范化键存储）
    pub fn upsert_relation(&self, relation: &FamilyRelation) -> RepositoryResult<()> {
        let (a, b) = relation.pair_key();
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO family_relation (student_a, student_b, kind) VALUES (?1, ?2, ?3)
            ON CONFLICT(student_a, student_b) DO UPDATE SET kind = excluded.kind
            "#,
            params![a, b, relation.kind.as_str()],
        )?;
        Ok(())
    }

    pub fn delete_relation(&self, student_a: &str, student_b: &str) -> RepositoryResult<bool> {
        let (a, b) = pair_key(student_a, student_b);
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM family_relation WHERE student_a = ?1 AND student_b = ?2",
            params![a, b],
        )?;
        Ok(affected > 0)
    }

    pub fn load_relations(&self) -> RepositoryResult<Vec<FamilyRelation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT student_a, student_b, kind FROM family_relation ORDER BY student_a, student_b",
        )?;

        let raws = stmt
            .query_map([], |row| {
                Ok(RawFamilyRelation {
                    student_a: row.get(0)?,
                    student_b: row.get(1)?,
                    kind: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raws.into_iter()
            .map(|raw| {
                FamilyRelation::try_from(raw)
                    .map_err(|e| RepositoryError::field_value("family_relation.kind", e))
            })
            .collect()
    }

    // ===== 安排历史 =====

    /// 写入历史基线（导入系统启用前的记录）
    pub fn upsert_history(&self, record: &HistoryRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO assignment_history (student_id, part_type, last_assigned, assign_count)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(student_id, part_type) DO UPDATE SET
                last_assigned = excluded.last_assigned,
                assign_count = excluded.assign_count
            "#,
            params![
                record.student_id,
                record.part_type.as_str(),
                record.last_assigned,
                record.count,
            ],
        )?;
        Ok(())
    }

    /// 读取有效历史 = 基线（assignment_history）+ 已发布周的 assigned 行
    ///
    /// 已发布周被覆盖重排时旧行已删除，因此同一周只计一次。
    pub fn load_history_records(&self) -> RepositoryResult<Vec<HistoryRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            WITH credit AS (
                SELECT primary_student_id AS student_id, part_type, week_start
                FROM week_assignment
                WHERE published = 1 AND status = ?1
                  AND part_type IS NOT NULL AND primary_student_id IS NOT NULL
                UNION ALL
                SELECT assistant_student_id AS student_id, part_type, week_start
                FROM week_assignment
                WHERE published = 1 AND status = ?1
                  AND part_type IS NOT NULL AND assistant_student_id IS NOT NULL
            ),
            combined AS (
                SELECT student_id, part_type, last_assigned, assign_count
                FROM assignment_history
                UNION ALL
                SELECT student_id, part_type, MAX(week_start), COUNT(*)
                FROM credit
                GROUP BY student_id, part_type
            )
            SELECT student_id, part_type, MAX(last_assigned), SUM(assign_count)
            FROM combined
            GROUP BY student_id, part_type
            ORDER BY student_id, part_type
            "#,
        )?;

        let rows = stmt
            .query_map(params![AssignmentStatus::Assigned.as_str()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<NaiveDate>>(2)?,
                    row.get::<_, u32>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(student_id, part_type, last_assigned, count)| {
                let part_type = part_type
                    .parse::<PartType>()
                    .map_err(|e| RepositoryError::field_value("assignment_history.part_type", e))?;
                Ok(HistoryRecord {
                    student_id,
                    part_type,
                    last_assigned,
                    count,
                })
            })
            .collect()
    }

    /// 装载历史快照
    pub fn load_history(&self) -> RepositoryResult<HistorySnapshot> {
        Ok(HistorySnapshot::from_records(self.load_history_records()?))
    }
}

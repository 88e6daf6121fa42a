// ==========================================
// 会众聚会安排系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键每个连接单独开启）
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供建表入口（幂等）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（IF NOT EXISTS，可重复调用）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS student (
            student_id      TEXT PRIMARY KEY,
            display_name    TEXT NOT NULL,
            gender          TEXT NOT NULL,
            tier            TEXT NOT NULL,
            birth_date      TEXT,
            active          INTEGER NOT NULL DEFAULT 1,
            family_group_id TEXT,
            updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS family_relation (
            student_a TEXT NOT NULL REFERENCES student(student_id) ON DELETE CASCADE,
            student_b TEXT NOT NULL REFERENCES student(student_id) ON DELETE CASCADE,
            kind      TEXT NOT NULL,
            PRIMARY KEY (student_a, student_b),
            CHECK (student_a < student_b)
        );

        CREATE TABLE IF NOT EXISTS meeting_part (
            week_start                  TEXT NOT NULL,
            part_id                     TEXT NOT NULL,
            section                     TEXT NOT NULL,
            part_type                   TEXT NOT NULL,
            part_order                  INTEGER NOT NULL,
            duration_minutes            INTEGER NOT NULL,
            gender_restriction          TEXT NOT NULL,
            min_qualification           TEXT,
            requires_assistant          INTEGER NOT NULL,
            assistant_gender_must_match INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (week_start, part_id),
            UNIQUE (week_start, part_order)
        );

        -- 系统启用前的历史基线；已发布周的计数由 week_assignment 汇总
        CREATE TABLE IF NOT EXISTS assignment_history (
            student_id    TEXT NOT NULL REFERENCES student(student_id) ON DELETE CASCADE,
            part_type     TEXT NOT NULL,
            last_assigned TEXT,
            assign_count  INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (student_id, part_type)
        );

        CREATE TABLE IF NOT EXISTS week_assignment (
            week_start           TEXT NOT NULL,
            part_id              TEXT NOT NULL,
            generation_id        TEXT NOT NULL,
            primary_student_id   TEXT REFERENCES student(student_id),
            assistant_student_id TEXT REFERENCES student(student_id),
            status               TEXT NOT NULL,
            reason               TEXT,
            part_type            TEXT,
            published            INTEGER NOT NULL DEFAULT 0,
            created_at           TEXT NOT NULL DEFAULT (datetime('now')),
            published_at         TEXT,
            PRIMARY KEY (week_start, part_id)
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id   TEXT NOT NULL,
            key        TEXT NOT NULL,
            value      TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

// 开发用小工具：初始化一个演示数据库（学员名册 + 亲属关系 + 历史 + 一周节目单）
//
// 用法:
//   cargo run --bin seed_demo_db -- [db_path] [week_start]
//
// 已存在的同名学员/节目会被覆盖，历史按 (学员, 节目类型) 覆盖写入。

use assignment_engine::db::{init_schema, open_sqlite_connection};
use assignment_engine::domain::{
    FamilyRelation, Gender, HistoryRecord, Part, PartType, Program, QualificationTier,
    RelationKind, Student,
};
use assignment_engine::repository::{ProgramRepository, RosterRepository};
use chrono::{Duration, NaiveDate};
use std::sync::{Arc, Mutex};

fn student(id: &str, name: &str, gender: Gender, tier: QualificationTier) -> Student {
    Student {
        id: id.to_string(),
        display_name: name.to_string(),
        gender,
        tier,
        birth_date: None,
        active: true,
        family_group_id: None,
    }
}

fn demo_students() -> Vec<Student> {
    use Gender::{Female, Male};
    use QualificationTier::*;

    vec![
        student("e01", "陈长老", Male, Elder),
        student("e02", "林长老", Male, Elder),
        student("m01", "王弟兄", Male, MinisterialServant),
        student("m02", "赵弟兄", Male, MinisterialServant),
        student("b01", "刘弟兄", Male, BaptizedPublisher),
        student("b02", "刘姊妹", Female, BaptizedPublisher),
        student("b03", "周姊妹", Female, BaptizedPublisher),
        student("b04", "吴姊妹", Female, BaptizedPublisher),
        student("u01", "郑姊妹", Female, UnbaptizedPublisher),
        student("u02", "孙弟兄", Male, UnbaptizedPublisher),
        student("n01", "刘小妹", Female, NewStudent),
        student("n02", "黄弟兄", Male, NewStudent),
    ]
}

fn demo_relations() -> Vec<FamilyRelation> {
    vec![
        FamilyRelation::new("b01", "b02", RelationKind::Spouse),
        FamilyRelation::new("b02", "n01", RelationKind::ParentChild),
        FamilyRelation::new("b01", "n01", RelationKind::ParentChild),
        FamilyRelation::new("b03", "b04", RelationKind::Sibling),
    ]
}

fn demo_program(week: NaiveDate) -> Program {
    Program::new(
        week,
        vec![
            Part::from_catalog("treasures-talk", PartType::TreasuresTalk, 1, 10),
            Part::from_catalog("spiritual-gems", PartType::SpiritualGems, 2, 10),
            Part::from_catalog("bible-reading", PartType::BibleReading, 3, 4),
            Part::from_catalog("initial-call", PartType::InitialCall, 4, 3),
            Part::from_catalog("return-visit", PartType::ReturnVisit, 5, 4),
            Part::from_catalog("bible-study", PartType::BibleStudy, 6, 5),
            Part::from_catalog("cbs", PartType::CongregationBibleStudy, 7, 30),
        ],
    )
}

fn demo_history(week: NaiveDate) -> Vec<HistoryRecord> {
    let record = |id: &str, part_type: PartType, weeks_ago: i64, count: u32| HistoryRecord {
        student_id: id.to_string(),
        part_type,
        last_assigned: Some(week - Duration::weeks(weeks_ago)),
        count,
    };

    vec![
        record("e01", PartType::TreasuresTalk, 1, 6),
        record("e02", PartType::TreasuresTalk, 4, 5),
        record("m01", PartType::SpiritualGems, 2, 3),
        record("u02", PartType::BibleReading, 6, 2),
        record("b02", PartType::InitialCall, 1, 4),
        record("b03", PartType::InitialCall, 8, 2),
        record("e01", PartType::CongregationBibleStudy, 3, 9),
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let db_path = args
        .next()
        .unwrap_or_else(|| "assignment_engine.db".to_string());
    let week = match args.next().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")?,
        None => NaiveDate::from_ymd_opt(2026, 3, 2).ok_or("invalid default week")?,
    };

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    let roster_repo = RosterRepository::new(conn.clone());
    let students = roster_repo.upsert_students(&demo_students())?;
    for relation in demo_relations() {
        roster_repo.upsert_relation(&relation)?;
    }
    for record in demo_history(week) {
        roster_repo.upsert_history(&record)?;
    }

    let parts = ProgramRepository::new(conn).save_program(&demo_program(week))?;

    println!("db_path={} week={} students={} parts={}", db_path, week, students, parts);
    Ok(())
}

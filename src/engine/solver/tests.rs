use super::*;
use crate::config::EngineConfig;
use crate::domain::assignment::{DiagnosticKind, DiagnosticSeverity};
use crate::domain::history::HistoryEntry;
use crate::domain::program::Part;
use crate::domain::student::Student;
use crate::domain::types::{
    AssignmentStatus, Gender, GenderRestriction, PartType, PendingReason, QualificationTier,
    RelationKind, RunStatus,
};
use crate::engine::error::EngineError;
use crate::engine::family::FamilyGraph;
use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

// ==========================================
// 测试辅助函数
// ==========================================

fn week() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

fn weeks_ago(n: i64) -> NaiveDate {
    week() - Duration::weeks(n)
}

fn student(id: &str, gender: Gender, tier: QualificationTier) -> Student {
    Student {
        id: id.to_string(),
        display_name: id.to_string(),
        gender,
        tier,
        birth_date: None,
        active: true,
        family_group_id: None,
    }
}

fn history_of(entries: &[(&str, PartType, NaiveDate, u32)]) -> HistorySnapshot {
    let mut history = HistorySnapshot::new();
    for (id, part_type, last, count) in entries {
        history.insert(
            id,
            *part_type,
            HistoryEntry {
                last_assigned: Some(*last),
                count: *count,
            },
        );
    }
    history
}

/// 一周典型节目单
fn full_program() -> Program {
    Program::new(
        week(),
        vec![
            Part::from_catalog("treasures_talk", PartType::TreasuresTalk, 1, 10),
            Part::from_catalog("gems", PartType::SpiritualGems, 2, 10),
            Part::from_catalog("reading", PartType::BibleReading, 3, 4),
            Part::from_catalog("initial_call", PartType::InitialCall, 4, 3),
            Part::from_catalog("return_visit", PartType::ReturnVisit, 5, 4),
            Part::from_catalog("talk", PartType::Talk, 6, 5),
            Part::from_catalog("cbs", PartType::CongregationBibleStudy, 7, 30),
        ],
    )
}

fn full_roster() -> RosterSnapshot {
    RosterSnapshot::new(vec![
        student("e1", Gender::Male, QualificationTier::Elder),
        student("e2", Gender::Male, QualificationTier::Elder),
        student("ms1", Gender::Male, QualificationTier::MinisterialServant),
        student("m1", Gender::Male, QualificationTier::BaptizedPublisher),
        student("m2", Gender::Male, QualificationTier::UnbaptizedPublisher),
        student("f1", Gender::Female, QualificationTier::BaptizedPublisher),
        student("f2", Gender::Female, QualificationTier::BaptizedPublisher),
        student("f3", Gender::Female, QualificationTier::NewStudent),
        student("f4", Gender::Female, QualificationTier::UnbaptizedPublisher),
    ])
}

fn primary_of<'a>(result: &'a AssignmentRunResult, part_id: &str) -> Option<&'a str> {
    result
        .find_by_part(part_id)
        .and_then(|a| a.primary_student_id.as_deref())
}

// ==========================================
// 典型场景
// ==========================================

#[test]
fn test_least_recent_elder_selected() {
    let program = Program::new(
        week(),
        vec![Part::from_catalog("cbs", PartType::CongregationBibleStudy, 1, 30)],
    );
    let roster = RosterSnapshot::new(vec![
        student("E1", Gender::Male, QualificationTier::Elder),
        student("E2", Gender::Male, QualificationTier::Elder),
    ]);
    let history = history_of(&[
        ("E1", PartType::CongregationBibleStudy, weeks_ago(2), 3),
        ("E2", PartType::CongregationBibleStudy, weeks_ago(5), 3),
    ]);

    let result = generate_assignments(&program, &roster, &history, &[]).unwrap();

    assert_eq!(primary_of(&result, "cbs"), Some("E2"));
    assert_eq!(result.status, RunStatus::Complete);
}

#[test]
fn test_unrelated_mixed_pair_leaves_part_pending() {
    let program = Program::new(
        week(),
        vec![Part::from_catalog("demo", PartType::Demonstration, 1, 2)],
    );
    let roster = RosterSnapshot::new(vec![
        student("M1", Gender::Male, QualificationTier::BaptizedPublisher),
        student("F1", Gender::Female, QualificationTier::BaptizedPublisher),
    ]);
    // F1 最近做过，M1 排名靠前
    let history = history_of(&[("F1", PartType::Demonstration, weeks_ago(1), 1)]);

    let result = generate_assignments(&program, &roster, &history, &[]).unwrap();

    let demo = result.find_by_part("demo").unwrap();
    assert_eq!(demo.status, AssignmentStatus::Pending);
    assert_eq!(demo.reason, Some(PendingReason::NoFamilySafeAssistant));
    assert_eq!(demo.primary_student_id.as_deref(), Some("M1"));
    assert_eq!(demo.assistant_student_id, None);
    assert_eq!(result.status, RunStatus::Partial);

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::NoFamilySafeAssistant);
    assert_eq!(result.diagnostics[0].severity, DiagnosticSeverity::Error);
}

#[test]
fn test_single_elder_cannot_take_two_parts() {
    let mut second = Part::from_catalog("cbs_2", PartType::CongregationBibleStudy, 2, 30);
    second.duration_minutes = 15;
    let program = Program::new(
        week(),
        vec![
            Part::from_catalog("cbs_1", PartType::CongregationBibleStudy, 1, 30),
            second,
        ],
    );
    let roster = RosterSnapshot::new(vec![
        student("E1", Gender::Male, QualificationTier::Elder),
        student("M1", Gender::Male, QualificationTier::BaptizedPublisher),
    ]);

    let result = generate_assignments(&program, &roster, &HistorySnapshot::new(), &[]).unwrap();

    assert_eq!(primary_of(&result, "cbs_1"), Some("E1"));
    let second = result.find_by_part("cbs_2").unwrap();
    assert!(second.is_pending());
    assert_eq!(second.reason, Some(PendingReason::NoEligibleCandidate));
    assert_eq!(second.primary_student_id, None);
    assert_eq!(result.status, RunStatus::Partial);
}

#[test]
fn test_duplicate_order_rejected_before_solving() {
    let program = Program::new(
        week(),
        vec![
            Part::from_catalog("reading", PartType::BibleReading, 1, 4),
            Part::from_catalog("talk", PartType::Talk, 1, 5),
        ],
    );

    let err = generate_assignments(&program, &full_roster(), &HistorySnapshot::new(), &[])
        .unwrap_err();

    assert!(matches!(err, EngineError::DuplicatePartOrder { order: 1, .. }));
}

// ==========================================
// 前置校验
// ==========================================

#[test]
fn test_empty_active_roster_rejected() {
    let mut inactive = student("m1", Gender::Male, QualificationTier::Elder);
    inactive.active = false;

    let err = generate_assignments(
        &full_program(),
        &RosterSnapshot::new(vec![inactive]),
        &HistorySnapshot::new(),
        &[],
    )
    .unwrap_err();

    assert_eq!(err, EngineError::EmptyActiveRoster);
}

#[test]
fn test_conflicting_relation_rejected() {
    let relations = vec![
        FamilyRelation::new("m1", "f1", RelationKind::Spouse),
        FamilyRelation::new("f1", "m1", RelationKind::Sibling),
    ];

    let err = generate_assignments(&full_program(), &full_roster(), &HistorySnapshot::new(), &relations)
        .unwrap_err();

    assert!(matches!(err, EngineError::ConflictingFamilyRelation { .. }));
}

#[test]
fn test_empty_program_is_complete() {
    let result = generate_assignments(
        &Program::new(week(), vec![]),
        &full_roster(),
        &HistorySnapshot::new(),
        &[],
    )
    .unwrap();

    assert!(result.assignments.is_empty());
    assert!(result.is_complete());
    assert_eq!(result.statistics.total_parts, 0);
}

// ==========================================
// 规则不变量
// ==========================================

#[test]
fn test_full_week_respects_rules() {
    let program = full_program();
    let roster = full_roster();
    let relations = vec![FamilyRelation::new("m1", "f1", RelationKind::Spouse)];

    let result =
        generate_assignments(&program, &roster, &HistorySnapshot::new(), &relations).unwrap();

    assert_eq!(result.assignments.len(), program.parts.len());

    let graph = FamilyGraph::build(&relations).unwrap();
    let mut seen = HashSet::new();

    for part in &program.parts {
        let assignment = result.find_by_part(&part.id).unwrap();

        for id in assignment.student_ids() {
            assert!(seen.insert(id.to_string()), "学员 {} 被重复安排", id);
        }

        let primary = match assignment.primary_student_id.as_deref() {
            Some(id) => roster.get(id).unwrap(),
            None => continue,
        };
        assert!(primary.active);
        assert!(part.gender_restriction.permits(primary.gender));
        if let Some(min) = part.min_qualification {
            assert!(primary.tier >= min);
        }

        if let Some(assistant_id) = assignment.assistant_student_id.as_deref() {
            let assistant = roster.get(assistant_id).unwrap();
            if assistant.gender != primary.gender {
                let kind = graph.relation(&primary.id, &assistant.id).unwrap();
                assert!(kind.is_immediate_family());
            }
        }
    }
}

#[test]
fn test_assignments_follow_part_order() {
    // 节目单乱序给出，结果按 order 升序
    let program = Program::new(
        week(),
        vec![
            Part::from_catalog("talk", PartType::Talk, 3, 5),
            Part::from_catalog("reading", PartType::BibleReading, 1, 4),
            Part::from_catalog("gems", PartType::SpiritualGems, 2, 10),
        ],
    );

    let result =
        generate_assignments(&program, &full_roster(), &HistorySnapshot::new(), &[]).unwrap();

    let ids: Vec<&str> = result.assignments.iter().map(|a| a.part_id.as_str()).collect();
    assert_eq!(ids, vec!["reading", "gems", "talk"]);
}

#[test]
fn test_earlier_part_gets_first_pick() {
    // 两名长老，先排的节目拿走轮换第一名
    let program = Program::new(
        week(),
        vec![
            Part::from_catalog("gems", PartType::SpiritualGems, 2, 10),
            Part::from_catalog("treasures_talk", PartType::TreasuresTalk, 1, 10),
        ],
    );
    let roster = RosterSnapshot::new(vec![
        student("e1", Gender::Male, QualificationTier::Elder),
        student("e2", Gender::Male, QualificationTier::Elder),
    ]);

    let result = generate_assignments(&program, &roster, &HistorySnapshot::new(), &[]).unwrap();

    assert_eq!(primary_of(&result, "treasures_talk"), Some("e1"));
    assert_eq!(primary_of(&result, "gems"), Some("e2"));
}

#[test]
fn test_inactive_student_never_selected() {
    let program = Program::new(
        week(),
        vec![Part::from_catalog("reading", PartType::BibleReading, 1, 4)],
    );
    let mut inactive = student("a_inactive", Gender::Male, QualificationTier::Elder);
    inactive.active = false;
    let roster = RosterSnapshot::new(vec![
        inactive,
        student("m9", Gender::Male, QualificationTier::UnbaptizedPublisher),
    ]);

    let result = generate_assignments(&program, &roster, &HistorySnapshot::new(), &[]).unwrap();

    assert_eq!(primary_of(&result, "reading"), Some("m9"));
}

#[test]
fn test_spouse_pair_allowed_for_mixed_demonstration() {
    let program = Program::new(
        week(),
        vec![Part::from_catalog("demo", PartType::Demonstration, 1, 2)],
    );
    let roster = RosterSnapshot::new(vec![
        student("m1", Gender::Male, QualificationTier::BaptizedPublisher),
        student("f1", Gender::Female, QualificationTier::BaptizedPublisher),
    ]);
    let relations = vec![FamilyRelation::new("f1", "m1", RelationKind::Spouse)];

    let result =
        generate_assignments(&program, &roster, &HistorySnapshot::new(), &relations).unwrap();

    let demo = result.find_by_part("demo").unwrap();
    assert_eq!(demo.status, AssignmentStatus::Assigned);
    assert_eq!(demo.primary_student_id.as_deref(), Some("f1"));
    assert_eq!(demo.assistant_student_id.as_deref(), Some("m1"));
    assert_eq!(result.statistics.family_pairs, 1);
}

#[test]
fn test_same_gender_assistant_preferred_over_unrelated() {
    let program = Program::new(
        week(),
        vec![Part::from_catalog("call", PartType::InitialCall, 1, 3)],
    );
    // 排名: f1 主讲 → 助手候选 m1 (无关系, 排前) 被跳过, 选 f2
    let roster = RosterSnapshot::new(vec![
        student("f1", Gender::Female, QualificationTier::NewStudent),
        student("f2", Gender::Female, QualificationTier::NewStudent),
        student("m1", Gender::Male, QualificationTier::NewStudent),
    ]);
    let history = history_of(&[("f2", PartType::InitialCall, weeks_ago(3), 1)]);

    let result = generate_assignments(&program, &roster, &history, &[]).unwrap();

    let call = result.find_by_part("call").unwrap();
    assert_eq!(call.primary_student_id.as_deref(), Some("f1"));
    assert_eq!(call.assistant_student_id.as_deref(), Some("f2"));
    assert!(result.is_complete());
}

#[test]
fn test_assistant_not_double_booked_across_parts() {
    let program = Program::new(
        week(),
        vec![
            Part::from_catalog("call", PartType::InitialCall, 1, 3),
            Part::from_catalog("visit", PartType::ReturnVisit, 2, 4),
        ],
    );
    let roster = RosterSnapshot::new(vec![
        student("f1", Gender::Female, QualificationTier::NewStudent),
        student("f2", Gender::Female, QualificationTier::NewStudent),
        student("f3", Gender::Female, QualificationTier::NewStudent),
    ]);

    let result = generate_assignments(&program, &roster, &HistorySnapshot::new(), &[]).unwrap();

    let call = result.find_by_part("call").unwrap();
    assert_eq!(call.primary_student_id.as_deref(), Some("f1"));
    assert_eq!(call.assistant_student_id.as_deref(), Some("f2"));

    let visit = result.find_by_part("visit").unwrap();
    assert_eq!(visit.primary_student_id.as_deref(), Some("f3"));
    assert_eq!(visit.reason, Some(PendingReason::NoFamilySafeAssistant));
}

#[test]
fn test_pending_primary_still_blocks_later_parts() {
    let program = Program::new(
        week(),
        vec![
            Part::from_catalog("demo", PartType::Demonstration, 1, 2),
            Part::from_catalog("reading", PartType::BibleReading, 2, 4),
        ],
    );
    let roster = RosterSnapshot::new(vec![
        student("m1", Gender::Male, QualificationTier::BaptizedPublisher),
        student("f1", Gender::Female, QualificationTier::BaptizedPublisher),
    ]);
    let history = history_of(&[("f1", PartType::Demonstration, weeks_ago(1), 1)]);

    let result = generate_assignments(&program, &roster, &history, &[]).unwrap();

    assert_eq!(primary_of(&result, "demo"), Some("m1"));
    let reading = result.find_by_part("reading").unwrap();
    assert_eq!(reading.reason, Some(PendingReason::NoEligibleCandidate));
}

// ==========================================
// other_supervised 关系
// ==========================================

#[test]
fn test_other_supervised_fails_closed_by_default() {
    let program = Program::new(
        week(),
        vec![Part::from_catalog("demo", PartType::Demonstration, 1, 2)],
    );
    let roster = RosterSnapshot::new(vec![
        student("f1", Gender::Female, QualificationTier::BaptizedPublisher),
        student("m1", Gender::Male, QualificationTier::NewStudent),
    ]);
    let relations = vec![FamilyRelation::new("f1", "m1", RelationKind::OtherSupervised)];

    let result =
        generate_assignments(&program, &roster, &HistorySnapshot::new(), &relations).unwrap();
    assert_eq!(
        result.find_by_part("demo").unwrap().reason,
        Some(PendingReason::NoFamilySafeAssistant)
    );

    let permissive = AssignmentSolver::new(EngineConfig {
        other_supervised_counts_as_family: true,
        ..EngineConfig::default()
    });
    let result = permissive
        .solve(
            &program,
            &roster,
            &HistorySnapshot::new(),
            &relations,
            &GenerationOptions::default(),
        )
        .unwrap();
    assert!(result.is_complete());
    assert_eq!(
        result.find_by_part("demo").unwrap().assistant_student_id.as_deref(),
        Some("m1")
    );
}

// ==========================================
// 公平轮换
// ==========================================

#[test]
fn test_never_assigned_beats_assigned() {
    let program = Program::new(
        week(),
        vec![Part::from_catalog("reading", PartType::BibleReading, 1, 4)],
    );
    let roster = RosterSnapshot::new(vec![
        student("a", Gender::Male, QualificationTier::BaptizedPublisher),
        student("b", Gender::Male, QualificationTier::BaptizedPublisher),
    ]);
    let history = history_of(&[("a", PartType::BibleReading, weeks_ago(50), 1)]);

    let result = generate_assignments(&program, &roster, &history, &[]).unwrap();

    assert_eq!(primary_of(&result, "reading"), Some("b"));
}

#[test]
fn test_history_of_other_part_type_ignored() {
    let program = Program::new(
        week(),
        vec![Part::from_catalog("reading", PartType::BibleReading, 1, 4)],
    );
    let roster = RosterSnapshot::new(vec![
        student("a", Gender::Male, QualificationTier::BaptizedPublisher),
        student("b", Gender::Male, QualificationTier::BaptizedPublisher),
    ]);
    // a 刚做过演讲，但朗读从未安排过，按 id 取 a
    let history = history_of(&[
        ("a", PartType::Talk, weeks_ago(1), 5),
        ("b", PartType::BibleReading, weeks_ago(10), 1),
    ]);

    let result = generate_assignments(&program, &roster, &history, &[]).unwrap();

    assert_eq!(primary_of(&result, "reading"), Some("a"));
}

#[test]
fn test_recent_assignment_produces_warning_only() {
    let program = Program::new(
        week(),
        vec![Part::from_catalog("cbs", PartType::CongregationBibleStudy, 1, 30)],
    );
    let roster = RosterSnapshot::new(vec![student("e1", Gender::Male, QualificationTier::Elder)]);
    let history = history_of(&[(
        "e1",
        PartType::CongregationBibleStudy,
        week() - Duration::days(7),
        4,
    )]);

    let result = generate_assignments(&program, &roster, &history, &[]).unwrap();

    assert_eq!(primary_of(&result, "cbs"), Some("e1"));
    assert!(result.is_complete());
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].severity, DiagnosticSeverity::Warning);
    assert_eq!(
        result.diagnostics[0].kind,
        DiagnosticKind::RecentAssignment {
            student_id: "e1".to_string(),
            days_since: 7,
        }
    );
}

#[test]
fn test_history_after_week_start_not_flagged_recent() {
    let program = Program::new(
        week(),
        vec![Part::from_catalog("cbs", PartType::CongregationBibleStudy, 1, 30)],
    );
    let roster = RosterSnapshot::new(vec![student("e1", Gender::Male, QualificationTier::Elder)]);
    let history = history_of(&[(
        "e1",
        PartType::CongregationBibleStudy,
        week() + Duration::days(7),
        2,
    )]);

    let result = generate_assignments(&program, &roster, &history, &[]).unwrap();

    assert_eq!(primary_of(&result, "cbs"), Some("e1"));
    assert!(result.is_complete());
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_recent_warning_threshold_configurable() {
    let program = Program::new(
        week(),
        vec![Part::from_catalog("cbs", PartType::CongregationBibleStudy, 1, 30)],
    );
    let roster = RosterSnapshot::new(vec![student("e1", Gender::Male, QualificationTier::Elder)]);
    let history = history_of(&[(
        "e1",
        PartType::CongregationBibleStudy,
        week() - Duration::days(7),
        4,
    )]);

    let solver = AssignmentSolver::new(EngineConfig {
        recent_assignment_warning_days: 7,
        ..EngineConfig::default()
    });
    let result = solver
        .solve(&program, &roster, &history, &[], &GenerationOptions::default())
        .unwrap();

    assert!(result.diagnostics.is_empty());
}

// ==========================================
// 调用方选项 / 配置
// ==========================================

#[test]
fn test_excluded_students_are_skipped() {
    let program = Program::new(
        week(),
        vec![Part::from_catalog("cbs", PartType::CongregationBibleStudy, 1, 30)],
    );
    let roster = RosterSnapshot::new(vec![
        student("e1", Gender::Male, QualificationTier::Elder),
        student("e2", Gender::Male, QualificationTier::Elder),
    ]);
    let options = GenerationOptions {
        excluded_student_ids: ["e1".to_string()].into_iter().collect(),
    };

    let result = AssignmentSolver::default()
        .solve(&program, &roster, &HistorySnapshot::new(), &[], &options)
        .unwrap();

    assert_eq!(primary_of(&result, "cbs"), Some("e2"));
}

#[test]
fn test_reassignment_override_allows_reuse_across_parts() {
    let program = Program::new(
        week(),
        vec![
            Part::from_catalog("cbs_1", PartType::CongregationBibleStudy, 1, 30),
            Part::from_catalog("cbs_2", PartType::CongregationBibleStudy, 2, 15),
        ],
    );
    let roster = RosterSnapshot::new(vec![student("e1", Gender::Male, QualificationTier::Elder)]);

    let solver = AssignmentSolver::new(EngineConfig {
        reassignment_override: true,
        ..EngineConfig::default()
    });
    let result = solver
        .solve(
            &program,
            &roster,
            &HistorySnapshot::new(),
            &[],
            &GenerationOptions::default(),
        )
        .unwrap();

    assert!(result.is_complete());
    assert_eq!(primary_of(&result, "cbs_1"), Some("e1"));
    assert_eq!(primary_of(&result, "cbs_2"), Some("e1"));
}

#[test]
fn test_reassignment_override_keeps_primary_and_assistant_distinct() {
    let program = Program::new(
        week(),
        vec![Part::from_catalog("call", PartType::InitialCall, 1, 3)],
    );
    let roster =
        RosterSnapshot::new(vec![student("f1", Gender::Female, QualificationTier::NewStudent)]);

    let solver = AssignmentSolver::new(EngineConfig {
        reassignment_override: true,
        ..EngineConfig::default()
    });
    let result = solver
        .solve(
            &program,
            &roster,
            &HistorySnapshot::new(),
            &[],
            &GenerationOptions::default(),
        )
        .unwrap();

    let call = result.find_by_part("call").unwrap();
    assert_eq!(call.primary_student_id.as_deref(), Some("f1"));
    assert_eq!(call.reason, Some(PendingReason::NoFamilySafeAssistant));
}

// ==========================================
// 确定性
// ==========================================

#[test]
fn test_identical_inputs_identical_output() {
    let program = full_program();
    let roster = full_roster();
    let relations = vec![
        FamilyRelation::new("m1", "f1", RelationKind::Spouse),
        FamilyRelation::new("m2", "f4", RelationKind::Sibling),
    ];
    let history = history_of(&[
        ("e1", PartType::TreasuresTalk, weeks_ago(3), 2),
        ("f2", PartType::InitialCall, weeks_ago(1), 4),
        ("m2", PartType::BibleReading, weeks_ago(6), 1),
    ]);

    let first = generate_assignments(&program, &roster, &history, &relations).unwrap();
    let second = generate_assignments(&program, &roster, &history, &relations).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_roster_order_does_not_change_result() {
    let program = full_program();
    let roster = full_roster();
    let mut reversed: Vec<Student> = roster.students().to_vec();
    reversed.reverse();

    let a = generate_assignments(&program, &roster, &HistorySnapshot::new(), &[]).unwrap();
    let b = generate_assignments(
        &program,
        &RosterSnapshot::new(reversed),
        &HistorySnapshot::new(),
        &[],
    )
    .unwrap();

    assert_eq!(a.assignments, b.assignments);
}

#[test]
fn test_gender_restricted_part_with_only_women_is_pending() {
    let mut talk = Part::from_catalog("talk", PartType::Talk, 1, 5);
    talk.gender_restriction = GenderRestriction::Male;
    let program = Program::new(week(), vec![talk]);
    let roster = RosterSnapshot::new(vec![
        student("f1", Gender::Female, QualificationTier::Elder),
        student("f2", Gender::Female, QualificationTier::BaptizedPublisher),
    ]);

    let result = generate_assignments(&program, &roster, &HistorySnapshot::new(), &[]).unwrap();

    assert_eq!(
        result.find_by_part("talk").unwrap().reason,
        Some(PendingReason::NoEligibleCandidate)
    );
    assert_eq!(result.statistics.pending_count, 1);
}

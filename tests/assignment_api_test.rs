// ==========================================
// 周安排 API 集成测试
// ==========================================
// 职责: 验证 生成 → 保存 → 发布 → 下周轮换 的完整流程与并发/状态保护
// ==========================================


#[cfg(test)]
mod assignment_api_test {
    use assignment_engine::api::{ApiError, AssignmentApi};
    use assignment_engine::config::{config_keys, ConfigManager};
    use assignment_engine::domain::{
        AssignmentRunResult, DiagnosticKind, HistoryRecord, Part, PartType, Program,
    };
    use assignment_engine::engine::EngineError;
    use assignment_engine::logging;
    use assignment_engine::repository::RosterRepository;
    use std::collections::BTreeMap;
    use tempfile::NamedTempFile;

    use crate::test_helpers::{
        create_test_db, open_shared, primary_of, seed_program, seed_roster, standard_program,
        standard_roster, week, weeks_after, StudentBuilder,
    };

    // ==========================================
    // 测试辅助函数
    // ==========================================

    /// 标准名册 + 本周节目单
    fn setup_standard() -> (NamedTempFile, String, AssignmentApi) {
        logging::init_test();
        let (temp_file, db_path) = create_test_db().unwrap();

        let conn = open_shared(&db_path);
        seed_roster(conn.clone(), &standard_roster(), &[], &[]);
        seed_program(conn, &standard_program(week()));

        let api = AssignmentApi::open(&db_path).unwrap();
        (temp_file, db_path, api)
    }

    // ==========================================
    // 生成 / 预览
    // ==========================================

    #[tokio::test]
    async fn test_generate_persists_week() {
        let (_tmp, _db_path, api) = setup_standard();

        let (generation_id, result) = api.generate_week(week(), false).await.unwrap();
        assert!(!generation_id.is_empty());

        let stored = api.find_week(week()).unwrap().unwrap();
        assert_eq!(stored.generation_id, generation_id);
        assert!(!stored.published);
        assert_eq!(stored.assignments, result.assignments);
    }

    #[tokio::test]
    async fn test_preview_does_not_persist() {
        let (_tmp, _db_path, api) = setup_standard();

        let preview = api.preview_week(week()).await.unwrap();
        assert_eq!(preview.assignments.len(), 3);
        assert!(api.find_week(week()).unwrap().is_none());

        // 预览与生成使用同一套规则
        let (_, generated) = api.generate_week(week(), false).await.unwrap();
        assert_eq!(preview, generated);
    }

    #[tokio::test]
    async fn test_regenerate_replaces_unpublished_week() {
        let (_tmp, _db_path, api) = setup_standard();

        let (first_id, _) = api.generate_week(week(), false).await.unwrap();
        let (second_id, _) = api.generate_week(week(), false).await.unwrap();
        assert_ne!(first_id, second_id);

        let stored = api.find_week(week()).unwrap().unwrap();
        assert_eq!(stored.generation_id, second_id);
        assert_eq!(stored.assignments.len(), 3);
    }

    // ==========================================
    // 发布
    // ==========================================

    #[tokio::test]
    async fn test_published_week_requires_overwrite() {
        let (_tmp, _db_path, api) = setup_standard();

        api.generate_week(week(), false).await.unwrap();
        // b1 朗读 + e1/e2 开始交谈；研经班 pending 不计入
        assert_eq!(api.publish_week(week()).await.unwrap(), 3);
        assert!(api.find_week(week()).unwrap().unwrap().published);

        let err = api.generate_week(week(), false).await.unwrap_err();
        assert!(matches!(err, ApiError::WeekAlreadyPublished { .. }), "{:?}", err);

        let err = api.publish_week(week()).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidStateTransition { .. }), "{:?}", err);

        let (_, overwritten) = api.generate_week(week(), true).await.unwrap();
        assert!(!api.find_week(week()).unwrap().unwrap().published);
        assert_ne!(primary_of(&overwritten, "reading"), Some("b1"));
    }

    #[tokio::test]
    async fn test_republish_after_overwrite_counts_week_once() {
        let (_tmp, db_path, api) = setup_standard();
        let roster_repo = RosterRepository::new(open_shared(&db_path));

        api.generate_week(week(), false).await.unwrap();
        api.publish_week(week()).await.unwrap();

        let (_, overwritten) = api.generate_week(week(), true).await.unwrap();
        let credits = api.publish_week(week()).await.unwrap();

        // 期望的历史只来自覆盖后的这一版
        let program = standard_program(week());
        let mut expected: BTreeMap<PartType, u32> = BTreeMap::new();
        for a in overwritten.assignments.iter().filter(|a| !a.is_pending()) {
            let part = program.parts.iter().find(|p| p.id == a.part_id).unwrap();
            *expected.entry(part.part_type).or_insert(0) += a.student_ids().count() as u32;
        }
        assert_eq!(credits as u32, expected.values().sum::<u32>());

        let mut actual: BTreeMap<PartType, u32> = BTreeMap::new();
        for record in roster_repo.load_history_records().unwrap() {
            assert_eq!(record.last_assigned, Some(week()), "{:?}", record);
            *actual.entry(record.part_type).or_insert(0) += record.count;
        }
        actual.retain(|_, count| *count > 0);
        assert_eq!(actual, expected);

        // 第一版的朗读者 b1 被替换后不再保留计数
        let history = roster_repo.load_history().unwrap();
        assert_eq!(history.entry("b1", PartType::BibleReading).count, 0);
    }

    #[tokio::test]
    async fn test_publish_rotates_next_week() {
        let (_tmp, db_path, api) = setup_standard();

        let (_, first) = api.generate_week(week(), false).await.unwrap();
        assert_eq!(primary_of(&first, "reading"), Some("b1"));
        assert_eq!(primary_of(&first, "call"), Some("e1"));
        api.publish_week(week()).await.unwrap();

        let next = weeks_after(week(), 1);
        seed_program(open_shared(&db_path), &standard_program(next));

        let (_, second) = api.generate_week(next, false).await.unwrap();
        assert_ne!(primary_of(&second, "reading"), Some("b1"));
        let call_primary = primary_of(&second, "call").unwrap();
        assert!(call_primary != "e1" && call_primary != "e2", "{}", call_primary);
    }

    #[tokio::test]
    async fn test_publish_missing_week() {
        let (_tmp, _db_path, api) = setup_standard();
        let err = api.publish_week(week()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)), "{:?}", err);
    }

    // ==========================================
    // 并发保护
    // ==========================================

    #[tokio::test]
    async fn test_generation_in_progress_is_rejected() {
        let (_tmp, _db_path, api) = setup_standard();

        let guard = api.week_locks().try_acquire(week()).unwrap();

        let err = api.generate_week(week(), false).await.unwrap_err();
        assert!(matches!(err, ApiError::GenerationInProgress { .. }), "{:?}", err);
        let err = api.publish_week(week()).await.unwrap_err();
        assert!(matches!(err, ApiError::GenerationInProgress { .. }), "{:?}", err);

        // 预览只读，不受互斥影响
        assert!(api.preview_week(week()).await.is_ok());
        // 其他周不受影响
        let err = api.generate_week(weeks_after(week(), 1), false).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)), "{:?}", err);

        drop(guard);
        assert!(api.generate_week(week(), false).await.is_ok());
        assert!(!api.week_locks().is_locked(week()));
    }

    // ==========================================
    // 输入错误
    // ==========================================

    #[tokio::test]
    async fn test_missing_program_not_found() {
        let (_tmp, _db_path, api) = setup_standard();
        let err = api.preview_week(weeks_after(week(), 2)).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_empty_roster_rejected() {
        let (_tmp, db_path) = create_test_db().unwrap();
        seed_program(open_shared(&db_path), &standard_program(week()));
        let api = AssignmentApi::open(&db_path).unwrap();

        let err = api.generate_week(week(), false).await.unwrap_err();
        assert!(
            matches!(err, ApiError::EngineRejected(EngineError::EmptyActiveRoster)),
            "{:?}",
            err
        );
        assert!(api.find_week(week()).unwrap().is_none());
    }

    // ==========================================
    // 配置覆写
    // ==========================================

    fn has_recent_warning(result: &AssignmentRunResult) -> bool {
        result
            .diagnostics
            .iter()
            .any(|d| matches!(d.kind, DiagnosticKind::RecentAssignment { days_since: 21, .. }))
    }

    #[tokio::test]
    async fn test_warning_threshold_read_from_config() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let conn = open_shared(&db_path);
        seed_roster(
            conn.clone(),
            &[StudentBuilder::new("b1").name("刘弟兄").build()],
            &[],
            &[HistoryRecord {
                student_id: "b1".to_string(),
                part_type: PartType::BibleReading,
                last_assigned: Some(weeks_after(week(), -3)),
                count: 1,
            }],
        );
        seed_program(
            conn,
            &Program::new(
                week(),
                vec![Part::from_catalog("reading", PartType::BibleReading, 1, 4)],
            ),
        );
        let api = AssignmentApi::open(&db_path).unwrap();

        let default_run = api.preview_week(week()).await.unwrap();
        assert_eq!(primary_of(&default_run, "reading"), Some("b1"));
        assert!(!has_recent_warning(&default_run));

        ConfigManager::new(&db_path)
            .unwrap()
            .set_global_config_value(config_keys::RECENT_ASSIGNMENT_WARNING_DAYS, "30")
            .unwrap();

        let strict_run = api.preview_week(week()).await.unwrap();
        assert_eq!(primary_of(&strict_run, "reading"), Some("b1"));
        assert!(has_recent_warning(&strict_run));
    }
}

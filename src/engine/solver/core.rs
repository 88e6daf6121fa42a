use super::state::PartState;
use super::GenerationOptions;
use crate::config::EngineConfig;
use crate::domain::assignment::{
    Assignment, AssignmentRunResult, DiagnosticKind, DiagnosticSeverity, PartDiagnostic,
};
use crate::domain::family::FamilyRelation;
use crate::domain::history::HistorySnapshot;
use crate::domain::program::{Part, Program};
use crate::domain::student::{RosterSnapshot, Student};
use crate::domain::types::{PendingReason, RunStatus};
use crate::engine::eligibility::EligibilityFilter;
use crate::engine::error::EngineResult;
use crate::engine::fairness::{days_since_last, FairnessBalancer};
use crate::engine::family::{FamilyGraph, FamilyRelationValidator};
use crate::engine::precondition::{check_program, check_roster};
use crate::engine::statistics::compute_statistics;
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

// ==========================================
// RunContext - 单次运行的可变状态
// ==========================================
// 仅在 solve 调用栈内存在，不跨运行共享
struct RunContext {
    /// 不可再安排的学员（排除名单 + 本次已占用）
    blocked: HashSet<String>,
    /// 是否把已占用学员加入 blocked（重新安排覆盖时关闭）
    track_usage: bool,
    diagnostics: Vec<PartDiagnostic>,
}

impl RunContext {
    fn new(options: &GenerationOptions, config: &EngineConfig) -> Self {
        Self {
            blocked: options.excluded_student_ids.iter().cloned().collect(),
            track_usage: !config.reassignment_override,
            diagnostics: Vec::new(),
        }
    }

    fn mark_used(&mut self, student_id: &str) {
        if self.track_usage {
            self.blocked.insert(student_id.to_string());
        }
    }

    fn push(&mut self, part: &Part, severity: DiagnosticSeverity, kind: DiagnosticKind, message: String) {
        self.diagnostics.push(PartDiagnostic {
            part_id: part.id.clone(),
            order: part.order,
            severity,
            kind,
            message,
        });
    }
}

// ==========================================
// AssignmentSolver - 安排求解器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct AssignmentSolver {
    config: EngineConfig,
    eligibility: EligibilityFilter,
    balancer: FairnessBalancer,
    family: FamilyRelationValidator,
}

impl AssignmentSolver {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            family: FamilyRelationValidator::new(&config),
            eligibility: EligibilityFilter::new(),
            balancer: FairnessBalancer::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 生成一周安排
    ///
    /// # 参数
    /// - program: 周节目单
    /// - roster: 名册快照
    /// - history: 历史快照
    /// - relations: 亲属关系
    /// - options: 调用方选项
    ///
    /// # 返回
    /// - Ok(AssignmentRunResult): 全部节目均有结果（assigned 或 pending）
    /// - Err(EngineError): 结构性错误，不产生任何部分结果
    #[instrument(skip_all, fields(week = %program.week_start, parts = program.parts.len()))]
    pub fn solve(
        &self,
        program: &Program,
        roster: &RosterSnapshot,
        history: &HistorySnapshot,
        relations: &[FamilyRelation],
        options: &GenerationOptions,
    ) -> EngineResult<AssignmentRunResult> {
        // === 前置校验（快速失败） ===
        check_program(program)?;
        check_roster(roster)?;
        let graph = FamilyGraph::build(relations)?;

        info!(
            roster_size = roster.len(),
            active_count = roster.active_count(),
            relations_count = graph.len(),
            excluded_count = options.excluded_student_ids.len(),
            reassignment_override = self.config.reassignment_override,
            "开始生成周安排"
        );

        let mut run = RunContext::new(options, &self.config);
        let mut assignments = Vec::with_capacity(program.parts.len());

        for part in program.parts_in_order() {
            let assignment =
                self.solve_part(part, program.week_start, roster, history, &graph, &mut run);
            assignments.push(assignment);
        }

        let status = if assignments.iter().any(|a| a.is_pending()) {
            RunStatus::Partial
        } else {
            RunStatus::Complete
        };
        let statistics = compute_statistics(&assignments, roster, &graph);

        info!(
            status = %status,
            assigned_count = statistics.assigned_count,
            pending_count = statistics.pending_count,
            diagnostics_count = run.diagnostics.len(),
            "周安排生成完成"
        );

        Ok(AssignmentRunResult {
            week: program.week_start,
            assignments,
            diagnostics: run.diagnostics,
            status,
            statistics,
        })
    }

    /// 单个节目的状态推进
    fn solve_part<'a>(
        &self,
        part: &Part,
        week: NaiveDate,
        roster: &'a RosterSnapshot,
        history: &HistorySnapshot,
        graph: &FamilyGraph,
        run: &mut RunContext,
    ) -> Assignment {
        let mut state: PartState<'a> = PartState::Unassigned;

        loop {
            let from = state.name();
            let next = match state {
                PartState::Unassigned => self.select_primary(part, week, roster, history, run),
                PartState::PrimarySelected { primary } if part.requires_assistant => {
                    self.select_assistant(part, week, primary, roster, history, graph, run)
                }
                PartState::PrimarySelected { primary } => {
                    PartState::AssistantSkippedNotRequired { primary }
                }
                PartState::AssistantSelected { primary, assistant } => PartState::Finalized(
                    Assignment::assigned(&part.id, week, &primary.id, Some(&assistant.id)),
                ),
                PartState::AssistantSkippedNotRequired { primary } => {
                    PartState::Finalized(Assignment::assigned(&part.id, week, &primary.id, None))
                }
                PartState::Finalized(assignment) => return assignment,
            };

            debug!(part_id = %part.id, order = part.order, from, to = next.name(), "节目状态推进");
            state = next;
        }
    }

    /// 步骤1-3: 选择主讲人
    fn select_primary<'a>(
        &self,
        part: &Part,
        week: NaiveDate,
        roster: &'a RosterSnapshot,
        history: &HistorySnapshot,
        run: &mut RunContext,
    ) -> PartState<'a> {
        let candidates = self.eligibility.filter(part, roster, &run.blocked);
        let candidates_count = candidates.len();
        let ranked = self.balancer.rank(candidates, part.part_type, history);

        match ranked.first().copied() {
            Some(primary) => {
                debug!(
                    part_id = %part.id,
                    candidates_count,
                    primary_id = %primary.id,
                    "主讲人已选定"
                );
                run.mark_used(&primary.id);
                self.note_recent_assignment(part, week, primary, history, run);
                PartState::PrimarySelected { primary }
            }
            None => {
                warn!(
                    part_id = %part.id,
                    part_type = %part.part_type,
                    "无合格主讲人，节目待人工处理"
                );
                run.push(
                    part,
                    DiagnosticSeverity::Error,
                    DiagnosticKind::NoEligibleCandidate,
                    format!(
                        "节目 {} ({}) 无合格主讲人: 性别限制={}, 最低资格={}",
                        part.id,
                        part.part_type,
                        part.gender_restriction,
                        part.min_qualification
                            .map(|t| t.to_string())
                            .unwrap_or_else(|| "无".to_string()),
                    ),
                );
                PartState::Finalized(Assignment::pending(
                    &part.id,
                    week,
                    None,
                    PendingReason::NoEligibleCandidate,
                ))
            }
        }
    }

    /// 步骤4: 选择助手（按公平顺序取第一个可安全搭配者）
    #[allow(clippy::too_many_arguments)]
    fn select_assistant<'a>(
        &self,
        part: &Part,
        week: NaiveDate,
        primary: &'a Student,
        roster: &'a RosterSnapshot,
        history: &HistorySnapshot,
        graph: &FamilyGraph,
        run: &mut RunContext,
    ) -> PartState<'a> {
        let candidates = self
            .eligibility
            .filter_assistants(part, roster, primary, &run.blocked);
        let candidates_count = candidates.len();
        let ranked = self.balancer.rank(candidates, part.part_type, history);

        let found = ranked
            .into_iter()
            .find(|c| self.family.is_pairing_allowed(primary, c, graph));

        match found {
            Some(assistant) => {
                debug!(
                    part_id = %part.id,
                    candidates_count,
                    assistant_id = %assistant.id,
                    "助手已选定"
                );
                run.mark_used(&assistant.id);
                self.note_recent_assignment(part, week, assistant, history, run);
                PartState::AssistantSelected { primary, assistant }
            }
            None => {
                warn!(
                    part_id = %part.id,
                    primary_id = %primary.id,
                    candidates_count,
                    "无可安全搭配的助手，主讲人安排保留"
                );
                run.push(
                    part,
                    DiagnosticSeverity::Error,
                    DiagnosticKind::NoFamilySafeAssistant,
                    format!(
                        "节目 {} 主讲人 {} 无可安全搭配的助手（候选 {} 人）",
                        part.id, primary.id, candidates_count
                    ),
                );
                PartState::Finalized(Assignment::pending(
                    &part.id,
                    week,
                    Some(&primary.id),
                    PendingReason::NoFamilySafeAssistant,
                ))
            }
        }
    }

    /// 入选学员近期已安排同类型节目时输出提示（不影响选择）
    fn note_recent_assignment(
        &self,
        part: &Part,
        week: NaiveDate,
        student: &Student,
        history: &HistorySnapshot,
        run: &mut RunContext,
    ) {
        let days_since = match days_since_last(history, &student.id, part.part_type, week) {
            // 晚于本周的历史（补录或重排过去的周）不算"近期"
            Some(d) if (0..self.config.recent_assignment_warning_days).contains(&d) => d,
            _ => return,
        };

        run.push(
            part,
            DiagnosticSeverity::Warning,
            DiagnosticKind::RecentAssignment {
                student_id: student.id.clone(),
                days_since,
            },
            format!(
                "学员 {} 在 {} 天前已安排过 {}",
                student.id, days_since, part.part_type
            ),
        );
    }
}

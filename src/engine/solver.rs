// ==========================================
// 会众聚会安排系统 - 安排求解器
// ==========================================
// 主流程（按节目 order 升序）:
// 1) EligibilityFilter 计算主讲人候选（排除本次运行已占用学员）
// 2) 候选为空 → pending(NoEligibleCandidate)，继续下一节目
// 3) FairnessBalancer 排序，取第一名为主讲人
// 4) 需助手时：筛选 + 排序助手，取第一个通过 FamilyRelationValidator 者
//    找不到 → pending(NoFamilySafeAssistant)，主讲人安排保留
// ==========================================
// 红线: 纯计算、无 I/O；同输入同输出
// 红线: 找不到人选不报错，只有结构性错误才在循环前拒绝
// ==========================================

mod core;
mod state;

#[cfg(test)]
mod tests;

pub use core::AssignmentSolver;
pub use state::PartState;

use crate::domain::assignment::AssignmentRunResult;
use crate::domain::family::FamilyRelation;
use crate::domain::history::HistorySnapshot;
use crate::domain::program::Program;
use crate::domain::student::RosterSnapshot;
use crate::engine::error::EngineResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 单次生成的调用方选项
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// 本周不得安排的学员（请假/外出等）
    #[serde(default)]
    pub excluded_student_ids: BTreeSet<String>,
}

/// 引擎边界：默认配置生成一周安排
pub fn generate_assignments(
    program: &Program,
    roster: &RosterSnapshot,
    history: &HistorySnapshot,
    relations: &[FamilyRelation],
) -> EngineResult<AssignmentRunResult> {
    AssignmentSolver::default().solve(
        program,
        roster,
        history,
        relations,
        &GenerationOptions::default(),
    )
}

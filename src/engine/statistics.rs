// ==========================================
// 会众聚会安排系统 - 运行统计
// ==========================================
// 职责: 汇总一次运行的分布情况（供展示层使用）
// ==========================================

use crate::domain::assignment::{Assignment, RunStatistics};
use crate::domain::student::RosterSnapshot;
use crate::engine::family::FamilyGraph;

pub fn compute_statistics(
    assignments: &[Assignment],
    roster: &RosterSnapshot,
    relations: &FamilyGraph,
) -> RunStatistics {
    let mut stats = RunStatistics {
        total_parts: assignments.len() as u32,
        ..RunStatistics::default()
    };

    for a in assignments {
        if a.is_pending() {
            stats.pending_count += 1;
        } else {
            stats.assigned_count += 1;
        }

        let primary = match a.primary_student_id.as_deref().and_then(|id| roster.get(id)) {
            Some(s) => s,
            None => continue,
        };

        *stats.primaries_by_gender.entry(primary.gender).or_insert(0) += 1;
        *stats.primaries_by_tier.entry(primary.tier).or_insert(0) += 1;

        if let Some(assistant_id) = a.assistant_student_id.as_deref() {
            stats.pairs_formed += 1;
            if relations.relation(&primary.id, assistant_id).is_some() {
                stats.family_pairs += 1;
            }
        }
    }

    stats
}

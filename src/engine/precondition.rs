// ==========================================
// 会众聚会安排系统 - 输入前置校验
// ==========================================
// 职责: 计算开始前拒绝结构性错误输入（快速失败）
// 红线: 校验失败时不产生任何部分结果
// ==========================================

use crate::domain::program::{Part, Program};
use crate::domain::student::RosterSnapshot;
use crate::domain::types::PartType;
use crate::engine::error::{EngineError, EngineResult};
use std::collections::{HashMap, HashSet};

/// 校验节目单
///
/// - order 唯一
/// - part id 唯一
/// - 同一节目类型的性别限制/资格要求一致
pub fn check_program(program: &Program) -> EngineResult<()> {
    let mut by_order: HashMap<u32, &str> = HashMap::new();
    let mut part_ids: HashSet<&str> = HashSet::new();
    let mut by_type: HashMap<PartType, &Part> = HashMap::new();

    for part in &program.parts {
        if let Some(first) = by_order.insert(part.order, part.id.as_str()) {
            return Err(EngineError::DuplicatePartOrder {
                order: part.order,
                first_part_id: first.to_string(),
                second_part_id: part.id.clone(),
            });
        }

        if !part_ids.insert(part.id.as_str()) {
            return Err(EngineError::DuplicatePartId(part.id.clone()));
        }

        match by_type.get(&part.part_type) {
            Some(first)
                if first.gender_restriction != part.gender_restriction
                    || first.min_qualification != part.min_qualification =>
            {
                return Err(EngineError::InconsistentPartRule {
                    part_type: part.part_type,
                    first_part_id: first.id.clone(),
                    second_part_id: part.id.clone(),
                });
            }
            Some(_) => {}
            None => {
                by_type.insert(part.part_type, part);
            }
        }
    }

    Ok(())
}

/// 校验名册：id 唯一 + 至少一名在册学员
pub fn check_roster(roster: &RosterSnapshot) -> EngineResult<()> {
    if let Some(dup) = roster.duplicate_ids().into_iter().next() {
        return Err(EngineError::DuplicateStudentId(dup));
    }

    if roster.active_count() == 0 {
        return Err(EngineError::EmptyActiveRoster);
    }

    Ok(())
}

// ==========================================
// 会众聚会安排系统 - 学员与名册快照
// ==========================================
// 职责: 学员实体 + 单次运行使用的只读名册快照
// 红线: 快照在一次运行内不可变，不读取任何全局缓存
// ==========================================

use crate::domain::types::{Gender, ParseEnumError, QualificationTier};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// Student - 学员
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub display_name: String,
    pub gender: Gender,
    pub tier: QualificationTier,
    pub birth_date: Option<NaiveDate>,
    pub active: bool,
    pub family_group_id: Option<String>,
}

/// 边界输入形式（导入/存储层提供的字符串字段）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStudent {
    pub id: String,
    pub display_name: String,
    pub gender: String,
    pub tier: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub family_group_id: Option<String>,
}

fn default_active() -> bool {
    true
}

impl TryFrom<RawStudent> for Student {
    type Error = ParseEnumError;

    fn try_from(raw: RawStudent) -> Result<Self, Self::Error> {
        Ok(Student {
            gender: raw.gender.parse()?,
            tier: raw.tier.parse()?,
            id: raw.id,
            display_name: raw.display_name,
            birth_date: raw.birth_date,
            active: raw.active,
            family_group_id: raw.family_group_id,
        })
    }
}

// ==========================================
// RosterSnapshot - 名册快照
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RosterSnapshot {
    students: Vec<Student>,
    index: HashMap<String, usize>,
}

impl RosterSnapshot {
    /// 构建快照（保留输入顺序；重复 id 仅索引首个，由前置校验拒绝）
    pub fn new(students: Vec<Student>) -> Self {
        let mut index = HashMap::with_capacity(students.len());
        for (i, s) in students.iter().enumerate() {
            index.entry(s.id.clone()).or_insert(i);
        }
        Self { students, index }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// 在册学员（inactive 永不参与安排）
    pub fn active(&self) -> impl Iterator<Item = &Student> {
        self.students.iter().filter(|s| s.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn get(&self, id: &str) -> Option<&Student> {
        self.index.get(id).map(|&i| &self.students[i])
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// 返回重复出现的学员 id（按首次重复出现的顺序）
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut dups = Vec::new();
        for s in &self.students {
            let count = seen.entry(s.id.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                dups.push(s.id.clone());
            }
        }
        dups
    }
}

impl From<Vec<Student>> for RosterSnapshot {
    fn from(students: Vec<Student>) -> Self {
        Self::new(students)
    }
}

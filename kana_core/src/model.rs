use std::fmt;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::pos;

/// 词素：tokenizer 输出的最小单位。
///
/// 注意：`marked` 只在某个 Question 的会话副本里有意义，
/// 表示学习者已经“说出”了这个词素的读音。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Morpheme {
    /// 表层形（例如 `"私"`）
    pub surface: String,
    /// 读音（通常是片假名，例如 `"ワタシ"`）
    pub reading: String,
    /// 词性标签（见 [`crate::pos`]）
    pub pos: String,
    /// 辞书形（例如 `"言う"`）
    pub base: String,
    /// 是否已揭示
    #[serde(default)]
    pub marked: bool,
}

impl Morpheme {
    pub fn new(
        surface: impl Into<String>,
        reading: impl Into<String>,
        pos: impl Into<String>,
        base: impl Into<String>,
    ) -> Self {
        Self {
            surface: surface.into(),
            reading: reading.into(),
            pos: pos.into(),
            base: base.into(),
            marked: false,
        }
    }

    pub fn is_symbol(&self) -> bool {
        self.pos == pos::SYMBOL
    }

    /// 去掉首尾空白后表层形为空（tokenizer 切出来的空白）。
    pub fn is_blank(&self) -> bool {
        self.surface.trim().is_empty()
    }
}

/// 候选：一条完整、可接受的答案（词素序列）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Candidate {
    pub morphemes: Vec<Morpheme>,
}

impl Candidate {
    pub fn new(morphemes: Vec<Morpheme>) -> Self {
        Self { morphemes }
    }

    /// 去重/排序用的规范键：`表层形(读音)` 按顺序以 `|` 连接。
    ///
    /// `marked` 与词性不参与。
    pub fn lexical_key(&self) -> String {
        let mut key = String::new();
        for (i, m) in self.morphemes.iter().enumerate() {
            if i > 0 {
                key.push('|');
            }
            key.push_str(&m.surface);
            key.push('(');
            key.push_str(&m.reading);
            key.push(')');
        }
        key
    }

    pub fn marked_count(&self) -> usize {
        self.morphemes.iter().filter(|m| m.marked).count()
    }

    /// 丢弃空白词素。
    pub fn without_blanks(mut self) -> Self {
        self.morphemes.retain(|m| !m.is_blank());
        self
    }

    /// 非空白表层形以 `sep` 连接。
    pub fn join_surfaces(&self, sep: &str) -> String {
        self.morphemes
            .iter()
            .filter(|m| !m.is_blank())
            .map(|m| m.surface.as_str())
            .collect::<Vec<_>>()
            .join(sep)
    }

    pub fn reset_marks(&mut self) {
        for m in &mut self.morphemes {
            m.marked = false;
        }
    }
}

impl From<Vec<Morpheme>> for Candidate {
    fn from(morphemes: Vec<Morpheme>) -> Self {
        Self::new(morphemes)
    }
}

impl Deref for Candidate {
    type Target = [Morpheme];

    fn deref(&self) -> &[Morpheme] {
        &self.morphemes
    }
}

impl DerefMut for Candidate {
    fn deref_mut(&mut self) -> &mut [Morpheme] {
        &mut self.morphemes
    }
}

/// 候选集：同一题的全部候选。
///
/// 不变量：任意两个成员的 `lexical_key` 不同；对外按 `lexical_key` 升序排列。
/// 反序列化也经过 [`CandidateSet::new`]，不变量同样成立。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Candidate>", into = "Vec<Candidate>")]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    /// 去重（保留先出现者）并按 `lexical_key` 排序。
    pub fn new(candidates: Vec<Candidate>) -> Self {
        let mut keyed: Vec<(String, Candidate)> = candidates
            .into_iter()
            .map(|c| (c.lexical_key(), c))
            .collect();
        // 稳定排序：同键时先出现者在前，随后 dedup 保留它
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed.dedup_by(|a, b| a.0 == b.0);
        Self {
            candidates: keyed.into_iter().map(|(_, c)| c).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.candidates
    }

    /// 只应修改 `marked`：改动表层形/读音会破坏去重不变量。
    pub fn as_mut_slice(&mut self) -> &mut [Candidate] {
        &mut self.candidates
    }

    pub fn reset_marks(&mut self) {
        for c in &mut self.candidates {
            c.reset_marks();
        }
    }

    pub fn into_vec(self) -> Vec<Candidate> {
        self.candidates
    }
}

impl From<Vec<Candidate>> for CandidateSet {
    fn from(candidates: Vec<Candidate>) -> Self {
        Self::new(candidates)
    }
}

impl From<CandidateSet> for Vec<Candidate> {
    fn from(set: CandidateSet) -> Self {
        set.into_vec()
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

/// 一道题：英文提示 + 日文原句 + 扩展后的候选集。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// 英文提示（只读）
    pub english: String,
    /// 日文原句（只读）
    pub japanese: Vec<String>,
    /// 候选集（会话内会修改 `marked`）
    pub parsed: CandidateSet,
}

impl Question {
    /// 深拷贝并清空所有 `marked`：会话只在这份副本上改状态。
    pub fn fresh_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.parsed.reset_marks();
        copy
    }
}

/// 骨架的一段。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkeletonPart {
    /// 已揭示：显示表层形
    Revealed(String),
    /// 未揭示：按表层形字符数显示下划线
    Hidden(usize),
    /// 标点原样显示
    Punctuation(String),
}

/// 当前最佳候选的“答案骨架”。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skeleton {
    pub parts: Vec<SkeletonPart>,
    pub completed: bool,
}

impl Skeleton {
    pub fn of(candidate: &Candidate) -> Self {
        let parts = candidate
            .iter()
            .map(|m| {
                if m.is_symbol() {
                    SkeletonPart::Punctuation(m.surface.clone())
                } else if m.marked {
                    SkeletonPart::Revealed(m.surface.clone())
                } else {
                    SkeletonPart::Hidden(m.surface.chars().count())
                }
            })
            .collect();
        Self {
            parts,
            completed: crate::selector::is_completed(candidate),
        }
    }
}

impl fmt::Display for Skeleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match part {
                SkeletonPart::Revealed(s) | SkeletonPart::Punctuation(s) => f.write_str(s)?,
                SkeletonPart::Hidden(n) => f.write_str(&"_".repeat(*n))?,
            }
        }
        if self.completed {
            f.write_str(" ✓")?;
        }
        Ok(())
    }
}

/// 会话给 UI 的只读快照。
#[derive(Debug, Clone)]
pub struct UiState {
    /// 英文提示
    pub english: String,
    /// 当前最佳候选的骨架
    pub skeleton: Skeleton,
    /// 是否已完成
    pub completed: bool,
    /// 仍处于领先（已揭示数最多）的候选，用于调试展示
    pub leading: Vec<String>,
}

//! `matcher`：把学习者输入的读音片段对到候选的词素上，并标记为已揭示。
//!
//! 约定：
//! - 片段必须被若干词素读音**按顺序、无空隙、无剩余**地完整覆盖
//! - 取最左的覆盖（深度优先，第一个成功即返回）
//! - 多候选时只在“已揭示数最多”的那一批候选里匹配，其余候选不动

use crate::model::{Candidate, Morpheme};

/// 单个候选的匹配结果。
///
/// - `matched: None`：没有匹配（或该候选不参与匹配）
/// - `matched: Some(v)`：匹配成功，`v` 是本次**新**标记的下标（可能为空）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub matched: Option<Vec<usize>>,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        self.matched.is_some()
    }

    /// 本次新标记的词素数。
    pub fn newly_marked(&self) -> usize {
        self.matched.as_ref().map_or(0, Vec::len)
    }
}

/// 找一组下标，使其读音按顺序拼接后恰好等于 `target`。
///
/// 空串总是匹配（返回空下标列表）。
pub fn find_match(morphemes: &[Morpheme], target: &str) -> Option<Vec<usize>> {
    let mut path = Vec::new();
    if cover(morphemes, target, 0, &mut path) {
        Some(path)
    } else {
        None
    }
}

// 回溯：从 `start` 起尝试每个读音是剩余串前缀的词素。
fn cover(morphemes: &[Morpheme], rest: &str, start: usize, path: &mut Vec<usize>) -> bool {
    if rest.is_empty() {
        return true;
    }
    for (i, m) in morphemes.iter().enumerate().skip(start) {
        let Some(tail) = rest.strip_prefix(m.reading.as_str()) else {
            continue;
        };
        path.push(i);
        if cover(morphemes, tail, i + 1, path) {
            return true;
        }
        path.pop();
    }
    false
}

/// 在单个候选上匹配并标记；已标记的词素不重复计入。
pub fn mark_candidate(candidate: &mut Candidate, target: &str) -> MatchResult {
    let Some(indices) = find_match(candidate, target) else {
        return MatchResult { matched: None };
    };
    let mut newly = Vec::new();
    for idx in indices {
        let m = &mut candidate[idx];
        if !m.marked {
            m.marked = true;
            newly.push(idx);
        }
    }
    MatchResult {
        matched: Some(newly),
    }
}

/// 已揭示数最多的候选下标（可能多个并列）。
pub fn leading_indices(candidates: &[Candidate]) -> Vec<usize> {
    let counts: Vec<usize> = candidates.iter().map(Candidate::marked_count).collect();
    let Some(&max) = counts.iter().max() else {
        return Vec::new();
    };
    counts
        .iter()
        .enumerate()
        .filter(|&(_, &n)| n == max)
        .map(|(i, _)| i)
        .collect()
}

/// 在候选集上匹配：只有匹配前领先的候选参与，其余一律返回 `None` 且不修改。
///
/// 结果与 `candidates` 一一对应。
pub fn mark_set(candidates: &mut [Candidate], target: &str) -> Vec<MatchResult> {
    let leading = leading_indices(candidates);
    let results: Vec<MatchResult> = candidates
        .iter_mut()
        .enumerate()
        .map(|(i, c)| {
            if leading.contains(&i) {
                mark_candidate(c, target)
            } else {
                MatchResult::default()
            }
        })
        .collect();
    tracing::debug!(
        target_text = target,
        eligible = leading.len(),
        hits = results.iter().filter(|r| r.is_match()).count(),
        "matched fragment"
    );
    results
}

/// 是否有任何候选新标记了词素。
pub fn any_marked(results: &[MatchResult]) -> bool {
    results.iter().any(|r| r.newly_marked() > 0)
}

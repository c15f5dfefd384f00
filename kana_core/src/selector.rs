//! `selector`：从候选集中选出当前展示用的最佳候选，以及完成判定。

use crate::error::{KanaError, Result};
use crate::matcher::leading_indices;
use crate::model::Candidate;

/// 选最佳候选：已揭示数最多 -> 词素数最少 -> 候选集中的先后（即 `lexical_key` 顺序）。
///
/// 候选集为空属于调用方错误，返回 [`KanaError::EmptyCandidateSet`]。
pub fn select_best(candidates: &[Candidate]) -> Result<&Candidate> {
    let leading = leading_indices(candidates);
    let mut best: Option<&Candidate> = None;
    for &i in &leading {
        let c = &candidates[i];
        // 严格小于：并列时保留先出现者
        if best.is_none_or(|b| c.len() < b.len()) {
            best = Some(c);
        }
    }
    best.ok_or(KanaError::EmptyCandidateSet)
}

/// 除记号外的词素都已揭示。
pub fn is_completed(candidate: &Candidate) -> bool {
    candidate.iter().all(|m| m.is_symbol() || m.marked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CandidateSet;
    use crate::test_utils::{candidate, morph};

    #[test]
    fn most_marked_wins() {
        let mut long = candidate(vec![
            morph("私", "ワタシ", "名詞"),
            morph("は", "ハ", "助詞"),
            morph("学生", "ガクセイ", "名詞"),
        ]);
        long[2].marked = true;
        let short = candidate(vec![morph("学生", "ガクセイ", "名詞")]);
        let set = vec![short, long];
        assert_eq!(select_best(&set).unwrap().len(), 3);
    }

    #[test]
    fn shortest_breaks_ties_then_order() {
        let set = CandidateSet::new(vec![
            candidate(vec![morph("私", "ワタシ", "名詞"), morph("は", "ハ", "助詞"), morph("学生", "ガクセイ", "名詞")]),
            candidate(vec![morph("学生", "ガクセイ", "名詞"), morph("だ", "ダ", "助動詞")]),
            candidate(vec![morph("学生", "ガクセイ", "名詞"), morph("です", "デス", "助動詞")]),
        ]);
        let best = select_best(set.as_slice()).unwrap();
        // 两个长度 2 的并列，取 lexical_key 较小者
        assert_eq!(best.lexical_key(), "学生(ガクセイ)|だ(ダ)");
    }

    #[test]
    fn empty_set_is_an_error() {
        assert!(matches!(select_best(&[]), Err(KanaError::EmptyCandidateSet)));
    }

    #[test]
    fn punctuation_never_blocks_completion() {
        let mut c = candidate(vec![
            morph("私", "ワタシ", "名詞"),
            morph("です", "デス", "助動詞"),
            morph("。", "。", "記号"),
        ]);
        assert!(!is_completed(&c));
        c[0].marked = true;
        assert!(!is_completed(&c));
        c[1].marked = true;
        assert!(is_completed(&c));
    }

    #[test]
    fn completion_agrees_with_selection_of_a_single_candidate() {
        let mut c = candidate(vec![morph("学生", "ガクセイ", "名詞"), morph("。", "。", "記号")]);
        c[0].marked = true;
        let set = vec![c.clone()];
        let best = select_best(&set).unwrap();
        assert_eq!(is_completed(&c), best.iter().all(|m| m.marked || m.is_symbol()));
    }
}

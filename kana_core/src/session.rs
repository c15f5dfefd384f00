//! `Session`：对上层（CLI/GUI）提供的学习会话对象。
//!
//! `Session` 自身不做业务逻辑判断，而是：
//! - 持有 `Context`（当前题目的私有副本）
//! - 持有 processors 链（可插拔）
//! - 把每次 `InputEvent` 依次交给 processors，直到被消费
//! - 最后输出 `UiState` + `Action`

use crate::{
    context::Context,
    key_event::{Action, InputEvent},
    model::{Question, UiState},
    processor::{MatchProcessor, NextQuestionProcessor, ProcessStatus, Processor},
};

/// 学习会话（一道题一道题地练习）。
pub struct Session {
    /// 会话上下文（processors 共享）
    ctx: Context,
    /// processors 链（可配置/可扩展）
    processors: Vec<Box<dyn Processor>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// 创建会话，并组装默认 processors 链。
    pub fn new() -> Self {
        Self {
            ctx: Context::default(),
            processors: vec![Box::new(NextQuestionProcessor), Box::new(MatchProcessor)],
        }
    }

    /// 换题：深拷贝，之后的标记都只发生在副本上。
    pub fn supply(&mut self, question: &Question) {
        self.ctx.supply(question);
    }

    /// 当前题目副本（只读）。
    pub fn question(&self) -> Option<&Question> {
        self.ctx.question.as_ref()
    }

    /// 获取当前 UI 快照；没有题目时为 None。
    pub fn ui_state(&self) -> Option<UiState> {
        self.ctx.ui_state()
    }

    /// 处理一个输入事件，返回最新 UI 快照与动作列表。
    pub fn handle(&mut self, ev: InputEvent) -> (Option<UiState>, Vec<Action>) {
        let mut actions = Vec::new();
        for p in &mut self.processors {
            let (status, mut a) = p.process(&mut self.ctx, &ev);
            actions.append(&mut a);
            if status == ProcessStatus::Consume {
                break;
            }
        }
        (self.ctx.ui_state(), actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Candidate, CandidateSet};
    use crate::test_utils::{candidate, morph};

    fn question() -> Question {
        Question {
            english: "I am a student.".to_string(),
            japanese: vec!["私は学生です。".to_string()],
            parsed: CandidateSet::new(vec![
                candidate(vec![
                    morph("私", "ワタシ", "名詞"),
                    morph("は", "ハ", "助詞"),
                    morph("学生", "ガクセイ", "名詞"),
                    morph("です", "デス", "助動詞"),
                    morph("。", "。", "記号"),
                ]),
                candidate(vec![
                    morph("学生", "ガクセイ", "名詞"),
                    morph("です", "デス", "助動詞"),
                    morph("。", "。", "記号"),
                ]),
                candidate(vec![
                    morph("僕", "ボク", "名詞"),
                    morph("は", "ハ", "助詞"),
                    morph("学生", "ガクセイ", "名詞"),
                    morph("です", "デス", "助動詞"),
                    morph("。", "。", "記号"),
                ]),
            ]),
        }
    }

    #[test]
    fn no_question_means_no_state() {
        let mut s = Session::new();
        assert!(s.ui_state().is_none());
        let (ui, actions) = s.handle(InputEvent::Submit("わたし".to_string()));
        assert!(ui.is_none());
        assert!(actions.is_empty());
    }

    #[test]
    fn shortest_candidate_is_shown_first() {
        let mut s = Session::new();
        s.supply(&question());
        let ui = s.ui_state().unwrap();
        assert_eq!(ui.english, "I am a student.");
        assert_eq!(ui.skeleton.to_string(), "__ __ 。");
        assert!(!ui.completed);
        assert_eq!(ui.leading.len(), 3);
    }

    #[test]
    fn full_drill_reaches_completion() {
        let mut s = Session::new();
        s.supply(&question());

        let (ui, actions) = s.handle(InputEvent::Submit("わたし".to_string()));
        assert_eq!(actions, vec![Action::Accepted]);
        let ui = ui.unwrap();
        assert_eq!(ui.skeleton.to_string(), "私 _ __ __ 。");
        assert_eq!(ui.leading, vec!["私は学生です。".to_string()]);

        let (_, actions) = s.handle(InputEvent::Submit("ぼく".to_string()));
        assert_eq!(actions, vec![Action::Rejected]);

        let (_, actions) = s.handle(InputEvent::Submit("はがくせい".to_string()));
        assert_eq!(actions, vec![Action::Accepted]);

        let (ui, actions) = s.handle(InputEvent::Submit("デス".to_string()));
        assert_eq!(actions, vec![Action::Accepted, Action::Completed]);
        let ui = ui.unwrap();
        assert!(ui.completed);
        assert_eq!(ui.skeleton.to_string(), "私 は 学生 です 。 ✓");

        let (_, actions) = s.handle(InputEvent::Submit(String::new()));
        assert_eq!(actions, vec![Action::RequestNextQuestion]);
    }

    #[test]
    fn empty_submission_is_rejected_before_completion() {
        let mut s = Session::new();
        s.supply(&question());
        let (_, actions) = s.handle(InputEvent::Submit("  ".to_string()));
        assert_eq!(actions, vec![Action::Rejected]);
    }

    #[test]
    fn skip_requests_next_question() {
        let mut s = Session::new();
        s.supply(&question());
        let (_, actions) = s.handle(InputEvent::Skip);
        assert_eq!(actions, vec![Action::RequestNextQuestion]);
    }

    #[test]
    fn supplying_copies_and_resets() {
        let mut q = question();
        q.parsed.as_mut_slice()[0][0].marked = true;
        let mut s = Session::new();
        s.supply(&q);
        s.handle(InputEvent::Submit("がくせい".to_string()));
        // 原题不受会话影响
        assert!(q.parsed.as_slice()[0][0].marked);
        assert!(!q.parsed.as_slice()[0][2].marked);
        let copy = s.question().unwrap();
        assert!(!copy.parsed.as_slice()[0][0].marked);
        assert!(copy.parsed.iter().all(|c: &Candidate| c.iter().any(|m| m.marked)));
    }
}

//! `Context`：processor 链共享的唯一状态容器。
//!
//! 约定：
//! - `question`：当前题目的私有副本（`marked` 只在这里被修改）
//! - 没有题目时所有事件都被忽略
use crate::{
    key_event::Action,
    matcher::{any_marked, leading_indices, mark_set},
    model::{Question, Skeleton, UiState},
    selector::{is_completed, select_best},
};

/// 学习会话上下文。
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// 当前题目（深拷贝）
    pub question: Option<Question>,
}

impl Context {
    /// 换题：深拷贝并清空所有标记，原题不受影响。
    pub fn supply(&mut self, question: &Question) {
        self.question = Some(question.fresh_copy());
    }

    /// 当前最佳候选是否已完成。
    pub fn is_completed(&self) -> bool {
        let Some(q) = &self.question else {
            return false;
        };
        select_best(q.parsed.as_slice()).is_ok_and(is_completed)
    }

    /// 提交一段片假名读音：匹配、标记并给出动作。
    pub fn submit(&mut self, fragment: &str) -> Vec<Action> {
        let Some(q) = &mut self.question else {
            return Vec::new();
        };
        let results = mark_set(q.parsed.as_mut_slice(), fragment);
        if !any_marked(&results) {
            tracing::warn!(fragment, "fragment matched nothing");
            return vec![Action::Rejected];
        }
        let mut actions = vec![Action::Accepted];
        if self.is_completed() {
            tracing::info!("question completed");
            actions.push(Action::Completed);
        }
        actions
    }

    /// 生成 UI 层只读快照；没有题目时返回 None。
    pub fn ui_state(&self) -> Option<UiState> {
        let q = self.question.as_ref()?;
        let candidates = q.parsed.as_slice();
        let best = select_best(candidates).ok()?;
        let skeleton = Skeleton::of(best);
        Some(UiState {
            english: q.english.clone(),
            completed: skeleton.completed,
            skeleton,
            leading: leading_indices(candidates)
                .into_iter()
                .map(|i| candidates[i].join_surfaces(""))
                .collect(),
        })
    }
}

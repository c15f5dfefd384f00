//! `processor`：输入事件处理链。
//!
//! Processor 按顺序处理 `InputEvent`，对 `Context` 做状态变更，
//! 并可产生 `Action`（例如 Accepted / RequestNextQuestion）。
//!
//! 当前链路（`Session::new` 默认组装）：
//! - `NextQuestionProcessor`：已完成时回车、或 Skip，请求下一题
//! - `MatchProcessor`：规范成片假名后匹配候选集

use crate::{
    context::Context,
    kana::to_katakana,
    key_event::{Action, InputEvent},
};

/// Processor 执行结果：是否“消费”了本次事件。
///
/// - `Consume`：本 processor 已处理该事件，后续 processor 不再执行
/// - `Continue`：本 processor 不处理该事件，交给下一个 processor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    Consume,
    Continue,
}

/// Processor：处理输入事件并改变 Context；必要时产生输出动作。
pub trait Processor: Send + Sync {
    fn process(&mut self, context: &mut Context, input_event: &InputEvent) -> (ProcessStatus, Vec<Action>);
}

/// 换题的 processor。
pub struct NextQuestionProcessor;

impl Processor for NextQuestionProcessor {
    fn process(&mut self, context: &mut Context, input_event: &InputEvent) -> (ProcessStatus, Vec<Action>) {
        match input_event {
            InputEvent::Skip => (ProcessStatus::Consume, vec![Action::RequestNextQuestion]),
            // 已完成的题再回车：要下一题，不再匹配
            InputEvent::Submit(_) if context.is_completed() => {
                (ProcessStatus::Consume, vec![Action::RequestNextQuestion])
            }
            _ => (ProcessStatus::Continue, Vec::new()),
        }
    }
}

/// 匹配读音的 processor。
pub struct MatchProcessor;

impl Processor for MatchProcessor {
    fn process(&mut self, context: &mut Context, input_event: &InputEvent) -> (ProcessStatus, Vec<Action>) {
        match input_event {
            InputEvent::Submit(text) => {
                let fragment = to_katakana(text.trim());
                (ProcessStatus::Consume, context.submit(&fragment))
            }
            _ => (ProcessStatus::Continue, Vec::new()),
        }
    }
}

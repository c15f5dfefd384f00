//! `kana_core`：纯逻辑层，不做任何文件/网络 I/O。
//!
//! 设计目标：
//! - **核心可复用**：CLI/GUI/服务端都能复用同一套逻辑
//! - **分层清晰**：tokenizer -> rule（改写到不动点）-> `CandidateSet` -> matcher/selector -> 输出（`UiState`）
//! - **外部依赖可替换**：形态素解析通过 `Tokenizer` trait 注入（词表、vibrato 或测试用假实现）
pub mod context;
pub mod engine;
pub mod error;
pub mod kana;
pub mod key_event;
pub mod matcher;
pub mod model;
pub mod pos;
pub mod processor;
pub mod rule;
pub mod selector;
pub mod session;
pub mod tokenizer;

#[cfg(test)]
mod test_utils;

pub use engine::Engine;
pub use error::{KanaError, Result, TokenizeError};
pub use model::{Candidate, CandidateSet, Morpheme, Question, UiState};
pub use session::Session;
pub use tokenizer::Tokenizer;

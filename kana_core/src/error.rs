//! 错误类型定义。
//!
//! 约定：
//! - tokenizer 的失败原样包在 `KanaError::Tokenize` 里向上传递，不做吞掉/重试
//! - 规则 guard 不满足不是错误，规则直接返回空结果

use std::error::Error;

/// `kana_core` 专用 Result，默认错误类型为 [`KanaError`]。
pub type Result<T, E = KanaError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum KanaError {
    /// tokenizer adapter 失败（整次扩展中止，不返回部分结果）
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    /// 扩展迭代次数超过上限（规则集不收敛）
    #[error("augmentation did not reach a fixpoint within {limit} iterations")]
    IterationLimit { limit: usize },

    /// 候选集为空：一个 Question 至少要有一个候选
    #[error("candidate set is empty")]
    EmptyCandidateSet,

    /// 构造 Question 时没有给任何日文答案
    #[error("question {english:?} has no Japanese answers")]
    NoSeeds { english: String },
}

/// tokenizer adapter 的失败：记录出错的原文与底层错误。
#[derive(Debug, thiserror::Error)]
#[error("failed to tokenize {text:?}: {source}")]
pub struct TokenizeError {
    pub text: String,
    #[source]
    source: Box<dyn Error + Send + Sync>,
}

impl TokenizeError {
    pub fn new(text: impl Into<String>, source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }
}

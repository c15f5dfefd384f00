use std::future::Future;
use std::sync::Arc;

use crate::error::TokenizeError;
use crate::model::Morpheme;

/// 形态素解析抽象：core 不关心解析器来自词表/IPADIC/网络。
///
/// 约定：
/// - 返回的词素按原文顺序排列，`marked` 一律为 `false`
/// - 空白可以作为词素返回（`pos` 为记号），engine 会在去重前丢弃
/// - 失败时返回 [`TokenizeError`]，调用方原样向上传递
pub trait Tokenizer: Send + Sync {
    fn tokenize(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<Morpheme>, TokenizeError>> + Send;
}

impl<T> Tokenizer for &T
where
    T: Tokenizer,
{
    fn tokenize(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<Morpheme>, TokenizeError>> + Send {
        (**self).tokenize(text)
    }
}

impl<T> Tokenizer for Arc<T>
where
    T: Tokenizer,
{
    fn tokenize(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<Morpheme>, TokenizeError>> + Send {
        (**self).tokenize(text)
    }
}

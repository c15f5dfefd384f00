//! 词性标签（IPADIC 体系，tokenizer adapter 按此输出 `pos`）。

/// 名词
pub const NOUN: &str = "名詞";
/// 助词
pub const PARTICLE: &str = "助詞";
/// 动词
pub const VERB: &str = "動詞";
/// 助动词
pub const AUXILIARY: &str = "助動詞";
/// 形容词
pub const ADJECTIVE: &str = "形容詞";
/// 记号（标点、空白）；完成判定时忽略
pub const SYMBOL: &str = "記号";

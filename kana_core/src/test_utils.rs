//! 测试用的确定性 tokenizer。

use std::collections::HashMap;

use crate::error::TokenizeError;
use crate::kana::to_katakana;
use crate::model::{Candidate, Morpheme};
use crate::pos;
use crate::tokenizer::Tokenizer;

pub(crate) fn morph(surface: &str, reading: &str, pos: &str) -> Morpheme {
    Morpheme::new(surface, reading, pos, surface)
}

pub(crate) fn verb(surface: &str, reading: &str, base: &str) -> Morpheme {
    Morpheme::new(surface, reading, pos::VERB, base)
}

pub(crate) fn candidate(morphemes: Vec<Morpheme>) -> Candidate {
    Candidate::new(morphemes)
}

/// 按空格切块，每块查表；查不到的块整体作为一个名词，读音取片假名。
///
/// 空格本身会以空白记号词素返回，模拟真实 tokenizer 的行为。
pub(crate) struct FakeTokenizer {
    table: HashMap<String, Vec<Morpheme>>,
    fail_on: Option<String>,
}

impl FakeTokenizer {
    pub(crate) fn new() -> Self {
        let mut t = Self {
            table: HashMap::new(),
            fail_on: None,
        };
        for (s, r, p) in [
            ("私", "ワタシ", pos::NOUN),
            ("僕", "ボク", pos::NOUN),
            ("俺", "オレ", pos::NOUN),
            ("あたし", "アタシ", pos::NOUN),
            ("あなた", "アナタ", pos::NOUN),
            ("君", "キミ", pos::NOUN),
            ("学生", "ガクセイ", pos::NOUN),
            ("それ", "ソレ", pos::NOUN),
            ("そう", "ソウ", pos::NOUN),
            ("日本", "ニホン", pos::NOUN),
            ("人", "ヒト", pos::NOUN),
            ("は", "ハ", pos::PARTICLE),
            ("が", "ガ", pos::PARTICLE),
            ("を", "ヲ", pos::PARTICLE),
            ("か", "カ", pos::PARTICLE),
            ("ね", "ネ", pos::PARTICLE),
            ("と", "ト", pos::PARTICLE),
            ("って", "ッテ", pos::PARTICLE),
            ("という", "トイウ", pos::PARTICLE),
            ("っていう", "ッテイウ", pos::PARTICLE),
            ("では", "デハ", pos::PARTICLE),
            ("じゃ", "ジャ", pos::PARTICLE),
            ("て", "テ", pos::PARTICLE),
            ("で", "デ", pos::PARTICLE),
            ("です", "デス", pos::AUXILIARY),
            ("だ", "ダ", pos::AUXILIARY),
            ("た", "タ", pos::AUXILIARY),
            ("でし", "デシ", pos::AUXILIARY),
            ("だっ", "ダッ", pos::AUXILIARY),
            ("ます", "マス", pos::AUXILIARY),
            ("ませ", "マセ", pos::AUXILIARY),
            ("ん", "ン", pos::AUXILIARY),
            ("ない", "ナイ", pos::AUXILIARY),
            ("高い", "タカイ", pos::ADJECTIVE),
            ("高かっ", "タカカッ", pos::ADJECTIVE),
            ("。", "。", pos::SYMBOL),
            ("、", "、", pos::SYMBOL),
        ] {
            t = t.with(s, vec![morph(s, r, p)]);
        }
        for (s, r, b) in [
            ("言う", "イウ", "言う"),
            ("思う", "オモウ", "思う"),
            ("思っ", "オモッ", "思う"),
            ("行く", "イク", "行く"),
            ("行き", "イキ", "行く"),
            ("食べ", "タベ", "食べる"),
            ("いる", "イル", "いる"),
            ("る", "ル", "る"),
            ("あり", "アリ", "ある"),
        ] {
            t = t.with(s, vec![verb(s, r, b)]);
        }
        t.with(
            "だった",
            vec![morph("だっ", "ダッ", pos::AUXILIARY), morph("た", "タ", pos::AUXILIARY)],
        )
        .with(
            "でした",
            vec![morph("でし", "デシ", pos::AUXILIARY), morph("た", "タ", pos::AUXILIARY)],
        )
        .with(
            "それでした",
            vec![
                morph("それ", "ソレ", pos::NOUN),
                morph("でし", "デシ", pos::AUXILIARY),
                morph("た", "タ", pos::AUXILIARY),
            ],
        )
        .with(
            "それだった",
            vec![
                morph("それ", "ソレ", pos::NOUN),
                morph("だっ", "ダッ", pos::AUXILIARY),
                morph("た", "タ", pos::AUXILIARY),
            ],
        )
    }

    /// 登记一个块的切分结果。
    pub(crate) fn with(mut self, chunk: &str, morphemes: Vec<Morpheme>) -> Self {
        self.table.insert(chunk.to_string(), morphemes);
        self
    }

    /// 原文包含 `needle` 时返回错误。
    pub(crate) fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_string());
        self
    }
}

#[derive(Debug, thiserror::Error)]
#[error("fake tokenizer refused input")]
struct Refused;

impl Tokenizer for FakeTokenizer {
    async fn tokenize(&self, text: &str) -> Result<Vec<Morpheme>, TokenizeError> {
        if let Some(needle) = &self.fail_on {
            if text.contains(needle.as_str()) {
                return Err(TokenizeError::new(text, Refused));
            }
        }
        let mut out = Vec::new();
        for (i, chunk) in text.split(' ').enumerate() {
            if i > 0 {
                out.push(morph(" ", " ", pos::SYMBOL));
            }
            if chunk.is_empty() {
                continue;
            }
            match self.table.get(chunk) {
                Some(ms) => out.extend(ms.iter().cloned()),
                None => out.push(morph(chunk, &to_katakana(chunk), pos::NOUN)),
            }
        }
        Ok(out)
    }
}

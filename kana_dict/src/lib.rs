//! 基于 TSV 词表的形态素解析器：最少词素数的 DP 切分。
//!
//! 适合离线练习与测试；正式词典请用 `kana_vibrato`。

use std::{collections::HashMap, fs, io, path::Path, path::PathBuf};

use kana_core::error::TokenizeError;
use kana_core::model::Morpheme;
use kana_core::pos;
use kana_core::tokenizer::Tokenizer;
use wana_kana::ConvertJapanese;

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("failed to read lexicon {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("lexicon line {line}: {reason}")]
    Format { line: usize, reason: &'static str },
}

#[derive(Debug, Clone)]
struct Entry {
    reading: String,
    pos: String,
    base: String,
}

// 未登录字符的代价远高于一个词条，DP 会优先用词条覆盖。
const KNOWN_COST: u32 = 1;
const UNKNOWN_COST: u32 = 10;

/// TSV 格式：
///
/// - `surface<TAB>reading<TAB>pos[<TAB>base]`
/// - base 可省略，默认等于 surface
/// - 允许 `#` 开头注释行
/// - 同一 surface 重复出现时以第一行为准（多音词交给改写规则）
pub struct TsvLexicon {
    map: HashMap<String, Entry>,
    /// 最长词条的字符数，限制 DP 的回看窗口
    longest: usize,
}

impl TsvLexicon {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lexicon = Self::from_tsv_str(&s)?;
        tracing::info!(path = %path.display(), entries = lexicon.len(), "lexicon loaded");
        Ok(lexicon)
    }

    pub fn from_tsv_str(s: &str) -> Result<Self, LexiconError> {
        let mut map: HashMap<String, Entry> = HashMap::new();
        let mut longest = 0;

        for (idx, line) in s.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let mut it = line.split('\t').map(str::trim);
            let surface = it.next().unwrap_or("");
            let reading = it.next().unwrap_or("");
            let pos = it.next().unwrap_or("");
            if surface.is_empty() || reading.is_empty() || pos.is_empty() {
                return Err(LexiconError::Format {
                    line: idx + 1,
                    reason: "expected surface, reading and pos",
                });
            }
            let base = it.next().filter(|b| !b.is_empty()).unwrap_or(surface);
            longest = longest.max(surface.chars().count());
            map.entry(surface.to_string()).or_insert_with(|| Entry {
                reading: reading.to_katakana(),
                pos: pos.to_string(),
                base: base.to_string(),
            });
        }

        Ok(Self { map, longest })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn morpheme(&self, surface: &str) -> Option<Morpheme> {
        self.map
            .get(surface)
            .map(|e| Morpheme::new(surface, e.reading.as_str(), e.pos.as_str(), e.base.as_str()))
    }

    /// 切分一段不含空白的文本，使总代价最小；同代价时保留先找到的（更长的词条）。
    fn segment_chunk(&self, chunk: &str) -> Vec<Morpheme> {
        let bounds: Vec<usize> = chunk
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(chunk.len()))
            .collect();
        let n = bounds.len() - 1;
        let mut best: Vec<Option<u32>> = vec![None; n + 1];
        let mut prev: Vec<usize> = vec![0; n + 1];
        best[0] = Some(0);

        for i in 0..n {
            let Some(base) = best[i] else { continue };
            let widest = self.longest.min(n - i).max(1);
            for len in (1..=widest).rev() {
                let j = i + len;
                let piece = &chunk[bounds[i]..bounds[j]];
                let cost = if self.map.contains_key(piece) {
                    KNOWN_COST
                } else if len == 1 {
                    UNKNOWN_COST
                } else {
                    continue;
                };
                let score = base + cost;
                if best[j].is_none_or(|b| score < b) {
                    best[j] = Some(score);
                    prev[j] = i;
                }
            }
        }

        // 回溯
        let mut pieces = Vec::new();
        let mut cur = n;
        while cur > 0 {
            let p = prev[cur];
            pieces.push(&chunk[bounds[p]..bounds[cur]]);
            cur = p;
        }
        pieces.reverse();
        pieces
            .into_iter()
            .map(|piece| self.morpheme(piece).unwrap_or_else(|| unknown(piece)))
            .collect()
    }
}

fn is_punctuation(ch: char) -> bool {
    ch.is_ascii_punctuation()
        || matches!(ch as u32, 0x3000..=0x303F | 0xFF01..=0xFF0F | 0xFF1A..=0xFF20 | 0xFF3B..=0xFF40 | 0xFF5B..=0xFF65)
}

fn unknown(piece: &str) -> Morpheme {
    tracing::debug!(surface = piece, "unknown character");
    if piece.chars().all(is_punctuation) {
        Morpheme::new(piece, piece, pos::SYMBOL, piece)
    } else {
        Morpheme::new(piece, piece.to_katakana(), pos::NOUN, piece)
    }
}

impl Tokenizer for TsvLexicon {
    async fn tokenize(&self, text: &str) -> Result<Vec<Morpheme>, TokenizeError> {
        let mut out = Vec::new();
        let mut rest = text;
        while !rest.is_empty() {
            // 空白与非空白交替成段；空白原样作为记号词素返回
            let blank = rest.starts_with(char::is_whitespace);
            let end = rest
                .find(|c: char| c.is_whitespace() != blank)
                .unwrap_or(rest.len());
            let (run, tail) = rest.split_at(end);
            if blank {
                out.push(Morpheme::new(run, run, pos::SYMBOL, run));
            } else {
                out.extend(self.segment_chunk(run));
            }
            rest = tail;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEXICON: &str = "\
# surface\treading\tpos\tbase
私\tわたし\t名詞
は\tハ\t助詞
学生\tガクセイ\t名詞
学\tガク\t名詞
生\tセイ\t名詞
です\tデス\t助動詞
日本\tニホン\t名詞
日本\tニッポン\t名詞
人\tジン\t名詞
言っ\tイッ\t動詞\t言う
";

    fn lexicon() -> TsvLexicon {
        TsvLexicon::from_tsv_str(LEXICON).unwrap()
    }

    async fn surfaces(text: &str) -> Vec<String> {
        lexicon()
            .tokenize(text)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.surface)
            .collect()
    }

    #[test]
    fn parses_entries_and_skips_comments() {
        let lex = lexicon();
        assert_eq!(lex.len(), 9);
        let m = lex.morpheme("言っ").unwrap();
        assert_eq!(m.base, "言う");
        assert_eq!(m.pos, "動詞");
        // base 省略时等于 surface；读音统一成片假名
        let m = lex.morpheme("私").unwrap();
        assert_eq!(m.base, "私");
        assert_eq!(m.reading, "ワタシ");
    }

    #[test]
    fn first_reading_of_a_heteronym_wins() {
        assert_eq!(lexicon().morpheme("日本").unwrap().reading, "ニホン");
    }

    #[test]
    fn missing_columns_are_rejected_with_line_number() {
        let err = TsvLexicon::from_tsv_str("# header\n私\tワタシ\n").err().unwrap();
        assert!(matches!(err, LexiconError::Format { line: 2, .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = TsvLexicon::from_path("/nonexistent/lexicon.tsv").err().unwrap();
        assert!(matches!(err, LexiconError::Io { .. }));
    }

    #[tokio::test]
    async fn segments_unspaced_text_with_fewest_morphemes() {
        assert_eq!(surfaces("私は学生です").await, ["私", "は", "学生", "です"]);
        assert_eq!(surfaces("日本人").await, ["日本", "人"]);
    }

    #[tokio::test]
    async fn whitespace_comes_back_as_blank_symbols() {
        let ms = lexicon().tokenize("私 は").await.unwrap();
        assert_eq!(ms.len(), 3);
        assert!(ms[1].is_blank());
        assert_eq!(ms[1].pos, pos::SYMBOL);
    }

    #[tokio::test]
    async fn unknown_characters_fall_back_per_character() {
        let ms = lexicon().tokenize("私はねこ。").await.unwrap();
        let got: Vec<(&str, &str, &str)> = ms
            .iter()
            .map(|m| (m.surface.as_str(), m.reading.as_str(), m.pos.as_str()))
            .collect();
        assert_eq!(
            got,
            [
                ("私", "ワタシ", "名詞"),
                ("は", "ハ", "助詞"),
                ("ね", "ネ", "名詞"),
                ("こ", "コ", "名詞"),
                ("。", "。", "記号"),
            ]
        );
    }

    #[tokio::test]
    async fn empty_text_has_no_morphemes() {
        assert!(lexicon().tokenize("").await.unwrap().is_empty());
    }
}

//! vibrato（MeCab 兼容词典）形态素解析适配器。
//!
//! 约定：
//! - 系统词典为 zstd 压缩的 vibrato 格式（例如 `ipadic-mecab-2_7_0/system.dic.zst`）
//! - feature 按 IPADIC 的列序解析：0 = 词性，6 = 原形，7 = 读音
//! - 未登录词缺少读音列时，读音取表层形的片假名

use std::{fs::File, io, path::Path, path::PathBuf};

use kana_core::error::TokenizeError;
use kana_core::model::Morpheme;
use wana_kana::ConvertJapanese;

const POS_FIELD: usize = 0;
const BASE_FIELD: usize = 6;
const READING_FIELD: usize = 7;

#[derive(Debug, thiserror::Error)]
pub enum VibratoLoadError {
    #[error("failed to open system dictionary {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid system dictionary {path}")]
    Dictionary {
        path: PathBuf,
        #[source]
        source: vibrato::errors::VibratoError,
    },
}

pub struct VibratoTokenizer {
    inner: vibrato::Tokenizer,
}

impl VibratoTokenizer {
    /// 读入 zstd 压缩的系统词典。
    pub fn from_zstd(path: impl AsRef<Path>) -> Result<Self, VibratoLoadError> {
        let path = path.as_ref();
        let io_err = |source| VibratoLoadError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_err)?;
        let reader = zstd::Decoder::new(file).map_err(io_err)?;
        let dict = vibrato::Dictionary::read(reader).map_err(|source| VibratoLoadError::Dictionary {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "system dictionary loaded");
        Ok(Self {
            inner: vibrato::Tokenizer::new(dict),
        })
    }
}

/// 把一条 IPADIC feature 转成词素。
fn morpheme_from_feature(surface: &str, feature: &str) -> Morpheme {
    let fields: Vec<&str> = feature.split(',').collect();
    let field = |i: usize| fields.get(i).copied().filter(|f| !f.is_empty() && *f != "*");
    let pos = field(POS_FIELD).unwrap_or(kana_core::pos::NOUN);
    let base = field(BASE_FIELD).unwrap_or(surface);
    let reading = match field(READING_FIELD) {
        Some(r) => r.to_string(),
        None => surface.to_katakana(),
    };
    Morpheme::new(surface, reading, pos, base)
}

impl kana_core::Tokenizer for VibratoTokenizer {
    async fn tokenize(&self, text: &str) -> Result<Vec<Morpheme>, TokenizeError> {
        let mut worker = self.inner.new_worker();
        worker.reset_sentence(text);
        worker.tokenize();
        let morphemes: Vec<Morpheme> = worker
            .token_iter()
            .map(|t| morpheme_from_feature(t.surface(), t.feature()))
            .collect();
        tracing::trace!(text, morphemes = morphemes.len(), "tokenized");
        Ok(morphemes)
    }
}

//! 假名规范化：学习者输入统一成片假名后再与读音比较。

use wana_kana::ConvertJapanese;

/// 平假名 -> 片假名；汉字、片假名与长音符原样保留。
pub fn to_katakana(input: &str) -> String {
    input.to_katakana()
}

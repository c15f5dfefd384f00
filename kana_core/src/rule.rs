//! `rule`：改写规则，把一个候选扩展成零到多个等价候选。
//!
//! 规则分四类（见 [`RuleKind`]）：
//! - `Rewrite`：guard 通过后对整串文本做改写，再重新切分
//! - `Substitute`：按表层形精确替换某个词素，再重新切分
//! - `Reading`：只改某个词素的读音，不重新切分
//! - `Inflect`：句末谓语的活用改写（启发式），再重新切分
//!
//! 约定：
//! - 规则是纯函数，不修改输入；guard 不满足时返回空结果而不是报错
//! - 规则之间没有先后依赖，engine 每轮对每个候选跑全部规则
//! - 只有重新切分会调用 tokenizer，这是唯一的 await 点

use std::fmt;

use crate::error::Result;
use crate::model::{Candidate, Morpheme};
use crate::pos;
use crate::tokenizer::Tokenizer;

/// 整串 guard：决定 `Rewrite` 是否触发。
pub type Guard = fn(&[Morpheme]) -> bool;
/// 整串改写：输入以空格连接的表层形，输出若干新文本。
pub type Replace = fn(&str) -> Vec<String>;
/// 位置 guard：`(词素序列, 命中下标)`，决定某个命中能否替换。
pub type SiteGuard = fn(&[Morpheme], usize) -> bool;
/// 活用改写：返回改写后的表层形序列（以空格连接后重新切分）。
pub type Inflect = fn(&[Morpheme]) -> Option<Vec<String>>;

/// 重新切分前用什么连接表层形。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    /// 独立的词：用空格隔开
    Word,
    /// 需要与前后粘连的片段（例如复合助动词）：直接拼接
    Fragment,
}

impl Join {
    fn separator(self) -> &'static str {
        match self {
            Join::Word => " ",
            Join::Fragment => "",
        }
    }
}

/// 替换范围。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// 所有满足条件的命中
    Every,
    /// 第一个满足条件的命中
    First,
}

/// 词素替换的参数。
#[derive(Clone, Copy)]
pub struct Substitution {
    pub search: &'static str,
    pub replacement: &'static str,
    pub join: Join,
    pub scope: Scope,
    /// 命中位置的上下文检查；None 表示不检查
    pub site: Option<SiteGuard>,
    /// 没有命中时也返回重新切分的结果（由 engine 的去重吸收）
    pub always: bool,
}

impl Substitution {
    /// 返回替换后的表层形序列；不触发时返回 None。
    fn substitute<'a>(&'a self, morphemes: &'a [Morpheme]) -> Option<Vec<&'a str>> {
        let mut hits = morphemes
            .iter()
            .enumerate()
            .filter(|(i, m)| m.surface == self.search && self.site.is_none_or(|g| g(morphemes, *i)))
            .map(|(i, _)| i);
        let hits: Vec<usize> = match self.scope {
            Scope::Every => hits.collect(),
            Scope::First => hits.next().into_iter().collect(),
        };
        if hits.is_empty() && !self.always {
            return None;
        }
        Some(
            morphemes
                .iter()
                .enumerate()
                .map(|(i, m)| {
                    if hits.contains(&i) {
                        self.replacement
                    } else {
                        m.surface.as_str()
                    }
                })
                .collect(),
        )
    }
}

#[derive(Clone, Copy)]
pub enum RuleKind {
    Rewrite { guard: Guard, replace: Replace },
    Substitute(Substitution),
    Reading {
        surface: &'static str,
        reading: &'static str,
    },
    Inflect(Inflect),
}

/// 一条改写规则。
#[derive(Clone, Copy)]
pub struct Rule {
    /// 规则名（日志用）
    pub name: &'static str,
    pub kind: RuleKind,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish_non_exhaustive()
    }
}

impl Rule {
    pub const fn rewrite(name: &'static str, guard: Guard, replace: Replace) -> Self {
        Self {
            name,
            kind: RuleKind::Rewrite { guard, replace },
        }
    }

    /// 整词替换：所有命中都替换；没命中时仍返回重新切分的结果。
    pub const fn whole_token(name: &'static str, search: &'static str, replacement: &'static str) -> Self {
        Self {
            name,
            kind: RuleKind::Substitute(Substitution {
                search,
                replacement,
                join: Join::Word,
                scope: Scope::Every,
                site: None,
                always: true,
            }),
        }
    }

    /// 复合片段替换：只在命中时触发，拼接时不加空格，交给 tokenizer 重新切分。
    pub const fn compound(
        name: &'static str,
        search: &'static str,
        replacement: &'static str,
        site: Option<SiteGuard>,
    ) -> Self {
        Self {
            name,
            kind: RuleKind::Substitute(Substitution {
                search,
                replacement,
                join: Join::Fragment,
                scope: Scope::Every,
                site,
                always: false,
            }),
        }
    }

    /// 单点替换：替换第一个满足 `site` 的命中。
    pub const fn token(
        name: &'static str,
        search: &'static str,
        replacement: &'static str,
        site: Option<SiteGuard>,
    ) -> Self {
        Self {
            name,
            kind: RuleKind::Substitute(Substitution {
                search,
                replacement,
                join: Join::Word,
                scope: Scope::First,
                site,
                always: false,
            }),
        }
    }

    /// 读音替换：第一个表层形为 `surface` 的词素改读 `reading`。
    pub const fn reading(name: &'static str, surface: &'static str, reading: &'static str) -> Self {
        Self {
            name,
            kind: RuleKind::Reading { surface, reading },
        }
    }

    pub const fn inflect(name: &'static str, inflect: Inflect) -> Self {
        Self {
            name,
            kind: RuleKind::Inflect(inflect),
        }
    }

    /// 对一个候选应用本规则。tokenizer 失败原样返回。
    pub async fn apply<T>(&self, tokenizer: &T, candidate: &Candidate) -> Result<Vec<Candidate>>
    where
        T: Tokenizer,
    {
        match self.kind {
            RuleKind::Rewrite { guard, replace } => {
                if !guard(candidate) {
                    return Ok(Vec::new());
                }
                let raw = candidate.join_surfaces(" ");
                let mut out = Vec::new();
                for text in replace(&raw) {
                    out.push(retokenize(tokenizer, &text).await?);
                }
                Ok(out)
            }
            RuleKind::Substitute(ref sub) => {
                let Some(surfaces) = sub.substitute(candidate) else {
                    return Ok(Vec::new());
                };
                let text = surfaces.join(sub.join.separator());
                Ok(vec![retokenize(tokenizer, &text).await?])
            }
            RuleKind::Reading { surface, reading } => {
                let Some(idx) = candidate.iter().position(|m| m.surface == surface) else {
                    return Ok(Vec::new());
                };
                let mut variant = candidate.clone();
                variant[idx].reading = reading.to_string();
                Ok(vec![variant])
            }
            RuleKind::Inflect(inflect) => match inflect(candidate) {
                Some(words) => Ok(vec![retokenize(tokenizer, &words.join(" ")).await?]),
                None => Ok(Vec::new()),
            },
        }
    }
}

async fn retokenize<T>(tokenizer: &T, text: &str) -> Result<Candidate>
where
    T: Tokenizer,
{
    let morphemes = tokenizer.tokenize(text).await?;
    Ok(Candidate::new(morphemes).without_blanks())
}

/// 引号动词：と/って 后面跟这些动词时可以互换。
const QUOTE_VERBS: [&str; 2] = ["言う", "思う"];

/// 默认规则表。
pub fn default_rules() -> Vec<Rule> {
    vec![
        // 人称代词
        Rule::whole_token("watashi-boku", "私", "僕"),
        Rule::whole_token("boku-ore", "僕", "俺"),
        Rule::whole_token("anata-kimi", "あなた", "君"),
        Rule::whole_token("kimi-anata", "君", "あなた"),
        Rule::whole_token("watashi-atashi", "私", "あたし"),
        // 系词
        Rule::token("desu-da", "です", "だ", Some(copula_site)),
        Rule::token("da-desu", "だ", "です", Some(copula_site)),
        Rule::rewrite("drop-watashi-wa", starts_with_watashi_wa, drop_watashi_wa),
        Rule::reading("nihon-nippon", "日本", "ニッポン"),
        Rule::reading("nippon-nihon", "日本", "ニホン"),
        Rule::token("dewa-ja", "では", "じゃ", Some(dewa_site)),
        Rule::token("ja-dewa", "じゃ", "では", None),
        Rule::inflect("progressive-contract", progressive_contract),
        Rule::inflect("progressive-expand", progressive_expand),
        // 引号
        Rule::token("toiu-tteiu", "という", "っていう", None),
        Rule::token("tteiu-toiu", "っていう", "という", None),
        Rule::token("to-tte", "と", "って", Some(quote_particle_site)),
        Rule::token("tte-to", "って", "と", Some(quote_verb_site)),
        // 过去系词
        Rule::compound("datta-deshita", "だった", "でした", Some(not_after_adjective)),
        Rule::compound("deshita-datta", "でした", "だった", Some(not_after_adjective)),
        // 敬体/简体
        Rule::inflect("polite-plain", polite_to_plain),
        Rule::inflect("plain-polite", plain_to_polite),
        Rule::inflect("negative-polite-plain", negative_polite_to_plain),
        Rule::inflect("negative-plain-polite", negative_plain_to_polite),
    ]
}

// 系词只在句末（或句末名词/记号之前），且前面是名词时才能换。
fn copula_site(ms: &[Morpheme], i: usize) -> bool {
    let n = ms.len();
    let at_end = i + 1 == n
        || (i + 2 == n && matches!(ms[n - 1].pos.as_str(), pos::SYMBOL | pos::NOUN));
    at_end && (i == 0 || ms[i - 1].pos == pos::NOUN)
}

fn starts_with_watashi_wa(ms: &[Morpheme]) -> bool {
    ms.len() > 2 && ms[0].surface == "私" && ms[1].surface == "は"
}

fn drop_watashi_wa(raw: &str) -> Vec<String> {
    let words: Vec<&str> = raw.split(' ').filter(|w| !w.is_empty()).collect();
    match words.as_slice() {
        ["私", "は", rest @ ..] if !rest.is_empty() => vec![rest.join(" ")],
        _ => Vec::new(),
    }
}

// ではありない 不缩约。
fn dewa_site(ms: &[Morpheme], i: usize) -> bool {
    let followed_by = |offset: usize, surface: &str| ms.get(i + offset).is_some_and(|m| m.surface == surface);
    !(followed_by(1, "あり") && followed_by(2, "ない"))
}

fn is_quote_verb(m: &Morpheme) -> bool {
    m.pos == pos::VERB
        && (QUOTE_VERBS.contains(&m.base.as_str()) || QUOTE_VERBS.contains(&m.surface.as_str()))
}

fn quote_particle_site(ms: &[Morpheme], i: usize) -> bool {
    ms[i].pos == pos::PARTICLE && quote_verb_site(ms, i)
}

fn quote_verb_site(ms: &[Morpheme], i: usize) -> bool {
    ms.get(i + 1).is_some_and(is_quote_verb)
}

fn not_after_adjective(ms: &[Morpheme], i: usize) -> bool {
    i == 0 || ms[i - 1].pos != pos::ADJECTIVE
}

/// 最后一个非记号词素的下标。
fn last_content_index(ms: &[Morpheme]) -> Option<usize> {
    ms.iter().rposition(|m| !m.is_symbol())
}

fn surfaces(ms: &[Morpheme]) -> Vec<String> {
    ms.iter().map(|m| m.surface.clone()).collect()
}

fn progressive_contract(ms: &[Morpheme]) -> Option<Vec<String>> {
    let last = last_content_index(ms)?;
    let verb = &ms[last];
    if verb.pos != pos::VERB {
        return None;
    }
    let mut words = surfaces(ms);
    // 切开的形式：て/で + いる
    if last >= 1 && verb.surface == "いる" && matches!(ms[last - 1].surface.as_str(), "て" | "で") {
        words[last] = "る".to_string();
        return Some(words);
    }
    if !verb.surface.contains("ている") && !verb.surface.contains("でいる") {
        return None;
    }
    words[last] = verb.surface.replace("ている", "てる").replace("でいる", "でる");
    Some(words)
}

fn progressive_expand(ms: &[Morpheme]) -> Option<Vec<String>> {
    let last = last_content_index(ms)?;
    let verb = &ms[last];
    if verb.pos != pos::VERB || (!verb.surface.contains("てる") && !verb.surface.contains("でる")) {
        return None;
    }
    let mut words = surfaces(ms);
    words[last] = verb.surface.replace("てる", "ている").replace("でる", "でいる");
    Some(words)
}

fn polite_to_plain(ms: &[Morpheme]) -> Option<Vec<String>> {
    let last = last_content_index(ms)?;
    let verb = &ms[last];
    if verb.pos != pos::VERB {
        return None;
    }
    let stem = verb.surface.strip_suffix("ます")?;
    let mut words = surfaces(ms);
    words[last] = stem.to_string();
    Some(words)
}

// 只处理 ～る（一段）和 ～う（五段）两种。
fn plain_to_polite(ms: &[Morpheme]) -> Option<Vec<String>> {
    let last = last_content_index(ms)?;
    let verb = &ms[last];
    if verb.pos != pos::VERB {
        return None;
    }
    let polite = if let Some(stem) = verb.surface.strip_suffix('る') {
        format!("{stem}ます")
    } else if let Some(stem) = verb.surface.strip_suffix('う') {
        format!("{stem}います")
    } else {
        return None;
    };
    let mut words = surfaces(ms);
    words[last] = polite;
    Some(words)
}

fn negative_polite_to_plain(ms: &[Morpheme]) -> Option<Vec<String>> {
    let last = last_content_index(ms)?;
    if last < 1 || ms[last - 1].surface != "ませ" || ms[last].surface != "ん" {
        return None;
    }
    // ありません 不变成 ありない
    if last >= 2 && ms[last - 2].surface == "あり" {
        return None;
    }
    let mut words = surfaces(&ms[..last - 1]);
    words.push("ない".to_string());
    words.extend(surfaces(&ms[last + 1..]));
    Some(words)
}

fn negative_plain_to_polite(ms: &[Morpheme]) -> Option<Vec<String>> {
    let last = last_content_index(ms)?;
    if last < 1 || ms[last].surface != "ない" || ms[last - 1].pos != pos::VERB {
        return None;
    }
    let mut words = surfaces(&ms[..last]);
    words.push("ませ".to_string());
    words.push("ん".to_string());
    words.extend(surfaces(&ms[last + 1..]));
    Some(words)
}

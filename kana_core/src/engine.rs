use std::collections::{HashMap, VecDeque};

use crate::error::{KanaError, Result};
use crate::model::{Candidate, CandidateSet, Question};
use crate::rule::{Rule, default_rules};
use crate::tokenizer::Tokenizer;

/// 默认迭代上限：固定规则表下远远达不到，只用来兜住不收敛的规则集。
const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// 引擎：负责把日文原句变成完整的候选集。
///
/// 结构上对应流水线：
/// - tokenizer（切分） -> rules（改写） -> 工作队列去重（不动点） -> 排序 -> 输出 `CandidateSet`
pub struct Engine<T> {
    /// 形态素解析器（外部提供）
    tokenizer: T,
    /// 改写规则表
    rules: Vec<Rule>,
    /// 工作队列最多处理多少个候选
    max_iterations: usize,
}

impl<T> Engine<T>
where
    T: Tokenizer,
{
    pub fn new(tokenizer: T) -> Self {
        Self {
            tokenizer,
            rules: default_rules(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// 替换规则表。
    pub fn rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    /// 设置迭代上限；0 会回退到默认值。
    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = if n == 0 { DEFAULT_MAX_ITERATIONS } else { n };
        self
    }

    /// 切分一句原文，丢弃空白词素。
    pub async fn tokenize(&self, text: &str) -> Result<Candidate> {
        let morphemes = self.tokenizer.tokenize(text).await?;
        Ok(Candidate::new(morphemes).without_blanks())
    }

    /// 从种子候选出发反复应用全部规则，直到不再产生新候选。
    ///
    /// - 以 `lexical_key` 去重，先到者为准
    /// - 输出按 `lexical_key` 升序，与队列处理顺序无关
    /// - 任一规则的 tokenizer 调用失败则整体失败
    pub async fn augment(&self, seeds: Vec<Candidate>) -> Result<CandidateSet> {
        let mut seen: HashMap<String, Candidate> = HashMap::new();
        let mut queue: VecDeque<Candidate> = VecDeque::new();

        for seed in seeds {
            enqueue(&mut seen, &mut queue, seed);
        }

        let mut iterations = 0usize;
        while let Some(current) = queue.pop_front() {
            iterations += 1;
            if iterations > self.max_iterations {
                tracing::warn!(limit = self.max_iterations, "augmentation did not converge");
                return Err(KanaError::IterationLimit {
                    limit: self.max_iterations,
                });
            }
            for rule in &self.rules {
                let produced = rule.apply(&self.tokenizer, &current).await?;
                if produced.is_empty() {
                    continue;
                }
                let mut fresh = 0usize;
                for candidate in produced {
                    if enqueue(&mut seen, &mut queue, candidate) {
                        fresh += 1;
                    }
                }
                tracing::debug!(rule = rule.name, fresh, "rule fired");
            }
        }

        let set = CandidateSet::new(seen.into_values().collect());
        tracing::info!(candidates = set.len(), iterations, "augmentation reached fixpoint");
        Ok(set)
    }

    /// 构造一道题：切分每个日文答案、扩展、所有 `marked` 置 false。
    ///
    /// 切分后为空的答案被跳过；一个有效答案都没有时返回 [`KanaError::NoSeeds`]。
    pub async fn make_question<S>(&self, english: &str, japanese: &[S]) -> Result<Question>
    where
        S: AsRef<str>,
    {
        let mut seeds = Vec::with_capacity(japanese.len());
        for text in japanese {
            let seed = self.tokenize(text.as_ref()).await?;
            if seed.is_empty() {
                tracing::warn!(text = text.as_ref(), "answer has no morphemes, skipped");
                continue;
            }
            seeds.push(seed);
        }
        if seeds.is_empty() {
            return Err(KanaError::NoSeeds {
                english: english.to_string(),
            });
        }
        let mut parsed = self.augment(seeds).await?;
        parsed.reset_marks();
        Ok(Question {
            english: english.to_string(),
            japanese: japanese.iter().map(|s| s.as_ref().to_string()).collect(),
            parsed,
        })
    }
}

/// 丢弃空白后按键去重；新候选入队并返回 true。空候选直接丢弃。
fn enqueue(
    seen: &mut HashMap<String, Candidate>,
    queue: &mut VecDeque<Candidate>,
    candidate: Candidate,
) -> bool {
    let candidate = candidate.without_blanks();
    if candidate.is_empty() {
        return false;
    }
    let key = candidate.lexical_key();
    if seen.contains_key(&key) {
        return false;
    }
    queue.push_back(candidate.clone());
    seen.insert(key, candidate);
    true
}

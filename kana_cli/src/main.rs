use std::{
    error::Error,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use clap::Parser;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use kana_core::{
    Engine, Question, Session, Tokenizer,
    key_event::{Action, InputEvent},
    model::UiState,
};
use kana_dict::TsvLexicon;
use kana_vibrato::VibratoTokenizer;

#[derive(Parser)]
#[command(name = "kana_cli", about = "日语读音练习：看英文，按顺序输入日文读音（假名）")]
struct Cli {
    /// 题目集（JSON）
    #[arg(long)]
    questions: Option<PathBuf>,
    /// TSV 词表（未指定 --sysdic 时使用）
    #[arg(long)]
    lexicon: Option<PathBuf>,
    /// vibrato 系统词典（zstd 压缩）
    #[arg(long)]
    sysdic: Option<PathBuf>,
    /// 扩展候选时的迭代上限，0 表示默认值
    #[arg(long, default_value_t = 0)]
    max_iterations: usize,
    /// 只打印扩展后的候选集（JSON），不进入练习
    #[arg(long)]
    dump: bool,
    /// 练习时显示仍然领先的候选
    #[arg(long)]
    debug: bool,
    /// 日志级别（RUST_LOG 优先）
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// 题目集里的一条。
#[derive(Debug, Deserialize)]
struct QuestionEntry {
    english: String,
    japanese: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .with_writer(io::stderr)
        .init();

    let questions_path = cli.questions.clone().unwrap_or_else(|| asset_path("questions.json"));
    let entries = load_questions(&questions_path)?;
    tracing::info!(path = %questions_path.display(), count = entries.len(), "question set loaded");

    match &cli.sysdic {
        Some(sysdic) => run(VibratoTokenizer::from_zstd(sysdic)?, &cli, &entries).await,
        None => {
            let lexicon = cli.lexicon.clone().unwrap_or_else(|| asset_path("lexicon.tsv"));
            run(TsvLexicon::from_path(&lexicon)?, &cli, &entries).await
        }
    }
}

fn asset_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("asset").join(name)
}

fn load_questions(path: &Path) -> Result<Vec<QuestionEntry>, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&s)?)
}

async fn run<T: Tokenizer>(tokenizer: T, cli: &Cli, entries: &[QuestionEntry]) -> Result<(), Box<dyn Error>> {
    let engine = Engine::new(tokenizer).max_iterations(cli.max_iterations);
    let mut questions = Vec::with_capacity(entries.len());
    for entry in entries {
        questions.push(engine.make_question(&entry.english, &entry.japanese).await?);
    }

    if cli.dump {
        println!("{}", serde_json::to_string_pretty(&questions)?);
        return Ok(());
    }
    if questions.is_empty() {
        println!("(题目集为空)");
        return Ok(());
    }
    repl(&questions, cli.debug)?;
    Ok(())
}

fn repl(questions: &[Question], debug: bool) -> io::Result<()> {
    let mut out = io::stdout();
    let mut line = String::new();
    let mut session = Session::new();
    let mut current = 0usize;
    let mut solved = 0usize;

    writeln!(out, "kana drill | {} 题", questions.len())?;
    writeln!(out, "输入假名读音后回车；完成后直接回车进入下一题。:s 跳过，:q 退出。")?;

    session.supply(&questions[current]);
    show(&mut out, session.ui_state().as_ref(), debug)?;

    loop {
        line.clear();
        print!("kana> ");
        out.flush()?;
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input == ":q" || input == ":quit" || input == ":exit" {
            break;
        }
        let ev = if input == ":s" {
            InputEvent::Skip
        } else {
            InputEvent::Submit(input.to_string())
        };

        let (ui, actions) = session.handle(ev);
        let mut next = false;
        for a in actions {
            match a {
                Action::Accepted => {}
                Action::Rejected => writeln!(out, "  ✗ 没有对上")?,
                Action::Completed => {
                    solved += 1;
                    writeln!(out, "  ✓ 完成！回车进入下一题")?;
                }
                Action::RequestNextQuestion => next = true,
            }
        }

        if next {
            current = (current + 1) % questions.len();
            session.supply(&questions[current]);
            writeln!(out, "--------------------")?;
            show(&mut out, session.ui_state().as_ref(), debug)?;
        } else {
            show(&mut out, ui.as_ref(), debug)?;
        }
    }

    writeln!(out, "完成 {solved} 题")?;
    Ok(())
}

fn show(out: &mut impl Write, ui: Option<&UiState>, debug: bool) -> io::Result<()> {
    let Some(ui) = ui else {
        return writeln!(out, "(没有题目)");
    };
    writeln!(out, "{}", ui.english)?;
    writeln!(out, "  {}", ui.skeleton)?;
    if debug {
        for s in &ui.leading {
            writeln!(out, "    · {s}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_question_set_parses() {
        let entries = load_questions(&asset_path("questions.json")).unwrap();
        assert!(!entries.is_empty());
        assert!(entries.iter().all(|s| !s.english.is_empty() && !s.japanese.is_empty()));
    }

    #[test]
    fn bundled_lexicon_loads() {
        let lexicon = TsvLexicon::from_path(asset_path("lexicon.tsv")).unwrap();
        assert!(!lexicon.is_empty());
    }
}

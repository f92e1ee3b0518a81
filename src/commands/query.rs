use colored::Colorize;
use contextor::{Contextor, PromptStyle, prompt::preview};
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use rag_store::{IndicatifProgress, Progress, RagHit};
use tracing::debug;

use crate::cli::QueryArgs;
use crate::commands::{CmdResult, open_contextor};

const PREVIEW_CHARS: usize = 400;
const NO_SOURCE: &str = "N/A";

pub async fn run(args: QueryArgs) -> CmdResult {
    let contextor = open_contextor(&args.index, args.top_k).await?;
    println!(
        "{}",
        format!("Vector store loaded ({} chunks).", contextor.store().len()).green()
    );

    let theme = ColorfulTheme::default();
    loop {
        println!();
        let input: String = match Input::with_theme(&theme)
            .with_prompt("Enter your query (or 'exit' to quit)")
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => line,
            Err(e) => {
                debug!(error = %e, "input closed");
                break;
            }
        };

        let query = input.trim();
        if query.is_empty() {
            continue;
        }
        if is_exit(query) {
            break;
        }

        if let Err(e) = handle(&contextor, &theme, query).await {
            eprintln!("{} {e}", "Error:".red().bold());
        }
    }

    println!("Goodbye.");
    Ok(())
}

async fn handle(contextor: &Contextor, theme: &ColorfulTheme, query: &str) -> CmdResult {
    println!("Searching for: '{query}'");
    let hits = contextor.retrieve(query, 0).await?;

    println!("\n{}\n", format!("Top {} results:", hits.len()).bold());
    for (i, hit) in hits.iter().enumerate() {
        println!("{}\n", format_hit(i + 1, hit));
    }

    let generate = Confirm::with_theme(theme)
        .with_prompt("Generate an LLM answer?")
        .default(false)
        .interact()?;
    if !generate {
        return Ok(());
    }

    let spinner = IndicatifProgress::spinner();
    spinner.message("asking the model...");
    let answer = contextor.answer(query, &hits, PromptStyle::Strict, None).await;
    spinner.finish("");

    println!("\n{}\n", "LLM Answer:".cyan().bold());
    println!("{}", answer?);
    Ok(())
}

fn is_exit(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

/// Rank, score, source and a 400-character preview of one hit.
fn format_hit(rank: usize, hit: &RagHit) -> String {
    format!(
        "--- Result {rank} (score={:.4}) ---\nSource: {}\nContent: {}",
        hit.score,
        hit.source.as_deref().unwrap_or(NO_SOURCE),
        preview(&hit.text, PREVIEW_CHARS)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_words_are_case_insensitive() {
        assert!(is_exit("exit"));
        assert!(is_exit("QUIT"));
        assert!(!is_exit("exit now"));
    }

    #[test]
    fn hit_is_printed_with_four_decimals_and_default_source() {
        let hit = RagHit {
            score: 0.123456,
            text: "x".repeat(450),
            source: None,
        };
        let out = format_hit(2, &hit);
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("--- Result 2 (score=0.1235) ---"));
        assert_eq!(lines.next(), Some("Source: N/A"));
        let content = lines.next().unwrap();
        assert_eq!(content, format!("Content: {}...", "x".repeat(400)));
    }
}

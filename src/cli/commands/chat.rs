//! Interactive chat command.

use crate::cli::Output;
use crate::config::Settings;
use crate::language::Language;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Run the interactive chat command.
pub async fn run_chat(settings: Settings) -> Result<()> {
    let banner_language = settings.chat.language;
    let orchestrator = Orchestrator::new(settings)?;
    let engine = orchestrator.engine();
    let mut session = orchestrator.new_session();

    println!("\n{}", style("Kotae Chat").bold().cyan());
    let hint = match banner_language {
        Language::Ja => "質問を入力してください。'clear' で会話をリセット、'exit' で終了します。",
        Language::En => "Type your questions, or 'exit' to quit. Use 'clear' to reset conversation.",
    };
    println!("{}\n", style(hint).dim());

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            session.clear();
            Output::info("Conversation history cleared.");
            continue;
        }

        let response = engine.chat(input, &mut session).await;
        debug!(
            "Turn done: topic={}, confidence={}, history={}",
            response.topic,
            response.confidence,
            session.history().len()
        );

        println!("\n{} {}\n", style("Kotae:").cyan().bold(), response.format_for_display());
    }

    Ok(())
}

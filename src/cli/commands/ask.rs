//! Ask command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ask command: one turn against a fresh session.
pub async fn run_ask(message: &str, settings: Settings) -> Result<()> {
    let message = message.trim();
    if message.is_empty() {
        Output::error("Message is empty.");
        anyhow::bail!("empty message");
    }

    let orchestrator = Orchestrator::new(settings)?;
    let mut session = orchestrator.new_session();

    let spinner = Output::spinner("Searching passages...");
    let response = orchestrator.engine().chat(message, &mut session).await;
    spinner.finish_and_clear();

    println!("\n{}\n", response.response);

    Output::kv("topic", &response.topic.to_string());
    Output::confidence(response.confidence);

    let sources: Vec<&String> = response.sources.iter().filter(|s| !s.is_empty()).collect();
    if !sources.is_empty() {
        Output::header("Sources");
        for source in sources {
            Output::list_item(source);
        }
    }

    Ok(())
}

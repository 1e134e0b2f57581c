//! Search command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, limit: usize, settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let retriever = orchestrator.retriever();

    let spinner = Output::spinner("Searching...");
    let results = retriever.search(query, limit).await;
    spinner.finish_and_clear();

    match results {
        Ok(passages) => {
            if passages.is_empty() {
                Output::warning("No passages found matching your query.");
            } else {
                Output::success(&format!("Found {} passages", passages.len()));

                for passage in &passages {
                    Output::search_result(&passage.source, passage.score, &passage.content);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(anyhow::anyhow!("{}", e));
        }
    }

    Ok(())
}

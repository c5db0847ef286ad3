//! Search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, top_k: usize, namespace: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Search, &settings) {
        Output::error(&e.to_string());
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    orchestrator.prepare().await?;

    let mut engine = orchestrator.rag_engine(None)?;
    if let Some(ns) = namespace {
        engine.set_namespace(&ns);
    }

    let spinner = Output::spinner("Searching...");
    let results = engine.search(query, top_k).await;
    spinner.finish_and_clear();

    match results {
        Ok(results) if results.is_empty() => {
            Output::warning("No results found matching your query.");
        }
        Ok(results) => {
            Output::success(&format!("Found {} results", results.len()));
            for result in &results {
                Output::search_result(result, 200);
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            Output::info(e.user_hint());
            return Err(e.into());
        }
    }

    Ok(())
}

//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::rag::AnswerOutcome;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    top_k: Option<usize>,
    model: Option<String>,
    namespace: Option<String>,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    orchestrator.prepare().await?;

    let mut engine = orchestrator.rag_engine(model.as_deref())?;
    if let Some(k) = top_k {
        engine = engine.with_top_k(k);
    }
    if let Some(ns) = namespace {
        engine.set_namespace(&ns);
    }

    let spinner = Output::spinner("Searching content library...");
    let response = engine.answer(question).await;
    spinner.finish_and_clear();

    match response {
        Ok(response) => {
            println!("\n{}\n", response.answer);

            if response.outcome == AnswerOutcome::Answered {
                Output::header("Sources");
                for source in &response.sources {
                    Output::search_result(source, 100);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            Output::info(e.user_hint());
            return Err(e.into());
        }
    }

    Ok(())
}

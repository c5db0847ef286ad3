//! Index command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::content::ContentStore;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::collections::BTreeMap;

/// Run the index command.
pub async fn run_index(namespace: Option<String>, dry_run: bool, mut settings: Settings) -> Result<()> {
    if dry_run {
        // Nothing is written, so no remote index is needed.
        settings.vector_index.provider = "memory".to_string();
    } else if let Err(e) = preflight::check(Operation::Index, &settings) {
        Output::error(&e.to_string());
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    let library = orchestrator.library();
    if library.items().is_empty() {
        Output::warning(&format!(
            "Content library is empty ({}).",
            orchestrator.settings().library_path().display()
        ));
        return Ok(());
    }

    let namespace = namespace.unwrap_or_else(|| orchestrator.namespace().to_string());
    let records = orchestrator.records();

    if dry_run {
        let mut per_item: BTreeMap<&str, usize> = BTreeMap::new();
        for record in &records {
            *per_item.entry(record.title.as_str()).or_default() += 1;
        }
        Output::header("Dry run");
        Output::kv("Items", &library.items().len().to_string());
        Output::kv("Passages", &records.len().to_string());
        Output::kv("Namespace", &namespace);
        for (title, count) in per_item {
            Output::kv(title, &format!("{} passages", count));
        }
        return Ok(());
    }

    let pb = Output::progress_bar(records.len() as u64, "Indexing passages");
    let result = orchestrator.index_library(&namespace, |n| pb.inc(n as u64)).await;
    pb.finish_and_clear();

    match result {
        Ok(report) => {
            Output::success(&format!(
                "Indexed {} passages into '{}' ({} batches)",
                report.records, namespace, report.batches
            ));
            if !report.backoff_delays.is_empty() {
                Output::info(&format!(
                    "Rate limited {} times; total backoff {:?}",
                    report.backoff_delays.len(),
                    report.backoff_delays.iter().sum::<std::time::Duration>()
                ));
            }
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Indexing failed: {}", e));
            Output::info(e.user_hint());
            Err(e.into())
        }
    }
}

//! Chunk command implementation.

use crate::chunking::{create_chunker, ChunkingStrategy};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::{Context, Result};
use std::io::Read;

/// Run the chunk command.
pub fn run_chunk(file: Option<&str>, strategy: Option<&str>, json: bool, settings: &Settings) -> Result<()> {
    let text = match file {
        Some(path) => {
            let path = Settings::expand_path(path);
            std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let strategy = match strategy {
        Some(s) => s.parse::<ChunkingStrategy>().map_err(anyhow::Error::msg)?,
        None => settings.chunking.strategy(),
    };

    let chunker = create_chunker(strategy, settings.chunking.config());
    let passages = chunker.chunk(&text);

    if json {
        println!("{}", serde_json::to_string_pretty(&passages)?);
        return Ok(());
    }

    if passages.is_empty() {
        Output::warning("No text to chunk.");
        return Ok(());
    }

    Output::success(&format!("{} passages", passages.len()));
    for (i, passage) in passages.iter().enumerate() {
        Output::passage(i + 1, passage);
    }

    Ok(())
}

//! Pre-flight checks before expensive operations.
//!
//! Validates that required credentials and configuration are available
//! before starting operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{CuratorError, Result};
use crate::openai::API_KEY_ENV;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Indexing writes to the vector index.
    Index,
    /// Asking questions requires the generation key and the index.
    Ask,
    /// Search requires the index.
    Search,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Index | Operation::Search => {
            check_index(settings)?;
        }
        Operation::Ask => {
            check_env(API_KEY_ENV)?;
            check_index(settings)?;
        }
    }
    Ok(())
}

/// Whether each credential the configuration relies on is set.
///
/// Values are never included, only presence.
pub fn credential_report(settings: &Settings) -> Vec<(String, bool)> {
    let mut report = vec![(API_KEY_ENV.to_string(), env_is_set(API_KEY_ENV))];
    if uses_pinecone(settings) {
        let key_env = &settings.vector_index.api_key_env;
        report.push((key_env.clone(), env_is_set(key_env)));
    }
    report
}

fn uses_pinecone(settings: &Settings) -> bool {
    settings.vector_index.provider.eq_ignore_ascii_case("pinecone")
}

fn check_index(settings: &Settings) -> Result<()> {
    if !uses_pinecone(settings) {
        return Ok(());
    }
    if settings.vector_index.host.as_deref().map_or(true, |h| h.trim().is_empty()) {
        return Err(CuratorError::Config(
            "vector_index.host is not set. Add it to your config file or use provider = \"memory\"".to_string(),
        ));
    }
    check_env(&settings.vector_index.api_key_env)
}

fn env_is_set(name: &str) -> bool {
    std::env::var(name).map_or(false, |v| !v.trim().is_empty())
}

/// Check that an environment variable holds a non-empty value.
fn check_env(name: &str) -> Result<()> {
    if env_is_set(name) {
        Ok(())
    } else {
        Err(CuratorError::MissingCredential(format!(
            "{} is not set. Set it with: export {}='...'",
            name, name
        )))
    }
}

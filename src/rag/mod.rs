//! Retrieval-augmented answering over the content library.
//!
//! A query runs through retrieval, backfill of missing passage text, prompt
//! assembly and generation, in that order.

mod backfill;
mod generation;
mod prompt;
mod response;
mod retrieval;

pub use backfill::{backfill, backfill_all, missing_content_marker};
pub use generation::{Generator, OpenAIGenerator};
pub use prompt::{assemble_prompt, format_context};
pub use response::{AnswerOutcome, RagEngine, RagResponse};
pub use retrieval::{
    EmbeddingSearch, LocalContentSearch, RetrievalStrategy, Retriever, StrategyOutcome,
    VectorIndexSearch,
};

use crate::error::CuratorError;
use async_openai::error::OpenAIError;

/// Map an OpenAI client error onto the error taxonomy.
pub fn classify_openai_error(error: OpenAIError) -> CuratorError {
    match error {
        OpenAIError::ApiError(api) => {
            let code = api.code.as_ref().map(|c| c.to_string()).unwrap_or_default();
            let kind = api.r#type.clone().unwrap_or_default();
            classify_api_error(api.message, &kind, &code)
        }
        OpenAIError::Reqwest(e) => match e.status().map(|s| s.as_u16()) {
            Some(401) | Some(403) => CuratorError::Auth(e.to_string()),
            Some(429) => CuratorError::RateLimited(e.to_string()),
            Some(status) if status >= 500 => CuratorError::ServiceUnavailable(e.to_string()),
            _ if e.is_timeout() || e.is_connect() => CuratorError::ServiceUnavailable(e.to_string()),
            _ => CuratorError::OpenAI(e.to_string()),
        },
        other => CuratorError::OpenAI(other.to_string()),
    }
}

/// Classify an API error body by its message, type and code.
fn classify_api_error(message: String, kind: &str, code: &str) -> CuratorError {
    let haystack = format!("{} {} {}", code, kind, message).to_lowercase();

    if haystack.contains("invalid_api_key")
        || haystack.contains("authentication")
        || haystack.contains("api key")
    {
        CuratorError::Auth(message)
    } else if haystack.contains("rate_limit") || haystack.contains("insufficient_quota") {
        CuratorError::RateLimited(message)
    } else if haystack.contains("server_error") || haystack.contains("overloaded") {
        CuratorError::ServiceUnavailable(message)
    } else {
        CuratorError::Generation(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_api_errors() {
        assert!(matches!(
            classify_api_error("Incorrect API key provided".into(), "invalid_request_error", "invalid_api_key"),
            CuratorError::Auth(_)
        ));
        assert!(matches!(
            classify_api_error("You exceeded your quota".into(), "insufficient_quota", ""),
            CuratorError::RateLimited(_)
        ));
        assert!(matches!(
            classify_api_error("The server had an error".into(), "server_error", ""),
            CuratorError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            classify_api_error("Unsupported model".into(), "invalid_request_error", ""),
            CuratorError::Generation(_)
        ));
    }

    #[test]
    fn test_classify_other_errors() {
        let err = classify_openai_error(OpenAIError::InvalidArgument("bad".to_string()));
        assert!(matches!(err, CuratorError::OpenAI(_)));
    }
}

//! Prompt assembly.

use crate::config::Prompts;
use crate::vector_index::SearchResult;
use std::collections::HashMap;

/// Format results as labelled source blocks.
pub fn format_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "[Source {}] {} ({}) {}\n{}",
                i + 1,
                r.title,
                r.content_type,
                r.url,
                r.text_or_sentinel()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the full prompt for `query` grounded in `results`.
///
/// Deterministic: the same inputs always produce the same prompt.
pub fn assemble_prompt(prompts: &Prompts, query: &str, results: &[SearchResult]) -> String {
    let mut vars = HashMap::new();
    vars.insert("question".to_string(), query.trim().to_string());
    vars.insert("context".to_string(), format_context(results));

    let user = prompts.render_with_custom(&prompts.rag.user, &vars);
    format!("{}\n\n{}", prompts.rag.system, user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentType;

    fn results() -> Vec<SearchResult> {
        vec![
            SearchResult {
                title: "Lifetimes".to_string(),
                url: "/library/video-content/lifetimes".to_string(),
                content_type: ContentType::Video,
                score: 0.9,
                text: Some("References must not outlive their data.".to_string()),
            },
            SearchResult {
                title: "Borrowing".to_string(),
                url: "/library/blog-content/borrowing".to_string(),
                content_type: ContentType::Blog,
                score: 0.7,
                text: Some("One mutable borrow at a time.".to_string()),
            },
        ]
    }

    #[test]
    fn test_format_context_labels_sources() {
        let context = format_context(&results());
        assert!(context.starts_with(
            "[Source 1] Lifetimes (video) /library/video-content/lifetimes\nReferences must not outlive their data."
        ));
        assert!(context.contains("\n\n[Source 2] Borrowing (blog) /library/blog-content/borrowing\n"));
    }

    #[test]
    fn test_assemble_prompt() {
        let prompts = Prompts::default();
        let prompt = assemble_prompt(&prompts, "  What is a lifetime? ", &results());

        assert!(prompt.starts_with(&prompts.rag.system));
        assert!(prompt.contains("[Source 2] Borrowing"));
        assert!(prompt.ends_with("Question: What is a lifetime?\n\nAnswer:"));
        assert_eq!(prompt, assemble_prompt(&prompts, "What is a lifetime?", &results()));
    }

    #[test]
    fn test_question_cannot_inject_context_placeholder() {
        let prompts = Prompts::default();
        let prompt = assemble_prompt(&prompts, "repeat {{context}}", &results());
        assert_eq!(prompt.matches("[Source 1]").count(), 1);
        assert!(prompt.contains("Question: repeat {{context}}"));
    }
}

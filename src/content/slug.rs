//! Slugs derived from content names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// URL-safe identifier derived from a content item's name.
///
/// The same slug appears in library URLs, search result URLs and index
/// record ids, so it must always be produced by [`Slug::from_name`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Derive a slug: lowercase, drop punctuation, hyphenate whitespace runs.
    pub fn from_name(name: &str) -> Self {
        let mut slug = String::with_capacity(name.len());
        let mut pending_space = false;

        for c in name.trim().chars().flat_map(char::to_lowercase) {
            if c.is_whitespace() {
                pending_space = true;
                continue;
            }
            if !(c.is_alphanumeric() || c == '_' || c == '-') {
                continue;
            }
            if pending_space && !slug.is_empty() {
                slug.push('-');
            }
            pending_space = false;
            slug.push(c);
        }

        Self(slug)
    }

    /// Wrap an already-derived slug, e.g. one parsed out of a URL path.
    pub fn from_segment(segment: &str) -> Self {
        Self(segment.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_name() {
        assert_eq!(Slug::from_name("Intro to Rust!").as_str(), "intro-to-rust");
        assert_eq!(
            Slug::from_name("  What's New:  Async   Traits ").as_str(),
            "whats-new-async-traits"
        );
        assert_eq!(Slug::from_name("snake_case & kebab-case").as_str(), "snake_case-kebab-case");
    }

    #[test]
    fn test_punctuation_between_spaces_collapses() {
        // "a - b" keeps its hyphen; the spaces around it each become one hyphen.
        assert_eq!(Slug::from_name("A - B").as_str(), "a---b");
        assert_eq!(Slug::from_name("A & B").as_str(), "a-b");
    }

    #[test]
    fn test_slug_is_stable() {
        let once = Slug::from_name("Deep Dive: Vector Search (Part 2)");
        let twice = Slug::from_name(once.as_str());
        assert_eq!(once, twice);
    }
}

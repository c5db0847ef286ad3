//! JSON-backed content library.

use super::{BlogPost, ContentItem, ContentStore, ContentType, Slug, VideoContent};
use crate::error::{CuratorError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// On-disk shape of the library file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LibraryFile {
    videos: Vec<VideoContent>,
    posts: Vec<BlogPost>,
}

/// In-memory content library indexed by (type, slug).
#[derive(Debug, Default)]
pub struct ContentLibrary {
    items: Vec<ContentItem>,
    by_slug: HashMap<(ContentType, Slug), usize>,
}

impl ContentLibrary {
    /// Build a library from items. On duplicate slugs the first item wins.
    pub fn from_items(items: Vec<ContentItem>) -> Self {
        let mut by_slug = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let key = (item.content_type(), item.slug());
            if by_slug.contains_key(&key) {
                warn!("Duplicate content name '{}', keeping the first", item.name());
                continue;
            }
            by_slug.insert(key, idx);
        }
        Self { items, by_slug }
    }

    /// Parse a library from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: LibraryFile = serde_json::from_str(json)?;
        let items = file
            .videos
            .into_iter()
            .map(ContentItem::Video)
            .chain(file.posts.into_iter().map(ContentItem::Blog))
            .collect();
        Ok(Self::from_items(items))
    }

    /// Load a library file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CuratorError::Content(format!(
                "Library file not found: {}",
                path.display()
            )));
        }
        let json = std::fs::read_to_string(path)?;
        let library = Self::from_json(&json)?;
        debug!("Loaded {} content items from {}", library.len(), path.display());
        Ok(library)
    }

    /// Load a library file, or an empty library if it does not exist.
    pub fn load_or_empty(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("Library file {} not found, local fallback disabled", path.display());
            Ok(Self::default())
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ContentStore for ContentLibrary {
    fn find(&self, content_type: ContentType, slug: &Slug) -> Option<&ContentItem> {
        self.by_slug
            .get(&(content_type, slug.clone()))
            .and_then(|&idx| self.items.get(idx))
    }

    fn items(&self) -> &[ContentItem] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIBRARY: &str = r#"{
        "videos": [
            {
                "name": "Borrow Checker Basics",
                "description": "How borrowing works.",
                "categories": ["rust"],
                "transcript": "Every value has one owner. References borrow.",
                "url": "https://videos.example.com/borrow"
            }
        ],
        "posts": [
            {
                "name": "Async in Practice!",
                "description": "Notes on async.",
                "authors": ["Sam"],
                "content": { "table_of_contents": ["Intro"], "text": "Futures are lazy." },
                "url": "https://blog.example.com/async"
            }
        ]
    }"#;

    #[test]
    fn test_parse_and_find() {
        let library = ContentLibrary::from_json(LIBRARY).unwrap();
        assert_eq!(library.len(), 2);

        let video = library
            .find(ContentType::Video, &Slug::from_name("borrow checker basics"))
            .unwrap();
        assert_eq!(video.long_text(), "Every value has one owner. References borrow.");

        let post = library
            .find(ContentType::Blog, &Slug::from_segment("async-in-practice"))
            .unwrap();
        assert_eq!(post.description(), "Notes on async.");

        // Type is part of the key.
        assert!(library
            .find(ContentType::Video, &Slug::from_segment("async-in-practice"))
            .is_none());
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let make = |transcript: &str| {
            ContentItem::Video(VideoContent {
                name: "Same Name".to_string(),
                description: String::new(),
                categories: vec![],
                transcript: transcript.to_string(),
                url: String::new(),
            })
        };
        let library = ContentLibrary::from_items(vec![make("first"), make("second")]);
        let found = library
            .find(ContentType::Video, &Slug::from_name("Same Name"))
            .unwrap();
        assert_eq!(found.long_text(), "first");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert!(ContentLibrary::load(&path).is_err());
        assert!(ContentLibrary::load_or_empty(&path).unwrap().is_empty());
    }
}

//! Content library types: videos, blog posts and the stores that hold them.

mod library;
mod slug;

pub use library::ContentLibrary;
pub use slug::Slug;

use serde::{Deserialize, Serialize};

/// Kind of content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Video,
    Blog,
}

impl ContentType {
    /// Path segment used in library URLs (`/library/{segment}/{slug}`).
    pub fn path_segment(&self) -> &'static str {
        match self {
            ContentType::Video => "video-content",
            ContentType::Blog => "blog-content",
        }
    }

    /// Parse a library URL path segment.
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        match segment {
            "video-content" => Some(ContentType::Video),
            "blog-content" => Some(ContentType::Blog),
            _ => None,
        }
    }

    /// Library URL for an item of this type.
    pub fn library_url(&self, slug: &Slug) -> String {
        format!("/library/{}/{}", self.path_segment(), slug)
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Video => write!(f, "video"),
            ContentType::Blog => write!(f, "blog"),
        }
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "video" | "video-content" => Ok(ContentType::Video),
            "blog" | "blog-content" | "post" => Ok(ContentType::Blog),
            _ => Err(format!("Unknown content type: {}", s)),
        }
    }
}

/// A video with its transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoContent {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub url: String,
}

/// Structured body of a blog post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogBody {
    #[serde(default)]
    pub table_of_contents: Vec<String>,
    #[serde(default)]
    pub text: String,
}

/// A blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub content: BlogBody,
    #[serde(default)]
    pub url: String,
}

/// Any item in the content library.
#[derive(Debug, Clone)]
pub enum ContentItem {
    Video(VideoContent),
    Blog(BlogPost),
}

impl ContentItem {
    pub fn name(&self) -> &str {
        match self {
            ContentItem::Video(v) => &v.name,
            ContentItem::Blog(b) => &b.name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            ContentItem::Video(v) => &v.description,
            ContentItem::Blog(b) => &b.description,
        }
    }

    pub fn categories(&self) -> &[String] {
        match self {
            ContentItem::Video(v) => &v.categories,
            ContentItem::Blog(b) => &b.categories,
        }
    }

    /// Transcript for videos, full text for blog posts.
    pub fn long_text(&self) -> &str {
        match self {
            ContentItem::Video(v) => &v.transcript,
            ContentItem::Blog(b) => &b.content.text,
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            ContentItem::Video(_) => ContentType::Video,
            ContentItem::Blog(_) => ContentType::Blog,
        }
    }

    pub fn slug(&self) -> Slug {
        Slug::from_name(self.name())
    }

    /// Library URL for this item.
    pub fn library_url(&self) -> String {
        self.content_type().library_url(&self.slug())
    }
}

/// Read access to content items by type and slug.
pub trait ContentStore: Send + Sync {
    /// Find the item whose name derives to `slug`.
    fn find(&self, content_type: ContentType, slug: &Slug) -> Option<&ContentItem>;

    /// All items in the store.
    fn items(&self) -> &[ContentItem];
}

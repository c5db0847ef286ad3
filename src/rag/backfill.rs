//! Fill in passage text that the index did not return.

use crate::content::{ContentStore, ContentType, Slug};
use crate::vector_index::SearchResult;
use percent_encoding::percent_decode_str;
use tracing::debug;
use url::Url;

/// Base used to resolve relative library URLs.
const URL_BASE: &str = "http://library.invalid/";

/// Text used when an item cannot be found locally.
pub fn missing_content_marker(title: &str) -> String {
    format!("{} (no detailed content available)", title)
}

/// Text for `result`, reconstructed from the local library when needed.
///
/// Real passage text is returned unchanged. Never fails: an unparseable URL
/// or unknown item yields the missing-content marker.
pub fn backfill(result: &SearchResult, store: &dyn ContentStore) -> String {
    if !result.needs_backfill() {
        return result.text_or_sentinel().to_string();
    }

    match locate(&result.url).and_then(|(ty, slug)| store.find(ty, &slug)) {
        Some(item) => format!("{}\n\n{}", item.description(), item.long_text()),
        None => {
            debug!("No local item for '{}' at {}", result.title, result.url);
            missing_content_marker(&result.title)
        }
    }
}

/// Backfill every result in place.
pub fn backfill_all(results: &mut [SearchResult], store: &dyn ContentStore) {
    for result in results.iter_mut() {
        if result.needs_backfill() {
            result.text = Some(backfill(result, store));
        }
    }
}

/// Content type and slug from a `/library/{type}/{slug}` URL.
fn locate(raw: &str) -> Option<(ContentType, Slug)> {
    let base = Url::parse(URL_BASE).ok()?;
    let url = base.join(raw.trim()).ok()?;
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    if segments.next()? != "library" {
        return None;
    }
    let content_type = ContentType::from_path_segment(segments.next()?)?;
    // Slugs keep non-ASCII letters, which the URL parser percent-encodes.
    let segment = percent_decode_str(segments.next()?).decode_utf8().ok()?;
    let slug = Slug::from_segment(&segment);
    if slug.is_empty() {
        return None;
    }
    Some((content_type, slug))
}

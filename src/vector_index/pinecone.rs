//! Pinecone records API client.
//!
//! Uses indexes with integrated embedding: records are upserted as text
//! and searched with text, so no local embedding call is needed.

use super::{PassageRecord, SearchResult, VectorIndex, NO_CONTENT_SENTINEL};
use crate::content::ContentType;
use crate::error::{CuratorError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};

const API_VERSION: &str = "2025-01";

/// Pinecone's name for the unnamed namespace.
const UNNAMED_NAMESPACE: &str = "__default__";

/// Metadata fields returned with every hit.
const FIELDS: [&str; 4] = ["title", "url", "type", "text"];

/// Client for one Pinecone index.
pub struct PineconeIndex {
    client: reqwest::Client,
    host: String,
    api_key: String,
}

impl PineconeIndex {
    /// Create a client for the index at `host`.
    pub fn new(host: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(CuratorError::MissingCredential("Pinecone API key is empty".to_string()));
        }
        let host = host.trim_end_matches('/');
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            host,
            api_key: api_key.to_string(),
        })
    }

    fn endpoint(&self, namespace: &str, action: &str) -> String {
        let namespace = if namespace.is_empty() {
            UNNAMED_NAMESPACE
        } else {
            namespace
        };
        format!("{}/records/namespaces/{}/{}", self.host, namespace, action)
    }

    async fn check(response: reqwest::Response, namespace: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_response(status, &body, namespace))
    }
}

/// Map an unsuccessful Pinecone response to an error.
fn classify_response(status: StatusCode, body: &str, namespace: &str) -> CuratorError {
    let detail = format!("Pinecone {}: {}", status, body.trim());

    if status == StatusCode::TOO_MANY_REQUESTS || body.contains("RESOURCE_EXHAUSTED") {
        return CuratorError::RateLimited(detail);
    }
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CuratorError::Auth(detail),
        StatusCode::NOT_FOUND if body.to_lowercase().contains("namespace") => {
            CuratorError::NamespaceNotFound(namespace.to_string())
        }
        s if s.is_server_error() => CuratorError::ServiceUnavailable(detail),
        s if s.is_client_error() => CuratorError::InvalidInput(detail),
        _ => CuratorError::Search(detail),
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    result: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score")]
    score: f32,
    #[serde(default)]
    fields: HitFields,
}

#[derive(Debug, Default, Deserialize)]
struct HitFields {
    title: Option<String>,
    url: Option<String>,
    #[serde(rename = "type")]
    content_type: Option<String>,
    text: Option<String>,
}

impl Hit {
    fn into_result(self) -> SearchResult {
        let fields = self.fields;
        let url = fields.url.unwrap_or_default();
        let content_type = fields
            .content_type
            .as_deref()
            .and_then(|t| t.parse().ok())
            .or_else(|| content_type_from_url(&url))
            .unwrap_or(ContentType::Blog);

        SearchResult {
            title: fields.title.unwrap_or(self.id),
            url,
            content_type,
            score: self.score,
            text: fields.text.filter(|t| !t.trim().is_empty() && t != NO_CONTENT_SENTINEL),
        }
    }
}

fn content_type_from_url(url: &str) -> Option<ContentType> {
    url.split('/').find_map(ContentType::from_path_segment)
}

/// Newline-delimited JSON body for the upsert endpoint.
fn upsert_body(records: &[PassageRecord]) -> Result<String> {
    let mut body = String::new();
    for record in records {
        let line = json!({
            "_id": record.id,
            "text": record.text,
            "title": record.title,
            "url": record.url,
            "type": record.content_type.to_string(),
        });
        body.push_str(&serde_json::to_string(&line)?);
        body.push('\n');
    }
    Ok(body)
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    fn name(&self) -> &str {
        "pinecone"
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, top_k: usize, namespace: &str) -> Result<Vec<SearchResult>> {
        let body = json!({
            "query": {
                "inputs": { "text": query },
                "top_k": top_k,
            },
            "fields": FIELDS,
        });

        let response = self
            .client
            .post(self.endpoint(namespace, "search"))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let response = Self::check(response, namespace).await?;
        let parsed: SearchResponse = response.json().await?;
        debug!("Pinecone returned {} hits", parsed.result.hits.len());

        Ok(parsed.result.hits.into_iter().map(Hit::into_result).collect())
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn upsert(&self, records: &[PassageRecord], namespace: &str) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let response = self
            .client
            .post(self.endpoint(namespace, "upsert"))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .header("Content-Type", "application/x-ndjson")
            .body(upsert_body(records)?)
            .send()
            .await?;

        Self::check(response, namespace).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_rate_limits() {
        let err = classify_response(StatusCode::TOO_MANY_REQUESTS, "slow down", "ns");
        assert!(err.is_rate_limited());

        let err = classify_response(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"code":"RESOURCE_EXHAUSTED","message":"quota"}}"#,
            "ns",
        );
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_classify_other_statuses() {
        assert!(matches!(
            classify_response(StatusCode::UNAUTHORIZED, "bad key", "ns"),
            CuratorError::Auth(_)
        ));
        assert!(matches!(
            classify_response(StatusCode::NOT_FOUND, r#"{"error":{"message":"Namespace not found"}}"#, "docs"),
            CuratorError::NamespaceNotFound(ns) if ns == "docs"
        ));
        assert!(matches!(
            classify_response(StatusCode::NOT_FOUND, "index missing", "docs"),
            CuratorError::InvalidInput(_)
        ));
        assert!(matches!(
            classify_response(StatusCode::BAD_GATEWAY, "", "ns"),
            CuratorError::ServiceUnavailable(_)
        ));
    }

    #[test]
    fn test_endpoint_maps_unnamed_namespace() {
        let index = PineconeIndex::new("my-index.svc.pinecone.io/", "key", Duration::from_secs(5)).unwrap();
        assert_eq!(
            index.endpoint("", "search"),
            "https://my-index.svc.pinecone.io/records/namespaces/__default__/search"
        );
        assert_eq!(
            index.endpoint("content-library", "upsert"),
            "https://my-index.svc.pinecone.io/records/namespaces/content-library/upsert"
        );
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(
            PineconeIndex::new("host", " ", Duration::from_secs(1)),
            Err(CuratorError::MissingCredential(_))
        ));
    }

    #[test]
    fn test_parse_hits() {
        let json = r#"{
            "result": { "hits": [
                { "_id": "intro-0", "_score": 0.87,
                  "fields": { "title": "Intro", "url": "/library/video-content/intro", "type": "video", "text": "Welcome." } },
                { "_id": "notes-2", "_score": 0.41,
                  "fields": { "url": "/library/blog-content/notes", "text": "No content available" } }
            ] },
            "usage": { "read_units": 1 }
        }"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        let results: Vec<SearchResult> = parsed.result.hits.into_iter().map(Hit::into_result).collect();

        assert_eq!(results[0].title, "Intro");
        assert_eq!(results[0].content_type, ContentType::Video);
        assert_eq!(results[0].text.as_deref(), Some("Welcome."));

        assert_eq!(results[1].title, "notes-2");
        assert_eq!(results[1].content_type, ContentType::Blog);
        assert!(results[1].needs_backfill());
    }

    #[test]
    fn test_upsert_body_is_ndjson() {
        let records = vec![
            PassageRecord {
                id: "a-0".to_string(),
                text: "First.".to_string(),
                title: "A".to_string(),
                url: "/library/blog-content/a".to_string(),
                content_type: ContentType::Blog,
            },
            PassageRecord {
                id: "a-1".to_string(),
                text: "Second.".to_string(),
                title: "A".to_string(),
                url: "/library/blog-content/a".to_string(),
                content_type: ContentType::Blog,
            },
        ];
        let body = upsert_body(&records).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["_id"], "a-0");
        assert_eq!(first["type"], "blog");
    }
}

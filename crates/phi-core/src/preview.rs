//! Link preview records.
//!
//! [`LinkPreview`] is the enriched preview for a completed task
//! (`GET /api/task/{id}/preview`). [`InstantPreview`] is the cached
//! metadata the backend can return for a URL before it is submitted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkPreview {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub preview_image: Option<PreviewImage>,
    #[serde(default)]
    pub publisher: Option<Publisher>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub metadata: Option<PreviewMetadata>,
    /// Engagement counters; shape varies by source so it is kept opaque.
    #[serde(default)]
    pub metrics: Option<serde_json::Value>,
    #[serde(default)]
    pub quality: Option<PreviewQuality>,
}

impl LinkPreview {
    /// The preview image URL, if the preview carries a usable one.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.preview_image
            .as_ref()
            .map(|img| img.url.as_str())
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewImage {
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publisher {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub favicon: Option<String>,
    /// Platform name to handle, e.g. `"twitter" -> "@example"`.
    #[serde(default, alias = "social", deserialize_with = "crate::wire::null_as_default")]
    pub social_handles: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewMetadata {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewQuality {
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub flags: Vec<String>,
    #[serde(default)]
    pub is_readable: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Cached metadata for a URL that may not have been submitted yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstantPreview {
    pub url: String,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub word_count: Option<u64>,
    #[serde(default)]
    pub reading_time_minutes: Option<f64>,
    /// `"cached"` when built from a previous extraction, `"placeholder"` otherwise.
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub preview_quality: String,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub is_cached: bool,
    /// Domain is known to block or paywall extraction.
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub is_rogue: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_preview() {
        let preview: LinkPreview = serde_json::from_value(serde_json::json!({
            "title": "Example Article Title",
            "description": "A description",
            "preview_image": { "url": "https://cdn.example.com/a.png", "width": 1200, "height": 630 },
            "publisher": {
                "name": "Example News",
                "favicon": "https://example.com/favicon.ico",
                "social_handles": { "twitter": "@example" }
            },
            "author": "Jane Reporter",
            "metadata": { "language": "en", "tags": ["politics"], "publish_date": "2025-03-01", "section": "World" },
            "metrics": { "shares": 12 },
            "quality": { "flags": ["has_author"], "is_readable": true, "status": "ok" }
        }))
        .unwrap();

        assert_eq!(preview.image_url(), Some("https://cdn.example.com/a.png"));
        let publisher = preview.publisher.unwrap();
        assert_eq!(publisher.social_handles["twitter"], "@example");
        assert_eq!(preview.metadata.unwrap().tags, vec!["politics".to_string()]);
        assert_eq!(preview.quality.unwrap().is_readable, Some(true));
    }

    #[test]
    fn empty_image_url_is_treated_as_missing() {
        let preview: LinkPreview = serde_json::from_value(serde_json::json!({
            "preview_image": { "url": "" }
        }))
        .unwrap();
        assert!(preview.image_url().is_none());
    }

    #[test]
    fn parses_placeholder_instant_preview() {
        let preview: InstantPreview = serde_json::from_value(serde_json::json!({
            "url": "https://wsj.com/x",
            "title": "Preview not available",
            "description": "Submit to start extraction",
            "preview_quality": "placeholder",
            "is_cached": false,
            "is_rogue": true
        }))
        .unwrap();
        assert!(!preview.is_cached);
        assert!(preview.is_rogue);
        assert!(preview.word_count.is_none());
    }

    #[test]
    fn instant_preview_tolerates_null_strings() {
        let preview: InstantPreview = serde_json::from_value(serde_json::json!({
            "url": "https://example.com/a",
            "title": null,
            "preview_quality": null,
            "is_cached": null
        }))
        .unwrap();
        assert!(preview.title.is_empty());
        assert!(preview.preview_quality.is_empty());
        assert!(!preview.is_cached);

        let image: PreviewImage = serde_json::from_value(serde_json::json!({ "url": null })).unwrap();
        assert!(image.url.is_empty());
    }
}

//! Ranked home feed (`GET /api/coherence/feed`).

use serde::{Deserialize, Serialize};

/// Largest page the backend will serve; larger requests are clamped.
pub const MAX_FEED_LIMIT: u32 = 50;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedPage {
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub count: u32,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub offset: u32,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub limit: u32,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub stories: Vec<FeedItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: String,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub health_indicator: Option<String>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub claim_count: u32,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub artifact_count: u32,
    #[serde(default)]
    pub coherence: Option<f64>,
    #[serde(default)]
    pub tcf_score: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Clamp a requested page size to `1..=MAX_FEED_LIMIT`.
#[must_use]
pub fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_FEED_LIMIT)
}

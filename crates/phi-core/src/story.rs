//! Story aggregate returned by `GET /api/stories/{story_id}`.

use serde::{Deserialize, Serialize};

/// The `{ "status": "success", "story": { ... } }` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct StoryEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    pub story: Story,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Backend health marker, e.g. `"healthy"`, `"growing"` or `"stale"`.
    #[serde(default)]
    pub health_indicator: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub claim_count: u32,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub artifact_count: u32,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub revision: Option<u32>,
    #[serde(default)]
    pub coherence: Option<f64>,
    #[serde(default)]
    pub timely: Option<f64>,
    #[serde(default)]
    pub funding: Option<f64>,
    #[serde(default)]
    pub tcf_score: Option<f64>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub entities: StoryEntities,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub claims: Vec<Claim>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub artifacts: Vec<Artifact>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub related_stories: Vec<RelatedStory>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryEntities {
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub people: Vec<Entity>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub organizations: Vec<Entity>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub locations: Vec<Entity>,
}

impl StoryEntities {
    #[must_use]
    pub fn len(&self) -> usize {
        self.people.len() + self.organizations.len() + self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub wikidata_qid: Option<String>,
    #[serde(default)]
    pub wikidata_thumbnail: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// A source page that contributed to the story.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedStory {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub match_score: Option<f64>,
}

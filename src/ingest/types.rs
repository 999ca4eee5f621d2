// src/ingest/types.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One comment as handed over by a comment source.
///
/// Every field is defaulted on deserialization, so a record with missing keys
/// still reaches the pipeline with the full field set (absent → `None` / "").
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RawComment {
    pub comment_id: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<String>, // ISO-8601 as delivered upstream
    pub like_count: Option<i64>,
    pub text: String,
    pub video_id: Option<String>,
}

impl RawComment {
    /// Terminal record appended when the upstream source fails mid-fetch.
    /// Only `text` (diagnostic) and `video_id` are populated.
    pub fn error_marker(video_id: &str, detail: impl std::fmt::Display) -> Self {
        Self {
            text: format!("YouTube API error: {detail}"),
            video_id: Some(video_id.to_string()),
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
pub trait CommentSource: Send + Sync {
    /// Returns at most `max` comments for `video_id`, most recent first when the
    /// upstream supports it. A failure after partial retrieval is reported as a
    /// trailing [`RawComment::error_marker`], not as `Err`.
    async fn fetch_comments(&self, video_id: &str, max: usize) -> Result<Vec<RawComment>>;
    fn name(&self) -> &'static str;
}

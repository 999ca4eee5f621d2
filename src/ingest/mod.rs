// src/ingest/mod.rs
//! Comment ingestion: raw comment model, sources, and video identifier parsing.

pub mod providers;
pub mod types;
pub mod video_id;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};

use crate::config::AppConfig;
pub use crate::ingest::types::{CommentSource, RawComment};
pub use crate::ingest::video_id::extract_id;
use providers::YouTubeCommentSource;

/// Convenient alias used by the router state.
pub type DynCommentSource = Arc<dyn CommentSource>;

/// Build the live comment source from configuration.
pub fn build_source_from_config(cfg: &AppConfig) -> Result<DynCommentSource> {
    if cfg.youtube_api_key.trim().is_empty() {
        bail!("YouTube API key is empty; set YOUTUBE_API_KEY or youtube_api_key in config");
    }
    let source = YouTubeCommentSource::new(
        cfg.youtube_api_key.clone(),
        Duration::from_secs(cfg.fetch_timeout_secs.max(1)),
    )?;
    Ok(Arc::new(source))
}

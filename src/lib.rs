// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod analyze;
pub mod api;
pub mod config;
pub mod ingest;
pub mod metrics;
pub mod report;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{
    AnnotatedComment, Pipeline, ResultSet, ScoringMethod, Sentiment, SentimentSummary,
};
pub use crate::api::{router, AppState};
pub use crate::config::AppConfig;
pub use crate::ingest::{extract_id, CommentSource, RawComment};

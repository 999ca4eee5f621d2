// src/ingest/providers/mod.rs
pub mod fixture;
pub mod youtube;

pub use fixture::FixtureCommentSource;
pub use youtube::YouTubeCommentSource;

// src/ingest/providers/fixture.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use metrics::counter;

use super::youtube::ThreadPage;
use crate::ingest::types::{CommentSource, RawComment};

/// Replays canned `commentThreads` pages instead of calling the API.
/// Page tokens are ignored; pages are served in order.
pub struct FixtureCommentSource {
    pages: Vec<String>,
    /// Serve this many pages, then fail as if the upstream errored.
    fail_after: Option<usize>,
}

impl FixtureCommentSource {
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages.into_iter().map(Into::into).collect(),
            fail_after: None,
        }
    }

    pub fn failing_after(mut self, pages: usize) -> Self {
        self.fail_after = Some(pages);
        self
    }
}

#[async_trait]
impl CommentSource for FixtureCommentSource {
    async fn fetch_comments(&self, video_id: &str, max: usize) -> Result<Vec<RawComment>> {
        let mut out = Vec::new();
        if max == 0 {
            return Ok(out);
        }

        for (i, body) in self.pages.iter().enumerate() {
            if self.fail_after == Some(i) {
                counter!("fetch_errors_total").increment(1);
                out.push(RawComment::error_marker(
                    video_id,
                    anyhow!("quotaExceeded (fixture page {i})"),
                ));
                return Ok(out);
            }
            let next = ThreadPage::parse(body)?.drain_into(video_id, max, &mut out);
            if out.len() >= max || next.is_none() {
                break;
            }
        }

        counter!("fetch_comments_total").increment(out.len() as u64);
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}

// src/ingest/providers/youtube.rs
//! YouTube Data API v3 comment source (`commentThreads.list`).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::ingest::types::{CommentSource, RawComment};

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ThreadPage {
    #[serde(default)]
    items: Vec<Thread>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Thread {
    id: Option<String>,
    snippet: Option<ThreadSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadSnippet {
    top_level_comment: Option<TopLevelComment>,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: Option<CommentSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    author_display_name: Option<String>,
    published_at: Option<String>,
    like_count: Option<i64>,
    text_original: Option<String>,
    text_display: Option<String>,
}

impl CommentSnippet {
    fn is_empty(&self) -> bool {
        self.author_display_name.is_none()
            && self.published_at.is_none()
            && self.like_count.is_none()
            && self.text_original.is_none()
            && self.text_display.is_none()
    }
}

impl ThreadPage {
    pub(crate) fn parse(body: &str) -> Result<Self> {
        serde_json::from_str(body).context("parsing commentThreads page")
    }

    /// Moves up to `max - out.len()` comments into `out`; returns the next page token.
    pub(crate) fn drain_into(
        self,
        video_id: &str,
        max: usize,
        out: &mut Vec<RawComment>,
    ) -> Option<String> {
        for thread in self.items {
            if out.len() >= max {
                break;
            }
            let Some(top) = thread
                .snippet
                .and_then(|s| s.top_level_comment)
                .and_then(|c| c.snippet)
                .filter(|s| !s.is_empty())
            else {
                continue;
            };

            let text = top
                .text_original
                .filter(|t| !t.is_empty())
                .or_else(|| {
                    top.text_display
                        .filter(|t| !t.is_empty())
                        .map(|t| html_escape::decode_html_entities(&t).into_owned())
                })
                .unwrap_or_default();

            out.push(RawComment {
                comment_id: thread.id,
                author: top.author_display_name,
                published_at: top.published_at,
                like_count: Some(top.like_count.unwrap_or(0)),
                text,
                video_id: Some(video_id.to_string()),
            });
        }
        self.next_page_token.filter(|t| !t.is_empty())
    }
}

/// Live source backed by the YouTube Data API.
pub struct YouTubeCommentSource {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl YouTubeCommentSource {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("yt-comment-sentiment/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(timeout)
            .build()
            .context("building youtube http client")?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the source at another host (local mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_page(&self, video_id: &str, page_token: Option<&str>) -> Result<ThreadPage> {
        let url = format!("{}/commentThreads", self.base_url.trim_end_matches('/'));
        let page_size = PAGE_SIZE.to_string();
        let mut query: Vec<(&str, &str)> = vec![
            ("part", "snippet"),
            ("videoId", video_id),
            ("maxResults", page_size.as_str()),
            ("textFormat", "plainText"),
            ("order", "time"),
            ("key", self.api_key.as_str()),
        ];
        if let Some(t) = page_token {
            query.push(("pageToken", t));
        }

        let body = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .context("sending commentThreads request")?
            .error_for_status()?
            .text()
            .await
            .context("reading commentThreads body")?;

        ThreadPage::parse(&body)
    }
}

#[async_trait]
impl CommentSource for YouTubeCommentSource {
    async fn fetch_comments(&self, video_id: &str, max: usize) -> Result<Vec<RawComment>> {
        let mut out = Vec::new();
        if max == 0 {
            return Ok(out);
        }

        let mut page_token: Option<String> = None;
        loop {
            match self.fetch_page(video_id, page_token.as_deref()).await {
                Ok(page) => {
                    page_token = page.drain_into(video_id, max, &mut out);
                    debug!(video_id, fetched = out.len(), "comment page fetched");
                    if out.len() >= max || page_token.is_none() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = ?e, video_id, fetched = out.len(), "youtube fetch failed");
                    counter!("fetch_errors_total").increment(1);
                    out.push(RawComment::error_marker(video_id, format!("{e:#}")));
                    break;
                }
            }
        }

        counter!("fetch_comments_total").increment(out.len() as u64);
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "youtube"
    }
}

// src/analyze/mod.rs
//! Comment sentiment pipeline.
//!
//! Per record, independently:
//! 1) language detection
//! 2) translation to English (fail-soft, flagged)
//! 3) `analysis_text` / `wc_text` from the *translated* text
//! 4) score + label
//! 5) timestamp parsing
//!
//! After every record is annotated, rows are sorted newest first when at least
//! one timestamp parsed; rows without a timestamp go last in arrival order.

pub mod language;
pub mod normalize;
pub mod polarity;
pub mod scoring;
pub mod translate;
pub mod vader;

use std::cmp::Ordering;
use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use futures::stream::{self, StreamExt};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::info;

use crate::config::AppConfig;
use crate::ingest::RawComment;

pub use crate::analyze::language::{detect_language, UNDETERMINED};
pub use crate::analyze::normalize::{clean_for_display, clean_for_sentiment};
pub use crate::analyze::scoring::{label_from_score, score, Scored, ScoringMethod, Sentiment};
pub use crate::analyze::translate::{
    build_translator_from_config, translate_to_english, DynTranslator, Translation, Translator,
};

/// Column schema of an annotated row, in export order.
pub const COLUMNS: [&str; 13] = [
    "comment_id",
    "author",
    "published_at",
    "like_count",
    "text",
    "video_id",
    "language",
    "translated_text",
    "translation_error",
    "analysis_text",
    "wc_text",
    "sentiment_score",
    "sentiment",
];

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("pipeline_comments_total", "Comments annotated by the pipeline.");
        describe_counter!(
            "pipeline_translation_errors_total",
            "Rows whose translation failed and kept the original text."
        );
        describe_counter!(
            "pipeline_language_undetermined_total",
            "Rows whose language could not be determined."
        );
        describe_histogram!("pipeline_aggregate_ms", "Aggregate wall time in milliseconds.");
    });
}

/// A raw comment plus everything the pipeline derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedComment {
    pub comment_id: Option<String>,
    pub author: Option<String>,
    /// Parsed upstream timestamp; `None` when absent or unparseable.
    pub published_at: Option<DateTime<Utc>>,
    pub like_count: Option<i64>,
    pub text: String,
    pub video_id: Option<String>,
    pub language: String,
    pub translated_text: String,
    pub translation_error: bool,
    pub analysis_text: String,
    pub wc_text: String,
    pub sentiment_score: f64,
    pub sentiment: Sentiment,
}

/// Label counts over a result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentSummary {
    pub total: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentSummary {
    pub fn count(&self, label: Sentiment) -> usize {
        match label {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }
}

/// Ordered, annotated rows. The column set is fixed even when there are no rows.
#[derive(Debug, Clone, Serialize)]
pub struct ResultSet {
    pub method: ScoringMethod,
    pub rows: Vec<AnnotatedComment>,
}

impl ResultSet {
    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn summary(&self) -> SentimentSummary {
        let mut s = SentimentSummary {
            total: self.rows.len(),
            ..SentimentSummary::default()
        };
        for r in &self.rows {
            match r.sentiment {
                Sentiment::Positive => s.positive += 1,
                Sentiment::Neutral => s.neutral += 1,
                Sentiment::Negative => s.negative += 1,
            }
        }
        s
    }
}

/// Stateless between calls; the translator and the static lexicons/detector
/// are shared read-only.
pub struct Pipeline {
    translator: DynTranslator,
    concurrency: usize,
}

impl Pipeline {
    pub fn new(translator: DynTranslator, concurrency: usize) -> Self {
        language::init();
        Self {
            translator,
            concurrency: concurrency.max(1),
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let translator = build_translator_from_config(cfg)?;
        Ok(Self::new(translator, cfg.translate_concurrency))
    }

    pub fn translator_name(&self) -> &'static str {
        self.translator.provider_name()
    }

    /// Annotate a single record. Never fails; per-stage fallbacks are data.
    pub async fn annotate(&self, raw: RawComment, method: ScoringMethod) -> AnnotatedComment {
        let language = detect_language(&raw.text);
        let Translation { text: translated_text, had_error } =
            translate_to_english(self.translator.as_ref(), &raw.text, &language).await;
        let analysis_text = clean_for_sentiment(&translated_text);
        let wc_text = clean_for_display(&translated_text);
        let Scored { score: sentiment_score, label } = score(&analysis_text, method);
        let published_at = parse_timestamp(raw.published_at.as_deref());

        if language == UNDETERMINED {
            counter!("pipeline_language_undetermined_total").increment(1);
        }
        if had_error {
            counter!("pipeline_translation_errors_total").increment(1);
        }

        AnnotatedComment {
            comment_id: raw.comment_id,
            author: raw.author,
            published_at,
            like_count: raw.like_count,
            text: raw.text,
            video_id: raw.video_id,
            language,
            translated_text,
            translation_error: had_error,
            analysis_text,
            wc_text,
            sentiment_score,
            sentiment: label,
        }
    }

    /// Annotate every record (up to `concurrency` translations in flight,
    /// input order kept), then sort newest first.
    pub async fn aggregate(&self, raw_comments: Vec<RawComment>, method: ScoringMethod) -> ResultSet {
        ensure_metrics_described();
        let t0 = Instant::now();
        let n = raw_comments.len();

        let mut rows: Vec<AnnotatedComment> = stream::iter(raw_comments)
            .map(|raw| self.annotate(raw, method))
            .buffered(self.concurrency)
            .collect()
            .await;

        sort_newest_first(&mut rows);

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("pipeline_aggregate_ms").record(ms);
        counter!("pipeline_comments_total").increment(n as u64);
        info!(rows = n, method = %method, translator = self.translator_name(), elapsed_ms = ms, "aggregate finished");

        ResultSet { method, rows }
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` (UTC assumed)
/// and bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(s: Option<&str>) -> Option<DateTime<Utc>> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Descending by timestamp, missing last; stable, so ties keep arrival order.
/// No-op when no row has a timestamp.
pub fn sort_newest_first(rows: &mut [AnnotatedComment]) {
    if !rows.iter().any(|r| r.published_at.is_some()) {
        return;
    }
    rows.sort_by(|a, b| match (a.published_at, b.published_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

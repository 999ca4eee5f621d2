//! Presentation-side views over a [`ResultSet`]: display table rows,
//! word-cloud term frequencies, and CSV export.

use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::analyze::{AnnotatedComment, ResultSet, Sentiment, COLUMNS};

/// Extra terms dropped from word clouds on top of the English stop words.
const EXTRA_STOPWORDS: [&str; 5] = ["https", "http", "www", "youtube", "video"];

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't", "did", "didn't",
    "do", "does", "doesn't", "doing", "don't", "down", "during", "each", "else", "ever", "few",
    "for", "from", "further", "get", "had", "hadn't", "has", "hasn't", "have", "haven't",
    "having", "he", "he'd", "he'll", "he's", "hence", "her", "here", "here's", "hers", "herself",
    "him", "himself", "his", "how", "how's", "however", "i", "i'd", "i'll", "i'm", "i've", "if",
    "in", "into", "is", "isn't", "it", "it's", "its", "itself", "just", "k", "let's", "like",
    "me", "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of", "off", "on",
    "once", "only", "or", "other", "otherwise", "ought", "our", "ours", "ourselves", "out",
    "over", "own", "r", "same", "shall", "shan't", "she", "she'd", "she'll", "she's", "should",
    "shouldn't", "since", "so", "some", "such", "than", "that", "that's", "the", "their",
    "theirs", "them", "themselves", "then", "there", "there's", "therefore", "these", "they",
    "they'd", "they'll", "they're", "they've", "this", "those", "through", "to", "too", "under",
    "until", "up", "very", "was", "wasn't", "we", "we'd", "we'll", "we're", "we've", "were",
    "weren't", "what", "what's", "when", "when's", "where", "where's", "which", "while", "who",
    "who's", "whom", "why", "why's", "with", "won't", "would", "wouldn't", "you", "you'd",
    "you'll", "you're", "you've", "your", "yours", "yourself", "yourselves",
];

fn is_stopword(w: &str) -> bool {
    EXTRA_STOPWORDS.contains(&w) || STOPWORDS.contains(&w)
}

fn fmt_ts(ts: &Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

/// Row shape of the `/analyze` table. Nulls render as "" (like_count as 0).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRecord {
    pub published_at: String,
    pub author: String,
    pub language: String,
    pub like_count: i64,
    pub text: String,
    pub translated_text: String,
    pub sentiment: Sentiment,
    pub sentiment_score: f64,
}

impl From<&AnnotatedComment> for TableRecord {
    fn from(r: &AnnotatedComment) -> Self {
        Self {
            published_at: fmt_ts(&r.published_at),
            author: r.author.clone().unwrap_or_default(),
            language: r.language.clone(),
            like_count: r.like_count.unwrap_or(0),
            text: r.text.clone(),
            translated_text: r.translated_text.clone(),
            sentiment: r.sentiment,
            sentiment_score: r.sentiment_score,
        }
    }
}

/// First `limit` rows in result order.
pub fn table_records(rs: &ResultSet, limit: usize) -> Vec<TableRecord> {
    rs.rows.iter().take(limit).map(TableRecord::from).collect()
}

/// Word-cloud input for one label: `(term, count)` sorted by count desc, then
/// term. Empty when the joined `wc_text` has fewer than `min_words` words.
pub fn term_frequencies(
    rs: &ResultSet,
    label: Sentiment,
    min_words: usize,
    max_words: usize,
) -> Vec<(String, usize)> {
    let words: Vec<&str> = rs
        .rows
        .iter()
        .filter(|r| r.sentiment == label)
        .flat_map(|r| r.wc_text.split_whitespace())
        .collect();
    if words.is_empty() || words.len() < min_words {
        return Vec::new();
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for w in words {
        if w.chars().count() < 2 || is_stopword(w) {
            continue;
        }
        *counts.entry(w).or_insert(0) += 1;
    }

    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(w, c)| (w.to_string(), c))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out.truncate(max_words);
    out
}

/// Full result set as CSV (header always present, `\n` line endings).
pub fn to_csv(rs: &ResultSet) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(COLUMNS).context("writing csv header")?;

    for r in &rs.rows {
        wtr.write_record([
            r.comment_id.clone().unwrap_or_default(),
            r.author.clone().unwrap_or_default(),
            fmt_ts(&r.published_at),
            r.like_count.map(|n| n.to_string()).unwrap_or_default(),
            r.text.clone(),
            r.video_id.clone().unwrap_or_default(),
            r.language.clone(),
            r.translated_text.clone(),
            r.translation_error.to_string(),
            r.analysis_text.clone(),
            r.wc_text.clone(),
            r.sentiment_score.to_string(),
            r.sentiment.to_string(),
        ])
        .context("writing csv row")?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow!("flushing csv buffer: {}", e.error()))?;
    String::from_utf8(bytes).context("csv output is not utf-8")
}

/// `sentiment_<id>.csv`, or `sentiment_video.csv` without an id.
pub fn csv_filename(video_id: Option<&str>) -> String {
    format!("sentiment_{}.csv", video_id.unwrap_or("video"))
}

// tests/pipeline_fixture.rs
//
// Fixture pages → source → pipeline, without the HTTP layer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use yt_comment_sentiment::analyze::translate::{EchoTranslator, Translator, TranslateFuture};
use yt_comment_sentiment::ingest::providers::FixtureCommentSource;
use yt_comment_sentiment::{CommentSource, Pipeline, ScoringMethod, Sentiment};

const PAGE1: &str = include_str!("fixtures/comment_threads_page1.json");
const PAGE2: &str = include_str!("fixtures/comment_threads_page2.json");
const VIDEO: &str = "dQw4w9WgXcQ";

/// Always fails, to exercise the fail-soft translation path.
struct BrokenTranslator;

impl Translator for BrokenTranslator {
    fn translate<'a>(&'a self, _text: &'a str, _source_lang: &'a str) -> TranslateFuture<'a> {
        Box::pin(async { Err(anyhow::anyhow!("upstream unavailable")) })
    }

    fn provider_name(&self) -> &'static str {
        "broken"
    }
}

/// Translates a few known phrases and counts every call.
#[derive(Default)]
struct PhraseBook {
    calls: AtomicUsize,
}

impl Translator for PhraseBook {
    fn translate<'a>(&'a self, text: &'a str, _source_lang: &'a str) -> TranslateFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let out = match text {
            "Me encanta esta canción" => "I love this song",
            "Очень красиво" => "Very beautiful",
            "Odio esto, qué horror 😭" => "I hate this 😭",
            other => other,
        }
        .to_string();
        Box::pin(async move { Ok(out) })
    }

    fn provider_name(&self) -> &'static str {
        "phrasebook"
    }
}

fn comment(text: &str) -> yt_comment_sentiment::RawComment {
    yt_comment_sentiment::RawComment {
        text: text.into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn fixture_source_pages_until_exhausted() {
    let src = FixtureCommentSource::from_pages([PAGE1, PAGE2]);
    let all = src.fetch_comments(VIDEO, 100).await.unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all[0].comment_id.as_deref(), Some("UgxA1"));
    assert_eq!(all[0].like_count, Some(12));
    assert_eq!(all[2].like_count, Some(0));
    assert_eq!(all[3].author.as_deref(), Some("@sam"));
    assert!(all.iter().all(|c| c.video_id.as_deref() == Some(VIDEO)));

    let capped = src.fetch_comments(VIDEO, 2).await.unwrap();
    assert_eq!(capped.len(), 2);

    assert!(src.fetch_comments(VIDEO, 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn fixture_source_failure_appends_marker() {
    let src = FixtureCommentSource::from_pages([PAGE1, PAGE2]).failing_after(0);
    let got = src.fetch_comments(VIDEO, 100).await.unwrap();
    assert_eq!(got.len(), 1);
    assert!(got[0].text.starts_with("YouTube API error:"));
    assert!(got[0].comment_id.is_none());
}

#[tokio::test]
async fn every_row_is_labelled_and_consistent() {
    let raw = FixtureCommentSource::from_pages([PAGE1, PAGE2])
        .fetch_comments(VIDEO, 100)
        .await
        .unwrap();
    for method in [ScoringMethod::Vader, ScoringMethod::TextBlob] {
        let pipeline = Pipeline::new(Arc::new(EchoTranslator), 2);
        let rs = pipeline.aggregate(raw.clone(), method).await;
        assert_eq!(rs.len(), raw.len());
        assert_eq!(rs.method, method);
        for row in &rs.rows {
            assert!((-1.0..=1.0).contains(&row.sentiment_score));
            assert_eq!(row.sentiment, yt_comment_sentiment::analyze::label_from_score(row.sentiment_score));
            assert!(!row.language.is_empty());
            assert!(!row.translation_error);
        }
        let s = rs.summary();
        assert_eq!(s.positive + s.neutral + s.negative, s.total);
        assert_eq!(s.count(Sentiment::Negative), 1);
    }
}

#[tokio::test]
async fn failing_translator_keeps_original_text() {
    let pipeline = Pipeline::new(Arc::new(BrokenTranslator), 4);
    let raw = vec![comment(
        "Das ist wirklich ein wunderbares Lied, ich höre es jeden Tag",
    )];
    let rs = pipeline.aggregate(raw, ScoringMethod::Vader).await;
    let row = &rs.rows[0];
    assert_eq!(row.language, "de");
    assert!(row.translation_error);
    assert_eq!(row.translated_text, row.text);
}

#[tokio::test]
async fn short_foreign_comments_are_translated() {
    let book = Arc::new(PhraseBook::default());
    let pipeline = Pipeline::new(book.clone(), 2);
    let raw = vec![comment("Me encanta esta canción"), comment("Очень красиво")];

    let rs = pipeline.aggregate(raw, ScoringMethod::Vader).await;

    assert_eq!(book.calls.load(Ordering::SeqCst), 2);
    for row in &rs.rows {
        assert_ne!(row.language, "und", "row: {}", row.text);
        assert!(!row.translation_error);
        assert_eq!(row.sentiment, Sentiment::Positive, "row: {}", row.translated_text);
    }
    assert_eq!(rs.rows[0].translated_text, "I love this song");
    assert_eq!(rs.rows[1].translated_text, "Very beautiful");
}

#[tokio::test]
async fn derived_texts_follow_the_translation() {
    let pipeline = Pipeline::new(Arc::new(PhraseBook::default()), 1);
    let rs = pipeline
        .aggregate(vec![comment("Odio esto, qué horror 😭")], ScoringMethod::TextBlob)
        .await;
    let row = &rs.rows[0];

    assert_eq!(row.text, "Odio esto, qué horror 😭");
    assert_eq!(row.translated_text, "I hate this 😭");
    assert_eq!(row.analysis_text, "i hate this negative");
    assert_eq!(row.wc_text, "i hate this");
    assert_eq!(row.sentiment, Sentiment::Negative);
}

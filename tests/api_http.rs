// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot, with a
// fixture comment source and the echo translator.

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value as Json};
use tower::ServiceExt as _; // for `oneshot`

use yt_comment_sentiment::analyze::translate::EchoTranslator;
use yt_comment_sentiment::ingest::providers::FixtureCommentSource;
use yt_comment_sentiment::{router, AppConfig, AppState, Pipeline};

const BODY_LIMIT: usize = 1024 * 1024;
const PAGE1: &str = include_str!("fixtures/comment_threads_page1.json");
const PAGE2: &str = include_str!("fixtures/comment_threads_page2.json");
const EMPTY_PAGE: &str = r#"{"items": []}"#;

fn app_with(source: FixtureCommentSource, config: AppConfig) -> Router {
    let pipeline = Pipeline::new(Arc::new(EchoTranslator), 4);
    router(AppState::new(pipeline, Arc::new(source), config))
}

fn test_app() -> Router {
    app_with(
        FixtureCommentSource::from_pages([PAGE1, PAGE2]),
        AppConfig::default(),
    )
}

async fn post_analyze(app: Router, payload: Json) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST /analyze");
    let resp = app.oneshot(req).await.expect("oneshot /analyze");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let v: Json = serde_json::from_slice(&bytes).expect("json body");
    (status, v)
}

#[tokio::test]
async fn health_returns_ok() {
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let resp = test_app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn analyze_returns_stats_and_sorted_table() {
    let (status, v) = post_analyze(
        test_app(),
        json!({ "video_input": "https://www.youtube.com/watch?v=dQw4w9WgXcQ", "method": "vader", "max_comments": 50 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {v}");
    assert_eq!(v["success"], true);
    assert_eq!(v["video_id"], "dQw4w9WgXcQ");
    assert_eq!(v["method"], "vader");
    assert_eq!(
        v["stats"],
        json!({ "total": 4, "positive": 2, "neutral": 1, "negative": 1 })
    );

    let rows = v["table_records"].as_array().expect("table_records array");
    let authors: Vec<&str> = rows.iter().map(|r| r["author"].as_str().unwrap()).collect();
    assert_eq!(authors, vec!["@tom", "@sam", "@lee", "@maria"]);
    assert_eq!(rows[0]["sentiment"], "Negative");
    assert_eq!(rows[0]["published_at"], "2024-03-01T09:00:00Z");
    // missing likeCount upstream → 0
    assert_eq!(rows[2]["like_count"], 0);
    assert!(v["wordcloud"]["positive"].is_array());
}

#[tokio::test]
async fn unknown_method_defaults_to_vader_and_count_is_clamped() {
    let (status, v) = post_analyze(
        test_app(),
        json!({ "video_input": "dQw4w9WgXcQ", "method": "bert", "max_comments": "not a number" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["method"], "vader");
    assert_eq!(v["stats"]["total"], 4);
}

#[tokio::test]
async fn textblob_method_is_honoured() {
    let (status, v) = post_analyze(
        test_app(),
        json!({ "video_input": "dQw4w9WgXcQ", "method": "TextBlob" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["method"], "textblob");
}

#[tokio::test]
async fn table_is_limited_by_config() {
    let cfg = AppConfig {
        table_limit: 2,
        ..AppConfig::default()
    };
    let app = app_with(FixtureCommentSource::from_pages([PAGE1, PAGE2]), cfg);
    let (_, v) = post_analyze(app, json!({ "video_input": "dQw4w9WgXcQ" })).await;
    assert_eq!(v["table_records"].as_array().unwrap().len(), 2);
    assert_eq!(v["stats"]["total"], 4);
}

#[tokio::test]
async fn blank_input_is_rejected() {
    let (status, v) = post_analyze(test_app(), json!({ "video_input": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error"], "No video URL provided");
}

#[tokio::test]
async fn input_without_identifier_is_rejected() {
    let (status, v) = post_analyze(test_app(), json!({ "video_input": "hello world" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(v["error"].as_str().unwrap().contains("Could not extract"));
}

#[tokio::test]
async fn no_comments_is_a_bad_request() {
    let app = app_with(
        FixtureCommentSource::from_pages([EMPTY_PAGE]),
        AppConfig::default(),
    );
    let (status, v) = post_analyze(app, json!({ "video_input": "dQw4w9WgXcQ" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error"], "No comments found or failed to fetch comments.");
}

#[tokio::test]
async fn partial_fetch_keeps_prefix_and_marker_row() {
    let app = app_with(
        FixtureCommentSource::from_pages([PAGE1, PAGE2]).failing_after(1),
        AppConfig::default(),
    );
    let (status, v) = post_analyze(app, json!({ "video_input": "dQw4w9WgXcQ" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["stats"]["total"], 4);

    let rows = v["table_records"].as_array().unwrap();
    let last = rows.last().unwrap();
    assert!(last["text"].as_str().unwrap().starts_with("YouTube API error:"));
    assert_eq!(last["published_at"], "");
    assert_eq!(last["author"], "");
}

#[tokio::test]
async fn csv_download_has_headers_and_full_schema() {
    let req = Request::builder()
        .uri("/download.csv?video_input=https%3A%2F%2Fyoutu.be%2FdQw4w9WgXcQ&method=textblob&max_comments=5")
        .body(Body::empty())
        .unwrap();
    let resp = test_app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let ct = resp.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(ct.starts_with("text/csv"));
    let cd = resp.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert_eq!(cd, "attachment; filename=sentiment_dQw4w9WgXcQ.csv");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("comment_id,author,published_at,like_count,text,video_id,language,translated_text,translation_error,analysis_text,wc_text,sentiment_score,sentiment")
    );
    // csv bounds clamp 5 → 50, so every fixture row is exported
    assert_eq!(lines.count(), 4);
}

#[tokio::test]
async fn csv_download_without_comments_still_has_header() {
    let app = app_with(
        FixtureCommentSource::from_pages([EMPTY_PAGE]),
        AppConfig::default(),
    );
    let req = Request::builder()
        .uri("/download.csv?video_input=dQw4w9WgXcQ")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(csv.lines().count(), 1);
    assert!(csv.starts_with("comment_id,"));
}

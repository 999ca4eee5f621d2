use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::analyze::{Pipeline, ScoringMethod, Sentiment, SentimentSummary};
use crate::config::AppConfig;
use crate::ingest::{extract_id, DynCommentSource};
use crate::report::{self, TableRecord};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub source: DynCommentSource,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pipeline: Pipeline, source: DynCommentSource, config: AppConfig) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            source,
            config: Arc::new(config),
        }
    }

    /// Live state: YouTube source + configured translator.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let pipeline = Pipeline::from_config(&config)?;
        let source = crate::ingest::build_source_from_config(&config)?;
        Ok(Self::new(pipeline, source, config))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/analyze", post(analyze))
        .route("/download.csv", get(download_csv))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

// ------------------------------------------------------------
// Errors
// ------------------------------------------------------------

const MSG_NO_INPUT: &str = "No video URL provided";
const MSG_NO_ID: &str = "Could not extract a valid YouTube video ID from the provided input.";
const MSG_NO_COMMENTS: &str = "No comments found or failed to fetch comments.";

#[derive(Debug)]
pub enum ApiError {
    BadRequest(&'static str),
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            Self::BadRequest(m) => (StatusCode::BAD_REQUEST, m.to_string()),
            Self::Internal(e) => {
                warn!(error = ?e, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
            }
        };
        (status, Json(json!({ "error": msg }))).into_response()
    }
}

// ------------------------------------------------------------
// Request helpers
// ------------------------------------------------------------

/// Integer count from a loosely typed value: numbers (truncated) or integer
/// strings. Anything else counts as "not given".
fn parse_count(v: Option<&Value>) -> Option<i64> {
    match v? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn video_id_from(input: Option<&str>) -> Result<String, ApiError> {
    let input = input.map(str::trim).unwrap_or_default();
    if input.is_empty() {
        return Err(ApiError::BadRequest(MSG_NO_INPUT));
    }
    extract_id(input).ok_or(ApiError::BadRequest(MSG_NO_ID))
}

// ------------------------------------------------------------
// POST /analyze
// ------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AnalyzeReq {
    video_input: Option<String>,
    method: Option<String>,
    max_comments: Option<Value>,
}

#[derive(Debug, Serialize)]
struct WordCloudData {
    positive: Vec<(String, usize)>,
    negative: Vec<(String, usize)>,
}

#[derive(Debug, Serialize)]
struct AnalyzeResp {
    success: bool,
    video_id: String,
    method: ScoringMethod,
    stats: SentimentSummary,
    wordcloud: WordCloudData,
    table_records: Vec<TableRecord>,
}

async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeReq>,
) -> Result<Json<AnalyzeResp>, ApiError> {
    let video_id = video_id_from(body.video_input.as_deref())?;
    let method = ScoringMethod::from_str_lossy(body.method.as_deref().unwrap_or_default());
    let max = state
        .config
        .analyze_bounds
        .clamp(parse_count(body.max_comments.as_ref()));
    info!(video_id = %video_id, %method, max, "analyze request");

    let raw = state.source.fetch_comments(&video_id, max).await?;
    let rs = state.pipeline.aggregate(raw, method).await;
    if rs.is_empty() {
        return Err(ApiError::BadRequest(MSG_NO_COMMENTS));
    }

    let cfg = &state.config;
    let wordcloud = WordCloudData {
        positive: report::term_frequencies(
            &rs,
            Sentiment::Positive,
            cfg.wordcloud_min_words,
            cfg.wordcloud_max_words,
        ),
        negative: report::term_frequencies(
            &rs,
            Sentiment::Negative,
            cfg.wordcloud_min_words,
            cfg.wordcloud_max_words,
        ),
    };

    Ok(Json(AnalyzeResp {
        success: true,
        video_id,
        method,
        stats: rs.summary(),
        wordcloud,
        table_records: report::table_records(&rs, cfg.table_limit),
    }))
}

// ------------------------------------------------------------
// GET /download.csv
// ------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvQuery {
    video_input: Option<String>,
    method: Option<String>,
    max_comments: Option<String>,
}

async fn download_csv(
    State(state): State<AppState>,
    Query(q): Query<CsvQuery>,
) -> Result<Response, ApiError> {
    let video_id = video_id_from(q.video_input.as_deref())?;
    let method = ScoringMethod::from_str_lossy(q.method.as_deref().unwrap_or_default());
    let requested = q.max_comments.as_deref().and_then(|s| s.trim().parse::<i64>().ok());
    let max = state.config.csv_bounds.clamp(requested);
    info!(video_id = %video_id, %method, max, "csv export request");

    let raw = state.source.fetch_comments(&video_id, max).await?;
    let rs = state.pipeline.aggregate(raw, method).await;

    let disposition = format!(
        "attachment; filename={}",
        report::csv_filename(Some(&video_id))
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report::to_csv(&rs)?,
    )
        .into_response())
}

// src/ingest/video_id.rs
//! Canonical video identifier extraction from pasted URLs or raw IDs.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_RAW_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Za-z_-]{11}$").expect("raw id regex"));

/// URL shapes, tried in order; the first capture wins.
static RE_URL_SHAPES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"v=([0-9A-Za-z_-]{11})",         // watch?v=ID
        r"youtu\.be/([0-9A-Za-z_-]{11})", // youtu.be/ID
        r"/shorts/([0-9A-Za-z_-]{11})",
        r"/live/([0-9A-Za-z_-]{11})",
        r"/embed/([0-9A-Za-z_-]{11})",
        r"/v/([0-9A-Za-z_-]{11})",
        r"/videos/([0-9A-Za-z_-]{11})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("url shape regex"))
    .collect()
});

static RE_ANY_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9A-Za-z_-]{11}").expect("id run regex"));

/// Extract an 11-character video identifier from `input`.
///
/// Order: raw ID → known URL shapes → first 11-char run anywhere in the string.
/// Returns `None` for blank input or when nothing matches.
pub fn extract_id(input: &str) -> Option<String> {
    let candidate = input.trim();
    if candidate.is_empty() {
        return None;
    }

    if RE_RAW_ID.is_match(candidate) {
        return Some(candidate.to_string());
    }

    for re in RE_URL_SHAPES.iter() {
        if let Some(cap) = re.captures(candidate).and_then(|c| c.get(1)) {
            return Some(cap.as_str().to_string());
        }
    }

    RE_ANY_RUN
        .find(candidate)
        .map(|m| m.as_str().to_string())
}

/// `Option`-taking variant for callers holding possibly-absent input.
pub fn extract_id_opt(input: Option<&str>) -> Option<String> {
    input.and_then(extract_id)
}

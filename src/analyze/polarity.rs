// src/analyze/polarity.rs
//! Averaging polarity scorer in the TextBlob/pattern style.
//!
//! Each lexicon word yields one assessment; an intensifier directly in front
//! multiplies it, a negator directly in front multiplies it by -0.5. The
//! document polarity is the mean of all assessments, clamped to [-1, 1].

use once_cell::sync::Lazy;
use std::collections::HashMap;

static LEXICON: Lazy<HashMap<String, f64>> = Lazy::new(|| {
    let raw = include_str!("../../lexicon/polarity_lexicon.json");
    serde_json::from_str::<HashMap<String, f64>>(raw).expect("valid polarity lexicon")
});

const NEGATION: f64 = -0.5;

/// Mean polarity in [-1, 1]; 0.0 when no lexicon word is present.
pub fn polarity(text: &str) -> f64 {
    let mut assessments: Vec<f64> = Vec::new();
    let mut modifier = 1.0f64;
    let mut negated = false;

    for tok in tokenize(text) {
        if let Some(&p) = LEXICON.get(tok.as_str()) {
            let mut v = p * modifier;
            if negated {
                v *= NEGATION;
            }
            assessments.push(v);
            modifier = 1.0;
            negated = false;
        } else if let Some(m) = intensity(&tok) {
            modifier *= m;
        } else if is_negator(&tok) {
            negated = true;
        } else {
            // modifiers only reach the next word
            modifier = 1.0;
            negated = false;
        }
    }

    if assessments.is_empty() {
        return 0.0;
    }
    let mean = assessments.iter().sum::<f64>() / assessments.len() as f64;
    mean.clamp(-1.0, 1.0)
}

/// Lowercased runs of letters/digits/apostrophes, plus the emoticons the
/// lexicon knows about.
fn tokenize(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for chunk in text.split_whitespace() {
        let lower = chunk.to_lowercase();
        if LEXICON.contains_key(lower.as_str()) {
            out.push(lower);
            continue;
        }
        out.extend(
            lower
                .split(|c: char| !(c.is_alphanumeric() || c == '\''))
                .map(|w| w.trim_matches('\''))
                .filter(|w| !w.is_empty())
                .map(str::to_string),
        );
    }
    out
}

fn intensity(tok: &str) -> Option<f64> {
    let m = match tok {
        "very" | "really" | "so" | "super" | "too" => 1.3,
        "extremely" | "incredibly" | "absolutely" | "totally" | "utterly" => 1.5,
        "quite" | "pretty" => 1.1,
        "somewhat" | "fairly" => 0.8,
        "slightly" | "barely" | "hardly" => 0.5,
        _ => return None,
    };
    Some(m)
}

fn is_negator(tok: &str) -> bool {
    tok.ends_with("n't") || matches!(tok, "not" | "never" | "no" | "nothing" | "without")
}

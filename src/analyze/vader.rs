// src/analyze/vader.rs
//! Lexicon/rule-based compound scorer in the VADER style.
//!
//! Per token: lexicon valence, adjusted by up to three preceding booster words
//! (dampened with distance) and negators (`* -0.74`). A "but" halves the weight
//! of everything before it and boosts everything after it by 1.5. The sum is
//! amplified by `!` / `?` emphasis and squashed into [-1, 1] with
//! `x / sqrt(x^2 + 15)`.
//!
//! Input is expected to be lowercase (see `clean_for_sentiment`), so the
//! all-caps emphasis rule of VADER never applies.

use once_cell::sync::Lazy;
use std::collections::HashMap;

static LEXICON: Lazy<HashMap<String, f64>> = Lazy::new(|| {
    let raw = include_str!("../../lexicon/vader_lexicon.json");
    serde_json::from_str::<HashMap<String, f64>>(raw).expect("valid vader lexicon")
});

const B_INCR: f64 = 0.293;
const B_DECR: f64 = -0.293;
const N_SCALAR: f64 = -0.74;
const ALPHA: f64 = 15.0;

/// Compound score in [-1, 1], rounded to 4 decimals. 0.0 when no token carries sentiment.
pub fn compound(text: &str) -> f64 {
    let tokens = tokenize(text);
    let mut sentiments = Vec::with_capacity(tokens.len());

    for (i, tok) in tokens.iter().enumerate() {
        if booster_scalar(tok).is_some() {
            sentiments.push(0.0);
            continue;
        }
        if tok == "kind" && tokens.get(i + 1).is_some_and(|n| n == "of") {
            sentiments.push(0.0);
            continue;
        }
        sentiments.push(valence_at(&tokens, i));
    }

    but_check(&tokens, &mut sentiments);

    let mut sum: f64 = sentiments.iter().sum();
    if sum == 0.0 {
        return 0.0;
    }
    let emphasis = punctuation_emphasis(text);
    if sum > 0.0 {
        sum += emphasis;
    } else {
        sum -= emphasis;
    }
    round4(normalize(sum))
}

fn valence_at(tokens: &[String], i: usize) -> f64 {
    let Some(&base) = LEXICON.get(tokens[i].as_str()) else {
        return 0.0;
    };
    let mut valence = base;

    for start_i in 0..3usize {
        if i <= start_i {
            break;
        }
        let prev = tokens[i - (start_i + 1)].as_str();
        if LEXICON.contains_key(prev) {
            continue;
        }
        let mut s = scalar_inc_dec(prev, valence);
        if start_i == 1 {
            s *= 0.95;
        } else if start_i == 2 {
            s *= 0.9;
        }
        valence += s;
        valence = negation_check(valence, tokens, start_i, i);
    }

    least_check(valence, tokens, i)
}

fn scalar_inc_dec(word: &str, valence: f64) -> f64 {
    match booster_scalar(word) {
        Some(s) if valence < 0.0 => -s,
        Some(s) => s,
        None => 0.0,
    }
}

fn negation_check(valence: f64, tokens: &[String], start_i: usize, i: usize) -> f64 {
    let at = |back: usize| tokens[i - back].as_str();
    match start_i {
        0 if is_negator(at(1)) => valence * N_SCALAR,
        1 => {
            if at(2) == "never" && matches!(at(1), "so" | "this") {
                valence * 1.25
            } else if at(2) == "without" && at(1) == "doubt" {
                valence
            } else if is_negator(at(2)) {
                valence * N_SCALAR
            } else {
                valence
            }
        }
        2 => {
            if at(3) == "never" && (matches!(at(2), "so" | "this") || matches!(at(1), "so" | "this")) {
                valence * 1.25
            } else if at(3) == "without" && (at(2) == "doubt" || at(1) == "doubt") {
                valence
            } else if is_negator(at(3)) {
                valence * N_SCALAR
            } else {
                valence
            }
        }
        _ => valence,
    }
}

/// "least X" flips X unless it reads "at least" / "very least".
fn least_check(valence: f64, tokens: &[String], i: usize) -> f64 {
    if i >= 1 && tokens[i - 1] == "least" && !LEXICON.contains_key("least") {
        let before = if i >= 2 { tokens[i - 2].as_str() } else { "" };
        if before != "at" && before != "very" {
            return valence * N_SCALAR;
        }
    }
    valence
}

fn but_check(tokens: &[String], sentiments: &mut [f64]) {
    let Some(bi) = tokens.iter().position(|t| t == "but") else {
        return;
    };
    for (si, s) in sentiments.iter_mut().enumerate() {
        if si < bi {
            *s *= 0.5;
        } else if si > bi {
            *s *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let ep = text.matches('!').count().min(4) as f64 * 0.292;
    let qm = text.matches('?').count();
    let qm_amp = match qm {
        0 | 1 => 0.0,
        2 | 3 => qm as f64 * 0.18,
        _ => 0.96,
    };
    ep + qm_amp
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Whitespace tokens, lowercased. Surrounding punctuation is stripped unless
/// that leaves two characters or fewer (keeps emoticons like ":)" intact).
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|tok| {
            let stripped = tok.trim_matches(|c: char| c.is_ascii_punctuation());
            if stripped.chars().count() <= 2 {
                tok.to_lowercase()
            } else {
                stripped.to_lowercase()
            }
        })
        .collect()
}

fn booster_scalar(word: &str) -> Option<f64> {
    match word {
        "absolutely" | "amazingly" | "awfully" | "completely" | "considerably" | "decidedly"
        | "deeply" | "enormously" | "entirely" | "especially" | "exceptionally" | "extremely"
        | "fabulously" | "fully" | "greatly" | "hella" | "highly" | "hugely" | "incredibly"
        | "intensely" | "majorly" | "more" | "most" | "particularly" | "purely" | "quite"
        | "really" | "remarkably" | "so" | "substantially" | "thoroughly" | "totally"
        | "tremendously" | "uber" | "unbelievably" | "unusually" | "utterly" | "very" => {
            Some(B_INCR)
        }
        "almost" | "barely" | "hardly" | "kinda" | "kindof" | "kind-of" | "less" | "little"
        | "marginally" | "occasionally" | "partly" | "scarcely" | "slightly" | "somewhat"
        | "sorta" | "sortof" | "sort-of" => Some(B_DECR),
        _ => None,
    }
}

fn is_negator(tok: &str) -> bool {
    tok.contains("n't")
        || matches!(
            tok,
            "aint"
                | "arent"
                | "cannot"
                | "cant"
                | "couldnt"
                | "darent"
                | "didnt"
                | "doesnt"
                | "dont"
                | "hadnt"
                | "hasnt"
                | "havent"
                | "isnt"
                | "mightnt"
                | "mustnt"
                | "neither"
                | "neednt"
                | "never"
                | "none"
                | "nope"
                | "nor"
                | "not"
                | "nothing"
                | "nowhere"
                | "oughtnt"
                | "shant"
                | "shouldnt"
                | "uhuh"
                | "uh-uh"
                | "wasnt"
                | "werent"
                | "without"
                | "wont"
                | "wouldnt"
                | "rarely"
                | "seldom"
                | "despite"
        )
}

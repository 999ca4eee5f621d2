//! Sentiment scoring: method selection, label thresholds, and the `score` stage.
//!
//! Labels are method-independent:
//! - `score >= 0.05`  → Positive
//! - `score <= -0.05` → Negative
//! - otherwise        → Neutral

use serde::{Deserialize, Serialize};
use std::fmt;

use super::normalize::clean_for_sentiment;
use super::{polarity, vader};

pub const POSITIVE_THRESHOLD: f64 = 0.05;
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Scoring strategy. Unknown selector strings fall back to [`ScoringMethod::Vader`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMethod {
    /// Lexicon/rule-based compound score.
    #[default]
    Vader,
    /// Averaged word polarity.
    TextBlob,
}

impl ScoringMethod {
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "textblob" => Self::TextBlob,
            _ => Self::Vader,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vader => "vader",
            Self::TextBlob => "textblob",
        }
    }
}

impl fmt::Display for ScoringMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed thresholds; pure function of the score.
pub fn label_from_score(score: f64) -> Sentiment {
    if score >= POSITIVE_THRESHOLD {
        Sentiment::Positive
    } else if score <= NEGATIVE_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Outcome of the scoring stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored {
    pub score: f64,
    pub label: Sentiment,
}

impl Scored {
    pub const NEUTRAL: Scored = Scored {
        score: 0.0,
        label: Sentiment::Neutral,
    };

    fn from_score(score: f64) -> Self {
        Self {
            score,
            label: label_from_score(score),
        }
    }
}

/// Score English text. The text is passed through `clean_for_sentiment`
/// first; empty cleaned text short-circuits to `(0.0, Neutral)`.
pub fn score(text_en: &str, method: ScoringMethod) -> Scored {
    let prepared = clean_for_sentiment(text_en);
    if prepared.is_empty() {
        return Scored::NEUTRAL;
    }
    let raw = match method {
        ScoringMethod::Vader => vader::compound(&prepared),
        ScoringMethod::TextBlob => polarity::polarity(&prepared),
    };
    Scored::from_score(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_boundaries_are_inclusive() {
        assert_eq!(label_from_score(0.05), Sentiment::Positive);
        assert_eq!(label_from_score(-0.05), Sentiment::Negative);
        assert_eq!(label_from_score(0.0), Sentiment::Neutral);
        assert_eq!(label_from_score(0.0499), Sentiment::Neutral);
        assert_eq!(label_from_score(-0.0499), Sentiment::Neutral);
    }

    #[test]
    fn empty_input_is_neutral_for_every_method() {
        for m in [ScoringMethod::Vader, ScoringMethod::TextBlob] {
            assert_eq!(score("", m), Scored::NEUTRAL);
            assert_eq!(score("  https://x.io @someone ", m), Scored::NEUTRAL);
        }
    }

    #[test]
    fn unknown_method_falls_back_to_vader() {
        assert_eq!(ScoringMethod::from_str_lossy("bert"), ScoringMethod::Vader);
        assert_eq!(ScoringMethod::from_str_lossy(""), ScoringMethod::Vader);
        assert_eq!(ScoringMethod::from_str_lossy(" TextBlob "), ScoringMethod::TextBlob);
    }

    #[test]
    fn emoji_drive_the_label() {
        assert_eq!(score("😀", ScoringMethod::Vader).label, Sentiment::Positive);
        assert_eq!(score("😭", ScoringMethod::TextBlob).label, Sentiment::Negative);
        assert_eq!(score("😐", ScoringMethod::Vader).label, Sentiment::Neutral);
    }

    #[test]
    fn everyday_comment_vocabulary_is_scored() {
        for m in [ScoringMethod::Vader, ScoringMethod::TextBlob] {
            for text in ["absolutely stunning performance", "so wholesome", "goosebumps", "this is a masterpiece"] {
                assert_eq!(score(text, m).label, Sentiment::Positive, "{m}: {text}");
            }
            for text in ["what a waste of time", "such a disappointment", "scam"] {
                assert_eq!(score(text, m).label, Sentiment::Negative, "{m}: {text}");
            }
        }
    }

    #[test]
    fn label_is_consistent_with_score() {
        for text in ["great stuff", "awful", "meh", "not bad at all", "i hate mondays 😡"] {
            for m in [ScoringMethod::Vader, ScoringMethod::TextBlob] {
                let s = score(text, m);
                assert_eq!(s.label, label_from_score(s.score));
                assert!((-1.0..=1.0).contains(&s.score));
            }
        }
    }
}

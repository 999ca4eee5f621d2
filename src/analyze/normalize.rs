// src/analyze/normalize.rs
//! Two text cleaning modes over (translated) comment text:
//! - [`clean_for_display`]: aggressive, ASCII `[a-z0-9 ]` only (word clouds).
//! - [`clean_for_sentiment`]: keeps punctuation, maps emoji to sentiment words.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static RE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+|www\.\S+").expect("url regex"));
static RE_HANDLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[@#]\w+").expect("handle regex"));
static RE_NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]").expect("alnum regex"));
static RE_CONTROL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n\t]").expect("control regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("ws regex"));

/// Emoji → sentiment hint word. Padded with spaces so the word tokenizes on its own.
static EMOJI_HINTS: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    let positive = [
        '😀', '😃', '😄', '😁', '😊', '🙂', '😍', '❤', '👍', '🔥', '⭐', '😂', '🤣', '😆',
    ];
    let negative = ['😭', '😢', '😡', '😠', '👎', '💔', '🤮', '🤬'];
    let neutral = ['😐', '😑', '😶'];

    let mut m = HashMap::new();
    m.extend(positive.into_iter().map(|c| (c, " positive ")));
    m.extend(negative.into_iter().map(|c| (c, " negative ")));
    m.extend(neutral.into_iter().map(|c| (c, " neutral ")));
    m
});

fn strip_links_and_handles(lowered: &str) -> String {
    let s = RE_URL.replace_all(lowered, " ");
    RE_HANDLE.replace_all(&s, " ").into_owned()
}

fn collapse_ws(s: &str) -> String {
    RE_WS.replace_all(s, " ").trim().to_string()
}

/// Lowercase, drop URLs / @mentions / #hashtags, keep only `[a-z0-9 ]`,
/// collapse whitespace.
pub fn clean_for_display(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let s = strip_links_and_handles(&text.to_lowercase());
    let s = RE_NON_ALNUM.replace_all(&s, " ");
    collapse_ws(&s)
}

/// Lowercase, drop URLs / @mentions / #hashtags, replace known emoji with
/// "positive" / "negative" / "neutral", turn CR/LF/TAB into spaces, collapse
/// whitespace. Punctuation and unmapped emoji are kept.
pub fn clean_for_sentiment(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let s = strip_links_and_handles(&text.to_lowercase());
    let s = replace_emojis(&s);
    let s = RE_CONTROL.replace_all(&s, " ");
    collapse_ws(&s)
}

fn replace_emojis(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match EMOJI_HINTS.get(&ch) {
            Some(hint) => out.push_str(hint),
            None => out.push(ch),
        }
    }
    out
}

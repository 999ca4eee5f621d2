// src/analyze/translate.rs
//! Translation to English: provider abstraction, in-memory cache, and the
//! fail-soft [`translate_to_english`] stage used by the pipeline.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use tracing::debug;

use crate::analyze::language::UNDETERMINED;
use crate::config::AppConfig;

pub type TranslateFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

/// Translation collaborator. Implementations may fail; the pipeline absorbs it.
pub trait Translator: Send + Sync {
    /// Translate `text` from `source_lang` (ISO 639-1) to English.
    fn translate<'a>(&'a self, text: &'a str, source_lang: &'a str) -> TranslateFuture<'a>;
    fn provider_name(&self) -> &'static str;
}

pub type DynTranslator = Arc<dyn Translator>;

/// Outcome of the translation stage. `had_error` means the original text was
/// kept because the collaborator failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub had_error: bool,
}

impl Translation {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            had_error: false,
        }
    }
}

/// Never fails: blank → `("", false)`, English/undetermined → pass-through,
/// collaborator error → `(text, true)`.
pub async fn translate_to_english(
    translator: &dyn Translator,
    text: &str,
    source_lang: &str,
) -> Translation {
    if text.trim().is_empty() {
        return Translation::ok("");
    }
    let lang = source_lang.trim().to_ascii_lowercase();
    if lang == "en" || lang == UNDETERMINED {
        return Translation::ok(text);
    }
    match translator.translate(text, &lang).await {
        Ok(out) => Translation::ok(out),
        Err(e) => {
            debug!(error = ?e, provider = translator.provider_name(), lang = %lang, "translation failed; keeping original");
            Translation {
                text: text.to_string(),
                had_error: true,
            }
        }
    }
}

/// Factory: build a translator according to config and environment.
///
/// * `TRANSLATE_TEST_MODE=mock` → [`EchoTranslator`].
/// * `translator = "disabled"` → [`DisabledTranslator`].
/// * otherwise [`GoogleTranslator`], wrapped in [`CachingTranslator`] when the
///   cache capacity is non-zero.
pub fn build_translator_from_config(cfg: &AppConfig) -> Result<DynTranslator> {
    if std::env::var("TRANSLATE_TEST_MODE")
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        return Ok(Arc::new(EchoTranslator));
    }

    match cfg.translator.as_str() {
        "disabled" => Ok(Arc::new(DisabledTranslator)),
        "google" | "" => {
            let google = GoogleTranslator::new(Duration::from_secs(cfg.translate_timeout_secs.max(1)))?;
            if cfg.translate_cache_capacity == 0 {
                Ok(Arc::new(google))
            } else {
                Ok(Arc::new(CachingTranslator::new(
                    google,
                    cfg.translate_cache_capacity,
                )))
            }
        }
        other => bail!("Unsupported translator in config: {other}"),
    }
}

// ------------------------------------------------------------
// Providers
// ------------------------------------------------------------

const GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Public Google Translate web endpoint (`client=gtx`), no key required.
pub struct GoogleTranslator {
    http: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("yt-comment-sentiment/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(timeout)
            .build()
            .context("building translator http client")?;
        Ok(Self {
            http,
            endpoint: GOOGLE_ENDPOINT.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl Translator for GoogleTranslator {
    fn translate<'a>(&'a self, text: &'a str, source_lang: &'a str) -> TranslateFuture<'a> {
        Box::pin(async move {
            let body: Value = self
                .http
                .get(&self.endpoint)
                .query(&[
                    ("client", "gtx"),
                    ("sl", source_lang),
                    ("tl", "en"),
                    ("dt", "t"),
                    ("q", text),
                ])
                .send()
                .await
                .context("sending translate request")?
                .error_for_status()?
                .json()
                .await
                .context("decoding translate response")?;
            parse_google_response(&body)
        })
    }

    fn provider_name(&self) -> &'static str {
        "google"
    }
}

/// Response shape: `[[["<translated>", "<source>", ...], ...], ...]`;
/// the translation is the concatenation of every segment's first element.
fn parse_google_response(body: &Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("unexpected translate response shape"))?;
    let out: String = segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(Value::as_str))
        .collect();
    if out.trim().is_empty() {
        bail!("empty translation");
    }
    Ok(out)
}

/// Always fails, so every non-English row is flagged `translation_error`.
pub struct DisabledTranslator;

impl Translator for DisabledTranslator {
    fn translate<'a>(&'a self, _text: &'a str, _source_lang: &'a str) -> TranslateFuture<'a> {
        Box::pin(async { Err(anyhow!("translation disabled")) })
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

/// Returns the input unchanged; used for tests and offline runs.
pub struct EchoTranslator;

impl Translator for EchoTranslator {
    fn translate<'a>(&'a self, text: &'a str, _source_lang: &'a str) -> TranslateFuture<'a> {
        let out = text.to_string();
        Box::pin(async move { Ok(out) })
    }
    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

// ------------------------------------------------------------
// Caching wrapper
// ------------------------------------------------------------

/// Bounded FIFO cache keyed by `(source_lang, text)`. Failures are not cached.
pub struct CachingTranslator<T: Translator> {
    inner: T,
    capacity: usize,
    cache: Mutex<CacheState>,
}

#[derive(Default)]
struct CacheState {
    map: HashMap<(String, String), String>,
    order: VecDeque<(String, String)>,
}

impl<T: Translator> CachingTranslator<T> {
    pub fn new(inner: T, capacity: usize) -> Self {
        Self {
            inner,
            capacity: capacity.max(1),
            cache: Mutex::new(CacheState::default()),
        }
    }

    fn lookup(&self, key: &(String, String)) -> Option<String> {
        let g = self.cache.lock().expect("translation cache poisoned");
        g.map.get(key).cloned()
    }

    fn store(&self, key: (String, String), value: String) {
        let mut g = self.cache.lock().expect("translation cache poisoned");
        if g.map.insert(key.clone(), value).is_none() {
            g.order.push_back(key);
        }
        while g.order.len() > self.capacity {
            if let Some(old) = g.order.pop_front() {
                g.map.remove(&old);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().expect("translation cache poisoned").map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Translator> Translator for CachingTranslator<T> {
    fn translate<'a>(&'a self, text: &'a str, source_lang: &'a str) -> TranslateFuture<'a> {
        Box::pin(async move {
            let key = (source_lang.to_string(), text.to_string());
            if let Some(hit) = self.lookup(&key) {
                return Ok(hit);
            }
            let fresh = self.inner.translate(text, source_lang).await?;
            self.store(key, fresh.clone());
            Ok(fresh)
        })
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}

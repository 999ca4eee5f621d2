// src/config/app.rs
//! Application configuration (TOML or JSON) with env-var resolution.
//!
//! Lookup order for [`AppConfig::load_default`]:
//! 1) `$APP_CONFIG_PATH` (must exist)
//! 2) `config/app.toml`
//! 3) `config/app.json`
//! 4) built-in defaults

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::warn;

pub const ENV_CONFIG_PATH: &str = "APP_CONFIG_PATH";
const ENV_YOUTUBE_KEY: &str = "YOUTUBE_API_KEY";

/// Inclusive `[min, max]` range for a requested comment count, plus the value
/// used when the request carries none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBounds {
    pub min: usize,
    pub max: usize,
    pub default: usize,
}

impl CountBounds {
    pub const fn new(min: usize, max: usize, default: usize) -> Self {
        Self { min, max, default }
    }

    /// Missing → `default`; anything else clamped into `[min, max]`.
    pub fn clamp(&self, requested: Option<i64>) -> usize {
        match requested {
            None => self.default.clamp(self.min, self.max),
            Some(n) if n <= 0 => self.min,
            Some(n) => usize::try_from(n)
                .unwrap_or(self.max)
                .clamp(self.min, self.max),
        }
    }

    fn sanitized(mut self) -> Self {
        if self.min > self.max {
            std::mem::swap(&mut self.min, &mut self.max);
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Literal key, or "ENV" to read `YOUTUBE_API_KEY`.
    pub youtube_api_key: String,
    /// "google" | "disabled" (case-insensitive)
    pub translator: String,
    pub translate_timeout_secs: u64,
    pub translate_concurrency: usize,
    /// 0 disables the translation cache.
    pub translate_cache_capacity: usize,
    pub fetch_timeout_secs: u64,
    pub analyze_bounds: CountBounds,
    pub csv_bounds: CountBounds,
    /// Rows returned in `/analyze` table records.
    pub table_limit: usize,
    pub wordcloud_min_words: usize,
    pub wordcloud_max_words: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            youtube_api_key: "ENV".to_string(),
            translator: "google".to_string(),
            translate_timeout_secs: 10,
            translate_concurrency: 8,
            translate_cache_capacity: 2048,
            fetch_timeout_secs: 15,
            analyze_bounds: CountBounds::new(25, 500, 100),
            csv_bounds: CountBounds::new(50, 1000, 300),
            table_limit: 100,
            wordcloud_min_words: 20,
            wordcloud_max_words: 50,
        }
    }
}

impl AppConfig {
    /// Load from an explicit path. Format is picked from the extension, with a
    /// content-based fallback.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = parse_config(&content, &ext)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(cfg.resolved())
    }

    pub fn load_default() -> Result<Self> {
        if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            return Self::load_from(&pb);
        }
        for candidate in ["config/app.toml", "config/app.json"] {
            let pb = PathBuf::from(candidate);
            if pb.exists() {
                return Self::load_from(&pb);
            }
        }
        Ok(Self::default().resolved())
    }

    /// Resolve "ENV" placeholders and sanitize numeric ranges.
    pub fn resolved(mut self) -> Self {
        if self.youtube_api_key.trim().eq_ignore_ascii_case("env") {
            self.youtube_api_key = env::var(ENV_YOUTUBE_KEY).unwrap_or_else(|_| {
                warn!("{ENV_YOUTUBE_KEY} is not set; live comment fetching is unavailable");
                String::new()
            });
        }
        self.translator = self.translator.trim().to_ascii_lowercase();
        self.translate_concurrency = self.translate_concurrency.max(1);
        self.analyze_bounds = self.analyze_bounds.sanitized();
        self.csv_bounds = self.csv_bounds.sanitized();
        self
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<AppConfig> {
    match hint_ext {
        "toml" => Ok(toml::from_str(s)?),
        "json" => Ok(serde_json::from_str(s)?),
        _ => {
            if let Ok(cfg) = serde_json::from_str(s) {
                return Ok(cfg);
            }
            toml::from_str(s).map_err(|e| anyhow!("unsupported config format: {e}"))
        }
    }
}

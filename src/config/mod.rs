// src/config/mod.rs
pub mod app;

pub use app::{AppConfig, CountBounds, ENV_CONFIG_PATH};

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; invalid values abort startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub vectorizer_path: PathBuf,
    pub classifier_path: PathBuf,
    pub max_upload_bytes: usize,
    pub preview_chars: usize,
    /// Accept classifier labels missing from the category table (shown as raw numbers).
    pub allow_unmapped_labels: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            vectorizer_path: PathBuf::from("models/tfidf.json"),
            classifier_path: PathBuf::from("models/clf.json"),
            max_upload_bytes: 10 * 1024 * 1024,
            preview_chars: 2000,
            allow_unmapped_labels: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            vectorizer_path: std::env::var("VECTORIZER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.vectorizer_path),
            classifier_path: std::env::var("CLASSIFIER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.classifier_path),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            preview_chars: parse_env("PREVIEW_CHARS", defaults.preview_chars)?,
            allow_unmapped_labels: parse_env(
                "ALLOW_UNMAPPED_LABELS",
                defaults.allow_unmapped_labels,
            )?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'"))
}

use crate::classifier::ModelBundle;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Vectorizer + classifier, loaded once at startup and never mutated.
    pub models: ModelBundle,
    pub config: Config,
}

//! Liveness and dependency status.

use std::collections::BTreeMap;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

/// State of one backing component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Answered its check.
    Up,
    /// Failed its check.
    Down,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `healthy` when every component is up, `degraded` otherwise.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Build version.
    pub version: &'static str,
    /// Per-component results, keyed by component name.
    pub components: BTreeMap<&'static str, ComponentStatus>,
}

/// GET /health - 200 when every registered check passes, 503 otherwise.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let mut components = BTreeMap::new();
    for check in state.health_checks.iter() {
        let status = match check.check().await {
            Ok(()) => ComponentStatus::Up,
            Err(error) => {
                warn!(component = check.component(), %error, "Health check failed");
                ComponentStatus::Down
            }
        };
        components.insert(check.component(), status);
    }

    let healthy = components.values().all(|s| *s == ComponentStatus::Up);
    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(HealthReport {
            status: if healthy { "healthy" } else { "degraded" },
            service: "agora",
            version: env!("CARGO_PKG_VERSION"),
            components,
        }),
    )
}

/// Creates the health route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

//! Readiness endpoint

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use database::postgres::check_health;
use serde_json::Value;

use crate::state::{AppState, Storage};

type ReadyResult = Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)>;

async fn ready(State(state): State<AppState>) -> ReadyResult {
    let mut checks: Vec<(&str, HealthCheckFuture)> = Vec::new();

    if let Storage::Postgres(db) = &state.storage {
        let database: HealthCheckFuture =
            Box::pin(async move { check_health(db).await.map_err(|e| e.to_string()) });
        checks.push(("database", database));
    }

    run_health_checks(checks).await
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/ready", get(ready)).with_state(state)
}

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{db::ConnectionStatus, state::AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseReadiness {
    pub status: ConnectionStatus,
    pub ready_state: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Readiness {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub database: DatabaseReadiness,
}

/// Liveness: always 200 while the process serves requests.
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        timestamp: Utc::now(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

/// Readiness: 200 only while the persistence layer is connected.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    let database = state.probe.status().await;

    let (code, status) = match database {
        ConnectionStatus::Connected => (StatusCode::OK, "ok"),
        ConnectionStatus::Disconnected => {
            tracing::warn!("⚠️ Readiness check failed: database disconnected");
            (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
        }
    };

    (
        code,
        Json(Readiness {
            status,
            timestamp: Utc::now(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            database: DatabaseReadiness {
                status: database,
                ready_state: database.ready_state(),
            },
        }),
    )
}

//! Health check endpoint.

use axum::{extract::State, response::IntoResponse, Json};
use bytes::Bytes;
use serde::Serialize;

use crate::api::SharedState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    pub storage: CheckStatus,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Health check endpoint - liveness plus a storage round-trip.
pub async fn health_check(State(state): State<SharedState>) -> impl IntoResponse {
    let storage_check = match storage_roundtrip(&state).await {
        Ok(()) => CheckStatus {
            status: "healthy".to_string(),
            message: None,
        },
        Err(e) => CheckStatus {
            status: "unhealthy".to_string(),
            message: Some(e),
        },
    };

    let status = if storage_check.status == "healthy" {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            storage: storage_check,
        },
    })
}

async fn storage_roundtrip(state: &SharedState) -> Result<(), String> {
    let key = ".goproxy-keeper/health-probe";
    state
        .storage
        .put(key, Bytes::from_static(b"ok"))
        .await
        .map_err(|e| format!("put failed: {}", e))?;
    let read = state
        .storage
        .get(key)
        .await
        .map_err(|e| format!("get failed: {}", e))?;
    if &read[..] != b"ok" {
        return Err("probe content mismatch".to_string());
    }
    Ok(())
}

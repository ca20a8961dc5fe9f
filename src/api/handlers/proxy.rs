//! GOPROXY protocol handler.
//!
//! Read endpoints (GET), served straight from storage:
//!   /<module>/@v/list            - version list (text/plain)
//!   /<module>/@v/v<ver>.info     - version metadata (application/json)
//!   /<module>/@v/v<ver>.mod      - go.mod (text/plain)
//!   /<module>/@v/v<ver>.zip      - module archive (application/zip)
//!   /<module>/@latest            - latest published version (application/json)
//!
//! Write endpoints:
//!   PUT  /<key>                  - store raw source bytes at <key>
//!   POST /<module>/@v/<version>  - synthesize proxy artifacts for <version>

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;

use crate::api::SharedState;
use crate::error::{AppError, Result};
use crate::goproxy::{decode_module_path, encode_module_path, GoProxyRequest};
use crate::services::latest_service;

const TEXT_PLAIN: &str = "text/plain";
const APPLICATION_JSON: &str = "application/json";
const APPLICATION_ZIP: &str = "application/zip";

// ---------------------------------------------------------------------------
// GET handler - dispatches based on parsed path
// ---------------------------------------------------------------------------

pub async fn handle_get(
    State(state): State<SharedState>,
    Path(path): Path<String>,
) -> Result<Response> {
    let Some(request) = GoProxyRequest::parse(&path) else {
        // no matching route
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    match request {
        GoProxyRequest::List { module } => {
            download(&state, &format!("{}/@v/list", module), TEXT_PLAIN).await
        }
        GoProxyRequest::Info { module, version } => {
            download(
                &state,
                &format!("{}/@v/{}.info", module, version),
                APPLICATION_JSON,
            )
            .await
        }
        GoProxyRequest::Mod { module, version } => {
            download(&state, &format!("{}/@v/{}.mod", module, version), TEXT_PLAIN).await
        }
        GoProxyRequest::Zip { module, version } => {
            let content = state
                .storage
                .get(&format!("{}/@v/{}.zip", module, version))
                .await?;
            let disposition = format!(
                "attachment; filename=\"{}@{}.zip\"",
                encode_module_path(&module),
                version
            );
            Ok((
                [
                    (CONTENT_TYPE, APPLICATION_ZIP.to_string()),
                    (CONTENT_DISPOSITION, disposition),
                ],
                content,
            )
                .into_response())
        }
        GoProxyRequest::Latest { module } => {
            match latest_service::resolve(state.storage.as_ref(), &module).await? {
                Some(content) => Ok(([(CONTENT_TYPE, APPLICATION_JSON)], content).into_response()),
                None => Ok(StatusCode::NOT_FOUND.into_response()),
            }
        }
    }
}

/// Serve the object at `key` with the route's bound content-type.
async fn download(state: &SharedState, key: &str, content_type: &'static str) -> Result<Response> {
    let content = state.storage.get(key).await?;
    Ok(([(CONTENT_TYPE, content_type)], content).into_response())
}

// ---------------------------------------------------------------------------
// PUT handler - raw source upload
// ---------------------------------------------------------------------------

/// Store raw bytes at the given key, so a publisher can push a module
/// source tree before triggering synthesis.
pub async fn handle_put(
    State(state): State<SharedState>,
    Path(path): Path<String>,
    body: Bytes,
) -> Result<Response> {
    let key = path.strip_prefix('/').unwrap_or(&path);
    validate_source_key(key)?;

    state.storage.put(key, body).await?;

    Ok((StatusCode::CREATED, "Created").into_response())
}

/// Reject keys that escape the storage root or collide with the published
/// artifact namespace (`@`-prefixed path segments are reserved).
fn validate_source_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(AppError::Validation("empty storage key".into()));
    }
    for segment in key.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(AppError::Validation(format!(
                "invalid path segment in key: {}",
                key
            )));
        }
        if segment.starts_with('@') {
            return Err(AppError::Validation(format!(
                "reserved path segment in key: {}",
                key
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// POST handler - publish trigger
// ---------------------------------------------------------------------------

/// Run the publish pipeline for `<module>/@v/<version>`.
///
/// `<version>` is the bare tag (`0.0.1`); the pipeline prepends `v` when it
/// derives the artifact keys.
pub async fn handle_post(
    State(state): State<SharedState>,
    Path(path): Path<String>,
) -> Result<Response> {
    let (module, version) =
        parse_publish_path(&path).ok_or_else(|| AppError::NotFound(format!("no publish route for: {}", path)))?;

    let summary = state.publisher.update(&module, &version).await?;

    Ok((StatusCode::CREATED, Json(summary)).into_response())
}

fn parse_publish_path(raw_path: &str) -> Option<(String, String)> {
    let path = raw_path.strip_prefix('/').unwrap_or(raw_path);
    let av_pos = path.find("/@v/")?;
    let module_encoded = &path[..av_pos];
    let version = &path[av_pos + 4..];

    if module_encoded.is_empty() || version.is_empty() || version.contains('/') {
        return None;
    }
    // GET artifact names never double as publish triggers
    if version == "list"
        || version.ends_with(".info")
        || version.ends_with(".mod")
        || version.ends_with(".zip")
    {
        return None;
    }

    Some((decode_module_path(module_encoded), version.to_string()))
}

use axum::{
    Json,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::path::Path;

#[derive(Deserialize)]
pub struct BrowseParams {
    #[serde(default)]
    path: String,
}

/// List child directories for the channel editor's folder picker.
///
/// Convenience for the UI only — carries no scheduling semantics.
pub async fn browse(Query(params): Query<BrowseParams>) -> Response {
    let current = if params.path.is_empty() {
        "/".to_string()
    } else {
        params.path
    };
    let root = Path::new(&current);

    let mut entries = match tokio::fs::read_dir(root).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Path not found" })),
            )
                .into_response();
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    let mut directories = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        if let Ok(file_type) = entry.file_type().await {
            if file_type.is_dir() {
                directories.push(json!({
                    "name": entry.file_name().to_string_lossy(),
                    "path": entry.path().to_string_lossy(),
                }));
            }
        }
    }

    // Parent of the filesystem root is the empty string.
    let parent = root
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();

    Json(json!({
        "current": current,
        "parent": parent,
        "directories": directories,
    }))
    .into_response()
}

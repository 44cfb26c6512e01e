use crate::models::Channel;
use crate::scanner;
use crate::server::state::AppState;
use axum::{Json, extract::State};
use serde_json::json;
use std::collections::HashSet;
use tracing::{info, warn};

/// The full channel registry.
pub async fn list_channels(State(state): State<AppState>) -> Json<Vec<Channel>> {
    Json(state.store.read_channels().await)
}

/// Replace the whole channel registry and kick off a background re-scan of
/// every referenced folder. Returns immediately; the library updates when
/// the scan lands.
pub async fn replace_channels(
    State(state): State<AppState>,
    Json(channels): Json<Vec<Channel>>,
) -> Json<serde_json::Value> {
    if let Err(e) = state.store.write_channels(&channels).await {
        warn!("Failed to write channels: {}", e);
        return Json(json!({ "success": false }));
    }

    spawn_scan(state, referenced_folders(&channels));
    Json(json!({ "success": true }))
}

/// Re-scan the folders of the stored channels on demand.
pub async fn trigger_scan(State(state): State<AppState>) -> Json<serde_json::Value> {
    let channels = state.store.read_channels().await;
    spawn_scan(state, referenced_folders(&channels));
    Json(json!({ "success": true }))
}

/// Union of all folders referenced by any channel, deduplicated, in first
/// appearance order.
fn referenced_folders(channels: &[Channel]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut folders = Vec::new();
    for channel in channels {
        for folder in &channel.folders {
            if seen.insert(folder.clone()) {
                folders.push(folder.clone());
            }
        }
    }
    folders
}

fn spawn_scan(state: AppState, folders: Vec<String>) {
    tokio::spawn(async move {
        info!("Re-scanning {} folder(s)", folders.len());
        scanner::full_scan(&state.config, &state.store, &folders).await;
    });
}

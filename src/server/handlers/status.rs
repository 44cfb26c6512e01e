use crate::models::Schedule;
use crate::scheduler;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Deserialize)]
pub struct StatusParams {
    channel: Option<String>,
}

/// What's on now.
///
/// With `?channel=`, one channel's schedule — `null` (still 200) when the
/// channel is unknown or has nothing playable. Without, a map over every
/// defined channel. Both documents are re-read per query, so channel and
/// library edits take effect immediately.
pub async fn get_status(
    Query(params): Query<StatusParams>,
    State(state): State<AppState>,
) -> Response {
    let channels = state.store.read_channels().await;
    let library = state.store.read_library().await;
    let now = scheduler::now_epoch_secs();

    match params.channel {
        Some(id) => {
            let schedule = scheduler::current_program(&id, &channels, &library, now);
            debug!(
                "Status for {}: {}",
                id,
                schedule
                    .as_ref()
                    .map(|s| s.episode.path.as_str())
                    .unwrap_or("nothing playing")
            );
            Json(schedule).into_response()
        }
        None => {
            let statuses: BTreeMap<String, Option<Schedule>> = channels
                .iter()
                .map(|c| {
                    (
                        c.id.clone(),
                        scheduler::current_program(&c.id, &channels, &library, now),
                    )
                })
                .collect();
            Json(statuses).into_response()
        }
    }
}

//! Directory listing and reload endpoints.

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{error, success, ApiResult};
use crate::models::TaggedPerson;
use crate::search::PersonIndex;
use crate::{AppState, IndexSnapshot};

/// The full tagged directory in index order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeopleResponse {
    pub people: Vec<TaggedPerson>,
    pub total: usize,
    pub loaded_at: DateTime<Utc>,
}

impl PeopleResponse {
    fn from_snapshot(snapshot: &IndexSnapshot) -> Self {
        Self {
            people: snapshot.index.entries().to_vec(),
            total: snapshot.index.len(),
            loaded_at: snapshot.loaded_at,
        }
    }
}

/// GET /api/people - List everyone that can be mentioned.
pub async fn list_people(State(state): State<AppState>) -> ApiResult<PeopleResponse> {
    let snapshot = state.snapshot().await;
    success(PeopleResponse::from_snapshot(&snapshot), snapshot.generation)
}

/// POST /api/people/reload - Refetch both collections and rebuild the index.
///
/// On failure the previous index keeps serving.
pub async fn reload_people(State(state): State<AppState>) -> ApiResult<PeopleResponse> {
    let current = state.snapshot().await.generation;

    match state.client.fetch_directory().await {
        Ok(directory) => {
            let snapshot = state.replace_index(PersonIndex::from_directory(directory)).await;
            tracing::info!(
                "Person index reloaded with {} entries (generation {})",
                snapshot.index.len(),
                snapshot.generation
            );
            success(PeopleResponse::from_snapshot(&snapshot), snapshot.generation)
        }
        Err(e) => error(e, current),
    }
}

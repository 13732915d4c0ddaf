//! Search API endpoints.

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::mention::MENTION_MARKER;
use crate::search::ScoredPerson;
use crate::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search query string, optionally starting with the mention marker.
    #[serde(default)]
    pub q: String,
    /// Maximum number of results (default: 20).
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

/// Ordered search hits.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<ScoredPerson>,
    pub total: usize,
}

/// Maximum number of search results allowed.
const MAX_SEARCH_LIMIT: usize = 100;

/// GET /api/search - Fuzzy search people by first or last name.
pub async fn search_people(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<SearchResponse> {
    let snapshot = state.snapshot().await;

    let limit = params.limit.min(MAX_SEARCH_LIMIT);
    let query = params.q.strip_prefix(MENTION_MARKER).unwrap_or(params.q.as_str());

    let mut results = snapshot.index.search_scored(query);
    let total = results.len();
    results.truncate(limit);

    success(SearchResponse { results, total }, snapshot.generation)
}

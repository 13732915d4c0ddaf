//! Keystroke endpoint driving the mention state machine.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::mention::{self, InputState, KeyEvent, MentionMode, TextReplacement};
use crate::models::{PersonKind, TaggedPerson};
use crate::AppState;

/// One keystroke as seen by the editor.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeystrokeRequest {
    /// State returned by the previous keystroke (idle and empty if omitted).
    #[serde(default)]
    pub state: InputState,
    /// Full editor text after the key was applied.
    #[serde(default)]
    pub text: String,
    /// `KeyboardEvent.key` of the pressed key.
    pub key: String,
}

/// A dropdown row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub display_name: String,
    #[serde(rename = "type")]
    pub kind: PersonKind,
    pub person: TaggedPerson,
}

impl From<TaggedPerson> for Suggestion {
    fn from(person: TaggedPerson) -> Self {
        Self {
            display_name: person.value.display_name(),
            kind: person.kind,
            person,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeystrokeResponse {
    pub state: InputState,
    pub mode: MentionMode,
    /// Editor text to display after this keystroke.
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<TextReplacement>,
    pub suppress_default: bool,
    pub suggestions: Vec<Suggestion>,
}

/// POST /api/keystroke - Apply one keystroke to the editor state.
pub async fn handle_keystroke(
    State(state): State<AppState>,
    Json(request): Json<KeystrokeRequest>,
) -> ApiResult<KeystrokeResponse> {
    let snapshot = state.snapshot().await;

    if request.key.is_empty() {
        return error(
            AppError::Validation("Key is required".to_string()),
            snapshot.generation,
        );
    }

    let key = KeyEvent::new(request.key);
    let outcome = mention::transition(&request.state, &key, &request.text, &snapshot.index);

    success(
        KeystrokeResponse {
            mode: outcome.state.mode(),
            text: outcome.state.raw_text.clone(),
            state: outcome.state,
            replacement: outcome.replacement,
            suppress_default: outcome.suppress_default,
            suggestions: outcome.suggestions.into_iter().map(Suggestion::from).collect(),
        },
        snapshot.generation,
    )
}

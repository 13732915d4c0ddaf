//! Mention autocomplete state machine.
//!
//! A pure function of the previous [`InputState`], the key that was pressed and the editor's
//! full text after the key was applied. Rendering and the dropdown are left to the caller.

use serde::{Deserialize, Serialize};

use crate::models::TaggedPerson;
use crate::search::PersonIndex;

/// Character that starts a mention token.
pub const MENTION_MARKER: char = '@';

/// Key that accepts the best suggestion.
pub const ACCEPT_KEY: &str = "Enter";

/// Editor contents plus the mention token currently being typed (empty when idle).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputState {
    pub raw_text: String,
    pub active_query: String,
}

impl InputState {
    pub fn mode(&self) -> MentionMode {
        if self.active_query.is_empty() {
            MentionMode::Idle
        } else {
            MentionMode::Mentioning
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionMode {
    Idle,
    Mentioning,
}

/// A key press, named the way browsers name `KeyboardEvent.key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn is_accept(&self) -> bool {
        self.key == ACCEPT_KEY
    }
}

/// The mention token was swapped for a rendered mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextReplacement {
    /// The token that was replaced, marker included.
    pub token: String,
    /// Rendered mention markup that took its place.
    pub markup: String,
    pub person: TaggedPerson,
}

/// Outcome of a single keystroke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub state: InputState,
    pub replacement: Option<TextReplacement>,
    /// Whether the key's default action (inserting a newline) must be cancelled.
    pub suppress_default: bool,
    /// Dropdown contents, best first. Always empty while idle.
    pub suggestions: Vec<TaggedPerson>,
}

/// Final whitespace-delimited token of `text`; empty when `text` is empty or ends in whitespace.
pub fn last_token(text: &str) -> &str {
    text.split(char::is_whitespace).next_back().unwrap_or("")
}

/// Markup for an accepted mention, including the trailing space.
pub fn render_mention(person: &TaggedPerson) -> String {
    format!(
        "<mention class=\"{}\">{}</mention> ",
        person.kind,
        escape_html(&person.value.display_name())
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Apply one keystroke.
///
/// Accepting with no matches stays in the mentioning state and does not suppress the key, so
/// the editor inserts its newline as usual.
pub fn transition(
    previous: &InputState,
    key: &KeyEvent,
    current_text: &str,
    index: &PersonIndex,
) -> Transition {
    let token = last_token(current_text);

    let Some(query) = token.strip_prefix(MENTION_MARKER) else {
        return Transition {
            state: InputState {
                raw_text: current_text.to_string(),
                active_query: String::new(),
            },
            replacement: None,
            suppress_default: false,
            suggestions: Vec::new(),
        };
    };

    let matches = index.search(query);

    if !key.is_accept() {
        tracing::debug!("Mention query '{}' has {} matches", token, matches.len());
        return Transition {
            state: InputState {
                raw_text: current_text.to_string(),
                active_query: token.to_string(),
            },
            replacement: None,
            suppress_default: false,
            suggestions: matches,
        };
    }

    let Some(best) = matches.into_iter().next() else {
        if previous.active_query != token {
            tracing::debug!(
                "Enter on '{}' with no matches (was '{}')",
                token,
                previous.active_query
            );
        }
        return Transition {
            state: InputState {
                raw_text: current_text.to_string(),
                active_query: token.to_string(),
            },
            replacement: None,
            suppress_default: false,
            suggestions: Vec::new(),
        };
    };

    let markup = render_mention(&best);
    let raw_text = current_text.replacen(token, &markup, 1);
    tracing::debug!("Accepted mention of {} ({})", best.value.display_name(), best.kind);

    Transition {
        state: InputState {
            raw_text,
            active_query: String::new(),
        },
        replacement: Some(TextReplacement {
            token: token.to_string(),
            markup,
            person: best,
        }),
        suppress_default: true,
        suggestions: Vec::new(),
    }
}

//! Person records and their directory tagging.

use serde::{Deserialize, Serialize};

/// A person record as stored in the `employees` and `customers` collections.
///
/// Missing fields deserialize to empty strings; records are never mutated once fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Person {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// `firstName lastName`, as shown in the dropdown and inside accepted mentions.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Which collection a person came from. Also used as the mention's CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonKind {
    Employee,
    Customer,
}

impl PersonKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PersonKind::Employee => "employee",
            PersonKind::Customer => "customer",
        }
    }
}

impl std::fmt::Display for PersonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A person labelled with the collection it was fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedPerson {
    #[serde(rename = "type")]
    pub kind: PersonKind,
    pub value: Person,
}

impl TaggedPerson {
    pub fn new(kind: PersonKind, value: Person) -> Self {
        Self { kind, value }
    }
}

//! Data models for the mention backend.
//!
//! Field names match the JSON documents stored in the search backend and consumed by the editor.

mod person;

pub use person::*;

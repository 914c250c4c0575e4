use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::Note;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NoteResponse {
    /// Note ID
    #[schema(example = 1)]
    pub id: i32,
    /// Creation date, `YYYY-MM-DD`
    #[schema(example = "2024-01-01")]
    pub created_at: String,
    /// Note content
    #[schema(example = "buy milk")]
    pub content: String,
    /// Note status tag
    #[schema(example = "open")]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    /// Note content
    pub content: String,
    /// Note status tag
    pub status: String,
    /// Creation date, `YYYY-MM-DD`; the store's current date when omitted
    #[serde(default)]
    #[schema(example = "2024-01-01")]
    pub created_at: Option<String>,
}

/// Update body. A `created_at` field may be present but is never applied.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateNoteRequest {
    /// Note content
    pub content: String,
    /// Note status tag
    pub status: String,
    /// Accepted for symmetry with creation; the stored date never changes
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeleteNoteResponse {
    #[schema(example = "Note deleted")]
    pub message: String,
    /// ID of the deleted note
    pub id: i32,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NoteFilter {
    /// Only return notes whose status equals this value
    pub status: Option<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("created_at must be a date in YYYY-MM-DD format, got '{0}'")]
pub struct InvalidDate(pub String);

impl CreateNoteRequest {
    pub fn validate(&self) -> Result<(), InvalidDate> {
        match &self.created_at {
            Some(raw) if !is_calendar_date(raw) => Err(InvalidDate(raw.clone())),
            _ => Ok(()),
        }
    }
}

impl NoteFilter {
    /// Status to filter by; an empty value means no filter.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref().filter(|status| !status.is_empty())
    }
}

impl DeleteNoteResponse {
    pub fn new(id: i32) -> Self {
        Self {
            message: "Note deleted".to_string(),
            id,
        }
    }
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            created_at: note.created_at,
            content: note.content,
            status: note.status,
        }
    }
}

fn is_calendar_date(raw: &str) -> bool {
    raw.len() == 10 && NaiveDate::parse_from_str(raw, DATE_FORMAT).is_ok()
}

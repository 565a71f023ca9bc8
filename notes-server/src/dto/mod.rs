use async_graphql::{ID, SimpleObject};
use chrono::{DateTime, Utc};

use crate::models::{FieldUpdate, Note, NoteChanges};

#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
#[graphql(name = "Note")]
pub struct NoteResponse {
    /// Note ID
    pub id: ID,
    /// Note title
    pub title: String,
    /// Note content
    pub content: String,
    /// Creation time, never changes
    pub created_at: DateTime<Utc>,
    /// Time of the last successful update
    pub updated_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: ID(note.id.to_string()),
            title: note.title,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl From<UpdateNoteRequest> for NoteChanges {
    fn from(request: UpdateNoteRequest) -> Self {
        Self {
            title: FieldUpdate::from_argument(request.title),
            content: FieldUpdate::from_argument(request.content),
        }
    }
}

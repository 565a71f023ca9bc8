//! Operation documents and their typed variables and results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Whether a `notes(search)` list would contain this note.
    pub fn matches(&self, search: &str) -> bool {
        let needle = search.to_lowercase();
        self.title.to_lowercase().contains(&needle) || self.content.to_lowercase().contains(&needle)
    }
}

/// Selection returned by `updateNote`. It carries no `createdAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedNote {
    pub id: String,
    pub title: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

pub trait Operation {
    type Variables: Serialize + Send + Sync;
    type Data: DeserializeOwned;

    const NAME: &'static str;
    const DOCUMENT: &'static str;
}

pub struct GetNotes;

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetNotesVariables {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetNotesData {
    pub notes: Vec<Note>,
}

impl Operation for GetNotes {
    type Variables = GetNotesVariables;
    type Data = GetNotesData;

    const NAME: &'static str = "GetNotes";
    const DOCUMENT: &'static str = "query GetNotes($search: String) {
  notes(search: $search) {
    id
    title
    content
    createdAt
    updatedAt
  }
}";
}

pub struct GetNote;

#[derive(Debug, Clone, Serialize)]
pub struct GetNoteVariables {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetNoteData {
    pub note: Option<Note>,
}

impl Operation for GetNote {
    type Variables = GetNoteVariables;
    type Data = GetNoteData;

    const NAME: &'static str = "GetNote";
    const DOCUMENT: &'static str = "query GetNote($id: ID!) {
  note(id: $id) {
    id
    title
    content
    createdAt
    updatedAt
  }
}";
}

pub struct CreateNote;

#[derive(Debug, Clone, Serialize)]
pub struct CreateNoteVariables {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteData {
    pub create_note: Note,
}

impl Operation for CreateNote {
    type Variables = CreateNoteVariables;
    type Data = CreateNoteData;

    const NAME: &'static str = "CreateNote";
    const DOCUMENT: &'static str = "mutation CreateNote($title: String!, $content: String!) {
  createNote(title: $title, content: $content) {
    id
    title
    content
    createdAt
    updatedAt
  }
}";
}

pub struct UpdateNote;

#[derive(Debug, Clone, Serialize)]
pub struct UpdateNoteVariables {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteData {
    pub update_note: UpdatedNote,
}

impl Operation for UpdateNote {
    type Variables = UpdateNoteVariables;
    type Data = UpdateNoteData;

    const NAME: &'static str = "UpdateNote";
    const DOCUMENT: &'static str = "mutation UpdateNote($id: ID!, $title: String, $content: String) {
  updateNote(id: $id, title: $title, content: $content) {
    id
    title
    content
    updatedAt
  }
}";
}

pub struct DeleteNote;

#[derive(Debug, Clone, Serialize)]
pub struct DeleteNoteVariables {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteNoteData {
    pub delete_note: bool,
}

impl Operation for DeleteNote {
    type Variables = DeleteNoteVariables;
    type Data = DeleteNoteData;

    const NAME: &'static str = "DeleteNote";
    const DOCUMENT: &'static str = "mutation DeleteNote($id: ID!) {
  deleteNote(id: $id)
}";
}

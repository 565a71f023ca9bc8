use chrono::{DateTime, Utc};

/// A stored note, as the repository returns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Case-insensitive substring match against title or content.
    pub fn matches(&self, search: &str) -> bool {
        let needle = search.to_lowercase();
        self.title.to_lowercase().contains(&needle) || self.content.to_lowercase().contains(&needle)
    }
}

/// Fields of a note that does not exist yet. Storage assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub content: String,
}

/// One optional field of a partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate {
    #[default]
    Keep,
    Set(String),
}

impl FieldUpdate {
    /// Maps a GraphQL argument onto an update. Absent and empty values both
    /// leave the stored field as it is.
    pub fn from_argument(value: Option<String>) -> Self {
        match value {
            Some(value) if !value.is_empty() => Self::Set(value),
            _ => Self::Keep,
        }
    }

    pub fn apply(self, field: &mut String) {
        if let Self::Set(value) = self {
            *field = value;
        }
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            Self::Keep => None,
            Self::Set(value) => Some(value),
        }
    }
}

/// A partial update of a note. `updated_at` is always refreshed, even when
/// both fields are `Keep`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteChanges {
    pub title: FieldUpdate,
    pub content: FieldUpdate,
}

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use tokio::sync::RwLock;

use super::{NoteRepository, RepositoryError};
use crate::models::{NewNote, Note, NoteChanges};

/// Process-local storage, used when no database is configured and in tests.
#[derive(Default)]
pub struct MemoryRepository {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    last_id: i64,
    notes: BTreeMap<i64, Note>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteRepository for MemoryRepository {
    async fn find_many(&self, search: Option<&str>) -> Result<Vec<Note>, RepositoryError> {
        let state = self.state.read().await;

        let mut notes: Vec<Note> = state
            .notes
            .values()
            .filter(|note| search.is_none_or(|search| note.matches(search)))
            .cloned()
            .collect();
        notes.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(notes)
    }

    async fn find_unique(&self, id: i64) -> Result<Option<Note>, RepositoryError> {
        Ok(self.state.read().await.notes.get(&id).cloned())
    }

    async fn create(&self, note: NewNote) -> Result<Note, RepositoryError> {
        let mut state = self.state.write().await;
        state.last_id += 1;

        let now = Utc::now();
        let note = Note {
            id: state.last_id,
            title: note.title,
            content: note.content,
            created_at: now,
            updated_at: now,
        };
        state.notes.insert(note.id, note.clone());

        Ok(note)
    }

    async fn update(&self, id: i64, changes: NoteChanges) -> Result<Note, RepositoryError> {
        let mut state = self.state.write().await;
        let note = state
            .notes
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound(id))?;

        changes.title.apply(&mut note.title);
        changes.content.apply(&mut note.content);
        note.updated_at = Utc::now().max(note.updated_at + TimeDelta::microseconds(1));

        Ok(note.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        self.state
            .write()
            .await
            .notes
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound(id))
    }
}

use crate::{
    dto::{CreateNoteRequest, NoteResponse, UpdateNoteRequest},
    models::NewNote,
    repository::{NoteRepository, RepositoryError},
};

use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("note {0} not found")]
    NotFound(i64),

    #[error("storage unavailable")]
    Storage(#[source] RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

#[derive(Clone)]
pub struct NoteService {
    repo: Arc<dyn NoteRepository>,
}

impl NoteService {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_note(
        &self,
        request: CreateNoteRequest,
    ) -> Result<NoteResponse, ServiceError> {
        if request.title.is_empty() {
            return Err(ServiceError::Validation("title must not be empty".to_string()));
        }

        let note = self
            .repo
            .create(NewNote {
                title: request.title,
                content: request.content,
            })
            .await?;
        tracing::debug!("created note {}", note.id);

        Ok(note.into())
    }

    pub async fn update_note(
        &self,
        id: &str,
        request: UpdateNoteRequest,
    ) -> Result<NoteResponse, ServiceError> {
        let id = parse_id(id)?;
        let note = self.repo.update(id, request.into()).await?;
        tracing::debug!("updated note {}", note.id);

        Ok(note.into())
    }

    pub async fn delete_note(&self, id: &str) -> Result<bool, ServiceError> {
        let id = parse_id(id)?;
        self.repo.delete(id).await?;
        tracing::debug!("deleted note {id}");

        Ok(true)
    }

    /// A missing note is `Ok(None)`, not an error.
    pub async fn get_one_note(&self, id: &str) -> Result<Option<NoteResponse>, ServiceError> {
        let id = parse_id(id)?;
        Ok(self.repo.find_unique(id).await?.map(Into::into))
    }

    /// An empty search term lists every note.
    pub async fn get_all_notes(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<NoteResponse>, ServiceError> {
        let search = search.filter(|s| !s.is_empty());
        let notes = self.repo.find_many(search).await?;

        Ok(notes.into_iter().map(Into::into).collect())
    }
}

fn parse_id(raw: &str) -> Result<i64, ServiceError> {
    raw.trim()
        .parse()
        .map_err(|_| ServiceError::Validation(format!("malformed note id '{raw}'")))
}

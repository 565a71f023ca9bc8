mod embedded;
mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PostgresRepository;

use async_trait::async_trait;

use crate::models::{NewNote, Note, NoteChanges};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("note {0} does not exist")]
    NotFound(i64),

    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("migration error: {0}")]
    Migration(#[from] refinery::Error),
}

/// Storage for notes. Every call touches at most one record and is applied
/// atomically by the implementation.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Notes ordered by `created_at` descending, then `id` descending. With a
    /// search term only notes whose title or content contain it
    /// (case-insensitive) are returned.
    async fn find_many(&self, search: Option<&str>) -> Result<Vec<Note>, RepositoryError>;

    async fn find_unique(&self, id: i64) -> Result<Option<Note>, RepositoryError>;

    /// Inserts a note with `created_at == updated_at`.
    async fn create(&self, note: NewNote) -> Result<Note, RepositoryError>;

    /// Applies `changes` and moves `updated_at` strictly forward.
    async fn update(&self, id: i64, changes: NoteChanges) -> Result<Note, RepositoryError>;

    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
}

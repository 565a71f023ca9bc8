use async_trait::async_trait;
use tokio_postgres::{Client, NoTls, Row};

use super::{NoteRepository, RepositoryError, embedded::migrations};
use crate::models::{NewNote, Note, NoteChanges};

pub struct PostgresRepository {
    client: Client,
}

impl PostgresRepository {
    pub async fn new(database_dsn: &str) -> Result<Self, RepositoryError> {
        let (client, con) = tokio_postgres::connect(database_dsn, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = con.await {
                tracing::error!("connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    pub async fn migrate(&mut self) -> Result<(), RepositoryError> {
        let migrations_report = migrations::runner().run_async(&mut self.client).await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }
}

fn note_from_row(row: &Row) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl NoteRepository for PostgresRepository {
    async fn find_many(&self, search: Option<&str>) -> Result<Vec<Note>, RepositoryError> {
        // strpos keeps `%` and `_` literal, unlike LIKE patterns.
        let rows = self
            .client
            .query(
                "SELECT id, title, content, created_at, updated_at FROM notes \
                 WHERE $1::text IS NULL \
                    OR strpos(lower(title), lower($1::text)) > 0 \
                    OR strpos(lower(content), lower($1::text)) > 0 \
                 ORDER BY created_at DESC, id DESC",
                &[&search],
            )
            .await?;

        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn find_unique(&self, id: i64) -> Result<Option<Note>, RepositoryError> {
        let row = self
            .client
            .query_opt(
                "SELECT id, title, content, created_at, updated_at FROM notes WHERE id = $1",
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn create(&self, note: NewNote) -> Result<Note, RepositoryError> {
        let row = self
            .client
            .query_one(
                "INSERT INTO notes (title, content, created_at, updated_at) \
                 VALUES ($1, $2, now(), now()) \
                 RETURNING id, title, content, created_at, updated_at",
                &[&note.title, &note.content],
            )
            .await?;

        Ok(note_from_row(&row))
    }

    async fn update(&self, id: i64, changes: NoteChanges) -> Result<Note, RepositoryError> {
        let title = changes.title.into_option();
        let content = changes.content.into_option();

        let row = self
            .client
            .query_opt(
                "UPDATE notes SET \
                    title = COALESCE($2, title), \
                    content = COALESCE($3, content), \
                    updated_at = GREATEST(clock_timestamp(), updated_at + INTERVAL '1 microsecond') \
                 WHERE id = $1 \
                 RETURNING id, title, content, created_at, updated_at",
                &[&id, &title, &content],
            )
            .await?;

        row.as_ref()
            .map(note_from_row)
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let rows = self
            .client
            .execute("DELETE FROM notes WHERE id = $1", &[&id])
            .await?;

        if rows == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        Ok(())
    }
}

//! Typed wrappers around each operation, together with the rule that
//! reconciles the cache once the server has answered.

use std::sync::Arc;

use serde_json::Value;

use crate::{
    cache::NoteCache,
    error::{ClientError, ErrorKind},
    operations::{
        CreateNote, CreateNoteVariables, DeleteNote, DeleteNoteVariables, GetNote,
        GetNoteVariables, GetNotes, GetNotesVariables, Note, Operation, UpdateNote,
        UpdateNoteVariables, UpdatedNote,
    },
    transport::{GraphQlError, GraphQlRequest, Transport},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchPolicy {
    /// Answer from the cache when possible, otherwise ask the server.
    #[default]
    CacheFirst,
    /// Always ask the server and refresh the cache with the answer.
    NetworkOnly,
}

#[derive(Debug)]
pub enum QueryState<T> {
    /// Nothing has been requested yet.
    Idle,
    /// The query was not sent because its input was missing.
    Skipped,
    Loading,
    Ready(T),
    /// `partial` holds whatever data came back next to the errors.
    Failed {
        error: Arc<ClientError>,
        partial: Option<T>,
    },
}

impl<T> QueryState<T> {
    fn failed(error: ClientError, partial: Option<T>) -> Self {
        Self::Failed {
            error: Arc::new(error),
            partial,
        }
    }

    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Ready(data) | Self::Failed { partial: Some(data), .. } => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ClientError> {
        match self {
            Self::Failed { error, .. } => Some(&**error),
            _ => None,
        }
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

struct Reply<D> {
    data: Option<D>,
    errors: Vec<GraphQlError>,
}

pub struct NotesClient {
    transport: Arc<dyn Transport>,
    cache: Arc<NoteCache>,
}

impl NotesClient {
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<NoteCache>) -> Self {
        Self { transport, cache }
    }

    pub const fn cache(&self) -> &Arc<NoteCache> {
        &self.cache
    }

    async fn send<O: Operation>(
        &self,
        variables: O::Variables,
    ) -> Result<Reply<O::Data>, ClientError> {
        let request = GraphQlRequest {
            query: O::DOCUMENT.to_string(),
            operation_name: O::NAME.to_string(),
            variables: serde_json::to_value(variables)?,
        };
        let response = self.transport.execute(request).await?;

        let data = match response.data {
            None | Some(Value::Null) => None,
            Some(data) => match serde_json::from_value(data) {
                Ok(data) => Some(data),
                // Partial data next to errors may not fit the full shape.
                Err(_) if !response.errors.is_empty() => None,
                Err(e) => return Err(e.into()),
            },
        };

        Ok(Reply {
            data,
            errors: response.errors,
        })
    }

    /// Sends an operation that fails on any reported error.
    async fn run<O: Operation>(&self, variables: O::Variables) -> Result<O::Data, ClientError> {
        let reply = self.send::<O>(variables).await?;

        if !reply.errors.is_empty() {
            return Err(ClientError::from_graphql(&reply.errors, reply.data.is_some()));
        }

        reply.data.ok_or_else(|| ClientError::GraphQl {
            kind: ErrorKind::Internal,
            message: format!("{} returned no data", O::NAME),
        })
    }

    /// What a `notes(search)` view shows right now, without any request.
    /// Cached notes stay visible while a refetch is in flight.
    pub fn watch_notes(&self, search: Option<&str>) -> QueryState<Vec<Note>> {
        let snapshot = self.cache.list_snapshot(search);

        match (snapshot.error, snapshot.notes) {
            (Some(error), partial) => QueryState::Failed { error, partial },
            (None, Some(notes)) => QueryState::Ready(notes),
            (None, None) if snapshot.loading => QueryState::Loading,
            (None, None) => QueryState::Idle,
        }
    }

    /// Lists notes. Errors come back together with any partial data.
    pub async fn notes(
        &self,
        search: Option<&str>,
        policy: FetchPolicy,
    ) -> QueryState<Vec<Note>> {
        if policy == FetchPolicy::CacheFirst {
            if let Some(notes) = self.cache.read_list(search) {
                return QueryState::Ready(notes);
            }
        }

        let ticket = self.cache.start_list_request(search);
        let variables = GetNotesVariables {
            search: search.map(ToString::to_string),
        };

        let (error, partial) = match self.send::<GetNotes>(variables).await {
            Ok(Reply { data: Some(data), errors }) if errors.is_empty() => {
                self.cache
                    .finish_list_request(search, ticket, Ok(&data.notes));
                // A newer response may have been written in the meantime.
                return QueryState::Ready(self.cache.read_list(search).unwrap_or(data.notes));
            }
            Ok(Reply { errors, .. }) if errors.is_empty() => (
                ClientError::GraphQl {
                    kind: ErrorKind::Internal,
                    message: "notes returned no data".to_string(),
                },
                None,
            ),
            Ok(Reply { data, errors }) => (
                ClientError::from_graphql(&errors, data.is_some()),
                data.map(|data| data.notes),
            ),
            Err(error) => (error, None),
        };

        tracing::warn!("notes query failed: {error}");
        let error = Arc::new(error);
        self.cache.finish_list_request(search, ticket, Err(&error));
        QueryState::Failed { error, partial }
    }

    /// Fetches one note. Nothing is sent for an absent or empty id.
    pub async fn note(
        &self,
        id: Option<&str>,
        policy: FetchPolicy,
    ) -> QueryState<Option<Note>> {
        let Some(id) = id.filter(|id| !id.is_empty()) else {
            return QueryState::Skipped;
        };

        if policy == FetchPolicy::CacheFirst {
            if let Some(note) = self.cache.read_note(id) {
                return QueryState::Ready(Some(note));
            }
        }

        let variables = GetNoteVariables { id: id.to_string() };
        match self.run::<GetNote>(variables).await {
            Ok(data) => {
                if let Some(note) = &data.note {
                    self.cache.write_note(note);
                }
                QueryState::Ready(data.note)
            }
            Err(error) => {
                tracing::warn!("note query failed: {error}");
                QueryState::failed(error, None)
            }
        }
    }

    /// Creates a note and shows it in every cached list that includes it.
    pub async fn create_note(&self, title: &str, content: &str) -> Result<Note, ClientError> {
        let variables = CreateNoteVariables {
            title: title.to_string(),
            content: content.to_string(),
        };

        let note = self
            .run::<CreateNote>(variables)
            .await
            .inspect_err(|e| tracing::error!("failed to create note: {e}"))?
            .create_note;
        self.cache.insert_created(&note);

        Ok(note)
    }

    /// Updates a note. The result is merged into the cached entity by id.
    pub async fn update_note(
        &self,
        id: &str,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<UpdatedNote, ClientError> {
        let variables = UpdateNoteVariables {
            id: id.to_string(),
            title: title.map(ToString::to_string),
            content: content.map(ToString::to_string),
        };

        let note = self
            .run::<UpdateNote>(variables)
            .await
            .inspect_err(|e| tracing::error!("failed to update note {id}: {e}"))?
            .update_note;
        self.cache.merge_update(&note);

        Ok(note)
    }

    /// Deletes a note and drops it from every cached list.
    pub async fn delete_note(&self, id: &str) -> Result<bool, ClientError> {
        let variables = DeleteNoteVariables { id: id.to_string() };

        let deleted = self
            .run::<DeleteNote>(variables)
            .await
            .inspect_err(|e| tracing::error!("failed to delete note {id}: {e}"))?
            .delete_note;
        if deleted {
            self.cache.remove_note(id);
        }

        Ok(deleted)
    }
}

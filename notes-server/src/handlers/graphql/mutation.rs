use async_graphql::{Context, ID, Object, Result};

use std::sync::Arc;

use super::error::field_error;
use crate::{
    dto::{CreateNoteRequest, NoteResponse, UpdateNoteRequest},
    service::NoteService,
};

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_note(
        &self,
        ctx: &Context<'_>,
        title: String,
        content: String,
    ) -> Result<NoteResponse> {
        let service = ctx.data::<Arc<NoteService>>()?;

        service
            .create_note(CreateNoteRequest { title, content })
            .await
            .map_err(|e| field_error("createNote", &e))
    }

    /// Changes the supplied fields. Empty strings count as not supplied.
    async fn update_note(
        &self,
        ctx: &Context<'_>,
        id: ID,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<NoteResponse> {
        let service = ctx.data::<Arc<NoteService>>()?;

        service
            .update_note(&id, UpdateNoteRequest { title, content })
            .await
            .map_err(|e| field_error("updateNote", &e))
    }

    /// Fails for unknown ids, so deleting twice is an error.
    async fn delete_note(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let service = ctx.data::<Arc<NoteService>>()?;

        service
            .delete_note(&id)
            .await
            .map_err(|e| field_error("deleteNote", &e))
    }
}

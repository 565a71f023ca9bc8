use async_graphql::{Context, ID, Object, Result};

use std::sync::Arc;

use super::error::field_error;
use crate::{dto::NoteResponse, service::NoteService};

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// All notes, newest first. With `search`, only notes whose title or
    /// content contain it, ignoring case.
    async fn notes(
        &self,
        ctx: &Context<'_>,
        search: Option<String>,
    ) -> Result<Vec<NoteResponse>> {
        let service = ctx.data::<Arc<NoteService>>()?;

        service
            .get_all_notes(search.as_deref())
            .await
            .map_err(|e| field_error("notes", &e))
    }

    /// The note with the given id, or `null` if there is none.
    async fn note(&self, ctx: &Context<'_>, id: ID) -> Result<Option<NoteResponse>> {
        let service = ctx.data::<Arc<NoteService>>()?;

        service
            .get_one_note(&id)
            .await
            .map_err(|e| field_error("note", &e))
    }
}

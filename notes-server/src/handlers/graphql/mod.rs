//! GraphQL schema and its HTTP handlers.
//!
//! ```graphql
//! query { notes(search: "graphql") { id title content createdAt updatedAt } }
//! query { note(id: "1") { id title } }
//! mutation { createNote(title: "Title", content: "Body") { id createdAt } }
//! mutation { updateNote(id: "1", content: "New body") { id title content updatedAt } }
//! mutation { deleteNote(id: "1") }
//! ```

mod error;
mod mutation;
mod query;

pub use error::{INTERNAL_SERVER_ERROR, NOT_FOUND, VALIDATION_ERROR};
pub use mutation::MutationRoot;
pub use query::QueryRoot;

use async_graphql::{EmptySubscription, Schema, http::GraphiQLSource};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    response::{Html, IntoResponse},
};
use axum_macros::debug_handler;

use std::sync::Arc;

use crate::service::NoteService;

pub type NotesSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(service: Arc<NoteService>) -> NotesSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(service)
        .finish()
}

#[debug_handler]
pub async fn graphql_handler(
    State(schema): State<NotesSchema>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(request.into_inner()).await.into()
}

/// Interactive explorer for manual testing.
pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

pub async fn sdl(State(schema): State<NotesSchema>) -> String {
    schema.sdl()
}

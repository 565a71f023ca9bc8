pub mod graphql;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use graphql::NotesSchema;

pub fn router(schema: NotesSchema, graphiql: bool) -> Router {
    let mut endpoint = post(graphql::graphql_handler);
    if graphiql {
        endpoint = endpoint.get(graphql::graphiql);
    }

    Router::new()
        .route("/", get(root))
        .route("/graphql", endpoint)
        .route("/graphql/sdl", get(graphql::sdl))
        .with_state(schema)
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Response {
    (StatusCode::OK, "Hello world!").into_response()
}

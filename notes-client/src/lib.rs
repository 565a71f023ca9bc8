//! Client for the notes GraphQL API.
//!
//! [`NotesClient`] wraps every operation in a typed call and keeps a shared
//! [`NoteCache`] consistent with the server after each mutation, so list and
//! detail views see creates, updates and deletes without refetching.

pub mod cache;
pub mod error;
pub mod hooks;
pub mod operations;
pub mod transport;

pub use cache::NoteCache;
pub use error::{ClientError, ErrorKind};
pub use hooks::{FetchPolicy, NotesClient, QueryState};
pub use operations::{Note, UpdatedNote};
pub use transport::{HttpTransport, Transport};

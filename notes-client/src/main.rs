use std::{sync::Arc, time::Duration};

use graphql_notes_client::{FetchPolicy, HttpTransport, Note, NoteCache, NotesClient, QueryState};
use serde_json::to_string_pretty;
use tracing_subscriber::EnvFilter;

fn print_list(
    label: &str,
    state: &QueryState<Vec<Note>>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(error) = state.error() {
        println!("!! Could not load notes: {error}");
        if error.is_transport() {
            println!("!! The notes service may be unreachable, is the server running?");
        }
    }
    if let Some(notes) = state.data() {
        println!("{label}: {}\n", to_string_pretty(notes)?);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let endpoint = std::env::var("NOTES_GRAPHQL_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:8000/graphql".to_string());

    let transport = HttpTransport::new(endpoint.clone(), Duration::from_secs(10))?;
    let cache = Arc::new(NoteCache::new());
    let client = NotesClient::new(Arc::new(transport), cache);
    println!("Using GraphQL endpoint {}\n", endpoint);

    // Initial list
    println!("1. Loading all notes...");
    let state = client.notes(None, FetchPolicy::NetworkOnly).await;
    print_list("Notes", &state)?;
    if state.error().is_some() {
        return Ok(());
    }

    // Create two notes
    println!("2. Creating two notes...");
    let first = client.create_note("Title1", "Body1").await?;
    let second = client.create_note("Title2", "Body2").await?;
    println!("Created notes {} and {}\n", first.id, second.id);

    // Served from the cache, the creates are already in it
    println!("3. Listing notes from the cache...");
    print_list("Notes", &client.watch_notes(None))?;

    // Update the first note
    println!("4. Updating the first note...");
    let updated = client
        .update_note(&first.id, None, Some("Body1-updated"))
        .await?;
    println!("Updated note: {}\n", to_string_pretty(&updated)?);

    // Get one note
    println!("5. Getting the first note...");
    if let Some(note) = client.note(Some(&first.id), FetchPolicy::CacheFirst).await.data() {
        println!("Note: {}\n", to_string_pretty(note)?);
    }

    // Search
    println!("6. Searching for 'updated'...");
    print_list(
        "Matches",
        &client.notes(Some("updated"), FetchPolicy::CacheFirst).await,
    )?;

    // Delete the second note
    println!("7. Deleting the second note...");
    let deleted = client.delete_note(&second.id).await?;
    println!("Delete result: {}\n", deleted);

    print_list("Notes", &client.watch_notes(None))?;

    Ok(())
}

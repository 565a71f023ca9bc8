use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use graphql_notes_client::{
    ClientError, ErrorKind, FetchPolicy, NoteCache, NotesClient, QueryState,
    transport::{GraphQlRequest, GraphQlResponse, Transport},
};
use reqwest::StatusCode;
use serde_json::{Value, json};

struct Scripted {
    delay: Duration,
    reply: Result<Value, StatusCode>,
}

/// Answers requests in order from a script and records what was sent.
#[derive(Default)]
struct MockTransport {
    script: Mutex<VecDeque<Scripted>>,
    sent: Mutex<Vec<GraphQlRequest>>,
}

impl MockTransport {
    fn reply(&self, body: Value) -> &Self {
        self.reply_after(Duration::ZERO, body)
    }

    fn reply_after(&self, delay: Duration, body: Value) -> &Self {
        self.script.lock().unwrap().push_back(Scripted {
            delay,
            reply: Ok(body),
        });
        self
    }

    fn fail(&self, status: StatusCode) -> &Self {
        self.script.lock().unwrap().push_back(Scripted {
            delay: Duration::ZERO,
            reply: Err(status),
        });
        self
    }

    fn sent(&self) -> Vec<GraphQlRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: GraphQlRequest) -> Result<GraphQlResponse, ClientError> {
        self.sent.lock().unwrap().push(request);
        let scripted = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected request");

        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }

        match scripted.reply {
            Ok(body) => Ok(serde_json::from_value(body)?),
            Err(status) => Err(ClientError::Status(status)),
        }
    }
}

fn setup() -> (Arc<MockTransport>, NotesClient) {
    let transport = Arc::new(MockTransport::default());
    let client = NotesClient::new(transport.clone(), Arc::new(NoteCache::new()));
    (transport, client)
}

fn note(id: &str, title: &str, content: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "content": content,
        "createdAt": "2024-05-01T10:00:00Z",
        "updatedAt": "2024-05-01T10:00:00Z",
    })
}

fn ids(state: &QueryState<Vec<graphql_notes_client::Note>>) -> Vec<String> {
    state
        .data()
        .unwrap()
        .iter()
        .map(|note| note.id.clone())
        .collect()
}

#[tokio::test]
async fn list_is_served_from_cache_after_first_fetch() {
    let (transport, client) = setup();
    transport.reply(json!({ "data": { "notes": [note("1", "a", "")] } }));

    assert!(matches!(client.watch_notes(None), QueryState::Idle));
    let first = client.notes(None, FetchPolicy::CacheFirst).await;
    let second = client.notes(None, FetchPolicy::CacheFirst).await;

    assert_eq!(ids(&first), vec!["1"]);
    assert_eq!(ids(&second), vec!["1"]);
    assert_eq!(transport.sent().len(), 1);
    assert_eq!(transport.sent()[0].operation_name, "GetNotes");
}

#[tokio::test]
async fn each_search_value_has_its_own_entry() {
    let (transport, client) = setup();
    transport
        .reply(json!({ "data": { "notes": [note("1", "a", ""), note("2", "b", "")] } }))
        .reply(json!({ "data": { "notes": [note("2", "b", "")] } }));

    client.notes(None, FetchPolicy::CacheFirst).await;
    let filtered = client.notes(Some("b"), FetchPolicy::CacheFirst).await;

    assert_eq!(ids(&filtered), vec!["2"]);
    assert_eq!(transport.sent()[1].variables, json!({ "search": "b" }));
}

#[tokio::test]
async fn empty_id_skips_the_request() {
    let (transport, client) = setup();

    assert!(matches!(
        client.note(None, FetchPolicy::NetworkOnly).await,
        QueryState::Skipped
    ));
    assert!(matches!(
        client.note(Some(""), FetchPolicy::NetworkOnly).await,
        QueryState::Skipped
    ));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn missing_note_is_ready_with_none() {
    let (transport, client) = setup();
    transport.reply(json!({ "data": { "note": null } }));

    let state = client.note(Some("5"), FetchPolicy::CacheFirst).await;
    assert!(matches!(state, QueryState::Ready(None)));
}

#[tokio::test]
async fn created_note_appears_in_cached_lists_without_refetch() {
    let (transport, client) = setup();
    transport
        .reply(json!({ "data": { "notes": [note("1", "Old", "")] } }))
        .reply(json!({ "data": { "notes": [] } }))
        .reply(json!({ "data": { "createNote": note("2", "GraphQL", "body") } }));

    client.notes(None, FetchPolicy::CacheFirst).await;
    client.notes(Some("graphql"), FetchPolicy::CacheFirst).await;
    client.create_note("GraphQL", "body").await.unwrap();

    assert_eq!(ids(&client.watch_notes(None)), vec!["2", "1"]);
    assert_eq!(ids(&client.watch_notes(Some("graphql"))), vec!["2"]);
    assert_eq!(transport.sent().len(), 3);
}

#[tokio::test]
async fn update_is_visible_wherever_the_note_is_shown() {
    let (transport, client) = setup();
    transport
        .reply(json!({ "data": { "notes": [note("1", "Title", "Body")] } }))
        .reply(json!({ "data": { "updateNote": {
            "id": "1",
            "title": "Title",
            "content": "Body-updated",
            "updatedAt": "2024-05-01T11:00:00Z",
        } } }));

    client.notes(None, FetchPolicy::CacheFirst).await;
    client
        .update_note("1", None, Some("Body-updated"))
        .await
        .unwrap();

    let request = &transport.sent()[1];
    assert!(!request.query.contains("createdAt"));
    assert_eq!(request.variables, json!({ "id": "1", "content": "Body-updated" }));

    let listed = client.watch_notes(None);
    let shown = &listed.data().unwrap()[0];
    assert_eq!(shown.content, "Body-updated");
    assert_eq!(shown.created_at.to_rfc3339(), "2024-05-01T10:00:00+00:00");

    let detail = client.note(Some("1"), FetchPolicy::CacheFirst).await;
    assert_eq!(detail.data().unwrap().as_ref().unwrap().content, "Body-updated");
    assert_eq!(transport.sent().len(), 2);
}

#[tokio::test]
async fn deleted_note_leaves_every_cached_list() {
    let (transport, client) = setup();
    transport
        .reply(json!({ "data": { "notes": [note("2", "b", ""), note("1", "a", "")] } }))
        .reply(json!({ "data": { "notes": [note("2", "b", "")] } }))
        .reply(json!({ "data": { "deleteNote": true } }));

    client.notes(None, FetchPolicy::CacheFirst).await;
    client.notes(Some("b"), FetchPolicy::CacheFirst).await;
    assert!(client.delete_note("2").await.unwrap());

    assert_eq!(ids(&client.watch_notes(None)), vec!["1"]);
    assert!(client.watch_notes(Some("b")).data().unwrap().is_empty());
}

#[tokio::test]
async fn failed_mutation_leaves_cache_untouched() {
    let (transport, client) = setup();
    transport
        .reply(json!({ "data": { "notes": [note("1", "a", "")] } }))
        .reply(json!({
            "data": null,
            "errors": [{ "message": "note 1 not found", "extensions": { "code": "NOT_FOUND" } }],
        }));

    client.notes(None, FetchPolicy::CacheFirst).await;
    let err = client.delete_note("1").await.unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    assert_eq!(ids(&client.watch_notes(None)), vec!["1"]);
}

#[tokio::test]
async fn rejected_request_is_a_validation_error() {
    let (transport, client) = setup();
    transport.reply(json!({
        "data": null,
        "errors": [{ "message": "argument \"title\" is required" }],
    }));

    let err = client.create_note("", "").await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Validation));
}

#[tokio::test]
async fn list_failure_keeps_partial_data() {
    let (transport, client) = setup();
    transport.reply(json!({
        "data": { "notes": [note("1", "a", "")] },
        "errors": [{ "message": "storage unavailable", "extensions": { "code": "INTERNAL_SERVER_ERROR" } }],
    }));

    let state = client.notes(None, FetchPolicy::NetworkOnly).await;

    assert_eq!(state.error().unwrap().kind(), Some(ErrorKind::Internal));
    assert_eq!(ids(&state), vec!["1"]);

    // Partial data is not cached, the watched list only reports the failure.
    let watched = client.watch_notes(None);
    assert_eq!(watched.error().unwrap().kind(), Some(ErrorKind::Internal));
    assert!(watched.data().is_none());
    assert!(!watched.is_loading());
}

#[tokio::test]
async fn unreachable_service_surfaces_as_transport_error() {
    let (transport, client) = setup();
    transport.fail(StatusCode::BAD_GATEWAY);

    let state = client.notes(None, FetchPolicy::NetworkOnly).await;

    assert!(state.error().unwrap().is_transport());
    assert!(state.data().is_none());

    let watched = client.watch_notes(None);
    assert!(watched.error().unwrap().is_transport());
    assert!(!watched.is_loading());
    assert!(!client.cache().is_loading(None));
}

#[tokio::test]
async fn watched_list_is_loading_only_while_a_request_is_in_flight() {
    let (transport, client) = setup();
    transport.reply_after(
        Duration::from_millis(50),
        json!({ "data": { "notes": [note("1", "a", "")] } }),
    );

    let (fetched, during) = tokio::join!(client.notes(None, FetchPolicy::NetworkOnly), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        client.watch_notes(None)
    });

    assert!(during.is_loading());
    assert_eq!(ids(&fetched), vec!["1"]);
    assert_eq!(ids(&client.watch_notes(None)), vec!["1"]);
}

#[tokio::test]
async fn successful_refetch_clears_a_failure() {
    let (transport, client) = setup();
    transport
        .fail(StatusCode::BAD_GATEWAY)
        .reply(json!({ "data": { "notes": [note("1", "a", "")] } }));

    client.notes(None, FetchPolicy::NetworkOnly).await;
    assert!(client.watch_notes(None).error().is_some());

    client.notes(None, FetchPolicy::NetworkOnly).await;
    let watched = client.watch_notes(None);
    assert!(watched.error().is_none());
    assert_eq!(ids(&watched), vec!["1"]);
}

#[tokio::test]
async fn list_response_sent_before_a_delete_does_not_bring_the_note_back() {
    let (transport, client) = setup();
    transport
        .reply(json!({ "data": { "notes": [note("2", "b", ""), note("1", "a", "")] } }))
        .reply_after(
            Duration::from_millis(50),
            json!({ "data": { "notes": [note("2", "b", ""), note("1", "a", "")] } }),
        )
        .reply(json!({ "data": { "deleteNote": true } }));

    client.notes(None, FetchPolicy::CacheFirst).await;
    let (listed, deleted) = tokio::join!(
        client.notes(None, FetchPolicy::NetworkOnly),
        client.delete_note("2"),
    );

    assert!(deleted.unwrap());
    assert_eq!(ids(&listed), vec!["1"]);
    assert_eq!(ids(&client.watch_notes(None)), vec!["1"]);
    assert!(client.cache().read_note("2").is_none());
}

#[tokio::test]
async fn list_response_sent_before_a_create_keeps_the_new_note() {
    let (transport, client) = setup();
    transport
        .reply(json!({ "data": { "notes": [note("1", "a", "")] } }))
        .reply_after(
            Duration::from_millis(50),
            json!({ "data": { "notes": [note("1", "a", "")] } }),
        )
        .reply(json!({ "data": { "createNote": note("2", "b", "") } }));

    client.notes(None, FetchPolicy::CacheFirst).await;
    let (listed, created) = tokio::join!(
        client.notes(None, FetchPolicy::NetworkOnly),
        client.create_note("b", ""),
    );

    assert_eq!(created.unwrap().id, "2");
    assert_eq!(ids(&listed), vec!["2", "1"]);
    assert_eq!(ids(&client.watch_notes(None)), vec!["2", "1"]);
}

#[tokio::test]
async fn late_response_does_not_overwrite_newer_list() {
    let (transport, client) = setup();
    transport
        .reply_after(
            Duration::from_millis(50),
            json!({ "data": { "notes": [note("1", "old", "")] } }),
        )
        .reply(json!({ "data": { "notes": [note("2", "new", ""), note("1", "old", "")] } }));

    let (slow, fast) = tokio::join!(
        client.notes(None, FetchPolicy::NetworkOnly),
        client.notes(None, FetchPolicy::NetworkOnly),
    );

    assert_eq!(ids(&fast), vec!["2", "1"]);
    assert_eq!(ids(&slow), vec!["2", "1"]);
    assert_eq!(ids(&client.watch_notes(None)), vec!["2", "1"]);
}

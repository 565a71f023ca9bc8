//! Normalized client-side cache.
//!
//! Notes are stored once, keyed by `Note:<id>`. List results only hold id
//! references, keyed by the `search` argument they were fetched with (the
//! empty key is the unfiltered list). Updating an entity is therefore visible
//! through every list that references it.
//!
//! Every list request and every applied mutation takes a ticket from one
//! counter. A list response is dropped when a later request for the same list
//! has already been written, and mutations applied after a request was issued
//! are replayed onto its response before it is stored.

use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::{DateTime, Utc};

use crate::{
    error::ClientError,
    operations::{Note, UpdatedNote},
};

/// Issue order of a list request or mutation.
pub type Ticket = u64;

#[derive(Debug, Clone)]
struct CachedNote {
    id: String,
    title: String,
    content: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

impl CachedNote {
    // A note only known from an update result lacks `created_at` and does not
    // satisfy reads.
    fn to_note(&self) -> Option<Note> {
        Some(Note {
            id: self.id.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
            created_at: self.created_at?,
            updated_at: self.updated_at,
        })
    }
}

impl From<&Note> for CachedNote {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            title: note.title.clone(),
            content: note.content.clone(),
            created_at: Some(note.created_at),
            updated_at: note.updated_at,
        }
    }
}

#[derive(Debug, Default)]
struct CachedList {
    ids: Option<Vec<String>>,
    written: Ticket,
    in_flight: usize,
    failed: Option<(Ticket, Arc<ClientError>)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug)]
struct Mutation {
    ticket: Ticket,
    id: String,
    change: Change,
}

#[derive(Debug, Default)]
struct State {
    entities: HashMap<String, CachedNote>,
    lists: HashMap<String, CachedList>,
    last_ticket: Ticket,
    // Tickets of list requests still waiting for a response.
    pending: BTreeSet<Ticket>,
    // Mutations applied while a list request was pending, oldest first.
    mutations: Vec<Mutation>,
}

impl State {
    fn next_ticket(&mut self) -> Ticket {
        self.last_ticket += 1;
        self.last_ticket
    }

    fn write_entity(&mut self, note: &Note) {
        self.entities.insert(entity_key(&note.id), note.into());
    }

    fn resolve(&self, id: &str) -> Option<Note> {
        self.entities.get(&entity_key(id))?.to_note()
    }

    fn record(&mut self, id: &str, change: Change) {
        if self.pending.is_empty() {
            return;
        }
        let ticket = self.next_ticket();
        self.mutations.push(Mutation {
            ticket,
            id: id.to_string(),
            change,
        });
    }

    /// The last change to `id` applied after `ticket` was issued.
    fn changed_since(&self, ticket: Ticket, id: &str) -> Option<Change> {
        self.mutations
            .iter()
            .rev()
            .take_while(|mutation| mutation.ticket > ticket)
            .find(|mutation| mutation.id == id)
            .map(|mutation| mutation.change)
    }

    fn prune_mutations(&mut self) {
        match self.pending.first().copied() {
            Some(oldest) => self.mutations.retain(|mutation| mutation.ticket > oldest),
            None => self.mutations.clear(),
        }
    }

    /// Writes a list response issued at `ticket`, replaying the mutations
    /// applied since then.
    fn store_list(&mut self, key: &str, ticket: Ticket, notes: &[Note]) {
        let mut ids = Vec::with_capacity(notes.len());
        for note in notes {
            match self.changed_since(ticket, &note.id) {
                Some(Change::Deleted) => continue,
                // The mutation result is newer than this response.
                Some(Change::Updated | Change::Created) => {}
                None => self.write_entity(note),
            }
            ids.push(note.id.clone());
        }

        let created: Vec<String> = self
            .mutations
            .iter()
            .filter(|mutation| mutation.ticket > ticket && mutation.change == Change::Created)
            .map(|mutation| mutation.id.clone())
            .collect();
        for id in created {
            if ids.contains(&id) || self.changed_since(ticket, &id) == Some(Change::Deleted) {
                continue;
            }
            let included = self
                .resolve(&id)
                .is_some_and(|note| key.is_empty() || note.matches(key));
            if included {
                ids.insert(0, id);
            }
        }

        let list = self.lists.entry(key.to_string()).or_default();
        list.written = ticket;
        list.ids = Some(ids);
        if list.failed.as_ref().is_some_and(|(failed, _)| *failed < ticket) {
            list.failed = None;
        }
    }
}

fn entity_key(id: &str) -> String {
    format!("Note:{id}")
}

/// Cache key of a `notes(search)` list. No search and an empty search are the
/// same list.
pub fn list_key(search: Option<&str>) -> String {
    search.unwrap_or_default().to_string()
}

/// What the cache knows about one `notes(search)` list.
#[derive(Debug, Default)]
pub struct ListSnapshot {
    /// `None` if the list was never fetched or references a note that is not
    /// fully cached.
    pub notes: Option<Vec<Note>>,
    pub loading: bool,
    /// Failure of the latest request, unless a later one succeeded.
    pub error: Option<Arc<ClientError>>,
}

#[derive(Debug, Default)]
pub struct NoteCache {
    state: RwLock<State>,
}

impl NoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers an outgoing list request and returns its ticket.
    pub fn start_list_request(&self, search: Option<&str>) -> Ticket {
        let mut state = self.write();
        let ticket = state.next_ticket();
        state.pending.insert(ticket);
        state.lists.entry(list_key(search)).or_default().in_flight += 1;
        ticket
    }

    /// Completes a list request with its notes or its failure. Returns whether
    /// the notes were written.
    pub fn finish_list_request(
        &self,
        search: Option<&str>,
        ticket: Ticket,
        outcome: Result<&[Note], &Arc<ClientError>>,
    ) -> bool {
        let key = list_key(search);
        let mut state = self.write();
        let state = &mut *state;
        state.pending.remove(&ticket);

        let list = state.lists.entry(key.clone()).or_default();
        list.in_flight = list.in_flight.saturating_sub(1);
        let stale = ticket < list.written;

        let written = match outcome {
            Err(error) => {
                let newer_failure = list
                    .failed
                    .as_ref()
                    .is_some_and(|(failed, _)| *failed > ticket);
                if !stale && !newer_failure {
                    list.failed = Some((ticket, Arc::clone(error)));
                }
                false
            }
            Ok(_) if stale => {
                tracing::debug!("dropping stale response for list '{key}'");
                false
            }
            Ok(notes) => {
                state.store_list(&key, ticket, notes);
                true
            }
        };

        state.prune_mutations();
        written
    }

    pub fn is_loading(&self, search: Option<&str>) -> bool {
        self.read()
            .lists
            .get(&list_key(search))
            .is_some_and(|list| list.in_flight > 0)
    }

    /// The cached list, or `None` if it was never fetched or references a
    /// note that is not fully cached.
    pub fn read_list(&self, search: Option<&str>) -> Option<Vec<Note>> {
        let state = self.read();
        let ids = state.lists.get(&list_key(search))?.ids.as_ref()?;
        ids.iter().map(|id| state.resolve(id)).collect()
    }

    pub fn list_snapshot(&self, search: Option<&str>) -> ListSnapshot {
        let state = self.read();
        let Some(list) = state.lists.get(&list_key(search)) else {
            return ListSnapshot::default();
        };

        ListSnapshot {
            notes: list
                .ids
                .as_ref()
                .and_then(|ids| ids.iter().map(|id| state.resolve(id)).collect()),
            loading: list.in_flight > 0,
            error: list.failed.as_ref().map(|(_, error)| Arc::clone(error)),
        }
    }

    pub fn read_note(&self, id: &str) -> Option<Note> {
        self.read().resolve(id)
    }

    pub fn write_note(&self, note: &Note) {
        self.write().write_entity(note);
    }

    /// Merges an `updateNote` result into the stored entity, keeping its
    /// `created_at`.
    pub fn merge_update(&self, update: &UpdatedNote) {
        let mut state = self.write();
        state.record(&update.id, Change::Updated);
        let entity = state
            .entities
            .entry(entity_key(&update.id))
            .or_insert_with(|| CachedNote {
                id: update.id.clone(),
                title: String::new(),
                content: String::new(),
                created_at: None,
                updated_at: update.updated_at,
            });

        entity.title.clone_from(&update.title);
        entity.content.clone_from(&update.content);
        entity.updated_at = update.updated_at;
    }

    /// Stores a created note and prepends it to every loaded list that would
    /// include it.
    pub fn insert_created(&self, note: &Note) {
        let mut state = self.write();
        state.record(&note.id, Change::Created);
        state.write_entity(note);

        for (key, list) in &mut state.lists {
            let Some(ids) = list.ids.as_mut() else {
                continue;
            };
            if (key.is_empty() || note.matches(key)) && !ids.contains(&note.id) {
                ids.insert(0, note.id.clone());
            }
        }
    }

    /// Drops a note from every list and evicts the entity.
    pub fn remove_note(&self, id: &str) {
        let mut state = self.write();
        state.record(id, Change::Deleted);
        state.entities.remove(&entity_key(id));

        for list in state.lists.values_mut() {
            if let Some(ids) = list.ids.as_mut() {
                ids.retain(|cached| cached != id);
            }
        }
    }

    pub fn clear(&self) {
        let mut state = self.write();
        state.entities.clear();
        state.lists.clear();
        state.mutations.clear();
    }
}

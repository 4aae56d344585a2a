use serde::Serialize;
use tokio::sync::watch;

use crate::catalog::EntityLoadStatus;
use crate::model::{normalize_for_search, SearchFilter, SearchResult};
use crate::sequence::SearchTicket;

pub const DEFAULT_RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentSearches {
    entries: Vec<String>,
    #[serde(skip)]
    limit: usize,
}

impl Default for RecentSearches {
    fn default() -> Self {
        Self::with_limit(DEFAULT_RECENT_LIMIT)
    }
}

impl RecentSearches {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::with_capacity(limit),
            limit: limit.max(1),
        }
    }

    pub fn push(&mut self, query: &str) {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return;
        }
        self.entries.retain(|existing| existing != trimmed);
        self.entries.insert(0, trimmed.to_string());
        self.entries.truncate(self.limit);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteStatus {
    Closed,
    Idle,
    Searching,
    NoMatches,
    Results(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchState {
    pub is_open: bool,
    pub query: String,
    pub filters: SearchFilter,
    pub results: Vec<SearchResult>,
    pub results_generation: u64,
    pub recent_searches: RecentSearches,
    pub is_searching_local: bool,
    pub is_searching_server: bool,
    pub entity_load_status: EntityLoadStatus,
    pub error: Option<String>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::with_recent_limit(DEFAULT_RECENT_LIMIT)
    }
}

impl SearchState {
    pub fn with_recent_limit(limit: usize) -> Self {
        Self {
            is_open: false,
            query: String::new(),
            filters: SearchFilter::default(),
            results: Vec::new(),
            results_generation: 0,
            recent_searches: RecentSearches::with_limit(limit),
            is_searching_local: false,
            is_searching_server: false,
            entity_load_status: EntityLoadStatus::default(),
            error: None,
        }
    }

    pub fn is_searching(&self) -> bool {
        self.is_searching_local || self.is_searching_server
    }

    pub fn status(&self) -> PaletteStatus {
        if !self.is_open {
            return PaletteStatus::Closed;
        }
        if self.is_searching() {
            return PaletteStatus::Searching;
        }
        if !self.results.is_empty() {
            return PaletteStatus::Results(self.results.len());
        }
        if normalize_for_search(&self.query).is_empty() {
            PaletteStatus::Idle
        } else {
            PaletteStatus::NoMatches
        }
    }
}

#[derive(Debug)]
pub struct SearchStore {
    sender: watch::Sender<SearchState>,
}

impl Default for SearchStore {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_LIMIT)
    }
}

impl SearchStore {
    pub fn new(recent_limit: usize) -> Self {
        let (sender, _) = watch::channel(SearchState::with_recent_limit(recent_limit));
        Self { sender }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.sender.subscribe()
    }

    pub fn snapshot(&self) -> SearchState {
        self.sender.borrow().clone()
    }

    pub fn open(&self) {
        self.sender.send_modify(|state| state.is_open = true);
    }

    pub fn close(&self) {
        self.sender.send_modify(|state| {
            state.is_open = false;
            state.query.clear();
            state.results.clear();
            state.results_generation += 1;
            state.is_searching_local = false;
            state.is_searching_server = false;
            state.error = None;
        });
    }

    pub fn set_query(&self, query: &str) {
        self.sender.send_modify(|state| state.query = query.to_string());
    }

    pub fn set_filters(&self, filters: SearchFilter) {
        self.sender.send_modify(|state| state.filters = filters);
    }

    pub fn set_load_status(&self, status: EntityLoadStatus) {
        self.sender
            .send_modify(|state| state.entity_load_status = status);
    }

    pub fn clear_results(&self) {
        self.sender.send_modify(|state| {
            state.results.clear();
            state.results_generation += 1;
            state.is_searching_local = false;
            state.is_searching_server = false;
            state.error = None;
        });
    }

    /// Starts a search for `ticket`: records the query and raises the local
    /// flag. Does nothing once the ticket is superseded.
    pub fn begin_search(
        &self,
        ticket: &SearchTicket,
        query: &str,
        filters: Option<&SearchFilter>,
        local: bool,
    ) -> bool {
        self.update_for(ticket, |state| {
            state.query = query.to_string();
            state.recent_searches.push(query);
            state.filters = filters.cloned().unwrap_or_default();
            state.is_searching_local = local;
            state.error = None;
        })
    }

    pub fn set_searching_local_for(&self, ticket: &SearchTicket, searching: bool) -> bool {
        self.update_for(ticket, |state| state.is_searching_local = searching)
    }

    pub fn set_searching_server_for(&self, ticket: &SearchTicket, searching: bool) -> bool {
        self.update_for(ticket, |state| state.is_searching_server = searching)
    }

    pub fn stop_searching(&self) {
        self.sender.send_modify(|state| {
            state.is_searching_local = false;
            state.is_searching_server = false;
        });
    }

    // The ticket is checked under the channel's write lock, so a cancel that
    // lands between check and write cannot be overwritten.
    fn update_for(&self, ticket: &SearchTicket, apply: impl FnOnce(&mut SearchState)) -> bool {
        self.sender.send_if_modified(|state| {
            if !ticket.is_current() {
                return false;
            }
            apply(state);
            true
        })
    }

    /// Publishes only while `ticket` is still the latest search. Returns
    /// whether the state was written.
    pub fn publish_for(
        &self,
        ticket: &SearchTicket,
        results: Vec<SearchResult>,
        error: Option<String>,
    ) -> bool {
        self.update_for(ticket, |state| {
            state.results = results;
            state.results_generation += 1;
            state.error = error;
            state.is_searching_local = false;
            state.is_searching_server = false;
        })
    }

    pub fn publish_results(&self, results: Vec<SearchResult>, error: Option<String>) {
        self.sender.send_modify(|state| {
            state.results = results;
            state.results_generation += 1;
            state.error = error;
            state.is_searching_local = false;
            state.is_searching_server = false;
        });
    }
}

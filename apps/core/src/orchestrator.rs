use std::collections::HashSet;
use std::sync::Arc;

use crate::cache::{CacheKey, ResultCache};
use crate::catalog::{EntityCatalog, LocalSearch};
use crate::model::{normalize_for_search, EntityType, SearchFilter, SearchResult};
use crate::remote::RemoteSearch;
use crate::sequence::{SearchSequence, SearchTicket};
use crate::state::SearchStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Cleared,
    Published { results: usize },
    Stale,
}

pub struct SearchOrchestrator {
    catalog: Arc<EntityCatalog>,
    remote: Arc<dyn RemoteSearch>,
    cache: ResultCache,
    store: Arc<SearchStore>,
    sequence: Arc<SearchSequence>,
}

impl SearchOrchestrator {
    pub fn new(
        catalog: Arc<EntityCatalog>,
        remote: Arc<dyn RemoteSearch>,
        cache: ResultCache,
        store: Arc<SearchStore>,
    ) -> Self {
        Self {
            catalog,
            remote,
            cache,
            store,
            sequence: Arc::new(SearchSequence::new()),
        }
    }

    pub fn store(&self) -> &Arc<SearchStore> {
        &self.store
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn catalog(&self) -> &Arc<EntityCatalog> {
        &self.catalog
    }

    pub fn cancel(&self) {
        self.sequence.cancel_all();
        self.store.stop_searching();
    }

    pub async fn perform_search(
        &self,
        query: &str,
        filters: Option<&SearchFilter>,
    ) -> SearchOutcome {
        let query = query.trim();
        if normalize_for_search(query).is_empty() {
            self.sequence.cancel_all();
            self.store.clear_results();
            return SearchOutcome::Cleared;
        }

        let ticket = self.sequence.next_ticket();
        self.store.set_load_status(self.catalog.load_status());
        self.store.begin_search(&ticket, query, filters, true);

        let mut failed = Vec::new();
        let (mut merged, missing) =
            self.search_loaded(query, &SearchFilter::effective_types(filters), &mut failed);
        self.store.set_searching_local_for(&ticket, false);

        if !missing.is_empty() {
            let key = CacheKey::new(query, &missing);
            match self.cache.get(&key) {
                Some(cached) => {
                    tracing::debug!(key = %key, results = cached.len(), "remote cache hit");
                    merged.extend(cached);
                }
                None => {
                    tracing::debug!(key = %key, "remote cache miss");
                    match self.fetch_remote(&ticket, query, &missing, key).await {
                        Some(results) => merged.extend(results),
                        None => failed.extend(missing.iter().copied()),
                    }
                }
            }
        }

        self.finish(&ticket, query, merged, &failed)
    }

    /// Sends the whole effective type set to the server regardless of what
    /// is loaded locally. The cache is refreshed, never read.
    pub async fn force_server_search(
        &self,
        query: &str,
        filters: Option<&SearchFilter>,
    ) -> SearchOutcome {
        let query = query.trim();
        if normalize_for_search(query).is_empty() {
            self.sequence.cancel_all();
            self.store.clear_results();
            return SearchOutcome::Cleared;
        }

        let ticket = self.sequence.next_ticket();
        self.store.set_load_status(self.catalog.load_status());
        self.store.begin_search(&ticket, query, filters, false);

        let types = SearchFilter::effective_types(filters);
        let key = CacheKey::new(query, &types);
        let mut failed = Vec::new();
        let merged = match self.fetch_remote(&ticket, query, &types, key).await {
            Some(results) => results,
            None => {
                // Fall back to whatever the loaded collections can offer.
                let (local, missing) = self.search_loaded(query, &types, &mut failed);
                failed.extend(missing);
                local
            }
        };

        self.finish(&ticket, query, merged, &failed)
    }

    fn search_loaded(
        &self,
        query: &str,
        types: &[EntityType],
        failed: &mut Vec<EntityType>,
    ) -> (Vec<SearchResult>, Vec<EntityType>) {
        let mut results = Vec::new();
        let mut missing = Vec::new();
        for entity_type in types.iter().copied() {
            match self.catalog.search_local(entity_type, query) {
                Ok(LocalSearch::Searched(found)) => results.extend(found),
                Ok(LocalSearch::NotLoaded) => missing.push(entity_type),
                Err(error) => {
                    tracing::warn!(entity_type = %entity_type, %error, "local search skipped");
                    failed.push(entity_type);
                }
            }
        }
        (results, missing)
    }

    async fn fetch_remote(
        &self,
        ticket: &SearchTicket,
        query: &str,
        types: &[EntityType],
        key: CacheKey,
    ) -> Option<Vec<SearchResult>> {
        self.store.set_searching_server_for(ticket, true);

        match self.remote.search_remote(query, types).await {
            Ok(results) => {
                self.cache.put(key, results.clone());
                Some(results)
            }
            Err(error) => {
                tracing::warn!(query, types = ?types, %error, "remote search failed");
                self.store.set_searching_server_for(ticket, false);
                None
            }
        }
    }

    fn finish(
        &self,
        ticket: &SearchTicket,
        query: &str,
        merged: Vec<SearchResult>,
        failed: &[EntityType],
    ) -> SearchOutcome {
        let ranked = rank_results(dedupe_results(merged), query);
        let count = ranked.len();
        if self.store.publish_for(ticket, ranked, failure_notice(failed)) {
            SearchOutcome::Published { results: count }
        } else {
            tracing::debug!(
                query,
                sequence = ticket.sequence(),
                "discarding results of superseded search"
            );
            SearchOutcome::Stale
        }
    }
}

/// Keeps the first occurrence of every `(id, type)` pair.
pub fn dedupe_results(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen = HashSet::with_capacity(results.len());
    results
        .into_iter()
        .filter(|result| seen.insert((result.id.clone(), result.entity_type)))
        .collect()
}

/// Title matches first; the sort is stable so source order survives.
pub fn rank_results(mut results: Vec<SearchResult>, query: &str) -> Vec<SearchResult> {
    let normalized_query = normalize_for_search(query);
    if normalized_query.is_empty() {
        return results;
    }
    results.sort_by_cached_key(|result| {
        !normalize_for_search(&result.title).contains(&normalized_query)
    });
    results
}

fn failure_notice(failed: &[EntityType]) -> Option<String> {
    if failed.is_empty() {
        return None;
    }
    let mut labels: Vec<&str> = failed.iter().map(|t| t.label()).collect();
    labels.sort_unstable();
    labels.dedup();
    Some(format!(
        "Some categories could not be searched: {}",
        labels.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::entities::Matter;
    use crate::remote::RemoteSearchError;

    struct Unreachable;

    #[async_trait]
    impl RemoteSearch for Unreachable {
        async fn search_remote(
            &self,
            _query: &str,
            _types: &[EntityType],
        ) -> Result<Vec<SearchResult>, RemoteSearchError> {
            Err(RemoteSearchError::Transport("connection refused".into()))
        }
    }

    #[test]
    fn dedupe_prefers_first_occurrence() {
        let local = SearchResult::new("1", EntityType::Contact, "Local");
        let remote = SearchResult::new("1", EntityType::Contact, "Remote");
        let other_type = SearchResult::new("1", EntityType::Task, "Task");

        let deduped = dedupe_results(vec![local, remote, other_type]);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].title, "Local");
    }

    #[test]
    fn rank_moves_title_matches_first_and_keeps_order() {
        let results = vec![
            SearchResult::new("a", EntityType::Matter, "Sucesión Ruiz").with_description("perez"),
            SearchResult::new("b", EntityType::Contact, "Juan Pérez"),
            SearchResult::new("c", EntityType::Task, "Llamar a cliente").with_description("perez"),
            SearchResult::new("d", EntityType::Matter, "Pérez c/ Gómez"),
        ];

        let ranked = rank_results(results, "PEREZ");

        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn notice_lists_each_category_once() {
        let notice = failure_notice(&[EntityType::Task, EntityType::Contact, EntityType::Task]);
        assert_eq!(
            notice.as_deref(),
            Some("Some categories could not be searched: contacts, tasks")
        );
        assert!(failure_notice(&[]).is_none());
    }

    #[tokio::test]
    async fn broken_collection_is_skipped_not_fatal() {
        let catalog = Arc::new(EntityCatalog::new());
        catalog
            .install_matters(vec![Matter {
                id: "f1".into(),
                folder_name: "Pérez c/ Gómez".into(),
                ..Default::default()
            }])
            .unwrap();
        catalog.install_contacts(Vec::new()).unwrap();
        catalog.install_calculators(Vec::new()).unwrap();
        catalog.install_tasks(Vec::new()).unwrap();
        catalog.install_events(Vec::new()).unwrap();
        catalog.poison(EntityType::Contact);

        let orchestrator = SearchOrchestrator::new(
            catalog,
            Arc::new(Unreachable),
            ResultCache::default(),
            Arc::new(SearchStore::default()),
        );

        let filter = SearchFilter::only(&[EntityType::Matter, EntityType::Contact]);
        let outcome = orchestrator.perform_search("perez", Some(&filter)).await;

        assert_eq!(outcome, SearchOutcome::Published { results: 1 });
        let state = orchestrator.store().snapshot();
        assert_eq!(state.results[0].id, "f1");
        assert!(state.error.unwrap().contains("contacts"));
    }
}

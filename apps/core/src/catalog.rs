use std::collections::BTreeMap;
use std::sync::RwLock;

use serde::Serialize;

use crate::adapters::{self, AdapterDescriptor};
use crate::entities::{CalendarEvent, Calculator, Contact, Matter, Task};
use crate::model::{EntityType, SearchResult};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{0} collection lock poisoned")]
    LockPoisoned(EntityType),
}

/// Whether each collection is fully resident in memory. A type only ever
/// moves from not loaded to loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityLoadStatus(BTreeMap<EntityType, bool>);

impl Default for EntityLoadStatus {
    fn default() -> Self {
        Self(EntityType::ALL.iter().map(|t| (*t, false)).collect())
    }
}

impl EntityLoadStatus {
    pub fn is_loaded(&self, entity_type: EntityType) -> bool {
        self.0.get(&entity_type).copied().unwrap_or(false)
    }

    pub fn mark_loaded(&mut self, entity_type: EntityType) {
        self.0.insert(entity_type, true);
    }

    pub fn loaded_types(&self) -> Vec<EntityType> {
        self.0
            .iter()
            .filter(|(_, loaded)| **loaded)
            .map(|(t, _)| *t)
            .collect()
    }
}

#[derive(Debug)]
pub enum LocalSearch {
    Searched(Vec<SearchResult>),
    NotLoaded,
}

#[derive(Debug)]
struct Slot<T> {
    records: Vec<T>,
    loaded: bool,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            loaded: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct EntityCatalog {
    matters: RwLock<Slot<Matter>>,
    contacts: RwLock<Slot<Contact>>,
    calculators: RwLock<Slot<Calculator>>,
    tasks: RwLock<Slot<Task>>,
    events: RwLock<Slot<CalendarEvent>>,
}

impl EntityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install_matters(&self, records: Vec<Matter>) -> Result<(), CatalogError> {
        install(&self.matters, EntityType::Matter, records)
    }

    pub fn install_contacts(&self, records: Vec<Contact>) -> Result<(), CatalogError> {
        install(&self.contacts, EntityType::Contact, records)
    }

    pub fn install_calculators(&self, records: Vec<Calculator>) -> Result<(), CatalogError> {
        install(&self.calculators, EntityType::Calculator, records)
    }

    pub fn install_tasks(&self, records: Vec<Task>) -> Result<(), CatalogError> {
        install(&self.tasks, EntityType::Task, records)
    }

    pub fn install_events(&self, records: Vec<CalendarEvent>) -> Result<(), CatalogError> {
        install(&self.events, EntityType::Event, records)
    }

    pub fn is_loaded(&self, entity_type: EntityType) -> bool {
        match entity_type {
            EntityType::Matter => slot_loaded(&self.matters),
            EntityType::Contact => slot_loaded(&self.contacts),
            EntityType::Calculator => slot_loaded(&self.calculators),
            EntityType::Task => slot_loaded(&self.tasks),
            EntityType::Event => slot_loaded(&self.events),
        }
    }

    pub fn load_status(&self) -> EntityLoadStatus {
        let mut status = EntityLoadStatus::default();
        for entity_type in EntityType::ALL {
            if self.is_loaded(entity_type) {
                status.mark_loaded(entity_type);
            }
        }
        status
    }

    pub fn search_local(
        &self,
        entity_type: EntityType,
        query: &str,
    ) -> Result<LocalSearch, CatalogError> {
        match entity_type {
            EntityType::Matter => search_slot(&self.matters, &adapters::MATTERS, query),
            EntityType::Contact => search_slot(&self.contacts, &adapters::CONTACTS, query),
            EntityType::Calculator => {
                search_slot(&self.calculators, &adapters::CALCULATORS, query)
            }
            EntityType::Task => search_slot(&self.tasks, &adapters::TASKS, query),
            EntityType::Event => search_slot(&self.events, &adapters::EVENTS, query),
        }
    }

    #[cfg(test)]
    pub(crate) fn poison(&self, entity_type: EntityType) {
        fn poison_slot<T: Send + Sync>(slot: &RwLock<Slot<T>>) {
            std::thread::scope(|scope| {
                let _ = scope
                    .spawn(|| {
                        let _guard = slot.write();
                        panic!("poisoning collection for test");
                    })
                    .join();
            });
        }

        match entity_type {
            EntityType::Matter => poison_slot(&self.matters),
            EntityType::Contact => poison_slot(&self.contacts),
            EntityType::Calculator => poison_slot(&self.calculators),
            EntityType::Task => poison_slot(&self.tasks),
            EntityType::Event => poison_slot(&self.events),
        }
    }
}

fn install<T>(
    slot: &RwLock<Slot<T>>,
    entity_type: EntityType,
    records: Vec<T>,
) -> Result<(), CatalogError> {
    let mut guard = slot
        .write()
        .map_err(|_| CatalogError::LockPoisoned(entity_type))?;
    let first_load = !guard.loaded;
    guard.records = records;
    guard.loaded = true;
    if first_load {
        tracing::info!(
            entity_type = %entity_type,
            records = guard.records.len(),
            "collection loaded"
        );
    }
    Ok(())
}

fn slot_loaded<T>(slot: &RwLock<Slot<T>>) -> bool {
    slot.read().map(|guard| guard.loaded).unwrap_or(false)
}

fn search_slot<T>(
    slot: &RwLock<Slot<T>>,
    descriptor: &AdapterDescriptor<T>,
    query: &str,
) -> Result<LocalSearch, CatalogError> {
    let guard = slot
        .read()
        .map_err(|_| CatalogError::LockPoisoned(descriptor.entity_type))?;
    if !guard.loaded {
        return Ok(LocalSearch::NotLoaded);
    }
    Ok(LocalSearch::Searched(adapters::search_collection(
        descriptor,
        &guard.records,
        query,
    )))
}

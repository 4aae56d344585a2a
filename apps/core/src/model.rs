use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    #[serde(rename = "folder", alias = "matter")]
    Matter,
    Contact,
    Calculator,
    Task,
    Event,
}

impl EntityType {
    pub const ALL: [EntityType; 5] = [
        EntityType::Matter,
        EntityType::Contact,
        EntityType::Calculator,
        EntityType::Task,
        EntityType::Event,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Matter => "folder",
            Self::Contact => "contact",
            Self::Calculator => "calculator",
            Self::Task => "task",
            Self::Event => "event",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Matter => "matters",
            Self::Contact => "contacts",
            Self::Calculator => "calculators",
            Self::Task => "tasks",
            Self::Event => "events",
        }
    }
}

impl Display for EntityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "folder" | "folders" | "matter" | "matters" => Ok(Self::Matter),
            "contact" | "contacts" => Ok(Self::Contact),
            "calculator" | "calculators" => Ok(Self::Calculator),
            "task" | "tasks" => Ok(Self::Task),
            "event" | "events" => Ok(Self::Event),
            other => Err(format!("unknown entity type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, MetadataValue>,
}

impl SearchResult {
    pub fn new(id: &str, entity_type: EntityType, title: &str) -> Self {
        Self {
            id: id.to_string(),
            entity_type,
            title: title.to_string(),
            subtitle: None,
            description: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = non_empty(subtitle.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = non_empty(description.into());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<BTreeSet<EntityType>>,
}

impl SearchFilter {
    pub fn only(types: &[EntityType]) -> Self {
        Self {
            types: Some(types.iter().copied().collect()),
        }
    }

    /// Types a search should cover. Missing or empty filters mean every type.
    pub fn effective_types(filter: Option<&SearchFilter>) -> Vec<EntityType> {
        match filter.and_then(|f| f.types.as_ref()) {
            Some(types) if !types.is_empty() => types.iter().copied().collect(),
            _ => EntityType::ALL.to_vec(),
        }
    }
}

pub fn normalize_for_search(input: &str) -> String {
    let folded: String = input
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    folded.trim().to_string()
}

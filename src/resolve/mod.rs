//! External entity resolution with a per-run memo.
//!
//! [`EntityResolver`] wraps an [`EntityLookup`] (normally the Wikidata
//! SPARQL client) and remembers every successful answer for the rest of the
//! run. Failures are returned as typed errors and never remembered, so a
//! later request for the same entity goes back to the service.

pub mod wikidata;

use std::collections::HashMap;

use thiserror::Error;

/// Base of the URIs that tagged Wikidata ids resolve to.
pub const WIKIDATA_ENTITY_BASE: &str = "http://www.wikidata.org/entity/";

/// Label used for both name and description when a lookup fails.
pub const UNKNOWN_ENTITY: &str = "Unknown";

/// Human-readable name and description of an external entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityInfo {
    pub label: String,
    pub description: Option<String>,
}

impl EntityInfo {
    pub fn new(label: impl Into<String>, description: Option<String>) -> Self {
        Self {
            label: label.into(),
            description,
        }
    }

    /// Placeholder shown in place of an entity that could not be resolved.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_ENTITY, Some(UNKNOWN_ENTITY.to_string()))
    }
}

/// Why an entity could not be resolved.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request for {uri} failed: {message}")]
    Http { uri: String, message: String },

    #[error("unexpected response for {uri}: {message}")]
    Decode { uri: String, message: String },

    #[error("no results for {uri}")]
    NoResults { uri: String },
}

/// One round-trip to an entity service.
pub trait EntityLookup {
    fn lookup(&self, uri: &str) -> Result<EntityInfo, LookupError>;
}

impl<L: EntityLookup + ?Sized> EntityLookup for &L {
    fn lookup(&self, uri: &str) -> Result<EntityInfo, LookupError> {
        (**self).lookup(uri)
    }
}

impl<L: EntityLookup + ?Sized> EntityLookup for Box<L> {
    fn lookup(&self, uri: &str) -> Result<EntityInfo, LookupError> {
        (**self).lookup(uri)
    }
}

/// Memoizing front of an [`EntityLookup`].
pub struct EntityResolver<L> {
    lookup: L,
    cache: HashMap<String, EntityInfo>,
}

impl<L: EntityLookup> EntityResolver<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            cache: HashMap::new(),
        }
    }

    /// Resolve `uri`, answering from the memo when possible.
    pub fn resolve(&mut self, uri: &str) -> Result<EntityInfo, LookupError> {
        if let Some(info) = self.cache.get(uri) {
            return Ok(info.clone());
        }

        let info = self.lookup.lookup(uri)?;
        self.cache.insert(uri.to_string(), info.clone());
        Ok(info)
    }

    /// Number of memoized entities.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }
}

/// Full entity URI for a Wikidata item id such as `Q727`.
pub fn wikidata_uri(item_id: &str) -> String {
    format!("{WIKIDATA_ENTITY_BASE}{}", item_id.trim())
}

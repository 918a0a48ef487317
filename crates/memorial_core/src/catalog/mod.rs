//! Static memory catalog.
//!
//! # Responsibility
//! - Load the ordered, read-only record list once per process.
//! - Provide the two render orders: catalog order (memory wall) and
//!   chronological order (timeline).
//!
//! # Invariants
//! - The catalog is non-empty and ids are unique.
//! - Chronological order is ascending by date; equal dates keep catalog
//!   order and the order is computed once, never re-sorted per render.

use crate::model::memory::{MemoryId, MemoryRecord, MemoryValidationError};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Thumbnails shown under the memory wall.
pub const WALL_THUMBNAIL_LIMIT: usize = 6;

const BUILTIN_CATALOG_JSON: &str = include_str!("../../data/memories.json");

static BUILTIN: Lazy<Result<Arc<MemoryCatalog>, CatalogError>> =
    Lazy::new(|| MemoryCatalog::from_json_str(BUILTIN_CATALOG_JSON).map(Arc::new));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Empty,
    DuplicateId(MemoryId),
    InvalidRecord(MemoryValidationError),
    Malformed(String),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "memory catalog must contain at least one record"),
            Self::DuplicateId(id) => write!(f, "memory id {id} appears more than once"),
            Self::InvalidRecord(err) => write!(f, "{err}"),
            Self::Malformed(message) => write!(f, "malformed memory catalog: {message}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRecord(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MemoryValidationError> for CatalogError {
    fn from(value: MemoryValidationError) -> Self {
        Self::InvalidRecord(value)
    }
}

/// Ordered, immutable record list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryCatalog {
    records: Vec<MemoryRecord>,
    /// Indices into `records`, ascending by date, stable on ties.
    chronological: Vec<usize>,
}

impl MemoryCatalog {
    /// Shared catalog compiled into the binary.
    pub fn builtin() -> Result<Arc<MemoryCatalog>, CatalogError> {
        (*BUILTIN).clone()
    }

    pub fn from_records(records: Vec<MemoryRecord>) -> Result<Self, CatalogError> {
        if records.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            record.validate()?;
            if !seen.insert(record.id) {
                return Err(CatalogError::DuplicateId(record.id));
            }
        }

        let mut chronological = (0..records.len()).collect::<Vec<_>>();
        // `sort_by_key` is stable: equal dates keep catalog order.
        chronological.sort_by_key(|&index| records[index].date);

        Ok(Self {
            records,
            chronological,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<MemoryRecord> =
            serde_json::from_str(json).map_err(|err| CatalogError::Malformed(err.to_string()))?;
        Self::from_records(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at catalog position `index`.
    pub fn get(&self, index: usize) -> Option<&MemoryRecord> {
        self.records.get(index)
    }

    pub fn find(&self, id: MemoryId) -> Option<&MemoryRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn contains(&self, id: MemoryId) -> bool {
        self.find(id).is_some()
    }

    /// Records in catalog order.
    pub fn records(&self) -> &[MemoryRecord] {
        &self.records
    }

    /// Records ascending by date.
    pub fn chronological(&self) -> impl Iterator<Item = &MemoryRecord> + '_ {
        self.chronological.iter().map(|&index| &self.records[index])
    }

    /// Leading records shown in the wall's thumbnail strip.
    pub fn thumbnails(&self, limit: usize) -> &[MemoryRecord] {
        &self.records[..limit.min(self.records.len())]
    }
}

//! Memory wall carousel.
//!
//! # Responsibility
//! - Track the selected record over the catalog with circular navigation.
//! - Track the independent expanded/detail presentation flag.
//!
//! # Invariants
//! - `index < catalog.len()` in every reachable state.
//! - `current()` is always `catalog[index]`.

use crate::catalog::{MemoryCatalog, WALL_THUMBNAIL_LIMIT};
use crate::model::memory::MemoryRecord;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselError {
    /// Caller asked for a slot outside `[0, len)`; state is left unchanged.
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for CarouselError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "carousel index {index} out of range for {len} memories")
            }
        }
    }
}

impl Error for CarouselError {}

/// One cell of the thumbnail strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thumbnail<'a> {
    pub index: usize,
    pub record: &'a MemoryRecord,
    pub is_current: bool,
}

pub struct CarouselController {
    catalog: Arc<MemoryCatalog>,
    index: usize,
    expanded: bool,
}

impl CarouselController {
    /// Starts at the first record, collapsed.
    pub fn new(catalog: Arc<MemoryCatalog>) -> Self {
        Self {
            catalog,
            index: 0,
            expanded: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn current(&self) -> &MemoryRecord {
        // Catalog construction rejects empty lists and `index` never leaves range.
        &self.catalog.records()[self.index]
    }

    pub fn next(&mut self) -> &MemoryRecord {
        self.index = (self.index + 1) % self.len();
        debug!("event=carousel_next module=carousel index={}", self.index);
        self.current()
    }

    pub fn previous(&mut self) -> &MemoryRecord {
        let len = self.len();
        self.index = (self.index + len - 1) % len;
        debug!("event=carousel_previous module=carousel index={}", self.index);
        self.current()
    }

    pub fn select(&mut self, index: usize) -> Result<&MemoryRecord, CarouselError> {
        if index >= self.len() {
            return Err(CarouselError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        self.index = index;
        debug!("event=carousel_select module=carousel index={index}");
        Ok(self.current())
    }

    pub fn toggle_expanded(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    /// Strip of the leading records with the current one highlighted.
    pub fn thumbnails(&self) -> Vec<Thumbnail<'_>> {
        self.catalog
            .thumbnails(WALL_THUMBNAIL_LIMIT)
            .iter()
            .enumerate()
            .map(|(index, record)| Thumbnail {
                index,
                record,
                is_current: index == self.index,
            })
            .collect()
    }
}

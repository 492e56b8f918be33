#![forbid(unsafe_code)]

//! Family-tree data model and loading (headless).
//!
//! - person records from the spreadsheet export ([`person`])
//! - curated per-generation order and coordinate tables ([`tables`])
//! - runtime-agnostic async loading with an ordered fallback list ([`loader`])
//! - layered configuration ([`config`])

pub mod config;
pub mod dates;
pub mod error;
pub mod loader;
pub mod person;
pub mod slug;
pub mod tables;

pub use config::{ConfigDocument, TreeConfig};
pub use error::{Error, Result};
pub use loader::{
    DataSources, FsFetcher, MemoryFetcher, ResourceFetcher, load_tree_data, load_tree_data_sync,
};
pub use person::{Gender, Person, PersonId, PersonIndex};
pub use tables::{CoordinateTable, GenerationOrderTable, GenerationTable};

/// Everything one render needs. Tables are `None` when their resources were unavailable.
#[derive(Debug, Clone, Default)]
pub struct TreeData {
    pub persons: Vec<Person>,
    pub order: Option<GenerationOrderTable>,
    pub coordinates: Option<CoordinateTable>,
}

impl TreeData {
    pub fn new(persons: Vec<Person>) -> Self {
        Self {
            persons,
            order: None,
            coordinates: None,
        }
    }

    pub fn with_tables(mut self, order: GenerationOrderTable, coordinates: CoordinateTable) -> Self {
        self.order = Some(order);
        self.coordinates = Some(coordinates);
        self
    }

    pub fn index(&self) -> PersonIndex {
        PersonIndex::new(&self.persons)
    }

    /// Both curated tables are present.
    pub fn is_curated(&self) -> bool {
        self.order.is_some() && self.coordinates.is_some()
    }
}

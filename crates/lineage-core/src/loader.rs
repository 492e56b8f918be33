//! Async loading of the dataset and the two curated tables.
//!
//! The three loads run concurrently and are joined before anything is returned, so callers never
//! see a partially loaded tree. The dataset is mandatory; the tables degrade to `None`.

use crate::person::{Person, parse_dataset};
use crate::tables::{
    CoordinateTable, GenerationOrderTable, parse_coordinate_table, parse_order_table,
};
use crate::{Error, Result, TreeData};
use futures::future::BoxFuture;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Source of named text resources (files next to the page, an in-memory bundle, ...).
pub trait ResourceFetcher: Send + Sync {
    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<String>>;
}

/// Reads resources relative to a base directory.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    base: PathBuf,
}

impl FsFetcher {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl ResourceFetcher for FsFetcher {
    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let path = self.base.join(name);
            std::fs::read_to_string(&path).map_err(|source| {
                if source.kind() == std::io::ErrorKind::NotFound {
                    Error::ResourceNotFound {
                        name: path.display().to_string(),
                    }
                } else {
                    Error::Io {
                        name: path.display().to_string(),
                        source,
                    }
                }
            })
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    resources: FxHashMap<String, String>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.resources.insert(name.into(), text.into());
        self
    }
}

impl ResourceFetcher for MemoryFetcher {
    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<String>> {
        let found = self.resources.get(name).cloned();
        Box::pin(async move {
            found.ok_or_else(|| Error::ResourceNotFound {
                name: name.to_string(),
            })
        })
    }
}

/// Resource names for one tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSources {
    pub dataset: String,
    /// Tried in order; the first one that loads and parses wins.
    pub order_tables: Vec<String>,
    pub coordinate_table: String,
}

impl Default for DataSources {
    fn default() -> Self {
        Self {
            dataset: "family_data.json".to_string(),
            order_tables: vec![
                "manual_order_regrouped.js".to_string(),
                "manual_order.js".to_string(),
            ],
            coordinate_table: "final_x_coordinates.js".to_string(),
        }
    }
}

pub async fn load_dataset(fetcher: &dyn ResourceFetcher, name: &str) -> Result<Vec<Person>> {
    let text = fetcher.fetch(name).await?;
    parse_dataset(&text).map_err(|source| Error::Dataset {
        name: name.to_string(),
        source,
    })
}

/// Walks the fallback list; `None` when no candidate is usable.
pub async fn load_order_table(
    fetcher: &dyn ResourceFetcher,
    candidates: &[String],
) -> Option<GenerationOrderTable> {
    for name in candidates {
        match fetcher.fetch(name).await {
            Ok(text) => match parse_order_table(name, &text) {
                Ok(table) => return Some(table),
                Err(err) => tracing::warn!(resource = %name, error = %err, "order table unusable"),
            },
            Err(err) if err.is_not_found() => {
                tracing::warn!(resource = %name, "order table not found, trying next candidate");
            }
            Err(err) => tracing::warn!(resource = %name, error = %err, "order table unreadable"),
        }
    }
    None
}

pub async fn load_coordinate_table(
    fetcher: &dyn ResourceFetcher,
    name: &str,
) -> Option<CoordinateTable> {
    let text = match fetcher.fetch(name).await {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(resource = %name, error = %err, "coordinate table unavailable");
            return None;
        }
    };
    match parse_coordinate_table(name, &text) {
        Ok(table) => Some(table),
        Err(err) => {
            tracing::warn!(resource = %name, error = %err, "coordinate table unusable");
            None
        }
    }
}

pub async fn load_tree_data(
    fetcher: &dyn ResourceFetcher,
    sources: &DataSources,
) -> Result<TreeData> {
    let (persons, order, coordinates) = futures::join!(
        load_dataset(fetcher, &sources.dataset),
        load_order_table(fetcher, &sources.order_tables),
        load_coordinate_table(fetcher, &sources.coordinate_table),
    );
    let persons = persons?;
    if order.is_none() || coordinates.is_none() {
        tracing::warn!("curated tables incomplete; layout falls back to automatic spacing");
    }
    Ok(TreeData {
        persons,
        order,
        coordinates,
    })
}

/// Executor-free wrapper around [`load_tree_data`].
pub fn load_tree_data_sync(
    fetcher: &dyn ResourceFetcher,
    sources: &DataSources,
) -> Result<TreeData> {
    futures::executor::block_on(load_tree_data(fetcher, sources))
}

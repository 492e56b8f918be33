#![forbid(unsafe_code)]

//! Family-tree layout and SVG/HTML emission.
//!
//! [`layout_tree`] turns loaded [`lineage_core::TreeData`] into a [`model::TreeLayout`] value;
//! [`svg::render_tree_svg`] and [`html::render_tree_html`] consume it.

pub mod assets;
pub mod html;
pub mod layout;
pub mod model;
pub mod svg;
pub mod text;
pub mod tooltip;
pub mod viewport;

use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use std::sync::Arc;

pub use layout::layout_tree;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid render configuration: {message}")]
    InvalidConfig { message: String },
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct LayoutOptions {
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
        }
    }
}

impl std::fmt::Debug for LayoutOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutOptions").finish_non_exhaustive()
    }
}

/// Layout JSON as printed by `lineage-cli layout`.
pub fn layout_to_json(layout: &model::TreeLayout, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(layout)?
    } else {
        serde_json::to_string(layout)?
    })
}

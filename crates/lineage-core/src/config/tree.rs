use crate::loader::DataSources;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub layout: LayoutConfig,
    pub style: StyleConfig,
    pub labels: LabelConfig,
    pub links: LinkConfig,
    pub svg: SvgConfig,
    pub sources: DataSources,
}

impl TreeConfig {
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })
    }
}

/// What to do with a generation that is missing from the curated tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingGeneration {
    /// Leave its persons unplaced.
    #[default]
    Omit,
    /// Space its persons automatically while curated generations keep their coordinates.
    Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Drawing width the curated coordinates are scaled into.
    pub width: f64,
    /// Viewport height used for auto-fit.
    pub height: f64,
    pub node_radius: f64,
    pub base_y_unit: f64,
    /// Fraction of a curve's vertical span used for its control points.
    pub curve_offset_factor: f64,
    /// How far (0..1) from the droplet toward the children the trunk splits.
    pub split_fraction: f64,
    /// Minimum free space between neighbours under automatic spacing.
    pub auto_gap: f64,
    pub missing_generation: MissingGeneration,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            node_radius: 20.0,
            base_y_unit: 150.0,
            curve_offset_factor: 0.5,
            split_fraction: 0.75,
            auto_gap: 10.0,
            missing_generation: MissingGeneration::Omit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub partner_line_color: String,
    pub partner_line_width: f64,
    pub parent_line_color: String,
    pub parent_line_width: f64,
    pub droplet_fill: String,
    pub node_fill: String,
    pub node_stroke: String,
    pub background: String,
    pub gender_ring: bool,
    pub male_color: String,
    pub female_color: String,
    pub unknown_color: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            partner_line_color: "#444".to_string(),
            partner_line_width: 2.0,
            parent_line_color: "#888".to_string(),
            parent_line_width: 2.0,
            droplet_fill: "#f0f0f0".to_string(),
            node_fill: "#ddd".to_string(),
            node_stroke: "#333".to_string(),
            background: "#f8f8f8".to_string(),
            gender_ring: true,
            male_color: "#4a90d9".to_string(),
            female_color: "#d94a8c".to_string(),
            unknown_color: "#999999".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelStrategy {
    /// Split long names into two lines at a vowel near the middle.
    #[default]
    TwoLine,
    /// Measure and cut with an ellipsis.
    Ellipsis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub strategy: LabelStrategy,
    pub max_chars: usize,
    /// Width budget for [`LabelStrategy::Ellipsis`]; `None` means `2.5 × node_radius`.
    pub max_width: Option<f64>,
    pub show_id: bool,
    pub font_size: f64,
    pub id_font_size: f64,
    pub line_height: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            strategy: LabelStrategy::TwoLine,
            max_chars: 9,
            max_width: None,
            show_id: true,
            font_size: 12.0,
            id_font_size: 10.0,
            line_height: 14.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub repo_name: String,
    /// Host the page is served from; empty means "local".
    pub host: String,
    pub hosted_pattern: String,
    pub use_slug: bool,
    /// Directory holding one folder per person (named by folder id).
    pub detail_root: Option<PathBuf>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            repo_name: "family-tree_v2".to_string(),
            host: String::new(),
            hosted_pattern: "github.io".to_string(),
            use_slug: false,
            detail_root: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgConfig {
    pub viewport_fit: f64,
    pub transition_ms: u64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub photo_dir: String,
    /// When set, photos found here are embedded as `data:` URIs.
    pub inline_photos_from: Option<PathBuf>,
    pub placeholder_base: String,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            viewport_fit: 0.98,
            transition_ms: 750,
            min_scale: 0.1,
            max_scale: 4.0,
            photo_dir: "images".to_string(),
            inline_photos_from: None,
            placeholder_base: "https://placehold.co".to_string(),
        }
    }
}

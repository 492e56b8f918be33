//! Node placement: curated tables first, even spacing as the fallback.

use crate::model::LayoutPoint;
use indexmap::IndexMap;
use lineage_core::config::{LayoutConfig, MissingGeneration};
use lineage_core::{Person, PersonIndex, TreeData};
use serde::{Deserialize, Serialize};

/// Linear map from curated coordinate units to pixels, centered in the drawing width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateScale {
    pub domain_min: f64,
    pub domain_max: f64,
    /// Pixel width the domain maps onto.
    pub range: f64,
    /// Added to every scaled value; centers the scaled tree in the drawing width.
    pub offset: f64,
}

impl CoordinateScale {
    /// The domain maps onto `[0, width - 4R]`, leaving a `2R` margin on either side once centered.
    /// A single-valued domain collapses onto the center.
    pub fn new(domain_min: f64, domain_max: f64, width: f64, radius: f64) -> Self {
        let span = domain_max - domain_min;
        let range = if span > 0.0 {
            (width - radius * 4.0).max(0.0)
        } else {
            0.0
        };
        Self {
            domain_min,
            domain_max,
            range,
            offset: (width - range) / 2.0,
        }
    }

    pub fn scale(&self, v: f64) -> f64 {
        let span = self.domain_max - self.domain_min;
        if span > 0.0 {
            (v - self.domain_min) / span * self.range
        } else {
            0.0
        }
    }

    pub fn map(&self, v: f64) -> f64 {
        self.scale(v) + self.offset
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Assignment {
    /// Indexed like the dataset.
    pub positions: Vec<Option<LayoutPoint>>,
    pub scale: Option<CoordinateScale>,
    pub auto_generations: Vec<i64>,
}

pub(crate) fn generation_y(generation: i64, cfg: &LayoutConfig) -> f64 {
    generation as f64 * cfg.base_y_unit + cfg.node_radius
}

/// Dataset indices grouped by generation, in first-appearance order.
pub(crate) fn generation_groups(persons: &[Person]) -> IndexMap<i64, Vec<usize>> {
    let mut groups: IndexMap<i64, Vec<usize>> = IndexMap::new();
    for (idx, p) in persons.iter().enumerate() {
        if let Some(g) = p.generation {
            groups.entry(g).or_default().push(idx);
        }
    }
    groups
}

pub(crate) fn assign_coordinates(data: &TreeData, cfg: &LayoutConfig) -> Assignment {
    let mut out = Assignment {
        positions: vec![None; data.persons.len()],
        ..Assignment::default()
    };
    let groups = generation_groups(&data.persons);
    let index = data.index();

    let (Some(order), Some(coords)) = (data.order.as_ref(), data.coordinates.as_ref()) else {
        for (&generation, members) in &groups {
            auto_space_generation(generation, members, &data.persons, &index, cfg, &mut out);
        }
        return out;
    };

    out.scale = coords
        .extent()
        .map(|(lo, hi)| CoordinateScale::new(lo, hi, cfg.width, cfg.node_radius));

    for (&generation, members) in &groups {
        let rows = order.get(generation).zip(coords.get(generation));
        match (rows, out.scale) {
            (Some((ids, xs)), Some(scale)) => {
                place_curated(generation, members, ids, xs, &scale, &data.persons, cfg, &mut out)
            }
            _ if cfg.missing_generation == MissingGeneration::Auto => {
                auto_space_generation(generation, members, &data.persons, &index, cfg, &mut out)
            }
            _ => {
                tracing::debug!(generation, "generation missing from curated tables; omitted");
            }
        }
    }
    out
}

#[allow(clippy::too_many_arguments)]
fn place_curated(
    generation: i64,
    members: &[usize],
    ids: &[lineage_core::PersonId],
    xs: &[f64],
    scale: &CoordinateScale,
    persons: &[Person],
    cfg: &LayoutConfig,
    out: &mut Assignment,
) {
    let y = generation_y(generation, cfg);
    for (id, &x) in ids.iter().zip(xs) {
        if !x.is_finite() {
            continue;
        }
        let Some(&idx) = members.iter().find(|&&m| persons[m].id == *id) else {
            continue;
        };
        // A repeated id keeps its first slot.
        if out.positions[idx].is_none() {
            out.positions[idx] = Some(LayoutPoint::new(scale.map(x), y));
        }
    }
}

/// Evenly spaced slots across the width, partners pulled next to each other, then nudged apart
/// so no two nodes are closer than `2R + gap`.
fn auto_space_generation(
    generation: i64,
    members: &[usize],
    persons: &[Person],
    index: &PersonIndex,
    cfg: &LayoutConfig,
    out: &mut Assignment,
) {
    let mut sequence: Vec<usize> = Vec::with_capacity(members.len());
    for &m in members {
        if sequence.contains(&m) {
            continue;
        }
        sequence.push(m);
        for partner in &persons[m].partners {
            let Some(p) = index.get(partner.as_str()) else {
                continue;
            };
            if members.contains(&p) && !sequence.contains(&p) {
                sequence.push(p);
            }
        }
    }

    let slot = cfg.width / (sequence.len() as f64 + 1.0);
    let min_dist = cfg.node_radius * 2.0 + cfg.auto_gap.max(0.0);
    let y = generation_y(generation, cfg);
    let mut prev: Option<f64> = None;
    for (i, &idx) in sequence.iter().enumerate() {
        let mut x = slot * (i as f64 + 1.0);
        if let Some(p) = prev {
            x = x.max(p + min_dist);
        }
        prev = Some(x);
        out.positions[idx] = Some(LayoutPoint::new(x, y));
    }
    out.auto_generations.push(generation);
}

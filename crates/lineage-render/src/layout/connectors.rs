//! Partner lines, parent droplets, and the two-stage parent → child curves.

use crate::model::{CubicCurve, Droplet, LayoutPoint, ParentLink, PartnerLine};
use indexmap::IndexMap;
use lineage_core::config::LayoutConfig;
use lineage_core::{Person, PersonIndex};
use rustc_hash::FxHashSet;
use std::cmp::Ordering;

/// One line per unordered partner pair, anchored on the numerically smaller identifier. Either
/// record listing the other is enough.
pub fn partner_lines(
    persons: &[Person],
    positions: &[Option<LayoutPoint>],
    index: &PersonIndex,
    radius: f64,
) -> Vec<PartnerLine> {
    let mut seen: FxHashSet<(usize, usize)> = FxHashSet::default();
    let mut out = Vec::new();
    for (i, person) in persons.iter().enumerate() {
        let Some(a) = positions[i] else {
            continue;
        };
        for partner_id in &person.partners {
            let Some(j) = index.get(partner_id.as_str()) else {
                continue;
            };
            let Some(b) = positions[j] else {
                continue;
            };
            let (lo, hi) = match person.id.numeric_cmp(&persons[j].id) {
                Ordering::Less => (i, j),
                Ordering::Greater => (j, i),
                Ordering::Equal => continue,
            };
            if !seen.insert((lo, hi)) {
                continue;
            }
            out.push(PartnerLine {
                anchor: persons[lo].id.clone(),
                partner: persons[hi].id.clone(),
                x1: a.x.min(b.x) + radius,
                y1: if lo == i { a.y } else { b.y },
                x2: a.x.max(b.x) - radius,
                y2: if lo == i { b.y } else { a.y },
            });
        }
    }
    out
}

/// Rounded rectangle behind 1–2 parents; `None` without parents.
pub fn droplet(parents: &[LayoutPoint], radius: f64) -> Option<Droplet> {
    if parents.is_empty() {
        return None;
    }
    let n = parents.len() as f64;
    let mid_x = parents.iter().map(|p| p.x).sum::<f64>() / n;
    let mid_y = parents.iter().map(|p| p.y).sum::<f64>() / n;

    let width = if parents.len() == 1 {
        radius * 2.5
    } else {
        (radius * 5.0).max((parents[0].x - parents[1].x).abs() + radius)
    };
    let height = 1.5 * radius * 2.0;
    let y = mid_y - height / 2.0 + radius / 3.0;

    Some(Droplet {
        x: mid_x - width / 2.0,
        y,
        width,
        height,
        corner_radius: radius * 0.5,
        anchor: LayoutPoint::new(mid_x, y + height),
    })
}

/// Vertical-tangent cubic: both control points sit `factor` of the way down the span, above the
/// start and the end respectively.
pub fn vertical_cubic(start: LayoutPoint, end: LayoutPoint, factor: f64) -> CubicCurve {
    let cy = start.y + factor * (end.y - start.y);
    CubicCurve {
        start,
        c1: LayoutPoint::new(start.x, cy),
        c2: LayoutPoint::new(end.x, cy),
        end,
    }
}

/// Children grouped by `(generation, father, mother)` in first-appearance order, each group
/// connected to a droplet behind its positioned parents.
pub fn parent_links(
    persons: &[Person],
    positions: &[Option<LayoutPoint>],
    index: &PersonIndex,
    cfg: &LayoutConfig,
) -> Vec<ParentLink> {
    let r = cfg.node_radius;
    let mut groups: IndexMap<(i64, String, String), Vec<usize>> = IndexMap::new();
    for (i, person) in persons.iter().enumerate() {
        let (Some(generation), Some(_)) = (person.generation, positions[i]) else {
            continue;
        };
        let (father, mother) = person.parent_key();
        groups.entry((generation, father, mother)).or_default().push(i);
    }

    let positioned = |id: &str| -> Option<(usize, LayoutPoint)> {
        if id.is_empty() {
            return None;
        }
        let idx = index.get(id)?;
        Some((idx, positions[idx]?))
    };

    let mut out = Vec::new();
    for ((_, father, mother), children) in groups {
        let father_pos = positioned(&father);
        let mother_pos = positioned(&mother);
        let parent_points: Vec<LayoutPoint> = [father_pos, mother_pos]
            .into_iter()
            .flatten()
            .map(|(_, p)| p)
            .collect();
        let Some(droplet) = droplet(&parent_points, r) else {
            continue;
        };

        let child_points: Vec<LayoutPoint> = children.iter().filter_map(|&c| positions[c]).collect();
        let n = child_points.len() as f64;
        let child_mid_x = child_points.iter().map(|p| p.x).sum::<f64>() / n;
        let child_mid_top = child_points.iter().map(|p| p.y - r).sum::<f64>() / n;

        let anchor = droplet.anchor;
        let split = LayoutPoint::new(
            child_mid_x,
            anchor.y + cfg.split_fraction * (child_mid_top - anchor.y),
        );
        let trunk = vertical_cubic(anchor, split, cfg.curve_offset_factor);
        let branches = child_points
            .iter()
            .map(|c| vertical_cubic(split, LayoutPoint::new(c.x, c.y - r), cfg.curve_offset_factor))
            .collect();

        out.push(ParentLink {
            father: father_pos.map(|(i, _)| persons[i].id.clone()),
            mother: mother_pos.map(|(i, _)| persons[i].id.clone()),
            children: children.iter().map(|&c| persons[c].id.clone()).collect(),
            droplet,
            trunk,
            branches,
        });
    }
    out
}

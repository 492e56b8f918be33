pub mod connectors;
pub mod coords;

use crate::model::{Bounds, Placement, PositionedPerson, TreeLayout};
use crate::text::{TextMeasurer, node_label};
use crate::{Error, Result};
use lineage_core::config::{LayoutConfig, StyleConfig};
use lineage_core::{TreeConfig, TreeData, slug};

/// Label allowance below a node's bottom edge used for `max_layout_y`.
pub const LABEL_MAX_OFFSET: f64 = 28.0;

/// Outer radius of a node's drawn circles, strokes included.
fn node_extent(r: f64, style: &StyleConfig) -> f64 {
    if style.gender_ring { r + 4.0 } else { r + 0.75 }
}

fn validate(cfg: &LayoutConfig) -> Result<()> {
    let positive = |name: &str, v: f64| {
        if v.is_finite() && v > 0.0 {
            Ok(())
        } else {
            Err(Error::InvalidConfig {
                message: format!("layout.{name} must be a positive number, got {v}"),
            })
        }
    };
    positive("width", cfg.width)?;
    positive("height", cfg.height)?;
    positive("node_radius", cfg.node_radius)?;
    positive("base_y_unit", cfg.base_y_unit)?;
    for (name, v) in [
        ("curve_offset_factor", cfg.curve_offset_factor),
        ("split_fraction", cfg.split_fraction),
    ] {
        if !v.is_finite() {
            return Err(Error::InvalidConfig {
                message: format!("layout.{name} must be finite"),
            });
        }
    }
    Ok(())
}

pub fn layout_tree(
    data: &TreeData,
    config: &TreeConfig,
    measurer: &dyn TextMeasurer,
) -> Result<TreeLayout> {
    let cfg = &config.layout;
    validate(cfg)?;
    let r = cfg.node_radius;
    let index = data.index();
    let assignment = coords::assign_coordinates(data, cfg);

    let mut persons = Vec::new();
    let mut unplaced = Vec::new();
    for (idx, person) in data.persons.iter().enumerate() {
        match (assignment.positions[idx], person.generation) {
            (Some(p), Some(generation)) => persons.push(PositionedPerson {
                id: person.id.clone(),
                index: idx,
                generation,
                x: p.x,
                y: p.y,
                r,
                folder_id: slug::folder_id(person),
                label: node_label(
                    person.display_name(),
                    person.id.as_str(),
                    &config.labels,
                    r,
                    measurer,
                ),
            }),
            _ => unplaced.push(person.id.clone()),
        }
    }
    if !unplaced.is_empty() {
        tracing::debug!(count = unplaced.len(), "persons left unplaced");
    }

    let partner_lines =
        connectors::partner_lines(&data.persons, &assignment.positions, &index, r);
    let parent_links =
        connectors::parent_links(&data.persons, &assignment.positions, &index, cfg);

    let extent = node_extent(r, &config.style);
    let mut points: Vec<(f64, f64)> = Vec::new();
    for p in &persons {
        let half = extent.max(p.label.width / 2.0);
        points.push((p.x - half, p.y - extent));
        points.push((p.x + half, p.y + extent.max(p.label.bottom)));
    }
    for l in &partner_lines {
        points.push((l.x1, l.y1));
        points.push((l.x2, l.y2));
    }
    for link in &parent_links {
        let d = &link.droplet;
        points.push((d.x, d.y));
        points.push((d.x + d.width, d.y + d.height));
        for curve in std::iter::once(&link.trunk).chain(&link.branches) {
            points.extend(curve.points().iter().map(|p| (p.x, p.y)));
        }
    }
    let bounds = Bounds::from_points(points);

    let (max_layout_x, max_layout_y) = if persons.is_empty() {
        (cfg.width, 0.0)
    } else {
        let min_x = persons.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = persons.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let max_y = persons.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        (max_x - min_x + r * 2.0, max_y + r + LABEL_MAX_OFFSET)
    };

    Ok(TreeLayout {
        placement: if data.is_curated() {
            Placement::Curated
        } else {
            Placement::Automatic
        },
        auto_generations: assignment.auto_generations,
        scale: assignment.scale,
        persons,
        unplaced,
        partner_lines,
        parent_links,
        bounds,
        max_layout_x,
        max_layout_y,
    })
}

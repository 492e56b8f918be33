use crate::layout::coords::CoordinateScale;
use lineage_core::PersonId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

impl LayoutPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A person with its computed node position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionedPerson {
    pub id: PersonId,
    /// Index into the dataset the layout was computed from.
    pub index: usize,
    pub generation: i64,
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub folder_id: String,
    pub label: NodeLabel,
}

/// Name lines and id label under a node, in node-local coordinates (origin at the node center).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLabel {
    pub lines: Vec<String>,
    /// Baseline of the first name line.
    pub first_baseline: f64,
    /// Baseline of the id label; `None` when ids are hidden.
    pub id_y: Option<f64>,
    /// Widest line, the id label included. Labels are centered on the node.
    pub width: f64,
    /// Lowest point any label glyph reaches.
    pub bottom: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerLine {
    /// The numerically smaller identifier of the pair.
    pub anchor: PersonId,
    pub partner: PersonId,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Rounded rectangle drawn behind one or two parents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Droplet {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    /// Bottom-center point child curves start from.
    pub anchor: LayoutPoint,
}

impl Droplet {
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicCurve {
    pub start: LayoutPoint,
    pub c1: LayoutPoint,
    pub c2: LayoutPoint,
    pub end: LayoutPoint,
}

impl CubicCurve {
    pub fn points(&self) -> [LayoutPoint; 4] {
        [self.start, self.c1, self.c2, self.end]
    }
}

/// Connector from one parent group to the children that share it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentLink {
    pub father: Option<PersonId>,
    pub mother: Option<PersonId>,
    pub children: Vec<PersonId>,
    pub droplet: Droplet,
    /// Droplet anchor to the split point.
    pub trunk: CubicCurve,
    /// Split point to each child's top edge, in `children` order.
    pub branches: Vec<CubicCurve>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    /// Positions come from the curated order/coordinate tables.
    Curated,
    /// Tables were unavailable; every generation is evenly spaced.
    Automatic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeLayout {
    pub placement: Placement,
    /// Generations placed by the automatic spacer.
    pub auto_generations: Vec<i64>,
    pub scale: Option<CoordinateScale>,
    pub persons: Vec<PositionedPerson>,
    /// Persons that could not be placed (no table match, no generation).
    pub unplaced: Vec<PersonId>,
    pub partner_lines: Vec<PartnerLine>,
    pub parent_links: Vec<ParentLink>,
    /// Extent of all drawn geometry; `None` when nothing was placed.
    pub bounds: Option<Bounds>,
    pub max_layout_x: f64,
    pub max_layout_y: f64,
}

impl TreeLayout {
    pub fn person(&self, id: &str) -> Option<&PositionedPerson> {
        self.persons.iter().find(|p| p.id.as_str() == id)
    }
}

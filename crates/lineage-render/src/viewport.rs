//! Zoom/pan state for the root drawing group.
//!
//! All interaction reduces to one affine transform `translate(x, y) scale(k)`. Wheel zoom keeps
//! the point under the cursor fixed; the initial auto-fit animates from the current transform.

use crate::model::Bounds;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: Self = Self {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    /// Content coordinates to screen coordinates.
    pub fn apply(&self, (px, py): (f64, f64)) -> (f64, f64) {
        (px * self.k + self.x, py * self.k + self.y)
    }

    /// Screen coordinates to content coordinates.
    pub fn invert(&self, (sx, sy): (f64, f64)) -> (f64, f64) {
        ((sx - self.x) / self.k, (sy - self.y) / self.k)
    }

    pub fn translate_by(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Rescales to `k` while the content under `focal` stays put.
    pub fn scale_to(self, k: f64, focal: (f64, f64)) -> Self {
        let (cx, cy) = self.invert(focal);
        Self {
            k,
            x: focal.0 - cx * k,
            y: focal.1 - cy * k,
        }
    }

    pub fn to_svg_attr(&self) -> String {
        format!(
            "translate({},{}) scale({})",
            crate::svg::fmt(self.x),
            crate::svg::fmt(self.y),
            crate::svg::fmt(self.k)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleExtent {
    pub min: f64,
    pub max: f64,
}

impl Default for ScaleExtent {
    fn default() -> Self {
        Self { min: 0.1, max: 4.0 }
    }
}

impl ScaleExtent {
    pub fn clamp(&self, k: f64) -> f64 {
        k.clamp(self.min, self.max)
    }
}

/// Transform that centers `bounds` in a `width × height` viewport, scaled to fill `fraction` of
/// it. `None` for empty or degenerate bounds; the caller leaves its transform as is.
pub fn fit_transform(
    bounds: Option<&Bounds>,
    width: f64,
    height: f64,
    fraction: f64,
) -> Option<ZoomTransform> {
    let b = bounds?;
    let (bw, bh) = (b.width(), b.height());
    if !(bw > 0.0 && bh > 0.0 && width > 0.0 && height > 0.0) {
        return None;
    }
    let k = (width / bw).min(height / bh) * fraction;
    if !k.is_finite() || k <= 0.0 {
        return None;
    }
    Some(ZoomTransform {
        k,
        x: (width - bw * k) / 2.0 - b.min_x * k,
        y: (height - bh * k) / 2.0 - b.min_y * k,
    })
}

fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from: ZoomTransform,
    pub to: ZoomTransform,
    pub duration_ms: u64,
}

impl Transition {
    /// The transform `elapsed_ms` into the transition (cubic in-out easing).
    pub fn at(&self, elapsed_ms: f64) -> ZoomTransform {
        if self.duration_ms == 0 {
            return self.to;
        }
        let t = ease_cubic_in_out(elapsed_ms / self.duration_ms as f64);
        let lerp = |a: f64, b: f64| a + (b - a) * t;
        ZoomTransform {
            k: lerp(self.from.k, self.to.k),
            x: lerp(self.from.x, self.to.x),
            y: lerp(self.from.y, self.to.y),
        }
    }
}

/// Pan/zoom state of the viewer page. The page script applies the same rules to wheel and drag
/// events; [`crate::html::ViewerConfig`] is built from its initial auto-fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub extent: ScaleExtent,
    pub transform: ZoomTransform,
}

impl Viewport {
    pub fn new(width: f64, height: f64, extent: ScaleExtent) -> Self {
        Self {
            width,
            height,
            extent,
            transform: ZoomTransform::IDENTITY,
        }
    }

    /// Multiplies the scale by `factor` around `focal`, clamped to the scale extent.
    pub fn zoom_by(&mut self, factor: f64, focal: (f64, f64)) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let k = self.extent.clamp(self.transform.k * factor);
        self.transform = self.transform.scale_to(k, focal);
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform.translate_by(dx, dy);
    }

    /// Starts the auto-fit transition and jumps the state to its end. Leaves the transform
    /// untouched and returns `None` when there is nothing to fit.
    pub fn auto_fit(
        &mut self,
        bounds: Option<&Bounds>,
        fraction: f64,
        duration_ms: u64,
    ) -> Option<Transition> {
        let to = fit_transform(bounds, self.width, self.height, fraction)?;
        let transition = Transition {
            from: self.transform,
            to,
            duration_ms,
        };
        self.transform = to;
        Some(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn fit_centers_content() {
        let b = Bounds {
            min_x: 100.0,
            min_y: 50.0,
            max_x: 300.0,
            max_y: 150.0,
        };
        let t = fit_transform(Some(&b), 400.0, 400.0, 1.0).unwrap();
        assert!(close(t.k, 2.0));
        let (x0, _) = t.apply((100.0, 50.0));
        let (x1, _) = t.apply((300.0, 150.0));
        assert!(close(x0, 0.0));
        assert!(close(x1, 400.0));
        let (_, cy) = t.apply((200.0, 100.0));
        assert!(close(cy, 200.0));
    }

    #[test]
    fn degenerate_bounds_do_not_fit() {
        let point = Bounds {
            min_x: 5.0,
            min_y: 5.0,
            max_x: 5.0,
            max_y: 5.0,
        };
        assert!(fit_transform(Some(&point), 400.0, 400.0, 0.98).is_none());
        assert!(fit_transform(None, 400.0, 400.0, 0.98).is_none());

        let mut vp = Viewport::new(400.0, 400.0, ScaleExtent::default());
        vp.pan(10.0, 0.0);
        let before = vp.transform;
        assert!(vp.auto_fit(None, 0.98, 750).is_none());
        assert_eq!(vp.transform, before);
    }

    #[test]
    fn zoom_is_clamped_and_keeps_focal_point() {
        let mut vp = Viewport::new(400.0, 400.0, ScaleExtent::default());
        let focal = (120.0, 80.0);
        let content = vp.transform.invert(focal);
        vp.zoom_by(100.0, focal);
        assert_eq!(vp.transform.k, 4.0);
        let (sx, sy) = vp.transform.apply(content);
        assert!(close(sx, focal.0) && close(sy, focal.1));
        vp.zoom_by(0.0001, focal);
        assert_eq!(vp.transform.k, 0.1);
    }

    #[test]
    fn transition_endpoints() {
        let tr = Transition {
            from: ZoomTransform::IDENTITY,
            to: ZoomTransform {
                k: 2.0,
                x: 10.0,
                y: -4.0,
            },
            duration_ms: 750,
        };
        assert_eq!(tr.at(0.0), ZoomTransform::IDENTITY);
        assert_eq!(tr.at(750.0), tr.to);
        assert!(close(tr.at(375.0).k, 1.5));
    }
}

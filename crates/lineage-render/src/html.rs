//! Standalone viewer page: the SVG plus a small script for wheel zoom, drag pan, tooltips and the
//! animated initial fit.

use crate::Result;
use crate::model::TreeLayout;
use crate::svg::{SvgRenderOptions, escape_xml, render_tree_svg};
use crate::viewport::{ScaleExtent, Viewport, ZoomTransform};
use lineage_core::{TreeConfig, TreeData};
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct HtmlRenderOptions {
    pub title: String,
    pub svg: SvgRenderOptions,
}

impl Default for HtmlRenderOptions {
    fn default() -> Self {
        Self {
            title: "Family tree".to_string(),
            svg: SvgRenderOptions {
                apply_fit: false,
                ..SvgRenderOptions::default()
            },
        }
    }
}

/// Viewer state handed to the page script.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerConfig {
    pub initial: ZoomTransform,
    /// `None` when there is nothing to fit; the script then leaves the transform alone.
    pub target: Option<ZoomTransform>,
    pub extent: ScaleExtent,
    pub duration_ms: u64,
}

impl ViewerConfig {
    /// Runs the initial auto-fit on a fresh [`Viewport`]; the script replays the transition.
    pub fn new(layout: &TreeLayout, config: &TreeConfig) -> Self {
        let mut viewport = Viewport::new(
            config.layout.width,
            config.layout.height,
            ScaleExtent {
                min: config.svg.min_scale,
                max: config.svg.max_scale,
            },
        );
        let transition = viewport.auto_fit(
            layout.bounds.as_ref(),
            config.svg.viewport_fit,
            config.svg.transition_ms,
        );
        Self {
            initial: transition.map_or(viewport.transform, |t| t.from),
            target: transition.map(|t| t.to),
            extent: viewport.extent,
            duration_ms: config.svg.transition_ms,
        }
    }
}

const VIEWER_SCRIPT: &str = r#"(function () {
  var cfg = JSON.parse(document.getElementById('lineage-viewer').textContent);
  var svg = document.querySelector('svg.lineage-tree');
  var vp = svg.querySelector('g.viewport');
  var tip = document.getElementById('lineage-tooltip');
  var t = { k: cfg.initial.k, x: cfg.initial.x, y: cfg.initial.y };
  var anim = null;

  function apply() {
    vp.setAttribute('transform', 'translate(' + t.x + ',' + t.y + ') scale(' + t.k + ')');
  }
  function local(e) {
    var m = svg.getScreenCTM();
    if (!m) return [e.clientX, e.clientY];
    var p = svg.createSVGPoint();
    p.x = e.clientX; p.y = e.clientY;
    p = p.matrixTransform(m.inverse());
    return [p.x, p.y];
  }
  function clamp(k) {
    return Math.min(cfg.extent.max, Math.max(cfg.extent.min, k));
  }
  function ease(u) {
    u = Math.min(1, Math.max(0, u)) * 2;
    return u <= 1 ? u * u * u / 2 : ((u -= 2) * u * u + 2) / 2;
  }

  svg.addEventListener('wheel', function (e) {
    e.preventDefault();
    anim = null;
    var p = local(e);
    var k = clamp(t.k * Math.pow(2, -e.deltaY * (e.deltaMode ? 0.05 : 0.002)));
    var cx = (p[0] - t.x) / t.k, cy = (p[1] - t.y) / t.k;
    t = { k: k, x: p[0] - cx * k, y: p[1] - cy * k };
    apply();
  }, { passive: false });

  var drag = null;
  svg.addEventListener('pointerdown', function (e) {
    if (e.button !== 0) return;
    anim = null;
    drag = { p: local(e), x: t.x, y: t.y, moved: false };
  });
  window.addEventListener('pointermove', function (e) {
    if (!drag) return;
    var p = local(e);
    var dx = p[0] - drag.p[0], dy = p[1] - drag.p[1];
    if (Math.abs(dx) + Math.abs(dy) > 2) drag.moved = true;
    t = { k: t.k, x: drag.x + dx, y: drag.y + dy };
    apply();
  });
  window.addEventListener('pointerup', function () {
    if (drag && drag.moved) {
      svg.addEventListener('click', function (e) { e.preventDefault(); e.stopPropagation(); },
        { capture: true, once: true });
    }
    drag = null;
  });

  svg.querySelectorAll('g.node').forEach(function (node) {
    node.addEventListener('mouseenter', function () {
      tip.textContent = node.getAttribute('data-tooltip');
      tip.style.borderColor = node.getAttribute('data-color');
      tip.style.display = 'block';
    });
    node.addEventListener('mousemove', function (e) {
      tip.style.left = (e.pageX + 12) + 'px';
      tip.style.top = (e.pageY + 12) + 'px';
    });
    node.addEventListener('mouseleave', function () {
      tip.style.display = 'none';
    });
  });

  apply();
  if (cfg.target) {
    var from = { k: t.k, x: t.x, y: t.y }, to = cfg.target, start = null;
    anim = function (now) {
      if (anim === null) return;
      if (start === null) start = now;
      var u = cfg.durationMs > 0 ? ease((now - start) / cfg.durationMs) : 1;
      t = { k: from.k + (to.k - from.k) * u, x: from.x + (to.x - from.x) * u,
            y: from.y + (to.y - from.y) * u };
      apply();
      if (u < 1) requestAnimationFrame(anim);
    };
    requestAnimationFrame(anim);
  }
})();"#;

pub fn render_tree_html(
    layout: &TreeLayout,
    data: &TreeData,
    config: &TreeConfig,
    options: &HtmlRenderOptions,
) -> Result<String> {
    let svg = render_tree_svg(layout, data, config, &options.svg)?;
    let viewer = serde_json::to_string(&ViewerConfig::new(layout, config))?.replace("</", "<\\/");

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(&mut out, "<title>{}</title>", escape_xml(&options.title));
    let _ = writeln!(
        &mut out,
        "<style>html,body{{margin:0;height:100%;background:{bg}}}svg.lineage-tree{{display:block;width:100vw;height:100vh;touch-action:none}}#lineage-tooltip{{position:absolute;display:none;pointer-events:none;white-space:pre-line;background:#fff;border:2px solid #999;border-radius:4px;padding:4px 8px;font:13px sans-serif}}</style>",
        bg = escape_xml(&config.style.background)
    );
    out.push_str("</head>\n<body>\n");
    out.push_str(&svg);
    out.push_str("\n<div id=\"lineage-tooltip\"></div>\n");
    let _ = writeln!(
        &mut out,
        "<script type=\"application/json\" id=\"lineage-viewer\">{viewer}</script>"
    );
    let _ = writeln!(&mut out, "<script>{VIEWER_SCRIPT}</script>");
    out.push_str("</body>\n</html>\n");
    Ok(out)
}

mod util;

use crate::model::TreeLayout;
use crate::tooltip::Tooltip;
use crate::viewport::{ZoomTransform, fit_transform};
use crate::{Error, Result, assets};
use lineage_core::config::SvgConfig;
use lineage_core::{TreeConfig, TreeData, slug};
use std::fmt::Write as _;

pub use util::{cubic_path, escape_xml, escape_xml_into, fmt, fmt_into, fmt_path};

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Root element id; also prefixes clip-path ids so several trees can share a page.
    pub diagram_id: String,
    /// When true, the viewport group carries the auto-fit transform. When false it starts at the
    /// identity (the HTML page animates to the fit itself).
    pub apply_fit: bool,
    /// Emits the hover/cursor `<style>` block.
    pub include_style: bool,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: "lineage".to_string(),
            apply_fit: true,
            include_style: true,
        }
    }
}

pub(crate) fn validate_svg_config(svg: &SvgConfig) -> Result<()> {
    if !(svg.min_scale > 0.0 && svg.max_scale >= svg.min_scale && svg.max_scale.is_finite()) {
        return Err(Error::InvalidConfig {
            message: format!(
                "svg scale extent must satisfy 0 < min_scale <= max_scale, got [{}, {}]",
                svg.min_scale, svg.max_scale
            ),
        });
    }
    if !(svg.viewport_fit > 0.0 && svg.viewport_fit <= 1.0) {
        return Err(Error::InvalidConfig {
            message: format!("svg.viewport_fit must be in (0, 1], got {}", svg.viewport_fit),
        });
    }
    Ok(())
}

/// The transform the viewer settles on after the initial animation.
pub fn target_transform(layout: &TreeLayout, config: &TreeConfig) -> Option<ZoomTransform> {
    fit_transform(
        layout.bounds.as_ref(),
        config.layout.width,
        config.layout.height,
        config.svg.viewport_fit,
    )
}

pub fn render_tree_svg(
    layout: &TreeLayout,
    data: &TreeData,
    config: &TreeConfig,
    options: &SvgRenderOptions,
) -> Result<String> {
    validate_svg_config(&config.svg)?;

    let style = &config.style;
    let labels = &config.labels;
    let width = config.layout.width;
    let height = config.layout.height;
    let diagram_id = escape_xml(&options.diagram_id);

    let fit = target_transform(layout, config);
    let initial = if options.apply_fit {
        fit.unwrap_or(ZoomTransform::IDENTITY)
    } else {
        ZoomTransform::IDENTITY
    };

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" id="{id}" class="lineage-tree" width="{w}" height="{h}" viewBox="0 0 {w} {h}" style="background-color: {bg};" data-min-scale="{min}" data-max-scale="{max}""#,
        id = diagram_id,
        w = fmt(width),
        h = fmt(height),
        bg = escape_xml(&style.background),
        min = fmt(config.svg.min_scale),
        max = fmt(config.svg.max_scale),
    );
    if let Some(fit) = fit {
        let _ = write!(&mut out, r#" data-fit-transform="{}""#, fit.to_svg_attr());
    }
    out.push('>');

    if options.include_style {
        let _ = write!(
            &mut out,
            "<style>#{id} .node{{cursor:pointer}}#{id} .node:hover .node-bg{{stroke-width:3}}#{id} text{{font-family:sans-serif;pointer-events:none}}</style>",
            id = diagram_id
        );
    }

    out.push_str("<defs>");
    for p in &layout.persons {
        let _ = write!(
            &mut out,
            r#"<clipPath id="{id}-clip-{idx}"><circle cx="0" cy="0" r="{r}"/></clipPath>"#,
            id = diagram_id,
            idx = p.index,
            r = fmt(p.r)
        );
    }
    out.push_str("</defs>");

    let _ = write!(
        &mut out,
        r#"<g class="viewport" transform="{}">"#,
        initial.to_svg_attr()
    );

    out.push_str(r#"<g class="droplets">"#);
    for link in &layout.parent_links {
        let d = &link.droplet;
        let _ = write!(
            &mut out,
            r#"<rect class="droplet" x="{}" y="{}" width="{}" height="{}" rx="{r}" ry="{r}" fill="{}"/>"#,
            fmt(d.x),
            fmt(d.y),
            fmt(d.width),
            fmt(d.height),
            escape_xml(&style.droplet_fill),
            r = fmt(d.corner_radius),
        );
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="partner-lines">"#);
    for l in &layout.partner_lines {
        let _ = write!(
            &mut out,
            r#"<line class="partner-line" data-anchor="{}" data-partner="{}" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
            escape_xml(l.anchor.as_str()),
            escape_xml(l.partner.as_str()),
            fmt(l.x1),
            fmt(l.y1),
            fmt(l.x2),
            fmt(l.y2),
            escape_xml(&style.partner_line_color),
            fmt(style.partner_line_width),
        );
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="parent-links">"#);
    for link in &layout.parent_links {
        let stroke = escape_xml(&style.parent_line_color);
        let stroke_width = fmt(style.parent_line_width);
        let _ = write!(
            &mut out,
            r#"<path class="parent-link trunk" d="{}" fill="none" stroke="{stroke}" stroke-width="{stroke_width}"/>"#,
            cubic_path(&link.trunk)
        );
        for (child, branch) in link.children.iter().zip(&link.branches) {
            let _ = write!(
                &mut out,
                r#"<path class="parent-link branch" data-child="{}" d="{}" fill="none" stroke="{stroke}" stroke-width="{stroke_width}"/>"#,
                escape_xml(child.as_str()),
                cubic_path(branch)
            );
        }
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="nodes">"#);
    for p in &layout.persons {
        let Some(person) = data.persons.get(p.index) else {
            continue;
        };
        let r = p.r;
        let tooltip = Tooltip::for_person(person, style);
        let tooltip_text = tooltip.text();

        let mut class = format!("node gender-{}", person.gender.as_str());
        if assets::has_detail_page(&p.folder_id, &config.links) {
            class.push_str(" has-detail");
        }

        let _ = write!(
            &mut out,
            r#"<a href="{}" target="_blank">"#,
            escape_xml(&slug::detail_url(person, &config.links))
        );
        let _ = write!(
            &mut out,
            r#"<g class="{class}" transform="translate({},{})" data-id="{}" data-folder="{}" data-tooltip="{}" data-color="{}">"#,
            fmt(p.x),
            fmt(p.y),
            escape_xml(p.id.as_str()),
            escape_xml(&p.folder_id),
            escape_xml(&tooltip_text),
            escape_xml(&tooltip.color),
        );
        let _ = write!(&mut out, "<title>{}</title>", escape_xml(&tooltip_text));
        let _ = write!(
            &mut out,
            r#"<circle class="node-bg" r="{}" fill="{}" stroke="{}" stroke-width="1.5"/>"#,
            fmt(r),
            escape_xml(&style.node_fill),
            escape_xml(&style.node_stroke),
        );
        if style.gender_ring {
            let _ = write!(
                &mut out,
                r#"<circle class="gender-ring" r="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
                fmt(r + 3.0),
                escape_xml(&tooltip.color),
            );
        }
        let _ = write!(
            &mut out,
            r#"<image href="{}" x="{}" y="{}" width="{d}" height="{d}" clip-path="url(#{}-clip-{})" preserveAspectRatio="xMidYMid slice"/>"#,
            escape_xml(&assets::photo_href(person, &config.svg, r)),
            fmt(-r),
            fmt(-r),
            diagram_id,
            p.index,
            d = fmt(r * 2.0),
        );

        let label = &p.label;
        let _ = write!(
            &mut out,
            r#"<text class="name" text-anchor="middle" font-size="{}">"#,
            fmt(labels.font_size)
        );
        for (i, line) in label.lines.iter().enumerate() {
            let dy = if i == 0 {
                label.first_baseline
            } else {
                labels.line_height
            };
            let _ = write!(
                &mut out,
                r#"<tspan x="0" dy="{}">{}</tspan>"#,
                fmt(dy),
                escape_xml(line)
            );
        }
        out.push_str("</text>");

        if let Some(y) = label.id_y {
            let _ = write!(
                &mut out,
                r##"<text class="person-id" text-anchor="middle" y="{}" font-size="{}" fill="#555">{}</text>"##,
                fmt(y),
                fmt(labels.id_font_size),
                escape_xml(p.id.as_str())
            );
        }

        out.push_str("</g></a>");
    }
    out.push_str("</g>");

    out.push_str("</g></svg>");
    Ok(out)
}

//! Photo references and detail-page lookups for nodes.

use base64::Engine as _;
use lineage_core::Person;
use lineage_core::config::{LinkConfig, SvgConfig};
use std::path::Path;

fn mime_for(file: &str) -> Option<&'static str> {
    let ext = Path::new(file).extension()?.to_str()?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => return None,
    })
}

/// `data:` URI for `dir/file`, or `None` when it cannot be read or has an unknown image type.
pub fn inline_photo(dir: &Path, file: &str) -> Option<String> {
    let mime = mime_for(file)?;
    let bytes = match std::fs::read(dir.join(file)) {
        Ok(b) => b,
        Err(err) => {
            tracing::debug!(file, %err, "photo not inlined");
            return None;
        }
    };
    Some(format!(
        "data:{mime};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    ))
}

pub fn placeholder_url(svg: &SvgConfig, radius: f64) -> String {
    let size = crate::svg::fmt((radius * 2.0).round());
    format!(
        "{}/{size}x{size}/bbbbbb/333333?text=?",
        svg.placeholder_base.trim_end_matches('/')
    )
}

/// Image href for a node: inlined photo, relative photo path, or the placeholder.
pub fn photo_href(person: &Person, svg: &SvgConfig, radius: f64) -> String {
    let Some(file) = person.photo() else {
        return placeholder_url(svg, radius);
    };
    if let Some(uri) = svg
        .inline_photos_from
        .as_deref()
        .and_then(|dir| inline_photo(dir, file))
    {
        return uri;
    }
    let dir = svg.photo_dir.trim_end_matches('/');
    if dir.is_empty() {
        file.to_string()
    } else {
        format!("{dir}/{file}")
    }
}

/// The person's detail folder exists under `links.detail_root`.
pub fn has_detail_page(folder_id: &str, links: &LinkConfig) -> bool {
    links
        .detail_root
        .as_deref()
        .is_some_and(|root| root.join(folder_id).is_dir())
}

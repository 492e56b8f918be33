use std::fmt::Write as _;

/// Shortest round-trippable form (JS `Number#toString`), without `-0` or float noise.
pub fn fmt(v: f64) -> String {
    let mut out = String::new();
    fmt_into(&mut out, v);
    out
}

pub fn fmt_into(out: &mut String, v: f64) {
    if !v.is_finite() {
        out.push('0');
        return;
    }
    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    if v == -0.0 {
        v = 0.0;
    }
    let mut buf = ryu_js::Buffer::new();
    out.push_str(buf.format_finite(v));
}

/// Path data uses at most three fractional digits.
pub fn fmt_path(v: f64) -> String {
    if !v.is_finite() || v.abs() < 0.0005 {
        return "0".to_string();
    }
    fmt((v * 1000.0).round() / 1000.0)
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_xml_into(&mut out, text);
    out
}

pub fn escape_xml_into(out: &mut String, text: &str) {
    let mut start = 0usize;
    for (i, b) in text.bytes().enumerate() {
        let esc = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            b'\n' => "&#10;",
            _ => continue,
        };
        out.push_str(&text[start..i]);
        out.push_str(esc);
        start = i + 1;
    }
    out.push_str(&text[start..]);
}

/// `M x,y C c1 c2 end` for one cubic segment.
pub fn cubic_path(curve: &crate::model::CubicCurve) -> String {
    let mut d = String::new();
    let p = |pt: crate::model::LayoutPoint| format!("{},{}", fmt_path(pt.x), fmt_path(pt.y));
    let _ = write!(
        &mut d,
        "M{}C{} {} {}",
        p(curve.start),
        p(curve.c1),
        p(curve.c2),
        p(curve.end)
    );
    d
}

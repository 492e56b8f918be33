use crate::model::NodeLabel;
use lineage_core::config::{LabelConfig, LabelStrategy};
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
    pub font_weight: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 12.0,
            font_weight: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// Font-free measurer: every column is `font_size × char_width_factor` wide, with East Asian wide
/// characters counting as two columns.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };

        let font_size = style.font_size.max(1.0);
        let lines: Vec<&str> = text.split('\n').collect();
        let max_cols = lines
            .iter()
            .map(|line| line.chars().map(|c| c.width().unwrap_or(0)).sum::<usize>())
            .max()
            .unwrap_or(0);

        TextMetrics {
            width: max_cols as f64 * font_size * char_width_factor,
            height: lines.len() as f64 * font_size * line_height_factor,
            line_count: lines.len(),
        }
    }
}

/// Latin and Cyrillic vowels.
pub fn is_vowel(c: char) -> bool {
    c.to_lowercase().all(|l| "aeiouауоыиэяюёе".contains(l))
}

/// Splits a long name into two lines at the vowel nearest the middle, searching leftwards from
/// the midpoint; falls back to a hard midpoint split. Names of at most `max_chars` characters
/// come back unchanged as a single line.
pub fn split_name(name: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_chars {
        return vec![name.to_string()];
    }
    let mid = chars.len() / 2;
    let at = (2..=mid).rev().find(|&i| is_vowel(chars[i])).unwrap_or(mid);
    vec![chars[..at].iter().collect(), chars[at..].iter().collect()]
}

/// Cuts `name` so that it plus `…` fits `max_width`. The cut moves back up to six characters to
/// land right after a vowel when it can.
pub fn truncate_with_ellipsis(
    name: &str,
    max_width: f64,
    measurer: &dyn TextMeasurer,
    style: &TextStyle,
) -> String {
    const ELLIPSIS: char = '…';
    const VOWEL_LOOKBACK: usize = 6;

    if measurer.measure(name, style).width <= max_width {
        return name.to_string();
    }
    let chars: Vec<char> = name.chars().collect();
    let fits = |n: usize| {
        let mut s: String = chars[..n].iter().collect();
        s.push(ELLIPSIS);
        measurer.measure(&s, style).width <= max_width
    };
    let Some(cut) = (0..chars.len()).rev().find(|&n| fits(n)) else {
        return ELLIPSIS.to_string();
    };
    let soft = (cut.saturating_sub(VOWEL_LOOKBACK).max(1)..=cut)
        .rev()
        .find(|&i| i > 0 && is_vowel(chars[i - 1]));
    let cut = soft.unwrap_or(cut);

    let mut out: String = chars[..cut].iter().collect();
    out.push(ELLIPSIS);
    out
}

/// Applies the configured label strategy. Always returns at least one line.
pub fn shorten_name(
    name: &str,
    labels: &LabelConfig,
    radius: f64,
    measurer: &dyn TextMeasurer,
) -> Vec<String> {
    match labels.strategy {
        LabelStrategy::TwoLine => split_name(name, labels.max_chars),
        LabelStrategy::Ellipsis => {
            let style = TextStyle {
                font_size: labels.font_size,
                ..TextStyle::default()
            };
            let max_width = labels.max_width.unwrap_or(radius * 2.5);
            vec![truncate_with_ellipsis(name, max_width, measurer, &style)]
        }
    }
}

/// Share of the font size drawn below the baseline.
const DESCENT: f64 = 0.25;

/// Lays out the labels under one node: the shortened name lines and, when enabled, the id below
/// them.
pub fn node_label(
    name: &str,
    id: &str,
    labels: &LabelConfig,
    radius: f64,
    measurer: &dyn TextMeasurer,
) -> NodeLabel {
    let lines = shorten_name(name, labels, radius, measurer);
    let name_style = TextStyle {
        font_size: labels.font_size,
        ..TextStyle::default()
    };
    let mut width = lines
        .iter()
        .map(|line| measurer.measure(line, &name_style).width)
        .fold(0.0, f64::max);

    let first_baseline = radius + 10.0;
    let last_baseline = first_baseline + labels.line_height * (lines.len() as f64 - 1.0);
    let mut bottom = last_baseline + labels.font_size * DESCENT;

    let id_y = labels.show_id.then(|| {
        let y = last_baseline + labels.line_height + 4.0;
        let id_style = TextStyle {
            font_size: labels.id_font_size,
            ..TextStyle::default()
        };
        width = width.max(measurer.measure(id, &id_style).width);
        bottom = bottom.max(y + labels.id_font_size * DESCENT);
        y
    });

    NodeLabel {
        lines,
        first_baseline,
        id_y,
        width,
        bottom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_prefers_vowel_left_of_middle() {
        // A0 l1 e2 x3 a4 n5 d6 r7 o8 v9: mid = 5, first vowel leftwards is index 4.
        assert_eq!(split_name("Alexandrov", 9), vec!["Alex", "androv"]);
        assert_eq!(split_name("Светлана Алексеевна", 9).len(), 2);
    }

    #[test]
    fn split_falls_back_to_midpoint() {
        assert_eq!(split_name("bcdfghjklm", 9), vec!["bcdfg", "hjklm"]);
    }

    #[test]
    fn short_names_are_untouched() {
        assert_eq!(split_name("Anna", 9), vec!["Anna"]);
        assert_eq!(split_name("", 9), vec![""]);
        let lines = split_name("Alexandrov", 9);
        for line in &lines {
            assert_eq!(split_name(line, 9), vec![line.clone()]);
        }
    }

    #[test]
    fn ellipsis_is_idempotent() {
        let m = DeterministicTextMeasurer::default();
        let style = TextStyle::default();
        // 12px * 0.6 = 7.2px per char; 50px fits 6 chars.
        let once = truncate_with_ellipsis("Konstantinopolsky", 50.0, &m, &style);
        assert!(once.ends_with('…'));
        assert!(m.measure(&once, &style).width <= 50.0);
        assert_eq!(truncate_with_ellipsis(&once, 50.0, &m, &style), once);
        assert_eq!(truncate_with_ellipsis("Ivan", 50.0, &m, &style), "Ivan");
    }

    #[test]
    fn node_label_places_id_under_the_last_line() {
        let m = DeterministicTextMeasurer::default();
        let labels = LabelConfig::default();

        let short = node_label("Anna", "12", &labels, 20.0, &m);
        assert_eq!(short.lines, vec!["Anna"]);
        assert_eq!(short.id_y, Some(48.0));

        let long = node_label("Konstantinopolsky", "12", &labels, 20.0, &m);
        assert_eq!(long.lines.len(), 2);
        assert_eq!(long.id_y, Some(62.0));
        assert_eq!(long.bottom, 62.0 + 2.5);
        // Split at the 'i': "Konstant" + "inopolsky", 9 columns of 7.2px.
        assert_eq!(long.lines, vec!["Konstant", "inopolsky"]);
        assert!((long.width - 64.8).abs() < 1e-9);

        let hidden = LabelConfig {
            show_id: false,
            ..LabelConfig::default()
        };
        let no_id = node_label("Anna", "12", &hidden, 20.0, &m);
        assert_eq!(no_id.id_y, None);
        assert_eq!(no_id.bottom, 30.0 + 3.0);
    }

    #[test]
    fn ellipsis_prefers_vowel_boundary() {
        let m = DeterministicTextMeasurer::default();
        let style = TextStyle::default();
        // Hard cut fits 5 chars "Konst"; backing off lands after the 'o' of "Ko".
        assert_eq!(
            truncate_with_ellipsis("Konstantinopolsky", 50.0, &m, &style),
            "Ko…"
        );
    }
}

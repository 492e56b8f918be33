mod tree;

pub use tree::{
    LabelConfig, LabelStrategy, LayoutConfig, LinkConfig, MissingGeneration, StyleConfig,
    SvgConfig, TreeConfig,
};

use crate::{Error, Result};
use serde_json::{Map, Value};

/// Untyped configuration layer: defaults, a config file, and `key=value` overrides are stacked
/// here before being read as a [`TreeConfig`].
///
/// Objects merge key by key and any other value replaces what was there. A `null` removes the
/// key, so the typed default applies again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument(Map<String, Value>);

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(Error::InvalidConfig {
                message: "config root must be an object".to_string(),
            }),
        }
    }

    /// Parses a JSON5 config file (plain JSON is valid JSON5).
    pub fn from_json5(text: &str) -> Result<Self> {
        let value: Value = json5::from_str(text).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })?;
        Self::from_value(value)
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let (first, rest) = match dotted_path.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (dotted_path, None),
        };
        let mut cur = self.0.get(first)?;
        for segment in rest.into_iter().flat_map(|r| r.split('.')) {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.get(dotted_path)?.as_f64()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.get(dotted_path)?.as_bool()
    }

    /// Stacks `upper` on top of this document.
    pub fn layer(&mut self, upper: ConfigDocument) {
        layer_map(&mut self.0, upper.0);
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        let mut segments = dotted_path.rsplit('.');
        let Some(leaf) = segments.next() else {
            return;
        };
        let mut upper = Map::new();
        upper.insert(leaf.to_string(), value);
        for segment in segments {
            let mut parent = Map::new();
            parent.insert(segment.to_string(), Value::Object(upper));
            upper = parent;
        }
        layer_map(&mut self.0, upper);
    }

    /// Applies a `path=value` override. The value is read as JSON when it parses, otherwise as a
    /// bare string (`labels.strategy=ellipsis`).
    pub fn set_override(&mut self, assignment: &str) -> Result<()> {
        let Some((path, raw)) = assignment.split_once('=') else {
            return Err(Error::InvalidConfig {
                message: format!("expected key=value, got {assignment:?}"),
            });
        };
        let path = path.trim();
        if path.is_empty() || path.split('.').any(str::is_empty) {
            return Err(Error::InvalidConfig {
                message: format!("malformed key in {assignment:?}"),
            });
        }
        let raw = raw.trim();
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::from(raw));
        self.set_value(path, value);
        Ok(())
    }

    pub fn to_tree_config(&self) -> Result<TreeConfig> {
        TreeConfig::from_value(&Value::Object(self.0.clone()))
    }
}

fn layer_map(lower: &mut Map<String, Value>, upper: Map<String, Value>) {
    for (key, value) in upper {
        match value {
            Value::Null => {
                lower.remove(&key);
            }
            Value::Object(upper_inner) => match lower.get_mut(&key) {
                Some(Value::Object(lower_inner)) => layer_map(lower_inner, upper_inner),
                _ => {
                    let mut fresh = Map::new();
                    layer_map(&mut fresh, upper_inner);
                    lower.insert(key, Value::Object(fresh));
                }
            },
            other => {
                lower.insert(key, other);
            }
        }
    }
}

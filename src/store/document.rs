//! The configuration document and path-addressed field access.
//!
//! The backend serves its configuration as one nested JSON object
//! (`llm`, `whisper`, `output`, `app`, `processing`).  The console never
//! models it as fixed structs: fields the backend adds show up in the
//! document untouched and survive a save round trip.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Suffix of the server-masked secret keys (`llm_api_key_preview`, ...).
pub const PREVIEW_SUFFIX: &str = "_preview";

/// Join path segments into the dotted form used by env-override keys.
pub fn dotted(path: &[&str]) -> String {
    path.join(".")
}

// ---------------------------------------------------------------------------
// ConfigDocument
// ---------------------------------------------------------------------------

/// A nested configuration mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument(Map<String, Value>);

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON value; anything but an object yields an empty
    /// document.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value at `path`, or `None` if any segment is missing or a
    /// non-object is found on the way.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.0.get(*first)?;
        for key in rest {
            current = current.as_object()?.get(*key)?;
        }
        Some(current)
    }

    pub fn get_str(&self, path: &[&str]) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn get_bool(&self, path: &[&str]) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    /// Write `value` at `path`, creating intermediate objects as needed.
    ///
    /// A non-object found on the way is replaced by an object.  An empty
    /// path is ignored.
    pub fn set(&mut self, path: &[&str], value: Value) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut current = &mut self.0;
        for key in parents {
            let slot = current
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = match slot {
                Value::Object(map) => map,
                _ => unreachable!("slot was just made an object"),
            };
        }
        current.insert(last.to_string(), value);
    }

    /// Dotted paths of every leaf in `self` that differs from `baseline`
    /// (changed or newly added), in key order.  Leaves removed from
    /// `self` are not reported: the draft only ever grows.
    pub fn changed_paths(&self, baseline: &ConfigDocument) -> Vec<String> {
        let mut out = Vec::new();
        diff_into(&self.0, Some(&baseline.0), &mut Vec::new(), &mut out);
        out
    }

    /// A document containing only the leaves listed in `paths`, with their
    /// values taken from `self`.
    pub fn subset(&self, paths: &[String]) -> ConfigDocument {
        let mut out = ConfigDocument::new();
        for dotted_path in paths {
            let segments: Vec<&str> = dotted_path.split('.').collect();
            if let Some(value) = self.get(&segments) {
                out.set(&segments, value.clone());
            }
        }
        out
    }

    /// Remove every `*_preview` key one level below the sections.  Previews
    /// are server output and must not be sent back.
    pub fn strip_previews(&mut self) {
        for section in self.0.values_mut() {
            if let Value::Object(map) = section {
                map.retain(|key, _| !key.ends_with(PREVIEW_SUFFIX));
            }
        }
    }

    /// Copy every `*_preview` key of `other` into `self`.
    pub fn merge_previews_from(&mut self, other: &ConfigDocument) {
        for (section, value) in &other.0 {
            let Value::Object(map) = value else { continue };
            for (key, preview) in map {
                if key.ends_with(PREVIEW_SUFFIX) {
                    self.set(&[section.as_str(), key.as_str()], preview.clone());
                }
            }
        }
    }

    /// Write every leaf of `other` into `self`.  Leaves `other` lacks are
    /// kept.
    pub fn overlay(&mut self, other: &ConfigDocument) {
        overlay_into(&mut self.0, &other.0);
    }
}

fn overlay_into(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        if let (Some(Value::Object(t)), Value::Object(s)) = (target.get_mut(key), value) {
            overlay_into(t, s);
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
}

fn diff_into(
    draft: &Map<String, Value>,
    baseline: Option<&Map<String, Value>>,
    prefix: &mut Vec<String>,
    out: &mut Vec<String>,
) {
    for (key, value) in draft {
        let base = baseline.and_then(|b| b.get(key));
        prefix.push(key.clone());
        match value {
            Value::Object(child) => {
                diff_into(child, base.and_then(Value::as_object), prefix, out);
            }
            leaf => {
                if base != Some(leaf) {
                    out.push(prefix.join("."));
                }
            }
        }
        prefix.pop();
    }
}

// ---------------------------------------------------------------------------
// Input coercion
// ---------------------------------------------------------------------------

/// How a text input maps onto a numeric config field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberInput {
    /// Required field; an empty input means `0`.
    Required,
    /// Nullable field; an empty input means `null`.
    Nullable,
}

/// Convert a raw input string for a numeric field.
///
/// Integers stay integers so they round-trip without a `.0`.  Returns
/// `None` for non-numeric input, which the caller treats as a rejected edit.
///
/// ```
/// use podly_console::store::{coerce_number, NumberInput};
/// use serde_json::json;
///
/// assert_eq!(coerce_number("42", NumberInput::Required), Some(json!(42)));
/// assert_eq!(coerce_number("0.85", NumberInput::Required), Some(json!(0.85)));
/// assert_eq!(coerce_number("", NumberInput::Nullable), Some(json!(null)));
/// assert_eq!(coerce_number("", NumberInput::Required), Some(json!(0)));
/// assert_eq!(coerce_number("abc", NumberInput::Required), None);
/// ```
pub fn coerce_number(input: &str, kind: NumberInput) -> Option<Value> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Some(match kind {
            NumberInput::Nullable => Value::Null,
            NumberInput::Required => Value::from(0),
        });
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Value::from(i));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

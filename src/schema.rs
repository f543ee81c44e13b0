//! Path-tracking readers over untyped JSON.
//!
//! [`Fields`] wraps one JSON object and reads typed fields out of it. Every
//! failure becomes [`Error::Schema`] carrying the dotted path of the field,
//! e.g. `hits[3]._highlightResult.title.matchLevel`. The per-kind hit
//! readers in [`validate`](crate::validate) are built entirely from these
//! primitives, so the five kinds apply the same rules.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::models::{Highlight, MatchLevel, Nullable};

/// Highlight keys expected on one item kind.
#[derive(Debug, Clone, Copy)]
pub struct HighlightShape {
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
    /// Reject keys outside `required` and `optional`.
    pub strict: bool,
}

/// A JSON object plus the path that led to it.
pub struct Fields<'a> {
    path: String,
    map: &'a Map<String, Value>,
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expected(path: &str, what: &str, value: &Value) -> Error {
    Error::schema(path, format!("expected {}, got {}", what, type_name(value)))
}

fn as_integer(path: &str, value: &Value) -> Result<i64> {
    value.as_i64().ok_or_else(|| expected(path, "integer", value))
}

fn as_unsigned(path: &str, value: &Value) -> Result<u64> {
    value
        .as_u64()
        .ok_or_else(|| expected(path, "non-negative integer", value))
}

impl<'a> Fields<'a> {
    /// Wrap `value`, which must be a JSON object. `path` is `""` at the root.
    pub fn new(path: impl Into<String>, value: &'a Value) -> Result<Self> {
        let path = path.into();
        match value {
            Value::Object(map) => Ok(Self { path, map }),
            other => {
                let at = if path.is_empty() { "$" } else { path.as_str() };
                Err(expected(at, "object", other))
            }
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path of a child field.
    pub fn child(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    fn present(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key)
    }

    fn required(&self, key: &str) -> Result<&'a Value> {
        self.present(key)
            .ok_or_else(|| Error::schema(self.child(key), "missing required field"))
    }

    pub fn object(&self, key: &str) -> Result<Fields<'a>> {
        Fields::new(self.child(key), self.required(key)?)
    }

    pub fn string(&self, key: &str) -> Result<String> {
        let value = self.required(key)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| expected(&self.child(key), "string", value))
    }

    pub fn opt_string(&self, key: &str) -> Result<Option<String>> {
        match self.present(key) {
            None => Ok(None),
            Some(_) => self.string(key).map(Some),
        }
    }

    pub fn boolean(&self, key: &str) -> Result<bool> {
        let value = self.required(key)?;
        value
            .as_bool()
            .ok_or_else(|| expected(&self.child(key), "boolean", value))
    }

    pub fn opt_boolean(&self, key: &str) -> Result<Option<bool>> {
        match self.present(key) {
            None => Ok(None),
            Some(_) => self.boolean(key).map(Some),
        }
    }

    pub fn integer(&self, key: &str) -> Result<i64> {
        as_integer(&self.child(key), self.required(key)?)
    }

    pub fn unsigned(&self, key: &str) -> Result<u64> {
        as_unsigned(&self.child(key), self.required(key)?)
    }

    /// An integer that may also be missing or `null`.
    pub fn nullable_integer(&self, key: &str) -> Result<Nullable<i64>> {
        match self.present(key) {
            None => Ok(Nullable::Absent),
            Some(Value::Null) => Ok(Nullable::Null),
            Some(value) => as_integer(&self.child(key), value).map(Nullable::Value),
        }
    }

    fn array(&self, key: &str) -> Result<&'a Vec<Value>> {
        let value = self.required(key)?;
        value
            .as_array()
            .ok_or_else(|| expected(&self.child(key), "array", value))
    }

    pub fn id_list(&self, key: &str) -> Result<Vec<u64>> {
        let path = self.child(key);
        self.array(key)?
            .iter()
            .enumerate()
            .map(|(i, v)| as_unsigned(&format!("{}[{}]", path, i), v))
            .collect()
    }

    /// An id list that defaults to empty when the field is missing.
    pub fn id_list_or_empty(&self, key: &str) -> Result<Vec<u64>> {
        match self.present(key) {
            None => Ok(Vec::new()),
            Some(_) => self.id_list(key),
        }
    }

    pub fn string_list(&self, key: &str) -> Result<Vec<String>> {
        let path = self.child(key);
        self.array(key)?
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| expected(&format!("{}[{}]", path, i), "string", v))
            })
            .collect()
    }

    /// Walk an array of objects, handing each element to `read`.
    pub fn each_object<T>(
        &self,
        key: &str,
        mut read: impl FnMut(Fields<'a>) -> Result<T>,
    ) -> Result<Vec<T>> {
        let path = self.child(key);
        self.array(key)?
            .iter()
            .enumerate()
            .map(|(i, v)| read(Fields::new(format!("{}[{}]", path, i), v)?))
            .collect()
    }

    /// An ISO-8601 timestamp string with a UTC offset or `Z` suffix.
    pub fn timestamp(&self, key: &str) -> Result<DateTime<Utc>> {
        let raw = self.string(key)?;
        let normalized = to_rfc3339(&raw).unwrap_or_else(|| raw.clone());
        DateTime::parse_from_rfc3339(&normalized)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                Error::schema(
                    self.child(key),
                    format!("invalid ISO-8601 timestamp '{}': {}", raw, e),
                )
            })
    }

    /// A numeric id carried as a digit-only string, e.g. `objectID`.
    pub fn digit_id(&self, key: &str) -> Result<u64> {
        let raw = self.string(key)?;
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::schema(
                self.child(key),
                format!("expected a digit-only string, got '{}'", raw),
            ));
        }
        raw.parse()
            .map_err(|_| Error::schema(self.child(key), format!("id '{}' is out of range", raw)))
    }

    /// An optional absolute URL, kept as the original string.
    pub fn opt_url(&self, key: &str) -> Result<Option<String>> {
        let Some(raw) = self.opt_string(key)? else {
            return Ok(None);
        };
        url::Url::parse(&raw)
            .map_err(|e| Error::schema(self.child(key), format!("invalid URL '{}': {}", raw, e)))?;
        Ok(Some(raw))
    }

    /// Fail if the object has keys outside `allowed`.
    pub fn deny_unknown(&self, allowed: &[&str]) -> Result<()> {
        match self.map.keys().find(|k| !allowed.contains(&k.as_str())) {
            Some(extra) => Err(Error::schema(self.child(extra), "unexpected field")),
            None => Ok(()),
        }
    }

    pub fn highlight(&self, key: &str) -> Result<Highlight> {
        read_highlight(self.object(key)?)
    }

    pub fn opt_highlight(&self, key: &str) -> Result<Option<Highlight>> {
        match self.present(key) {
            None => Ok(None),
            Some(_) => self.highlight(key).map(Some),
        }
    }

    /// Open `_highlightResult` and check it against `shape`.
    ///
    /// Only the required keys are checked for presence here; callers pull
    /// the individual highlights with [`highlight`](Self::highlight) and
    /// [`opt_highlight`](Self::opt_highlight).
    pub fn highlights(&self, shape: &HighlightShape) -> Result<Fields<'a>> {
        let highlights = self.object("_highlightResult")?;
        if shape.strict {
            let allowed: Vec<&str> = shape
                .required
                .iter()
                .chain(shape.optional)
                .copied()
                .collect();
            highlights.deny_unknown(&allowed)?;
        }
        for key in shape.required {
            highlights.required(key)?;
        }
        Ok(highlights)
    }
}

/// Rewrite the ISO-8601 forms RFC 3339 leaves out into RFC 3339: a space
/// date/time separator, a comma before the fraction, and `+hhmm` or `+hh`
/// offsets. Anything else is returned as written and left to the parser.
fn to_rfc3339(raw: &str) -> Option<String> {
    let date = raw.get(..10)?;
    let rest = raw.get(10..)?;
    let rest = rest
        .strip_prefix('T')
        .or_else(|| rest.strip_prefix(' '))?
        .replace(',', ".");

    // the clock part has no signs, so the last one starts the offset
    let (clock, offset) = match rest.rfind(['+', '-']) {
        Some(i) => rest.split_at(i),
        None => (rest.as_str(), ""),
    };
    let digits = offset.len() > 1 && offset[1..].bytes().all(|b| b.is_ascii_digit());
    let offset = match offset.len() {
        3 if digits => format!("{}:00", offset),
        5 if digits => format!("{}:{}", &offset[..3], &offset[3..]),
        _ => offset.to_string(),
    };

    Some(format!("{}T{}{}", date, clock, offset))
}

fn read_highlight(fields: Fields<'_>) -> Result<Highlight> {
    let level = fields.string("matchLevel")?;
    let match_level = match level.as_str() {
        "none" => MatchLevel::None,
        "partial" => MatchLevel::Partial,
        "full" => MatchLevel::Full,
        other => {
            return Err(Error::schema(
                fields.child("matchLevel"),
                format!("expected none, partial, or full, got '{}'", other),
            ))
        }
    };

    Ok(Highlight {
        value: fields.string("value")?,
        match_level,
        matched_words: fields.string_list("matchedWords")?,
        fully_highlighted: fields.opt_boolean("fullyHighlighted")?,
    })
}

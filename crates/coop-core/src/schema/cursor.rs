//! Path-tracking cursor over raw JSON payloads
//!
//! Every read goes through a [`Cursor`], which remembers where in the
//! document it points. Type and range failures are reported against that
//! path, the way source spans are carried through a parser.

use std::fmt;
use std::ops::RangeInclusive;

use serde_json::Value;

use crate::{Error, Result};

// ── Field paths ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Location of a value inside a payload, e.g. `data.coopHistoryDetail.waveResults[2].waterLevel`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Path extended by an object key
    pub fn key(&self, key: &str) -> Self {
        let mut next = self.clone();
        next.segments.push(Segment::Key(key.to_string()));
        next
    }

    /// Path extended by an array index
    pub fn index(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.segments.push(Segment::Index(index));
        next
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_root() {
            return f.write_str("$");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{}", key)?,
                Segment::Key(key) => write!(f, ".{}", key)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl serde::Serialize for FieldPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Cursor ────────────────────────────────────────────────

/// Borrowed view of one JSON value plus the path that led to it
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    value: &'a Value,
    path: FieldPath,
}

impl<'a> Cursor<'a> {
    pub fn root(value: &'a Value) -> Self {
        Self {
            value,
            path: FieldPath::root(),
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    fn object(&self) -> Result<&'a serde_json::Map<String, Value>> {
        self.value
            .as_object()
            .ok_or_else(|| Error::malformed(&self.path, format!("expected object, found {}", type_name(self.value))))
    }

    /// Required field; absent or `null` is a failure
    pub fn field(&self, key: &str) -> Result<Cursor<'a>> {
        let path = self.path.key(key);
        match self.object()?.get(key) {
            Some(value) if !value.is_null() => Ok(Cursor { value, path }),
            Some(_) => Err(Error::malformed(&path, "required field is null")),
            None => Err(Error::malformed(&path, "required field is missing")),
        }
    }

    /// Optional field; absent and `null` both read as `None`
    pub fn opt_field(&self, key: &str) -> Result<Option<Cursor<'a>>> {
        let path = self.path.key(key);
        Ok(match self.object()?.get(key) {
            Some(value) if !value.is_null() => Some(Cursor { value, path }),
            _ => None,
        })
    }

    /// Elements of a required array, in order
    pub fn items(&self) -> Result<Vec<Cursor<'a>>> {
        let array = self
            .value
            .as_array()
            .ok_or_else(|| Error::malformed(&self.path, format!("expected array, found {}", type_name(self.value))))?;
        Ok(array
            .iter()
            .enumerate()
            .map(|(i, value)| Cursor {
                value,
                path: self.path.index(i),
            })
            .collect())
    }

    pub fn str(&self) -> Result<&'a str> {
        self.value
            .as_str()
            .ok_or_else(|| Error::malformed(&self.path, format!("expected string, found {}", type_name(self.value))))
    }

    pub fn bool(&self) -> Result<bool> {
        self.value
            .as_bool()
            .ok_or_else(|| Error::malformed(&self.path, format!("expected boolean, found {}", type_name(self.value))))
    }

    /// Integer within a closed range. Integral floats (`3.0`) are accepted.
    pub fn int_in(&self, range: RangeInclusive<i64>) -> Result<i64> {
        let n = match self.value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && f.is_finite()).map(|f| f as i64)),
            _ => None,
        }
        .ok_or_else(|| Error::malformed(&self.path, format!("expected integer, found {}", self.value)))?;
        if !range.contains(&n) {
            return Err(Error::out_of_range(
                &self.path,
                format!("[{}, {}]", range.start(), range.end()),
                n,
            ));
        }
        Ok(n)
    }

    /// Non-negative count
    pub fn count(&self) -> Result<u32> {
        self.int_in(0..=u32::MAX as i64).map(|n| n as u32)
    }

    /// Count with an upper bound
    pub fn count_max(&self, max: u32) -> Result<u32> {
        self.int_in(0..=max as i64).map(|n| n as u32)
    }

    pub fn f64_in(&self, min: f64, max: f64) -> Result<f64> {
        let n = self
            .value
            .as_f64()
            .ok_or_else(|| Error::malformed(&self.path, format!("expected number, found {}", type_name(self.value))))?;
        if !(min..=max).contains(&n) {
            return Err(Error::out_of_range(&self.path, format!("[{}, {}]", min, max), n));
        }
        Ok(n)
    }
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

//! Query options and the variant query derived from them.
//!
//! Hosts hand over options as a key → value-or-list map, either built
//! directly or parsed from a query string such as
//! `?weight=400&weight=700&format[]=woff2&style=italic`. A query string
//! starting with `{` is read as a JSON object instead.

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::{
    error::{Error, Result},
    format::FontFormat,
};

/// A single query value or a list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    One(String),
    Many(Vec<String>),
}

impl QueryValue {
    pub fn values(&self) -> &[String] {
        match self {
            QueryValue::One(value) => std::slice::from_ref(value),
            QueryValue::Many(values) => values,
        }
    }

    pub fn first(&self) -> Option<&str> {
        self.values().first().map(String::as_str)
    }

    fn push(&mut self, value: String) {
        match self {
            QueryValue::One(first) => {
                *self = QueryValue::Many(vec![std::mem::take(first), value]);
            }
            QueryValue::Many(values) => values.push(value),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::One(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::One(value)
    }
}

impl<T: Into<String>> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        QueryValue::Many(values.into_iter().map(Into::into).collect())
    }
}

/// Ordered key → value map of loader options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    entries: IndexMap<String, QueryValue>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string. A leading `?` is optional.
    pub fn parse(query: &str) -> Result<Self> {
        let query = query.trim();
        let query = query.strip_prefix('?').unwrap_or(query);
        if query.starts_with('{') {
            return Self::parse_json(query);
        }

        let mut options = Self::new();
        for arg in query.split(['&', ',']).filter(|arg| !arg.is_empty()) {
            match arg.split_once('=') {
                Some((key, value)) => {
                    let key = decode_component(key);
                    let value = decode_component(value);
                    match key.strip_suffix("[]") {
                        Some(key) => options.append(key, value, true),
                        None => options.append(&key, value, false),
                    }
                }
                None => {
                    let (key, value) = match (arg.strip_prefix('-'), arg.strip_prefix('+')) {
                        (Some(key), _) => (key, "false"),
                        (_, Some(key)) => (key, "true"),
                        _ => (arg, "true"),
                    };
                    options.insert(decode_component(key), value);
                }
            }
        }
        Ok(options)
    }

    fn parse_json(query: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(query).map_err(|e| Error::InvalidQuery {
            key: "query".to_string(),
            message: e.to_string(),
        })?;
        let Value::Object(map) = value else {
            return Err(Error::InvalidQuery {
                key: "query".to_string(),
                message: "JSON query must be an object".to_string(),
            });
        };

        let mut options = Self::new();
        for (key, value) in map {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    let items = items.into_iter().filter_map(scalar_to_string).collect();
                    options.insert(key, QueryValue::Many(items));
                }
                scalar => {
                    if let Some(value) = scalar_to_string(scalar) {
                        options.insert(key, QueryValue::One(value));
                    }
                }
            }
        }
        Ok(options)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Add a value to `key`, turning it into a list when it already has one.
    fn append(&mut self, key: &str, value: String, as_list: bool) {
        match self.entries.get_mut(key) {
            Some(existing) => existing.push(value),
            None if as_list => {
                self.entries.insert(key.to_string(), QueryValue::Many(vec![value]));
            }
            None => {
                self.entries.insert(key.to_string(), QueryValue::One(value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(QueryValue::first)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge `local` over `self`; keys present in both take the local value.
    pub fn merged(&self, local: &QueryOptions) -> QueryOptions {
        let mut merged = self.clone();
        for (key, value) in &local.entries {
            merged.entries.insert(key.clone(), value.clone());
        }
        merged
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Decode `+` as space and `%XX` escapes. Malformed escapes are kept as-is.
fn decode_component(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi << 4) | lo);
                        i += 2;
                    }
                    _ => out.push(b'%'),
                }
            }
            byte => out.push(byte),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Explicit per-axis value sets. An absent axis is inferred from the sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantQuery {
    pub weight: Option<Vec<u16>>,
    pub style: Option<Vec<String>>,
    pub stretch: Option<Vec<String>>,
    pub format: Option<Vec<FontFormat>>,
}

impl VariantQuery {
    /// Extract the axis options, coercing weights to integers.
    ///
    /// Repeated values are dropped, keeping the first occurrence.
    pub fn from_options(options: &QueryOptions) -> Result<Self> {
        let weight = options
            .get("weight")
            .map(|value| {
                value
                    .values()
                    .iter()
                    .map(|weight| parse_weight(weight))
                    .collect::<Result<IndexSet<_>>>()
            })
            .transpose()?;
        let format = options
            .get("format")
            .map(|value| {
                value
                    .values()
                    .iter()
                    .map(|name| {
                        FontFormat::from_name(name.trim()).ok_or_else(|| Error::InvalidQuery {
                            key: "format".to_string(),
                            message: format!("unknown font format '{name}'"),
                        })
                    })
                    .collect::<Result<IndexSet<_>>>()
            })
            .transpose()?;

        Ok(Self {
            weight: weight.map(|set| set.into_iter().collect()),
            style: options.get("style").map(distinct_strings),
            stretch: options.get("stretch").map(distinct_strings),
            format: format.map(|set| set.into_iter().collect()),
        })
    }

    pub fn with_weight(mut self, weight: impl IntoIterator<Item = u16>) -> Self {
        self.weight = Some(weight.into_iter().collect());
        self
    }

    pub fn with_style<S: Into<String>>(mut self, style: impl IntoIterator<Item = S>) -> Self {
        self.style = Some(style.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_stretch<S: Into<String>>(mut self, stretch: impl IntoIterator<Item = S>) -> Self {
        self.stretch = Some(stretch.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_format(mut self, format: impl IntoIterator<Item = FontFormat>) -> Self {
        self.format = Some(format.into_iter().collect());
        self
    }
}

fn parse_weight(value: &str) -> Result<u16> {
    value.trim().parse().map_err(|_| Error::InvalidQuery {
        key: "weight".to_string(),
        message: format!("'{value}' is not an integer weight"),
    })
}

fn distinct_strings(value: &QueryValue) -> Vec<String> {
    value
        .values()
        .iter()
        .cloned()
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

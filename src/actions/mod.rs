//! Per-action parameter builders.
//!
//! Every API action has an explicit, statically declared set of parameters.
//! A builder collects the optional ones in typed fields and emits a plain
//! key/value map with an explicit presence check per field; nothing is
//! assembled from variable names at runtime.

mod account;
mod album;
mod image;

pub use account::AccountInfoParams;
pub use album::{AlbumCreateParams, AlbumSearchParams};
pub use image::{Crop, ImageCreateParams, ImageSearchParams, ImageSource, Resize, Rotate};

use serde::Serialize;
use serde_json::{Map, Value};

/// Range-capable search criterion for numeric and timestamp fields.
#[derive(Debug, Clone)]
pub enum Filter<T> {
    Exactly(T),
    Between(T, T),
    AtLeast(T),
    AtMost(T),
}

impl<T: Serialize> Filter<T> {
    pub(crate) fn to_value(&self) -> Value {
        match self {
            Filter::Exactly(v) => json_value(v),
            Filter::Between(from, to) => {
                let mut map = Map::new();
                map.insert("from".into(), json_value(from));
                map.insert("to".into(), json_value(to));
                Value::Object(map)
            }
            Filter::AtLeast(from) => {
                let mut map = Map::new();
                map.insert("from".into(), json_value(from));
                Value::Object(map)
            }
            Filter::AtMost(to) => {
                let mut map = Map::new();
                map.insert("to".into(), json_value(to));
                Value::Object(map)
            }
        }
    }
}

/// Multi-value search criterion for string fields (album, format, tags).
#[derive(Debug, Clone)]
pub enum StringFilter {
    One(String),
    AnyOf(Vec<String>),
}

impl StringFilter {
    pub(crate) fn to_value(&self) -> Value {
        match self {
            StringFilter::One(s) => Value::String(s.clone()),
            StringFilter::AnyOf(list) => {
                Value::Array(list.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

impl From<&str> for StringFilter {
    fn from(s: &str) -> Self {
        StringFilter::One(s.to_string())
    }
}

impl From<String> for StringFilter {
    fn from(s: String) -> Self {
        StringFilter::One(s)
    }
}

impl From<Vec<String>> for StringFilter {
    fn from(list: Vec<String>) -> Self {
        StringFilter::AnyOf(list)
    }
}

/// Starts a parameter map with its `action` key.
pub(crate) fn base(action: &str) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("action".into(), Value::String(action.into()));
    map
}

fn json_value<T: Serialize>(v: &T) -> Value {
    // Only ever called on numbers and strings; cannot fail for those.
    serde_json::to_value(v).unwrap_or(Value::Null)
}

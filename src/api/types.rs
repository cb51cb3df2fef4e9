use crate::models::{Property, PropertyType};
use anyhow::{Context, Result};
use serde_json::Value;
use tracing::warn;

/// Marker the backend sends for a page past the end of the result set
pub const INVALID_PAGE: &str = "invalid-page";

/// Classified body of a search response
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResponse {
    /// Server-side pagination with count and neighbour links
    Paginated {
        results: Vec<Property>,
        count: u64,
        next: Option<String>,
        previous: Option<String>,
    },
    /// Plain list, pagination is left to the client
    Flat(Vec<Property>),
    /// The requested page does not exist
    InvalidPage,
}

impl SearchResponse {
    /// Classify a decoded JSON body.
    ///
    /// Order matters: the invalid-page marker first, then the paginated
    /// envelope, then the bare list and `data` envelope fallbacks.
    pub fn from_json(body: Value) -> Result<Self> {
        if is_invalid_page(&body) {
            return Ok(Self::InvalidPage);
        }

        match body {
            Value::Object(mut map) => {
                if let Some(Value::Array(results)) = map.remove("results") {
                    let results = properties(results)?;
                    let count = map
                        .get("count")
                        .and_then(Value::as_u64)
                        .unwrap_or(results.len() as u64);
                    return Ok(Self::Paginated {
                        results,
                        count,
                        next: link(&map, "next"),
                        previous: link(&map, "previous"),
                    });
                }
                if let Some(Value::Array(data)) = map.remove("data") {
                    return Ok(Self::Flat(properties(data)?));
                }
                warn!("Unrecognised search response shape, treating it as empty");
                Ok(Self::Flat(Vec::new()))
            }
            Value::Array(list) => Ok(Self::Flat(properties(list)?)),
            _ => {
                warn!("Search response is not JSON object or array, treating it as empty");
                Ok(Self::Flat(Vec::new()))
            }
        }
    }
}

/// Whether `body` is the backend's out-of-range page signal
pub fn is_invalid_page(body: &Value) -> bool {
    body.get("error").and_then(Value::as_str) == Some(INVALID_PAGE)
        || body.get("detail").and_then(Value::as_str) == Some("Invalid page.")
}

fn properties(list: Vec<Value>) -> Result<Vec<Property>> {
    serde_json::from_value(Value::Array(list)).context("Failed to parse property list")
}

fn link(map: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Property types arrive either as a bare list or inside a paginated
/// envelope
pub fn property_types_from_json(body: Value) -> Result<Vec<PropertyType>> {
    let list = match body {
        Value::Object(mut map) => map
            .remove("results")
            .or_else(|| map.remove("data"))
            .unwrap_or(Value::Array(Vec::new())),
        other => other,
    };
    serde_json::from_value(list).context("Failed to parse property types")
}

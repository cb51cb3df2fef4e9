use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Price as delivered by the backend: either a plain number or a
/// currency-formatted label such as "₹12L" or "1.2Cr"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Amount(f64),
    Label(String),
}

/// Core property data model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub property_for: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Every other field the backend sent, kept for rendering
    #[serde(flatten)]
    pub raw_data: serde_json::Map<String, serde_json::Value>,
}

impl Property {
    /// Location of the property, if the backend geocoded it
    pub fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.latitude?, self.longitude?))
    }
}

/// Entry of the property-types listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyType {
    pub id: i64,
    pub name: String,
}

impl PropertyType {
    /// Whether this type belongs to the "land" group
    pub fn is_land(&self) -> bool {
        self.name.to_lowercase().contains("land")
    }
}

/// Property types split into the two category groups shown in the filter
/// panel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryGroups {
    pub land: Vec<PropertyType>,
    pub buildings: Vec<PropertyType>,
}

impl CategoryGroups {
    pub fn from_types(types: &[PropertyType]) -> Self {
        let (land, buildings) = types.iter().cloned().partition(PropertyType::is_land);
        Self { land, buildings }
    }
}

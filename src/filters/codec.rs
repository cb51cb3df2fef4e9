//! Conversion between [`FilterState`], the shareable URL query and the
//! parameters of the remote search endpoint.
//!
//! Encoding never emits a key whose field sits at its inactive default.
//! Decoding treats any value it cannot make sense of as absent.

use std::{borrow::Cow, collections::HashMap, str::FromStr};

use anyhow::{Context, Result};
use serde::Serialize;
use url::{form_urlencoded, Url};

use super::{
    ranges::{parse_cents_range, parse_sqft_range, PRICE_CEILING},
    state::{AreaFilter, BathroomsMin, BedroomsMin, FilterState, ListingType, Ownership, PageSize, SortOption},
};
use crate::models::PropertyType;

/// Ordered flat list of query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn push(&mut self, key: &str, value: impl ToString) {
        self.0.push((key.to_string(), value.to_string()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `application/x-www-form-urlencoded` form, without a leading `?`
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}

/// Keys shared by the URL and the search endpoint.
fn push_filters(state: &FilterState, params: &mut QueryParams) {
    if let Some(search) = state.location_search() {
        params.push("search", search);
    }
    if let Some(listing) = state.listing_type.wire_value() {
        params.push("property_for", listing);
    }
    if let Some(bedrooms) = state.bedrooms_min.floor() {
        params.push("bedrooms_min", bedrooms);
    }
    if let Some(bathrooms) = state.bathrooms_min.floor() {
        params.push("bathrooms_min", bathrooms);
    }
    if state.has_price_filter() {
        let (min, max) = state.price_range;
        if min > 0 {
            params.push("price_min", min);
        }
        if max < PRICE_CEILING {
            params.push("price_max", max);
        }
    }
    match state.active_area() {
        AreaFilter::SquareFeet { max } => {
            params.push("area_unit", "sqft");
            params.push("area_max", max);
        }
        AreaFilter::Cents { min } => {
            params.push("area_unit", "cent");
            params.push("area_min", min);
        }
        AreaFilter::None => {}
    }
    if let Some(ownership) = state.ownership.wire_value() {
        params.push("ownership", ownership);
    }
}

/// Builds the shareable URL parameters of `state`.
pub fn encode(state: &FilterState) -> QueryParams {
    let mut params = QueryParams::default();
    push_filters(state, &mut params);
    if let Some(category) = state.category() {
        params.push("category", category);
    }
    if state.sort != SortOption::Newest {
        params.push("sort", state.sort);
    }
    params.push("page_size", state.page_size.get());
    if state.page > 1 {
        params.push("page", state.page);
    }
    params
}

/// Builds the query string placed into the address bar.
pub fn encode_query_string(state: &FilterState) -> String {
    encode(state).to_query_string()
}

/// Builds the parameters of a search request. The category name is
/// resolved to its numeric id; an unknown name is not sent.
pub fn request_params(state: &FilterState, types: &[PropertyType]) -> QueryParams {
    let mut params = QueryParams::default();
    params.push("page", state.page.max(1));
    params.push("page_size", state.page_size.get());
    push_filters(state, &mut params);
    if let Some(id) = resolve_property_type(state, types) {
        params.push("property_type", id);
    }
    params
}

/// Id of the selected category among `types`, matched case-insensitively.
pub fn resolve_property_type(state: &FilterState, types: &[PropertyType]) -> Option<i64> {
    let category = state.category()?;
    types
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(category))
        .map(|t| t.id)
}

fn number<T: FromStr>(raw: &HashMap<String, String>, key: &str) -> Option<T> {
    raw.get(key).and_then(|v| v.trim().parse().ok())
}

fn first_wins<'a>(pairs: impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>) -> HashMap<String, String> {
    let mut raw = HashMap::new();
    for (key, value) in pairs {
        raw.entry(key.into_owned()).or_insert_with(|| value.into_owned());
    }
    raw
}

fn query_pairs(address: &str) -> Result<HashMap<String, String>> {
    let address = address.trim();
    if address.contains("://") {
        let url = Url::parse(address).context("malformed listing URL")?;
        Ok(first_wins(url.query_pairs()))
    } else {
        let query = address.strip_prefix('?').unwrap_or(address);
        Ok(first_wins(form_urlencoded::parse(query.as_bytes())))
    }
}

/// Parses a legacy `min,max` price value.
fn legacy_price(value: &str) -> Option<(u64, u64)> {
    let (min, max) = value.split_once(',')?;
    Some((min.trim().parse().ok()?, max.trim().parse().ok()?))
}

/// Decodes a query string (or a full URL) into a fresh [`FilterState`].
/// The user location is never part of the URL and stays unset.
///
/// # Errors
///
/// Fails only when `address` looks like a full URL and cannot be parsed.
pub fn decode(address: &str) -> Result<FilterState> {
    let raw = query_pairs(address)?;
    let mut state = FilterState::default();

    if let Some(search) = raw.get("search") {
        state.location_query = search.trim().to_string();
    }
    state.listing_type = raw
        .get("property_for")
        .and_then(|v| ListingType::from_str(v.trim()).ok())
        .unwrap_or_default();
    if let Some(category) = raw.get("category").or_else(|| raw.get("type")) {
        state.set_category(category);
    }

    state.bedrooms_min = raw
        .get("bedrooms_min")
        .and_then(|v| {
            let v = v.trim();
            v.parse().map(BedroomsMin::from_floor).ok().or_else(|| v.parse().ok())
        })
        .unwrap_or_default();
    state.bathrooms_min = raw
        .get("bathrooms_min")
        .and_then(|v| {
            let v = v.trim();
            v.parse().map(BathroomsMin::from_floor).ok().or_else(|| v.parse().ok())
        })
        .unwrap_or_default();

    let (price_min, price_max) = (number::<u64>(&raw, "price_min"), number::<u64>(&raw, "price_max"));
    let (min, max) = match (price_min, price_max) {
        (None, None) => raw
            .get("price")
            .and_then(|v| legacy_price(v))
            .unwrap_or((0, PRICE_CEILING)),
        (min, max) => (min.unwrap_or(0), max.unwrap_or(PRICE_CEILING)),
    };
    state.set_price_range(min, max);

    let unit = raw.get("area_unit").map(|u| u.trim().to_lowercase());
    match (unit.as_deref(), number::<u64>(&raw, "area_max"), number::<u64>(&raw, "area_min")) {
        (Some("sqft"), Some(max), _) => state.set_area(AreaFilter::SquareFeet { max }),
        (Some("cent" | "cents"), _, Some(min)) => state.set_area(AreaFilter::Cents { min }),
        _ => {
            if let Some(label) = raw.get("sqft") {
                state.sqft_range = parse_sqft_range(label);
            }
            if let Some(label) = raw.get("cents") {
                state.cents_range = parse_cents_range(label);
            }
        }
    }

    state.ownership = raw
        .get("ownership")
        .and_then(|v| Ownership::from_str(v.trim()).ok())
        .unwrap_or_default();
    state.sort = raw
        .get("sort")
        .and_then(|v| SortOption::from_str(v.trim()).ok())
        .unwrap_or_default();
    state.page_size = number(&raw, "page_size").map(PageSize::new).unwrap_or_default();
    state.page = number::<u32>(&raw, "page").filter(|p| *p >= 1).unwrap_or(1);

    Ok(state)
}

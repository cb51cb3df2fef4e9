//! Change detection over the filter portion of [`FilterState`].

use serde::Serialize;

use super::{
    ranges::NumericRange,
    state::{AreaFilter, FilterState, SortOption},
};
use crate::models::Coordinates;

#[derive(Serialize)]
struct Filters<'a> {
    search: Option<&'a str>,
    property_for: Option<&'static str>,
    category: Option<&'a str>,
    bedrooms_min: Option<u32>,
    bathrooms_min: Option<u32>,
    price: NumericRange,
    area: (&'static str, u64),
    ownership: Option<&'static str>,
    sort: SortOption,
    origin: Option<Coordinates>,
}

/// Canonical serialization of the effective filters. Page and page size
/// are not part of it, and the user location only counts for the
/// `nearest` sort.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterSignature(String);

impl FilterSignature {
    pub fn of(state: &FilterState) -> Self {
        let area = match state.active_area() {
            AreaFilter::None => ("any", 0),
            AreaFilter::SquareFeet { max } => ("sqft", max),
            AreaFilter::Cents { min } => ("cent", min),
        };
        let filters = Filters {
            search: state.location_search(),
            property_for: state.listing_type.wire_value(),
            category: state.category(),
            bedrooms_min: state.bedrooms_min.floor(),
            bathrooms_min: state.bathrooms_min.floor(),
            price: state.price_range,
            area,
            ownership: state.ownership.wire_value(),
            sort: state.sort,
            origin: state.user_location.filter(|_| state.sort == SortOption::Nearest),
        };
        // Plain data with string keys, serialization cannot fail.
        Self(serde_json::to_string(&filters).unwrap_or_default())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identity of one search request: the filters, the page being asked for
/// and the category id the request actually carries
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestSignature {
    pub filters: FilterSignature,
    pub property_type: Option<i64>,
    pub page: u32,
    pub page_size: u32,
}

impl RequestSignature {
    pub fn new(state: &FilterState, property_type: Option<i64>) -> Self {
        Self {
            filters: FilterSignature::of(state),
            property_type,
            page: state.page,
            page_size: state.page_size.get(),
        }
    }
}

/// Outcome of [`ChangeDetector::observe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// First evaluation, the signature was only recorded
    Initial,
    Unchanged,
    /// A filter changed, the caller has to go back to page one
    FiltersChanged,
}

/// Remembers the last filter signature it was shown
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    last: Option<FilterSignature>,
}

impl ChangeDetector {
    pub fn observe(&mut self, state: &FilterState) -> Change {
        let signature = FilterSignature::of(state);
        match &self.last {
            None => {
                self.last = Some(signature);
                Change::Initial
            }
            Some(last) if *last == signature => Change::Unchanged,
            Some(_) => {
                self.last = Some(signature);
                Change::FiltersChanged
            }
        }
    }
}

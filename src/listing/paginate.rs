//! Client-side sorting and slicing for backends that return a flat list.

use std::cmp::Ordering;

use crate::{
    filters::SortOption,
    geo::haversine_km,
    models::{Coordinates, Price, Property},
};

const LAKH: f64 = 100_000.0;
const CRORE: f64 = 10_000_000.0;

/// Numeric value of a price, understanding lakh and crore suffixes.
/// Anything unparseable is worth `0`.
pub fn normalize_price(price: Option<&Price>) -> f64 {
    match price {
        Some(Price::Amount(amount)) => *amount,
        Some(Price::Label(label)) => parse_price_label(label),
        None => 0.0,
    }
}

fn parse_price_label(label: &str) -> f64 {
    let cleaned: String = label
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
        .collect();
    let cleaned = cleaned
        .strip_prefix("rs.")
        .or_else(|| cleaned.strip_prefix("rs"))
        .unwrap_or(&cleaned);

    let (number, multiplier) = [("crore", CRORE), ("cr", CRORE), ("lakh", LAKH), ("lac", LAKH), ("l", LAKH)]
        .iter()
        .find_map(|(suffix, multiplier)| {
            cleaned.strip_suffix(suffix).map(|number| (number, *multiplier))
        })
        .unwrap_or((cleaned, 1.0));

    number
        .parse::<f64>()
        .map(|value| value * multiplier)
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

fn by_distance(origin: Coordinates) -> impl Fn(&Property, &Property) -> Ordering {
    move |a, b| {
        let distance = |p: &Property| p.coordinates().map(|at| haversine_km(origin, at));
        match (distance(a), distance(b)) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Sorted copy of `items`. The `nearest` sort keeps the original order
/// when no origin is known.
pub fn sort_properties(
    items: &[Property],
    sort: SortOption,
    origin: Option<Coordinates>,
) -> Vec<Property> {
    let mut sorted = items.to_vec();
    match sort {
        SortOption::PriceAsc => sorted.sort_by(|a, b| {
            normalize_price(a.price.as_ref()).total_cmp(&normalize_price(b.price.as_ref()))
        }),
        SortOption::PriceDesc => sorted.sort_by(|a, b| {
            normalize_price(b.price.as_ref()).total_cmp(&normalize_price(a.price.as_ref()))
        }),
        // `None` sorts below every timestamp, so undated listings end up last.
        SortOption::Newest => sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOption::Nearest => {
            if let Some(origin) = origin {
                sorted.sort_by(by_distance(origin));
            }
        }
    }
    sorted
}

/// Number of pages needed for `total` items.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    u32::try_from(total.div_ceil(page_size)).unwrap_or(u32::MAX)
}

/// Items of the 1-based `page`.
pub fn page_slice(items: &[Property], page: u32, page_size: u32) -> &[Property] {
    let page_size = page_size as usize;
    let start = (page.max(1) as usize - 1).saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(items.len());
    items.get(start..end).unwrap_or(&[])
}

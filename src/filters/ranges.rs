//! Bucket labels shown in the filter panel and the numeric ranges behind
//! them.
//!
//! Every lookup resolves to some range: unknown labels fall back to the
//! table's "any" bucket.

/// Inclusive `(min, max)` pair.
pub type NumericRange = (u64, u64);

/// Upper bound of the price domain.
pub const PRICE_CEILING: u64 = 1_000_000_000;

/// Full price domain, meaning "no price filter".
pub const ANY_PRICE: NumericRange = (0, PRICE_CEILING);

/// Upper bound of the built-up area domain in square feet.
pub const SQFT_CEILING: u64 = 100_000;

/// Full built-up area domain.
pub const ANY_SQFT: NumericRange = (0, SQFT_CEILING);

/// Upper bound of the land area domain in cents.
pub const CENTS_CEILING: u64 = 1_000;

/// Full land area domain.
pub const ANY_CENTS: NumericRange = (0, CENTS_CEILING);

const PRICE_BUCKETS: &[(&str, NumericRange)] = &[
    ("Any Price", ANY_PRICE),
    ("Under ₹25L", (0, 2_500_000)),
    ("₹25L - ₹50L", (2_500_000, 5_000_000)),
    ("₹50L - ₹1Cr", (5_000_000, 10_000_000)),
    ("₹1Cr - ₹2Cr", (10_000_000, 20_000_000)),
    ("₹2Cr - ₹5Cr", (20_000_000, 50_000_000)),
    ("Above ₹5Cr", (50_000_000, PRICE_CEILING)),
];

// Built-up area only ever filters by an upper bound.
const SQFT_BUCKETS: &[(&str, NumericRange)] = &[
    ("Any Size", ANY_SQFT),
    ("0-500", (0, 500)),
    ("0-1000", (0, 1_000)),
    ("0-1500", (0, 1_500)),
    ("0-2000", (0, 2_000)),
    ("0-3000", (0, 3_000)),
    ("0-5000", (0, 5_000)),
];

// Land area only ever filters by a lower bound.
const CENTS_BUCKETS: &[(&str, NumericRange)] = &[
    ("Any Size", ANY_CENTS),
    ("5+", (5, CENTS_CEILING)),
    ("10+", (10, CENTS_CEILING)),
    ("25+", (25, CENTS_CEILING)),
    ("50+", (50, CENTS_CEILING)),
    ("100+", (100, CENTS_CEILING)),
];

fn lookup(table: &[(&str, NumericRange)], label: &str, fallback: NumericRange) -> NumericRange {
    let label = label.trim();
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(label))
        .map_or(fallback, |(_, range)| *range)
}

/// Resolves a price bucket label such as `"₹25L - ₹50L"`.
pub fn parse_price_range(label: &str) -> NumericRange {
    lookup(PRICE_BUCKETS, label, ANY_PRICE)
}

/// Resolves a built-up area bucket label such as `"0-500"`.
pub fn parse_sqft_range(label: &str) -> NumericRange {
    lookup(SQFT_BUCKETS, label, ANY_SQFT)
}

/// Resolves a land area bucket label such as `"10+"`.
pub fn parse_cents_range(label: &str) -> NumericRange {
    lookup(CENTS_BUCKETS, label, ANY_CENTS)
}

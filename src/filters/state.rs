use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::ranges::{NumericRange, ANY_CENTS, ANY_PRICE, ANY_SQFT, PRICE_CEILING, SQFT_CEILING};
use crate::models::Coordinates;

/// Listing type selector. `Buy` is what the panel calls `Sell`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ListingType {
    #[default]
    All,
    Rent,
    Buy,
    Sell,
}

impl ListingType {
    /// Value of the `property_for` parameter, `None` when unfiltered
    pub fn wire_value(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Rent => Some("rent"),
            Self::Buy | Self::Sell => Some("sell"),
        }
    }
}

/// Minimum bedroom count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum BedroomsMin {
    #[default]
    #[strum(serialize = "any")]
    Any,
    #[strum(serialize = "1")]
    One,
    #[strum(serialize = "2")]
    Two,
    #[strum(serialize = "3")]
    Three,
    #[strum(serialize = "4")]
    Four,
    #[strum(serialize = "5+")]
    FivePlus,
}

impl BedroomsMin {
    pub fn floor(self) -> Option<u32> {
        match self {
            Self::Any => None,
            Self::One => Some(1),
            Self::Two => Some(2),
            Self::Three => Some(3),
            Self::Four => Some(4),
            Self::FivePlus => Some(5),
        }
    }

    /// Anything at or above five collapses into `5+`.
    pub fn from_floor(floor: u32) -> Self {
        match floor {
            0 => Self::Any,
            1 => Self::One,
            2 => Self::Two,
            3 => Self::Three,
            4 => Self::Four,
            _ => Self::FivePlus,
        }
    }
}

/// Minimum bathroom count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum BathroomsMin {
    #[default]
    #[strum(serialize = "any")]
    Any,
    #[strum(serialize = "1")]
    One,
    #[strum(serialize = "2")]
    Two,
    #[strum(serialize = "3")]
    Three,
    #[strum(serialize = "4+")]
    FourPlus,
}

impl BathroomsMin {
    pub fn floor(self) -> Option<u32> {
        match self {
            Self::Any => None,
            Self::One => Some(1),
            Self::Two => Some(2),
            Self::Three => Some(3),
            Self::FourPlus => Some(4),
        }
    }

    pub fn from_floor(floor: u32) -> Self {
        match floor {
            0 => Self::Any,
            1 => Self::One,
            2 => Self::Two,
            3 => Self::Three,
            _ => Self::FourPlus,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Ownership {
    #[default]
    All,
    DirectOwner,
    Management,
}

impl Ownership {
    pub fn wire_value(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::DirectOwner => Some("direct_owner"),
            Self::Management => Some("management"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SortOption {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Nearest,
}

/// Number of listings per page, restricted to the sizes the pager offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSize(u32);

impl PageSize {
    pub const ALLOWED: [u32; 5] = [5, 10, 15, 20, 50];
    pub const DEFAULT: Self = Self(10);

    /// Unsupported sizes silently become the default.
    pub fn new(size: u32) -> Self {
        if Self::ALLOWED.contains(&size) {
            Self(size)
        } else {
            Self::DEFAULT
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The single area constraint that reaches the outgoing query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaFilter {
    None,
    SquareFeet { max: u64 },
    Cents { min: u64 },
}

/// Canonical filter configuration of the listing view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub location_query: String,
    pub listing_type: ListingType,
    pub property_category: String,
    pub bedrooms_min: BedroomsMin,
    pub bathrooms_min: BathroomsMin,
    pub price_range: NumericRange,
    pub sqft_range: NumericRange,
    pub cents_range: NumericRange,
    pub ownership: Ownership,
    pub sort: SortOption,
    pub page: u32,
    pub page_size: PageSize,
    pub user_location: Option<Coordinates>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            location_query: String::new(),
            listing_type: ListingType::All,
            property_category: Self::ALL_CATEGORIES.to_string(),
            bedrooms_min: BedroomsMin::Any,
            bathrooms_min: BathroomsMin::Any,
            price_range: ANY_PRICE,
            sqft_range: ANY_SQFT,
            cents_range: ANY_CENTS,
            ownership: Ownership::All,
            sort: SortOption::Newest,
            page: 1,
            page_size: PageSize::DEFAULT,
            user_location: None,
        }
    }
}

impl FilterState {
    pub const ALL_CATEGORIES: &'static str = "all";

    /// Trimmed location text, `None` when blank
    pub fn location_search(&self) -> Option<&str> {
        Some(self.location_query.trim()).filter(|q| !q.is_empty())
    }

    /// Lower-cased category, `None` when unfiltered
    pub fn category(&self) -> Option<&str> {
        Some(self.property_category.as_str())
            .filter(|c| !c.is_empty() && *c != Self::ALL_CATEGORIES)
    }

    pub fn set_category(&mut self, category: &str) {
        let category = category.trim().to_lowercase();
        self.property_category = if category.is_empty() {
            Self::ALL_CATEGORIES.to_string()
        } else {
            category
        };
    }

    /// Clamps both bounds into the price domain and orders them.
    pub fn set_price_range(&mut self, min: u64, max: u64) {
        let (min, max) = (min.min(PRICE_CEILING), max.min(PRICE_CEILING));
        self.price_range = (min.min(max), min.max(max));
    }

    pub fn has_price_filter(&self) -> bool {
        self.price_range != ANY_PRICE
    }

    pub fn sqft_active(&self) -> bool {
        let max = self.sqft_range.1;
        max > 0 && max < SQFT_CEILING
    }

    pub fn cents_active(&self) -> bool {
        self.cents_range.0 > 0
    }

    /// Square feet wins when both area filters are set.
    pub fn active_area(&self) -> AreaFilter {
        if self.sqft_active() {
            AreaFilter::SquareFeet {
                max: self.sqft_range.1,
            }
        } else if self.cents_active() {
            AreaFilter::Cents {
                min: self.cents_range.0,
            }
        } else {
            AreaFilter::None
        }
    }

    /// Selecting one area unit resets the other.
    pub fn set_area(&mut self, area: AreaFilter) {
        match area {
            AreaFilter::None => {
                self.sqft_range = ANY_SQFT;
                self.cents_range = ANY_CENTS;
            }
            AreaFilter::SquareFeet { max } => {
                self.sqft_range = (0, max.min(SQFT_CEILING));
                self.cents_range = ANY_CENTS;
            }
            AreaFilter::Cents { min } => {
                self.sqft_range = ANY_SQFT;
                self.cents_range = (min.min(ANY_CENTS.1), ANY_CENTS.1);
            }
        }
    }
}

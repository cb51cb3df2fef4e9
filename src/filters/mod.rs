pub mod codec;
pub mod ranges;
pub mod signature;
pub mod state;

pub use codec::{decode, encode, encode_query_string, request_params, QueryParams};
pub use ranges::{parse_cents_range, parse_price_range, parse_sqft_range, NumericRange};
pub use signature::{Change, ChangeDetector, FilterSignature, RequestSignature};
pub use state::{
    AreaFilter, BathroomsMin, BedroomsMin, FilterState, ListingType, Ownership, PageSize, SortOption,
};

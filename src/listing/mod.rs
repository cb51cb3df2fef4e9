pub mod paginate;
pub mod view;

pub use view::{FetchTicket, ListingView, PageResult, Phase};

//! Filter, URL and fetch synchronisation for a property listing gallery.

pub mod api;
pub mod config;
pub mod filters;
pub mod geo;
pub mod listing;
pub mod models;

pub use self::config::Config;
pub use self::listing::ListingView;

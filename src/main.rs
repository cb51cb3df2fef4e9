mod args;

use anyhow::Context as _;
use args::Args;
use clap::Parser as _;
use property_browser::{
    api::HttpPropertyApi,
    geo::NominatimGeocoder,
    models::{Coordinates, Price},
    Config, ListingView,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn parse_location(raw: &str) -> anyhow::Result<Coordinates> {
    let (lat, lng) = raw
        .split_once(',')
        .context("Location must look like `lat,lng`")?;
    Ok(Coordinates::new(
        lat.trim().parse().context("Invalid latitude")?,
        lng.trim().parse().context("Invalid longitude")?,
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::new(&args.config).context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    let level = tracing::Level::from(config.log.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str())),
        )
        .init();

    info!("🏠 Property Browser");

    let api = HttpPropertyApi::new(&config.api)?;
    let mut view = ListingView::new(api, &args.query);

    view.load_property_types().await;
    info!(
        "Categories: {} buildings, {} land",
        view.category_groups().buildings.len(),
        view.category_groups().land.len()
    );

    if let Some(raw) = &args.location {
        view.set_user_location(parse_location(raw)?);
        let geocoder = NominatimGeocoder::new(&config.geocoder, &config.api.user_agent)?;
        view.resolve_place_name(&geocoder).await;
        if let Some(place) = view.place_name() {
            info!("📍 {}", place);
        }
    }

    view.settle().await;

    if let Some(error) = view.error() {
        warn!("{}", error);
        return Ok(());
    }

    let result = view.page_result();
    info!(
        "Page {} of {} ({} properties in total)",
        view.filters().page,
        view.total_pages().max(1),
        result.total_count
    );

    for (i, property) in view.visible_items().iter().enumerate() {
        let price = match &property.price {
            Some(Price::Amount(amount)) => amount.to_string(),
            Some(Price::Label(label)) => label.clone(),
            None => "price on request".to_string(),
        };
        println!("{}. {} ({})", i + 1, property.title, price);
        if let Some(location) = &property.location {
            println!("   {}", location);
        }
        let mut details = Vec::new();
        if let Some(bedrooms) = property.bedrooms {
            details.push(format!("{bedrooms} bed"));
        }
        if let Some(bathrooms) = property.bathrooms {
            details.push(format!("{bathrooms} bath"));
        }
        if let Some(property_for) = &property.property_for {
            details.push(format!("for {property_for}"));
        }
        if !details.is_empty() {
            println!("   {}", details.join(", "));
        }
        println!("   ID: {}", property.id);
        println!();
    }

    println!("?{}", view.url_query());

    Ok(())
}

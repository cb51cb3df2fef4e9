//! Controller of the property listing view.
//!
//! [`ListingView`] owns the [`FilterState`] and keeps three things in step
//! with it: the address bar query, the page number, and the result set of
//! the remote search. All mutation goes through its setters, each of which
//! ends in one synchronous reconcile pass:
//!
//! 1. a filter change sends the view back to page one;
//! 2. a page past the last known page is clamped down;
//! 3. the address bar query is re-encoded.
//!
//! Corrections made in steps 1 and 2 raise a one-shot flag so that the
//! next URL decode does not restore the page number the address bar still
//! shows.
//!
//! Fetching is split into [`ListingView::begin_fetch`] and
//! [`ListingView::apply_response`] so a host can run requests however it
//! likes; responses whose request no longer matches the latest one are
//! dropped.

use anyhow::Result;
use tracing::{debug, info, warn};

use super::paginate::{page_slice, sort_properties, total_pages};
use crate::{
    api::{PropertyDataApi, SearchResponse},
    filters::{
        codec, parse_cents_range, parse_price_range, parse_sqft_range, AreaFilter, BathroomsMin,
        BedroomsMin, Change, ChangeDetector, FilterSignature, FilterState, ListingType, Ownership,
        PageSize, QueryParams, RequestSignature, SortOption,
    },
    geo::{GeolocationError, ReverseGeocoder},
    models::{CategoryGroups, Coordinates, Property, PropertyType},
};

/// Message shown when a search fails.
pub const SEARCH_FAILED: &str = "Failed to load properties. Please try again.";

/// Loading phase of the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing has been received yet
    InitialLoad,
    /// A filter or page change is being fetched
    Transitioning,
    Steady,
}

/// Items to render together with their pagination metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult {
    pub items: Vec<Property>,
    pub total_count: u64,
    pub has_next: bool,
    pub has_previous: bool,
    /// `false` when `items` is the whole result set and has to be sliced
    /// locally
    pub is_server_paginated: bool,
}

/// One issued search request
#[derive(Debug, Clone)]
pub struct FetchTicket {
    seq: u64,
    signature: RequestSignature,
    params: QueryParams,
}

impl FetchTicket {
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn signature(&self) -> &RequestSignature {
        &self.signature
    }
}

pub struct ListingView<A> {
    api: A,
    filters: FilterState,
    url_query: String,
    /// Ignore the page number of the next decoded URL
    suppress_url_page: bool,
    detector: ChangeDetector,
    scroll_to_top: bool,

    phase: Phase,
    last_requested: Option<RequestSignature>,
    next_seq: u64,
    result: PageResult,
    error: Option<String>,

    property_types: Vec<PropertyType>,
    category_groups: CategoryGroups,
    types_loading: bool,

    place_name: Option<String>,
    geolocation_error: Option<GeolocationError>,
}

impl<A: PropertyDataApi> ListingView<A> {
    /// Create the view from the address it was opened with. A broken
    /// address leaves every filter at its default.
    pub fn new(api: A, address: &str) -> Self {
        let filters = codec::decode(address).unwrap_or_else(|e| {
            warn!("Ignoring unreadable listing URL {:?}: {:#}", address, e);
            FilterState::default()
        });

        let mut view = Self {
            api,
            filters,
            url_query: String::new(),
            suppress_url_page: false,
            detector: ChangeDetector::default(),
            scroll_to_top: false,
            phase: Phase::InitialLoad,
            last_requested: None,
            next_seq: 0,
            result: PageResult::default(),
            error: None,
            property_types: Vec::new(),
            category_groups: CategoryGroups::default(),
            types_loading: false,
            place_name: None,
            geolocation_error: None,
        };
        view.reconcile();
        view
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Query string the address bar should show
    pub fn url_query(&self) -> &str {
        &self.url_query
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase != Phase::Steady
    }

    pub fn page_result(&self) -> &PageResult {
        &self.result
    }

    /// User-visible error of the last search
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn property_types(&self) -> &[PropertyType] {
        &self.property_types
    }

    pub fn category_groups(&self) -> &CategoryGroups {
        &self.category_groups
    }

    pub fn types_loading(&self) -> bool {
        self.types_loading
    }

    pub fn place_name(&self) -> Option<&str> {
        self.place_name.as_deref()
    }

    pub fn geolocation_error(&self) -> Option<GeolocationError> {
        self.geolocation_error
    }

    /// Consume the pending scroll-to-top request.
    pub fn take_scroll_to_top(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_top)
    }

    // Filter setters.

    pub fn set_location_query(&mut self, query: &str) {
        self.filters.location_query = query.to_string();
        self.reconcile();
    }

    pub fn set_listing_type(&mut self, listing_type: ListingType) {
        self.filters.listing_type = listing_type;
        self.reconcile();
    }

    pub fn set_category(&mut self, category: &str) {
        self.filters.set_category(category);
        self.reconcile();
    }

    pub fn set_bedrooms_min(&mut self, bedrooms: BedroomsMin) {
        self.filters.bedrooms_min = bedrooms;
        self.reconcile();
    }

    pub fn set_bathrooms_min(&mut self, bathrooms: BathroomsMin) {
        self.filters.bathrooms_min = bathrooms;
        self.reconcile();
    }

    pub fn set_price_range(&mut self, min: u64, max: u64) {
        self.filters.set_price_range(min, max);
        self.reconcile();
    }

    pub fn select_price_bucket(&mut self, label: &str) {
        let (min, max) = parse_price_range(label);
        self.set_price_range(min, max);
    }

    pub fn set_area(&mut self, area: AreaFilter) {
        self.filters.set_area(area);
        self.reconcile();
    }

    pub fn select_sqft_bucket(&mut self, label: &str) {
        let (_, max) = parse_sqft_range(label);
        self.set_area(AreaFilter::SquareFeet { max });
    }

    pub fn select_cents_bucket(&mut self, label: &str) {
        let (min, _) = parse_cents_range(label);
        self.set_area(AreaFilter::Cents { min });
    }

    pub fn set_ownership(&mut self, ownership: Ownership) {
        self.filters.ownership = ownership;
        self.reconcile();
    }

    pub fn set_sort(&mut self, sort: SortOption) {
        self.filters.sort = sort;
        self.reconcile();
    }

    /// An explicit page choice outranks any pending page correction.
    pub fn set_page(&mut self, page: u32) {
        self.filters.page = page.max(1);
        self.suppress_url_page = false;
        self.scroll_to_top = true;
        self.reconcile();
    }

    pub fn set_page_size(&mut self, size: u32) {
        self.filters.page_size = PageSize::new(size);
        self.suppress_url_page = false;
        self.reconcile();
    }

    /// Reset every filter but keep the page size and the user location.
    pub fn clear_filters(&mut self) {
        self.filters = FilterState {
            page_size: self.filters.page_size,
            user_location: self.filters.user_location,
            page: self.filters.page,
            ..FilterState::default()
        };
        self.reconcile();
    }

    // Address bar.

    /// Apply an address the host navigated to (back/forward, pasted link).
    /// Unreadable addresses are logged and leave the view untouched.
    pub fn on_url_changed(&mut self, address: &str) {
        let mut decoded = match codec::decode(address) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("Ignoring unreadable listing URL {:?}: {:#}", address, e);
                return;
            }
        };

        if std::mem::take(&mut self.suppress_url_page) {
            debug!(
                "Keeping page {} over page {} from the URL",
                self.filters.page, decoded.page
            );
            decoded.page = self.filters.page;
        }
        decoded.user_location = self.filters.user_location;

        if FilterSignature::of(&decoded) == FilterSignature::of(&self.filters) {
            // Same effective filters: keep the selection as the user made it.
            self.filters.page = decoded.page;
            self.filters.page_size = decoded.page_size;
        } else {
            self.filters = decoded;
        }
        self.reconcile();
    }

    /// Move to `page` and make sure the next URL decode does not undo it.
    fn force_page(&mut self, page: u32) {
        debug!("Forcing page {} -> {}", self.filters.page, page);
        self.filters.page = page;
        self.suppress_url_page = true;
        self.scroll_to_top = true;
    }

    fn reconcile(&mut self) {
        if self.detector.observe(&self.filters) == Change::FiltersChanged {
            self.scroll_to_top = true;
            if self.filters.page != 1 {
                self.force_page(1);
            }
        }

        let last_page = self.total_pages();
        if last_page > 0 && self.filters.page > last_page {
            self.force_page(last_page);
        }

        self.url_query = codec::encode_query_string(&self.filters);
    }

    // Fetching.

    /// Backend id of the selected category, if the types are known
    fn resolved_property_type(&self) -> Option<i64> {
        codec::resolve_property_type(&self.filters, &self.property_types)
    }

    /// Parameters the next search would be sent with
    pub fn request_params(&self) -> QueryParams {
        codec::request_params(&self.filters, &self.property_types)
    }

    /// Issue a request for the current filters and page, unless exactly
    /// that request was the last one issued.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let signature = RequestSignature::new(&self.filters, self.resolved_property_type());
        if self.last_requested.as_ref() == Some(&signature) {
            return None;
        }

        if self.phase != Phase::InitialLoad {
            self.phase = Phase::Transitioning;
        }
        self.next_seq += 1;
        self.last_requested = Some(signature.clone());
        self.error = None;

        let ticket = FetchTicket {
            seq: self.next_seq,
            signature,
            params: self.request_params(),
        };
        debug!("Request #{} for page {}", ticket.seq, ticket.signature.page);
        Some(ticket)
    }

    /// Issue the last request again, e.g. after an error.
    pub fn retry(&mut self) -> Option<FetchTicket> {
        self.last_requested = None;
        self.begin_fetch()
    }

    /// Apply the outcome of `ticket`. Returns `false` when the response is
    /// stale and was dropped.
    pub fn apply_response(&mut self, ticket: FetchTicket, outcome: Result<SearchResponse>) -> bool {
        if self.last_requested.as_ref() != Some(&ticket.signature) {
            debug!("Dropping stale response of request #{}", ticket.seq);
            return false;
        }

        match outcome {
            Ok(SearchResponse::InvalidPage) => {
                debug!("Page {} is out of range", self.filters.page);
                if self.filters.page != 1 {
                    self.force_page(1);
                }
                self.result = PageResult::default();
            }
            Ok(SearchResponse::Paginated {
                results,
                count,
                next,
                previous,
            }) => {
                info!("Request #{}: {} of {} properties", ticket.seq, results.len(), count);
                self.result = PageResult {
                    items: results,
                    total_count: count,
                    has_next: next.is_some(),
                    has_previous: previous.is_some(),
                    is_server_paginated: true,
                };
            }
            Ok(SearchResponse::Flat(items)) => {
                info!("Request #{}: {} properties, paginating locally", ticket.seq, items.len());
                self.result = PageResult {
                    total_count: items.len() as u64,
                    items,
                    has_next: false,
                    has_previous: false,
                    is_server_paginated: false,
                };
            }
            Err(e) => {
                warn!("Search via {} failed: {:#}", self.api.source_name(), e);
                self.result = PageResult::default();
                self.error = Some(SEARCH_FAILED.to_string());
            }
        }

        self.phase = Phase::Steady;
        self.reconcile();
        true
    }

    /// Fetch the current page if it has not been requested yet.
    pub async fn refresh(&mut self) -> bool {
        let Some(ticket) = self.begin_fetch() else {
            return false;
        };
        let outcome = self.api.search(ticket.params()).await;
        self.apply_response(ticket, outcome)
    }

    /// Keep fetching until no page correction is pending. Corrections
    /// only ever lower the page number, so this terminates.
    pub async fn settle(&mut self) {
        while self.refresh().await {}
    }

    /// Load property types for category resolution and grouping. A
    /// failure leaves both groups empty.
    pub async fn load_property_types(&mut self) {
        self.types_loading = true;
        match self.api.property_types().await {
            Ok(types) => {
                self.category_groups = CategoryGroups::from_types(&types);
                self.property_types = types;
            }
            Err(e) => {
                warn!("Failed to load property types: {:#}", e);
                self.property_types.clear();
                self.category_groups = CategoryGroups::default();
            }
        }
        self.types_loading = false;
    }

    // Rendering.

    /// Pages available for the current result set
    pub fn total_pages(&self) -> u32 {
        total_pages(self.result.total_count, self.filters.page_size.get())
    }

    pub fn has_next_page(&self) -> bool {
        if self.result.is_server_paginated {
            self.result.has_next
        } else {
            self.filters.page < self.total_pages()
        }
    }

    pub fn has_previous_page(&self) -> bool {
        if self.result.is_server_paginated {
            self.result.has_previous
        } else {
            self.filters.page > 1 && self.total_pages() > 0
        }
    }

    /// Items of the current page in display order
    pub fn visible_items(&self) -> Vec<Property> {
        let sorted = sort_properties(&self.result.items, self.filters.sort, self.filters.user_location);
        if self.result.is_server_paginated {
            sorted
        } else {
            page_slice(&sorted, self.filters.page, self.filters.page_size.get()).to_vec()
        }
    }

    // Geolocation.

    /// Record the user's position. The place name is resolved separately.
    pub fn set_user_location(&mut self, at: Coordinates) {
        self.filters.user_location = Some(at);
        self.place_name = None;
        self.geolocation_error = None;
        self.reconcile();
    }

    /// Best-effort lookup of a place name for the user's position.
    pub async fn resolve_place_name<G: ReverseGeocoder + ?Sized>(&mut self, geocoder: &G) {
        let Some(at) = self.filters.user_location else {
            return;
        };
        match geocoder.place_name(at).await {
            Ok(name) => self.place_name = Some(name),
            Err(e) => warn!("Reverse geocoding failed: {:#}", e),
        }
    }

    /// Record why the position is unknown. Without a position the
    /// `nearest` sort falls back to `newest`.
    pub fn geolocation_failed(&mut self, error: GeolocationError) {
        warn!("Geolocation failed: {}", error);
        self.geolocation_error = Some(error);
        if self.filters.sort == SortOption::Nearest && self.filters.user_location.is_none() {
            self.filters.sort = SortOption::Newest;
        }
        self.reconcile();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::Mutex,
    };

    use anyhow::anyhow;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct FakeApi {
        types: Option<Vec<PropertyType>>,
        responses: Mutex<VecDeque<Result<SearchResponse>>>,
        requests: Mutex<Vec<QueryParams>>,
    }

    impl FakeApi {
        fn with(responses: Vec<Result<SearchResponse>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                ..Self::default()
            }
        }

        fn requested_pages(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|p| p.get("page").unwrap_or_default().to_string())
                .collect()
        }
    }

    #[async_trait]
    impl PropertyDataApi for FakeApi {
        async fn property_types(&self) -> Result<Vec<PropertyType>> {
            self.types.clone().ok_or_else(|| anyhow!("types endpoint down"))
        }

        async fn search(&self, params: &QueryParams) -> Result<SearchResponse> {
            self.requests.lock().unwrap().push(params.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(SearchResponse::Flat(vec![])))
        }

        fn source_name(&self) -> &str {
            "fake"
        }
    }

    struct FixedGeocoder(Option<&'static str>);

    #[async_trait]
    impl ReverseGeocoder for FixedGeocoder {
        async fn place_name(&self, _: Coordinates) -> Result<String> {
            self.0.map(str::to_string).ok_or_else(|| anyhow!("lookup failed"))
        }
    }

    fn listing(id: i64) -> Property {
        serde_json::from_value(serde_json::json!({ "id": id })).unwrap()
    }

    fn listings(ids: std::ops::RangeInclusive<i64>) -> Vec<Property> {
        ids.map(listing).collect()
    }

    fn paginated(ids: std::ops::RangeInclusive<i64>, count: u64) -> SearchResponse {
        SearchResponse::Paginated {
            results: listings(ids),
            count,
            next: None,
            previous: None,
        }
    }

    fn view(address: &str) -> ListingView<FakeApi> {
        ListingView::new(FakeApi::default(), address)
    }

    #[test]
    fn initial_url_is_decoded_without_resetting_the_page() {
        let view = view("?ownership=management&page=3");

        assert_eq!(view.filters().ownership, Ownership::Management);
        assert_eq!(view.filters().page, 3);
        assert_eq!(view.url_query(), "ownership=management&page_size=10&page=3");
        assert_eq!(view.phase(), Phase::InitialLoad);
    }

    #[test]
    fn broken_initial_url_falls_back_to_defaults() {
        let view = view("http://[::1/properties?page=4");
        assert_eq!(view.filters(), &FilterState::default());
    }

    #[test]
    fn filter_change_resets_page_and_requests_page_one() {
        let mut view = view("page=3");

        view.set_ownership(Ownership::DirectOwner);

        assert_eq!(view.filters().page, 1);
        assert!(view.take_scroll_to_top());
        assert!(!view.take_scroll_to_top());
        assert_eq!(view.url_query(), "ownership=direct_owner&page_size=10");

        let ticket = view.begin_fetch().unwrap();
        assert_eq!(ticket.params().get("page"), Some("1"));
        assert_eq!(ticket.params().get("ownership"), Some("direct_owner"));
    }

    #[test]
    fn stale_url_page_is_ignored_once_after_a_reset() {
        let mut view = view("page=3");
        view.set_listing_type(ListingType::Rent);
        assert_eq!(view.filters().page, 1);

        // The address bar has not caught up yet.
        view.on_url_changed("property_for=rent&page=3");
        assert_eq!(view.filters().page, 1);

        // The flag is one-shot, a later navigation is honoured.
        view.on_url_changed("property_for=rent&page=2");
        assert_eq!(view.filters().page, 2);
    }

    #[test]
    fn explicit_page_choice_clears_a_pending_correction() {
        let mut view = view("page=3");
        view.set_ownership(Ownership::DirectOwner);
        view.set_page(2);
        assert_eq!(view.url_query(), "ownership=direct_owner&page_size=10&page=2");

        // Back to the page-one entry of the history.
        view.on_url_changed("ownership=direct_owner&page_size=10");

        assert_eq!(view.filters().page, 1);
        assert_eq!(view.url_query(), "ownership=direct_owner&page_size=10");
    }

    #[test]
    fn page_size_choice_clears_a_pending_correction() {
        let mut view = view("page=3");
        view.set_listing_type(ListingType::Rent);
        view.set_page_size(20);

        view.on_url_changed("property_for=rent&page_size=20&page=2");

        assert_eq!(view.filters().page, 2);
    }

    #[test]
    fn navigating_to_own_url_keeps_the_buy_selection() {
        let mut view = view("");
        view.set_listing_type(ListingType::Buy);
        let own = view.url_query().to_string();

        view.on_url_changed(&own);

        assert_eq!(view.filters().listing_type, ListingType::Buy);
        assert_eq!(view.url_query(), own);
    }

    #[test]
    fn back_navigation_to_other_filters_applies_them() {
        let mut view = view("search=Kochi");
        view.on_url_changed("?search=Aluva&bedrooms_min=5");

        assert_eq!(view.filters().location_query, "Aluva");
        assert_eq!(view.filters().bedrooms_min, BedroomsMin::FivePlus);
    }

    #[test]
    fn unreadable_url_leaves_filters_untouched() {
        let mut view = view("search=Kochi&page=2");
        let before = view.filters().clone();

        view.on_url_changed("http://[::1/properties?search=Aluva");

        assert_eq!(view.filters(), &before);
    }

    #[test]
    fn stale_responses_are_dropped() {
        let mut view = view("");
        let a = view.begin_fetch().unwrap();

        view.set_location_query("Thrissur");
        let b = view.begin_fetch().unwrap();

        assert!(view.apply_response(b, Ok(paginated(10..=11, 2))));
        assert!(!view.apply_response(a, Ok(paginated(1..=5, 5))));

        let ids: Vec<_> = view.page_result().items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![10, 11]);
        assert_eq!(view.page_result().total_count, 2);
    }

    #[test]
    fn same_request_is_not_issued_twice() {
        let mut view = view("");
        let ticket = view.begin_fetch().unwrap();
        assert!(view.begin_fetch().is_none());

        assert!(view.apply_response(ticket, Ok(paginated(1..=3, 3))));
        assert!(view.begin_fetch().is_none());
        assert!(view.retry().is_some());
    }

    #[test]
    fn phases_follow_the_first_response() {
        let mut view = view("");
        let first = view.begin_fetch().unwrap();
        assert_eq!(view.phase(), Phase::InitialLoad);

        view.apply_response(first, Err(anyhow!("offline")));
        assert_eq!(view.phase(), Phase::Steady);

        view.set_page(2);
        let second = view.begin_fetch().unwrap();
        assert_eq!(view.phase(), Phase::Transitioning);
        assert!(view.is_loading());

        view.apply_response(second, Ok(SearchResponse::Flat(vec![])));
        assert_eq!(view.phase(), Phase::Steady);
    }

    #[test]
    fn invalid_page_goes_back_to_page_one() {
        let mut view = view("page=5");
        let ticket = view.begin_fetch().unwrap();

        assert!(view.apply_response(ticket, Ok(SearchResponse::InvalidPage)));

        assert_eq!(view.filters().page, 1);
        assert_eq!(view.page_result(), &PageResult::default());
        assert!(!view.page_result().is_server_paginated);
        assert!(!view.is_loading());
        assert_eq!(view.error(), None);

        view.on_url_changed("page=5");
        assert_eq!(view.filters().page, 1);
    }

    #[test]
    fn invalid_first_page_is_not_retried() {
        let mut view = view("");
        let ticket = view.begin_fetch().unwrap();
        view.apply_response(ticket, Ok(SearchResponse::InvalidPage));

        assert_eq!(view.filters().page, 1);
        assert!(view.begin_fetch().is_none());
    }

    #[test]
    fn failures_clear_results_and_surface_an_error() {
        let mut view = view("");
        let ok = view.begin_fetch().unwrap();
        view.apply_response(ok, Ok(paginated(1..=10, 30)));

        view.set_page(2);
        let failing = view.begin_fetch().unwrap();
        view.apply_response(failing, Err(anyhow!("connection reset")));

        assert_eq!(view.error(), Some(SEARCH_FAILED));
        assert!(view.page_result().items.is_empty());
        assert_eq!(view.page_result().total_count, 0);
        assert!(!view.page_result().is_server_paginated);

        let again = view.retry().unwrap();
        assert_eq!(view.error(), None);
        assert_eq!(again.params().get("page"), Some("2"));
    }

    #[test]
    fn page_size_change_clamps_the_page() {
        let mut view = view("page=3");
        let ticket = view.begin_fetch().unwrap();
        view.apply_response(ticket, Ok(paginated(21..=25, 25)));
        assert_eq!(view.filters().page, 3);
        view.take_scroll_to_top();

        view.set_page_size(20);

        assert_eq!(view.filters().page, 2);
        assert!(view.take_scroll_to_top());
        assert_eq!(view.url_query(), "page_size=20&page=2");
    }

    #[test]
    fn flat_lists_are_paginated_locally() {
        let mut view = view("page=2&page_size=5");
        let ticket = view.begin_fetch().unwrap();
        view.apply_response(ticket, Ok(SearchResponse::Flat(listings(1..=12))));

        let ids: Vec<_> = view.visible_items().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![6, 7, 8, 9, 10]);
        assert_eq!(view.total_pages(), 3);
        assert!(view.has_next_page());
        assert!(view.has_previous_page());
        assert_eq!(view.page_result().total_count, 12);
    }

    #[test]
    fn server_pages_are_shown_as_received() {
        let mut view = view("page=2");
        let ticket = view.begin_fetch().unwrap();
        view.apply_response(
            ticket,
            Ok(SearchResponse::Paginated {
                results: listings(11..=20),
                count: 35,
                next: Some("next".to_string()),
                previous: Some("prev".to_string()),
            }),
        );

        assert_eq!(view.visible_items().len(), 10);
        assert!(view.page_result().is_server_paginated);
        assert!(view.has_next_page());
        assert!(view.has_previous_page());
    }

    #[tokio::test]
    async fn settle_follows_page_corrections() {
        let api = FakeApi::with(vec![
            Ok(SearchResponse::InvalidPage),
            Ok(paginated(1..=10, 12)),
        ]);
        let mut view = ListingView::new(api, "page=9");

        view.settle().await;

        assert_eq!(view.api().requested_pages(), vec!["9", "1"]);
        assert_eq!(view.filters().page, 1);
        assert_eq!(view.page_result().total_count, 12);
        assert_eq!(view.phase(), Phase::Steady);
    }

    #[tokio::test]
    async fn settle_clamps_past_the_last_page() {
        let api = FakeApi::with(vec![Ok(paginated(1..=0, 25)), Ok(paginated(11..=20, 25))]);
        let mut view = ListingView::new(api, "page=4");

        view.settle().await;

        assert_eq!(view.api().requested_pages(), vec!["4", "3"]);
        assert_eq!(view.filters().page, 3);
    }

    #[tokio::test]
    async fn property_types_resolve_categories() {
        let api = FakeApi {
            types: Some(vec![
                PropertyType {
                    id: 4,
                    name: "Villa".to_string(),
                },
                PropertyType {
                    id: 9,
                    name: "Commercial Land".to_string(),
                },
            ]),
            ..FakeApi::default()
        };
        let mut view = ListingView::new(api, "category=villa");

        view.load_property_types().await;

        assert!(!view.types_loading());
        assert_eq!(view.category_groups().land.len(), 1);
        assert_eq!(view.category_groups().buildings[0].id, 4);
        assert_eq!(view.request_params().get("property_type"), Some("4"));
    }

    #[tokio::test]
    async fn late_property_types_trigger_a_filtered_refetch() {
        let api = FakeApi {
            types: Some(vec![PropertyType {
                id: 4,
                name: "Villa".to_string(),
            }]),
            ..FakeApi::default()
        };
        let mut view = ListingView::new(api, "category=villa");

        let unresolved = view.begin_fetch().unwrap();
        assert!(!unresolved.params().contains("property_type"));
        view.apply_response(unresolved, Ok(paginated(1..=10, 40)));

        view.load_property_types().await;

        let resolved = view.begin_fetch().unwrap();
        assert_eq!(resolved.params().get("property_type"), Some("4"));
        assert_eq!(resolved.params().get("page"), Some("1"));
    }

    #[tokio::test]
    async fn property_types_failure_degrades_to_empty_groups() {
        let mut view = view("category=villa");

        view.load_property_types().await;

        assert!(!view.types_loading());
        assert_eq!(view.category_groups(), &CategoryGroups::default());
        assert!(!view.request_params().contains("property_type"));
        assert!(view.begin_fetch().is_some());
    }

    #[tokio::test]
    async fn reverse_geocoding_is_best_effort() {
        let kochi = Coordinates::new(9.93, 76.26);
        let mut view = view("");
        view.set_user_location(kochi);

        view.resolve_place_name(&FixedGeocoder(None)).await;
        assert_eq!(view.filters().user_location, Some(kochi));
        assert_eq!(view.place_name(), None);

        view.resolve_place_name(&FixedGeocoder(Some("Ernakulam, Kerala"))).await;
        assert_eq!(view.place_name(), Some("Ernakulam, Kerala"));
    }

    #[test]
    fn geolocation_failure_falls_back_from_nearest() {
        let mut view = view("sort=nearest");

        view.geolocation_failed(GeolocationError::PermissionDenied);

        assert_eq!(view.filters().sort, SortOption::Newest);
        assert_eq!(view.geolocation_error(), Some(GeolocationError::PermissionDenied));
    }

    #[test]
    fn nearest_sort_uses_the_user_location() {
        let mut view = view("sort=nearest");
        let ticket = view.begin_fetch().unwrap();
        let near: Property = serde_json::from_value(serde_json::json!({
            "id": 1, "latitude": 9.95, "longitude": 76.27
        }))
        .unwrap();
        let far: Property = serde_json::from_value(serde_json::json!({
            "id": 2, "latitude": 12.97, "longitude": 77.59
        }))
        .unwrap();
        view.apply_response(ticket, Ok(SearchResponse::Flat(vec![far, near])));

        view.set_user_location(Coordinates::new(9.93, 76.26));

        let ids: Vec<_> = view.visible_items().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn buckets_and_clearing() {
        let mut view = view("page_size=20");
        view.select_price_bucket("₹1Cr - ₹2Cr");
        view.select_cents_bucket("10+");
        assert_eq!(
            view.url_query(),
            "price_min=10000000&price_max=20000000&area_unit=cent&area_min=10&page_size=20",
        );

        view.select_sqft_bucket("0-1000");
        assert_eq!(view.filters().active_area(), AreaFilter::SquareFeet { max: 1_000 });

        view.clear_filters();
        assert_eq!(view.url_query(), "page_size=20");
    }
}

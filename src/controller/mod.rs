//! View controllers: filter state, fetch bookkeeping and the loaded list.
//!
//! Controllers never touch the network. Every operation that needs data
//! returns a ticket carrying a generation number; the UI layer runs the fetch
//! on a background task and hands the result back through `apply`. Results
//! whose generation is no longer the latest are dropped, so a slow response
//! can never overwrite a newer one.

mod debounce;
mod location;

pub use debounce::Debouncer;
pub use location::{LocationPicker, LocationTicket};

use crate::api::{FetchError, PageEnvelope, RawFeedItem, Resource};
use crate::catalog::{self, CategoryTheme};
use crate::media::MediaResolver;
use crate::normalize::{normalize_all, FeedItem};
use crate::pagination::PageInfo;
use crate::query::{Filter, QueryState};
use std::time::Duration;

/// Default quiet period for free-text search.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(350);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Success,
    Failed {
        message: String,
    },
}

/// Everything a background task needs to fetch one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub resource: Resource,
    pub query: QueryState,
}

/// One listing view (posts, housing, jobs, ...).
#[derive(Debug)]
pub struct FeedView {
    resource: Resource,
    query: QueryState,
    items: Vec<FeedItem>,
    page_info: PageInfo,
    state: LoadState,
    /// Generation of the most recent ticket. Results carrying any other
    /// value are stale.
    generation: u64,
    search: Debouncer<String>,
    /// Text in the search box, applied or not.
    search_input: String,
    media: MediaResolver,
    skipped: usize,
    /// Page to fall back to if the in-flight page move fails.
    page_fallback: Option<u32>,
}

impl FeedView {
    pub fn new(
        resource: Resource,
        page_size: u32,
        search_debounce: Duration,
        media: MediaResolver,
    ) -> Self {
        Self {
            resource,
            query: QueryState::new(page_size, resource.default_category()),
            items: Vec::new(),
            page_info: PageInfo::default(),
            state: LoadState::Idle,
            generation: 0,
            search: Debouncer::new(search_debounce),
            search_input: String::new(),
            media,
            skipped: 0,
            page_fallback: None,
        }
    }

    /// Start on a category other than the resource default. Issues no fetch.
    pub fn with_category(mut self, code: Option<i32>) -> Self {
        self.query.set_filter(Filter::Category(code));
        self
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    pub fn page_info(&self) -> PageInfo {
        self.page_info
    }

    /// Page links for the pagination bar.
    pub fn window(&self) -> Vec<u32> {
        self.page_info.window()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Items dropped from the last page because they failed to decode.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// The spinner replaces the list only when there is nothing to show yet.
    pub fn show_loading_indicator(&self) -> bool {
        self.is_loading() && self.items.is_empty()
    }

    /// Theme of the active category filter, or the fallback when unfiltered.
    pub fn theme(&self) -> &'static CategoryTheme {
        catalog::lookup_opt(self.query.category())
    }

    pub fn accent_color(&self) -> &'static str {
        self.theme().accent_color
    }

    /// First fetch when the view is shown.
    pub fn on_mount(&mut self) -> FetchTicket {
        tracing::debug!(resource = self.resource.name(), "Mounting view");
        self.begin_fetch()
    }

    /// Record a search-box edit. The filter is applied later by
    /// [`FeedView::poll_debounce`].
    pub fn on_search_input(&mut self, text: impl Into<String>) {
        self.search_input = text.into();
        self.search.push(self.search_input.clone());
    }

    /// Apply the search text once typing has paused.
    ///
    /// Returns a ticket only if the settled text differs from the search
    /// already applied.
    pub fn poll_debounce(&mut self) -> Option<FetchTicket> {
        let text = self.search.poll()?;
        let text = text.trim();
        if text == self.query.search_text() {
            tracing::trace!("Debounced search unchanged, skipping fetch");
            return None;
        }
        self.query.set_filter(Filter::Search(text.to_string()));
        Some(self.begin_fetch())
    }

    pub fn search_pending(&self) -> bool {
        self.search.is_pending()
    }

    /// Apply a discrete filter immediately.
    ///
    /// A search passed here skips the debounce (e.g. Enter in the search
    /// box). Returns `None` when neither the filter nor the page moved.
    pub fn on_filter(&mut self, filter: Filter) -> Option<FetchTicket> {
        let filter = match filter {
            Filter::Search(text) => {
                self.search.cancel();
                self.search_input = text.trim().to_string();
                Filter::Search(self.search_input.clone())
            }
            other => other,
        };
        let was_first_page = self.query.page_number() == 1;
        let changed = self.query.set_filter(filter);
        if !changed && was_first_page {
            return None;
        }
        Some(self.begin_fetch())
    }

    /// Go to page `n`, clamped to the known page count.
    pub fn on_page(&mut self, n: u32) -> Option<FetchTicket> {
        let mut target = n.max(1);
        if self.page_info.total_pages > 0 {
            target = target.min(self.page_info.total_pages);
        }
        let current = self.query.page_number();
        if target == current {
            return None;
        }
        self.query.set_page(target);
        let ticket = self.begin_fetch();
        self.page_fallback = Some(current);
        Some(ticket)
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        self.on_page(self.query.page_number().saturating_add(1))
    }

    pub fn prev_page(&mut self) -> Option<FetchTicket> {
        self.on_page(self.query.page_number().saturating_sub(1))
    }

    pub fn last_page(&mut self) -> Option<FetchTicket> {
        match self.page_info.total_pages {
            0 => None,
            last => self.on_page(last),
        }
    }

    /// Re-fetch the current page with unchanged filters.
    pub fn reload(&mut self) -> FetchTicket {
        self.begin_fetch()
    }

    /// Clear search and location, keep the category, back to page 1.
    pub fn reset(&mut self) -> FetchTicket {
        self.search.cancel();
        self.search_input.clear();
        self.query.reset();
        self.begin_fetch()
    }

    fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        self.page_fallback = None;
        tracing::debug!(
            generation = self.generation,
            resource = self.resource.name(),
            page = self.query.page_number(),
            "Issuing fetch"
        );
        FetchTicket {
            generation: self.generation,
            resource: self.resource,
            query: self.query.clone(),
        }
    }

    /// Hand a fetch result back to the view.
    ///
    /// Returns false if the result was stale and ignored.
    pub fn apply(
        &mut self,
        generation: u64,
        result: Result<PageEnvelope<RawFeedItem>, FetchError>,
    ) -> bool {
        if generation != self.generation {
            tracing::debug!(
                expected = self.generation,
                got = generation,
                "Ignoring stale page (generation mismatch)"
            );
            return false;
        }

        match result.and_then(PageEnvelope::into_checked) {
            Ok(envelope) => {
                self.page_fallback = None;
                self.page_info = envelope.page_info();
                self.skipped = envelope.skipped;
                self.items = normalize_all(&envelope.items, &self.media);
                self.state = LoadState::Success;
                tracing::debug!(
                    generation,
                    items = self.items.len(),
                    total_pages = self.page_info.total_pages,
                    "Page loaded"
                );
            }
            Err(e) => {
                tracing::warn!(generation, error = %e, "Page fetch failed");
                self.restore_page();
                self.state = LoadState::Failed {
                    message: e.user_message(),
                };
            }
        }
        true
    }

    /// Mark the in-flight fetch as failed without a result, e.g. when the
    /// task running it died.
    pub fn fail_in_flight(&mut self, message: impl Into<String>) {
        if self.state == LoadState::Loading {
            self.generation += 1;
            self.restore_page();
            self.state = LoadState::Failed {
                message: message.into(),
            };
        }
    }

    /// Return to the page still on screen after a failed page move.
    fn restore_page(&mut self) {
        if let Some(page) = self.page_fallback.take() {
            self.query.set_page(page);
        }
    }

    /// Drop unapplied search-box edits, restoring the applied text.
    pub fn cancel_search_input(&mut self) {
        self.search.cancel();
        self.search_input = self.query.search_text().to_string();
    }

    /// Stop caring about in-flight work. Any result that arrives later is
    /// stale.
    pub fn teardown(&mut self) {
        self.generation += 1;
        self.search.cancel();
        if self.state == LoadState::Loading {
            self.state = LoadState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{decode_page, RawId};
    use crate::catalog::HOUSING;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn view(resource: Resource) -> FeedView {
        FeedView::new(resource, 12, DEFAULT_SEARCH_DEBOUNCE, MediaResolver::default())
    }

    fn page(ids: std::ops::Range<i64>, total_count: u64, total_pages: u32) -> PageEnvelope<RawFeedItem> {
        let items: Vec<RawFeedItem> = ids
            .map(|id| RawFeedItem {
                id: Some(RawId::Num(id)),
                title: Some(format!("item {id}")),
                ..RawFeedItem::default()
            })
            .collect();
        PageEnvelope {
            succeeded: true,
            page: 1,
            page_size: 12,
            total_count,
            total_pages,
            items,
            error: None,
            skipped: 0,
        }
    }

    #[test]
    fn mount_issues_one_fetch_with_resource_category() {
        let mut v = view(Resource::Housing);
        assert_eq!(v.state(), &LoadState::Idle);
        let ticket = v.on_mount();
        assert_eq!(ticket.generation, 1);
        assert_eq!(ticket.query.category(), Some(HOUSING));
        assert!(v.show_loading_indicator());
    }

    #[test]
    fn success_replaces_list_and_window() {
        let mut v = view(Resource::Housing);
        let t = v.on_mount();
        assert!(v.apply(t.generation, Ok(page(0..12, 40, 4))));
        assert_eq!(v.items().len(), 12);
        assert_eq!(v.window(), vec![1, 2, 3]);
        assert_eq!(v.accent_color(), catalog::lookup(HOUSING).accent_color);
        assert_eq!(v.state(), &LoadState::Success);
    }

    #[test]
    fn failure_keeps_last_list_and_shows_message() {
        let mut v = view(Resource::Posts);
        let t = v.on_mount();
        v.apply(t.generation, Ok(page(0..3, 3, 1)));

        let t = v.reload();
        assert!(!v.show_loading_indicator());
        v.apply(t.generation, Err(FetchError::HttpStatus(500)));
        assert_eq!(v.items().len(), 3);
        assert_eq!(
            v.error_message(),
            Some(crate::api::GENERIC_ERROR_MESSAGE)
        );
    }

    #[test]
    fn application_error_message_is_shown_verbatim() {
        let mut v = view(Resource::Posts);
        let t = v.on_mount();
        let body = serde_json::to_vec(&json!({
            "succeeded": false,
            "error": { "code": "Forbidden", "message": "Join the group to see its posts" }
        }))
        .unwrap();
        let envelope = decode_page(&body, &t.query);
        v.apply(t.generation, envelope);
        assert_eq!(v.error_message(), Some("Join the group to see its posts"));
    }

    #[test]
    fn stale_result_is_ignored() {
        let mut v = view(Resource::Posts);
        let first = v.on_mount();
        let second = v.on_filter(Filter::Category(Some(2))).unwrap();

        // The newer request finishes first.
        assert!(v.apply(second.generation, Ok(page(100..101, 1, 1))));
        assert!(!v.apply(first.generation, Ok(page(0..12, 40, 4))));
        assert_eq!(v.items().len(), 1);
        assert_eq!(v.items()[0].id, "100");
    }

    #[test]
    fn teardown_invalidates_in_flight_fetch() {
        let mut v = view(Resource::Jobs);
        let t = v.on_mount();
        v.teardown();
        assert!(!v.apply(t.generation, Ok(page(0..2, 2, 1))));
        assert!(v.items().is_empty());
        assert_eq!(v.state(), &LoadState::Idle);
    }

    #[test]
    fn filter_change_resets_page_and_fetches() {
        let mut v = view(Resource::Posts);
        let t = v.on_mount();
        v.apply(t.generation, Ok(page(0..12, 40, 4)));
        let t = v.on_page(3).unwrap();
        assert_eq!(t.query.page_number(), 3);

        let t = v.on_filter(Filter::Location(Some(7))).unwrap();
        assert_eq!(t.query.page_number(), 1);
        assert_eq!(t.query.location(), Some(7));
    }

    #[test]
    fn unchanged_filter_on_first_page_does_not_fetch() {
        let mut v = view(Resource::Events);
        v.on_mount();
        assert_eq!(v.on_filter(Filter::Category(Some(catalog::EVENTS))), None);
        assert_eq!(v.on_filter(Filter::Location(None)), None);
    }

    #[test]
    fn page_is_clamped_to_known_total() {
        let mut v = view(Resource::Posts);
        let t = v.on_mount();
        v.apply(t.generation, Ok(page(0..12, 40, 4)));
        assert_eq!(v.on_page(0), None);
        assert_eq!(v.on_page(9).map(|t| t.query.page_number()), Some(4));
        assert_eq!(v.next_page(), None);
        assert_eq!(v.prev_page().map(|t| t.query.page_number()), Some(3));
    }

    #[test]
    fn failed_page_move_returns_to_shown_page() {
        let mut v = view(Resource::Posts);
        let t = v.on_mount();
        v.apply(t.generation, Ok(page(0..12, 40, 4)));

        let t = v.next_page().unwrap();
        assert_eq!(t.query.page_number(), 2);
        v.apply(t.generation, Err(FetchError::Timeout));
        assert_eq!(v.query().page_number(), 1);
        assert_eq!(v.page_info().page, 1);

        // Retrying asks for the same page again.
        let t = v.next_page().unwrap();
        assert_eq!(t.query.page_number(), 2);
        assert_eq!(v.reload().query.page_number(), 2);
    }

    #[test]
    fn failed_filter_change_stays_on_first_page() {
        let mut v = view(Resource::Posts);
        let t = v.on_mount();
        v.apply(t.generation, Ok(page(0..12, 40, 4)));
        let t = v.on_page(3).unwrap();
        v.apply(t.generation, Ok(page(0..12, 40, 4)));

        let t = v.on_filter(Filter::Location(Some(2))).unwrap();
        v.apply(t.generation, Err(FetchError::HttpStatus(500)));
        assert_eq!(v.query().page_number(), 1);
    }

    #[test]
    fn starting_category_issues_no_fetch() {
        let mut v = view(Resource::Posts).with_category(Some(catalog::JOBS));
        assert_eq!(v.generation(), 0);
        let t = v.on_mount();
        assert_eq!(t.generation, 1);
        assert_eq!(t.query.category(), Some(catalog::JOBS));
    }

    #[test]
    fn reset_keeps_category() {
        let mut v = view(Resource::Housing);
        v.on_mount();
        v.on_filter(Filter::Search("studio".into()));
        v.on_filter(Filter::Location(Some(3)));
        let t = v.reset();
        assert_eq!(t.query.category(), Some(HOUSING));
        assert_eq!(t.query.search_text(), "");
        assert_eq!(t.query.location(), None);
        assert_eq!(v.search_input(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn search_is_debounced() {
        let mut v = view(Resource::Posts);
        v.on_mount();
        v.on_search_input("gar");
        tokio::time::advance(Duration::from_millis(100)).await;
        v.on_search_input("garden");
        tokio::time::advance(Duration::from_millis(300)).await;
        assert_eq!(v.poll_debounce(), None);

        tokio::time::advance(Duration::from_millis(50)).await;
        let t = v.poll_debounce().unwrap();
        assert_eq!(t.query.search_text(), "garden");
        assert_eq!(t.query.page_number(), 1);
        assert_eq!(t.generation, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn settled_text_equal_to_applied_search_is_skipped() {
        let mut v = view(Resource::Posts);
        v.on_mount();
        v.on_filter(Filter::Search("garden".into()));
        v.on_search_input("garden ");
        tokio::time::advance(DEFAULT_SEARCH_DEBOUNCE).await;
        assert_eq!(v.poll_debounce(), None);
    }

    #[test]
    fn failed_task_releases_loading_state() {
        let mut v = view(Resource::Posts);
        let t = v.on_mount();
        v.fail_in_flight(crate::api::GENERIC_ERROR_MESSAGE);
        assert_eq!(v.error_message(), Some(crate::api::GENERIC_ERROR_MESSAGE));
        assert!(!v.apply(t.generation, Ok(page(0..1, 1, 1))));

        // no-op once settled
        v.fail_in_flight("other");
        assert_eq!(v.error_message(), Some(crate::api::GENERIC_ERROR_MESSAGE));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_edit_restores_applied_search() {
        let mut v = view(Resource::Posts);
        v.on_mount();
        v.on_filter(Filter::Search("park".into()));
        v.on_search_input("parking");
        v.cancel_search_input();
        assert_eq!(v.search_input(), "park");
        tokio::time::advance(DEFAULT_SEARCH_DEBOUNCE).await;
        assert_eq!(v.poll_debounce(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_search_cancels_pending_debounce() {
        let mut v = view(Resource::Posts);
        v.on_mount();
        v.on_search_input("par");
        let t = v.on_filter(Filter::Search("park".into())).unwrap();
        assert_eq!(t.query.search_text(), "park");
        tokio::time::advance(DEFAULT_SEARCH_DEBOUNCE).await;
        assert_eq!(v.poll_debounce(), None);
    }
}

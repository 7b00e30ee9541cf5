use crate::api::{ApiClient, FetchError, Location, PageEnvelope, RawFeedItem, Resource};
use crate::catalog;
use crate::config::Config;
use crate::controller::{FeedView, LocationPicker};
use crate::media::MediaResolver;
use crate::normalize::FeedItem;
use crate::theme::{StyleMap, ThemeVariant};
use anyhow::{Context, Result};
use ratatui::style::Style;
use std::borrow::Cow;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use url::Url;

/// How long a status bar message stays visible.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// Modes and Events
// ============================================================================

/// What keystrokes currently mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Navigation keys drive the list and filters.
    Browse,
    /// Keystrokes edit the search box.
    Search,
    /// Keystrokes edit the location typeahead overlay.
    LocationPicker,
}

/// Completion messages from background tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// A listing page fetch finished.
    PageLoaded {
        /// Generation of the ticket that started the fetch.
        generation: u64,
        result: Result<PageEnvelope<RawFeedItem>, FetchError>,
    },
    /// A location typeahead query finished.
    LocationsLoaded {
        generation: u64,
        result: Result<Vec<Location>, FetchError>,
    },
    /// A background task panicked instead of reporting back.
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// App State
// ============================================================================

pub struct App {
    pub client: ApiClient,
    /// Frontend root for "open in browser". `None` disables the action.
    pub web_base_url: Option<Url>,

    // Theme
    /// Current theme variant (for cycling).
    pub theme_variant: ThemeVariant,
    /// Active style map for all UI rendering.
    pub theme: StyleMap,

    // Views
    pub view: FeedView,
    pub locations: LocationPicker,
    /// Display label of the applied location filter.
    pub location_label: Option<String>,

    // UI State
    pub mode: Mode,
    pub selected_item: usize,
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    /// Set whenever state changes; the loop only draws when true.
    pub needs_redraw: bool,
    pub show_help: bool,
    pub help_scroll_offset: u16,
    pub spinner_frame: usize,

    // Background tasks
    /// In-flight page fetch. Aborted when a newer fetch starts.
    pub fetch_handle: Option<JoinHandle<()>>,
    /// In-flight location search.
    pub location_handle: Option<JoinHandle<()>>,
}

impl App {
    /// Build the app for one listing `resource` from validated config,
    /// optionally starting on `category` instead of the resource default.
    pub fn new(config: &Config, resource: Resource, category: Option<i32>) -> Result<Self> {
        let client = ApiClient::new(
            &config.api_base_url,
            config.request_timeout(),
            config.api_token(),
        )
        .context("Failed to build API client")?;

        let web_base_url = config
            .web_base_url
            .as_deref()
            .map(Url::parse)
            .transpose()
            .context("Invalid web_base_url")?;

        let theme_variant = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "Unknown theme, using dark");
            ThemeVariant::Dark
        });

        let media = MediaResolver::new(config.media.clone());
        let mut view = FeedView::new(resource, config.page_size, config.search_debounce(), media);
        if category.is_some() {
            view = view.with_category(category);
        }
        let locations = LocationPicker::new(config.search_debounce(), config.location_limit);

        Ok(Self {
            client,
            web_base_url,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            view,
            locations,
            location_label: None,
            mode: Mode::Browse,
            selected_item: 0,
            status_message: None,
            needs_redraw: true,
            show_help: false,
            help_scroll_offset: 0,
            spinner_frame: 0,
            fetch_handle: None,
            location_handle: None,
        })
    }

    /// Look up a style by semantic role name.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Switch to the next variant and return its name.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    // ------------------------------------------------------------------------
    // Item selection
    // ------------------------------------------------------------------------

    pub fn selected_item(&self) -> Option<&FeedItem> {
        self.view.items().get(self.selected_item)
    }

    pub fn nav_up(&mut self) {
        self.selected_item = self.selected_item.saturating_sub(1);
    }

    pub fn nav_down(&mut self) {
        let len = self.view.items().len();
        if len > 0 {
            self.selected_item = (self.selected_item + 1).min(len - 1);
        }
    }

    /// Keep the selection inside the loaded list after it changes.
    pub fn clamp_selection(&mut self) {
        let len = self.view.items().len();
        self.selected_item = match len {
            0 => 0,
            n => self.selected_item.min(n - 1),
        };
    }

    // ------------------------------------------------------------------------
    // Category sidebar
    // ------------------------------------------------------------------------

    /// Sidebar entries: "All" followed by every registered category.
    pub fn category_choices() -> Vec<Option<i32>> {
        std::iter::once(None)
            .chain(catalog::all().iter().map(|t| Some(t.code)))
            .collect()
    }

    /// Sidebar row of the active category filter.
    pub fn active_category_index(&self) -> usize {
        self.view
            .query()
            .category()
            .and_then(catalog::position)
            .map_or(0, |pos| pos + 1)
    }

    /// Category filter `delta` rows away from the active one, wrapping.
    pub fn adjacent_category(&self, delta: isize) -> Option<i32> {
        let choices = Self::category_choices();
        let len = choices.len() as isize;
        let idx = (self.active_category_index() as isize + delta).rem_euclid(len);
        choices[idx as usize]
    }

    // ------------------------------------------------------------------------
    // Links
    // ------------------------------------------------------------------------

    /// Frontend URL of an item: web base, category route, item id.
    pub fn item_link(&self, item: &FeedItem) -> Option<String> {
        let base = self.web_base_url.as_ref()?;
        if item.id.is_empty() {
            return None;
        }
        let route = item.category().route_path.trim_matches('/');
        let path = if route.is_empty() {
            item.id.clone()
        } else {
            format!("{route}/{}", item.id)
        };
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(&path).ok().map(String::from)
    }

    // ------------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired. Returns true if one was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Abort background work and invalidate anything still in flight.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
        }
        if let Some(handle) = self.location_handle.take() {
            handle.abort();
        }
        self.view.teardown();
        self.locations.teardown();
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.teardown();
        tracing::debug!("Aborted background tasks on App drop");
    }
}

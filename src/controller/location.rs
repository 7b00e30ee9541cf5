//! Location typeahead.

use super::{Debouncer, LoadState};
use crate::api::{FetchError, Location};
use std::time::Duration;

/// Default number of suggestions requested.
pub const DEFAULT_LOCATION_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationTicket {
    pub generation: u64,
    pub query: String,
    pub limit: u32,
}

/// Suggestion list behind the location filter.
///
/// Same debounce-then-fetch cycle as the listing search, with its own
/// generation counter.
#[derive(Debug)]
pub struct LocationPicker {
    input: String,
    debounce: Debouncer<String>,
    results: Vec<Location>,
    selected: usize,
    state: LoadState,
    generation: u64,
    limit: u32,
}

impl LocationPicker {
    pub fn new(delay: Duration, limit: u32) -> Self {
        Self {
            input: String::new(),
            debounce: Debouncer::new(delay),
            results: Vec::new(),
            selected: 0,
            state: LoadState::Idle,
            generation: 0,
            limit: limit.max(1),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn results(&self) -> &[Location] {
        &self.results
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&Location> {
        self.results.get(self.selected)
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
        self.debounce.push(self.input.clone());
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
        self.debounce.push(self.input.clone());
    }

    /// Query to run once typing has paused.
    ///
    /// Blank input clears the suggestions without a request.
    pub fn poll_debounce(&mut self) -> Option<LocationTicket> {
        let text = self.debounce.poll()?;
        let query = text.trim();
        self.generation += 1;
        if query.is_empty() {
            self.results.clear();
            self.selected = 0;
            self.state = LoadState::Idle;
            return None;
        }
        self.state = LoadState::Loading;
        tracing::debug!(generation = self.generation, query, "Searching locations");
        Some(LocationTicket {
            generation: self.generation,
            query: query.to_string(),
            limit: self.limit,
        })
    }

    /// Returns false if the result was stale and ignored.
    pub fn apply(&mut self, generation: u64, result: Result<Vec<Location>, FetchError>) -> bool {
        if generation != self.generation {
            tracing::debug!(
                expected = self.generation,
                got = generation,
                "Ignoring stale location results"
            );
            return false;
        }
        match result {
            Ok(mut locations) => {
                locations.truncate(self.limit as usize);
                self.results = locations;
                self.selected = 0;
                self.state = LoadState::Success;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Location search failed");
                self.state = LoadState::Failed {
                    message: e.user_message(),
                };
            }
        }
        true
    }

    /// Settle a search whose task died without a result.
    pub fn fail_in_flight(&mut self, message: impl Into<String>) {
        if self.state == LoadState::Loading {
            self.generation += 1;
            self.state = LoadState::Failed {
                message: message.into(),
            };
        }
    }

    pub fn select_next(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + 1).min(self.results.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Close the picker, invalidating any in-flight search.
    pub fn teardown(&mut self) {
        self.generation += 1;
        self.debounce.cancel();
        self.input.clear();
        self.results.clear();
        self.selected = 0;
        self.state = LoadState::Idle;
    }
}

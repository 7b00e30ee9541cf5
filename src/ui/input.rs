//! Keyboard input handling for browse, search and location picker modes.

use crate::app::{App, AppEvent, Mode};
use crate::query::Filter;
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{dispatch, open_selected_item, spawn_fetch};
use super::loop_runner::Action;

/// Longest text accepted in the location typeahead.
const MAX_LOCATION_QUERY_LENGTH: usize = 64;

/// Route a key press to the handler for the current mode.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Ok(Action::Quit);
    }

    // Help overlay captures all keys when visible
    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    match app.mode {
        Mode::Browse => handle_browse_input(app, code, event_tx),
        Mode::Search => Ok(handle_search_input(app, code, event_tx)),
        Mode::LocationPicker => Ok(handle_location_input(app, code, event_tx)),
    }
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

fn handle_browse_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),
        KeyCode::Char('?') => app.show_help = true,

        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),

        KeyCode::Char('l') | KeyCode::Right => {
            let ticket = app.view.next_page();
            dispatch(app, ticket, event_tx);
        }
        KeyCode::Char('h') | KeyCode::Left => {
            let ticket = app.view.prev_page();
            dispatch(app, ticket, event_tx);
        }
        KeyCode::Char('g') => {
            let ticket = app.view.on_page(1);
            dispatch(app, ticket, event_tx);
        }
        KeyCode::Char('G') => {
            let ticket = app.view.last_page();
            dispatch(app, ticket, event_tx);
        }

        KeyCode::Char(']') => change_category(app, 1, event_tx),
        KeyCode::Char('[') => change_category(app, -1, event_tx),

        KeyCode::Char('/') => {
            app.mode = Mode::Search;
        }
        KeyCode::Char('L') => {
            app.locations.teardown();
            app.mode = Mode::LocationPicker;
        }
        KeyCode::Char('X') => {
            if app.view.query().location().is_none() {
                app.set_status("No location filter set");
            } else {
                app.location_label = None;
                let ticket = app.view.on_filter(Filter::Location(None));
                dispatch(app, ticket, event_tx);
                app.set_status("Location filter cleared");
            }
        }
        KeyCode::Char('x') => {
            app.location_label = None;
            let ticket = app.view.reset();
            spawn_fetch(app, ticket, event_tx);
            app.set_status("Filters reset");
        }
        KeyCode::Char('r') => {
            let ticket = app.view.reload();
            spawn_fetch(app, ticket, event_tx);
        }

        KeyCode::Char('o') | KeyCode::Enter => open_selected_item(app)?,
        KeyCode::Char('t') => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {name}"));
        }
        _ => {}
    }
    Ok(Action::Continue)
}

fn change_category(app: &mut App, delta: isize, event_tx: &mpsc::Sender<AppEvent>) {
    let category = app.adjacent_category(delta);
    let ticket = app.view.on_filter(Filter::Category(category));
    dispatch(app, ticket, event_tx);
}

/// Search box editing. Typed text is applied by the tick once it settles;
/// Enter applies it immediately.
fn handle_search_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match code {
        KeyCode::Esc => {
            app.view.cancel_search_input();
            app.mode = Mode::Browse;
        }
        KeyCode::Enter => {
            app.mode = Mode::Browse;
            let text = app.view.search_input().to_string();
            let ticket = app.view.on_filter(Filter::Search(text));
            dispatch(app, ticket, event_tx);
        }
        KeyCode::Backspace => {
            let mut text = app.view.search_input().to_string();
            text.pop();
            app.view.on_search_input(text);
        }
        KeyCode::Char(c) => {
            if app.view.search_input().len() >= MAX_SEARCH_QUERY_LENGTH {
                app.set_status(format!(
                    "Search query at max length ({MAX_SEARCH_QUERY_LENGTH} chars)"
                ));
                return Action::Continue;
            }
            let mut text = app.view.search_input().to_string();
            text.push(c);
            app.view.on_search_input(text);
        }
        _ => {}
    }
    Action::Continue
}

fn handle_location_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match code {
        KeyCode::Esc => close_location_picker(app),
        KeyCode::Enter => {
            let Some(location) = app.locations.selected().cloned() else {
                return Action::Continue;
            };
            close_location_picker(app);
            tracing::debug!(location_id = location.id, "Applying location filter");
            app.location_label = Some(location.label());
            let ticket = app.view.on_filter(Filter::Location(Some(location.id)));
            dispatch(app, ticket, event_tx);
        }
        KeyCode::Down | KeyCode::Tab => app.locations.select_next(),
        KeyCode::Up | KeyCode::BackTab => app.locations.select_prev(),
        KeyCode::Backspace => app.locations.pop_char(),
        KeyCode::Char(c) => {
            if app.locations.input().len() < MAX_LOCATION_QUERY_LENGTH {
                app.locations.push_char(c);
            }
        }
        _ => {}
    }
    Action::Continue
}

fn close_location_picker(app: &mut App) {
    if let Some(handle) = app.location_handle.take() {
        handle.abort();
    }
    app.locations.teardown();
    app.mode = Mode::Browse;
}

//! Render functions for the TUI.
//!
//! Lays out the sidebar, search bar, item list, pagination bar and status
//! bar, then draws overlays on top.

use crate::app::{App, Mode};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{categories, help, items, location, pager, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Sidebar width in columns.
const SIDEBAR_WIDTH: u16 = 24;

/// Main render entry point.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    // Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(rows[0]);

    categories::render(f, app, columns[0]);
    render_main(f, app, columns[1]);
    status::render(f, app, rows[1]);

    if app.mode == Mode::LocationPicker {
        location::render(f, app);
    }
    if app.show_help {
        help::render(f, app);
    }
}

/// Search bar, item list and pagination bar.
fn render_main(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_search_bar(f, app, chunks[0]);
    items::render(f, app, chunks[1]);
    pager::render(f, app, chunks[2]);
}

fn render_search_bar(f: &mut Frame, app: &App, area: Rect) {
    let input = app.view.search_input();
    let mut spans = vec![Span::styled(" Search: ", app.style("search_prompt"))];
    if app.mode == Mode::Search {
        spans.push(Span::raw(format!("{input}_")));
    } else if input.is_empty() {
        spans.push(Span::styled("press / to search", app.style("empty_state")));
    } else {
        spans.push(Span::raw(input.to_string()));
    }
    if app.view.search_pending() {
        spans.push(Span::styled("  …", app.style("loading")));
    }
    if let Some(label) = &app.location_label {
        spans.push(Span::styled(format!("   Location: {label}"), app.style("item_meta")));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// A rectangle covering the given percentage of `area`, centered.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FetchError, Location, PageEnvelope, RawFeedItem, RawId, Resource, GENERIC_ERROR_MESSAGE};
    use crate::catalog::HOUSING;
    use crate::config::Config;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn housing_page() -> PageEnvelope<RawFeedItem> {
        PageEnvelope {
            succeeded: true,
            page: 1,
            page_size: 12,
            total_count: 40,
            total_pages: 4,
            items: (0..12)
                .map(|id| RawFeedItem {
                    id: Some(RawId::Num(id)),
                    title: Some(format!("Studio {id}")),
                    category: Some(HOUSING),
                    ..RawFeedItem::default()
                })
                .collect(),
            error: None,
            skipped: 0,
        }
    }

    #[tokio::test]
    async fn test_too_small_terminal() {
        let app = App::new(&Config::default(), Resource::Posts, None).unwrap();
        assert!(screen(&app, 40, 8).contains("Terminal too small"));
    }

    #[tokio::test]
    async fn test_loaded_page_shows_items_and_pager() {
        let mut app = App::new(&Config::default(), Resource::Housing, None).unwrap();
        let t = app.view.on_mount();
        app.view.apply(t.generation, Ok(housing_page()));
        let text = screen(&app, 100, 40);
        assert!(text.contains("Studio 0"));
        assert!(text.contains("page 1 of 4"));
        assert!(text.contains("Housing"));
    }

    #[tokio::test]
    async fn test_error_is_shown_inline() {
        let mut app = App::new(&Config::default(), Resource::Posts, None).unwrap();
        let t = app.view.on_mount();
        app.view.apply(t.generation, Err(FetchError::HttpStatus(502)));
        assert!(screen(&app, 100, 30).contains(GENERIC_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn test_overlays_render() {
        let mut app = App::new(&Config::default(), Resource::Posts, None).unwrap();
        app.show_help = true;
        assert!(screen(&app, 100, 40).contains("Help"));
        app.show_help = false;
        app.mode = Mode::LocationPicker;
        assert!(screen(&app, 100, 40).contains("Start typing to search"));
    }

    #[tokio::test]
    async fn test_location_label_reaches_screen_clean() {
        let mut app = App::new(&Config::default(), Resource::Posts, None).unwrap();
        let location = Location {
            id: 3,
            borough: "\x1b]0;pwned\x07Bronx".into(),
            neighborhood: String::new(),
            zip_code: String::new(),
        };
        app.location_label = Some(location.label());
        let text = screen(&app, 100, 30);
        assert!(text.contains("Location: Bronx"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_centered_rect() {
        let r = centered_rect(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!(r, Rect::new(25, 10, 50, 20));
    }
}

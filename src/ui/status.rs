use crate::app::{App, Mode};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }
    let paragraph = Paragraph::new(status_text(app)).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}

/// Transient message if any, otherwise key hints for the current mode.
fn status_text(app: &App) -> Cow<'_, str> {
    if let Some((msg, _)) = &app.status_message {
        return Cow::Borrowed(msg.as_ref());
    }
    match app.mode {
        Mode::Search => Cow::Borrowed("Type to search | ESC cancel | ENTER apply now"),
        Mode::LocationPicker => {
            Cow::Borrowed("Type a neighborhood | ↑/↓ choose | ENTER apply | ESC cancel")
        }
        Mode::Browse => Cow::Borrowed(
            "[j/k]move [h/l]page [[/]]category [/]search [L]ocation [o]pen [r]eload [?]help [q]uit",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Resource;
    use crate::config::Config;

    #[tokio::test]
    async fn test_message_wins_over_hints() {
        let mut app = App::new(&Config::default(), Resource::Posts, None).unwrap();
        assert!(status_text(&app).starts_with("[j/k]move"));
        app.mode = Mode::Search;
        assert!(status_text(&app).starts_with("Type to search"));
        app.set_status("Theme: Light");
        assert_eq!(status_text(&app), "Theme: Light");
    }
}

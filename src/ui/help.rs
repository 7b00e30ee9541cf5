//! Help overlay: scrollable keybinding table.

use crate::app::App;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
    Frame,
};

use super::render::centered_rect;

/// Key bindings grouped by section, in display order.
const SECTIONS: [(&str, &[(&str, &str)]); 4] = [
    (
        "General",
        &[
            ("?", "Toggle this help"),
            ("t", "Cycle theme"),
            ("q / Ctrl+c", "Quit"),
        ],
    ),
    (
        "List",
        &[
            ("j / ↓", "Next item"),
            ("k / ↑", "Previous item"),
            ("o / Enter", "Open item in browser"),
            ("r", "Reload current page"),
        ],
    ),
    (
        "Pages & filters",
        &[
            ("l / →", "Next page"),
            ("h / ←", "Previous page"),
            ("g / G", "First / last page"),
            ("] / [", "Next / previous category"),
            ("/", "Search"),
            ("L", "Pick a location"),
            ("X", "Clear location"),
            ("x", "Reset search and location"),
        ],
    ),
    (
        "Search & location",
        &[
            ("Enter", "Apply now"),
            ("Esc", "Cancel"),
            ("↑ / ↓ / Tab", "Choose location"),
        ],
    ),
];

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(70, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }
    f.render_widget(Clear, overlay);

    let mut rows: Vec<Row> = Vec::new();
    for (label, bindings) in SECTIONS {
        rows.push(Row::new(vec![
            Line::from(Span::styled(
                format!("-- {label} --"),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ]));
        for (key, description) in bindings {
            rows.push(Row::new(vec![format!("  {key}"), description.to_string()]));
        }
        rows.push(Row::new(vec![String::new(), String::new()]));
    }
    rows.pop();

    let total_rows = rows.len();
    let visible_height = overlay.height.saturating_sub(3) as usize; // -2 border -1 header
    let max_scroll = total_rows.saturating_sub(visible_height);
    let scroll = usize::from(app.help_scroll_offset).min(max_scroll);
    let visible_rows: Vec<Row> = rows.into_iter().skip(scroll).take(visible_height).collect();

    let title = if max_scroll > 0 {
        format!(" Help ({}/{}) ", scroll + 1, max_scroll + 1)
    } else {
        " Help (? to close) ".to_string()
    };

    let table = Table::new(visible_rows, [Constraint::Length(16), Constraint::Min(20)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("overlay_border"))
                .title(title),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                )
                .bottom_margin(1),
        )
        .style(app.style("item_body"));
    f.render_widget(table, overlay);

    if max_scroll > 0 && scroll < max_scroll {
        let hint = Line::from(Span::styled(
            " j/k to scroll, ? or Esc to close ",
            app.style("item_meta"),
        ));
        let hint_area = Rect {
            x: overlay.x + 1,
            y: overlay.y + overlay.height.saturating_sub(1),
            width: overlay.width.saturating_sub(2),
            height: 1,
        };
        f.render_widget(Paragraph::new(hint), hint_area);
    }
}

use crate::app::App;
use crate::controller::LoadState;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::render::centered_rect;

/// Render the location typeahead overlay.
pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(50, 60, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }
    f.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("overlay_border"))
        .title(" Location ");
    let inner = block.inner(overlay);
    f.render_widget(block, overlay);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let picker = &app.locations;
    let prompt = Line::from(vec![
        Span::styled("› ", app.style("search_prompt")),
        Span::raw(format!("{}_", picker.input())),
    ]);
    f.render_widget(Paragraph::new(prompt), rows[0]);

    let (status, style) = match picker.state() {
        LoadState::Loading => ("Searching…".to_string(), app.style("loading")),
        LoadState::Failed { message } => (message.clone(), app.style("error_inline")),
        LoadState::Success if picker.results().is_empty() => {
            ("No matching locations".to_string(), app.style("empty_state"))
        }
        LoadState::Idle if picker.input().trim().is_empty() => {
            ("Start typing to search".to_string(), app.style("empty_state"))
        }
        _ => (String::new(), app.style("item_meta")),
    };
    f.render_widget(Paragraph::new(status).style(style), rows[1]);

    let items: Vec<ListItem> = picker
        .results()
        .iter()
        .map(|location| ListItem::new(location.label()))
        .collect();
    let list = List::new(items).highlight_style(app.style("overlay_selected"));
    let mut state = ListState::default()
        .with_selected((!picker.results().is_empty()).then_some(picker.selected_index()));
    f.render_stateful_widget(list, rows[2], &mut state);
}

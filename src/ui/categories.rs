use crate::app::App;
use crate::catalog;
use crate::theme::accent_color;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Render the category sidebar: filter choices on top, the active
/// category's shortcuts below.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let theme = app.view.theme();
    let links_height = if theme.links.is_empty() {
        0
    } else {
        theme.links.len() as u16 + 2
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(links_height)])
        .split(area);

    render_choices(f, app, chunks[0]);
    if links_height > 0 {
        render_links(f, app, chunks[1]);
    }
}

fn render_choices(f: &mut Frame, app: &App, area: Rect) {
    let active = app.active_category_index();
    let style_normal = app.style("category_normal");
    let style_active = app.style("category_active");

    let items: Vec<ListItem> = App::category_choices()
        .into_iter()
        .enumerate()
        .map(|(i, code)| {
            let (label, accent) = match code {
                None => ("All", style_normal),
                Some(code) => {
                    let theme = catalog::lookup(code);
                    (theme.label, Style::default().fg(accent_color(theme.accent_color)))
                }
            };
            let style = if i == active { style_active } else { style_normal };
            ListItem::new(Line::from(vec![
                Span::styled("▍", accent),
                Span::styled(format!(" {label}"), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.style("panel_border"))
            .title("Categories"),
    );

    let mut state = ListState::default().with_selected(Some(active));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_links(f: &mut Frame, app: &App, area: Rect) {
    let theme = app.view.theme();
    let lines: Vec<Line> = theme
        .links
        .iter()
        .map(|link| {
            Line::from(vec![
                Span::styled(format!("{} ", link.label), app.style("nav_link")),
                Span::styled(
                    link.path,
                    app.style("nav_link").add_modifier(Modifier::DIM),
                ),
            ])
        })
        .collect();

    let accent = Style::default().fg(accent_color(theme.accent_color));
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(accent)
            .title(theme.label),
    );
    f.render_widget(paragraph, area);
}

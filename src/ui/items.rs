use crate::app::App;
use crate::normalize::FeedItem;
use crate::theme::accent_color;
use crate::util::{
    compact_count, relative_time, single_line, strip_control_chars, strip_html, truncate_to_width,
};
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

const SPINNER: [&str; super::loop_runner::SPINNER_FRAMES] =
    ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Render the item list with its loading, error and empty affordances.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let accent = accent_color(app.view.accent_color());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(list_title(app));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let view = &app.view;
    if view.show_loading_indicator() {
        let text = format!("{} Loading…", SPINNER[app.spinner_frame % SPINNER.len()]);
        f.render_widget(Paragraph::new(text).style(app.style("loading")), inner);
        return;
    }

    // An error keeps whatever was on screen and adds one line above it
    let (error_area, list_area) = match view.error_message() {
        Some(_) if !view.items().is_empty() => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(0)])
                .split(inner);
            (Some(rows[0]), rows[1])
        }
        Some(_) => (Some(inner), inner),
        None => (None, inner),
    };

    if let (Some(message), Some(error_area)) = (view.error_message(), error_area) {
        let paragraph = Paragraph::new(format!("⚠ {message}  [r]etry"))
            .style(app.style("error_inline"))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, error_area);
        if view.items().is_empty() {
            return;
        }
    }

    if view.items().is_empty() {
        let paragraph = Paragraph::new("Nothing to show. Try another category or [x] to reset filters.")
            .style(app.style("empty_state"))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, list_area);
        return;
    }

    let now = Utc::now();
    let width = list_area.width as usize;
    let items: Vec<ListItem> = view
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| item_entry(app, item, i == app.selected_item, width, now))
        .collect();

    let list = List::new(items);
    let mut state = ListState::default().with_selected(Some(app.selected_item));
    f.render_stateful_widget(list, list_area, &mut state);
}

fn list_title(app: &App) -> String {
    let view = &app.view;
    let category = match view.query().category() {
        Some(_) => view.theme().label,
        None => "All",
    };
    let mut title = format!(" {} · {category} ", capitalize(view.resource().name()));
    if let Some(label) = &app.location_label {
        title.push_str(&format!("· {label} "));
    }
    if !view.query().search_text().is_empty() {
        title.push_str(&format!("· \"{}\" ", view.query().search_text()));
    }
    title
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Two rows per item: markers, title and age; then author, stats and a
/// body preview.
fn item_entry(
    app: &App,
    item: &FeedItem,
    selected: bool,
    width: usize,
    now: DateTime<Utc>,
) -> ListItem<'static> {
    let title_style = if selected {
        app.style("item_selected")
    } else {
        app.style("item_title")
    };
    let age = item
        .created_at
        .map(|at| relative_time(at, now))
        .unwrap_or_default();

    let mut head = Vec::with_capacity(5);
    let accent = accent_color(item.category().accent_color);
    head.push(Span::styled("▍", Style::default().fg(accent)));
    let mut used = 1;
    if item.is_saved {
        head.push(Span::styled("★ ", app.style("item_saved")));
        used += 2;
    }
    if item.is_repost() {
        head.push(Span::styled("↻ ", app.style("item_repost")));
        used += 2;
    }
    let title = single_line(&strip_control_chars(item.display_title()));
    let room = width.saturating_sub(used + age.len() + 2);
    head.push(Span::styled(truncate_to_width(&title, room).into_owned(), title_style));
    if !age.is_empty() {
        head.push(Span::styled(format!("  {age}"), app.style("item_meta")));
    }

    let stats = &item.stats;
    let mut meta = format!(
        "{}  ♥ {}  💬 {}  ↻ {}",
        single_line(&strip_control_chars(&item.author_display_name)),
        compact_count(stats.likes),
        compact_count(stats.comments),
        compact_count(stats.shares),
    );
    if let Some(shared) = item.shared() {
        let original_author = single_line(&strip_control_chars(&shared.author_display_name));
        meta.push_str(&format!("  via {original_author}"));
    }
    let body = single_line(&strip_control_chars(&strip_html(item.display_body())));
    let meta_room = width.saturating_sub(2);
    let meta_text = truncate_to_width(&meta, meta_room).into_owned();
    let body_room = meta_room.saturating_sub(crate::util::display_width(&meta_text) + 3);

    let mut second = vec![
        Span::raw("  "),
        Span::styled(meta_text, app.style("item_stats")),
    ];
    if !body.is_empty() && body_room > 4 {
        second.push(Span::styled(
            format!(" · {}", truncate_to_width(&body, body_room)),
            app.style("item_body"),
        ));
    }

    ListItem::new(vec![Line::from(head), Line::from(second)])
}

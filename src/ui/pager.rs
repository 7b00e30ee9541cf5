use crate::app::App;
use crate::pagination::PageInfo;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the pagination bar under the item list.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }
    let info = app.view.page_info();
    if info.total_pages == 0 {
        return;
    }

    let mut spans = Vec::new();
    spans.push(Span::styled(
        if info.has_prev() { " ‹ " } else { "   " },
        app.style("page_other"),
    ));
    for page in info.window() {
        let style = if page == info.page {
            app.style("page_current")
        } else {
            app.style("page_other")
        };
        spans.push(Span::styled(format!(" {page} "), style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        if info.has_next() { "› " } else { "  " },
        app.style("page_other"),
    ));
    spans.push(Span::styled(summary(&info), app.style("page_summary")));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// "page 2 of 4 · 40 results".
fn summary(info: &PageInfo) -> String {
    let noun = if info.total_count == 1 { "result" } else { "results" };
    format!(
        " page {} of {} · {} {noun}",
        info.page, info.total_pages, info.total_count
    )
}

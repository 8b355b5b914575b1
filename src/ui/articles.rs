use crate::api::Article;
use crate::app::{App, CollectionState};
use crate::collection::ALL;
use crate::theme::ColorPalette;
use crate::util::{display_width, single_line, strip_control_chars, truncate_to_width};
use crate::workflow::BiasLevel;
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::status::spinner;

/// Format a publication time relative to now.
pub fn format_relative_time(timestamp: DateTime<Utc>) -> String {
    relative_to(timestamp, Utc::now())
}

fn relative_to(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - timestamp).num_seconds();

    // Clock skew on the service side
    if diff < 0 {
        return "now".to_string();
    }
    if diff < 3600 {
        return format!("{}m", diff / 60);
    }
    if diff < 86400 {
        return format!("{}h", diff / 3600);
    }
    if diff < 604800 {
        return format!("{}d", diff / 86400);
    }
    timestamp.format("%b %d").to_string()
}

/// Service text for a single list row: no control sequences, no line breaks.
fn clean(s: &str) -> String {
    single_line(&strip_control_chars(s))
}

/// Trailing "source · topic · age" part of a list row.
fn row_meta(article: &Article, age: &str) -> String {
    let mut meta = format!("  {}", clean(&article.source_name));
    if let Some(topic) = &article.topic {
        meta.push_str(" · ");
        meta.push_str(&clean(topic));
    }
    meta.push_str(" · ");
    meta.push_str(age);
    meta
}

/// Bias level badge for articles the listing scored.
fn bias_badge(theme: &ColorPalette, article: &Article) -> Option<Span<'static>> {
    let level = BiasLevel::from_score(article.bias_score?);
    Some(Span::styled(
        format!(" {} ", level.label()),
        theme.bias_level(level),
    ))
}

/// Render the filter bar and the article list.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 4 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_filter_bar(f, app, chunks[0]);
    render_list(f, app, chunks[1]);
}

fn filter_span<'a>(app: &App, label: &'a str, value: String, active: bool) -> Vec<Span<'a>> {
    let value_style = if active {
        app.theme.filter_active
    } else {
        app.theme.article_meta
    };
    vec![
        Span::styled(label, app.theme.article_date),
        Span::styled(value, value_style),
        Span::raw("   "),
    ]
}

fn render_filter_bar(f: &mut Frame, app: &App, area: Rect) {
    let filters = app.collection.filters();
    let term = strip_control_chars(&filters.search_term);

    let search = if app.search_mode {
        format!("{}_", term)
    } else if term.is_empty() {
        "-".to_string()
    } else {
        term.into_owned()
    };

    let mut spans = filter_span(
        app,
        "Search: ",
        search,
        app.search_mode || !filters.search_term.is_empty(),
    );
    spans.extend(filter_span(
        app,
        "Topic: ",
        clean(&filters.topic),
        filters.topic != ALL,
    ));
    spans.extend(filter_span(
        app,
        "Source: ",
        clean(&filters.source),
        filters.source != ALL,
    ));

    let border_style = if app.search_mode {
        app.theme.panel_border_focused
    } else {
        app.theme.panel_border
    };
    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("Filters"),
    );
    f.render_widget(bar, area);
}

fn render_list(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.panel_border_focused)
        .title(format!(
            "Articles ({}/{})",
            app.collection.visible_len(),
            app.collection.len()
        ));

    let placeholder = match &app.collection_state {
        CollectionState::Loading => Some((
            format!("{} Loading articles...", spinner(app.spinner_frame)),
            app.theme.article_meta,
        )),
        CollectionState::Failed(message) => {
            Some((format!("{} (press r to retry)", message), app.theme.error_text))
        }
        CollectionState::Ready => app
            .collection
            .empty_message()
            .map(|m| (m.to_string(), app.theme.article_meta)),
    };
    if let Some((text, style)) = placeholder {
        f.render_widget(Paragraph::new(Span::styled(text, style)).block(block), area);
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .collection
        .visible_articles()
        .into_iter()
        .enumerate()
        .map(|(i, article)| {
            let marker = if article.has_analysis {
                Span::styled("● ", app.theme.analyzed_marker)
            } else {
                Span::raw("  ")
            };

            let meta = row_meta(article, &format_relative_time(article.published_at));
            let badge = bias_badge(&app.theme, article);
            let badge_width = badge.as_ref().map_or(0, |b| display_width(&b.content) + 1);

            // Leave room for the marker, the badge and the metadata.
            let max_title = inner_width.saturating_sub(2 + badge_width + display_width(&meta));
            let title = truncate_to_width(&clean(&article.title), max_title).into_owned();

            let title_style = if i == app.selected_article {
                app.theme.article_selected
            } else {
                app.theme.article_title
            };

            let mut spans = vec![marker];
            if let Some(badge) = badge {
                spans.push(badge);
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(title, title_style));
            spans.push(Span::styled(meta, app.theme.article_date));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let mut state = ListState::default().with_selected(Some(app.selected_article));
    let list = List::new(items).block(block);
    f.render_stateful_widget(list, area, &mut state);
}

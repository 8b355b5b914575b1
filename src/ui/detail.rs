//! Article detail view: the article body with its analysis panel below.

use crate::api::Article;
use crate::app::App;
use crate::theme::ColorPalette;
use crate::util::strip_control_chars;
use crate::workflow::{ArticleDetailWorkflow, DetailState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::analysis_panel;
use super::articles::format_relative_time;
use super::status::spinner;

/// Height of the analysis panel when the article has one.
const ANALYSIS_PANEL_HEIGHT: u16 = 14;

/// Height of the "create analysis" prompt.
const PROMPT_HEIGHT: u16 = 3;

/// Rows a set of lines occupies once wrapped to `width` columns.
pub(super) fn wrapped_height(lines: &[Line<'_>], width: usize) -> usize {
    if width == 0 {
        return lines.len();
    }
    lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum()
}

fn sanitized(s: &str) -> String {
    strip_control_chars(s).into_owned()
}

/// Header and body lines for a loaded article.
fn article_lines(theme: &ColorPalette, app: &App, article: &Article) -> Vec<Line<'static>> {
    let mut source_line = vec![Span::styled(
        sanitized(&article.source_name),
        theme.detail_metadata,
    )];
    if let Some(display) = app
        .detail
        .as_ref()
        .and_then(|d| d.view())
        .and_then(|v| v.analysis.as_ref())
    {
        source_line.push(Span::raw("  "));
        source_line.push(analysis_panel::verdict_badge(theme, display));
    }

    let mut byline = format!(
        "{} ({})",
        article.published_at.format("%Y-%m-%d %H:%M UTC"),
        format_relative_time(article.published_at)
    );
    if let Some(author) = &article.author {
        byline.push_str(" · ");
        byline.push_str(&sanitized(author));
    }
    if let Some(topic) = &article.topic {
        byline.push_str(" · ");
        byline.push_str(&sanitized(topic));
    }

    let mut lines = vec![
        Line::from(source_line),
        Line::from(Span::styled(sanitized(&article.title), theme.detail_heading)),
        Line::from(Span::styled(byline, theme.detail_metadata)),
        Line::from(""),
    ];

    for text in [&article.description, &article.content].into_iter().flatten() {
        lines.extend(
            text.lines()
                .map(|l| Line::from(Span::styled(sanitized(l), theme.detail_body))),
        );
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        sanitized(&article.url),
        theme.detail_metadata,
    )));
    lines
}

fn placeholder_lines(theme: &ColorPalette, app: &App) -> Vec<Line<'static>> {
    match app.detail.as_ref().map(ArticleDetailWorkflow::state) {
        None | Some(DetailState::Idle) => vec![Line::from("No article selected")],
        Some(DetailState::Loading(_)) => vec![Line::from(format!(
            "{} Loading article...",
            spinner(app.spinner_frame)
        ))],
        Some(DetailState::NotFound { reason }) => vec![
            Line::from(Span::styled("Article not found", theme.error_text)),
            Line::from(Span::styled(sanitized(reason), theme.detail_metadata)),
            Line::from(""),
            Line::from("Press b to go back to the article list"),
        ],
        // Loaded is handled by article_lines
        Some(DetailState::Loaded(_)) => Vec::new(),
    }
}

fn render_create_prompt(f: &mut Frame, app: &App, detail: &ArticleDetailWorkflow, area: Rect) {
    let theme = &app.theme;
    let line = if detail.is_creating() {
        Line::from(format!(
            "{} Requesting analysis...",
            spinner(app.spinner_frame)
        ))
    } else if let Some(error) = detail.create_error() {
        Line::from(vec![
            Span::styled(sanitized(error), theme.error_text),
            Span::raw("  (press n to retry)"),
        ])
    } else {
        Line::from("No analysis yet. Press n to create one.")
    };

    let prompt = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.panel_border)
            .title("Analysis"),
    );
    f.render_widget(prompt, area);
}

pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let view = app.detail.as_ref().and_then(|d| d.view());
    let bottom_height = match view {
        Some(v) if v.analysis.is_some() => ANALYSIS_PANEL_HEIGHT,
        Some(_) => PROMPT_HEIGHT,
        None => 0,
    };
    // Give the article body at least a few rows on short terminals.
    let bottom_height = bottom_height.min(area.height.saturating_sub(5));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(bottom_height)])
        .split(area);

    let lines = match view {
        Some(v) => article_lines(&app.theme, app, &v.article),
        None => placeholder_lines(&app.theme, app),
    };

    let body_area = chunks[0];
    let inner_width = body_area.width.saturating_sub(2) as usize;
    app.detail_visible_lines = body_area.height.saturating_sub(2) as usize;
    app.detail_content_lines = wrapped_height(&lines, inner_width);
    // Clamp before rendering so a resize never shows an out-of-range frame.
    app.clamp_scroll();

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.panel_border_focused)
                .title("Article"),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset as u16, 0));
    f.render_widget(paragraph, body_area);

    if bottom_height == 0 {
        return;
    }
    let Some(detail) = app.detail.as_ref() else {
        return;
    };
    match detail.view().and_then(|v| v.analysis.as_ref()) {
        Some(display) => {
            analysis_panel::render(f, &app.theme, display, chunks[1], "Analysis")
        }
        None => render_create_prompt(f, app, detail, chunks[1]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::theme::ThemeVariant;
    use crate::workflow::testing::{analysis, article, at};

    fn text_of(lines: &[Line<'_>]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app_with_detail() -> (App, crate::workflow::Ticket) {
        let api = ApiClient::new("http://127.0.0.1:9/api", None).unwrap();
        let mut app = App::new(api, ThemeVariant::Dark);
        let generation = app.begin_articles_load();
        app.apply_articles_loaded(generation, Ok(vec![article(3)]));
        let (ticket, _) = app.open_detail().unwrap();
        (app, ticket)
    }

    #[test]
    fn test_wrapped_height() {
        let lines = vec![Line::from("abcdef"), Line::from(""), Line::from("abc")];
        assert_eq!(wrapped_height(&lines, 3), 4);
        assert_eq!(wrapped_height(&lines, 10), 3);
        assert_eq!(wrapped_height(&lines, 0), 3);
    }

    #[test]
    fn test_not_found_offers_way_back() {
        let (mut app, ticket) = app_with_detail();
        app.apply_detail_loaded(
            ticket,
            Err(crate::api::ApiError::NotFound {
                detail: "Article not found".to_string(),
            }),
        );
        let text = text_of(&placeholder_lines(&app.theme, &app));
        assert!(text.starts_with("Article not found"));
        assert!(text.contains("Press b to go back"));
    }

    #[test]
    fn test_loaded_article_shows_verdict_badge_and_body() {
        let (mut app, ticket) = app_with_detail();
        let mut stored = analysis(1, Some(3), 0.6, at(2));
        stored.bias = "misleading".to_string();
        app.apply_detail_loaded(ticket, Ok((article(3), vec![stored])));

        let view = app.detail.as_ref().unwrap().view().unwrap().clone();
        let text = text_of(&article_lines(&app.theme, &app, &view.article));
        assert!(text.contains(" Misleading "));
        assert!(text.contains("Article 3"));
        assert!(text.contains("J. Doe"));
        assert!(text.contains("Body text"));
    }

    #[test]
    fn test_control_sequences_are_stripped() {
        let (app, _) = app_with_detail();
        let mut hostile = article(3);
        hostile.title = "Title\x1b[2Jwith escape".to_string();
        let text = text_of(&article_lines(&app.theme, &app, &hostile));
        assert!(!text.contains('\x1b'));
        assert!(text.contains("Titlewith escape"));
    }
}

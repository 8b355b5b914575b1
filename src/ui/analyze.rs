use crate::app::{App, MAX_ANALYZE_INPUT};
use crate::util::strip_control_chars;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::analysis_panel;
use super::detail::wrapped_height;
use super::status::spinner;

/// Render the analyze view: input on top, result or failure below.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 6 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(35), Constraint::Min(0)])
        .split(area);

    render_input(f, app, chunks[0]);

    if let Some(display) = app.analysis.result() {
        analysis_panel::render(f, &app.theme, display, chunks[1], "Result");
        return;
    }

    let line = if app.analysis.is_pending() {
        Line::from(format!("{} Analyzing...", spinner(app.spinner_frame)))
    } else if let Some(error) = app.analysis.last_error() {
        Line::from(Span::styled(
            strip_control_chars(error).into_owned(),
            app.theme.error_text,
        ))
    } else {
        Line::from(Span::styled(
            "Paste or type text above, then press Ctrl+S to analyze it.",
            app.theme.detail_metadata,
        ))
    };
    let panel = Paragraph::new(line).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.panel_border)
            .title("Result"),
    );
    f.render_widget(panel, chunks[1]);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let mut text = strip_control_chars(&app.analyze_input).into_owned();
    text.push('_');

    // Keep the cursor end in view for inputs longer than the box.
    let visible = area.height.saturating_sub(2) as usize;
    let width = area.width.saturating_sub(2) as usize;
    let lines: Vec<Line> = text.lines().map(Line::from).collect();
    let total = wrapped_height(&lines, width);
    let scroll = total.saturating_sub(visible).min(u16::MAX as usize) as u16;

    let title = format!(
        "Text to analyze ({}/{})",
        app.analyze_input.len(),
        MAX_ANALYZE_INPUT
    );
    let input = Paragraph::new(lines)
        .style(app.theme.input_text)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.panel_border_focused)
                .title(title),
        );
    f.render_widget(input, area);
}

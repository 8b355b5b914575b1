//! Analysis result panel, shared by the detail and analyze views.
//!
//! Layout: a verdict and bias-level line, the credibility and bias gauges,
//! then the summary and key findings as wrapped text.

use crate::theme::ColorPalette;
use crate::util::strip_control_chars;
use crate::workflow::display::gauge_percent;
use crate::workflow::AnalysisDisplay;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

/// Rows taken by the badge line and the two gauges.
const HEADER_ROWS: u16 = 3;

/// Verdict badge for an analysis, padded so the background reads as a pill.
pub(super) fn verdict_badge(theme: &ColorPalette, display: &AnalysisDisplay) -> Span<'static> {
    let verdict = display.verdict();
    Span::styled(format!(" {} ", verdict.label()), theme.verdict(verdict))
}

fn badge_line(theme: &ColorPalette, display: &AnalysisDisplay) -> Line<'static> {
    let level = display.bias_level();
    Line::from(vec![
        verdict_badge(theme, display),
        Span::raw("  "),
        Span::styled(level.label(), theme.bias_level(level)),
        Span::styled(
            format!("  ({})", display.source_verification),
            theme.detail_metadata,
        ),
    ])
}

/// Summary and key findings as display lines.
pub(super) fn body_lines(theme: &ColorPalette, display: &AnalysisDisplay) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled("Summary", theme.section_title)),
        Line::from(Span::styled(
            strip_control_chars(&display.summary).into_owned(),
            theme.detail_body,
        )),
    ];
    if !display.key_points.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Key findings", theme.section_title)));
        lines.extend(display.key_points.iter().map(|point| {
            Line::from(Span::styled(
                format!("• {}", strip_control_chars(point)),
                theme.detail_body,
            ))
        }));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "Analyzed {}",
            display.analyzed_at.format("%Y-%m-%d %H:%M UTC")
        ),
        theme.detail_metadata,
    )));
    lines
}

pub(super) fn render(
    f: &mut Frame,
    theme: &ColorPalette,
    display: &AnalysisDisplay,
    area: Rect,
    title: &str,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border)
        .title(title.to_string());
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width < 1 || inner.height < HEADER_ROWS {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    f.render_widget(Paragraph::new(badge_line(theme, display)), rows[0]);

    let credibility = Gauge::default()
        .gauge_style(theme.gauge_credibility)
        .percent(display.credibility_score.map(gauge_percent).unwrap_or(0))
        .label(format!("Credibility {}", display.credibility_label()));
    f.render_widget(credibility, rows[1]);

    let bias_style = if display.is_high_bias() {
        theme.gauge_bias_high
    } else {
        theme.gauge_bias
    };
    let bias = Gauge::default()
        .gauge_style(bias_style)
        .percent(gauge_percent(display.bias_score))
        .label(format!("Bias {}", display.bias_label()));
    f.render_widget(bias, rows[2]);

    let body = Paragraph::new(body_lines(theme, display)).wrap(Wrap { trim: false });
    f.render_widget(body, rows[3]);
}

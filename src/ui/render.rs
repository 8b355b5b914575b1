//! Render dispatch for the TUI.

use crate::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    widgets::Paragraph,
    Frame,
};

use super::{analyze, articles, detail, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Main render dispatch function.
///
/// Checks the terminal size, then draws the current view above a one-line
/// status bar.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    match app.view {
        View::Articles => articles::render(f, app, chunks[0]),
        View::Detail => detail::render(f, app, chunks[0]),
        View::Analyze => analyze::render(f, app, chunks[0]),
    }
    status::render(f, app, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::theme::ThemeVariant;
    use crate::workflow::testing::{analysis, article, at};
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn control_cells(app: &mut App, width: u16, height: u16) -> usize {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .filter(|cell| cell.symbol().contains(['\x1b', '\x07']))
            .count()
    }

    fn test_app() -> App {
        let api = ApiClient::new("http://127.0.0.1:9/api", None).unwrap();
        App::new(api, ThemeVariant::Dark)
    }

    #[test]
    fn test_small_terminal_shows_size_hint() {
        let mut app = test_app();
        let text = screen(&mut app, 40, 8);
        assert!(text.contains("Terminal too small"));
    }

    #[test]
    fn test_empty_collection_placeholder() {
        let mut app = test_app();
        let generation = app.begin_articles_load();
        app.apply_articles_loaded(generation, Ok(Vec::new()));
        let text = screen(&mut app, 80, 20);
        assert!(text.contains("No articles found"));
    }

    #[test]
    fn test_service_text_cannot_reach_terminal_raw() {
        let mut app = test_app();
        let mut hostile = article(1);
        hostile.source_name = "Evil\x1b]0;pwned\x07Src".to_string();
        hostile.topic = Some("T\x1b[2Jx".to_string());
        let generation = app.begin_articles_load();
        app.apply_articles_loaded(generation, Ok(vec![hostile]));
        // Puts the hostile topic into the filter bar.
        app.collection.cycle_topic();
        app.set_status("Topic: T\x1b[2Jx \x1b]0;pwned\x07");

        assert_eq!(control_cells(&mut app, 120, 20), 0);
        let text = screen(&mut app, 120, 20);
        assert!(text.contains("EvilSrc · Tx"));
        assert!(text.contains("Topic: Tx"));
    }

    #[test]
    fn test_list_row_shows_bias_level_badge() {
        let mut app = test_app();
        let mut scored = article(1);
        scored.bias_score = Some(72.0);
        let generation = app.begin_articles_load();
        app.apply_articles_loaded(generation, Ok(vec![scored, article(2)]));

        let text = screen(&mut app, 120, 20);
        assert!(text.contains(" High Bias  Article 1"));
        assert!(!text.contains("Neutral"));
    }

    #[test]
    fn test_detail_renders_scores() {
        let mut app = test_app();
        let generation = app.begin_articles_load();
        app.apply_articles_loaded(generation, Ok(vec![article(1)]));
        let (ticket, _) = app.open_detail().unwrap();
        app.apply_detail_loaded(
            ticket,
            Ok((article(1), vec![analysis(1, Some(1), 0.6, at(2))])),
        );

        let text = screen(&mut app, 100, 30);
        assert!(text.contains("Credibility 60/100"));
        assert!(text.contains("Bias 50/100"));
        assert!(text.contains("Article 1"));
    }
}

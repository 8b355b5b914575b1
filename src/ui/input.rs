//! Input handling for the TUI.
//!
//! Routes key presses to the handler for the current view and mode.

use crate::app::{App, AppEvent, View};
use crate::util::{validate_url_for_open, MAX_SEARCH_TERM_LENGTH};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{
    spawn_articles_load, spawn_detail_analysis, spawn_detail_load, spawn_text_analysis,
};
use super::Action;

/// Lines moved by a page scroll in the detail view.
const PAGE_LINES: usize = 10;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    // Raw mode swallows SIGINT, so Ctrl+C is handled as a key everywhere.
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Action::Quit;
    }

    if app.search_mode {
        handle_search_input(app, code);
        return Action::Continue;
    }

    match app.view {
        View::Articles => handle_articles_input(app, code, event_tx),
        View::Detail => handle_detail_input(app, code, modifiers, event_tx),
        View::Analyze => handle_analyze_input(app, code, modifiers, event_tx),
    }
}

/// Article list: navigation, filters, and entry to the other views.
fn handle_articles_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),
        KeyCode::Char('g') | KeyCode::Home => app.selected_article = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.selected_article = app.collection.visible_len().saturating_sub(1);
        }
        KeyCode::Char('/') => app.search_mode = true,
        KeyCode::Char('t') => {
            let topic = app.collection.cycle_topic().to_string();
            app.clamp_selection();
            app.set_status(format!("Topic: {}", topic));
        }
        KeyCode::Char('s') => {
            let source = app.collection.cycle_source().to_string();
            app.clamp_selection();
            app.set_status(format!("Source: {}", source));
        }
        KeyCode::Char('c') => {
            app.collection.clear_filters();
            app.clamp_selection();
            app.set_status("Filters cleared");
        }
        KeyCode::Enter => spawn_detail_load(app, event_tx),
        KeyCode::Char('a') => app.enter_analyze(),
        KeyCode::Char('r') => {
            spawn_articles_load(app, event_tx);
            app.set_status("Reloading articles...");
        }
        KeyCode::Char('o') => {
            if let Some(url) = app.selected_article().map(|a| a.url.clone()) {
                open_in_browser(app, &url);
            }
        }
        KeyCode::Char('T') => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        _ => {}
    }
    Action::Continue
}

/// Search term editing. Filtering runs on every keystroke.
fn handle_search_input(app: &mut App, code: KeyCode) {
    let mut term = app.collection.filters().search_term.clone();
    match code {
        KeyCode::Enter => {
            app.search_mode = false;
            return;
        }
        KeyCode::Esc => {
            app.search_mode = false;
            term.clear();
        }
        KeyCode::Backspace => {
            term.pop();
        }
        KeyCode::Char(c) => {
            if term.chars().count() >= MAX_SEARCH_TERM_LENGTH {
                app.set_status(format!(
                    "Search term too long (max {} chars)",
                    MAX_SEARCH_TERM_LENGTH
                ));
                return;
            }
            term.push(c);
        }
        _ => return,
    }
    app.collection.set_search_term(term);
    app.clamp_selection();
}

fn handle_detail_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('b') | KeyCode::Esc | KeyCode::Backspace => app.close_detail(),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_down(PAGE_LINES)
        }
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_up(PAGE_LINES)
        }
        KeyCode::PageDown | KeyCode::Char(' ') => app.scroll_down(PAGE_LINES),
        KeyCode::PageUp => app.scroll_up(PAGE_LINES),
        KeyCode::Char('n') => spawn_detail_analysis(app, event_tx),
        KeyCode::Char('o') => {
            let url = app
                .detail
                .as_ref()
                .and_then(|d| d.view())
                .map(|v| v.article.url.clone());
            if let Some(url) = url {
                open_in_browser(app, &url);
            }
        }
        _ => {}
    }
    Action::Continue
}

/// Analyze screen: a plain multi-line text area.
fn handle_analyze_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match code {
        KeyCode::Esc => app.exit_analyze(),
        KeyCode::Char('s') if ctrl => spawn_text_analysis(app, event_tx),
        KeyCode::Char('u') if ctrl => app.analyze_input.clear(),
        KeyCode::Enter => app.push_analyze_char('\n'),
        KeyCode::Tab => app.push_analyze_char('\t'),
        KeyCode::Backspace => {
            app.analyze_input.pop();
        }
        KeyCode::Char(c) if !ctrl => app.push_analyze_char(c),
        _ => {}
    }
    Action::Continue
}

fn open_in_browser(app: &mut App, url: &str) {
    match validate_url_for_open(url) {
        Err(e) => app.set_status(e.to_string()),
        Ok(url) => {
            if let Err(e) = open::that(url.as_str()) {
                tracing::warn!(url = %url, error = %e, "Failed to open browser");
                app.set_status(format!("Failed to open browser: {}", e));
            } else {
                app.set_status("Opened in browser");
            }
        }
    }
}

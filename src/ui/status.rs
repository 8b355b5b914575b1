use crate::app::{App, View};
use crate::util::{single_line, strip_control_chars};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

const SPINNER: [char; super::loop_runner::SPINNER_FRAMES] =
    ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Spinner glyph for the given animation frame.
pub(super) fn spinner(frame: usize) -> char {
    SPINNER[frame % SPINNER.len()]
}

/// Keybinding hints for the current view and mode.
fn hints(app: &App) -> &'static str {
    match app.view {
        View::Articles if app.search_mode => "Type to search | ESC clear | ENTER confirm",
        View::Articles => {
            "[j/k]move [/]search [t]opic [s]ource [c]lear [Enter]open [a]nalyze [r]eload [T]heme [q]uit"
        }
        View::Detail => {
            let can_create = app
                .detail
                .as_ref()
                .is_some_and(|d| d.can_create_analysis());
            if can_create {
                "[b]ack [j/k]scroll [n]ew analysis [o]pen [q]uit"
            } else {
                "[b]ack [j/k]scroll [o]pen [q]uit"
            }
        }
        View::Analyze => "[Ctrl+S]submit [Ctrl+U]clear [Esc]back",
    }
}

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        // Messages can carry topic names and server details.
        Cow::Owned(single_line(&strip_control_chars(msg)))
    } else if app.is_busy() {
        Cow::Owned(format!("{} {}", spinner(app.spinner_frame), hints(app)))
    } else {
        Cow::Borrowed(hints(app))
    };

    let paragraph = Paragraph::new(text).style(app.theme.status_bar);
    f.render_widget(paragraph, area);
}

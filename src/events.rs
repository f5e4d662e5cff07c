use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, View};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If the range form is being edited, capture text input
    if app.form_active {
        handle_form_input(app, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),

        // Direct view access
        KeyCode::Char('1') => app.set_view(View::Horizon),
        KeyCode::Char('2') => app.set_view(View::Network),
        KeyCode::Char('3') => app.set_view(View::Crates),
        KeyCode::Char('4') => app.set_view(View::Files),
        KeyCode::Char('5') => app.set_view(View::Settings),
        KeyCode::Char('6') => app.set_view(View::Scatter),

        KeyCode::Left | KeyCode::Char('h') => match app.current_view {
            View::Crates => app.grid_left(),
            _ => app.prev_view(),
        },
        KeyCode::Right | KeyCode::Char('l') => match app.current_view {
            View::Crates => app.grid_right(),
            _ => app.next_view(),
        },

        KeyCode::Up | KeyCode::Char('k') => match app.current_view {
            View::Crates => app.grid_up(),
            View::Scatter => app.grid_up(),
            _ => app.select_prev_row(),
        },
        KeyCode::Down | KeyCode::Char('j') => match app.current_view {
            View::Crates => app.grid_down(),
            View::Scatter => app.grid_down(),
            _ => app.select_next_row(),
        },

        // Toggle the selected crate, or surface the detail URL for the
        // selected metric row
        KeyCode::Enter | KeyCode::Char(' ') => match app.current_view {
            View::Crates => app.toggle_selected_slot(),
            View::Horizon | View::Network => {
                if let Some(url) = app.graph_url_for_selected() {
                    app.set_status_message(format!("Graph: {}", url));
                }
            }
            View::Scatter => app.start_form(),
            _ => {}
        },

        // Crate grid shortcuts
        KeyCode::Char('a') => {
            if app.current_view == View::Crates {
                app.mask.enable_all();
            }
        }
        KeyCode::Char('n') => {
            if app.current_view == View::Crates {
                app.mask.disable_all();
            }
        }

        // Step menu (Temps/Network)
        KeyCode::Char('s') => {
            if matches!(app.current_view, View::Horizon | View::Network) {
                app.cycle_step();
            }
        }

        // Range form (Scatter)
        KeyCode::Char('/') => {
            if app.current_view == View::Scatter {
                app.start_form();
            }
        }

        // Reload
        KeyCode::Char('r') => app.force_refresh(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle keystrokes while the range form has focus.
fn handle_form_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Tab | KeyCode::Down => app.next_form_field(),
        KeyCode::Backspace => app.form_pop(),
        // The search-by selector cycles instead of taking text
        KeyCode::Left | KeyCode::Right => {
            if app.form_field == crate::app::FormField::Search {
                app.cycle_search_field();
            }
        }
        KeyCode::Char(' ') => {
            if app.form_field == crate::app::FormField::Search {
                app.cycle_search_field();
            }
        }
        KeyCode::Char(c) => app.form_push(c),
        _ => {}
    }
}

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Pane};
use crate::audio::{MediaBackend, shortcut_for};
use crate::config;
use crate::storage::KeyValueStore;
use crate::ui;

/// Main terminal event loop: runs timers, draws, and handles input.
/// Returns `Ok(())` when the user quits.
pub fn run<S: KeyValueStore, B: MediaBackend>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<S, B>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.tick(Instant::now());

        terminal.draw(|f| ui::draw(f, app, settings))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, app) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Apply one key press. Returns `true` when the app should quit.
pub fn handle_key_event<S: KeyValueStore, B: MediaBackend>(
    key: KeyEvent,
    app: &mut App<S, B>,
) -> bool {
    if app.text_input_active() {
        match key.code {
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Enter => app.commit_input(),
            KeyCode::Backspace => app.pop_input_char(),
            KeyCode::Char(c) => app.push_input_char(c),
            _ => {}
        }
        return false;
    }

    if let Some(shortcut) = shortcut_for(&key, false) {
        app.player.apply_shortcut(shortcut);
        return false;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return key.code == KeyCode::Char('c');
    }

    match (key.code, app.focus) {
        (KeyCode::Char('q'), _) => return true,
        (KeyCode::Tab, _) => app.cycle_focus(),
        (KeyCode::Char('j'), _) => app.select_next(),
        (KeyCode::Char('k'), _) => app.select_prev(),

        (KeyCode::Enter, Pane::Shop) => app.add_selected_product(),

        (KeyCode::Enter, Pane::Playlist) => app.toggle_selected_track(),
        (KeyCode::Char('o'), Pane::Playlist) => app.open_selected_link(),
        (KeyCode::Char('n'), Pane::Playlist) => app.player.next(),
        (KeyCode::Char('p'), Pane::Playlist) => app.player.prev(),

        (KeyCode::Char('d'), Pane::Cart) => app.remove_selected_line(),
        (KeyCode::Char('+'), Pane::Cart) => app.adjust_selected_quantity(1),
        (KeyCode::Char('-'), Pane::Cart) => app.adjust_selected_quantity(-1),
        (KeyCode::Char('e'), Pane::Cart) => app.begin_quantity_input(),
        (KeyCode::Char('c'), Pane::Cart) => app.checkout(Instant::now()),
        _ => {}
    }

    false
}

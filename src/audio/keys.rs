use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::media::MediaBackend;
use super::player::AudioPlayer;

/// Global player shortcuts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Shortcut {
    TogglePlay,
    SeekBack,
    SeekForward,
    VolumeUp,
    VolumeDown,
    ToggleMute,
}

/// Map a key press to a player shortcut. Nothing maps while a text input
/// has focus, so typed characters reach the input instead.
pub fn shortcut_for(key: &KeyEvent, text_input_active: bool) -> Option<Shortcut> {
    if text_input_active {
        return None;
    }
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match key.code {
        KeyCode::Char(' ') => Some(Shortcut::TogglePlay),
        KeyCode::Left => Some(Shortcut::SeekBack),
        KeyCode::Right => Some(Shortcut::SeekForward),
        KeyCode::Up => Some(Shortcut::VolumeUp),
        KeyCode::Down => Some(Shortcut::VolumeDown),
        KeyCode::Char('m') => Some(Shortcut::ToggleMute),
        _ => None,
    }
}

impl<B: MediaBackend> AudioPlayer<B> {
    /// Run `shortcut` with the configured seek and volume steps.
    pub fn apply_shortcut(&mut self, shortcut: Shortcut) {
        let seek_step = self.settings().seek_step_seconds as f64;
        let volume_step = self.settings().volume_step;
        match shortcut {
            Shortcut::TogglePlay => self.toggle_play_pause(),
            Shortcut::SeekBack => self.seek_by(-seek_step),
            Shortcut::SeekForward => self.seek_by(seek_step),
            Shortcut::VolumeUp => self.adjust_volume(volume_step),
            Shortcut::VolumeDown => self.adjust_volume(-volume_step),
            Shortcut::ToggleMute => self.toggle_mute(),
        }
    }
}

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::app::AppAction;

/// Maps a terminal key press to a shell action. Shortcuts are resolved here;
/// everything else is handed to the composer as a raw key.
pub fn action_for_key(event: KeyEvent) -> AppAction {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    match event.code {
        KeyCode::Esc => AppAction::Stop,
        KeyCode::Char('e') if ctrl => AppAction::Enhance,
        KeyCode::Char('r') if ctrl => AppAction::RefreshCatalog,
        KeyCode::Char('l') if ctrl => AppAction::ClearStatus,
        _ => AppAction::Key { event },
    }
}

//! Keyboard Input Handler
//!
//! Modal dialogs get keys first (directory prompt, settings, help), then a
//! focused text field, then the global bindings.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::App;

/// Handle keyboard input
pub fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.ui.should_quit = true;
        return Ok(());
    }

    if app.ui.directory_prompt.is_some() {
        handle_directory_prompt_key(app, key);
        return Ok(());
    }

    if app.ui.settings_open {
        match key.code {
            KeyCode::Char('t') => app.toggle_start_in_tray(),
            KeyCode::Esc | KeyCode::Char('s') | KeyCode::Char('q') => app.ui.settings_open = false,
            _ => {}
        }
        return Ok(());
    }

    if app.ui.help_open {
        // Any key closes help
        app.ui.help_open = false;
        return Ok(());
    }

    if app.is_typing() {
        match key.code {
            KeyCode::Enter => app.confirm_text(),
            KeyCode::Esc => app.leave_text(),
            KeyCode::Tab => app.switch_panel(),
            KeyCode::Backspace => app.delete_char(),
            KeyCode::Char(c) => app.type_char(c),
            _ => {}
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Char('q') => app.ui.should_quit = true,
        KeyCode::Tab | KeyCode::BackTab => app.switch_panel(),
        KeyCode::Left | KeyCode::Char('h') => app.cycle_mode(false),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('m') => app.cycle_mode(true),
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
        KeyCode::PageUp => app.move_cursor(-10),
        KeyCode::PageDown => app.move_cursor(10),
        KeyCode::Enter | KeyCode::Char(' ') => app.activate_selection(),
        KeyCode::Char('d') => app.open_directory_prompt(),
        KeyCode::Char('r') => app.refresh_focused_listing(),
        KeyCode::Char('p') => app.toggle_pause(),
        KeyCode::Char('z') => app.toggle_compact(),
        KeyCode::Char('s') => app.ui.settings_open = true,
        KeyCode::Char('?') => app.ui.help_open = true,
        KeyCode::Esc => app.ui.dismiss_toast(),
        _ => {}
    }

    Ok(())
}

fn handle_directory_prompt_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_directory_prompt(),
        KeyCode::Esc => app.cancel_directory_prompt(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(prompt) = app.ui.directory_prompt.as_mut() {
                prompt.clear();
            }
        }
        KeyCode::Backspace => {
            if let Some(prompt) = app.ui.directory_prompt.as_mut() {
                prompt.backspace();
            }
        }
        KeyCode::Char(c) => {
            if let Some(prompt) = app.ui.directory_prompt.as_mut() {
                prompt.insert_char(c);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filtersnatch::config::ControllerConfig;
    use filtersnatch::DirectoryKind;

    use crate::test_support::app_with;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    #[tokio::test]
    async fn test_q_quits_outside_text_field() {
        let mut app = app_with(ControllerConfig::default());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.ui.should_quit);
    }

    #[tokio::test]
    async fn test_q_is_typed_inside_text_field() {
        let mut app = app_with(ControllerConfig::default());
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('q'));

        assert!(!app.ui.should_quit);
        assert_eq!(
            app.sync.selector(DirectoryKind::Filters).input().buffer(),
            "q"
        );
    }

    #[tokio::test]
    async fn test_prompt_captures_keys_until_escape() {
        let mut app = app_with(ControllerConfig::default());
        press(&mut app, KeyCode::Char('d'));
        assert!(app.ui.directory_prompt.is_some());

        press(&mut app, KeyCode::Char('p'));
        assert!(!app.ui.paused);

        press(&mut app, KeyCode::Esc);
        assert!(app.ui.directory_prompt.is_none());
    }

    #[tokio::test]
    async fn test_settings_popup_toggles_start_in_tray() {
        let mut app = app_with(ControllerConfig::default());
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Char('t'));
        press(&mut app, KeyCode::Esc);

        assert!(!app.ui.settings_open);
        assert!(app.sync.config().window.start_in_tray);
    }

    #[tokio::test]
    async fn test_tab_switches_panel() {
        let mut app = app_with(ControllerConfig::default());
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.ui.focus, DirectoryKind::Downloads);
    }
}

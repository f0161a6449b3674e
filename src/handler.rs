use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use crate::app::{AdminTab, AdminView, App, InputMode, Screen};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.on_tick(),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global quit, works in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.screen {
        Screen::Chat => handle_chat_key(app, key),
        Screen::Admin => handle_admin_key(app, key),
    }
}

fn handle_chat_key(app: &mut App, key: KeyEvent) {
    // The confirmation prompt swallows every key while open
    if app.confirm_clear {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.confirm_clear_history();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_clear(),
            _ => {}
        }
        return;
    }

    if app.show_quick_questions {
        match key.code {
            KeyCode::Esc => app.show_quick_questions = false,
            KeyCode::Char('j') | KeyCode::Down => app.quick_nav_down(),
            KeyCode::Char('k') | KeyCode::Up => app.quick_nav_up(),
            KeyCode::Enter => app.pick_quick_question(),
            _ => {}
        }
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_chat_normal(app, key),
        InputMode::Editing => handle_chat_editing(app, key),
    }
}

fn handle_chat_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Back into the input box
        KeyCode::Char('i') | KeyCode::Char('/') => {
            app.input_mode = InputMode::Editing;
            app.chat_cursor = app.chat_input.chars().count();
        }

        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('s') => app.export_transcript(),
        KeyCode::Char('c') => app.request_clear(),
        KeyCode::Char('a') => app.open_admin(),
        KeyCode::Char('p') => app.open_quick_questions(),

        // Transcript scrolling
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_half_page_down();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_half_page_up();
        }
        KeyCode::Char('g') => app.scroll_to_top(),
        KeyCode::Char('G') => app.scroll_to_bottom(),

        _ => {}
    }
}

fn handle_chat_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => app.submit_message(),
        KeyCode::Backspace => {
            if app.chat_cursor > 0 {
                app.chat_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
                app.chat_input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.chat_input.chars().count();
            if app.chat_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
                app.chat_input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.chat_cursor = app.chat_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.chat_input.chars().count();
            app.chat_cursor = (app.chat_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.chat_cursor = 0;
        }
        KeyCode::End => {
            app.chat_cursor = app.chat_input.chars().count();
        }
        // Scroll the transcript without leaving the input
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
            app.chat_input.insert(byte_pos, c);
            app.chat_cursor += 1;
        }
        _ => {}
    }
}

fn handle_admin_key(app: &mut App, key: KeyEvent) {
    match app.admin.view {
        AdminView::Login => handle_admin_login(app, key),
        AdminView::Dashboard => match app.input_mode {
            InputMode::Normal => handle_dashboard_normal(app, key),
            InputMode::Editing => handle_dashboard_editing(app, key),
        },
    }
}

/// The login form is always in typing mode: two fields, Tab between them,
/// Enter submits from either one.
fn handle_admin_login(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_admin(),
        KeyCode::Enter => app.submit_login(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
            app.login_focus_next();
        }
        KeyCode::Backspace => {
            app.focused_login_field_mut().pop();
        }
        KeyCode::Char(c) => app.focused_login_field_mut().push(c),
        _ => {}
    }
}

fn handle_dashboard_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_admin(),

        KeyCode::Char('1') | KeyCode::Char('m') => app.switch_admin_tab(AdminTab::Manage),
        KeyCode::Char('2') | KeyCode::Char('n') => app.switch_admin_tab(AdminTab::Analytics),

        // Refresh whatever the current tab is showing
        KeyCode::Char('r') => match app.admin.tab {
            AdminTab::Manage => app.load_stats(),
            AdminTab::Analytics => app.load_analytics(),
        },

        KeyCode::Char('l') => app.submit_logout(),

        KeyCode::Tab => {
            if app.admin.tab == AdminTab::Manage {
                app.form_focus_next();
            }
        }
        KeyCode::BackTab => {
            if app.admin.tab == AdminTab::Manage {
                app.form_focus_prev();
            }
        }
        KeyCode::Char('i') | KeyCode::Enter => {
            if app.admin.tab == AdminTab::Manage {
                app.input_mode = InputMode::Editing;
            }
        }

        _ => {}
    }
}

fn handle_dashboard_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        // The form submits as a whole, like the original's single button
        KeyCode::Enter => app.submit_question(),
        KeyCode::Tab => app.form_focus_next(),
        KeyCode::BackTab => app.form_focus_prev(),
        KeyCode::Backspace => {
            app.focused_form_field_mut().pop();
        }
        KeyCode::Char(c) => app.focused_form_field_mut().push(c),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.screen != Screen::Chat {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            if app.show_quick_questions {
                app.quick_nav_down();
            } else {
                app.scroll_down();
                app.scroll_down();
                app.scroll_down();
            }
        }
        MouseEventKind::ScrollUp => {
            if app.show_quick_questions {
                app.quick_nav_up();
            } else {
                app.scroll_up();
                app.scroll_up();
                app.scroll_up();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::history::ConversationStore;
    use tempfile::TempDir;

    fn test_app(dir: &TempDir) -> App {
        let mut config = Config::new();
        config.server_url = Some("http://127.0.0.1:9".to_string());
        let store = ConversationStore::load(dir.path().join("history.json"));
        App::new(config, dir.path().join("config.json"), store).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_typing_edits_at_cursor() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        for c in "fes".chars() {
            handle_key(&mut app, key(KeyCode::Char(c)));
        }
        handle_key(&mut app, key(KeyCode::Left));
        handle_key(&mut app, key(KeyCode::Char('e')));
        assert_eq!(app.chat_input, "fees");
        assert_eq!(app.chat_cursor, 3);

        handle_key(&mut app, key(KeyCode::End));
        handle_key(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.chat_input, "fee");
    }

    #[tokio::test]
    async fn test_enter_submits_from_editing_mode() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        for c in "website".chars() {
            handle_key(&mut app, key(KeyCode::Char(c)));
        }
        handle_key(&mut app, key(KeyCode::Enter));

        assert_eq!(app.store.len(), 2);
        assert!(app.reply_task.is_some());
        if let Some(task) = app.reply_task.take() {
            task.abort();
        }
    }

    #[tokio::test]
    async fn test_confirm_prompt_swallows_other_keys() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.input_mode = InputMode::Normal;
        app.confirm_clear = true;

        let theme_before = app.theme;
        handle_key(&mut app, key(KeyCode::Char('t')));
        assert_eq!(app.theme, theme_before);
        assert!(app.confirm_clear);

        handle_key(&mut app, key(KeyCode::Esc));
        assert!(!app.confirm_clear);
        assert_eq!(app.screen, Screen::Chat);
    }

    #[tokio::test]
    async fn test_admin_login_enter_validates() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.open_admin();
        app.admin_tasks.clear();

        for c in "admin".chars() {
            handle_key(&mut app, key(KeyCode::Char(c)));
        }
        assert_eq!(app.admin.username, "admin");

        handle_key(&mut app, key(KeyCode::Tab));
        for c in "pw".chars() {
            handle_key(&mut app, key(KeyCode::Char(c)));
        }
        assert_eq!(app.admin.password, "pw");

        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.admin_tasks.len(), 1);
        for task in app.admin_tasks.drain(..) {
            task.abort();
        }
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_anywhere() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.open_admin();
        app.admin_tasks.clear();

        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }
}

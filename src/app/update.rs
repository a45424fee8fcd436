use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;

use crate::age;
use crate::app::keymap::KeyAction;
use crate::app::{AppState, EditField, InputMode, ModalState};
use crate::ui;

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    tracing::info!(users = app.users.len(), "starting event loop");
    loop {
        if !app.today_pinned {
            app.today = age::local_today();
        }

        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key) {
                    break;
                }
            }
        }
    }
    tracing::info!("quit requested");
    Ok(())
}

/// Apply one key press to the state. Returns `true` when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> bool {
    match app.input_mode {
        InputMode::Normal => return handle_normal_key(app, key),
        InputMode::Search => handle_search_key(app, key),
        InputMode::Edit => handle_edit_key(app, key),
        InputMode::Modal => handle_modal_key(app, key.code),
    }
    false
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) -> bool {
    let Some(action) = app.keymap.resolve(&key) else {
        return false;
    };
    let selected = app.selected_user().map(|u| u.id);
    let step = app.columns.max(1) as isize;
    let page = page_size(app) as isize;
    match action {
        KeyAction::Quit => return true,
        KeyAction::Ignore => {}
        KeyAction::OpenHelp => {
            app.modal = Some(ModalState::Help);
            app.input_mode = InputMode::Modal;
        }
        KeyAction::StartSearch => app.input_mode = InputMode::Search,
        KeyAction::ToggleKeybindsPane => app.show_keybinds = !app.show_keybinds,
        KeyAction::ToggleExpand => {
            if let Some(id) = selected {
                app.toggle_expand(id);
            }
        }
        KeyAction::BeginEdit => {
            if let Some(id) = selected {
                if app.begin_edit(id) {
                    app.input_mode = InputMode::Edit;
                }
            }
        }
        KeyAction::DeleteSelection => {
            // Delete is offered on the expanded card only, like the edit action
            if let Some(id) = selected.filter(|id| app.is_open(*id)) {
                app.request_delete(id);
            }
        }
        KeyAction::MoveLeft => move_cursor(app, -1),
        KeyAction::MoveRight => move_cursor(app, 1),
        KeyAction::MoveUp => move_cursor(app, -step),
        KeyAction::MoveDown => move_cursor(app, step),
        KeyAction::PageUp => move_cursor(app, -page),
        KeyAction::PageDown => move_cursor(app, page),
    }
    false
}

fn page_size(app: &AppState) -> usize {
    app.columns.max(1) * 3
}

fn move_cursor(app: &mut AppState, delta: isize) {
    let len = app.filtered_users().len();
    if len == 0 {
        app.selected_index = 0;
        return;
    }
    let target = app.selected_index as isize + delta;
    app.selected_index = target.clamp(0, len as isize - 1) as usize;
}

fn handle_search_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            app.set_search("");
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            let mut text = app.search_value.clone();
            text.pop();
            app.set_search(text);
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut text = app.search_value.clone();
            text.push(c);
            app.set_search(text);
        }
        _ => {}
    }
}

fn handle_edit_key(app: &mut AppState, key: KeyEvent) {
    let focus = app.edit_focus;
    match key.code {
        KeyCode::Esc => {
            app.cancel_edit();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => match app.commit_edit() {
            Ok(()) => app.input_mode = InputMode::Normal,
            Err(e) => {
                app.modal = Some(ModalState::ValidationError { message: e.to_string() });
                app.input_mode = InputMode::Modal;
            }
        },
        KeyCode::Tab | KeyCode::Down => app.edit_focus = focus.next(),
        KeyCode::BackTab | KeyCode::Up => app.edit_focus = focus.prev(),
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if focus == EditField::Gender => {
            let Some(current) = app.edited_user.as_ref().map(|e| e.gender) else {
                return;
            };
            let next = if key.code == KeyCode::Left { current.prev() } else { current.next() };
            app.update_edited_field(EditField::Gender, next.label());
        }
        KeyCode::Backspace if focus != EditField::Gender => {
            let Some(mut value) = current_value(app, focus) else {
                return;
            };
            value.pop();
            app.update_edited_field(focus, &value);
        }
        KeyCode::Char(c)
            if focus != EditField::Gender && !key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            let Some(mut value) = current_value(app, focus) else {
                return;
            };
            value.push(c);
            app.update_edited_field(focus, &value);
        }
        _ => {}
    }
}

fn current_value(app: &AppState, field: EditField) -> Option<String> {
    app.edited_user.as_ref().map(|e| e.value(field).to_string())
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    match &mut app.modal {
        Some(ModalState::ConfirmDelete { id, selected }) => match code {
            KeyCode::Esc | KeyCode::Char('n') => close_modal(app),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                *selected = if *selected == 0 { 1 } else { 0 };
            }
            KeyCode::Char('y') => {
                let id = *id;
                close_modal(app);
                app.delete_user(id);
            }
            KeyCode::Enter => {
                let (id, yes) = (*id, *selected == 0);
                close_modal(app);
                if yes {
                    app.delete_user(id);
                } else {
                    tracing::debug!(id, "delete declined");
                }
            }
            _ => {}
        },
        Some(ModalState::ValidationError { .. }) => {
            if matches!(code, KeyCode::Esc | KeyCode::Enter) {
                close_modal(app);
            }
        }
        Some(ModalState::Help) => {
            if matches!(code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?')) {
                close_modal(app);
            }
        }
        None => app.input_mode = InputMode::Normal,
    }
}

/// Close the dialog and return to the editor if a session is still open.
fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = if app.edited_user.is_some() { InputMode::Edit } else { InputMode::Normal };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Gender, User};
    use chrono::NaiveDate;

    fn mk_user(id: u32, first: &str) -> User {
        User {
            id,
            first: first.to_string(),
            last: "Tester".to_string(),
            picture: String::new(),
            dob: "1990-05-05".to_string(),
            age: 36,
            gender: Gender::Female,
            country: "Chile".to_string(),
            description: String::new(),
        }
    }

    fn mk_app() -> AppState {
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let users = vec![mk_user(1, "Ana"), mk_user(2, "Ben"), mk_user(3, "Cy")];
        let mut app = AppState::new(users, today);
        app.today_pinned = true;
        app
    }

    fn press(app: &mut AppState, code: KeyCode) -> bool {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut AppState, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn quit_only_from_normal_mode() {
        let mut app = mk_app();
        press(&mut app, KeyCode::Char('/'));
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.search_value, "q");
        press(&mut app, KeyCode::Esc);
        assert!(app.search_value.is_empty());
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn typing_filters_live_and_clamps_cursor() {
        let mut app = mk_app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.selected_index, 2);
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "BE");
        assert_eq!(app.filtered_users().len(), 1);
        assert_eq!(app.selected_index, 0);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.search_value, "BE");
    }

    #[test]
    fn edit_requires_expanded_card() {
        let mut app = mk_app();
        press(&mut app, KeyCode::Char('e'));
        assert!(app.edited_user.is_none());
        assert_eq!(app.input_mode, InputMode::Normal);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('e'));
        assert!(app.is_editing(1));
        assert_eq!(app.input_mode, InputMode::Edit);
    }

    #[test]
    fn rejected_save_shows_dialog_then_returns_to_editor() {
        let mut app = mk_app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Tab); // age
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "17");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Modal);
        assert!(matches!(
            &app.modal,
            Some(ModalState::ValidationError { message }) if message.contains("adult")
        ));
        assert_eq!(app.users[0].age, 36);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Edit);
        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "8");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.users[0].age, 18);
        assert!(app.edited_user.is_none());
    }

    #[test]
    fn gender_selector_cycles_with_arrows() {
        let mut app = mk_app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.edit_focus, EditField::Gender);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.edited_user.as_ref().unwrap().gender, Gender::Transgender);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.edited_user.as_ref().unwrap().gender, Gender::Male);
        type_str(&mut app, "x");
        assert_eq!(app.edited_user.as_ref().unwrap().gender, Gender::Male);
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut app = mk_app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Delete);
        assert!(app.modal.is_none(), "collapsed card offers no delete");

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.modal, Some(ModalState::ConfirmDelete { id: 2, selected: 1 }));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.users.len(), 3, "default answer is No");
        assert_eq!(app.input_mode, InputMode::Normal);

        for dismiss in [KeyCode::Esc, KeyCode::Char('n')] {
            press(&mut app, KeyCode::Delete);
            press(&mut app, KeyCode::Left);
            press(&mut app, dismiss);
            assert!(app.modal.is_none());
            assert_eq!(app.input_mode, InputMode::Normal);
            assert_eq!(app.users.len(), 3, "dismissed with {dismiss:?}");
            assert!(app.is_open(2));
        }

        press(&mut app, KeyCode::Delete);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Enter);
        let ids: Vec<u32> = app.users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(app.open_user_id, None);
    }

    #[test]
    fn escape_in_editor_discards_changes() {
        let mut app = mk_app();
        let before = app.users.clone();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('e'));
        type_str(&mut app, "junk");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.users, before);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn vertical_moves_step_by_grid_columns() {
        let mut app = mk_app();
        app.columns = 2;
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_index, 2);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_index, 2);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_index, 0);
    }
}

//! Page shell: header, search box, card grid, status bar and dialogs.
//!
pub mod cards;
pub mod components;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode, ModalState};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, root[0], app);
    render_search(f, root[1], app);

    if app.show_keybinds {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(root[2]);
        cards::render_card_grid(f, body[0], app);
        components::render_keybinds_panel(f, body[1], app);
    } else {
        cards::render_card_grid(f, root[2], app);
    }

    components::render_status_bar(f, root[3], app);

    if let Some(state) = app.modal.clone() {
        let area = f.area();
        render_modal(f, area, app, &state);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let p = Paragraph::new(format!(
        "Celebrity directory  showing {} of {}  \
         /: search  Enter: expand  e: edit  d: delete  ?: help  q: quit",
        app.filtered_users().len(),
        app.users.len()
    ))
    .block(
        Block::default()
            .title("celeb-directory")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}

fn render_search(f: &mut Frame, area: Rect, app: &AppState) {
    let active = app.input_mode == InputMode::Search;
    let border = if active { app.theme.highlight_fg } else { app.theme.border };
    let line = if app.search_value.is_empty() && !active {
        Line::from(Span::styled(
            "press / to filter by name",
            Style::default().fg(app.theme.muted).add_modifier(Modifier::ITALIC),
        ))
    } else {
        Line::from(Span::styled(app.search_value.clone(), Style::default().fg(app.theme.text)))
    };
    let p = Paragraph::new(line).block(
        Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(p, area);

    if active {
        let x = search_cursor_x(area, &app.search_value);
        f.set_cursor_position(Position::new(x, area.y + 1));
    }
}

/// Cursor column after `text` inside the bordered search box, kept on the box.
fn search_cursor_x(area: Rect, text: &str) -> u16 {
    let typed = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    area.x
        .saturating_add(1)
        .saturating_add(typed)
        .min(area.right().saturating_sub(2))
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    match state {
        ModalState::ConfirmDelete { id, selected } => {
            components::render_confirm_delete(f, area, app, *id, *selected);
        }
        ModalState::ValidationError { message } => {
            components::render_validation_modal(f, area, app, message);
        }
        ModalState::Help => components::render_help_modal(f, area, app),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_cursor_stays_inside_box() {
        let area = Rect::new(2, 0, 20, 3);
        assert_eq!(search_cursor_x(area, ""), 3);
        assert_eq!(search_cursor_x(area, "abc"), 6);
        assert_eq!(search_cursor_x(area, &"x".repeat(70_000)), 20);

        let edge = Rect::new(u16::MAX - 10, 0, 10, 3);
        assert_eq!(search_cursor_x(edge, &"y".repeat(100)), u16::MAX - 2);
    }
}

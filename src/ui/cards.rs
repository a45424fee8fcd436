//! Card grid for the directory view.
//!
//! Each visible user gets one bordered card. The grid uses one, two or three
//! columns depending on terminal width and scrolls by whole rows so the
//! selected card stays on screen.
//!
use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::age;
use crate::app::theme::Theme;
use crate::app::{AppState, EditField, EditedUser};
use crate::data::User;

/// Terminal width at which the grid gains a second column.
pub const MEDIUM_WIDTH: u16 = 80;
/// Terminal width at which the grid gains a third column.
pub const WIDE_WIDTH: u16 = 140;

/// Number of grid columns for an area of `width` cells.
pub fn columns_for_width(width: u16) -> usize {
    if width >= WIDE_WIDTH {
        3
    } else if width >= MEDIUM_WIDTH {
        2
    } else {
        1
    }
}

/// Age implied by the date of birth, when it differs from the stored age.
pub fn divergent_age(user: &User, today: NaiveDate) -> Option<i32> {
    age::age_from_str(&user.dob, today).filter(|d| i64::from(*d) != i64::from(user.age))
}

/// Age shown on a card: the stored value, plus a note when the date of birth
/// implies something else.
pub fn age_label(user: &User, today: NaiveDate) -> String {
    match divergent_age(user, today) {
        Some(derived) => format!("{} (dob implies {})", user.age, derived),
        None => user.age.to_string(),
    }
}

pub fn render_card_grid(f: &mut Frame, area: Rect, app: &mut AppState) {
    let columns = columns_for_width(area.width);
    app.columns = columns;
    let app: &AppState = app;

    let users: Vec<User> = app.filtered_users().into_iter().cloned().collect();
    if users.is_empty() {
        let msg = if app.users.is_empty() {
            "No users left."
        } else {
            "No users match the search."
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border));
        let p = Paragraph::new(msg)
            .style(Style::default().fg(app.theme.muted))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let col_width = area.width / columns as u16;
    let inner_width = col_width.saturating_sub(2).max(1);

    let cards: Vec<(Vec<Line>, u16)> = users
        .iter()
        .map(|u| {
            let lines = card_lines(app, u);
            let height = wrapped_height(&lines, inner_width) + 2;
            (lines, height)
        })
        .collect();

    let rows: Vec<&[(Vec<Line>, u16)]> = cards.chunks(columns).collect();
    let row_heights: Vec<u16> = rows
        .iter()
        .map(|r| r.iter().map(|(_, h)| *h).max().unwrap_or(0))
        .collect();

    let selected_row = app.selected_index / columns;
    let mut first_row = selected_row.min(rows.len().saturating_sub(1));
    let mut used = row_heights.get(first_row).copied().unwrap_or(0);
    while first_row > 0 && used + row_heights[first_row - 1] <= area.height {
        first_row -= 1;
        used += row_heights[first_row];
    }

    let mut y = area.y;
    for (row_idx, row) in rows.iter().enumerate().skip(first_row) {
        if y >= area.bottom() {
            break;
        }
        let height = row_heights[row_idx].min(area.bottom() - y);
        let row_area = Rect { x: area.x, y, width: area.width, height };
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(row_area);
        for (col, (lines, _)) in row.iter().enumerate() {
            let index = row_idx * columns + col;
            let user = &users[index];
            let block = card_block(app, user, index == app.selected_index);
            let p = Paragraph::new(lines.clone()).wrap(Wrap { trim: false }).block(block);
            f.render_widget(p, cells[col]);
        }
        y += height;
    }
}

fn card_block(app: &AppState, user: &User, selected: bool) -> Block<'static> {
    let color = if app.is_editing(user.id) {
        app.theme.editing
    } else if selected {
        app.theme.highlight_fg
    } else if app.is_open(user.id) {
        app.theme.card_open
    } else {
        app.theme.border
    };
    let mut style = Style::default().fg(color);
    if selected {
        style = style.add_modifier(Modifier::BOLD);
    }
    let marker = if app.is_open(user.id) { "▴" } else { "▾" };
    Block::default()
        .title(format!(" {} #{} ", marker, user.id))
        .borders(Borders::ALL)
        .border_style(style)
}

fn card_lines(app: &AppState, user: &User) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let name_style = Style::default().fg(theme.title).add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Name: ", Style::default().fg(theme.muted)),
            Span::styled(user.full_name(), name_style),
        ]),
        field_line(theme, "Picture", user.picture.clone(), Style::default().fg(theme.muted)),
    ];

    if !app.is_open(user.id) {
        return lines;
    }

    match app.edited_user.as_ref().filter(|e| e.id == user.id) {
        Some(edit) => lines.extend(edit_lines(theme, edit, app.edit_focus)),
        None => {
            let age_color = match divergent_age(user, app.today) {
                Some(_) => theme.error,
                None => theme.text,
            };
            let text = Style::default().fg(theme.text);
            let age = age_label(user, app.today);
            lines.push(field_line(theme, "Date of Birth", user.dob.clone(), text));
            lines.push(field_line(theme, "Age", age, Style::default().fg(age_color)));
            lines.push(field_line(theme, "Gender", user.gender.to_string(), text));
            lines.push(field_line(theme, "Country", user.country.clone(), text));
            lines.push(field_line(theme, "Description", user.description.clone(), text));
            lines.push(Line::from(Span::styled(
                "[e] Edit  [d] Delete",
                Style::default().fg(theme.highlight_fg).add_modifier(Modifier::ITALIC),
            )));
        }
    }
    lines
}

fn edit_lines(theme: &Theme, edit: &EditedUser, focus: EditField) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = EditField::ALL
        .iter()
        .map(|field| {
            let focused = *field == focus;
            let marker = if focused { "▶ " } else { "  " };
            let value = match field {
                EditField::Gender => format!("◀ {} ▶", edit.gender),
                _ if focused => format!("{}_", edit.value(*field)),
                _ => edit.value(*field).to_string(),
            };
            let value_style = if focused {
                Style::default().fg(theme.editing).add_modifier(Modifier::UNDERLINED)
            } else {
                Style::default().fg(theme.text)
            };
            Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.editing)),
                Span::styled(format!("{}: ", field.label()), Style::default().fg(theme.muted)),
                Span::styled(value, value_style),
            ])
        })
        .collect();
    lines.push(Line::from(Span::styled(
        "[Enter] Save  [Esc] Cancel  [Tab] Next field",
        Style::default().fg(theme.highlight_fg).add_modifier(Modifier::ITALIC),
    )));
    lines
}

fn field_line(theme: &Theme, label: &str, value: String, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(theme.muted)),
        Span::styled(value, style),
    ])
}

/// Rows needed to show `lines` wrapped at `width` cells.
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = width.max(1) as usize;
    lines
        .iter()
        .map(|l| l.width().max(1).div_ceil(width) as u16)
        .sum()
}

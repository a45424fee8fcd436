//! Shared UI components (status bar, keybindings panel, dialogs).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use std::collections::{BTreeMap, BTreeSet};

use crate::app::keymap::{KeyAction, Keymap};
use crate::app::{AppState, InputMode};

/// Render the bottom status bar with mode, selection and clock.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Edit => "EDIT",
        InputMode::Modal => "DIALOG",
    };
    let open = app
        .open_user_id
        .and_then(|id| app.user(id))
        .map(|u| format!("  open:{}", u.full_name()))
        .unwrap_or_default();
    let clock = if app.today_pinned { "  (pinned)" } else { "" };
    let msg = format!(
        "mode: {mode}  card:{}/{}  columns:{}{open}  today:{}{clock}",
        (app.selected_index + 1).min(app.filtered_users().len()),
        app.filtered_users().len(),
        app.columns,
        app.today,
    );
    let p = Paragraph::new(msg)
        .style(Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg));
    f.render_widget(p, area);
}

/// Render the right-side keybinds viewer with grouped sections.
pub fn render_keybinds_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .title("Keybindings")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);

    let mut cards: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
    let mut navigation: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();

    for ((mods, code), action) in app.keymap.all_bindings() {
        let key = Keymap::format_key(mods, code);
        let (section, label) = match action {
            KeyAction::Quit => (&mut cards, "Quit"),
            KeyAction::StartSearch => (&mut cards, "Search"),
            KeyAction::ToggleExpand => (&mut cards, "Expand / collapse"),
            KeyAction::BeginEdit => (&mut cards, "Edit"),
            KeyAction::DeleteSelection => (&mut cards, "Delete"),
            KeyAction::OpenHelp => (&mut cards, "Help"),
            KeyAction::MoveUp => (&mut navigation, "Move up"),
            KeyAction::MoveDown => (&mut navigation, "Move down"),
            KeyAction::MoveLeft => (&mut navigation, "Move left"),
            KeyAction::MoveRight => (&mut navigation, "Move right"),
            KeyAction::PageUp => (&mut navigation, "Page up"),
            KeyAction::PageDown => (&mut navigation, "Page down"),
            KeyAction::ToggleKeybindsPane | KeyAction::Ignore => continue,
        };
        section.entry(label).or_default().insert(key);
    }

    let label_w = 18usize.min(inner.width.saturating_sub(6) as usize);
    let row = |label: &str, value: String| -> Line<'static> {
        let lbl: String = label.chars().take(label_w).collect();
        Line::from(vec![
            Span::raw(format!("  {:>width$} │ ", lbl, width = label_w)),
            Span::styled(value, Style::default().add_modifier(Modifier::ITALIC)),
        ])
    };
    let heading = |s: &'static str| {
        Line::from(Span::styled(s, Style::default().add_modifier(Modifier::BOLD)))
    };

    let mut lines: Vec<Line> = vec![heading("Cards:")];
    for (label, keys) in &cards {
        lines.push(row(*label, keys.iter().cloned().collect::<Vec<_>>().join(", ")));
    }
    lines.push(Line::raw(""));
    lines.push(heading("Navigation:"));
    for (label, keys) in &navigation {
        lines.push(row(*label, keys.iter().cloned().collect::<Vec<_>>().join(", ")));
    }
    lines.push(Line::raw(""));
    lines.push(heading("Editor:"));
    for (label, value) in [
        ("Save", "Enter"),
        ("Cancel", "Esc"),
        ("Next / prev field", "Tab, BackTab"),
        ("Change gender", "Left, Right, Space"),
    ] {
        lines.push(row(label, value.to_string()));
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(block, area);
    f.render_widget(p, inner);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Yes/No prompt before a user is removed.
pub fn render_confirm_delete(f: &mut Frame, area: Rect, app: &AppState, id: u32, selected: usize) {
    let rect = centered_rect(50, 7, area);
    let name = app.user(id).map(|u| u.full_name()).unwrap_or_default();
    let yes = if selected == 0 { "[Yes]" } else { " Yes " };
    let no = if selected == 1 { "[No]" } else { " No  " };
    let body = format!("Are you sure you want to delete {name}?\n\n  {yes}    {no}");
    let p = Paragraph::new(body).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Confirm delete")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// A rejected save. The message names which rule failed.
pub fn render_validation_modal(f: &mut Frame, area: Rect, app: &AppState, message: &str) {
    let max_w = area.width.saturating_sub(6).max(30);
    let width = 50u16.min(max_w);
    let approx_lines = (message.len() as u16 / width.saturating_sub(4).max(10)).max(1);
    let height = (approx_lines + 4).min(area.height.saturating_sub(4).max(5)).max(5);
    let rect = centered_rect(width, height, area);
    let body = vec![
        Line::from(Span::styled(message.to_string(), Style::default().fg(app.theme.error))),
        Line::raw(""),
        Line::from(Span::styled("Esc / Enter to go back", Style::default().fg(app.theme.muted))),
    ];
    let p = Paragraph::new(body).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Cannot save")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.error)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render the help modal with usage information.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 70u16.min(area.width.saturating_sub(4)).max(40);
    let height = 18u16.min(area.height.saturating_sub(2)).max(10);
    let rect = centered_rect(width, height, area);

    let key = |s: &'static str| Span::styled(s, Style::default().add_modifier(Modifier::ITALIC));
    let lines = vec![
        Line::from(vec![Span::raw("Move between cards: "), key("Arrow keys / h j k l")]),
        Line::from(vec![
            Span::raw("Filter by name: "),
            key("/"),
            Span::raw(" then type; Enter keeps, Esc clears"),
        ]),
        Line::from(vec![Span::raw("Expand / collapse card: "), key("Enter / Space")]),
        Line::from(vec![Span::raw("Edit expanded card: "), key("e")]),
        Line::from(vec![
            Span::raw("Delete expanded card: "),
            key("d / Delete"),
            Span::raw(" (asks first)"),
        ]),
        Line::from(vec![Span::raw("Keybindings panel: "), key("Shift+K")]),
        Line::from(vec![Span::raw("Quit: "), key("q")]),
        Line::raw(""),
        Line::from(Span::styled("Editor", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(vec![Span::raw("Switch field: "), key("Tab / BackTab / Up / Down")]),
        Line::from(vec![Span::raw("Save: "), key("Enter"), Span::raw("  Cancel: "), key("Esc")]),
        Line::from(Span::raw("Changing the date of birth recomputes the age.")),
        Line::from(Span::raw("Saving needs an age of 18 or more and a country.")),
        Line::raw(""),
        Line::from(vec![Span::raw("Close help: "), key("Esc / Enter")]),
    ];

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

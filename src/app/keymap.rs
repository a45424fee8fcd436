//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Only the card browser (normal mode) goes through the keymap. Typing into
//! the search box, the editor and dialogs use fixed keys.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::path::Path;

/// Semantic keyboard actions that can be bound to key combinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Display the help dialog.
    OpenHelp,
    /// Focus the search box.
    StartSearch,
    /// Expand or collapse the selected card.
    ToggleExpand,
    /// Start editing the selected (expanded) card.
    BeginEdit,
    /// Ask to delete the selected (expanded) card.
    DeleteSelection,
    /// Toggle the visibility of the keybindings panel on the right.
    ToggleKeybindsPane,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    PageUp,
    PageDown,
    /// Ignore this key (used for keys that shouldn't trigger anything).
    Ignore,
}

const ACTIONS: [KeyAction; 14] = [
    KeyAction::Quit,
    KeyAction::OpenHelp,
    KeyAction::StartSearch,
    KeyAction::ToggleExpand,
    KeyAction::BeginEdit,
    KeyAction::DeleteSelection,
    KeyAction::ToggleKeybindsPane,
    KeyAction::MoveUp,
    KeyAction::MoveDown,
    KeyAction::MoveLeft,
    KeyAction::MoveRight,
    KeyAction::PageUp,
    KeyAction::PageDown,
    KeyAction::Ignore,
];

/// Maps `(KeyModifiers, KeyCode)` pairs to [`KeyAction`]s.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Arrow keys plus vim-style hjkl, Enter/Space to expand, `e` to edit.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Enter), KeyAction::ToggleExpand);
        bindings.insert((M::NONE, Char(' ')), KeyAction::ToggleExpand);
        bindings.insert((M::NONE, Char('e')), KeyAction::BeginEdit);
        bindings.insert((M::NONE, Delete), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Char('d')), KeyAction::DeleteSelection);

        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Left), KeyAction::MoveLeft);
        bindings.insert((M::NONE, Right), KeyAction::MoveRight);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('h')), KeyAction::MoveLeft);
        bindings.insert((M::NONE, Char('l')), KeyAction::MoveRight);
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);

        // Shift+K arrives differently depending on the terminal
        bindings.insert((M::SHIFT, Char('K')), KeyAction::ToggleKeybindsPane);
        bindings.insert((M::SHIFT, Char('k')), KeyAction::ToggleKeybindsPane);
        bindings.insert((M::NONE, Char('K')), KeyAction::ToggleKeybindsPane);

        Self { bindings }
    }

    /// Load a keymap from `path`, or write the defaults there if it doesn't exist.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(e) = km.write_file(path) {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "could not write default keybindings"
            );
        }
        km
    }

    /// Load a keymap from a configuration file.
    ///
    /// Lines are `<Action> = <KeySpec>`; the legacy `<KeySpec> = <Action>`
    /// order is accepted too. Bindings override the defaults.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            let (lhs, rhs) = (lhs.trim(), rhs.trim());
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            } else if let (Some(key), Some(action)) = (parse_key(lhs), parse_action(rhs)) {
                map.bindings.insert(key, action);
            } else {
                tracing::debug!(line = raw, "ignoring keybinding entry");
            }
        }
        map
    }

    /// Write the current keymap to a configuration file.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# celeb-directory keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+q, Enter, Space, Esc, Up, Down, Left, Right,\n");
        buf.push_str("#   PageUp, PageDown, Delete, /, e, d\n");
        let _ = writeln!(
            &mut buf,
            "# Actions: {}\n",
            ACTIONS.iter().map(|a| format_action(*a)).collect::<Vec<_>>().join(", ")
        );

        let mut entries: Vec<(String, &'static str)> = self
            .bindings
            .iter()
            .filter(|((mods, _), _)| !mods.contains(KeyModifiers::SHIFT))
            .map(|((mods, code), action)| (Self::format_key(*mods, *code), format_action(*action)))
            .collect();
        entries.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(&b.0)));
        for (key, action) in entries {
            let _ = writeln!(&mut buf, "{} = {}", action, key);
        }

        std::fs::write(path, buf)
    }

    /// Resolve a key event to its corresponding action.
    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Snapshot of all bindings as ((modifiers, code), action) pairs.
    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Format a key into a human-readable spec like "Ctrl+q" or "Space".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(' ') => "Space".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let (mods, rest) = match s.strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, s),
    };
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        "Space" => Char(' '),
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let s = s.trim();
    ACTIONS.into_iter().find(|a| format_action(*a) == s)
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::OpenHelp => "OpenHelp",
        KeyAction::StartSearch => "StartSearch",
        KeyAction::ToggleExpand => "ToggleExpand",
        KeyAction::BeginEdit => "BeginEdit",
        KeyAction::DeleteSelection => "DeleteSelection",
        KeyAction::ToggleKeybindsPane => "ToggleKeybindsPane",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::MoveLeft => "MoveLeft",
        KeyAction::MoveRight => "MoveRight",
        KeyAction::PageUp => "PageUp",
        KeyAction::PageDown => "PageDown",
        KeyAction::Ignore => "Ignore",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn defaults_cover_card_actions() {
        let km = Keymap::default();
        assert_eq!(km.resolve(&press(KeyCode::Enter)), Some(KeyAction::ToggleExpand));
        assert_eq!(km.resolve(&press(KeyCode::Char('e'))), Some(KeyAction::BeginEdit));
        assert_eq!(km.resolve(&press(KeyCode::Delete)), Some(KeyAction::DeleteSelection));
        assert_eq!(km.resolve(&press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn parse_accepts_both_orders_and_ctrl() {
        let km = Keymap::parse("BeginEdit = Ctrl+e\nx = Quit\nnonsense\nFly = z\n");
        let ctrl_e = KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL);
        assert_eq!(km.resolve(&ctrl_e), Some(KeyAction::BeginEdit));
        assert_eq!(km.resolve(&press(KeyCode::Char('x'))), Some(KeyAction::Quit));
        assert_eq!(km.resolve(&press(KeyCode::Char('z'))), None);
    }

    #[test]
    fn format_key_round_trips_through_parse_key() {
        for (mods, code) in [
            (KeyModifiers::NONE, KeyCode::Char(' ')),
            (KeyModifiers::CONTROL, KeyCode::Char('s')),
            (KeyModifiers::NONE, KeyCode::PageDown),
        ] {
            let spec = Keymap::format_key(mods, code);
            assert_eq!(parse_key(&spec), Some((mods, code)), "spec {spec}");
        }
    }
}

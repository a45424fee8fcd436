//! Application state types and entry glue.
//!
//! [`AppState`] is the directory view: it owns the working copy of the
//! collection, the expanded card, the search text and the editing session, and
//! changes them only through the operations defined here. The event loop in
//! [`update`] maps key presses onto those operations.
//!
pub mod edit;
pub mod keymap;
pub mod theme;
pub mod update;

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::data::User;
use crate::error::ValidationError;
use crate::search;

pub use edit::{EditField, EditedUser};
pub use theme::Theme;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Edit,
    Modal,
}

/// Dialogs drawn over the card grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    /// Yes/No prompt before removing a user. `selected`: 0 = Yes, 1 = No.
    ConfirmDelete { id: u32, selected: usize },
    /// A rejected save; the editing session stays open underneath.
    ValidationError { message: String },
    Help,
}

pub struct AppState {
    pub users: Vec<User>,
    pub open_user_id: Option<u32>,
    pub search_value: String,
    pub edited_user: Option<EditedUser>,
    /// Cursor within [`AppState::filtered_users`].
    pub selected_index: usize,
    /// Grid columns at the last render.
    pub columns: usize,
    pub input_mode: InputMode,
    pub edit_focus: EditField,
    pub modal: Option<ModalState>,
    pub show_keybinds: bool,
    pub theme: Theme,
    pub keymap: keymap::Keymap,
    pub today: NaiveDate,
    /// When false, `today` follows the local clock.
    pub today_pinned: bool,
}

impl AppState {
    /// Build the view over an already-loaded collection.
    pub fn new(users: Vec<User>, today: NaiveDate) -> Self {
        Self {
            users,
            open_user_id: None,
            search_value: String::new(),
            edited_user: None,
            selected_index: 0,
            columns: 1,
            input_mode: InputMode::Normal,
            edit_focus: EditField::Dob,
            modal: None,
            show_keybinds: false,
            theme: Theme::mocha(),
            keymap: keymap::Keymap::default(),
            today,
            today_pinned: false,
        }
    }

    /// Users whose first or last name contains the search text, in
    /// collection order. Recomputed on every call.
    pub fn filtered_users(&self) -> Vec<&User> {
        search::filter_users(&self.users, &self.search_value)
    }

    pub fn user(&self, id: u32) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// User under the card cursor, if any card is visible.
    pub fn selected_user(&self) -> Option<&User> {
        self.filtered_users().get(self.selected_index).copied()
    }

    pub fn is_open(&self, id: u32) -> bool {
        self.open_user_id == Some(id)
    }

    pub fn is_editing(&self, id: u32) -> bool {
        self.edited_user.as_ref().is_some_and(|e| e.id == id)
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search_value = text.into();
        self.clamp_selection();
    }

    /// Expand `id`, or collapse it when it is already the expanded card.
    ///
    /// Any card that stops being expanded loses its editing session.
    pub fn toggle_expand(&mut self, id: u32) {
        self.open_user_id = if self.is_open(id) { None } else { Some(id) };
        let open = self.open_user_id;
        if let Some(stale) = self.edited_user.take_if(|e| Some(e.id) != open) {
            tracing::debug!(id = stale.id, "discarding edit of collapsed card");
        }
        tracing::debug!(id, open = ?self.open_user_id, "toggle expand");
    }

    /// Start editing `id`. Only the expanded card can be edited; returns
    /// whether a session was started.
    pub fn begin_edit(&mut self, id: u32) -> bool {
        if !self.is_open(id) {
            return false;
        }
        let Some(user) = self.user(id) else {
            return false;
        };
        self.edited_user = Some(EditedUser::from_user(user));
        self.edit_focus = EditField::Dob;
        tracing::debug!(id, "begin edit");
        true
    }

    /// Change one field of the working copy. The committed collection is untouched.
    pub fn update_edited_field(&mut self, field: EditField, value: &str) {
        let today = self.today;
        if let Some(edit) = self.edited_user.as_mut() {
            edit.set(field, value, today);
        }
    }

    /// Validate the working copy and write it back into the collection.
    ///
    /// On failure nothing changes and the session stays open. Without a
    /// session this does nothing.
    pub fn commit_edit(&mut self) -> Result<(), ValidationError> {
        let Some(edit) = self.edited_user.as_ref() else {
            return Ok(());
        };
        let updated = match edit.validate() {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!(id = edit.id, error = %e, "edit rejected");
                return Err(e);
            }
        };
        if let Some(slot) = self.users.iter_mut().find(|u| u.id == updated.id) {
            *slot = updated;
        }
        if let Some(edit) = self.edited_user.take() {
            tracing::info!(id = edit.id, "edit committed");
        }
        self.clamp_selection();
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        if let Some(edit) = self.edited_user.take() {
            tracing::debug!(id = edit.id, "edit cancelled");
        }
    }

    /// Open the confirmation dialog for deleting `id`.
    pub fn request_delete(&mut self, id: u32) {
        if self.user(id).is_some() {
            self.modal = Some(ModalState::ConfirmDelete { id, selected: 1 });
            self.input_mode = InputMode::Modal;
        }
    }

    /// Remove `id` from the collection, dropping the expanded/edited state
    /// that pointed at it. Returns whether a user was removed.
    pub fn delete_user(&mut self, id: u32) -> bool {
        let before = self.users.len();
        self.users.retain(|u| u.id != id);
        if self.users.len() == before {
            return false;
        }
        if self.open_user_id == Some(id) {
            self.open_user_id = None;
        }
        if self.is_editing(id) {
            self.edited_user = None;
        }
        self.clamp_selection();
        tracing::info!(id, remaining = self.users.len(), "user deleted");
        true
    }

    fn clamp_selection(&mut self) {
        let len = self.filtered_users().len();
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }
}

/// Directory holding `theme.conf` and `keybinds.conf`.
///
/// `$XDG_CONFIG_HOME/celeb-directory`, then `$HOME/.config/celeb-directory`,
/// then the working directory.
pub fn default_config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join("celeb-directory");
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".config").join("celeb-directory");
    }
    PathBuf::from(".")
}

/// Load theme and keybindings from `dir`, creating default files as needed.
pub fn load_config(app: &mut AppState, dir: &Path) {
    if let Err(e) = std::fs::create_dir_all(dir) {
        tracing::warn!(dir = %dir.display(), error = %e, "config dir unavailable, using defaults");
        return;
    }
    app.theme = Theme::load_or_init(&dir.join("theme.conf"));
    app.keymap = keymap::Keymap::load_or_init(&dir.join("keybinds.conf"));
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;

use crate::provider::LaunchAction;
use crate::results::{GroupMode, SortMode};

/// What selecting a menu entry does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Launch(LaunchAction),
    SetSort(SortMode),
    SetGroup(GroupMode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub action: MenuAction,
    pub label: String,
    pub disabled: bool,
    pub selected: bool,
    pub section: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    /// Contextual launch actions for the focused result.
    Actions,
    /// Sort and group settings.
    Settings,
}

/// A transient popup menu. Fully rebuilt on open; owns its focus index.
/// Disabled entries are focusable but not selectable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub kind: MenuKind,
    pub entries: Vec<MenuEntry>,
    pub focus: usize,
}

impl Menu {
    pub fn actions(can_replace: bool) -> Self {
        let entry = |action, label: &str, disabled| MenuEntry {
            action: MenuAction::Launch(action),
            label: label.to_string(),
            disabled,
            selected: false,
            section: None,
        };
        Self {
            kind: MenuKind::Actions,
            entries: vec![
                entry(LaunchAction::Modal, "Open", false),
                entry(LaunchAction::Workspace, "Open in workspace", false),
                entry(LaunchAction::Pin, "Pin", false),
                entry(LaunchAction::Replace, "Replace current panel", !can_replace),
            ],
            focus: 0,
        }
    }

    pub fn settings(sort: SortMode, group: GroupMode) -> Self {
        let mut entries = Vec::new();
        for mode in SortMode::ALL {
            entries.push(MenuEntry {
                action: MenuAction::SetSort(mode),
                label: mode.label().to_string(),
                disabled: false,
                selected: mode == sort,
                section: Some("Sort by".to_string()),
            });
        }
        for mode in GroupMode::ALL {
            entries.push(MenuEntry {
                action: MenuAction::SetGroup(mode),
                label: mode.label().to_string(),
                disabled: false,
                selected: mode == group,
                section: Some("Group by".to_string()),
            });
        }
        Self {
            kind: MenuKind::Settings,
            entries,
            focus: 0,
        }
    }

    /// Move the focus with wraparound over all entries, disabled included.
    pub fn move_focus(&mut self, delta: isize) {
        if self.entries.is_empty() {
            return;
        }
        let len = self.entries.len() as isize;
        let current = (self.focus as isize).min(len - 1);
        self.focus = (current + delta).rem_euclid(len) as usize;
    }

    pub fn focused(&self) -> Option<&MenuEntry> {
        self.entries.get(self.focus)
    }
}

//! Selection state of an open menu.
//!
//! # Invariants
//! - The selected index always addresses a selectable item, or is 0 on an
//!   empty menu.
//! - Arrow keys wrap around.

use super::build::{Menu, MenuEntry, MenuItem};
use log::debug;

/// Keys the menu reacts to while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKey {
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    Other,
}

impl MenuKey {
    /// Maps a host key name (`"ArrowDown"`, `"Enter"`, ...) to a menu key.
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "Enter" | "Return" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }
}

/// Result of routing one key event through the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Consumed; the host must stop propagation so its caret stays put.
    Handled,
    /// Commit this item at the trigger range.
    Commit(MenuItem),
    /// Close without committing.
    Cancel,
    /// Not a menu key; the host editor handles it.
    PassThrough,
}

/// Selection state machine shared by keyboard and pointer input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuController {
    menu: Menu,
    selected: usize,
}

impl MenuController {
    pub fn new(menu: Menu) -> Self {
        Self { menu, selected: 0 }
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Index into the selectable items.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&MenuItem> {
        self.menu.selectable_items.get(self.selected)
    }

    /// Swaps in a rebuilt menu.
    ///
    /// The selection resets to the first item when the query changed and is
    /// clamped into range otherwise.
    pub fn refresh(&mut self, menu: Menu) {
        if menu.query != self.menu.query {
            self.selected = 0;
        } else {
            self.selected = self
                .selected
                .min(menu.selectable_items.len().saturating_sub(1));
        }
        self.menu = menu;
    }

    pub fn handle_key(&mut self, key: MenuKey) -> KeyOutcome {
        match key {
            MenuKey::ArrowUp => {
                self.step(false);
                KeyOutcome::Handled
            }
            MenuKey::ArrowDown => {
                self.step(true);
                KeyOutcome::Handled
            }
            MenuKey::Enter => match self.selected_item() {
                Some(item) => KeyOutcome::Commit(item.clone()),
                None => KeyOutcome::Handled,
            },
            MenuKey::Escape => KeyOutcome::Cancel,
            MenuKey::Other => KeyOutcome::PassThrough,
        }
    }

    /// Pointer hover over selectable item `index`.
    ///
    /// Returns `true` when the selection moved.
    pub fn hover(&mut self, index: usize) -> bool {
        if index >= self.menu.selectable_items.len() || index == self.selected {
            return false;
        }
        self.selected = index;
        true
    }

    /// Pointer click on selectable item `index`, committing it immediately.
    pub fn click(&mut self, index: usize) -> Option<MenuItem> {
        let item = self.menu.selectable_items.get(index)?.clone();
        self.selected = index;
        Some(item)
    }

    /// Maps a display row to its selectable index; dividers map to `None`.
    pub fn selectable_index_at(&self, display_row: usize) -> Option<usize> {
        let entry = self.menu.display_items.get(display_row)?;
        if matches!(entry, MenuEntry::Divider { .. }) {
            return None;
        }
        Some(
            self.menu.display_items[..display_row]
                .iter()
                .filter(|entry| matches!(entry, MenuEntry::Item(_)))
                .count(),
        )
    }

    fn step(&mut self, forward: bool) {
        let count = self.menu.selectable_items.len();
        if count == 0 {
            return;
        }
        self.selected = if forward {
            (self.selected + 1) % count
        } else {
            (self.selected + count - 1) % count
        };
        debug!(
            "event=menu_select module=menu status=ok index={} count={}",
            self.selected, count
        );
    }
}

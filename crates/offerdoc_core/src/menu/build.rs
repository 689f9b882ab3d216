//! Menu rows for an armed trigger.
//!
//! # Invariants
//! - Groups keep first-seen `data_source` order; items keep catalog order.
//! - A divider is emitted only in front of a non-empty group.

use crate::catalog::VariableCatalog;
use crate::model::variable::{ValueType, VariableDescriptor};
use crate::trigger::TriggerState;
use serde::Serialize;

/// Selectable menu row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub key: String,
    /// Label localized for the menu language.
    pub label: String,
    pub data_source: String,
    pub value_type: ValueType,
}

impl MenuItem {
    fn from_descriptor(descriptor: &VariableDescriptor, lang: &str) -> Self {
        Self {
            key: descriptor.key.clone(),
            label: descriptor.localized_label(lang).to_string(),
            data_source: descriptor.data_source.clone(),
            value_type: descriptor.value_type,
        }
    }
}

/// Rendered menu row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MenuEntry {
    /// Non-interactive group header.
    Divider { data_source: String },
    Item(MenuItem),
}

/// Why a menu has nothing to select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// No catalog snapshot was available.
    CatalogUnavailable,
    /// The catalog has variables but none match the query.
    NoMatches,
}

/// Grouped, filtered variable list for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Menu {
    pub query: String,
    pub display_items: Vec<MenuEntry>,
    pub selectable_items: Vec<MenuItem>,
    pub empty_state: Option<EmptyState>,
}

impl Menu {
    pub fn is_empty(&self) -> bool {
        self.selectable_items.is_empty()
    }
}

/// Builds the menu for an armed trigger; `None` while idle.
pub fn build_menu(
    trigger: &TriggerState,
    catalog: &dyn VariableCatalog,
    lang: &str,
) -> Option<Menu> {
    trigger
        .query()
        .map(|query| build_menu_for_query(query, catalog, lang))
}

/// Filters `catalog` by `query` and groups matches by data source.
///
/// Matching is a case-insensitive substring test against the localized
/// label or the raw key. Groups appear in first-seen order; items keep
/// catalog order inside their group.
pub fn build_menu_for_query(query: &str, catalog: &dyn VariableCatalog, lang: &str) -> Menu {
    let needle = query.to_lowercase();
    let mut groups: Vec<(String, Vec<MenuItem>)> = Vec::new();

    for descriptor in catalog.list_variables() {
        if !matches_query(descriptor, &needle, lang) {
            continue;
        }
        let item = MenuItem::from_descriptor(descriptor, lang);
        match groups
            .iter_mut()
            .find(|(source, _)| *source == descriptor.data_source)
        {
            Some((_, items)) => items.push(item),
            None => groups.push((descriptor.data_source.clone(), vec![item])),
        }
    }

    let mut display_items = Vec::new();
    let mut selectable_items = Vec::new();
    for (data_source, items) in groups {
        display_items.push(MenuEntry::Divider { data_source });
        for item in items {
            display_items.push(MenuEntry::Item(item.clone()));
            selectable_items.push(item);
        }
    }

    let empty_state = if !catalog.is_available() {
        Some(EmptyState::CatalogUnavailable)
    } else if selectable_items.is_empty() {
        Some(EmptyState::NoMatches)
    } else {
        None
    };

    Menu {
        query: query.to_string(),
        display_items,
        selectable_items,
        empty_state,
    }
}

fn matches_query(descriptor: &VariableDescriptor, needle: &str, lang: &str) -> bool {
    needle.is_empty()
        || descriptor
            .localized_label(lang)
            .to_lowercase()
            .contains(needle)
        || descriptor.key.to_lowercase().contains(needle)
}

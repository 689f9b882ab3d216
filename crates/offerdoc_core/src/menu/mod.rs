//! Autocomplete menu for variable insertion.
//!
//! # Responsibility
//! - Rank and group catalog variables for an armed trigger (`build`).
//! - Drive keyboard/pointer selection over the selectable items
//!   (`controller`).
//! - Place the menu next to the trigger anchor inside the viewport
//!   (`position`).
//!
//! # Invariants
//! - Dividers are display-only; the selection index addresses selectable
//!   items exclusively.
//! - A menu is built from one immutable catalog snapshot; a catalog refresh
//!   means a rebuild, never an in-place patch.

mod build;
mod controller;
mod position;

pub use build::{build_menu, build_menu_for_query, EmptyState, Menu, MenuEntry, MenuItem};
pub use controller::{KeyOutcome, MenuController, MenuKey};
pub use position::{place_menu, PlacementConfig, Viewport, ViewportClamp};

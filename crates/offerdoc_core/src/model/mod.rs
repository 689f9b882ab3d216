//! Domain model for template content.
//!
//! # Responsibility
//! - Define the document tree, persisted content shape and variable
//!   descriptors shared by the codec, catalog, trigger and menu modules.
//!
//! # Invariants
//! - Node kinds are closed enums; every consumer matches exhaustively.
//! - Model types carry no editing behavior beyond inspection.

pub mod content;
pub mod document;
pub mod geometry;
pub mod template;
pub mod variable;

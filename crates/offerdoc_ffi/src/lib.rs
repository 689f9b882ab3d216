//! Flutter-facing bindings for the template content engine.

pub mod api;

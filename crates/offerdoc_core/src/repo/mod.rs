//! Persistence contracts for the template store.
//!
//! # Responsibility
//! - Define use-case oriented data access traits.
//! - Keep SQLite query details out of the service layer.
//!
//! # Invariants
//! - Repository APIs report missing records as `NotFound`, separate from
//!   transport errors.

pub mod template_repo;

//! Local SQLite store for templates and their language variants.
//!
//! # Responsibility
//! - Hand out migrated connections to the repository and search layers.
//! - Report store failures by cause: open, migration, schema or lock.
//!
//! # Invariants
//! - No template data is read or written before migrations succeed.
//! - A database written by a newer build is refused, not downgraded.
//!
//! # See also
//! - docs/architecture/template-store.md

mod error;
pub mod migrations;
mod open;

pub use error::{DbError, DbResult};
pub use open::{open_db, open_db_in_memory};

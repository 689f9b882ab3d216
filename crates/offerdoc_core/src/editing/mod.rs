//! Document mutation and per-session edit handling.
//!
//! # Responsibility
//! - Splice variable tokens into the editor offset space (`insertion`).
//! - Thread one authoritative trigger state through edit events
//!   (`session`).
//!
//! # Invariants
//! - Trigger state is recomputed from scratch on every edit; nothing is
//!   patched incrementally.
//! - Committing a variable always returns the session to `Idle`.

mod insertion;
mod session;

pub use insertion::apply_insertion;
pub use session::EditSession;

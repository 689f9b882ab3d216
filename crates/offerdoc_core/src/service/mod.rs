//! Use-case services over the template store.
//!
//! # Responsibility
//! - Combine repository calls with the codec and catalog so FFI and CLI
//!   callers never touch storage details.

pub mod template_service;

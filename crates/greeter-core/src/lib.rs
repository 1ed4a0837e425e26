//! greeter core: transport-agnostic greeting rendering and the shared error
//! surface.
//!
//! Nothing here knows about HTTP. The gateway crate calls into these
//! functions from its handlers and reuses the error type for startup paths.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod greeting;

/// Shared result type.
pub use error::{GreeterError, Result};

//! Domain layer for PREP.
//!
//! Holds the interview session model and its lifecycle rules, the traits of
//! the external collaborators (research, question planning, feedback scoring)
//! and the session repository interface. Nothing in this crate performs I/O.

pub mod config;
pub mod error;
pub mod feedback;
pub mod question;
pub mod repository;
pub mod research;
pub mod session;

// Re-export common error type
pub use error::{PrepError, Result};

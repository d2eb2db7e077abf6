//! Session domain module.
//!
//! This module contains the session domain model, its lifecycle rules and the
//! repository interface used to persist it.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`, `SessionStatus`, `Answer`)
//! - `lifecycle`: Guarded state transitions on `Session`
//! - `repository`: Repository trait for session persistence

mod lifecycle;
mod model;
mod repository;

// Re-export public API
pub use lifecycle::AnswerOutcome;
pub use model::{
    Answer, FailureRecord, FailureStage, Session, SessionStatus, now_timestamp,
};
pub use repository::{SessionRepository, sort_by_creation};

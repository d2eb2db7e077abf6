//! Session application services.
//!
//! - [`InterviewSession`]: one session's state machine with its collaborators
//! - [`InterviewService`]: id-scoped entry point that serializes access per session
//! - [`SessionCache`]: in-memory handles to loaded sessions

mod cache;
mod interview;
mod service;

#[cfg(test)]
mod test_support;

pub use cache::{SessionCache, SessionHandle};
pub use interview::{Collaborators, InterviewSession, StageTimeouts};
pub use service::InterviewService;

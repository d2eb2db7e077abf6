//! Company/role research domain module.

mod collector;
mod model;

pub use collector::ResearchCollector;
pub use model::{ResearchArtifact, ResearchRequest};

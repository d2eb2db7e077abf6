//! Question domain module.
//!
//! - `model`: `Question`, `QuestionCategory`, `Difficulty`
//! - `plan`: planning parameters (`PlanRequest`, `CategoryMix`)
//! - `planner`: the `QuestionPlanner` collaborator trait

mod model;
mod plan;
mod planner;

pub use model::{Difficulty, Question, QuestionCategory};
pub use plan::{CategoryMix, DEFAULT_QUESTION_COUNT, MAX_QUESTION_COUNT, PlanRequest};
pub use planner::QuestionPlanner;

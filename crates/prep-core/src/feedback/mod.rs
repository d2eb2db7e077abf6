//! Interview feedback domain module.

mod model;
mod scorer;

pub use model::{
    DimensionScores, FeedbackReport, MAX_SCORE, PerformanceLevel, QuestionFeedback,
};
pub use scorer::FeedbackScorer;

//! Built-in collaborators for the interview session.
//!
//! These implementations are deterministic and work offline. Model-backed
//! collaborators plug into the same traits from `prep_core`.

pub mod catalog_research;
pub mod rubric_scorer;
pub mod template_planner;

pub use catalog_research::{CatalogResearchCollector, CompanyProfile};
pub use rubric_scorer::RubricFeedbackScorer;
pub use template_planner::{QuestionTemplates, TemplateQuestionPlanner};

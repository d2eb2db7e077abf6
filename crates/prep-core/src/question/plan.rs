//! Question planning parameters.

use super::model::QuestionCategory;
use crate::error::{PrepError, Result};
use serde::{Deserialize, Serialize};

/// Default number of questions when the caller does not specify one.
pub const DEFAULT_QUESTION_COUNT: u32 = 5;

/// Largest number of questions a single plan may ask for.
pub const MAX_QUESTION_COUNT: u32 = 50;

/// Relative weights of each question category in a plan.
///
/// Weights are proportions, not counts: `{technical: 2, behavioral: 1,
/// company_specific: 1}` asks for half technical questions.
///
/// Missing fields take their value from [`CategoryMix::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryMix {
    pub technical: u32,
    pub behavioral: u32,
    pub company_specific: u32,
}

impl Default for CategoryMix {
    fn default() -> Self {
        Self {
            technical: 2,
            behavioral: 2,
            company_specific: 1,
        }
    }
}

impl CategoryMix {
    pub fn new(technical: u32, behavioral: u32, company_specific: u32) -> Self {
        Self {
            technical,
            behavioral,
            company_specific,
        }
    }

    /// Weight assigned to `category`.
    pub fn weight(&self, category: QuestionCategory) -> u32 {
        match category {
            QuestionCategory::Technical => self.technical,
            QuestionCategory::Behavioral => self.behavioral,
            QuestionCategory::CompanySpecific => self.company_specific,
        }
    }

    pub fn total_weight(&self) -> u64 {
        QuestionCategory::ALL
            .iter()
            .map(|c| u64::from(self.weight(*c)))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_weight() == 0
    }

    /// Splits `count` question slots across the categories with non-zero weight.
    ///
    /// Uses the largest-remainder method; ties go to the category listed first
    /// in [`QuestionCategory::ALL`]. The returned counts always sum to `count`
    /// (or the result is empty when every weight is zero). Categories that
    /// receive no slots are omitted.
    pub fn allocate(&self, count: u32) -> Vec<(QuestionCategory, u32)> {
        let total = self.total_weight();
        if total == 0 || count == 0 {
            return Vec::new();
        }

        let mut shares: Vec<(usize, QuestionCategory, u32, u64)> = QuestionCategory::ALL
            .iter()
            .enumerate()
            .filter(|(_, c)| self.weight(**c) > 0)
            .map(|(idx, c)| {
                let numerator = u64::from(count) * u64::from(self.weight(*c));
                (idx, *c, (numerator / total) as u32, numerator % total)
            })
            .collect();

        let assigned: u32 = shares.iter().map(|s| s.2).sum();
        let mut leftover = count - assigned;

        let mut by_remainder: Vec<usize> = (0..shares.len()).collect();
        by_remainder.sort_by(|a, b| {
            shares[*b]
                .3
                .cmp(&shares[*a].3)
                .then(shares[*a].0.cmp(&shares[*b].0))
        });
        for i in by_remainder {
            if leftover == 0 {
                break;
            }
            shares[i].2 += 1;
            leftover -= 1;
        }

        shares
            .into_iter()
            .filter(|s| s.2 > 0)
            .map(|(_, c, n, _)| (c, n))
            .collect()
    }
}

/// What a session asks of its question planner.
///
/// Captured when the session is created so that a resumed session plans with
/// the same parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Upper bound on the number of questions (at least 1)
    pub desired_count: u32,
    pub category_mix: CategoryMix,
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            desired_count: DEFAULT_QUESTION_COUNT,
            category_mix: CategoryMix::default(),
        }
    }
}

impl PlanRequest {
    pub fn new(desired_count: u32, category_mix: CategoryMix) -> Self {
        Self {
            desired_count,
            category_mix,
        }
    }

    /// Rejects requests that can never yield a plan.
    pub fn validate(&self) -> Result<()> {
        if self.desired_count == 0 {
            return Err(PrepError::invalid_input(
                "desired question count must be at least 1",
            ));
        }
        if self.desired_count > MAX_QUESTION_COUNT {
            return Err(PrepError::invalid_input(format!(
                "desired question count {} exceeds the maximum of {}",
                self.desired_count, MAX_QUESTION_COUNT
            )));
        }
        if self.category_mix.is_empty() {
            return Err(PrepError::invalid_input(
                "category mix must give at least one category a non-zero weight",
            ));
        }
        Ok(())
    }
}

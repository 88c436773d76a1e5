//! Composite stop criteria (AND/OR).

use locus_core::Result;

use super::{SearchProgress, StopCriterion};
use crate::algorithm::SearchDescriptor;

/// Combines stop criteria with OR logic: stops when any child triggers.
#[derive(Debug)]
pub struct AnyCriterion {
    criteria: Vec<Box<dyn StopCriterion>>,
}

impl AnyCriterion {
    pub fn new(criteria: Vec<Box<dyn StopCriterion>>) -> Self {
        Self { criteria }
    }
}

impl StopCriterion for AnyCriterion {
    fn should_stop(&self, progress: &SearchProgress) -> bool {
        self.criteria.iter().any(|c| c.should_stop(progress))
    }

    fn check_attachment(&self, descriptor: &SearchDescriptor) -> Result<()> {
        for criterion in &self.criteria {
            criterion.check_attachment(descriptor)?;
        }
        Ok(())
    }
}

/// Combines stop criteria with AND logic: stops only when every child
/// triggers. An empty composite never stops the search.
#[derive(Debug)]
pub struct AllCriteria {
    criteria: Vec<Box<dyn StopCriterion>>,
}

impl AllCriteria {
    pub fn new(criteria: Vec<Box<dyn StopCriterion>>) -> Self {
        Self { criteria }
    }
}

impl StopCriterion for AllCriteria {
    fn should_stop(&self, progress: &SearchProgress) -> bool {
        !self.criteria.is_empty() && self.criteria.iter().all(|c| c.should_stop(progress))
    }

    fn check_attachment(&self, descriptor: &SearchDescriptor) -> Result<()> {
        for criterion in &self.criteria {
            criterion.check_attachment(descriptor)?;
        }
        Ok(())
    }
}

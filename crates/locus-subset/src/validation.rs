//! Subset validation carrier.

use std::any::Any;

use locus_core::Validation;

/// Validation of a subset solution: a size-window flag combined with the
/// validation of the problem's inner constraints.
#[derive(Debug)]
pub struct SubsetValidation {
    valid_size: bool,
    inner: Option<Box<dyn Validation>>,
}

impl SubsetValidation {
    pub fn new(valid_size: bool, inner: Option<Box<dyn Validation>>) -> Self {
        Self { valid_size, inner }
    }

    /// Returns true if the selection size lies within the problem's window.
    pub fn valid_size(&self) -> bool {
        self.valid_size
    }

    /// Returns the inner constraint validation, if any.
    pub fn inner(&self) -> Option<&dyn Validation> {
        self.inner.as_deref()
    }

    /// Returns whether the inner constraints passed, ignoring the size check.
    pub fn passed_ignoring_size(&self) -> bool {
        self.inner.as_ref().map_or(true, |inner| inner.passed())
    }
}

impl Validation for SubsetValidation {
    fn passed(&self) -> bool {
        self.valid_size && self.passed_ignoring_size()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locus_core::SimpleValidation;

    #[test]
    fn passed_requires_both_checks() {
        let ok = SubsetValidation::new(true, Some(Box::new(SimpleValidation::PASSED)));
        assert!(ok.passed());

        let bad_size = SubsetValidation::new(false, Some(Box::new(SimpleValidation::PASSED)));
        assert!(!bad_size.passed());
        assert!(bad_size.passed_ignoring_size());

        let bad_inner = SubsetValidation::new(true, Some(Box::new(SimpleValidation::FAILED)));
        assert!(!bad_inner.passed());
        assert!(!bad_inner.passed_ignoring_size());
    }

    #[test]
    fn missing_inner_validation_counts_as_passing() {
        let validation = SubsetValidation::new(true, None);
        assert!(validation.passed());
    }
}

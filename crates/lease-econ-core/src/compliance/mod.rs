pub mod inverse;
pub mod thresholds;
pub mod validation;
pub mod verdict;

pub use inverse::{solve_thresholds, Threshold, ThresholdReport};
pub use thresholds::BusinessThresholds;
pub use validation::{validate, ValidationMessage, ValidationReport};
pub use verdict::{
    evaluate_compliance, ComplianceReport, Indicator, IndicatorCheck, Issue, IssueKind,
};

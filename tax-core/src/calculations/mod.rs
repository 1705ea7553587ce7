//! Tax calculation modules.
//!
//! The bracket calculator and the deduction aggregator are independent pure
//! computations; the estimator chains them for a single taxpayer.

pub mod bracket_tax;
pub mod common;
pub mod deductions;
pub mod estimate;

pub use bracket_tax::{BracketResult, BracketTaxCalculator, BracketTaxResult};
pub use deductions::{DeductionAggregator, DeductionResult};
pub use estimate::{TaxEstimate, TaxEstimator, effective_rate};

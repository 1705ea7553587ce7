//! End-to-end tax estimate for one taxpayer.
//!
//! Runs the [`DeductionAggregator`] and feeds its net taxable income to the
//! [`BracketTaxCalculator`], then derives the headline figures a report
//! shows: effective rate and income left after tax.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::TaxEstimator;
//! use tax_core::{DeductionInputs, IncomeInputs, TaxYearConfig};
//!
//! let config = TaxYearConfig::thai_2025();
//! let estimator = TaxEstimator::new(&config);
//!
//! let income = IncomeInputs {
//!     monthly_salary: dec!(50000),
//!     ..Default::default()
//! };
//! let deductions = DeductionInputs {
//!     social_security_paid: dec!(9000),
//!     ..Default::default()
//! };
//!
//! let estimate = estimator.estimate(&income, &deductions);
//!
//! // 600,000 - 100,000 expenses - 69,000 allowances
//! assert_eq!(estimate.net_taxable_income, dec!(431000));
//! assert_eq!(estimate.tax_payable, dec!(20600));
//! assert_eq!(estimate.effective_rate, dec!(3.43));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculations::bracket_tax::{BracketResult, BracketTaxCalculator};
use crate::calculations::common::round_half_up;
use crate::calculations::deductions::{DeductionAggregator, DeductionResult};
use crate::{DeductionInputs, IncomeInputs, TaxYearConfig};

/// Complete result of one estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxEstimate {
    pub tax_year: i32,
    pub total_income: Decimal,
    pub deductions: DeductionResult,
    pub net_taxable_income: Decimal,
    pub tax_payable: Decimal,
    pub breakdown: Vec<BracketResult>,
    /// Tax as a percentage of total income, two decimal places.
    pub effective_rate: Decimal,
    pub net_income_after_tax: Decimal,
}

impl TaxEstimate {
    pub fn has_tax_liability(&self) -> bool {
        self.tax_payable > Decimal::ZERO
    }
}

/// Computes tax as a percentage of total income, rounded half-up to two
/// places. Zero income yields a zero rate.
pub fn effective_rate(
    tax_payable: Decimal,
    total_income: Decimal,
) -> Decimal {
    if total_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_half_up(tax_payable / total_income * Decimal::from(100))
}

/// Estimates tax under a single tax year's rules.
#[derive(Debug, Clone)]
pub struct TaxEstimator<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> TaxEstimator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TaxYearConfig {
        self.config
    }

    pub fn estimate(
        &self,
        income: &IncomeInputs,
        deductions: &DeductionInputs,
    ) -> TaxEstimate {
        let deductions = DeductionAggregator::new(&self.config.deductions)
            .compute_deductions(income, deductions);
        let tax = BracketTaxCalculator::new(&self.config.brackets)
            .compute_tax(deductions.net_taxable_income);

        let total_income = deductions.total_income;
        let estimate = TaxEstimate {
            tax_year: self.config.tax_year,
            total_income,
            net_taxable_income: deductions.net_taxable_income,
            tax_payable: tax.tax_payable,
            effective_rate: effective_rate(tax.tax_payable, total_income),
            net_income_after_tax: total_income - tax.tax_payable,
            breakdown: tax.breakdown,
            deductions,
        };

        info!(
            tax_year = estimate.tax_year,
            total_income = %estimate.total_income,
            net_taxable_income = %estimate.net_taxable_income,
            tax_payable = %estimate.tax_payable,
            "estimate complete"
        );

        estimate
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::MaritalStatus;

    fn estimate(
        income: IncomeInputs,
        deductions: DeductionInputs,
    ) -> TaxEstimate {
        let config = TaxYearConfig::thai_2025();
        TaxEstimator::new(&config).estimate(&income, &deductions)
    }

    // =========================================================================
    // effective_rate tests
    // =========================================================================

    #[test]
    fn effective_rate_is_zero_without_income() {
        assert_eq!(effective_rate(dec!(0), dec!(0)), dec!(0));
    }

    #[test]
    fn effective_rate_rounds_to_two_places() {
        assert_eq!(effective_rate(dec!(20600), dec!(600000)), dec!(3.43));
    }

    #[test]
    fn effective_rate_rounds_repeating_share_half_up() {
        assert_eq!(effective_rate(dec!(1), dec!(3)), dec!(33.33));
        assert_eq!(effective_rate(dec!(2), dec!(3)), dec!(66.67));
        assert_eq!(effective_rate(dec!(1), dec!(8)), dec!(12.50));
    }

    // =========================================================================
    // estimate tests
    // =========================================================================

    #[test]
    fn estimate_for_zero_inputs_has_no_liability() {
        let result = estimate(IncomeInputs::default(), DeductionInputs::default());

        assert_eq!(result.total_income, dec!(0));
        assert_eq!(result.net_taxable_income, dec!(0));
        assert_eq!(result.tax_payable, dec!(0));
        assert_eq!(result.effective_rate, dec!(0));
        assert!(result.breakdown.is_empty());
        assert!(!result.has_tax_liability());
    }

    #[test]
    fn estimate_for_modest_salary_stays_in_zero_band() {
        let income = IncomeInputs {
            monthly_salary: dec!(25000),
            ..Default::default()
        };
        let deductions = DeductionInputs {
            social_security_paid: dec!(9000),
            ..Default::default()
        };

        let result = estimate(income, deductions);

        // 300,000 - 100,000 - 69,000
        assert_eq!(result.net_taxable_income, dec!(131000));
        assert_eq!(result.tax_payable, dec!(0));
        assert!(!result.has_tax_liability());
        assert_eq!(result.net_income_after_tax, dec!(300000));
    }

    #[test]
    fn estimate_for_high_earner_with_family() {
        let income = IncomeInputs {
            monthly_salary: dec!(200000),
            annual_bonus: dec!(400000),
            other_income: dec!(100000),
            foreign_income_remitted: dec!(0),
        };
        let deductions = DeductionInputs {
            marital_status: MaritalStatus::MarriedJoint,
            children: 2,
            qualifying_parents: 2,
            social_security_paid: dec!(9000),
            life_insurance_premium: dec!(100000),
            health_insurance_premium: dec!(25000),
            provident_fund: dec!(200000),
            rmf_investment: dec!(200000),
            ssf_investment: dec!(200000),
            ..Default::default()
        };

        let result = estimate(income, deductions);

        // 2,400,000 + 400,000 + 100,000
        assert_eq!(result.total_income, dec!(2900000));
        // 60k + 60k + 60k + 60k + 9k + 100k + 500k
        assert_eq!(result.deductions.total_deductions, dec!(849000));
        assert_eq!(result.net_taxable_income, dec!(1951000));
        // 7,500 + 20,000 + 37,500 + 50,000 + 951,000 x 25%
        assert_eq!(result.tax_payable, dec!(352750));
        assert_eq!(result.breakdown.len(), 6);
        assert_eq!(result.effective_rate, dec!(12.16));
        assert_eq!(result.net_income_after_tax, dec!(2547250));
    }

    #[test]
    fn estimate_uses_configured_year_and_rules() {
        let mut config = TaxYearConfig::thai_2025();
        config.tax_year = 2026;
        config.deductions.personal_allowance = dec!(0);
        let income = IncomeInputs {
            monthly_salary: dec!(25000),
            ..Default::default()
        };

        let result = TaxEstimator::new(&config).estimate(&income, &DeductionInputs::default());

        assert_eq!(result.tax_year, 2026);
        assert_eq!(result.net_taxable_income, dec!(200000));
        assert_eq!(result.tax_payable, dec!(2500));
    }
}

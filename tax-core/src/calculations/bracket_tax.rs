//! Progressive bracket tax calculation.
//!
//! Walks a [`TaxBracketTable`] in ascending order, filling each bracket up to
//! its capacity before moving to the next:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | `capacity = upper_limit - previous_limit` (unbounded for the top bracket) |
//! | 2    | `amount_taxed = min(remaining, capacity)` |
//! | 3    | `tax += amount_taxed × rate` |
//! | 4    | Record the bracket if `amount_taxed > 0` |
//! | 5    | `remaining -= amount_taxed`; stop once nothing remains |
//!
//! Amounts are exact decimals, so the recorded `amount_taxed` values always
//! sum to the taxable income.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::TaxBracketTable;
//! use tax_core::calculations::BracketTaxCalculator;
//!
//! let table = TaxBracketTable::thai_2025();
//! let calculator = BracketTaxCalculator::new(&table);
//!
//! let result = calculator.compute_tax(dec!(500000));
//!
//! assert_eq!(result.tax_payable, dec!(27500));
//! assert_eq!(result.breakdown.len(), 3);
//! assert_eq!(result.breakdown[2].tax_for_bracket, dec!(20000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::TaxBracketTable;
use crate::calculations::common::min;

/// Tax owed within a single bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketResult {
    pub lower_limit: Decimal,
    /// `None` for the top bracket.
    pub upper_limit: Option<Decimal>,
    pub rate: Decimal,
    /// Portion of taxable income falling in this bracket; always positive.
    pub amount_taxed: Decimal,
    /// `amount_taxed × rate`.
    pub tax_for_bracket: Decimal,
}

/// Result of running taxable income through the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTaxResult {
    pub taxable_income: Decimal,
    pub tax_payable: Decimal,
    /// Brackets that received income, in ascending order.
    pub breakdown: Vec<BracketResult>,
}

impl BracketTaxResult {
    /// Breakdown rows that actually carry a positive rate.
    ///
    /// Empty whenever the income stays inside the zero-rate band.
    pub fn taxed_brackets(&self) -> impl Iterator<Item = &BracketResult> {
        self.breakdown
            .iter()
            .filter(|row| row.rate > Decimal::ZERO)
    }

    /// Rate applied to the last baht of income, zero for zero income.
    pub fn marginal_rate(&self) -> Decimal {
        self.breakdown
            .last()
            .map_or(Decimal::ZERO, |row| row.rate)
    }
}

/// Calculator for progressive bracket tax.
///
/// Borrows the schedule, so one table can serve any number of calculations.
#[derive(Debug, Clone)]
pub struct BracketTaxCalculator<'a> {
    table: &'a TaxBracketTable,
}

impl<'a> BracketTaxCalculator<'a> {
    pub fn new(table: &'a TaxBracketTable) -> Self {
        Self { table }
    }

    /// Computes tax payable and the per-bracket breakdown.
    ///
    /// `taxable_income` must be non-negative; callers floor net income at
    /// zero first. A negative argument is logged and treated as zero.
    pub fn compute_tax(
        &self,
        taxable_income: Decimal,
    ) -> BracketTaxResult {
        let taxable_income = if taxable_income < Decimal::ZERO {
            warn!(
                taxable_income = %taxable_income,
                "negative taxable income passed to bracket calculator; using zero"
            );
            Decimal::ZERO
        } else {
            taxable_income
        };

        let mut remaining = taxable_income;
        let mut previous_limit = Decimal::ZERO;
        let mut tax_payable = Decimal::ZERO;
        let mut breakdown = Vec::new();

        for bracket in self.table.brackets() {
            if remaining <= Decimal::ZERO {
                break;
            }

            let amount_taxed = match bracket.upper_limit {
                Some(upper) => min(remaining, upper - previous_limit),
                None => remaining,
            };
            let tax_for_bracket = amount_taxed * bracket.rate;
            tax_payable += tax_for_bracket;

            if amount_taxed > Decimal::ZERO {
                breakdown.push(BracketResult {
                    lower_limit: previous_limit,
                    upper_limit: bracket.upper_limit,
                    rate: bracket.rate,
                    amount_taxed,
                    tax_for_bracket,
                });
            }

            remaining -= amount_taxed;
            if let Some(upper) = bracket.upper_limit {
                previous_limit = upper;
            }
        }

        debug!(
            taxable_income = %taxable_income,
            tax_payable = %tax_payable,
            brackets = breakdown.len(),
            "computed bracket tax"
        );

        BracketTaxResult {
            taxable_income,
            tax_payable,
            breakdown,
        }
    }
}

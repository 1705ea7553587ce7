//! Input boundary.
//!
//! A [`TaxRequest`] is the untrusted shape of an estimate request, as it
//! arrives from CLI flags, a CSV row or a JSON document. Validation turns it
//! into [`IncomeInputs`] and [`DeductionInputs`] or reports the first field
//! that cannot be accepted. The calculators never see a raw request.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{InputLimits, InvalidInputError, MaritalStatus, TaxRequest};
//!
//! let request = TaxRequest {
//!     monthly_salary: dec!(50000),
//!     marital_status: Some("married_joint".to_string()),
//!     children: dec!(2),
//!     ..Default::default()
//! };
//!
//! let validated = request.validate(&InputLimits::thai_2025()).unwrap();
//! assert_eq!(validated.deductions.marital_status, MaritalStatus::MarriedJoint);
//! assert_eq!(validated.deductions.children, 2);
//!
//! let bad = TaxRequest {
//!     children: dec!(1.5),
//!     ..Default::default()
//! };
//! assert!(matches!(
//!     bad.validate(&InputLimits::thai_2025()),
//!     Err(InvalidInputError::NonIntegerCount { field: "children", .. })
//! ));
//! ```

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DeductionInputs, IncomeInputs, InputLimits, MaritalStatus};

/// Reasons a request is rejected at the input boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidInputError {
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: Decimal },

    #[error("{field} must be a whole number, got {value}")]
    NonIntegerCount { field: &'static str, value: Decimal },

    #[error("{field} must be at most {max}, got {value}")]
    AboveLimit {
        field: &'static str,
        value: Decimal,
        max: Decimal,
    },

    #[error("unrecognised marital status '{0}' (expected single, married_joint or married_separate)")]
    UnknownMaritalStatus(String),
}

/// Raw estimate request. Every field is optional on the wire; missing
/// amounts and counts are zero and a missing marital status is single.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxRequest {
    pub monthly_salary: Decimal,
    pub annual_bonus: Decimal,
    pub other_income: Decimal,
    pub foreign_income_remitted: Decimal,
    pub marital_status: Option<String>,
    pub children: Decimal,
    pub qualifying_parents: Decimal,
    pub social_security_paid: Decimal,
    pub life_insurance_premium: Decimal,
    pub health_insurance_premium: Decimal,
    pub provident_fund: Decimal,
    pub rmf_investment: Decimal,
    pub ssf_investment: Decimal,
    pub thai_esg_fund: Decimal,
    pub easy_e_receipt_spend: Decimal,
    pub travel_stimulus_spend: Decimal,
    pub mortgage_interest: Decimal,
}

/// Inputs that passed the boundary and may be handed to the calculators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedRequest {
    pub income: IncomeInputs,
    pub deductions: DeductionInputs,
}

impl TaxRequest {
    /// Validates every field against `limits`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError`] for the first field that is negative,
    /// a fractional count, above its limit, or an unknown marital status.
    /// Amounts without a limit of their own are held to
    /// [`InputLimits::max_amount`] so the sums stay within `Decimal` range.
    pub fn validate(
        &self,
        limits: &InputLimits,
    ) -> Result<ValidatedRequest, InvalidInputError> {
        let ceiling = limits.max_amount;
        let income = IncomeInputs {
            monthly_salary: amount("monthly_salary", self.monthly_salary, ceiling)?,
            annual_bonus: amount("annual_bonus", self.annual_bonus, ceiling)?,
            other_income: amount("other_income", self.other_income, ceiling)?,
            foreign_income_remitted: amount(
                "foreign_income_remitted",
                self.foreign_income_remitted,
                ceiling,
            )?,
        };

        let marital_status = match self.marital_status.as_deref() {
            None => MaritalStatus::Single,
            Some(raw) if raw.trim().is_empty() => MaritalStatus::Single,
            Some(raw) => MaritalStatus::parse(raw)
                .ok_or_else(|| InvalidInputError::UnknownMaritalStatus(raw.to_string()))?,
        };

        let deductions = DeductionInputs {
            marital_status,
            children: count("children", self.children, None)?,
            qualifying_parents: count(
                "qualifying_parents",
                self.qualifying_parents,
                Some(limits.max_qualifying_parents),
            )?,
            social_security_paid: amount(
                "social_security_paid",
                self.social_security_paid,
                limits.social_security_max,
            )?,
            life_insurance_premium: amount(
                "life_insurance_premium",
                self.life_insurance_premium,
                ceiling,
            )?,
            health_insurance_premium: amount(
                "health_insurance_premium",
                self.health_insurance_premium,
                ceiling,
            )?,
            provident_fund: amount("provident_fund", self.provident_fund, ceiling)?,
            rmf_investment: amount("rmf_investment", self.rmf_investment, ceiling)?,
            ssf_investment: amount("ssf_investment", self.ssf_investment, ceiling)?,
            thai_esg_fund: amount("thai_esg_fund", self.thai_esg_fund, ceiling)?,
            easy_e_receipt_spend: amount(
                "easy_e_receipt_spend",
                self.easy_e_receipt_spend,
                limits.easy_e_receipt_max,
            )?,
            travel_stimulus_spend: amount(
                "travel_stimulus_spend",
                self.travel_stimulus_spend,
                limits.travel_stimulus_max,
            )?,
            mortgage_interest: amount(
                "mortgage_interest",
                self.mortgage_interest,
                limits.mortgage_interest_max,
            )?,
        };

        Ok(ValidatedRequest { income, deductions })
    }
}

fn amount(
    field: &'static str,
    value: Decimal,
    max: Decimal,
) -> Result<Decimal, InvalidInputError> {
    if value < Decimal::ZERO {
        return Err(InvalidInputError::Negative { field, value });
    }
    if value > max {
        return Err(InvalidInputError::AboveLimit { field, value, max });
    }
    Ok(value)
}

fn count(
    field: &'static str,
    value: Decimal,
    max: Option<u32>,
) -> Result<u32, InvalidInputError> {
    let max = Decimal::from(max.unwrap_or(u32::MAX));
    let value = amount(field, value, max)?;
    if !value.fract().is_zero() {
        return Err(InvalidInputError::NonIntegerCount { field, value });
    }

    value
        .to_u32()
        .ok_or(InvalidInputError::AboveLimit { field, value, max })
}

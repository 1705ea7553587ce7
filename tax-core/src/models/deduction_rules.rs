use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a deduction rule set contains out-of-range values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeductionRulesError {
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("{field} must be between 0 and 1, got {value}")]
    InvalidShare { field: &'static str, value: Decimal },

    #[error("{field} must be at most {max}, got {value}")]
    AboveCeiling {
        field: &'static str,
        value: Decimal,
        max: Decimal,
    },
}

/// Largest configurable `max_amount`. Thirteen inputs at this size, summed
/// and annualised, stay far inside `Decimal` range.
fn amount_ceiling() -> Decimal {
    Decimal::from(1_000_000_000_000_000_i64)
}

/// Per-item ceilings enforced where raw input enters the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLimits {
    pub social_security_max: Decimal,
    pub easy_e_receipt_max: Decimal,
    pub travel_stimulus_max: Decimal,
    pub mortgage_interest_max: Decimal,
    pub max_qualifying_parents: u32,
    /// Ceiling for any single amount without a limit of its own.
    pub max_amount: Decimal,
}

impl InputLimits {
    pub fn thai_2025() -> Self {
        Self {
            social_security_max: Decimal::from(9_000),
            easy_e_receipt_max: Decimal::from(50_000),
            travel_stimulus_max: Decimal::from(20_000),
            mortgage_interest_max: Decimal::from(100_000),
            max_qualifying_parents: 4,
            max_amount: amount_ceiling(),
        }
    }
}

impl Default for InputLimits {
    fn default() -> Self {
        Self::thai_2025()
    }
}

/// Optional per-fund ceilings applied before the retirement group cap.
///
/// Each fund may be limited by a share of income, an absolute amount, or
/// both (the smaller wins). `None` leaves that dimension unlimited. The
/// provident fund share applies to employment income; RMF and SSF shares
/// apply to total income.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetirementSubCaps {
    pub provident_fund_income_share: Option<Decimal>,
    pub provident_fund_max: Option<Decimal>,
    pub rmf_income_share: Option<Decimal>,
    pub rmf_max: Option<Decimal>,
    pub ssf_income_share: Option<Decimal>,
    pub ssf_max: Option<Decimal>,
}

impl RetirementSubCaps {
    /// No per-fund limits; only the group cap applies.
    pub fn none() -> Self {
        Self::default()
    }

    /// Revenue Department ceilings: PVD 15% of wages, RMF 30% of income,
    /// SSF 30% of income up to 200,000, each fund at most 500,000.
    pub fn statutory() -> Self {
        Self {
            provident_fund_income_share: Some(Decimal::new(15, 2)),
            provident_fund_max: Some(Decimal::from(500_000)),
            rmf_income_share: Some(Decimal::new(30, 2)),
            rmf_max: Some(Decimal::from(500_000)),
            ssf_income_share: Some(Decimal::new(30, 2)),
            ssf_max: Some(Decimal::from(200_000)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        *self != Self::none()
    }
}

/// Caps, rates and per-head amounts used by the deduction aggregator.
///
/// Missing keys in a deserialized rule set fall back to the 2025 values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeductionRules {
    /// Share of total income deductible as standard expenses.
    pub standard_expense_rate: Decimal,
    pub standard_expense_max: Decimal,
    pub personal_allowance: Decimal,
    pub spouse_allowance: Decimal,
    /// Per child.
    pub child_allowance: Decimal,
    /// Per qualifying parent.
    pub parent_allowance: Decimal,
    pub health_insurance_max: Decimal,
    /// Ceiling on life insurance plus the deductible health premium.
    pub insurance_group_max: Decimal,
    /// Ceiling on PVD + RMF + SSF combined.
    pub retirement_group_max: Decimal,
    pub retirement_sub_caps: RetirementSubCaps,
    pub thai_esg_income_share: Option<Decimal>,
    pub thai_esg_max: Option<Decimal>,
    pub input_limits: InputLimits,
}

impl DeductionRules {
    pub fn thai_2025() -> Self {
        Self {
            standard_expense_rate: Decimal::new(50, 2),
            standard_expense_max: Decimal::from(100_000),
            personal_allowance: Decimal::from(60_000),
            spouse_allowance: Decimal::from(60_000),
            child_allowance: Decimal::from(30_000),
            parent_allowance: Decimal::from(30_000),
            health_insurance_max: Decimal::from(25_000),
            insurance_group_max: Decimal::from(100_000),
            retirement_group_max: Decimal::from(500_000),
            retirement_sub_caps: RetirementSubCaps::none(),
            thai_esg_income_share: None,
            thai_esg_max: None,
            input_limits: InputLimits::thai_2025(),
        }
    }

    /// Enables the statutory per-fund retirement ceilings and the Thai ESG
    /// ceiling (30% of income, at most 100,000).
    pub fn with_statutory_sub_caps(mut self) -> Self {
        self.retirement_sub_caps = RetirementSubCaps::statutory();
        self.thai_esg_income_share = Some(Decimal::new(30, 2));
        self.thai_esg_max = Some(Decimal::from(100_000));
        self
    }

    /// Checks that every amount is non-negative and every share lies in
    /// `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as a [`DeductionRulesError`].
    pub fn validate(&self) -> Result<(), DeductionRulesError> {
        let caps = &self.retirement_sub_caps;
        let limits = &self.input_limits;

        let shares = [
            ("standard_expense_rate", Some(self.standard_expense_rate)),
            (
                "provident_fund_income_share",
                caps.provident_fund_income_share,
            ),
            ("rmf_income_share", caps.rmf_income_share),
            ("ssf_income_share", caps.ssf_income_share),
            ("thai_esg_income_share", self.thai_esg_income_share),
        ];
        for (field, share) in shares {
            if let Some(value) = share {
                if value < Decimal::ZERO || value > Decimal::ONE {
                    return Err(DeductionRulesError::InvalidShare { field, value });
                }
            }
        }

        let amounts = [
            ("standard_expense_max", Some(self.standard_expense_max)),
            ("personal_allowance", Some(self.personal_allowance)),
            ("spouse_allowance", Some(self.spouse_allowance)),
            ("child_allowance", Some(self.child_allowance)),
            ("parent_allowance", Some(self.parent_allowance)),
            ("health_insurance_max", Some(self.health_insurance_max)),
            ("insurance_group_max", Some(self.insurance_group_max)),
            ("retirement_group_max", Some(self.retirement_group_max)),
            ("provident_fund_max", caps.provident_fund_max),
            ("rmf_max", caps.rmf_max),
            ("ssf_max", caps.ssf_max),
            ("thai_esg_max", self.thai_esg_max),
            ("social_security_max", Some(limits.social_security_max)),
            ("easy_e_receipt_max", Some(limits.easy_e_receipt_max)),
            ("travel_stimulus_max", Some(limits.travel_stimulus_max)),
            ("mortgage_interest_max", Some(limits.mortgage_interest_max)),
            ("max_amount", Some(limits.max_amount)),
        ];
        for (field, amount) in amounts {
            if let Some(value) = amount {
                if value < Decimal::ZERO {
                    return Err(DeductionRulesError::NegativeAmount { field, value });
                }
            }
        }

        if limits.max_amount > amount_ceiling() {
            return Err(DeductionRulesError::AboveCeiling {
                field: "max_amount",
                value: limits.max_amount,
                max: amount_ceiling(),
            });
        }

        Ok(())
    }
}

impl Default for DeductionRules {
    fn default() -> Self {
        Self::thai_2025()
    }
}

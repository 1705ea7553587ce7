use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::MaritalStatus;

/// Allowance and deduction figures as supplied by the taxpayer.
///
/// Amounts are annual THB and have passed the input boundary, so they are
/// non-negative and within their per-item limits. The aggregator still
/// clamps them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionInputs {
    pub marital_status: MaritalStatus,
    pub children: u32,
    /// Parents over 60 with low income, at most four.
    pub qualifying_parents: u32,
    pub social_security_paid: Decimal,
    pub life_insurance_premium: Decimal,
    pub health_insurance_premium: Decimal,
    pub provident_fund: Decimal,
    pub rmf_investment: Decimal,
    pub ssf_investment: Decimal,
    pub thai_esg_fund: Decimal,
    pub easy_e_receipt_spend: Decimal,
    /// Spending under the domestic travel stimulus scheme.
    pub travel_stimulus_spend: Decimal,
    pub mortgage_interest: Decimal,
}

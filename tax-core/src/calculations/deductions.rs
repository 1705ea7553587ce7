//! Allowance and deduction aggregation.
//!
//! Converts raw income and deduction figures into capped allowances and the
//! net taxable income that feeds the bracket calculator.
//!
//! # Rules
//!
//! | Item | Rule (2025 defaults) |
//! |------|----------------------|
//! | Standard expenses | min(total income × 50%, 100,000) |
//! | Personal allowance | 60,000 |
//! | Spouse allowance | 60,000 when married filing jointly |
//! | Children | 30,000 per child |
//! | Parents | 30,000 per qualifying parent, at most four |
//! | Social security | as paid, at most 9,000 |
//! | Insurance group | min(life + min(health, 25,000), 100,000) |
//! | Retirement group | min(PVD + RMF + SSF, 500,000), optional per-fund sub-caps |
//! | Thai ESG fund | as invested, optional cap |
//! | Easy E-Receipt | as spent, at most 50,000 |
//! | Travel stimulus | as spent, at most 20,000 |
//! | Mortgage interest | as paid, at most 100,000 |
//!
//! Net taxable income = max(0, total income − standard expenses − total
//! deductions). The standard expense deduction is reported separately and is
//! not part of `total_deductions`.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::DeductionAggregator;
//! use tax_core::{DeductionInputs, DeductionRules, IncomeInputs, MaritalStatus};
//!
//! let rules = DeductionRules::thai_2025();
//! let aggregator = DeductionAggregator::new(&rules);
//!
//! let income = IncomeInputs {
//!     monthly_salary: dec!(50000),
//!     ..Default::default()
//! };
//! let deductions = DeductionInputs {
//!     marital_status: MaritalStatus::MarriedJoint,
//!     social_security_paid: dec!(9000),
//!     ..Default::default()
//! };
//!
//! let result = aggregator.compute_deductions(&income, &deductions);
//!
//! assert_eq!(result.total_income, dec!(600000));
//! assert_eq!(result.standard_expense_deduction, dec!(100000));
//! assert_eq!(result.total_deductions, dec!(129000));
//! assert_eq!(result.net_taxable_income, dec!(371000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{cap, max, min, non_negative};
use crate::{DeductionInputs, DeductionRules, IncomeInputs, MaritalStatus};

/// Capped deduction components for one taxpayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionResult {
    pub total_income: Decimal,
    pub standard_expense_deduction: Decimal,
    pub personal_allowance: Decimal,
    pub spouse_allowance: Decimal,
    pub child_allowance: Decimal,
    pub parent_allowance: Decimal,
    pub social_security: Decimal,
    pub insurance_group_deduction: Decimal,
    pub retirement_group_deduction: Decimal,
    pub thai_esg_fund: Decimal,
    pub easy_e_receipt: Decimal,
    pub travel_stimulus: Decimal,
    pub mortgage_interest: Decimal,
    /// Sum of every allowance and deduction except standard expenses.
    pub total_deductions: Decimal,
    pub net_taxable_income: Decimal,
}

/// Applies a [`DeductionRules`] set to one taxpayer's inputs.
#[derive(Debug, Clone)]
pub struct DeductionAggregator<'a> {
    rules: &'a DeductionRules,
}

impl<'a> DeductionAggregator<'a> {
    pub fn new(rules: &'a DeductionRules) -> Self {
        Self { rules }
    }

    /// Computes every capped deduction and the resulting net taxable income.
    ///
    /// Inputs are expected to have passed the input boundary. Negative
    /// amounts and amounts above their input limits are still clamped here,
    /// with a warning, so every component is non-negative.
    pub fn compute_deductions(
        &self,
        income: &IncomeInputs,
        deductions: &DeductionInputs,
    ) -> DeductionResult {
        let income = self.sanitized_income(income);
        let total_income = income.total_income();
        let limits = &self.rules.input_limits;

        let standard_expense_deduction = self.standard_expense_deduction(total_income);
        let personal_allowance = self.rules.personal_allowance;
        let spouse_allowance = self.spouse_allowance(deductions.marital_status);
        let child_allowance = self.child_allowance(deductions.children);
        let parent_allowance = self.parent_allowance(deductions.qualifying_parents);
        let social_security = self.capped_pass_through(
            "social_security_paid",
            deductions.social_security_paid,
            limits.social_security_max,
        );
        let insurance_group_deduction = self.insurance_group(
            deductions.life_insurance_premium,
            deductions.health_insurance_premium,
        );
        let retirement_group_deduction = self.retirement_group(
            &income,
            total_income,
            deductions.provident_fund,
            deductions.rmf_investment,
            deductions.ssf_investment,
        );
        let thai_esg_fund = self.thai_esg_fund(total_income, deductions.thai_esg_fund);
        let easy_e_receipt = self.capped_pass_through(
            "easy_e_receipt_spend",
            deductions.easy_e_receipt_spend,
            limits.easy_e_receipt_max,
        );
        let travel_stimulus = self.capped_pass_through(
            "travel_stimulus_spend",
            deductions.travel_stimulus_spend,
            limits.travel_stimulus_max,
        );
        let mortgage_interest = self.capped_pass_through(
            "mortgage_interest",
            deductions.mortgage_interest,
            limits.mortgage_interest_max,
        );

        let total_deductions = personal_allowance
            + spouse_allowance
            + child_allowance
            + parent_allowance
            + social_security
            + insurance_group_deduction
            + retirement_group_deduction
            + thai_esg_fund
            + easy_e_receipt
            + travel_stimulus
            + mortgage_interest;

        let net_taxable_income =
            self.net_taxable_income(total_income, standard_expense_deduction, total_deductions);

        debug!(
            total_income = %total_income,
            total_deductions = %total_deductions,
            net_taxable_income = %net_taxable_income,
            "aggregated deductions"
        );

        DeductionResult {
            total_income,
            standard_expense_deduction,
            personal_allowance,
            spouse_allowance,
            child_allowance,
            parent_allowance,
            social_security,
            insurance_group_deduction,
            retirement_group_deduction,
            thai_esg_fund,
            easy_e_receipt,
            travel_stimulus,
            mortgage_interest,
            total_deductions,
            net_taxable_income,
        }
    }

    /// Copies the income figures with negative entries zeroed.
    fn sanitized_income(
        &self,
        income: &IncomeInputs,
    ) -> IncomeInputs {
        IncomeInputs {
            monthly_salary: non_negative("monthly_salary", income.monthly_salary),
            annual_bonus: non_negative("annual_bonus", income.annual_bonus),
            other_income: non_negative("other_income", income.other_income),
            foreign_income_remitted: non_negative(
                "foreign_income_remitted",
                income.foreign_income_remitted,
            ),
        }
    }

    /// Standard expenses: a share of income, up to a ceiling.
    fn standard_expense_deduction(
        &self,
        total_income: Decimal,
    ) -> Decimal {
        min(
            total_income * self.rules.standard_expense_rate,
            self.rules.standard_expense_max,
        )
    }

    fn spouse_allowance(
        &self,
        status: MaritalStatus,
    ) -> Decimal {
        match status {
            MaritalStatus::MarriedJoint => self.rules.spouse_allowance,
            MaritalStatus::Single | MaritalStatus::MarriedSeparate => Decimal::ZERO,
        }
    }

    fn child_allowance(
        &self,
        children: u32,
    ) -> Decimal {
        Decimal::from(children) * self.rules.child_allowance
    }

    fn parent_allowance(
        &self,
        parents: u32,
    ) -> Decimal {
        let max_parents = self.rules.input_limits.max_qualifying_parents;
        let counted = if parents > max_parents {
            warn!(
                parents,
                max_parents, "qualifying parents above limit; capping count"
            );
            max_parents
        } else {
            parents
        };
        Decimal::from(counted) * self.rules.parent_allowance
    }

    /// Health premiums count up to their own ceiling, then life and health
    /// share the group ceiling.
    fn insurance_group(
        &self,
        life_premium: Decimal,
        health_premium: Decimal,
    ) -> Decimal {
        let life = non_negative("life_insurance_premium", life_premium);
        let health = min(
            non_negative("health_insurance_premium", health_premium),
            self.rules.health_insurance_max,
        );
        min(life + health, self.rules.insurance_group_max)
    }

    /// Applies any configured per-fund sub-caps, then the group ceiling.
    fn retirement_group(
        &self,
        income: &IncomeInputs,
        total_income: Decimal,
        provident_fund: Decimal,
        rmf: Decimal,
        ssf: Decimal,
    ) -> Decimal {
        let caps = &self.rules.retirement_sub_caps;
        let employment_income = income.employment_income();

        let provident_fund = self.sub_capped(
            non_negative("provident_fund", provident_fund),
            employment_income,
            caps.provident_fund_income_share,
            caps.provident_fund_max,
        );
        let rmf = self.sub_capped(
            non_negative("rmf_investment", rmf),
            total_income,
            caps.rmf_income_share,
            caps.rmf_max,
        );
        let ssf = self.sub_capped(
            non_negative("ssf_investment", ssf),
            total_income,
            caps.ssf_income_share,
            caps.ssf_max,
        );

        min(provident_fund + rmf + ssf, self.rules.retirement_group_max)
    }

    fn thai_esg_fund(
        &self,
        total_income: Decimal,
        invested: Decimal,
    ) -> Decimal {
        self.sub_capped(
            non_negative("thai_esg_fund", invested),
            total_income,
            self.rules.thai_esg_income_share,
            self.rules.thai_esg_max,
        )
    }

    /// Limits `amount` by an optional share of `base` and an optional
    /// absolute ceiling.
    fn sub_capped(
        &self,
        amount: Decimal,
        base: Decimal,
        income_share: Option<Decimal>,
        ceiling: Option<Decimal>,
    ) -> Decimal {
        let by_share = cap(amount, income_share.map(|share| base * share));
        cap(by_share, ceiling)
    }

    /// Items whose ceiling is normally enforced at input; clamped again here.
    fn capped_pass_through(
        &self,
        field: &'static str,
        amount: Decimal,
        ceiling: Decimal,
    ) -> Decimal {
        let amount = non_negative(field, amount);
        if amount > ceiling {
            warn!(
                field,
                amount = %amount,
                ceiling = %ceiling,
                "amount above input limit; capping"
            );
            ceiling
        } else {
            amount
        }
    }

    fn net_taxable_income(
        &self,
        total_income: Decimal,
        standard_expense_deduction: Decimal,
        total_deductions: Decimal,
    ) -> Decimal {
        max(
            total_income - standard_expense_deduction - total_deductions,
            Decimal::ZERO,
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tracing_subscriber::fmt::format::FmtSpan;

    use super::*;

    fn rules() -> DeductionRules {
        DeductionRules::thai_2025()
    }

    fn salary(monthly: Decimal) -> IncomeInputs {
        IncomeInputs {
            monthly_salary: monthly,
            ..Default::default()
        }
    }

    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_span_events(FmtSpan::NONE)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    // =========================================================================
    // standard expense tests
    // =========================================================================

    #[test]
    fn standard_expense_is_half_of_low_income() {
        let rules = rules();
        let aggregator = DeductionAggregator::new(&rules);

        assert_eq!(aggregator.standard_expense_deduction(dec!(120000)), dec!(60000));
    }

    #[test]
    fn standard_expense_is_capped() {
        let rules = rules();
        let aggregator = DeductionAggregator::new(&rules);

        assert_eq!(
            aggregator.standard_expense_deduction(dec!(1000000)),
            dec!(100000)
        );
    }

    // =========================================================================
    // family allowance tests
    // =========================================================================

    #[test]
    fn spouse_allowance_only_for_joint_filing() {
        let rules = rules();
        let aggregator = DeductionAggregator::new(&rules);

        assert_eq!(
            aggregator.spouse_allowance(MaritalStatus::MarriedJoint),
            dec!(60000)
        );
        assert_eq!(aggregator.spouse_allowance(MaritalStatus::Single), dec!(0));
        assert_eq!(
            aggregator.spouse_allowance(MaritalStatus::MarriedSeparate),
            dec!(0)
        );
    }

    #[test]
    fn child_allowance_is_flat_per_child() {
        let rules = rules();
        let aggregator = DeductionAggregator::new(&rules);

        assert_eq!(aggregator.child_allowance(3), dec!(90000));
        assert_eq!(aggregator.child_allowance(0), dec!(0));
    }

    #[test]
    fn parent_allowance_counts_each_parent() {
        let rules = rules();
        let aggregator = DeductionAggregator::new(&rules);

        assert_eq!(aggregator.parent_allowance(2), dec!(60000));
    }

    #[test]
    fn parent_allowance_caps_count_at_limit() {
        let _guard = init_test_tracing();
        let rules = rules();
        let aggregator = DeductionAggregator::new(&rules);

        assert_eq!(aggregator.parent_allowance(6), dec!(120000));
    }

    // =========================================================================
    // insurance group tests
    // =========================================================================

    #[test]
    fn insurance_group_caps_health_premium_first() {
        let rules = rules();
        let aggregator = DeductionAggregator::new(&rules);

        let result = aggregator.insurance_group(dec!(10000), dec!(40000));

        assert_eq!(result, dec!(35000));
    }

    #[test]
    fn insurance_group_caps_combined_total() {
        let rules = rules();
        let aggregator = DeductionAggregator::new(&rules);

        let result = aggregator.insurance_group(dec!(90000), dec!(25000));

        assert_eq!(result, dec!(100000));
    }

    #[test]
    fn insurance_group_never_exceeds_cap() {
        let rules = rules();
        let aggregator = DeductionAggregator::new(&rules);

        for (life, health) in [
            (dec!(0), dec!(0)),
            (dec!(100000), dec!(0)),
            (dec!(0), dec!(1000000)),
            (dec!(500000), dec!(500000)),
            (dec!(75000.50), dec!(24999.50)),
        ] {
            assert!(aggregator.insurance_group(life, health) <= dec!(100000));
        }
    }

    // =========================================================================
    // retirement group tests
    // =========================================================================

    #[test]
    fn retirement_group_sums_funds_without_sub_caps() {
        let rules = rules();
        let aggregator = DeductionAggregator::new(&rules);
        let income = salary(dec!(100000));

        let result = aggregator.retirement_group(
            &income,
            income.total_income(),
            dec!(100000),
            dec!(50000),
            dec!(300000),
        );

        assert_eq!(result, dec!(450000));
    }

    #[test]
    fn retirement_group_caps_combined_total() {
        let rules = rules();
        let aggregator = DeductionAggregator::new(&rules);
        let income = salary(dec!(100000));

        let result = aggregator.retirement_group(
            &income,
            income.total_income(),
            dec!(300000),
            dec!(300000),
            dec!(300000),
        );

        assert_eq!(result, dec!(500000));
    }

    #[test]
    fn retirement_group_applies_statutory_sub_caps() {
        let rules = DeductionRules::thai_2025().with_statutory_sub_caps();
        let aggregator = DeductionAggregator::new(&rules);
        // Employment and total income: 1,200,000
        let income = salary(dec!(100000));

        let result = aggregator.retirement_group(
            &income,
            income.total_income(),
            dec!(300000), // capped at 15% of wages: 180,000
            dec!(0),
            dec!(300000), // capped at 200,000
        );

        assert_eq!(result, dec!(380000));
    }

    #[test]
    fn retirement_sub_caps_use_income_share_when_lower() {
        let rules = DeductionRules::thai_2025().with_statutory_sub_caps();
        let aggregator = DeductionAggregator::new(&rules);
        // Total income: 300,000, so RMF and SSF are each limited to 90,000
        let income = salary(dec!(25000));

        let result = aggregator.retirement_group(
            &income,
            income.total_income(),
            dec!(0),
            dec!(100000),
            dec!(100000),
        );

        assert_eq!(result, dec!(180000));
    }

    // =========================================================================
    // pass-through tests
    // =========================================================================

    #[test]
    fn pass_through_keeps_amount_within_limit() {
        let rules = rules();
        let aggregator = DeductionAggregator::new(&rules);

        let result =
            aggregator.capped_pass_through("mortgage_interest", dec!(80000), dec!(100000));

        assert_eq!(result, dec!(80000));
    }

    #[test]
    fn pass_through_caps_untrusted_amount() {
        let _guard = init_test_tracing();
        let rules = rules();
        let aggregator = DeductionAggregator::new(&rules);

        let result =
            aggregator.capped_pass_through("easy_e_receipt_spend", dec!(75000), dec!(50000));

        assert_eq!(result, dec!(50000));
    }

    #[test]
    fn thai_esg_is_uncapped_by_default() {
        let rules = rules();
        let aggregator = DeductionAggregator::new(&rules);

        assert_eq!(aggregator.thai_esg_fund(dec!(600000), dec!(150000)), dec!(150000));
    }

    #[test]
    fn thai_esg_respects_statutory_cap() {
        let rules = DeductionRules::thai_2025().with_statutory_sub_caps();
        let aggregator = DeductionAggregator::new(&rules);

        assert_eq!(aggregator.thai_esg_fund(dec!(600000), dec!(150000)), dec!(100000));
        assert_eq!(aggregator.thai_esg_fund(dec!(200000), dec!(150000)), dec!(60000));
    }

    // =========================================================================
    // compute_deductions tests
    // =========================================================================

    #[test]
    fn compute_deductions_sums_every_component() {
        let rules = rules();
        let aggregator = DeductionAggregator::new(&rules);
        let income = IncomeInputs {
            monthly_salary: dec!(100000),
            annual_bonus: dec!(200000),
            other_income: dec!(0),
            foreign_income_remitted: dec!(0),
        };
        let deductions = DeductionInputs {
            marital_status: MaritalStatus::MarriedJoint,
            children: 2,
            qualifying_parents: 1,
            social_security_paid: dec!(9000),
            life_insurance_premium: dec!(50000),
            health_insurance_premium: dec!(30000),
            provident_fund: dec!(60000),
            rmf_investment: dec!(40000),
            ssf_investment: dec!(0),
            thai_esg_fund: dec!(20000),
            easy_e_receipt_spend: dec!(50000),
            travel_stimulus_spend: dec!(10000),
            mortgage_interest: dec!(100000),
        };

        let result = aggregator.compute_deductions(&income, &deductions);

        assert_eq!(
            result,
            DeductionResult {
                total_income: dec!(1400000),
                standard_expense_deduction: dec!(100000),
                personal_allowance: dec!(60000),
                spouse_allowance: dec!(60000),
                child_allowance: dec!(60000),
                parent_allowance: dec!(30000),
                social_security: dec!(9000),
                insurance_group_deduction: dec!(75000),
                retirement_group_deduction: dec!(100000),
                thai_esg_fund: dec!(20000),
                easy_e_receipt: dec!(50000),
                travel_stimulus: dec!(10000),
                mortgage_interest: dec!(100000),
                total_deductions: dec!(574000),
                net_taxable_income: dec!(726000),
            }
        );
    }

    #[test]
    fn compute_deductions_for_zero_income_floors_net_at_zero() {
        let rules = rules();
        let aggregator = DeductionAggregator::new(&rules);

        let result =
            aggregator.compute_deductions(&IncomeInputs::default(), &DeductionInputs::default());

        assert_eq!(result.total_income, dec!(0));
        assert_eq!(result.standard_expense_deduction, dec!(0));
        assert_eq!(result.total_deductions, dec!(60000));
        assert_eq!(result.net_taxable_income, dec!(0));
    }

    #[test]
    fn compute_deductions_never_returns_negative_net_income() {
        let rules = rules();
        let aggregator = DeductionAggregator::new(&rules);
        let deductions = DeductionInputs {
            children: 10,
            mortgage_interest: dec!(100000),
            ..Default::default()
        };

        let result = aggregator.compute_deductions(&salary(dec!(20000)), &deductions);

        assert_eq!(result.total_income, dec!(240000));
        assert_eq!(result.net_taxable_income, dec!(0));
    }

    #[test]
    fn compute_deductions_zeroes_negative_inputs() {
        let _guard = init_test_tracing();
        let rules = rules();
        let aggregator = DeductionAggregator::new(&rules);
        let income = IncomeInputs {
            monthly_salary: dec!(30000),
            annual_bonus: dec!(-50000),
            ..Default::default()
        };
        let deductions = DeductionInputs {
            life_insurance_premium: dec!(-10000),
            ..Default::default()
        };

        let result = aggregator.compute_deductions(&income, &deductions);

        assert_eq!(result.total_income, dec!(360000));
        assert_eq!(result.insurance_group_deduction, dec!(0));
    }

    #[test]
    fn total_deductions_is_monotonic_in_each_input() {
        let rules = rules();
        let aggregator = DeductionAggregator::new(&rules);
        let income = salary(dec!(60000));
        let base = DeductionInputs::default();
        let baseline = aggregator.compute_deductions(&income, &base).total_deductions;

        let bumps: [fn(&mut DeductionInputs); 13] = [
            |d: &mut DeductionInputs| d.children += 1,
            |d: &mut DeductionInputs| d.qualifying_parents += 1,
            |d: &mut DeductionInputs| d.marital_status = MaritalStatus::MarriedJoint,
            |d: &mut DeductionInputs| d.social_security_paid += dec!(5000),
            |d: &mut DeductionInputs| d.life_insurance_premium += dec!(5000),
            |d: &mut DeductionInputs| d.health_insurance_premium += dec!(5000),
            |d: &mut DeductionInputs| d.provident_fund += dec!(5000),
            |d: &mut DeductionInputs| d.rmf_investment += dec!(5000),
            |d: &mut DeductionInputs| d.ssf_investment += dec!(5000),
            |d: &mut DeductionInputs| d.thai_esg_fund += dec!(5000),
            |d: &mut DeductionInputs| d.easy_e_receipt_spend += dec!(5000),
            |d: &mut DeductionInputs| d.travel_stimulus_spend += dec!(5000),
            |d: &mut DeductionInputs| d.mortgage_interest += dec!(5000),
        ];

        for bump in bumps {
            let mut inputs = base.clone();
            bump(&mut inputs);

            let bumped = aggregator.compute_deductions(&income, &inputs).total_deductions;
            assert!(bumped >= baseline);
        }
    }
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Annual assessable income, already validated as non-negative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeInputs {
    pub monthly_salary: Decimal,
    pub annual_bonus: Decimal,
    /// Freelance fees, commissions and similar.
    pub other_income: Decimal,
    /// Foreign income brought into Thailand during the tax year.
    pub foreign_income_remitted: Decimal,
}

impl IncomeInputs {
    pub fn annual_salary(&self) -> Decimal {
        self.monthly_salary * Decimal::from(12)
    }

    /// Salary plus bonus; the wage base for provident fund contributions.
    pub fn employment_income(&self) -> Decimal {
        self.annual_salary() + self.annual_bonus
    }

    pub fn total_income(&self) -> Decimal {
        self.employment_income() + self.other_income + self.foreign_income_remitted
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn total_income_annualises_salary_and_adds_other_sources() {
        let income = IncomeInputs {
            monthly_salary: dec!(50000),
            annual_bonus: dec!(100000),
            other_income: dec!(20000),
            foreign_income_remitted: dec!(30000),
        };

        assert_eq!(income.annual_salary(), dec!(600000));
        assert_eq!(income.employment_income(), dec!(700000));
        assert_eq!(income.total_income(), dec!(750000));
    }

    #[test]
    fn total_income_is_zero_by_default() {
        assert_eq!(IncomeInputs::default().total_income(), Decimal::ZERO);
    }
}

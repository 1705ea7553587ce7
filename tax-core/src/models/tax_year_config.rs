use serde::{Deserialize, Serialize};

use super::{DeductionRules, DeductionRulesError, TaxBracketTable};

/// Everything that changes from one tax year to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    pub tax_year: i32,
    pub brackets: TaxBracketTable,
    #[serde(default)]
    pub deductions: DeductionRules,
}

impl TaxYearConfig {
    pub fn thai_2025() -> Self {
        Self {
            tax_year: 2025,
            brackets: TaxBracketTable::thai_2025(),
            deductions: DeductionRules::thai_2025(),
        }
    }

    /// Brackets are validated on construction, so only the deduction rules
    /// need checking here.
    pub fn validate(&self) -> Result<(), DeductionRulesError> {
        self.deductions.validate()
    }
}

impl Default for TaxYearConfig {
    fn default() -> Self {
        Self::thai_2025()
    }
}

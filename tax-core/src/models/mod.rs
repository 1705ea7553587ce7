mod deduction_inputs;
mod deduction_rules;
mod income;
mod marital_status;
mod tax_bracket;
mod tax_year_config;

pub use deduction_inputs::DeductionInputs;
pub use deduction_rules::{DeductionRules, DeductionRulesError, InputLimits, RetirementSubCaps};
pub use income::IncomeInputs;
pub use marital_status::MaritalStatus;
pub use tax_bracket::{BracketTableError, TaxBracket, TaxBracketTable};
pub use tax_year_config::TaxYearConfig;

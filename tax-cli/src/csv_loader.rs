//! CSV loader for batch estimate requests.
//!
//! ## CSV Format
//!
//! One request per row. Headers are matched by name, so column order does
//! **not** matter and any column may be left out. Empty cells are zero.
//!
//! | Column                    | Type    | Notes                                      |
//! |---------------------------|---------|--------------------------------------------|
//! | `label`                   | string  | Shown in the batch report; `row N` if empty |
//! | `monthly_salary`          | decimal |                                            |
//! | `annual_bonus`            | decimal |                                            |
//! | `other_income`            | decimal |                                            |
//! | `foreign_income_remitted` | decimal |                                            |
//! | `marital_status`          | string  | `S`, `MJ`, `MS` or the snake_case name     |
//! | `children`                | integer |                                            |
//! | `qualifying_parents`      | integer | At most 4                                  |
//! | `social_security_paid`    | decimal | At most 9,000                              |
//! | `life_insurance_premium`  | decimal |                                            |
//! | `health_insurance_premium`| decimal |                                            |
//! | `provident_fund`          | decimal |                                            |
//! | `rmf_investment`          | decimal |                                            |
//! | `ssf_investment`          | decimal |                                            |
//! | `thai_esg_fund`           | decimal |                                            |
//! | `easy_e_receipt_spend`    | decimal | At most 50,000                             |
//! | `travel_stimulus_spend`   | decimal | At most 20,000                             |
//! | `mortgage_interest`       | decimal | At most 100,000                            |
//!
//! ### Minimal example
//!
//! ```csv
//! monthly_salary,marital_status
//! 50000,S
//! ```
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{InputLimits, InvalidInputError, TaxRequest, ValidatedRequest};

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    label: Option<String>,
    monthly_salary: Option<Decimal>,
    annual_bonus: Option<Decimal>,
    other_income: Option<Decimal>,
    foreign_income_remitted: Option<Decimal>,
    marital_status: Option<String>,
    children: Option<Decimal>,
    qualifying_parents: Option<Decimal>,
    social_security_paid: Option<Decimal>,
    life_insurance_premium: Option<Decimal>,
    health_insurance_premium: Option<Decimal>,
    provident_fund: Option<Decimal>,
    rmf_investment: Option<Decimal>,
    ssf_investment: Option<Decimal>,
    thai_esg_fund: Option<Decimal>,
    easy_e_receipt_spend: Option<Decimal>,
    travel_stimulus_spend: Option<Decimal>,
    mortgage_interest: Option<Decimal>,
}

impl From<CsvRow> for TaxRequest {
    fn from(row: CsvRow) -> Self {
        let zero = |v: Option<Decimal>| v.unwrap_or(Decimal::ZERO);
        TaxRequest {
            monthly_salary: zero(row.monthly_salary),
            annual_bonus: zero(row.annual_bonus),
            other_income: zero(row.other_income),
            foreign_income_remitted: zero(row.foreign_income_remitted),
            marital_status: row.marital_status,
            children: zero(row.children),
            qualifying_parents: zero(row.qualifying_parents),
            social_security_paid: zero(row.social_security_paid),
            life_insurance_premium: zero(row.life_insurance_premium),
            health_insurance_premium: zero(row.health_insurance_premium),
            provident_fund: zero(row.provident_fund),
            rmf_investment: zero(row.rmf_investment),
            ssf_investment: zero(row.ssf_investment),
            thai_esg_fund: zero(row.thai_esg_fund),
            easy_e_receipt_spend: zero(row.easy_e_receipt_spend),
            travel_stimulus_spend: zero(row.travel_stimulus_spend),
            mortgage_interest: zero(row.mortgage_interest),
        }
    }
}

/// A validated request together with the label it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub label: String,
    pub request: ValidatedRequest,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// Bad structure, ragged rows or a value that is not a number.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A row parsed but was rejected at the input boundary. `row` is
    /// 1-based, not counting the header.
    #[error("row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: InvalidInputError,
    },

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn convert_row(
    row: CsvRow,
    row_number: usize,
    limits: &InputLimits,
) -> Result<BatchRequest, CsvLoadError> {
    let label = row
        .label
        .clone()
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| format!("row {row_number}"));

    let request = TaxRequest::from(row)
        .validate(limits)
        .map_err(|source| CsvLoadError::InvalidRow {
            row: row_number,
            source,
        })?;

    Ok(BatchRequest { label, request })
}

/// Parse CSV text and validate every row against `limits`. Rows are
/// returned in file order.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] if the CSV is structurally invalid or a cell
///   cannot be read as a number.
/// * [`CsvLoadError::InvalidRow`] for the first row the input boundary
///   rejects.
pub fn load_from_str(
    input: &str,
    limits: &InputLimits,
) -> Result<Vec<BatchRequest>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1, limits)
        })
        .collect()
}

/// Reads a file from disk and delegates to [`load_from_str`].
pub fn load_from_file(
    path: &Path,
    limits: &InputLimits,
) -> Result<Vec<BatchRequest>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents, limits)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

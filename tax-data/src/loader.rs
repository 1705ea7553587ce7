use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{BracketTableError, DeductionRulesError, TaxBracket, TaxBracketTable, TaxYearConfig};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading rate schedules or tax-year configs.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid bracket table: {0}")]
    Brackets(#[from] BracketTableError),

    #[error("invalid deduction rules: {0}")]
    Rules(#[from] DeductionRulesError),
}

impl From<csv::Error> for LoaderError {
    fn from(err: csv::Error) -> Self {
        LoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a bracket CSV file.
///
/// - `upper_limit`: inclusive upper bound of the bracket (empty for the top bracket)
/// - `rate`: the marginal tax rate as a decimal (e.g., 0.05 for 5%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_limit: Option<Decimal>,
    pub rate: Decimal,
}

impl From<BracketRecord> for TaxBracket {
    fn from(record: BracketRecord) -> Self {
        TaxBracket {
            upper_limit: record.upper_limit,
            rate: record.rate,
        }
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .replace(',', "")
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn read_file(path: &Path) -> Result<String, LoaderError> {
    fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loader for bracket schedules stored as CSV.
///
/// ```csv
/// upper_limit,rate
/// 150000,0.00
/// 300000,0.05
/// ,0.35
/// ```
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader, in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, LoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse and validate a complete bracket table.
    pub fn load<R: Read>(reader: R) -> Result<TaxBracketTable, LoaderError> {
        let records = Self::parse(reader)?;
        let brackets = records.into_iter().map(TaxBracket::from).collect();
        let table = TaxBracketTable::new(brackets)?;

        debug!(brackets = table.len(), "loaded bracket table");
        Ok(table)
    }

    pub fn load_file(path: &Path) -> Result<TaxBracketTable, LoaderError> {
        let file = File::open(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(file)
    }
}

/// Loader for a full tax-year configuration stored as TOML.
///
/// ```toml
/// tax_year = 2025
///
/// [[brackets]]
/// upper_limit = 150000
/// rate = 0.0
///
/// [[brackets]]
/// rate = 0.35
///
/// [deductions]
/// personal_allowance = 60000
/// ```
///
/// Keys missing from `[deductions]` keep their 2025 values.
pub struct TaxYearConfigLoader;

impl TaxYearConfigLoader {
    pub fn parse_str(input: &str) -> Result<TaxYearConfig, LoaderError> {
        let config: TaxYearConfig = toml::from_str(input)?;
        config.validate()?;

        debug!(
            tax_year = config.tax_year,
            brackets = config.brackets.len(),
            "loaded tax year config"
        );
        Ok(config)
    }

    pub fn load_file(path: &Path) -> Result<TaxYearConfig, LoaderError> {
        let contents = read_file(path)?;
        Self::parse_str(&contents)
    }
}

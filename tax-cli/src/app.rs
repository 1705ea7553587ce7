//! Glue between the command line and the calculators: resolves which tax
//! year rules to use, reads requests and runs estimates.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tax_core::calculations::{TaxEstimate, TaxEstimator};
use tax_core::{TaxRequest, TaxYearConfig};
use tax_data::{BracketTableLoader, TaxYearConfigLoader};
use tracing::{debug, info};

use crate::csv_loader;

/// Where the rules for an estimate come from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    /// TOML tax-year file; the built-in 2025 rules when `None`.
    pub config: Option<PathBuf>,
    /// CSV schedule replacing the config's brackets.
    pub brackets: Option<PathBuf>,
    pub statutory_sub_caps: bool,
}

/// Resolves a [`ConfigSource`] into a validated [`TaxYearConfig`].
pub fn load_config(source: &ConfigSource) -> Result<TaxYearConfig> {
    let mut config = match &source.config {
        Some(path) => TaxYearConfigLoader::load_file(path)
            .with_context(|| format!("failed to load tax year config {}", path.display()))?,
        None => TaxYearConfig::thai_2025(),
    };

    if let Some(path) = &source.brackets {
        config.brackets = BracketTableLoader::load_file(path)
            .with_context(|| format!("failed to load bracket schedule {}", path.display()))?;
    }

    if source.statutory_sub_caps {
        config.deductions = config.deductions.with_statutory_sub_caps();
    }

    debug!(
        tax_year = config.tax_year,
        brackets = config.brackets.len(),
        sub_caps = config.deductions.retirement_sub_caps.is_enabled(),
        "using tax year config"
    );
    Ok(config)
}

/// Validates a raw request and runs it through the estimator.
pub fn estimate_request(
    config: &TaxYearConfig,
    request: &TaxRequest,
) -> Result<TaxEstimate> {
    let validated = request
        .validate(&config.deductions.input_limits)
        .context("invalid estimate request")?;

    Ok(TaxEstimator::new(config).estimate(&validated.income, &validated.deductions))
}

/// Reads a file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        Ok(input)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

/// Parses a JSON request document and returns the estimate as pretty JSON.
pub fn run_json(
    config: &TaxYearConfig,
    input: &str,
) -> Result<String> {
    let request: TaxRequest =
        serde_json::from_str(input).context("request is not a valid JSON estimate request")?;
    let estimate = estimate_request(config, &request)?;

    serde_json::to_string_pretty(&estimate).context("failed to serialise estimate")
}

/// Loads every row of a batch CSV and estimates each one.
pub fn run_batch(
    config: &TaxYearConfig,
    path: &Path,
) -> Result<Vec<(String, TaxEstimate)>> {
    let requests = csv_loader::load_from_file(path, &config.deductions.input_limits)
        .with_context(|| format!("failed to load batch file {}", path.display()))?;

    let estimator = TaxEstimator::new(config);
    let results: Vec<(String, TaxEstimate)> = requests
        .into_iter()
        .map(|batch| {
            let estimate =
                estimator.estimate(&batch.request.income, &batch.request.deductions);
            (batch.label, estimate)
        })
        .collect();

    info!(rows = results.len(), "batch complete");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn load_config_defaults_to_builtin_rules() {
        let config = load_config(&ConfigSource::default()).unwrap();

        assert_eq!(config, TaxYearConfig::thai_2025());
    }

    #[test]
    fn load_config_applies_statutory_sub_caps() {
        let source = ConfigSource {
            statutory_sub_caps: true,
            ..Default::default()
        };

        let config = load_config(&source).unwrap();

        assert!(config.deductions.retirement_sub_caps.is_enabled());
        assert_eq!(config.deductions.thai_esg_max, Some(dec!(100000)));
    }

    #[test]
    fn load_config_reports_missing_file() {
        let source = ConfigSource {
            config: Some(PathBuf::from("/no/such/config.toml")),
            ..Default::default()
        };

        let err = load_config(&source).unwrap_err();

        assert!(err.to_string().contains("failed to load tax year config"));
    }

    #[test]
    fn estimate_request_rejects_invalid_input() {
        let request = TaxRequest {
            monthly_salary: dec!(-1),
            ..Default::default()
        };

        let err = estimate_request(&TaxYearConfig::thai_2025(), &request).unwrap_err();

        assert_eq!(err.to_string(), "invalid estimate request");
    }

    #[test]
    fn run_json_returns_estimate_document() {
        let output = run_json(
            &TaxYearConfig::thai_2025(),
            r#"{"monthly_salary": "50000", "social_security_paid": 9000}"#,
        )
        .unwrap();

        let estimate: TaxEstimate = serde_json::from_str(&output).unwrap();
        assert_eq!(estimate.net_taxable_income, dec!(431000));
        assert_eq!(estimate.tax_payable, dec!(20600));
        assert_eq!(estimate.breakdown.len(), 3);
    }

    #[test]
    fn run_json_writes_top_bracket_limit_as_null() {
        let output = run_json(
            &TaxYearConfig::thai_2025(),
            r#"{"monthly_salary": 1000000}"#,
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let breakdown = value["breakdown"].as_array().unwrap();
        assert_eq!(breakdown.len(), 8);
        assert_eq!(breakdown[7]["upper_limit"], serde_json::Value::Null);
    }

    #[test]
    fn run_json_rejects_salary_too_large_to_annualise() {
        let err = run_json(
            &TaxYearConfig::thai_2025(),
            r#"{"monthly_salary": "10000000000000000000000000000"}"#,
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "invalid estimate request");
        assert!(format!("{err:#}").contains("monthly_salary must be at most"));
    }

    #[test]
    fn run_json_rejects_malformed_document() {
        let err = run_json(&TaxYearConfig::thai_2025(), "{not json").unwrap_err();

        assert!(err.to_string().contains("not a valid JSON"));
    }
}

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Trims whitespace and strips commas used as thousands separators.
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Accepts `1,234.56` style thousands separators. Empty input is zero.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::error!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Formats an amount with two decimals and thousands separators,
/// e.g. `1234567.891` becomes `1,234,567.89`.
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{fraction}")
}

/// Whole-baht rendering used for bracket limits, e.g. `150,000`.
pub fn format_whole(value: Decimal) -> String {
    let amount = format_amount(value.trunc());
    amount
        .strip_suffix(".00")
        .map(str::to_string)
        .unwrap_or(amount)
}

/// Formats a rate stored as a fraction (`0.05`) as a percentage (`5%`).
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::from(100)).normalize())
}

/// Formats a bracket's income range the way it is shown on the
/// Revenue Department tables: `150,001 - 300,000`, top bracket `- Max`.
pub fn format_bracket_range(
    lower: Decimal,
    upper: Option<Decimal>,
) -> String {
    let start = format_whole(lower + Decimal::ONE);
    match upper {
        Some(upper) => format!("{start} - {}", format_whole(upper)),
        None => format!("{start} - Max"),
    }
}

//! Plain-text rendering of estimates and schedules.

use std::fmt::Write;

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};
use tax_core::TaxBracketTable;
use tax_core::calculations::{BracketResult, DeductionResult, TaxEstimate};

use crate::utils::{format_amount, format_bracket_range, format_rate};

pub const NO_TAX_LIABILITY: &str = "You have no tax liability.";

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Bracket")]
    bracket: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Amount Taxed")]
    amount_taxed: String,
    #[tabled(rename = "Tax Payable")]
    tax: String,
}

impl From<&BracketResult> for BreakdownRow {
    fn from(row: &BracketResult) -> Self {
        Self {
            bracket: format_bracket_range(row.lower_limit, row.upper_limit),
            rate: format_rate(row.rate),
            amount_taxed: format_amount(row.amount_taxed),
            tax: format_amount(row.tax_for_bracket),
        }
    }
}

#[derive(Tabled)]
struct DeductionRow {
    #[tabled(rename = "Deduction")]
    name: &'static str,
    #[tabled(rename = "Amount (THB)")]
    amount: String,
}

#[derive(Tabled)]
struct ScheduleRow {
    #[tabled(rename = "Net Taxable Income")]
    range: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

#[derive(Tabled)]
struct BatchRow {
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Total Income")]
    total_income: String,
    #[tabled(rename = "Deductions")]
    deductions: String,
    #[tabled(rename = "Net Taxable")]
    net_taxable: String,
    #[tabled(rename = "Tax")]
    tax: String,
    #[tabled(rename = "Effective Rate")]
    effective_rate: String,
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string()
}

/// Deduction lines with a non-zero amount, in the order they are claimed.
fn deduction_rows(deductions: &DeductionResult) -> Vec<DeductionRow> {
    [
        ("Standard expenses", deductions.standard_expense_deduction),
        ("Personal allowance", deductions.personal_allowance),
        ("Spouse allowance", deductions.spouse_allowance),
        ("Child allowance", deductions.child_allowance),
        ("Parent allowance", deductions.parent_allowance),
        ("Social security", deductions.social_security),
        ("Life & health insurance", deductions.insurance_group_deduction),
        ("PVD / RMF / SSF", deductions.retirement_group_deduction),
        ("Thai ESG fund", deductions.thai_esg_fund),
        ("Easy E-Receipt", deductions.easy_e_receipt),
        ("Travel stimulus", deductions.travel_stimulus),
        ("Mortgage interest", deductions.mortgage_interest),
    ]
    .into_iter()
    .filter(|(_, amount)| !amount.is_zero())
    .map(|(name, amount)| DeductionRow {
        name,
        amount: format_amount(amount),
    })
    .collect()
}

/// Full text report for a single estimate.
pub fn estimate_text(estimate: &TaxEstimate) -> String {
    let mut out = String::new();
    let d = &estimate.deductions;

    // Writing to a String cannot fail.
    let _ = writeln!(out, "THAI PERSONAL INCOME TAX ({})", estimate.tax_year);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Total income:           {:>16} THB",
        format_amount(estimate.total_income)
    );
    let _ = writeln!(
        out,
        "Total deductions:       {:>16} THB",
        format_amount(d.standard_expense_deduction + d.total_deductions)
    );
    let _ = writeln!(
        out,
        "Net taxable income:     {:>16} THB",
        format_amount(estimate.net_taxable_income)
    );
    let _ = writeln!(
        out,
        "Estimated tax payable:  {:>16} THB",
        format_amount(estimate.tax_payable)
    );
    let _ = writeln!(
        out,
        "Net income after tax:   {:>16} THB",
        format_amount(estimate.net_income_after_tax)
    );
    let _ = writeln!(
        out,
        "Effective tax rate:     {:>16} %",
        format_amount(estimate.effective_rate)
    );

    let deductions = deduction_rows(d);
    if !deductions.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "DEDUCTIONS & ALLOWANCES");
        let _ = writeln!(out, "{}", render(deductions));
    }

    if !estimate.breakdown.is_empty() {
        let rows: Vec<BreakdownRow> = estimate.breakdown.iter().map(BreakdownRow::from).collect();
        let _ = writeln!(out);
        let _ = writeln!(out, "TAX BRACKET BREAKDOWN");
        let _ = writeln!(out, "{}", render(rows));
    }

    if !estimate.has_tax_liability() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{NO_TAX_LIABILITY}");
    }

    out
}

/// The progressive schedule as a two-column table.
pub fn brackets_text(
    tax_year: i32,
    table: &TaxBracketTable,
) -> String {
    let rows: Vec<ScheduleRow> = table
        .iter_with_lower_limits()
        .map(|(lower, bracket)| ScheduleRow {
            range: format_bracket_range(lower, bracket.upper_limit),
            rate: format_rate(bracket.rate),
        })
        .collect();

    format!("TAX BRACKETS ({tax_year})\n{}\n", render(rows))
}

/// One summary line per labelled estimate.
pub fn batch_text(results: &[(String, TaxEstimate)]) -> String {
    let rows: Vec<BatchRow> = results
        .iter()
        .map(|(label, estimate)| BatchRow {
            label: label.clone(),
            total_income: format_amount(estimate.total_income),
            deductions: format_amount(
                estimate.deductions.standard_expense_deduction
                    + estimate.deductions.total_deductions,
            ),
            net_taxable: format_amount(estimate.net_taxable_income),
            tax: format_amount(estimate.tax_payable),
            effective_rate: format!("{}%", format_amount(estimate.effective_rate)),
        })
        .collect();

    format!("{}\n", render(rows))
}

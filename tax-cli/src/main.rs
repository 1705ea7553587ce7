use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing::debug;

use tax_cli::app::{self, ConfigSource};
use tax_cli::{logging, report, utils};
use tax_core::TaxRequest;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Thai personal income tax estimator.
///
/// Applies the standard expense deduction, personal and family allowances
/// and capped investment deductions, then runs the progressive schedule.
#[derive(Debug, Parser)]
#[command(name = "thai-tax", version)]
struct Cli {
    /// Log filter, e.g. `debug` or `info,tax_core=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Estimate tax from command-line amounts.
    Estimate {
        #[command(flatten)]
        rules: RuleArgs,

        #[command(flatten)]
        input: InputArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Estimate tax for a JSON request document and print JSON.
    Json {
        #[command(flatten)]
        rules: RuleArgs,

        /// Request file, or `-` for stdin.
        #[arg(default_value = "-")]
        file: PathBuf,
    },

    /// Estimate tax for every row of a CSV file.
    Batch {
        #[command(flatten)]
        rules: RuleArgs,

        file: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the active tax bracket schedule.
    Brackets {
        #[command(flatten)]
        rules: RuleArgs,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Args)]
struct RuleArgs {
    /// Tax-year TOML file. Defaults to the built-in 2025 rules.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bracket CSV (`upper_limit,rate`) replacing the configured schedule.
    #[arg(long)]
    brackets: Option<PathBuf>,

    /// Enforce per-fund PVD/RMF/SSF and Thai ESG ceilings.
    #[arg(long)]
    statutory_sub_caps: bool,
}

impl From<RuleArgs> for ConfigSource {
    fn from(args: RuleArgs) -> Self {
        ConfigSource {
            config: args.config,
            brackets: args.brackets,
            statutory_sub_caps: args.statutory_sub_caps,
        }
    }
}

#[derive(Debug, Args)]
struct InputArgs {
    #[arg(long, value_parser = utils::parse_decimal, default_value = "0")]
    monthly_salary: Decimal,

    #[arg(long, value_parser = utils::parse_decimal, default_value = "0")]
    annual_bonus: Decimal,

    /// Freelance, commissions and similar.
    #[arg(long, value_parser = utils::parse_decimal, default_value = "0")]
    other_income: Decimal,

    /// Foreign income brought into Thailand.
    #[arg(long, value_parser = utils::parse_decimal, default_value = "0")]
    foreign_income: Decimal,

    /// `single`, `married_joint`, `married_separate` (or S, MJ, MS).
    #[arg(long)]
    marital_status: Option<String>,

    #[arg(long, value_parser = utils::parse_decimal, default_value = "0")]
    children: Decimal,

    /// Parents over 60 with low income, at most 4.
    #[arg(long, value_parser = utils::parse_decimal, default_value = "0")]
    parents: Decimal,

    /// Annual social security contributions, at most 9,000.
    #[arg(long, value_parser = utils::parse_decimal, default_value = "0")]
    social_security: Decimal,

    #[arg(long, value_parser = utils::parse_decimal, default_value = "0")]
    life_insurance: Decimal,

    #[arg(long, value_parser = utils::parse_decimal, default_value = "0")]
    health_insurance: Decimal,

    #[arg(long, value_parser = utils::parse_decimal, default_value = "0")]
    provident_fund: Decimal,

    #[arg(long, value_parser = utils::parse_decimal, default_value = "0")]
    rmf: Decimal,

    #[arg(long, value_parser = utils::parse_decimal, default_value = "0")]
    ssf: Decimal,

    #[arg(long, value_parser = utils::parse_decimal, default_value = "0")]
    thai_esg: Decimal,

    /// Easy E-Receipt spending, at most 50,000.
    #[arg(long, value_parser = utils::parse_decimal, default_value = "0")]
    easy_e_receipt: Decimal,

    /// Domestic travel stimulus spending, at most 20,000.
    #[arg(long, value_parser = utils::parse_decimal, default_value = "0")]
    travel_stimulus: Decimal,

    /// Home mortgage interest, at most 100,000.
    #[arg(long, value_parser = utils::parse_decimal, default_value = "0")]
    mortgage_interest: Decimal,
}

impl From<InputArgs> for TaxRequest {
    fn from(args: InputArgs) -> Self {
        TaxRequest {
            monthly_salary: args.monthly_salary,
            annual_bonus: args.annual_bonus,
            other_income: args.other_income,
            foreign_income_remitted: args.foreign_income,
            marital_status: args.marital_status,
            children: args.children,
            qualifying_parents: args.parents,
            social_security_paid: args.social_security,
            life_insurance_premium: args.life_insurance,
            health_insurance_premium: args.health_insurance,
            provident_fund: args.provident_fund,
            rmf_investment: args.rmf,
            ssf_investment: args.ssf,
            thai_esg_fund: args.thai_esg,
            easy_e_receipt_spend: args.easy_e_receipt,
            travel_stimulus_spend: args.travel_stimulus,
            mortgage_interest: args.mortgage_interest,
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;
    debug!(command = ?cli.command, "starting");

    match cli.command {
        Command::Estimate {
            rules,
            input,
            format,
        } => {
            let config = app::load_config(&rules.into())?;
            let estimate = app::estimate_request(&config, &input.into())?;
            match format {
                OutputFormat::Text => print!("{}", report::estimate_text(&estimate)),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&estimate).context("failed to serialise estimate")?
                ),
            }
        }
        Command::Json { rules, file } => {
            let config = app::load_config(&rules.into())?;
            let input = app::read_input(&file)?;
            println!("{}", app::run_json(&config, &input)?);
        }
        Command::Batch {
            rules,
            file,
            format,
        } => {
            let config = app::load_config(&rules.into())?;
            let results = app::run_batch(&config, &file)?;
            match format {
                OutputFormat::Text => print!("{}", report::batch_text(&results)),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&results).context("failed to serialise batch")?
                ),
            }
        }
        Command::Brackets { rules } => {
            let config = app::load_config(&rules.into())?;
            print!("{}", report::brackets_text(config.tax_year, &config.brackets));
        }
    }

    Ok(())
}

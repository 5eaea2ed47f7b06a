use clap::Args;
use log::info;
use rust_decimal::Decimal;
use serde_json::Value;

use amortize_core::advisory::build_advice_prompt;
use amortize_core::amortization::loan::{self, LoanInput};

use crate::input;

/// Loan terms, given as flags, a JSON file, or JSON piped to stdin
#[derive(Args)]
pub struct LoanArgs {
    /// Principal borrowed (e.g. 250000)
    #[arg(long, alias = "principal")]
    pub amount: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 5.5 for 5.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years (e.g. 30, or 2.5 for 30 months)
    #[arg(long, alias = "term")]
    pub years: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Resolve loan terms: --input file, then piped stdin, then flags.
fn resolve_loan_input(args: LoanArgs) -> Result<LoanInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        info!("reading loan terms from {path}");
        return input::read_json(path);
    }

    if let Some(data) = input::read_stdin::<LoanInput>()? {
        info!("reading loan terms from stdin");
        return Ok(data);
    }

    Ok(LoanInput {
        amount: args
            .amount
            .ok_or("--amount is required (or provide --input)")?,
        rate: args.rate.ok_or("--rate is required (or provide --input)")?,
        years: args
            .years
            .ok_or("--years is required (or provide --input)")?,
    })
}

pub fn run_loan(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input = resolve_loan_input(args)?;
    let result = loan::amortize_loan(&loan_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input = resolve_loan_input(args)?;
    let result = loan::calculate_loan(&loan_input)?;
    Ok(serde_json::to_value(result.amortization_schedule)?)
}

pub fn run_advice_prompt(args: LoanArgs) -> Result<String, Box<dyn std::error::Error>> {
    let loan_input = resolve_loan_input(args)?;
    let result = loan::calculate_loan(&loan_input)?;
    Ok(build_advice_prompt(&loan_input, &result))
}

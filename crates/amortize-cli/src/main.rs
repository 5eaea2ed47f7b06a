mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::loan::LoanArgs;

/// Fixed-payment loan amortization
#[derive(Parser)]
#[command(
    name = "amortize",
    version,
    about = "Fixed-payment loan amortization",
    long_about = "Computes the monthly payment, total interest and total cost of a \
                  fixed-rate loan with monthly payments, together with a year-by-year \
                  amortization schedule, using decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate payment, totals and yearly schedule for a loan
    Loan(LoanArgs),
    /// Print only the yearly amortization schedule
    Schedule(LoanArgs),
    /// Print the prompt an advisory service would receive for a loan
    AdvicePrompt(LoanArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Loan(args) => commands::loan::run_loan(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::AdvicePrompt(args) => {
            commands::loan::run_advice_prompt(args).map(serde_json::Value::String)
        }
        Commands::Version => {
            println!("amortize {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

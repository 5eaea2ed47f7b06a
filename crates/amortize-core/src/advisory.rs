//! Contract for the optional loan advisory collaborator.
//!
//! An advisor is any service that turns a computed loan into a short piece of
//! free-form commentary. The engine never depends on it: callers compute a
//! [`LoanResult`] first and may then ask an injected [`LoanAdvisor`] for text.
//! [`request_advice`] never fails; every advisor error degrades to a fixed
//! fallback message so the numeric figures can always be shown.

use log::warn;
use rust_decimal::RoundingStrategy;
use std::future::Future;
use thiserror::Error;

use crate::amortization::{LoanInput, LoanResult};
use crate::types::Money;

pub const MISSING_CREDENTIALS_MESSAGE: &str =
    "API key is missing. Unable to generate loan insights.";
pub const UNAVAILABLE_MESSAGE: &str =
    "Sorry, the loan advisor could not be reached right now. Please try again later.";
pub const EMPTY_RESPONSE_MESSAGE: &str = "Could not generate advice at this time.";

#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("advisor credentials are not configured")]
    MissingCredentials,

    #[error("advisor unavailable: {0}")]
    Unavailable(String),

    #[error("advisor returned an empty response")]
    EmptyResponse,
}

impl AdvisoryError {
    /// User-facing text shown in place of advice.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            AdvisoryError::MissingCredentials => MISSING_CREDENTIALS_MESSAGE,
            AdvisoryError::Unavailable(_) => UNAVAILABLE_MESSAGE,
            AdvisoryError::EmptyResponse => EMPTY_RESPONSE_MESSAGE,
        }
    }
}

/// A text-generation service that comments on a loan.
pub trait LoanAdvisor {
    fn advise(&self, prompt: &str) -> impl Future<Output = Result<String, AdvisoryError>> + Send;
}

/// Ask `advisor` about a computed loan, falling back to a fixed message on
/// any failure.
pub async fn request_advice<A: LoanAdvisor>(
    advisor: &A,
    input: &LoanInput,
    result: &LoanResult,
) -> String {
    let prompt = build_advice_prompt(input, result);

    let outcome = match advisor.advise(&prompt).await {
        Ok(text) if text.trim().is_empty() => Err(AdvisoryError::EmptyResponse),
        other => other,
    };

    match outcome {
        Ok(text) => text,
        Err(e) => {
            warn!("loan advice unavailable: {e}");
            e.fallback_message().to_string()
        }
    }
}

/// Prompt sent to an advisor for a computed loan.
pub fn build_advice_prompt(input: &LoanInput, result: &LoanResult) -> String {
    format!(
        "You are an experienced financial advisor reviewing a loan a borrower is considering.\n\
         \n\
         Loan terms:\n\
         - Loan amount: {amount}\n\
         - Annual interest rate: {rate}%\n\
         - Term: {years} years\n\
         \n\
         Calculated figures:\n\
         - Monthly payment: {monthly}\n\
         - Total interest payable: {interest}\n\
         - Total cost of the loan: {total}\n\
         \n\
         Give a brief, friendly and professional assessment in three short paragraphs:\n\
         1. How expensive the interest is relative to the principal.\n\
         2. Whether the monthly payment looks affordable by common rules of thumb.\n\
         3. One concrete way to pay less overall, such as extra payments or a shorter term.\n\
         Keep it helpful and concise.",
        amount = format_usd(input.amount),
        rate = input.rate.normalize(),
        years = input.years.normalize(),
        monthly = format_usd(result.monthly_payment),
        interest = format_usd(result.total_interest),
        total = format_usd(result.total_payment),
    )
}

/// Render an amount as US dollars with thousands separators and cents,
/// e.g. `$1,234.56`.
pub fn format_usd(value: Money) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{cents}")
}

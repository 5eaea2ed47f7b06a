use napi::Result as NapiResult;
use napi_derive::napi;

use amortize_core::advisory::build_advice_prompt;
use amortize_core::amortization::loan::{self, LoanInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_loan_input(input_json: &str) -> NapiResult<LoanInput> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

/// Amortize a loan. Takes `{ amount, rate, years }` as JSON and returns the
/// computation envelope as JSON.
#[napi]
pub fn calculate_loan(input_json: String) -> NapiResult<String> {
    let input = parse_loan_input(&input_json)?;
    let output = loan::amortize_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Build the advisory prompt for a loan, ready to hand to a text-generation
/// service on the JavaScript side.
#[napi]
pub fn advice_prompt(input_json: String) -> NapiResult<String> {
    let input = parse_loan_input(&input_json)?;
    let result = loan::calculate_loan(&input).map_err(to_napi_error)?;
    Ok(build_advice_prompt(&input, &result))
}

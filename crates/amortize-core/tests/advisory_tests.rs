use std::sync::Mutex;

use amortize_core::advisory::{
    build_advice_prompt, request_advice, AdvisoryError, LoanAdvisor, EMPTY_RESPONSE_MESSAGE,
    MISSING_CREDENTIALS_MESSAGE, UNAVAILABLE_MESSAGE,
};
use amortize_core::amortization::{calculate_loan, LoanInput, LoanResult};
use rust_decimal_macros::dec;

/// Advisor double that replays a fixed outcome and records the prompt it saw.
struct CannedAdvisor {
    reply: fn() -> Result<String, AdvisoryError>,
    seen: Mutex<Vec<String>>,
}

impl CannedAdvisor {
    fn new(reply: fn() -> Result<String, AdvisoryError>) -> Self {
        Self {
            reply,
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl LoanAdvisor for CannedAdvisor {
    async fn advise(&self, prompt: &str) -> Result<String, AdvisoryError> {
        self.seen.lock().unwrap().push(prompt.to_string());
        (self.reply)()
    }
}

fn mortgage() -> (LoanInput, LoanResult) {
    let input = LoanInput::new(dec!(100000), dec!(6), dec!(30));
    let result = calculate_loan(&input).unwrap();
    (input, result)
}

#[test]
fn test_prompt_contains_loan_figures() {
    let (input, result) = mortgage();
    let prompt = build_advice_prompt(&input, &result);

    assert!(prompt.contains("Loan amount: $100,000.00"));
    assert!(prompt.contains("Annual interest rate: 6%"));
    assert!(prompt.contains("Term: 30 years"));
    assert!(prompt.contains("Monthly payment: $599.55"));
    assert!(prompt.contains("Total interest payable: $115,838.19"));
    assert!(prompt.contains("Total cost of the loan: $215,838.19"));
}

#[test]
fn test_prompt_keeps_fractional_rate() {
    let input = LoanInput::new(dec!(8000), dec!(5.50), dec!(2.5));
    let result = calculate_loan(&input).unwrap();
    let prompt = build_advice_prompt(&input, &result);

    assert!(prompt.contains("Annual interest rate: 5.5%"));
    assert!(prompt.contains("Term: 2.5 years"));
}

#[tokio::test]
async fn test_request_advice_returns_advisor_text() {
    let (input, result) = mortgage();
    let advisor = CannedAdvisor::new(|| Ok("Consider a 15-year term.".to_string()));

    let advice = request_advice(&advisor, &input, &result).await;

    assert_eq!(advice, "Consider a 15-year term.");
    let seen = advisor.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], build_advice_prompt(&input, &result));
}

#[tokio::test]
async fn test_request_advice_missing_credentials_fallback() {
    let (input, result) = mortgage();
    let advisor = CannedAdvisor::new(|| Err(AdvisoryError::MissingCredentials));

    let advice = request_advice(&advisor, &input, &result).await;
    assert_eq!(advice, MISSING_CREDENTIALS_MESSAGE);
}

#[tokio::test]
async fn test_request_advice_unavailable_fallback() {
    let (input, result) = mortgage();
    let advisor =
        CannedAdvisor::new(|| Err(AdvisoryError::Unavailable("connection refused".into())));

    let advice = request_advice(&advisor, &input, &result).await;
    assert_eq!(advice, UNAVAILABLE_MESSAGE);
}

#[tokio::test]
async fn test_request_advice_blank_response_fallback() {
    let (input, result) = mortgage();
    let advisor = CannedAdvisor::new(|| Ok("   \n".to_string()));

    let advice = request_advice(&advisor, &input, &result).await;
    assert_eq!(advice, EMPTY_RESPONSE_MESSAGE);
}

#[tokio::test]
async fn test_advice_does_not_alter_result() {
    let (input, result) = mortgage();
    let before = result.clone();
    let advisor = CannedAdvisor::new(|| Err(AdvisoryError::EmptyResponse));

    let _ = request_advice(&advisor, &input, &result).await;
    assert_eq!(result, before);
}

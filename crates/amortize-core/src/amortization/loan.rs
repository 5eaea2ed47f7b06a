//! Fixed-payment loan amortization.
//!
//! Computes the level monthly payment for a fully amortizing loan with
//! monthly compounding, the aggregate payback and interest totals, and a
//! yearly schedule built by walking the loan month by month. Each month's
//! interest accrues on the balance left by the previous month, so the
//! schedule follows the actual compounding path; cents rounding is applied
//! only when a year is emitted. All math uses `rust_decimal::Decimal`.

use log::debug;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AmortizeError;
use crate::time_value::{annuity_payment, compound_factor};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate, Years};
use crate::AmortizeResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: u32 = 12;
const MONTHS_PER_YEAR_DEC: Decimal = dec!(12);
const PERCENT_DIVISOR: Decimal = dec!(100);
const CENTS_DP: u32 = 2;
/// Longest accepted loan term.
pub const MAX_TERM_YEARS: Decimal = dec!(100);
/// Largest accepted (1 + r)^n. Beyond this, 28-digit rounding in the payment
/// compounds into cent-level errors in the schedule.
pub const MAX_COMPOUND_FACTOR: Decimal = dec!(1_000_000_000_000_000);

const METHODOLOGY: &str =
    "Fixed-payment annuity amortization (monthly compounding, monthly payments)";

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// Terms of a fixed-rate, fully amortizing loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    /// Principal borrowed.
    pub amount: Money,
    /// Nominal annual interest rate in percent (5.5 = 5.5%).
    pub rate: Percent,
    /// Loan term in years. Must cover a whole number of months.
    pub years: Years,
}

impl LoanInput {
    pub fn new(amount: Money, rate: Percent, years: Years) -> Self {
        Self {
            amount,
            rate,
            years,
        }
    }

    /// Periodic rate applied each month (rate / 100 / 12).
    pub fn monthly_rate(&self) -> Rate {
        self.rate / PERCENT_DIVISOR / MONTHS_PER_YEAR_DEC
    }
}

/// Payment totals and the yearly schedule for a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    /// Level amount due every month.
    pub monthly_payment: Money,
    /// Sum of every monthly payment over the term.
    pub total_payment: Money,
    /// total_payment - amount.
    pub total_interest: Money,
    /// One entry per year of the term, chronological.
    pub amortization_schedule: Vec<AmortizationYear>,
}

impl LoanResult {
    /// Principal repaid across all schedule entries.
    pub fn schedule_principal_total(&self) -> Money {
        self.amortization_schedule.iter().map(|y| y.principal).sum()
    }
}

/// A single year in the amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationYear {
    /// 1-based year number.
    pub year: u32,
    /// Interest paid during the year, rounded to cents.
    pub interest: Money,
    /// Principal repaid during the year, rounded to cents.
    pub principal: Money,
    /// Outstanding principal at year end, rounded to cents, never negative.
    pub balance: Money,
    /// Payments aggregated into this entry. 12 except for a trailing
    /// partial year.
    pub months: u32,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the monthly payment, totals and yearly schedule for a loan.
pub fn calculate_loan(input: &LoanInput) -> AmortizeResult<LoanResult> {
    let term_months = validate_loan_input(input)?;
    let monthly_rate = input.monthly_rate();

    let monthly_payment = annuity_payment(input.amount, monthly_rate, term_months)?;

    // A zero-rate loan repays exactly the principal; avoid reintroducing the
    // remainder of amount / months through the multiplication.
    let total_payment = if monthly_rate.is_zero() {
        input.amount
    } else {
        monthly_payment
            .checked_mul(Decimal::from(term_months))
            .ok_or_else(|| AmortizeError::Overflow {
                context: "total payment".into(),
            })?
    };
    let total_interest = total_payment - input.amount;

    let amortization_schedule = if monthly_rate.is_zero() {
        build_straight_line_schedule(input.amount, input.years, term_months)
    } else {
        build_schedule(input.amount, monthly_rate, monthly_payment, term_months)?
    };

    debug!(
        "amortized {} at {}% over {} months: payment {}, interest {}",
        input.amount, input.rate, term_months, monthly_payment, total_interest
    );

    Ok(LoanResult {
        monthly_payment,
        total_payment,
        total_interest,
        amortization_schedule,
    })
}

/// [`calculate_loan`] wrapped in the standard computation envelope.
pub fn amortize_loan(input: &LoanInput) -> AmortizeResult<ComputationOutput<LoanResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = calculate_loan(input)?;

    if input.rate.is_zero() {
        warnings.push("Zero interest rate: payments repay principal only".into());
    }
    if let Some(last) = result.amortization_schedule.last() {
        if last.months < MONTHS_PER_YEAR {
            warnings.push(format!(
                "Final schedule year {} covers {} of 12 months",
                last.year, last.months
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(METHODOLOGY, input, warnings, elapsed, result))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check the loan terms and return the term in months.
fn validate_loan_input(input: &LoanInput) -> AmortizeResult<u32> {
    if input.amount <= Decimal::ZERO {
        return Err(AmortizeError::InvalidAmount(input.amount));
    }
    if input.rate < Decimal::ZERO {
        return Err(AmortizeError::InvalidRate(input.rate));
    }
    if input.years <= Decimal::ZERO {
        return Err(AmortizeError::InvalidTerm {
            years: input.years,
            reason: "term must be positive".into(),
        });
    }
    if input.years > MAX_TERM_YEARS {
        return Err(AmortizeError::InvalidTerm {
            years: input.years,
            reason: format!("term cannot exceed {MAX_TERM_YEARS} years"),
        });
    }

    let months = input.years * MONTHS_PER_YEAR_DEC;
    if !months.fract().is_zero() {
        return Err(AmortizeError::InvalidTerm {
            years: input.years,
            reason: "term must be a whole number of months".into(),
        });
    }

    let term_months = months.to_u32().ok_or_else(|| AmortizeError::InvalidTerm {
        years: input.years,
        reason: "term in months is out of range".into(),
    })?;

    let within_precision = compound_factor(input.monthly_rate(), term_months)
        .map(|factor| factor <= MAX_COMPOUND_FACTOR)
        .unwrap_or(false);
    if !within_precision {
        return Err(AmortizeError::InvalidTerm {
            years: input.years,
            reason: format!(
                "{}% compounded monthly over this term exceeds a growth factor of {}",
                input.rate, MAX_COMPOUND_FACTOR
            ),
        });
    }

    Ok(term_months)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Walk the loan month by month, emitting one entry per 12 payments and a
/// final entry for any trailing partial year. The last payment retires
/// whatever balance remains.
fn build_schedule(
    amount: Money,
    monthly_rate: Rate,
    monthly_payment: Money,
    term_months: u32,
) -> AmortizeResult<Vec<AmortizationYear>> {
    let mut schedule = Vec::with_capacity(term_months.div_ceil(MONTHS_PER_YEAR) as usize);
    let mut balance = amount;
    let mut yearly_interest = Decimal::ZERO;
    let mut yearly_principal = Decimal::ZERO;
    let mut months_in_year = 0u32;

    for month in 1..=term_months {
        let interest_for_month =
            balance
                .checked_mul(monthly_rate)
                .ok_or_else(|| AmortizeError::Overflow {
                    context: format!("interest for month {month}"),
                })?;
        let principal_for_month = if month == term_months {
            balance
        } else {
            monthly_payment - interest_for_month
        };

        balance -= principal_for_month;
        yearly_interest += interest_for_month;
        yearly_principal += principal_for_month;
        months_in_year += 1;

        if month % MONTHS_PER_YEAR == 0 || month == term_months {
            schedule.push(AmortizationYear {
                year: month.div_ceil(MONTHS_PER_YEAR),
                interest: round_cents(yearly_interest),
                principal: round_cents(yearly_principal),
                balance: floor_at_zero(round_cents(balance)),
                months: months_in_year,
            });
            yearly_interest = Decimal::ZERO;
            yearly_principal = Decimal::ZERO;
            months_in_year = 0;
        }
    }

    Ok(schedule)
}

/// Zero-rate schedule: every full year repays `amount / years` and leaves
/// `amount - (amount / years) * i` outstanding, unrounded. A trailing
/// partial year repays the remainder.
fn build_straight_line_schedule(
    amount: Money,
    years: Years,
    term_months: u32,
) -> Vec<AmortizationYear> {
    let full_years = term_months / MONTHS_PER_YEAR;
    let trailing_months = term_months % MONTHS_PER_YEAR;
    let principal_per_year = amount / years;

    let mut schedule: Vec<AmortizationYear> = (1..=full_years)
        .map(|year| AmortizationYear {
            year,
            interest: Decimal::ZERO,
            principal: principal_per_year,
            balance: floor_at_zero(amount - principal_per_year * Decimal::from(year)),
            months: MONTHS_PER_YEAR,
        })
        .collect();

    if trailing_months > 0 {
        schedule.push(AmortizationYear {
            year: full_years + 1,
            interest: Decimal::ZERO,
            principal: floor_at_zero(amount - principal_per_year * Decimal::from(full_years)),
            balance: Decimal::ZERO,
            months: trailing_months,
        });
    }

    schedule
}

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CENTS_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamp residual drift below zero (including -0.00) to zero.
fn floor_at_zero(value: Decimal) -> Decimal {
    if value > Decimal::ZERO {
        value
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn loan(amount: Decimal, rate: Decimal, years: Decimal) -> LoanInput {
        LoanInput::new(amount, rate, years)
    }

    #[test]
    fn test_monthly_rate_from_percent() {
        assert_eq!(loan(dec!(1000), dec!(6), dec!(1)).monthly_rate(), dec!(0.005));
        assert_eq!(loan(dec!(1000), dec!(12), dec!(1)).monthly_rate(), dec!(0.01));
    }

    #[test]
    fn test_validate_returns_term_months() {
        assert_eq!(validate_loan_input(&loan(dec!(1), dec!(5), dec!(30))).unwrap(), 360);
        assert_eq!(validate_loan_input(&loan(dec!(1), dec!(5), dec!(2.5))).unwrap(), 30);
        assert_eq!(validate_loan_input(&loan(dec!(1), dec!(5), dec!(0.25))).unwrap(), 3);
    }

    #[test]
    fn test_validate_rejects_partial_months() {
        let err = validate_loan_input(&loan(dec!(1000), dec!(5), dec!(1.05))).unwrap_err();
        match err {
            AmortizeError::InvalidTerm { years, reason } => {
                assert_eq!(years, dec!(1.05));
                assert!(reason.contains("whole number of months"));
            }
            other => panic!("Expected InvalidTerm, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_excessive_term() {
        let err = validate_loan_input(&loan(dec!(1000), dec!(5), dec!(101))).unwrap_err();
        assert!(matches!(err, AmortizeError::InvalidTerm { .. }));
        assert!(validate_loan_input(&loan(dec!(1000), dec!(5), dec!(100))).is_ok());
    }

    #[test]
    fn test_validate_rejects_runaway_compounding() {
        // (1 + 1/12)^1200 is far past the growth factor cap, and past Decimal range
        let err = validate_loan_input(&loan(dec!(100000), dec!(100), dec!(100))).unwrap_err();
        match err {
            AmortizeError::InvalidTerm { years, reason } => {
                assert_eq!(years, dec!(100));
                assert!(reason.contains("growth factor"));
            }
            other => panic!("Expected InvalidTerm, got {other:?}"),
        }

        // 36% over 100 years compounds to ~2.5e15
        let err = validate_loan_input(&loan(dec!(100000), dec!(36), dec!(100))).unwrap_err();
        assert!(matches!(err, AmortizeError::InvalidTerm { .. }));
        assert!(validate_loan_input(&loan(dec!(100000), dec!(36), dec!(60))).is_ok());
    }

    #[test]
    fn test_round_cents_midpoint_away_from_zero() {
        assert_eq!(round_cents(dec!(1.005)), dec!(1.01));
        assert_eq!(round_cents(dec!(1.0049)), dec!(1.00));
        assert_eq!(round_cents(dec!(-1.005)), dec!(-1.01));
    }

    #[test]
    fn test_floor_at_zero_clears_negative_zero() {
        let rounded = round_cents(dec!(-0.0000001));
        let floored = floor_at_zero(rounded);
        assert_eq!(floored, Decimal::ZERO);
        assert!(!floored.is_sign_negative());
        assert_eq!(floored.to_string(), "0");
        assert_eq!(floor_at_zero(dec!(12.34)), dec!(12.34));
    }

    #[test]
    fn test_straight_line_schedule_emits_partial_year() {
        let schedule = build_straight_line_schedule(dec!(12000), dec!(2.5), 30);
        let months: Vec<u32> = schedule.iter().map(|y| y.months).collect();
        assert_eq!(months, vec![12, 12, 6]);
        assert_eq!(schedule[0].principal, dec!(4800));
        assert_eq!(schedule[1].balance, dec!(2400));
        assert_eq!(schedule[2].year, 3);
        assert_eq!(schedule[2].principal, dec!(2400));
        assert_eq!(schedule[2].balance, Decimal::ZERO);
    }

    #[test]
    fn test_build_schedule_last_payment_retires_balance() {
        // Underpay by a cent a month: the final payment absorbs the shortfall
        let payment = annuity_payment(dec!(1000), dec!(0.01), 12).unwrap() - dec!(0.01);
        let schedule = build_schedule(dec!(1000), dec!(0.01), payment, 12).unwrap();

        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].principal, dec!(1000));
        assert_eq!(schedule[0].balance, Decimal::ZERO);
    }

    #[test]
    fn test_amortize_loan_envelope_warnings() {
        let out = amortize_loan(&loan(dec!(12000), dec!(0), dec!(2.5))).unwrap();
        assert_eq!(out.methodology, METHODOLOGY);
        assert_eq!(out.warnings.len(), 2);
        assert!(out.warnings[0].contains("Zero interest rate"));
        assert!(out.warnings[1].contains("covers 6 of 12 months"));
        assert_eq!(out.assumptions["amount"], "12000");
    }

    #[test]
    fn test_amortize_loan_no_warnings_for_standard_loan() {
        let out = amortize_loan(&loan(dec!(200000), dec!(4.5), dec!(15))).unwrap();
        assert!(out.warnings.is_empty());
        assert_eq!(out.result.amortization_schedule.len(), 15);
    }
}

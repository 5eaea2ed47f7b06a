use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::AmortizeError;
use crate::types::{Money, Rate};
use crate::AmortizeResult;

/// Compound growth factor (1 + r)^n
pub fn compound_factor(rate: Rate, periods: u32) -> AmortizeResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powu(u64::from(periods))
        .ok_or_else(|| AmortizeError::Overflow {
            context: format!("compound factor (1 + {rate})^{periods}"),
        })
}

/// Level payment that fully retires `principal` after `periods` payments
/// at `rate` per period.
///
/// M = P · r(1 + r)^n / ((1 + r)^n − 1), or P / n when r is zero.
pub fn annuity_payment(principal: Money, rate: Rate, periods: u32) -> AmortizeResult<Money> {
    if periods == 0 {
        return Err(AmortizeError::DivisionByZero {
            context: "annuity payment over zero periods".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(periods));
    }

    let factor = compound_factor(rate, periods)?;
    let denominator = factor - Decimal::ONE;

    if denominator.is_zero() {
        return Err(AmortizeError::DivisionByZero {
            context: "annuity factor".into(),
        });
    }

    principal
        .checked_mul(rate)
        .and_then(|p| p.checked_mul(factor / denominator))
        .ok_or_else(|| AmortizeError::Overflow {
            context: "annuity payment".into(),
        })
}

/// Outstanding principal after `elapsed` level payments.
///
/// B_k = P(1 + r)^k − M((1 + r)^k − 1) / r
pub fn remaining_balance(
    principal: Money,
    rate: Rate,
    payment: Money,
    elapsed: u32,
) -> AmortizeResult<Money> {
    let overflow = || AmortizeError::Overflow {
        context: format!("remaining balance after {elapsed} payments"),
    };

    if rate.is_zero() {
        return payment
            .checked_mul(Decimal::from(elapsed))
            .and_then(|paid| principal.checked_sub(paid))
            .ok_or_else(overflow);
    }

    let factor = compound_factor(rate, elapsed)?;
    let grown = principal.checked_mul(factor).ok_or_else(overflow)?;
    let repaid = payment
        .checked_mul((factor - Decimal::ONE) / rate)
        .ok_or_else(overflow)?;
    grown.checked_sub(repaid).ok_or_else(overflow)
}

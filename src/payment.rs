//! Level-payment primitives shared by the solvers.
//!
//! Rates are annual percentages (`7.0` means 7%) and compound monthly.

use serde::{Deserialize, Serialize};

use crate::error::{InvalidInputError, MathResult};

pub const MONTHS_PER_YEAR: u32 = 12;

/// A fixed-rate loan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount owed.
    pub principal: f64,
    /// Annual nominal rate as a percentage.
    pub annual_rate: f64,
    pub term_years: u32,
}

impl LoanTerms {
    pub fn new(principal: f64, annual_rate: f64, term_years: u32) -> Self {
        Self {
            principal,
            annual_rate,
            term_years,
        }
    }

    /// Number of scheduled monthly payments.
    pub fn total_payments(&self) -> MathResult<u32> {
        self.term_years
            .checked_mul(MONTHS_PER_YEAR)
            .ok_or(InvalidInputError::TermTooLong)
    }

    pub fn monthly_rate(&self) -> f64 {
        monthly_rate(self.annual_rate)
    }

    pub fn level_payment(&self) -> MathResult<f64> {
        level_payment(self.principal, self.annual_rate, self.term_years)
    }

    /// Balance still owed once `months_paid` scheduled payments have been made.
    pub fn remaining_balance(&self, months_paid: u32) -> MathResult<f64> {
        remaining_balance(self.principal, self.annual_rate, self.term_years, months_paid)
    }
}

/// Converts an annual percentage rate into a monthly fractional rate.
pub fn monthly_rate(annual_rate: f64) -> f64 {
    annual_rate / 100.0 / MONTHS_PER_YEAR as f64
}

/// Level payment per unit of principal for the given rate and term.
///
/// For monthly rate `r` over `n` payments this is `r(1+r)^n / ((1+r)^n - 1)`,
/// or `1/n` when the rate is zero.
pub fn amortization_factor(annual_rate: f64, term_years: u32) -> MathResult<f64> {
    if term_years == 0 {
        return Err(InvalidInputError::ZeroLoanTerm);
    }

    let r = monthly_rate(annual_rate);
    let n = f64::from(term_years) * f64::from(MONTHS_PER_YEAR);

    if r == 0.0 {
        return Ok(1.0 / n);
    }

    let growth = (1.0 + r).powf(n);
    if growth.is_infinite() {
        // interest-only in the limit
        return Ok(r);
    }
    Ok(r * growth / (growth - 1.0))
}

/// Monthly principal-and-interest payment that retires `principal` exactly
/// on the last scheduled month.
pub fn level_payment(principal: f64, annual_rate: f64, term_years: u32) -> MathResult<f64> {
    Ok(principal * amortization_factor(annual_rate, term_years)?)
}

/// Closed-form balance after `months_paid` level payments.
///
/// Zero once every scheduled payment has been made.
pub fn remaining_balance(
    principal: f64,
    annual_rate: f64,
    term_years: u32,
    months_paid: u32,
) -> MathResult<f64> {
    if term_years == 0 {
        return Err(InvalidInputError::ZeroLoanTerm);
    }

    let total = u64::from(term_years) * u64::from(MONTHS_PER_YEAR);
    let months_paid = u64::from(months_paid);
    if months_paid >= total {
        return Ok(0.0);
    }

    let r = monthly_rate(annual_rate);
    if r == 0.0 {
        let remaining = (total - months_paid) as f64;
        return Ok(principal * (remaining / total as f64));
    }

    let growth_total = (1.0 + r).powf(total as f64);
    let growth_paid = (1.0 + r).powf(months_paid as f64);
    if growth_total.is_infinite() {
        return Ok(principal);
    }
    Ok(principal * (growth_total - growth_paid) / (growth_total - 1.0))
}

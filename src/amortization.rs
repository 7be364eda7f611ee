//! Month-by-month amortization of a fixed-rate loan with optional extra
//! principal.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{InvalidInputError, MathResult};
use crate::payment::{LoanTerms, MONTHS_PER_YEAR};

/// A balance at or below the scheduled principal plus this much is paid off
/// in the current month.
const PAYOFF_TOLERANCE: f64 = 0.005;

/// Upper bound on rows reserved up front.
const PREALLOCATED_ROWS: u32 = 50 * MONTHS_PER_YEAR;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based.
    pub month: u32,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    /// Balance after this month's payment.
    pub remaining_balance: f64,
}

/// Builds the full payment schedule for `loan`, applying `extra_principal`
/// on top of the level payment every month.
///
/// A loan of zero or less yields an empty schedule. The final payment is
/// trimmed to whatever balance is left. The schedule is cut off after twice
/// the nominal number of payments, in which case the last row still carries
/// a balance.
pub fn amortize(loan: &LoanTerms, extra_principal: f64) -> MathResult<Vec<AmortizationRow>> {
    if loan.principal <= 0.0 {
        return Ok(Vec::new());
    }

    let level = loan.level_payment()?;
    let rate = loan.monthly_rate();
    let total = loan.total_payments()?;
    let max_months = total
        .checked_mul(2)
        .ok_or(InvalidInputError::TermTooLong)?;

    let mut rows = Vec::with_capacity(total.min(PREALLOCATED_ROWS) as usize);
    let mut balance = loan.principal;

    for month in 1..=max_months {
        let interest = balance * rate;
        let principal = level - interest + extra_principal;

        if balance <= principal + PAYOFF_TOLERANCE {
            rows.push(AmortizationRow {
                month,
                payment: balance + interest,
                principal: balance,
                interest,
                remaining_balance: 0.0,
            });
            debug!("loan of {:.2} paid off in month {month}", loan.principal);
            return Ok(rows);
        }

        balance -= principal;
        rows.push(AmortizationRow {
            month,
            payment: level + extra_principal,
            principal,
            interest,
            remaining_balance: balance,
        });
    }

    warn!(
        "schedule truncated at {max_months} months with {balance:.2} still owed (extra principal {extra_principal:.2})"
    );
    Ok(rows)
}

/// Sums over a schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTotals {
    pub months: u32,
    pub total_paid: f64,
    pub total_principal: f64,
    pub total_interest: f64,
    /// The last row reaches a zero balance. An empty schedule counts as paid.
    pub paid_off: bool,
}

impl ScheduleTotals {
    pub fn from_rows(rows: &[AmortizationRow]) -> Self {
        let mut totals = rows.iter().fold(Self::default(), |mut acc, row| {
            acc.total_paid += row.payment;
            acc.total_principal += row.principal;
            acc.total_interest += row.interest;
            acc
        });
        totals.months = rows.len() as u32;
        totals.paid_off = rows
            .last()
            .map_or(true, |row| row.remaining_balance.abs() <= PAYOFF_TOLERANCE);
        totals
    }
}

//! Refinance economics: payment change, break-even point and lifetime
//! savings of rolling the remaining balance plus closing costs into a new
//! loan.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::amortization::{amortize, AmortizationRow, ScheduleTotals};
use crate::error::MathResult;
use crate::payment::LoanTerms;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefinanceInputs {
    pub original: LoanTerms,
    pub months_paid: u32,
    /// Annual rate of the new loan as a percentage.
    pub new_rate: f64,
    pub new_term_years: u32,
    /// Rolled into the new loan.
    pub closing_costs: f64,
    /// Extra principal paid every month on the new loan.
    pub extra_principal: f64,
}

/// Months until cumulative payment savings repay the closing costs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "months", rename_all = "snake_case")]
pub enum BreakEven {
    Months(f64),
    /// The new payment is not lower, so the costs are never recovered.
    Unreachable,
}

impl BreakEven {
    pub fn months(&self) -> Option<f64> {
        match *self {
            BreakEven::Months(months) => Some(months),
            BreakEven::Unreachable => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinanceResult {
    pub original_monthly_payment: f64,
    pub new_monthly_payment: f64,
    /// Original minus new. Negative when the new payment is higher.
    pub monthly_savings: f64,
    pub break_even: BreakEven,
    /// Remaining original payments minus everything paid on the new loan.
    /// Negative is a lifetime loss.
    pub lifetime_savings: f64,
    /// Balance owed on the original loan at the time of refinancing.
    pub remaining_balance: f64,
    pub new_loan: LoanTerms,
    pub schedule: Vec<AmortizationRow>,
}

impl RefinanceResult {
    pub fn schedule_totals(&self) -> ScheduleTotals {
        ScheduleTotals::from_rows(&self.schedule)
    }
}

/// Compares keeping the original loan with refinancing its remaining
/// balance.
///
/// The lifetime figure sets every payment of the new schedule against only
/// the payments left on the original loan, even when the new term runs
/// longer. Months paid past the original term count as negative payments
/// left, so the original side of that figure goes below zero.
pub fn analyze_refinance(inputs: &RefinanceInputs) -> MathResult<RefinanceResult> {
    let original = &inputs.original;
    let original_monthly_payment = original.level_payment()?;

    let remaining_payments =
        i64::from(original.total_payments()?) - i64::from(inputs.months_paid);
    let remaining_balance = if remaining_payments <= 0 {
        0.0
    } else {
        original.remaining_balance(inputs.months_paid)?
    };

    let new_loan = LoanTerms::new(
        remaining_balance + inputs.closing_costs,
        inputs.new_rate,
        inputs.new_term_years,
    );
    let new_monthly_payment = new_loan.level_payment()?;
    let monthly_savings = original_monthly_payment - new_monthly_payment;

    let break_even = if monthly_savings > 0.0 {
        BreakEven::Months(inputs.closing_costs / monthly_savings)
    } else {
        BreakEven::Unreachable
    };

    let schedule = amortize(&new_loan, inputs.extra_principal)?;
    let new_total = ScheduleTotals::from_rows(&schedule).total_paid;
    let lifetime_savings = original_monthly_payment * remaining_payments as f64 - new_total;

    debug!(
        "refinance of {remaining_balance:.2}: payment {original_monthly_payment:.2} -> {new_monthly_payment:.2}, lifetime {lifetime_savings:.2}"
    );

    Ok(RefinanceResult {
        original_monthly_payment,
        new_monthly_payment,
        monthly_savings,
        break_even,
        lifetime_savings,
        remaining_balance,
        new_loan,
        schedule,
    })
}

//! Solves for the down payment that brings the all-in monthly payment
//! (principal, interest, tax, insurance, HOA and, below 20% down, PMI) to a
//! target figure.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{InvalidInputError, MathResult};
use crate::payment::{amortization_factor, monthly_rate, MONTHS_PER_YEAR};

/// Equity share at or above which mortgage insurance is not charged.
pub const PMI_THRESHOLD_PERCENT: f64 = 20.0;

/// Monthly housing costs that do not depend on the loan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RecurringCosts {
    pub monthly_property_tax: f64,
    pub monthly_insurance: f64,
    pub monthly_hoa: f64,
}

impl RecurringCosts {
    /// Builds the monthly figures from annual tax and insurance amounts.
    pub fn from_annual(annual_property_tax: f64, annual_insurance: f64, monthly_hoa: f64) -> Self {
        Self {
            monthly_property_tax: annual_property_tax / MONTHS_PER_YEAR as f64,
            monthly_insurance: annual_insurance / MONTHS_PER_YEAR as f64,
            monthly_hoa,
        }
    }

    pub fn monthly_total(&self) -> f64 {
        self.monthly_property_tax + self.monthly_insurance + self.monthly_hoa
    }
}

/// How property tax was entered on the form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum PropertyTax {
    /// Annual tax as a percentage of the home price.
    PercentOfPrice(f64),
    /// Flat annual dollar amount.
    Annual(f64),
}

impl PropertyTax {
    pub fn annual_amount(&self, home_price: f64) -> f64 {
        match *self {
            PropertyTax::PercentOfPrice(percent) => percent / 100.0 * home_price,
            PropertyTax::Annual(amount) => amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DownPaymentInputs {
    pub home_price: f64,
    /// Desired all-in monthly payment.
    pub target_monthly_payment: f64,
    /// Annual mortgage rate as a percentage.
    pub annual_rate: f64,
    pub term_years: u32,
    pub costs: RecurringCosts,
    /// Annual PMI premium as a percentage of the loan balance.
    pub pmi_rate: f64,
}

/// Result of [`solve_down_payment`].
///
/// The clamped outcomes are successes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DownPayment {
    /// The budget affords a loan at least as large as the price.
    NotRequired,
    /// At least 20% down, so no mortgage insurance.
    WithoutPmi { amount: f64, percent: f64 },
    /// Below 20% down with PMI included in the payment.
    WithPmi { amount: f64, percent: f64 },
    /// Putting exactly 20% down avoids PMI and still meets the target.
    TwentyPercent { amount: f64 },
}

impl DownPayment {
    pub fn amount(&self) -> f64 {
        match *self {
            DownPayment::NotRequired => 0.0,
            DownPayment::WithoutPmi { amount, .. }
            | DownPayment::WithPmi { amount, .. }
            | DownPayment::TwentyPercent { amount } => amount,
        }
    }

    /// Down payment as a percentage of the home price.
    pub fn percent(&self) -> f64 {
        match *self {
            DownPayment::NotRequired => 0.0,
            DownPayment::WithoutPmi { percent, .. } | DownPayment::WithPmi { percent, .. } => {
                percent
            }
            DownPayment::TwentyPercent { .. } => PMI_THRESHOLD_PERCENT,
        }
    }

    pub fn requires_pmi(&self) -> bool {
        matches!(self, DownPayment::WithPmi { .. })
    }
}

/// Finds the down payment that makes the total monthly payment equal the
/// target.
///
/// A first pass assumes no PMI. If that leaves less than 20% down, the
/// monthly PMI factor is added to the mortgage factor and the loan is
/// solved again.
pub fn solve_down_payment(inputs: &DownPaymentInputs) -> MathResult<DownPayment> {
    let price = inputs.home_price;
    if price <= 0.0 {
        return Err(InvalidInputError::NonPositiveHomePrice);
    }

    let fixed_costs = inputs.costs.monthly_total();
    if inputs.target_monthly_payment <= fixed_costs {
        return Err(InvalidInputError::TargetBelowFixedCosts);
    }

    let budget = inputs.target_monthly_payment - fixed_costs;
    let mortgage_factor = amortization_factor(inputs.annual_rate, inputs.term_years)?;

    let down_no_pmi = price - budget / mortgage_factor;
    if down_no_pmi < 0.0 {
        debug!("budget {budget:.2} covers a loan above the price, no down payment needed");
        return Ok(DownPayment::NotRequired);
    }

    let percent_no_pmi = down_no_pmi / price * 100.0;
    if percent_no_pmi >= PMI_THRESHOLD_PERCENT {
        return Ok(DownPayment::WithoutPmi {
            amount: down_no_pmi,
            percent: percent_no_pmi,
        });
    }

    debug!("{percent_no_pmi:.2}% down without PMI is under the threshold, solving with PMI");
    if inputs.pmi_rate <= 0.0 {
        return Err(InvalidInputError::PmiRateRequired);
    }

    let combined_factor = mortgage_factor + monthly_rate(inputs.pmi_rate);
    let down_with_pmi = price - budget / combined_factor;
    if down_with_pmi < 0.0 {
        return Ok(DownPayment::NotRequired);
    }

    let percent_with_pmi = down_with_pmi / price * 100.0;
    if percent_with_pmi >= PMI_THRESHOLD_PERCENT {
        debug!("PMI solve reached {percent_with_pmi:.2}%, clamping to 20% down");
        return Ok(DownPayment::TwentyPercent {
            amount: price * PMI_THRESHOLD_PERCENT / 100.0,
        });
    }

    Ok(DownPayment::WithPmi {
        amount: down_with_pmi,
        percent: percent_with_pmi,
    })
}

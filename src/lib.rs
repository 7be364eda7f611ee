//! Home-buying and refinance calculator.
//!
//! The math lives in four pure operations:
//! - [`solve_down_payment`]: down payment that meets a target all-in monthly payment
//! - [`time_to_reach_savings_goal`]: months of saving until a target balance
//! - [`amortize`]: month-by-month schedule of a fixed-rate loan
//! - [`analyze_refinance`]: payment change, break-even and lifetime savings of a refinance
//!
//! [`app`] and [`ui`] are the terminal form that feeds them.

pub mod amortization;
pub mod app;
pub mod config;
pub mod down_payment;
pub mod error;
pub mod payment;
pub mod refinance;
pub mod savings;
pub mod ui;

pub use amortization::{amortize, AmortizationRow, ScheduleTotals};
pub use config::Config;
pub use down_payment::{
    solve_down_payment, DownPayment, DownPaymentInputs, PropertyTax, RecurringCosts,
};
pub use error::{InvalidInputError, MathResult};
pub use payment::{amortization_factor, level_payment, remaining_balance, LoanTerms};
pub use refinance::{analyze_refinance, BreakEven, RefinanceInputs, RefinanceResult};
pub use savings::{
    assess_savings, time_to_reach_savings_goal, years_and_months, SavingsAssessment,
    SavingsPlan, SavingsProfile, SavingsStatus,
};

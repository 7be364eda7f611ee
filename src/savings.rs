//! Time needed to save toward a goal under monthly contributions and
//! monthly-compounded yield, and the buyer's cash position against the
//! down payment plus closing costs.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{InvalidInputError, MathResult};
use crate::payment::{monthly_rate, MONTHS_PER_YEAR};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsPlan {
    pub initial_savings: f64,
    /// Income minus expenses. May be zero or negative.
    pub monthly_contribution: f64,
    /// Annual yield as a percentage.
    pub annual_yield: f64,
}

/// Whole months until the balance reaches `target`, counting a partial
/// month as a full one.
///
/// With a non-zero yield this inverts the future value of a growing
/// annuity: `n = ln((C + T·m) / (C + P·m)) / ln(1 + m)`.
pub fn time_to_reach_savings_goal(target: f64, plan: &SavingsPlan) -> MathResult<u32> {
    let current = plan.initial_savings;
    let contribution = plan.monthly_contribution;

    if current >= target {
        return Ok(0);
    }

    if plan.annual_yield == 0.0 {
        if contribution <= 0.0 {
            return Err(InvalidInputError::GoalUnreachableWithoutGrowth);
        }
        return whole_months((target - current) / contribution);
    }

    let m = monthly_rate(plan.annual_yield);
    if contribution + current * m <= 0.0 {
        return Err(InvalidInputError::SavingsNotGrowing);
    }

    let numerator = contribution + target * m;
    let denominator = contribution + current * m;
    if denominator <= 0.0 {
        return Err(InvalidInputError::SavingsDepleting);
    }

    let ratio = numerator / denominator;
    if ratio <= 1.0 {
        return Err(InvalidInputError::GoalNotAchievable);
    }

    let months = ratio.ln() / (1.0 + m).ln();
    if !months.is_finite() || months < 0.0 {
        return Err(InvalidInputError::AnnuitySolveFailed);
    }

    debug!("savings goal {target:.2} reached after {months:.3} months");
    whole_months(months)
}

/// Rounds a partial month up to a full one.
fn whole_months(months: f64) -> MathResult<u32> {
    let months = months.ceil();
    if months > f64::from(u32::MAX) {
        return Err(InvalidInputError::GoalTooDistant);
    }
    Ok(months as u32)
}

/// Splits a month count into whole years and leftover months.
pub fn years_and_months(months: u32) -> (u32, u32) {
    (months / MONTHS_PER_YEAR, months % MONTHS_PER_YEAR)
}

/// The buyer's cash and monthly cash flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavingsProfile {
    pub current_savings: f64,
    pub checking_balance: f64,
    pub monthly_paycheck: f64,
    pub monthly_dividends: f64,
    pub other_monthly_income: f64,
    pub monthly_expenses: f64,
    /// Savings account APY as a percentage.
    pub savings_apy: f64,
}

impl Default for SavingsProfile {
    fn default() -> Self {
        Self {
            current_savings: 20_000.0,
            checking_balance: 5_000.0,
            monthly_paycheck: 5_000.0,
            monthly_dividends: 100.0,
            other_monthly_income: 0.0,
            monthly_expenses: 3_000.0,
            savings_apy: 4.5,
        }
    }
}

impl SavingsProfile {
    pub fn on_hand(&self) -> f64 {
        self.current_savings + self.checking_balance
    }

    pub fn monthly_contribution(&self) -> f64 {
        self.monthly_paycheck + self.monthly_dividends + self.other_monthly_income
            - self.monthly_expenses
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SavingsStatus {
    /// Cash on hand already covers the goal.
    Funded { surplus: f64 },
    /// Still short, and the monthly surplus closes the gap in `months_to_goal`.
    Saving {
        shortfall: f64,
        percent_remaining: f64,
        monthly_contribution: f64,
        months_to_goal: u32,
    },
    /// Still short, and expenses meet or exceed income.
    CannotSave {
        shortfall: f64,
        percent_remaining: f64,
        monthly_contribution: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsAssessment {
    pub total_needed: f64,
    pub on_hand: f64,
    pub status: SavingsStatus,
}

/// Compares cash on hand with the down payment plus closing costs and, when
/// short, estimates how long the monthly surplus takes to close the gap.
pub fn assess_savings(
    down_payment: f64,
    closing_costs: f64,
    profile: &SavingsProfile,
) -> MathResult<SavingsAssessment> {
    let total_needed = down_payment + closing_costs;
    let on_hand = profile.on_hand();
    let shortfall = total_needed - on_hand;

    let status = if shortfall <= 0.0 {
        SavingsStatus::Funded {
            surplus: -shortfall,
        }
    } else {
        let percent_remaining = if total_needed > 0.0 {
            shortfall / total_needed * 100.0
        } else {
            0.0
        };
        let monthly_contribution = profile.monthly_contribution();

        if monthly_contribution <= 0.0 {
            SavingsStatus::CannotSave {
                shortfall,
                percent_remaining,
                monthly_contribution,
            }
        } else {
            let plan = SavingsPlan {
                initial_savings: on_hand,
                monthly_contribution,
                annual_yield: profile.savings_apy,
            };
            SavingsStatus::Saving {
                shortfall,
                percent_remaining,
                monthly_contribution,
                months_to_goal: time_to_reach_savings_goal(total_needed, &plan)?,
            }
        }
    };

    Ok(SavingsAssessment {
        total_needed,
        on_hand,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn plan(initial_savings: f64, monthly_contribution: f64, annual_yield: f64) -> SavingsPlan {
        SavingsPlan {
            initial_savings,
            monthly_contribution,
            annual_yield,
        }
    }

    fn profile() -> SavingsProfile {
        SavingsProfile::default()
    }

    #[test]
    fn test_already_funded_is_zero_months() {
        assert_eq!(time_to_reach_savings_goal(100_000.0, &plan(120_000.0, 1000.0, 4.5)), Ok(0));
        assert_eq!(time_to_reach_savings_goal(100_000.0, &plan(100_000.0, -500.0, 0.0)), Ok(0));
    }

    #[test]
    fn test_zero_rate_divides_gap_by_contribution() {
        assert_eq!(time_to_reach_savings_goal(100_000.0, &plan(20_000.0, 1000.0, 0.0)), Ok(80));
        // 80,000 / 1,100 = 72.7 rounds up
        assert_eq!(time_to_reach_savings_goal(100_000.0, &plan(20_000.0, 1100.0, 0.0)), Ok(73));
    }

    #[test]
    fn test_zero_rate_without_contribution_fails() {
        assert_eq!(
            time_to_reach_savings_goal(100_000.0, &plan(20_000.0, 0.0, 0.0)),
            Err(InvalidInputError::GoalUnreachableWithoutGrowth)
        );
    }

    #[test]
    fn test_compounding_shortens_the_wait() {
        let months = time_to_reach_savings_goal(100_000.0, &plan(20_000.0, 1000.0, 4.5)).unwrap();
        assert_eq!(months, 66);
    }

    #[test]
    fn test_interest_can_outrun_a_small_withdrawal() {
        // 20,000 at 0.375% a month earns 75, more than the 50 drawn
        let months = time_to_reach_savings_goal(100_000.0, &plan(20_000.0, -50.0, 4.5)).unwrap();
        assert_eq!(months, 686);
    }

    #[test]
    fn test_shrinking_balance_fails() {
        assert_eq!(
            time_to_reach_savings_goal(100_000.0, &plan(20_000.0, -100.0, 4.5)),
            Err(InvalidInputError::SavingsNotGrowing)
        );
        assert_eq!(
            time_to_reach_savings_goal(100_000.0, &plan(0.0, 0.0, 4.5)),
            Err(InvalidInputError::SavingsNotGrowing)
        );
    }

    #[test]
    fn test_negative_yield_cannot_reach_goal() {
        assert_eq!(
            time_to_reach_savings_goal(100_000.0, &plan(20_000.0, 100.0, -1.0)),
            Err(InvalidInputError::GoalNotAchievable)
        );
    }

    #[test]
    fn test_vanishing_yield_cannot_reach_goal() {
        // The monthly rate is too small to move the ratio off one
        assert_eq!(
            time_to_reach_savings_goal(100_000.0, &plan(20_000.0, 100.0, 1e-300)),
            Err(InvalidInputError::GoalNotAchievable)
        );
    }

    #[test]
    fn test_goal_beyond_month_counter_fails() {
        assert_eq!(
            time_to_reach_savings_goal(1e9, &plan(0.0, 1e-6, 0.0)),
            Err(InvalidInputError::GoalTooDistant)
        );
        assert_eq!(
            time_to_reach_savings_goal(1e9, &plan(0.0, 1e-6, 1e-9)),
            Err(InvalidInputError::GoalTooDistant)
        );
    }

    #[test]
    fn test_years_and_months_split() {
        assert_eq!(years_and_months(0), (0, 0));
        assert_eq!(years_and_months(66), (5, 6));
        assert_eq!(years_and_months(24), (2, 0));
    }

    #[test]
    fn test_assess_savings_funded() {
        let assessment = assess_savings(10_000.0, 5_000.0, &profile()).unwrap();
        assert_relative_eq!(assessment.total_needed, 15_000.0);
        assert_relative_eq!(assessment.on_hand, 25_000.0);
        assert_eq!(assessment.status, SavingsStatus::Funded { surplus: 10_000.0 });
    }

    #[test]
    fn test_assess_savings_short() {
        let assessment = assess_savings(100_000.0, 10_000.0, &profile()).unwrap();
        match assessment.status {
            SavingsStatus::Saving {
                shortfall,
                percent_remaining,
                monthly_contribution,
                months_to_goal,
            } => {
                assert_relative_eq!(shortfall, 85_000.0);
                assert_relative_eq!(percent_remaining, 85_000.0 / 110_000.0 * 100.0);
                assert_relative_eq!(monthly_contribution, 2_100.0);
                let expected = time_to_reach_savings_goal(
                    110_000.0,
                    &plan(25_000.0, 2_100.0, 4.5),
                )
                .unwrap();
                assert_eq!(months_to_goal, expected);
            }
            other => panic!("expected Saving, got {:?}", other),
        }
    }

    #[test]
    fn test_assess_savings_cannot_save() {
        let mut profile = profile();
        profile.monthly_expenses = 5_100.0;
        let assessment = assess_savings(100_000.0, 10_000.0, &profile).unwrap();
        assert!(matches!(assessment.status, SavingsStatus::CannotSave { .. }));
    }
}

use approx::{assert_abs_diff_eq, assert_relative_eq};
use homebuyer_refi::{
    amortization_factor, amortize, analyze_refinance, solve_down_payment,
    time_to_reach_savings_goal, BreakEven, DownPayment, DownPaymentInputs, InvalidInputError,
    LoanTerms, RecurringCosts, RefinanceInputs, SavingsPlan, ScheduleTotals,
};

fn purchase(target: f64) -> DownPaymentInputs {
    DownPaymentInputs {
        home_price: 500_000.0,
        target_monthly_payment: target,
        annual_rate: 7.0,
        term_years: 30,
        costs: RecurringCosts::from_annual(6_000.0, 1_200.0, 50.0),
        pmi_rate: 0.5,
    }
}

fn refinance() -> RefinanceInputs {
    RefinanceInputs {
        original: LoanTerms::new(300_000.0, 6.5, 30),
        months_paid: 24,
        new_rate: 5.5,
        new_term_years: 30,
        closing_costs: 5_000.0,
        extra_principal: 0.0,
    }
}

#[test]
fn test_down_payment_matches_factor_derivation() {
    let result = solve_down_payment(&purchase(3_000.0)).unwrap();

    let factor = amortization_factor(7.0, 30).unwrap();
    let budget = 3_000.0 - (500.0 + 100.0 + 50.0);
    let expected = 500_000.0 - budget / factor;

    // Over 20% down is reachable here without mortgage insurance.
    assert!(matches!(result, DownPayment::WithoutPmi { .. }));
    assert_relative_eq!(result.amount(), expected, max_relative = 1e-12);
    assert_relative_eq!(result.percent(), expected / 500_000.0 * 100.0, max_relative = 1e-12);
}

#[test]
fn test_down_payment_never_rises_with_target() {
    let mut previous = f64::INFINITY;
    let mut target = 700.0;
    while target <= 6_000.0 {
        let down = solve_down_payment(&purchase(target)).unwrap().amount();
        assert!(
            down <= previous + 1e-9,
            "target {} gave {} after {}",
            target,
            down,
            previous
        );
        previous = down;
        target += 25.0;
    }
}

#[test]
fn test_pmi_outcomes_stay_at_or_below_twenty_percent() {
    let mut target = 700.0;
    while target <= 6_000.0 {
        match solve_down_payment(&purchase(target)).unwrap() {
            DownPayment::WithPmi { percent, .. } => assert!((0.0..20.0).contains(&percent)),
            DownPayment::TwentyPercent { amount } => assert_eq!(amount, 100_000.0),
            DownPayment::WithoutPmi { percent, .. } => assert!((20.0..100.0).contains(&percent)),
            DownPayment::NotRequired => {}
        }
        target += 25.0;
    }
}

#[test]
fn test_boundary_failures() {
    assert_eq!(
        solve_down_payment(&purchase(650.0)),
        Err(InvalidInputError::TargetBelowFixedCosts)
    );

    let mut no_pmi = purchase(3_350.0);
    no_pmi.pmi_rate = 0.0;
    assert_eq!(solve_down_payment(&no_pmi), Err(InvalidInputError::PmiRateRequired));
}

#[test]
fn test_savings_scenarios() {
    let plan = SavingsPlan {
        initial_savings: 20_000.0,
        monthly_contribution: 1_000.0,
        annual_yield: 0.0,
    };
    assert_eq!(time_to_reach_savings_goal(100_000.0, &plan), Ok(80));

    for (contribution, apy) in [(1_000.0, 0.0), (-5_000.0, 4.5), (0.0, 0.0), (250.0, 12.0)] {
        let funded = SavingsPlan {
            initial_savings: 120_000.0,
            monthly_contribution: contribution,
            annual_yield: apy,
        };
        assert_eq!(time_to_reach_savings_goal(100_000.0, &funded), Ok(0));
    }
}

#[test]
fn test_schedules_reach_zero_within_bounds() {
    for principal in [1_000.0, 85_000.0, 450_000.0] {
        for rate in [0.0, 3.25, 7.0, 12.5] {
            for years in [10, 15, 20, 30] {
                for extra in [0.0, 150.0, 2_000.0] {
                    let loan = LoanTerms::new(principal, rate, years);
                    let rows = amortize(&loan, extra).unwrap();
                    let nominal = (years * 12) as usize;

                    assert!(!rows.is_empty() && rows.len() <= 2 * nominal);
                    assert!(rows.len() <= nominal);
                    assert_abs_diff_eq!(rows.last().unwrap().remaining_balance, 0.0);
                    assert_relative_eq!(
                        ScheduleTotals::from_rows(&rows).total_principal,
                        principal,
                        max_relative = 1e-9
                    );
                }
            }
        }
    }
}

#[test]
fn test_refinance_scenario() {
    let result = analyze_refinance(&refinance()).unwrap();

    assert!(result.monthly_savings > 0.0);
    assert_eq!(
        result.break_even,
        BreakEven::Months(5_000.0 / result.monthly_savings)
    );

    let new_total: f64 = result.schedule.iter().map(|row| row.payment).sum();
    let remaining_original = result.original_monthly_payment * (360 - 24) as f64;
    assert_relative_eq!(
        result.lifetime_savings,
        remaining_original - new_total,
        max_relative = 1e-9
    );
    assert_eq!(result.lifetime_savings > 0.0, new_total < remaining_original);
}

#[test]
fn test_longer_new_term_compares_against_remaining_payments_only() {
    // A fresh 30-year term 20 years into a 30-year loan pays more in total.
    let mut inputs = refinance();
    inputs.months_paid = 240;
    let result = analyze_refinance(&inputs).unwrap();

    assert!(result.monthly_savings > 0.0);
    assert!(result.lifetime_savings < 0.0);
}

#[test]
fn test_repeat_calls_are_identical() {
    let first = solve_down_payment(&purchase(3_350.0)).unwrap();
    let second = solve_down_payment(&purchase(3_350.0)).unwrap();
    assert_eq!(first.amount().to_bits(), second.amount().to_bits());
    assert_eq!(first.percent().to_bits(), second.percent().to_bits());

    let a = analyze_refinance(&refinance()).unwrap();
    let b = analyze_refinance(&refinance()).unwrap();
    assert_eq!(a.lifetime_savings.to_bits(), b.lifetime_savings.to_bits());
    assert_eq!(a.schedule, b.schedule);

    let plan = SavingsPlan {
        initial_savings: 25_000.0,
        monthly_contribution: 2_100.0,
        annual_yield: 4.5,
    };
    assert_eq!(
        time_to_reach_savings_goal(110_000.0, &plan),
        time_to_reach_savings_goal(110_000.0, &plan)
    );
}

#[test]
fn test_results_serialize_to_json() {
    let down = solve_down_payment(&purchase(3_350.0)).unwrap();
    let json = serde_json::to_value(down).unwrap();
    assert_eq!(json["outcome"], "twenty_percent");

    let refi = analyze_refinance(&refinance()).unwrap();
    let json = serde_json::to_value(&refi).unwrap();
    assert_eq!(json["break_even"]["kind"], "months");
    assert_eq!(json["schedule"].as_array().unwrap().len(), 360);
}

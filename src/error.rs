use thiserror::Error;

/// Raised when a calculation cannot be carried out with the inputs given.
///
/// Every variant belongs to the same recoverable "invalid input" kind; the
/// variant only records which condition failed so callers and tests can tell
/// them apart. `Display` is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidInputError {
    #[error("Target monthly payment is too low to even cover taxes, insurance, and HOA.")]
    TargetBelowFixedCosts,

    #[error("Loan term cannot be zero years.")]
    ZeroLoanTerm,

    #[error("Loan term is too long to schedule month by month.")]
    TermTooLong,

    #[error("Home price must be greater than zero.")]
    NonPositiveHomePrice,

    #[error("A down payment of less than 20% is required, but PMI rate is zero or negative.")]
    PmiRateRequired,

    #[error("With no interest and no monthly savings, goal is unreachable.")]
    GoalUnreachableWithoutGrowth,

    #[error("Savings will not grow with the current monthly contribution.")]
    SavingsNotGrowing,

    #[error("Savings will deplete over time.")]
    SavingsDepleting,

    #[error("Savings goal is not achievable with current parameters.")]
    GoalNotAchievable,

    #[error("Calculation failed. Please check savings parameters.")]
    AnnuitySolveFailed,

    #[error("Savings goal is too far away to estimate with current parameters.")]
    GoalTooDistant,
}

pub type MathResult<T> = Result<T, InvalidInputError>;

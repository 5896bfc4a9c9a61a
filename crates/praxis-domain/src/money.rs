//! Decimal helpers shared by calculators and reports.
//!
//! Nothing in the engine rounds internally; [`round_for_display`] is meant for
//! the presentation boundary only.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits shown to users.
pub const DISPLAY_SCALE: u32 = 2;

/// Rounds an amount to two decimals, midpoint away from zero.
pub fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Applies a percent rate (`19` means 19 %) to an amount.
///
/// `None` when the product leaves the `Decimal` range.
pub fn apply_rate(amount: Decimal, rate_percent: Decimal) -> Option<Decimal> {
    amount
        .checked_mul(rate_percent)?
        .checked_div(Decimal::ONE_HUNDRED)
}

/// Returns `part / whole * 100`, or `None` when `whole` is zero or the ratio overflows.
pub fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole.is_zero() {
        return None;
    }
    part.checked_div(whole)?.checked_mul(Decimal::ONE_HUNDRED)
}

/// Count based ratio in percent where an empty population counts as fully satisfied.
pub fn completion_score(completed: usize, total: usize) -> Decimal {
    if total == 0 {
        return Decimal::ONE_HUNDRED;
    }
    Decimal::from(completed as u64) * Decimal::ONE_HUNDRED / Decimal::from(total as u64)
}

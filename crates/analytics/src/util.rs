use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to `dp` decimal places with halves going away from zero, dropping
/// trailing zeros so `147.80` serializes as `147.8`.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

use rust_decimal::{Decimal, RoundingStrategy};

/// Digits shown for quantities, prices and totals.
pub const DISPLAY_SCALE: u32 = 2;

/// Renders a decimal for presentation, rounding halves away from zero.
/// Rounding happens here and nowhere else.
pub fn display_amount(value: Decimal) -> String {
    let mut rounded =
        value.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DISPLAY_SCALE);
    rounded.to_string()
}

use crate::sqrt_price_math::{
    checked_amount0_delta, checked_amount1_delta, get_amount0_delta, get_amount1_delta,
    get_next_sqrt_price_from_amount0_rounding_up, get_next_sqrt_price_from_amount1_rounding_down,
};
use soroban_sdk::{Env, U256};

/// Result of swapping within one segment between two linked ticks
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SwapSegment {
    /// The sqrt price after this segment
    pub sqrt_price_next_x96: U256,
    /// Amount of input token consumed
    pub amount_in: u128,
    /// Amount of output token produced, before fees
    pub amount_out: u128,
    /// True when the segment was consumed entirely and the target tick
    /// must be crossed
    pub cross: bool,
}

/// Compute the result of swapping `amount_remaining` within a single segment
///
/// # Arguments
/// * `zero_for_one` - True if selling token0 (price moves down)
/// * `sqrt_price_x96` - Current sqrt price
/// * `sqrt_price_target_x96` - Price of the next linked tick in the trade direction
/// * `liquidity` - Active liquidity in this segment
/// * `amount_remaining` - Input still to be swapped, non-zero
///
/// With zero liquidity the segment absorbs nothing, so the whole segment is
/// skipped and marked for crossing without output.
pub fn compute_swap_segment(
    env: &Env,
    zero_for_one: bool,
    sqrt_price_x96: &U256,
    sqrt_price_target_x96: &U256,
    liquidity: u128,
    amount_remaining: u128,
) -> SwapSegment {
    if zero_for_one {
        let max_in =
            checked_amount0_delta(env, sqrt_price_target_x96, sqrt_price_x96, liquidity, false)
                .unwrap_or(u128::MAX);

        if amount_remaining <= max_in {
            let next = get_next_sqrt_price_from_amount0_rounding_up(
                env,
                sqrt_price_x96,
                liquidity,
                amount_remaining,
            )
            .max(sqrt_price_target_x96.clone());
            let amount_out = get_amount1_delta(env, &next, sqrt_price_x96, liquidity, false);
            SwapSegment {
                sqrt_price_next_x96: next,
                amount_in: amount_remaining,
                amount_out,
                cross: false,
            }
        } else {
            SwapSegment {
                sqrt_price_next_x96: sqrt_price_target_x96.clone(),
                amount_in: max_in,
                amount_out: get_amount1_delta(
                    env,
                    sqrt_price_target_x96,
                    sqrt_price_x96,
                    liquidity,
                    false,
                ),
                cross: true,
            }
        }
    } else {
        let max_in =
            checked_amount1_delta(env, sqrt_price_x96, sqrt_price_target_x96, liquidity, false)
                .unwrap_or(u128::MAX);

        if amount_remaining <= max_in {
            let next = get_next_sqrt_price_from_amount1_rounding_down(
                env,
                sqrt_price_x96,
                liquidity,
                amount_remaining,
            )
            .min(sqrt_price_target_x96.clone());
            let amount_out = get_amount0_delta(env, sqrt_price_x96, &next, liquidity, false);
            SwapSegment {
                sqrt_price_next_x96: next,
                amount_in: amount_remaining,
                amount_out,
                cross: false,
            }
        } else {
            SwapSegment {
                sqrt_price_next_x96: sqrt_price_target_x96.clone(),
                amount_in: max_in,
                amount_out: get_amount0_delta(
                    env,
                    sqrt_price_x96,
                    sqrt_price_target_x96,
                    liquidity,
                    false,
                ),
                cross: true,
            }
        }
    }
}

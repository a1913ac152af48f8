use crate::full_math::mul_div_u256;
use crate::sqrt_price_math::{checked_amount0_delta, checked_amount1_delta};
use clamm_types::Q96;
use soroban_sdk::{Env, U256};

fn sorted<'a>(sqrt_ratio_a_x96: &'a U256, sqrt_ratio_b_x96: &'a U256) -> (&'a U256, &'a U256) {
    if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    } else {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96)
    }
}

/// Calculate liquidity from token amounts for a price range.
///
/// Saturates at `u128::MAX`; the pool's per-tick liquidity cap rejects
/// anything that large.
pub fn get_liquidity_for_amounts(
    env: &Env,
    sqrt_ratio_x96: &U256,
    sqrt_ratio_a_x96: &U256,
    sqrt_ratio_b_x96: &U256,
    amount0: u128,
    amount1: u128,
) -> u128 {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= sqrt_ratio_lower {
        // Current price below range - all token0
        get_liquidity_for_amount0(env, sqrt_ratio_lower, sqrt_ratio_upper, amount0)
    } else if sqrt_ratio_x96 < sqrt_ratio_upper {
        // Current price in range - both tokens
        let liquidity0 =
            get_liquidity_for_amount0(env, sqrt_ratio_x96, sqrt_ratio_upper, amount0);
        let liquidity1 =
            get_liquidity_for_amount1(env, sqrt_ratio_lower, sqrt_ratio_x96, amount1);
        liquidity0.min(liquidity1)
    } else {
        // Current price above range - all token1
        get_liquidity_for_amount1(env, sqrt_ratio_lower, sqrt_ratio_upper, amount1)
    }
}

/// L = amount0 * (sqrt_pa * sqrt_pb / 2^96) / (sqrt_pb - sqrt_pa)
fn get_liquidity_for_amount0(
    env: &Env,
    sqrt_ratio_lower: &U256,
    sqrt_ratio_upper: &U256,
    amount0: u128,
) -> u128 {
    let q96 = U256::from_u128(env, Q96);
    mul_div_u256(env, sqrt_ratio_lower, sqrt_ratio_upper, &q96, false)
        .and_then(|intermediate| {
            mul_div_u256(
                env,
                &U256::from_u128(env, amount0),
                &intermediate,
                &sqrt_ratio_upper.sub(sqrt_ratio_lower),
                false,
            )
        })
        .and_then(|liquidity| liquidity.to_u128())
        .unwrap_or(u128::MAX)
}

/// L = amount1 * 2^96 / (sqrt_pb - sqrt_pa)
fn get_liquidity_for_amount1(
    env: &Env,
    sqrt_ratio_lower: &U256,
    sqrt_ratio_upper: &U256,
    amount1: u128,
) -> u128 {
    U256::from_u128(env, amount1)
        .shl(96)
        .div(&sqrt_ratio_upper.sub(sqrt_ratio_lower))
        .to_u128()
        .unwrap_or(u128::MAX)
}

/// Token amounts backing `liquidity` over a price range at the current
/// price. Round up when the pool is receiving, down when it is paying.
/// `None` when an amount does not fit in u128.
pub fn get_amounts_for_liquidity(
    env: &Env,
    sqrt_ratio_x96: &U256,
    sqrt_ratio_a_x96: &U256,
    sqrt_ratio_b_x96: &U256,
    liquidity: u128,
    round_up: bool,
) -> Option<(u128, u128)> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= sqrt_ratio_lower {
        // Below range - all token0
        let amount0 =
            checked_amount0_delta(env, sqrt_ratio_lower, sqrt_ratio_upper, liquidity, round_up)?;
        Some((amount0, 0))
    } else if sqrt_ratio_x96 < sqrt_ratio_upper {
        // In range - both tokens
        let amount0 =
            checked_amount0_delta(env, sqrt_ratio_x96, sqrt_ratio_upper, liquidity, round_up)?;
        let amount1 =
            checked_amount1_delta(env, sqrt_ratio_lower, sqrt_ratio_x96, liquidity, round_up)?;
        Some((amount0, amount1))
    } else {
        // Above range - all token1
        let amount1 =
            checked_amount1_delta(env, sqrt_ratio_lower, sqrt_ratio_upper, liquidity, round_up)?;
        Some((0, amount1))
    }
}

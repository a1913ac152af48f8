use crate::custody::{credit, debit, ensure_custodied, push};
use crate::error::PoolError;
use crate::invariants::{
    fee_growth_monotonic, nearest_tick_in_bounds, price_in_bounds, protocol_fees_within_reserves,
    swap_direction_consistent, tick_crossings_bounded,
};
use crate::storage::{get_config, get_state, get_tick, set_state, MAX_TICK_CROSSINGS_PER_SWAP};
use crate::tick::cross;
use clamm_math::{compute_swap_segment, fee_growth_delta, get_sqrt_ratio_at_tick, split_swap_fee};
use clamm_types::{PoolConfig, PoolState, SwapComputation, MAX_TICK, MIN_TICK};
use soroban_sdk::{Address, Env, Symbol};

/// Execute an exact-input swap.
///
/// The input must already have been transferred to the pool: its balance of
/// the input token has to cover the input reserve plus `amount_in`. Output,
/// net of the swap fee, is sent to `recipient`.
///
/// # Arguments
/// * `zero_for_one` - True if selling token0 for token1 (price moves down)
/// * `amount_in` - Exact amount of the input token, non-zero
/// * `min_amount_out` - Fail with TooLittleReceived below this output
pub fn execute_swap(
    env: &Env,
    zero_for_one: bool,
    amount_in: u128,
    recipient: Address,
    min_amount_out: u128,
) -> Result<u128, PoolError> {
    if amount_in == 0 {
        return Err(PoolError::ZeroAmount);
    }

    let config = get_config(env)?;
    let mut state = get_state(env)?;

    let result = compute_swap(env, &config, &state, zero_for_one, amount_in)?;

    if result.amount_out < min_amount_out {
        return Err(PoolError::TooLittleReceived);
    }

    let sqrt_price_before = state.sqrt_price_x96.clone();
    let fee_growth_before = if zero_for_one {
        state.fee_growth_global_1_x128
    } else {
        state.fee_growth_global_0_x128
    };

    state.sqrt_price_x96 = result.sqrt_price_x96;
    state.nearest_tick = result.nearest_tick;
    state.liquidity = result.liquidity;

    let (token_in, token_out, reserve_in, missing) = if zero_for_one {
        state.fee_growth_global_1_x128 = result.fee_growth_global_x128;
        state.protocol_fees_1 = credit(state.protocol_fees_1, result.protocol_fee)?;
        state.reserve0 = credit(state.reserve0, amount_in)?;
        state.reserve1 = debit(state.reserve1, result.amount_out)?;
        (&config.token0, &config.token1, state.reserve0, PoolError::Token0Missing)
    } else {
        state.fee_growth_global_0_x128 = result.fee_growth_global_x128;
        state.protocol_fees_0 = credit(state.protocol_fees_0, result.protocol_fee)?;
        state.reserve1 = credit(state.reserve1, amount_in)?;
        state.reserve0 = debit(state.reserve0, result.amount_out)?;
        (&config.token1, &config.token0, state.reserve1, PoolError::Token1Missing)
    };

    debug_assert!(price_in_bounds(&state));
    debug_assert!(nearest_tick_in_bounds(&state));
    debug_assert!(swap_direction_consistent(
        zero_for_one,
        &sqrt_price_before,
        &state.sqrt_price_x96
    ));
    debug_assert!(fee_growth_monotonic(
        fee_growth_before,
        result.fee_growth_global_x128
    ));
    debug_assert!(tick_crossings_bounded(
        result.ticks_crossed,
        MAX_TICK_CROSSINGS_PER_SWAP
    ));
    debug_assert!(protocol_fees_within_reserves(&state));

    set_state(env, &state);

    ensure_custodied(env, token_in, reserve_in, missing)?;
    push(env, token_out, &recipient, result.amount_out)?;

    env.events().publish(
        (Symbol::new(env, "swap"), recipient, zero_for_one),
        (
            amount_in,
            result.amount_out,
            result.total_fee,
            result.ticks_crossed,
        ),
    );

    Ok(result.amount_out)
}

/// Walk the linked ticks in the trade direction until `amount_in` is used
/// up. Crossed ticks are updated in storage; pool state is left to the
/// caller.
fn compute_swap(
    env: &Env,
    config: &PoolConfig,
    state: &PoolState,
    zero_for_one: bool,
    amount_in: u128,
) -> Result<SwapComputation, PoolError> {
    let mut remaining = amount_in;
    let mut sqrt_price_x96 = state.sqrt_price_x96.clone();
    let mut liquidity = state.liquidity;
    let mut fee_growth_0 = state.fee_growth_global_0_x128;
    let mut fee_growth_1 = state.fee_growth_global_1_x128;
    let mut amount_out = 0u128;
    let mut total_fee = 0u128;
    let mut protocol_fee = 0u128;
    let mut ticks_crossed = 0u32;

    // The nearest tick is at or below the price, so selling token0 crosses
    // it first; buying token0 starts with its successor.
    let mut next_tick = if zero_for_one {
        state.nearest_tick
    } else {
        get_tick(env, state.nearest_tick)
            .ok_or(PoolError::TickNotLinked)?
            .next_tick
    };

    while remaining > 0 {
        let target = get_sqrt_ratio_at_tick(env, next_tick);
        let segment =
            compute_swap_segment(env, zero_for_one, &sqrt_price_x96, &target, liquidity, remaining);

        remaining -= segment.amount_in;
        sqrt_price_x96 = segment.sqrt_price_next_x96;

        if liquidity > 0 {
            let split = split_swap_fee(
                env,
                segment.amount_out,
                config.swap_fee,
                state.protocol_fee,
            );
            let growth = fee_growth_delta(env, split.lp_fee(), liquidity);
            if zero_for_one {
                fee_growth_1 = fee_growth_1.wrapping_add(growth);
            } else {
                fee_growth_0 = fee_growth_0.wrapping_add(growth);
            }

            amount_out = amount_out
                .checked_add(segment.amount_out - split.fee)
                .ok_or(PoolError::AmountOverflow)?;
            total_fee += split.fee;
            protocol_fee += split.protocol_fee;
        }

        if segment.cross {
            if next_tick == MIN_TICK || next_tick == MAX_TICK {
                return Err(PoolError::InsufficientLiquidity);
            }
            ticks_crossed += 1;
            if ticks_crossed > MAX_TICK_CROSSINGS_PER_SWAP {
                return Err(PoolError::TickCrossingLimit);
            }

            let (new_liquidity, new_next) = cross(
                env,
                next_tick,
                zero_for_one,
                config.tick_spacing,
                liquidity,
                fee_growth_0,
                fee_growth_1,
            )?;
            liquidity = new_liquidity;
            next_tick = new_next;
        }
    }

    let nearest_tick = if zero_for_one {
        next_tick
    } else {
        get_tick(env, next_tick)
            .ok_or(PoolError::TickNotLinked)?
            .previous_tick
    };

    Ok(SwapComputation {
        amount_out,
        total_fee,
        protocol_fee,
        sqrt_price_x96,
        nearest_tick,
        liquidity,
        fee_growth_global_x128: if zero_for_one {
            fee_growth_1
        } else {
            fee_growth_0
        },
        ticks_crossed,
    })
}

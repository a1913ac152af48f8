use crate::error::PoolError;
use crate::invariants::{tick_liquidity_bounded, tick_links_ordered};
use crate::storage::{get_tick, set_tick, MAX_TICK_LIST_LIMIT};
use clamm_types::{is_even_tick, PoolState, TickInfo, MAX_TICK, MIN_TICK};
use soroban_sdk::{log, Env, Vec, U256};

/// Link the two sentinels. Every other tick is inserted between them.
pub fn initialize_sentinels(env: &Env) {
    set_tick(env, MIN_TICK, &TickInfo::linked(MIN_TICK, MAX_TICK));
    set_tick(env, MAX_TICK, &TickInfo::linked(MIN_TICK, MAX_TICK));
}

/// Check a position range before anything is written.
///
/// Lower bounds must sit on an even multiple of the spacing (counted from
/// the usable minimum) and upper bounds on an odd one.
pub fn validate_range(lower: i32, upper: i32, tick_spacing: i32) -> Result<(), PoolError> {
    if lower < MIN_TICK || upper > MAX_TICK {
        return Err(PoolError::TickOutOfBounds);
    }
    if lower % tick_spacing != 0 {
        return Err(PoolError::InvalidTick);
    }
    if !is_even_tick(lower, tick_spacing) {
        return Err(PoolError::LowerEven);
    }
    if upper % tick_spacing != 0 {
        return Err(PoolError::InvalidTick);
    }
    if is_even_tick(upper, tick_spacing) {
        return Err(PoolError::UpperOdd);
    }
    if lower >= upper {
        return Err(PoolError::WrongOrder);
    }
    Ok(())
}

/// Add `amount` of liquidity to `tick`, linking it after `old` if it is new.
///
/// A newly linked tick at or below the current price becomes the nearest
/// tick when it is above the old cursor. Its outside accumulators start at
/// the global values when it ends up at or below the cursor, zero otherwise.
#[allow(clippy::too_many_arguments)]
pub fn insert(
    env: &Env,
    state: &mut PoolState,
    old: i32,
    tick: i32,
    tick_sqrt_price_x96: &U256,
    amount: u128,
    max_liquidity: u128,
    order_error: PoolError,
) -> Result<(), PoolError> {
    if let Some(mut info) = get_tick(env, tick) {
        info.liquidity = info
            .liquidity
            .checked_add(amount)
            .filter(|liquidity| *liquidity <= max_liquidity)
            .ok_or(PoolError::LiquidityOverflow)?;
        debug_assert!(tick_liquidity_bounded(info.liquidity, max_liquidity));
        set_tick(env, tick, &info);
        return Ok(());
    }

    if amount > max_liquidity {
        return Err(PoolError::LiquidityOverflow);
    }

    let mut old_info = get_tick(env, old).ok_or(order_error)?;
    let next = old_info.next_tick;
    if old >= tick || tick >= next {
        return Err(order_error);
    }
    let mut next_info = get_tick(env, next).ok_or(PoolError::TickNotLinked)?;

    old_info.next_tick = tick;
    set_tick(env, old, &old_info);
    next_info.previous_tick = tick;
    set_tick(env, next, &next_info);

    if state.nearest_tick < tick && *tick_sqrt_price_x96 <= state.sqrt_price_x96 {
        state.nearest_tick = tick;
    }

    let (outside_0, outside_1) = if tick <= state.nearest_tick {
        (state.fee_growth_global_0_x128, state.fee_growth_global_1_x128)
    } else {
        (0, 0)
    };

    set_tick(
        env,
        tick,
        &TickInfo {
            previous_tick: old,
            next_tick: next,
            liquidity: amount,
            fee_growth_outside_0_x128: outside_0,
            fee_growth_outside_1_x128: outside_1,
        },
    );

    debug_assert!(tick_links_ordered(old, tick, next));
    log!(env, "tick linked", tick, old, next);
    Ok(())
}

/// Take `amount` of liquidity off `tick`. The tick stays linked.
pub fn remove(env: &Env, tick: i32, amount: u128) -> Result<(), PoolError> {
    let mut info = get_tick(env, tick).ok_or(PoolError::TickNotLinked)?;
    info.liquidity = info
        .liquidity
        .checked_sub(amount)
        .ok_or(PoolError::InsufficientLiquidity)?;
    set_tick(env, tick, &info);
    Ok(())
}

/// Cross `tick` during a swap.
///
/// Flips both outside accumulators and applies the tick's liquidity to the
/// active liquidity: entering a range adds it, leaving one removes it. A
/// lower (even) tick is entered when the price rises through it, an upper
/// (odd) tick when the price falls through it.
///
/// Returns the new active liquidity and the next tick in the trade direction.
pub fn cross(
    env: &Env,
    tick: i32,
    zero_for_one: bool,
    tick_spacing: i32,
    liquidity: u128,
    fee_growth_global_0_x128: u128,
    fee_growth_global_1_x128: u128,
) -> Result<(u128, i32), PoolError> {
    let mut info = get_tick(env, tick).ok_or(PoolError::TickNotLinked)?;

    info.fee_growth_outside_0_x128 =
        fee_growth_global_0_x128.wrapping_sub(info.fee_growth_outside_0_x128);
    info.fee_growth_outside_1_x128 =
        fee_growth_global_1_x128.wrapping_sub(info.fee_growth_outside_1_x128);
    set_tick(env, tick, &info);

    let entering = is_even_tick(tick, tick_spacing) != zero_for_one;
    let liquidity = if entering {
        liquidity
            .checked_add(info.liquidity)
            .ok_or(PoolError::LiquidityOverflow)?
    } else {
        liquidity
            .checked_sub(info.liquidity)
            .ok_or(PoolError::InsufficientLiquidity)?
    };

    let next = if zero_for_one {
        info.previous_tick
    } else {
        info.next_tick
    };

    log!(env, "tick crossed", tick, liquidity);
    Ok((liquidity, next))
}

/// Fee growth per unit of liquidity inside `[lower, upper)`, using the
/// nearest tick as the reference for which side of each bound the price is.
pub fn range_fee_growth(
    env: &Env,
    lower: i32,
    upper: i32,
    nearest_tick: i32,
    fee_growth_global_0_x128: u128,
    fee_growth_global_1_x128: u128,
) -> Result<(u128, u128), PoolError> {
    let lower_info = get_tick(env, lower).ok_or(PoolError::TickNotLinked)?;
    let upper_info = get_tick(env, upper).ok_or(PoolError::TickNotLinked)?;

    let (below_0, below_1) = if lower <= nearest_tick {
        (
            lower_info.fee_growth_outside_0_x128,
            lower_info.fee_growth_outside_1_x128,
        )
    } else {
        (
            fee_growth_global_0_x128.wrapping_sub(lower_info.fee_growth_outside_0_x128),
            fee_growth_global_1_x128.wrapping_sub(lower_info.fee_growth_outside_1_x128),
        )
    };

    let (above_0, above_1) = if nearest_tick < upper {
        (
            upper_info.fee_growth_outside_0_x128,
            upper_info.fee_growth_outside_1_x128,
        )
    } else {
        (
            fee_growth_global_0_x128.wrapping_sub(upper_info.fee_growth_outside_0_x128),
            fee_growth_global_1_x128.wrapping_sub(upper_info.fee_growth_outside_1_x128),
        )
    };

    Ok((
        fee_growth_global_0_x128
            .wrapping_sub(below_0)
            .wrapping_sub(above_0),
        fee_growth_global_1_x128
            .wrapping_sub(below_1)
            .wrapping_sub(above_1),
    ))
}

/// Linked ticks in ascending order starting at the MIN sentinel, at most
/// `limit` of them (capped at MAX_TICK_LIST_LIMIT).
pub fn tick_list(env: &Env, limit: u32) -> Vec<i32> {
    let limit = limit.min(MAX_TICK_LIST_LIMIT);
    let mut ticks = Vec::new(env);
    let mut tick = MIN_TICK;

    while ticks.len() < limit {
        ticks.push_back(tick);
        if tick == MAX_TICK {
            break;
        }
        match get_tick(env, tick) {
            Some(info) => tick = info.next_tick,
            None => break,
        }
    }
    ticks
}

use crate::custody::{credit, debit, ensure_custodied, pull, push};
use crate::error::PoolError;
use crate::invariants::{protocol_fees_within_reserves, range_parity_valid};
use crate::storage::{get_config, get_position, get_state, set_position, set_state};
use crate::tick::{insert, range_fee_growth, remove, validate_range};
use clamm_math::{fees_owed, get_amounts_for_liquidity, get_liquidity_for_amounts, get_sqrt_ratio_at_tick};
use clamm_types::{MintParams, PoolState, PositionInfo, PositionKey};
use soroban_sdk::{Address, Env, Symbol};

fn in_range(state: &PoolState, lower: i32, upper: i32) -> bool {
    lower <= state.nearest_tick && state.nearest_tick < upper
}

/// Roll a position's fee snapshot forward.
///
/// Returns the position with its snapshot reset to the current inside fee
/// growth, along with the fees it earned since the previous snapshot.
fn settle(
    env: &Env,
    state: &PoolState,
    key: &PositionKey,
    mut position: PositionInfo,
) -> Result<(PositionInfo, u128, u128), PoolError> {
    let (inside_0, inside_1) = range_fee_growth(
        env,
        key.tick_lower,
        key.tick_upper,
        state.nearest_tick,
        state.fee_growth_global_0_x128,
        state.fee_growth_global_1_x128,
    )?;

    let fees_0 = fees_owed(
        env,
        inside_0.wrapping_sub(position.fee_growth_inside_0_last_x128),
        position.liquidity,
    );
    let fees_1 = fees_owed(
        env,
        inside_1.wrapping_sub(position.fee_growth_inside_1_last_x128),
        position.liquidity,
    );

    position.fee_growth_inside_0_last_x128 = inside_0;
    position.fee_growth_inside_1_last_x128 = inside_1;
    Ok((position, fees_0, fees_1))
}

/// Add liquidity to `[lower, upper)` for `params.position_owner`.
///
/// Liquidity is the most the desired amounts can back at the current
/// price. Fees already earned by the position are paid to
/// `params.recipient`.
///
/// Returns (liquidity, amount0, amount1) where the amounts are what the
/// pool took in.
pub fn mint(env: &Env, params: MintParams) -> Result<(u128, u128, u128), PoolError> {
    let config = get_config(env)?;
    let mut state = get_state(env)?;

    validate_range(params.lower, params.upper, config.tick_spacing)?;
    debug_assert!(range_parity_valid(params.lower, params.upper, config.tick_spacing));

    let sqrt_price_lower = get_sqrt_ratio_at_tick(env, params.lower);
    let sqrt_price_upper = get_sqrt_ratio_at_tick(env, params.upper);

    let liquidity = get_liquidity_for_amounts(
        env,
        &state.sqrt_price_x96,
        &sqrt_price_lower,
        &sqrt_price_upper,
        params.amount0_desired,
        params.amount1_desired,
    );
    if liquidity == 0 {
        return Err(PoolError::ZeroLiquidity);
    }

    insert(
        env,
        &mut state,
        params.lower_old,
        params.lower,
        &sqrt_price_lower,
        liquidity,
        config.max_liquidity_per_tick,
        PoolError::LowerOrder,
    )?;
    insert(
        env,
        &mut state,
        params.upper_old,
        params.upper,
        &sqrt_price_upper,
        liquidity,
        config.max_liquidity_per_tick,
        PoolError::UpperOrder,
    )?;

    if in_range(&state, params.lower, params.upper) {
        state.liquidity = state
            .liquidity
            .checked_add(liquidity)
            .ok_or(PoolError::LiquidityOverflow)?;
    }

    let key = PositionKey {
        owner: params.position_owner.clone(),
        tick_lower: params.lower,
        tick_upper: params.upper,
    };
    let position = get_position(env, &key).unwrap_or_default();
    let (mut position, fees_0, fees_1) = settle(env, &state, &key, position)?;
    position.liquidity = position
        .liquidity
        .checked_add(liquidity)
        .ok_or(PoolError::LiquidityOverflow)?;
    set_position(env, &key, &position);

    let (amount0, amount1) = get_amounts_for_liquidity(
        env,
        &state.sqrt_price_x96,
        &sqrt_price_lower,
        &sqrt_price_upper,
        liquidity,
        true,
    )
    .ok_or(PoolError::AmountOverflow)?;

    // Deposits land in the reserves, settled fees leave them
    state.reserve0 = debit(credit(state.reserve0, amount0)?, fees_0)?;
    state.reserve1 = debit(credit(state.reserve1, amount1)?, fees_1)?;
    set_state(env, &state);

    if params.native {
        pull(env, &config.token0, &params.position_owner, amount0)?;
        pull(env, &config.token1, &params.position_owner, amount1)?;
    } else {
        ensure_custodied(
            env,
            &config.token0,
            credit(state.reserve0, fees_0)?,
            PoolError::Token0Missing,
        )?;
        ensure_custodied(
            env,
            &config.token1,
            credit(state.reserve1, fees_1)?,
            PoolError::Token1Missing,
        )?;
    }

    push(env, &config.token0, &params.recipient, fees_0)?;
    push(env, &config.token1, &params.recipient, fees_1)?;

    env.events().publish(
        (Symbol::new(env, "mint"), params.position_owner),
        (params.lower, params.upper, liquidity, amount0, amount1),
    );

    Ok((liquidity, amount0, amount1))
}

/// Remove `liquidity` from the owner's position in `[lower, upper)`.
///
/// Returns the principal, rounded down, plus all fees the position has
/// earned. Both are paid to `recipient`.
pub fn burn(
    env: &Env,
    owner: Address,
    lower: i32,
    upper: i32,
    liquidity: u128,
    recipient: Address,
) -> Result<(u128, u128), PoolError> {
    let config = get_config(env)?;
    let mut state = get_state(env)?;

    let key = PositionKey {
        owner: owner.clone(),
        tick_lower: lower,
        tick_upper: upper,
    };
    let position = get_position(env, &key).ok_or(PoolError::InsufficientLiquidity)?;
    if position.liquidity < liquidity {
        return Err(PoolError::InsufficientLiquidity);
    }

    let (mut position, fees_0, fees_1) = settle(env, &state, &key, position)?;
    position.liquidity -= liquidity;
    set_position(env, &key, &position);

    remove(env, lower, liquidity)?;
    remove(env, upper, liquidity)?;

    if in_range(&state, lower, upper) {
        state.liquidity = state
            .liquidity
            .checked_sub(liquidity)
            .ok_or(PoolError::InsufficientLiquidity)?;
    }

    let (principal_0, principal_1) = get_amounts_for_liquidity(
        env,
        &state.sqrt_price_x96,
        &get_sqrt_ratio_at_tick(env, lower),
        &get_sqrt_ratio_at_tick(env, upper),
        liquidity,
        false,
    )
    .ok_or(PoolError::AmountOverflow)?;

    let amount0 = credit(principal_0, fees_0)?;
    let amount1 = credit(principal_1, fees_1)?;

    state.reserve0 = debit(state.reserve0, amount0)?;
    state.reserve1 = debit(state.reserve1, amount1)?;
    debug_assert!(protocol_fees_within_reserves(&state));
    set_state(env, &state);

    push(env, &config.token0, &recipient, amount0)?;
    push(env, &config.token1, &recipient, amount1)?;

    env.events().publish(
        (Symbol::new(env, "burn"), owner),
        (lower, upper, liquidity, amount0, amount1),
    );

    Ok((amount0, amount1))
}

/// Pay out the fees earned by a position without touching its liquidity.
///
/// Collecting twice without a swap in between yields (0, 0) the second
/// time. An unknown position has nothing to collect.
pub fn collect(
    env: &Env,
    owner: Address,
    lower: i32,
    upper: i32,
    recipient: Address,
) -> Result<(u128, u128), PoolError> {
    let config = get_config(env)?;
    let mut state = get_state(env)?;

    let key = PositionKey {
        owner: owner.clone(),
        tick_lower: lower,
        tick_upper: upper,
    };
    let Some(position) = get_position(env, &key) else {
        return Ok((0, 0));
    };

    let (position, fees_0, fees_1) = settle(env, &state, &key, position)?;
    set_position(env, &key, &position);

    state.reserve0 = debit(state.reserve0, fees_0)?;
    state.reserve1 = debit(state.reserve1, fees_1)?;
    set_state(env, &state);

    push(env, &config.token0, &recipient, fees_0)?;
    push(env, &config.token1, &recipient, fees_1)?;

    env.events().publish(
        (Symbol::new(env, "collect"), owner),
        (lower, upper, fees_0, fees_1),
    );

    Ok((fees_0, fees_1))
}

#[cfg(test)]
mod tests {
    use crate::testutils::PoolTest;
    use crate::PoolError;
    use clamm_types::{MAX_TICK, MIN_TICK};
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::Address;

    #[test]
    fn test_mint_native_pulls_from_owner() {
        let t = PoolTest::new();
        let owner = Address::generate(&t.env);

        let (liquidity, amount0, amount1) = t.mint(&owner, -10860, 10920, 50, 50, true);

        assert_eq!(liquidity, 118);
        assert_eq!((amount0, amount1), (50, 50));
        assert_eq!(t.token0.balance(&owner), 0);
        assert_eq!(t.token1.balance(&owner), 0);
        assert_eq!(t.pool.reserves(), (50, 50));
        assert_eq!(t.pool.liquidity(), 118);
        assert_eq!(t.pool.nearest_tick(), -10860);
    }

    #[test]
    fn test_mint_custodied_requires_prior_transfer() {
        let t = PoolTest::new();
        let owner = Address::generate(&t.env);

        let (liquidity, _, _) = t.mint(&owner, -10860, 10920, 50, 50, false);
        assert_eq!(liquidity, 118);

        // Nothing transferred beforehand this time
        let params = t.mint_params(&owner, -10860, 10920, 50, 50, false);
        assert_eq!(t.pool.try_mint(&params), Err(Ok(PoolError::Token0Missing)));

        // Only token0 sent
        t.fund(&owner, 50, 0);
        t.token0.transfer(&owner, &t.pool.address, &50);
        assert_eq!(t.pool.try_mint(&params), Err(Ok(PoolError::Token1Missing)));
    }

    #[test]
    fn test_mint_same_range_from_both_funding_sources() {
        let t = PoolTest::new();
        let owner = Address::generate(&t.env);

        t.mint(&owner, -10860, 10920, 50, 50, true);
        t.mint(&owner, -10860, 10920, 50, 50, false);

        let position = t.pool.get_position(&owner, &-10860, &10920).unwrap();
        assert_eq!(position.liquidity, 236);
        assert_eq!(t.pool.liquidity(), 236);
        assert_eq!(t.pool.get_tick(&-10860).unwrap().liquidity, 236);
        assert_eq!(t.pool.get_tick(&10920).unwrap().liquidity, 236);
    }

    #[test]
    fn test_mint_sequence_keeps_ticks_sorted() {
        let t = PoolTest::new();
        let owner = Address::generate(&t.env);

        assert_eq!(t.mint(&owner, -10860, 10920, 50, 50, true), (118, 50, 50));
        assert_eq!(t.mint(&owner, -10860, 10920, 50, 50, false), (118, 50, 50));
        // Narrower sub-range
        assert_eq!(t.mint(&owner, -1020, 1080, 50, 50, true), (951, 50, 48));
        // Reusing only the lower tick, then only the upper tick
        assert_eq!(t.mint(&owner, -10860, 2040, 50, 50, true), (119, 12, 50));
        assert_eq!(t.mint(&owner, -2100, 10920, 50, 50, true), (118, 50, 12));
        // Entirely below, then entirely above the price
        assert_eq!(t.mint(&owner, -5100, -2040, 50, 50, true), (390, 0, 50));
        assert_eq!(t.mint(&owner, 2100, 5040, 50, 50, true), (406, 50, 0));

        let ticks = t.pool.get_tick_list(&100);
        let expected = [
            MIN_TICK, -10860, -5100, -2100, -2040, -1020, 1080, 2040, 2100, 5040, 10920, MAX_TICK,
        ];
        assert_eq!(ticks.len(), expected.len() as u32);
        for (i, tick) in expected.iter().enumerate() {
            assert_eq!(ticks.get(i as u32), Some(*tick));
        }

        // Every link agrees with its neighbour
        for i in 1..ticks.len() - 1 {
            let tick = ticks.get(i).unwrap();
            let info = t.pool.get_tick(&tick).unwrap();
            assert_eq!(info.previous_tick, ticks.get(i - 1).unwrap());
            assert_eq!(info.next_tick, ticks.get(i + 1).unwrap());
        }

        assert_eq!(t.pool.nearest_tick(), -1020);
        assert_eq!(t.pool.liquidity(), 118 + 118 + 951 + 119 + 118);
    }

    #[test]
    fn test_mint_rejects_invalid_ticks() {
        let t = PoolTest::new();
        let owner = Address::generate(&t.env);

        let params = t.mint_params(&owner, -10860 - 60 + 1, 10920, 50, 50, true);
        assert_eq!(t.pool.try_mint(&params), Err(Ok(PoolError::InvalidTick)));

        let params = t.mint_params(&owner, -10860 - 60, 10920, 50, 50, true);
        assert_eq!(t.pool.try_mint(&params), Err(Ok(PoolError::LowerEven)));

        let params = t.mint_params(&owner, -10860, 10920 + 60, 50, 50, true);
        assert_eq!(t.pool.try_mint(&params), Err(Ok(PoolError::UpperOdd)));

        let params = t.mint_params(&owner, 10860, -10800, 50, 50, true);
        assert_eq!(t.pool.try_mint(&params), Err(Ok(PoolError::WrongOrder)));

        let params = t.mint_params(&owner, MIN_TICK - 60, 10920, 50, 50, true);
        assert_eq!(t.pool.try_mint(&params), Err(Ok(PoolError::TickOutOfBounds)));

        // Nothing was linked by the failed attempts
        assert_eq!(t.pool.get_tick_list(&100).len(), 2);
    }

    #[test]
    fn test_mint_rejects_stale_neighbours() {
        let t = PoolTest::new();
        let owner = Address::generate(&t.env);
        t.mint(&owner, -1020, 1080, 50, 50, true);

        // 10920 belongs after 1080, not after MIN
        let mut params = t.mint_params(&owner, -10860, 10920, 50, 50, true);
        params.upper_old = MIN_TICK;
        assert_eq!(t.pool.try_mint(&params), Err(Ok(PoolError::UpperOrder)));

        let mut params = t.mint_params(&owner, -60, 10920, 50, 50, true);
        params.lower_old = 1080;
        assert_eq!(t.pool.try_mint(&params), Err(Ok(PoolError::LowerOrder)));
    }

    #[test]
    fn test_mint_zero_amounts() {
        let t = PoolTest::new();
        let owner = Address::generate(&t.env);

        let params = t.mint_params(&owner, -10860, 10920, 0, 0, true);
        assert_eq!(t.pool.try_mint(&params), Err(Ok(PoolError::ZeroLiquidity)));

        // Above the price only token0 counts
        let params = t.mint_params(&owner, 2100, 5040, 0, 50, true);
        assert_eq!(t.pool.try_mint(&params), Err(Ok(PoolError::ZeroLiquidity)));
    }

    #[test]
    fn test_burn_round_trip_returns_deposit() {
        let t = PoolTest::new();
        let owner = Address::generate(&t.env);

        let (liquidity, amount0, amount1) = t.mint(&owner, -10860, 10920, 1000, 1000, true);
        assert_eq!((liquidity, amount0, amount1), (2376, 1000, 996));

        let balance0 = t.token0.balance(&owner);
        let balance1 = t.token1.balance(&owner);
        let (out0, out1) = t.pool.burn(&owner, &-10860, &10920, &liquidity, &owner);
        assert!(out0 <= amount0 && amount0 - out0 <= 1);
        assert!(out1 <= amount1 && amount1 - out1 <= 1);
        assert_eq!(t.token0.balance(&owner), balance0 + out0 as i128);
        assert_eq!(t.token1.balance(&owner), balance1 + out1 as i128);
        assert_eq!(t.pool.liquidity(), 0);

        // Ticks and the position stay behind with nothing in them
        assert_eq!(t.pool.get_tick(&-10860).unwrap().liquidity, 0);
        assert_eq!(t.pool.get_tick(&10920).unwrap().liquidity, 0);
        assert_eq!(t.pool.get_tick_list(&100).len(), 4);
        assert_eq!(
            t.pool.get_position(&owner, &-10860, &10920).unwrap().liquidity,
            0
        );
    }

    #[test]
    fn test_burn_out_of_range_leaves_active_liquidity() {
        let t = PoolTest::new();
        let owner = Address::generate(&t.env);
        t.mint(&owner, -10860, 10920, 50, 50, true);
        t.mint(&owner, 2100, 5040, 50, 0, true);
        assert_eq!(t.pool.liquidity(), 118);

        let (out0, out1) = t.pool.burn(&owner, &2100, &5040, &406, &owner);
        assert_eq!(out1, 0);
        assert!(out0 >= 49);
        assert_eq!(t.pool.liquidity(), 118);
    }

    #[test]
    fn test_burn_more_than_position() {
        let t = PoolTest::new();
        let owner = Address::generate(&t.env);
        let other = Address::generate(&t.env);
        t.mint(&owner, -10860, 10920, 50, 50, true);

        assert_eq!(
            t.pool.try_burn(&owner, &-10860, &10920, &119, &owner),
            Err(Ok(PoolError::InsufficientLiquidity))
        );
        assert_eq!(
            t.pool.try_burn(&other, &-10860, &10920, &1, &other),
            Err(Ok(PoolError::InsufficientLiquidity))
        );
    }

    #[test]
    fn test_collect_without_position_or_swaps() {
        let t = PoolTest::new();
        let owner = Address::generate(&t.env);

        assert_eq!(t.pool.collect(&owner, &-10860, &10920, &owner), (0, 0));

        t.mint(&owner, -10860, 10920, 50, 50, true);
        assert_eq!(t.pool.collect(&owner, &-10860, &10920, &owner), (0, 0));
        assert_eq!(t.pool.reserves(), (50, 50));
    }
}

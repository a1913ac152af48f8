// ============================================================================
// INVARIANTS MODULE
// ============================================================================
//
// Pure predicates over pool records. State-changing paths check them with
// debug_assert! after committing, so test and release-with-logs builds trip
// on a violation while release builds skip the work.
//
// INVARIANT CATEGORIES:
//
// 1. PRICE INVARIANTS
//    - Price stays within the sentinel prices
//    - The nearest tick is a real tick below the MAX sentinel
//
// 2. TICK LIST INVARIANTS
//    - Links are strictly ascending
//    - Range bounds follow the even/odd parity rule
//    - Per-tick liquidity stays under the cap
//
// 3. FEE INVARIANTS
//    - Fee growth only moves forward (modulo 2^128)
//    - Protocol fee counters are backed by reserves
//
// 4. SWAP INVARIANTS
//    - Price moves in the trade direction
//    - Tick crossings are bounded
//
// ============================================================================

use clamm_types::{
    is_even_tick, max_sqrt_ratio, min_sqrt_ratio, PoolState, MAX_TICK, MIN_TICK,
};
use soroban_sdk::U256;

// ============================================================================
// PRICE INVARIANTS
// ============================================================================

/// Invariant: sqrt price is within the sentinel prices
///
/// Property:
///   MIN_SQRT_RATIO <= sqrt_price_x96 <= MAX_SQRT_RATIO
pub fn price_in_bounds(state: &PoolState) -> bool {
    let env = state.sqrt_price_x96.env();
    state.sqrt_price_x96 >= min_sqrt_ratio(env) && state.sqrt_price_x96 <= max_sqrt_ratio(env)
}

/// Invariant: the nearest tick is never the MAX sentinel
///
/// Property:
///   MIN_TICK <= nearest_tick < MAX_TICK
pub fn nearest_tick_in_bounds(state: &PoolState) -> bool {
    state.nearest_tick >= MIN_TICK && state.nearest_tick < MAX_TICK
}

// ============================================================================
// TICK LIST INVARIANTS
// ============================================================================

/// Invariant: a linked tick sits strictly between its neighbours
///
/// Property:
///   previous < tick < next, except that each sentinel points at itself
///   on its open side
pub fn tick_links_ordered(previous: i32, tick: i32, next: i32) -> bool {
    (previous < tick || tick == MIN_TICK) && (tick < next || tick == MAX_TICK)
}

/// Invariant: range bounds carry the parity crossing relies on
///
/// Property:
///   lower is even, upper is odd, lower < upper
pub fn range_parity_valid(lower: i32, upper: i32, tick_spacing: i32) -> bool {
    lower < upper && is_even_tick(lower, tick_spacing) && !is_even_tick(upper, tick_spacing)
}

/// Invariant: max liquidity per tick is respected
///
/// Property:
///   tick.liquidity <= config.max_liquidity_per_tick
pub fn tick_liquidity_bounded(tick_liquidity: u128, max_liquidity_per_tick: u128) -> bool {
    tick_liquidity <= max_liquidity_per_tick
}

// ============================================================================
// FEE INVARIANTS
// ============================================================================

/// Invariant: fee growth global is monotonically increasing
///
/// Property:
///   fee_growth_global_new >= fee_growth_global_old  (mod 2^128)
///
/// A single operation never adds half the range, so a wrapped difference
/// above that means the value went backwards.
pub fn fee_growth_monotonic(old_fee_growth: u128, new_fee_growth: u128) -> bool {
    new_fee_growth.wrapping_sub(old_fee_growth) < (u128::MAX / 2)
}

/// Invariant: protocol fee counters are part of the reserves
///
/// Property:
///   protocol_fees_0 <= reserve0 && protocol_fees_1 <= reserve1
pub fn protocol_fees_within_reserves(state: &PoolState) -> bool {
    state.protocol_fees_0 <= state.reserve0 && state.protocol_fees_1 <= state.reserve1
}

// ============================================================================
// SWAP INVARIANTS
// ============================================================================

/// Invariant: swap direction consistency
///
/// Property:
///   - zero_for_one => price decreases (sqrt_price_after <= sqrt_price_before)
///   - !zero_for_one => price increases (sqrt_price_after >= sqrt_price_before)
pub fn swap_direction_consistent(
    zero_for_one: bool,
    sqrt_price_before: &U256,
    sqrt_price_after: &U256,
) -> bool {
    if zero_for_one {
        sqrt_price_after <= sqrt_price_before
    } else {
        sqrt_price_after >= sqrt_price_before
    }
}

/// Invariant: tick crossings bounded
///
/// Property:
///   ticks_crossed <= MAX_TICK_CROSSINGS_PER_SWAP
pub fn tick_crossings_bounded(ticks_crossed: u32, max_crossings: u32) -> bool {
    ticks_crossed <= max_crossings
}

// ============================================================================
// TESTS
// ============================================================================

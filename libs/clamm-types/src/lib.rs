#![no_std]

mod pool;
mod position;
mod tick;

pub use pool::*;
pub use position::*;
pub use tick::*;

use soroban_sdk::{Env, U256};

/// Q96 constant (2^96) for fixed-point math
pub const Q96: u128 = 1 << 96;

/// Minimum tick index
/// Lowest tick whose sqrt price stays within 160 bits
pub const MIN_TICK: i32 = -887272;

/// Maximum tick index
pub const MAX_TICK: i32 = 887272;

/// Minimum sqrt price (at MIN_TICK)
/// sqrt(1.0001^-887272) * 2^96
pub const MIN_SQRT_RATIO: u128 = 4295128739;

/// Maximum sqrt price (at MAX_TICK) as big-endian 64-bit limbs
/// sqrt(1.0001^887272) * 2^96 = 1461446703485210103287273052203988822378723970342
pub const MAX_SQRT_RATIO_PARTS: [u64; 4] = [0, 0xfffd8963, 0xefd1fc6a50648849, 0x5d951d5263988d26];

/// Lowest sqrt price a pool may hold
pub fn min_sqrt_ratio(env: &Env) -> U256 {
    U256::from_u128(env, MIN_SQRT_RATIO)
}

/// Exclusive upper bound on a pool's sqrt price
pub fn max_sqrt_ratio(env: &Env) -> U256 {
    let [hi_hi, hi_lo, lo_hi, lo_lo] = MAX_SQRT_RATIO_PARTS;
    U256::from_parts(env, hi_hi, hi_lo, lo_hi, lo_lo)
}

/// Fee amount in hundredths of a basis point (1e-6)
/// 500 = 0.05%, 3000 = 0.3%, 10000 = 1%
pub type Fee = u32;

/// Denominator of the swap fee (pips)
pub const FEE_DENOMINATOR: u128 = 1_000_000;

/// Swap fees above 10% are rejected
pub const MAX_SWAP_FEE: Fee = 100_000;

/// Denominator of the protocol fee, a share of the swap fee in basis points
pub const PROTOCOL_FEE_DENOMINATOR: u128 = 10_000;

/// Largest tick spacing a pool may use
pub const MAX_TICK_SPACING: i32 = 16384;

/// Calculate maximum liquidity per tick for a given tick spacing
pub fn max_liquidity_per_tick(tick_spacing: i32) -> u128 {
    let min_tick = (MIN_TICK / tick_spacing) * tick_spacing;
    let max_tick = (MAX_TICK / tick_spacing) * tick_spacing;
    let num_ticks = ((max_tick - min_tick) / tick_spacing) as u128 + 1;
    u128::MAX / num_ticks
}

/// Smallest tick usable with `tick_spacing`; parity is counted from here.
pub fn usable_min_tick(tick_spacing: i32) -> i32 {
    (MIN_TICK / tick_spacing) * tick_spacing
}

/// Whether `tick` sits an even number of spacings above the usable minimum.
///
/// Range lower bounds must be even and upper bounds odd, so when a swap
/// crosses a tick its parity tells whether liquidity starts or ends there.
/// Expects `tick` to be a multiple of `tick_spacing`.
pub fn is_even_tick(tick: i32, tick_spacing: i32) -> bool {
    ((tick - usable_min_tick(tick_spacing)) / tick_spacing) % 2 == 0
}

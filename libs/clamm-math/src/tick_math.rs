use crate::full_math::{q128, u256_max};
use clamm_types::{max_sqrt_ratio, min_sqrt_ratio, MAX_TICK, MIN_TICK};
use soroban_sdk::{Env, U256};

// sqrt(1.0001^-(2^i)) in Q128, i = 0..=19
const SQRT_RATIO_POWERS: [u128; 20] = [
    0xfffcb933bd6fad37aa2d162d1a594001,
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
    0x48a170391f7dc42444e8fa2,
];

/// Calculate sqrt(1.0001^tick) * 2^96
///
/// The ratio is built for `-|tick|` from the precomputed powers, inverted
/// for positive ticks, then shifted from Q128 to Q96 rounding up, so the
/// result is strictly increasing in `tick`. At most 160 bits wide.
pub fn get_sqrt_ratio_at_tick(env: &Env, tick: i32) -> U256 {
    if tick < MIN_TICK || tick > MAX_TICK {
        panic!("Tick out of bounds");
    }

    let abs_tick = tick.unsigned_abs();
    let mut ratio = q128(env);

    for (bit, factor) in SQRT_RATIO_POWERS.iter().enumerate() {
        if abs_tick & (1 << bit) != 0 {
            ratio = mul_shift_128(env, &ratio, *factor);
        }
    }

    if tick > 0 {
        ratio = u256_max(env).div(&ratio);
    }

    let shift_32 = U256::from_u128(env, 1u128 << 32);
    let result = ratio.shr(32);
    if ratio.rem_euclid(&shift_32) > U256::from_u32(env, 0) {
        result.add(&U256::from_u32(env, 1))
    } else {
        result
    }
}

/// Greatest tick whose sqrt ratio is at or below `sqrt_price_x96`
pub fn get_tick_at_sqrt_ratio(env: &Env, sqrt_price_x96: &U256) -> i32 {
    if *sqrt_price_x96 < min_sqrt_ratio(env) || *sqrt_price_x96 >= max_sqrt_ratio(env) {
        panic!("sqrt price out of bounds");
    }

    let mut low = MIN_TICK;
    let mut high = MAX_TICK;

    while low < high {
        let mid = (low + high + 1) / 2;
        let sqrt_at_mid = get_sqrt_ratio_at_tick(env, mid);

        if sqrt_at_mid <= *sqrt_price_x96 {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    low
}

/// Helper: multiply by u128 and right shift by 128 bits
fn mul_shift_128(env: &Env, x: &U256, y: u128) -> U256 {
    x.mul(&U256::from_u128(env, y)).shr(128)
}

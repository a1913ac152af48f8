use crate::full_math::{bit_length, div_u256, mul_div_u256, u256_max};
use clamm_types::Q96;
use soroban_sdk::{Env, U256};

fn sorted<'a>(sqrt_ratio_a_x96: &'a U256, sqrt_ratio_b_x96: &'a U256) -> (&'a U256, &'a U256) {
    if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    } else {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96)
    }
}

/// Amount0 delta for a price move between two sqrt ratios, `None` when it
/// does not fit in u128.
/// delta_x = L * 2^96 * (sqrt_pb - sqrt_pa) / (sqrt_pa * sqrt_pb)
pub fn checked_amount0_delta(
    env: &Env,
    sqrt_ratio_a_x96: &U256,
    sqrt_ratio_b_x96: &U256,
    liquidity: u128,
    round_up: bool,
) -> Option<u128> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if *sqrt_ratio_lower == U256::from_u32(env, 0) {
        panic!("sqrt_ratio_lower cannot be zero");
    }

    let numerator1 = U256::from_u128(env, liquidity).shl(96);
    let numerator2 = sqrt_ratio_upper.sub(sqrt_ratio_lower);

    // Never exceeds numerator1, so always fits
    let scaled = mul_div_u256(env, &numerator1, &numerator2, sqrt_ratio_upper, round_up)?;

    div_u256(env, &scaled, sqrt_ratio_lower, round_up).to_u128()
}

/// Amount1 delta for a price move between two sqrt ratios, `None` when it
/// does not fit in u128.
/// delta_y = L * (sqrt_pb - sqrt_pa) / 2^96
pub fn checked_amount1_delta(
    env: &Env,
    sqrt_ratio_a_x96: &U256,
    sqrt_ratio_b_x96: &U256,
    liquidity: u128,
    round_up: bool,
) -> Option<u128> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    mul_div_u256(
        env,
        &U256::from_u128(env, liquidity),
        &sqrt_ratio_upper.sub(sqrt_ratio_lower),
        &U256::from_u128(env, Q96),
        round_up,
    )?
    .to_u128()
}

/// Calculate amount0 delta, panicking on overflow
pub fn get_amount0_delta(
    env: &Env,
    sqrt_ratio_a_x96: &U256,
    sqrt_ratio_b_x96: &U256,
    liquidity: u128,
    round_up: bool,
) -> u128 {
    match checked_amount0_delta(env, sqrt_ratio_a_x96, sqrt_ratio_b_x96, liquidity, round_up) {
        Some(amount) => amount,
        None => panic!("Amount0 overflow"),
    }
}

/// Calculate amount1 delta, panicking on overflow
pub fn get_amount1_delta(
    env: &Env,
    sqrt_ratio_a_x96: &U256,
    sqrt_ratio_b_x96: &U256,
    liquidity: u128,
    round_up: bool,
) -> u128 {
    match checked_amount1_delta(env, sqrt_ratio_a_x96, sqrt_ratio_b_x96, liquidity, round_up) {
        Some(amount) => amount,
        None => panic!("Amount1 overflow"),
    }
}

/// Sqrt price after adding `amount` of token0 to the pool.
/// sqrt_price_next = L * 2^96 * sqrt_price / (L * 2^96 + amount * sqrt_price)
///
/// Rounds up so the price never moves further than the input pays for.
/// Falls back to L * 2^96 / (L * 2^96 / sqrt_price + amount) when the
/// denominator does not fit in 256 bits.
pub fn get_next_sqrt_price_from_amount0_rounding_up(
    env: &Env,
    sqrt_price_x96: &U256,
    liquidity: u128,
    amount: u128,
) -> U256 {
    let zero = U256::from_u32(env, 0);
    if *sqrt_price_x96 == zero || liquidity == 0 {
        panic!("Invalid inputs");
    }
    if amount == 0 {
        return sqrt_price_x96.clone();
    }

    let max = u256_max(env);
    let numerator1 = U256::from_u128(env, liquidity).shl(96);
    let amount_256 = U256::from_u128(env, amount);

    if *sqrt_price_x96 <= max.div(&amount_256) {
        let product = amount_256.mul(sqrt_price_x96);
        if product <= max.sub(&numerator1) {
            let denominator = numerator1.add(&product);
            // The quotient never exceeds sqrt_price_x96
            return match mul_div_u256(env, &numerator1, sqrt_price_x96, &denominator, true) {
                Some(price) => price,
                None => panic!("sqrt price overflow"),
            };
        }
    }

    let denominator = numerator1.div(sqrt_price_x96).add(&amount_256);
    div_u256(env, &numerator1, &denominator, true)
}

/// Sqrt price after adding `amount` of token1 to the pool.
/// sqrt_price_next = sqrt_price + amount * 2^96 / L
pub fn get_next_sqrt_price_from_amount1_rounding_down(
    env: &Env,
    sqrt_price_x96: &U256,
    liquidity: u128,
    amount: u128,
) -> U256 {
    if *sqrt_price_x96 == U256::from_u32(env, 0) || liquidity == 0 {
        panic!("Invalid inputs");
    }

    let quotient = U256::from_u128(env, amount)
        .shl(96)
        .div(&U256::from_u128(env, liquidity));
    let next = sqrt_price_x96.add(&quotient);

    if bit_length(env, &next) > 160 {
        panic!("sqrt price overflow");
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tick_math::get_sqrt_ratio_at_tick;
    use clamm_types::{max_sqrt_ratio, min_sqrt_ratio};
    use soroban_sdk::Env;

    fn u(env: &Env, value: u128) -> U256 {
        U256::from_u128(env, value)
    }

    #[test]
    fn test_amount0_delta_known_value() {
        let env = Env::default();
        // L / sqrt(1) - L / sqrt(4) = L / 2
        let liquidity = 1_000_000_000_000_000_000u128;
        let (one, two) = (u(&env, Q96), u(&env, Q96 * 2));
        assert_eq!(
            get_amount0_delta(&env, &one, &two, liquidity, false),
            500_000_000_000_000_000
        );
        assert_eq!(
            get_amount0_delta(&env, &one, &two, liquidity, true),
            500_000_000_000_000_000
        );
    }

    #[test]
    fn test_amount1_delta_known_value() {
        let env = Env::default();
        let liquidity = 1_000_000_000_000_000_000u128;
        assert_eq!(
            get_amount1_delta(&env, &u(&env, Q96), &u(&env, Q96 * 2), liquidity, false),
            liquidity
        );
    }

    #[test]
    fn test_amount_deltas_order_independent() {
        let env = Env::default();
        let sqrt_a = u(&env, Q96);
        let sqrt_b = u(&env, Q96 * 11 / 10);
        let liquidity = 1_000_000_000_000u128;

        assert_eq!(
            get_amount0_delta(&env, &sqrt_a, &sqrt_b, liquidity, true),
            get_amount0_delta(&env, &sqrt_b, &sqrt_a, liquidity, true)
        );
        assert_eq!(
            get_amount1_delta(&env, &sqrt_a, &sqrt_b, liquidity, false),
            get_amount1_delta(&env, &sqrt_b, &sqrt_a, liquidity, false)
        );
    }

    #[test]
    fn test_amount_deltas_round_up_by_at_most_one() {
        let env = Env::default();
        let sqrt_a = get_sqrt_ratio_at_tick(&env, -10860);
        let sqrt_b = u(&env, Q96);
        let liquidity = 2376u128;

        let down0 = get_amount0_delta(&env, &sqrt_a, &sqrt_b, liquidity, false);
        let up0 = get_amount0_delta(&env, &sqrt_a, &sqrt_b, liquidity, true);
        assert_eq!(down0, 1713);
        assert_eq!(up0, down0 + 1);

        let down1 = get_amount1_delta(&env, &sqrt_a, &sqrt_b, liquidity, false);
        let up1 = get_amount1_delta(&env, &sqrt_a, &sqrt_b, liquidity, true);
        assert_eq!(up1, down1 + 1);
    }

    #[test]
    fn test_amount_deltas_zero_cases() {
        let env = Env::default();
        let one = u(&env, Q96);
        assert_eq!(get_amount0_delta(&env, &one, &one, 1_000_000, true), 0);
        assert_eq!(get_amount1_delta(&env, &one, &u(&env, Q96 * 2), 0, true), 0);
    }

    #[test]
    fn test_amount_deltas_across_full_domain() {
        let env = Env::default();
        let (min, max) = (min_sqrt_ratio(&env), max_sqrt_ratio(&env));
        // Modest liquidity over the whole price range still fits
        assert_eq!(
            get_amount0_delta(&env, &min, &max, 1_000_000, true),
            18446050707367246063248665
        );
        assert_eq!(
            get_amount1_delta(&env, &min, &max, 1_000_000, true),
            18446050711097703530314035
        );
    }

    #[test]
    fn test_checked_amount0_delta_overflow() {
        let env = Env::default();
        let (min, max) = (min_sqrt_ratio(&env), max_sqrt_ratio(&env));
        // Huge liquidity across the whole price range needs more than 128 bits
        assert!(checked_amount0_delta(&env, &min, &max, u128::MAX, false).is_none());
        assert!(checked_amount1_delta(&env, &min, &max, u128::MAX, false).is_none());
    }

    #[test]
    #[should_panic(expected = "Amount0 overflow")]
    fn test_get_amount0_delta_panics_on_overflow() {
        let env = Env::default();
        get_amount0_delta(&env, &min_sqrt_ratio(&env), &max_sqrt_ratio(&env), u128::MAX, false);
    }

    #[test]
    fn test_next_price_from_amount0_moves_down() {
        let env = Env::default();
        let liquidity = 1_000_000_000_000_000_000u128;
        // Adding L of token0 at price 1 halves the sqrt price
        let next =
            get_next_sqrt_price_from_amount0_rounding_up(&env, &u(&env, Q96), liquidity, liquidity);
        assert_eq!(next, u(&env, Q96 / 2));
    }

    #[test]
    fn test_next_price_from_amount0_rounds_up() {
        let env = Env::default();
        let next = get_next_sqrt_price_from_amount0_rounding_up(&env, &u(&env, Q96), 2376, 1713);
        assert_eq!(next, u(&env, 46037200815331882152668238200));
        assert!(next >= get_sqrt_ratio_at_tick(&env, -10860));
    }

    #[test]
    fn test_next_price_from_amount0_wide_numerator() {
        let env = Env::default();
        // L * 2^96 * price needs more than 256 bits near the top of the range
        let price = max_sqrt_ratio(&env).sub(&u(&env, 1));
        let next = get_next_sqrt_price_from_amount0_rounding_up(&env, &price, u128::MAX, 1);
        assert_eq!(
            next,
            max_sqrt_ratio(&env).sub(&u(&env, 79222206686713754677259753420))
        );
    }

    #[test]
    fn test_next_price_from_amount0_fallback_path() {
        let env = Env::default();
        // amount * price overflows 256 bits here
        let price = max_sqrt_ratio(&env).sub(&u(&env, 1));
        let next = get_next_sqrt_price_from_amount0_rounding_up(
            &env,
            &price,
            1_000_000_000_000_000_000,
            u128::MAX,
        );
        assert_eq!(next, u(&env, 232830644));
    }

    #[test]
    fn test_next_price_from_amount0_zero_amount() {
        let env = Env::default();
        let one = u(&env, Q96);
        assert_eq!(get_next_sqrt_price_from_amount0_rounding_up(&env, &one, 1000, 0), one);
    }

    #[test]
    fn test_next_price_from_amount1_moves_up() {
        let env = Env::default();
        let liquidity = 1_000_000_000_000_000_000u128;
        let next =
            get_next_sqrt_price_from_amount1_rounding_down(&env, &u(&env, Q96), liquidity, liquidity);
        assert_eq!(next, u(&env, Q96 * 2));
    }

    #[test]
    #[should_panic(expected = "sqrt price overflow")]
    fn test_next_price_from_amount1_beyond_160_bits() {
        let env = Env::default();
        get_next_sqrt_price_from_amount1_rounding_down(&env, &max_sqrt_ratio(&env), 1, u128::MAX);
    }

    #[test]
    #[should_panic(expected = "Invalid inputs")]
    fn test_next_price_zero_liquidity() {
        let env = Env::default();
        get_next_sqrt_price_from_amount1_rounding_down(&env, &u(&env, Q96), 0, 1);
    }
}

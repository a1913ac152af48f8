use soroban_sdk::{Env, U256};

/// Multiply and divide with 256-bit intermediate precision (rounds down)
/// Returns (a * b) / denominator
pub fn mul_div(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    if denominator == 0 {
        panic!("Division by zero");
    }

    let a_256 = U256::from_u128(env, a);
    let b_256 = U256::from_u128(env, b);
    let denom_256 = U256::from_u128(env, denominator);

    let product = a_256.mul(&b_256);
    let result = product.div(&denom_256);

    u128_from_u256(&result)
}

/// Multiply and divide with 256-bit intermediate precision (rounds up)
/// Returns ceil((a * b) / denominator)
pub fn mul_div_rounding_up(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    let result = mul_div(env, a, b, denominator);

    let a_256 = U256::from_u128(env, a);
    let b_256 = U256::from_u128(env, b);
    let denom_256 = U256::from_u128(env, denominator);

    let remainder = a_256.mul(&b_256).rem_euclid(&denom_256);

    if remainder > U256::from_u32(env, 0) {
        result + 1
    } else {
        result
    }
}

/// Computes `a * b / denominator` over full 256-bit operands.
///
/// The product is formed in 512 bits. When its high half is non-zero the
/// division runs as long division, feeding the low half into the remainder
/// as many bits at a time as the denominator leaves headroom for. The result
/// is exact; `None` means it does not fit in 256 bits.
pub fn mul_div_u256(
    env: &Env,
    a: &U256,
    b: &U256,
    denominator: &U256,
    round_up: bool,
) -> Option<U256> {
    let zero = U256::from_u32(env, 0);
    let one = U256::from_u32(env, 1);
    if *denominator == zero {
        panic!("Division by zero");
    }

    let (high, low) = mul_512(env, a, b);

    let (quotient, remainder) = if high == zero {
        (low.div(denominator), low.rem_euclid(denominator))
    } else {
        if high >= *denominator {
            return None;
        }
        long_div(env, &high, &low, denominator)
    };

    if round_up && remainder > zero {
        if quotient == u256_max(env) {
            return None;
        }
        return Some(quotient.add(&one));
    }
    Some(quotient)
}

/// `ceil(a / b)` or `floor(a / b)` on U256
pub fn div_u256(env: &Env, a: &U256, b: &U256, round_up: bool) -> U256 {
    let zero = U256::from_u32(env, 0);
    if *b == zero {
        panic!("Division by zero");
    }
    let quotient = a.div(b);
    if round_up && a.rem_euclid(b) > zero {
        quotient.add(&U256::from_u32(env, 1))
    } else {
        quotient
    }
}

/// Divides `high * 2^256 + low` by `denominator`, given `high < denominator`.
fn long_div(env: &Env, high: &U256, low: &U256, denominator: &U256) -> (U256, U256) {
    let one = U256::from_u32(env, 1);
    let mut quotient = U256::from_u32(env, 0);
    let mut remainder = high.clone();

    let bits = bit_length(env, denominator);
    if bits < 256 {
        let headroom = 256 - bits;
        let mut consumed = 0u32;
        while consumed < 256 {
            let step = headroom.min(256 - consumed);
            let chunk = low
                .shr(256 - consumed - step)
                .rem_euclid(&one.shl(step));
            let scaled = remainder.shl(step).add(&chunk);
            quotient = quotient.shl(step).add(&scaled.div(denominator));
            remainder = scaled.rem_euclid(denominator);
            consumed += step;
        }
    } else {
        // No headroom: shift one bit at a time without doubling past 2^256
        for bit in (0..256u32).rev() {
            let incoming = low.shr(bit).rem_euclid(&U256::from_u32(env, 2));
            let gap = denominator.sub(&remainder);
            quotient = quotient.shl(1);
            if remainder >= gap {
                remainder = remainder.sub(&gap).add(&incoming);
                quotient = quotient.add(&one);
            } else {
                remainder = remainder.shl(1).add(&incoming);
                if remainder >= *denominator {
                    remainder = remainder.sub(denominator);
                    quotient = quotient.add(&one);
                }
            }
        }
    }

    (quotient, remainder)
}

/// Full 512-bit product as `(high, low)` halves.
pub fn mul_512(env: &Env, a: &U256, b: &U256) -> (U256, U256) {
    let q = q128(env);
    let (a1, a0) = (a.shr(128), a.rem_euclid(&q));
    let (b1, b0) = (b.shr(128), b.rem_euclid(&q));

    let p00 = a0.mul(&b0);
    let p01 = a0.mul(&b1);
    let p10 = a1.mul(&b0);
    let p11 = a1.mul(&b1);

    let (middle, middle_carry) = overflowing_add(env, &p01, &p10);
    let (low, low_carry) = overflowing_add(env, &p00, &middle.rem_euclid(&q).shl(128));

    let mut high = p11.add(&middle.shr(128));
    if middle_carry {
        high = high.add(&q);
    }
    if low_carry {
        high = high.add(&U256::from_u32(env, 1));
    }
    (high, low)
}

fn overflowing_add(env: &Env, a: &U256, b: &U256) -> (U256, bool) {
    let headroom = u256_max(env).sub(b);
    if *a > headroom {
        (a.sub(&headroom).sub(&U256::from_u32(env, 1)), true)
    } else {
        (a.add(b), false)
    }
}

/// Number of significant bits in `value`
pub fn bit_length(env: &Env, value: &U256) -> u32 {
    let zero = U256::from_u32(env, 0);
    let (mut low, mut high) = (0u32, 256u32);
    while low < high {
        let mid = (low + high) / 2;
        if value.shr(mid) == zero {
            high = mid;
        } else {
            low = mid + 1;
        }
    }
    low
}

/// Convert U256 to u128, panics if overflow
fn u128_from_u256(value: &U256) -> u128 {
    match value.to_u128() {
        Some(v) => v,
        None => panic!("U256 overflow when converting to u128"),
    }
}

/// Unsigned division with rounding up
pub fn div_rounding_up(a: u128, b: u128) -> u128 {
    if b == 0 {
        panic!("Division by zero");
    }
    if a == 0 {
        return 0;
    }
    (a - 1) / b + 1
}

/// 2^128 as U256
pub fn q128(env: &Env) -> U256 {
    U256::from_u128(env, 1u128 << 64).mul(&U256::from_u128(env, 1u128 << 64))
}

/// 2^256 - 1
pub fn u256_max(env: &Env) -> U256 {
    let high = U256::from_u128(env, u128::MAX);
    high.mul(&q128(env)).add(&U256::from_u128(env, u128::MAX))
}

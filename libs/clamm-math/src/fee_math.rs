use crate::full_math::{mul_div_rounding_up, q128};
use clamm_types::{FEE_DENOMINATOR, PROTOCOL_FEE_DENOMINATOR};
use soroban_sdk::{Env, U256};

/// Fee charged on one swap segment's output
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeSplit {
    /// Total fee withheld from the output
    pub fee: u128,
    /// Part of `fee` owed to the protocol; the rest goes to liquidity providers
    pub protocol_fee: u128,
}

impl FeeSplit {
    pub fn lp_fee(&self) -> u128 {
        self.fee - self.protocol_fee
    }
}

/// Split the fee on `amount_out`. Both parts round up: the swap fee against
/// the trader, the protocol share against liquidity providers.
pub fn split_swap_fee(env: &Env, amount_out: u128, swap_fee: u32, protocol_fee: u32) -> FeeSplit {
    let fee = mul_div_rounding_up(env, amount_out, swap_fee as u128, FEE_DENOMINATOR);
    let protocol_fee =
        mul_div_rounding_up(env, fee, protocol_fee as u128, PROTOCOL_FEE_DENOMINATOR);
    FeeSplit { fee, protocol_fee }
}

/// Fee growth per unit of liquidity, Q128, reduced mod 2^128 like the
/// global accumulators it is added to.
pub fn fee_growth_delta(env: &Env, fee: u128, liquidity: u128) -> u128 {
    if liquidity == 0 {
        panic!("Division by zero");
    }
    let growth = U256::from_u128(env, fee)
        .shl(128)
        .div(&U256::from_u128(env, liquidity))
        .rem_euclid(&q128(env));
    match growth.to_u128() {
        Some(growth) => growth,
        None => panic!("U256 overflow when converting to u128"),
    }
}

/// Tokens owed for `liquidity` over a fee growth difference
/// (the difference itself computed with wrapping subtraction)
pub fn fees_owed(env: &Env, fee_growth_delta_x128: u128, liquidity: u128) -> u128 {
    let owed = U256::from_u128(env, fee_growth_delta_x128)
        .mul(&U256::from_u128(env, liquidity))
        .shr(128);
    match owed.to_u128() {
        Some(owed) => owed,
        None => panic!("U256 overflow when converting to u128"),
    }
}

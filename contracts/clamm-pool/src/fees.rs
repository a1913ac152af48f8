use crate::custody::{debit, push};
use crate::error::PoolError;
use crate::storage::{get_config, get_state, set_state};
use clamm_types::PROTOCOL_FEE_DENOMINATOR;
use soroban_sdk::{Address, Env, Symbol, Val, Vec};

/// A counter at this value has nothing left to pay out.
const PROTOCOL_FEE_FLOOR: u128 = 1;

fn fee_recipient(env: &Env, factory: &Address) -> Option<Address> {
    env.invoke_contract::<Option<Address>>(
        factory,
        &Symbol::new(env, "get_fee_recipient"),
        Vec::<Val>::new(env),
    )
}

fn factory_protocol_fee(env: &Env, factory: &Address) -> u32 {
    env.invoke_contract::<u32>(
        factory,
        &Symbol::new(env, "get_protocol_fee"),
        Vec::<Val>::new(env),
    )
}

/// Pay accrued protocol fees to the factory's fee recipient.
///
/// Each counter above the floor pays out everything above it and is reset
/// to the floor.
pub fn collect_protocol_fee(env: &Env) -> Result<(u128, u128), PoolError> {
    let config = get_config(env)?;
    let mut state = get_state(env)?;

    let recipient = fee_recipient(env, &config.factory).ok_or(PoolError::FeeRecipientNotSet)?;

    let mut amount0 = 0;
    if state.protocol_fees_0 > PROTOCOL_FEE_FLOOR {
        amount0 = state.protocol_fees_0 - PROTOCOL_FEE_FLOOR;
        state.protocol_fees_0 = PROTOCOL_FEE_FLOOR;
        state.reserve0 = debit(state.reserve0, amount0)?;
    }

    let mut amount1 = 0;
    if state.protocol_fees_1 > PROTOCOL_FEE_FLOOR {
        amount1 = state.protocol_fees_1 - PROTOCOL_FEE_FLOOR;
        state.protocol_fees_1 = PROTOCOL_FEE_FLOOR;
        state.reserve1 = debit(state.reserve1, amount1)?;
    }

    set_state(env, &state);

    push(env, &config.token0, &recipient, amount0)?;
    push(env, &config.token1, &recipient, amount1)?;

    env.events().publish(
        (Symbol::new(env, "protocol_fee_collected"), recipient),
        (amount0, amount1),
    );

    Ok((amount0, amount1))
}

/// Re-read the protocol fee from the factory and cache it.
pub fn update_protocol_fee(env: &Env) -> Result<u32, PoolError> {
    let config = get_config(env)?;
    let mut state = get_state(env)?;

    let protocol_fee = factory_protocol_fee(env, &config.factory);
    if protocol_fee as u128 > PROTOCOL_FEE_DENOMINATOR {
        return Err(PoolError::InvalidProtocolFee);
    }

    state.protocol_fee = protocol_fee;
    set_state(env, &state);

    env.events()
        .publish((Symbol::new(env, "protocol_fee_updated"),), protocol_fee);

    Ok(protocol_fee)
}

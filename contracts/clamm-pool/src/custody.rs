use crate::error::PoolError;
use soroban_sdk::{token, Address, Env};

/// Token amounts are tracked as u128; the token interface speaks i128.
pub fn to_i128(amount: u128) -> Result<i128, PoolError> {
    i128::try_from(amount).map_err(|_| PoolError::AmountOverflow)
}

/// Transfer `amount` of `token` from `from` into the pool.
pub fn pull(env: &Env, token: &Address, from: &Address, amount: u128) -> Result<(), PoolError> {
    if amount > 0 {
        token::Client::new(env, token).transfer(
            from,
            &env.current_contract_address(),
            &to_i128(amount)?,
        );
    }
    Ok(())
}

/// Transfer `amount` of `token` from the pool to `to`.
pub fn push(env: &Env, token: &Address, to: &Address, amount: u128) -> Result<(), PoolError> {
    if amount > 0 {
        token::Client::new(env, token).transfer(
            &env.current_contract_address(),
            to,
            &to_i128(amount)?,
        );
    }
    Ok(())
}

/// Fail with `missing` unless the pool holds at least `required` of `token`.
///
/// Callers that deposit by transferring to the pool first rely on this to
/// prove the transfer happened.
pub fn ensure_custodied(
    env: &Env,
    token: &Address,
    required: u128,
    missing: PoolError,
) -> Result<(), PoolError> {
    let balance = token::Client::new(env, token).balance(&env.current_contract_address());
    // A negative balance cannot occur for a conforming token
    let balance = u128::try_from(balance).unwrap_or(0);
    if balance < required {
        return Err(missing);
    }
    Ok(())
}

/// Add tokens the pool has taken in to a reserve.
pub fn credit(reserve: u128, amount: u128) -> Result<u128, PoolError> {
    reserve.checked_add(amount).ok_or(PoolError::AmountOverflow)
}

/// Take tokens the pool is paying out off a reserve.
pub fn debit(reserve: u128, amount: u128) -> Result<u128, PoolError> {
    reserve
        .checked_sub(amount)
        .ok_or(PoolError::InsufficientReserves)
}

#![no_std]

mod custody;
mod error;
mod fees;
mod invariants;
mod liquidity;
mod storage;
mod swap;
mod tick;

#[cfg(test)]
mod testutils;

pub use error::PoolError;

use clamm_types::{
    max_liquidity_per_tick, MintParams, PoolConfig, PoolState, PositionInfo, PositionKey,
    max_sqrt_ratio, min_sqrt_ratio, TickInfo, MAX_SWAP_FEE, MAX_TICK, MAX_TICK_SPACING,
    PROTOCOL_FEE_DENOMINATOR,
};
use soroban_sdk::{contract, contractimpl, Address, Env, Symbol, Vec, U256};

#[contract]
pub struct ClammPool;

#[contractimpl]
impl ClammPool {
    /// Initialize a new pool
    ///
    /// # Arguments
    /// * `swap_fee` - Fee on swap output in hundredths of a bip, at most 10%
    /// * `tick_spacing` - Range bounds must be multiples of this, at most 16384
    /// * `protocol_fee` - Share of each swap fee kept by the protocol, in bps
    /// * `sqrt_price_x96` - Starting price, within the sentinel prices
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        factory: Address,
        token0: Address,
        token1: Address,
        swap_fee: u32,
        tick_spacing: i32,
        protocol_fee: u32,
        sqrt_price_x96: U256,
    ) -> Result<(), PoolError> {
        if storage::is_initialized(&env) {
            return Err(PoolError::AlreadyInitialized);
        }
        if token0 >= token1 {
            return Err(PoolError::InvalidTokenOrder);
        }
        if tick_spacing <= 0 || tick_spacing > MAX_TICK_SPACING {
            return Err(PoolError::InvalidTickSpacing);
        }
        if swap_fee > MAX_SWAP_FEE {
            return Err(PoolError::InvalidFee);
        }
        if protocol_fee as u128 > PROTOCOL_FEE_DENOMINATOR {
            return Err(PoolError::InvalidProtocolFee);
        }
        if sqrt_price_x96 < min_sqrt_ratio(&env) || sqrt_price_x96 >= max_sqrt_ratio(&env) {
            return Err(PoolError::PriceOutOfBounds);
        }

        let config = PoolConfig {
            factory,
            token0,
            token1,
            swap_fee,
            tick_spacing,
            max_liquidity_per_tick: max_liquidity_per_tick(tick_spacing),
        };
        storage::set_config(&env, &config);
        storage::set_state(&env, &PoolState::new(sqrt_price_x96.clone(), protocol_fee));
        tick::initialize_sentinels(&env);

        env.events().publish(
            (Symbol::new(&env, "initialize"),),
            (
                config.token0,
                config.token1,
                swap_fee,
                tick_spacing,
                sqrt_price_x96,
            ),
        );
        Ok(())
    }

    /// Add liquidity to a range
    ///
    /// # Returns
    /// (liquidity, amount0, amount1) - Liquidity minted and tokens taken in
    pub fn mint(env: Env, params: MintParams) -> Result<(u128, u128, u128), PoolError> {
        params.position_owner.require_auth();
        liquidity::mint(&env, params)
    }

    /// Remove liquidity from a position
    ///
    /// # Returns
    /// (amount0, amount1) - Principal plus earned fees paid to `recipient`
    pub fn burn(
        env: Env,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
        recipient: Address,
    ) -> Result<(u128, u128), PoolError> {
        owner.require_auth();
        liquidity::burn(&env, owner, tick_lower, tick_upper, liquidity, recipient)
    }

    /// Collect the fees a position has earned
    ///
    /// # Returns
    /// (amount0, amount1) - Fee amounts paid to `recipient`
    pub fn collect(
        env: Env,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        recipient: Address,
    ) -> Result<(u128, u128), PoolError> {
        owner.require_auth();
        liquidity::collect(&env, owner, tick_lower, tick_upper, recipient)
    }

    /// Swap an exact amount of one token, already transferred to the pool,
    /// for the other
    ///
    /// # Arguments
    /// * `zero_for_one` - True if swapping token0 for token1
    /// * `amount_in` - Exact input amount
    /// * `recipient` - Address to receive output tokens
    /// * `min_amount_out` - Minimum acceptable output
    ///
    /// # Returns
    /// Output amount after fees
    pub fn swap(
        env: Env,
        zero_for_one: bool,
        amount_in: u128,
        recipient: Address,
        min_amount_out: u128,
    ) -> Result<u128, PoolError> {
        swap::execute_swap(&env, zero_for_one, amount_in, recipient, min_amount_out)
    }

    /// Send accrued protocol fees to the factory's fee recipient
    pub fn collect_protocol_fee(env: Env) -> Result<(u128, u128), PoolError> {
        fees::collect_protocol_fee(&env)
    }

    /// Refresh the cached protocol fee from the factory
    pub fn update_protocol_fee(env: Env) -> Result<u32, PoolError> {
        fees::update_protocol_fee(&env)
    }

    // === View Functions ===

    /// Get current pool state
    pub fn get_state(env: Env) -> Result<PoolState, PoolError> {
        storage::get_state(&env)
    }

    /// Get pool configuration
    pub fn get_config(env: Env) -> Result<PoolConfig, PoolError> {
        storage::get_config(&env)
    }

    /// Get a linked tick, `None` if the tick was never used
    pub fn get_tick(env: Env, tick: i32) -> Option<TickInfo> {
        storage::get_tick(&env, tick)
    }

    /// Get position info
    pub fn get_position(
        env: Env,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
    ) -> Option<PositionInfo> {
        let key = PositionKey {
            owner,
            tick_lower,
            tick_upper,
        };
        storage::get_position(&env, &key)
    }

    /// Get current sqrt price
    pub fn sqrt_price_x96(env: Env) -> Result<U256, PoolError> {
        Ok(storage::get_state(&env)?.sqrt_price_x96)
    }

    /// Highest linked tick at or below the current price
    pub fn nearest_tick(env: Env) -> Result<i32, PoolError> {
        Ok(storage::get_state(&env)?.nearest_tick)
    }

    /// Tick of the current price
    pub fn tick(env: Env) -> Result<i32, PoolError> {
        let sqrt_price_x96 = storage::get_state(&env)?.sqrt_price_x96;
        if sqrt_price_x96 >= max_sqrt_ratio(&env) {
            return Ok(MAX_TICK);
        }
        Ok(clamm_math::get_tick_at_sqrt_ratio(&env, &sqrt_price_x96))
    }

    /// Get current liquidity
    pub fn liquidity(env: Env) -> Result<u128, PoolError> {
        Ok(storage::get_state(&env)?.liquidity)
    }

    /// Tokens the pool owes to positions and the protocol
    pub fn reserves(env: Env) -> Result<(u128, u128), PoolError> {
        let state = storage::get_state(&env)?;
        Ok((state.reserve0, state.reserve1))
    }

    pub fn fee_growth_global(env: Env) -> Result<(u128, u128), PoolError> {
        let state = storage::get_state(&env)?;
        Ok((
            state.fee_growth_global_0_x128,
            state.fee_growth_global_1_x128,
        ))
    }

    pub fn protocol_fees(env: Env) -> Result<(u128, u128), PoolError> {
        let state = storage::get_state(&env)?;
        Ok((state.protocol_fees_0, state.protocol_fees_1))
    }

    /// Fee growth per unit of liquidity inside a range of linked ticks
    pub fn range_fee_growth(
        env: Env,
        tick_lower: i32,
        tick_upper: i32,
    ) -> Result<(u128, u128), PoolError> {
        let state = storage::get_state(&env)?;
        tick::range_fee_growth(
            &env,
            tick_lower,
            tick_upper,
            state.nearest_tick,
            state.fee_growth_global_0_x128,
            state.fee_growth_global_1_x128,
        )
    }

    /// Linked ticks in ascending order, sentinels included
    pub fn get_tick_list(env: Env, limit: u32) -> Vec<i32> {
        tick::tick_list(&env, limit)
    }

    /// Get token0 address
    pub fn token0(env: Env) -> Result<Address, PoolError> {
        Ok(storage::get_config(&env)?.token0)
    }

    /// Get token1 address
    pub fn token1(env: Env) -> Result<Address, PoolError> {
        Ok(storage::get_config(&env)?.token1)
    }

    /// Get swap fee
    pub fn swap_fee(env: Env) -> Result<u32, PoolError> {
        Ok(storage::get_config(&env)?.swap_fee)
    }

    /// Get tick spacing
    pub fn tick_spacing(env: Env) -> Result<i32, PoolError> {
        Ok(storage::get_config(&env)?.tick_spacing)
    }
}

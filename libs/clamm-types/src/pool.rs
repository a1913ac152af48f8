use soroban_sdk::{contracttype, Address, U256};

use crate::MIN_TICK;

/// Current pool state - stored in Instance storage for frequent access
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    /// Current sqrt(price) as Q64.96, up to 160 bits
    pub sqrt_price_x96: U256,
    /// Highest linked tick whose price is at or below the current price
    pub nearest_tick: i32,
    /// Total liquidity currently in range
    pub liquidity: u128,
    /// Fee growth global for token0 (Q128.128, wrapping)
    pub fee_growth_global_0_x128: u128,
    /// Fee growth global for token1 (Q128.128, wrapping)
    pub fee_growth_global_1_x128: u128,
    /// Token0 balance owed to positions and the protocol
    pub reserve0: u128,
    /// Token1 balance owed to positions and the protocol
    pub reserve1: u128,
    /// Protocol fees accrued in token0; held at 1 after a collection
    pub protocol_fees_0: u128,
    /// Protocol fees accrued in token1; held at 1 after a collection
    pub protocol_fees_1: u128,
    /// Share of each swap fee taken by the protocol, in basis points
    pub protocol_fee: u32,
}

impl PoolState {
    pub fn new(sqrt_price_x96: U256, protocol_fee: u32) -> Self {
        Self {
            sqrt_price_x96,
            nearest_tick: MIN_TICK,
            liquidity: 0,
            fee_growth_global_0_x128: 0,
            fee_growth_global_1_x128: 0,
            reserve0: 0,
            reserve1: 0,
            protocol_fees_0: 0,
            protocol_fees_1: 0,
            protocol_fee,
        }
    }
}

/// Pool configuration - immutable after creation
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    /// Factory contract address
    pub factory: Address,
    /// Token0 address (lower address)
    pub token0: Address,
    /// Token1 address (higher address)
    pub token1: Address,
    /// Swap fee in hundredths of bps
    pub swap_fee: u32,
    /// Tick spacing for this pool
    pub tick_spacing: i32,
    /// Maximum liquidity per tick
    pub max_liquidity_per_tick: u128,
}

// ============================================================================
// SWAP COMPUTATION TYPES
// The swap loop produces these before pool state is committed
// ============================================================================

/// Complete result of a swap computation
#[derive(Clone, Debug)]
pub struct SwapComputation {
    /// Output paid to the recipient, net of fees
    pub amount_out: u128,
    /// Total fee charged on the output token
    pub total_fee: u128,
    /// Part of `total_fee` accrued to the protocol
    pub protocol_fee: u128,
    /// Final sqrt price after swap
    pub sqrt_price_x96: U256,
    /// Nearest tick after swap
    pub nearest_tick: i32,
    /// Final liquidity after swap
    pub liquidity: u128,
    /// Updated fee growth global for the output token
    pub fee_growth_global_x128: u128,
    /// Number of linked ticks crossed
    pub ticks_crossed: u32,
}

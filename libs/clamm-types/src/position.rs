use soroban_sdk::{contracttype, Address};

/// Position key for pool-level tracking
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionKey {
    pub owner: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

/// Position info stored in pool contract
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PositionInfo {
    /// Liquidity in this position
    pub liquidity: u128,
    /// Fee growth inside at last settlement (token0)
    pub fee_growth_inside_0_last_x128: u128,
    /// Fee growth inside at last settlement (token1)
    pub fee_growth_inside_1_last_x128: u128,
}

/// Arguments of a mint.
///
/// `lower_old` and `upper_old` are the caller's view of the linked ticks
/// immediately below `lower` and `upper`. They are only consulted when the
/// corresponding tick is not linked yet.
#[contracttype]
#[derive(Clone, Debug)]
pub struct MintParams {
    pub lower_old: i32,
    pub lower: i32,
    pub upper: i32,
    pub upper_old: i32,
    pub amount0_desired: u128,
    pub amount1_desired: u128,
    /// Pull the deposit from `position_owner` instead of expecting it to
    /// have been transferred to the pool beforehand
    pub native: bool,
    pub position_owner: Address,
    /// Receives the fees settled on an existing position
    pub recipient: Address,
}

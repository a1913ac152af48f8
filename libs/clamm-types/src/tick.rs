use soroban_sdk::contracttype;

/// A linked tick. Ticks are stored in a sorted doubly-linked list anchored
/// by the two sentinels at MIN_TICK and MAX_TICK; an entry is never removed
/// once created, even when its liquidity returns to zero.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TickInfo {
    /// Next linked tick below this one (sentinel MIN_TICK points at itself)
    pub previous_tick: i32,
    /// Next linked tick above this one (sentinel MAX_TICK points at itself)
    pub next_tick: i32,
    /// Liquidity magnitude of all ranges bounded by this tick
    pub liquidity: u128,
    /// Fee growth per unit liquidity on token0 on the far side of this tick
    pub fee_growth_outside_0_x128: u128,
    /// Fee growth per unit liquidity on token1 on the far side of this tick
    pub fee_growth_outside_1_x128: u128,
}

impl TickInfo {
    pub fn linked(previous_tick: i32, next_tick: i32) -> Self {
        Self {
            previous_tick,
            next_tick,
            ..Self::default()
        }
    }
}

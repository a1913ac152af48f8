use crate::error::PoolError;
use clamm_types::{PoolConfig, PoolState, PositionInfo, PositionKey, TickInfo};
use soroban_sdk::{contracttype, Env};

// ============================================================================
// SOROBAN RESOURCE LIMITS - Critical constraints for pool operations:
// ============================================================================
// - Ledger entry size: 128 KiB max per entry
// - Read entries per tx: 100 entries / 200 KB
// - Write entries per tx: 50 entries / 132 KB
//
// Storage layout:
// - Config and State live in instance storage (one entry)
// - Each linked tick (~60 bytes) is a separate persistent entry
// - Each position (~100 bytes) is a separate persistent entry
// - Ticks and positions are never removed; a tick at zero liquidity stays
//   linked and a position at zero liquidity keeps its fee snapshot
//
// Swap operation limits:
// - Each tick crossing reads and writes one tick entry
// - The swap also reads the neighbour of the nearest tick when buying token0
// - Crossing more than MAX_TICK_CROSSINGS_PER_SWAP ticks fails the swap
//   instead of partially filling it
//
// Mint touches the two range ticks, up to two neighbours of each new tick,
// one position and the instance entry.
// ============================================================================

/// Maximum number of tick crossings allowed per swap operation.
///
/// Every crossing costs one persistent read and one write, and a swap over
/// a densely linked range can need more than one transaction's ledger
/// budget allows. The cap keeps a swap inside that budget: a swap that
/// would cross more ticks fails with `TickCrossingLimit` and moves nothing.
/// Traders split such a swap into smaller ones. 40 crossings leaves room
/// under the 50-entry write limit for the instance entry and both token
/// balances.
pub const MAX_TICK_CROSSINGS_PER_SWAP: u32 = 40;

/// Maximum number of ticks returned by one tick list query
pub const MAX_TICK_LIST_LIMIT: u32 = 100;

/// Storage keys for the pool contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Pool configuration (Instance storage)
    Config,
    /// Current pool state (Instance storage)
    State,
    /// Linked tick: tick_index -> TickInfo (Persistent storage)
    Tick(i32),
    /// Position data: PositionKey -> PositionInfo (Persistent storage)
    Position(PositionKey),
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

/// Extend instance storage TTL
pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

/// Extend persistent storage TTL for a key
pub fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

// === Config ===

pub fn get_config(env: &Env) -> Result<PoolConfig, PoolError> {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(PoolError::NotInitialized)
}

pub fn set_config(env: &Env, config: &PoolConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    extend_instance_ttl(env);
}

// === State ===

pub fn get_state(env: &Env) -> Result<PoolState, PoolError> {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::State)
        .ok_or(PoolError::NotInitialized)
}

pub fn set_state(env: &Env, state: &PoolState) {
    env.storage().instance().set(&DataKey::State, state);
    extend_instance_ttl(env);
}

// === Tick ===

pub fn get_tick(env: &Env, tick: i32) -> Option<TickInfo> {
    let key = DataKey::Tick(tick);
    let info = env.storage().persistent().get(&key);
    if info.is_some() {
        extend_persistent_ttl(env, &key);
    }
    info
}

pub fn set_tick(env: &Env, tick: i32, info: &TickInfo) {
    let key = DataKey::Tick(tick);
    env.storage().persistent().set(&key, info);
    extend_persistent_ttl(env, &key);
}

// === Position ===

pub fn get_position(env: &Env, key: &PositionKey) -> Option<PositionInfo> {
    let data_key = DataKey::Position(key.clone());
    env.storage().persistent().get(&data_key)
}

pub fn set_position(env: &Env, key: &PositionKey, info: &PositionInfo) {
    let data_key = DataKey::Position(key.clone());
    env.storage().persistent().set(&data_key, info);
    extend_persistent_ttl(env, &data_key);
}

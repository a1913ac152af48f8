#![no_std]

use clamm_types::PROTOCOL_FEE_DENOMINATOR;
use soroban_sdk::{contract, contracterror, contractimpl, contracttype, Address, Env, Symbol};

/// Protocol-fee settings shared by every pool. Pools read the fraction and
/// the recipient from here.
#[contract]
pub struct ClammFactory;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum FactoryError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InvalidProtocolFee = 3,
}

/// Storage keys for Factory contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Admin address
    Admin,
    /// Receives protocol fees collected by pools
    FeeRecipient,
    /// Protocol share of each swap fee (basis points)
    ProtocolFee,
}

const INSTANCE_TTL_THRESHOLD: u32 = 17280;
const INSTANCE_TTL_EXTEND: u32 = 518400;

#[contractimpl]
impl ClammFactory {
    /// Initialize factory with admin and protocol fee
    pub fn initialize(env: Env, admin: Address, protocol_fee: u32) -> Result<(), FactoryError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(FactoryError::AlreadyInitialized);
        }
        admin.require_auth();
        check_protocol_fee(protocol_fee)?;

        let storage = env.storage().instance();
        storage.set(&DataKey::Admin, &admin);
        storage.set(&DataKey::ProtocolFee, &protocol_fee);

        extend_instance_ttl(&env);
        Ok(())
    }

    /// Set the protocol share of swap fees. Pools pick it up on
    /// `update_protocol_fee`.
    pub fn set_protocol_fee(env: Env, protocol_fee: u32) -> Result<(), FactoryError> {
        require_admin(&env)?;
        check_protocol_fee(protocol_fee)?;

        env.storage()
            .instance()
            .set(&DataKey::ProtocolFee, &protocol_fee);
        env.events()
            .publish((Symbol::new(&env, "protocol_fee_set"),), protocol_fee);

        extend_instance_ttl(&env);
        Ok(())
    }

    pub fn get_protocol_fee(env: Env) -> u32 {
        extend_instance_ttl(&env);
        env.storage()
            .instance()
            .get(&DataKey::ProtocolFee)
            .unwrap_or(0)
    }

    /// Set protocol fee recipient
    pub fn set_fee_recipient(env: Env, recipient: Address) -> Result<(), FactoryError> {
        require_admin(&env)?;

        env.storage()
            .instance()
            .set(&DataKey::FeeRecipient, &recipient);
        env.events()
            .publish((Symbol::new(&env, "fee_recipient_set"),), recipient);

        extend_instance_ttl(&env);
        Ok(())
    }

    /// Get protocol fee recipient
    pub fn get_fee_recipient(env: Env) -> Option<Address> {
        extend_instance_ttl(&env);
        env.storage().instance().get(&DataKey::FeeRecipient)
    }

    /// Get admin address
    pub fn get_admin(env: Env) -> Result<Address, FactoryError> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(FactoryError::NotInitialized)
    }
}

fn require_admin(env: &Env) -> Result<(), FactoryError> {
    let admin: Address = env
        .storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(FactoryError::NotInitialized)?;
    admin.require_auth();
    Ok(())
}

fn check_protocol_fee(protocol_fee: u32) -> Result<(), FactoryError> {
    if protocol_fee as u128 > PROTOCOL_FEE_DENOMINATOR {
        return Err(FactoryError::InvalidProtocolFee);
    }
    Ok(())
}

fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

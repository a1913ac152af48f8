use crate::{ClammPool, ClammPoolClient};
use clamm_factory::{ClammFactory, ClammFactoryClient};
use clamm_types::{MintParams, MIN_TICK, Q96};
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{token, Address, Env, U256};

pub const SWAP_FEE: u32 = 3000;
pub const TICK_SPACING: i32 = 60;
pub const PROTOCOL_FEE: u32 = 1000;

/// A 0.3% pool at price 1 wired to a real factory and two Stellar assets.
pub struct PoolTest<'a> {
    pub env: Env,
    pub pool: ClammPoolClient<'a>,
    pub factory: ClammFactoryClient<'a>,
    pub token0: token::Client<'a>,
    pub token1: token::Client<'a>,
    token0_admin: token::StellarAssetClient<'a>,
    token1_admin: token::StellarAssetClient<'a>,
    pub fee_recipient: Address,
}

impl<'a> PoolTest<'a> {
    pub fn new() -> Self {
        Self::setup(true)
    }

    pub fn without_fee_recipient() -> Self {
        Self::setup(false)
    }

    fn setup(with_fee_recipient: bool) -> Self {
        let env = Env::default();
        env.mock_all_auths();

        let admin = Address::generate(&env);
        let factory = ClammFactoryClient::new(&env, &env.register(ClammFactory, ()));
        factory.initialize(&admin, &PROTOCOL_FEE);

        let fee_recipient = Address::generate(&env);
        if with_fee_recipient {
            factory.set_fee_recipient(&fee_recipient);
        }

        let asset_a = env
            .register_stellar_asset_contract_v2(admin.clone())
            .address();
        let asset_b = env
            .register_stellar_asset_contract_v2(admin.clone())
            .address();
        let (token0, token1) = if asset_a < asset_b {
            (asset_a, asset_b)
        } else {
            (asset_b, asset_a)
        };

        let pool = ClammPoolClient::new(&env, &env.register(ClammPool, ()));
        pool.initialize(
            &factory.address,
            &token0,
            &token1,
            &SWAP_FEE,
            &TICK_SPACING,
            &PROTOCOL_FEE,
            &U256::from_u128(&env, Q96),
        );

        PoolTest {
            pool,
            factory,
            token0: token::Client::new(&env, &token0),
            token1: token::Client::new(&env, &token1),
            token0_admin: token::StellarAssetClient::new(&env, &token0),
            token1_admin: token::StellarAssetClient::new(&env, &token1),
            fee_recipient,
            env,
        }
    }

    pub fn fund(&self, to: &Address, amount0: u128, amount1: u128) {
        if amount0 > 0 {
            self.token0_admin.mint(to, &(amount0 as i128));
        }
        if amount1 > 0 {
            self.token1_admin.mint(to, &(amount1 as i128));
        }
    }

    /// Linked neighbours to insert `lower` and `upper` after.
    pub fn neighbours(&self, lower: i32, upper: i32) -> (i32, i32) {
        let ticks = self.pool.get_tick_list(&100);
        let mut lower_old = MIN_TICK;
        let mut upper_old = MIN_TICK;
        for tick in ticks.iter() {
            if tick < lower {
                lower_old = lower_old.max(tick);
            }
            if tick < upper {
                upper_old = upper_old.max(tick);
            }
        }
        // The lower tick is linked first, so it can precede the upper one.
        if lower < upper {
            upper_old = upper_old.max(lower);
        }
        (lower_old, upper_old)
    }

    pub fn mint_params(
        &self,
        owner: &Address,
        lower: i32,
        upper: i32,
        amount0: u128,
        amount1: u128,
        native: bool,
    ) -> MintParams {
        let (lower_old, upper_old) = self.neighbours(lower, upper);
        MintParams {
            lower_old,
            lower,
            upper,
            upper_old,
            amount0_desired: amount0,
            amount1_desired: amount1,
            native,
            position_owner: owner.clone(),
            recipient: owner.clone(),
        }
    }

    /// Fund `owner` and mint, transferring up front unless `native`.
    pub fn mint(
        &self,
        owner: &Address,
        lower: i32,
        upper: i32,
        amount0: u128,
        amount1: u128,
        native: bool,
    ) -> (u128, u128, u128) {
        self.fund(owner, amount0, amount1);
        if !native {
            if amount0 > 0 {
                self.token0
                    .transfer(owner, &self.pool.address, &(amount0 as i128));
            }
            if amount1 > 0 {
                self.token1
                    .transfer(owner, &self.pool.address, &(amount1 as i128));
            }
        }
        self.pool
            .mint(&self.mint_params(owner, lower, upper, amount0, amount1, native))
    }

    /// Fund `trader`, send the input to the pool and swap.
    pub fn swap(&self, trader: &Address, zero_for_one: bool, amount_in: u128, min_out: u128) -> u128 {
        let token_in = if zero_for_one {
            self.fund(trader, amount_in, 0);
            &self.token0
        } else {
            self.fund(trader, 0, amount_in);
            &self.token1
        };
        token_in.transfer(trader, &self.pool.address, &(amount_in as i128));
        self.pool
            .swap(&zero_for_one, &amount_in, trader, &min_out)
    }
}

use soroban_sdk::contracterror;

/// Errors returned by the pool. Any error aborts the whole invocation and
/// discards every storage write made by it.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PoolError {
    // Setup
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InvalidTokenOrder = 3,
    InvalidTickSpacing = 4,
    InvalidFee = 5,
    InvalidProtocolFee = 6,
    PriceOutOfBounds = 7,

    // Range validation, checked before any state changes
    TickOutOfBounds = 10,
    InvalidTick = 11,
    LowerEven = 12,
    UpperOdd = 13,
    WrongOrder = 14,

    // Linked list: the supplied neighbour is not the predecessor
    LowerOrder = 15,
    UpperOrder = 16,
    TickNotLinked = 17,

    // Liquidity and funds
    ZeroLiquidity = 20,
    ZeroAmount = 21,
    LiquidityOverflow = 22,
    AmountOverflow = 23,
    InsufficientLiquidity = 24,
    InsufficientReserves = 25,
    Token0Missing = 26,
    Token1Missing = 27,

    // Swap
    TooLittleReceived = 30,
    TickCrossingLimit = 31,

    // Protocol fee
    FeeRecipientNotSet = 40,
}

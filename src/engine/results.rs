// 8.0.2: result types and errors for engine operations.

use crate::deposit::DepositSnapshot;
use crate::news::NewsError;
use crate::position::PositionError;
use crate::price_table::PriceTableError;
use crate::rates::RateError;
use crate::store::StoreError;
use crate::types::{Cash, Direction, Price, Symbol, UserId};
use rust_decimal::Decimal;

/// What one settlement pass did to a user record.
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    pub expired_holdings: usize,
    pub spot_cash: Cash,
    pub settled_futures: usize,
    pub futures_pnl: Cash,
    /// Expired futures left open because no exit price could be resolved.
    pub deferred_futures: Vec<Symbol>,
    pub deposit_payout: Option<Cash>,
    /// Display view of a still-active deposit.
    pub deposit: Option<DepositSnapshot>,
}

impl SweepReport {
    pub fn cash_delta(&self) -> Cash {
        self.spot_cash
            .add(self.futures_pnl)
            .add(self.deposit_payout.unwrap_or_else(Cash::zero))
    }

    pub fn is_noop(&self) -> bool {
        self.expired_holdings == 0
            && self.settled_futures == 0
            && self.deferred_futures.is_empty()
            && self.deposit_payout.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct SpotFill {
    pub symbol: Symbol,
    pub direction: Direction,
    pub shares: Decimal,
    pub price: Price,
    pub cash_delta: Cash,
    pub remaining_shares: Decimal,
    pub cash_balance: Cash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub applied: bool,
    pub instruments: usize,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VenueError {
    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(Decimal),

    #[error("price must be positive, got {0}")]
    InvalidPrice(Decimal),

    #[error("leverage {got} outside {min}..={max}")]
    InvalidLeverage { got: u32, min: u32, max: u32 },

    #[error("{field} {value}% exceeds the ±{cap}% cap")]
    ImpactOutOfRange {
        field: &'static str,
        value: Decimal,
        cap: Decimal,
    },

    #[error("invalid headline: {0}")]
    InvalidHeadline(String),

    #[error("interest rate must be non-negative, got {0}")]
    InvalidRate(Decimal),

    #[error("amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    #[error("{0} out of range")]
    ValueOutOfRange(&'static str),

    #[error("unknown symbol {0}")]
    UnknownSymbol(Symbol),

    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Cash, available: Cash },

    #[error("insufficient margin: required {required}, available {available}")]
    InsufficientMargin { required: Cash, available: Cash },

    #[error("insufficient shares: held {held}, requested {requested}")]
    InsufficientShares { held: Decimal, requested: Decimal },

    #[error("user {0} not found")]
    UserNotFound(UserId),

    #[error("no {direction} holding in {symbol}")]
    HoldingNotFound { symbol: Symbol, direction: Direction },

    #[error("market is paused")]
    MarketPaused,

    #[error("a deposit is already active")]
    DepositActive,

    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    #[error("drift batch has {got} entries, table has {expected}")]
    DriftBatch { expected: usize, got: usize },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl VenueError {
    /// Validation and business-rule rejections. Everything else is a failure.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, VenueError::Store(_) | VenueError::DriftBatch { .. })
    }
}

impl From<PriceTableError> for VenueError {
    fn from(err: PriceTableError) -> Self {
        match err {
            PriceTableError::UnknownSymbol(symbol) => VenueError::UnknownSymbol(symbol),
            PriceTableError::DriftBatchMismatch { expected, got } => VenueError::DriftBatch { expected, got },
        }
    }
}

impl From<NewsError> for VenueError {
    fn from(err: NewsError) -> Self {
        match err {
            NewsError::ImpactOutOfRange { field, value, cap } => VenueError::ImpactOutOfRange { field, value, cap },
            NewsError::UnknownSymbol(symbol) => VenueError::UnknownSymbol(symbol),
            other => VenueError::InvalidHeadline(other.to_string()),
        }
    }
}

impl From<RateError> for VenueError {
    fn from(err: RateError) -> Self {
        match err {
            RateError::Negative(rate) => VenueError::InvalidRate(rate),
        }
    }
}

impl From<PositionError> for VenueError {
    fn from(err: PositionError) -> Self {
        match err {
            PositionError::InsufficientShares { held, requested } => VenueError::InsufficientShares { held, requested },
            PositionError::Overflow => VenueError::ValueOutOfRange("position size"),
        }
    }
}

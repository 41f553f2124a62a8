// 4.0: positions. two kinds live on a user record:
//   Holding      spot long/short, one per (symbol, direction), merged by weighted average cost
//   FuturesOrder leveraged and time-boxed, never merged, never mutated after open
// 4.3 at the bottom has the futures pnl and margin formulas.

use crate::price_table::PriceQuote;
use crate::types::{Cash, Direction, Leverage, Price, Symbol, Timestamp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

// allocation weight given to a holding opened outside the catalog defaults
pub const DEFAULT_ALLOCATION: Decimal = dec!(5);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: Symbol,
    pub name: String,
    pub shares: Decimal,
    pub avg_cost: Price,
    /// Last observed price, synced from the price table on every sweep.
    pub price: Price,
    pub percent_change: Decimal,
    pub allocation: Decimal,
    pub direction: Direction,
    pub opened_at: Option<Timestamp>,
    /// `None` never expires.
    pub expires_at: Option<Timestamp>,
}

impl Holding {
    pub fn open(
        symbol: Symbol,
        name: String,
        shares: Decimal,
        price: Price,
        direction: Direction,
        now: Timestamp,
        expires_at: Timestamp,
    ) -> Self {
        Self {
            symbol,
            name,
            shares,
            avg_cost: price,
            price,
            percent_change: Decimal::ZERO,
            allocation: DEFAULT_ALLOCATION,
            direction,
            opened_at: Some(now),
            expires_at: Some(expires_at),
        }
    }

    pub fn matches(&self, symbol: &Symbol, direction: Direction) -> bool {
        &self.symbol == symbol && self.direction == direction
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    pub fn market_value(&self) -> Cash {
        Cash::new(self.price.value() * self.shares)
    }

    pub fn cost_basis(&self) -> Cash {
        Cash::new(self.avg_cost.value() * self.shares)
    }

    // 4.1: cash effect of letting the position run out at the current price.
    // long sells out (credit), short buys to cover (debit).
    pub fn expiry_cash(&self) -> Cash {
        Cash::new(self.direction.sign() * self.price.value() * self.shares)
    }

    pub fn sync_quote(&mut self, quote: &PriceQuote) {
        self.price = quote.price;
        self.percent_change = quote.percent_change;
    }

    // 4.2: top-up. the whole merged position restarts its expiry clock.
    // avg cost is rounded to cents but not floored; fills may be below the table floor.
    pub fn add_shares(
        &mut self,
        shares: Decimal,
        price: Price,
        now: Timestamp,
        expires_at: Timestamp,
    ) -> Result<Decimal, PositionError> {
        let total_shares = self.shares.checked_add(shares).ok_or(PositionError::Overflow)?;
        let total_cost = self
            .avg_cost
            .value()
            .checked_mul(self.shares)
            .zip(price.value().checked_mul(shares))
            .and_then(|(held, added)| held.checked_add(added))
            .ok_or(PositionError::Overflow)?;
        self.avg_cost = total_cost
            .checked_div(total_shares)
            .and_then(Price::cents)
            .ok_or(PositionError::Overflow)?;
        self.shares = total_shares;
        self.price = price;
        self.percent_change = Decimal::ZERO;
        self.opened_at = Some(now);
        self.expires_at = Some(expires_at);
        Ok(self.shares)
    }

    // 4.2: partial or full close. caller removes the holding when shares reach zero.
    pub fn remove_shares(
        &mut self,
        shares: Decimal,
        price: Price,
        now: Timestamp,
        expires_at: Timestamp,
    ) -> Result<Decimal, PositionError> {
        if shares > self.shares {
            return Err(PositionError::InsufficientShares {
                held: self.shares,
                requested: shares,
            });
        }
        self.shares -= shares;
        self.price = price;
        self.percent_change = Decimal::ZERO;
        if !self.shares.is_zero() {
            self.opened_at = Some(now);
            self.expires_at = Some(expires_at);
        }
        Ok(self.shares)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuturesOrder {
    pub symbol: Symbol,
    pub name: String,
    /// Contracts.
    pub shares: Decimal,
    pub leverage: Leverage,
    pub direction: Direction,
    pub entry_price: Price,
    pub opened_at: Timestamp,
    pub expires_at: Timestamp,
}

impl FuturesOrder {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }

    pub fn reserved_margin(&self, multiplier: Decimal) -> Cash {
        required_margin(self.entry_price, self.shares, self.leverage, multiplier)
    }

    pub fn pnl(&self, exit_price: Price, multiplier: Decimal) -> Cash {
        futures_pnl(
            self.direction,
            self.entry_price,
            exit_price,
            self.shares,
            self.leverage,
            multiplier,
        )
    }
}

// 4.3: directional pnl, scaled by leverage and the contract multiplier
pub fn futures_pnl(
    direction: Direction,
    entry: Price,
    exit: Price,
    shares: Decimal,
    leverage: Leverage,
    multiplier: Decimal,
) -> Cash {
    let move_per_share = (exit.value() - entry.value()) * direction.sign();
    Cash::new(move_per_share * shares * leverage.as_decimal() * multiplier)
}

// 4.4: margin = notional / leverage. stored orders passed the checked form on open.
pub fn required_margin(price: Price, shares: Decimal, leverage: Leverage, multiplier: Decimal) -> Cash {
    Cash::new(price.value() * shares * multiplier / leverage.as_decimal())
}

// None when the notional leaves the decimal range
pub fn checked_required_margin(price: Price, shares: Decimal, leverage: Leverage, multiplier: Decimal) -> Option<Cash> {
    price
        .value()
        .checked_mul(shares)?
        .checked_mul(multiplier)?
        .checked_div(leverage.as_decimal())
        .map(Cash::new)
}

pub fn reserved_margin(orders: &[FuturesOrder], multiplier: Decimal) -> Cash {
    orders.iter().map(|o| o.reserved_margin(multiplier)).sum()
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("insufficient shares: held {held}, requested {requested}")]
    InsufficientShares { held: Decimal, requested: Decimal },
    #[error("position size out of range")]
    Overflow,
}

//! Order placement: spot buy/sell and futures open.
//!
//! Every entry point sweeps the user first, then validates, then mutates.
//! A rejection leaves the record exactly as the sweep left it.

use super::core::Engine;
use super::results::{SpotFill, VenueError};
use crate::account::UserRecord;
use crate::events::{EventPayload, FuturesOpenedEvent, OrderRejectedEvent, SpotOrderFilledEvent};
use crate::position::{checked_required_margin, FuturesOrder, Holding};
use crate::types::{Cash, Direction, Leverage, Price, Symbol, TradeAction, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotOrder {
    pub symbol: Symbol,
    pub shares: Decimal,
    /// Execution price as submitted by the client.
    pub price: Decimal,
    pub action: TradeAction,
    pub direction: Direction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuturesTicket {
    pub symbol: Symbol,
    pub shares: Decimal,
    pub price: Decimal,
    pub leverage: u32,
    pub direction: Direction,
}

impl Engine {
    pub(super) fn reject(&mut self, user_id: UserId, err: VenueError) -> VenueError {
        warn!(user = %user_id, reason = %err, "order rejected");
        self.emit_event(EventPayload::OrderRejected(OrderRejectedEvent {
            user_id,
            reason: err.to_string(),
        }));
        err
    }

    // gates shared by every trading and deposit entry point
    pub(super) fn check_can_trade(&self, user: &UserRecord) -> Result<(), VenueError> {
        if user.is_admin() {
            return Err(VenueError::Forbidden("admin accounts cannot hold positions"));
        }
        if !self.clock.is_running() {
            return Err(VenueError::MarketPaused);
        }
        Ok(())
    }

    fn check_instrument(&self, symbol: &Symbol, shares: Decimal, price: Decimal) -> Result<Price, VenueError> {
        if shares <= Decimal::ZERO {
            return Err(VenueError::InvalidQuantity(shares));
        }
        let price = Price::new(price).ok_or(VenueError::InvalidPrice(price))?;
        if !self.catalog.contains(symbol) {
            return Err(VenueError::UnknownSymbol(symbol.clone()));
        }
        Ok(price)
    }

    pub fn place_spot_order(&mut self, user: &mut UserRecord, order: SpotOrder) -> Result<SpotFill, VenueError> {
        self.settle(user);
        match self.execute_spot(user, &order) {
            Ok(fill) => Ok(fill),
            Err(err) => Err(self.reject(user.id, err)),
        }
    }

    fn execute_spot(&mut self, user: &mut UserRecord, order: &SpotOrder) -> Result<SpotFill, VenueError> {
        self.check_can_trade(user)?;
        let price = self.check_instrument(&order.symbol, order.shares, order.price)?;

        let now = self.current_time;
        let expires_at = now.plus_millis(self.config.durations.spot_position_ms);
        let raw_value = price
            .value()
            .checked_mul(order.shares)
            .ok_or(VenueError::ValueOutOfRange("order value"))?;
        let order_value = Cash::new(raw_value).rounded();
        if order_value.value() <= Decimal::ZERO {
            return Err(VenueError::InvalidAmount(raw_value));
        }
        let long = order.direction == Direction::Long;
        let opens = order.action.opens(order.direction);

        // opening a long and closing a short pay out, the other two take in.
        // the balance must fit before the holding changes.
        let cash_delta = if opens == long { order_value.negate() } else { order_value };
        if user.cash_balance.checked_add(cash_delta).is_none() {
            return Err(VenueError::ValueOutOfRange("cash balance"));
        }

        let remaining_shares = if opens {
            if long && user.cash_balance < order_value {
                return Err(VenueError::InsufficientFunds {
                    required: order_value,
                    available: user.cash_balance,
                });
            }

            match user.holding_index(&order.symbol, order.direction) {
                Some(i) => user.holdings[i].add_shares(order.shares, price, now, expires_at)?,
                None => {
                    let name = self.catalog.display_name(&order.symbol);
                    user.holdings.push(Holding::open(
                        order.symbol.clone(),
                        name,
                        order.shares,
                        price,
                        order.direction,
                        now,
                        expires_at,
                    ));
                    order.shares
                }
            }
        } else {
            let index = user
                .holding_index(&order.symbol, order.direction)
                .ok_or_else(|| VenueError::HoldingNotFound {
                    symbol: order.symbol.clone(),
                    direction: order.direction,
                })?;
            let remaining = user.holdings[index].remove_shares(order.shares, price, now, expires_at)?;
            if remaining.is_zero() {
                user.holdings.remove(index);
            }
            remaining
        };

        user.credit(cash_delta);

        info!(
            user = %user.id,
            symbol = %order.symbol,
            action = ?order.action,
            direction = %order.direction,
            shares = %order.shares,
            %price,
            "spot order filled"
        );
        self.emit_event(EventPayload::SpotOrderFilled(SpotOrderFilledEvent {
            user_id: user.id,
            symbol: order.symbol.clone(),
            action: order.action,
            direction: order.direction,
            shares: order.shares,
            price,
            cash_delta,
            remaining_shares,
        }));

        Ok(SpotFill {
            symbol: order.symbol.clone(),
            direction: order.direction,
            shares: order.shares,
            price,
            cash_delta,
            remaining_shares,
            cash_balance: user.cash_balance,
        })
    }

    /// Margin is a reservation against nominal cash. Nothing is debited on open.
    pub fn open_futures(&mut self, user: &mut UserRecord, ticket: FuturesTicket) -> Result<FuturesOrder, VenueError> {
        self.settle(user);
        match self.execute_futures(user, &ticket) {
            Ok(order) => Ok(order),
            Err(err) => Err(self.reject(user.id, err)),
        }
    }

    fn execute_futures(&mut self, user: &mut UserRecord, ticket: &FuturesTicket) -> Result<FuturesOrder, VenueError> {
        self.check_can_trade(user)?;
        let terms = &self.config.futures;
        let leverage = Leverage::new(ticket.leverage)
            .filter(|l| (terms.min_leverage..=terms.max_leverage).contains(&l.value()))
            .ok_or(VenueError::InvalidLeverage {
                got: ticket.leverage,
                min: terms.min_leverage,
                max: terms.max_leverage,
            })?;
        let price = self.check_instrument(&ticket.symbol, ticket.shares, ticket.price)?;
        let entry_price = Price::new(price.value().round_dp(2)).ok_or(VenueError::InvalidPrice(ticket.price))?;

        let multiplier = self.config.futures.contract_multiplier;
        let required = checked_required_margin(entry_price, ticket.shares, leverage, multiplier)
            .ok_or(VenueError::ValueOutOfRange("required margin"))?;
        let available = user.cash_balance.sub(user.reserved_margin(multiplier));
        if available < required {
            return Err(VenueError::InsufficientMargin { required, available });
        }

        let now = self.current_time;
        let order = FuturesOrder {
            symbol: ticket.symbol.clone(),
            name: self.catalog.display_name(&ticket.symbol),
            shares: ticket.shares,
            leverage,
            direction: ticket.direction,
            entry_price,
            opened_at: now,
            expires_at: now.plus_millis(self.config.durations.futures_position_ms),
        };
        user.futures_orders.push(order.clone());

        info!(
            user = %user.id,
            symbol = %order.symbol,
            direction = %order.direction,
            %leverage,
            %required,
            "futures opened"
        );
        self.emit_event(EventPayload::FuturesOpened(FuturesOpenedEvent {
            user_id: user.id,
            symbol: order.symbol.clone(),
            direction: order.direction,
            shares: order.shares,
            leverage,
            entry_price,
            required_margin: required,
            expires_at: order.expires_at,
        }));
        Ok(order)
    }
}

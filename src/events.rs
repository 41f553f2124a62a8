// 11.0: every state change produces an event. the engine keeps a bounded log of them
// for audit and for the demo binary. the EventPayload enum lists all event types.

use crate::market::MarketState;
use crate::news::{HeadlineId, HeadlineOrigin};
use crate::types::{Cash, Direction, Leverage, Price, Symbol, Timestamp, TradeAction, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(id: EventId, timestamp: Timestamp, payload: EventPayload) -> Self {
        Self {
            id,
            timestamp,
            payload,
        }
    }

    pub fn user(&self) -> Option<UserId> {
        match &self.payload {
            EventPayload::SpotOrderFilled(e) => Some(e.user_id),
            EventPayload::FuturesOpened(e) => Some(e.user_id),
            EventPayload::HoldingExpired(e) => Some(e.user_id),
            EventPayload::FuturesSettled(e) => Some(e.user_id),
            EventPayload::FuturesDeferred(e) => Some(e.user_id),
            EventPayload::DepositOpened(e) => Some(e.user_id),
            EventPayload::DepositMatured(e) => Some(e.user_id),
            EventPayload::OrderRejected(e) => Some(e.user_id),
            EventPayload::CashAdjusted(e) => Some(e.user_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    // Market control
    MarketControl(MarketControlEvent),

    // Feed events
    PriceTick(PriceTickEvent),
    PriceOverride(PriceOverrideEvent),
    NewsPublished(NewsPublishedEvent),
    RateAdjusted(RateAdjustedEvent),

    // Trading events
    SpotOrderFilled(SpotOrderFilledEvent),
    FuturesOpened(FuturesOpenedEvent),
    OrderRejected(OrderRejectedEvent),

    // Settlement events
    HoldingExpired(HoldingExpiredEvent),
    FuturesSettled(FuturesSettledEvent),
    FuturesDeferred(FuturesDeferredEvent),

    // Deposit events
    DepositOpened(DepositOpenedEvent),
    DepositMatured(DepositMaturedEvent),

    // Operator account events
    CashAdjusted(CashAdjustedEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketControlEvent {
    pub state: MarketState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTickEvent {
    pub instruments: usize,
    /// False when the market was paused and only the observation time moved.
    pub applied: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceOverrideEvent {
    pub symbol: Symbol,
    pub old_price: Price,
    pub new_price: Price,
    pub percent_change: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsPublishedEvent {
    pub headline_id: HeadlineId,
    pub origin: HeadlineOrigin,
    pub symbol: Symbol,
    pub impact: Decimal,
    pub rate_impact: Decimal,
    pub price_move: Option<(Price, Price)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateAdjustedEvent {
    pub source: RateSource,
    pub old_rate: Decimal,
    pub new_rate: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateSource {
    News(HeadlineId),
    Operator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotOrderFilledEvent {
    pub user_id: UserId,
    pub symbol: Symbol,
    pub action: TradeAction,
    pub direction: Direction,
    pub shares: Decimal,
    pub price: Price,
    pub cash_delta: Cash,
    /// Shares left in the (symbol, direction) holding after the fill.
    pub remaining_shares: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuturesOpenedEvent {
    pub user_id: UserId,
    pub symbol: Symbol,
    pub direction: Direction,
    pub shares: Decimal,
    pub leverage: Leverage,
    pub entry_price: Price,
    pub required_margin: Cash,
    pub expires_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRejectedEvent {
    pub user_id: UserId,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingExpiredEvent {
    pub user_id: UserId,
    pub symbol: Symbol,
    pub direction: Direction,
    pub shares: Decimal,
    pub price: Price,
    pub cash_delta: Cash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuturesSettledEvent {
    pub user_id: UserId,
    pub symbol: Symbol,
    pub direction: Direction,
    pub entry_price: Price,
    pub exit_price: Price,
    pub pnl: Cash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuturesDeferredEvent {
    pub user_id: UserId,
    pub symbol: Symbol,
    pub expires_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositOpenedEvent {
    pub user_id: UserId,
    pub amount: Cash,
    pub due_at: Timestamp,
    pub rate_at_open: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositMaturedEvent {
    pub user_id: UserId,
    pub principal: Cash,
    pub interest: Cash,
    pub rate_applied: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashAdjustedEvent {
    pub user_id: UserId,
    pub old_balance: Cash,
    pub new_balance: Cash,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn user_scoped_events_report_their_user() {
        let event = Event::new(
            EventId(1),
            Timestamp::from_millis(1000),
            EventPayload::DepositOpened(DepositOpenedEvent {
                user_id: UserId(7),
                amount: Cash::new(dec!(500)),
                due_at: Timestamp::from_millis(301_000),
                rate_at_open: dec!(0.0425),
            }),
        );
        assert_eq!(event.user(), Some(UserId(7)));

        let tick = Event::new(
            EventId(2),
            Timestamp::from_millis(1000),
            EventPayload::PriceTick(PriceTickEvent {
                instruments: 12,
                applied: true,
            }),
        );
        assert_eq!(tick.user(), None);
    }
}

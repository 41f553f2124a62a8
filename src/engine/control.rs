//! Market control actions: start, pause, reset, set interest rate.

use super::core::Engine;
use super::results::VenueError;
use crate::events::{EventPayload, MarketControlEvent, RateAdjustedEvent, RateSource};
use crate::market::MarketState;
use rust_decimal::Decimal;
use tracing::info;

impl Engine {
    pub fn start(&mut self) -> MarketState {
        let state = self.clock.set_running(true, self.current_time);
        info!(nonce = state.reset_nonce, "market started");
        self.emit_event(EventPayload::MarketControl(MarketControlEvent { state: state.clone() }));
        state
    }

    pub fn pause(&mut self) -> MarketState {
        let state = self.clock.set_running(false, self.current_time);
        info!(nonce = state.reset_nonce, "market paused");
        self.emit_event(EventPayload::MarketControl(MarketControlEvent { state: state.clone() }));
        state
    }

    /// Resumes the market, bumps the reset nonce, and re-seeds the price table and
    /// news backlog from the catalog. The benchmark rate is kept.
    pub fn reset(&mut self) -> MarketState {
        let now = self.current_time;
        let state = self.clock.reset(now);
        self.prices.reseed(&self.catalog);
        self.news.reseed(&self.catalog, now);
        info!(nonce = state.reset_nonce, "market reset");
        self.emit_event(EventPayload::MarketControl(MarketControlEvent { state: state.clone() }));
        state
    }

    /// Operator override. Absolute, unclamped, rejected only when negative.
    pub fn set_interest_rate(&mut self, rate: Decimal) -> Result<MarketState, VenueError> {
        let old_rate = self.clock.interest_rate();
        let state = self.clock.set_interest_rate(rate, self.current_time)?;
        info!(%old_rate, new_rate = %state.interest_rate, "interest rate set");
        self.emit_event(EventPayload::RateAdjusted(RateAdjustedEvent {
            source: RateSource::Operator,
            old_rate,
            new_rate: state.interest_rate,
        }));
        self.emit_event(EventPayload::MarketControl(MarketControlEvent { state: state.clone() }));
        Ok(state)
    }
}

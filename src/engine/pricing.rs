//! Price table operations: ambient ticks and operator overrides.

use super::core::Engine;
use super::results::{TickOutcome, VenueError};
use crate::events::{EventPayload, PriceOverrideEvent, PriceTickEvent};
use crate::price_table::PriceQuote;
use crate::types::{Price, Symbol};
use rust_decimal::Decimal;
use tracing::{debug, info};

impl Engine {
    /// One ambient drift step for every instrument. While paused only the
    /// observation timestamp moves.
    pub fn tick(&mut self) -> Result<TickOutcome, VenueError> {
        let instruments = self.prices.len();

        if !self.clock.is_running() {
            self.prices.mark_observed(self.current_time);
            self.emit_event(EventPayload::PriceTick(PriceTickEvent {
                instruments,
                applied: false,
            }));
            return Ok(TickOutcome {
                applied: false,
                instruments,
            });
        }

        let drifts = self.drift.draw_batch(instruments);
        self.prices.apply_drift(&drifts, self.current_time)?;
        debug!(instruments, "price tick applied");

        self.emit_event(EventPayload::PriceTick(PriceTickEvent {
            instruments,
            applied: true,
        }));
        Ok(TickOutcome {
            applied: true,
            instruments,
        })
    }

    /// Operator sets an absolute price. Allowed while paused.
    pub fn set_price(&mut self, symbol: &Symbol, price: Decimal) -> Result<PriceQuote, VenueError> {
        let price = Price::new(price).ok_or(VenueError::InvalidPrice(price))?;
        let old_price = self
            .prices
            .price(symbol)
            .ok_or_else(|| VenueError::UnknownSymbol(symbol.clone()))?;

        let quote = self.prices.set_price(symbol, price)?;
        info!(%symbol, %old_price, new_price = %quote.price, "price override");

        self.emit_event(EventPayload::PriceOverride(PriceOverrideEvent {
            symbol: symbol.clone(),
            old_price,
            new_price: quote.price,
            percent_change: quote.percent_change,
        }));
        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VenueConfig;
    use crate::types::Timestamp;
    use rust_decimal_macros::dec;

    fn engine() -> Engine {
        Engine::new(VenueConfig::deterministic(21))
    }

    #[test]
    fn paused_tick_only_marks_observation() {
        let mut e = engine();
        e.pause();
        e.set_time(Timestamp::from_millis(6_000));
        let before: Vec<_> = e.prices().quotes().to_vec();

        let outcome = e.tick().unwrap();
        assert!(!outcome.applied);
        assert_eq!(e.prices().last_tick_at(), Some(Timestamp::from_millis(6_000)));
        for (a, b) in before.iter().zip(e.prices().quotes()) {
            assert_eq!(a.price, b.price);
            assert_eq!(a.percent_change, b.percent_change);
        }
    }

    #[test]
    fn running_tick_moves_within_band() {
        let mut e = engine();
        let before: Vec<_> = e.prices().quotes().to_vec();
        assert!(e.tick().unwrap().applied);
        for (a, b) in before.iter().zip(e.prices().quotes()) {
            assert!(b.percent_change.abs() <= dec!(0.45));
            let bound = a.price.value() * dec!(0.0046);
            assert!((b.price.value() - a.price.value()).abs() <= bound);
        }
    }

    #[test]
    fn override_validates_input() {
        let mut e = engine();
        assert_eq!(
            e.set_price(&Symbol::new("AAPL"), Decimal::ZERO).unwrap_err(),
            VenueError::InvalidPrice(Decimal::ZERO)
        );
        assert!(matches!(
            e.set_price(&Symbol::new("NOPE"), dec!(10)),
            Err(VenueError::UnknownSymbol(_))
        ));
        let quote = e.set_price(&Symbol::new("AAPL"), dec!(213.73)).unwrap();
        assert_eq!(quote.percent_change, dec!(10.00));
    }
}

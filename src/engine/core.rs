// 8.0 engine/core.rs: main engine. holds the market clock, price table, drift generator,
// news engine and the audit log. user records are passed in, never owned.

use crate::catalog::Catalog;
use crate::config::{ConfigError, VenueConfig};
use crate::events::{Event, EventId, EventPayload};
use crate::market::{MarketClock, MarketState};
use crate::news::{Headline, NewsEngine};
use crate::price_gen::PriceGenerator;
use crate::price_table::{PriceQuote, PriceTable};
use crate::types::{Symbol, Timestamp};
use rust_decimal::Decimal;

/** 8.1: main engine struct. all shared market state lives here */
#[derive(Debug)]
pub struct Engine {
    pub(super) config: VenueConfig,
    pub(super) catalog: Catalog,
    pub(super) clock: MarketClock,
    pub(super) prices: PriceTable,
    pub(super) drift: PriceGenerator,
    pub(super) news: NewsEngine,
    pub(super) events: Vec<Event>,
    pub(super) next_event_id: u64,
    pub(super) current_time: Timestamp,
}

impl Engine {
    /// Builds without validating `config`. Use [`try_new`](Self::try_new) for configs
    /// that did not come through [`VenueConfig::validate`].
    pub fn new(config: VenueConfig) -> Self {
        Self::with_catalog(config, Catalog::default_equities())
    }

    pub fn try_new(config: VenueConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Same contract as [`new`](Self::new): the caller validates.
    pub fn with_catalog(config: VenueConfig, catalog: Catalog) -> Self {
        let now = Timestamp::from_millis(0);
        let mut news = NewsEngine::new(&config.feed);
        news.reseed(&catalog, now);
        Self {
            clock: MarketClock::new(&config.rates, now),
            prices: PriceTable::from_catalog(&catalog),
            drift: PriceGenerator::new(&config.feed),
            news,
            catalog,
            config,
            events: Vec::new(),
            next_event_id: 1,
            current_time: now,
        }
    }

    pub fn set_time(&mut self, timestamp: Timestamp) {
        self.current_time = timestamp;
    }

    pub fn time(&self) -> Timestamp {
        self.current_time
    }

    pub fn advance_time(&mut self, millis: i64) {
        self.current_time = self.current_time.plus_millis(millis);
    }

    pub fn config(&self) -> &VenueConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn market_state(&self) -> MarketState {
        self.clock.state()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn interest_rate(&self) -> Decimal {
        self.clock.interest_rate()
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    pub fn quote(&self, symbol: &Symbol) -> Option<&PriceQuote> {
        self.prices.get(symbol)
    }

    /// Most recent headlines first.
    pub fn news_feed(&self, limit: usize) -> Vec<Headline> {
        self.news.recent(limit)
    }

    pub fn recent_events(&self, count: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub(super) fn emit_event(&mut self, payload: EventPayload) {
        let event = Event::new(EventId(self.next_event_id), self.current_time, payload);
        self.next_event_id += 1;

        tracing::trace!(event_id = event.id.0, payload = ?event.payload, "event");

        self.events.push(event);

        if self.events.len() > self.config.max_events {
            let drain_count = self.events.len() - self.config.max_events;
            self.events.drain(0..drain_count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::PriceTickEvent;

    #[test]
    fn starts_running_with_seeded_backlog() {
        let engine = Engine::new(VenueConfig::deterministic(1));
        assert!(engine.is_running());
        assert_eq!(engine.prices().len(), 12);
        assert_eq!(engine.news_feed(100).len(), 12);
        assert!(engine.events().is_empty());
    }

    #[test]
    fn event_log_is_bounded() {
        let mut config = VenueConfig::deterministic(1);
        config.max_events = 3;
        let mut engine = Engine::new(config);
        for _ in 0..5 {
            engine.emit_event(EventPayload::PriceTick(PriceTickEvent {
                instruments: 12,
                applied: true,
            }));
        }
        assert_eq!(engine.events().len(), 3);
        assert_eq!(engine.events()[0].id, EventId(3));
        assert_eq!(engine.recent_events(1)[0].id, EventId(5));
    }

    #[test]
    fn try_new_rejects_bad_feed_odds() {
        let mut config = VenueConfig::deterministic(1);
        config.feed.rate_story_probability = 1.5;
        assert!(matches!(Engine::try_new(config.clone()), Err(ConfigError::InvalidFeed { .. })));

        // the unchecked path still runs its news draws without panicking
        let mut engine = Engine::new(config);
        for _ in 0..10 {
            engine.advance_time(1_000);
            engine.publish_auto_news();
        }
    }

    #[test]
    fn time_is_injected() {
        let mut engine = Engine::new(VenueConfig::deterministic(1));
        engine.set_time(Timestamp::from_millis(1_000));
        engine.advance_time(500);
        assert_eq!(engine.time(), Timestamp::from_millis(1_500));
    }
}

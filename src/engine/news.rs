//! News publication. Automatic stories are gated by the market clock; operator
//! stories are not. Both go through the same apply-once delivery.

use super::core::Engine;
use super::results::VenueError;
use crate::events::{EventPayload, NewsPublishedEvent, RateAdjustedEvent, RateSource};
use crate::news::{Headline, HeadlineInput};
use tracing::info;

impl Engine {
    /// Timer entry point. `None` while paused.
    pub fn publish_auto_news(&mut self) -> Option<Headline> {
        if !self.clock.is_running() {
            return None;
        }
        let headline = self.news.draft_auto(&self.prices, self.current_time)?;
        self.publish(headline.clone());
        Some(headline)
    }

    pub fn publish_operator_news(&mut self, input: HeadlineInput) -> Result<Headline, VenueError> {
        let headline = self.news.accept_operator(input, &self.catalog, self.current_time)?;
        self.publish(headline.clone());
        Ok(headline)
    }

    fn publish(&mut self, headline: Headline) {
        let old_rate = self.clock.interest_rate();
        let event = NewsPublishedEvent {
            headline_id: headline.id,
            origin: headline.origin,
            symbol: headline.target.symbol(),
            impact: headline.impact,
            rate_impact: headline.rate_impact,
            price_move: None,
        };
        let title = headline.title.clone();

        let delivery = self.news.deliver(headline, &mut self.prices, &mut self.clock);
        if delivery.duplicate {
            return;
        }

        info!(
            id = delivery.id.0,
            symbol = %event.symbol,
            impact = %event.impact,
            rate_impact = %event.rate_impact,
            "{title}"
        );

        self.emit_event(EventPayload::NewsPublished(NewsPublishedEvent {
            price_move: delivery.price_move.as_ref().map(|(_, old, new)| (*old, *new)),
            ..event
        }));

        if let Some(new_rate) = delivery.new_rate {
            if new_rate != old_rate {
                info!(%old_rate, %new_rate, "rate moved by news");
            }
            self.emit_event(EventPayload::RateAdjusted(RateAdjustedEvent {
                source: RateSource::News(delivery.id),
                old_rate,
                new_rate,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VenueConfig;
    use crate::news::{HeadlineTarget, Sentiment};
    use crate::types::Symbol;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn engine() -> Engine {
        Engine::new(VenueConfig::deterministic(8))
    }

    fn story(symbol: &str, impact: Decimal) -> HeadlineInput {
        HeadlineInput {
            title: "Desk flash".to_string(),
            summary: "Operator story".to_string(),
            symbol: Symbol::new(symbol),
            sentiment: Sentiment::Bullish,
            impact,
            rate_impact: Decimal::ZERO,
            source: None,
            age_label: None,
        }
    }

    #[test]
    fn auto_news_is_silent_while_paused() {
        let mut e = engine();
        e.pause();
        let feed_before = e.news_feed(100).len();
        assert!(e.publish_auto_news().is_none());
        assert_eq!(e.news_feed(100).len(), feed_before);
    }

    #[test]
    fn operator_news_moves_price_even_when_paused() {
        let mut e = engine();
        e.pause();
        let h = e.publish_operator_news(story("TSLA", dec!(25))).unwrap();
        assert_eq!(h.target, HeadlineTarget::Instrument(Symbol::new("TSLA")));
        // 231.80 * 1.25
        assert_eq!(e.prices().price(&Symbol::new("TSLA")).unwrap().value(), dec!(289.75));
        assert_eq!(e.news_feed(1)[0].id, h.id);
    }

    #[test]
    fn oversized_impact_rejected_without_effect() {
        let mut e = engine();
        let err = e.publish_operator_news(story("TSLA", dec!(40))).unwrap_err();
        assert!(matches!(err, VenueError::ImpactOutOfRange { .. }));
        assert_eq!(e.prices().price(&Symbol::new("TSLA")).unwrap().value(), dec!(231.80));
    }

    #[test]
    fn auto_news_lands_on_feed() {
        let mut e = engine();
        let h = e.publish_auto_news().unwrap();
        assert_eq!(e.news_feed(1)[0].id, h.id);
    }
}

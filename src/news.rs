//! Synthetic news.
//!
//! Headlines come from three places: the automatic timer, operator submissions,
//! and the deterministic backlog restored on reset. Every headline goes through
//! [`NewsEngine::deliver`], which applies its price shock and rate impact at most
//! once per headline id. Backlog headlines are recorded as already applied.

use crate::catalog::Catalog;
use crate::config::FeedConfig;
use crate::market::MarketClock;
use crate::price_gen::to_hundredths;
use crate::price_table::PriceTable;
use crate::types::{Price, Symbol, Timestamp};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

// keeps the news stream independent of the drift stream under one seed
const NEWS_SEED_SALT: u64 = 0x6e65_7773;
const DEFAULT_SOURCE: &str = "Summit Desk";
const FRESH_LABEL: &str = "just now";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HeadlineId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

/// What a story is about. Rate stories never move an instrument price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "symbol", rename_all = "snake_case")]
pub enum HeadlineTarget {
    Instrument(Symbol),
    Rate,
}

impl HeadlineTarget {
    pub fn symbol(&self) -> Symbol {
        match self {
            HeadlineTarget::Instrument(s) => s.clone(),
            HeadlineTarget::Rate => Symbol::new(Symbol::RATE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadlineOrigin {
    Auto,
    Operator,
    Backlog,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Headline {
    pub id: HeadlineId,
    pub title: String,
    pub summary: String,
    pub source: String,
    pub age_label: String,
    pub sentiment: Sentiment,
    pub target: HeadlineTarget,
    /// Price impact in percent. Always zero for rate stories.
    pub impact: Decimal,
    /// Benchmark rate impact in percentage points.
    pub rate_impact: Decimal,
    pub origin: HeadlineOrigin,
    pub published_at: Timestamp,
}

/// Operator-authored story before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlineInput {
    pub title: String,
    pub summary: String,
    pub symbol: Symbol,
    pub sentiment: Sentiment,
    pub impact: Decimal,
    #[serde(default)]
    pub rate_impact: Decimal,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub age_label: Option<String>,
}

/// Effects of a delivery. `None` fields mean nothing moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub id: HeadlineId,
    pub duplicate: bool,
    pub price_move: Option<(Symbol, Price, Price)>,
    pub new_rate: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NewsError {
    #[error("headline field `{0}` is required")]
    MissingField(&'static str),
    #[error("{field} {value}% exceeds the ±{cap}% cap")]
    ImpactOutOfRange {
        field: &'static str,
        value: Decimal,
        cap: Decimal,
    },
    #[error("unknown symbol {0}")]
    UnknownSymbol(Symbol),
    #[error("rate stories cannot carry a price impact ({0}%)")]
    RateStoryWithImpact(Decimal),
}

#[derive(Debug)]
pub struct NewsEngine {
    config: FeedConfig,
    rng: StdRng,
    next_id: u64,
    // ids below this count as applied. ids only grow, so the set only tracks the retained window.
    applied_below: u64,
    applied: HashSet<HeadlineId>,
    feed: VecDeque<Headline>,
}

impl NewsEngine {
    pub fn new(config: &FeedConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ NEWS_SEED_SALT),
            None => StdRng::from_entropy(),
        };
        Self {
            config: config.clone(),
            rng,
            next_id: 1,
            applied_below: 0,
            applied: HashSet::new(),
            feed: VecDeque::new(),
        }
    }

    fn next_id(&mut self) -> HeadlineId {
        let id = HeadlineId(self.next_id);
        self.next_id += 1;
        id
    }

    // draw in [lo, hi] percent, exact 2dp
    fn draw_pct(&mut self, lo: Decimal, hi: Decimal) -> Decimal {
        let lo_i = (lo * dec!(100)).trunc().to_i64().unwrap_or(0);
        let hi_i = (hi * dec!(100)).trunc().to_i64().unwrap_or(0);
        if lo_i >= hi_i {
            return Decimal::new(lo_i, 2);
        }
        Decimal::new(self.rng.gen_range(lo_i..=hi_i), 2)
    }

    /// Draws an automatic story about one instrument picked uniformly from the table.
    /// Pure draw: nothing is applied until [`deliver`](Self::deliver).
    pub fn draft_auto(&mut self, table: &PriceTable, now: Timestamp) -> Option<Headline> {
        if table.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..table.len());
        let symbol = table.symbol_at(index)?.clone();

        let bucket: f64 = self.rng.gen();
        let sentiment = if bucket > self.config.bullish_above {
            Sentiment::Bullish
        } else if bucket < self.config.bearish_below {
            Sentiment::Bearish
        } else {
            Sentiment::Neutral
        };

        let (min, max, band) = (
            self.config.shock_min_pct,
            self.config.shock_max_pct,
            self.config.neutral_band_pct,
        );
        let impact = match sentiment {
            Sentiment::Bullish => self.draw_pct(min, max),
            Sentiment::Bearish => self.draw_pct(-max, -min),
            Sentiment::Neutral => self.draw_pct(-band, band),
        };

        let rate_impact = if self.rng.gen_bool(rate_story_odds(self.config.rate_story_probability)) {
            let band = Decimal::new(to_hundredths(self.config.rate_impact_band_pct), 2);
            self.draw_pct(-band, band)
        } else {
            Decimal::ZERO
        };

        let id = self.next_id();
        Some(Headline {
            id,
            title: stock_title(sentiment, &symbol),
            summary: auto_summary(sentiment).to_string(),
            source: DEFAULT_SOURCE.to_string(),
            age_label: FRESH_LABEL.to_string(),
            sentiment,
            target: HeadlineTarget::Instrument(symbol),
            impact,
            rate_impact,
            origin: HeadlineOrigin::Auto,
            published_at: now,
        })
    }

    /// Validates an operator story and assigns it an id. Not gated by run state.
    pub fn accept_operator(
        &mut self,
        input: HeadlineInput,
        catalog: &Catalog,
        now: Timestamp,
    ) -> Result<Headline, NewsError> {
        let draft = validate_operator_input(&input, catalog, self.config.operator_impact_cap_pct)?;
        let id = self.next_id();
        Ok(Headline {
            id,
            title: input.title.trim().to_string(),
            summary: input.summary.trim().to_string(),
            source: input.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            age_label: input.age_label.unwrap_or_else(|| FRESH_LABEL.to_string()),
            sentiment: input.sentiment,
            target: draft.target,
            impact: draft.impact,
            rate_impact: draft.rate_impact,
            origin: HeadlineOrigin::Operator,
            published_at: now,
        })
    }

    /// Applies a headline's effects exactly once per id and pushes it onto the feed.
    /// Re-delivery of a known id is a no-op.
    pub fn deliver(&mut self, headline: Headline, table: &mut PriceTable, clock: &mut MarketClock) -> Delivery {
        let id = headline.id;
        if id.0 < self.applied_below || !self.applied.insert(id) {
            return Delivery {
                id,
                duplicate: true,
                price_move: None,
                new_rate: None,
            };
        }

        let price_move = match &headline.target {
            HeadlineTarget::Instrument(symbol) if !headline.impact.is_zero() => table
                .apply_shock(symbol, headline.impact)
                .ok()
                .map(|(old, new)| (symbol.clone(), old, new)),
            _ => None,
        };

        let new_rate = if headline.rate_impact.is_zero() {
            None
        } else {
            Some(clock.adjust_rate(headline.rate_impact))
        };

        self.push_feed(headline);

        Delivery {
            id,
            duplicate: false,
            price_move,
            new_rate,
        }
    }

    pub fn is_applied(&self, id: HeadlineId) -> bool {
        id.0 < self.applied_below || self.applied.contains(&id)
    }

    fn push_feed(&mut self, headline: Headline) {
        self.feed.push_front(headline);
        self.feed.truncate(self.config.news_retention.max(1));
        self.prune_applied();
    }

    // raise the low-water mark to the oldest id still on the feed
    fn prune_applied(&mut self) {
        let Some(oldest) = self.feed.iter().map(|h| h.id.0).min() else {
            return;
        };
        if oldest > self.applied_below {
            self.applied_below = oldest;
            self.applied.retain(|id| id.0 >= oldest);
        }
    }

    pub fn applied_len(&self) -> usize {
        self.applied.len()
    }

    /// Most recent first.
    pub fn recent(&self, limit: usize) -> Vec<Headline> {
        self.feed.iter().take(limit).cloned().collect()
    }

    pub fn feed_len(&self) -> usize {
        self.feed.len()
    }

    /// Clears the feed and restores the deterministic backlog. Backlog entries are
    /// marked applied so they never move prices or the rate. Ids keep counting up.
    pub fn reseed(&mut self, catalog: &Catalog, now: Timestamp) {
        self.feed.clear();
        let symbols: Vec<Symbol> = catalog.symbols().cloned().collect();
        let count = self.config.news_backlog;
        // built oldest-first so the newest backlog item ends up on top
        for index in (0..count).rev() {
            let id = self.next_id();
            let headline = backlog_headline(index, id, &symbols, now);
            self.applied.insert(id);
            self.push_feed(headline);
        }
    }
}

struct ValidatedDraft {
    target: HeadlineTarget,
    impact: Decimal,
    rate_impact: Decimal,
}

fn validate_operator_input(input: &HeadlineInput, catalog: &Catalog, cap: Decimal) -> Result<ValidatedDraft, NewsError> {
    if input.title.trim().is_empty() {
        return Err(NewsError::MissingField("title"));
    }
    if input.summary.trim().is_empty() {
        return Err(NewsError::MissingField("summary"));
    }
    if input.symbol.as_str().is_empty() {
        return Err(NewsError::MissingField("symbol"));
    }
    if input.impact.abs() > cap {
        return Err(NewsError::ImpactOutOfRange {
            field: "impact",
            value: input.impact,
            cap,
        });
    }
    if input.rate_impact.abs() > cap {
        return Err(NewsError::ImpactOutOfRange {
            field: "rate_impact",
            value: input.rate_impact,
            cap,
        });
    }

    let target = if input.symbol.is_rate() {
        if !input.impact.is_zero() {
            return Err(NewsError::RateStoryWithImpact(input.impact));
        }
        HeadlineTarget::Rate
    } else if catalog.contains(&input.symbol) {
        HeadlineTarget::Instrument(input.symbol.clone())
    } else {
        return Err(NewsError::UnknownSymbol(input.symbol.clone()));
    };

    Ok(ValidatedDraft {
        target,
        impact: input.impact.round_dp(2),
        rate_impact: input.rate_impact.round_dp(2),
    })
}

fn stock_title(sentiment: Sentiment, symbol: &Symbol) -> String {
    match sentiment {
        Sentiment::Bullish => format!("{symbol} draws strong buying interest"),
        Sentiment::Bearish => format!("{symbol} hit by profit taking"),
        Sentiment::Neutral => format!("{symbol} holds a steady range"),
    }
}

fn auto_summary(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Bullish => "Institutional demand and AI-theme momentum pulled in fresh buyers.",
        Sentiment::Bearish => "Macro uncertainty pushed short-term holders to lock in gains.",
        Sentiment::Neutral => "No fresh catalyst; the name keeps trading inside its box.",
    }
}

const AGE_LABELS: [&str; 9] = [
    "just now", "3m ago", "7m ago", "12m ago", "23m ago", "37m ago", "59m ago", "1h ago", "2h ago",
];
const SOURCES: [&str; 6] = [
    "Summit Desk",
    "Market Pulse",
    "Macro Wire",
    "Techno Sphere",
    "Global Brief",
    "CXN Broadcast",
];
const STOCK_CYCLE: [Sentiment; 6] = [
    Sentiment::Bullish,
    Sentiment::Bearish,
    Sentiment::Neutral,
    Sentiment::Bullish,
    Sentiment::Bearish,
    Sentiment::Neutral,
];
const RATE_CYCLE: [Sentiment; 3] = [Sentiment::Bearish, Sentiment::Bullish, Sentiment::Neutral];

// unvalidated configs reach here through Engine::new. out-of-range odds clamp, NaN never fires.
fn rate_story_odds(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

fn clamp_pct(value: Decimal) -> Decimal {
    value.max(dec!(-30)).min(dec!(30)).round_dp(2)
}

// deterministic backlog story for slot `index`. every 11th slot is a rate story.
fn backlog_headline(index: usize, id: HeadlineId, symbols: &[Symbol], now: Timestamp) -> Headline {
    let i = index as i64;
    let age_label = AGE_LABELS[index % AGE_LABELS.len()].to_string();
    let source = SOURCES[index % SOURCES.len()].to_string();

    if index % 11 == 0 || symbols.is_empty() {
        let sentiment = RATE_CYCLE[(index / 11) % RATE_CYCLE.len()];
        let mut rate_impact = clamp_pct(Decimal::from((i * 13) % 61 - 30) + Decimal::from(i % 3) * dec!(0.35));
        if rate_impact.abs() < dec!(0.1) {
            rate_impact = dec!(0.4);
        }
        let title = match sentiment {
            Sentiment::Bearish => "Treasury yields jump on tightening signals",
            Sentiment::Bullish => "Cooling CPI eases rate pressure",
            Sentiment::Neutral => "Policy rate under review",
        };
        return Headline {
            id,
            title: title.to_string(),
            summary: format!("Rates moved {rate_impact}% as desks repriced the policy path."),
            source,
            age_label,
            sentiment,
            target: HeadlineTarget::Rate,
            impact: Decimal::ZERO,
            rate_impact,
            origin: HeadlineOrigin::Backlog,
            published_at: now,
        };
    }

    let sentiment = STOCK_CYCLE[(index * 7) % STOCK_CYCLE.len()];
    let symbol = symbols[index % symbols.len()].clone();
    let base = Decimal::from((i * 5) % 24 + 3);
    let mut impact = match sentiment {
        Sentiment::Bullish => clamp_pct(base),
        Sentiment::Bearish => clamp_pct(-base),
        Sentiment::Neutral => {
            let n = Decimal::from(i % 5) * dec!(0.3) + dec!(0.4);
            clamp_pct(if i % 2 == 0 { n } else { -n })
        }
    };
    if impact.abs() < dec!(0.3) {
        impact = if sentiment == Sentiment::Bearish { dec!(-0.35) } else { dec!(0.35) };
    }
    let rate_impact = if index % 6 == 0 {
        let sign = if i % 2 == 0 { Decimal::ONE } else { -Decimal::ONE };
        clamp_pct(Decimal::from((i * 4) % 8) * dec!(0.25) * sign)
    } else {
        Decimal::ZERO
    };

    Headline {
        id,
        title: stock_title(sentiment, &symbol),
        summary: format!("{symbol} moved {impact}% on the session."),
        source,
        age_label,
        sentiment,
        target: HeadlineTarget::Instrument(symbol),
        impact,
        rate_impact,
        origin: HeadlineOrigin::Backlog,
        published_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateConfig;

    fn setup() -> (NewsEngine, PriceTable, MarketClock, Catalog) {
        let config = FeedConfig {
            rng_seed: Some(11),
            ..FeedConfig::default()
        };
        let catalog = Catalog::default_equities();
        (
            NewsEngine::new(&config),
            PriceTable::from_catalog(&catalog),
            MarketClock::new(&RateConfig::default(), Timestamp::from_millis(0)),
            catalog,
        )
    }

    fn input(symbol: &str, impact: Decimal, rate_impact: Decimal) -> HeadlineInput {
        HeadlineInput {
            title: "Desk note".to_string(),
            summary: "Operator authored".to_string(),
            symbol: Symbol::new(symbol),
            sentiment: Sentiment::Bullish,
            impact,
            rate_impact,
            source: None,
            age_label: None,
        }
    }

    #[test]
    fn auto_drafts_respect_sentiment_ranges() {
        let (mut news, table, _, _) = setup();
        for _ in 0..500 {
            let h = news.draft_auto(&table, Timestamp::from_millis(0)).unwrap();
            match h.sentiment {
                Sentiment::Bullish => assert!(h.impact >= dec!(0.6) && h.impact <= dec!(1.8)),
                Sentiment::Bearish => assert!(h.impact >= dec!(-1.8) && h.impact <= dec!(-0.6)),
                Sentiment::Neutral => assert!(h.impact.abs() <= dec!(0.4)),
            }
            assert!(h.rate_impact.abs() <= dec!(1.1));
            assert!(matches!(h.target, HeadlineTarget::Instrument(_)));
        }
    }

    #[test]
    fn delivery_applies_once_per_id() {
        let (mut news, mut table, mut clock, catalog) = setup();
        let h = news
            .accept_operator(input("TSLA", dec!(10), dec!(0.5)), &catalog, Timestamp::from_millis(0))
            .unwrap();

        let first = news.deliver(h.clone(), &mut table, &mut clock);
        assert!(!first.duplicate);
        assert_eq!(table.price(&Symbol::new("TSLA")).unwrap().value(), dec!(254.98));
        assert_eq!(clock.interest_rate(), dec!(0.0475));

        let again = news.deliver(h, &mut table, &mut clock);
        assert!(again.duplicate);
        assert_eq!(table.price(&Symbol::new("TSLA")).unwrap().value(), dec!(254.98));
        assert_eq!(clock.interest_rate(), dec!(0.0475));
        assert_eq!(news.feed_len(), 1);
    }

    #[test]
    fn operator_cap_is_hard() {
        let (mut news, _, _, catalog) = setup();
        let over = news.accept_operator(input("TSLA", dec!(40), Decimal::ZERO), &catalog, Timestamp::from_millis(0));
        assert!(matches!(over, Err(NewsError::ImpactOutOfRange { field: "impact", .. })));

        let rate_over = news.accept_operator(input("TSLA", dec!(1), dec!(-30.5)), &catalog, Timestamp::from_millis(0));
        assert!(matches!(rate_over, Err(NewsError::ImpactOutOfRange { field: "rate_impact", .. })));

        let at_cap = news.accept_operator(input("TSLA", dec!(-30), dec!(30)), &catalog, Timestamp::from_millis(0));
        assert!(at_cap.is_ok());
    }

    #[test]
    fn rate_story_cannot_move_prices() {
        let (mut news, _, _, catalog) = setup();
        let bad = news.accept_operator(input("RATE", dec!(2), dec!(1)), &catalog, Timestamp::from_millis(0));
        assert_eq!(bad.unwrap_err(), NewsError::RateStoryWithImpact(dec!(2)));

        let ok = news
            .accept_operator(input("rate", Decimal::ZERO, dec!(1)), &catalog, Timestamp::from_millis(0))
            .unwrap();
        assert_eq!(ok.target, HeadlineTarget::Rate);
    }

    #[test]
    fn unknown_symbol_and_blank_fields_rejected() {
        let (mut news, _, _, catalog) = setup();
        let unknown = news.accept_operator(input("ZZZ", dec!(1), Decimal::ZERO), &catalog, Timestamp::from_millis(0));
        assert!(matches!(unknown, Err(NewsError::UnknownSymbol(_))));

        let mut blank = input("AAPL", dec!(1), Decimal::ZERO);
        blank.title = "   ".to_string();
        assert_eq!(
            news.accept_operator(blank, &catalog, Timestamp::from_millis(0)).unwrap_err(),
            NewsError::MissingField("title")
        );
    }

    #[test]
    fn feed_is_newest_first_and_bounded() {
        let config = FeedConfig {
            rng_seed: Some(3),
            news_retention: 3,
            ..FeedConfig::default()
        };
        let catalog = Catalog::default_equities();
        let mut news = NewsEngine::new(&config);
        let mut table = PriceTable::from_catalog(&catalog);
        let mut clock = MarketClock::new(&RateConfig::default(), Timestamp::from_millis(0));

        for t in 0..5 {
            let h = news.draft_auto(&table, Timestamp::from_millis(t)).unwrap();
            news.deliver(h, &mut table, &mut clock);
        }
        let recent = news.recent(10);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].id, HeadlineId(5));
        assert_eq!(recent[2].id, HeadlineId(3));
    }

    #[test]
    fn applied_ledger_tracks_only_the_retained_window() {
        let config = FeedConfig {
            rng_seed: Some(5),
            news_retention: 4,
            ..FeedConfig::default()
        };
        let catalog = Catalog::default_equities();
        let mut news = NewsEngine::new(&config);
        let mut table = PriceTable::from_catalog(&catalog);
        let mut clock = MarketClock::new(&RateConfig::default(), Timestamp::from_millis(0));

        let mut delivered = Vec::new();
        for t in 0..40 {
            let h = news.draft_auto(&table, Timestamp::from_millis(t)).unwrap();
            delivered.push(h.clone());
            news.deliver(h, &mut table, &mut clock);
        }
        assert_eq!(news.applied_len(), 4);

        // pruned ids still count as applied
        let oldest = delivered[0].clone();
        assert!(news.is_applied(oldest.id));
        let prices: Vec<_> = table.quotes().iter().map(|q| q.price).collect();
        assert!(news.deliver(oldest, &mut table, &mut clock).duplicate);
        let after: Vec<_> = table.quotes().iter().map(|q| q.price).collect();
        assert_eq!(prices, after);
        assert_eq!(news.feed_len(), 4);
    }

    #[test]
    fn unvalidated_rate_odds_are_clamped() {
        let catalog = Catalog::default_equities();
        let table = PriceTable::from_catalog(&catalog);
        for (odds, always_zero) in [(1.5, false), (-0.5, true), (f64::NAN, true)] {
            let config = FeedConfig {
                rng_seed: Some(9),
                rate_story_probability: odds,
                ..FeedConfig::default()
            };
            let mut news = NewsEngine::new(&config);
            for t in 0..20 {
                let h = news.draft_auto(&table, Timestamp::from_millis(t)).unwrap();
                if always_zero {
                    assert!(h.rate_impact.is_zero());
                }
            }
        }
    }

    #[test]
    fn backlog_is_marked_applied() {
        let (mut news, mut table, mut clock, catalog) = setup();
        news.reseed(&catalog, Timestamp::from_millis(0));
        assert_eq!(news.feed_len(), 12);

        let before_rate = clock.interest_rate();
        let before_prices: Vec<_> = table.quotes().iter().map(|q| q.price).collect();
        for h in news.recent(12) {
            assert_eq!(h.origin, HeadlineOrigin::Backlog);
            assert!(news.is_applied(h.id));
            assert!(news.deliver(h, &mut table, &mut clock).duplicate);
        }
        assert_eq!(clock.interest_rate(), before_rate);
        let after_prices: Vec<_> = table.quotes().iter().map(|q| q.price).collect();
        assert_eq!(before_prices, after_prices);
    }

    #[test]
    fn backlog_rate_stories_have_zero_price_impact() {
        let symbols: Vec<Symbol> = Catalog::default_equities().symbols().cloned().collect();
        for index in 0..150 {
            let h = backlog_headline(index, HeadlineId(index as u64), &symbols, Timestamp::from_millis(0));
            assert!(h.impact.abs() <= dec!(30));
            assert!(h.rate_impact.abs() <= dec!(30));
            if h.target == HeadlineTarget::Rate {
                assert!(h.impact.is_zero());
                assert!(!h.rate_impact.is_zero());
            }
        }
    }
}

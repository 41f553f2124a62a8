// 7.0 config.rs: all venue settings in one place. durations, multiplier, feed tuning, rate band.
// 7.1 defaults mirror the reference venue. presets and an env overlay sit below.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

const MINUTE_MS: i64 = 60 * 1000;

// Position and deposit clocks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationConfig {
    // Spot holdings roll off this long after the last open/top-up
    pub spot_position_ms: i64,
    // Futures orders are fixed-length, never renewed
    pub futures_position_ms: i64,
    // Fixed-term deposit length
    pub deposit_ms: i64,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            spot_position_ms: 5 * MINUTE_MS,
            futures_position_ms: 3 * MINUTE_MS,
            deposit_ms: 5 * MINUTE_MS,
        }
    }
}

// Futures contract terms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuturesConfig {
    // Units of underlying per contract
    pub contract_multiplier: Decimal,
    pub min_leverage: u32,
    pub max_leverage: u32,
}

impl Default for FuturesConfig {
    fn default() -> Self {
        Self {
            contract_multiplier: dec!(10),
            min_leverage: 1,
            max_leverage: 10,
        }
    }
}

/** 7.2: drift and news tuning. all percentages are in percent units (0.45 = 0.45%) */
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    // Ambient drift is drawn uniformly from [-drift_band_pct, +drift_band_pct]
    pub drift_band_pct: Decimal,
    // Sentiment draw u in [0,1): u > bullish_above => bullish, u < bearish_below => bearish
    pub bullish_above: f64,
    pub bearish_below: f64,
    // Directional shock magnitude range
    pub shock_min_pct: Decimal,
    pub shock_max_pct: Decimal,
    // Neutral shocks fall in [-neutral_band_pct, +neutral_band_pct]
    pub neutral_band_pct: Decimal,
    // Odds that an automatic story also moves the benchmark rate
    pub rate_story_probability: f64,
    // Rate impact magnitude bound for automatic stories
    pub rate_impact_band_pct: Decimal,
    // Hard cap on operator-authored impact and rate impact
    pub operator_impact_cap_pct: Decimal,
    // Headlines kept in the rolling feed
    pub news_retention: usize,
    // Backlog headlines restored on reset
    pub news_backlog: usize,
    // Seed for the drift/news RNG. None = entropy.
    pub rng_seed: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            drift_band_pct: dec!(0.45),
            bullish_above: 0.6,
            bearish_below: 0.25,
            shock_min_pct: dec!(0.6),
            shock_max_pct: dec!(1.8),
            neutral_band_pct: dec!(0.4),
            rate_story_probability: 0.3,
            rate_impact_band_pct: dec!(1.1),
            operator_impact_cap_pct: dec!(30),
            news_retention: 50,
            news_backlog: 12,
            rng_seed: None,
        }
    }
}

// Benchmark rate policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateConfig {
    pub default_rate: Decimal,
    // News-driven adjustments are clamped into [floor, ceiling]
    pub floor: Decimal,
    pub ceiling: Decimal,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            default_rate: dec!(0.0425),
            floor: dec!(0.01),
            ceiling: dec!(0.10),
        }
    }
}

// Timer cadence for the runtime loops
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    pub price_tick_ms: u64,
    pub news_tick_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            price_tick_ms: 6_000,
            news_tick_ms: 6_000,
        }
    }
}

// The complete venue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueConfig {
    pub durations: DurationConfig,
    pub futures: FuturesConfig,
    pub feed: FeedConfig,
    pub rates: RateConfig,
    pub timers: TimerConfig,
    // Cash granted to newly registered users
    pub starting_cash: Decimal,
    // Rows returned by the leaderboard
    pub leaderboard_size: usize,
    // Engine audit log cap
    pub max_events: usize,
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            durations: DurationConfig::default(),
            futures: FuturesConfig::default(),
            feed: FeedConfig::default(),
            rates: RateConfig::default(),
            timers: TimerConfig::default(),
            starting_cash: dec!(50000),
            leaderboard_size: 10,
            max_events: 100_000,
        }
    }
}

impl VenueConfig {
    // Fast timers for a local demo run
    pub fn demo() -> Self {
        let mut config = Self::default();
        config.timers.price_tick_ms = 1_000;
        config.timers.news_tick_ms = 2_000;
        config.durations.spot_position_ms = 20_000;
        config.durations.futures_position_ms = 12_000;
        config.durations.deposit_ms = 20_000;
        config
    }

    // Same defaults, fixed RNG seed. tests use this.
    pub fn deterministic(seed: u64) -> Self {
        let mut config = Self::default();
        config.feed.rng_seed = Some(seed);
        config
    }

    // Overlay VENUE_* environment variables on top of the defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(ms) = env_parse::<i64>("VENUE_SPOT_DURATION_MS")? {
            config.durations.spot_position_ms = ms;
        }
        if let Some(ms) = env_parse::<i64>("VENUE_FUTURES_DURATION_MS")? {
            config.durations.futures_position_ms = ms;
        }
        if let Some(ms) = env_parse::<i64>("VENUE_DEPOSIT_DURATION_MS")? {
            config.durations.deposit_ms = ms;
        }
        if let Some(rate) = env_parse::<Decimal>("VENUE_DEFAULT_RATE")? {
            config.rates.default_rate = rate;
        }
        if let Some(cash) = env_parse::<Decimal>("VENUE_STARTING_CASH")? {
            config.starting_cash = cash;
        }
        if let Some(ms) = env_parse::<u64>("VENUE_PRICE_TICK_MS")? {
            config.timers.price_tick_ms = ms;
        }
        if let Some(ms) = env_parse::<u64>("VENUE_NEWS_TICK_MS")? {
            config.timers.news_tick_ms = ms;
        }
        if let Some(seed) = env_parse::<u64>("VENUE_RNG_SEED")? {
            config.feed.rng_seed = Some(seed);
        }

        config.validate()?;
        Ok(config)
    }

    // Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.durations;
        if d.spot_position_ms <= 0 || d.futures_position_ms <= 0 || d.deposit_ms <= 0 {
            return Err(ConfigError::InvalidDuration {
                reason: "durations must be positive".to_string(),
            });
        }

        if self.futures.contract_multiplier <= Decimal::ZERO {
            return Err(ConfigError::InvalidFutures {
                reason: "contract multiplier must be positive".to_string(),
            });
        }
        if self.futures.min_leverage == 0 || self.futures.min_leverage > self.futures.max_leverage {
            return Err(ConfigError::InvalidFutures {
                reason: "leverage range must be 1 <= min <= max".to_string(),
            });
        }

        let r = &self.rates;
        if r.floor <= Decimal::ZERO || r.floor >= r.ceiling {
            return Err(ConfigError::InvalidRate {
                reason: "rate band must satisfy 0 < floor < ceiling".to_string(),
            });
        }
        if r.default_rate < r.floor || r.default_rate > r.ceiling {
            return Err(ConfigError::InvalidRate {
                reason: "default rate must sit inside the band".to_string(),
            });
        }

        let f = &self.feed;
        if f.drift_band_pct < Decimal::ZERO || f.shock_min_pct > f.shock_max_pct {
            return Err(ConfigError::InvalidFeed {
                reason: "drift band must be >= 0 and shock range ordered".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&f.bearish_below)
            || !(0.0..=1.0).contains(&f.bullish_above)
            || f.bearish_below > f.bullish_above
        {
            return Err(ConfigError::InvalidFeed {
                reason: "sentiment thresholds must satisfy 0 <= bearish <= bullish <= 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&f.rate_story_probability) {
            return Err(ConfigError::InvalidFeed {
                reason: "rate story probability must be in [0, 1]".to_string(),
            });
        }
        if f.operator_impact_cap_pct <= Decimal::ZERO {
            return Err(ConfigError::InvalidFeed {
                reason: "operator impact cap must be positive".to_string(),
            });
        }

        if self.starting_cash < Decimal::ZERO {
            return Err(ConfigError::InvalidAccount {
                reason: "starting cash cannot be negative".to_string(),
            });
        }

        if self.timers.price_tick_ms == 0 || self.timers.news_tick_ms == 0 {
            return Err(ConfigError::InvalidTimer {
                reason: "timer intervals must be non-zero".to_string(),
            });
        }

        Ok(())
    }
}

fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { key: key.to_string(), value: raw }),
        Err(_) => Ok(None),
    }
}

// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid durations: {reason}")]
    InvalidDuration { reason: String },
    #[error("invalid futures terms: {reason}")]
    InvalidFutures { reason: String },
    #[error("invalid rate policy: {reason}")]
    InvalidRate { reason: String },
    #[error("invalid feed tuning: {reason}")]
    InvalidFeed { reason: String },
    #[error("invalid account defaults: {reason}")]
    InvalidAccount { reason: String },
    #[error("invalid timers: {reason}")]
    InvalidTimer { reason: String },
    #[error("cannot parse {key}={value}")]
    InvalidEnv { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = VenueConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.durations.spot_position_ms, 300_000);
        assert_eq!(config.durations.futures_position_ms, 180_000);
        assert_eq!(config.futures.contract_multiplier, dec!(10));
    }

    #[test]
    fn test_presets_valid() {
        assert!(VenueConfig::demo().validate().is_ok());
        let det = VenueConfig::deterministic(7);
        assert!(det.validate().is_ok());
        assert_eq!(det.feed.rng_seed, Some(7));
    }

    #[test]
    fn test_futures_shorter_than_spot() {
        let config = VenueConfig::default();
        assert!(config.durations.futures_position_ms < config.durations.spot_position_ms);
    }

    #[test]
    fn test_invalid_rate_band() {
        let mut config = VenueConfig::default();
        config.rates.floor = dec!(0.2);
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::InvalidRate { .. })));
    }

    #[test]
    fn test_invalid_leverage_range() {
        let mut config = VenueConfig::default();
        config.futures.min_leverage = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidFutures { .. })));
    }

    #[test]
    fn test_invalid_sentiment_thresholds() {
        let mut config = VenueConfig::default();
        config.feed.bearish_below = 0.9;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidFeed { .. })));
    }

    #[test]
    fn test_config_serialization() {
        let config = VenueConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: VenueConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.rates.default_rate, config.rates.default_rate);
        assert_eq!(back.feed.news_retention, config.feed.news_retention);
    }
}

//! Market clock.
//!
//! The single process-wide run state every other component consults before
//! mutating anything: running flag, reset epoch, last action audit fields, and
//! the benchmark rate (held by the [`RateGovernor`]).

use crate::config::RateConfig;
use crate::rates::{RateError, RateGovernor};
use crate::types::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Last control action applied to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketAction {
    Start,
    Pause,
    Reset,
    Interest,
}

/// Snapshot handed to callers. Copy of the clock, never a live reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketState {
    pub running: bool,
    /// Bumped on every reset. Cached simulated series keyed to an older
    /// nonce must be discarded.
    pub reset_nonce: u64,
    pub last_action: MarketAction,
    pub updated_at: Timestamp,
    pub interest_rate: Decimal,
}

#[derive(Debug, Clone)]
pub struct MarketClock {
    running: bool,
    reset_nonce: u64,
    last_action: MarketAction,
    updated_at: Timestamp,
    rates: RateGovernor,
}

impl MarketClock {
    pub fn new(rate_config: &RateConfig, now: Timestamp) -> Self {
        Self {
            running: true,
            reset_nonce: 0,
            last_action: MarketAction::Start,
            updated_at: now,
            rates: RateGovernor::new(rate_config),
        }
    }

    pub fn state(&self) -> MarketState {
        MarketState {
            running: self.running,
            reset_nonce: self.reset_nonce,
            last_action: self.last_action,
            updated_at: self.updated_at,
            interest_rate: self.rates.get(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn reset_nonce(&self) -> u64 {
        self.reset_nonce
    }

    pub fn interest_rate(&self) -> Decimal {
        self.rates.get()
    }

    pub fn set_running(&mut self, running: bool, now: Timestamp) -> MarketState {
        self.running = running;
        self.last_action = if running { MarketAction::Start } else { MarketAction::Pause };
        self.updated_at = now;
        self.state()
    }

    pub fn set_interest_rate(&mut self, rate: Decimal, now: Timestamp) -> Result<MarketState, RateError> {
        self.rates.set_absolute(rate)?;
        self.last_action = MarketAction::Interest;
        self.updated_at = now;
        Ok(self.state())
    }

    pub fn reset(&mut self, now: Timestamp) -> MarketState {
        self.running = true;
        self.reset_nonce += 1;
        self.last_action = MarketAction::Reset;
        self.updated_at = now;
        self.state()
    }

    /// News-driven rate move. Does not touch the audit fields.
    pub fn adjust_rate(&mut self, delta_pct: Decimal) -> Decimal {
        self.rates.adjust(delta_pct)
    }

    pub fn rates(&self) -> &RateGovernor {
        &self.rates
    }
}

// 5.0 rates.rs: benchmark interest rate. stored as a fraction (0.0425 = 4.25%).
// news moves it in percentage points and is clamped to the band.
// operator overrides are absolute and only checked for >= 0. the asymmetry is policy.

use crate::config::RateConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateGovernor {
    rate: Decimal,
    floor: Decimal,
    ceiling: Decimal,
}

impl RateGovernor {
    pub fn new(config: &RateConfig) -> Self {
        Self {
            rate: config.default_rate,
            floor: config.floor,
            ceiling: config.ceiling,
        }
    }

    pub fn get(&self) -> Decimal {
        self.rate
    }

    // 5.1: news path. delta is in percentage points (0.5 => +0.005)
    pub fn adjust(&mut self, delta_pct: Decimal) -> Decimal {
        if delta_pct.is_zero() {
            return self.rate;
        }
        self.rate = clamp_rate(self.rate + delta_pct / dec!(100), self.floor, self.ceiling);
        self.rate
    }

    // 5.2: operator path. no band clamp.
    pub fn set_absolute(&mut self, rate: Decimal) -> Result<Decimal, RateError> {
        if rate < Decimal::ZERO {
            return Err(RateError::Negative(rate));
        }
        self.rate = rate;
        Ok(self.rate)
    }

    pub fn band(&self) -> (Decimal, Decimal) {
        (self.floor, self.ceiling)
    }
}

pub fn clamp_rate(rate: Decimal, floor: Decimal, ceiling: Decimal) -> Decimal {
    rate.max(floor).min(ceiling).round_dp(4)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateError {
    #[error("interest rate cannot be negative: {0}")]
    Negative(Decimal),
}

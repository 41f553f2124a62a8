// 9.4 price_gen.rs: ambient drift. one uniform draw per instrument per tick,
// in hundredths of a percent so the result is an exact 2dp decimal.

use crate::config::FeedConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Debug)]
pub struct PriceGenerator {
    rng: StdRng,
    band_hundredths: i64,
}

impl PriceGenerator {
    pub fn new(config: &FeedConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            band_hundredths: to_hundredths(config.drift_band_pct),
        }
    }

    // one draw in [-band, +band]
    pub fn draw_drift(&mut self) -> Decimal {
        if self.band_hundredths == 0 {
            return Decimal::ZERO;
        }
        let h = self.rng.gen_range(-self.band_hundredths..=self.band_hundredths);
        Decimal::new(h, 2)
    }

    pub fn draw_batch(&mut self, count: usize) -> Vec<Decimal> {
        (0..count).map(|_| self.draw_drift()).collect()
    }
}

pub(crate) fn to_hundredths(pct: Decimal) -> i64 {
    (pct.abs() * dec!(100)).trunc().to_i64().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> PriceGenerator {
        let config = FeedConfig {
            rng_seed: Some(seed),
            ..FeedConfig::default()
        };
        PriceGenerator::new(&config)
    }

    #[test]
    fn drift_stays_inside_band() {
        let mut generator = seeded(42);
        for _ in 0..1_000 {
            let d = generator.draw_drift();
            assert!(d >= dec!(-0.45) && d <= dec!(0.45), "drift {d} out of band");
            assert!(d.scale() <= 2);
        }
    }

    #[test]
    fn same_seed_same_series() {
        let mut a = seeded(9);
        let mut b = seeded(9);
        assert_eq!(a.draw_batch(20), b.draw_batch(20));
    }

    #[test]
    fn zero_band_is_flat() {
        let config = FeedConfig {
            drift_band_pct: Decimal::ZERO,
            rng_seed: Some(1),
            ..FeedConfig::default()
        };
        let mut generator = PriceGenerator::new(&config);
        assert!(generator.draw_batch(5).iter().all(|d| d.is_zero()));
    }
}

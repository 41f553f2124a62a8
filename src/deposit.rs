//! Fixed-term deposits.
//!
//! At most one per user. The principal and the term are fixed when the deposit
//! opens; the interest is not. Both the displayed estimate and the final payout
//! use the benchmark rate live at the time they are computed. The rate captured
//! at open is kept on the record for audit only.

use crate::types::{Cash, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    pub amount: Cash,
    pub started_at: Timestamp,
    pub due_at: Timestamp,
    /// Benchmark rate when the deposit was opened.
    pub interest_rate: Decimal,
}

impl Deposit {
    pub fn open(amount: Cash, rate: Decimal, now: Timestamp, term_ms: i64) -> Self {
        Self {
            amount,
            started_at: now,
            due_at: now.plus_millis(term_ms),
            interest_rate: rate,
        }
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        self.due_at <= now
    }

    pub fn interest_at(&self, live_rate: Decimal) -> Cash {
        self.amount.mul(live_rate).rounded()
    }

    /// Principal plus interest at the live rate, rounded to cents.
    pub fn payout(&self, live_rate: Decimal) -> Cash {
        self.amount.add(self.interest_at(live_rate)).rounded()
    }

    pub fn snapshot(&self, live_rate: Decimal, now: Timestamp) -> DepositSnapshot {
        DepositSnapshot {
            amount: self.amount,
            started_at: self.started_at,
            due_at: self.due_at,
            interest_rate: live_rate,
            opened_at_rate: self.interest_rate,
            projected_interest: self.interest_at(live_rate),
            remaining_ms: now.millis_until(self.due_at).max(0),
        }
    }
}

/// Display view of an active deposit. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositSnapshot {
    pub amount: Cash,
    pub started_at: Timestamp,
    pub due_at: Timestamp,
    /// Live benchmark rate.
    pub interest_rate: Decimal,
    pub opened_at_rate: Decimal,
    pub projected_interest: Cash,
    pub remaining_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn deposit() -> Deposit {
        Deposit::open(Cash::new(dec!(1000)), dec!(0.0425), Timestamp::from_millis(0), 300_000)
    }

    #[test]
    fn term_sets_due_date() {
        let d = deposit();
        assert_eq!(d.due_at, Timestamp::from_millis(300_000));
        assert!(!d.is_due(Timestamp::from_millis(299_999)));
        assert!(d.is_due(Timestamp::from_millis(300_000)));
    }

    #[test]
    fn payout_follows_live_rate_not_snapshot() {
        let d = deposit();
        assert_eq!(d.payout(dec!(0.0425)).value(), dec!(1042.50));
        assert_eq!(d.payout(dec!(0.07)).value(), dec!(1070.00));
    }

    #[test]
    fn snapshot_floats_with_rate() {
        let d = deposit();
        let s = d.snapshot(dec!(0.05), Timestamp::from_millis(100_000));
        assert_eq!(s.interest_rate, dec!(0.05));
        assert_eq!(s.opened_at_rate, dec!(0.0425));
        assert_eq!(s.projected_interest.value(), dec!(50));
        assert_eq!(s.remaining_ms, 200_000);

        let late = d.snapshot(dec!(0.05), Timestamp::from_millis(400_000));
        assert_eq!(late.remaining_ms, 0);
    }
}

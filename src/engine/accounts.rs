//! Operator balance adjustments.

use super::core::Engine;
use super::results::VenueError;
use crate::account::UserRecord;
use crate::events::{CashAdjustedEvent, EventPayload};
use crate::types::Cash;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "amount", rename_all = "snake_case")]
pub enum CashAdjustment {
    /// Replace the balance outright.
    Set(Decimal),
    /// Add to the current balance. Negative takes away.
    Delta(Decimal),
}

impl Engine {
    /// Sweeps first so the adjustment lands on the realized balance.
    /// The result never goes below zero.
    pub fn adjust_cash(&mut self, user: &mut UserRecord, adjustment: CashAdjustment) -> Result<Cash, VenueError> {
        self.settle(user);
        let old_balance = user.cash_balance;
        let target = match adjustment {
            CashAdjustment::Set(value) => value,
            CashAdjustment::Delta(delta) => old_balance
                .value()
                .checked_add(delta)
                .ok_or(VenueError::ValueOutOfRange("cash balance"))?,
        };
        let new_balance = Cash::new(target.max(Decimal::ZERO)).rounded();
        user.cash_balance = new_balance;

        info!(user = %user.id, %old_balance, %new_balance, ?adjustment, "cash adjusted");
        self.emit_event(EventPayload::CashAdjusted(CashAdjustedEvent {
            user_id: user.id,
            old_balance,
            new_balance,
        }));
        Ok(new_balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VenueConfig;
    use crate::types::{Role, Timestamp, UserId};
    use rust_decimal_macros::dec;

    fn user(cash: Decimal) -> UserRecord {
        UserRecord::new(UserId(3), "ana", Role::User, Cash::new(cash), Timestamp::from_millis(0))
    }

    #[test]
    fn set_and_delta_clamp_at_zero() {
        let mut e = Engine::new(VenueConfig::deterministic(9));
        let mut u = user(dec!(500));

        assert_eq!(e.adjust_cash(&mut u, CashAdjustment::Delta(dec!(-120.255))).unwrap().value(), dec!(379.74));
        assert_eq!(e.adjust_cash(&mut u, CashAdjustment::Delta(dec!(-1000))).unwrap().value(), dec!(0));
        assert_eq!(e.adjust_cash(&mut u, CashAdjustment::Set(dec!(-5))).unwrap().value(), dec!(0));
        assert_eq!(e.adjust_cash(&mut u, CashAdjustment::Set(dec!(1234.567))).unwrap().value(), dec!(1234.57));
        assert_eq!(u.cash_balance.value(), dec!(1234.57));

        match &e.recent_events(1)[0].payload {
            EventPayload::CashAdjusted(ev) => {
                assert_eq!(ev.user_id, UserId(3));
                assert_eq!(ev.old_balance.value(), dec!(0));
                assert_eq!(ev.new_balance.value(), dec!(1234.57));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn delta_past_decimal_range_is_rejected() {
        let mut e = Engine::new(VenueConfig::deterministic(9));
        let mut u = user(dec!(1));
        let err = e.adjust_cash(&mut u, CashAdjustment::Delta(Decimal::MAX)).unwrap_err();
        assert_eq!(err, VenueError::ValueOutOfRange("cash balance"));
        assert_eq!(u.cash_balance.value(), dec!(1));
    }
}

//! Fixed-term deposit opening. Maturity is handled by the settlement sweep.

use super::core::Engine;
use super::results::VenueError;
use crate::account::UserRecord;
use crate::deposit::Deposit;
use crate::events::{DepositOpenedEvent, EventPayload};
use crate::types::Cash;
use rust_decimal::Decimal;
use tracing::info;

impl Engine {
    pub fn open_deposit(&mut self, user: &mut UserRecord, amount: Decimal) -> Result<Deposit, VenueError> {
        // a matured deposit is paid out here, which frees the slot
        self.settle(user);
        match self.execute_deposit(user, amount) {
            Ok(deposit) => Ok(deposit),
            Err(err) => Err(self.reject(user.id, err)),
        }
    }

    fn execute_deposit(&mut self, user: &mut UserRecord, amount: Decimal) -> Result<Deposit, VenueError> {
        self.check_can_trade(user)?;
        if user.has_active_deposit() {
            return Err(VenueError::DepositActive);
        }
        // deposits are held in cents. anything that rounds to nothing is refused.
        let rounded = Cash::new(amount).rounded();
        if rounded.value() <= Decimal::ZERO {
            return Err(VenueError::InvalidAmount(amount));
        }
        let amount = rounded;
        if amount > user.cash_balance {
            return Err(VenueError::InsufficientFunds {
                required: amount,
                available: user.cash_balance,
            });
        }

        let rate = self.clock.interest_rate();
        let deposit = Deposit::open(amount, rate, self.current_time, self.config.durations.deposit_ms);
        user.debit(amount);
        user.deposit = Some(deposit.clone());

        info!(user = %user.id, %amount, %rate, due_at = %deposit.due_at, "deposit opened");
        self.emit_event(EventPayload::DepositOpened(DepositOpenedEvent {
            user_id: user.id,
            amount,
            due_at: deposit.due_at,
            rate_at_open: rate,
        }));
        Ok(deposit)
    }
}

//! User records.
//!
//! The persisted state of one participant. The engine receives a record by
//! value or `&mut`, applies its rules, and the caller hands it back to the store.
//! Admin records never hold positions.

use crate::deposit::Deposit;
use crate::position::{reserved_margin, FuturesOrder, Holding};
use crate::types::{Cash, Direction, Price, Role, Symbol, Timestamp, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    pub cash_balance: Cash,
    pub holdings: Vec<Holding>,
    pub futures_orders: Vec<FuturesOrder>,
    pub deposit: Option<Deposit>,
    pub created_at: Timestamp,
}

impl UserRecord {
    pub fn new(id: UserId, name: impl Into<String>, role: Role, starting_cash: Cash, now: Timestamp) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            cash_balance: starting_cash,
            holdings: Vec::new(),
            futures_orders: Vec::new(),
            deposit: None,
            created_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn holding(&self, symbol: &Symbol, direction: Direction) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.matches(symbol, direction))
    }

    pub fn holding_index(&self, symbol: &Symbol, direction: Direction) -> Option<usize> {
        self.holdings.iter().position(|h| h.matches(symbol, direction))
    }

    /// Any positive holding price for the symbol, either direction.
    pub fn holding_price(&self, symbol: &Symbol) -> Option<Price> {
        self.holdings
            .iter()
            .find(|h| &h.symbol == symbol && h.price.value() > Decimal::ZERO)
            .map(|h| h.price)
    }

    pub fn reserved_margin(&self, multiplier: Decimal) -> Cash {
        reserved_margin(&self.futures_orders, multiplier)
    }

    pub fn credit(&mut self, amount: Cash) {
        self.cash_balance = self.cash_balance.add(amount).rounded();
    }

    pub fn debit(&mut self, amount: Cash) {
        self.cash_balance = self.cash_balance.sub(amount).rounded();
    }

    pub fn has_active_deposit(&self) -> bool {
        self.deposit.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn user() -> UserRecord {
        UserRecord::new(UserId(1), "ana", Role::User, Cash::new(dec!(10000)), Timestamp::from_millis(0))
    }

    #[test]
    fn cash_moves_round_to_cents() {
        let mut u = user();
        u.debit(Cash::new(dec!(8921.004)));
        assert_eq!(u.cash_balance.value(), dec!(1079.00));
        u.credit(Cash::new(dec!(0.555)));
        assert_eq!(u.cash_balance.value(), dec!(1079.56));
    }

    #[test]
    fn holdings_are_keyed_by_symbol_and_direction() {
        let mut u = user();
        let nvda = Symbol::new("NVDA");
        u.holdings.push(Holding::open(
            nvda.clone(),
            "NVIDIA".to_string(),
            dec!(2),
            Price::new_unchecked(dec!(900)),
            Direction::Short,
            Timestamp::from_millis(0),
            Timestamp::from_millis(1),
        ));
        assert!(u.holding(&nvda, Direction::Long).is_none());
        assert!(u.holding(&nvda, Direction::Short).is_some());
        assert_eq!(u.holding_price(&nvda).map(|p| p.value()), Some(dec!(900)));
    }
}

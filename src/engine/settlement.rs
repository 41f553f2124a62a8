// 8.5 engine/settlement.rs: the per-user sweep. runs before every read and every
// order/deposit decision for that user. order of work:
//   1. sync holding prices from the table, drop zero-share holdings
//   2. expire spot holdings (always, even while paused)
//   3. expire futures (only while running; unresolvable exit price defers)
//   4. mature the deposit (only while running) or produce its display snapshot
// everything realized is removed from the record in the same pass, so a second
// sweep cannot pay it again.

use super::core::Engine;
use super::results::SweepReport;
use crate::account::UserRecord;
use crate::events::{
    DepositMaturedEvent, EventPayload, FuturesDeferredEvent, FuturesSettledEvent, HoldingExpiredEvent,
};
use crate::position::{FuturesOrder, Holding};
use crate::types::{Cash, Price, Symbol, Timestamp};
use crate::valuation::PriceSource;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

impl Engine {
    pub fn settle(&mut self, user: &mut UserRecord) -> SweepReport {
        let mut report = SweepReport::default();

        self.sync_holdings(user);
        self.expire_holdings(user, &mut report);

        if self.clock.is_running() {
            self.expire_futures(user, &mut report);
        }
        self.sweep_deposit(user, &mut report);

        if !report.is_noop() {
            debug!(user = %user.id, delta = %report.cash_delta(), "sweep realized");
        }
        report
    }

    // 8.5.1: snapshot sync. holdings carry a denormalized copy of the live quote.
    fn sync_holdings(&self, user: &mut UserRecord) {
        for holding in user.holdings.iter_mut() {
            if let Some(quote) = self.prices.get(&holding.symbol) {
                holding.sync_quote(quote);
            }
        }
        user.holdings.retain(|h| h.shares > Decimal::ZERO);
    }

    // 8.5.2
    fn expire_holdings(&mut self, user: &mut UserRecord, report: &mut SweepReport) {
        let now = self.current_time;
        let (expired, active): (Vec<Holding>, Vec<Holding>) =
            std::mem::take(&mut user.holdings).into_iter().partition(|h| h.is_expired(now));
        user.holdings = active;

        for holding in expired {
            let cash_delta = holding.expiry_cash();
            user.credit(cash_delta);
            report.expired_holdings += 1;
            report.spot_cash = report.spot_cash.add(cash_delta);

            info!(
                user = %user.id,
                symbol = %holding.symbol,
                direction = %holding.direction,
                shares = %holding.shares,
                price = %holding.price,
                "holding expired"
            );
            self.emit_event(EventPayload::HoldingExpired(HoldingExpiredEvent {
                user_id: user.id,
                symbol: holding.symbol,
                direction: holding.direction,
                shares: holding.shares,
                price: holding.price,
                cash_delta,
            }));
        }
    }

    // 8.5.3
    fn expire_futures(&mut self, user: &mut UserRecord, report: &mut SweepReport) {
        let now = self.current_time;
        let multiplier = self.config.futures.contract_multiplier;
        let orders = std::mem::take(&mut user.futures_orders);
        let mut kept: Vec<FuturesOrder> = Vec::with_capacity(orders.len());
        let mut settled: Vec<(FuturesOrder, Price, Cash)> = Vec::new();
        let mut deferred: Vec<(Symbol, Timestamp)> = Vec::new();

        {
            let source = PriceSource::new(&self.prices, &self.catalog);
            for order in orders {
                if !order.is_expired(now) {
                    kept.push(order);
                    continue;
                }
                match source.resolve(user, &order.symbol) {
                    Some(exit) => {
                        let pnl = order.pnl(exit, multiplier);
                        settled.push((order, exit, pnl));
                    }
                    None => {
                        deferred.push((order.symbol.clone(), order.expires_at));
                        kept.push(order);
                    }
                }
            }
        }
        user.futures_orders = kept;

        for (order, exit_price, pnl) in settled {
            user.credit(pnl);
            report.settled_futures += 1;
            report.futures_pnl = report.futures_pnl.add(pnl);

            info!(user = %user.id, symbol = %order.symbol, %pnl, "futures settled");
            self.emit_event(EventPayload::FuturesSettled(FuturesSettledEvent {
                user_id: user.id,
                symbol: order.symbol,
                direction: order.direction,
                entry_price: order.entry_price,
                exit_price,
                pnl,
            }));
        }

        for (symbol, expires_at) in deferred {
            report.deferred_futures.push(symbol.clone());
            warn!(user = %user.id, %symbol, "no exit price, futures settlement deferred");
            self.emit_event(EventPayload::FuturesDeferred(FuturesDeferredEvent {
                user_id: user.id,
                symbol,
                expires_at,
            }));
        }
    }

    // 8.5.4: payout and display both use the live rate
    fn sweep_deposit(&mut self, user: &mut UserRecord, report: &mut SweepReport) {
        let Some(deposit) = user.deposit.clone() else {
            return;
        };
        let now = self.current_time;
        let live_rate = self.clock.interest_rate();

        if self.clock.is_running() && deposit.is_due(now) {
            let interest = deposit.interest_at(live_rate);
            let payout = deposit.payout(live_rate);
            user.credit(payout);
            user.deposit = None;
            report.deposit_payout = Some(payout);

            info!(user = %user.id, principal = %deposit.amount, %interest, rate = %live_rate, "deposit matured");
            self.emit_event(EventPayload::DepositMatured(DepositMaturedEvent {
                user_id: user.id,
                principal: deposit.amount,
                interest,
                rate_applied: live_rate,
            }));
        } else {
            report.deposit = Some(deposit.snapshot(live_rate, now));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VenueConfig;
    use crate::deposit::Deposit;
    use crate::types::{Direction, Leverage, Role, UserId};
    use rust_decimal_macros::dec;

    fn engine() -> Engine {
        Engine::new(VenueConfig::deterministic(3))
    }

    fn user(cash: Decimal) -> UserRecord {
        UserRecord::new(UserId(1), "ana", Role::User, Cash::new(cash), Timestamp::from_millis(0))
    }

    fn holding(symbol: &str, shares: Decimal, direction: Direction, expires_ms: i64) -> Holding {
        Holding::open(
            Symbol::new(symbol),
            symbol.to_string(),
            shares,
            Price::new_unchecked(dec!(100)),
            direction,
            Timestamp::from_millis(0),
            Timestamp::from_millis(expires_ms),
        )
    }

    fn future(symbol: &str, direction: Direction, entry: Decimal, expires_ms: i64) -> FuturesOrder {
        FuturesOrder {
            symbol: Symbol::new(symbol),
            name: symbol.to_string(),
            shares: dec!(1),
            leverage: Leverage::new(2).unwrap(),
            direction,
            entry_price: Price::new_unchecked(entry),
            opened_at: Timestamp::from_millis(0),
            expires_at: Timestamp::from_millis(expires_ms),
        }
    }

    #[test]
    fn expired_long_credits_and_short_debits_at_current_price() {
        let mut e = engine();
        let mut u = user(dec!(1000));
        u.holdings.push(holding("NVDA", dec!(10), Direction::Long, 10));
        u.holdings.push(holding("TSLA", dec!(2), Direction::Short, 10));
        u.holdings.push(holding("AAPL", dec!(1), Direction::Long, 1_000));
        e.set_time(Timestamp::from_millis(10));

        let report = e.settle(&mut u);
        // +892.10*10 - 231.80*2
        assert_eq!(report.expired_holdings, 2);
        assert_eq!(u.cash_balance.value(), dec!(9457.40));
        assert_eq!(u.holdings.len(), 1);
        assert_eq!(u.holdings[0].price.value(), dec!(194.30));

        let again = e.settle(&mut u);
        assert!(again.is_noop());
        assert_eq!(u.cash_balance.value(), dec!(9457.40));
    }

    #[test]
    fn holdings_expire_even_while_paused_but_futures_freeze() {
        let mut e = engine();
        let mut u = user(dec!(0));
        u.holdings.push(holding("NVDA", dec!(1), Direction::Long, 5));
        u.futures_orders.push(future("AAPL", Direction::Long, dec!(190.30), 5));
        e.pause();
        e.set_time(Timestamp::from_millis(5));

        let report = e.settle(&mut u);
        assert_eq!(report.expired_holdings, 1);
        assert_eq!(report.settled_futures, 0);
        assert_eq!(u.futures_orders.len(), 1);

        e.start();
        let report = e.settle(&mut u);
        // (194.30 - 190.30) * 1 * 2 * 10
        assert_eq!(report.futures_pnl.value(), dec!(80));
        assert!(u.futures_orders.is_empty());
        assert_eq!(u.cash_balance.value(), dec!(972.10));
    }

    #[test]
    fn futures_losses_may_drive_cash_negative() {
        let mut e = engine();
        let mut u = user(dec!(10));
        u.futures_orders.push(future("AAPL", Direction::Long, dec!(294.30), 1));
        e.set_time(Timestamp::from_millis(1));
        e.settle(&mut u);
        assert_eq!(u.cash_balance.value(), dec!(-1990));
    }

    #[test]
    fn unresolvable_exit_price_defers_settlement() {
        let mut e = engine();
        let mut u = user(dec!(100));
        u.futures_orders.push(future("DELISTED", Direction::Short, dec!(50), 1));
        e.set_time(Timestamp::from_millis(2));

        let report = e.settle(&mut u);
        assert_eq!(report.deferred_futures, vec![Symbol::new("DELISTED")]);
        assert_eq!(u.futures_orders.len(), 1);
        assert_eq!(u.cash_balance.value(), dec!(100));
    }

    #[test]
    fn zero_share_holdings_are_pruned() {
        let mut e = engine();
        let mut u = user(dec!(0));
        u.holdings.push(holding("NVDA", Decimal::ZERO, Direction::Long, 10_000));
        e.settle(&mut u);
        assert!(u.holdings.is_empty());
    }

    #[test]
    fn deposit_matures_at_live_rate_only_while_running() {
        let mut e = engine();
        let mut u = user(dec!(0));
        u.deposit = Some(Deposit::open(Cash::new(dec!(1000)), dec!(0.0425), Timestamp::from_millis(0), 100));
        e.set_interest_rate(dec!(0.06)).unwrap();
        e.pause();
        e.set_time(Timestamp::from_millis(200));

        let paused = e.settle(&mut u);
        let snapshot = paused.deposit.unwrap();
        assert_eq!(snapshot.interest_rate, dec!(0.06));
        assert!(u.deposit.is_some());

        e.start();
        let report = e.settle(&mut u);
        assert_eq!(report.deposit_payout.unwrap().value(), dec!(1060));
        assert!(u.deposit.is_none());
        assert_eq!(u.cash_balance.value(), dec!(1060));
    }
}

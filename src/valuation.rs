// 14.0 valuation.rs: read-only projections over user records.
//   - exit/mark price resolution shared with the settlement sweep
//   - leaderboard ranking
//   - per-user portfolio metrics
//   - operator user listing
// nothing here mutates a record.

use crate::account::UserRecord;
use crate::catalog::Catalog;
use crate::position::Holding;
use crate::price_table::PriceTable;
use crate::types::{Cash, Price, Role, Symbol, UserId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/** 14.1: where live prices come from when valuing or settling a user */
#[derive(Debug, Clone, Copy)]
pub struct PriceSource<'a> {
    pub prices: &'a PriceTable,
    pub catalog: &'a Catalog,
}

impl<'a> PriceSource<'a> {
    pub fn new(prices: &'a PriceTable, catalog: &'a Catalog) -> Self {
        Self { prices, catalog }
    }

    // user's holding price, then the live table, then the catalog baseline.
    // None means the price cannot be resolved this cycle.
    pub fn resolve(&self, user: &UserRecord, symbol: &Symbol) -> Option<Price> {
        user.holding_price(symbol)
            .or_else(|| self.prices.price(symbol))
            .or_else(|| self.catalog.baseline_price(symbol))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: UserId,
    pub name: String,
    pub holdings_value: Cash,
    pub cash: Cash,
    pub deposit: Cash,
    /// Unrealized mark-to-market on open futures.
    pub futures_pnl: Cash,
    pub total_value: Cash,
}

/** 14.2: futures marked at the resolved price. unresolved orders contribute nothing */
pub fn futures_mark_to_market(user: &UserRecord, source: &PriceSource<'_>, multiplier: Decimal) -> Cash {
    user.futures_orders
        .iter()
        .filter_map(|order| {
            source
                .resolve(user, &order.symbol)
                .map(|mark| order.pnl(mark, multiplier))
        })
        .sum()
}

// holdings are counted at price x shares regardless of direction
pub fn holdings_value(user: &UserRecord) -> Cash {
    user.holdings.iter().map(|h| h.market_value()).sum()
}

pub fn total_value(user: &UserRecord, source: &PriceSource<'_>, multiplier: Decimal) -> Cash {
    let deposit = user.deposit.as_ref().map(|d| d.amount).unwrap_or_else(Cash::zero);
    holdings_value(user)
        .add(user.cash_balance)
        .add(deposit)
        .add(futures_mark_to_market(user, source, multiplier))
}

/** 14.3: rank non-admin users by total value, descending. ties keep input order */
pub fn leaderboard(
    users: &[UserRecord],
    source: &PriceSource<'_>,
    multiplier: Decimal,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    let mut rows: Vec<LeaderboardEntry> = users
        .iter()
        .filter(|u| !u.is_admin())
        .map(|u| {
            let holdings_value = holdings_value(u);
            let deposit = u.deposit.as_ref().map(|d| d.amount).unwrap_or_else(Cash::zero);
            let futures_pnl = futures_mark_to_market(u, source, multiplier);
            LeaderboardEntry {
                rank: 0,
                user_id: u.id,
                name: u.name.clone(),
                holdings_value: holdings_value.rounded(),
                cash: u.cash_balance,
                deposit,
                futures_pnl: futures_pnl.rounded(),
                total_value: holdings_value.add(u.cash_balance).add(deposit).add(futures_pnl).rounded(),
            }
        })
        .collect();

    // sort_by is stable
    rows.sort_by(|a, b| b.total_value.cmp(&a.total_value));
    rows.truncate(limit);
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }
    rows
}

/** 14.4: operator view of one account, as stored */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUserRow {
    pub user_id: UserId,
    pub name: String,
    pub role: Role,
    pub cash_balance: Cash,
    /// Principal locked in the active deposit, zero when there is none.
    pub deposit_amount: Cash,
    pub holdings: Vec<Holding>,
}

pub fn admin_users(users: &[UserRecord]) -> Vec<AdminUserRow> {
    users
        .iter()
        .map(|u| AdminUserRow {
            user_id: u.id,
            name: u.name.clone(),
            role: u.role,
            cash_balance: u.cash_balance,
            deposit_amount: u.deposit.as_ref().map(|d| d.amount).unwrap_or_else(Cash::zero),
            holdings: u.holdings.clone(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub portfolio_value: Cash,
    pub invested: Cash,
    pub gain: Cash,
    /// Percent units, 2dp. Zero when nothing is invested.
    pub gain_pct: Decimal,
    /// Sum of value x today's percent change.
    pub daily_change: Cash,
    pub cash_balance: Cash,
}

pub fn portfolio_metrics(user: &UserRecord) -> PortfolioMetrics {
    let portfolio_value = holdings_value(user);
    let invested: Cash = user.holdings.iter().map(|h| h.cost_basis()).sum();
    let gain = portfolio_value.sub(invested);
    let gain_pct = if invested.value().is_zero() {
        Decimal::ZERO
    } else {
        (gain.value() / invested.value() * dec!(100)).round_dp(2)
    };
    let daily_change: Cash = user
        .holdings
        .iter()
        .map(|h| h.market_value().mul(h.percent_change / dec!(100)))
        .sum();

    PortfolioMetrics {
        portfolio_value: portfolio_value.rounded(),
        invested: invested.rounded(),
        gain: gain.rounded(),
        gain_pct,
        daily_change: daily_change.rounded(),
        cash_balance: user.cash_balance,
    }
}

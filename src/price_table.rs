// 9.0 price_table.rs: the simulated feed. one row per symbol, catalog order.
//
// Two write paths with different percent-change semantics:
//   drift (ambient tick)  -> change is REPLACED by this tick's drift
//   shock (news impact)   -> change ACCUMULATES (old + impact)
// Both floor the price at 1. The mismatch is the observed behavior and is kept
// until product decides otherwise; tests pin it.

use crate::catalog::Catalog;
use crate::types::{Price, Symbol, Timestamp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    pub symbol: Symbol,
    pub price: Price,
    /// Percent units, 2dp.
    pub percent_change: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTable {
    rows: Vec<PriceQuote>,
    last_tick_at: Option<Timestamp>,
}

impl PriceTable {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let rows = catalog
            .iter()
            .map(|i| PriceQuote {
                symbol: i.symbol.clone(),
                price: i.baseline_price,
                percent_change: i.baseline_change,
            })
            .collect();
        Self { rows, last_tick_at: None }
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&PriceQuote> {
        self.rows.iter().find(|q| &q.symbol == symbol)
    }

    pub fn price(&self, symbol: &Symbol) -> Option<Price> {
        self.get(symbol).map(|q| q.price)
    }

    pub fn quotes(&self) -> &[PriceQuote] {
        &self.rows
    }

    pub fn symbol_at(&self, index: usize) -> Option<&Symbol> {
        self.rows.get(index).map(|q| &q.symbol)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last_tick_at(&self) -> Option<Timestamp> {
        self.last_tick_at
    }

    pub fn mark_observed(&mut self, now: Timestamp) {
        self.last_tick_at = Some(now);
    }

    // 9.1: ambient path. drifts[i] pairs with rows[i]; the whole batch lands or none of it does.
    pub fn apply_drift(&mut self, drifts: &[Decimal], now: Timestamp) -> Result<(), PriceTableError> {
        if drifts.len() != self.rows.len() {
            return Err(PriceTableError::DriftBatchMismatch {
                expected: self.rows.len(),
                got: drifts.len(),
            });
        }
        for (row, drift) in self.rows.iter_mut().zip(drifts) {
            row.price = row.price.moved_by(*drift);
            row.percent_change = drift.round_dp(2);
        }
        self.last_tick_at = Some(now);
        Ok(())
    }

    // 9.2: news path. returns (old, new) price.
    pub fn apply_shock(&mut self, symbol: &Symbol, impact_pct: Decimal) -> Result<(Price, Price), PriceTableError> {
        let row = self
            .rows
            .iter_mut()
            .find(|q| &q.symbol == symbol)
            .ok_or_else(|| PriceTableError::UnknownSymbol(symbol.clone()))?;
        let old = row.price;
        row.price = old.moved_by(impact_pct);
        row.percent_change = (row.percent_change + impact_pct).round_dp(2);
        Ok((old, row.price))
    }

    // 9.3: operator override. change is measured against the previous price.
    pub fn set_price(&mut self, symbol: &Symbol, price: Price) -> Result<PriceQuote, PriceTableError> {
        let row = self
            .rows
            .iter_mut()
            .find(|q| &q.symbol == symbol)
            .ok_or_else(|| PriceTableError::UnknownSymbol(symbol.clone()))?;
        let prev = row.price.value();
        row.percent_change = ((price.value() - prev) / prev * dec!(100)).round_dp(2);
        row.price = Price::floored(price.value());
        Ok(row.clone())
    }

    // reset path: back to catalog baseline
    pub fn reseed(&mut self, catalog: &Catalog) {
        *self = Self::from_catalog(catalog);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceTableError {
    #[error("unknown symbol {0}")]
    UnknownSymbol(Symbol),
    #[error("drift batch has {got} entries, table has {expected}")]
    DriftBatchMismatch { expected: usize, got: usize },
}

//! Baseline instrument catalog.
//!
//! Static reference data: which symbols are tradable, their display names, the
//! baseline price the feed starts from (and falls back to), and the default
//! allocation weight shown for a fresh portfolio.

use crate::types::{Price, Symbol};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: Symbol,
    pub name: String,
    pub baseline_price: Price,
    /// Reference percent change shown before the first tick.
    pub baseline_change: Decimal,
    /// Allocation weight in percent.
    pub allocation: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    instruments: Vec<Instrument>,
}

impl Catalog {
    pub fn new(instruments: Vec<Instrument>) -> Self {
        Self { instruments }
    }

    /// The twelve large-cap names the venue ships with.
    pub fn default_equities() -> Self {
        let rows: [(&str, &str, Decimal, Decimal, Decimal); 12] = [
            ("NVDA", "NVIDIA Corporation", dec!(892.10), dec!(1.92), dec!(12)),
            ("AAPL", "Apple Inc.", dec!(194.30), dec!(0.58), dec!(11)),
            ("TSLA", "Tesla, Inc.", dec!(231.80), dec!(-0.74), dec!(10)),
            ("AMZN", "Amazon.com, Inc.", dec!(181.40), dec!(0.82), dec!(10)),
            ("TSM", "Taiwan Semiconductor Manufacturing Company", dec!(118.40), dec!(1.03), dec!(9)),
            ("SPACEX", "SpaceX Holdings", dec!(318.00), dec!(2.16), dec!(9)),
            ("META", "Meta Platforms, Inc.", dec!(488.50), dec!(1.82), dec!(9)),
            ("AMD", "Advanced Micro Devices, Inc.", dec!(164.20), dec!(-0.53), dec!(8)),
            ("INTC", "Intel Corporation", dec!(72.60), dec!(0.34), dec!(7)),
            ("NFLX", "Netflix, Inc.", dec!(209.50), dec!(-0.58), dec!(7)),
            ("MSFT", "Microsoft Corporation", dec!(269.90), dec!(0.47), dec!(7)),
            ("GOOGL", "Alphabet Inc.", dec!(152.40), dec!(0.64), dec!(4)),
        ];

        let instruments = rows
            .into_iter()
            .map(|(symbol, name, price, change, allocation)| Instrument {
                symbol: Symbol::new(symbol),
                name: name.to_string(),
                baseline_price: Price::new_unchecked(price),
                baseline_change: change,
                allocation,
            })
            .collect();

        Self { instruments }
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&Instrument> {
        self.instruments.iter().find(|i| &i.symbol == symbol)
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.get(symbol).is_some()
    }

    pub fn baseline_price(&self, symbol: &Symbol) -> Option<Price> {
        self.get(symbol).map(|i| i.baseline_price)
    }

    pub fn display_name(&self, symbol: &Symbol) -> String {
        self.get(symbol)
            .map(|i| i.name.clone())
            .unwrap_or_else(|| symbol.to_string())
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.instruments.iter().map(|i| &i.symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::default_equities()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_reference_prices() {
        let catalog = Catalog::default_equities();
        assert_eq!(catalog.len(), 12);
        assert_eq!(catalog.baseline_price(&Symbol::new("NVDA")).unwrap().value(), dec!(892.10));
        assert_eq!(catalog.baseline_price(&Symbol::new("AAPL")).unwrap().value(), dec!(194.30));
    }

    #[test]
    fn unknown_symbol_lookups() {
        let catalog = Catalog::default_equities();
        let bogus = Symbol::new("ZZZZ");
        assert!(!catalog.contains(&bogus));
        assert!(catalog.baseline_price(&bogus).is_none());
        assert_eq!(catalog.display_name(&bogus), "ZZZZ");
    }

    #[test]
    fn allocation_weights_match_reference_table() {
        let catalog = Catalog::default_equities();
        let total: Decimal = catalog.iter().map(|i| i.allocation).sum();
        assert_eq!(total, dec!(103));
    }
}

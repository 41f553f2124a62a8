// 1.0: all the primitives live here. nothing in the venue works without these types.
// IDs, symbols, prices, cash, leverage, timestamps. each is a newtype so the compiler catches mixups.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user#{}", self.0)
    }
}

// ticker, e.g. "NVDA". "RATE" is reserved for macro news.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    pub const RATE: &'static str = "RATE";

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_rate(&self) -> bool {
        self.0 == Self::RATE
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

// Long = profit when price goes up. Short = profit when price goes down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn sign(&self) -> Decimal {
        match self {
            Direction::Long => dec!(1),
            Direction::Short => dec!(-1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => f.write_str("long"),
            Direction::Short => f.write_str("short"),
        }
    }
}

// buy opens a long / closes a short. sell opens a short / closes a long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    pub fn opens(&self, direction: Direction) -> bool {
        matches!(
            (self, direction),
            (TradeAction::Buy, Direction::Long) | (TradeAction::Sell, Direction::Short)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Admin,
}

// 1.1: price in cash per unit. must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price(Decimal);

impl Price {
    // simulated prices never fall below one unit
    pub const FLOOR: Decimal = Decimal::ONE;

    #[must_use]
    pub fn new(value: Decimal) -> Option<Self> {
        if value > Decimal::ZERO {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn new_unchecked(value: Decimal) -> Self {
        debug_assert!(value > Decimal::ZERO);
        Self(value)
    }

    // max(1, value) rounded to cents. used by every drift and shock path.
    pub fn floored(value: Decimal) -> Self {
        Self(value.max(Self::FLOOR).round_dp(2))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    // cost-basis rounding: cents, no floor. a value under half a cent keeps its precision.
    pub fn cents(value: Decimal) -> Option<Self> {
        Self::new(value.round_dp(2)).or_else(|| Self::new(value))
    }

    // applies a percentage move: price * (1 + pct/100), floored.
    // a move that would leave the decimal range keeps the current price.
    pub fn moved_by(&self, pct: Decimal) -> Self {
        self.0
            .checked_mul(Decimal::ONE + pct / dec!(100))
            .map(Self::floored)
            .unwrap_or(*self)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 1.2: cash amount. balances, order values, pnl, margin all use this. may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cash(Decimal);

impl Cash {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn add(&self, other: Cash) -> Self {
        Self(self.0 + other.0)
    }

    pub fn checked_add(&self, other: Cash) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn sub(&self, other: Cash) -> Self {
        Self(self.0 - other.0)
    }

    pub fn mul(&self, factor: Decimal) -> Self {
        Self(self.0 * factor)
    }

    pub fn negate(&self) -> Self {
        Self(-self.0)
    }

    // balances are kept to cents
    pub fn rounded(&self) -> Self {
        Self(self.0.round_dp(2))
    }
}

impl fmt::Display for Cash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialOrd for Cash {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cash {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl Sum for Cash {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, c| acc.add(c))
    }
}

impl<'a> Sum<&'a Cash> for Cash {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, c| acc.add(*c))
    }
}

// 1.3: futures leverage. whole multiples only, 1x..=10x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Leverage(u32);

impl Leverage {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 10;

    #[must_use]
    pub fn new(value: u32) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.0)
    }
}

impl fmt::Display for Leverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

// 1.4: millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    pub fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    pub fn plus_millis(&self, ms: i64) -> Self {
        Self(self.0 + ms)
    }

    pub fn millis_until(&self, later: Timestamp) -> i64 {
        later.0 - self.0
    }

    pub fn to_rfc3339(&self) -> String {
        chrono::DateTime::<chrono::Utc>::from_timestamp_millis(self.0)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_default()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_normalizes_case() {
        assert_eq!(Symbol::new(" nvda ").as_str(), "NVDA");
        assert!(Symbol::new("rate").is_rate());
    }

    #[test]
    fn price_floor_applies_on_moves() {
        let p = Price::new_unchecked(dec!(1.50));
        assert_eq!(p.moved_by(dec!(-50)).value(), dec!(1));
        assert_eq!(p.moved_by(dec!(10)).value(), dec!(1.65));
    }

    #[test]
    fn moves_past_decimal_range_hold_the_price() {
        let p = Price::new_unchecked(Decimal::MAX);
        assert_eq!(p.moved_by(dec!(0.45)), p);
        assert!(p.moved_by(dec!(-0.45)) < p);
    }

    #[test]
    fn cents_rounding_has_no_floor() {
        assert_eq!(Price::cents(dec!(0.504)).unwrap().value(), dec!(0.50));
        assert_eq!(Price::cents(dec!(0.004)).unwrap().value(), dec!(0.004));
        assert!(Price::cents(Decimal::ZERO).is_none());
    }

    #[test]
    fn leverage_bounds() {
        assert!(Leverage::new(0).is_none());
        assert!(Leverage::new(1).is_some());
        assert!(Leverage::new(10).is_some());
        assert!(Leverage::new(11).is_none());
    }

    #[test]
    fn trade_action_opening_table() {
        assert!(TradeAction::Buy.opens(Direction::Long));
        assert!(TradeAction::Sell.opens(Direction::Short));
        assert!(!TradeAction::Sell.opens(Direction::Long));
        assert!(!TradeAction::Buy.opens(Direction::Short));
    }

    #[test]
    fn timestamp_arithmetic() {
        let t = Timestamp::from_millis(1_000);
        assert_eq!(t.plus_millis(500).as_millis(), 1_500);
        assert_eq!(t.millis_until(Timestamp::from_millis(4_000)), 3_000);
    }
}

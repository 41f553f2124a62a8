// venue-core: simulated trading venue.
// one shared market (clock, benchmark rate, price table, news) and per-user
// spot holdings, leveraged futures and fixed-term deposits settled on read.
// the engine is deterministic given injected time and a seeded feed.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: UserId, Symbol, Direction, Price, Cash, Leverage
//   2.x  catalog.rs: baseline instrument catalog
//   3.x  news.rs: headlines, auto generation, operator validation, apply-once delivery
//   4.x  position.rs: holdings, futures orders, pnl and margin formulas
//   5.x  rates.rs: benchmark rate governor, clamp band
//   6.x  deposit.rs: fixed-term deposits
//   7.x  config.rs: durations, futures terms, feed tuning, presets, env overlay
//   8.x  engine/: core engine: control, pricing, news, settlement, orders, deposits
//   9.x  price_table.rs: simulated feed, drift vs shock
//   9.4  price_gen.rs: seeded drift draws
//   10.x account.rs: user records
//   11.x events.rs: state transition events for audit
//   12.x market.rs: market clock + run state
//   13.x store.rs: user store contract + in-memory store
//   14.x valuation.rs: price resolution, leaderboard, portfolio metrics
//   15.x service.rs: per-user scoped actions, role gating, timers

// market modules
pub mod catalog;
pub mod market;
pub mod news;
pub mod price_gen;
pub mod price_table;
pub mod rates;

// user-side modules
pub mod account;
pub mod deposit;
pub mod position;
pub mod valuation;

// core
pub mod config;
pub mod engine;
pub mod events;
pub mod types;

// integration modules
pub mod service;
pub mod store;

// re exports for convenience
pub use account::*;
pub use catalog::*;
pub use config::*;
pub use deposit::*;
pub use engine::*;
pub use events::*;
pub use market::*;
pub use news::*;
pub use position::*;
pub use price_table::*;
pub use rates::*;
pub use types::*;
pub use valuation::*;
pub use price_gen::PriceGenerator;
pub use service::{Actor, PortfolioView, Venue};
pub use store::{InMemoryUserStore, StoreError, UserStore};

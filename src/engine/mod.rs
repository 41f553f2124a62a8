// 8.0: core venue engine. coordinates market control, the price feed, news,
// the per-user settlement sweep, order placement and deposits.
// deterministic given injected time and a seeded feed. no I/O.

mod accounts;
mod control;
mod core;
mod deposits;
mod news;
mod orders;
mod pricing;
mod results;
mod settlement;

pub use accounts::CashAdjustment;
pub use core::Engine;
pub use orders::{FuturesTicket, SpotOrder};
pub use results::{SpotFill, SweepReport, TickOutcome, VenueError};

//! Venue service.
//!
//! Wraps the [`Engine`] and a [`UserStore`] into the entry points a transport
//! would call. Every user action is a scoped load → settle/mutate → save under a
//! per-user lock, so two concurrent actions on one user cannot lose each other's
//! updates. The save runs even when the action is rejected, since the sweep that
//! precedes validation may already have realized expired positions.
//!
//! Lock order is always user lock, then engine lock.

use crate::account::UserRecord;
use crate::config::{ConfigError, VenueConfig};
use crate::deposit::Deposit;
use crate::engine::{
    CashAdjustment, Engine, FuturesTicket, SpotFill, SpotOrder, SweepReport, TickOutcome, VenueError,
};
use crate::market::MarketState;
use crate::news::{Headline, HeadlineInput};
use crate::position::FuturesOrder;
use crate::price_table::PriceQuote;
use crate::store::{StoreError, UserStore};
use crate::types::{Cash, Role, Symbol, Timestamp, UserId};
use crate::valuation::{
    admin_users, leaderboard, portfolio_metrics, total_value, AdminUserRow, LeaderboardEntry, PortfolioMetrics,
    PriceSource,
};
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Verified identity handed in by the (external) auth layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn user(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::User,
        }
    }

    pub fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Admin,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioView {
    pub record: UserRecord,
    pub metrics: PortfolioMetrics,
    pub total_value: Cash,
    pub market: MarketState,
    #[serde(skip)]
    pub sweep: SweepReport,
}

pub struct Venue {
    engine: Mutex<Engine>,
    store: Arc<dyn UserStore>,
    user_locks: DashMap<UserId, Arc<Mutex<()>>>,
    config: VenueConfig,
    // false: engine time only moves through set_time / advance_time
    wall_clock: bool,
}

impl Venue {
    pub fn new(config: VenueConfig, store: Arc<dyn UserStore>) -> Result<Arc<Self>, ConfigError> {
        Self::build(config, store, true)
    }

    /// Engine time starts at zero and only moves when told to.
    pub fn with_manual_clock(config: VenueConfig, store: Arc<dyn UserStore>) -> Result<Arc<Self>, ConfigError> {
        Self::build(config, store, false)
    }

    fn build(config: VenueConfig, store: Arc<dyn UserStore>, wall_clock: bool) -> Result<Arc<Self>, ConfigError> {
        let mut engine = Engine::try_new(config.clone())?;
        if wall_clock {
            engine.set_time(Timestamp::now());
        }
        Ok(Arc::new(Self {
            engine: Mutex::new(engine),
            store,
            user_locks: DashMap::new(),
            config,
            wall_clock,
        }))
    }

    pub fn config(&self) -> &VenueConfig {
        &self.config
    }

    pub async fn set_time(&self, timestamp: Timestamp) {
        self.engine.lock().await.set_time(timestamp);
    }

    pub async fn advance_time(&self, millis: i64) {
        self.engine.lock().await.advance_time(millis);
    }

    async fn engine(&self) -> tokio::sync::MutexGuard<'_, Engine> {
        let mut engine = self.engine.lock().await;
        if self.wall_clock {
            engine.set_time(Timestamp::now());
        }
        engine
    }

    fn user_lock(&self, id: UserId) -> Arc<Mutex<()>> {
        self.user_locks.entry(id).or_default().value().clone()
    }

    fn load(&self, id: UserId) -> Result<UserRecord, VenueError> {
        self.store.load(id).map_err(|e| match e {
            StoreError::NotFound(id) => VenueError::UserNotFound(id),
            other => VenueError::Store(other),
        })
    }

    // load, run, save. the save happens whatever the action returned.
    async fn with_user<T>(
        &self,
        id: UserId,
        action: impl FnOnce(&mut Engine, &mut UserRecord) -> Result<T, VenueError>,
    ) -> Result<T, VenueError> {
        let lock = self.user_lock(id);
        let _guard = lock.lock().await;

        let mut record = self.load(id)?;
        let result = {
            let mut engine = self.engine().await;
            action(&mut *engine, &mut record)
        };
        self.store.save(&record)?;
        result
    }

    fn require_admin(actor: &Actor) -> Result<(), VenueError> {
        if actor.role != Role::Admin {
            return Err(VenueError::Forbidden("operator action requires admin"));
        }
        Ok(())
    }

    // user accounts

    pub async fn register(&self, name: &str, role: Role) -> Result<UserRecord, VenueError> {
        let now = self.engine().await.time();
        let starting_cash = match role {
            Role::User => Cash::new(self.config.starting_cash),
            Role::Admin => Cash::zero(),
        };
        let record = UserRecord::new(self.store.next_id(), name, role, starting_cash, now);
        self.store.insert(record.clone())?;
        info!(user = %record.id, name, ?role, "user registered");
        Ok(record)
    }

    pub async fn portfolio(&self, actor: Actor) -> Result<PortfolioView, VenueError> {
        self.with_user(actor.user_id, |engine, user| {
            let sweep = engine.settle(user);
            let source = PriceSource::new(engine.prices(), engine.catalog());
            let multiplier = engine.config().futures.contract_multiplier;
            Ok(PortfolioView {
                metrics: portfolio_metrics(user),
                total_value: total_value(user, &source, multiplier).rounded(),
                market: engine.market_state(),
                record: user.clone(),
                sweep,
            })
        })
        .await
    }

    pub async fn place_spot_order(&self, actor: Actor, order: SpotOrder) -> Result<SpotFill, VenueError> {
        self.with_user(actor.user_id, |engine, user| engine.place_spot_order(user, order))
            .await
    }

    pub async fn open_futures(&self, actor: Actor, ticket: FuturesTicket) -> Result<FuturesOrder, VenueError> {
        self.with_user(actor.user_id, |engine, user| engine.open_futures(user, ticket))
            .await
    }

    pub async fn open_deposit(&self, actor: Actor, amount: Decimal) -> Result<Deposit, VenueError> {
        self.with_user(actor.user_id, |engine, user| engine.open_deposit(user, amount))
            .await
    }

    /// Ranks the non-admins as stored. Nothing is swept or saved, so holdings are
    /// valued at the price snapshot from each user's last scoped action.
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, VenueError> {
        let records = self.stored_records()?;
        let engine = self.engine().await;
        let source = PriceSource::new(engine.prices(), engine.catalog());
        Ok(leaderboard(
            &records,
            &source,
            self.config.futures.contract_multiplier,
            self.config.leaderboard_size,
        ))
    }

    fn stored_records(&self) -> Result<Vec<UserRecord>, VenueError> {
        self.store.ids().into_iter().map(|id| self.load(id)).collect()
    }

    // market data

    pub async fn market_state(&self) -> MarketState {
        self.engine().await.market_state()
    }

    pub async fn quotes(&self) -> Vec<PriceQuote> {
        self.engine().await.prices().quotes().to_vec()
    }

    pub async fn news_feed(&self, limit: usize) -> Vec<Headline> {
        self.engine().await.news_feed(limit)
    }

    // operator actions

    pub async fn start(&self, actor: Actor) -> Result<MarketState, VenueError> {
        Self::require_admin(&actor)?;
        Ok(self.engine().await.start())
    }

    pub async fn pause(&self, actor: Actor) -> Result<MarketState, VenueError> {
        Self::require_admin(&actor)?;
        Ok(self.engine().await.pause())
    }

    pub async fn reset(&self, actor: Actor) -> Result<MarketState, VenueError> {
        Self::require_admin(&actor)?;
        Ok(self.engine().await.reset())
    }

    pub async fn set_interest_rate(&self, actor: Actor, rate: Decimal) -> Result<MarketState, VenueError> {
        Self::require_admin(&actor)?;
        self.engine().await.set_interest_rate(rate)
    }

    pub async fn submit_news(&self, actor: Actor, input: HeadlineInput) -> Result<Headline, VenueError> {
        Self::require_admin(&actor)?;
        self.engine().await.publish_operator_news(input)
    }

    pub async fn set_price(&self, actor: Actor, symbol: &Symbol, price: Decimal) -> Result<PriceQuote, VenueError> {
        Self::require_admin(&actor)?;
        self.engine().await.set_price(symbol, price)
    }

    /// Sets or shifts a user's cash under that user's lock. Clamped at zero.
    pub async fn adjust_cash(
        &self,
        actor: Actor,
        user_id: UserId,
        adjustment: CashAdjustment,
    ) -> Result<Cash, VenueError> {
        Self::require_admin(&actor)?;
        self.with_user(user_id, |engine, user| engine.adjust_cash(user, adjustment))
            .await
    }

    /// Every account as stored, admins included.
    pub async fn admin_users(&self, actor: Actor) -> Result<Vec<AdminUserRow>, VenueError> {
        Self::require_admin(&actor)?;
        Ok(admin_users(&self.stored_records()?))
    }

    // timers

    pub async fn tick(&self) -> Result<TickOutcome, VenueError> {
        self.engine().await.tick()
    }

    pub async fn publish_auto_news(&self) -> Option<Headline> {
        self.engine().await.publish_auto_news()
    }

    /// Spawns the price and news loops. Both stop when `shutdown` flips to true.
    /// While paused they keep firing as no-ops.
    pub fn spawn_timers(self: &Arc<Self>, shutdown: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        let price_every = Duration::from_millis(self.config.timers.price_tick_ms);
        let news_every = Duration::from_millis(self.config.timers.news_tick_ms);

        let venue = Arc::clone(self);
        let mut stop = shutdown.clone();
        let prices = tokio::spawn(async move {
            let mut interval = tokio::time::interval(price_every);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(err) = venue.tick().await {
                            tracing::error!(%err, "price tick failed");
                        }
                    }
                    changed = stop.changed() => {
                        if changed.is_err() || *stop.borrow() {
                            debug!("price loop stopped");
                            break;
                        }
                    }
                }
            }
        });

        let venue = Arc::clone(self);
        let mut stop = shutdown;
        let news = tokio::spawn(async move {
            let mut interval = tokio::time::interval(news_every);
            // first tick fires immediately; skip it so news trails the backlog
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        venue.publish_auto_news().await;
                    }
                    changed = stop.changed() => {
                        if changed.is_err() || *stop.borrow() {
                            debug!("news loop stopped");
                            break;
                        }
                    }
                }
            }
        });

        vec![prices, news]
    }
}

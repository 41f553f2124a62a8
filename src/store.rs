//! User persistence contract.
//!
//! The engine never owns user records. The service loads one, lets the engine
//! mutate it in memory, and saves it back. [`InMemoryUserStore`] is the store
//! used by the binary and the tests.

use crate::account::UserRecord;
use crate::types::UserId;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(UserId),
    #[error("record {0} already exists")]
    Duplicate(UserId),
    #[error("backend failure: {0}")]
    Backend(String),
}

pub trait UserStore: Send + Sync {
    fn load(&self, id: UserId) -> Result<UserRecord, StoreError>;

    /// Replaces an existing record.
    fn save(&self, record: &UserRecord) -> Result<(), StoreError>;

    fn insert(&self, record: UserRecord) -> Result<(), StoreError>;

    fn next_id(&self) -> UserId;

    /// Every stored id, ascending.
    fn ids(&self) -> Vec<UserId>;
}

#[derive(Debug)]
pub struct InMemoryUserStore {
    records: DashMap<UserId, UserRecord>,
    next_id: AtomicU64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for InMemoryUserStore {
    fn load(&self, id: UserId) -> Result<UserRecord, StoreError> {
        self.records
            .get(&id)
            .map(|r| r.value().clone())
            .ok_or(StoreError::NotFound(id))
    }

    fn save(&self, record: &UserRecord) -> Result<(), StoreError> {
        match self.records.get_mut(&record.id) {
            Some(mut slot) => {
                *slot = record.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(record.id)),
        }
    }

    fn insert(&self, record: UserRecord) -> Result<(), StoreError> {
        if self.records.contains_key(&record.id) {
            return Err(StoreError::Duplicate(record.id));
        }
        self.records.insert(record.id, record);
        Ok(())
    }

    fn next_id(&self) -> UserId {
        UserId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.records.iter().map(|r| *r.key()).collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cash, Role, Timestamp};
    use rust_decimal_macros::dec;

    fn record(store: &InMemoryUserStore) -> UserRecord {
        UserRecord::new(
            store.next_id(),
            "ana",
            Role::User,
            Cash::new(dec!(50000)),
            Timestamp::from_millis(0),
        )
    }

    #[test]
    fn insert_load_save() {
        let store = InMemoryUserStore::new();
        let mut r = record(&store);
        store.insert(r.clone()).unwrap();

        r.cash_balance = Cash::new(dec!(1));
        store.save(&r).unwrap();
        assert_eq!(store.load(r.id).unwrap().cash_balance.value(), dec!(1));
        assert_eq!(store.insert(r.clone()), Err(StoreError::Duplicate(r.id)));
    }

    #[test]
    fn save_unknown_is_not_found() {
        let store = InMemoryUserStore::new();
        let r = record(&store);
        assert_eq!(store.save(&r), Err(StoreError::NotFound(r.id)));
        assert_eq!(store.load(UserId(99)).unwrap_err(), StoreError::NotFound(UserId(99)));
    }

    #[test]
    fn ids_are_unique_and_sorted() {
        let store = InMemoryUserStore::new();
        for _ in 0..3 {
            store.insert(record(&store)).unwrap();
        }
        assert_eq!(store.ids(), vec![UserId(1), UserId(2), UserId(3)]);
    }
}

//! Key-addressed cache over the read endpoints of the lending API.
//!
//! Every entry is published through a `watch` channel so views can subscribe
//! to a key and re-render whenever it changes. Entries only go stale when
//! invalidated, or after `stale_after` when one is configured.

use log::{debug, info, warn};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Mutex};

use crate::api::{
    LendingApi, ACTIVE_LOANS_PATH, MARKETPLACE_LOANS_PATH, TRANSACTIONS_PATH, USER_STATS_PATH,
};
use crate::error::Result;
use crate::models::{Loan, Transaction, UserStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    UserStats,
    ActiveLoans,
    MarketplaceLoans,
    Transactions,
}

impl QueryKey {
    pub const ALL: [QueryKey; 4] = [
        QueryKey::UserStats,
        QueryKey::ActiveLoans,
        QueryKey::MarketplaceLoans,
        QueryKey::Transactions,
    ];

    /// The API path, which is also the cache key.
    pub fn path(&self) -> &'static str {
        match self {
            QueryKey::UserStats => USER_STATS_PATH,
            QueryKey::ActiveLoans => ACTIVE_LOANS_PATH,
            QueryKey::MarketplaceLoans => MARKETPLACE_LOANS_PATH,
            QueryKey::Transactions => TRANSACTIONS_PATH,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryData {
    Stats(UserStats),
    Loans(Vec<Loan>),
    Transactions(Vec<Transaction>),
}

impl QueryData {
    pub fn as_stats(&self) -> Option<&UserStats> {
        match self {
            QueryData::Stats(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn as_loans(&self) -> Option<&[Loan]> {
        match self {
            QueryData::Loans(loans) => Some(loans),
            _ => None,
        }
    }

    pub fn as_transactions(&self) -> Option<&[Transaction]> {
        match self {
            QueryData::Transactions(transactions) => Some(transactions),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum QueryState {
    #[default]
    Idle,
    /// A request is outstanding; `previous` keeps the last good data on screen.
    Loading { previous: Option<QueryData> },
    Success(QueryData),
    Error(String),
}

impl QueryState {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading { .. })
    }

    /// Nothing to show yet: never fetched, or the first fetch is outstanding.
    pub fn is_initial_loading(&self) -> bool {
        matches!(self, QueryState::Idle | QueryState::Loading { previous: None })
    }

    pub fn data(&self) -> Option<&QueryData> {
        match self {
            QueryState::Success(data) => Some(data),
            QueryState::Loading { previous } => previous.as_ref(),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn stats(&self) -> Option<&UserStats> {
        self.data().and_then(QueryData::as_stats)
    }

    pub fn loans(&self) -> Option<&[Loan]> {
        self.data().and_then(QueryData::as_loans)
    }

    pub fn transactions(&self) -> Option<&[Transaction]> {
        self.data().and_then(QueryData::as_transactions)
    }
}

#[derive(Debug)]
struct Entry {
    sender: watch::Sender<QueryState>,
    fetched_at: Option<Instant>,
    stale: bool,
    /// Bumped by every refetch; only the latest one may publish.
    generation: u64,
}

impl Entry {
    fn new() -> Self {
        let (sender, _) = watch::channel(QueryState::Idle);
        Self {
            sender,
            fetched_at: None,
            stale: true,
            generation: 0,
        }
    }

    fn is_fresh(&self, stale_after: Option<Duration>) -> bool {
        let has_data = matches!(*self.sender.borrow(), QueryState::Success(_));
        let expired = match (self.fetched_at, stale_after) {
            (Some(at), Some(ttl)) => at.elapsed() >= ttl,
            (None, _) => true,
            (Some(_), None) => false,
        };
        has_data && !self.stale && !expired
    }
}

/// Shared handle to the query cache. Cheap to clone.
#[derive(Clone)]
pub struct QueryClient {
    api: Arc<dyn LendingApi>,
    entries: Arc<Mutex<HashMap<QueryKey, Entry>>>,
    stale_after: Option<Duration>,
}

impl QueryClient {
    pub fn new(api: Arc<dyn LendingApi>, stale_after: Option<Duration>) -> Self {
        Self {
            api,
            entries: Arc::new(Mutex::new(HashMap::new())),
            stale_after,
        }
    }

    pub fn api(&self) -> Arc<dyn LendingApi> {
        self.api.clone()
    }

    /// Current state of `key` without touching the network.
    pub async fn get(&self, key: QueryKey) -> QueryState {
        let entries = self.entries.lock().await;
        entries
            .get(&key)
            .map(|entry| entry.sender.borrow().clone())
            .unwrap_or_default()
    }

    pub async fn subscribe(&self, key: QueryKey) -> watch::Receiver<QueryState> {
        let mut entries = self.entries.lock().await;
        entries.entry(key).or_insert_with(Entry::new).sender.subscribe()
    }

    /// Serves fresh cached data, otherwise goes to the network.
    pub async fn fetch(&self, key: QueryKey) -> QueryState {
        {
            let entries = self.entries.lock().await;
            if let Some(entry) = entries.get(&key) {
                if entry.is_fresh(self.stale_after) {
                    debug!("Cache hit for {}", key);
                    return entry.sender.borrow().clone();
                }
            }
        }
        self.refetch(key).await
    }

    /// Always re-issues the request for `key`.
    ///
    /// Responses arriving after a newer request for the same key was issued
    /// are discarded; the caller then gets whatever is currently published.
    pub async fn refetch(&self, key: QueryKey) -> QueryState {
        let generation = {
            let mut entries = self.entries.lock().await;
            let entry = entries.entry(key).or_insert_with(Entry::new);
            entry.generation += 1;
            let previous = entry.sender.borrow().data().cloned();
            entry.sender.send_replace(QueryState::Loading { previous });
            entry.generation
        };

        info!("Fetching {}", key);
        let state = match self.load(key).await {
            Ok(data) => QueryState::Success(data),
            Err(e) => {
                warn!("Query {} failed: {}", key, e);
                QueryState::Error(e.user_message())
            }
        };

        let mut entries = self.entries.lock().await;
        let entry = entries.entry(key).or_insert_with(Entry::new);
        if entry.generation != generation {
            debug!("Dropping superseded response for {}", key);
            return entry.sender.borrow().clone();
        }
        entry.fetched_at = Some(Instant::now());
        entry.stale = false;
        entry.sender.send_replace(state.clone());
        state
    }

    /// Marks `key` stale. Keys somebody is watching are refetched right away;
    /// returns whether that happened.
    pub async fn invalidate(&self, key: QueryKey) -> bool {
        let observed = {
            let mut entries = self.entries.lock().await;
            match entries.get_mut(&key) {
                Some(entry) => {
                    entry.stale = true;
                    entry.sender.receiver_count() > 0
                }
                None => false,
            }
        };
        debug!("Invalidated {} (observed: {})", key, observed);

        if observed {
            self.refetch(key).await;
        }
        observed
    }

    /// Forgets every cached result. Subscribers see `Idle` and stay
    /// subscribed, and requests still in flight will not publish.
    pub async fn clear(&self) {
        let mut entries = self.entries.lock().await;
        for entry in entries.values_mut() {
            entry.generation += 1;
            entry.fetched_at = None;
            entry.stale = true;
            entry.sender.send_replace(QueryState::Idle);
        }
    }

    async fn load(&self, key: QueryKey) -> Result<QueryData> {
        match key {
            QueryKey::UserStats => self.api.get_user_stats().await.map(QueryData::Stats),
            QueryKey::ActiveLoans => self.api.get_active_loans().await.map(QueryData::Loans),
            QueryKey::MarketplaceLoans => self.api.get_marketplace_loans().await.map(QueryData::Loans),
            QueryKey::Transactions => self
                .api
                .get_transactions()
                .await
                .map(QueryData::Transactions),
        }
    }
}

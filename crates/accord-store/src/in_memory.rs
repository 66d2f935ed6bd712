//! In-memory record store.
//!
//! Rows live in an `Arc<RwLock<Vec<_>>>`; a monotonic sequence feeds the
//! materialize function that turns a new record into its stored shape.
//! Suitable for development, tests and single-instance deployments.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{RecordStore, StoreResult};

/// In-memory [`RecordStore`] backed by a vector.
///
/// The `materialize` function receives the next sequence number (starting
/// at 1) and the incoming record, and builds the stored shape; this is
/// where ids and created-at timestamps are assigned.
pub struct InMemoryStore<N, S> {
    rows: Arc<RwLock<Vec<S>>>,
    sequence: AtomicU64,
    materialize: Box<dyn Fn(u64, N) -> S + Send + Sync>,
}

impl<N, S> InMemoryStore<N, S> {
    pub fn new(materialize: impl Fn(u64, N) -> S + Send + Sync + 'static) -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
            sequence: AtomicU64::new(0),
            materialize: Box::new(materialize),
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl<N, S> RecordStore for InMemoryStore<N, S>
where
    N: Send + 'static,
    S: Clone + Send + Sync + 'static,
{
    type New = N;
    type Stored = S;

    async fn insert(&self, record: N) -> StoreResult<S> {
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let stored = (self.materialize)(id, record);
        let mut rows = self.rows.write().await;
        rows.push(stored.clone());
        debug!(rows = rows.len(), "inserted record #{id}");
        Ok(stored)
    }

    async fn select_all(&self) -> StoreResult<Vec<S>> {
        Ok(self.rows.read().await.clone())
    }
}

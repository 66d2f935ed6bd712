use async_trait::async_trait;

/// Convenience type alias for store operation results
pub type StoreResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// An append-only record store with two operations: insert one record and
/// read everything back. `New` is the caller-supplied shape, `Stored` the
/// shape after the store has assigned its server-side fields.
#[async_trait]
pub trait RecordStore: Send + Sync {
    type New: Send + 'static;
    type Stored: Send + 'static;

    /// Insert a record, returning it as stored (id and friends assigned).
    async fn insert(&self, record: Self::New) -> StoreResult<Self::Stored>;

    /// Return every stored record in insertion order.
    async fn select_all(&self) -> StoreResult<Vec<Self::Stored>>;
}

use async_trait::async_trait;

/// Base contract for the in-memory collections.
/// Implementations perform no I/O and never await while holding their lock.
#[async_trait]
pub trait Repository<T>: Send + Sync {
    /// Every stored record, in insertion order
    async fn all(&self) -> Vec<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: &str) -> Option<T>;

    /// Insert a new entity, assigning its id
    async fn insert(&self, entity: T) -> T;

    /// Replace the stored record with the same id; `None` when it is missing
    async fn replace(&self, entity: T) -> Option<T>;

    /// Remove an entity by ID, returning it
    async fn remove(&self, id: &str) -> Option<T>;
}

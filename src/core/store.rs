//! Generic `RwLock<Vec<T>>` collection backing every repository.

use std::ops::{Deref, DerefMut};

use async_trait::async_trait;
use tokio::sync::{RwLock, RwLockWriteGuard};

use crate::core::sequence::IdSequence;
use crate::core::traits::Repository;

/// A record with a string id assigned by its collection
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
    fn assign_id(&mut self, id: String);
}

pub struct InMemoryStore<T> {
    items: RwLock<Vec<T>>,
    ids: IdSequence,
}

impl<T: Entity> InMemoryStore<T> {
    /// Seeds the collection; new ids continue after the highest seeded one
    pub fn new(seed: Vec<T>) -> Self {
        let ids = IdSequence::after(seed.iter().map(|item| item.id()));
        Self {
            items: RwLock::new(seed),
            ids,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Runs a read-only closure over the collection
    pub async fn read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        let guard = self.items.read().await;
        f(&guard)
    }

    /// Runs a mutation under the write lock. The closure is synchronous, so
    /// the lock is never held across an await point.
    pub async fn write<R>(&self, f: impl FnOnce(&mut StoreGuard<'_, T>) -> R) -> R {
        let mut guard = self.lock().await;
        f(&mut guard)
    }

    /// Takes the write lock for multi-collection updates. Callers acquire
    /// every guard they need first and then mutate without awaiting.
    pub async fn lock(&self) -> StoreGuard<'_, T> {
        StoreGuard {
            items: self.items.write().await,
            ids: &self.ids,
        }
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for InMemoryStore<T> {
    async fn all(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    async fn find_by_id(&self, id: &str) -> Option<T> {
        self.read(|items| items.iter().find(|item| item.id() == id).cloned())
            .await
    }

    async fn insert(&self, entity: T) -> T {
        self.write(|items| items.insert(entity)).await
    }

    async fn replace(&self, entity: T) -> Option<T> {
        self.write(|items| items.replace(entity)).await
    }

    async fn remove(&self, id: &str) -> Option<T> {
        self.write(|items| items.remove_by_id(id)).await
    }
}

/// Exclusive access to a collection plus its id counter
pub struct StoreGuard<'a, T> {
    items: RwLockWriteGuard<'a, Vec<T>>,
    ids: &'a IdSequence,
}

impl<T: Entity> StoreGuard<'_, T> {
    /// Appends the entity under a fresh id
    pub fn insert(&mut self, mut entity: T) -> T {
        entity.assign_id(self.ids.next_id());
        self.items.push(entity.clone());
        entity
    }

    pub fn replace(&mut self, entity: T) -> Option<T> {
        let slot = self.find_mut(entity.id())?;
        *slot = entity.clone();
        Some(entity)
    }

    pub fn remove_by_id(&mut self, id: &str) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }
}

impl<T> Deref for StoreGuard<'_, T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<T> DerefMut for StoreGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.items
    }
}

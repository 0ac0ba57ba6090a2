use std::fmt::{Debug, Display};
use std::hash::Hash;

use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::pagination::{Page, Pagination};

/// An entity addressed by a unique key. A value without a key is new.
pub trait Keyed: Sized {
    type Key: Copy + Ord + Hash + Debug + Display + Send + Sync + 'static;

    fn key(&self) -> Option<Self::Key>;

    fn with_key(self, key: Self::Key) -> Self;

    /// Reject or normalize a value before it is written.
    fn validated(self) -> Result<Self, ServiceError> {
        Ok(self)
    }

    /// Apply store-maintained fields on write. `previous` is the stored
    /// value being replaced, if any. Adapters whose backend maintains these
    /// fields itself do not call this.
    fn stamped(self, _previous: Option<&Self>) -> Self {
        self
    }
}

/// Generic CRUD contract over a single entity type.
///
/// Every call is one request/response against the backing store. Absence is
/// never an error here: `find_by_id` yields `None` and `delete_by_id` of a
/// missing key succeeds.
#[async_trait]
pub trait CrudRepository<T>: Send + Sync
where
    T: Keyed + Send + Sync + 'static,
{
    /// Insert when the key is unset (assigning one), otherwise update the
    /// row with that key, inserting it under the given key if absent.
    async fn save(&self, entity: T) -> Result<T, ServiceError>;

    /// Save every entity or none of them.
    async fn save_all(&self, entities: Vec<T>) -> Result<Vec<T>, ServiceError>;

    /// Every stored entity, ascending by key.
    async fn find_all(&self) -> Result<Vec<T>, ServiceError>;

    /// Entities whose key is in `ids`, ascending by key; unknown keys are skipped.
    async fn find_all_by_id(&self, ids: &[T::Key]) -> Result<Vec<T>, ServiceError>;

    async fn find_by_id(&self, id: T::Key) -> Result<Option<T>, ServiceError>;

    async fn find_page(&self, page: Pagination) -> Result<Page<T>, ServiceError>;

    async fn count(&self) -> Result<u64, ServiceError>;

    async fn exists_by_id(&self, id: T::Key) -> Result<bool, ServiceError> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    async fn delete_by_id(&self, id: T::Key) -> Result<(), ServiceError>;

    /// Remove everything; returns how many entities were removed.
    async fn delete_all(&self) -> Result<u64, ServiceError>;
}

/// In-memory adapter for tests, benches and doc examples.
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Clone)]
    struct State<T> {
        rows: BTreeMap<i64, T>,
        /// `None` once `i64::MAX` has been used.
        next_id: Option<i64>,
    }

    /// Ordered map behind a mutex. Generated keys start at 1 and always
    /// land above any key already used, caller-assigned ones included.
    pub struct InMemoryRepository<T> {
        state: Mutex<State<T>>,
    }

    impl<T> Default for InMemoryRepository<T> {
        fn default() -> Self {
            Self { state: Mutex::new(State { rows: BTreeMap::new(), next_id: Some(1) }) }
        }
    }

    impl<T> InMemoryRepository<T> {
        fn lock(&self) -> Result<MutexGuard<'_, State<T>>, ServiceError> {
            self.state
                .lock()
                .map_err(|_| ServiceError::StorageFailure("in-memory store lock poisoned".into()))
        }
    }

    impl<T: Keyed<Key = i64> + Clone> State<T> {
        fn put(&mut self, entity: T) -> Result<T, ServiceError> {
            let key = match entity.key() {
                Some(k) => k,
                None => self
                    .next_id
                    .ok_or_else(|| ServiceError::StorageFailure("key space exhausted".into()))?,
            };
            self.next_id = match key.checked_add(1) {
                Some(after) => self.next_id.map(|n| n.max(after)),
                None => None,
            };
            let stored = entity.with_key(key).stamped(self.rows.get(&key));
            self.rows.insert(key, stored.clone());
            Ok(stored)
        }
    }

    #[async_trait]
    impl<T> CrudRepository<T> for InMemoryRepository<T>
    where
        T: Keyed<Key = i64> + Clone + Send + Sync + 'static,
    {
        async fn save(&self, entity: T) -> Result<T, ServiceError> {
            let entity = entity.validated()?;
            self.lock()?.put(entity)
        }

        async fn save_all(&self, entities: Vec<T>) -> Result<Vec<T>, ServiceError> {
            let valid = entities.into_iter().map(Keyed::validated).collect::<Result<Vec<_>, _>>()?;
            let mut state = self.lock()?;
            // stage on a copy so a failure part-way leaves the store untouched
            let mut staged = (*state).clone();
            let saved = valid.into_iter().map(|e| staged.put(e)).collect::<Result<Vec<_>, _>>()?;
            *state = staged;
            Ok(saved)
        }

        async fn find_all(&self) -> Result<Vec<T>, ServiceError> {
            Ok(self.lock()?.rows.values().cloned().collect())
        }

        async fn find_all_by_id(&self, ids: &[i64]) -> Result<Vec<T>, ServiceError> {
            let state = self.lock()?;
            let mut keys: Vec<i64> = ids.to_vec();
            keys.sort_unstable();
            keys.dedup();
            Ok(keys.iter().filter_map(|k| state.rows.get(k).cloned()).collect())
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<T>, ServiceError> {
            Ok(self.lock()?.rows.get(&id).cloned())
        }

        async fn find_page(&self, page: Pagination) -> Result<Page<T>, ServiceError> {
            let (idx, per_page) = page.normalize();
            let state = self.lock()?;
            let items = state
                .rows
                .values()
                .skip((idx * per_page) as usize)
                .take(per_page as usize)
                .cloned()
                .collect();
            Ok(Page::new(items, state.rows.len() as u64, page))
        }

        async fn count(&self) -> Result<u64, ServiceError> {
            Ok(self.lock()?.rows.len() as u64)
        }

        async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
            self.lock()?.rows.remove(&id);
            Ok(())
        }

        async fn delete_all(&self) -> Result<u64, ServiceError> {
            let mut state = self.lock()?;
            let removed = state.rows.len() as u64;
            state.rows.clear();
            Ok(removed)
        }
    }

}

//! In-memory record store.
//!
//! # Invariants
//! - One mutex guards the whole store and is held for the full operation.
//! - `next_id` only grows; ids are never derived from the record count.
//! - Records are keyed by id in a `BTreeMap`, so key order is insertion order.

use crate::clock::Clock;
use crate::model::record::{Record, RecordId};
use crate::repo::record_repo::{RecordRepository, RepoError, RepoResult};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct State<R> {
    next_id: RecordId,
    records: BTreeMap<RecordId, R>,
}

/// Lock-guarded in-memory store for one entity type.
pub struct InMemoryRepository<R: Record> {
    clock: Arc<dyn Clock>,
    state: Mutex<State<R>>,
}

impl<R: Record> InMemoryRepository<R> {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Mutex::new(State {
                next_id: 1,
                records: BTreeMap::new(),
            }),
        }
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // No operation panics between mutations, so a poisoned guard still
    // protects consistent state.
    fn lock(&self) -> MutexGuard<'_, State<R>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R: Record> RecordRepository<R> for InMemoryRepository<R> {
    fn list_all(&self) -> RepoResult<Vec<R>> {
        Ok(self.lock().records.values().cloned().collect())
    }

    fn list_where(&self, filter: &R::Filter) -> RepoResult<Vec<R>> {
        Ok(self
            .lock()
            .records
            .values()
            .filter(|record| record.matches(filter))
            .cloned()
            .collect())
    }

    fn get(&self, id: RecordId) -> RepoResult<R> {
        self.lock()
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| RepoError::not_found::<R>(id))
    }

    fn create(&self, draft: R::Draft) -> RepoResult<R> {
        R::validate_draft(&draft)?;

        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        let record = R::from_draft(id, draft, self.clock.now_ms());
        state.records.insert(id, record.clone());
        Ok(record)
    }

    fn update(&self, id: RecordId, patch: R::Draft) -> RepoResult<R> {
        let mut state = self.lock();
        let record = state
            .records
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found::<R>(id))?;
        record.apply_patch(patch, self.clock.now_ms());
        Ok(record.clone())
    }

    fn delete(&self, id: RecordId) -> RepoResult<()> {
        self.lock()
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found::<R>(id))
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryRepository;
    use crate::clock::ManualClock;
    use crate::model::blog_post::{BlogPost, BlogPostDraft};
    use crate::repo::record_repo::RecordRepository;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn concurrent_creates_get_distinct_ids() {
        let repo = Arc::new(InMemoryRepository::<BlogPost>::new(Arc::new(
            ManualClock::new(0),
        )));

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || {
                    (0..25)
                        .map(|n| {
                            repo.create(BlogPostDraft::new(format!("{worker}-{n}"), ""))
                                .unwrap()
                                .id
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<i64> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 200);
        assert_eq!(repo.len(), 200);
        assert_eq!(ids, (1..=200).collect::<Vec<_>>());
    }
}

//! InMemoryArtifactStore - プロセス内の一時 artifact ストア
//!
//! # 実装詳細
//! - `HashMap<ArtifactId, Entry>` が正本
//! - `BTreeMap<(created_at, seq), ArtifactId>` で古い順に並べる（eviction 用）
//! - 単一の Mutex で全操作を排他制御（容量判定に全体の一貫したビューが要るため）
//!
//! # 使用例
//! ```ignore
//! let store = InMemoryArtifactStore::new(StoreConfig::default());
//! let id = store.save(pdf_bytes, "report.pdf");
//! let artifact = store.get(&id);
//! store.delete(&id);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};

use crate::config::StoreConfig;
use crate::domain::{ArtifactId, StoreError, StoredArtifact};
use crate::ports::{ArtifactStore, Clock, IdGenerator, RandomIdGenerator, SystemClock};

/// Position of a record in the age index: creation time, then insertion
/// sequence for records created at the same instant.
type AgeKey = (DateTime<Utc>, u64);

#[derive(Debug)]
struct Entry {
    artifact: StoredArtifact,
    age: AgeKey,
}

/// State guarded by the store's lock.
///
/// Invariant: `records` and `by_age` always hold the same set of ids. Every
/// mutation goes through `insert` / `remove`, which update both.
#[derive(Debug, Default)]
struct StoreState {
    records: HashMap<ArtifactId, Entry>,
    by_age: BTreeMap<AgeKey, ArtifactId>,
    next_seq: u64,
}

impl StoreState {
    fn allocate_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn insert(&mut self, artifact: StoredArtifact) {
        let seq = self.allocate_seq();
        let id = artifact.id();
        let age = (artifact.created_at(), seq);
        self.by_age.insert(age, id);
        if let Some(replaced) = self.records.insert(id, Entry { artifact, age }) {
            // Only reachable on an id collision; keep the index in step.
            self.by_age.remove(&replaced.age);
        }
    }

    fn remove(&mut self, id: &ArtifactId) -> Option<StoredArtifact> {
        let entry = self.records.remove(id)?;
        self.by_age.remove(&entry.age);
        Some(entry.artifact)
    }

    /// Drop the single oldest record.
    fn evict_oldest(&mut self) -> Option<StoredArtifact> {
        let (_, id) = self.by_age.pop_first()?;
        self.records.remove(&id).map(|entry| entry.artifact)
    }

    fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.records.len();
        let by_age = &mut self.by_age;
        self.records.retain(|_, entry| {
            let keep = !entry.artifact.is_expired_at(now);
            if !keep {
                by_age.remove(&entry.age);
            }
            keep
        });
        before - self.records.len()
    }
}

/// InMemoryArtifactStore は TTL・容量付きの一時ストア
///
/// Callers get clones of records; the payload is a shared `Bytes` view, so
/// a clone never copies the document.
pub struct InMemoryArtifactStore<C = SystemClock, G = RandomIdGenerator> {
    state: Mutex<StoreState>,
    ttl: Duration,
    max_items: NonZeroUsize,
    clock: C,
    id_gen: G,
}

impl InMemoryArtifactStore {
    pub fn new(config: StoreConfig) -> Self {
        Self::with_parts(config, SystemClock, RandomIdGenerator)
    }
}

impl<C: Clock, G: IdGenerator> InMemoryArtifactStore<C, G> {
    pub fn with_parts(config: StoreConfig, clock: C, id_gen: G) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            ttl: config.ttl(),
            max_items: config.max_items,
            clock,
            id_gen,
        }
    }

    /// Every mutation leaves both indexes consistent before it can panic, so
    /// a poisoned lock still guards valid state.
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Clock, G: IdGenerator> ArtifactStore for InMemoryArtifactStore<C, G> {
    fn save(&self, bytes: Bytes, filename: &str) -> ArtifactId {
        let id = self.id_gen.generate_artifact_id();
        let size = bytes.len();

        let mut state = self.lock();
        let now = self.clock.now();
        let artifact = StoredArtifact::new(id, bytes, filename.to_string(), now, self.ttl);

        if state.records.len() >= self.max_items.get()
            && let Some(evicted) = state.evict_oldest()
        {
            tracing::debug!(
                evicted = %evicted.id(),
                created_at = %evicted.created_at(),
                max_items = self.max_items.get(),
                "store at capacity, evicted oldest artifact"
            );
        }
        state.insert(artifact);
        let count = state.records.len();
        drop(state);

        tracing::debug!(%id, filename, size, count, "artifact saved");
        id
    }

    fn get(&self, id: &ArtifactId) -> Option<StoredArtifact> {
        let mut state = self.lock();
        let now = self.clock.now();

        let expired = state.records.get(id)?.artifact.is_expired_at(now);
        if expired {
            state.remove(id);
            drop(state);
            tracing::debug!(%id, "artifact expired on access");
            return None;
        }

        state.records.get(id).map(|entry| entry.artifact.clone())
    }

    fn delete(&self, id: &ArtifactId) -> bool {
        let removed = self.lock().remove(id).is_some();
        if removed {
            tracing::debug!(%id, "artifact deleted");
        }
        removed
    }

    fn count(&self) -> usize {
        self.lock().records.len()
    }

    fn purge_expired(&self) -> Result<usize, StoreError> {
        let mut state = self.lock();
        let now = self.clock.now();
        let removed = state.purge_expired(now);
        let remaining = state.records.len();
        drop(state);

        if removed > 0 {
            tracing::info!(removed, remaining, "purged expired artifacts");
        }
        Ok(removed)
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }

    fn max_items(&self) -> usize {
        self.max_items.get()
    }
}

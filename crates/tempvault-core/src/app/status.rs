//! Status - store の状態スナップショット
//!
//! `GET /pdfs` や `/health` のレスポンスに載せる値。

use serde::{Deserialize, Serialize};

use crate::ports::ArtifactStore;

/// Snapshot of a store's size and configuration.
///
/// # 使用例
/// ```ignore
/// let status = StoreStatus::of(store.as_ref());
/// println!("{}", serde_json::to_string(&status)?);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatus {
    /// Records held, including expired ones the GC loop has not reaped yet.
    pub count: usize,
    pub ttl_minutes: i64,
    pub max_items: usize,
}

impl StoreStatus {
    pub fn of(store: &dyn ArtifactStore) -> Self {
        Self {
            count: store.count(),
            ttl_minutes: store.ttl().num_minutes(),
            max_items: store.max_items(),
        }
    }
}

//! ArtifactStore port - 一時的な artifact の保存先
//!
//! 生成済みのバイナリ（PDF など）を ID で引けるように保持します。
//! handler はこの trait 越しに save / get / delete / count を呼びます。

use bytes::Bytes;
use chrono::Duration;

use crate::domain::{ArtifactId, StoreError, StoredArtifact};

/// ArtifactStore は TTL と容量で上限を持つ artifact の保存先
///
/// # 設計原則
/// - TTL（expires_at）は save 時に確定し、get で延長しない
/// - 容量いっぱいで save すると最も古い 1 件を追い出してから挿入する
/// - 期限切れは get 時（lazy）と GC ループ（purge_expired）の両方で削除する
/// - 各操作は短時間で終わる同期呼び出し（I/O なし）
pub trait ArtifactStore: Send + Sync {
    /// Store a payload and return its fresh id. Never fails.
    fn save(&self, bytes: Bytes, filename: &str) -> ArtifactId;

    /// Fetch a live record. An expired record is removed and reported as
    /// absent.
    fn get(&self, id: &ArtifactId) -> Option<StoredArtifact>;

    /// Remove a record. Returns whether anything was removed.
    fn delete(&self, id: &ArtifactId) -> bool;

    /// Number of records held, including expired ones not yet reaped.
    fn count(&self) -> usize;

    /// Remove every record whose `expires_at` is strictly before now.
    fn purge_expired(&self) -> Result<usize, StoreError>;

    /// Lifetime applied to every record at `save`.
    fn ttl(&self) -> Duration;

    /// Maximum number of records held at once.
    fn max_items(&self) -> usize;
}

//! Stored artifact record.

use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::ArtifactId;

/// One stored artifact plus its metadata.
///
/// Design:
/// - Immutable once built; the store never updates a record in place.
/// - `bytes` is a shared view, so handing a copy to a caller does not copy
///   the payload.
/// - `expires_at` is fixed at insertion and never renewed by reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredArtifact {
    id: ArtifactId,
    #[serde(skip)]
    bytes: Bytes,
    filename: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl StoredArtifact {
    pub fn new(
        id: ArtifactId,
        bytes: Bytes,
        filename: String,
        created_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            id,
            bytes,
            filename,
            created_at,
            expires_at: created_at
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    pub fn id(&self) -> ArtifactId {
        self.id
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Expired means strictly past `expires_at`; at exactly `expires_at`
    /// the record is still readable.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Consume the record, returning the payload.
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

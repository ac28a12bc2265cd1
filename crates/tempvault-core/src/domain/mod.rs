//! Domain model (ids, stored artifact records, errors).

pub mod artifact;
pub mod errors;
pub mod ids;

pub use self::artifact::StoredArtifact;
pub use self::errors::{IdParseError, StoreError};
pub use self::ids::ArtifactId;

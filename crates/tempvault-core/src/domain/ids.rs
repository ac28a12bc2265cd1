//! Domain identifiers.
//!
//! # ArtifactId
//! 128-bit のランダム値。表示形式は UUID の canonical 形式（36 文字）。
//!
//! - URL にそのまま埋め込める（`/pdfs/{id}`）
//! - 長さ・形式は常に一定
//! - 順序には意味がない（古さの判定は `created_at` で行う）

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::IdParseError;

/// Identifier of a stored artifact.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(Uuid);

impl ArtifactId {
    /// Build an id from 16 random bytes, stamping the UUID v4 version and
    /// variant bits.
    pub fn from_random_bytes(bytes: [u8; 16]) -> Self {
        Self(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }

    /// The all-zero token. Never handed out by an `IdGenerator`.
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ArtifactId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ArtifactId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Only the canonical hyphenated form is accepted, so that a URL
        // segment maps to exactly one id.
        if s.len() != uuid::fmt::Hyphenated::LENGTH {
            return Err(IdParseError::new(s));
        }
        Uuid::try_parse(s)
            .map(Self)
            .map_err(|_| IdParseError::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn display_is_canonical_uuid() {
        let id = ArtifactId::from_random_bytes([0xab; 16]);
        let s = id.to_string();

        assert_eq!(s.len(), 36);
        assert_eq!(s.matches('-').count(), 4);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit() || c == '-'));
        assert_eq!(id.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn parse_accepts_display_output() {
        let id = ArtifactId::from_random_bytes([7; 16]);
        let parsed: ArtifactId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn nil_is_all_zeroes() {
        assert_eq!(
            ArtifactId::nil().to_string(),
            "00000000-0000-0000-0000-000000000000"
        );
    }

    #[rstest]
    #[case("not-a-valid-uuid")]
    #[case("")]
    #[case("00000000000000000000000000000000")]
    #[case("{00000000-0000-0000-0000-000000000000}")]
    #[case("0000000g-0000-0000-0000-000000000000")]
    fn parse_rejects_malformed_input(#[case] input: &str) {
        let err = input.parse::<ArtifactId>().unwrap_err();
        assert!(err.to_string().contains("invalid artifact id"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = ArtifactId::nil();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }
}

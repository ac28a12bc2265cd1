//! Errors - エラー型と分類
//!
//! 見つからない artifact はエラーではない（`Option::None` / `false` で返す）。
//! 容量超過による eviction もエラーではない。

use thiserror::Error;

/// StoreError は store 操作の障害
///
/// The in-memory store never produces one from `save` / `get` / `delete` /
/// `count`. It exists for `purge_expired`, whose caller (the GC loop) logs
/// it and retries on the next cycle.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("artifact store unavailable: {0}")]
    Unavailable(String),
}

/// A textual id that is not a canonical artifact id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid artifact id: {input:?}")]
pub struct IdParseError {
    input: String,
}

impl IdParseError {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}

//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryArtifactStore**: プロセス内の一時 artifact ストア

pub mod inmem_artifact;

// 主要な型を再エクスポート
pub use self::inmem_artifact::InMemoryArtifactStore;

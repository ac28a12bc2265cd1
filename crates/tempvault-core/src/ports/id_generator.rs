//! IdGenerator port - ID 生成の抽象化
//!
//! テスト容易性のために、trait として抽象化しています。
//!
//! # 実装
//! - **RandomIdGenerator**: 128-bit ランダム値（本番用）

use crate::domain::ids::ArtifactId;

/// IdGenerator は artifact ID を生成
///
/// # 一意性
/// - 128-bit のランダム値なので衝突は事実上起きない
/// - 衝突時のリトライは行わない
///
/// # Thread Safety
/// - `Send + Sync` を要求（複数スレッドから使える）
pub trait IdGenerator: Send + Sync {
    fn generate_artifact_id(&self) -> ArtifactId;
}

/// RandomIdGenerator は thread-local RNG から ID を生成
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate_artifact_id(&self) -> ArtifactId {
        ArtifactId::from_random_bytes(rand::random())
    }
}

//! App - アプリケーション層
//!
//! ports を組み合わせて store のライフサイクルを実装します。
//!
//! # 主要コンポーネント
//! - **AppBuilder**: store の構築と GC ループの起動
//! - **GCLoop**: 期限切れ artifact の定期削除
//! - **StoreStatus**: store の状態スナップショット

pub mod builder;
pub mod gc_loop;
pub mod status;

// 主要な型を再エクスポート
pub use self::builder::{App, AppBuilder, BuildError};
pub use self::gc_loop::{GCHandle, GCLoop, SweepOutcome};
pub use self::status::StoreStatus;

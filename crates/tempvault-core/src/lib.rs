//! tempvault-core
//!
//! Temporary in-memory store for generated artifacts (rendered PDF reports),
//! served back over short-lived URLs.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ArtifactId, StoredArtifact, errors）
//! - **ports**: 抽象化レイヤー（ArtifactStore, Clock, IdGenerator）
//! - **impls**: 実装（InMemoryArtifactStore）
//! - **app**: アプリケーションロジック（AppBuilder, GCLoop, StoreStatus）
//! - **config**: 環境変数からの設定読み込み

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{App, AppBuilder};
pub use config::StoreConfig;
pub use domain::{ArtifactId, StoredArtifact};
pub use impls::InMemoryArtifactStore;
pub use ports::ArtifactStore;

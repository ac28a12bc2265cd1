//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! store を 1 つ作り、GC ループを起動して、両方を `App` にまとめます。
//! グローバル変数は使わず、`App::store()` のハンドルを handler に渡します。

use std::sync::Arc;
use std::time::Duration;

use crate::app::gc_loop::{GCHandle, GCLoop};
use crate::app::status::StoreStatus;
use crate::config::StoreConfig;
use crate::impls::InMemoryArtifactStore;
use crate::ports::{Clock, IdGenerator, RandomIdGenerator, SystemClock};

/// AppBuilder はアプリケーションを構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new(StoreConfig::from_env()?).build()?;
/// let id = app.store().save(pdf_bytes, "report.pdf");
/// app.shutdown().await?;
/// ```
pub struct AppBuilder<C = SystemClock, G = RandomIdGenerator> {
    config: StoreConfig,
    clock: C,
    id_gen: G,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("AppBuilder::build must be called from within a tokio runtime")]
    NoRuntime,
}

impl AppBuilder {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            clock: SystemClock,
            id_gen: RandomIdGenerator,
        }
    }
}

impl<C, G> AppBuilder<C, G>
where
    C: Clock + 'static,
    G: IdGenerator + 'static,
{
    /// Replace the clock (tests inject a `FixedClock`).
    pub fn clock<C2: Clock + 'static>(self, clock: C2) -> AppBuilder<C2, G> {
        AppBuilder {
            config: self.config,
            clock,
            id_gen: self.id_gen,
        }
    }

    pub fn id_generator<G2: IdGenerator + 'static>(self, id_gen: G2) -> AppBuilder<C, G2> {
        AppBuilder {
            config: self.config,
            clock: self.clock,
            id_gen,
        }
    }

    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.config.sweep_interval = interval;
        self
    }

    /// Create the store and spawn its GC loop on the current runtime.
    pub fn build(self) -> Result<App<C, G>, BuildError> {
        tokio::runtime::Handle::try_current().map_err(|_| BuildError::NoRuntime)?;

        let store = Arc::new(InMemoryArtifactStore::with_parts(
            self.config.clone(),
            self.clock,
            self.id_gen,
        ));
        let gc = GCLoop::new(store.clone(), self.config.sweep_interval).spawn();

        tracing::info!(
            ttl_minutes = self.config.ttl_minutes,
            max_items = self.config.max_items.get(),
            "artifact store ready"
        );

        Ok(App {
            config: self.config,
            store,
            gc,
        })
    }
}

/// App は store と GC ループを所有する
pub struct App<C = SystemClock, G = RandomIdGenerator> {
    config: StoreConfig,
    store: Arc<InMemoryArtifactStore<C, G>>,
    gc: GCHandle,
}

impl<C: Clock, G: IdGenerator> App<C, G> {
    /// Shared handle for request handlers.
    pub fn store(&self) -> &Arc<InMemoryArtifactStore<C, G>> {
        &self.store
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn status(&self) -> StoreStatus {
        StoreStatus::of(self.store.as_ref())
    }

    /// Stop the GC loop. The store stays usable through handles already
    /// handed out, but nothing sweeps it any more.
    pub async fn shutdown(self) -> Result<(), tokio::task::JoinError> {
        tracing::info!("shutting down artifact store");
        self.gc.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{ArtifactStore, FixedClock};
    use bytes::Bytes;
    use chrono::{TimeZone, Utc};
    use std::num::NonZeroUsize;

    #[test]
    fn build_outside_runtime_fails() {
        let result = AppBuilder::new(StoreConfig::default()).build();
        assert!(matches!(result, Err(BuildError::NoRuntime)));
    }

    #[tokio::test]
    async fn build_wires_configuration_into_store() {
        let config = StoreConfig::new(10, NonZeroUsize::new(3).unwrap());
        let app = AppBuilder::new(config).build().unwrap();

        assert_eq!(app.store().ttl(), chrono::Duration::minutes(10));
        assert_eq!(app.store().max_items(), 3);
        assert_eq!(app.config().sweep_interval, Duration::from_secs(60));

        app.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn handlers_share_one_store() {
        let app = AppBuilder::new(StoreConfig::default()).build().unwrap();
        let handler_a = Arc::clone(app.store());
        let handler_b = Arc::clone(app.store());

        let id = handler_a.save(Bytes::from_static(b"%PDF-shared"), "shared.pdf");
        assert_eq!(handler_b.get(&id).unwrap().filename(), "shared.pdf");
        assert_eq!(app.status().count, 1);

        assert!(handler_b.delete(&id));
        assert_eq!(app.status().count, 0);

        app.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn built_app_sweeps_on_its_interval() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
        let app = AppBuilder::new(StoreConfig::new(1, NonZeroUsize::new(10).unwrap()))
            .clock(clock.clone())
            .sweep_interval(Duration::from_secs(5))
            .build()
            .unwrap();

        app.store().save(Bytes::from_static(b"%PDF-"), "a.pdf");
        clock.advance(chrono::Duration::minutes(2));
        assert_eq!(app.status().count, 1);

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(app.status().count, 0);

        app.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn status_reports_configuration() {
        let app = AppBuilder::new(StoreConfig::new(45, NonZeroUsize::new(7).unwrap()))
            .build()
            .unwrap();

        let status = app.status();
        assert_eq!(status.ttl_minutes, 45);
        assert_eq!(status.max_items, 7);
        assert_eq!(status.count, 0);

        app.shutdown().await.unwrap();
    }
}

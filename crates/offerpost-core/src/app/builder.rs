//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! Config から HTTP クライアント・ストア・Publisher・Orchestrator を組み立てる。
//! テストでは ports を差し替えられる（`with_image_source` など）。
//!
//! # 起動時検証
//! HTTP クライアントの構築に失敗したら `build()` で止める（Fail-fast）。

use std::sync::Arc;

use tokio::sync::watch;

use crate::config::Config;
use crate::domain::OfferId;
use crate::impls::{GraphPhotoApi, HttpImageFetcher};
use crate::observability::RunSummary;
use crate::ports::{Clock, ImageSource, PhotoApi, SystemClock};
use crate::store::{Ledger, LedgerEntry, OfferStore};

use super::caption::CaptionTemplate;
use super::orchestrator::Orchestrator;
use super::publisher::Publisher;
use super::triggers::{Trigger, run_schedule, run_worker, trigger_channel};
use super::watcher::run_watcher;

/// AppBuilder はアプリケーションを構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new(Config::from_env()?).build()?;
/// app.run(shutdown_rx).await;
/// ```
pub struct AppBuilder {
    config: Config,
    images: Option<Arc<dyn ImageSource>>,
    api: Option<Arc<dyn PhotoApi>>,
    clock: Option<Arc<dyn Clock>>,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

impl AppBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            images: None,
            api: None,
            clock: None,
        }
    }

    pub fn with_image_source(mut self, images: Arc<dyn ImageSource>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn with_photo_api(mut self, api: Arc<dyn PhotoApi>) -> Self {
        self.api = Some(api);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Wire everything; ports not overridden get their HTTP/system versions.
    pub fn build(self) -> Result<App, BuildError> {
        let config = self.config;

        let images: Arc<dyn ImageSource> = match self.images {
            Some(images) => images,
            None => Arc::new(HttpImageFetcher::new(&config.http)?),
        };
        let api: Arc<dyn PhotoApi> = match self.api {
            Some(api) => api,
            None => Arc::new(GraphPhotoApi::new(&config)?),
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let ledger = Arc::new(Ledger::new(config.ledger_path.clone(), clock.clone()));
        let publisher = Publisher::new(
            images,
            api,
            ledger.clone(),
            clock,
            config.retry.clone(),
            CaptionTemplate::new(config.promo_link.clone(), config.disclosure.clone()),
        );
        let orchestrator = Orchestrator::new(
            OfferStore::new(config.offers_path.clone()),
            ledger,
            publisher,
            config.timings.between_offers,
        );

        Ok(App {
            config,
            orchestrator: Arc::new(orchestrator),
        })
    }
}

/// App は組み立て済みのアプリケーション
pub struct App {
    config: Config,
    orchestrator: Arc<Orchestrator>,
}

impl App {
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// One pass over the offers file, then return.
    pub async fn run_once(&self) -> RunSummary {
        self.orchestrator.ledger().load().await;
        self.orchestrator.process_new_offers().await
    }

    /// Everything the ledger has recorded.
    pub async fn history(&self) -> Vec<(OfferId, LedgerEntry)> {
        self.orchestrator.ledger().entries().await
    }

    /// Run until `shutdown` flips to true (or its sender drops).
    ///
    /// Fires one startup pass, then passes on settled file changes and on the
    /// schedule. A pass in progress at shutdown is finished first.
    pub async fn run(&self, shutdown: watch::Receiver<bool>) {
        self.orchestrator.ledger().load().await;

        let timings = &self.config.timings;
        let (sender, triggers) = trigger_channel();

        let watcher = tokio::spawn(run_watcher(
            self.config.offers_path.clone(),
            timings.debounce,
            timings.poll_interval,
            sender.clone(),
            shutdown.clone(),
        ));
        let schedule = tokio::spawn(run_schedule(
            timings.schedule_every,
            sender.clone(),
            shutdown.clone(),
        ));

        tracing::info!(
            offers = %self.config.offers_path.display(),
            ledger = %self.config.ledger_path.display(),
            every = ?timings.schedule_every,
            "offerpost running"
        );
        sender.fire(Trigger::Startup);
        drop(sender);

        run_worker(self.orchestrator.clone(), triggers, shutdown).await;

        for (name, task) in [("watcher", watcher), ("schedule", schedule)] {
            if let Err(err) = task.await {
                tracing::error!(task = name, error = %err, "background task failed");
            }
        }
        tracing::info!("offerpost stopped");
    }
}

//! Process configuration.
//!
//! 起動時に 1 回だけ組み立て、各コンポーネントへ明示的に渡す。
//! 必須の資格情報が無ければ起動を止める。

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::ConfigError;
use crate::retry::RetryPolicy;

pub const ENV_ACCESS_TOKEN: &str = "FACEBOOK_PAGE_ACCESS_TOKEN";
pub const ENV_PAGE_ID: &str = "FACEBOOK_PAGE_ID";
pub const ENV_GRAPH_BASE: &str = "OFFERPOST_GRAPH_BASE";
pub const ENV_PROMO_LINK: &str = "OFFERPOST_PROMO_LINK";
pub const ENV_DISCLOSURE: &str = "OFFERPOST_DISCLOSURE";

pub const DEFAULT_OFFERS_PATH: &str = "scraper/ofertas.json";
pub const DEFAULT_LEDGER_PATH: &str = "bot/published_offers.json";
pub const DEFAULT_GRAPH_BASE: &str = "https://graph.facebook.com/v19.0";
pub const DEFAULT_PROMO_LINK: &str = "https://www.mercadolibre.com.mx/ofertas";
pub const DEFAULT_DISCLOSURE: &str =
    "Enlace de afiliado: podemos recibir una comisión por las compras realizadas.";

const MIB: u64 = 1024 * 1024;

/// Size caps and timeouts applied to outgoing HTTP requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpLimits {
    pub max_image_bytes: u64,
    pub max_upload_bytes: u64,
    pub request_timeout: Duration,
    pub max_redirects: usize,
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self {
            max_image_bytes: 4 * MIB,
            max_upload_bytes: 10 * MIB,
            request_timeout: Duration::from_secs(30),
            max_redirects: 5,
        }
    }
}

/// Fixed pacing of a processing pass and of its triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTimings {
    /// Pause after each publish attempt, before the next offer.
    pub between_offers: Duration,

    /// How long the offers file must stay unchanged before it counts as changed.
    pub debounce: Duration,

    /// How often the watcher samples the offers file.
    pub poll_interval: Duration,

    /// Backup trigger in case a change is missed.
    pub schedule_every: Duration,
}

impl Default for RunTimings {
    fn default() -> Self {
        Self {
            between_offers: Duration::from_secs(5),
            debounce: Duration::from_secs(2),
            poll_interval: Duration::from_millis(500),
            schedule_every: Duration::from_secs(12 * 60 * 60),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub access_token: String,
    pub page_id: String,
    pub graph_base: String,
    pub offers_path: PathBuf,
    pub ledger_path: PathBuf,
    pub promo_link: String,
    pub disclosure: String,
    pub http: HttpLimits,
    pub timings: RunTimings,
    pub retry: RetryPolicy,
}

impl Config {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; blank values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let access_token = get(ENV_ACCESS_TOKEN).ok_or(ConfigError::Missing(ENV_ACCESS_TOKEN))?;
        let page_id = get(ENV_PAGE_ID).ok_or(ConfigError::Missing(ENV_PAGE_ID))?;

        let graph_base = get(ENV_GRAPH_BASE).unwrap_or_else(|| DEFAULT_GRAPH_BASE.to_string());
        if !graph_base.starts_with("http://") && !graph_base.starts_with("https://") {
            return Err(ConfigError::Invalid {
                key: ENV_GRAPH_BASE,
                reason: format!("{graph_base:?} is not an http(s) URL"),
            });
        }

        Ok(Self {
            access_token,
            page_id,
            graph_base: graph_base.trim_end_matches('/').to_string(),
            offers_path: PathBuf::from(DEFAULT_OFFERS_PATH),
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            promo_link: get(ENV_PROMO_LINK).unwrap_or_else(|| DEFAULT_PROMO_LINK.to_string()),
            disclosure: get(ENV_DISCLOSURE).unwrap_or_else(|| DEFAULT_DISCLOSURE.to_string()),
            http: HttpLimits::default(),
            timings: RunTimings::default(),
            retry: RetryPolicy::linear_v1(),
        })
    }

    pub fn with_offers_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.offers_path = path.into();
        self
    }

    pub fn with_ledger_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ledger_path = path.into();
        self
    }

    /// Endpoint that creates a photo post on the configured page.
    pub fn photos_endpoint(&self) -> String {
        format!("{}/{}/photos", self.graph_base, self.page_id)
    }
}

// Keeps the access token out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("access_token", &"<redacted>")
            .field("page_id", &self.page_id)
            .field("graph_base", &self.graph_base)
            .field("offers_path", &self.offers_path)
            .field("ledger_path", &self.ledger_path)
            .field("promo_link", &self.promo_link)
            .field("http", &self.http)
            .field("timings", &self.timings)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

//! Legacy dashboard path: `/api/summary` polling with synthetic fallback.
//!
//! An API failure here substitutes demo data rather than rendering an error,
//! so the dashboard stays demonstrable offline. The fallback is an explicit
//! provider switch: selected only when the live fetch fails, logged when it
//! engages, and every summary is tagged with its [`DataOrigin`] so synthetic
//! data is never mistaken for live data.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Local;

use crate::api::{ApiClient, ApiError};
use crate::config::Config;
use crate::logging::{json_log, obj, v_num, v_str};
use crate::model::LegacySummary;
use crate::poll::{fetcher, PollState, Poller};
use crate::synthetic;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataOrigin {
    Live,
    Synthetic,
}

impl DataOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataOrigin::Live => "live",
            DataOrigin::Synthetic => "synthetic",
        }
    }
}

/// A summary together with where it came from.
#[derive(Clone, Debug)]
pub struct Sourced {
    pub origin: DataOrigin,
    pub summary: LegacySummary,
}

#[async_trait]
pub trait SummaryProvider: Send + Sync {
    async fn fetch_summary(&self) -> Result<LegacySummary, ApiError>;
}

pub struct LiveProvider {
    client: ApiClient,
}

impl LiveProvider {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = ApiClient::new(
            &cfg.legacy_api_base,
            Duration::from_millis(cfg.request_timeout_ms),
        )?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SummaryProvider for LiveProvider {
    async fn fetch_summary(&self) -> Result<LegacySummary, ApiError> {
        self.client.get_json("/api/summary").await
    }
}

/// Demo-data provider; see [`crate::synthetic`]. Selected only on live failure.
pub struct SyntheticProvider;

#[async_trait]
impl SummaryProvider for SyntheticProvider {
    async fn fetch_summary(&self) -> Result<LegacySummary, ApiError> {
        let today = Local::now().date_naive();
        Ok(synthetic::demo_summary(today, &mut rand::thread_rng()))
    }
}

/// The legacy auto-refresh manager: enabled flag, rate selector, manual
/// refresh button. All timer work goes through one [`Poller`].
pub struct LegacyDashboard {
    poller: Poller<Sourced>,
    auto_refresh: bool,
    refresh_every: Duration,
}

impl LegacyDashboard {
    pub fn new(live: Arc<dyn SummaryProvider>, refresh_every: Duration) -> Self {
        let fetch = fetcher(move || {
            let live = live.clone();
            async move {
                match live.fetch_summary().await {
                    Ok(summary) => Ok(Sourced { origin: DataOrigin::Live, summary }),
                    Err(err) => {
                        json_log(
                            "fallback",
                            obj(&[
                                ("trigger", v_str(&err.to_string())),
                                ("substitute", v_str("synthetic")),
                            ]),
                        );
                        let summary = SyntheticProvider.fetch_summary().await?;
                        Ok(Sourced { origin: DataOrigin::Synthetic, summary })
                    }
                }
            }
        });
        Self { poller: Poller::new(fetch), auto_refresh: true, refresh_every }
    }

    pub fn start(&mut self) {
        if self.auto_refresh {
            self.poller.start(self.refresh_every);
        }
    }

    pub fn stop(&mut self) {
        self.poller.stop();
    }

    /// The auto-refresh checkbox: off cancels the timer, on re-arms it.
    pub fn set_auto_refresh(&mut self, enabled: bool) {
        self.auto_refresh = enabled;
        if enabled {
            self.poller.start(self.refresh_every);
        } else {
            self.poller.stop();
        }
        json_log(
            "page",
            obj(&[("page", v_str("legacy")), ("auto_refresh", v_str(if enabled { "on" } else { "off" }))]),
        );
    }

    /// The refresh-rate selector: re-arms the running timer in place.
    pub fn set_refresh_rate(&mut self, every: Duration) {
        self.refresh_every = every;
        self.poller.set_interval(every);
        json_log(
            "page",
            obj(&[("page", v_str("legacy")), ("refresh_ms", v_num(every.as_millis() as f64))]),
        );
    }

    /// The manual refresh button.
    pub async fn refresh_now(&self) -> bool {
        self.poller.run_once().await
    }

    pub fn state(&self) -> PollState<Sourced> {
        self.poller.state()
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_running()
    }
}

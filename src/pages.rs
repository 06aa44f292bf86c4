//! The five console pages.
//!
//! Each page owns its control values, one [`Poller`], and (for Hotspots) a
//! [`Selection`]. Mounting a polling page arms its timer; dropping a page
//! stops it. No state is shared between pages; every page is an independent
//! consumer of the API client and the date helper.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::ApiClient;
use crate::config::Config;
use crate::dates::TimeWindow;
use crate::logging::{json_log, obj, v_str};
use crate::model::{CarbonSummary, HotspotList, OptimizeResponse, Report, SimulationResult};
use crate::poll::{fetcher, PollState, Poller};
use crate::render;
use crate::request::{
    carbon_summary_path, Constraints, HotspotDimension, HotspotQuery, OptimizeRequest,
    ReportRequest, ScenarioKind, SimulateRequest, Weights,
};
use crate::select::Selection;

fn log_mount(page: &str) {
    json_log("page", obj(&[("page", v_str(page)), ("event", v_str("mount"))]));
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

pub struct OverviewPage {
    window: TimeWindow,
    poller: Poller<CarbonSummary>,
}

impl OverviewPage {
    pub fn mount(client: Arc<ApiClient>, cfg: &Config) -> Self {
        log_mount("overview");
        let window = TimeWindow::trailing_days(cfg.window_days);
        let path = carbon_summary_path(&window);
        let fetch = fetcher(move || {
            let client = client.clone();
            let path = path.clone();
            async move { client.get_json(&path).await.map_err(anyhow::Error::from) }
        });
        let mut poller = Poller::new(fetch);
        poller.start(Duration::from_millis(cfg.poll_ms));
        Self { window, poller }
    }

    pub fn state(&self) -> PollState<CarbonSummary> {
        self.poller.state()
    }

    pub fn render(&self) -> String {
        render::render_overview(&self.poller.state(), &self.window)
    }

    pub fn unmount(&mut self) {
        self.poller.stop();
    }
}

// ---------------------------------------------------------------------------
// Hotspots
// ---------------------------------------------------------------------------

pub struct HotspotsPage {
    window: TimeWindow,
    dimension: Arc<Mutex<HotspotDimension>>,
    selection: Selection,
    poller: Poller<HotspotList>,
}

impl HotspotsPage {
    pub fn mount(client: Arc<ApiClient>, cfg: &Config, dimension: HotspotDimension) -> Self {
        log_mount("hotspots");
        let window = TimeWindow::trailing_days(cfg.window_days);
        let dimension = Arc::new(Mutex::new(dimension));
        let limit = cfg.hotspot_limit;
        let fetch = {
            let window = window.clone();
            let dimension = dimension.clone();
            fetcher(move || {
                // Dimension is read per tick, so a control change applies to
                // the next request without restarting the controller.
                let query = HotspotQuery {
                    dimension: *dimension.lock().expect("dimension lock"),
                    window: window.clone(),
                    limit,
                };
                let client = client.clone();
                async move { client.get_json(&query.path()).await.map_err(anyhow::Error::from) }
            })
        };
        let mut poller = Poller::new(fetch);
        poller.start(Duration::from_millis(cfg.poll_ms));
        Self { window, dimension, selection: Selection::default(), poller }
    }

    pub fn set_dimension(&mut self, dimension: HotspotDimension) {
        *self.dimension.lock().expect("dimension lock") = dimension;
    }

    pub fn select_row(&mut self, hotspot_id: &str) {
        self.selection.select(hotspot_id);
    }

    pub fn state(&self) -> PollState<HotspotList> {
        self.poller.state()
    }

    pub fn render(&self) -> String {
        let dimension = *self.dimension.lock().expect("dimension lock");
        render::render_hotspots(&self.poller.state(), &self.selection, dimension, &self.window)
    }

    pub fn unmount(&mut self) {
        self.poller.stop();
    }
}

// ---------------------------------------------------------------------------
// Scenario Lab
// ---------------------------------------------------------------------------

pub struct ScenarioLabPage {
    kind: Arc<Mutex<ScenarioKind>>,
    poller: Poller<SimulationResult>,
}

impl ScenarioLabPage {
    pub fn mount(client: Arc<ApiClient>, cfg: &Config, kind: ScenarioKind) -> Self {
        log_mount("scenario");
        let window = TimeWindow::trailing_days(cfg.window_days);
        let kind = Arc::new(Mutex::new(kind));
        let fetch = {
            let kind = kind.clone();
            fetcher(move || {
                let body = SimulateRequest::build(
                    window.clone(),
                    &kind.lock().expect("scenario lock").clone(),
                );
                let client = client.clone();
                async move {
                    client
                        .post_json(SimulateRequest::PATH, &body)
                        .await
                        .map_err(anyhow::Error::from)
                }
            })
        };
        Self { kind, poller: Poller::new(fetch) }
    }

    pub fn set_kind(&mut self, kind: ScenarioKind) {
        *self.kind.lock().expect("scenario lock") = kind;
    }

    /// The "Run simulation" button.
    pub async fn run(&self) -> bool {
        self.poller.run_once().await
    }

    pub fn state(&self) -> PollState<SimulationResult> {
        self.poller.state()
    }

    pub fn render(&self) -> String {
        render::render_simulation(&self.poller.state())
    }
}

// ---------------------------------------------------------------------------
// Optimization
// ---------------------------------------------------------------------------

pub struct OptimizationPage {
    controls: Arc<Mutex<(Weights, Constraints)>>,
    poller: Poller<OptimizeResponse>,
}

impl OptimizationPage {
    pub fn mount(client: Arc<ApiClient>, cfg: &Config, weights: Weights, constraints: Constraints) -> Self {
        log_mount("optimization");
        let window = TimeWindow::trailing_days(cfg.window_days);
        let controls = Arc::new(Mutex::new((weights, constraints)));
        let fetch = {
            let controls = controls.clone();
            fetcher(move || {
                let (weights, constraints) = controls.lock().expect("controls lock").clone();
                let body = OptimizeRequest::build(window.clone(), weights, constraints);
                let client = client.clone();
                async move {
                    client
                        .post_json(OptimizeRequest::PATH, &body)
                        .await
                        .map_err(anyhow::Error::from)
                }
            })
        };
        Self { controls, poller: Poller::new(fetch) }
    }

    pub fn set_weights(&mut self, weights: Weights) {
        self.controls.lock().expect("controls lock").0 = weights;
    }

    pub fn set_constraints(&mut self, constraints: Constraints) {
        self.controls.lock().expect("controls lock").1 = constraints;
    }

    /// The "Run optimizer" button.
    pub async fn run(&self) -> bool {
        self.poller.run_once().await
    }

    pub fn state(&self) -> PollState<OptimizeResponse> {
        self.poller.state()
    }

    pub fn render(&self) -> String {
        render::render_optimization(&self.poller.state())
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

pub struct ReportsPage {
    window: Arc<Mutex<TimeWindow>>,
    poller: Poller<Report>,
}

impl ReportsPage {
    pub fn mount(client: Arc<ApiClient>, cfg: &Config) -> Self {
        log_mount("reports");
        let window = Arc::new(Mutex::new(TimeWindow::trailing_days(cfg.window_days)));
        let fetch = {
            let window = window.clone();
            fetcher(move || {
                let body = ReportRequest::build(window.lock().expect("window lock").clone());
                let client = client.clone();
                async move {
                    client
                        .post_json(ReportRequest::PATH, &body)
                        .await
                        .map_err(anyhow::Error::from)
                }
            })
        };
        Self { window, poller: Poller::new(fetch) }
    }

    pub fn set_window(&mut self, window: TimeWindow) {
        *self.window.lock().expect("window lock") = window;
    }

    /// The "Generate report" button.
    pub async fn generate(&self) -> bool {
        self.poller.run_once().await
    }

    pub fn state(&self) -> PollState<Report> {
        self.poller.state()
    }

    /// Pretty JSON of the last generated report, for export.
    pub fn export_json(&self) -> Option<String> {
        let report = self.poller.state().data?;
        serde_json::to_string_pretty(&report).ok()
    }

    pub fn render(&self) -> String {
        render::render_report(&self.poller.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Hotspot;
    use crate::poll;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn hotspot(id: &str) -> Hotspot {
        Hotspot {
            hotspot_id: id.to_string(),
            dimension: "lane".to_string(),
            key: format!("KEY_{}", id),
            kg_co2e_total: 10.0,
            activity_count: 1,
            contribution_pct: 1.0,
            trend_delta_pct: 0.0,
            explanation: "x".to_string(),
        }
    }

    #[tokio::test]
    async fn selection_resets_after_refresh_drops_row() {
        // First fetch returns H1 and H2, the next only H2.
        let calls = Arc::new(AtomicUsize::new(0));
        let calls2 = calls.clone();
        let fetch = poll::fetcher(move || {
            let n = calls2.fetch_add(1, Ordering::SeqCst);
            async move {
                let items = if n == 0 {
                    vec![hotspot("H1"), hotspot("H2")]
                } else {
                    vec![hotspot("H2")]
                };
                Ok(HotspotList { items })
            }
        });
        let poller = Poller::new(fetch);
        let mut selection = Selection::default();
        let window = TimeWindow::new("2026-07-31", "2026-08-30").unwrap();

        assert!(poller.run_once().await);
        selection.select("H1");
        let text = render::render_hotspots(
            &poller.state(),
            &selection,
            HotspotDimension::Lane,
            &window,
        );
        assert!(text.contains("Why this hotspot?"));

        assert!(poller.run_once().await);
        let text = render::render_hotspots(
            &poller.state(),
            &selection,
            HotspotDimension::Lane,
            &window,
        );
        assert!(text.contains("Select a row to see an explanation."));
    }
}

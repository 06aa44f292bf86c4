use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use tokio::time::sleep;

use carbonscope::api::ApiClient;
use carbonscope::config::Config;
use carbonscope::legacy::{LegacyDashboard, LiveProvider};
use carbonscope::pages::{
    HotspotsPage, OptimizationPage, OverviewPage, ReportsPage, ScenarioLabPage,
};
use carbonscope::request::{Constraints, HotspotDimension, ScenarioKind, Weights};

const USAGE: &str = "usage: carbonscope <overview|hotspots [dimension]|scenario|optimize|report|legacy>";

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    let client = Arc::new(ApiClient::new(
        &cfg.api_base,
        Duration::from_millis(cfg.request_timeout_ms),
    )?);

    let page = std::env::args().nth(1).unwrap_or_else(|| "overview".to_string());
    match page.as_str() {
        "overview" => {
            let page = OverviewPage::mount(client, &cfg);
            loop {
                sleep(Duration::from_millis(cfg.poll_ms)).await;
                print!("{}", page.render());
            }
        }
        "hotspots" => {
            let dimension = std::env::args()
                .nth(2)
                .and_then(|d| HotspotDimension::parse(&d))
                .unwrap_or(HotspotDimension::Lane);
            let page = HotspotsPage::mount(client, &cfg, dimension);
            loop {
                sleep(Duration::from_millis(cfg.poll_ms)).await;
                print!("{}", page.render());
            }
        }
        "scenario" => {
            let page = ScenarioLabPage::mount(client, &cfg, ScenarioKind::from_env());
            page.run().await;
            print!("{}", page.render());
            Ok(())
        }
        "optimize" => {
            let page =
                OptimizationPage::mount(client, &cfg, Weights::from_env(), Constraints::from_env());
            page.run().await;
            print!("{}", page.render());
            Ok(())
        }
        "report" => {
            let page = ReportsPage::mount(client, &cfg);
            page.generate().await;
            print!("{}", page.render());
            Ok(())
        }
        "legacy" => {
            let live = Arc::new(LiveProvider::new(&cfg)?);
            let mut dash = LegacyDashboard::new(live, Duration::from_millis(cfg.legacy_poll_ms));
            dash.start();
            loop {
                sleep(Duration::from_millis(cfg.legacy_poll_ms)).await;
                print!("{}", carbonscope::render::render_legacy(&dash.state()));
            }
        }
        other => bail!("unknown page {:?}\n{}", other, USAGE),
    }
}

//! Pure text renderers: `PollState<T>` in, presentation out.
//!
//! Three branches everywhere: loading (no data yet), error (message shown,
//! prior data kept on screen rather than blanked), ready. Selection is
//! rendered from its effective value, so a vanished row falls back to the
//! neutral placeholder.

use std::fmt::Write as _;

use crate::dates::TimeWindow;
use crate::legacy::{DataOrigin, Sourced};
use crate::model::{
    CarbonSummary, HotspotList, OptimizeResponse, Report, SimulationResult,
};
use crate::poll::PollState;
use crate::request::HotspotDimension;
use crate::select::Selection;

/// Status line shared by every page.
fn status<T>(state: &PollState<T>) -> String {
    if let Some(err) = &state.error {
        return format!("API error: {}", err);
    }
    if state.is_loading && state.data.is_none() {
        return "loading...".to_string();
    }
    "live".to_string()
}

pub fn render_overview(state: &PollState<CarbonSummary>, window: &TimeWindow) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== Overview == {} [{}]", window, status(state));
    let Some(data) = &state.data else {
        let _ = writeln!(out, "Waiting for ledger...");
        return out;
    };
    let _ = writeln!(out, "Total emissions: {:.2} kgCO2e", data.total_kg_co2e);
    let _ = writeln!(
        out,
        "Coverage: {} activities (avg confidence {:.0}%)",
        data.coverage.activity_count,
        data.coverage.avg_confidence * 100.0
    );
    let _ = writeln!(
        out,
        "Last ledger recompute: {}",
        data.freshness.last_computed_at.as_deref().unwrap_or("-")
    );
    if !data.scope_split.is_empty() {
        let scopes: Vec<String> = data
            .scope_split
            .iter()
            .map(|(k, v)| format!("S{}: {:.0}", k, v))
            .collect();
        let _ = writeln!(out, "Scope split: {}", scopes.join(" | "));
    }
    if !data.category_split.is_empty() {
        let _ = writeln!(out, "Category split:");
        for (category, kg) in &data.category_split {
            let _ = writeln!(out, "  {:<20} {:>12.2} kg", category, kg);
        }
    }
    if !data.trend_daily.is_empty() {
        let _ = writeln!(out, "Trend (daily, last {} points):", data.trend_daily.len());
        for point in &data.trend_daily {
            let _ = writeln!(out, "  {}  {:>10.2} kg", point.date, point.kg_co2e);
        }
    }
    out
}

pub fn render_hotspots(
    state: &PollState<HotspotList>,
    selection: &Selection,
    dimension: HotspotDimension,
    window: &TimeWindow,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "== Hotspots ({}) == {} [{}]",
        dimension.as_str(),
        window,
        status(state)
    );
    let Some(data) = &state.data else {
        let _ = writeln!(out, "Waiting for ledger data...");
        return out;
    };
    if data.items.is_empty() {
        let _ = writeln!(out, "Waiting for ledger data...");
        return out;
    }
    let selected = selection.effective(data.items.iter().map(|h| h.hotspot_id.as_str()));
    let _ = writeln!(
        out,
        "  {:<24} {:>12} {:>7} {:>7} {:>9}",
        "Key", "kgCO2e", "%", "Count", "Trend d%"
    );
    for item in &data.items {
        let marker = if selected == Some(item.hotspot_id.as_str()) { ">" } else { " " };
        let _ = writeln!(
            out,
            "{} {:<24} {:>12.2} {:>7.1} {:>7} {:>9.1}",
            marker,
            item.key,
            item.kg_co2e_total,
            item.contribution_pct,
            item.activity_count,
            item.trend_delta_pct
        );
    }
    match selected.and_then(|id| data.items.iter().find(|h| h.hotspot_id == id)) {
        Some(item) => {
            let _ = writeln!(out, "Why this hotspot? {}", item.explanation);
            let _ = writeln!(
                out,
                "Drilldown: {:.2} kg, {:.1}% contribution, {} activities",
                item.kg_co2e_total, item.contribution_pct, item.activity_count
            );
        }
        None => {
            let _ = writeln!(out, "Select a row to see an explanation.");
        }
    }
    out
}

pub fn render_simulation(state: &PollState<SimulationResult>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== Scenario Lab == [{}]", status(state));
    let Some(r) = &state.data else {
        let _ = writeln!(out, "Run a simulation to see baseline vs scenario deltas.");
        return out;
    };
    let _ = writeln!(out, "Baseline carbon:  {:>12.2} kg", r.baseline_carbon_kg);
    let _ = writeln!(out, "Scenario carbon:  {:>12.2} kg", r.scenario_carbon_kg);
    let _ = writeln!(out, "Delta:            {:>12.2} kg ({:.1}%)", r.delta_carbon_kg, r.delta_carbon_pct);
    let _ = writeln!(out, "Cost proxy delta: {:>12.2}", r.delta_cost);
    let _ = writeln!(out, "Lead-time delta:  {:>12.2} days", r.delta_lead_time_days);
    let _ = writeln!(out, "Impacted activities: {}", r.impacted_activity_count);
    if !r.assumptions_used.is_null() {
        let _ = writeln!(out, "Assumptions used: {}", r.assumptions_used);
    }
    out
}

pub fn render_optimization(state: &PollState<OptimizeResponse>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== Optimization == [{}]", status(state));
    let Some(r) = &state.data else {
        let _ = writeln!(out, "Run the optimizer to generate action cards.");
        return out;
    };
    let _ = writeln!(out, "Recommendations: {}", r.summary.recommendation_count);
    let _ = writeln!(
        out,
        "Estimated total savings: {:.2} kg",
        r.summary.estimated_total_savings_kg
    );
    for (idx, rec) in r.recommendations.iter().enumerate() {
        let _ = writeln!(out, "--- [{}] {} (conf {:.0}%)", idx + 1, rec.title, rec.confidence * 100.0);
        let _ = writeln!(out, "    {}", rec.rationale);
        let _ = writeln!(
            out,
            "    CO2e saved {:.2} kg | cost impact {:.1}% | lead time {:+.1} d",
            rec.estimated_carbon_savings_kg,
            rec.cost_impact * 100.0,
            rec.lead_time_impact_days
        );
        if !rec.affected.is_null() {
            let _ = writeln!(out, "    Affected: {}", rec.affected);
        }
    }
    if !r.assumptions_used.is_null() {
        let _ = writeln!(out, "Assumptions used: {}", r.assumptions_used);
    }
    out
}

pub fn render_report(state: &PollState<Report>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== Reports == [{}]", status(state));
    let Some(r) = &state.data else {
        let _ = writeln!(out, "Generate a report to preview the narrative and annexure.");
        return out;
    };
    let _ = writeln!(out, "Report {} | period {} -> {} | created {}", r.report_id, r.period_from, r.period_to, r.created_at);
    let _ = writeln!(out, "--- narrative ---");
    let _ = writeln!(out, "{}", r.narrative_md.trim_end());
    if !r.annexure_json.is_null() {
        let _ = writeln!(out, "--- annexure ---");
        let _ = writeln!(
            out,
            "{}",
            serde_json::to_string_pretty(&r.annexure_json).unwrap_or_else(|_| r.annexure_json.to_string())
        );
    }
    out
}

pub fn render_legacy(state: &PollState<Sourced>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== Carbon Dashboard (legacy) == [{}]", status(state));
    let Some(sourced) = &state.data else {
        let _ = writeln!(out, "Waiting for data...");
        return out;
    };
    if sourced.origin == DataOrigin::Synthetic {
        let _ = writeln!(out, "** SYNTHETIC DEMO DATA (API unreachable) **");
    }
    let kpis = &sourced.summary.summary;
    let _ = writeln!(out, "Total emissions:       {} kgCO2e", compact(kpis.total_emissions));
    let _ = writeln!(out, "Total activities:      {}", kpis.total_activities);
    let _ = writeln!(out, "Transport emissions:   {} kgCO2e", compact(kpis.transport_emissions));
    let _ = writeln!(out, "Electricity emissions: {} kgCO2e", compact(kpis.electricity_emissions));
    let _ = writeln!(out, "Last update:           {}", kpis.last_update);
    if !sourced.summary.transport_modes.is_empty() {
        let modes: Vec<String> = sourced
            .summary
            .transport_modes
            .iter()
            .map(|(k, v)| format!("{} {:.1}", k, v))
            .collect();
        let _ = writeln!(out, "Transport modes: {}", modes.join(" | "));
    }
    if !sourced.summary.recent_activity.is_empty() {
        let _ = writeln!(out, "Recent activity:");
        for activity in &sourced.summary.recent_activity {
            let _ = writeln!(out, "  {:<22} {:<20} {}", activity.title, activity.details, activity.value);
        }
    }
    if !sourced.summary.hotspots.suppliers.is_empty() {
        let _ = writeln!(out, "Top suppliers:");
        for nv in &sourced.summary.hotspots.suppliers {
            let _ = writeln!(out, "  {:<20} {:>10}", nv.name, nv.value);
        }
    }
    out
}

/// Compact KPI formatting (1.2K / 3.4M).
fn compact(n: f64) -> String {
    if n >= 1_000_000.0 {
        format!("{:.1}M", n / 1_000_000.0)
    } else if n >= 1_000.0 {
        format!("{:.1}K", n / 1_000.0)
    } else {
        format!("{:.1}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coverage, Freshness, Hotspot};

    fn summary() -> CarbonSummary {
        CarbonSummary {
            total_kg_co2e: 1234.5,
            scope_split: [("1".to_string(), 100.0)].into_iter().collect(),
            category_split: [("transport".to_string(), 900.0)].into_iter().collect(),
            trend_daily: vec![],
            coverage: Coverage { activity_count: 42, avg_confidence: 0.87 },
            freshness: Freshness { last_computed_at: None },
        }
    }

    fn hotspot(id: &str, key: &str) -> Hotspot {
        Hotspot {
            hotspot_id: id.to_string(),
            dimension: "lane".to_string(),
            key: key.to_string(),
            kg_co2e_total: 100.0,
            activity_count: 5,
            contribution_pct: 10.0,
            trend_delta_pct: -1.0,
            explanation: format!("{} is the top contributor", key),
        }
    }

    fn window() -> TimeWindow {
        TimeWindow::new("2026-07-31", "2026-08-30").unwrap()
    }

    #[test]
    fn loading_branch_without_data() {
        let state: PollState<CarbonSummary> =
            PollState { data: None, error: None, is_loading: true };
        let text = render_overview(&state, &window());
        assert!(text.contains("loading..."));
        assert!(text.contains("Waiting for ledger"));
    }

    #[test]
    fn error_branch_keeps_prior_data_visible() {
        let state = PollState {
            data: Some(summary()),
            error: Some("HTTP 500: Internal Server Error".to_string()),
            is_loading: false,
        };
        let text = render_overview(&state, &window());
        assert!(text.contains("API error: HTTP 500"));
        assert!(text.contains("1234.50 kgCO2e"), "prior data must stay on screen");
    }

    #[test]
    fn ready_branch_shows_coverage() {
        let state = PollState { data: Some(summary()), error: None, is_loading: false };
        let text = render_overview(&state, &window());
        assert!(text.contains("[live]"));
        assert!(text.contains("42 activities"));
        assert!(text.contains("87%"));
    }

    #[test]
    fn hotspot_selection_falls_back_to_placeholder() {
        let mut selection = Selection::default();
        selection.select("H1");

        let both = PollState {
            data: Some(HotspotList { items: vec![hotspot("H1", "LANE_A"), hotspot("H2", "LANE_B")] }),
            error: None,
            is_loading: false,
        };
        let text = render_hotspots(&both, &selection, HotspotDimension::Lane, &window());
        assert!(text.contains("Why this hotspot? LANE_A"));

        // H1 vanished from the refreshed data: placeholder again.
        let only_h2 = PollState {
            data: Some(HotspotList { items: vec![hotspot("H2", "LANE_B")] }),
            error: None,
            is_loading: false,
        };
        let text = render_hotspots(&only_h2, &selection, HotspotDimension::Lane, &window());
        assert!(text.contains("Select a row to see an explanation."));
        assert!(!text.contains("Why this hotspot?"));
    }

    #[test]
    fn simulation_placeholder_before_first_run() {
        let state: PollState<SimulationResult> =
            PollState { data: None, error: None, is_loading: false };
        let text = render_simulation(&state);
        assert!(text.contains("Run a simulation"));
    }

    #[test]
    fn legacy_synthetic_data_is_flagged() {
        let today = chrono::NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        let sourced = Sourced {
            origin: DataOrigin::Synthetic,
            summary: crate::synthetic::demo_summary(today, &mut rand::thread_rng()),
        };
        let state = PollState { data: Some(sourced), error: None, is_loading: false };
        let text = render_legacy(&state);
        assert!(text.contains("SYNTHETIC DEMO DATA"));
    }

    #[test]
    fn legacy_live_data_is_not_flagged() {
        let today = chrono::NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        let sourced = Sourced {
            origin: DataOrigin::Live,
            summary: crate::synthetic::demo_summary(today, &mut rand::thread_rng()),
        };
        let state = PollState { data: Some(sourced), error: None, is_loading: false };
        let text = render_legacy(&state);
        assert!(!text.contains("SYNTHETIC"));
        assert!(text.contains("Total activities"));
    }

    #[test]
    fn compact_formatting() {
        assert_eq!(compact(950.0), "950.0");
        assert_eq!(compact(1500.0), "1.5K");
        assert_eq!(compact(2_400_000.0), "2.4M");
    }
}

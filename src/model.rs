//! Response types for every consumed endpoint.
//!
//! Field names are the wire names; there is no runtime schema validation
//! beyond serde decoding, the backend is the trust boundary. Free-form
//! backend payloads (assumptions, annexures, lineage) stay as raw JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// GET /carbon/summary
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CarbonSummary {
    pub total_kg_co2e: f64,
    #[serde(default)]
    pub scope_split: BTreeMap<String, f64>,
    #[serde(default)]
    pub category_split: BTreeMap<String, f64>,
    #[serde(default)]
    pub trend_daily: Vec<TrendPoint>,
    pub coverage: Coverage,
    pub freshness: Freshness,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub kg_co2e: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Coverage {
    pub activity_count: u64,
    pub avg_confidence: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Freshness {
    pub last_computed_at: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /hotspots
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HotspotList {
    #[serde(default)]
    pub items: Vec<Hotspot>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Hotspot {
    pub hotspot_id: String,
    pub dimension: String,
    pub key: String,
    pub kg_co2e_total: f64,
    pub activity_count: u64,
    pub contribution_pct: f64,
    pub trend_delta_pct: f64,
    pub explanation: String,
}

// ---------------------------------------------------------------------------
// POST /optimize
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OptimizeResponse {
    pub summary: OptimizeSummary,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub assumptions_used: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OptimizeSummary {
    pub recommendation_count: u64,
    pub estimated_total_savings_kg: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub rationale: String,
    pub estimated_carbon_savings_kg: f64,
    pub cost_impact: f64,
    pub lead_time_impact_days: f64,
    pub confidence: f64,
    #[serde(default)]
    pub affected: Value,
    #[serde(default)]
    pub constraint_compliance: Value,
}

// ---------------------------------------------------------------------------
// POST /simulate
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationResult {
    pub baseline_carbon_kg: f64,
    pub scenario_carbon_kg: f64,
    pub delta_carbon_kg: f64,
    pub delta_carbon_pct: f64,
    pub baseline_cost: f64,
    pub scenario_cost: f64,
    pub delta_cost: f64,
    pub baseline_lead_time_days: f64,
    pub scenario_lead_time_days: f64,
    pub delta_lead_time_days: f64,
    pub impacted_activity_count: u64,
    #[serde(default)]
    pub assumptions_used: Value,
}

// ---------------------------------------------------------------------------
// POST /report/generate
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Report {
    pub report_id: String,
    pub period_from: String,
    pub period_to: String,
    pub created_at: String,
    pub narrative_md: String,
    #[serde(default)]
    pub annexure_json: Value,
    #[serde(default)]
    pub lineage_json: Value,
    #[serde(default)]
    pub assumptions_json: Value,
}

// ---------------------------------------------------------------------------
// GET /api/summary (legacy dashboard)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySummary {
    pub summary: LegacyKpis,
    #[serde(default)]
    pub trend_data: Vec<LegacyTrendDay>,
    #[serde(default)]
    pub categories: BTreeMap<String, f64>,
    #[serde(default)]
    pub transport_modes: BTreeMap<String, f64>,
    #[serde(default)]
    pub recent_activity: Vec<LegacyActivity>,
    pub hotspots: LegacyHotspots,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyKpis {
    pub total_emissions: f64,
    pub total_activities: u64,
    pub transport_emissions: f64,
    pub electricity_emissions: f64,
    pub last_update: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LegacyTrendDay {
    pub date: String,
    pub transport: f64,
    pub electricity: f64,
    pub total: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LegacyActivity {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub details: String,
    pub value: String,
    pub timestamp: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LegacyHotspots {
    #[serde(default)]
    pub suppliers: Vec<NamedValue>,
    #[serde(default)]
    pub routes: Vec<NamedValue>,
    #[serde(default)]
    pub skus: Vec<NamedValue>,
    #[serde(default)]
    pub facilities: Vec<NamedValue>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: String,
}

//! Per-page request builders.
//!
//! Each builder is a pure function from control values to the exact body or
//! query string a backend endpoint expects. Builders are total over their
//! input domain; nothing here validates semantics (the backend does).

use serde::Serialize;
use serde_json::{json, Value};

use crate::dates::TimeWindow;

/// A fully determined request: path plus optional JSON body.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestSpec {
    pub path: String,
    pub body: Option<Value>,
}

// ---------------------------------------------------------------------------
// Optimization
// ---------------------------------------------------------------------------

/// Objective weights, each in `[0, 1]`. Passed through as-is; the backend
/// does not expect them normalized.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Weights {
    pub carbon: f64,
    pub cost: f64,
    pub speed: f64,
    pub risk: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self { carbon: 0.5, cost: 0.2, speed: 0.2, risk: 0.1 }
    }
}

impl Weights {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            carbon: std::env::var("W_CARBON").ok().and_then(|v| v.parse().ok()).unwrap_or(d.carbon),
            cost: std::env::var("W_COST").ok().and_then(|v| v.parse().ok()).unwrap_or(d.cost),
            speed: std::env::var("W_SPEED").ok().and_then(|v| v.parse().ok()).unwrap_or(d.speed),
            risk: std::env::var("W_RISK").ok().and_then(|v| v.parse().ok()).unwrap_or(d.risk),
        }
    }
}

pub const ALLOWED_MODES: [&str; 4] = ["road", "rail", "sea", "air"];

#[derive(Clone, Debug, Serialize)]
pub struct Constraints {
    pub max_cost_increase_pct: f64,
    pub sla_strict: bool,
    pub allowed_modes: Vec<String>,
    pub avoid_air_unless_urgent: bool,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            max_cost_increase_pct: 2.0,
            sla_strict: true,
            allowed_modes: ALLOWED_MODES.iter().map(|m| m.to_string()).collect(),
            avoid_air_unless_urgent: true,
        }
    }
}

impl Constraints {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            max_cost_increase_pct: std::env::var("MAX_COST_INC_PCT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(d.max_cost_increase_pct),
            sla_strict: env_bool("SLA_STRICT", d.sla_strict),
            allowed_modes: d.allowed_modes,
            avoid_air_unless_urgent: env_bool("AVOID_AIR", d.avoid_air_unless_urgent),
        }
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

#[derive(Clone, Debug, Serialize)]
pub struct OptimizeRequest {
    pub time_window: TimeWindow,
    pub weights: Weights,
    pub constraints: Constraints,
}

impl OptimizeRequest {
    pub const PATH: &'static str = "/optimize";

    pub fn build(time_window: TimeWindow, weights: Weights, constraints: Constraints) -> Self {
        Self { time_window, weights, constraints }
    }

    pub fn spec(&self) -> RequestSpec {
        RequestSpec {
            path: Self::PATH.to_string(),
            body: Some(serde_json::to_value(self).expect("optimize body serializes")),
        }
    }
}

// ---------------------------------------------------------------------------
// Scenario simulation
// ---------------------------------------------------------------------------

/// What-if scenario, one constructor per kind. Each variant carries only the
/// fields its `parameters` shape requires.
#[derive(Clone, Debug, PartialEq)]
pub enum ScenarioKind {
    ModeShift { lane_id: String, from_mode: String, to_mode: String, percentage: f64 },
    SupplierIntensityReduction { supplier_id: String, reduction_pct: f64 },
    DistanceReduction { percentage: f64 },
    Consolidation { percentage: f64 },
}

impl ScenarioKind {
    pub fn tag(&self) -> &'static str {
        match self {
            ScenarioKind::ModeShift { .. } => "mode_shift",
            ScenarioKind::SupplierIntensityReduction { .. } => "supplier_intensity_reduction",
            ScenarioKind::DistanceReduction { .. } => "distance_reduction",
            ScenarioKind::Consolidation { .. } => "consolidation",
        }
    }

    /// Demo defaults for the prefilled scenario controls.
    pub fn from_env() -> Self {
        let pct: f64 = std::env::var("PCT").ok().and_then(|v| v.parse().ok()).unwrap_or(30.0);
        match std::env::var("SCENARIO").as_deref() {
            Ok("supplier_intensity_reduction") => ScenarioKind::SupplierIntensityReduction {
                supplier_id: std::env::var("SUPPLIER_ID").unwrap_or_else(|_| "SUP_TAT_001".to_string()),
                reduction_pct: std::env::var("REDUCTION_PCT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(15.0),
            },
            Ok("distance_reduction") => ScenarioKind::DistanceReduction { percentage: pct },
            Ok("consolidation") => ScenarioKind::Consolidation { percentage: pct },
            _ => ScenarioKind::ModeShift {
                lane_id: std::env::var("LANE_ID").unwrap_or_else(|_| "LANE_MUM_DEL_road".to_string()),
                from_mode: std::env::var("FROM_MODE").unwrap_or_else(|_| "road".to_string()),
                to_mode: std::env::var("TO_MODE").unwrap_or_else(|_| "rail".to_string()),
                percentage: pct,
            },
        }
    }
}

/// Cost proxy table, fixed for every scenario kind.
#[derive(Clone, Debug, Serialize)]
pub struct CostModel {
    pub road_cost_per_tkm: f64,
    pub rail_cost_per_tkm: f64,
    pub air_cost_per_tkm: f64,
    pub sea_cost_per_tkm: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            road_cost_per_tkm: 1.0,
            rail_cost_per_tkm: 0.8,
            air_cost_per_tkm: 4.0,
            sea_cost_per_tkm: 0.6,
        }
    }
}

/// Lead-time proxy table, fixed for every scenario kind.
#[derive(Clone, Debug, Serialize)]
pub struct LeadTimeModel {
    pub road_days: u32,
    pub rail_days: u32,
    pub air_days: u32,
    pub sea_days: u32,
}

impl Default for LeadTimeModel {
    fn default() -> Self {
        Self { road_days: 3, rail_days: 4, air_days: 1, sea_days: 8 }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SimulateRequest {
    pub time_window: TimeWindow,
    pub scenario_type: &'static str,
    pub filters: Value,
    pub parameters: Value,
    pub cost_model: CostModel,
    pub lead_time_model: LeadTimeModel,
}

impl SimulateRequest {
    pub const PATH: &'static str = "/simulate";

    pub fn build(time_window: TimeWindow, kind: &ScenarioKind) -> Self {
        let (filters, parameters) = match kind {
            ScenarioKind::ModeShift { lane_id, from_mode, to_mode, percentage } => (
                json!({ "lane_ids": [lane_id] }),
                json!({ "from_mode": from_mode, "to_mode": to_mode, "percentage": percentage }),
            ),
            ScenarioKind::SupplierIntensityReduction { supplier_id, reduction_pct } => (
                json!({}),
                json!({ "supplier_id": supplier_id, "reduction_pct": reduction_pct }),
            ),
            ScenarioKind::DistanceReduction { percentage }
            | ScenarioKind::Consolidation { percentage } => {
                (json!({}), json!({ "percentage": percentage }))
            }
        };
        Self {
            time_window,
            scenario_type: kind.tag(),
            filters,
            parameters,
            cost_model: CostModel::default(),
            lead_time_model: LeadTimeModel::default(),
        }
    }

    pub fn spec(&self) -> RequestSpec {
        RequestSpec {
            path: Self::PATH.to_string(),
            body: Some(serde_json::to_value(self).expect("simulate body serializes")),
        }
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize)]
pub struct ReportRequest {
    pub time_window: TimeWindow,
}

impl ReportRequest {
    pub const PATH: &'static str = "/report/generate";

    pub fn build(time_window: TimeWindow) -> Self {
        Self { time_window }
    }

    pub fn spec(&self) -> RequestSpec {
        RequestSpec {
            path: Self::PATH.to_string(),
            body: Some(serde_json::to_value(self).expect("report body serializes")),
        }
    }
}

// ---------------------------------------------------------------------------
// Hotspots
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HotspotDimension {
    Supplier,
    Lane,
    Sku,
    Facility,
}

impl HotspotDimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            HotspotDimension::Supplier => "supplier",
            HotspotDimension::Lane => "lane",
            HotspotDimension::Sku => "sku",
            HotspotDimension::Facility => "facility",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "supplier" => Some(HotspotDimension::Supplier),
            "lane" => Some(HotspotDimension::Lane),
            "sku" => Some(HotspotDimension::Sku),
            "facility" => Some(HotspotDimension::Facility),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HotspotQuery {
    pub dimension: HotspotDimension,
    pub window: TimeWindow,
    pub limit: u32,
}

impl HotspotQuery {
    pub fn path(&self) -> String {
        format!(
            "/hotspots?dimension={}&from={}&to={}&limit={}",
            self.dimension.as_str(),
            self.window.from,
            self.window.to,
            self.limit
        )
    }

    pub fn spec(&self) -> RequestSpec {
        RequestSpec { path: self.path(), body: None }
    }
}

/// Summary query path for the Overview page.
pub fn carbon_summary_path(window: &TimeWindow) -> String {
    format!("/carbon/summary?from={}&to={}", window.from, window.to)
}

//! Synthetic demo data for the legacy dashboard.
//!
//! Substituted only when the live `/api/summary` fetch fails, so the console
//! remains demonstrable offline. The shape is deterministic (30 trend days,
//! 10 activities, 5 hotspots per dimension); the values are random per call.
//! Callers must label the result as synthetic wherever it is shown.

use chrono::NaiveDate;
use rand::Rng;

use crate::dates::iso_days_ago_from;
use crate::logging::ts_now;
use crate::model::{
    LegacyActivity, LegacyHotspots, LegacyKpis, LegacySummary, LegacyTrendDay, NamedValue,
};

pub const TREND_DAYS: usize = 30;
pub const ACTIVITY_COUNT: usize = 10;
pub const HOTSPOTS_PER_DIMENSION: usize = 5;

const TRANSPORT_MODES: [&str; 4] = ["Road", "Rail", "Air", "Sea"];

// Emission proxies for the demo activities.
const TRANSPORT_KG_PER_TKM: f64 = 0.12;
const ELECTRICITY_KG_PER_KWH: f64 = 0.5;

pub fn demo_summary(today: NaiveDate, rng: &mut impl Rng) -> LegacySummary {
    let trend_data: Vec<LegacyTrendDay> = (0..TREND_DAYS)
        .rev()
        .map(|i| {
            let transport = rng.gen_range(100.0..600.0);
            let electricity = rng.gen_range(50.0..350.0);
            LegacyTrendDay {
                date: iso_days_ago_from(today, i as u32),
                transport,
                electricity,
                total: transport + electricity,
            }
        })
        .collect();

    let transport_emissions: f64 = trend_data.iter().map(|d| d.transport).sum();
    let electricity_emissions: f64 = trend_data.iter().map(|d| d.electricity).sum();

    let mut categories = std::collections::BTreeMap::new();
    categories.insert("Transport".to_string(), transport_emissions);
    categories.insert("Electricity".to_string(), electricity_emissions);
    categories.insert("Purchased Goods".to_string(), rng.gen_range(50.0..250.0));

    let mut transport_modes = std::collections::BTreeMap::new();
    for mode in TRANSPORT_MODES {
        transport_modes.insert(mode.to_string(), rng.gen_range(25.0..400.0));
    }

    LegacySummary {
        summary: LegacyKpis {
            total_emissions: transport_emissions + electricity_emissions,
            total_activities: rng.gen_range(500..1500),
            transport_emissions,
            electricity_emissions,
            last_update: ts_now(),
        },
        trend_data,
        categories,
        transport_modes,
        recent_activity: demo_activities(rng),
        hotspots: demo_hotspots(rng),
    }
}

fn demo_activities(rng: &mut impl Rng) -> Vec<LegacyActivity> {
    let modes = ["road", "rail", "air", "sea"];
    (0..ACTIVITY_COUNT)
        .map(|_| {
            if rng.gen_bool(0.5) {
                let mode = modes[rng.gen_range(0..modes.len())];
                let distance = rng.gen_range(100..2100);
                let weight = rng.gen_range(1.0..51.0);
                let emissions = f64::from(distance) * weight * TRANSPORT_KG_PER_TKM;
                LegacyActivity {
                    kind: "transport".to_string(),
                    title: format!("{} Transport", capitalize(mode)),
                    details: format!("{}km, {:.1} tons", distance, weight),
                    value: format!("{:.2} kg CO2e", emissions),
                    timestamp: ts_now(),
                }
            } else {
                let kwh = rng.gen_range(100..5100);
                LegacyActivity {
                    kind: "electricity".to_string(),
                    title: "Electricity Usage".to_string(),
                    details: format!("{} kWh", kwh),
                    value: format!("{:.2} kg CO2e", f64::from(kwh) * ELECTRICITY_KG_PER_KWH),
                    timestamp: ts_now(),
                }
            }
        })
        .collect()
}

fn demo_hotspots(rng: &mut impl Rng) -> LegacyHotspots {
    let rank = |rng: &mut dyn rand::RngCore, names: [&str; HOTSPOTS_PER_DIMENSION], top: f64| {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| NamedValue {
                name: name.to_string(),
                // Descending bands so the list reads as a ranking.
                value: format!("{:.1}", rng.gen_range(0.0..top) * (1.0 - i as f64 * 0.15) + 20.0),
            })
            .collect()
    };
    LegacyHotspots {
        suppliers: rank(rng, ["Supplier A", "Supplier B", "Supplier C", "Supplier D", "Supplier E"], 1000.0),
        routes: rank(rng, ["NYC-LA Route", "CHI-MIA Route", "HOU-SEA Route", "DEN-ATL Route", "BOS-SF Route"], 1200.0),
        skus: rank(rng, ["SKU_STEEL_001", "SKU_PLASTIC_002", "SKU_MOTOR_003", "SKU_PARTS_004", "SKU_TOOLS_005"], 500.0),
        facilities: rank(rng, ["Facility NYC", "Facility LA", "Facility CHI", "Facility HOU", "Facility MIA"], 800.0),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

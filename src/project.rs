use std::collections::BTreeMap;

use rusqlite::Connection;
use serde::Serialize;

use crate::errors::DataError;
use crate::store;

/// Render-ready data for one trade, shaped for the map client:
/// a display string per state for the premium range, one numeric map per
/// metric for heat-map coloring, and the trade's WC class configuration.
#[derive(Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub premium_ranges: BTreeMap<String, String>,
    pub state_data: BTreeMap<&'static str, BTreeMap<String, f64>>,
    pub wc_config: WcConfig,
}

#[derive(Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WcConfig {
    pub class_1: String,
    pub label_1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_2: Option<String>,
    pub has_two_classes: bool,
}

/// Build the projection for a trade. Zero records yield an empty
/// projection (the client's "no data" state), not an error.
pub fn project(conn: &Connection, trade: &str) -> Result<Projection, DataError> {
    let records = store::get_all(conn, trade)?;

    let mut premium_ranges: BTreeMap<String, String> = BTreeMap::new();
    let mut gl_premium: BTreeMap<String, f64> = BTreeMap::new();
    let mut gl_savings: BTreeMap<String, f64> = BTreeMap::new();
    let mut gl_competitiveness: BTreeMap<String, f64> = BTreeMap::new();
    let mut wc_rate_1: BTreeMap<String, f64> = BTreeMap::new();
    let mut wc_rate_2: BTreeMap<String, f64> = BTreeMap::new();
    let mut wc_config = WcConfig::default();

    for rec in &records {
        let state = rec.state_code.clone();
        premium_ranges.insert(
            state.clone(),
            format!("{}% - {}%", rec.gl_premium_low, rec.gl_premium_high),
        );
        gl_premium.insert(
            state.clone(),
            (rec.gl_premium_low + rec.gl_premium_high) / 2.0,
        );
        gl_savings.insert(state.clone(), rec.gl_savings);
        gl_competitiveness.insert(state.clone(), rec.gl_competitiveness as f64);
        wc_rate_1.insert(state.clone(), rec.wc_slot_1.rate);

        if wc_config.class_1.is_empty() {
            wc_config.class_1 = rec.wc_slot_1.class_code.clone();
            wc_config.label_1 = rec.wc_slot_1.label.clone().unwrap_or_default();
        }
        if let Some(slot_2) = &rec.wc_slot_2 {
            wc_rate_2.insert(state, slot_2.rate);
            if wc_config.class_2.is_none() {
                wc_config.class_2 = Some(slot_2.class_code.clone());
                wc_config.label_2 = Some(slot_2.label.clone().unwrap_or_default());
                wc_config.has_two_classes = true;
            }
        }
    }

    let mut state_data = BTreeMap::new();
    if !records.is_empty() {
        state_data.insert("glPremium", gl_premium);
        state_data.insert("glSavings", gl_savings);
        state_data.insert("glCompetitiveness", gl_competitiveness);
        state_data.insert("wcRate1", wc_rate_1);
        if wc_config.has_two_classes {
            state_data.insert("wcRate2", wc_rate_2);
        }
    }

    Ok(Projection {
        premium_ranges,
        state_data,
        wc_config,
    })
}

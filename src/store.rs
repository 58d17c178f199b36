use chrono::Utc;
use rusqlite::Connection;

use crate::errors::DataError;

/// One Workers' Comp class/rate/label unit.
#[derive(Debug, Clone, PartialEq)]
pub struct WcSlot {
    pub class_code: String,
    pub rate: f64,
    pub label: Option<String>,
}

/// The WC portion of a parsed row. Legacy 7-column files carry the fixed
/// carpenter pair; flexible 11-column files carry one or two slots.
#[derive(Debug, Clone, PartialEq)]
pub enum WcData {
    LegacyPair { rate_5437: f64, rate_5645: f64 },
    FlexibleSlots { slot_1: WcSlot, slot_2: Option<WcSlot> },
}

pub const LEGACY_CLASS_1: &str = "5437";
pub const LEGACY_LABEL_1: &str = "Interior";
pub const LEGACY_CLASS_2: &str = "5645";
pub const LEGACY_LABEL_2: &str = "Framing";

impl WcData {
    /// Collapse to the stored slot layout. The legacy pair maps onto the
    /// carpenter class codes it always denoted.
    pub fn into_slots(self) -> (WcSlot, Option<WcSlot>) {
        match self {
            WcData::LegacyPair {
                rate_5437,
                rate_5645,
            } => (
                WcSlot {
                    class_code: LEGACY_CLASS_1.to_string(),
                    rate: rate_5437,
                    label: Some(LEGACY_LABEL_1.to_string()),
                },
                Some(WcSlot {
                    class_code: LEGACY_CLASS_2.to_string(),
                    rate: rate_5645,
                    label: Some(LEGACY_LABEL_2.to_string()),
                }),
            ),
            WcData::FlexibleSlots { slot_1, slot_2 } => (slot_1, slot_2),
        }
    }
}

/// One stored row, uniquely keyed by (trade, state_code).
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub trade: String,
    pub state_code: String,
    pub gl_premium_low: f64,
    pub gl_premium_high: f64,
    pub gl_savings: f64,
    pub gl_competitiveness: i64,
    pub wc_slot_1: WcSlot,
    pub wc_slot_2: Option<WcSlot>,
}

/// Insert or fully replace the row for (trade, state_code).
pub fn upsert(conn: &Connection, rec: &TradeRecord) -> Result<(), DataError> {
    let updated_at = Utc::now().to_rfc3339();
    let (class_2, rate_2, label_2) = match &rec.wc_slot_2 {
        Some(s) => (
            Some(s.class_code.as_str()),
            Some(s.rate),
            s.label.as_deref(),
        ),
        None => (None, None, None),
    };
    conn.execute(
        "INSERT INTO trade_data(
            trade, state_code, gl_premium_low, gl_premium_high, gl_savings,
            gl_competitiveness, wc_class_1, wc_rate_1, wc_label_1,
            wc_class_2, wc_rate_2, wc_label_2, updated_at)
         VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(trade, state_code) DO UPDATE SET
           gl_premium_low = excluded.gl_premium_low,
           gl_premium_high = excluded.gl_premium_high,
           gl_savings = excluded.gl_savings,
           gl_competitiveness = excluded.gl_competitiveness,
           wc_class_1 = excluded.wc_class_1,
           wc_rate_1 = excluded.wc_rate_1,
           wc_label_1 = excluded.wc_label_1,
           wc_class_2 = excluded.wc_class_2,
           wc_rate_2 = excluded.wc_rate_2,
           wc_label_2 = excluded.wc_label_2,
           updated_at = excluded.updated_at",
        (
            &rec.trade,
            &rec.state_code,
            rec.gl_premium_low,
            rec.gl_premium_high,
            rec.gl_savings,
            rec.gl_competitiveness,
            &rec.wc_slot_1.class_code,
            rec.wc_slot_1.rate,
            rec.wc_slot_1.label.as_deref(),
            class_2,
            rate_2,
            label_2,
            &updated_at,
        ),
    )?;
    Ok(())
}

/// All records for a trade, state_code ascending.
pub fn get_all(conn: &Connection, trade: &str) -> Result<Vec<TradeRecord>, DataError> {
    let mut stmt = conn.prepare(
        "SELECT trade, state_code, gl_premium_low, gl_premium_high, gl_savings,
                gl_competitiveness, wc_class_1, wc_rate_1, wc_label_1,
                wc_class_2, wc_rate_2, wc_label_2
         FROM trade_data
         WHERE trade = ?
         ORDER BY state_code ASC",
    )?;
    let rows = stmt
        .query_map([trade], |row| {
            let class_2: Option<String> = row.get(9)?;
            let rate_2: Option<f64> = row.get(10)?;
            let label_2: Option<String> = row.get(11)?;
            let wc_slot_2 = match (class_2, rate_2) {
                (Some(class_code), Some(rate)) => Some(WcSlot {
                    class_code,
                    rate,
                    label: label_2.filter(|l| !l.is_empty()),
                }),
                _ => None,
            };
            Ok(TradeRecord {
                trade: row.get(0)?,
                state_code: row.get(1)?,
                gl_premium_low: row.get(2)?,
                gl_premium_high: row.get(3)?,
                gl_savings: row.get(4)?,
                gl_competitiveness: row.get(5)?,
                wc_slot_1: WcSlot {
                    class_code: row.get(6)?,
                    rate: row.get(7)?,
                    label: row.get::<_, Option<String>>(8)?.filter(|l| !l.is_empty()),
                },
                wc_slot_2,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count(conn: &Connection, trade: &str) -> Result<i64, DataError> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM trade_data WHERE trade = ?",
        [trade],
        |r| r.get(0),
    )?;
    Ok(n)
}

/// Distinct trade names, ascending.
pub fn list_trades(conn: &Connection) -> Result<Vec<String>, DataError> {
    let mut stmt = conn.prepare("SELECT DISTINCT trade FROM trade_data ORDER BY trade ASC")?;
    let trades = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(trades)
}

/// Remove every row for a trade. Returns the number removed; a store
/// failure surfaces as an error, not as zero.
pub fn delete_trade(conn: &Connection, trade: &str) -> Result<usize, DataError> {
    let n = conn.execute("DELETE FROM trade_data WHERE trade = ?", [trade])?;
    Ok(n)
}

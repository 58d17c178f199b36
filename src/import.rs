use std::path::Path;

use rusqlite::Connection;

use crate::csvio;
use crate::errors::DataError;
use crate::store::{self, TradeRecord};
use crate::validate::{self, RowSchema};

/// Import a CSV file into the trade's namespace.
///
/// The header row selects the layout (legacy 7-column or flexible
/// 11-column). Rows upsert by (trade, state_code) inside one transaction:
/// the first invalid row aborts the import and rolls back every staged
/// write. Rows with a blank state code are skipped without counting.
/// Returns the number of rows imported.
pub fn import_csv(conn: &Connection, file_path: &Path, trade: &str) -> Result<usize, DataError> {
    validate::validate_trade_name(trade)?;

    if !file_path.exists() {
        return Err(DataError::FileNotFound);
    }
    let text =
        std::fs::read_to_string(file_path).map_err(|e| DataError::FileOpen(e.to_string()))?;

    let mut lines = text.lines();
    let header = lines.next().map(csvio::parse_record).unwrap_or_default();
    let schema = RowSchema::detect(&header).ok_or_else(|| DataError::HeaderMismatch {
        expected: RowSchema::Flexible.expected_headers().join(", "),
    })?;

    let tx = conn.unchecked_transaction()?;
    let mut imported = 0usize;
    for (idx, line) in lines.enumerate() {
        let line_number = idx + 2;
        let fields = csvio::parse_record(line);
        if fields.first().map(|f| f.trim().is_empty()).unwrap_or(true) {
            continue;
        }

        // A dropped transaction rolls back, so the first bad row undoes
        // everything staged before it.
        let row = validate::validate_row(&fields, line_number, schema)?;
        let (wc_slot_1, wc_slot_2) = row.wc.into_slots();
        store::upsert(
            &tx,
            &TradeRecord {
                trade: trade.to_string(),
                state_code: row.state_code,
                gl_premium_low: row.gl_premium_low,
                gl_premium_high: row.gl_premium_high,
                gl_savings: row.gl_savings,
                gl_competitiveness: row.gl_competitiveness,
                wc_slot_1,
                wc_slot_2,
            },
        )?;
        imported += 1;
    }
    tx.commit()?;

    tracing::info!(trade, imported, "csv import committed");
    Ok(imported)
}

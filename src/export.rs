use rusqlite::Connection;

use crate::csvio;
use crate::errors::DataError;
use crate::store;
use crate::validate::RowSchema;

/// Serialize a trade's records back to the canonical flexible CSV, state
/// ascending, in exactly the column order the importer accepts. Numbers
/// use shortest round-trip formatting so export-then-import reproduces
/// identical stored values.
pub fn export_csv(conn: &Connection, trade: &str) -> Result<String, DataError> {
    let records = store::get_all(conn, trade)?;
    if records.is_empty() {
        return Err(DataError::NoData);
    }

    let headers: Vec<String> = RowSchema::Flexible
        .expected_headers()
        .iter()
        .map(|h| h.to_string())
        .collect();
    let mut out = csvio::write_record(&headers);
    out.push('\n');

    for rec in &records {
        let (class_2, rate_2, label_2) = match &rec.wc_slot_2 {
            Some(s) => (
                s.class_code.clone(),
                s.rate.to_string(),
                s.label.clone().unwrap_or_default(),
            ),
            None => (String::new(), String::new(), String::new()),
        };
        let fields = vec![
            rec.state_code.clone(),
            rec.gl_premium_low.to_string(),
            rec.gl_premium_high.to_string(),
            rec.gl_savings.to_string(),
            rec.gl_competitiveness.to_string(),
            rec.wc_slot_1.class_code.clone(),
            rec.wc_slot_1.rate.to_string(),
            rec.wc_slot_1.label.clone().unwrap_or_default(),
            class_2,
            rate_2,
            label_2,
        ];
        out.push_str(&csvio::write_record(&fields));
        out.push('\n');
    }
    Ok(out)
}

use crate::errors::DataError;
use crate::states;
use crate::store::{WcData, WcSlot};

/// Which CSV layout a file carries, selected by its header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSchema {
    /// 7 columns with the fixed carpenter rate pair.
    Legacy,
    /// 11 columns with one or two WC class/rate/label slots.
    Flexible,
}

const LEGACY_HEADERS: &[&str] = &[
    "State",
    "GL_Premium_Low",
    "GL_Premium_High",
    "GL_Savings",
    "GL_Competitiveness",
    "WC_Rate_5437",
    "WC_Rate_5645",
];

const FLEXIBLE_HEADERS: &[&str] = &[
    "State",
    "GL_Premium_Low",
    "GL_Premium_High",
    "GL_Savings",
    "GL_Competitiveness",
    "WC_Class_1",
    "WC_Rate_1",
    "WC_Label_1",
    "WC_Class_2",
    "WC_Rate_2",
    "WC_Label_2",
];

impl RowSchema {
    pub fn expected_headers(self) -> &'static [&'static str] {
        match self {
            RowSchema::Legacy => LEGACY_HEADERS,
            RowSchema::Flexible => FLEXIBLE_HEADERS,
        }
    }

    pub fn column_count(self) -> usize {
        self.expected_headers().len()
    }

    /// Match a parsed header row, field for field, against the two
    /// canonical layouts.
    pub fn detect(header: &[String]) -> Option<RowSchema> {
        for schema in [RowSchema::Legacy, RowSchema::Flexible] {
            let expected = schema.expected_headers();
            if header.len() == expected.len()
                && header.iter().zip(expected).all(|(h, e)| h == e)
            {
                return Some(schema);
            }
        }
        None
    }
}

/// One validated, normalized data row, ready for the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub state_code: String,
    pub gl_premium_low: f64,
    pub gl_premium_high: f64,
    pub gl_savings: f64,
    pub gl_competitiveness: i64,
    pub wc: WcData,
}

pub fn validate_trade_name(trade: &str) -> Result<(), DataError> {
    if trade.is_empty() || !trade.chars().all(|c| c.is_ascii_lowercase()) {
        return Err(DataError::InvalidTradeName);
    }
    Ok(())
}

/// Validate one CSV record against the schema. Pure: no store access, no
/// mutation of the input. `line` is the 1-based source line for error
/// messages.
pub fn validate_row(
    fields: &[String],
    line: usize,
    schema: RowSchema,
) -> Result<ParsedRow, DataError> {
    let expected = schema.column_count();
    if fields.len() != expected {
        return Err(DataError::ColumnCount {
            line,
            expected,
            found: fields.len(),
        });
    }

    let state_code = states::normalize_state_code(&fields[0]);
    let well_formed =
        state_code.len() == 2 && state_code.chars().all(|c| c.is_ascii_uppercase());
    if !well_formed || !states::is_recognized(&state_code) {
        return Err(DataError::InvalidStateCode {
            line,
            value: fields[0].trim().to_string(),
        });
    }

    // All numeric parses are checked before any range check, so a file
    // with both problems reports the non-numeric field first.
    let numeric_cols: &[usize] = match schema {
        RowSchema::Legacy => &[1, 2, 3, 4, 5, 6],
        RowSchema::Flexible => &[1, 2, 3, 4],
    };
    for &idx in numeric_cols {
        parse_numeric(fields, idx, line)?;
    }

    let gl_premium_low = parse_numeric(fields, 1, line)?;
    let gl_premium_high = parse_numeric(fields, 2, line)?;
    if !(0.0..=100.0).contains(&gl_premium_low) || !(0.0..=100.0).contains(&gl_premium_high) {
        return Err(DataError::Range {
            line,
            message: "GL Premium values must be between 0 and 100",
        });
    }
    if gl_premium_low > gl_premium_high {
        return Err(DataError::Range {
            line,
            message: "GL Premium Low cannot be greater than High",
        });
    }

    let gl_savings = parse_numeric(fields, 3, line)?;
    if !(0.0..=100.0).contains(&gl_savings) {
        return Err(DataError::Range {
            line,
            message: "GL Savings must be between 0 and 100",
        });
    }

    // Truncate toward zero before the range check (intval semantics).
    let gl_competitiveness = parse_numeric(fields, 4, line)?.trunc() as i64;
    if !(0..=100).contains(&gl_competitiveness) {
        return Err(DataError::Range {
            line,
            message: "GL Competitiveness must be between 0 and 100",
        });
    }

    let wc = match schema {
        RowSchema::Legacy => {
            let rate_5437 = parse_numeric(fields, 5, line)?;
            let rate_5645 = parse_numeric(fields, 6, line)?;
            check_wc_rate(rate_5437, line)?;
            check_wc_rate(rate_5645, line)?;
            WcData::LegacyPair {
                rate_5437,
                rate_5645,
            }
        }
        RowSchema::Flexible => validate_flexible_slots(fields, line)?,
    };

    Ok(ParsedRow {
        state_code,
        gl_premium_low,
        gl_premium_high,
        gl_savings,
        gl_competitiveness,
        wc,
    })
}

fn validate_flexible_slots(fields: &[String], line: usize) -> Result<WcData, DataError> {
    let class_1 = fields[5].trim();
    let rate_1_raw = fields[6].trim();
    if class_1.is_empty() || rate_1_raw.is_empty() {
        return Err(DataError::MissingRequiredSlot {
            line,
            message: "WC_Class_1 and WC_Rate_1 are required",
        });
    }
    let rate_1 = parse_numeric(fields, 6, line)?;
    check_wc_rate(rate_1, line)?;
    let slot_1 = WcSlot {
        class_code: class_1.to_string(),
        rate: rate_1,
        label: optional_label(&fields[7]),
    };

    let class_2 = fields[8].trim();
    let rate_2_raw = fields[9].trim();
    let slot_2 = if !class_2.is_empty() {
        if rate_2_raw.is_empty() {
            return Err(DataError::MissingRequiredSlot {
                line,
                message: "WC_Class_2 and WC_Rate_2 must be provided together",
            });
        }
        let rate_2 = parse_numeric(fields, 9, line)?;
        check_wc_rate(rate_2, line)?;
        Some(WcSlot {
            class_code: class_2.to_string(),
            rate: rate_2,
            label: optional_label(&fields[10]),
        })
    } else {
        // Single-class templates write a 0 rate in the empty second slot;
        // that normalizes to no slot. A real rate without a class is an
        // authoring mistake.
        if !rate_2_raw.is_empty() && parse_numeric(fields, 9, line)? != 0.0 {
            return Err(DataError::MissingRequiredSlot {
                line,
                message: "WC_Rate_2 given without WC_Class_2",
            });
        }
        None
    };

    Ok(WcData::FlexibleSlots { slot_1, slot_2 })
}

fn optional_label(raw: &str) -> Option<String> {
    let label = raw.trim();
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

fn parse_numeric(fields: &[String], idx: usize, line: usize) -> Result<f64, DataError> {
    let raw = fields[idx].trim();
    let parsed = raw.parse::<f64>().ok().filter(|v| v.is_finite());
    parsed.ok_or(DataError::NonNumericField {
        line,
        column: idx + 1,
    })
}

fn check_wc_rate(rate: f64, line: usize) -> Result<(), DataError> {
    if !(0.0..=1000.0).contains(&rate) {
        return Err(DataError::Range {
            line,
            message: "WC Rates must be between 0 and 1000",
        });
    }
    Ok(())
}

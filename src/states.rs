/// Recognized US state and territory codes. DC and the populated
/// territories are included so existing datasets keep importing.
const STATE_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID",
    "IL", "IN", "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS",
    "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH", "OK",
    "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV",
    "WI", "WY", "DC", "PR", "VI", "GU", "AS", "MP",
];

/// Normalize a raw state-code field to its base two-letter form.
///
/// Map shapes for multi-region states carry a `-<suffix>` (e.g. `MI-up`
/// for the upper peninsula); only the base code is stored or looked up.
pub fn normalize_state_code(raw: &str) -> String {
    let base = raw.trim();
    let base = base.split('-').next().unwrap_or(base);
    base.trim().to_ascii_uppercase()
}

pub fn is_recognized(code: &str) -> bool {
    STATE_CODES.contains(&code)
}

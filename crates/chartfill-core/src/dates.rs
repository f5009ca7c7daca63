use chrono::{NaiveDate, NaiveTime};

use crate::model::{ApptTime, DateText};

/// Candidate input formats, tried in this order. The order is part of
/// the contract: an ambiguous value like "01.02.2024" resolves to
/// whichever format matches first.
pub const INPUT_FORMATS: [&str; 4] = ["%d.%m.%Y", "%Y-%m-%d", "%d-%m-%Y", "%m/%d/%Y"];

/// Canonical display format for normalized dates.
pub const OUTPUT_FORMAT: &str = "%m.%d.%Y";

/// Normalize a raw date cell to `MM.DD.YYYY`.
///
/// Tries each candidate format in order and returns on the first
/// successful parse. A value matching none of them (including the empty
/// string) passes through unmodified as `Unparsed`.
pub fn normalize_date(raw: &str) -> DateText {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DateText::Unparsed(raw.to_string());
    }
    for format in INPUT_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return DateText::Parsed(date.format(OUTPUT_FORMAT).to_string());
        }
    }
    DateText::Unparsed(raw.to_string())
}

/// Parse an appointment time cell in 12-hour `H:MM AM/PM` form.
///
/// Failure is not an error: the raw text is kept for display and the
/// record sorts to the earliest position.
pub fn parse_appt_time(raw: &str) -> ApptTime {
    match NaiveTime::parse_from_str(raw.trim(), "%I:%M %p") {
        Ok(time) => ApptTime::Parsed {
            time,
            raw: raw.to_string(),
        },
        Err(_) => ApptTime::Unparsed(raw.to_string()),
    }
}

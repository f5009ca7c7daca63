use std::collections::HashMap;

use csv::ReaderBuilder;

use crate::error::FillError;
use crate::extract::build_record;
use crate::model::Record;

/// Rows at this service location are excluded from CSV batches.
/// The match is exact (case-sensitive) after trimming.
pub const EXCLUDED_SERVICE_LOCATION: &str = "EPSI - Crismon";

/// Parse a CSV export into records, preserving row order.
///
/// The service-location filter applies only to the CSV variant, not to
/// xls/xlsx input; that asymmetry is inherited from the workflow this
/// tool replaces.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<Record>, FillError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(bytes);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let map: HashMap<String, String> = headers
            .iter()
            .zip(row.iter())
            .map(|(h, c)| (h.to_string(), c.to_string()))
            .collect();

        if map.get("Service Location").map(|s| s.trim()) == Some(EXCLUDED_SERVICE_LOCATION) {
            tracing::debug!(
                patient = map.get("Patient Name").map(String::as_str).unwrap_or(""),
                "excluding row by service location"
            );
            continue;
        }

        records.push(build_record(&map)?);
    }
    Ok(records)
}

pub mod csv;
pub mod sheet;

use std::collections::HashMap;

use crate::dates::{normalize_date, parse_appt_time};
use crate::error::FillError;
use crate::model::{MedicationEntry, Record};

/// Parse a data file into records, sorted ascending by appointment time.
///
/// The extension decides the parser: `.csv` goes through the csv crate,
/// `.xls`/`.xlsx` through calamine. Anything else is rejected. The sort
/// is stable, so rows with equal (or unparsable) times keep their
/// original relative order.
pub fn extract_records(bytes: &[u8], extension: &str) -> Result<Vec<Record>, FillError> {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    let mut records = match ext.as_str() {
        "csv" => csv::parse_csv(bytes)?,
        "xls" | "xlsx" => sheet::parse_sheet(bytes)?,
        _ => {
            return Err(FillError::UnsupportedFormat {
                extension: extension.to_string(),
            })
        }
    };
    records.sort_by_key(|r| r.appt_time.sort_key());
    Ok(records)
}

/// Build one Record from a header-to-cell mapping.
///
/// An exported CSV sometimes carries a UTF-8 byte-order mark glued to
/// the first header, so a `\u{FEFF}Date` column is read as `Date`.
pub(crate) fn build_record(row: &HashMap<String, String>) -> Result<Record, FillError> {
    let get = |key: &str| row.get(key).cloned().unwrap_or_default();

    let patient_name = row
        .get("Patient Name")
        .cloned()
        .unwrap_or_else(|| "unknown".to_string());

    let date_raw = match row.get("\u{feff}Date") {
        Some(v) if !v.is_empty() => v.clone(),
        _ => get("Date"),
    };

    let medications = parse_medications(&get("Medications"), &patient_name)?;

    Ok(Record {
        date: normalize_date(&date_raw),
        appt_time: parse_appt_time(&get("Appt Time")),
        patient_name,
        dob: normalize_date(&get("DOB")),
        cc: get("CC"),
        primary_ins: get("Primary Ins"),
        sec_sup_ins: get("Sec/Sup Ins"),
        brief_history: get("Brief History"),
        medications,
    })
}

/// Decompose the Medications cell: semicolon-delimited entries, each a
/// pipe-delimited `date|name|qty|refill` quadruple.
///
/// A segment without any pipe is skipped with a warning. A segment with
/// pipes but the wrong field count is fatal for the batch.
pub(crate) fn parse_medications(
    cell: &str,
    patient: &str,
) -> Result<Vec<MedicationEntry>, FillError> {
    let mut entries = Vec::new();
    if cell.is_empty() {
        return Ok(entries);
    }
    for segment in cell.split(';') {
        if !segment.contains('|') {
            tracing::warn!(patient, segment, "skipping medication entry without field delimiter");
            continue;
        }
        let fields: Vec<&str> = segment.split('|').collect();
        if fields.len() != 4 {
            return Err(FillError::MedicationFieldCount {
                patient: patient.to_string(),
                found: fields.len(),
            });
        }
        entries.push(MedicationEntry {
            date: fields[0].trim().to_string(),
            name: fields[1].trim().to_string(),
            qty: fields[2].trim().to_string(),
            refill: fields[3].trim().to_string(),
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn unsupported_extension_rejected() {
        let err = extract_records(b"whatever", ".pdf").unwrap_err();
        assert!(matches!(err, FillError::UnsupportedFormat { .. }));
        assert!(extract_records(b"", "txt").is_err());
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        // An empty CSV body parses to zero records rather than erroring.
        let records = extract_records(b"", ".CSV").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn malformed_segment_without_pipe_is_skipped() {
        let meds = parse_medications(
            "01.02.2024|Aspirin|30|2;bad-entry;03.03.2024|Metformin|90|0",
            "test",
        )
        .unwrap();
        assert_eq!(meds.len(), 2);
        assert_eq!(meds[0].name, "Aspirin");
        assert_eq!(meds[1].name, "Metformin");
        assert_eq!(meds[1].refill, "0");
    }

    #[test]
    fn wrong_field_count_is_fatal() {
        let err = parse_medications("01.02.2024|Aspirin|30", "Jane Doe").unwrap_err();
        match err {
            FillError::MedicationFieldCount { patient, found } => {
                assert_eq!(patient, "Jane Doe");
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn medication_fields_are_trimmed() {
        let meds = parse_medications(" 01.02.2024 | Aspirin | 30 | 2 ", "test").unwrap();
        assert_eq!(meds[0].date, "01.02.2024");
        assert_eq!(meds[0].name, "Aspirin");
        assert_eq!(meds[0].qty, "30");
        assert_eq!(meds[0].refill, "2");
    }

    #[test]
    fn missing_columns_default_to_empty() {
        let record = build_record(&row(&[("Patient Name", "Jo")])).unwrap();
        assert_eq!(record.cc, "");
        assert_eq!(record.dob.as_str(), "");
        assert!(record.medications.is_empty());
    }

    #[test]
    fn missing_patient_name_column_defaults_to_unknown() {
        let record = build_record(&row(&[("Date", "2024-01-05")])).unwrap();
        assert_eq!(record.patient_name, "unknown");
    }

    #[test]
    fn bom_date_header_is_tolerated() {
        let record = build_record(&row(&[("\u{feff}Date", "2024-01-05")])).unwrap();
        assert_eq!(record.date.as_str(), "01.05.2024");
    }
}

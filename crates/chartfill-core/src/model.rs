use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One structured entry from the semicolon-delimited Medications cell.
///
/// Each entry is a pipe-delimited quadruple in fixed order:
/// `date|name|qty|refill`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationEntry {
    pub date: String,
    pub name: String,
    pub qty: String,
    pub refill: String,
}

impl MedicationEntry {
    /// The single-line rendering used on the form.
    pub fn form_line(&self) -> String {
        format!(
            "Fill Date: {}  Med: {}  Qty: {}  Refill [{}]",
            self.date, self.name, self.qty, self.refill
        )
    }
}

/// A date cell after normalization.
///
/// `Parsed` carries the canonical `MM.DD.YYYY` rendering; `Unparsed`
/// carries the original cell text verbatim. Normalization never fails,
/// it degrades to pass-through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateText {
    Parsed(String),
    Unparsed(String),
}

impl DateText {
    /// Display text regardless of which branch was taken.
    pub fn as_str(&self) -> &str {
        match self {
            DateText::Parsed(s) => s,
            DateText::Unparsed(s) => s,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, DateText::Parsed(_))
    }
}

impl fmt::Display for DateText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An appointment time cell.
///
/// The raw text is kept in both branches because the form always shows
/// the cell as typed; the parsed time exists only to order the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApptTime {
    Parsed { time: NaiveTime, raw: String },
    Unparsed(String),
}

impl ApptTime {
    /// The cell text as it appeared in the source file.
    pub fn raw(&self) -> &str {
        match self {
            ApptTime::Parsed { raw, .. } => raw,
            ApptTime::Unparsed(raw) => raw,
        }
    }

    /// Sort key for batch ordering. Unparsable times sort to the
    /// earliest position.
    pub fn sort_key(&self) -> NaiveTime {
        match self {
            ApptTime::Parsed { time, .. } => *time,
            ApptTime::Unparsed(_) => NaiveTime::MIN,
        }
    }
}

/// One normalized appointment record, derived from one spreadsheet row.
///
/// Columns absent from the source default to the empty string, except
/// Patient Name which defaults to "unknown".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub date: DateText,
    pub appt_time: ApptTime,
    pub patient_name: String,
    pub dob: DateText,
    pub cc: String,
    pub primary_ins: String,
    pub sec_sup_ins: String,
    pub brief_history: String,
    pub medications: Vec<MedicationEntry>,
}

impl Record {
    /// Filename stem for this record's output PDF.
    pub fn file_stem(&self) -> String {
        sanitize_file_stem(&self.patient_name)
    }
}

/// Sanitize a patient name into a filename stem: strip
/// `\ / * ? : " < > | ,` and replace spaces with underscores.
///
/// Two records can sanitize to the same stem; the later one (in sorted
/// appointment order) overwrites the earlier.
pub fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '\\' | '/' | '*' | '?' | ':' | '"' | '<' | '>' | '|' | ','))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

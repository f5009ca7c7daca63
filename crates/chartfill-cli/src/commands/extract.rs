use std::path::PathBuf;

use chartfill_core::error::FillError;
use chartfill_core::model::Record;

use crate::commands::data_extension;

pub fn run(data_file: PathBuf, output_format: &str) -> Result<(), FillError> {
    let bytes = std::fs::read(&data_file)?;
    let records = chartfill_core::extract::extract_records(&bytes, data_extension(&data_file))?;

    match output_format {
        "json" => println!("{}", serde_json::to_string_pretty(&records)?),
        _ => print_table(&records),
    }
    Ok(())
}

fn print_table(records: &[Record]) {
    if records.is_empty() {
        println!("No records.");
        return;
    }

    let name_width = records
        .iter()
        .map(|r| r.patient_name.len())
        .max()
        .unwrap_or(12)
        .max("Patient Name".len());

    println!(
        "{:<10} {:<name_width$} {:<12} {:<6} CC",
        "Appt Time", "Patient Name", "DOB", "Meds"
    );
    for record in records {
        println!(
            "{:<10} {:<name_width$} {:<12} {:<6} {}",
            record.appt_time.raw(),
            record.patient_name,
            record.dob.as_str(),
            record.medications.len(),
            record.cc
        );
    }
    eprintln!("{} record(s)", records.len());
}

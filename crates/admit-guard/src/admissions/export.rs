//! Audit log exports for spreadsheet and archival use.

use std::io::Write;

use serde::Serialize;

use super::domain::Candidate;

pub const CSV_HEADERS: [&str; 13] = [
    "Full Name",
    "Email",
    "Phone",
    "DOB",
    "Qualification",
    "Grad Year",
    "Score",
    "Test Score",
    "Interview Status",
    "Aadhaar",
    "Offer Sent",
    "Exceptions Count",
    "Timestamp",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("json export failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("export io failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    full_name: &'a str,
    email: &'a str,
    phone: String,
    date_of_birth: String,
    qualification: &'a str,
    graduation_year: i32,
    score: f64,
    screening_score: i32,
    interview_status: &'a str,
    national_id: String,
    offer_sent: &'a str,
    exception_count: usize,
    submitted_at: String,
}

impl<'a> From<&'a Candidate> for CsvRow<'a> {
    fn from(candidate: &'a Candidate) -> Self {
        // Leading tab keeps spreadsheet tools from reading digit strings as numbers.
        Self {
            full_name: &candidate.full_name,
            email: &candidate.email,
            phone: format!("\t{}", candidate.phone),
            date_of_birth: candidate.date_of_birth.format("%Y-%m-%d").to_string(),
            qualification: &candidate.qualification,
            graduation_year: candidate.graduation_year,
            score: candidate.score,
            screening_score: candidate.screening_score,
            interview_status: &candidate.interview_status,
            national_id: format!("\t{}", candidate.national_id),
            offer_sent: &candidate.offer_sent,
            exception_count: candidate.exception_count(),
            submitted_at: candidate.submitted_at.to_rfc3339(),
        }
    }
}

pub fn write_csv<W: Write>(candidates: &[Candidate], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(CSV_HEADERS)?;
    for candidate in candidates {
        csv_writer.serialize(CsvRow::from(candidate))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv(candidates: &[Candidate]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(candidates, &mut buffer)?;
    String::from_utf8(buffer).map_err(|err| {
        ExportError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    })
}

pub fn to_json(candidates: &[Candidate]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(candidates)?)
}

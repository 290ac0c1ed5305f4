use std::io::Read;

use super::super::domain::ApplicantSubmission;

#[derive(Debug)]
pub(crate) struct SubmissionRow {
    pub(crate) row: usize,
    pub(crate) parsed: Result<ApplicantSubmission, String>,
}

/// Parse every data row. Only stream-level failures abort; a bad row is kept as an error.
pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<SubmissionRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for (index, record) in csv_reader.records().enumerate() {
        let parsed = match record {
            Ok(record) => record
                .deserialize::<ApplicantSubmission>(Some(&headers))
                .map_err(|err| err.to_string()),
            Err(err) if err.is_io_error() => return Err(err),
            Err(err) => Err(err.to_string()),
        };
        rows.push(SubmissionRow {
            row: index + 1,
            parsed,
        });
    }

    Ok(rows)
}

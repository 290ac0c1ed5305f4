//! CSV intake for assessing many submissions in one pass.

mod parser;

use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use super::domain::Verdict;
use super::service::LoanAssessmentService;

#[derive(Debug)]
pub enum BatchError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchError::Io(err) => write!(f, "failed to read applicant batch: {}", err),
            BatchError::Csv(err) => write!(f, "invalid applicant batch CSV: {}", err),
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchError::Io(err) => Some(err),
            BatchError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for BatchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BatchError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Result for one CSV data row (1-based, header excluded).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub row: usize,
    #[serde(flatten)]
    pub status: BatchRowStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchRowStatus {
    Assessed {
        verdict: Verdict,
        probability_of_approval: f64,
        reported_score: f64,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchSummary {
    pub fn count_verdict(&self, verdict: Verdict) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| {
                matches!(&outcome.status, BatchRowStatus::Assessed { verdict: v, .. } if *v == verdict)
            })
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.status, BatchRowStatus::Failed { .. }))
            .count()
    }
}

pub struct BatchAssessor;

impl BatchAssessor {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        service: &LoanAssessmentService,
    ) -> Result<BatchSummary, BatchError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, service)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        service: &LoanAssessmentService,
    ) -> Result<BatchSummary, BatchError> {
        let mut summary = BatchSummary::default();

        for row in parser::parse_rows(reader)? {
            let status = match row.parsed {
                Ok(submission) => match service.evaluate(&submission) {
                    Ok(result) => BatchRowStatus::Assessed {
                        verdict: result.verdict,
                        probability_of_approval: result.probability_of_approval,
                        reported_score: result.reported_score(),
                    },
                    Err(err) => BatchRowStatus::Failed {
                        reason: err.to_string(),
                    },
                },
                Err(reason) => BatchRowStatus::Failed { reason },
            };

            if let BatchRowStatus::Failed { reason } = &status {
                warn!(row = row.row, %reason, "batch row not assessed");
            }
            summary.outcomes.push(BatchOutcome {
                row: row.row,
                status,
            });
        }

        info!(
            rows = summary.outcomes.len(),
            failed = summary.failed(),
            "applicant batch assessed"
        );
        Ok(summary)
    }
}

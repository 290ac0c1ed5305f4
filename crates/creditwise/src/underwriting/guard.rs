use std::ops::RangeInclusive;

use super::domain::{ApplicantSubmission, Dependents};

pub const LOAN_TERMS_MONTHS: [u16; 6] = [12, 36, 60, 120, 180, 360];

/// Out-of-domain value rejected before the pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidSubmission {
    #[error("{field} must be between {min} and {max} (found {found})")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
        found: u32,
    },
    #[error("loan_term must be one of {allowed:?} months (found {found})")]
    UnsupportedLoanTerm {
        allowed: &'static [u16],
        found: u16,
    },
}

impl InvalidSubmission {
    pub fn field(&self) -> &'static str {
        match self {
            InvalidSubmission::OutOfRange { field, .. } => *field,
            InvalidSubmission::UnsupportedLoanTerm { .. } => "loan_term",
        }
    }
}

/// Accepted numeric ranges, mirroring the intake form's widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionBounds {
    pub age: RangeInclusive<u32>,
    pub dependents: RangeInclusive<u32>,
    pub applicant_income: RangeInclusive<u32>,
    pub coapplicant_income: RangeInclusive<u32>,
    pub savings: RangeInclusive<u32>,
    pub loan_amount: RangeInclusive<u32>,
    pub credit_score: RangeInclusive<u32>,
    pub existing_loans: RangeInclusive<u32>,
}

impl Default for SubmissionBounds {
    fn default() -> Self {
        Self {
            age: 18..=70,
            dependents: 0..=u32::from(Dependents::MAX),
            applicant_income: 0..=100_000,
            coapplicant_income: 0..=50_000,
            savings: 0..=1_000_000,
            loan_amount: 5_000..=500_000,
            credit_score: 300..=850,
            existing_loans: 0..=5,
        }
    }
}

/// Validates submissions against the closed domains the encoder assumes.
#[derive(Debug, Clone, Default)]
pub struct SubmissionGuard {
    bounds: SubmissionBounds,
}

impl SubmissionGuard {
    pub fn with_bounds(bounds: SubmissionBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &SubmissionBounds {
        &self.bounds
    }

    pub fn validate(&self, submission: &ApplicantSubmission) -> Result<(), InvalidSubmission> {
        let bounds = &self.bounds;
        let checks = [
            ("age", &bounds.age, u32::from(submission.age)),
            (
                "dependents",
                &bounds.dependents,
                u32::from(submission.dependents.count()),
            ),
            (
                "applicant_income",
                &bounds.applicant_income,
                submission.applicant_income,
            ),
            (
                "coapplicant_income",
                &bounds.coapplicant_income,
                submission.coapplicant_income,
            ),
            ("savings", &bounds.savings, submission.savings),
            ("loan_amount", &bounds.loan_amount, submission.loan_amount),
            (
                "credit_score",
                &bounds.credit_score,
                u32::from(submission.credit_score),
            ),
            (
                "existing_loans",
                &bounds.existing_loans,
                u32::from(submission.existing_loans),
            ),
        ];

        for (field, range, found) in checks {
            if !range.contains(&found) {
                return Err(InvalidSubmission::OutOfRange {
                    field,
                    min: *range.start(),
                    max: *range.end(),
                    found,
                });
            }
        }

        if !LOAN_TERMS_MONTHS.contains(&submission.loan_term) {
            return Err(InvalidSubmission::UnsupportedLoanTerm {
                allowed: &LOAN_TERMS_MONTHS,
                found: submission.loan_term,
            });
        }

        Ok(())
    }
}

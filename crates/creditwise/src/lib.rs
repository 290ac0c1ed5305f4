//! Loan approval inference: applicant intake, feature encoding against a stored training
//! schema, and verdicts from pre-trained scaler and classifier artifacts.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod underwriting;

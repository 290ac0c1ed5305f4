//! Loan underwriting: turns one applicant submission into an approval verdict.
//!
//! A submission is validated by the [`SubmissionGuard`], encoded into named numeric features,
//! aligned to the column order the classifier was trained on, scaled, and scored. The model
//! artifacts are loaded once through a [`ResourceLoader`] and shared read-only afterwards.

pub mod artifacts;
pub mod batch;
pub mod domain;
pub mod encoding;
pub mod guard;
pub mod pipeline;
pub mod report;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use artifacts::{
    ArtifactKind, ArtifactSource, FileArtifactSource, ModelHandles, ResourceError, ResourceLoader,
    TrainingSchema,
};
pub use batch::{BatchAssessor, BatchError, BatchOutcome, BatchRowStatus, BatchSummary};
pub use domain::{
    ApplicantSubmission, Dependents, EducationLevel, EmployerCategory, EmploymentStatus, Gender,
    LoanPurpose, MaritalStatus, ParseCategoryError, PropertyArea, Verdict,
};
pub use encoding::{align, encode, FeatureVector};
pub use guard::{InvalidSubmission, SubmissionBounds, SubmissionGuard, LOAN_TERMS_MONTHS};
pub use pipeline::{AssessmentPipeline, InferenceResult, PipelineError};
pub use report::AssessmentReport;
pub use router::assessment_router;
pub use service::{AssessmentServiceError, LoanAssessmentService};

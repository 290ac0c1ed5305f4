use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use super::artifacts::{ModelHandles, TrainingSchema};
use super::domain::ApplicantSubmission;
use super::guard::{InvalidSubmission, SubmissionGuard};
use super::pipeline::{AssessmentPipeline, InferenceResult, PipelineError};
use super::report::AssessmentReport;

/// Service composing the submission guard and the inference pipeline.
#[derive(Debug, Clone)]
pub struct LoanAssessmentService {
    guard: SubmissionGuard,
    pipeline: AssessmentPipeline,
}

impl LoanAssessmentService {
    pub fn new(handles: Arc<ModelHandles>) -> Self {
        Self::with_guard(SubmissionGuard::default(), handles)
    }

    pub fn with_guard(guard: SubmissionGuard, handles: Arc<ModelHandles>) -> Self {
        Self {
            guard,
            pipeline: AssessmentPipeline::new(handles),
        }
    }

    pub fn pipeline(&self) -> &AssessmentPipeline {
        &self.pipeline
    }

    pub fn schema(&self) -> &TrainingSchema {
        self.pipeline.handles().schema()
    }

    /// Validate and run one submission through the pipeline.
    pub fn evaluate(
        &self,
        submission: &ApplicantSubmission,
    ) -> Result<InferenceResult, AssessmentServiceError> {
        if let Err(violation) = self.guard.validate(submission) {
            warn!(field = violation.field(), %violation, "submission rejected");
            return Err(violation.into());
        }
        Ok(self.pipeline.assess(submission)?)
    }

    /// Evaluate and wrap the outcome in a presentation report.
    pub fn assess(
        &self,
        submission: &ApplicantSubmission,
    ) -> Result<AssessmentReport, AssessmentServiceError> {
        let result = self.evaluate(submission)?;
        Ok(AssessmentReport::new(submission, &result, Utc::now()))
    }
}

/// Error raised by the assessment service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Invalid(#[from] InvalidSubmission),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

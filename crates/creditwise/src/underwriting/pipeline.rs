use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::artifacts::{AlignedFeatures, ClassLabel, ModelError, ModelHandles, ScalingError};
use super::domain::{ApplicantSubmission, Verdict};
use super::encoding::{self, FeatureVector};

/// Failure of a single assessment. Never resolves to a verdict.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("aligned features rejected by scaler: {0}")]
    Scaling(#[from] ScalingError),
    #[error("inference failed: {0}")]
    Inference(#[from] ModelError),
}

/// Verdict and approval probability produced for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    pub verdict: Verdict,
    pub probability_of_approval: f64,
}

impl InferenceResult {
    pub fn from_prediction(label: ClassLabel, probability_of_approval: f64) -> Self {
        let verdict = match label {
            ClassLabel::Positive => Verdict::Approved,
            ClassLabel::Negative => Verdict::Rejected,
        };
        Self {
            verdict,
            probability_of_approval,
        }
    }

    pub fn risk_score(&self) -> f64 {
        1.0 - self.probability_of_approval
    }

    /// Approval probability for approvals, risk score for rejections.
    pub fn reported_score(&self) -> f64 {
        match self.verdict {
            Verdict::Approved => self.probability_of_approval,
            Verdict::Rejected => self.risk_score(),
        }
    }
}

/// Encoding, alignment, scaling, and prediction over shared model handles.
#[derive(Debug, Clone)]
pub struct AssessmentPipeline {
    handles: Arc<ModelHandles>,
}

impl AssessmentPipeline {
    pub fn new(handles: Arc<ModelHandles>) -> Self {
        Self { handles }
    }

    pub fn handles(&self) -> &ModelHandles {
        &self.handles
    }

    pub fn encode(&self, submission: &ApplicantSubmission) -> FeatureVector {
        encoding::encode(submission)
    }

    pub fn align(&self, features: FeatureVector) -> AlignedFeatures<'_> {
        encoding::align(features, self.handles.schema())
    }

    pub fn assess(&self, submission: &ApplicantSubmission) -> Result<InferenceResult, PipelineError> {
        let aligned = self.align(self.encode(submission));
        let scaled = self.handles.scaler().transform(aligned.values())?;

        let classifier = self.handles.classifier();
        let label = classifier.predict(&scaled)?;
        let probability = classifier.predict_probability(&scaled)?;

        let result = InferenceResult::from_prediction(label, probability);
        debug!(
            verdict = result.verdict.label(),
            probability_of_approval = result.probability_of_approval,
            "assessment completed"
        );
        Ok(result)
    }
}

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::underwriting::artifacts::{
    ArtifactKind, ArtifactSource, ClassifierArtifact, LogisticRegression, ModelHandles,
    ScalerArtifact, StandardScaler, TrainingSchema,
};
use crate::underwriting::domain::{
    ApplicantSubmission, Dependents, EducationLevel, EmployerCategory, EmploymentStatus, Gender,
    LoanPurpose, MaritalStatus, PropertyArea,
};
use crate::underwriting::{assessment_router, LoanAssessmentService};

pub(super) const TRAINING_COLUMNS: [&str; 25] = [
    "Applicant_Income",
    "Coapplicant_Income",
    "Age",
    "Dependents",
    "Existing_Loans",
    "Savings",
    "Collateral_Value",
    "Loan_Amount",
    "Loan_Term",
    "Gender",
    "Marital_Status",
    "Education_Level",
    "Employer_Category_Government",
    "Employer_Category_MNC",
    "Employer_Category_Business",
    "Loan_Purpose_Car",
    "Loan_Purpose_Personal",
    "Loan_Purpose_Education",
    "Property_Area_Semiurban",
    "Property_Area_Rural",
    "Employment_Status_Self-employed",
    "Employment_Status_Unemployed",
    "DTI_Ratio_squared",
    "Credit_Score_squared",
    "Applicant_Income_log",
];

pub(super) fn schema() -> TrainingSchema {
    TrainingSchema::new(TRAINING_COLUMNS.iter().map(|column| column.to_string()).collect())
        .expect("training columns are valid")
}

pub(super) fn identity_scaler(width: usize) -> StandardScaler {
    StandardScaler {
        mean: vec![0.0; width],
        scale: vec![1.0; width],
    }
}

/// Ignores every feature; the verdict depends on the intercept alone.
pub(super) fn constant_model(intercept: f64) -> LogisticRegression {
    LogisticRegression {
        coefficients: vec![0.0; TRAINING_COLUMNS.len()],
        intercept,
    }
}

/// Single non-zero weight on `column`.
pub(super) fn weighted_model(column: &str, weight: f64, intercept: f64) -> LogisticRegression {
    let mut coefficients = vec![0.0; TRAINING_COLUMNS.len()];
    let position = TRAINING_COLUMNS
        .iter()
        .position(|candidate| *candidate == column)
        .expect("column is part of the training schema");
    coefficients[position] = weight;
    LogisticRegression {
        coefficients,
        intercept,
    }
}

pub(super) fn handles(model: LogisticRegression) -> Arc<ModelHandles> {
    Arc::new(ModelHandles::new(
        model,
        identity_scaler(TRAINING_COLUMNS.len()),
        schema(),
    ))
}

pub(super) fn service(model: LogisticRegression) -> LoanAssessmentService {
    LoanAssessmentService::new(handles(model))
}

pub(super) fn router(model: LogisticRegression) -> axum::Router {
    assessment_router(Arc::new(service(model)))
}

/// The intake form's default applicant.
pub(super) fn scenario_submission() -> ApplicantSubmission {
    ApplicantSubmission {
        gender: Gender::Male,
        age: 28,
        marital_status: MaritalStatus::Single,
        education: EducationLevel::Graduate,
        dependents: Dependents::new(0),
        applicant_income: 5000,
        coapplicant_income: 0,
        savings: 15000,
        employment_status: EmploymentStatus::Salaried,
        employer_category: EmployerCategory::Private,
        loan_amount: 120_000,
        loan_term: 360,
        credit_score: 720,
        loan_purpose: LoanPurpose::Home,
        property_area: PropertyArea::Urban,
        existing_loans: 0,
    }
}

/// Every combination of the four multi-valued fields.
pub(super) fn categorical_variants() -> Vec<ApplicantSubmission> {
    let mut variants = Vec::new();
    for employer_category in EmployerCategory::ALL {
        for loan_purpose in LoanPurpose::ALL {
            for property_area in PropertyArea::ALL {
                for employment_status in EmploymentStatus::ALL {
                    variants.push(ApplicantSubmission {
                        employer_category: *employer_category,
                        loan_purpose: *loan_purpose,
                        property_area: *property_area,
                        employment_status: *employment_status,
                        ..scenario_submission()
                    });
                }
            }
        }
    }
    variants
}

pub(super) fn classifier_artifact(model: LogisticRegression) -> ClassifierArtifact {
    ClassifierArtifact::LogisticRegression(model)
}

pub(super) fn scaler_artifact(width: usize) -> ScalerArtifact {
    ScalerArtifact::Standard(identity_scaler(width))
}

/// In-memory artifact store counting how often storage is touched.
#[derive(Debug, Default)]
pub(super) struct MemorySource {
    artifacts: HashMap<ArtifactKind, Vec<u8>>,
    reads: AtomicUsize,
}

impl MemorySource {
    pub(super) fn complete() -> Self {
        Self::default()
            .with(
                ArtifactKind::Classifier,
                serde_json::to_vec(&classifier_artifact(constant_model(2.0)))
                    .expect("classifier serializes"),
            )
            .with(
                ArtifactKind::Scaler,
                serde_json::to_vec(&scaler_artifact(TRAINING_COLUMNS.len()))
                    .expect("scaler serializes"),
            )
            .with(
                ArtifactKind::TrainingSchema,
                serde_json::to_vec(&schema()).expect("schema serializes"),
            )
    }

    pub(super) fn with(mut self, artifact: ArtifactKind, bytes: Vec<u8>) -> Self {
        self.artifacts.insert(artifact, bytes);
        self
    }

    pub(super) fn without(mut self, artifact: ArtifactKind) -> Self {
        self.artifacts.remove(&artifact);
        self
    }

    pub(super) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl ArtifactSource for MemorySource {
    fn read(&self, artifact: ArtifactKind) -> io::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.artifacts
            .get(&artifact)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "artifact not stored"))
    }

    fn location(&self, artifact: ArtifactKind) -> String {
        format!("memory://{}", artifact)
    }
}

//! Deterministic translation of a form submission into named model features.

pub mod categorical;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::artifacts::{AlignedFeatures, TrainingSchema};
use super::domain::ApplicantSubmission;
use categorical::{education_flag, gender_flag, marital_flag, selected_labels, ONE_HOT_FIELDS};

/// Debt-to-income placeholder; the form never collects a real ratio.
pub const DEFAULT_DTI_RATIO: f64 = 0.3;
/// Collateral is not captured by the form and is always encoded as zero.
pub const DEFAULT_COLLATERAL_VALUE: f64 = 0.0;

pub mod columns {
    pub const APPLICANT_INCOME: &str = "Applicant_Income";
    pub const COAPPLICANT_INCOME: &str = "Coapplicant_Income";
    pub const AGE: &str = "Age";
    pub const DEPENDENTS: &str = "Dependents";
    pub const EXISTING_LOANS: &str = "Existing_Loans";
    pub const SAVINGS: &str = "Savings";
    pub const COLLATERAL_VALUE: &str = "Collateral_Value";
    pub const LOAN_AMOUNT: &str = "Loan_Amount";
    pub const LOAN_TERM: &str = "Loan_Term";
    pub const CREDIT_SCORE: &str = "Credit_Score";
    pub const DTI_RATIO: &str = "DTI_Ratio";
    pub const GENDER: &str = "Gender";
    pub const MARITAL_STATUS: &str = "Marital_Status";
    pub const EDUCATION_LEVEL: &str = "Education_Level";
    pub const DTI_RATIO_SQUARED: &str = "DTI_Ratio_squared";
    pub const CREDIT_SCORE_SQUARED: &str = "Credit_Score_squared";
    pub const APPLICANT_INCOME_LOG: &str = "Applicant_Income_log";

    /// Raw columns replaced by their transformed counterparts before alignment.
    pub const SUPERSEDED: [&str; 2] = [DTI_RATIO, CREDIT_SCORE];
}

/// Insertion-ordered feature name to value mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    entries: Vec<(&'static str, f64)>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, keeping its original position when it already exists.
    pub fn insert(&mut self, name: &'static str, value: f64) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<f64> {
        let index = self.entries.iter().position(|(existing, _)| *existing == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, value)| *value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FeatureVector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Encode raw fields, binary flags, drop-first indicators, and derived features.
///
/// The result still carries the superseded raw columns; [`align`] removes them.
pub fn encode(submission: &ApplicantSubmission) -> FeatureVector {
    let mut features = FeatureVector::new();

    features.insert(columns::APPLICANT_INCOME, f64::from(submission.applicant_income));
    features.insert(
        columns::COAPPLICANT_INCOME,
        f64::from(submission.coapplicant_income),
    );
    features.insert(columns::AGE, f64::from(submission.age));
    features.insert(columns::DEPENDENTS, f64::from(submission.dependents.count()));
    features.insert(columns::EXISTING_LOANS, f64::from(submission.existing_loans));
    features.insert(columns::SAVINGS, f64::from(submission.savings));
    features.insert(columns::COLLATERAL_VALUE, DEFAULT_COLLATERAL_VALUE);
    features.insert(columns::LOAN_AMOUNT, f64::from(submission.loan_amount));
    features.insert(columns::LOAN_TERM, f64::from(submission.loan_term));
    features.insert(columns::CREDIT_SCORE, f64::from(submission.credit_score));
    features.insert(columns::DTI_RATIO, DEFAULT_DTI_RATIO);

    features.insert(columns::GENDER, gender_flag(submission.gender));
    features.insert(
        columns::MARITAL_STATUS,
        marital_flag(submission.marital_status),
    );
    features.insert(columns::EDUCATION_LEVEL, education_flag(submission.education));

    for (field, selected) in ONE_HOT_FIELDS.iter().zip(selected_labels(submission)) {
        for (category, column) in field.indicators {
            let flag = if *category == selected { 1.0 } else { 0.0 };
            features.insert(*column, flag);
        }
    }

    let dti_ratio = DEFAULT_DTI_RATIO;
    let credit_score = f64::from(submission.credit_score);
    features.insert(columns::DTI_RATIO_SQUARED, dti_ratio.powi(2));
    features.insert(columns::CREDIT_SCORE_SQUARED, credit_score.powi(2));
    features.insert(
        columns::APPLICANT_INCOME_LOG,
        f64::from(submission.applicant_income).ln_1p(),
    );

    features
}

/// Drop the superseded raw columns, then reindex onto the training schema.
pub fn align(mut features: FeatureVector, schema: &TrainingSchema) -> AlignedFeatures<'_> {
    for raw in columns::SUPERSEDED {
        features.remove(raw);
    }
    schema.reindex(&features)
}

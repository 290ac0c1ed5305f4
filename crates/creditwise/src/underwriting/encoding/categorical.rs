use super::super::domain::{ApplicantSubmission, EducationLevel, Gender, MaritalStatus};

pub(crate) fn gender_flag(gender: Gender) -> f64 {
    match gender {
        Gender::Male => 1.0,
        Gender::Female => 0.0,
    }
}

pub(crate) fn marital_flag(status: MaritalStatus) -> f64 {
    match status {
        MaritalStatus::Married => 1.0,
        MaritalStatus::Single => 0.0,
    }
}

pub(crate) fn education_flag(level: EducationLevel) -> f64 {
    match level {
        EducationLevel::Graduate => 1.0,
        EducationLevel::NotGraduate => 0.0,
    }
}

/// Drop-first indicator layout for one multi-valued form field.
///
/// `indicators` lists `(category label, column name)` for every value except `baseline`,
/// so an N-valued field always contributes exactly N-1 columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneHotField {
    pub field: &'static str,
    pub baseline: &'static str,
    pub indicators: &'static [(&'static str, &'static str)],
}

impl OneHotField {
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.indicators.iter().map(|(_, column)| *column)
    }

    /// Column name set for `label`, or `None` for the baseline category.
    pub fn column_for(&self, label: &str) -> Option<&'static str> {
        self.indicators
            .iter()
            .find(|(category, _)| *category == label)
            .map(|(_, column)| *column)
    }
}

pub const EMPLOYER_CATEGORY: OneHotField = OneHotField {
    field: "Employer_Category",
    baseline: "Private",
    indicators: &[
        ("Government", "Employer_Category_Government"),
        ("MNC", "Employer_Category_MNC"),
        ("Business", "Employer_Category_Business"),
    ],
};

pub const LOAN_PURPOSE: OneHotField = OneHotField {
    field: "Loan_Purpose",
    baseline: "Home",
    indicators: &[
        ("Car", "Loan_Purpose_Car"),
        ("Personal", "Loan_Purpose_Personal"),
        ("Education", "Loan_Purpose_Education"),
    ],
};

pub const PROPERTY_AREA: OneHotField = OneHotField {
    field: "Property_Area",
    baseline: "Urban",
    indicators: &[
        ("Semiurban", "Property_Area_Semiurban"),
        ("Rural", "Property_Area_Rural"),
    ],
};

pub const EMPLOYMENT_STATUS: OneHotField = OneHotField {
    field: "Employment_Status",
    baseline: "Salaried",
    indicators: &[
        ("Self-employed", "Employment_Status_Self-employed"),
        ("Unemployed", "Employment_Status_Unemployed"),
    ],
};

/// Expansion order matches the column order used when the model was trained.
pub const ONE_HOT_FIELDS: [OneHotField; 4] = [
    EMPLOYER_CATEGORY,
    LOAN_PURPOSE,
    PROPERTY_AREA,
    EMPLOYMENT_STATUS,
];

pub(crate) fn selected_labels(submission: &ApplicantSubmission) -> [&'static str; 4] {
    [
        submission.employer_category.label(),
        submission.loan_purpose.label(),
        submission.property_area.label(),
        submission.employment_status.label(),
    ]
}

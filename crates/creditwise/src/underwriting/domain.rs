use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Error raised when a form label does not name a known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} value '{value}' (expected one of: {expected})")]
pub struct ParseCategoryError {
    pub field: &'static str,
    pub value: String,
    pub expected: String,
}

macro_rules! form_category {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $( $variant:ident => $label:literal $(, alias = $alias:literal)? ; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label $(, alias = $alias)?)]
                $variant,
            )+
        }

        impl $name {
            /// Every value in canonical form order; the first entry is the encoding baseline.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = ParseCategoryError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let trimmed = raw.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($label)
                        $(|| trimmed.eq_ignore_ascii_case($alias))?
                    {
                        return Ok($name::$variant);
                    }
                )+
                Err(ParseCategoryError {
                    field: $field,
                    value: raw.to_string(),
                    expected: [$($label),+].join(", "),
                })
            }
        }
    };
}

form_category! {
    Gender, "gender" {
        Male => "Male";
        Female => "Female";
    }
}

form_category! {
    MaritalStatus, "marital_status" {
        Single => "Single";
        Married => "Married";
    }
}

form_category! {
    EducationLevel, "education" {
        Graduate => "Graduate";
        NotGraduate => "Not Graduate", alias = "NotGraduate";
    }
}

form_category! {
    EmploymentStatus, "employment_status" {
        Salaried => "Salaried";
        SelfEmployed => "Self-employed", alias = "SelfEmployed";
        Unemployed => "Unemployed";
    }
}

form_category! {
    EmployerCategory, "employer_category" {
        Private => "Private";
        Government => "Government";
        Mnc => "MNC";
        Business => "Business";
    }
}

form_category! {
    LoanPurpose, "loan_purpose" {
        Home => "Home";
        Car => "Car";
        Personal => "Personal";
        Education => "Education";
    }
}

form_category! {
    PropertyArea, "property_area" {
        Urban => "Urban";
        Semiurban => "Semiurban";
        Rural => "Rural";
    }
}

/// Number of dependents; the form's "3+" choice collapses to 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Dependents(u8);

impl Dependents {
    pub const MAX: u8 = 3;

    pub const fn new(count: u8) -> Self {
        Self(count)
    }

    pub const fn count(self) -> u8 {
        self.0
    }
}

impl FromStr for Dependents {
    type Err = ParseCategoryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed == "3+" {
            return Ok(Self(Self::MAX));
        }
        trimmed.parse::<u8>().map(Self).map_err(|_| ParseCategoryError {
            field: "dependents",
            value: raw.to_string(),
            expected: "0, 1, 2, 3+".to_string(),
        })
    }
}

impl<'de> Deserialize<'de> for Dependents {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum DependentsInput {
            Count(u8),
            Label(String),
        }

        match DependentsInput::deserialize(deserializer)? {
            DependentsInput::Count(count) => Ok(Self(count)),
            DependentsInput::Label(label) => label.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// One applicant's form submission. Lives for a single assessment and is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantSubmission {
    pub gender: Gender,
    pub age: u8,
    pub marital_status: MaritalStatus,
    pub education: EducationLevel,
    pub dependents: Dependents,
    pub applicant_income: u32,
    pub coapplicant_income: u32,
    pub savings: u32,
    pub employment_status: EmploymentStatus,
    pub employer_category: EmployerCategory,
    pub loan_amount: u32,
    pub loan_term: u16,
    pub credit_score: u16,
    pub loan_purpose: LoanPurpose,
    pub property_area: PropertyArea,
    pub existing_loans: u8,
}

impl Default for ApplicantSubmission {
    /// The intake form's pre-selected values.
    fn default() -> Self {
        Self {
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
}

/// Final decision rendered for an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Approved,
    Rejected,
}

impl Verdict {
    pub const fn label(self) -> &'static str {
        match self {
            Verdict::Approved => "approved",
            Verdict::Rejected => "rejected",
        }
    }

    pub const fn headline(self) -> &'static str {
        match self {
            Verdict::Approved => "APPROVED",
            Verdict::Rejected => "REJECTED",
        }
    }
}

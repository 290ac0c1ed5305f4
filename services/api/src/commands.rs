use crate::cli::ArtifactArgs;
use crate::infra::{load_service, resolve_artifacts};
use chrono::Local;
use clap::Args;
use creditwise::error::AppError;
use creditwise::underwriting::{
    align, encode, ApplicantSubmission, AssessmentReport, BatchAssessor, BatchRowStatus,
    Dependents, EducationLevel, EmployerCategory, EmploymentStatus, Gender, LoanPurpose,
    MaritalStatus, PropertyArea, Verdict,
};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
    /// Read the submission from a JSON file; the field flags are ignored
    #[arg(long)]
    pub(crate) json: Option<PathBuf>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) emit_json: bool,
    #[arg(long, default_value = "Male")]
    pub(crate) gender: Gender,
    #[arg(long, default_value_t = 28)]
    pub(crate) age: u8,
    #[arg(long, default_value = "Single")]
    pub(crate) marital_status: MaritalStatus,
    #[arg(long, default_value = "Graduate")]
    pub(crate) education: EducationLevel,
    /// 0, 1, 2 or 3+
    #[arg(long, default_value = "0")]
    pub(crate) dependents: Dependents,
    #[arg(long, default_value_t = 5000)]
    pub(crate) applicant_income: u32,
    #[arg(long, default_value_t = 0)]
    pub(crate) coapplicant_income: u32,
    #[arg(long, default_value_t = 15000)]
    pub(crate) savings: u32,
    #[arg(long, default_value = "Salaried")]
    pub(crate) employment_status: EmploymentStatus,
    #[arg(long, default_value = "Private")]
    pub(crate) employer_category: EmployerCategory,
    #[arg(long, default_value_t = 120000)]
    pub(crate) loan_amount: u32,
    /// Term in months
    #[arg(long, default_value_t = 360)]
    pub(crate) loan_term: u16,
    #[arg(long, default_value_t = 720)]
    pub(crate) credit_score: u16,
    #[arg(long, default_value = "Home")]
    pub(crate) loan_purpose: LoanPurpose,
    #[arg(long, default_value = "Urban")]
    pub(crate) property_area: PropertyArea,
    #[arg(long, default_value_t = 0)]
    pub(crate) existing_loans: u8,
}

impl AssessArgs {
    pub(crate) fn submission(&self) -> ApplicantSubmission {
        ApplicantSubmission {
            gender: self.gender,
            age: self.age,
            marital_status: self.marital_status,
            education: self.education,
            dependents: self.dependents,
            applicant_income: self.applicant_income,
            coapplicant_income: self.coapplicant_income,
            savings: self.savings,
            employment_status: self.employment_status,
            employer_category: self.employer_category,
            loan_amount: self.loan_amount,
            loan_term: self.loan_term,
            credit_score: self.credit_score,
            loan_purpose: self.loan_purpose,
            property_area: self.property_area,
            existing_loans: self.existing_loans,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
    /// CSV file with one application per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Print per-row outcomes as JSON instead of text
    #[arg(long)]
    pub(crate) emit_json: bool,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let submission = match &args.json {
        Some(path) => read_submission(path)?,
        None => args.submission(),
    };
    let service = load_service(resolve_artifacts(&args.artifacts)?)?;
    let report = service.assess(&submission)?;

    if args.emit_json {
        print_json(&report)?;
    } else {
        print_report(&report);
    }
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let service = load_service(resolve_artifacts(&args.artifacts)?)?;
    let summary = BatchAssessor::from_path(&args.csv, &service)?;

    if args.emit_json {
        return print_json(&summary.outcomes);
    }

    println!("Batch assessment: {}", args.csv.display());
    for outcome in &summary.outcomes {
        match &outcome.status {
            BatchRowStatus::Assessed {
                verdict,
                reported_score,
                ..
            } => println!(
                "  row {:>4}  {:<8}  {:.1}%",
                outcome.row,
                verdict.headline(),
                reported_score * 100.0
            ),
            BatchRowStatus::Failed { reason } => {
                println!("  row {:>4}  FAILED    {}", outcome.row, reason)
            }
        }
    }
    println!(
        "\nApproved: {}  Rejected: {}  Failed: {}",
        summary.count_verdict(Verdict::Approved),
        summary.count_verdict(Verdict::Rejected),
        summary.failed()
    );
    Ok(())
}

pub(crate) fn run_schema(args: ArtifactArgs) -> Result<(), AppError> {
    let service = load_service(resolve_artifacts(&args)?)?;
    let schema = service.schema();

    println!("Training schema ({} columns)", schema.width());
    for (position, column) in schema.columns().iter().enumerate() {
        println!("  {:>2}  {}", position, column);
    }
    Ok(())
}

pub(crate) fn run_demo(args: ArtifactArgs) -> Result<(), AppError> {
    let service = load_service(resolve_artifacts(&args)?)?;
    let submission = ApplicantSubmission::default();

    println!("CreditWise assessment demo");
    println!("Run at: {}", Local::now().format("%Y-%m-%d %H:%M"));
    println!(
        "Applicant: {} {}, age {}, {}, {} dependents",
        submission.marital_status,
        submission.gender,
        submission.age,
        submission.education,
        submission.dependents.count()
    );
    println!(
        "Employment: {} ({}), income ${} + ${} co-applicant, savings ${}",
        submission.employment_status,
        submission.employer_category,
        submission.applicant_income,
        submission.coapplicant_income,
        submission.savings
    );
    println!(
        "Loan: ${} over {} months for {} ({}), credit score {}, {} existing loans",
        submission.loan_amount,
        submission.loan_term,
        submission.loan_purpose,
        submission.property_area,
        submission.credit_score,
        submission.existing_loans
    );

    let features = encode(&submission);
    println!("\nEncoded features ({})", features.len());
    for (name, value) in features.iter() {
        println!("  {:<34} {}", name, value);
    }

    let aligned = align(features, service.schema());
    println!(
        "\nAligned to {} training columns ({} non-zero)",
        aligned.values().len(),
        aligned.values().iter().filter(|value| **value != 0.0).count()
    );

    println!();
    let report = service.assess(&submission)?;
    print_report(&report);
    Ok(())
}

fn read_submission(path: &Path) -> Result<ApplicantSubmission, AppError> {
    let raw = std::fs::read(path)?;
    serde_json::from_slice(&raw).map_err(|err| AppError::Io(err.into()))
}

fn print_report(report: &AssessmentReport) {
    println!("{}", report.render());
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value).map_err(|err| AppError::Io(err.into()))?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_submission_accepts_form_labels() {
        let path = std::env::temp_dir().join(format!(
            "creditwise-cli-submission-{}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"{
                "gender": "Female", "age": 44, "marital_status": "Married",
                "education": "Not Graduate", "dependents": "3+", "applicant_income": 6400,
                "coapplicant_income": 1200, "savings": 30000, "employment_status": "Self-employed",
                "employer_category": "Business", "loan_amount": 80000, "loan_term": 120,
                "credit_score": 690, "loan_purpose": "Education", "property_area": "Rural",
                "existing_loans": 2
            }"#,
        )
        .expect("write submission");

        let submission = read_submission(&path).expect("submission parses");

        assert_eq!(submission.education, EducationLevel::NotGraduate);
        assert_eq!(submission.dependents.count(), 3);
        assert_eq!(submission.property_area, PropertyArea::Rural);
    }

    #[test]
    fn malformed_json_submission_is_reported() {
        let path = std::env::temp_dir().join(format!(
            "creditwise-cli-malformed-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"gender": "Male"}"#).expect("write submission");

        assert!(matches!(read_submission(&path), Err(AppError::Io(_))));
    }
}

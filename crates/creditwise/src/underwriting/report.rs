use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{ApplicantSubmission, Verdict};
use super::pipeline::InferenceResult;

/// Presentation-ready summary of one assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentReport {
    pub verdict: Verdict,
    pub headline: &'static str,
    pub probability_of_approval: f64,
    pub score_label: &'static str,
    pub reported_score: f64,
    pub score_display: String,
    pub recommendation: &'static str,
    pub estimated_monthly_installment: f64,
    pub assessed_at: DateTime<Utc>,
}

impl AssessmentReport {
    pub fn new(
        submission: &ApplicantSubmission,
        result: &InferenceResult,
        assessed_at: DateTime<Utc>,
    ) -> Self {
        let (score_label, recommendation) = match result.verdict {
            Verdict::Approved => ("Probability", "The system recommends approving this loan."),
            Verdict::Rejected => (
                "Risk Score",
                "High risk factors detected. Manual review required.",
            ),
        };
        let reported_score = result.reported_score();

        Self {
            verdict: result.verdict,
            headline: result.verdict.headline(),
            probability_of_approval: result.probability_of_approval,
            score_label,
            reported_score,
            score_display: format_percent(reported_score),
            recommendation,
            estimated_monthly_installment: estimated_monthly_installment(submission),
            assessed_at,
        }
    }

    /// Multi-line terminal rendering.
    pub fn render(&self) -> String {
        format!(
            "{}\n{}: {}\n{}\nEstimated EMI: ${:.0} /mo",
            self.headline,
            self.score_label,
            self.score_display,
            self.recommendation,
            self.estimated_monthly_installment
        )
    }
}

/// Naive installment estimate shown next to the loan fields: amount over term.
pub fn estimated_monthly_installment(submission: &ApplicantSubmission) -> f64 {
    f64::from(submission.loan_amount) / f64::from(submission.loan_term.max(1))
}

pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn assessed_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn approved_report_shows_probability() {
        let result = InferenceResult {
            verdict: Verdict::Approved,
            probability_of_approval: 0.873,
        };

        let report = AssessmentReport::new(&ApplicantSubmission::default(), &result, assessed_at());

        assert_eq!(report.headline, "APPROVED");
        assert_eq!(report.score_label, "Probability");
        assert_eq!(report.score_display, "87.3%");
        assert!(report.recommendation.contains("approving"));
        let rendered = report.render();
        assert!(rendered.starts_with("APPROVED\nProbability: 87.3%"));
        assert!(rendered.ends_with("Estimated EMI: $333 /mo"));
    }

    #[test]
    fn rejected_report_shows_risk_score() {
        let result = InferenceResult {
            verdict: Verdict::Rejected,
            probability_of_approval: 0.25,
        };

        let report = AssessmentReport::new(&ApplicantSubmission::default(), &result, assessed_at());

        assert_eq!(report.headline, "REJECTED");
        assert_eq!(report.score_label, "Risk Score");
        assert_eq!(report.reported_score, 0.75);
        assert_eq!(report.score_display, "75.0%");
        assert!(report.recommendation.contains("Manual review"));
    }

    #[test]
    fn installment_divides_amount_by_term() {
        let mut submission = ApplicantSubmission::default();
        submission.loan_amount = 60_000;
        submission.loan_term = 12;
        assert_eq!(estimated_monthly_installment(&submission), 5_000.0);
    }
}

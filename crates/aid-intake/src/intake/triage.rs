use chrono::{DateTime, Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{ApplicationInput, ReviewTier, TriageResult};
use super::ssn;

pub const FLAG_AMOUNT_ABOVE_THRESHOLD: &str = "Amount requested above threshold";
pub const FLAG_UNDER_18: &str = "Applicant under 18";
pub const FLAG_UNUSUAL_SSN: &str = "Invalid or unusual SSN pattern";

/// Thresholds backing the triage rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Amounts strictly above this value require manual review.
    pub amount_threshold: f64,
    pub minimum_age: i32,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            amount_threshold: 1000.0,
            minimum_age: 18,
        }
    }
}

/// Stateless rule set assigning a review tier. Flags are fixed strings and never carry
/// field values.
#[derive(Debug, Clone, Default)]
pub struct TriageEngine {
    config: TriageConfig,
}

impl TriageEngine {
    pub fn new(config: TriageConfig) -> Self {
        Self { config }
    }

    pub fn triage(&self, input: &ApplicationInput) -> TriageResult {
        self.triage_on(input, Local::now().date_naive())
    }

    /// Evaluate the rules as of `today`.
    pub fn triage_on(&self, input: &ApplicationInput, today: NaiveDate) -> TriageResult {
        let mut risk_flags = Vec::new();

        if input.amount_requested > self.config.amount_threshold {
            risk_flags.push(FLAG_AMOUNT_ABOVE_THRESHOLD.to_string());
        }

        match age_on(&input.date_of_birth, today) {
            Some(age) if age < self.config.minimum_age => {
                risk_flags.push(FLAG_UNDER_18.to_string());
            }
            Some(_) => {}
            None => debug!("date of birth did not parse; age rule skipped"),
        }

        if ssn::is_unusual(&input.ssn) {
            risk_flags.push(FLAG_UNUSUAL_SSN.to_string());
        }

        let review_tier = if risk_flags.is_empty() {
            ReviewTier::Standard
        } else {
            ReviewTier::ManualReview
        };

        TriageResult {
            review_tier,
            risk_flags,
        }
    }
}

/// Whole years elapsed between the birth date and `today`.
pub(crate) fn age_on(date_of_birth: &str, today: NaiveDate) -> Option<i32> {
    let born = parse_birth_date(date_of_birth)?;

    let mut age = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        age -= 1;
    }
    Some(age)
}

fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

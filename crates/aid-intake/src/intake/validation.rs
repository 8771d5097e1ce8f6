use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::domain::ApplicationInput;
use super::ssn;
use crate::config::IntakeConfig;

/// Aggregated validation errors for a rejected submission.
///
/// `errors` keeps every message in the order it was raised; `field_errors` keeps only the
/// first message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("submission failed validation with {} error(s)", .errors.len())]
pub struct ValidationFailure {
    pub errors: Vec<String>,
    pub field_errors: BTreeMap<String, String>,
}

impl ValidationFailure {
    fn record(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        self.field_errors
            .entry(field.to_string())
            .or_insert_with(|| message.clone());
        self.errors.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Names of the offending fields, safe to log.
    pub fn fields(&self) -> Vec<&str> {
        self.field_errors.keys().map(String::as_str).collect()
    }
}

/// Turns an untrusted JSON body into a normalized `ApplicationInput`.
#[derive(Debug, Clone)]
pub struct Validator {
    state_codes: BTreeSet<String>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(&IntakeConfig::default())
    }
}

impl Validator {
    pub fn new(config: &IntakeConfig) -> Self {
        Self {
            state_codes: config.state_codes.clone(),
        }
    }

    /// Validate every field, collecting all failures before returning.
    pub fn validate(&self, body: &Value) -> Result<ApplicationInput, ValidationFailure> {
        let Some(payload) = body.as_object() else {
            return Err(ValidationFailure {
                errors: vec!["Request body must be a JSON object.".to_string()],
                field_errors: BTreeMap::new(),
            });
        };

        let mut fields = FieldReader {
            payload,
            failure: ValidationFailure::default(),
        };

        let first_name = fields.string("firstName", true);
        let last_name = fields.string("lastName", true);
        let email = fields.string("email", true);
        let phone = fields.string("phone", true);
        let date_of_birth = fields.string("dateOfBirth", true);
        let ssn = fields.string("ssn", true);
        let address_line1 = fields.string("addressLine1", true);
        let address_line2 = fields.string("addressLine2", false);
        let city = fields.string("city", true);
        let state = fields.string("state", true);
        let zip_code = fields.string("zipCode", true);
        let program_name = fields.string("programName", true);
        let amount_requested = fields.number("amountRequested");
        let agreement = fields.boolean("agreement");

        let mut failure = fields.failure;

        if first_name.is_empty() {
            failure.record("firstName", "First name is required.");
        }
        if last_name.is_empty() {
            failure.record("lastName", "Last name is required.");
        }
        if email.is_empty() {
            failure.record("email", "Email is required.");
        } else if !is_email_shaped(&email) {
            failure.record("email", "Email must be a valid format.");
        }
        if phone.is_empty() {
            failure.record("phone", "Phone is required.");
        }
        if date_of_birth.is_empty() {
            failure.record("dateOfBirth", "Date of birth is required.");
        }
        if ssn.is_empty() {
            failure.record("ssn", "SSN is required.");
        } else if !ssn::has_nine_digits(&ssn) {
            failure.record("ssn", "SSN must be 9 digits (dashes allowed).");
        }
        if address_line1.is_empty() {
            failure.record("addressLine1", "Address line 1 is required.");
        }
        if city.is_empty() {
            failure.record("city", "City is required.");
        }

        let state = state.to_uppercase();
        if state.chars().count() != 2 || !self.state_codes.contains(&state) {
            failure.record("state", "State must be a 2-letter US state code.");
        }

        let zip_code: String = zip_code.chars().filter(|c| !c.is_whitespace()).collect();
        if zip_code.is_empty() {
            failure.record("zipCode", "ZIP code is required.");
        } else if !is_zip_shaped(&zip_code) {
            failure.record(
                "zipCode",
                "ZIP must be 5 or 9 digits (e.g. 12345 or 12345-6789).",
            );
        }

        if program_name.is_empty() {
            failure.record("programName", "Program name is required.");
        }
        if amount_requested < 0.0 {
            failure.record(
                "amountRequested",
                "Amount requested must be a non-negative number.",
            );
        }
        if !agreement {
            failure.record("agreement", "You must agree to the terms.");
        }

        if !failure.is_empty() {
            return Err(failure);
        }

        Ok(ApplicationInput {
            first_name,
            last_name,
            email,
            phone,
            date_of_birth,
            ssn,
            address_line1,
            address_line2: Some(address_line2).filter(|line| !line.is_empty()),
            city,
            state,
            zip_code,
            program_name,
            amount_requested,
            agreement,
        })
    }
}

/// Typed accessors over the raw payload that record coercion failures as they go.
struct FieldReader<'a> {
    payload: &'a Map<String, Value>,
    failure: ValidationFailure,
}

impl FieldReader<'_> {
    fn string(&mut self, key: &str, required: bool) -> String {
        match self.payload.get(key) {
            Some(Value::String(value)) => value.trim().to_string(),
            _ => {
                if required {
                    self.failure
                        .record(key, format!("{key} is required and must be a string."));
                }
                String::new()
            }
        }
    }

    fn number(&mut self, key: &str) -> f64 {
        let parsed = match self.payload.get(key) {
            Some(Value::Number(number)) => number.as_f64(),
            Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
            _ => None,
        };

        match parsed.filter(|value| value.is_finite()) {
            Some(value) => value,
            None => {
                self.failure.record(key, format!("{key} must be a number."));
                0.0
            }
        }
    }

    fn boolean(&mut self, key: &str) -> bool {
        match self.payload.get(key) {
            Some(Value::Bool(value)) => *value,
            Some(Value::String(raw)) if raw == "true" => true,
            Some(Value::String(raw)) if raw == "false" => false,
            _ => {
                self.failure
                    .record(key, format!("{key} must be true or false."));
                false
            }
        }
    }
}

/// `local@domain.tld`: one `@`, no whitespace, and a dot inside the domain with text on
/// both sides.
fn is_email_shaped(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    if local.is_empty() {
        return false;
    }

    domain
        .char_indices()
        .any(|(index, c)| c == '.' && index > 0 && index + 1 < domain.len())
}

/// Five digits, optionally followed by a hyphen and four more.
fn is_zip_shaped(value: &str) -> bool {
    let all_digits = |part: &str, len: usize| {
        part.len() == len && part.chars().all(|c| c.is_ascii_digit())
    };

    match value.split_once('-') {
        Some((head, tail)) => all_digits(head, 5) && all_digits(tail, 4),
        None => all_digits(value, 5),
    }
}

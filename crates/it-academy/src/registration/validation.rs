use std::sync::LazyLock;

use regex::Regex;

use super::domain::{ErrorSet, FieldName, RegistrationDraft};
use super::steps::StepDefinition;

pub const PHONE_DIGITS: usize = 10;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Keep ASCII digits only, capped at ten.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(PHONE_DIGITS)
        .collect()
}

pub fn is_valid_phone(phone: &str) -> bool {
    phone.chars().filter(char::is_ascii_digit).count() == PHONE_DIGITS
}

/// Compute the errors for the fields owned by `step`.
pub fn validate_fields(draft: &RegistrationDraft, step: &StepDefinition) -> ErrorSet {
    let mut errors = ErrorSet::new();
    for field in step.fields {
        if let Some(message) = field_error(draft, *field) {
            errors.insert(*field, message);
        }
    }
    errors
}

fn field_error(draft: &RegistrationDraft, field: FieldName) -> Option<&'static str> {
    match field {
        FieldName::FullName if draft.full_name.trim().is_empty() => Some("Full name is required"),
        FieldName::Email if draft.email.is_empty() => Some("Email is required"),
        FieldName::Email if !is_valid_email(&draft.email) => {
            Some("Please enter a valid email address")
        }
        FieldName::Phone if draft.phone.is_empty() => Some("Phone number is required"),
        FieldName::Phone if !is_valid_phone(&draft.phone) => {
            Some("Phone number must be exactly 10 digits")
        }
        FieldName::CourseInterest if draft.course_interest.is_none() => {
            Some("Please select a course")
        }
        FieldName::ExperienceLevel if draft.experience_level.is_none() => {
            Some("Please select your experience level")
        }
        FieldName::EducationLevel if draft.education_level.is_none() => {
            Some("Please select your education level")
        }
        FieldName::AgreeTerms if !draft.agree_terms => {
            Some("You must agree to the terms and conditions")
        }
        _ => None,
    }
}

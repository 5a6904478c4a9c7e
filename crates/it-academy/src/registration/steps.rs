use serde::Serialize;

use super::domain::FieldName;

/// One page of the registration wizard and the fields it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepDefinition {
    pub label: &'static str,
    pub fields: &'static [FieldName],
}

pub const FORM_STEPS: [StepDefinition; 4] = [
    StepDefinition {
        label: "Personal Info",
        fields: &[FieldName::FullName, FieldName::Email, FieldName::Phone],
    },
    StepDefinition {
        label: "Course Selection",
        fields: &[FieldName::CourseInterest, FieldName::ExperienceLevel],
    },
    StepDefinition {
        label: "Background",
        fields: &[FieldName::EducationLevel, FieldName::HearAboutUs],
    },
    StepDefinition {
        label: "Final Step",
        fields: &[FieldName::AgreeTerms],
    },
];

pub const LAST_STEP: usize = FORM_STEPS.len() - 1;

pub fn step(index: usize) -> Option<&'static StepDefinition> {
    FORM_STEPS.get(index)
}

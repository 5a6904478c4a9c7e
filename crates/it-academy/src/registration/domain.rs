use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Form fields addressable through the wizard, named as the browser posts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    FullName,
    Email,
    Phone,
    CourseInterest,
    ExperienceLevel,
    EducationLevel,
    HearAboutUs,
    AgreeTerms,
}

impl FieldName {
    pub const ALL: [FieldName; 8] = [
        FieldName::FullName,
        FieldName::Email,
        FieldName::Phone,
        FieldName::CourseInterest,
        FieldName::ExperienceLevel,
        FieldName::EducationLevel,
        FieldName::HearAboutUs,
        FieldName::AgreeTerms,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::FullName => "fullName",
            FieldName::Email => "email",
            FieldName::Phone => "phone",
            FieldName::CourseInterest => "courseInterest",
            FieldName::ExperienceLevel => "experienceLevel",
            FieldName::EducationLevel => "educationLevel",
            FieldName::HearAboutUs => "hearAboutUs",
            FieldName::AgreeTerms => "agreeTerms",
        }
    }

    /// Human label shown next to the input and in notification e-mails.
    pub fn label(self) -> &'static str {
        match self {
            FieldName::FullName => "Full Name",
            FieldName::Email => "Email Address",
            FieldName::Phone => "Phone Number",
            FieldName::CourseInterest => "Course Interest",
            FieldName::ExperienceLevel => "Experience Level",
            FieldName::EducationLevel => "Education Level",
            FieldName::HearAboutUs => "How did you hear about us?",
            FieldName::AgreeTerms => "Terms and Conditions",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = UnknownField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        FieldName::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| UnknownField(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown registration field '{0}'")]
pub struct UnknownField(pub String);

/// Course tracks a visitor can register interest in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseInterest {
    #[serde(rename = "web-development")]
    WebDevelopment,
    #[serde(rename = "data-science")]
    DataScience,
    #[serde(rename = "cybersecurity")]
    Cybersecurity,
    #[serde(rename = "cloud-computing")]
    CloudComputing,
    #[serde(rename = "ai-ml")]
    AiMl,
    #[serde(rename = "mobile-development")]
    MobileDevelopment,
}

impl CourseInterest {
    pub const ALL: [CourseInterest; 6] = [
        CourseInterest::WebDevelopment,
        CourseInterest::DataScience,
        CourseInterest::Cybersecurity,
        CourseInterest::CloudComputing,
        CourseInterest::AiMl,
        CourseInterest::MobileDevelopment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CourseInterest::WebDevelopment => "web-development",
            CourseInterest::DataScience => "data-science",
            CourseInterest::Cybersecurity => "cybersecurity",
            CourseInterest::CloudComputing => "cloud-computing",
            CourseInterest::AiMl => "ai-ml",
            CourseInterest::MobileDevelopment => "mobile-development",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CourseInterest::WebDevelopment => "Web Development",
            CourseInterest::DataScience => "Data Science",
            CourseInterest::Cybersecurity => "Cybersecurity",
            CourseInterest::CloudComputing => "Cloud Computing",
            CourseInterest::AiMl => "AI & Machine Learning",
            CourseInterest::MobileDevelopment => "Mobile Development",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EducationLevel {
    #[serde(rename = "high school")]
    HighSchool,
    #[serde(rename = "bachelor")]
    Bachelor,
    #[serde(rename = "master")]
    Master,
    #[serde(rename = "other")]
    Other,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 4] = [
        EducationLevel::HighSchool,
        EducationLevel::Bachelor,
        EducationLevel::Master,
        EducationLevel::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EducationLevel::HighSchool => "high school",
            EducationLevel::Bachelor => "bachelor",
            EducationLevel::Master => "master",
            EducationLevel::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EducationLevel::HighSchool => "High School",
            EducationLevel::Bachelor => "Bachelor",
            EducationLevel::Master => "Master",
            EducationLevel::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 3] = [
        ExperienceLevel::Beginner,
        ExperienceLevel::Intermediate,
        ExperienceLevel::Advanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Beginner",
            ExperienceLevel::Intermediate => "Intermediate",
            ExperienceLevel::Advanced => "Advanced",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.as_str() == value)
    }
}

/// Optional marketing attribution captured in the background step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferralSource {
    #[serde(rename = "social-media")]
    SocialMedia,
    #[serde(rename = "friend")]
    Friend,
    #[serde(rename = "search-engine")]
    SearchEngine,
    #[serde(rename = "advertisement")]
    Advertisement,
    #[serde(rename = "other")]
    Other,
}

impl ReferralSource {
    pub const ALL: [ReferralSource; 5] = [
        ReferralSource::SocialMedia,
        ReferralSource::Friend,
        ReferralSource::SearchEngine,
        ReferralSource::Advertisement,
        ReferralSource::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReferralSource::SocialMedia => "social-media",
            ReferralSource::Friend => "friend",
            ReferralSource::SearchEngine => "search-engine",
            ReferralSource::Advertisement => "advertisement",
            ReferralSource::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReferralSource::SocialMedia => "Social Media",
            ReferralSource::Friend => "Friend/Family",
            ReferralSource::SearchEngine => "Search Engine",
            ReferralSource::Advertisement => "Advertisement",
            ReferralSource::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.as_str() == value)
    }
}

/// In-progress record of everything the visitor has typed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDraft {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub course_interest: Option<CourseInterest>,
    pub education_level: Option<EducationLevel>,
    pub experience_level: Option<ExperienceLevel>,
    pub hear_about_us: Option<ReferralSource>,
    pub agree_terms: bool,
}

impl RegistrationDraft {
    /// Display value for a field as it appears in notifications; empty when unset.
    pub fn display_value(&self, field: FieldName) -> String {
        match field {
            FieldName::FullName => self.full_name.clone(),
            FieldName::Email => self.email.clone(),
            FieldName::Phone => self.phone.clone(),
            FieldName::CourseInterest => self
                .course_interest
                .map(CourseInterest::label)
                .unwrap_or_default()
                .to_string(),
            FieldName::ExperienceLevel => self
                .experience_level
                .map(ExperienceLevel::label)
                .unwrap_or_default()
                .to_string(),
            FieldName::EducationLevel => self
                .education_level
                .map(EducationLevel::label)
                .unwrap_or_default()
                .to_string(),
            FieldName::HearAboutUs => self
                .hear_about_us
                .map(ReferralSource::label)
                .unwrap_or_default()
                .to_string(),
            FieldName::AgreeTerms => if self.agree_terms { "Yes" } else { "No" }.to_string(),
        }
    }
}

/// Raw value posted for a single field: checkboxes send booleans, everything else text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

/// Per-field validation messages. A missing key means the field is currently valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorSet(BTreeMap<FieldName, String>);

impl ErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FieldName, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: FieldName) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

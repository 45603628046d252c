//! User context value object and its fields.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Demographic and lifestyle attributes collected before the questionnaire.
///
/// Every field is a raw string (free text or an encoded categorical choice);
/// interpretation is left to the inference service. Serialized with the
/// camelCase names the service expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub age: String,
    pub gender: String,
    pub height: String,
    pub weight: String,
    pub ethnicity: String,
    pub concerns: String,
    // Lifestyle
    pub smoking: String,
    pub alcohol: String,
    pub activity: String,
    pub sleep: String,
    // Medical history
    pub family_history: String,
    pub conditions: String,
    pub medications: String,
    // Mental health
    pub stress: String,
    pub mental_health: String,
    pub social_support: String,
}

impl UserContext {
    /// Returns the value stored for a field.
    pub fn get(&self, field: ContextField) -> &str {
        match field {
            ContextField::Age => &self.age,
            ContextField::Gender => &self.gender,
            ContextField::Height => &self.height,
            ContextField::Weight => &self.weight,
            ContextField::Ethnicity => &self.ethnicity,
            ContextField::Concerns => &self.concerns,
            ContextField::Smoking => &self.smoking,
            ContextField::Alcohol => &self.alcohol,
            ContextField::Activity => &self.activity,
            ContextField::Sleep => &self.sleep,
            ContextField::FamilyHistory => &self.family_history,
            ContextField::Conditions => &self.conditions,
            ContextField::Medications => &self.medications,
            ContextField::Stress => &self.stress,
            ContextField::MentalHealth => &self.mental_health,
            ContextField::SocialSupport => &self.social_support,
        }
    }

    /// Overwrites the value stored for a field.
    pub fn set(&mut self, field: ContextField, value: impl Into<String>) {
        let slot = match field {
            ContextField::Age => &mut self.age,
            ContextField::Gender => &mut self.gender,
            ContextField::Height => &mut self.height,
            ContextField::Weight => &mut self.weight,
            ContextField::Ethnicity => &mut self.ethnicity,
            ContextField::Concerns => &mut self.concerns,
            ContextField::Smoking => &mut self.smoking,
            ContextField::Alcohol => &mut self.alcohol,
            ContextField::Activity => &mut self.activity,
            ContextField::Sleep => &mut self.sleep,
            ContextField::FamilyHistory => &mut self.family_history,
            ContextField::Conditions => &mut self.conditions,
            ContextField::Medications => &mut self.medications,
            ContextField::Stress => &mut self.stress,
            ContextField::MentalHealth => &mut self.mental_health,
            ContextField::SocialSupport => &mut self.social_support,
        };
        *slot = value.into();
    }

    /// Builder-style setter, mostly for tests and fixtures.
    pub fn with(mut self, field: ContextField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }
}

/// Identity of a single context attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContextField {
    Age,
    Gender,
    Height,
    Weight,
    Ethnicity,
    Concerns,
    Smoking,
    Alcohol,
    Activity,
    Sleep,
    FamilyHistory,
    Conditions,
    Medications,
    Stress,
    MentalHealth,
    SocialSupport,
}

impl ContextField {
    /// All fields in form order.
    pub const ALL: [ContextField; 16] = [
        ContextField::Age,
        ContextField::Gender,
        ContextField::Height,
        ContextField::Weight,
        ContextField::Ethnicity,
        ContextField::Concerns,
        ContextField::Smoking,
        ContextField::Alcohol,
        ContextField::Activity,
        ContextField::Sleep,
        ContextField::FamilyHistory,
        ContextField::Conditions,
        ContextField::Medications,
        ContextField::Stress,
        ContextField::MentalHealth,
        ContextField::SocialSupport,
    ];

    /// Fields that must be non-empty before the questionnaire can start.
    pub const REQUIRED: [ContextField; 5] = [
        ContextField::Age,
        ContextField::Gender,
        ContextField::Height,
        ContextField::Weight,
        ContextField::Ethnicity,
    ];

    /// Wire name, as serialized in `UserContext`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Gender => "gender",
            Self::Height => "height",
            Self::Weight => "weight",
            Self::Ethnicity => "ethnicity",
            Self::Concerns => "concerns",
            Self::Smoking => "smoking",
            Self::Alcohol => "alcohol",
            Self::Activity => "activity",
            Self::Sleep => "sleep",
            Self::FamilyHistory => "familyHistory",
            Self::Conditions => "conditions",
            Self::Medications => "medications",
            Self::Stress => "stress",
            Self::MentalHealth => "mentalHealth",
            Self::SocialSupport => "socialSupport",
        }
    }

    /// Label used in prompts and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Gender => "Gender",
            Self::Height => "Height",
            Self::Weight => "Weight",
            Self::Ethnicity => "Ethnicity",
            Self::Concerns => "Health concerns",
            Self::Smoking => "Smoking",
            Self::Alcohol => "Alcohol",
            Self::Activity => "Physical activity",
            Self::Sleep => "Sleep",
            Self::FamilyHistory => "Family history",
            Self::Conditions => "Existing conditions",
            Self::Medications => "Medications",
            Self::Stress => "Stress",
            Self::MentalHealth => "Mental health",
            Self::SocialSupport => "Social support",
        }
    }

    /// Returns true if the field is part of the validation gate.
    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }
}

impl fmt::Display for ContextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContextField {
    type Err = ValidationError;

    /// Accepts the wire name or its snake_case spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.as_str().to_lowercase() == normalised)
            .ok_or_else(|| ValidationError::unknown_field(s.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_names() {
        let ctx = UserContext::default()
            .with(ContextField::FamilyHistory, "Diabetes")
            .with(ContextField::SocialSupport, "Strong");
        let json = serde_json::to_value(&ctx).unwrap();

        assert_eq!(json["familyHistory"], "Diabetes");
        assert_eq!(json["socialSupport"], "Strong");
        assert!(json.get("family_history").is_none());
    }

    #[test]
    fn get_and_set_cover_every_field() {
        let mut ctx = UserContext::default();
        for field in ContextField::ALL {
            ctx.set(field, field.as_str());
        }
        for field in ContextField::ALL {
            assert_eq!(ctx.get(field), field.as_str());
        }
    }

    #[test]
    fn parses_wire_and_snake_case_names() {
        assert_eq!("familyHistory".parse::<ContextField>().unwrap(), ContextField::FamilyHistory);
        assert_eq!("mental_health".parse::<ContextField>().unwrap(), ContextField::MentalHealth);
        assert_eq!(" Age ".parse::<ContextField>().unwrap(), ContextField::Age);
    }

    #[test]
    fn rejects_unknown_field_name() {
        assert!("blood_type".parse::<ContextField>().is_err());
    }

    #[test]
    fn only_demographics_are_required() {
        assert!(ContextField::Age.is_required());
        assert!(ContextField::Ethnicity.is_required());
        assert!(!ContextField::Concerns.is_required());
        assert!(!ContextField::Medications.is_required());
    }
}

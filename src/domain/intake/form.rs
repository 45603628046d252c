//! Context intake: an editable draft that freezes into a `UserContext`.

use std::collections::BTreeMap;
use std::fmt;

use super::context::{ContextField, UserContext};

/// Field-level validation messages, keyed by field, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<ContextField, String>);

impl FieldErrors {
    /// Returns true if no field failed validation.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message for a field, if it failed.
    pub fn get(&self, field: ContextField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Iterates failing fields in form order.
    pub fn iter(&self) -> impl Iterator<Item = (ContextField, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn insert(&mut self, field: ContextField, message: String) {
        self.0.insert(field, message);
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// Validates a context against the required-field gate.
///
/// Reports every missing field at once. Whitespace-only values count as empty.
pub fn validate_context(context: &UserContext) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    for field in ContextField::REQUIRED {
        if context.get(field).trim().is_empty() {
            errors.insert(field, format!("{} is required", field.label()));
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Mutable draft of the user's context.
///
/// The draft stays editable until `submit` passes validation; the returned
/// `UserContext` is owned by the caller and never mutated again.
#[derive(Debug, Clone, Default)]
pub struct ContextIntake {
    draft: UserContext,
    errors: FieldErrors,
}

impl ContextIntake {
    /// Starts an empty intake.
    pub fn new() -> Self {
        Self::default()
    }

    /// Edits one field of the draft, clearing any error shown for it.
    pub fn set_field(&mut self, field: ContextField, value: impl Into<String>) {
        self.draft.set(field, value);
        self.errors.0.remove(&field);
    }

    /// Current draft values.
    pub fn draft(&self) -> &UserContext {
        &self.draft
    }

    /// Errors from the last failed submit.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Runs the validation gate and hands out the completed context.
    ///
    /// On failure the draft is kept and the errors are remembered for display.
    pub fn submit(&mut self) -> Result<UserContext, FieldErrors> {
        match validate_context(&self.draft) {
            Ok(()) => {
                self.errors = FieldErrors::default();
                Ok(self.draft.clone())
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_context() -> UserContext {
        UserContext::default()
            .with(ContextField::Age, "45")
            .with(ContextField::Gender, "Male")
            .with(ContextField::Height, "5'10")
            .with(ContextField::Weight, "180")
            .with(ContextField::Ethnicity, "White/Caucasian")
    }

    #[test]
    fn complete_context_passes() {
        assert!(validate_context(&complete_context()).is_ok());
    }

    #[test]
    fn empty_context_reports_every_required_field() {
        let errors = validate_context(&UserContext::default()).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(errors.get(ContextField::Age), Some("Age is required"));
        assert_eq!(errors.get(ContextField::Ethnicity), Some("Ethnicity is required"));
        assert_eq!(errors.get(ContextField::Concerns), None);
    }

    #[test]
    fn whitespace_only_counts_as_empty() {
        let ctx = complete_context().with(ContextField::Gender, "   ");
        let errors = validate_context(&ctx).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.get(ContextField::Gender).is_some());
    }

    #[test]
    fn submit_failure_keeps_draft_and_records_errors() {
        let mut intake = ContextIntake::new();
        intake.set_field(ContextField::Age, "30");

        assert!(intake.submit().is_err());
        assert_eq!(intake.draft().age, "30");
        assert_eq!(intake.errors().len(), 4);
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        let mut intake = ContextIntake::new();
        let _ = intake.submit();
        intake.set_field(ContextField::Weight, "70");

        assert!(intake.errors().get(ContextField::Weight).is_none());
        assert!(intake.errors().get(ContextField::Age).is_some());
    }

    #[test]
    fn submit_success_returns_context() {
        let expected = complete_context();
        let mut intake = ContextIntake::new();
        for field in ContextField::ALL {
            intake.set_field(field, expected.get(field));
        }

        let ctx = intake.submit().unwrap();

        assert_eq!(ctx, expected);
        assert!(intake.errors().is_empty());
    }
}

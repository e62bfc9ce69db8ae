use super::ConstraintValidator;
use crate::MessageKey;
use crate::ParameterDescriptor;
use crate::ValidationMessage;
use crate::Value;

/// Reports a text value that does not match the parameter's pattern as a whole.
///
/// An empty value is left to [`super::RequiredValidator`].
pub struct PatternValidator;

impl ConstraintValidator for PatternValidator {
    fn name(&self) -> &str {
        "pattern"
    }

    fn validate(
        &self,
        parameter: &ParameterDescriptor,
        value: Option<&Value>,
    ) -> Option<ValidationMessage> {
        let pattern = parameter.applicable_pattern()?;
        // Non-text values are the type validator's to report
        let text = value?.as_text()?;
        // Empty text counts as absent
        if text.is_empty() {
            return None;
        }

        if parameter.matches_pattern(text)? {
            return None;
        }

        Some(ValidationMessage::new(
            parameter.name(),
            MessageKey::PatternViolated,
            [text, pattern],
        ))
    }
}

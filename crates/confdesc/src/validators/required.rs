use super::ConstraintValidator;
use crate::MessageKey;
use crate::ParameterDescriptor;
use crate::ValidationMessage;
use crate::Value;

/// Reports a required parameter that has no value, or an empty text value.
pub struct RequiredValidator;

impl ConstraintValidator for RequiredValidator {
    fn name(&self) -> &str {
        "required"
    }

    fn validate(
        &self,
        parameter: &ParameterDescriptor,
        value: Option<&Value>,
    ) -> Option<ValidationMessage> {
        if !parameter.is_required() {
            return None;
        }

        let missing = match value {
            None => true,
            Some(Value::Text(text)) => text.is_empty(),
            Some(_) => false,
        };

        missing.then(|| {
            ValidationMessage::new(
                parameter.name(),
                MessageKey::RequiredValueMissing,
                [parameter.name()],
            )
        })
    }
}

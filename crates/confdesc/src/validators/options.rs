use super::ConstraintValidator;
use crate::MessageKey;
use crate::Number;
use crate::ParameterDescriptor;
use crate::ValidationMessage;
use crate::Value;

/// Reports a value that is not one of the parameter's options.
///
/// On INTEGER and DECIMAL parameters a numeric value is compared with each
/// option by number, so `0.5` matches the option `"0.50"`; options that are
/// not numbers are compared by text. Everything else is compared by its
/// textual form. Options are not enforced when `limit_to_options` is off,
/// and an empty text value counts as absent.
pub struct OptionsValidator;

fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(i) = text.parse::<i64>() {
        return Some(Number::Integer(i));
    }
    text.parse::<f64>()
        .ok()
        .filter(|d| d.is_finite())
        .map(Number::Decimal)
}

fn is_option(parameter: &ParameterDescriptor, value: &Value, option: &str) -> bool {
    let number = parameter
        .parameter_type()
        .is_numeric()
        .then(|| value.as_number())
        .flatten();

    match (number, parse_number(option)) {
        (Some(number), Some(option)) => number == option,
        _ => value.to_string() == option,
    }
}

impl ConstraintValidator for OptionsValidator {
    fn name(&self) -> &str {
        "options"
    }

    fn validate(
        &self,
        parameter: &ParameterDescriptor,
        value: Option<&Value>,
    ) -> Option<ValidationMessage> {
        let options = parameter.options();
        if options.is_empty() || !parameter.limit_to_options() {
            return None;
        }
        let value = value?;
        if !value.is_scalar() || value.as_text() == Some("") {
            return None;
        }

        if options
            .iter()
            .any(|option| is_option(parameter, value, &option.value))
        {
            return None;
        }

        let allowed = options
            .iter()
            .map(|option| option.value.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Some(ValidationMessage::new(
            parameter.name(),
            MessageKey::UnsupportedOption,
            [value.to_string(), allowed],
        ))
    }
}

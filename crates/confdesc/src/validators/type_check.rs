use super::ConstraintValidator;
use crate::MessageKey;
use crate::ParameterDescriptor;
use crate::ParameterType;
use crate::ValidationMessage;
use crate::Value;

/// Reports a value whose runtime kind does not fit the declared type.
///
/// INTEGER accepts a decimal only when it is a whole number within `i64`
/// range; DECIMAL accepts any finite number. Text is never coerced to a
/// number or boolean.
pub struct TypeValidator;

impl TypeValidator {
    fn conforms(parameter_type: ParameterType, value: &Value) -> bool {
        match (parameter_type, value) {
            (ParameterType::Text, Value::Text(_)) => true,
            (ParameterType::Integer, Value::Integer(_)) => true,
            (ParameterType::Integer, Value::Decimal(d)) => is_whole(*d),
            (ParameterType::Decimal, Value::Integer(_)) => true,
            (ParameterType::Decimal, Value::Decimal(d)) => d.is_finite(),
            (ParameterType::Boolean, Value::Boolean(_)) => true,
            _ => false,
        }
    }
}

/// 2^63 is exactly representable, `i64::MAX` is not; hence the strict upper bound.
fn is_whole(d: f64) -> bool {
    d.is_finite() && d.fract() == 0.0 && d >= i64::MIN as f64 && d < i64::MAX as f64
}

impl ConstraintValidator for TypeValidator {
    fn name(&self) -> &str {
        "type"
    }

    fn validate(
        &self,
        parameter: &ParameterDescriptor,
        value: Option<&Value>,
    ) -> Option<ValidationMessage> {
        let value = value?;

        if Self::conforms(parameter.parameter_type(), value) {
            return None;
        }

        Some(ValidationMessage::new(
            parameter.name(),
            MessageKey::TypeMismatch,
            [value.to_string(), parameter.parameter_type().to_string()],
        ))
    }
}

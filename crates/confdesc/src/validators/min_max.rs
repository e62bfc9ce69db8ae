use super::ConstraintValidator;
use crate::MessageKey;
use crate::Number;
use crate::ParameterDescriptor;
use crate::ValidationMessage;
use crate::Value;

/// Shared applicability check: a numeric parameter, a bound, and a numeric value.
fn bound_check(
    parameter: &ParameterDescriptor,
    bound: Option<Number>,
    value: Option<&Value>,
    violated: impl Fn(Number, Number) -> bool,
) -> Option<ValidationMessage> {
    if !parameter.parameter_type().is_numeric() {
        return None;
    }
    let bound = bound?;
    let value = value?;
    let number = value.as_number()?;

    violated(number, bound).then(|| {
        ValidationMessage::new(
            parameter.name(),
            MessageKey::ValueOutOfRange,
            [value.to_string(), bound.to_string()],
        )
    })
}

/// Reports a numeric value below the parameter's minimum. The bound itself is allowed.
pub struct MinValidator;

impl ConstraintValidator for MinValidator {
    fn name(&self) -> &str {
        "min"
    }

    fn validate(
        &self,
        parameter: &ParameterDescriptor,
        value: Option<&Value>,
    ) -> Option<ValidationMessage> {
        bound_check(parameter, parameter.min(), value, |n, min| n < min)
    }
}

/// Reports a numeric value above the parameter's maximum. The bound itself is allowed.
pub struct MaxValidator;

impl ConstraintValidator for MaxValidator {
    fn name(&self) -> &str {
        "max"
    }

    fn validate(
        &self,
        parameter: &ParameterDescriptor,
        value: Option<&Value>,
    ) -> Option<ValidationMessage> {
        bound_check(parameter, parameter.max(), value, |n, max| n > max)
    }
}

//! Constraint validators.
//!
//! Each validator checks exactly one kind of constraint and reports at most
//! one message. A validator does nothing when no value was submitted (except
//! [`RequiredValidator`], whose concern is absence) and nothing when its
//! constraint does not apply to the parameter's declared type. New kinds of
//! constraint are added by registering another validator with the
//! [`crate::ValidationEngine`]; existing validators are never modified.

mod min_max;
mod options;
mod pattern;
mod required;
mod type_check;

use std::sync::Arc;

pub use min_max::MaxValidator;
pub use min_max::MinValidator;
pub use options::OptionsValidator;
pub use pattern::PatternValidator;
pub use required::RequiredValidator;
pub use type_check::TypeValidator;

use crate::ParameterDescriptor;
use crate::ValidationMessage;
use crate::Value;

/// A single pluggable constraint check
pub trait ConstraintValidator: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Check `value` against one constraint of `parameter`.
    ///
    /// `None` means the value is absent. Returns a message only for an actual
    /// violation; an uninterpretable value is never an error here.
    fn validate(
        &self,
        parameter: &ParameterDescriptor,
        value: Option<&Value>,
    ) -> Option<ValidationMessage>;
}

impl<F> ConstraintValidator for F
where
    F: Fn(&ParameterDescriptor, Option<&Value>) -> Option<ValidationMessage> + Send + Sync,
{
    fn validate(
        &self,
        parameter: &ParameterDescriptor,
        value: Option<&Value>,
    ) -> Option<ValidationMessage> {
        self(parameter, value)
    }
}

/// The built-in validators in evaluation order:
/// required, type, pattern, min, max, options.
pub fn builtin_validators() -> Vec<Arc<dyn ConstraintValidator>> {
    vec![
        Arc::new(RequiredValidator),
        Arc::new(TypeValidator),
        Arc::new(PatternValidator),
        Arc::new(MinValidator),
        Arc::new(MaxValidator),
        Arc::new(OptionsValidator),
    ]
}

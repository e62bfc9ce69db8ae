use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use tracing::trace;

use crate::ConfigDescription;
use crate::MessageCatalog;
use crate::ParameterDescriptor;
use crate::ValidationMessage;
use crate::Value;
use crate::validators::ConstraintValidator;
use crate::validators::builtin_validators;

/// Runs every registered constraint validator over submitted configuration.
///
/// The engine holds only immutable validators, so one instance can be shared
/// between threads and used for any number of concurrent validations.
#[derive(Clone)]
pub struct ValidationEngine {
    validators: Vec<Arc<dyn ConstraintValidator>>,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.validators.iter().map(|v| v.name()))
            .finish()
    }
}

impl ValidationEngine {
    /// An engine with the built-in validators:
    /// required, type, pattern, min, max, options.
    pub fn new() -> Self {
        Self {
            validators: builtin_validators(),
        }
    }

    /// An engine with no validators at all
    pub fn empty() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    /// Add a validator; it runs after all validators registered before it.
    pub fn register<V>(&mut self, validator: V)
    where
        V: ConstraintValidator + 'static,
    {
        self.validators.push(Arc::new(validator));
    }

    pub fn with_validator<V>(mut self, validator: V) -> Self
    where
        V: ConstraintValidator + 'static,
    {
        self.register(validator);
        self
    }

    /// Names of the registered validators, in evaluation order
    pub fn validator_names(&self) -> Vec<&str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    /// All violations of one parameter, in validator order.
    ///
    /// Every validator runs: a value of the wrong type is still checked
    /// against the remaining constraints.
    pub fn validate_parameter(
        &self,
        parameter: &ParameterDescriptor,
        value: Option<&Value>,
    ) -> Vec<ValidationMessage> {
        let kind = value.map(Value::kind).unwrap_or("absent");
        debug!(
            "validating '{}' ({}) against {} validator(s)",
            parameter.name(),
            kind,
            self.validators.len()
        );

        self.validators
            .iter()
            .filter_map(|validator| {
                let message = validator.validate(parameter, value)?;
                trace!(
                    "'{}': {} reported {}",
                    parameter.name(),
                    validator.name(),
                    message.message_key
                );
                Some(message)
            })
            .collect()
    }

    /// All violations of a set of parameters, in input order and then
    /// validator order. Empty when everything is valid.
    pub fn validate<'a, I>(&self, parameters: I) -> Vec<ValidationMessage>
    where
        I: IntoIterator<Item = (&'a ParameterDescriptor, Option<&'a Value>)>,
    {
        parameters
            .into_iter()
            .flat_map(|(parameter, value)| self.validate_parameter(parameter, value))
            .collect()
    }

    /// Validate submitted values against a whole configuration description.
    ///
    /// Parameters are visited in declaration order; a parameter with no
    /// submitted value is validated as absent. Submitted keys that the
    /// description does not declare are ignored.
    pub fn validate_configuration(
        &self,
        description: &ConfigDescription,
        values: &HashMap<String, Value>,
    ) -> Vec<ValidationMessage> {
        for key in values.keys() {
            if description.get(key).is_none() {
                debug!("ignoring undeclared parameter '{}'", key);
            }
        }

        self.validate(
            description
                .parameters()
                .iter()
                .map(|parameter| (parameter, values.get(parameter.name()))),
        )
    }

    /// Accept or reject a configuration change.
    pub fn check_configuration(
        &self,
        description: &ConfigDescription,
        values: &HashMap<String, Value>,
    ) -> Result<(), ConfigValidationError> {
        let messages = self.validate_configuration(description, values);
        if messages.is_empty() {
            Ok(())
        } else {
            Err(ConfigValidationError { messages })
        }
    }
}

/// A rejected configuration, carrying every violation found
#[derive(Debug, Clone, thiserror::Error)]
#[error("configuration rejected with {} violation(s)", .messages.len())]
pub struct ConfigValidationError {
    messages: Vec<ValidationMessage>,
}

impl ConfigValidationError {
    pub fn messages(&self) -> &[ValidationMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<ValidationMessage> {
        self.messages
    }

    /// One `parameter: text` line per violation, rendered through `catalog`
    pub fn render(&self, catalog: &MessageCatalog) -> Vec<String> {
        self.messages
            .iter()
            .map(|message| format!("{}: {}", message.parameter_name, catalog.render(message)))
            .collect()
    }
}

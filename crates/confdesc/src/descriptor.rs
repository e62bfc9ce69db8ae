//! Parameter declarations: the schema side of validation.

use std::collections::HashSet;

use regex::Regex;
use serde::Serialize;
use strum::Display;
use strum::EnumIter;
use strum::EnumString;

use crate::value::Number;

/// Declared type of a configuration parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParameterType {
    Text,
    Integer,
    Decimal,
    Boolean,
}

impl ParameterType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ParameterType::Integer | ParameterType::Decimal)
    }
}

/// One allowed literal value, with an optional display label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterOption {
    pub value: String,
    pub label: Option<String>,
}

impl ParameterOption {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A pattern as declared, plus its whole-string compiled form
#[derive(Debug, Clone)]
struct Pattern {
    source: String,
    anchored: Regex,
}

#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("parameter name must not be empty")]
    EmptyName,

    #[error("unknown type '{type_name}' for parameter '{parameter}'")]
    UnknownType { parameter: String, type_name: String },

    #[error("invalid pattern '{pattern}' for parameter '{parameter}': {source}")]
    InvalidPattern {
        parameter: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("parameter '{0}' is declared more than once")]
    DuplicateParameter(String),
}

/// Immutable schema entry for one configuration key.
///
/// Constraints that do not apply to the declared type are kept for display
/// but never checked: a pattern only matters for TEXT, bounds only for
/// INTEGER and DECIMAL.
#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    name: String,
    parameter_type: ParameterType,
    pattern: Option<String>,
    compiled_pattern: Option<Pattern>,
    required: bool,
    min: Option<Number>,
    max: Option<Number>,
    options: Vec<ParameterOption>,
    limit_to_options: bool,
    label: Option<String>,
    description: Option<String>,
    default: Option<String>,
    unit: Option<String>,
    advanced: bool,
}

impl ParameterDescriptor {
    pub fn builder(
        name: impl Into<String>,
        parameter_type: ParameterType,
    ) -> ParameterDescriptorBuilder {
        ParameterDescriptorBuilder {
            name: name.into(),
            parameter_type,
            pattern: None,
            required: false,
            min: None,
            max: None,
            options: Vec::new(),
            limit_to_options: true,
            label: None,
            description: None,
            default: None,
            unit: None,
            advanced: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameter_type(&self) -> ParameterType {
        self.parameter_type
    }

    /// The pattern as declared, regardless of type
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// The declared pattern, if it applies to this parameter
    pub fn applicable_pattern(&self) -> Option<&str> {
        self.compiled_pattern.as_ref().map(|p| p.source.as_str())
    }

    /// Whether `text` matches the whole applicable pattern; `None` if there is none
    pub fn matches_pattern(&self, text: &str) -> Option<bool> {
        self.compiled_pattern
            .as_ref()
            .map(|p| p.anchored.is_match(text))
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn min(&self) -> Option<Number> {
        self.min
    }

    pub fn max(&self) -> Option<Number> {
        self.max
    }

    pub fn options(&self) -> &[ParameterOption] {
        &self.options
    }

    /// When false, options are suggestions and any value is accepted
    pub fn limit_to_options(&self) -> bool {
        self.limit_to_options
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Informational only; validation never substitutes it for a missing value
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn is_advanced(&self) -> bool {
        self.advanced
    }
}

pub struct ParameterDescriptorBuilder {
    name: String,
    parameter_type: ParameterType,
    pattern: Option<String>,
    required: bool,
    min: Option<Number>,
    max: Option<Number>,
    options: Vec<ParameterOption>,
    limit_to_options: bool,
    label: Option<String>,
    description: Option<String>,
    default: Option<String>,
    unit: Option<String>,
    advanced: bool,
}

impl ParameterDescriptorBuilder {
    /// An empty pattern is the same as no pattern
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        self.pattern = (!pattern.is_empty()).then_some(pattern);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn min(mut self, min: impl Into<Number>) -> Self {
        self.min = Some(min.into());
        self
    }

    pub fn max(mut self, max: impl Into<Number>) -> Self {
        self.max = Some(max.into());
        self
    }

    pub fn option(mut self, option: ParameterOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn options<I>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = ParameterOption>,
    {
        self.options.extend(options);
        self
    }

    pub fn limit_to_options(mut self, limit: bool) -> Self {
        self.limit_to_options = limit;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn advanced(mut self, advanced: bool) -> Self {
        self.advanced = advanced;
        self
    }

    /// Finish the descriptor, compiling its pattern when it applies.
    pub fn build(self) -> Result<ParameterDescriptor, DescriptorError> {
        if self.name.is_empty() {
            return Err(DescriptorError::EmptyName);
        }

        let compiled_pattern = match &self.pattern {
            Some(pattern) if self.parameter_type == ParameterType::Text => {
                Some(compile_pattern(&self.name, pattern)?)
            }
            _ => None,
        };

        Ok(ParameterDescriptor {
            name: self.name,
            parameter_type: self.parameter_type,
            pattern: self.pattern,
            compiled_pattern,
            required: self.required,
            min: self.min,
            max: self.max,
            options: self.options,
            limit_to_options: self.limit_to_options,
            label: self.label,
            description: self.description,
            default: self.default,
            unit: self.unit,
            advanced: self.advanced,
        })
    }
}

fn compile_pattern(parameter: &str, pattern: &str) -> Result<Pattern, DescriptorError> {
    let invalid = |source| DescriptorError::InvalidPattern {
        parameter: parameter.to_string(),
        pattern: pattern.to_string(),
        source,
    };

    // Check the pattern on its own first: wrapping can make some invalid patterns parse
    Regex::new(pattern).map_err(invalid)?;
    let anchored = Regex::new(&format!("^(?:{})$", pattern)).map_err(invalid)?;

    Ok(Pattern {
        source: pattern.to_string(),
        anchored,
    })
}

/// The ordered parameter declarations of one configurable thing
#[derive(Debug, Clone, Default)]
pub struct ConfigDescription {
    parameters: Vec<ParameterDescriptor>,
}

impl ConfigDescription {
    /// Parameter names must be unique.
    pub fn new(parameters: Vec<ParameterDescriptor>) -> Result<Self, DescriptorError> {
        let mut seen = HashSet::new();
        for parameter in &parameters {
            if !seen.insert(parameter.name()) {
                return Err(DescriptorError::DuplicateParameter(
                    parameter.name().to_string(),
                ));
            }
        }
        Ok(Self { parameters })
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub fn get(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.parameters.iter().find(|p| p.name() == name)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

use std::collections::HashMap;
use std::str::FromStr;

use serde::Serialize;
use strum::AsRefStr;
use strum::Display;
use strum::EnumIter;
use strum::EnumString;

/// Stable machine-readable identifier of a violation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr, Serialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKey {
    PatternViolated,
    RequiredValueMissing,
    TypeMismatch,
    ValueOutOfRange,
    UnsupportedOption,
}

impl MessageKey {
    /// English template used when no catalog overrides the key
    pub fn default_template(&self) -> &'static str {
        match self {
            MessageKey::PatternViolated => "The value {0} does not match the pattern {1}.",
            MessageKey::RequiredValueMissing => "The parameter {0} is required.",
            MessageKey::TypeMismatch => "The value {0} does not match the declared type {1}.",
            MessageKey::ValueOutOfRange => "The value {0} is out of range, the limit is {1}.",
            MessageKey::UnsupportedOption => {
                "The value {0} is not an allowed option. Allowed options are: {1}."
            }
        }
    }
}

/// One constraint violation for one parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationMessage {
    pub parameter_name: String,
    pub message_key: MessageKey,
    /// Template with positional `{n}` placeholders
    pub default_message: String,
    pub arguments: Vec<String>,
}

impl ValidationMessage {
    pub fn new<I, S>(parameter_name: impl Into<String>, message_key: MessageKey, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parameter_name: parameter_name.into(),
            message_key,
            default_message: message_key.default_template().to_string(),
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    /// The default template with arguments filled in
    pub fn default_text(&self) -> String {
        format_template(&self.default_message, &self.arguments)
    }
}

impl std::fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.parameter_name, self.default_text())
    }
}

/// Replace `{n}` with the n-th argument. Placeholders without an argument are kept.
pub fn format_template(template: &str, arguments: &[String]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let substituted = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            arguments.get(index).map(|arg| (arg, close))
        });

        match substituted {
            Some((arg, close)) => {
                output.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                output.push('{');
                rest = after;
            }
        }
    }
    output.push_str(rest);

    output
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown message key '{0}'")]
    UnknownKey(String),
}

/// Message templates keyed by [`MessageKey`].
///
/// Keys without a template fall back to the message's own default template,
/// so an empty catalog renders the built-in English text.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    templates: HashMap<MessageKey, String>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, key: MessageKey, template: impl Into<String>) -> Self {
        self.templates.insert(key, template.into());
        self
    }

    /// Build a catalog from key strings such as `PATTERN_VIOLATED`.
    pub fn from_templates<I, K, T>(templates: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (K, T)>,
        K: AsRef<str>,
        T: Into<String>,
    {
        let mut catalog = Self::new();
        for (key, template) in templates {
            let key = key.as_ref();
            let message_key =
                MessageKey::from_str(key).map_err(|_| CatalogError::UnknownKey(key.to_string()))?;
            catalog.templates.insert(message_key, template.into());
        }
        Ok(catalog)
    }

    pub fn template(&self, key: MessageKey) -> Option<&str> {
        self.templates.get(&key).map(String::as_str)
    }

    pub fn render(&self, message: &ValidationMessage) -> String {
        let template = self
            .template(message.message_key)
            .unwrap_or(message.default_message.as_str());
        format_template(template, &message.arguments)
    }
}

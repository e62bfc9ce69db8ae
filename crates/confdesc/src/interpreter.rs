//! Human-language interpreter plugins.
//!
//! Interpreters are a separate plugin capability that shares nothing with
//! configuration validation: each one turns free text in some locale into a
//! response. They register themselves at link time into [`INTERPRETERS`] and
//! are looked up by id through an [`InterpreterRegistry`].

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use linkme::distributed_slice;
use tracing::debug;
use tracing::warn;

/// A language tag such as `en` or `de-CH`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale(String);

impl Locale {
    /// `_` separators are normalised to `-`
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(tag.as_ref().replace('_', "-"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The primary language subtag, lowercased
    pub fn language(&self) -> String {
        self.0
            .split('-')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase()
    }

    /// Whether an interpreter supporting `supported` can handle this locale.
    ///
    /// An empty set means no restriction. Otherwise the exact tag or its bare
    /// language must be listed; tags compare without regard to case.
    pub fn is_supported_by(&self, supported: &BTreeSet<Locale>) -> bool {
        let language = self.language();
        supported.is_empty()
            || supported
                .iter()
                .any(|l| l.0.eq_ignore_ascii_case(&self.0) || l.0.eq_ignore_ascii_case(&language))
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Locale {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Locale::new(s))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InterpretationError {
    #[error("could not interpret '{0}'")]
    Unrecognized(String),

    #[error("interpreter '{interpreter}' does not support locale '{locale}'")]
    UnsupportedLocale { interpreter: String, locale: Locale },

    #[error("no interpreter with id '{0}'")]
    UnknownInterpreter(String),

    #[error("interpretation failed: {0}")]
    Failed(String),
}

/// A plugin that interprets human-language text
pub trait HumanLanguageInterpreter: Send + Sync {
    /// Unique id of this interpreter
    fn id(&self) -> &str;

    /// Human readable name, localized when possible
    fn label(&self, locale: Option<&Locale>) -> String;

    /// Locales this interpreter understands; empty means any
    fn supported_locales(&self) -> BTreeSet<Locale>;

    /// Grammar formats this interpreter can export
    fn supported_grammar_formats(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }

    /// The grammar of all commands for `locale` in `format`, if available
    fn grammar(&self, _locale: &Locale, _format: &str) -> Option<String> {
        None
    }

    /// Interpret `text` and return the response.
    fn interpret(&self, locale: &Locale, text: &str) -> Result<String, InterpretationError>;
}

/// Factory for a link-time registered interpreter
pub type InterpreterFactory = fn() -> Box<dyn HumanLanguageInterpreter>;

#[distributed_slice]
pub static INTERPRETERS: [InterpreterFactory];

/// Interpreters by id
#[derive(Default)]
pub struct InterpreterRegistry {
    interpreters: BTreeMap<String, Box<dyn HumanLanguageInterpreter>>,
}

impl InterpreterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate every interpreter registered in [`INTERPRETERS`]
    pub fn from_registered() -> Self {
        let mut registry = Self::new();
        for factory in INTERPRETERS {
            registry.register(factory());
        }
        registry
    }

    /// Add an interpreter. An id that is already taken keeps its first interpreter.
    pub fn register(&mut self, interpreter: Box<dyn HumanLanguageInterpreter>) -> bool {
        let id = interpreter.id().to_string();
        if self.interpreters.contains_key(&id) {
            warn!("interpreter '{}' is already registered, ignoring duplicate", id);
            return false;
        }
        debug!("registered interpreter '{}'", id);
        self.interpreters.insert(id, interpreter);
        true
    }

    pub fn get(&self, id: &str) -> Option<&dyn HumanLanguageInterpreter> {
        self.interpreters.get(id).map(|i| i.as_ref())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.interpreters.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn HumanLanguageInterpreter> {
        self.interpreters.values().map(|i| i.as_ref())
    }

    pub fn len(&self) -> usize {
        self.interpreters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interpreters.is_empty()
    }

    /// Interpret `text` with the interpreter `id`, checking its locale support first
    pub fn interpret(
        &self,
        id: &str,
        locale: &Locale,
        text: &str,
    ) -> Result<String, InterpretationError> {
        let interpreter = self
            .get(id)
            .ok_or_else(|| InterpretationError::UnknownInterpreter(id.to_string()))?;

        if !locale.is_supported_by(&interpreter.supported_locales()) {
            return Err(InterpretationError::UnsupportedLocale {
                interpreter: id.to_string(),
                locale: locale.clone(),
            });
        }

        interpreter.interpret(locale, text)
    }
}

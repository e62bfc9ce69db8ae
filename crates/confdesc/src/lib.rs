pub mod config;
mod descriptor;
mod engine;
pub mod interpreter;
mod message;
pub mod schema;
pub mod validators;
mod value;

pub use config::Config;
pub use config::ConfigError;
pub use config::LogLevel;
pub use confdesc_schema::Diagnostic;
pub use confdesc_schema::Diagnostics;
pub use confdesc_schema::format_diagnostics;
pub use descriptor::ConfigDescription;
pub use descriptor::DescriptorError;
pub use descriptor::ParameterDescriptor;
pub use descriptor::ParameterDescriptorBuilder;
pub use descriptor::ParameterOption;
pub use descriptor::ParameterType;
pub use engine::ConfigValidationError;
pub use engine::ValidationEngine;
pub use interpreter::HumanLanguageInterpreter;
pub use interpreter::InterpreterRegistry;
pub use interpreter::Locale;
pub use message::CatalogError;
pub use message::MessageCatalog;
pub use message::MessageKey;
pub use message::ValidationMessage;
pub use message::format_template;
pub use value::Number;
pub use value::Value;
pub use value::ValuesError;
pub use value::values_from_json;
pub use value::values_from_toml;

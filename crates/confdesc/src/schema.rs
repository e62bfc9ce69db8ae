//! Building a [`ConfigDescription`] from schema files.
//!
//! `confdesc_schema` reads and merges the files; this module checks each raw
//! entry (type names, pattern syntax) and reports problems at the location
//! they were written, before any value is validated.

use std::path::PathBuf;
use std::str::FromStr;

use confdesc_schema::Diagnostic;
use confdesc_schema::Diagnostics;
use confdesc_schema::Error;
use confdesc_schema::Located;
use confdesc_schema::RawParameter;
use confdesc_schema::SchemaDocument;
use strum::IntoEnumIterator;
use tracing::info;

use crate::ConfigDescription;
use crate::DescriptorError;
use crate::ParameterDescriptor;
use crate::ParameterOption;
use crate::ParameterType;

/// Load, merge and check schema files.
///
/// Returns the description and any warnings, or every diagnostic when at
/// least one of them is an error.
pub fn load_description(
    paths: &[PathBuf],
) -> Result<(ConfigDescription, Diagnostics), Diagnostics> {
    let documents = SchemaDocument::load_with_imports(paths)
        .map_err(|e| Diagnostics(vec![Diagnostic::Error(Error::Load(e))]))?;

    let (description, diagnostics) = description_from_documents(documents)?;
    info!(
        "loaded {} parameter(s) from {} schema file(s)",
        description.len(),
        paths.len()
    );
    Ok((description, diagnostics))
}

/// Merge already loaded documents and convert their parameters
pub fn description_from_documents(
    documents: Vec<SchemaDocument>,
) -> Result<(ConfigDescription, Diagnostics), Diagnostics> {
    let (merged, mut diagnostics) = confdesc_schema::merge(documents);

    let mut parameters = Vec::with_capacity(merged.parameters.len());
    for raw in merged.parameters {
        match descriptor_from_raw(raw) {
            Ok(parameter) => parameters.push(parameter),
            Err(diagnostic) => diagnostics.push(diagnostic),
        }
    }

    if diagnostics.iter().any(Diagnostic::is_error) {
        return Err(Diagnostics(diagnostics));
    }

    // Names were deduplicated by the merge, so this only fails for hand-built documents
    match ConfigDescription::new(parameters) {
        Ok(description) => Ok((description, Diagnostics(diagnostics))),
        Err(e) => {
            diagnostics.push(Diagnostic::validation("parameter", e.to_string(), None, None));
            Err(Diagnostics(diagnostics))
        }
    }
}

fn located_error<T>(field_path: String, message: String, located: &Located<T>) -> Diagnostic {
    Diagnostic::validation(
        field_path,
        message,
        Some(located.span().clone()),
        located.source().cloned(),
    )
}

/// Convert one raw entry, reporting the first problem found in it
fn descriptor_from_raw(raw: RawParameter) -> Result<ParameterDescriptor, Diagnostic> {
    let name = raw.name.get_ref().clone();

    let parameter_type = ParameterType::from_str(raw.parameter_type.get_ref()).map_err(|_| {
        let expected = ParameterType::iter()
            .map(|t| t.to_string().to_lowercase())
            .collect::<Vec<_>>()
            .join(", ");
        located_error(
            format!("parameter.{}.type", name),
            format!(
                "unknown parameter type '{}', expected one of: {}",
                raw.parameter_type.get_ref(),
                expected
            ),
            &raw.parameter_type,
        )
    })?;

    let mut builder = ParameterDescriptor::builder(name.clone(), parameter_type)
        .required(raw.required.as_deref().copied().unwrap_or(false))
        .limit_to_options(raw.limit_to_options.as_deref().copied().unwrap_or(true))
        .advanced(raw.advanced.as_deref().copied().unwrap_or(false))
        .options(raw.options.iter().map(|option| ParameterOption {
            value: option.value.get_ref().to_string(),
            label: option.label.clone(),
        }));

    if let Some(pattern) = &raw.pattern {
        builder = builder.pattern(pattern.get_ref().clone());
    }
    if let Some(min) = raw.min.as_deref() {
        builder = builder.min(*min);
    }
    if let Some(max) = raw.max.as_deref() {
        builder = builder.max(*max);
    }
    if let Some(label) = raw.label.as_deref() {
        builder = builder.label(label.clone());
    }
    if let Some(description) = raw.description.as_deref() {
        builder = builder.description(description.clone());
    }
    if let Some(default) = raw.default.as_deref() {
        builder = builder.default_value(default.to_string());
    }
    if let Some(unit) = raw.unit.as_deref() {
        builder = builder.unit(unit.clone());
    }

    builder.build().map_err(|e| match (&e, &raw.pattern) {
        (DescriptorError::InvalidPattern { source, .. }, Some(pattern)) => located_error(
            format!("parameter.{}.pattern", name),
            format!("invalid regular expression: {}", first_line(&source.to_string())),
            pattern,
        ),
        _ => located_error(format!("parameter.{}", name), e.to_string(), &raw.name),
    })
}

/// regex errors span several lines with a caret diagram; the label only needs the summary
fn first_line(message: &str) -> &str {
    message
        .lines()
        .rev()
        .find(|line| line.starts_with("error:"))
        .or_else(|| message.lines().next())
        .unwrap_or(message)
}

use std::io::Write;
use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;

/// A loaded schema file: its path and full text, shared by every located value in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub file_path: PathBuf,
    pub content: String,
}

impl SourceInfo {
    fn file_id(&self) -> String {
        self.file_path.to_string_lossy().to_string()
    }
}

/// A diagnostic produced while loading a configuration description
#[derive(Debug, Clone)]
pub enum Diagnostic {
    Warning(Warning),
    Error(Error),
}

/// Problems that do not prevent the schema from being used
#[derive(Debug, Clone)]
pub enum Warning {
    EmptySchema { file_path: PathBuf },
}

/// Problems that make the schema unusable
#[derive(Debug, Clone)]
pub enum Error {
    Merge(MergeError),
    Validation(ValidationError),
    Load(LoadError),
}

/// The same parameter declared more than once
#[derive(Debug, Clone)]
pub struct MergeError {
    pub field_path: String,
    pub message: String,
    pub conflicts: Vec<ConflictLocation>,
}

#[derive(Debug, Clone)]
pub struct ConflictLocation {
    pub span: Range<usize>,
    pub source: Option<Arc<SourceInfo>>,
}

/// A malformed schema entry, e.g. an unknown type or a pattern that does not compile
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field_path: String,
    pub message: String,
    pub span: Option<Range<usize>>,
    pub source: Option<Arc<SourceInfo>>,
}

/// Failure to read a schema file at all
#[derive(Debug, Clone)]
pub enum LoadError {
    Io { path: PathBuf, error: String },
    Parse { path: PathBuf, error: String },
    ImportCycle { path: PathBuf, cycle: Vec<PathBuf> },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io { path, error } => write_plain(
                f,
                "Failed to read schema file",
                &path.display().to_string(),
                error,
            ),
            LoadError::Parse { path, error } => write_plain(
                f,
                "Failed to parse schema file",
                &path.display().to_string(),
                error,
            ),
            LoadError::ImportCycle { path, cycle } => write_plain(
                f,
                "Import cycle detected",
                &path.display().to_string(),
                &format!("Import cycle involves {} file(s)", cycle.len()),
            ),
        }
    }
}

impl std::error::Error for LoadError {}

/// Header, location and note in the same layout ariadne uses, for reports without a span
fn write_plain(
    out: &mut impl std::fmt::Write,
    title: &str,
    location: &str,
    note: &str,
) -> std::fmt::Result {
    write!(
        out,
        "\x1b[31mError\x1b[0m: {}\n  ┌─ {}:1:1\n  │\n  = {}\n",
        title, location, note
    )
}

/// All diagnostics from one load
#[derive(Debug, Clone, Default)]
pub struct Diagnostics(pub Vec<Diagnostic>);

impl Diagnostics {
    pub fn has_errors(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_diagnostics(&self.0))
    }
}

impl std::error::Error for Diagnostics {}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_diagnostics(std::slice::from_ref(self)))
    }
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        matches!(self, Diagnostic::Error(_))
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Diagnostic::Warning(_))
    }

    /// Shorthand for a located schema error
    pub fn validation(
        field_path: impl Into<String>,
        message: impl Into<String>,
        span: Option<Range<usize>>,
        source: Option<Arc<SourceInfo>>,
    ) -> Self {
        Diagnostic::Error(Error::Validation(ValidationError {
            field_path: field_path.into(),
            message: message.into(),
            span,
            source,
        }))
    }
}

/// Render diagnostics for a terminal using ariadne
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    let mut output = Vec::new();

    for diagnostic in diagnostics {
        match diagnostic {
            Diagnostic::Warning(Warning::EmptySchema { file_path }) => {
                writeln!(&mut output, "\x1b[33mWarning\x1b[0m: Empty schema file").ok();
                writeln!(&mut output, "  ┌─ {}:1:1", file_path.display()).ok();
                writeln!(&mut output, "  │").ok();
                writeln!(
                    &mut output,
                    "  = Schema file '{}' declares no parameters",
                    file_path.display()
                )
                .ok();
                writeln!(&mut output).ok();
            }
            Diagnostic::Error(Error::Merge(merge_error)) => {
                write_merge_error(&mut output, merge_error);
            }
            Diagnostic::Error(Error::Validation(validation_error)) => {
                write_validation_error(&mut output, validation_error);
            }
            Diagnostic::Error(Error::Load(load_error)) => {
                write!(&mut output, "{}", load_error).ok();
            }
        }
    }

    String::from_utf8_lossy(&output).to_string()
}

fn write_merge_error(output: &mut Vec<u8>, merge_error: &MergeError) {
    use ariadne::Color;
    use ariadne::Label;
    use ariadne::Report;
    use ariadne::ReportKind;
    use ariadne::Source;

    let located: Vec<(&Arc<SourceInfo>, &Range<usize>)> = merge_error
        .conflicts
        .iter()
        .filter_map(|c| c.source.as_ref().map(|s| (s, &c.span)))
        .collect();

    let Some((first_source, first_span)) = located.first() else {
        let mut text = String::new();
        write_plain(
            &mut text,
            &format!("Duplicate definition of '{}'", merge_error.field_path),
            "<unknown>",
            &merge_error.message,
        )
        .ok();
        output.extend_from_slice(text.as_bytes());
        output.push(b'\n');
        return;
    };

    let mut report = Report::build(
        ReportKind::Error,
        (first_source.file_id(), (*first_span).clone()),
    )
    .with_message(format!(
        "Duplicate definition of '{}'",
        merge_error.field_path
    ))
    .with_note(&merge_error.message);

    for (idx, (source, span)) in located.iter().enumerate() {
        let (label_msg, color) = if idx == 0 {
            ("first defined here", Color::Red)
        } else {
            ("defined again here", Color::Yellow)
        };
        report = report.with_label(
            Label::new((source.file_id(), (*span).clone()))
                .with_message(label_msg)
                .with_color(color),
        );
    }

    let finished = report.finish();

    // ariadne renders one file per write; emit each distinct file once
    let mut written = std::collections::HashSet::new();
    for (source, _) in &located {
        let file_id = source.file_id();
        if written.insert(file_id.clone()) {
            finished
                .write((file_id, Source::from(source.content.clone())), &mut *output)
                .ok();
        }
    }
}

fn write_validation_error(output: &mut Vec<u8>, validation_error: &ValidationError) {
    use ariadne::Color;
    use ariadne::Label;
    use ariadne::Report;
    use ariadne::ReportKind;
    use ariadne::Source;

    if let (Some(span), Some(source)) = (&validation_error.span, &validation_error.source) {
        let file_id = source.file_id();
        let report = Report::build(ReportKind::Error, (file_id.clone(), span.clone()))
            .with_message(format!(
                "Invalid schema entry '{}'",
                validation_error.field_path
            ))
            .with_label(
                Label::new((file_id.clone(), span.clone()))
                    .with_message(&validation_error.message)
                    .with_color(Color::Red),
            )
            .finish();

        report
            .write((file_id, Source::from(source.content.clone())), &mut *output)
            .ok();
    } else {
        let file_path = validation_error
            .source
            .as_ref()
            .map(|s| s.file_path.display().to_string())
            .unwrap_or_else(|| "<unknown>".to_string());

        let mut text = String::new();
        write_plain(
            &mut text,
            &format!("Invalid schema entry '{}'", validation_error.field_path),
            &file_path,
            &validation_error.message,
        )
        .ok();
        output.extend_from_slice(text.as_bytes());
        output.push(b'\n');
    }
}

use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;

use crate::LoadError;
use crate::Located;
use crate::SourceInfo;

/// A numeric bound as written in the schema
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Decimal(f64),
}

/// A literal scalar as written in the schema (option values, defaults)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Boolean(b) => write!(f, "{}", b),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Decimal(d) => write!(f, "{}", d),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// One allowed value of a parameter
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawOption {
    pub value: Located<Scalar>,
    #[serde(default)]
    pub label: Option<String>,
}

/// One `[[parameter]]` table, before its type and constraints have been checked
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawParameter {
    pub name: Located<String>,
    #[serde(rename = "type")]
    pub parameter_type: Located<String>,
    #[serde(default)]
    pub pattern: Option<Located<String>>,
    #[serde(default)]
    pub required: Option<Located<bool>>,
    #[serde(default)]
    pub min: Option<Located<Number>>,
    #[serde(default)]
    pub max: Option<Located<Number>>,
    #[serde(default)]
    pub options: Vec<RawOption>,
    #[serde(default)]
    pub limit_to_options: Option<Located<bool>>,
    #[serde(default)]
    pub label: Option<Located<String>>,
    #[serde(default)]
    pub description: Option<Located<String>>,
    #[serde(default)]
    pub default: Option<Located<Scalar>>,
    #[serde(default)]
    pub unit: Option<Located<String>>,
    #[serde(default)]
    pub advanced: Option<Located<bool>>,
}

impl RawParameter {
    fn attach_source(&mut self, source: &Arc<SourceInfo>) {
        self.name.attach(source);
        self.parameter_type.attach(source);
        for option in &mut self.options {
            option.value.attach(source);
        }
        for located in [
            &mut self.pattern,
            &mut self.label,
            &mut self.description,
            &mut self.unit,
        ]
        .into_iter()
        .flatten()
        {
            located.attach(source);
        }
        for located in [
            &mut self.required,
            &mut self.limit_to_options,
            &mut self.advanced,
        ]
        .into_iter()
        .flatten()
        {
            located.attach(source);
        }
        for located in [&mut self.min, &mut self.max].into_iter().flatten() {
            located.attach(source);
        }
        if let Some(default) = &mut self.default {
            default.attach(source);
        }
    }
}

/// A single configuration-description file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    /// Other schema files to load first, relative to this one
    #[serde(default)]
    pub imports: Vec<Located<String>>,

    #[serde(default, rename = "parameter")]
    pub parameters: Vec<RawParameter>,

    #[serde(skip)]
    pub source: Option<Arc<SourceInfo>>,
}

impl SchemaDocument {
    /// Parse a document from text, attributing every value to `path`.
    pub fn parse(path: &Path, content: String) -> Result<Self, LoadError> {
        let mut document: Self = toml::from_str(&content).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let source = Arc::new(SourceInfo {
            file_path: path.to_path_buf(),
            content,
        });
        for import in &mut document.imports {
            import.attach(&source);
        }
        for parameter in &mut document.parameters {
            parameter.attach_source(&source);
        }
        document.source = Some(source);

        Ok(document)
    }

    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::parse(path, content)
    }

    /// True when the document contributes nothing
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty() && self.imports.is_empty()
    }

    /// Load `paths` in order, each preceded by its imports (depth first).
    ///
    /// A file reachable through several imports is loaded once, at its first
    /// occurrence. Importing a file that is still being loaded is a cycle.
    pub fn load_with_imports(paths: &[PathBuf]) -> Result<Vec<Self>, LoadError> {
        let mut loading = Vec::new();
        let mut loaded = HashSet::new();
        let mut documents = Vec::new();

        for path in paths {
            Self::load_recursive(path, &mut loading, &mut loaded, &mut documents)?;
        }

        Ok(documents)
    }

    fn load_recursive(
        path: &Path,
        loading: &mut Vec<PathBuf>,
        loaded: &mut HashSet<PathBuf>,
        documents: &mut Vec<Self>,
    ) -> Result<(), LoadError> {
        let canonical_path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if loading.contains(&canonical_path) {
            return Err(LoadError::ImportCycle {
                path: canonical_path,
                cycle: loading.clone(),
            });
        }
        if loaded.contains(&canonical_path) {
            tracing::debug!("{} already loaded, skipping", path.display());
            return Ok(());
        }

        tracing::debug!("loading schema file {}", path.display());
        let document = Self::from_file(path)?;

        loading.push(canonical_path.clone());
        for import in &document.imports {
            let import_path = PathBuf::from(import.get_ref());
            let resolved_path = if import_path.is_absolute() {
                import_path
            } else {
                let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
                parent_dir.join(import_path)
            };

            Self::load_recursive(&resolved_path, loading, loaded, documents)?;
        }
        loading.pop();

        loaded.insert(canonical_path);
        documents.push(document);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_parse_parameter_fields() {
        let content = r#"
            [[parameter]]
            name = "volume"
            type = "integer"
            required = true
            min = 0
            max = 100.5
            label = "Volume"
            options = [{ value = 10, label = "Quiet" }, { value = "loud" }]
        "#;
        let document =
            SchemaDocument::parse(Path::new("schema.toml"), content.to_string()).unwrap();

        assert_eq!(document.parameters.len(), 1);
        let parameter = &document.parameters[0];
        assert_eq!(parameter.name.get_ref(), "volume");
        assert_eq!(parameter.parameter_type.get_ref(), "integer");
        assert_eq!(parameter.required.as_deref(), Some(&true));
        assert_eq!(parameter.min.as_deref(), Some(&Number::Integer(0)));
        assert_eq!(parameter.max.as_deref(), Some(&Number::Decimal(100.5)));
        assert_eq!(parameter.options.len(), 2);
        assert_eq!(*parameter.options[0].value, Scalar::Integer(10));
        assert_eq!(parameter.options[0].label.as_deref(), Some("Quiet"));
        assert_eq!(*parameter.options[1].value, Scalar::Text("loud".to_string()));

        let source = parameter.name.source().unwrap();
        assert_eq!(source.file_path, PathBuf::from("schema.toml"));
        assert_eq!(&source.content[parameter.name.span().clone()], "\"volume\"");
    }

    #[test]
    fn test_unknown_field_is_parse_error() {
        let content = r#"
            [[parameter]]
            name = "volume"
            type = "integer"
            maximum = 3
        "#;
        let result = SchemaDocument::parse(Path::new("schema.toml"), content.to_string());
        assert!(matches!(result, Err(LoadError::Parse { .. })));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = SchemaDocument::from_file(Path::new("/nonexistent/schema.toml"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_imports_load_before_importer() {
        let temp_dir = TempDir::new().unwrap();
        let common = temp_dir.path().join("common.toml");
        let device = temp_dir.path().join("device.toml");

        fs::write(
            &common,
            r#"
            [[parameter]]
            name = "host"
            type = "text"
            "#,
        )
        .unwrap();
        fs::write(
            &device,
            r#"
            imports = ["common.toml"]

            [[parameter]]
            name = "port"
            type = "integer"
            "#,
        )
        .unwrap();

        let documents = SchemaDocument::load_with_imports(&[device]).unwrap();
        let names: Vec<&str> = documents
            .iter()
            .flat_map(|d| d.parameters.iter())
            .map(|p| p.name.get_ref().as_str())
            .collect();
        assert_eq!(names, vec!["host", "port"]);
    }

    #[test]
    fn test_shared_import_loaded_once() {
        let temp_dir = TempDir::new().unwrap();
        let common = temp_dir.path().join("common.toml");
        let a = temp_dir.path().join("a.toml");
        let b = temp_dir.path().join("b.toml");

        fs::write(&common, "[[parameter]]\nname = \"host\"\ntype = \"text\"\n").unwrap();
        fs::write(&a, "imports = [\"common.toml\"]\n").unwrap();
        fs::write(&b, "imports = [\"common.toml\"]\n").unwrap();

        let documents = SchemaDocument::load_with_imports(&[a, b]).unwrap();
        assert_eq!(documents.len(), 3);
    }

    #[test]
    fn test_import_cycle_detected() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.toml");
        let b = temp_dir.path().join("b.toml");

        fs::write(&a, "imports = [\"b.toml\"]\n").unwrap();
        fs::write(&b, "imports = [\"a.toml\"]\n").unwrap();

        let result = SchemaDocument::load_with_imports(&[a]);
        match result {
            Err(LoadError::ImportCycle { cycle, .. }) => assert_eq!(cycle.len(), 2),
            other => panic!("expected import cycle, got {:?}", other.map(|d| d.len())),
        }
    }
}

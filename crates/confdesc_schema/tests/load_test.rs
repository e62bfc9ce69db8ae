// Loading several schema files through imports and merging them into one
// parameter list.

use std::fs;

use confdesc_schema::Diagnostic;
use confdesc_schema::Error;
use confdesc_schema::LoadError;
use confdesc_schema::SchemaDocument;
use confdesc_schema::format_diagnostics;
use confdesc_schema::merge;
use tempfile::TempDir;

fn names(documents: Vec<SchemaDocument>) -> (Vec<String>, Vec<Diagnostic>) {
    let (merged, diagnostics) = merge(documents);
    let names = merged
        .parameters
        .into_iter()
        .map(|p| p.name.into_inner())
        .collect();
    (names, diagnostics)
}

#[test]
fn test_imports_load_before_importer() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("common")).unwrap();

    fs::write(
        temp_dir.path().join("common/network.toml"),
        r#"
        [[parameter]]
        name = "host"
        type = "text"
        required = true
        "#,
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("device.toml"),
        r#"
        imports = ["common/network.toml"]

        [[parameter]]
        name = "volume"
        type = "integer"
        min = 0
        max = 100
        "#,
    )
    .unwrap();

    let documents =
        SchemaDocument::load_with_imports(&[temp_dir.path().join("device.toml")]).unwrap();
    assert_eq!(documents.len(), 2);

    let (names, diagnostics) = names(documents);
    assert!(diagnostics.is_empty());
    assert_eq!(names, vec!["host", "volume"]);
}

#[test]
fn test_shared_import_loaded_once() {
    let temp_dir = TempDir::new().unwrap();

    fs::write(
        temp_dir.path().join("base.toml"),
        "[[parameter]]\nname = \"host\"\ntype = \"text\"\n",
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("a.toml"),
        "imports = [\"base.toml\"]\n\n[[parameter]]\nname = \"a\"\ntype = \"text\"\n",
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("b.toml"),
        "imports = [\"base.toml\"]\n\n[[parameter]]\nname = \"b\"\ntype = \"text\"\n",
    )
    .unwrap();

    let documents = SchemaDocument::load_with_imports(&[
        temp_dir.path().join("a.toml"),
        temp_dir.path().join("b.toml"),
    ])
    .unwrap();

    let (names, diagnostics) = names(documents);
    assert!(diagnostics.is_empty(), "{}", format_diagnostics(&diagnostics));
    assert_eq!(names, vec!["host", "a", "b"]);
}

#[test]
fn test_import_cycle_detected() {
    let temp_dir = TempDir::new().unwrap();

    fs::write(temp_dir.path().join("a.toml"), "imports = [\"b.toml\"]\n").unwrap();
    fs::write(temp_dir.path().join("b.toml"), "imports = [\"a.toml\"]\n").unwrap();

    let result = SchemaDocument::load_with_imports(&[temp_dir.path().join("a.toml")]);
    match result {
        Err(LoadError::ImportCycle { cycle, .. }) => assert_eq!(cycle.len(), 2),
        other => panic!("expected import cycle, got {:?}", other.map(|d| d.len())),
    }
}

#[test]
fn test_missing_import_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.toml"), "imports = [\"missing.toml\"]\n").unwrap();

    let result = SchemaDocument::load_with_imports(&[temp_dir.path().join("a.toml")]);
    assert!(matches!(result, Err(LoadError::Io { .. })));
}

#[test]
fn test_duplicate_across_files_reports_both_locations() {
    let temp_dir = TempDir::new().unwrap();

    fs::write(
        temp_dir.path().join("one.toml"),
        "[[parameter]]\nname = \"host\"\ntype = \"text\"\n",
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("two.toml"),
        "[[parameter]]\nname = \"host\"\ntype = \"integer\"\n",
    )
    .unwrap();

    let documents = SchemaDocument::load_with_imports(&[
        temp_dir.path().join("one.toml"),
        temp_dir.path().join("two.toml"),
    ])
    .unwrap();
    let (merged, diagnostics) = merge(documents);

    // First definition wins
    assert_eq!(merged.parameters.len(), 1);
    assert_eq!(merged.parameters[0].parameter_type.get_ref(), "text");

    assert_eq!(diagnostics.len(), 1);
    let Diagnostic::Error(Error::Merge(error)) = &diagnostics[0] else {
        panic!("expected merge error, got {:?}", diagnostics[0]);
    };
    assert_eq!(error.field_path, "parameter.host");
    assert_eq!(error.conflicts.len(), 2);

    let files: Vec<_> = error
        .conflicts
        .iter()
        .map(|c| c.source.as_ref().unwrap().file_path.file_name().unwrap().to_owned())
        .collect();
    assert_eq!(files, vec!["one.toml", "two.toml"]);

    let output = format_diagnostics(&diagnostics);
    assert!(output.contains("Duplicate definition of 'parameter.host'"));
}

#[test]
fn test_parse_error_names_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    fs::write(&path, "[[parameter]]\nname = \"host\"\ntype = \n").unwrap();

    let error = SchemaDocument::load_with_imports(&[path]).unwrap_err();
    assert!(matches!(error, LoadError::Parse { .. }));
    assert!(error.to_string().contains("broken.toml"));
}

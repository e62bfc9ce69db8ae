// End to end: schema files on disk, submitted values, rendered messages.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use confdesc::Config;
use confdesc::MessageKey;
use confdesc::ValidationEngine;
use confdesc::Value;
use confdesc::format_diagnostics;
use confdesc::schema::load_description;
use confdesc::values_from_json;
use confdesc::values_from_toml;
use tempfile::TempDir;

const DEVICE_SCHEMA: &str = r#"
imports = ["network.toml"]

[[parameter]]
name = "email"
type = "text"
pattern = "^[^@]+@[^@]+$"

[[parameter]]
name = "volume"
type = "integer"
min = 5
max = 100

[[parameter]]
name = "mode"
type = "text"
options = [{ value = "eco", label = "Economy" }, { value = "boost" }]
"#;

const NETWORK_SCHEMA: &str = r#"
[[parameter]]
name = "host"
type = "text"
required = true
"#;

fn write_schema(temp_dir: &TempDir) -> PathBuf {
    fs::write(temp_dir.path().join("network.toml"), NETWORK_SCHEMA).unwrap();
    let path = temp_dir.path().join("device.toml");
    fs::write(&path, DEVICE_SCHEMA).unwrap();
    path
}

#[test]
fn test_valid_values_accepted() {
    let temp_dir = TempDir::new().unwrap();
    let (description, diagnostics) = load_description(&[write_schema(&temp_dir)]).unwrap();
    assert!(diagnostics.is_empty());

    let names: Vec<&str> = description.parameters().iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["host", "email", "volume", "mode"]);

    let values = values_from_toml(
        r#"
        host = "example.org"
        email = "someone@example.org"
        volume = 5
        mode = "eco"
        "#,
    )
    .unwrap();

    let engine = ValidationEngine::new();
    assert!(engine.check_configuration(&description, &values).is_ok());
}

#[test]
fn test_every_violation_reported_in_declaration_order() {
    let temp_dir = TempDir::new().unwrap();
    let (description, _) = load_description(&[write_schema(&temp_dir)]).unwrap();

    let values = values_from_json(
        r#"{ "host": null, "email": "bad-value", "volume": 3, "mode": "turbo", "extra": 1 }"#,
    )
    .unwrap();

    let error = ValidationEngine::new()
        .check_configuration(&description, &values)
        .unwrap_err();

    let keys: Vec<(&str, MessageKey)> = error
        .messages()
        .iter()
        .map(|m| (m.parameter_name.as_str(), m.message_key))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("host", MessageKey::RequiredValueMissing),
            ("email", MessageKey::PatternViolated),
            ("volume", MessageKey::ValueOutOfRange),
            ("mode", MessageKey::UnsupportedOption),
        ]
    );

    assert_eq!(
        error.messages()[1].arguments,
        vec!["bad-value", "^[^@]+@[^@]+$"]
    );
    assert_eq!(error.messages()[2].arguments, vec!["3", "5"]);
}

#[test]
fn test_messages_rendered_with_configured_templates() {
    let temp_dir = TempDir::new().unwrap();
    let (description, _) = load_description(&[write_schema(&temp_dir)]).unwrap();

    let config = Config::parse(
        r#"
        [messages]
        REQUIRED_VALUE_MISSING = "Der Parameter {0} ist erforderlich."
        "#,
    )
    .unwrap();
    let catalog = config.message_catalog().unwrap();

    let values = HashMap::from([
        ("email".to_string(), Value::from("a@b")),
        ("volume".to_string(), Value::Integer(101)),
    ]);
    let error = ValidationEngine::new()
        .check_configuration(&description, &values)
        .unwrap_err();

    assert_eq!(
        error.render(&catalog),
        vec![
            "host: Der Parameter host ist erforderlich.",
            "volume: The value 101 is out of range, the limit is 100.",
        ]
    );
}

#[test]
fn test_malformed_schema_rejected_before_validation() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.toml");
    fs::write(
        &path,
        r#"
        [[parameter]]
        name = "code"
        type = "text"
        pattern = "[a-z"

        [[parameter]]
        name = "level"
        type = "float"
        "#,
    )
    .unwrap();

    let diagnostics = load_description(&[path]).unwrap_err();
    assert!(diagnostics.has_errors());
    assert_eq!(diagnostics.0.len(), 2);

    let output = format_diagnostics(&diagnostics.0);
    assert!(output.contains("invalid regular expression"));
    assert!(output.contains("unknown parameter type 'float'"));
}

#[test]
fn test_duplicate_parameter_across_files() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_schema(&temp_dir);
    let extra = temp_dir.path().join("extra.toml");
    fs::write(&extra, "[[parameter]]\nname = \"volume\"\ntype = \"decimal\"\n").unwrap();

    let diagnostics = load_description(&[schema, extra]).unwrap_err();
    let output = format_diagnostics(&diagnostics.0);
    assert!(output.contains("Duplicate definition of 'parameter.volume'"));
}

#[test]
fn test_empty_schema_file_is_only_a_warning() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_schema(&temp_dir);
    let empty = temp_dir.path().join("empty.toml");
    fs::write(&empty, "").unwrap();

    let (description, diagnostics) = load_description(&[schema, empty]).unwrap();
    assert_eq!(description.len(), 4);
    assert!(!diagnostics.has_errors());
    assert_eq!(diagnostics.0.len(), 1);
}

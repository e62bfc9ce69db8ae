use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use anyhow::bail;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use confdesc::Config;
use confdesc::ConfigDescription;
use confdesc::InterpreterRegistry;
use confdesc::LogLevel;
use confdesc::ParameterDescriptor;
use confdesc::ValidationEngine;
use confdesc::format_diagnostics;
use confdesc::schema::load_description;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Validate configuration values against declarative parameter descriptions
#[derive(Parser, Debug)]
#[command(name = "confdesc", version, about)]
struct Cli {
    /// Path to the tool's own config file [default: confdesc.toml if present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured log level
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a values file against schema files
    Check {
        /// Schema files; defaults to `[schema] paths` from the config
        #[arg(long = "schema", num_args = 1..)]
        schemas: Vec<PathBuf>,

        /// Values to validate, a TOML table or a JSON object (`.json`)
        #[arg(long)]
        values: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print every parameter with its type and constraints
    Describe {
        #[arg(long = "schema", num_args = 1..)]
        schemas: Vec<PathBuf>,
    },

    /// List the registered human-language interpreters
    Interpreters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(config.logging.filter(cli.log_level))
        .init();

    match cli.command {
        Command::Check {
            schemas,
            values,
            format,
        } => check(&config, &schemas, &values, format),
        Command::Describe { schemas } => describe(&config, &schemas),
        Command::Interpreters => {
            list_interpreters();
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load the description, printing diagnostics; `None` if the schema is malformed
fn load_schema(config: &Config, schemas: &[PathBuf]) -> anyhow::Result<Option<ConfigDescription>> {
    let paths = if schemas.is_empty() {
        &config.schema.paths[..]
    } else {
        schemas
    };
    if paths.is_empty() {
        bail!("No schema files given; pass --schema or set [schema] paths in the config");
    }

    match load_description(paths) {
        Ok((description, warnings)) => {
            if !warnings.is_empty() {
                eprint!("{}", format_diagnostics(&warnings.0));
            }
            Ok(Some(description))
        }
        Err(diagnostics) => {
            eprint!("{}", format_diagnostics(&diagnostics.0));
            Ok(None)
        }
    }
}

fn check(
    config: &Config,
    schemas: &[PathBuf],
    values_path: &Path,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let catalog = config.message_catalog()?;
    let Some(description) = load_schema(config, schemas)? else {
        return Ok(ExitCode::FAILURE);
    };

    let content = std::fs::read_to_string(values_path)
        .with_context(|| format!("Failed to read values file {}", values_path.display()))?;
    let values = if values_path.extension().is_some_and(|ext| ext == "json") {
        confdesc::values_from_json(&content)
    } else {
        confdesc::values_from_toml(&content)
    }
    .with_context(|| format!("Invalid values file {}", values_path.display()))?;

    let messages = ValidationEngine::new().validate_configuration(&description, &values);
    tracing::info!(
        "{} parameter(s) checked, {} violation(s)",
        description.len(),
        messages.len()
    );

    match format {
        OutputFormat::Text => {
            for message in &messages {
                println!(
                    "{}: {} [{}]",
                    message.parameter_name,
                    catalog.render(message),
                    message.message_key
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&messages)?);
        }
    }

    Ok(if messages.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn describe(config: &Config, schemas: &[PathBuf]) -> anyhow::Result<ExitCode> {
    let Some(description) = load_schema(config, schemas)? else {
        return Ok(ExitCode::FAILURE);
    };

    for parameter in description.parameters() {
        println!("{}", describe_parameter(parameter));
    }
    Ok(ExitCode::SUCCESS)
}

fn describe_parameter(parameter: &ParameterDescriptor) -> String {
    let mut line = format!("{} ({})", parameter.name(), parameter.parameter_type());
    let mut constraints = Vec::new();

    if parameter.is_required() {
        constraints.push("required".to_string());
    }
    if let Some(pattern) = parameter.applicable_pattern() {
        constraints.push(format!("pattern {}", pattern));
    }
    if let Some(min) = parameter.min() {
        constraints.push(format!("min {}", min));
    }
    if let Some(max) = parameter.max() {
        constraints.push(format!("max {}", max));
    }
    if !parameter.options().is_empty() {
        let values: Vec<&str> = parameter.options().iter().map(|o| o.value.as_str()).collect();
        let kind = if parameter.limit_to_options() {
            "options"
        } else {
            "suggestions"
        };
        constraints.push(format!("{} {}", kind, values.join("|")));
    }

    if !constraints.is_empty() {
        line.push_str(": ");
        line.push_str(&constraints.join(", "));
    }
    if let Some(label) = parameter.label() {
        line.push_str(&format!(" \"{}\"", label));
    }
    line
}

fn list_interpreters() {
    let registry = InterpreterRegistry::from_registered();
    if registry.is_empty() {
        println!("no interpreters registered");
        return;
    }

    for interpreter in registry.iter() {
        let locales: Vec<String> = interpreter
            .supported_locales()
            .iter()
            .map(ToString::to_string)
            .collect();
        let locales = if locales.is_empty() {
            "any locale".to_string()
        } else {
            locales.join(", ")
        };
        println!("{}: {} ({})", interpreter.id(), interpreter.label(None), locales);
    }
}

use std::collections::HashMap;

use crate::ConflictLocation;
use crate::Diagnostic;
use crate::Error;
use crate::MergeError;
use crate::RawParameter;
use crate::SchemaDocument;
use crate::Warning;

/// Every parameter of a configuration description, in load order
#[derive(Debug, Default)]
pub struct MergedSchema {
    pub parameters: Vec<RawParameter>,
}

/// Combine loaded documents into one parameter list.
///
/// Parameter names are unique within a description: the first declaration
/// wins and each later one is reported with both locations. Merging continues
/// past conflicts so that all of them are reported at once.
pub fn merge<I>(documents: I) -> (MergedSchema, Vec<Diagnostic>)
where
    I: IntoIterator<Item = SchemaDocument>,
{
    let mut merged = MergedSchema::default();
    let mut diagnostics = Vec::new();
    let mut first_definitions: HashMap<String, ConflictLocation> = HashMap::new();

    for document in documents {
        if document.is_empty() {
            if let Some(source) = &document.source {
                diagnostics.push(Diagnostic::Warning(Warning::EmptySchema {
                    file_path: source.file_path.clone(),
                }));
            }
        }

        for parameter in document.parameters {
            let name = parameter.name.get_ref().clone();
            let location = parameter.name.to_conflict_location();

            if let Some(first) = first_definitions.get(&name) {
                diagnostics.push(Diagnostic::Error(Error::Merge(MergeError {
                    field_path: format!("parameter.{}", name),
                    message: format!("Parameter '{}' is declared more than once", name),
                    conflicts: vec![first.clone(), location],
                })));
                continue;
            }

            first_definitions.insert(name, location);
            merged.parameters.push(parameter);
        }
    }

    (merged, diagnostics)
}

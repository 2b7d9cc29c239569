// Catalog validation. Runs before any code is generated and before a host
// registers handlers; a catalog that fails here must produce no output.

use std::collections::HashSet;

use thiserror::Error;

use crate::schema::{FieldSpec, MethodCatalog, MethodSpec};

#[derive(Debug, Error, PartialEq)]
pub enum SpecError {
    #[error("method with wire name '{0}' has no name")]
    MissingName(String),

    #[error("method '{0}' has no wire name")]
    MissingWireName(String),

    #[error("wire name '{0}' is declared by more than one method")]
    DuplicateWireName(String),

    #[error("method '{method}': duplicate keypath '{key_path}' in {model}")]
    DuplicateKeyPath {
        method: String,
        model: String,
        key_path: String,
    },

    #[error("method '{method}': field '{key_path}' is marked enum but declares no values")]
    EmptyEnumSet { method: String, key_path: String },

    #[error("method '{method}': field '{key_path}' has an empty keypath segment")]
    EmptyKeyPath { method: String, key_path: String },

    #[error("method '{method}': nested model '{model}' recurses into itself via '{key_path}'")]
    CyclicNesting {
        method: String,
        model: String,
        key_path: String,
    },
}

/// Validate a whole catalog. Fails on the first offending method so the
/// error message always points at one concrete field.
pub fn validate_catalog(catalog: &MethodCatalog) -> Result<(), SpecError> {
    let mut wire_names: HashSet<&str> = HashSet::new();
    for method in &catalog.methods {
        validate_method(method)?;
        if !wire_names.insert(method.wire_name.as_str()) {
            return Err(SpecError::DuplicateWireName(method.wire_name.clone()));
        }
    }
    Ok(())
}

/// Validate one method spec: naming, keypath uniqueness per model, enum
/// sets, and nesting acyclicity.
pub fn validate_method(method: &MethodSpec) -> Result<(), SpecError> {
    if method.wire_name.trim().is_empty() {
        return Err(SpecError::MissingWireName(method.name.clone()));
    }
    if method.name.trim().is_empty() {
        return Err(SpecError::MissingName(method.wire_name.clone()));
    }

    let mut path = Vec::new();
    validate_fields(method, "params", &method.params, &mut path)?;
    validate_fields(method, "results", &method.results, &mut path)?;
    Ok(())
}

/// Recursive field check. `path` carries the nesting chain of model names so
/// a re-entered name is caught as a cycle.
fn validate_fields<'a>(
    method: &'a MethodSpec,
    model: &str,
    fields: &'a [FieldSpec],
    path: &mut Vec<&'a str>,
) -> Result<(), SpecError> {
    let mut keys: HashSet<&str> = HashSet::new();
    for field in fields {
        if field.key_path.trim().is_empty() {
            return Err(SpecError::EmptyKeyPath {
                method: method.wire_name.clone(),
                key_path: field.key_path.clone(),
            });
        }
        if !keys.insert(field.key_path.as_str()) {
            return Err(SpecError::DuplicateKeyPath {
                method: method.wire_name.clone(),
                model: model.to_string(),
                key_path: field.key_path.clone(),
            });
        }
        if field.is_enum && field.enum_values.is_empty() {
            return Err(SpecError::EmptyEnumSet {
                method: method.wire_name.clone(),
                key_path: field.key_path.clone(),
            });
        }
        if let Some(nested) = &field.nested {
            if path.contains(&nested.name.as_str()) {
                return Err(SpecError::CyclicNesting {
                    method: method.wire_name.clone(),
                    model: nested.name.clone(),
                    key_path: field.key_path.clone(),
                });
            }
            path.push(nested.name.as_str());
            validate_fields(method, &nested.name, &nested.fields, path)?;
            path.pop();
        }
    }
    Ok(())
}

// trestle-codegen: reads a method catalog JSON, generates TypeScript
// wrappers plus Kotlin and Swift host bindings.

pub mod config;
pub mod context;
pub mod kotlin_gen;
pub mod naming;
pub mod swift_gen;
pub mod ts_gen;

use std::path::{Path, PathBuf};

use thiserror::Error;

use trestle_spec::{validate_catalog, MethodCatalog, SpecError};

use crate::config::{Target, TrestleConfig};
use crate::context::CodegenContext;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    ParseInput { path: PathBuf, message: String },

    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error("failed to write {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("generated output missing or empty: {}", .0.display())]
    Verify(PathBuf),
}

/// Run the generate command. Main entry point for codegen.
pub fn run_generate(config_path: &Path) -> Result<(), GenerateError> {
    let config = load_config(config_path)?;
    let codegen = &config.codegen;

    // Resolve paths relative to the config file directory.
    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    let catalog_path = config_dir.join(&codegen.paths.catalog);

    eprintln!("trestle-codegen: loading catalog...");
    let catalog = load_catalog(&catalog_path)?;
    eprintln!("  Loaded {} methods", catalog.methods.len());

    // Fail before any output exists: a rejected catalog must leave the
    // output directories untouched.
    validate_catalog(&catalog)?;

    let ctx = CodegenContext::new(catalog);
    for (namespace, methods) in &ctx.namespaces {
        eprintln!("    {}: {} methods", namespace, methods.len());
    }

    // Render every target in memory first; only a fully rendered run is
    // flushed to disk.
    let mut files: Vec<(PathBuf, String)> = Vec::new();
    for target in &codegen.targets {
        match target {
            Target::Typescript => {
                eprintln!("trestle-codegen: generating TypeScript...");
                ts_gen::render(&ctx, &config_dir.join(&codegen.paths.script_out), &mut files);
            }
            Target::Kotlin => {
                eprintln!("trestle-codegen: generating Kotlin...");
                kotlin_gen::render(
                    &ctx,
                    &codegen.kotlin,
                    &config_dir.join(&codegen.paths.kotlin_out),
                    &mut files,
                );
            }
            Target::Swift => {
                eprintln!("trestle-codegen: generating Swift...");
                swift_gen::render(
                    &ctx,
                    &codegen.swift,
                    &config_dir.join(&codegen.paths.swift_out),
                    &mut files,
                );
            }
        }
    }

    for (path, content) in &files {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| GenerateError::WriteOutput {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| GenerateError::WriteOutput {
            path: path.clone(),
            source,
        })?;
    }

    eprintln!("trestle-codegen: verifying output...");
    verify_output(&files)?;

    eprintln!(
        "trestle-codegen: done! {} files, {} namespaces, {} methods",
        files.len(),
        ctx.namespaces.len(),
        ctx.method_count
    );
    Ok(())
}

/// Run the check command: parse and validate without writing anything.
pub fn run_check(config_path: &Path) -> Result<(), GenerateError> {
    let config = load_config(config_path)?;
    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    let catalog_path = config_dir.join(&config.codegen.paths.catalog);

    let catalog = load_catalog(&catalog_path)?;
    validate_catalog(&catalog)?;

    let ctx = CodegenContext::new(catalog);
    eprintln!(
        "trestle-codegen: catalog OK ({} methods in {} namespaces)",
        ctx.method_count,
        ctx.namespaces.len()
    );
    Ok(())
}

pub fn load_config(path: &Path) -> Result<TrestleConfig, GenerateError> {
    let data = std::fs::read_to_string(path).map_err(|source| GenerateError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&data).map_err(|e| GenerateError::ParseInput {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

pub fn load_catalog(path: &Path) -> Result<MethodCatalog, GenerateError> {
    let data = std::fs::read_to_string(path).map_err(|source| GenerateError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|e| GenerateError::ParseInput {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Verify codegen output integrity: every rendered file exists and is
/// non-empty on disk.
fn verify_output(files: &[(PathBuf, String)]) -> Result<(), GenerateError> {
    for (path, _) in files {
        match std::fs::metadata(path) {
            Ok(m) if m.len() > 0 => {}
            _ => return Err(GenerateError::Verify(path.clone())),
        }
    }
    Ok(())
}

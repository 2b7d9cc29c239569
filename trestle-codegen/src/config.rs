// Configuration types for trestle-codegen, deserialized from trestle.config.toml.

use serde::Deserialize;

/// Top-level config file.
#[derive(Deserialize)]
pub struct TrestleConfig {
    pub codegen: CodegenConfig,
}

#[derive(Deserialize)]
pub struct CodegenConfig {
    /// Target runtimes to emit. Defaults to all three.
    #[serde(default = "default_targets")]
    pub targets: Vec<Target>,
    pub paths: CodegenPaths,
    #[serde(default)]
    pub kotlin: KotlinConfig,
    #[serde(default)]
    pub swift: SwiftConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Typescript,
    Kotlin,
    Swift,
}

#[derive(Deserialize)]
pub struct CodegenPaths {
    /// Method catalog JSON (relative to the config file).
    pub catalog: String,
    pub script_out: String,
    pub kotlin_out: String,
    pub swift_out: String,
}

#[derive(Deserialize)]
pub struct KotlinConfig {
    #[serde(default = "default_kotlin_package")]
    pub package: String,
}

impl Default for KotlinConfig {
    fn default() -> Self {
        KotlinConfig {
            package: default_kotlin_package(),
        }
    }
}

#[derive(Deserialize, Default)]
pub struct SwiftConfig {
    /// Optional prefix prepended to every generated Swift type name.
    #[serde(default)]
    pub type_prefix: String,
}

fn default_targets() -> Vec<Target> {
    vec![Target::Typescript, Target::Kotlin, Target::Swift]
}

fn default_kotlin_package() -> String {
    "com.trestle.bridge".to_string()
}

// Method catalog types matching the authored JSON format.
//
// Catalog keys are camelCase on disk (`wireName`, `keyPath`, `enumValues`)
// because the same file is read by the script-side tooling.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level file wrapper
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodCatalog {
    pub methods: Vec<MethodSpec>,
}

// ---------------------------------------------------------------------------
// Method
// ---------------------------------------------------------------------------

/// One remote-callable method: its names, parameter fields, and result
/// fields. Pure data, no behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSpec {
    /// Convention-local name (the generated wrapper's function name).
    pub name: String,
    /// Cross-runtime-stable identifier used on the transport, in dotted
    /// namespace form (`storage.getItem`). Globally unique per catalog.
    pub wire_name: String,
    #[serde(default)]
    pub params: Vec<FieldSpec>,
    #[serde(default)]
    pub results: Vec<FieldSpec>,
}

impl MethodSpec {
    /// Namespace segment of the wire name (`storage.getItem` → `storage`).
    /// Wire names without a dot fall into the `bridge` namespace.
    pub fn namespace(&self) -> &str {
        match self.wire_name.split_once('.') {
            Some((ns, _)) => ns,
            None => "bridge",
        }
    }

    /// Whether at least one param field is required. Callers may omit the
    /// params object only when this is false.
    pub fn has_required_params(&self) -> bool {
        self.params.iter().any(|f| f.required)
    }
}

// ---------------------------------------------------------------------------
// Field (used in both params and results)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Wire-level field name inside the payload, stable across runtimes.
    pub key_path: String,
    #[serde(default)]
    pub required: bool,
    pub kind: PrimitiveKind,
    #[serde(default)]
    pub is_enum: bool,
    /// Legal numeric constants for enum fields. Emitted verbatim into every
    /// target runtime, never re-derived.
    #[serde(default)]
    pub enum_values: Vec<i64>,
    /// Structured sub-model for `kind: object` fields.
    #[serde(default)]
    pub nested: Option<Box<ModelSpec>>,
    #[serde(default)]
    pub list: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    Object,
    Void,
    Any,
}

// ---------------------------------------------------------------------------
// Nested model
// ---------------------------------------------------------------------------

/// A named structured sub-model referenced by a field. Nesting recurses
/// with the same field rules; a model name repeating along a nesting path
/// is a cycle and fails validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

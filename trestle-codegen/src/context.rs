// Build context: deterministic ordering and namespace grouping for emitters.

use std::collections::BTreeMap;

use trestle_spec::{FieldSpec, MethodCatalog, MethodSpec, ModelSpec};

use crate::naming::to_pascal_case;

/// Central context for one generation run. Methods are sorted by wire name
/// and grouped by namespace so output is stable across runs.
pub struct CodegenContext {
    /// Namespace -> methods, both levels sorted.
    pub namespaces: BTreeMap<String, Vec<MethodSpec>>,
    /// Total method count (for progress/summary lines).
    pub method_count: usize,
}

impl CodegenContext {
    pub fn new(catalog: MethodCatalog) -> Self {
        let method_count = catalog.methods.len();
        let mut namespaces: BTreeMap<String, Vec<MethodSpec>> = BTreeMap::new();
        for method in catalog.methods {
            namespaces
                .entry(method.namespace().to_string())
                .or_default()
                .push(method);
        }
        for methods in namespaces.values_mut() {
            methods.sort_by(|a, b| a.wire_name.cmp(&b.wire_name));
        }
        CodegenContext {
            namespaces,
            method_count,
        }
    }

    /// All nested models reachable from a namespace's methods, in first-seen
    /// order, deduplicated by model name. Each namespace file declares its
    /// models exactly once.
    pub fn namespace_models<'a>(&'a self, namespace: &str) -> Vec<&'a ModelSpec> {
        let mut seen = std::collections::HashSet::new();
        let mut models = Vec::new();
        if let Some(methods) = self.namespaces.get(namespace) {
            for method in methods {
                collect_models(&method.params, &mut seen, &mut models);
                collect_models(&method.results, &mut seen, &mut models);
            }
        }
        models
    }
}

fn collect_models<'a>(
    fields: &'a [FieldSpec],
    seen: &mut std::collections::HashSet<&'a str>,
    out: &mut Vec<&'a ModelSpec>,
) {
    for field in fields {
        if let Some(nested) = &field.nested {
            // Nested models first so declarations precede their uses.
            collect_models(&nested.fields, seen, out);
            if seen.insert(nested.name.as_str()) {
                out.push(nested);
            }
        }
    }
}

/// Parameter model type name, identical across all target runtimes.
pub fn params_model_name(method: &MethodSpec) -> String {
    to_pascal_case(&method.name) + "Params"
}

/// Result model type name, identical across all target runtimes.
pub fn result_model_name(method: &MethodSpec) -> String {
    to_pascal_case(&method.name) + "Result"
}

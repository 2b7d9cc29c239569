// Swift (host B) binding generation: parameter/result structs with a static
// field-descriptor table (the wire-keypath annotation contract), a handler
// protocol per namespace, and static registration functions.

use std::path::{Path, PathBuf};

use trestle_spec::{FieldSpec, MethodSpec, PrimitiveKind};

use crate::config::SwiftConfig;
use crate::context::{params_model_name, result_model_name, CodegenContext};
use crate::naming::{escape_swift, to_camel_case, to_pascal_case};
use crate::ts_gen::HEADER;

/// Render all Swift output files into `files` without touching disk.
pub fn render(
    ctx: &CodegenContext,
    config: &SwiftConfig,
    out_dir: &Path,
    files: &mut Vec<(PathBuf, String)>,
) {
    for (namespace, methods) in &ctx.namespaces {
        let code = generate_namespace(ctx, config, namespace, methods);
        let filename = format!("Trestle{}.swift", to_pascal_case(namespace));
        files.push((out_dir.join(filename), code));
    }
}

fn generate_namespace(
    ctx: &CodegenContext,
    config: &SwiftConfig,
    namespace: &str,
    methods: &[MethodSpec],
) -> String {
    let prefix = config.type_prefix.as_str();
    let mut out = String::with_capacity(4096);
    out.push_str(HEADER);
    out.push_str("\nimport Foundation\nimport TrestleRuntime\n");

    for model in ctx.namespace_models(namespace) {
        out.push('\n');
        generate_struct(&mut out, prefix, &model.name, &model.fields);
    }

    for method in methods {
        out.push('\n');
        generate_struct(&mut out, prefix, &params_model_name(method), &method.params);
        out.push('\n');
        generate_struct(&mut out, prefix, &result_model_name(method), &method.results);
    }

    out.push('\n');
    generate_handler_protocol(&mut out, prefix, namespace, methods);
    out.push('\n');
    generate_registration(&mut out, prefix, namespace, methods);

    out
}

fn generate_struct(out: &mut String, prefix: &str, name: &str, fields: &[FieldSpec]) {
    let fields: Vec<&FieldSpec> = fields
        .iter()
        .filter(|f| f.kind != PrimitiveKind::Void)
        .collect();

    out.push_str(&format!("public struct {prefix}{name} {{\n"));
    for field in &fields {
        let prop = escape_swift(&to_camel_case(&field.key_path));
        let ty = swift_type(prefix, field);
        if field.required {
            out.push_str(&format!("    public let {prop}: {ty}\n"));
        } else {
            out.push_str(&format!("    public var {prop}: {ty}?\n"));
        }
    }

    if !fields.is_empty() {
        out.push('\n');
    }
    out.push_str("    public static let fields: [BridgeField] = [\n");
    for field in &fields {
        out.push_str(&format!("        {},\n", field_descriptor(prefix, field)));
    }
    out.push_str("    ]\n}\n");
}

fn field_descriptor(prefix: &str, field: &FieldSpec) -> String {
    let mut desc = format!(
        "BridgeField(keyPath: \"{}\", required: {}, kind: .{}",
        field.key_path,
        field.required,
        kind_case(field.kind)
    );
    if field.is_enum {
        desc.push_str(&format!(
            ", enumValues: [{}]",
            field
                .enum_values
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    if let Some(nested) = &field.nested {
        desc.push_str(&format!(", nested: {prefix}{}.fields", nested.name));
    }
    if field.list {
        desc.push_str(", list: true");
    }
    desc.push(')');
    desc
}

fn kind_case(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::String => "string",
        PrimitiveKind::Number => "number",
        PrimitiveKind::Boolean => "boolean",
        PrimitiveKind::Object => "object",
        PrimitiveKind::Void => "void",
        PrimitiveKind::Any => "any",
    }
}

fn generate_handler_protocol(out: &mut String, prefix: &str, namespace: &str, methods: &[MethodSpec]) {
    out.push_str(&format!(
        "public protocol {prefix}{}Handlers {{\n",
        to_pascal_case(namespace)
    ));
    for method in methods {
        let func = escape_swift(&to_camel_case(&method.name));
        out.push_str(&format!(
            "    func {func}(_ params: {prefix}{}, _ completion: Completion<{prefix}{}>)\n",
            params_model_name(method),
            result_model_name(method)
        ));
    }
    out.push_str("}\n");
}

fn generate_registration(out: &mut String, prefix: &str, namespace: &str, methods: &[MethodSpec]) {
    let pascal = to_pascal_case(namespace);
    out.push_str(&format!(
        "public func register{pascal}Handlers(_ registry: MethodRegistry, _ handlers: {prefix}{pascal}Handlers) {{\n"
    ));
    for method in methods {
        let func = escape_swift(&to_camel_case(&method.name));
        out.push_str(&format!(
            "    registry.register(\"{}\", {prefix}{}.fields, handlers.{func})\n",
            method.wire_name,
            params_model_name(method)
        ));
    }
    out.push_str("}\n");
}

fn swift_type(prefix: &str, field: &FieldSpec) -> String {
    let base = if field.is_enum {
        "Int".to_string()
    } else {
        match field.kind {
            PrimitiveKind::String => "String".to_string(),
            PrimitiveKind::Number => "Double".to_string(),
            PrimitiveKind::Boolean => "Bool".to_string(),
            PrimitiveKind::Object => match &field.nested {
                Some(model) => format!("{prefix}{}", model.name),
                None => "[String: Any]".to_string(),
            },
            PrimitiveKind::Void => "Void".to_string(),
            PrimitiveKind::Any => "Any".to_string(),
        }
    };
    if field.list {
        format!("[{base}]")
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trestle_spec::MethodCatalog;

    fn storage_catalog() -> MethodCatalog {
        serde_json::from_str(
            r#"{
                "methods": [{
                    "name": "getItem",
                    "wireName": "storage.getItem",
                    "params": [
                        {"keyPath": "key", "required": true, "kind": "string"},
                        {"keyPath": "scope", "kind": "number", "isEnum": true, "enumValues": [0, 1]}
                    ],
                    "results": [{"keyPath": "value", "kind": "string"}]
                }]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn descriptor_table_mirrors_the_spec() {
        let ctx = CodegenContext::new(storage_catalog());
        let mut files = Vec::new();
        render(&ctx, &SwiftConfig::default(), Path::new("swift"), &mut files);
        assert_eq!(files[0].0, Path::new("swift/TrestleStorage.swift"));
        let code = &files[0].1;
        assert!(code.contains("public struct GetItemParams {"));
        assert!(code.contains("public let key: String"));
        assert!(code.contains("public var scope: Int?"));
        assert!(code.contains("BridgeField(keyPath: \"key\", required: true, kind: .string)"));
        assert!(code.contains(
            "BridgeField(keyPath: \"scope\", required: false, kind: .number, enumValues: [0, 1])"
        ));
    }

    #[test]
    fn registration_and_protocol_are_static() {
        let ctx = CodegenContext::new(storage_catalog());
        let mut files = Vec::new();
        render(&ctx, &SwiftConfig::default(), Path::new("swift"), &mut files);
        let code = &files[0].1;
        assert!(code.contains("public protocol StorageHandlers {"));
        assert!(code.contains(
            "registry.register(\"storage.getItem\", GetItemParams.fields, handlers.getItem)"
        ));
    }

    #[test]
    fn type_prefix_applies_to_declarations_and_references() {
        let config = SwiftConfig {
            type_prefix: "TB".into(),
        };
        let ctx = CodegenContext::new(storage_catalog());
        let mut files = Vec::new();
        render(&ctx, &config, Path::new("swift"), &mut files);
        let code = &files[0].1;
        assert!(code.contains("public struct TBGetItemParams {"));
        assert!(code.contains("registry.register(\"storage.getItem\", TBGetItemParams.fields"));
        // The wire name itself is never prefixed.
        assert!(code.contains("\"storage.getItem\""));
    }
}

// TypeScript binding generation: per-namespace module with model interfaces,
// closed enum value sets, and validate-and-forward wrapper functions.
//
// Wrappers never re-implement protocol rules: each one forwards its declared
// rule list to the runtime's `bridgeCall`, which owns validation, marshaling,
// and response normalization.

use std::path::{Path, PathBuf};

use trestle_spec::{FieldSpec, MethodSpec, PrimitiveKind};

use crate::context::{params_model_name, result_model_name, CodegenContext};
use crate::naming::{escape_ts, to_camel_case, to_kebab_case, to_snake_case};

pub const HEADER: &str = "// Generated by trestle-codegen. Do not edit.\n";

/// Render all TypeScript output files into `files` without touching disk.
pub fn render(ctx: &CodegenContext, out_dir: &Path, files: &mut Vec<(PathBuf, String)>) {
    for (namespace, methods) in &ctx.namespaces {
        let code = generate_namespace(ctx, namespace, methods);
        let filename = format!("{}.ts", to_kebab_case(namespace));
        files.push((out_dir.join(filename), code));
    }
    files.push((out_dir.join("index.ts"), generate_index(ctx)));
}

fn generate_index(ctx: &CodegenContext) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for namespace in ctx.namespaces.keys() {
        let file = to_kebab_case(namespace);
        let alias = escape_ts(&to_camel_case(namespace));
        out.push_str(&format!("export * as {alias} from \"./{file}\";\n"));
    }
    out
}

fn generate_namespace(ctx: &CodegenContext, namespace: &str, methods: &[MethodSpec]) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(HEADER);
    out.push_str("\nimport { bridgeCall, BridgeCallback, Rule } from \"@trestle/runtime\";\n");

    // Shared nested models first so interfaces precede their uses.
    for model in ctx.namespace_models(namespace) {
        out.push('\n');
        generate_interface(&mut out, &model.name, &model.fields);
    }

    for method in methods {
        out.push('\n');
        generate_interface(&mut out, &params_model_name(method), &method.params);
        out.push('\n');
        generate_interface(&mut out, &result_model_name(method), &method.results);
        out.push('\n');
        generate_wrapper(&mut out, method);
    }

    out
}

fn generate_interface(out: &mut String, name: &str, fields: &[FieldSpec]) {
    out.push_str(&format!("export interface {name} {{\n"));
    for field in fields {
        if field.kind == PrimitiveKind::Void {
            continue;
        }
        // Property names are wire keypaths; reserved words are legal here.
        let opt = if field.required { "" } else { "?" };
        out.push_str(&format!("  {}{opt}: {};\n", field.key_path, ts_type(field)));
    }
    out.push_str("}\n");
}

fn generate_wrapper(out: &mut String, method: &MethodSpec) {
    let rules_name = format!("{}_RULES", to_snake_case(&method.name).to_uppercase());
    let params_ty = params_model_name(method);
    let result_ty = result_model_name(method);
    let func = escape_ts(&to_camel_case(&method.name));

    out.push_str(&format!("const {rules_name}: Rule[] = [\n"));
    for rule in wrapper_rules(method) {
        out.push_str(&format!("  {rule},\n"));
    }
    out.push_str("];\n\n");

    // Params may be omitted only when the spec declares zero required fields.
    let params_arg = if method.has_required_params() {
        format!("params: {params_ty}")
    } else {
        format!("params?: {params_ty}")
    };
    out.push_str(&format!(
        "export function {func}({params_arg}, callback: BridgeCallback<{result_ty}>): void {{\n\
         \x20 bridgeCall({wire:?}, {rules_name}, params, callback);\n\
         }}\n",
        wire = method.wire_name,
    ));
}

/// The declared rule list, in the same derivation order the Rust client uses
/// (`MethodDesc::from_spec`): params-presence first, then per-field rules in
/// spec order.
fn wrapper_rules(method: &MethodSpec) -> Vec<String> {
    let mut rules = Vec::new();
    if method.has_required_params() {
        rules.push("{ rule: \"paramsRequired\" }".to_string());
    }
    for field in &method.params {
        if field.kind == PrimitiveKind::Void {
            continue;
        }
        let key = &field.key_path;
        let kind = kind_tag(field.kind);
        let list = if field.list { ", list: true" } else { "" };
        if field.required {
            rules.push(format!(
                "{{ rule: \"requiredField\", keyPath: {key:?}, kind: {kind:?}{list} }}"
            ));
            if field.kind == PrimitiveKind::String && !field.list {
                rules.push(format!("{{ rule: \"nonEmptyString\", keyPath: {key:?} }}"));
            }
        } else {
            rules.push(format!(
                "{{ rule: \"typedField\", keyPath: {key:?}, kind: {kind:?}{list} }}"
            ));
        }
        if field.is_enum {
            rules.push(format!(
                "{{ rule: \"enumMember\", keyPath: {key:?}, values: [{}] }}",
                fmt_values(&field.enum_values)
            ));
        }
    }
    rules
}

fn kind_tag(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::String => "string",
        PrimitiveKind::Number => "number",
        PrimitiveKind::Boolean => "boolean",
        PrimitiveKind::Object => "object",
        PrimitiveKind::Void => "void",
        PrimitiveKind::Any => "any",
    }
}

fn ts_type(field: &FieldSpec) -> String {
    let base = if field.is_enum {
        // Closed value set: the legal constants appear verbatim in the type.
        field
            .enum_values
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(" | ")
    } else {
        match field.kind {
            PrimitiveKind::String => "string".to_string(),
            PrimitiveKind::Number => "number".to_string(),
            PrimitiveKind::Boolean => "boolean".to_string(),
            PrimitiveKind::Object => match &field.nested {
                Some(model) => model.name.clone(),
                None => "Record<string, unknown>".to_string(),
            },
            PrimitiveKind::Void => "void".to_string(),
            PrimitiveKind::Any => "any".to_string(),
        }
    };
    if field.list {
        if base.contains(' ') {
            format!("({base})[]")
        } else {
            format!("{base}[]")
        }
    } else {
        base
    }
}

fn fmt_values(values: &[i64]) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

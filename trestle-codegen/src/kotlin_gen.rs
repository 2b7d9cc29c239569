// Kotlin (host A) binding generation: parameter/result models annotated with
// wire keypaths, a handler interface per namespace, and static registration
// functions. No reflection: every registration names its wire string and
// model class at compile time.

use std::path::{Path, PathBuf};

use trestle_spec::{FieldSpec, MethodSpec, PrimitiveKind};

use crate::config::KotlinConfig;
use crate::context::{params_model_name, result_model_name, CodegenContext};
use crate::naming::{escape_kotlin, to_camel_case, to_pascal_case};
use crate::ts_gen::HEADER;

/// Render all Kotlin output files into `files` without touching disk.
pub fn render(
    ctx: &CodegenContext,
    config: &KotlinConfig,
    out_dir: &Path,
    files: &mut Vec<(PathBuf, String)>,
) {
    for (namespace, methods) in &ctx.namespaces {
        let code = generate_namespace(ctx, config, namespace, methods);
        let filename = format!("Trestle{}.kt", to_pascal_case(namespace));
        files.push((out_dir.join(filename), code));
    }
}

fn generate_namespace(
    ctx: &CodegenContext,
    config: &KotlinConfig,
    namespace: &str,
    methods: &[MethodSpec],
) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(HEADER);
    out.push_str(&format!("\npackage {}\n\n", config.package));
    out.push_str("import com.trestle.runtime.BridgeField\n");
    out.push_str("import com.trestle.runtime.Completion\n");
    out.push_str("import com.trestle.runtime.MethodRegistry\n");

    for model in ctx.namespace_models(namespace) {
        out.push('\n');
        generate_model(&mut out, &model.name, &model.fields);
    }

    for method in methods {
        out.push('\n');
        generate_model(&mut out, &params_model_name(method), &method.params);
        out.push('\n');
        generate_model(&mut out, &result_model_name(method), &method.results);
    }

    out.push('\n');
    generate_handler_interface(&mut out, namespace, methods);
    out.push('\n');
    generate_registration(&mut out, namespace, methods);

    out
}

fn generate_model(out: &mut String, name: &str, fields: &[FieldSpec]) {
    let fields: Vec<&FieldSpec> = fields
        .iter()
        .filter(|f| f.kind != PrimitiveKind::Void)
        .collect();

    // A data class needs at least one constructor parameter.
    if fields.is_empty() {
        out.push_str(&format!("class {name}\n"));
        return;
    }

    out.push_str(&format!("data class {name}(\n"));
    for field in fields {
        out.push_str(&format!("    {}\n", field_annotation(field)));
        let prop = escape_kotlin(&to_camel_case(&field.key_path));
        let ty = kotlin_type(field);
        if field.required {
            out.push_str(&format!("    val {prop}: {ty},\n"));
        } else {
            out.push_str(&format!("    val {prop}: {ty}? = null,\n"));
        }
    }
    out.push_str(")\n");
}

fn field_annotation(field: &FieldSpec) -> String {
    let mut ann = format!(
        "@BridgeField(keyPath = \"{}\", required = {}",
        field.key_path, field.required
    );
    if field.is_enum {
        ann.push_str(&format!(
            ", enumValues = [{}]",
            field
                .enum_values
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    if let Some(nested) = &field.nested {
        ann.push_str(&format!(", nested = {}::class", nested.name));
    }
    if field.list {
        ann.push_str(", list = true");
    }
    ann.push(')');
    ann
}

fn generate_handler_interface(out: &mut String, namespace: &str, methods: &[MethodSpec]) {
    out.push_str(&format!("interface {}Handlers {{\n", to_pascal_case(namespace)));
    for method in methods {
        let func = escape_kotlin(&to_camel_case(&method.name));
        out.push_str(&format!(
            "    fun {func}(params: {}, completion: Completion<{}>)\n",
            params_model_name(method),
            result_model_name(method)
        ));
    }
    out.push_str("}\n");
}

fn generate_registration(out: &mut String, namespace: &str, methods: &[MethodSpec]) {
    let pascal = to_pascal_case(namespace);
    out.push_str(&format!(
        "fun register{pascal}Handlers(registry: MethodRegistry, handlers: {pascal}Handlers) {{\n"
    ));
    for method in methods {
        let func = escape_kotlin(&to_camel_case(&method.name));
        out.push_str(&format!(
            "    registry.register(\"{}\", {}::class, handlers::{func})\n",
            method.wire_name,
            params_model_name(method)
        ));
    }
    out.push_str("}\n");
}

fn kotlin_type(field: &FieldSpec) -> String {
    let base = if field.is_enum {
        // Enum sets are integer constants across all runtimes.
        "Int".to_string()
    } else {
        match field.kind {
            PrimitiveKind::String => "String".to_string(),
            PrimitiveKind::Number => "Double".to_string(),
            PrimitiveKind::Boolean => "Boolean".to_string(),
            PrimitiveKind::Object => match &field.nested {
                Some(model) => model.name.clone(),
                None => "Map<String, Any?>".to_string(),
            },
            PrimitiveKind::Void => "Unit".to_string(),
            PrimitiveKind::Any => "Any?".to_string(),
        }
    };
    if field.list {
        format!("List<{base}>")
    } else {
        base
    }
}

// Envelope decoding against the declared parameter model. Runs before the
// handler: a handler never sees malformed input.

use serde_json::{Map, Value};

use trestle_spec::{FieldSpec, PrimitiveKind};

/// Decode a payload against the declared fields. Returns the decoded map
/// containing only declared fields (undeclared payload entries are
/// dropped), or a diagnostic naming the offending field.
pub fn decode_params(fields: &[FieldSpec], payload: &Map<String, Value>) -> Result<Map<String, Value>, String> {
    decode_fields(fields, payload, "")
}

fn decode_fields(
    fields: &[FieldSpec],
    payload: &Map<String, Value>,
    prefix: &str,
) -> Result<Map<String, Value>, String> {
    let mut decoded = Map::new();
    for field in fields {
        if field.kind == PrimitiveKind::Void {
            continue;
        }
        let path = join_path(prefix, &field.key_path);
        match payload.get(&field.key_path) {
            None | Some(Value::Null) => {
                if field.required {
                    return Err(format!("missing required field '{path}'"));
                }
            }
            Some(value) => {
                decoded.insert(field.key_path.clone(), decode_value(field, value, &path)?);
            }
        }
    }
    Ok(decoded)
}

fn decode_value(field: &FieldSpec, value: &Value, path: &str) -> Result<Value, String> {
    if field.list {
        let Some(items) = value.as_array() else {
            return Err(format!("field '{path}' must be an array"));
        };
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            out.push(decode_scalar(field, item, &format!("{path}[{i}]"))?);
        }
        return Ok(Value::Array(out));
    }
    decode_scalar(field, value, path)
}

fn decode_scalar(field: &FieldSpec, value: &Value, path: &str) -> Result<Value, String> {
    if field.is_enum {
        let member = value.as_i64().is_some_and(|n| field.enum_values.contains(&n));
        if !member {
            return Err(format!(
                "field '{path}' must be one of {:?}",
                field.enum_values
            ));
        }
        return Ok(value.clone());
    }

    match field.kind {
        PrimitiveKind::String if value.is_string() => Ok(value.clone()),
        PrimitiveKind::Number if value.is_number() => Ok(value.clone()),
        PrimitiveKind::Boolean if value.is_boolean() => Ok(value.clone()),
        PrimitiveKind::Any => Ok(value.clone()),
        PrimitiveKind::Object => {
            let Some(inner) = value.as_object() else {
                return Err(format!("field '{path}' must be an object"));
            };
            match &field.nested {
                Some(model) => Ok(Value::Object(decode_fields(&model.fields, inner, path)?)),
                None => Ok(value.clone()),
            }
        }
        PrimitiveKind::Void => Ok(Value::Null),
        _ => Err(format!(
            "field '{path}' must be {}",
            kind_name(field.kind)
        )),
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn kind_name(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::String => "a string",
        PrimitiveKind::Number => "a number",
        PrimitiveKind::Boolean => "a boolean",
        PrimitiveKind::Object => "an object",
        PrimitiveKind::Void => "null",
        PrimitiveKind::Any => "present",
    }
}

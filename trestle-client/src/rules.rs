// Declared validation rules. A method's rule list is derived once from its
// spec and evaluated in declaration order; the first failing rule produces
// the diagnostic the caller sees.

use serde_json::Value;

use trestle_spec::{MethodSpec, PrimitiveKind};

/// One validation rule. The tags mirror the rule objects embedded in the
/// generated TypeScript wrappers, so the script runtime and this client
/// evaluate identical lists.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// The params object itself must be present.
    ParamsRequired,
    /// Field must be present, non-null, and of the declared kind.
    RequiredField {
        key_path: String,
        kind: PrimitiveKind,
        list: bool,
    },
    /// Field must be a non-empty string after trimming.
    NonEmptyString { key_path: String },
    /// Field may be absent, but a present value must match the declared kind.
    TypedField {
        key_path: String,
        kind: PrimitiveKind,
        list: bool,
    },
    /// A present value must be one of the declared constants.
    EnumMember { key_path: String, values: Vec<i64> },
}

/// Runtime descriptor for one callable method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDesc {
    pub wire_name: String,
    pub rules: Vec<Rule>,
}

impl MethodDesc {
    /// Derive the rule list from a method spec. Order is part of the
    /// contract: params presence first, then per-field rules in spec order.
    pub fn from_spec(spec: &MethodSpec) -> Self {
        let mut rules = Vec::new();
        if spec.has_required_params() {
            rules.push(Rule::ParamsRequired);
        }
        for field in &spec.params {
            if field.kind == PrimitiveKind::Void {
                continue;
            }
            if field.required {
                rules.push(Rule::RequiredField {
                    key_path: field.key_path.clone(),
                    kind: field.kind,
                    list: field.list,
                });
                if field.kind == PrimitiveKind::String && !field.list {
                    rules.push(Rule::NonEmptyString {
                        key_path: field.key_path.clone(),
                    });
                }
            } else {
                rules.push(Rule::TypedField {
                    key_path: field.key_path.clone(),
                    kind: field.kind,
                    list: field.list,
                });
            }
            if field.is_enum {
                rules.push(Rule::EnumMember {
                    key_path: field.key_path.clone(),
                    values: field.enum_values.clone(),
                });
            }
        }
        MethodDesc {
            wire_name: spec.wire_name.clone(),
            rules,
        }
    }
}

/// Evaluate the rule list. Returns the first failing rule's diagnostic.
pub fn evaluate(rules: &[Rule], params: Option<&Value>) -> Result<(), String> {
    let fields = params.and_then(Value::as_object);
    for rule in rules {
        match rule {
            Rule::ParamsRequired => {
                if params.is_none_or(Value::is_null) {
                    return Err("Invalid params: params cannot be null or undefined".to_string());
                }
                if fields.is_none() {
                    return Err("Invalid params: params must be an object".to_string());
                }
            }
            Rule::RequiredField {
                key_path,
                kind,
                list,
            } => {
                let value = fields.and_then(|f| f.get(key_path));
                match value {
                    None | Some(Value::Null) => {
                        return Err(format!("Invalid params: field '{key_path}' is required"));
                    }
                    Some(v) if !kind_matches(*kind, *list, v) => {
                        return Err(kind_diagnostic(key_path, *kind, *list));
                    }
                    _ => {}
                }
            }
            Rule::NonEmptyString { key_path } => {
                let value = fields.and_then(|f| f.get(key_path)).and_then(Value::as_str);
                if value.is_none_or(|s| s.trim().is_empty()) {
                    return Err(format!(
                        "Invalid params: field '{key_path}' must be a non-empty string"
                    ));
                }
            }
            Rule::TypedField {
                key_path,
                kind,
                list,
            } => {
                if let Some(v) = fields.and_then(|f| f.get(key_path)) {
                    if !v.is_null() && !kind_matches(*kind, *list, v) {
                        return Err(kind_diagnostic(key_path, *kind, *list));
                    }
                }
            }
            Rule::EnumMember { key_path, values } => {
                if let Some(v) = fields.and_then(|f| f.get(key_path)) {
                    if v.is_null() {
                        continue;
                    }
                    // Non-integral numbers never match the closed set.
                    let ok = v.as_i64().is_some_and(|n| values.contains(&n));
                    if !ok {
                        return Err(format!(
                            "Invalid params: field '{key_path}' must be one of {values:?}"
                        ));
                    }
                }
            }
        }
    }
    Ok(())
}

fn kind_matches(kind: PrimitiveKind, list: bool, value: &Value) -> bool {
    if list {
        // Element kinds are checked by the host decoder; the client only
        // guards the container shape.
        return value.is_array();
    }
    match kind {
        PrimitiveKind::String => value.is_string(),
        PrimitiveKind::Number => value.is_number(),
        PrimitiveKind::Boolean => value.is_boolean(),
        PrimitiveKind::Object => value.is_object(),
        PrimitiveKind::Void => value.is_null(),
        PrimitiveKind::Any => true,
    }
}

fn kind_diagnostic(key_path: &str, kind: PrimitiveKind, list: bool) -> String {
    let expected = if list {
        "an array"
    } else {
        match kind {
            PrimitiveKind::String => "a string",
            PrimitiveKind::Number => "a number",
            PrimitiveKind::Boolean => "a boolean",
            PrimitiveKind::Object => "an object",
            PrimitiveKind::Void => "null",
            PrimitiveKind::Any => "present",
        }
    };
    format!("Invalid params: field '{key_path}' must be {expected}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn storage_get_item() -> MethodSpec {
        serde_json::from_str(
            r#"{
                "name": "getItem",
                "wireName": "storage.getItem",
                "params": [
                    {"keyPath": "key", "required": true, "kind": "string"},
                    {"keyPath": "scope", "kind": "number", "isEnum": true, "enumValues": [0, 1]}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn derivation_order_matches_the_generated_wrappers() {
        let desc = MethodDesc::from_spec(&storage_get_item());
        assert_eq!(desc.wire_name, "storage.getItem");
        assert_eq!(
            desc.rules,
            vec![
                Rule::ParamsRequired,
                Rule::RequiredField {
                    key_path: "key".into(),
                    kind: PrimitiveKind::String,
                    list: false,
                },
                Rule::NonEmptyString {
                    key_path: "key".into()
                },
                Rule::TypedField {
                    key_path: "scope".into(),
                    kind: PrimitiveKind::Number,
                    list: false,
                },
                Rule::EnumMember {
                    key_path: "scope".into(),
                    values: vec![0, 1],
                },
            ]
        );
    }

    #[test]
    fn missing_params_fails_with_the_canonical_diagnostic() {
        let desc = MethodDesc::from_spec(&storage_get_item());
        assert_eq!(
            evaluate(&desc.rules, None).unwrap_err(),
            "Invalid params: params cannot be null or undefined"
        );
        assert_eq!(
            evaluate(&desc.rules, Some(&Value::Null)).unwrap_err(),
            "Invalid params: params cannot be null or undefined"
        );
    }

    #[test]
    fn first_failing_rule_wins() {
        let desc = MethodDesc::from_spec(&storage_get_item());
        // Both key and scope are wrong; the diagnostic names key.
        let params = json!({"key": 7, "scope": 99});
        assert_eq!(
            evaluate(&desc.rules, Some(&params)).unwrap_err(),
            "Invalid params: field 'key' must be a string"
        );
    }

    #[test]
    fn blank_string_fails_non_empty_rule() {
        let desc = MethodDesc::from_spec(&storage_get_item());
        let params = json!({"key": "   "});
        assert_eq!(
            evaluate(&desc.rules, Some(&params)).unwrap_err(),
            "Invalid params: field 'key' must be a non-empty string"
        );
    }

    #[test]
    fn enum_membership_is_exact() {
        let desc = MethodDesc::from_spec(&storage_get_item());
        assert!(evaluate(&desc.rules, Some(&json!({"key": "k", "scope": 1}))).is_ok());
        let err = evaluate(&desc.rules, Some(&json!({"key": "k", "scope": 2}))).unwrap_err();
        assert!(err.contains("scope"));
        // 1.5 is a number but never a member of an integer set.
        assert!(evaluate(&desc.rules, Some(&json!({"key": "k", "scope": 1.5}))).is_err());
    }

    #[test]
    fn optional_fields_may_be_absent_or_null() {
        let desc = MethodDesc::from_spec(&storage_get_item());
        assert!(evaluate(&desc.rules, Some(&json!({"key": "k"}))).is_ok());
        assert!(evaluate(&desc.rules, Some(&json!({"key": "k", "scope": null}))).is_ok());
    }

    #[test]
    fn no_rules_accepts_missing_params() {
        let spec: MethodSpec = serde_json::from_str(
            r#"{"name": "navigateBack", "wireName": "nav.navigateBack"}"#,
        )
        .unwrap();
        let desc = MethodDesc::from_spec(&spec);
        assert!(desc.rules.is_empty());
        assert!(evaluate(&desc.rules, None).is_ok());
    }
}

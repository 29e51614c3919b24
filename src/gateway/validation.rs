use crate::gateway::GatewayError;
use crate::gateway::schema::{Constraint, ParamKind, ParamSpec, ToolDefinition, whole_i64};
use serde_json::{Map, Value};
use std::path::Path;

/// Arguments that passed validation, with defaults filled in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Map<String, Value>,
}

impl Arguments {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn require_str(&self, name: &str) -> Result<&str, GatewayError> {
        self.str(name)
            .ok_or_else(|| GatewayError::invalid(name, "is required"))
    }

    pub fn f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    pub fn i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(whole_i64)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn strings(&self, name: &str) -> Vec<String> {
        self.get(name)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Checks `arguments` against the tool's parameter specs and stops at the
/// first violation.
pub fn validate(definition: &ToolDefinition, arguments: &Value) -> Result<Arguments, GatewayError> {
    let empty = Map::new();
    let supplied = match arguments {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => {
            return Err(GatewayError::invalid(
                "arguments",
                "arguments must be an object",
            ));
        }
    };

    if let Some(unknown) = supplied
        .keys()
        .find(|name| definition.param(name).is_none())
    {
        return Err(GatewayError::invalid(
            unknown.as_str(),
            format!("unknown parameter for {}", definition.name),
        ));
    }

    let mut values = Map::new();
    for spec in &definition.params {
        match supplied.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    return Err(GatewayError::invalid(spec.name, "is required"));
                }
                if let Some(default) = &spec.default {
                    values.insert(spec.name.to_string(), default.clone());
                }
            }
            Some(value) => {
                check_value(spec, value)?;
                values.insert(spec.name.to_string(), value.clone());
            }
        }
    }

    Ok(Arguments { values })
}

fn check_value(spec: &ParamSpec, value: &Value) -> Result<(), GatewayError> {
    if !spec.kind.matches(value) {
        return Err(GatewayError::invalid(
            spec.name,
            format!("must be {}", article(spec.kind)),
        ));
    }
    for constraint in &spec.constraints {
        check_constraint(spec.name, constraint, value)?;
    }
    Ok(())
}

fn article(kind: ParamKind) -> String {
    match kind {
        ParamKind::Integer | ParamKind::Object | ParamKind::StringArray => {
            format!("an {}", kind.as_str())
        }
        _ => format!("a {}", kind.as_str()),
    }
}

fn check_constraint(field: &str, constraint: &Constraint, value: &Value) -> Result<(), GatewayError> {
    match constraint {
        Constraint::Range { min, max } => {
            let number = value.as_f64().unwrap_or(f64::NAN);
            if !(*min..=*max).contains(&number) {
                return Err(GatewayError::invalid(
                    field,
                    format!("must be a number between {min} and {max}"),
                ));
            }
        }
        Constraint::AtLeast(min) => {
            let number = value.as_f64().unwrap_or(f64::NAN);
            if number.is_nan() || number < *min as f64 {
                return Err(GatewayError::invalid(field, format!("must be at least {min}")));
            }
        }
        Constraint::OneOf(allowed) => {
            let text = value.as_str().unwrap_or_default();
            if !allowed.contains(&text) {
                return Err(GatewayError::invalid(
                    field,
                    format!("must be one of {}", allowed.join(", ")),
                ));
            }
        }
        Constraint::Extensions(allowed) => {
            for path in path_values(value) {
                if !has_extension(path, allowed) {
                    return Err(GatewayError::invalid(
                        field,
                        format!("{path}: file type must be one of {}", allowed.join(", ")),
                    ));
                }
            }
        }
        Constraint::NonEmpty => {
            let empty = match value {
                Value::String(text) => text.trim().is_empty(),
                Value::Array(items) => items.is_empty(),
                _ => false,
            };
            if empty {
                return Err(GatewayError::invalid(field, "must not be empty"));
            }
        }
        Constraint::PathSegment => {
            let text = value.as_str().unwrap_or_default().trim();
            if text == "." || text == ".." {
                return Err(GatewayError::invalid(
                    field,
                    format!("`{text}` is not a valid identifier"),
                ));
            }
        }
        Constraint::Graph => {
            for key in ["nodes", "edges"] {
                if !value.get(key).is_some_and(Value::is_array) {
                    return Err(GatewayError::invalid(
                        field,
                        format!("graph must contain a `{key}` array"),
                    ));
                }
            }
        }
    }
    Ok(())
}

fn path_values(value: &Value) -> Vec<&str> {
    match value {
        Value::String(path) => vec![path.as_str()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn has_extension(path: &str, allowed: &[&str]) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            allowed
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(ext))
        })
}

use crate::backend::BackendRequest;
use crate::gateway::{Arguments, GatewayError};
use serde_json::{Map, Value, json};

/// Maps validated arguments onto the backend call for one tool.
pub type RequestBuilder = fn(&Arguments) -> Result<BackendRequest, GatewayError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Number,
    Integer,
    Boolean,
    StringArray,
    Object,
}

impl ParamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Number => "number",
            ParamKind::Integer => "integer",
            ParamKind::Boolean => "boolean",
            ParamKind::StringArray => "array of strings",
            ParamKind::Object => "object",
        }
    }

    pub fn matches(self, value: &Value) -> bool {
        match self {
            ParamKind::String => value.is_string(),
            ParamKind::Number => value.is_number(),
            ParamKind::Integer => whole_i64(value).is_some(),
            ParamKind::Boolean => value.is_boolean(),
            ParamKind::StringArray => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            ParamKind::Object => value.is_object(),
        }
    }

    fn schema(self) -> Value {
        match self {
            ParamKind::StringArray => json!({
                "type": "array",
                "items": { "type": "string" }
            }),
            other => json!({ "type": other.json_type() }),
        }
    }

    fn json_type(self) -> &'static str {
        match self {
            ParamKind::StringArray => "array",
            other => other.as_str(),
        }
    }
}

/// Integer view of a JSON number. Floats count only when whole and inside
/// the i64 range; anything else is `None` rather than saturated.
pub fn whole_i64(value: &Value) -> Option<i64> {
    if let Some(number) = value.as_i64() {
        return Some(number);
    }
    let number = value.as_f64()?;
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    let in_range = number >= i64::MIN as f64 && number < i64::MAX as f64;
    (number.fract() == 0.0 && in_range).then_some(number as i64)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Inclusive numeric range.
    Range { min: f64, max: f64 },
    AtLeast(i64),
    OneOf(&'static [&'static str]),
    /// File paths must end in one of these extensions (case-insensitive).
    Extensions(&'static [&'static str]),
    NonEmpty,
    /// Value becomes a single URL path segment, so `.` and `..` are refused.
    PathSegment,
    /// Object with `nodes` and `edges` arrays.
    Graph,
}

impl Constraint {
    fn annotate(&self, kind: ParamKind, schema: &mut Map<String, Value>) {
        match self {
            Constraint::Range { min, max } => {
                schema.insert("minimum".to_string(), json!(min));
                schema.insert("maximum".to_string(), json!(max));
            }
            Constraint::AtLeast(min) => {
                schema.insert("minimum".to_string(), json!(min));
            }
            Constraint::OneOf(values) => {
                schema.insert("enum".to_string(), json!(values));
            }
            Constraint::NonEmpty if kind == ParamKind::StringArray => {
                schema.insert("minItems".to_string(), json!(1));
            }
            Constraint::NonEmpty => {
                schema.insert("minLength".to_string(), json!(1));
            }
            Constraint::Graph => {
                schema.insert(
                    "properties".to_string(),
                    json!({
                        "nodes": { "type": "array" },
                        "edges": { "type": "array" }
                    }),
                );
                schema.insert("required".to_string(), json!(["nodes", "edges"]));
            }
            Constraint::Extensions(_) | Constraint::PathSegment => {}
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub description: &'static str,
    pub required: bool,
    pub default: Option<Value>,
    pub constraints: Vec<Constraint>,
}

impl ParamSpec {
    pub fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: true,
            default: None,
            constraints: Vec::new(),
        }
    }

    pub fn optional(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind, description)
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    fn schema(&self) -> Value {
        let mut schema = match self.kind.schema() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        schema.insert("description".to_string(), json!(self.description));
        if let Some(default) = &self.default {
            schema.insert("default".to_string(), default.clone());
        }
        for constraint in &self.constraints {
            constraint.annotate(self.kind, &mut schema);
        }
        Value::Object(schema)
    }
}

#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<ParamSpec>,
    pub build: RequestBuilder,
}

impl ToolDefinition {
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|spec| spec.name == name)
    }

    pub fn required_params(&self) -> impl Iterator<Item = &ParamSpec> {
        self.params.iter().filter(|spec| spec.required)
    }

    /// JSON Schema advertised through `tools/list`.
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|spec| (spec.name.to_string(), spec.schema()))
            .collect();
        let required: Vec<&str> = self.required_params().map(|spec| spec.name).collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false
        })
    }
}

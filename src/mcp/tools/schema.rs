//! Declarative parameter schemas for tools.
//!
//! A [`ParameterSchema`] is the single source for both the JSON Schema
//! advertised in `tools/list` and the checks run before a handler is invoked.

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Number, Value};

use super::validation::{ValidationError, ValidationErrors};

#[derive(Debug, Clone, PartialEq)]
pub enum ParamKind {
    String,
    Number,
    /// A number without a fractional part.
    Integer,
    Boolean,
    StringArray,
    Enum(&'static [&'static str]),
}

impl ParamKind {
    fn label(&self) -> &'static str {
        match self {
            Self::String | Self::Enum(_) => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::StringArray => "array of strings",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub default: Option<Value>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub description: Option<&'static str>,
}

impl ParamSpec {
    pub fn new(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: None,
            minimum: None,
            maximum: None,
            description: None,
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, ParamKind::String)
    }

    pub fn number(name: &'static str) -> Self {
        Self::new(name, ParamKind::Number)
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(name, ParamKind::Integer)
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, ParamKind::Boolean)
    }

    pub fn string_array(name: &'static str) -> Self {
        Self::new(name, ParamKind::StringArray)
    }

    pub fn one_of(name: &'static str, values: &'static [&'static str]) -> Self {
        Self::new(name, ParamKind::Enum(values))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn range(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    fn json_schema(&self) -> Value {
        let mut schema = Map::new();
        match &self.kind {
            ParamKind::String => {
                schema.insert("type".into(), json!("string"));
            }
            ParamKind::Number => {
                schema.insert("type".into(), json!("number"));
            }
            ParamKind::Integer => {
                schema.insert("type".into(), json!("integer"));
            }
            ParamKind::Boolean => {
                schema.insert("type".into(), json!("boolean"));
            }
            ParamKind::StringArray => {
                schema.insert("type".into(), json!("array"));
                schema.insert("items".into(), json!({ "type": "string" }));
            }
            ParamKind::Enum(values) => {
                schema.insert("type".into(), json!("string"));
                schema.insert("enum".into(), json!(values));
            }
        }
        if let Some(minimum) = self.minimum {
            schema.insert("minimum".into(), json!(minimum));
        }
        if let Some(maximum) = self.maximum {
            schema.insert("maximum".into(), json!(maximum));
        }
        if let Some(default) = &self.default {
            schema.insert("default".into(), default.clone());
        }
        if let Some(description) = self.description {
            schema.insert("description".into(), json!(description));
        }
        Value::Object(schema)
    }

    /// Check one present value, returning the value to pass downstream.
    /// `Ok(None)` means not provided: empty arrays and blank optional strings.
    fn check(&self, value: &Value) -> Result<Option<Value>, ValidationError> {
        let name = self.name;
        match &self.kind {
            ParamKind::String => {
                let text = value
                    .as_str()
                    .ok_or_else(|| ValidationError::wrong_type(name, "string", json_kind(value)))?;
                if text.trim().is_empty() {
                    return if self.required {
                        Err(ValidationError::blank_field(name))
                    } else {
                        Ok(None)
                    };
                }
                Ok(Some(value.clone()))
            }
            ParamKind::Number => {
                let number = value
                    .as_f64()
                    .ok_or_else(|| ValidationError::wrong_type(name, "number", json_kind(value)))?;
                self.check_range(number)?;
                Ok(Some(value.clone()))
            }
            ParamKind::Integer => {
                let number = value
                    .as_f64()
                    .filter(|n| n.fract() == 0.0)
                    .ok_or_else(|| ValidationError::wrong_type(name, "integer", json_kind(value)))?;
                self.check_range(number)?;
                // 10.0 and 10 both arrive as an integer value
                let normalized = value
                    .as_i64()
                    .or_else(|| (number.abs() < i64::MAX as f64).then(|| number as i64))
                    .map(|whole| Value::Number(Number::from(whole)))
                    .unwrap_or_else(|| value.clone());
                Ok(Some(normalized))
            }
            ParamKind::Boolean => {
                if !value.is_boolean() {
                    return Err(ValidationError::wrong_type(name, "boolean", json_kind(value)));
                }
                Ok(Some(value.clone()))
            }
            ParamKind::StringArray => {
                let items = value.as_array().ok_or_else(|| {
                    ValidationError::wrong_type(name, "array of strings", json_kind(value))
                })?;
                if let Some(bad) = items.iter().find(|item| !item.is_string()) {
                    return Err(ValidationError::wrong_type(
                        name,
                        "array of strings",
                        &format!("array containing {}", json_kind(bad)),
                    ));
                }
                if items.is_empty() {
                    return Ok(None);
                }
                Ok(Some(value.clone()))
            }
            ParamKind::Enum(allowed) => {
                let text = value
                    .as_str()
                    .ok_or_else(|| ValidationError::wrong_type(name, "string", json_kind(value)))?;
                if !allowed.contains(&text) {
                    return Err(ValidationError::not_one_of(name, text, allowed));
                }
                Ok(Some(value.clone()))
            }
        }
    }

    fn check_range(&self, number: f64) -> Result<(), ValidationError> {
        if let Some(minimum) = self.minimum {
            if number < minimum {
                return Err(ValidationError::below_minimum(self.name, minimum));
            }
        }
        if let Some(maximum) = self.maximum {
            if number > maximum {
                return Err(ValidationError::above_maximum(self.name, maximum));
            }
        }
        Ok(())
    }
}

/// Ordered parameter list for one tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSchema {
    params: Vec<ParamSpec>,
}

impl ParameterSchema {
    pub fn new(params: Vec<ParamSpec>) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// JSON Schema object for the `inputSchema` of a tool descriptor.
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|param| (param.name.to_string(), param.json_schema()))
            .collect();
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|param| param.required)
            .map(|param| param.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Check raw call arguments and fill defaults. Every problem is reported,
    /// not only the first. Keys not declared in the schema are dropped.
    pub fn validate(&self, arguments: Option<Value>) -> Result<Arguments, ValidationErrors> {
        let raw = match arguments {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map,
            Some(_) => return Err(ValidationError::not_an_object().into()),
        };

        let mut errors = ValidationErrors::new();
        let mut accepted = Map::new();

        for param in &self.params {
            match raw.get(param.name).filter(|value| !value.is_null()) {
                Some(value) => match param.check(value) {
                    Ok(Some(checked)) => {
                        accepted.insert(param.name.to_string(), checked);
                    }
                    Ok(None) => {
                        if let Some(default) = &param.default {
                            accepted.insert(param.name.to_string(), default.clone());
                        }
                    }
                    Err(error) => errors.add(error),
                },
                None if param.required => errors.add(ValidationError::missing_field(param.name)),
                None => {
                    if let Some(default) = &param.default {
                        accepted.insert(param.name.to_string(), default.clone());
                    }
                }
            }
        }

        errors.into_result()?;
        Ok(Arguments(accepted))
    }
}

/// Arguments that passed validation, with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Deserialize into the tool's typed argument record.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, ValidationErrors> {
        serde_json::from_value(Value::Object(self.0))
            .map_err(|err| ValidationError::new("arguments", err.to_string()).into())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

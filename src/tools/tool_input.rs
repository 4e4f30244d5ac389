//! Input normalization.
//!
//! Agents hand tools either a serialized JSON blob or an already structured
//! value. [`ToolInput`] captures both, and [`normalize`] turns either into
//! validated [`QueryParams`] in one step.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde_json::{Map, Number, Value};

use crate::catalog::{OptionalParam, ParamDefault, ParamKind, ParamSpec};
use crate::utilities::errors::NormalizationError;

/// Raw tool input as received from the agent.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInput {
    /// Serialized payload, parsed as JSON on normalization.
    Text(String),
    /// Already structured payload.
    Structured(Value),
}

impl ToolInput {
    /// The empty input, for argument-less tools.
    pub fn empty() -> Self {
        ToolInput::Structured(Value::Null)
    }
}

impl From<&str> for ToolInput {
    fn from(s: &str) -> Self {
        ToolInput::Text(s.to_string())
    }
}

impl From<String> for ToolInput {
    fn from(s: String) -> Self {
        ToolInput::Text(s)
    }
}

impl From<Value> for ToolInput {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => ToolInput::Text(s),
            other => ToolInput::Structured(other),
        }
    }
}

impl From<Option<Value>> for ToolInput {
    fn from(value: Option<Value>) -> Self {
        value.map(ToolInput::from).unwrap_or_else(ToolInput::empty)
    }
}

/// A single normalized parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Number(Number),
    Date(NaiveDate),
}

impl ParamValue {
    fn is_blank(&self) -> bool {
        matches!(self, ParamValue::Text(s) if s.trim().is_empty())
    }

    fn from_default(default: &ParamDefault) -> Self {
        match default {
            ParamDefault::Count(n) => ParamValue::Number(Number::from(*n)),
            ParamDefault::Text(s) => ParamValue::Text(s.to_string()),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => write!(f, "{}", s.trim()),
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Validated parameters for one invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams(BTreeMap<String, ParamValue>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        self.0.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Coerce raw input into validated query parameters.
///
/// Pure: no I/O, no logging side effects beyond debug traces. Fails with
/// [`NormalizationError`] instead of panicking.
pub fn normalize(
    input: &ToolInput,
    required: &[ParamSpec],
    optional: &[OptionalParam],
) -> Result<QueryParams, NormalizationError> {
    let object = to_object(input)?;
    let declared = |name: &str| {
        required
            .iter()
            .chain(optional.iter().map(|o| &o.spec))
            .find(|spec| spec.name == name)
    };

    let mut params = QueryParams::new();
    for (key, value) in object {
        let spec = declared(key.as_str());
        if let Some(converted) = convert(&key, value, spec)? {
            params.insert(key, converted);
        }
    }

    for spec in required {
        match params.get(spec.name) {
            Some(value) if !value.is_blank() => {}
            _ => return Err(NormalizationError::MissingField(spec.name.to_string())),
        }
    }

    for opt in optional {
        let absent = params.get(opt.spec.name).map_or(true, ParamValue::is_blank);
        if absent {
            params.insert(opt.spec.name, ParamValue::from_default(&opt.default));
        }
    }

    Ok(params)
}

fn to_object(input: &ToolInput) -> Result<Map<String, Value>, NormalizationError> {
    let value = match input {
        ToolInput::Text(raw) => {
            log::debug!("Parsing input string: {}", raw);
            serde_json::from_str::<Value>(raw)
                .map_err(|e| NormalizationError::MalformedPayload(e.to_string()))?
        }
        // Absent arguments, as sent for argument-less tools.
        ToolInput::Structured(Value::Null) => return Ok(Map::new()),
        ToolInput::Structured(value) => value.clone(),
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(NormalizationError::WrongShape(type_name(&other))),
    }
}

fn convert(
    key: &str,
    value: Value,
    spec: Option<&ParamSpec>,
) -> Result<Option<ParamValue>, NormalizationError> {
    let converted = match value {
        Value::Null => None,
        Value::Number(n) => Some(ParamValue::Number(n)),
        Value::String(s) => Some(match spec.map(|p| p.kind) {
            Some(ParamKind::Date) => match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
                Ok(date) => ParamValue::Date(date),
                // The remote service decides what to make of it.
                Err(_) => ParamValue::Text(s),
            },
            _ => ParamValue::Text(s),
        }),
        other => match spec {
            Some(spec) => {
                return Err(NormalizationError::InvalidField {
                    field: key.to_string(),
                    expected: match spec.kind {
                        ParamKind::Coordinate => "a number or numeric string",
                        ParamKind::Date => "a YYYY-MM-DD string",
                        ParamKind::Count => "a positive integer",
                    },
                })
            }
            None => {
                log::debug!("Ignoring undeclared non-scalar field '{}' ({})", key, type_name(&other));
                None
            }
        },
    };
    Ok(converted)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

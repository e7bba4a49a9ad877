// ABOUTME: Tagged value model shared by the resolver and the renderer
// ABOUTME: Converts YAML documents into mappings and serializes them for Handlebars

use serde::{Serialize, Serializer};
use serde_yaml::Value as YamlValue;
use std::collections::BTreeMap;

use super::error::FragmentError;

/// Keyed by name. Ordering is by key so resolved output is deterministic.
pub type Mapping = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Scalar(Scalar::Null) => "null",
            Value::Scalar(_) => "scalar",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }
}

/// Look up a dotted path such as `server.tls.port`.
pub fn lookup<'a>(mapping: &'a Mapping, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = mapping.get(segments.next()?)?;
    for segment in segments {
        current = current.as_mapping()?.get(segment)?;
    }
    Some(current)
}

/// Parse a YAML document into a mapping fragment.
///
/// Empty and `null` documents produce an empty mapping. Any other
/// non-mapping top level is rejected.
pub fn parse_document(text: &str) -> Result<Mapping, FragmentError> {
    if text.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let document: YamlValue = serde_yaml::from_str(text)?;
    match Value::try_from(document)? {
        Value::Mapping(map) => Ok(map),
        Value::Scalar(Scalar::Null) => Ok(Mapping::new()),
        other => Err(FragmentError::NotAMapping(other.kind())),
    }
}

impl TryFrom<YamlValue> for Value {
    type Error = FragmentError;

    fn try_from(value: YamlValue) -> Result<Self, Self::Error> {
        let converted = match value {
            YamlValue::Null => Value::null(),
            YamlValue::Bool(b) => Value::Scalar(Scalar::Bool(b)),
            YamlValue::Number(n) => Value::Scalar(number_scalar(&n)),
            YamlValue::String(s) => Value::Scalar(Scalar::String(s)),
            YamlValue::Sequence(items) => Value::Sequence(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            YamlValue::Mapping(map) => {
                let mut converted = Mapping::new();
                for (key, value) in map {
                    converted.insert(key_string(key)?, Value::try_from(value)?);
                }
                Value::Mapping(converted)
            }
            YamlValue::Tagged(tagged) => Value::try_from(tagged.value)?,
        };
        Ok(converted)
    }
}

fn number_scalar(n: &serde_yaml::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Integer(i)
    } else if let Some(f) = n.as_f64() {
        Scalar::Float(f)
    } else {
        Scalar::Null
    }
}

fn key_string(key: YamlValue) -> Result<String, FragmentError> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Null => Ok("null".to_string()),
        YamlValue::Tagged(tagged) => key_string(tagged.value),
        other => Err(FragmentError::InvalidKey(format!("{:?}", other))),
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(scalar) => scalar.serialize(serializer),
            Value::Sequence(items) => items.serialize(serializer),
            Value::Mapping(map) => map.serialize(serializer),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Integer(i) => serializer.serialize_i64(*i),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::String(s))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Scalar::Integer(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}

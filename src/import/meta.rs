//! YAML metadata decoding
//!
//! Metadata files are written against YAML 1.1 loaders: `yes`/`no`/`on`/`off`
//! are booleans and a repeated mapping key keeps its last value. Decoding
//! goes through [`Yaml11Value`] so both rules hold on top of `serde_yaml`.

use std::fmt;

use serde::de::{
    self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor,
};
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::{CheckerError, CheckerResult};
use crate::models::MetadataDocument;

/// Decoder for `LABEL.meta.yaml` files
pub struct MetadataImporter {
    file: String,
}

impl MetadataImporter {
    /// Create an importer; `file` names the source in error messages
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into() }
    }

    /// Decode a metadata document
    ///
    /// Any decode failure is fatal. The document root must be a mapping.
    pub fn parse(&self, content: &str) -> CheckerResult<MetadataDocument> {
        let deserializer = serde_yaml::Deserializer::from_str(content);
        let Yaml11Value(doc) =
            Yaml11Value::deserialize(deserializer).map_err(|err| CheckerError::MetaParse {
                file: self.file.clone(),
                message: describe_yaml_error(&err),
            })?;

        if !doc.is_mapping() {
            return Err(CheckerError::MetaParse {
                file: self.file.clone(),
                message: "document root is not a mapping".to_string(),
            });
        }

        debug!(file = %self.file, "Metadata decoded");
        Ok(doc)
    }
}

/// Plain scalars read as booleans by YAML 1.1 loaders
fn yaml11_bool(text: &str) -> Option<bool> {
    match text {
        "yes" | "Yes" | "YES" | "true" | "True" | "TRUE" | "on" | "On" | "ON" => Some(true),
        "no" | "No" | "NO" | "false" | "False" | "FALSE" | "off" | "Off" | "OFF" => Some(false),
        _ => None,
    }
}

/// Document value decoded with YAML 1.1 booleans and last-wins mapping keys
///
/// Keys are kept as written; only values are resolved.
pub struct Yaml11Value(pub Value);

impl<'de> Deserialize<'de> for Yaml11Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(Yaml11Visitor).map(Yaml11Value)
    }
}

struct Yaml11Visitor;

impl<'de> Visitor<'de> for Yaml11Visitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any YAML value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    // Integers wider than 64 bits keep their magnitude as floats
    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Value, E> {
        Ok(Value::Number((v as f64).into()))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Value, E> {
        Ok(Value::Number((v as f64).into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(yaml11_bool(v).map_or_else(|| Value::String(v.to_string()), Value::Bool))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(match yaml11_bool(&v) {
            Some(b) => Value::Bool(b),
            None => Value::String(v),
        })
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Yaml11Value::deserialize(deserializer).map(|v| v.0)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::new();
        while let Some(Yaml11Value(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut mapping = Mapping::new();
        while let Some((key, Yaml11Value(value))) = map.next_entry::<Value, Yaml11Value>()? {
            // Later entries replace earlier ones in place
            mapping.insert(key, value);
        }
        Ok(Value::Mapping(mapping))
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Value, A::Error> {
        let (tag, variant) = data.variant::<String>()?;
        let Yaml11Value(value) = variant.newtype_variant()?;
        Ok(Value::Tagged(Box::new(TaggedValue {
            tag: Tag::new(tag),
            value,
        })))
    }
}

fn describe_yaml_error(err: &serde_yaml::Error) -> String {
    match err.location() {
        Some(location) => format!(
            "line {}, column {}: {err}",
            location.line(),
            location.column()
        ),
        None => err.to_string(),
    }
}

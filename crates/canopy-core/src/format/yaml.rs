//! YAML adapter backed by `serde_yaml`.
//!
//! YAML scalars are untyped text, so import runs every scalar's source text
//! through [`classify`](super::classify::classify) rather than trusting the
//! parser's own typing: `yes` is a boolean, `"42"` is an integer whatever the
//! quoting, and `+5` or `0x1F` stay strings.
//!
//! Import takes two passes over the document. The first parses it into a
//! `serde_yaml::Value`, which gives the shape of every node. The second walks the
//! same text again, asking the deserializer for each scalar as a string so the
//! source text is kept verbatim.

use std::fmt;
use std::result::Result as StdResult;

use log::{debug, warn};
use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_yaml::{Mapping, Number as YamlNumber, Value as YamlValue};

use super::classify::{classify, ScalarClass};
use super::{native_number, text_content, widen_f32, write_decimal, write_signed, write_unsigned};
use super::{Format, NativeNumber};
use crate::error::{Result, TreeError};
use crate::node::{Node, Value};

const NAME: &str = "yaml";

/// YAML load/save.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFormat;

impl Format for YamlFormat {
    fn name(&self) -> &'static str {
        NAME
    }

    fn load_str(&self, content: &str) -> Result<Node> {
        let raw = parse(content)?;
        let mut out = Node::new();
        import(raw, &mut out)?;
        debug!("imported {} bytes of yaml", content.len());
        Ok(out)
    }

    fn load_bytes(&self, content: &[u8]) -> Result<Node> {
        self.load_str(text_content(NAME, content)?)
    }

    fn save_string(&self, node: &Node) -> Result<String> {
        let value = export(node)?;
        serde_yaml::to_string(&value).map_err(|e| TreeError::UnsupportedOperation(e.to_string()))
    }

    fn save_bytes(&self, node: &Node) -> Result<Vec<u8>> {
        self.save_string(node).map(String::into_bytes)
    }
}

/// A YAML document with every scalar kept as its source text.
#[derive(Debug, Clone, PartialEq)]
pub enum RawYaml {
    Null,
    Scalar(String),
    Sequence(Vec<RawYaml>),
    Mapping(Vec<(String, RawYaml)>),
}

/// Parse YAML text, keeping scalars untyped.
pub fn parse(content: &str) -> Result<RawYaml> {
    let shape: YamlValue =
        serde_yaml::from_str(content).map_err(|e| TreeError::malformed(NAME, e))?;
    if untag(&shape).is_null() {
        return Ok(RawYaml::Null);
    }
    Shaped(&shape)
        .deserialize(serde_yaml::Deserializer::from_str(content))
        .map_err(|e| TreeError::malformed(NAME, e))
}

/// Write a parsed YAML document into `out`.
pub fn import(raw: RawYaml, out: &mut Node) -> Result<()> {
    match raw {
        RawYaml::Null => {
            out.clear();
            Ok(())
        }
        RawYaml::Scalar(text) => import_scalar(&text, out),
        RawYaml::Sequence(items) => {
            out.set(Node::array())?;
            for item in items {
                let mut child = Node::new();
                import(item, &mut child)?;
                out.push_node(child)?;
            }
            Ok(())
        }
        RawYaml::Mapping(entries) => {
            out.set(Node::mapping())?;
            for (key, item) in entries {
                import(item, out.entry(&key)?)?;
            }
            Ok(())
        }
    }
}

fn import_scalar(text: &str, out: &mut Node) -> Result<()> {
    match classify(text)? {
        ScalarClass::Boolean(b) => out.set(b),
        ScalarClass::Unsigned(u) => write_unsigned(out, u),
        ScalarClass::Signed(i) => write_signed(out, i),
        ScalarClass::Decimal(f) => write_decimal(out, f),
        ScalarClass::Text => out.set(text),
    }
}

fn untag(value: &YamlValue) -> &YamlValue {
    match value {
        YamlValue::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

/// Deserializes one node, using its already-parsed `shape` to pick between a
/// scalar, a sequence and a mapping.
struct Shaped<'a>(&'a YamlValue);

impl<'de, 'a> DeserializeSeed<'de> for Shaped<'a> {
    type Value = RawYaml;

    fn deserialize<D>(self, deserializer: D) -> StdResult<RawYaml, D::Error>
    where
        D: Deserializer<'de>,
    {
        match untag(self.0) {
            YamlValue::Null => deserializer
                .deserialize_ignored_any(IgnoredAny)
                .map(|_| RawYaml::Null),
            YamlValue::Sequence(items) => deserializer.deserialize_seq(SequenceVisitor(items)),
            YamlValue::Mapping(map) => deserializer.deserialize_map(MappingVisitor(map)),
            _ => deserializer.deserialize_str(TextVisitor).map(RawYaml::Scalar),
        }
    }
}

struct TextVisitor;

impl<'de> Visitor<'de> for TextVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a YAML scalar")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> StdResult<String, E> {
        Ok(v.to_owned())
    }
}

struct SequenceVisitor<'a>(&'a [YamlValue]);

impl<'de, 'a> Visitor<'de> for SequenceVisitor<'a> {
    type Value = RawYaml;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a YAML sequence of {} items", self.0.len())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> StdResult<RawYaml, A::Error> {
        let mut items = Vec::with_capacity(self.0.len());
        for shape in self.0 {
            match seq.next_element_seed(Shaped(shape))? {
                Some(item) => items.push(item),
                None => return Err(de::Error::invalid_length(items.len(), &self)),
            }
        }
        Ok(RawYaml::Sequence(items))
    }
}

struct MappingVisitor<'a>(&'a Mapping);

impl<'de, 'a> Visitor<'de> for MappingVisitor<'a> {
    type Value = RawYaml;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a YAML mapping of {} entries", self.0.len())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> StdResult<RawYaml, A::Error> {
        let mut entries = Vec::with_capacity(self.0.len());
        for (key_shape, shape) in self.0.iter() {
            let string_key = match untag(key_shape) {
                YamlValue::Sequence(_) | YamlValue::Mapping(_) => {
                    return Err(de::Error::custom("mapping keys must be scalars"));
                }
                YamlValue::String(_) => true,
                _ => false,
            };
            let key = match map.next_key::<String>()? {
                Some(key) => key,
                None => return Err(de::Error::invalid_length(entries.len(), &self)),
            };
            if !string_key {
                warn!("yaml key {key} is not a string; using its text");
            }
            let item = map.next_value_seed(Shaped(shape))?;
            entries.push((key, item));
        }
        Ok(RawYaml::Mapping(entries))
    }
}

/// Build a `serde_yaml` value from a tree.
pub fn export(node: &Node) -> Result<YamlValue> {
    match node.value() {
        Value::Null => Ok(YamlValue::Null),
        Value::String(s) => Ok(YamlValue::String(s.clone())),
        Value::Boolean(b) => Ok(YamlValue::Bool(*b)),
        Value::Number(_) => {
            let number = match native_number(node)? {
                NativeNumber::U32(v) => YamlNumber::from(v),
                NativeNumber::U64(v) => YamlNumber::from(v),
                NativeNumber::I32(v) => YamlNumber::from(v),
                NativeNumber::I64(v) => YamlNumber::from(v),
                NativeNumber::F32(v) => YamlNumber::from(widen_f32(v)),
                NativeNumber::F64(v) => YamlNumber::from(v),
            };
            Ok(YamlValue::Number(number))
        }
        Value::Array(items) => items
            .iter()
            .map(export)
            .collect::<Result<Vec<_>>>()
            .map(YamlValue::Sequence),
        Value::Mapping(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (key, child) in map {
                out.insert(YamlValue::String(key.clone()), export(child)?);
            }
            Ok(YamlValue::Mapping(out))
        }
    }
}

//! JSON adapter backed by `serde_json`.
//!
//! # Example
//! ```
//! use canopy_core::{Format, JsonFormat};
//!
//! let json = JsonFormat::new();
//! let tree = json.load_str(r#"{"name":"Alice","scores":[95,87.5]}"#)?;
//! assert_eq!(tree["scores"][0].read::<u32>()?, 95);
//! assert!(tree["scores"][1].has_decimal());
//! assert_eq!(json.save_string(&tree)?, r#"{"name":"Alice","scores":[95,87.5]}"#);
//! # Ok::<(), canopy_core::TreeError>(())
//! ```

use log::debug;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value as JsonValue};

use super::{native_number, text_content, widen_f32, write_decimal, write_signed, write_unsigned};
use super::{Format, NativeNumber};
use crate::error::{Result, TreeError};
use crate::node::{Node, Value};

const NAME: &str = "json";

/// JSON load/save. Compact output by default; pretty output indents by four spaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat {
    pretty: bool,
}

impl JsonFormat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable pretty-printed output.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl Format for JsonFormat {
    fn name(&self) -> &'static str {
        NAME
    }

    fn load_str(&self, content: &str) -> Result<Node> {
        let value: JsonValue =
            serde_json::from_str(content).map_err(|e| TreeError::malformed(NAME, e))?;
        let mut out = Node::new();
        import(&value, &mut out)?;
        debug!("imported {} bytes of json", content.len());
        Ok(out)
    }

    fn load_bytes(&self, content: &[u8]) -> Result<Node> {
        self.load_str(text_content(NAME, content)?)
    }

    fn save_string(&self, node: &Node) -> Result<String> {
        let value = export(node)?;
        if !self.pretty {
            return serde_json::to_string(&value)
                .map_err(|e| TreeError::UnsupportedOperation(e.to_string()));
        }
        let mut buf = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        value
            .serialize(&mut serializer)
            .map_err(|e| TreeError::UnsupportedOperation(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| TreeError::UnsupportedOperation(e.to_string()))
    }

    fn save_bytes(&self, node: &Node) -> Result<Vec<u8>> {
        self.save_string(node).map(String::into_bytes)
    }
}

/// Write a `serde_json` value into `out`.
pub fn import(value: &JsonValue, out: &mut Node) -> Result<()> {
    match value {
        JsonValue::Null => {
            out.clear();
            Ok(())
        }
        JsonValue::Bool(b) => out.set(*b),
        JsonValue::Number(n) => {
            if let Some(u) = n.as_u64() {
                write_unsigned(out, u)
            } else if let Some(i) = n.as_i64() {
                write_signed(out, i)
            } else if let Some(f) = n.as_f64() {
                write_decimal(out, f)
            } else {
                Err(TreeError::malformed(NAME, format!("unrepresentable number {n}")))
            }
        }
        JsonValue::String(s) => out.set(s.as_str()),
        JsonValue::Array(items) => {
            out.set(Node::array())?;
            for item in items {
                let mut child = Node::new();
                import(item, &mut child)?;
                out.push_node(child)?;
            }
            Ok(())
        }
        JsonValue::Object(map) => {
            out.set(Node::mapping())?;
            for (key, item) in map {
                import(item, out.entry(key)?)?;
            }
            Ok(())
        }
    }
}

/// Build a `serde_json` value from a tree.
pub fn export(node: &Node) -> Result<JsonValue> {
    match node.value() {
        Value::Null => Ok(JsonValue::Null),
        Value::String(s) => Ok(JsonValue::String(s.clone())),
        Value::Boolean(b) => Ok(JsonValue::Bool(*b)),
        Value::Number(_) => export_number(node),
        Value::Array(items) => items
            .iter()
            .map(export)
            .collect::<Result<Vec<_>>>()
            .map(JsonValue::Array),
        Value::Mapping(map) => {
            let mut obj = Map::with_capacity(map.len());
            for (key, child) in map {
                obj.insert(key.clone(), export(child)?);
            }
            Ok(JsonValue::Object(obj))
        }
    }
}

fn export_number(node: &Node) -> Result<JsonValue> {
    let decimal = match native_number(node)? {
        NativeNumber::U32(v) => return Ok(JsonValue::from(v)),
        NativeNumber::U64(v) => return Ok(JsonValue::from(v)),
        NativeNumber::I32(v) => return Ok(JsonValue::from(v)),
        NativeNumber::I64(v) => return Ok(JsonValue::from(v)),
        NativeNumber::F32(v) => widen_f32(v),
        NativeNumber::F64(v) => v,
    };
    serde_json::Number::from_f64(decimal)
        .map(JsonValue::Number)
        .ok_or_else(|| {
            TreeError::UnsupportedOperation(format!("JSON cannot represent the number {decimal}"))
        })
}

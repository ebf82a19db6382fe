//! BSON adapter backed by the `bson` crate. Binary only.
//!
//! A BSON document is always a mapping at the root. Integers are written as
//! `Int32` when they fit and `Int64` otherwise; decimals are always `Double`.
//! BSON types with no tree counterpart (ObjectId, DateTime, Binary, ...) are
//! imported through their relaxed Extended JSON form.

use ::bson::{Bson, Document};
use log::{debug, warn};

use super::{native_number, widen_f32, write_decimal, write_signed, Format, NativeNumber};
use crate::error::{Result, TreeError};
use crate::node::{Node, Value};

const NAME: &str = "bson";

/// BSON load/save.
#[derive(Debug, Clone, Copy, Default)]
pub struct BsonFormat;

impl Format for BsonFormat {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_binary(&self) -> bool {
        true
    }

    fn load_str(&self, _content: &str) -> Result<Node> {
        Err(TreeError::UnsupportedOperation(
            "BSON is binary-only; load it from bytes".to_owned(),
        ))
    }

    fn load_bytes(&self, content: &[u8]) -> Result<Node> {
        let mut reader = content;
        let doc =
            Document::from_reader(&mut reader).map_err(|e| TreeError::malformed(NAME, e))?;
        let mut out = Node::new();
        import_document(&doc, &mut out)?;
        debug!("imported {} bytes of bson", content.len());
        Ok(out)
    }

    fn save_string(&self, _node: &Node) -> Result<String> {
        Err(TreeError::UnsupportedOperation(
            "BSON is binary-only; save it as bytes".to_owned(),
        ))
    }

    fn save_bytes(&self, node: &Node) -> Result<Vec<u8>> {
        let doc = export_document(node)?;
        let mut buf = Vec::new();
        doc.to_writer(&mut buf)
            .map_err(|e| TreeError::UnsupportedOperation(e.to_string()))?;
        Ok(buf)
    }
}

/// Write a BSON document into `out` as a mapping.
pub fn import_document(doc: &Document, out: &mut Node) -> Result<()> {
    out.set(Node::mapping())?;
    for (key, item) in doc {
        import(item, out.entry(key)?)?;
    }
    Ok(())
}

/// Write a BSON value into `out`.
pub fn import(value: &Bson, out: &mut Node) -> Result<()> {
    match value {
        Bson::Null | Bson::Undefined => {
            out.clear();
            Ok(())
        }
        Bson::Boolean(b) => out.set(*b),
        Bson::Int32(v) => out.set(*v),
        Bson::Int64(v) => write_signed(out, *v),
        Bson::Double(v) => write_decimal(out, *v),
        Bson::String(s) => out.set(s.as_str()),
        Bson::Array(items) => {
            out.set(Node::array())?;
            for item in items {
                let mut child = Node::new();
                import(item, &mut child)?;
                out.push_node(child)?;
            }
            Ok(())
        }
        Bson::Document(doc) => import_document(doc, out),
        other => {
            warn!(
                "bson {:?} has no tree counterpart; importing its extended JSON form",
                other.element_type()
            );
            super::json::import(&other.clone().into_relaxed_extjson(), out)
        }
    }
}

/// Build a BSON document from a tree. The root must be a mapping.
pub fn export_document(node: &Node) -> Result<Document> {
    match node.value() {
        Value::Mapping(map) => {
            let mut doc = Document::new();
            for (key, child) in map {
                doc.insert(key.clone(), export(child)?);
            }
            Ok(doc)
        }
        other => Err(TreeError::UnsupportedOperation(format!(
            "a BSON document needs a mapping at the root, found {}",
            other.kind()
        ))),
    }
}

/// Build a BSON value from a tree.
pub fn export(node: &Node) -> Result<Bson> {
    match node.value() {
        Value::Null => Ok(Bson::Null),
        Value::String(s) => Ok(Bson::String(s.clone())),
        Value::Boolean(b) => Ok(Bson::Boolean(*b)),
        Value::Number(_) => export_number(node),
        Value::Array(items) => items
            .iter()
            .map(export)
            .collect::<Result<Vec<_>>>()
            .map(Bson::Array),
        Value::Mapping(_) => export_document(node).map(Bson::Document),
    }
}

fn export_number(node: &Node) -> Result<Bson> {
    let value = match native_number(node)? {
        NativeNumber::F32(v) => return Ok(Bson::Double(widen_f32(v))),
        NativeNumber::F64(v) => return Ok(Bson::Double(v)),
        NativeNumber::I32(v) => return Ok(Bson::Int32(v)),
        NativeNumber::I64(v) => v,
        NativeNumber::U32(v) => v as i64,
        NativeNumber::U64(v) => i64::try_from(v).map_err(|_| {
            TreeError::UnsupportedOperation(format!("BSON cannot represent the integer {v}"))
        })?,
    };
    Ok(match i32::try_from(value) {
        Ok(narrow) => Bson::Int32(narrow),
        Err(_) => Bson::Int64(value),
    })
}

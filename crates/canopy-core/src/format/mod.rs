//! Format adapters: load a tree from, and save it to, JSON, YAML or BSON.
//!
//! Each adapter implements [`Format`]. Import walks the format's own value tree:
//! objects become mappings in source order, arrays become arrays and scalars are
//! written through the numeric codec after being classified as boolean, integer,
//! decimal or string. Export walks the canonical tree and emits each number as the
//! narrowest native type that holds it.
//!
//! File I/O failures surface as [`TreeError::Io`]; content that cannot be parsed
//! surfaces as [`TreeError::MalformedInput`].

pub mod bson;
pub mod classify;
pub mod json;
pub mod yaml;

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::debug;

use crate::error::{Result, TreeError};
use crate::node::Node;

pub use self::bson::BsonFormat;
pub use self::json::JsonFormat;
pub use self::yaml::YamlFormat;

/// Load/save contract shared by every format adapter.
pub trait Format {
    /// Short lowercase name, used in messages.
    fn name(&self) -> &'static str;

    /// True for formats without a text form. Their `*_str`/`*_string` calls fail
    /// with [`TreeError::UnsupportedOperation`].
    fn is_binary(&self) -> bool {
        false
    }

    fn load_str(&self, content: &str) -> Result<Node>;

    fn load_bytes(&self, content: &[u8]) -> Result<Node>;

    fn save_string(&self, node: &Node) -> Result<String>;

    fn save_bytes(&self, node: &Node) -> Result<Vec<u8>>;

    /// Load a file. An empty file yields a `Null` tree.
    fn load_file(&self, path: &Path) -> Result<Node> {
        let content = fs::read(path)?;
        debug!(
            "loading {} bytes of {} from {}",
            content.len(),
            self.name(),
            path.display()
        );
        if content.is_empty() {
            return Ok(Node::new());
        }
        self.load_bytes(&content)
    }

    /// Save a file, replacing any existing content.
    fn save_file(&self, node: &Node, path: &Path) -> Result<()> {
        let content = self.save_bytes(node)?;
        debug!(
            "saving {} bytes of {} to {}",
            content.len(),
            self.name(),
            path.display()
        );
        fs::write(path, content)?;
        Ok(())
    }
}

/// The supported formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    Json,
    Yaml,
    Bson,
}

impl FormatKind {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Option<FormatKind> {
        let ext = path.extension()?.to_str()?;
        ext.parse().ok()
    }

    /// A boxed adapter for this format. `pretty` only affects JSON.
    pub fn adapter(self, pretty: bool) -> Box<dyn Format> {
        match self {
            FormatKind::Json => Box::new(JsonFormat::new().pretty(pretty)),
            FormatKind::Yaml => Box::new(YamlFormat),
            FormatKind::Bson => Box::new(BsonFormat),
        }
    }
}

impl FromStr for FormatKind {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<FormatKind> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(FormatKind::Json),
            "yaml" | "yml" => Ok(FormatKind::Yaml),
            "bson" | "bin" => Ok(FormatKind::Bson),
            other => Err(TreeError::UnsupportedOperation(format!(
                "unknown format '{other}' (expected json, yaml or bson)"
            ))),
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatKind::Json => "json",
            FormatKind::Yaml => "yaml",
            FormatKind::Bson => "bson",
        };
        f.write_str(name)
    }
}

/// UTF-8 text of a text format's byte content, minus an optional NUL terminator.
pub(crate) fn text_content<'a>(format: &'static str, content: &'a [u8]) -> Result<&'a str> {
    let content = content.strip_suffix(&[0]).unwrap_or(content);
    std::str::from_utf8(content).map_err(|e| TreeError::malformed(format, e))
}

/// An exported number in the narrowest native type that holds it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum NativeNumber {
    U32(u32),
    U64(u64),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

/// Pick the native type for a numeric node from its width and flags.
pub(crate) fn native_number(node: &Node) -> Result<NativeNumber> {
    let width = node.width()?;
    if node.has_decimal() {
        return if width == 4 {
            node.read::<f32>().map(NativeNumber::F32)
        } else {
            node.read::<f64>().map(NativeNumber::F64)
        };
    }
    if node.is_negative() {
        return if width <= 4 {
            node.read::<i32>().map(NativeNumber::I32)
        } else {
            node.read::<i64>().map(NativeNumber::I64)
        };
    }
    if width <= 4 {
        node.read::<u32>().map(NativeNumber::U32)
    } else {
        node.read::<u64>().map(NativeNumber::U64)
    }
}

/// Widen an `f32` to the `f64` with the same shortest decimal form, so `0.1f32`
/// exports as `0.1` rather than `0.10000000149011612`.
pub(crate) fn widen_f32(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(value as f64)
}

/// Write a non-negative integer, as `u32` when it fits.
pub(crate) fn write_unsigned(out: &mut Node, value: u64) -> Result<()> {
    match u32::try_from(value) {
        Ok(narrow) => out.set(narrow),
        Err(_) => out.set(value),
    }
}

/// Write a signed integer, as `i32` when it fits.
pub(crate) fn write_signed(out: &mut Node, value: i64) -> Result<()> {
    match i32::try_from(value) {
        Ok(narrow) => out.set(narrow),
        Err(_) => out.set(value),
    }
}

/// Write a decimal, as `f32` when single precision holds it exactly.
pub(crate) fn write_decimal(out: &mut Node, value: f64) -> Result<()> {
    let narrow = value as f32;
    if narrow as f64 == value {
        out.set(narrow)
    } else {
        out.set(value)
    }
}

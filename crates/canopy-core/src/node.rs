//! The canonical value tree.
//!
//! A [`Node`] is `Null`, a scalar (string, boolean or [`Number`]), an array of
//! child nodes, or a mapping from string keys to child nodes in insertion order.
//! A node owns its whole subtree: `Clone` deep-copies it and [`Node::take`] moves it
//! out, leaving `Null` behind.
//!
//! Changing a node's kind always discards its previous content. Write-access key
//! lookup ([`Node::entry`]) creates missing children; read-only lookup
//! ([`Node::get`] and `node["key"]`) never mutates and yields a shared `Null` node
//! for missing keys.
//!
//! # Example
//! ```
//! use canopy_core::Node;
//!
//! let mut root = Node::new();
//! root.entry("player")?.entry("health")?.set(89)?;
//! root.entry("tags")?.push("fast")?;
//!
//! assert_eq!(root["player"]["health"].read::<i32>()?, 89);
//! assert!(root["missing"].is_null());
//! # Ok::<(), canopy_core::TreeError>(())
//! ```

use std::fmt;
use std::ops::Index;

use indexmap::IndexMap;

use crate::convert::{FromNode, ToNode};
use crate::error::{Result, TreeError};
use crate::numeric::Number;

/// Shared `Null` returned by read-only lookups that miss.
static NULL: Node = Node::new();

/// Content of a node.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    String(String),
    Boolean(bool),
    Number(Number),
    Array(Vec<Node>),
    /// Children keyed by name, in insertion order.
    Mapping(IndexMap<String, Node>),
}

impl Value {
    pub fn kind(&self) -> NodeKind {
        match self {
            Value::Null => NodeKind::Null,
            Value::String(_) => NodeKind::String,
            Value::Boolean(_) => NodeKind::Boolean,
            Value::Number(_) => NodeKind::Numeric,
            Value::Array(_) => NodeKind::Array,
            Value::Mapping(_) => NodeKind::Mapping,
        }
    }
}

/// The kind tag of a node, without its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Null,
    String,
    Boolean,
    Numeric,
    Array,
    Mapping,
}

impl NodeKind {
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            NodeKind::String | NodeKind::Boolean | NodeKind::Numeric
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Null => "null",
            NodeKind::String => "string",
            NodeKind::Boolean => "boolean",
            NodeKind::Numeric => "numeric",
            NodeKind::Array => "array",
            NodeKind::Mapping => "mapping",
        };
        f.write_str(name)
    }
}

/// A node of the canonical value tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    value: Value,
}

impl Node {
    /// A `Null` node.
    pub const fn new() -> Node {
        Node { value: Value::Null }
    }

    /// An empty array node.
    pub fn array() -> Node {
        Node {
            value: Value::Array(Vec::new()),
        }
    }

    /// An empty mapping node.
    pub fn mapping() -> Node {
        Node {
            value: Value::Mapping(IndexMap::new()),
        }
    }

    /// A node holding `value`.
    pub fn of<V: ToNode>(value: V) -> Result<Node> {
        let mut node = Node::new();
        node.set(value)?;
        Ok(node)
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn kind(&self) -> NodeKind {
        self.value.kind()
    }

    pub(crate) fn replace(&mut self, value: Value) {
        self.value = value;
    }

    /// Replace the content of this node with `value`.
    ///
    /// The previous content is discarded first. If writing fails (a [`Mappable`]
    /// whose `map` returns an error), the node is left `Null`.
    ///
    /// [`Mappable`]: crate::Mappable
    pub fn set<V: ToNode>(&mut self, value: V) -> Result<()> {
        self.clear();
        if let Err(err) = value.write_to(self) {
            self.clear();
            return Err(err);
        }
        Ok(())
    }

    /// Read this node as `T`.
    pub fn read<T: FromNode>(&self) -> Result<T> {
        T::from_node(self)
    }

    /// Write-access lookup: the child at `key`, created as `Null` if absent.
    ///
    /// A `Null` node is promoted to an empty mapping first. Any other kind of
    /// non-mapping node fails with [`TreeError::WrongKind`].
    pub fn entry(&mut self, key: &str) -> Result<&mut Node> {
        if self.is_null() {
            self.value = Value::Mapping(IndexMap::new());
        }
        match &mut self.value {
            Value::Mapping(map) => Ok(map.entry(key.to_owned()).or_default()),
            other => Err(wrong_kind("key access", "a mapping", other.kind())),
        }
    }

    /// Read-only lookup: the child at `key`, or a shared `Null` if absent.
    ///
    /// Looking up a key on a `Null` node also yields `Null`. Arrays and scalars
    /// fail with [`TreeError::WrongKind`].
    pub fn get(&self, key: &str) -> Result<&Node> {
        match &self.value {
            Value::Mapping(map) => Ok(map.get(key).unwrap_or(&NULL)),
            Value::Null => Ok(&NULL),
            other => Err(wrong_kind("key lookup", "a mapping", other.kind())),
        }
    }

    /// The child at position `index` of an array or mapping.
    pub fn at(&self, index: usize) -> Result<&Node> {
        match &self.value {
            Value::Array(items) => items.get(index).ok_or(TreeError::OutOfRange {
                index,
                len: items.len(),
            }),
            Value::Mapping(map) => map
                .get_index(index)
                .map(|(_, child)| child)
                .ok_or(TreeError::OutOfRange {
                    index,
                    len: map.len(),
                }),
            other => Err(wrong_kind("index access", "an array or mapping", other.kind())),
        }
    }

    /// Mutable child at position `index` of an array or mapping.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut Node> {
        match &mut self.value {
            Value::Array(items) => {
                let len = items.len();
                items
                    .get_mut(index)
                    .ok_or(TreeError::OutOfRange { index, len })
            }
            Value::Mapping(map) => {
                let len = map.len();
                map.get_index_mut(index)
                    .map(|(_, child)| child)
                    .ok_or(TreeError::OutOfRange { index, len })
            }
            other => Err(wrong_kind("index access", "an array or mapping", other.kind())),
        }
    }

    /// Append `value` to this array. A `Null` node becomes an empty array first.
    pub fn push<V: ToNode>(&mut self, value: V) -> Result<()> {
        let node = Node::of(value)?;
        self.push_node(node)
    }

    /// Append an already built node to this array.
    ///
    /// Fails with [`TreeError::WrongKind`] on mappings and scalars.
    pub fn push_node(&mut self, node: Node) -> Result<()> {
        if self.is_null() {
            self.value = Value::Array(Vec::new());
        }
        match &mut self.value {
            Value::Array(items) => {
                items.push(node);
                Ok(())
            }
            other => Err(wrong_kind("push", "an array", other.kind())),
        }
    }

    /// True if this is a mapping with a child at `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        match &self.value {
            Value::Mapping(map) => map.contains_key(key),
            _ => false,
        }
    }

    /// Number of children of an array or mapping.
    ///
    /// Use [`Node::width`] for the byte width of a scalar.
    pub fn size(&self) -> Result<usize> {
        match &self.value {
            Value::Array(items) => Ok(items.len()),
            Value::Mapping(map) => Ok(map.len()),
            other => Err(wrong_kind("size", "an array or mapping", other.kind())),
        }
    }

    /// Byte width of a scalar: string length, 1 for booleans, 1/2/4/8 for numbers.
    ///
    /// Use [`Node::size`] for the child count of a container.
    pub fn width(&self) -> Result<usize> {
        match &self.value {
            Value::String(s) => Ok(s.len()),
            Value::Boolean(_) => Ok(1),
            Value::Number(n) => Ok(n.width()),
            other => Err(wrong_kind("width", "a scalar", other.kind())),
        }
    }

    /// Reset to `Null`, dropping any content.
    pub fn clear(&mut self) {
        self.value = Value::Null;
    }

    /// Move the content out, leaving this node `Null`.
    pub fn take(&mut self) -> Node {
        std::mem::take(self)
    }

    /// Recursively remove children that are still `Null`.
    pub fn trim(&mut self) {
        match &mut self.value {
            Value::Array(items) => {
                items.retain(Node::is_defined);
                items.iter_mut().for_each(Node::trim);
            }
            Value::Mapping(map) => {
                map.retain(|_, child| child.is_defined());
                map.values_mut().for_each(Node::trim);
            }
            _ => {}
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, Value::Null)
    }

    pub fn is_defined(&self) -> bool {
        !self.is_null()
    }

    pub fn is_scalar(&self) -> bool {
        self.kind().is_scalar()
    }

    pub fn is_array(&self) -> bool {
        matches!(self.value, Value::Array(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self.value, Value::Mapping(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self.value, Value::String(_))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self.value, Value::Boolean(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.value, Value::Number(_))
    }

    /// True for numbers stored as floats.
    pub fn has_decimal(&self) -> bool {
        match &self.value {
            Value::Number(n) => n.has_decimal(),
            _ => false,
        }
    }

    /// True for numbers written from a negative value.
    pub fn is_negative(&self) -> bool {
        match &self.value {
            Value::Number(n) => n.is_negative(),
            _ => false,
        }
    }

    /// The stored number, if this is a numeric node.
    pub fn number(&self) -> Option<&Number> {
        match &self.value {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Children of an array or mapping, in order. Empty for other kinds.
    pub fn iter(&self) -> Iter<'_> {
        let inner = match &self.value {
            Value::Array(items) => IterInner::Array(items.iter()),
            Value::Mapping(map) => IterInner::Mapping(map.values()),
            _ => IterInner::Empty,
        };
        Iter { inner }
    }

    /// Mutable children of an array or mapping, in order.
    pub fn iter_mut(&mut self) -> IterMut<'_> {
        let inner = match &mut self.value {
            Value::Array(items) => IterMutInner::Array(items.iter_mut()),
            Value::Mapping(map) => IterMutInner::Mapping(map.values_mut()),
            _ => IterMutInner::Empty,
        };
        IterMut { inner }
    }

    /// Key/child pairs of a mapping, in insertion order. Empty for other kinds.
    pub fn entries(&self) -> Entries<'_> {
        match &self.value {
            Value::Mapping(map) => Entries {
                inner: Some(map.iter()),
            },
            _ => Entries { inner: None },
        }
    }
}

fn wrong_kind(operation: &'static str, expected: &'static str, found: NodeKind) -> TreeError {
    TreeError::WrongKind {
        operation,
        expected,
        found,
    }
}

impl Index<&str> for Node {
    type Output = Node;

    /// Never fails: anything but a mapping with `key` yields `Null`.
    fn index(&self, key: &str) -> &Node {
        match &self.value {
            Value::Mapping(map) => map.get(key).unwrap_or(&NULL),
            _ => &NULL,
        }
    }
}

impl Index<usize> for Node {
    type Output = Node;

    /// Never fails: out-of-range positions and non-containers yield `Null`.
    fn index(&self, index: usize) -> &Node {
        self.at(index).unwrap_or(&NULL)
    }
}

/// Iterator over the children of a node.
pub struct Iter<'a> {
    inner: IterInner<'a>,
}

enum IterInner<'a> {
    Array(std::slice::Iter<'a, Node>),
    Mapping(indexmap::map::Values<'a, String, Node>),
    Empty,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        match &mut self.inner {
            IterInner::Array(it) => it.next(),
            IterInner::Mapping(it) => it.next(),
            IterInner::Empty => None,
        }
    }
}

/// Mutable iterator over the children of a node.
pub struct IterMut<'a> {
    inner: IterMutInner<'a>,
}

enum IterMutInner<'a> {
    Array(std::slice::IterMut<'a, Node>),
    Mapping(indexmap::map::ValuesMut<'a, String, Node>),
    Empty,
}

impl<'a> Iterator for IterMut<'a> {
    type Item = &'a mut Node;

    fn next(&mut self) -> Option<&'a mut Node> {
        match &mut self.inner {
            IterMutInner::Array(it) => it.next(),
            IterMutInner::Mapping(it) => it.next(),
            IterMutInner::Empty => None,
        }
    }
}

/// Iterator over the key/child pairs of a mapping.
pub struct Entries<'a> {
    inner: Option<indexmap::map::Iter<'a, String, Node>>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (&'a str, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, child) = self.inner.as_mut()?.next()?;
        Some((key.as_str(), child))
    }
}

impl<'a> IntoIterator for &'a Node {
    type Item = &'a Node;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a mut Node {
    type Item = &'a mut Node;
    type IntoIter = IterMut<'a>;

    fn into_iter(self) -> IterMut<'a> {
        self.iter_mut()
    }
}

//! User types that serialize themselves into and out of a subtree.
//!
//! Implementing [`Mappable`] makes a type usable with [`Node::set`] (by reference)
//! and [`Node::read`], the same way a scalar is:
//!
//! ```
//! use canopy_core::{Mappable, Node, Result};
//!
//! #[derive(Debug, PartialEq)]
//! struct Vector2 {
//!     x: f32,
//!     y: f32,
//! }
//!
//! impl Mappable for Vector2 {
//!     fn map(&self, node: &mut Node) -> Result<()> {
//!         node.entry("x")?.set(self.x)?;
//!         node.entry("y")?.set(self.y)
//!     }
//!
//!     fn unmap(node: &Node) -> Result<Self> {
//!         Ok(Vector2 {
//!             x: node["x"].read()?,
//!             y: node["y"].read()?,
//!         })
//!     }
//! }
//!
//! let mut node = Node::new();
//! node.entry("position")?.set(&Vector2 { x: 10.0, y: 0.5 })?;
//! let back: Vector2 = node["position"].read()?;
//! assert_eq!(back, Vector2 { x: 10.0, y: 0.5 });
//! # Ok::<(), canopy_core::TreeError>(())
//! ```

use indexmap::IndexMap;

use crate::convert::{FromNode, ToNode};
use crate::error::{Result, TreeError};
use crate::node::{Node, Value};

/// A composite type that maps its fields onto a mapping node.
pub trait Mappable: Sized {
    /// Write this value's fields into `node`, an empty mapping.
    fn map(&self, node: &mut Node) -> Result<()>;

    /// Rebuild a value from a mapping produced by [`Mappable::map`].
    ///
    /// No schema is checked up front; a missing or mistyped field fails when it
    /// is read.
    fn unmap(node: &Node) -> Result<Self>;
}

impl<T: Mappable> ToNode for &T {
    fn write_to(self, node: &mut Node) -> Result<()> {
        node.replace(Value::Mapping(IndexMap::new()));
        self.map(node)
    }
}

impl<T: Mappable> FromNode for T {
    fn from_node(node: &Node) -> Result<T> {
        if !node.is_mapping() {
            return Err(TreeError::WrongKind {
                operation: "unmap",
                expected: "a mapping",
                found: node.kind(),
            });
        }
        T::unmap(node)
    }
}

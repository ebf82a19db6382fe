//! Conversions between Rust values and tree nodes.
//!
//! [`ToNode`] is what [`Node::set`] and [`Node::push`] accept; [`FromNode`] is what
//! [`Node::read`] produces. Both are implemented for strings, `bool`, every
//! primitive integer and float, [`Node`] itself and `Option<T>`, and, through
//! [`Mappable`](crate::Mappable), for user types.
//!
//! Reading follows the numeric read policy in [`crate::numeric`]; a string is only
//! readable as a string and a non-scalar is readable as neither.

use std::mem::size_of;

use crate::error::{Result, TreeError};
use crate::node::{Node, NodeKind, Value};
use crate::numeric::{Number, Width};

/// A value that can be written into a node.
pub trait ToNode {
    /// Populate `node`, which the caller has already cleared.
    fn write_to(self, node: &mut Node) -> Result<()>;
}

/// A value that can be read back out of a node.
pub trait FromNode: Sized {
    fn from_node(node: &Node) -> Result<Self>;
}

macro_rules! signed_to_node {
    ($($t:ty),*) => {
        $(
            impl ToNode for $t {
                fn write_to(self, node: &mut Node) -> Result<()> {
                    let width = Width::of_size(size_of::<$t>());
                    node.replace(Value::Number(Number::signed(self as i64, width)));
                    Ok(())
                }
            }
        )*
    };
}

macro_rules! unsigned_to_node {
    ($($t:ty),*) => {
        $(
            impl ToNode for $t {
                fn write_to(self, node: &mut Node) -> Result<()> {
                    let width = Width::of_size(size_of::<$t>());
                    node.replace(Value::Number(Number::PosInt {
                        value: self as u64,
                        width,
                    }));
                    Ok(())
                }
            }
        )*
    };
}

signed_to_node!(i8, i16, i32, i64, isize);
unsigned_to_node!(u8, u16, u32, u64, usize);

impl ToNode for f32 {
    fn write_to(self, node: &mut Node) -> Result<()> {
        node.replace(Value::Number(Number::from_f32(self)));
        Ok(())
    }
}

impl ToNode for f64 {
    fn write_to(self, node: &mut Node) -> Result<()> {
        node.replace(Value::Number(Number::from_f64(self)));
        Ok(())
    }
}

impl ToNode for bool {
    fn write_to(self, node: &mut Node) -> Result<()> {
        node.replace(Value::Boolean(self));
        Ok(())
    }
}

impl ToNode for &str {
    fn write_to(self, node: &mut Node) -> Result<()> {
        node.replace(Value::String(self.to_owned()));
        Ok(())
    }
}

impl ToNode for String {
    fn write_to(self, node: &mut Node) -> Result<()> {
        node.replace(Value::String(self));
        Ok(())
    }
}

impl ToNode for &String {
    fn write_to(self, node: &mut Node) -> Result<()> {
        node.replace(Value::String(self.clone()));
        Ok(())
    }
}

impl ToNode for Number {
    fn write_to(self, node: &mut Node) -> Result<()> {
        self.validate()?;
        node.replace(Value::Number(self));
        Ok(())
    }
}

impl ToNode for Node {
    fn write_to(self, node: &mut Node) -> Result<()> {
        *node = self;
        Ok(())
    }
}

impl ToNode for &Node {
    fn write_to(self, node: &mut Node) -> Result<()> {
        *node = self.clone();
        Ok(())
    }
}

impl<T: ToNode> ToNode for Option<T> {
    fn write_to(self, node: &mut Node) -> Result<()> {
        match self {
            Some(value) => value.write_to(node),
            None => Ok(()),
        }
    }
}

/// The stored number, with booleans read as 0 or 1.
fn scalar_number<T>(node: &Node) -> Result<Number> {
    match node.value() {
        Value::Number(n) => Ok(*n),
        Value::Boolean(b) => Ok(Number::PosInt {
            value: *b as u64,
            width: Width::One,
        }),
        other => Err(mismatch::<T>(other.kind())),
    }
}

fn mismatch<T>(found: NodeKind) -> TreeError {
    TreeError::TypeMismatch {
        requested: std::any::type_name::<T>(),
        found,
    }
}

macro_rules! int_from_node {
    ($($t:ty),*) => {
        $(
            impl FromNode for $t {
                fn from_node(node: &Node) -> Result<$t> {
                    scalar_number::<$t>(node)?.to_int::<$t>()
                }
            }
        )*
    };
}

int_from_node!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromNode for f32 {
    fn from_node(node: &Node) -> Result<f32> {
        scalar_number::<f32>(node)?.to_f32()
    }
}

impl FromNode for f64 {
    fn from_node(node: &Node) -> Result<f64> {
        Ok(scalar_number::<f64>(node)?.to_f64())
    }
}

impl FromNode for bool {
    fn from_node(node: &Node) -> Result<bool> {
        match node.value() {
            Value::Boolean(b) => Ok(*b),
            other => Err(mismatch::<bool>(other.kind())),
        }
    }
}

impl FromNode for String {
    fn from_node(node: &Node) -> Result<String> {
        match node.value() {
            Value::String(s) => Ok(s.clone()),
            other => Err(mismatch::<String>(other.kind())),
        }
    }
}

impl FromNode for Number {
    fn from_node(node: &Node) -> Result<Number> {
        match node.value() {
            Value::Number(n) => Ok(*n),
            other => Err(mismatch::<Number>(other.kind())),
        }
    }
}

impl FromNode for Node {
    fn from_node(node: &Node) -> Result<Node> {
        Ok(node.clone())
    }
}

/// `Null` reads as `None`; anything else is read as `T`.
impl<T: FromNode> FromNode for Option<T> {
    fn from_node(node: &Node) -> Result<Option<T>> {
        if node.is_null() {
            return Ok(None);
        }
        T::from_node(node).map(Some)
    }
}

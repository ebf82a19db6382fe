//! `serde::Serialize` for trees, so a tree can be written with any serde format.
//!
//! Numbers are emitted as the serde primitive matching their stored width and
//! sign (`u8`..`u64`, `i8`..`i64`, `f32`, `f64`); `Null` is emitted as unit.

use std::fmt;
use std::mem::size_of;

use serde::ser::{self, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::node::{Node, Value};
use crate::numeric::{Number, Width};

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value() {
            Value::Null => serializer.serialize_unit(),
            Value::String(s) => serializer.serialize_str(s),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, child) in map {
                    out.serialize_entry(key, child)?;
                }
                out.end()
            }
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Number::PosInt { value, width } => match width {
                Width::One => serializer.serialize_u8(narrow::<_, _, S::Error>(value)?),
                Width::Two => serializer.serialize_u16(narrow::<_, _, S::Error>(value)?),
                Width::Four => serializer.serialize_u32(narrow::<_, _, S::Error>(value)?),
                Width::Eight => serializer.serialize_u64(value),
            },
            Number::NegInt { value, width } => match width {
                Width::One => serializer.serialize_i8(narrow::<_, _, S::Error>(value)?),
                Width::Two => serializer.serialize_i16(narrow::<_, _, S::Error>(value)?),
                Width::Four => serializer.serialize_i32(narrow::<_, _, S::Error>(value)?),
                Width::Eight => serializer.serialize_i64(value),
            },
            Number::Float32(v) => serializer.serialize_f32(v),
            Number::Float64(v) => serializer.serialize_f64(v),
        }
    }
}

fn narrow<T, V, E>(value: V) -> Result<T, E>
where
    T: TryFrom<V>,
    V: Copy + fmt::Display,
    E: ser::Error,
{
    T::try_from(value).map_err(|_| {
        E::custom(format!(
            "{value} does not fit its recorded width of {} bytes",
            size_of::<T>()
        ))
    })
}

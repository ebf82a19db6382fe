//! Numeric codec: how arithmetic values are stored in, and read back out of, a tree.
//!
//! Every numeric scalar is stored as a [`Number`]: an integer tagged with the byte
//! width it was written at and whether it was written negative, or a decimal in
//! single or double precision.
//!
//! # Write policy
//!
//! - Integers keep the width of their source type; they are never narrowed.
//!   A value is tagged negative only when its source type is signed and `v < 0`.
//! - Floats with a zero fractional part become integers: 4 bytes when they fit
//!   `i32`, else 8 bytes. The decimal/integer distinction is therefore about the
//!   value, not the source type.
//! - Other floats stay decimal, in `f32` when the source was 4 bytes wide and in
//!   `f64` otherwise.
//!
//! # Read policy
//!
//! Reads reconstruct the stored value and check that it fits the target without
//! loss: decimal to integer fails, negative to unsigned fails, a stored width
//! wider than the target fails, and an out-of-range value fails. Integers can
//! always be read as floats.

use std::fmt;
use std::mem::size_of;

use crate::error::{Result, TreeError};

/// Byte width of a stored numeric scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    One = 1,
    Two = 2,
    Four = 4,
    Eight = 8,
}

impl Width {
    /// Width in bytes.
    pub fn bytes(self) -> usize {
        self as usize
    }

    fn max_unsigned(self) -> u64 {
        match self {
            Width::One => u8::MAX as u64,
            Width::Two => u16::MAX as u64,
            Width::Four => u32::MAX as u64,
            Width::Eight => u64::MAX,
        }
    }

    fn min_signed(self) -> i64 {
        match self {
            Width::One => i8::MIN as i64,
            Width::Two => i16::MIN as i64,
            Width::Four => i32::MIN as i64,
            Width::Eight => i64::MIN,
        }
    }

    fn max_signed(self) -> i64 {
        match self {
            Width::One => i8::MAX as i64,
            Width::Two => i16::MAX as i64,
            Width::Four => i32::MAX as i64,
            Width::Eight => i64::MAX,
        }
    }

    /// The canonical width for a value of `size` bytes.
    pub(crate) fn of_size(size: usize) -> Width {
        match size {
            1 => Width::One,
            2 => Width::Two,
            4 => Width::Four,
            _ => Width::Eight,
        }
    }
}

/// A numeric scalar as stored in a tree node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Integer written from an unsigned source, or from a signed source with `v >= 0`.
    PosInt { value: u64, width: Width },
    /// Integer written from a signed source with `v < 0`.
    NegInt { value: i64, width: Width },
    /// Non-integral value written from a 4-byte float.
    Float32(f32),
    /// Non-integral value written from an 8-byte float, or an integral one too large
    /// for any integer width.
    Float64(f64),
}

impl Number {
    /// Store a signed integer at `width`. Fails with [`TreeError::InvalidCast`] when
    /// `value` is outside the range of a signed integer of that many bytes.
    pub fn from_signed(value: i64, width: Width) -> Result<Number> {
        if value < width.min_signed() || value > width.max_signed() {
            return Err(width_overflow(value, width));
        }
        Ok(Number::signed(value, width))
    }

    /// Store an unsigned integer at `width`. Fails with [`TreeError::InvalidCast`]
    /// when `value` is beyond the range of an unsigned integer of that many bytes.
    pub fn from_unsigned(value: u64, width: Width) -> Result<Number> {
        if value > width.max_unsigned() {
            return Err(width_overflow(value, width));
        }
        Ok(Number::PosInt { value, width })
    }

    /// Unchecked; callers pass a width that holds `value`.
    pub(crate) fn signed(value: i64, width: Width) -> Number {
        if value < 0 {
            Number::NegInt { value, width }
        } else {
            Number::PosInt {
                value: value as u64,
                width,
            }
        }
    }

    /// Check that an integer payload fits its recorded width and sign.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Number::PosInt { value, width } if value > width.max_unsigned() => {
                Err(width_overflow(value, width))
            }
            Number::NegInt { value, width } if value >= 0 || value < width.min_signed() => {
                Err(width_overflow(value, width))
            }
            _ => Ok(()),
        }
    }

    /// Store a single-precision float.
    pub fn from_f32(value: f32) -> Number {
        Number::from_float(value as f64, Width::Four)
    }

    /// Store a double-precision float.
    pub fn from_f64(value: f64) -> Number {
        Number::from_float(value, Width::Eight)
    }

    fn from_float(value: f64, source: Width) -> Number {
        if value.is_finite() && value.fract() == 0.0 {
            if value >= i32::MIN as f64 && value <= i32::MAX as f64 {
                return Number::signed(value as i64, Width::Four);
            }
            // i64::MAX as f64 rounds up to 2^63, hence the strict bound.
            if value >= i64::MIN as f64 && value < i64::MAX as f64 {
                return Number::signed(value as i64, Width::Eight);
            }
            if value > 0.0 && value < u64::MAX as f64 {
                return Number::PosInt {
                    value: value as u64,
                    width: Width::Eight,
                };
            }
        }
        match source {
            Width::One | Width::Two | Width::Four => Number::Float32(value as f32),
            Width::Eight => Number::Float64(value),
        }
    }

    /// Stored width in bytes (1, 2, 4 or 8).
    pub fn width(&self) -> usize {
        match self {
            Number::PosInt { width, .. } | Number::NegInt { width, .. } => width.bytes(),
            Number::Float32(_) => 4,
            Number::Float64(_) => 8,
        }
    }

    /// True if the value is stored as a float rather than an integer.
    pub fn has_decimal(&self) -> bool {
        matches!(self, Number::Float32(_) | Number::Float64(_))
    }

    /// True if the value was written negative.
    pub fn is_negative(&self) -> bool {
        match *self {
            Number::PosInt { .. } => false,
            Number::NegInt { .. } => true,
            Number::Float32(v) => v < 0.0,
            Number::Float64(v) => v < 0.0,
        }
    }

    /// Read as an integer of type `T`, failing on any loss of information.
    pub(crate) fn to_int<T: IntTarget>(&self) -> Result<T> {
        match *self {
            Number::Float32(v) => Err(TreeError::DecimalToIntegerLoss {
                value: v as f64,
                target: T::NAME,
            }),
            Number::Float64(v) => Err(TreeError::DecimalToIntegerLoss {
                value: v,
                target: T::NAME,
            }),
            Number::NegInt { value, width } => {
                if !T::SIGNED {
                    return Err(TreeError::invalid_cast::<T>(format!(
                        "{value} is negative"
                    )));
                }
                check_width::<T>(width)?;
                T::try_from(value)
                    .map_err(|_| TreeError::invalid_cast::<T>(format!("{value} is out of range")))
            }
            Number::PosInt { value, width } => {
                check_width::<T>(width)?;
                T::try_from(value)
                    .map_err(|_| TreeError::invalid_cast::<T>(format!("{value} is out of range")))
            }
        }
    }

    /// Read as `f64`. Always succeeds.
    pub fn to_f64(&self) -> f64 {
        match *self {
            Number::PosInt { value, .. } => value as f64,
            Number::NegInt { value, .. } => value as f64,
            Number::Float32(v) => v as f64,
            Number::Float64(v) => v,
        }
    }

    /// Read as `f32`. Fails when a double holds a finite value beyond the `f32` range.
    pub fn to_f32(&self) -> Result<f32> {
        match *self {
            Number::PosInt { value, .. } => Ok(value as f32),
            Number::NegInt { value, .. } => Ok(value as f32),
            Number::Float32(v) => Ok(v),
            Number::Float64(v) => {
                if v.is_finite() && v.abs() > f32::MAX as f64 {
                    return Err(TreeError::invalid_cast::<f32>(format!(
                        "{v} exceeds the f32 range"
                    )));
                }
                Ok(v as f32)
            }
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::PosInt { value, .. } => write!(f, "{value}"),
            Number::NegInt { value, .. } => write!(f, "{value}"),
            Number::Float32(v) => write!(f, "{v}"),
            Number::Float64(v) => write!(f, "{v}"),
        }
    }
}

fn width_overflow(value: impl fmt::Display, width: Width) -> TreeError {
    TreeError::InvalidCast {
        target: "Number",
        reason: format!("{value} does not fit a {}-byte integer", width.bytes()),
    }
}

fn check_width<T: IntTarget>(width: Width) -> Result<()> {
    if width.bytes() > size_of::<T>() {
        return Err(TreeError::invalid_cast::<T>(format!(
            "stored width of {} bytes exceeds {} bytes",
            width.bytes(),
            size_of::<T>()
        )));
    }
    Ok(())
}

/// Integer types a [`Number`] can be read into.
pub trait IntTarget: Sized + TryFrom<u64> + TryFrom<i64> {
    const SIGNED: bool;
    const NAME: &'static str;
}

macro_rules! int_target {
    ($($t:ty => $signed:expr),* $(,)?) => {
        $(
            impl IntTarget for $t {
                const SIGNED: bool = $signed;
                const NAME: &'static str = stringify!($t);
            }
        )*
    };
}

int_target! {
    i8 => true, i16 => true, i32 => true, i64 => true, isize => true,
    u8 => false, u16 => false, u32 => false, u64 => false, usize => false,
}

//! # canopy-core
//!
//! A single in-memory value tree that can be built in code or loaded from JSON,
//! YAML or BSON, and saved back to any of them without losing scalar typing:
//! signedness, integer width and the integer/decimal distinction survive.
//!
//! ## Quick start
//!
//! ```rust
//! use canopy_core::{BsonFormat, Format, JsonFormat, Node};
//!
//! let mut tree = Node::new();
//! tree.entry("player")?.entry("name")?.set("Name")?;
//! tree.entry("player")?.entry("health")?.set(89)?;
//! tree.entry("player")?.entry("speed")?.set(2.5f32)?;
//!
//! let json = JsonFormat::new().save_string(&tree)?;
//! assert_eq!(json, r#"{"player":{"name":"Name","health":89,"speed":2.5}}"#);
//!
//! let bytes = BsonFormat.save_bytes(&tree)?;
//! let back = BsonFormat.load_bytes(&bytes)?;
//! assert_eq!(back["player"]["speed"].read::<f32>()?, 2.5);
//! # Ok::<(), canopy_core::TreeError>(())
//! ```
//!
//! ## Modules
//!
//! - [`node`]: `Node`, its `Value` content and access operations
//! - [`numeric`]: how numbers are stored (width, sign, decimal) and read back
//! - [`convert`]: `ToNode` / `FromNode`, the write and read conversions
//! - [`mappable`]: `Mappable`, for user types that map onto a subtree
//! - [`format`]: the `Format` contract and the JSON, YAML and BSON adapters
//! - [`error`]: error types

pub mod convert;
pub mod error;
pub mod format;
pub mod mappable;
pub mod node;
pub mod numeric;
mod ser;

pub use convert::{FromNode, ToNode};
pub use error::{Result, TreeError};
pub use format::{BsonFormat, Format, FormatKind, JsonFormat, YamlFormat};
pub use mappable::Mappable;
pub use node::{Node, NodeKind, Value};
pub use numeric::{Number, Width};

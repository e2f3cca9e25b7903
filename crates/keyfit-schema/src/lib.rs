//! Safe resolution of text keys to record fields.
//!
//! This crate answers one question for the conversion engine: does a piece
//! of untrusted text name a field of a known record type? It does so
//! without ever creating identifiers from that text.
//!
//! # Module Organization
//!
//! - [`ident`]: interned identifiers and the [`SymbolTable`]
//! - [`type_name`]: validated type references
//! - [`schema`]: the [`RecordSchema`] capability and [`StaticSchema`]
//! - [`registry`]: the [`TypeRegistry`] of loaded types
//! - [`record`]: record instances and map aliases
//!
//! # Example
//!
//! ```
//! use keyfit_schema::{StaticSchema, TextMap, TypeRegistry};
//! use serde_json::json;
//!
//! let mut registry = TypeRegistry::new();
//! let user = registry
//!     .register_schema("User", StaticSchema::with_fields(["username", "password"]))
//!     .unwrap();
//!
//! let mut input = TextMap::new();
//! input.insert("username".to_string(), json!("john"));
//! input.insert("nickname".to_string(), json!("jj"));
//!
//! let (record, residual) = registry.build_record(&user, input);
//! assert_eq!(record.get("username"), Some(&json!("john")));
//! assert_eq!(residual.get("nickname"), Some(&json!("jj")));
//! assert!(!registry.symbols().contains("nickname"));
//! ```

mod error;
mod resolver;

pub mod ident;
pub mod record;
pub mod registry;
pub mod schema;
pub mod type_name;

/// Reserved key naming the destination type in a tagged map.
pub const TYPE_KEY: &str = "__type__";

/// Reserved field that receives residual entries in merge mode.
pub const REST_FIELD: &str = "__rest__";

pub use error::{ResolveError, Result};
pub use ident::{Ident, SymbolTable};
pub use record::{IdentMap, Record, TextMap};
pub use registry::{RecordType, TypeRef, TypeRegistry};
pub use schema::{FieldDef, RecordSchema, StaticSchema};
pub use type_name::TypeName;

//! Fit string-keyed maps onto record types.
//!
//! Payloads decoded from JSON and similar formats rarely use the field
//! names of the record they are meant for. This crate matches input keys to
//! the fields of a registered record type, optionally retrying unmatched
//! keys after a transformation such as snake-casing, and reports whatever
//! is left over under the keys the caller supplied.
//!
//! Field lookups go through [`keyfit_schema`], which never creates
//! identifiers from input text.
//!
//! # Example
//!
//! ```
//! use keyfit_map::{Key, MapOptions, RestMode, SourceMap, Transformation, map_to_record};
//! use keyfit_schema::{StaticSchema, TypeRegistry};
//! use serde_json::json;
//!
//! let mut registry = TypeRegistry::new();
//! registry
//!     .register_schema("User", StaticSchema::with_fields(["first_name", "password"]))
//!     .unwrap();
//!
//! let mut source = SourceMap::new();
//! source.insert(Key::from("FirstName"), json!("John"));
//! source.insert(Key::from("Age"), json!(33));
//!
//! let options = MapOptions::new()
//!     .with_transformation(Transformation::SnakeCase)
//!     .with_rest(RestMode::Separate);
//! let conversion = map_to_record(&source, "User", &options, &registry).unwrap();
//!
//! assert_eq!(conversion.record.get("first_name"), Some(&json!("John")));
//! assert_eq!(conversion.rest.unwrap().get("Age"), Some(&json!(33)));
//! ```

mod convert;
mod engine;
mod error;
mod key;
mod options;
mod panicking;
mod transform;

pub use convert::{
    Conversion, RecordConversion, map_to, map_to_record, record_into, record_to_record,
};
pub use error::{MapError, Result};
pub use key::{Key, SourceMap, normalize_keys_to_text, source_from_json};
pub use options::{MapOptions, RestMode};
pub use panicking::{map_to_record_or_panic, record_to_record_or_panic};
pub use transform::{Transformation, to_snake_case};

pub use keyfit_schema::{
    Ident, IdentMap, REST_FIELD, Record, RecordType, ResolveError, TextMap, TypeRegistry,
};

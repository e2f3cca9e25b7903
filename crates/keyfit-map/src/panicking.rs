//! Entry points that panic instead of returning errors.
//!
//! The panic message is the error's `Display` text, one fixed template per
//! error kind.

use keyfit_schema::{Record, TypeRegistry};

use crate::convert::{Conversion, RecordConversion, map_to_record, record_to_record};
use crate::key::SourceMap;
use crate::options::MapOptions;

/// Like [`map_to_record`], panicking on failure.
///
/// # Panics
///
/// Panics with the error message if the conversion fails.
#[track_caller]
pub fn map_to_record_or_panic(
    source: &SourceMap,
    destination: &str,
    options: &MapOptions,
    registry: &TypeRegistry,
) -> Conversion {
    match map_to_record(source, destination, options, registry) {
        Ok(conversion) => conversion,
        Err(err) => panic!("{err}"),
    }
}

/// Like [`record_to_record`], panicking on failure.
///
/// # Panics
///
/// Panics with the error message if the conversion fails.
#[track_caller]
pub fn record_to_record_or_panic(
    source: &Record,
    destination: &str,
    options: &MapOptions,
    registry: &TypeRegistry,
) -> RecordConversion {
    match record_to_record(source, destination, options, registry) {
        Ok(conversion) => conversion,
        Err(err) => panic!("{err}"),
    }
}

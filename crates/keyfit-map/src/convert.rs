//! Conversion entry points.

use keyfit_schema::{IdentMap, REST_FIELD, Record, RecordType, ResolveError, TextMap, TypeRegistry};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::engine::{Reconciliation, reconcile};
use crate::error::Result;
use crate::key::{SourceMap, require_text_keys};
use crate::options::{MapOptions, RestMode};

/// Result of converting a map into a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub record: Record,
    /// Unmatched entries by original key; only set in [`RestMode::Separate`].
    pub rest: Option<TextMap>,
}

impl Conversion {
    pub fn into_record(self) -> Record {
        self.record
    }

    pub fn into_parts(self) -> (Record, Option<TextMap>) {
        (self.record, self.rest)
    }
}

/// Result of converting one record into another.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordConversion {
    pub record: Record,
    /// Unmatched source fields; only set in [`RestMode::Separate`].
    pub rest: Option<IdentMap>,
}

/// Converts `source` into an instance of the record type named `destination`.
///
/// All keys must be text; use [`crate::normalize_keys_to_text`] first for
/// maps that mix identifier and text keys.
///
/// # Errors
///
/// - Type resolution errors for `destination`.
/// - [`crate::MapError::TextKeyRequired`] if any key is not text.
pub fn map_to_record(
    source: &SourceMap,
    destination: &str,
    options: &MapOptions,
    registry: &TypeRegistry,
) -> Result<Conversion> {
    let record_type = registry.resolve_record(destination)?;
    let fields = require_text_keys(source)?;
    let outcome = reconcile(registry, &record_type, fields, &options.transformations);
    let (record, rest) = dispatch_rest(registry, &record_type, outcome, options.rest);
    Ok(Conversion { record, rest })
}

/// Converts `source` into an instance of the record type named `destination`.
///
/// Identifiers of `source` are matched by their text. Residual keys are
/// returned as identifiers again after checking that each still exists in
/// the symbol table; they are not matched against either record's fields.
pub fn record_to_record(
    source: &Record,
    destination: &str,
    options: &MapOptions,
    registry: &TypeRegistry,
) -> Result<RecordConversion> {
    let record_type = registry.resolve_record(destination)?;
    let outcome = reconcile(
        registry,
        &record_type,
        source.to_text_map(),
        &options.transformations,
    );
    let (record, rest) = dispatch_rest(registry, &record_type, outcome, options.rest);
    let rest = rest
        .map(|rest| residual_to_idents(registry, rest))
        .transpose()?;
    Ok(RecordConversion { record, rest })
}

/// Converts `source` into the Rust type `T`, which must be registered.
pub fn map_to<T>(
    source: &SourceMap,
    options: &MapOptions,
    registry: &TypeRegistry,
) -> Result<(T, Option<TextMap>)>
where
    T: DeserializeOwned + 'static,
{
    let destination = registered_name::<T>(registry)?;
    let (record, rest) = map_to_record(source, &destination, options, registry)?.into_parts();
    Ok((record.deserialize_into()?, rest))
}

/// Converts the registered Rust value `source` into the registered type `T`.
pub fn record_into<S, T>(
    source: &S,
    options: &MapOptions,
    registry: &TypeRegistry,
) -> Result<(T, Option<IdentMap>)>
where
    S: Serialize + 'static,
    T: DeserializeOwned + 'static,
{
    let record = registry.record_from_typed(source)?;
    let destination = registered_name::<T>(registry)?;
    let converted = record_to_record(&record, &destination, options, registry)?;
    Ok((converted.record.deserialize_into()?, converted.rest))
}

fn registered_name<T: 'static>(registry: &TypeRegistry) -> Result<String> {
    registry
        .name_of::<T>()
        .map(|name| name.as_str().to_string())
        .ok_or_else(|| {
            ResolveError::UnknownType {
                name: std::any::type_name::<T>().to_string(),
            }
            .into()
        })
}

fn dispatch_rest(
    registry: &TypeRegistry,
    record_type: &RecordType,
    outcome: Reconciliation,
    mode: RestMode,
) -> (Record, Option<TextMap>) {
    let Reconciliation { mut record, rest } = outcome;
    tracing::debug!(
        record = %record.type_name(),
        mode = %mode,
        rest = rest.len(),
        "Dispatching unmatched entries"
    );
    match mode {
        RestMode::Discard => (record, None),
        RestMode::Separate => (record, Some(rest)),
        RestMode::Merge => {
            let merged = Value::Object(rest.into_iter().collect());
            let previous = record.set(registry.rest_field().clone(), merged);
            if overwrote_input(previous.as_ref(), record_type.default_of(REST_FIELD)) {
                tracing::warn!(
                    record = %record.type_name(),
                    field = %registry.rest_field(),
                    "Merge mode overwrote a declared rest field"
                );
            }
            (record, None)
        }
    }
}

/// True when merging replaced a rest-field value other than its default.
fn overwrote_input(previous: Option<&Value>, default: Option<&Value>) -> bool {
    previous.is_some() && previous != default
}

fn residual_to_idents(registry: &TypeRegistry, rest: TextMap) -> Result<IdentMap> {
    let mut idents = IdentMap::new();
    for (key, value) in rest {
        let ident = registry
            .symbols()
            .lookup(&key)
            .ok_or(ResolveError::UnknownIdentifierText { text: key })?;
        idents.insert(ident, value);
    }
    Ok(idents)
}

//! Registry of loaded types.
//!
//! Types are registered up front; registration is the only way identifiers
//! enter the [`SymbolTable`]. After setup the registry is shared by
//! reference and never mutated, which makes it safe to query from any
//! number of concurrent conversions.

use std::any::TypeId;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::REST_FIELD;
use crate::error::{ResolveError, Result};
use crate::ident::{Ident, SymbolTable};
use crate::schema::{RecordSchema, StaticSchema};
use crate::type_name::TypeName;

/// A registered type that supports field enumeration.
#[derive(Debug, Clone)]
pub struct RecordType {
    name: TypeName,
    schema: Arc<dyn RecordSchema>,
    fields: Arc<BTreeSet<Ident>>,
}

impl RecordType {
    pub fn name(&self) -> &TypeName {
        &self.name
    }

    /// Returns true if `field` is declared by this type.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    /// Returns the default value of a declared field.
    pub fn default_of(&self, field: &str) -> Option<&Value> {
        self.schema
            .fields()
            .iter()
            .find(|def| def.name == field)
            .map(|def| &def.default)
    }

    /// Returns the default instance's field values.
    pub(crate) fn defaults(&self) -> BTreeMap<Ident, Value> {
        self.schema
            .fields()
            .iter()
            .filter_map(|def| {
                self.fields
                    .get(def.name.as_str())
                    .map(|ident| (ident.clone(), def.default.clone()))
            })
            .collect()
    }
}

/// A registered type, record or not.
#[derive(Debug, Clone)]
pub enum TypeRef {
    Record(RecordType),
    /// Exists but has no fields to enumerate.
    Opaque(TypeName),
}

impl TypeRef {
    pub fn name(&self) -> &TypeName {
        match self {
            TypeRef::Record(record) => record.name(),
            TypeRef::Opaque(name) => name,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, TypeRef::Record(_))
    }
}

/// All types known to the runtime, together with their identifier table.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    symbols: SymbolTable,
    types: BTreeMap<String, TypeRef>,
    rust_types: HashMap<TypeId, TypeName>,
    rest_field: Ident,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut symbols = SymbolTable::new();
        let rest_field = symbols.intern(REST_FIELD);
        Self {
            symbols,
            types: BTreeMap::new(),
            rust_types: HashMap::new(),
            rest_field,
        }
    }

    /// Registers a record type described by `schema`.
    ///
    /// The type name and every field name become known identifiers.
    /// Registering a name twice replaces the earlier entry.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::BadTypeName`] if `name` is not a type path.
    pub fn register_schema(
        &mut self,
        name: &str,
        schema: impl RecordSchema + 'static,
    ) -> Result<RecordType> {
        let name = TypeName::parse(name)?;
        self.symbols.intern(name.as_str());
        let fields: BTreeSet<Ident> = schema
            .fields()
            .iter()
            .map(|def| self.symbols.intern(&def.name))
            .collect();
        tracing::debug!(
            record = %name,
            fields = fields.len(),
            "Registered record type"
        );
        let record = RecordType {
            name: name.clone(),
            schema: Arc::new(schema),
            fields: Arc::new(fields),
        };
        self.types.insert(name.as_str().to_string(), TypeRef::Record(record.clone()));
        Ok(record)
    }

    /// Registers the Rust struct `T` under `name`.
    ///
    /// Fields and defaults come from [`StaticSchema::of`]. The struct can then
    /// be located again with [`TypeRegistry::name_of`].
    pub fn register_record<T>(&mut self, name: &str) -> Result<RecordType>
    where
        T: Serialize + Default + 'static,
    {
        let schema = StaticSchema::of::<T>()?;
        let record = self.register_schema(name, schema)?;
        self.rust_types.insert(TypeId::of::<T>(), record.name().clone());
        Ok(record)
    }

    /// Registers a type that exists but is not a record type.
    pub fn register_opaque(&mut self, name: &str) -> Result<TypeRef> {
        let name = TypeName::parse(name)?;
        self.symbols.intern(name.as_str());
        let entry = TypeRef::Opaque(name.clone());
        self.types.insert(name.as_str().to_string(), entry.clone());
        Ok(entry)
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// The reserved identifier that holds residual entries in merge mode.
    pub fn rest_field(&self) -> &Ident {
        &self.rest_field
    }

    /// Returns the registered name of the Rust type `T`.
    pub fn name_of<T: 'static>(&self) -> Option<&TypeName> {
        self.rust_types.get(&TypeId::of::<T>())
    }

    /// Resolves `text` to a registered type.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::BadTypeName`] if `text` is not a type path.
    /// - [`ResolveError::UnknownType`] if no such type is registered.
    pub fn resolve_type(&self, text: &str) -> Result<TypeRef> {
        let name = TypeName::parse(text)?;
        self.types
            .get(name.as_str())
            .cloned()
            .ok_or_else(|| ResolveError::UnknownType {
                name: name.to_string(),
            })
    }

    /// Checks that `type_ref` supports field enumeration.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotARecordType`] for opaque types.
    pub fn ensure_is_record_type(&self, type_ref: &TypeRef) -> Result<RecordType> {
        match type_ref {
            TypeRef::Record(record) => Ok(record.clone()),
            TypeRef::Opaque(name) => Err(ResolveError::NotARecordType {
                name: name.to_string(),
            }),
        }
    }

    /// Resolves `text` and checks that it names a record type.
    pub fn resolve_record(&self, text: &str) -> Result<RecordType> {
        let type_ref = self.resolve_type(text)?;
        self.ensure_is_record_type(&type_ref)
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::FieldDef;

    use super::*;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry
            .register_schema(
                "Accounts::User",
                StaticSchema::with_fields(["first_name", "username", "password"]),
            )
            .unwrap();
        registry.register_opaque("Accounts::Session").unwrap();
        registry
    }

    #[test]
    fn registration_interns_type_and_field_names() {
        let registry = registry();
        let symbols = registry.symbols();
        for text in ["Accounts::User", "Accounts::Session", "first_name", "password"] {
            assert!(symbols.contains(text), "{text} should be interned");
        }
    }

    #[test]
    fn resolve_type_distinguishes_failures() {
        let registry = registry();
        assert!(registry.resolve_type("Accounts::User").unwrap().is_record());
        assert!(matches!(
            registry.resolve_type("accounts.user"),
            Err(ResolveError::BadTypeName { .. })
        ));
        assert!(matches!(
            registry.resolve_type("Accounts::Admin"),
            Err(ResolveError::UnknownType { .. })
        ));
        assert!(matches!(
            registry.resolve_record("Accounts::Session"),
            Err(ResolveError::NotARecordType { .. })
        ));
    }

    #[test]
    fn failed_resolution_does_not_grow_symbol_table() {
        let registry = registry();
        let before = registry.symbols().len();
        let _ = registry.resolve_type("Accounts::Admin");
        assert_eq!(registry.symbols().len(), before);
        assert!(!registry.symbols().contains("Accounts::Admin"));
    }

    #[test]
    fn default_of_reports_declared_defaults_only() {
        let mut registry = TypeRegistry::new();
        let counter = registry
            .register_schema(
                "Counter",
                StaticSchema::new([FieldDef::new("count", Value::from(10))]),
            )
            .unwrap();
        assert_eq!(counter.default_of("count"), Some(&Value::from(10)));
        assert_eq!(counter.default_of(REST_FIELD), None);
    }

    #[test]
    fn rest_field_is_reserved() {
        assert_eq!(TypeRegistry::new().rest_field().as_str(), REST_FIELD);
    }
}

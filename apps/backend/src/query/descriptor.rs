//! Field descriptor tables for query-bound destination types.
//!
//! Each destination type describes its fields once, through
//! [`FieldTable::builder`], with a typed setter per field. The binder walks
//! the table instead of inspecting the type at runtime.

use std::fmt;

use super::PaginationFilter;
use crate::casing::to_snake_case;

/// Declared kind of a destination field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Pagination,
    Unsupported,
}

pub(crate) enum Setter<T> {
    String(fn(&mut T, String)),
    Integer(fn(&mut T, i64)),
    Float(fn(&mut T, f64)),
    Pagination(fn(&mut T, PaginationFilter)),
    None,
}

/// One field of a destination type.
pub struct FieldDescriptor<T> {
    name: &'static str,
    key: String,
    kind: FieldKind,
    settable: bool,
    pub(crate) setter: Setter<T>,
}

impl<T> FieldDescriptor<T> {
    fn new(name: &'static str, kind: FieldKind, settable: bool, setter: Setter<T>) -> Self {
        Self {
            name,
            key: to_snake_case(name),
            kind,
            settable,
            setter,
        }
    }

    /// Field name as declared (usually PascalCase or camelCase).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// snake_case lookup key derived from the name.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_settable(&self) -> bool {
        self.settable
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("settable", &self.settable)
            .finish()
    }
}

/// Ordered list of field descriptors for one destination type.
#[derive(Debug)]
pub struct FieldTable<T> {
    fields: Vec<FieldDescriptor<T>>,
}

impl<T> FieldTable<T> {
    pub fn builder() -> FieldTableBuilder<T> {
        FieldTableBuilder { fields: Vec::new() }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor<T>> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub struct FieldTableBuilder<T> {
    fields: Vec<FieldDescriptor<T>>,
}

impl<T> FieldTableBuilder<T> {
    pub fn string(mut self, name: &'static str, set: fn(&mut T, String)) -> Self {
        self.fields.push(FieldDescriptor::new(
            name,
            FieldKind::String,
            true,
            Setter::String(set),
        ));
        self
    }

    pub fn integer(mut self, name: &'static str, set: fn(&mut T, i64)) -> Self {
        self.fields.push(FieldDescriptor::new(
            name,
            FieldKind::Integer,
            true,
            Setter::Integer(set),
        ));
        self
    }

    pub fn float(mut self, name: &'static str, set: fn(&mut T, f64)) -> Self {
        self.fields.push(FieldDescriptor::new(
            name,
            FieldKind::Float,
            true,
            Setter::Float(set),
        ));
        self
    }

    pub fn pagination(mut self, name: &'static str, set: fn(&mut T, PaginationFilter)) -> Self {
        self.fields.push(FieldDescriptor::new(
            name,
            FieldKind::Pagination,
            true,
            Setter::Pagination(set),
        ));
        self
    }

    /// A field the binder cannot coerce into (lists, maps, nested structs).
    pub fn unsupported(mut self, name: &'static str) -> Self {
        self.fields.push(FieldDescriptor::new(
            name,
            FieldKind::Unsupported,
            true,
            Setter::None,
        ));
        self
    }

    /// A field that is part of the type but must never be written from a
    /// query string.
    pub fn private(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields
            .push(FieldDescriptor::new(name, kind, false, Setter::None));
        self
    }

    pub fn build(self) -> FieldTable<T> {
        FieldTable {
            fields: self.fields,
        }
    }
}

/// Destination types that can be populated from a query mapping.
///
/// Implementors keep their table in a `static` so it is built once:
///
/// ```ignore
/// impl QueryParams for ListOrders {
///     fn field_table() -> &'static FieldTable<Self> {
///         static TABLE: LazyLock<FieldTable<ListOrders>> = LazyLock::new(|| {
///             FieldTable::<ListOrders>::builder()
///                 .pagination("PaginationFilter", |t, v| t.pagination_filter = v)
///                 .string("SortBy", |t, v| t.sort_by = Some(v))
///                 .build()
///         });
///         &TABLE
///     }
/// }
/// ```
pub trait QueryParams: Sized + 'static {
    fn field_table() -> &'static FieldTable<Self>;
}

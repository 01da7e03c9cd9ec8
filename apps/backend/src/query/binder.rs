//! Populates destination types from a query mapping.
//!
//! Lookup order per field, keyed by the field's snake_case name:
//! - `pagination_filter` reads `page` and `limit`
//! - `sort_by` reads `sortby`, then `sort_by` (the later non-empty one wins)
//! - `keyword` reads `keyword`, kept only when longer than three characters
//! - `customer_id` asks the identity extractor; its error aborts the bind
//!
//! After that, every field except `customer_id` also reads `filter[<key>]`,
//! which overwrites whatever the steps above assigned. `customer_id` only
//! ever comes from the verified identity.
//!
//! Integer and float values that fail to parse leave the field untouched.

use super::descriptor::{FieldDescriptor, QueryParams, Setter};
use super::{parse_float, parse_int, FieldTable, PaginationFilter, QueryMap};
use crate::errors::binding::{BindError, IdentityError};

/// Minimum number of characters (exclusive) a search keyword needs.
const MIN_KEYWORD_CHARS: usize = 3;

/// Source of the authenticated customer id for the current request.
///
/// Returns `Ok(0)` for anonymous requests, a positive id when a verified
/// identity is present, and an error when a subject is present but cannot
/// be read.
pub trait IdentityExtractor {
    fn customer_id(&self) -> Result<i64, IdentityError>;
}

impl<F> IdentityExtractor for F
where
    F: Fn() -> Result<i64, IdentityError>,
{
    fn customer_id(&self) -> Result<i64, IdentityError> {
        self()
    }
}

/// Identity extractor for requests without credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl IdentityExtractor for Anonymous {
    fn customer_id(&self) -> Result<i64, IdentityError> {
        Ok(0)
    }
}

/// Value headed for a destination field, tagged by where it came from.
enum Incoming {
    Text(String),
    Identity(i64),
    Window(PaginationFilter),
}

/// Bind `query` into `target` using the type's own field table.
pub fn bind<T: QueryParams>(
    target: &mut T,
    query: &QueryMap,
    identity: &dyn IdentityExtractor,
) -> Result<(), BindError> {
    bind_with(T::field_table(), target, query, identity)
}

/// Bind into a fresh `T::default()`.
pub fn bind_new<T: QueryParams + Default>(
    query: &QueryMap,
    identity: &dyn IdentityExtractor,
) -> Result<T, BindError> {
    let mut target = T::default();
    bind(&mut target, query, identity)?;
    Ok(target)
}

/// Bind `query` into `target` using an explicit field table.
pub fn bind_with<T>(
    table: &FieldTable<T>,
    target: &mut T,
    query: &QueryMap,
    identity: &dyn IdentityExtractor,
) -> Result<(), BindError> {
    for field in table.iter().filter(|f| f.is_settable()) {
        match field.key() {
            "pagination_filter" => {
                let window = PaginationFilter::from_query(query);
                assign(field, target, "page", Incoming::Window(window))?;
            }
            "sort_by" => {
                for key in ["sortby", "sort_by"] {
                    if let Some(value) = non_empty(query, key) {
                        assign(field, target, key, Incoming::Text(value.to_string()))?;
                    }
                }
            }
            "keyword" => {
                if let Some(value) = query.get("keyword") {
                    if value.chars().count() > MIN_KEYWORD_CHARS {
                        assign(field, target, "keyword", Incoming::Text(value.clone()))?;
                    }
                }
            }
            "customer_id" => {
                let id = identity
                    .customer_id()
                    .map_err(|source| BindError::Authentication {
                        field: field.name(),
                        source,
                    })?;
                assign(field, target, "customer_id", Incoming::Identity(id))?;
                continue;
            }
            _ => {}
        }

        let filter_key = format!("filter[{}]", field.key());
        if let Some(value) = query.get(&filter_key) {
            assign(field, target, &filter_key, Incoming::Text(value.clone()))?;
        }
    }
    Ok(())
}

fn non_empty<'q>(query: &'q QueryMap, key: &str) -> Option<&'q str> {
    query
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

/// Coerce `value` into the field's kind and write it.
fn assign<T>(
    field: &FieldDescriptor<T>,
    target: &mut T,
    key: &str,
    value: Incoming,
) -> Result<(), BindError> {
    match (&field.setter, value) {
        (Setter::String(set), Incoming::Text(text)) => set(target, text),
        (Setter::String(set), Incoming::Identity(id)) => set(target, id.to_string()),
        (Setter::Integer(set), Incoming::Text(text)) => {
            if let Some(parsed) = parse_int(&text) {
                set(target, parsed);
            }
        }
        (Setter::Integer(set), Incoming::Identity(id)) => set(target, id),
        (Setter::Float(set), Incoming::Text(text)) => {
            if let Some(parsed) = parse_float(&text) {
                set(target, parsed);
            }
        }
        (Setter::Float(set), Incoming::Identity(id)) => set(target, id as f64),
        (Setter::Pagination(set), Incoming::Window(window)) => set(target, window),
        // A bare string cannot describe a window.
        (Setter::Pagination(_), Incoming::Text(_)) => {}
        _ => {
            return Err(BindError::UnsupportedType {
                field: field.name(),
                key: key.to_string(),
            })
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::sync::LazyLock;

    use super::*;
    use crate::query::FieldKind;

    #[derive(Debug, Default, PartialEq)]
    struct ListOrders {
        pagination_filter: PaginationFilter,
        sort_by: Option<String>,
        keyword: Option<String>,
        customer_id: i64,
        status: Option<String>,
        min_total: Option<f64>,
        warehouse_id: Option<i64>,
        tags: Vec<String>,
        internal_note: Option<String>,
    }

    impl QueryParams for ListOrders {
        fn field_table() -> &'static FieldTable<Self> {
            static TABLE: LazyLock<FieldTable<ListOrders>> = LazyLock::new(|| {
                FieldTable::<ListOrders>::builder()
                    .pagination("PaginationFilter", |t, v| t.pagination_filter = v)
                    .string("SortBy", |t, v| t.sort_by = Some(v))
                    .string("Keyword", |t, v| t.keyword = Some(v))
                    .integer("CustomerID", |t, v| t.customer_id = v)
                    .string("Status", |t, v| t.status = Some(v))
                    .float("MinTotal", |t, v| t.min_total = Some(v))
                    .integer("WarehouseID", |t, v| t.warehouse_id = Some(v))
                    .unsupported("Tags")
                    .private("internalNote", FieldKind::String)
                    .build()
            });
            &TABLE
        }
    }

    fn query(pairs: &[(&str, &str)]) -> QueryMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn bind_orders(pairs: &[(&str, &str)]) -> Result<ListOrders, BindError> {
        bind_new::<ListOrders>(&query(pairs), &Anonymous)
    }

    #[test]
    fn test_empty_query_leaves_defaults() {
        let orders = bind_orders(&[]).unwrap();
        assert_eq!(orders.pagination_filter, PaginationFilter::default());
        assert_eq!(orders.sort_by, None);
        assert_eq!(orders.keyword, None);
        assert_eq!(orders.customer_id, 0);
        assert!(orders.tags.is_empty());
    }

    #[test]
    fn test_pagination_is_derived_from_page_and_limit() {
        let orders = bind_orders(&[("page", "3"), ("limit", "10")]).unwrap();
        assert_eq!(orders.pagination_filter.offset(), 20);
        assert_eq!(orders.pagination_filter.limit, 10);
    }

    #[test]
    fn test_sort_by_later_key_wins() {
        let orders = bind_orders(&[("sortby", "a"), ("sort_by", "b")]).unwrap();
        assert_eq!(orders.sort_by.as_deref(), Some("b"));
    }

    #[test]
    fn test_sort_by_empty_value_is_ignored() {
        let orders = bind_orders(&[("sortby", "created_at"), ("sort_by", "")]).unwrap();
        assert_eq!(orders.sort_by.as_deref(), Some("created_at"));
    }

    #[test]
    fn test_keyword_needs_more_than_three_chars() {
        assert_eq!(bind_orders(&[("keyword", "abc")]).unwrap().keyword, None);
        assert_eq!(
            bind_orders(&[("keyword", "abcd")]).unwrap().keyword.as_deref(),
            Some("abcd")
        );
    }

    #[test]
    fn test_keyword_length_counts_characters() {
        assert_eq!(bind_orders(&[("keyword", "çaé")]).unwrap().keyword, None);
    }

    #[test]
    fn test_filter_values_are_coerced() {
        let orders = bind_orders(&[
            ("filter[status]", "paid"),
            ("filter[min_total]", "12.5"),
            ("filter[warehouse_id]", "0x10"),
        ])
        .unwrap();

        assert_eq!(orders.status.as_deref(), Some("paid"));
        assert_eq!(orders.min_total, Some(12.5));
        assert_eq!(orders.warehouse_id, Some(16));
    }

    #[test]
    fn test_unparsable_numbers_leave_field_unset() {
        let orders = bind_orders(&[
            ("filter[min_total]", "cheap"),
            ("filter[warehouse_id]", "north"),
        ])
        .unwrap();

        assert_eq!(orders.min_total, None);
        assert_eq!(orders.warehouse_id, None);
    }

    #[test]
    fn test_plain_keys_are_not_filters() {
        let orders = bind_orders(&[("status", "paid")]).unwrap();
        assert_eq!(orders.status, None);
    }

    #[test]
    fn test_unsupported_field_with_value_fails() {
        let err = bind_orders(&[("filter[tags]", "1")]).unwrap_err();
        assert_eq!(
            err,
            BindError::UnsupportedType {
                field: "Tags",
                key: "filter[tags]".to_string(),
            }
        );
    }

    #[test]
    fn test_unsupported_field_without_value_is_skipped() {
        let orders = bind_orders(&[("filter[status]", "open")]).unwrap();
        assert!(orders.tags.is_empty());
        assert_eq!(orders.status.as_deref(), Some("open"));
    }

    #[test]
    fn test_private_field_is_never_written() {
        let orders = bind_orders(&[("filter[internal_note]", "leak")]).unwrap();
        assert_eq!(orders.internal_note, None);
    }

    #[test]
    fn test_customer_id_comes_from_identity() {
        let identity = || -> Result<i64, IdentityError> { Ok(42) };
        let orders = bind_new::<ListOrders>(&query(&[]), &identity).unwrap();
        assert_eq!(orders.customer_id, 42);
    }

    #[test]
    fn test_customer_id_cannot_be_spoofed_through_filter() {
        let identity = || -> Result<i64, IdentityError> { Ok(7) };
        let orders =
            bind_new::<ListOrders>(&query(&[("filter[customer_id]", "99")]), &identity).unwrap();
        assert_eq!(orders.customer_id, 7);
    }

    #[test]
    fn test_filter_overrides_special_keys() {
        let orders = bind_orders(&[
            ("sortby", "name"),
            ("filter[sort_by]", "x"),
            ("filter[keyword]", "ab"),
        ])
        .unwrap();

        assert_eq!(orders.sort_by.as_deref(), Some("x"));
        assert_eq!(orders.keyword.as_deref(), Some("ab"));
    }

    #[test]
    fn test_filter_on_pagination_is_ignored() {
        let orders = bind_orders(&[("page", "2"), ("filter[pagination_filter]", "9")]).unwrap();
        assert_eq!(orders.pagination_filter, PaginationFilter::new(2, 10));
    }

    #[test]
    fn test_identity_error_propagates_and_halts() {
        let identity =
            || -> Result<i64, IdentityError> { Err(IdentityError::malformed_subject("sub is not numeric")) };

        let mut orders = ListOrders::default();
        let err = bind(
            &mut orders,
            &query(&[("sortby", "name"), ("filter[status]", "paid")]),
            &identity,
        )
        .unwrap_err();

        assert_eq!(
            err,
            BindError::Authentication {
                field: "CustomerID",
                source: IdentityError::malformed_subject("sub is not numeric"),
            }
        );
        // Fields before customer_id were bound; the ones after were not.
        assert_eq!(orders.sort_by.as_deref(), Some("name"));
        assert_eq!(orders.status, None);
    }

    #[test]
    fn test_identity_is_not_consulted_without_customer_field() {
        #[derive(Default)]
        struct Search {
            keyword: Option<String>,
        }
        let table = FieldTable::<Search>::builder()
            .string("Keyword", |t, v| t.keyword = Some(v))
            .build();

        let called = Cell::new(false);
        let identity = || -> Result<i64, IdentityError> {
            called.set(true);
            Err(IdentityError::Missing)
        };

        let mut search = Search::default();
        bind_with(&table, &mut search, &query(&[("keyword", "boots")]), &identity).unwrap();

        assert!(!called.get());
        assert_eq!(search.keyword.as_deref(), Some("boots"));
    }

    #[test]
    fn test_pagination_into_wrong_kind_fails() {
        #[derive(Default)]
        struct Odd {
            _pagination: String,
        }
        let table = FieldTable::<Odd>::builder()
            .string("PaginationFilter", |t, v| t._pagination = v)
            .build();

        let err = bind_with(&table, &mut Odd::default(), &query(&[]), &Anonymous).unwrap_err();
        assert!(matches!(err, BindError::UnsupportedType { field: "PaginationFilter", .. }));
    }

    #[test]
    fn test_identity_into_string_field() {
        #[derive(Default)]
        struct ByCustomer {
            customer_id: String,
        }
        let table = FieldTable::<ByCustomer>::builder()
            .string("CustomerID", |t, v| t.customer_id = v)
            .build();

        let identity = || -> Result<i64, IdentityError> { Ok(15) };
        let mut target = ByCustomer::default();
        bind_with(&table, &mut target, &query(&[]), &identity).unwrap();
        assert_eq!(target.customer_id, "15");
    }
}

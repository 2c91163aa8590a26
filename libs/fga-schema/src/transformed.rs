//! The validated, type-erased tree produced by the validator.
//!
//! Every scalar has already been checked against its property (and dates
//! parsed), every nested object and collection has been validated against its
//! registered schema. [`Transformed::to_json`] walks the tree back into the
//! wire shape it came from.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::schema::wrap_items;

/// Calendar-date wire format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A validated value.
#[derive(Debug, Clone, PartialEq)]
pub enum Transformed {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    /// Elements of an `array` property.
    List(Vec<Transformed>),
    Object(TransformedObject),
    Collection(TransformedCollection),
    /// Structured data passed through without validation.
    Opaque(Value),
}

impl Transformed {
    /// Short name of the variant, used in mismatch errors.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::List(_) => "array",
            Self::Object(_) => "object",
            Self::Collection(_) => "collection",
            Self::Opaque(_) => "opaque",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Encode back to the wire tree.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Integer(n) => Value::from(*n),
            Self::Number(n) => Value::from(*n),
            Self::String(s) => Value::String(s.clone()),
            Self::Date(d) => Value::String(format_date(*d)),
            Self::DateTime(dt) => Value::String(format_datetime(dt)),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(object) => object.to_json(),
            Self::Collection(collection) => collection.to_json(),
            Self::Opaque(v) => v.clone(),
        }
    }
}

/// Render a date the way it is expected on the wire.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Render a timestamp as RFC 3339 in UTC with a `Z` suffix.
#[must_use]
pub fn format_datetime(datetime: &DateTime<Utc>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// One validated property of an object.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedField {
    /// Wire name.
    pub name: String,
    /// Declared constructor alias, if any.
    pub parameter_name: Option<String>,
    pub value: Transformed,
}

/// A validated object, fields in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedObject {
    pub type_name: String,
    pub fields: Vec<TransformedField>,
}

impl TransformedObject {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Transformed> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut map = Map::with_capacity(self.fields.len());
        for field in &self.fields {
            map.insert(field.name.clone(), field.value.to_json());
        }
        Value::Object(map)
    }
}

/// A validated collection.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedCollection {
    pub type_name: String,
    /// Set when the items arrived nested under this key.
    pub wrapper_key: Option<String>,
    /// Entries carry meaningful string keys rather than positions.
    pub keyed: bool,
    /// `(key, item)` pairs; ordered collections use `"0"`, `"1"`, ...
    pub entries: Vec<(String, Transformed)>,
}

impl TransformedCollection {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        let items = if self.keyed {
            let mut map = Map::with_capacity(self.entries.len());
            for (key, value) in &self.entries {
                map.insert(key.clone(), value.to_json());
            }
            Value::Object(map)
        } else {
            Value::Array(self.entries.iter().map(|(_, v)| v.to_json()).collect())
        };
        wrap_items(self.wrapper_key.as_deref(), items)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn datetime_renders_with_zulu_suffix() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_datetime(&dt), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn keyed_collection_encodes_as_object() {
        let collection = TransformedCollection {
            type_name: "Params".to_owned(),
            wrapper_key: None,
            keyed: true,
            entries: vec![("a".to_owned(), Transformed::Integer(1))],
        };
        assert_eq!(collection.to_json(), json!({ "a": 1 }));
    }

    #[test]
    fn wrapped_collection_reencodes_under_key() {
        let collection = TransformedCollection {
            type_name: "Stores".to_owned(),
            wrapper_key: Some("stores".to_owned()),
            keyed: false,
            entries: vec![("0".to_owned(), Transformed::String("s".to_owned()))],
        };
        assert_eq!(collection.to_json(), json!({ "stores": ["s"] }));
    }
}

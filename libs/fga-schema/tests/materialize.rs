#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use chrono::NaiveDate;
use fga_schema::{
    CollectionConstructor, CollectionSchema, ConstructorArgs, Describe, ErrorKind,
    IndexedCollection, ItemsSpec, JsonSerialize, KeyedCollection, Model, ModelCollection, Offset,
    PropertyFormat, PropertyType, Schema, SchemaDefinition, SchemaError, SchemaProperty,
    SchemaRegistry, SchemaResult, SchemaValidator, Transformed, format_date,
};
use serde_json::{Map, Value, json};
use tracing_test::traced_test;

// ---------------------------------------------------------------------------
// Test models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct Book {
    isbn: String,
    title: String,
    genre: String,
    published: Option<NaiveDate>,
    shelf: String,
    notes: Option<String>,
}

impl Describe for Book {
    const TYPE_NAME: &'static str = "Book";

    fn definition() -> SchemaResult<SchemaDefinition> {
        Ok(Schema::new(
            Self::TYPE_NAME,
            vec![
                SchemaProperty::new("isbn", PropertyType::String).required(),
                SchemaProperty::new("title", PropertyType::String).required(),
                SchemaProperty::new("genre", PropertyType::String)
                    .required()
                    .enum_values(["FICTION", "HISTORY"]),
                SchemaProperty::new("published", PropertyType::String).format(PropertyFormat::Date),
                SchemaProperty::new("shelf_code", PropertyType::String)
                    .default_value(json!("A1"))
                    .parameter_name("shelf"),
                SchemaProperty::new("notes", PropertyType::String),
            ],
        )?
        .into())
    }
}

impl JsonSerialize for Book {
    fn json_serialize(&self) -> Value {
        let mut map = Map::new();
        map.insert("isbn".to_owned(), json!(self.isbn));
        map.insert("title".to_owned(), json!(self.title));
        map.insert("genre".to_owned(), json!(self.genre));
        if let Some(published) = self.published {
            map.insert("published".to_owned(), json!(format_date(published)));
        }
        map.insert("shelf_code".to_owned(), json!(self.shelf));
        if let Some(notes) = &self.notes {
            map.insert("notes".to_owned(), json!(notes));
        }
        Value::Object(map)
    }
}

impl Model for Book {
    fn construct(args: &mut ConstructorArgs) -> SchemaResult<Self> {
        Ok(Self {
            isbn: args.string("isbn")?,
            title: args.string("title")?,
            genre: args.string("genre")?,
            published: args.opt_date("published")?,
            shelf: args.string("shelf")?,
            notes: None,
        })
    }

    fn assign(&mut self, field: &str, value: Transformed) -> SchemaResult<bool> {
        match (field, value) {
            ("notes", Transformed::String(notes)) => {
                self.notes = Some(notes);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Library(IndexedCollection<Book>);

impl Describe for Library {
    const TYPE_NAME: &'static str = "Library";

    fn definition() -> SchemaResult<SchemaDefinition> {
        Ok(CollectionSchema::new(Self::TYPE_NAME, Book::TYPE_NAME)
            .wrapper_key("books")
            .into())
    }

    fn register_dependencies(registry: &SchemaRegistry) -> SchemaResult<()> {
        registry.ensure::<Book>().map(drop)
    }
}

impl JsonSerialize for Library {
    fn json_serialize(&self) -> Value {
        json!({ "books": self.0.json_serialize() })
    }
}

impl ModelCollection for Library {
    type Item = Book;

    fn constructor() -> CollectionConstructor<Self, Book> {
        CollectionConstructor::new().from_items(|items| Self(IndexedCollection::from_items(items)))
    }
}

/// Non-empty list without wrapper, built through repeated `add`.
#[derive(Debug, Clone, PartialEq)]
struct Shortlist(IndexedCollection<Book>);

impl Describe for Shortlist {
    const TYPE_NAME: &'static str = "Shortlist";

    fn definition() -> SchemaResult<SchemaDefinition> {
        Ok(CollectionSchema::new(Self::TYPE_NAME, Book::TYPE_NAME)
            .require_items()
            .into())
    }

    fn register_dependencies(registry: &SchemaRegistry) -> SchemaResult<()> {
        registry.ensure::<Book>().map(drop)
    }
}

impl JsonSerialize for Shortlist {
    fn json_serialize(&self) -> Value {
        self.0.json_serialize()
    }
}

impl ModelCollection for Shortlist {
    type Item = Book;

    fn constructor() -> CollectionConstructor<Self, Book> {
        CollectionConstructor::new()
            .empty(|| Self(IndexedCollection::new()))
            .add(|list, book| {
                list.0.add(book);
            })
    }
}

/// Keyed by catalogue code.
#[derive(Debug, Clone, PartialEq)]
struct Catalogue(KeyedCollection<Book>);

impl Describe for Catalogue {
    const TYPE_NAME: &'static str = "Catalogue";

    fn definition() -> SchemaResult<SchemaDefinition> {
        Ok(CollectionSchema::new(Self::TYPE_NAME, Book::TYPE_NAME)
            .keyed()
            .into())
    }

    fn register_dependencies(registry: &SchemaRegistry) -> SchemaResult<()> {
        registry.ensure::<Book>().map(drop)
    }
}

impl JsonSerialize for Catalogue {
    fn json_serialize(&self) -> Value {
        self.0.json_serialize()
    }
}

impl ModelCollection for Catalogue {
    type Item = Book;

    fn constructor() -> CollectionConstructor<Self, Book> {
        CollectionConstructor::new()
            .empty(|| Self(KeyedCollection::new()))
            .set_offset(|catalogue, offset, book| {
                let key = match offset {
                    Offset::Key(key) => key,
                    Offset::Index(index) => index.to_string(),
                };
                catalogue.0.add(key, book);
            })
    }
}

/// Keyed on the wire but only able to append.
struct Tally(IndexedCollection<Book>);

impl Describe for Tally {
    const TYPE_NAME: &'static str = "Tally";

    fn definition() -> SchemaResult<SchemaDefinition> {
        Ok(CollectionSchema::new(Self::TYPE_NAME, Book::TYPE_NAME)
            .keyed()
            .into())
    }

    fn register_dependencies(registry: &SchemaRegistry) -> SchemaResult<()> {
        registry.ensure::<Book>().map(drop)
    }
}

impl JsonSerialize for Tally {
    fn json_serialize(&self) -> Value {
        self.0.json_serialize()
    }
}

impl ModelCollection for Tally {
    type Item = Book;

    fn constructor() -> CollectionConstructor<Self, Book> {
        CollectionConstructor::new()
            .empty(|| Self(IndexedCollection::new()))
            .add(|tally, book| {
                tally.0.add(book);
            })
    }
}

/// Declares no usable strategy.
struct Shelf;

impl Describe for Shelf {
    const TYPE_NAME: &'static str = "Shelf";

    fn definition() -> SchemaResult<SchemaDefinition> {
        Ok(CollectionSchema::new(Self::TYPE_NAME, Book::TYPE_NAME).into())
    }

    fn register_dependencies(registry: &SchemaRegistry) -> SchemaResult<()> {
        registry.ensure::<Book>().map(drop)
    }
}

impl JsonSerialize for Shelf {
    fn json_serialize(&self) -> Value {
        Value::Array(Vec::new())
    }
}

impl ModelCollection for Shelf {
    type Item = Book;

    fn constructor() -> CollectionConstructor<Self, Book> {
        CollectionConstructor::new()
    }
}

/// Recursive boolean expression.
#[derive(Debug, Clone, PartialEq)]
struct Expr {
    op: String,
    value: Option<bool>,
    children: Vec<Expr>,
    left: Option<Box<Expr>>,
}

impl Describe for Expr {
    const TYPE_NAME: &'static str = "Expr";

    fn definition() -> SchemaResult<SchemaDefinition> {
        Ok(Schema::new(
            Self::TYPE_NAME,
            vec![
                SchemaProperty::new("op", PropertyType::String)
                    .required()
                    .enum_values(["and", "or", "lit"]),
                SchemaProperty::new("value", PropertyType::Boolean),
                SchemaProperty::array("children", ItemsSpec::of(PropertyType::SelfRef)),
                SchemaProperty::new("left", PropertyType::SelfRef),
            ],
        )?
        .into())
    }
}

impl JsonSerialize for Expr {
    fn json_serialize(&self) -> Value {
        let mut map = Map::new();
        map.insert("op".to_owned(), json!(self.op));
        if let Some(value) = self.value {
            map.insert("value".to_owned(), json!(value));
        }
        if !self.children.is_empty() {
            map.insert(
                "children".to_owned(),
                Value::Array(self.children.iter().map(JsonSerialize::json_serialize).collect()),
            );
        }
        if let Some(left) = &self.left {
            map.insert("left".to_owned(), left.json_serialize());
        }
        Value::Object(map)
    }
}

impl Model for Expr {
    fn construct(args: &mut ConstructorArgs) -> SchemaResult<Self> {
        Ok(Self {
            op: args.string("op")?,
            value: args.opt_boolean("value")?,
            children: args.opt_list("children")?.unwrap_or_default(),
            left: args.opt_object("left")?.map(Box::new),
        })
    }
}

fn validator() -> SchemaValidator {
    SchemaValidator::new(Arc::new(SchemaRegistry::new()))
}

fn book(isbn: &str) -> Value {
    json!({ "isbn": isbn, "title": "T", "genre": "FICTION" })
}

// ---------------------------------------------------------------------------
// Objects
// ---------------------------------------------------------------------------

#[test]
fn object_materializes_with_alias_default_and_assignment() {
    let b: Book = validator()
        .validate_and_transform(&json!({
            "isbn": "1",
            "title": "Dune",
            "genre": "FICTION",
            "published": "1965-08-01",
            "notes": "classic",
            "unknown": 1
        }))
        .unwrap();
    assert_eq!(b.shelf, "A1");
    assert_eq!(b.published, NaiveDate::from_ymd_opt(1965, 8, 1));
    assert_eq!(b.notes.as_deref(), Some("classic"));
}

#[test]
fn wrong_scalar_type_fails_fast() {
    let err = validator()
        .validate_and_transform::<Book>(&json!({ "isbn": "1", "title": 123 }))
        .unwrap_err();
    // genre is also missing, but the mismatch on title wins
    assert!(matches!(err, SchemaError::InvalidItemType { ref path, .. } if path == "Book.title"));
}

#[test]
fn all_missing_required_fields_are_reported_together() {
    let err = validator()
        .validate_and_transform::<Book>(&json!({ "title": "Dune" }))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidItemType);
    assert_eq!(err.missing_fields(), ["isbn", "genre"]);
}

#[test]
fn enum_rejects_value_outside_the_set() {
    let err = validator()
        .validate_and_transform::<Book>(&json!({ "isbn": "1", "title": "T", "genre": "POETRY" }))
        .unwrap_err();
    assert!(err.to_string().contains("POETRY"), "got: {err}");
}

#[test]
fn malformed_date_is_rejected() {
    let mut data = book("1");
    data["published"] = json!("08/01/1965");
    let err = validator().validate_and_transform::<Book>(&data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidItemType);
}

#[test]
fn self_reference_supports_recursive_trees() {
    let data = json!({
        "op": "and",
        "children": [
            { "op": "lit", "value": true },
            { "op": "or", "children": [{ "op": "lit", "value": false }] }
        ],
        "left": { "op": "lit", "value": true }
    });
    let expr: Expr = validator().validate_and_transform(&data).unwrap();
    assert_eq!(expr.children.len(), 2);
    assert_eq!(expr.children[1].children[0].value, Some(false));
    assert_eq!(expr.json_serialize(), data);
}

#[test]
fn nested_failure_reports_the_deep_cause() {
    let data = json!({ "op": "and", "left": { "op": "xor" } });
    let err = validator().validate_and_transform::<Expr>(&data).unwrap_err();
    let SchemaError::InvalidItemType { path, .. } = err.root_cause() else {
        panic!("unexpected: {err}");
    };
    assert_eq!(path, "Expr.left.op");
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

#[test]
fn wrapper_key_is_symmetric() {
    let data = json!({ "books": [book("1"), book("2")] });
    let v = validator();
    let library: Library = v.validate_and_transform_collection(&data).unwrap();
    assert_eq!(library.0.len(), 2);

    let encoded = library.json_serialize();
    assert!(encoded.get("books").is_some_and(Value::is_array));

    let again: Library = v.validate_and_transform_collection(&encoded).unwrap();
    assert_eq!(again.json_serialize(), encoded);
}

#[test]
fn transformed_tree_reemits_wrapper_only_when_present() {
    let v = validator();
    v.registry().ensure::<Library>().unwrap();
    let wrapped = v
        .validate(&json!({ "books": [book("1")] }), Library::TYPE_NAME)
        .unwrap();
    assert!(wrapped.to_json().get("books").is_some());

    let bare = v.validate(&json!([book("1")]), Library::TYPE_NAME).unwrap();
    assert!(bare.to_json().is_array());
}

#[test]
fn required_items_rejects_empty_input() {
    let err = validator()
        .validate_and_transform_collection::<Shortlist>(&json!([]))
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::EmptyCollection {
            type_name: "Shortlist".to_owned()
        }
    );
}

#[test]
fn map_input_is_reindexed_for_ordered_collections() {
    let list: Shortlist = validator()
        .validate_and_transform_collection(&json!({ "x": book("1"), "y": book("2") }))
        .unwrap();
    assert_eq!(list.0.get(1).map(|b| b.isbn.as_str()), Some("2"));
}

#[test]
fn keyed_collection_keeps_keys_through_offset_assignment() {
    let data = json!({ "dune": book("1"), "emma": book("2") });
    let catalogue: Catalogue = validator().validate_and_transform_collection(&data).unwrap();
    assert_eq!(catalogue.0.keys().collect::<Vec<_>>(), ["dune", "emma"]);
    assert_eq!(catalogue.json_serialize()["emma"]["isbn"], "2");
}

#[test]
fn keyed_collection_keys_list_input_by_position() {
    let catalogue: Catalogue = validator()
        .validate_and_transform_collection(&json!([book("1"), book("2")]))
        .unwrap();
    assert_eq!(catalogue.0.keys().collect::<Vec<_>>(), ["0", "1"]);
    assert_eq!(catalogue.0["1"].isbn, "2");
    assert_eq!(catalogue.json_serialize()["0"]["isbn"], "1");
}

#[test]
fn collection_without_strategy_cannot_be_built() {
    let err = validator()
        .validate_and_transform_collection::<Shelf>(&json!([book("1")]))
        .err()
        .expect("no strategy configured");
    assert_eq!(err.kind(), ErrorKind::CouldNotAddItemsToCollection);
}

#[test]
fn keyed_data_is_not_appended_without_its_keys() {
    let err = validator()
        .validate_and_transform_collection::<Tally>(&json!({ "dune": book("1") }))
        .err()
        .expect("keys would be dropped");
    assert_eq!(err.kind(), ErrorKind::CouldNotAddItemsToCollection);
}

#[test]
fn bad_item_is_reported_at_its_position() {
    let err = validator()
        .validate_and_transform_collection::<Library>(&json!({ "books": [book("1"), { "isbn": "2" }] }))
        .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidItemType { ref path, .. } if path == "Library[1]"));
    assert_eq!(err.root_cause().missing_fields(), ["title", "genre"]);
}

#[test]
fn round_trip_preserves_collection_encoding() {
    let original = Library(IndexedCollection::from_items([
        Book {
            isbn: "1".to_owned(),
            title: "Dune".to_owned(),
            genre: "FICTION".to_owned(),
            published: NaiveDate::from_ymd_opt(1965, 8, 1),
            shelf: "B2".to_owned(),
            notes: Some("classic".to_owned()),
        },
        Book {
            isbn: "2".to_owned(),
            title: "SPQR".to_owned(),
            genre: "HISTORY".to_owned(),
            published: None,
            shelf: "A1".to_owned(),
            notes: None,
        },
    ]));
    let decoded: Library = validator()
        .validate_and_transform_collection(&original.json_serialize())
        .unwrap();
    assert_eq!(decoded, original);
    assert_eq!(decoded.json_serialize(), original.json_serialize());
}

#[test]
fn transforms_leave_the_receiver_untouched() {
    let library = IndexedCollection::from_items(["a", "bb", "ccc"].map(str::to_owned));
    let before = library.to_array();

    let long = library.filter(|s| s.len() > 1);
    let lengths = library.map(String::len);
    let more = library.with_items(["dddd".to_owned()]);

    assert_eq!(library.to_array(), before);
    assert_eq!(long.len(), 2);
    assert_eq!(lengths.as_slice(), [1, 2, 3]);
    assert_eq!(more.len(), 4);
}

#[test]
fn keyed_transforms_leave_the_receiver_untouched() {
    let shelves: KeyedCollection<i64> = [("a", 1), ("b", 20), ("c", 300)].into_iter().collect();
    let before = shelves.to_array();

    let large = shelves.filter(|_, n| *n >= 20);
    let labels = shelves.map(|key, n| format!("{key}={n}"));
    let merged = shelves.with_items([("b", 2), ("d", 4)]);

    assert_eq!(shelves.to_array(), before);
    assert_eq!(large.keys().collect::<Vec<_>>(), ["b", "c"]);
    assert_eq!(labels["c"], "c=300");
    assert_eq!(merged.json_serialize(), json!({ "a": 1, "b": 2, "c": 300, "d": 4 }));
    assert_eq!(shelves["b"], 20);
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[test]
fn repeated_registration_does_not_change_outcomes() {
    let v = validator();
    let first = v.validate_and_transform::<Book>(&book("1")).unwrap();
    v.registry().register(Book::definition().unwrap()).unwrap();
    v.registry().ensure::<Book>().unwrap();
    let second = v.validate_and_transform::<Book>(&book("1")).unwrap();
    assert_eq!(first, second);
    assert_eq!(v.registry().type_names(), ["Book"]);
}

#[test]
fn collection_registration_pulls_in_item_type() {
    let registry = SchemaRegistry::new();
    registry.ensure::<Library>().unwrap();
    assert!(registry.has_schema("Book"));
}

#[test]
fn unregistered_type_is_undefined() {
    let err = validator().validate(&json!({}), "Nope").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UndefinedItemType);
}

#[test]
#[traced_test]
fn conflicting_registration_is_rejected_and_logged() {
    let registry = SchemaRegistry::new();
    registry.ensure::<Book>().unwrap();
    let err = registry
        .register(Schema::new("Book", vec![]).unwrap())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSchema);
    assert!(logs_contain("rejected conflicting schema registration"));
}

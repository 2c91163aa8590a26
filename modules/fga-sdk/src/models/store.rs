use chrono::{DateTime, Utc};
use fga_schema::{
    ConstructorArgs, Describe, JsonSerialize, Model, PropertyFormat, PropertyType, Schema,
    SchemaDefinition, SchemaProperty, SchemaResult,
};
use serde_json::Value;

use super::wire_object;

/// An FGA store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    id: String,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl Store {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created_at,
            updated_at,
            deleted_at: None,
        }
    }

    #[must_use]
    pub fn with_deleted_at(mut self, deleted_at: DateTime<Utc>) -> Self {
        self.deleted_at = Some(deleted_at);
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Set only for soft-deleted stores.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

impl Describe for Store {
    const TYPE_NAME: &'static str = "Store";

    fn definition() -> SchemaResult<SchemaDefinition> {
        let timestamp =
            |name: &str| SchemaProperty::new(name, PropertyType::String).format(PropertyFormat::DateTime);
        Ok(Schema::new(
            Self::TYPE_NAME,
            vec![
                SchemaProperty::new("id", PropertyType::String).required(),
                SchemaProperty::new("name", PropertyType::String).required(),
                timestamp("created_at").required(),
                timestamp("updated_at").required(),
                timestamp("deleted_at"),
            ],
        )?
        .into())
    }
}

impl JsonSerialize for Store {
    fn json_serialize(&self) -> Value {
        wire_object([
            ("id", self.id.json_serialize()),
            ("name", self.name.json_serialize()),
            ("created_at", self.created_at.json_serialize()),
            ("updated_at", self.updated_at.json_serialize()),
            ("deleted_at", self.deleted_at.json_serialize()),
        ])
    }
}

impl Model for Store {
    fn construct(args: &mut ConstructorArgs) -> SchemaResult<Self> {
        Ok(Self {
            id: args.string("id")?,
            name: args.string("name")?,
            created_at: args.datetime("createdAt")?,
            updated_at: args.datetime("updatedAt")?,
            deleted_at: args.opt_datetime("deletedAt")?,
        })
    }
}

indexed_collection! {
    /// Stores, nested under `"stores"` on the wire.
    Stores of Store, wrapper = "stores"
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn serialization_skips_absent_deletion() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let store = Store::new("s1", "Demo", at, at);
        assert_eq!(
            store.json_serialize(),
            json!({
                "id": "s1",
                "name": "Demo",
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z"
            })
        );
    }

    #[test]
    fn stores_encode_under_wrapper_key() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let stores = Stores::new([Store::new("s1", "Demo", at, at)]);
        let encoded = stores.json_serialize();
        assert_eq!(encoded["stores"][0]["id"], "s1");
        assert_eq!(stores.items_json(), encoded["stores"]);
    }
}

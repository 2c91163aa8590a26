use fga_schema::{
    ConstructorArgs, Describe, ItemsSpec, JsonSerialize, Model, PropertyType, Schema,
    SchemaDefinition, SchemaProperty, SchemaRegistry, SchemaResult,
};
use serde_json::Value;

use super::wire_object;

/// Terminal node of an expansion tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaf {
    users: Vec<String>,
    computed: Option<String>,
}

impl Leaf {
    #[must_use]
    pub fn with_users(users: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            users: users.into_iter().map(Into::into).collect(),
            computed: None,
        }
    }

    /// A leaf that rewrites to another userset.
    #[must_use]
    pub fn computed(userset: impl Into<String>) -> Self {
        Self {
            users: Vec::new(),
            computed: Some(userset.into()),
        }
    }

    #[must_use]
    pub fn user_list(&self) -> &[String] {
        &self.users
    }

    #[must_use]
    pub fn computed_userset(&self) -> Option<&str> {
        self.computed.as_deref()
    }
}

impl Describe for Leaf {
    const TYPE_NAME: &'static str = "Leaf";

    fn definition() -> SchemaResult<SchemaDefinition> {
        Ok(Schema::new(
            Self::TYPE_NAME,
            vec![
                SchemaProperty::array("users", ItemsSpec::of(PropertyType::String)),
                SchemaProperty::new("computed_userset", PropertyType::String)
                    .parameter_name("computed"),
            ],
        )?
        .into())
    }
}

impl JsonSerialize for Leaf {
    fn json_serialize(&self) -> Value {
        let users = if self.users.is_empty() {
            Value::Null
        } else {
            self.users.json_serialize()
        };
        wire_object([
            ("users", users),
            ("computed_userset", self.computed.json_serialize()),
        ])
    }
}

impl Model for Leaf {
    fn construct(args: &mut ConstructorArgs) -> SchemaResult<Self> {
        Ok(Self {
            users: args.strings("users")?,
            computed: args.opt_string("computed")?,
        })
    }
}

/// One node of a userset expansion tree.
///
/// A node is either a [`Leaf`] or a union/intersection of child nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    leaf: Option<Leaf>,
    union: Vec<Node>,
    intersection: Vec<Node>,
}

impl Node {
    #[must_use]
    pub fn leaf(name: impl Into<String>, leaf: Leaf) -> Self {
        Self {
            name: name.into(),
            leaf: Some(leaf),
            union: Vec::new(),
            intersection: Vec::new(),
        }
    }

    #[must_use]
    pub fn union(name: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            name: name.into(),
            leaf: None,
            union: children,
            intersection: Vec::new(),
        }
    }

    #[must_use]
    pub fn intersection(name: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            name: name.into(),
            leaf: None,
            union: Vec::new(),
            intersection: children,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn as_leaf(&self) -> Option<&Leaf> {
        self.leaf.as_ref()
    }

    #[must_use]
    pub fn union_children(&self) -> &[Self] {
        &self.union
    }

    #[must_use]
    pub fn intersection_children(&self) -> &[Self] {
        &self.intersection
    }

    /// Every user named by a leaf anywhere below this node, depth first.
    #[must_use]
    pub fn leaf_users(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_users(&mut out);
        out
    }

    fn collect_users<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(leaf) = &self.leaf {
            out.extend(leaf.users.iter().map(String::as_str));
        }
        for child in self.union.iter().chain(&self.intersection) {
            child.collect_users(out);
        }
    }
}

impl Describe for Node {
    const TYPE_NAME: &'static str = "Node";

    fn definition() -> SchemaResult<SchemaDefinition> {
        Ok(Schema::new(
            Self::TYPE_NAME,
            vec![
                SchemaProperty::new("name", PropertyType::String).required(),
                SchemaProperty::object("leaf", Leaf::TYPE_NAME),
                SchemaProperty::array("union", ItemsSpec::of(PropertyType::SelfRef)),
                SchemaProperty::array("intersection", ItemsSpec::of(PropertyType::SelfRef)),
            ],
        )?
        .into())
    }

    fn register_dependencies(registry: &SchemaRegistry) -> SchemaResult<()> {
        registry.ensure::<Leaf>().map(drop)
    }
}

impl JsonSerialize for Node {
    fn json_serialize(&self) -> Value {
        let children = |nodes: &[Self]| {
            if nodes.is_empty() {
                Value::Null
            } else {
                nodes.json_serialize()
            }
        };
        wire_object([
            ("name", self.name.json_serialize()),
            ("leaf", self.leaf.json_serialize()),
            ("union", children(&self.union)),
            ("intersection", children(&self.intersection)),
        ])
    }
}

impl Model for Node {
    fn construct(args: &mut ConstructorArgs) -> SchemaResult<Self> {
        Ok(Self {
            name: args.string("name")?,
            leaf: args.opt_object("leaf")?,
            union: args.opt_list("union")?.unwrap_or_default(),
            intersection: args.opt_list("intersection")?.unwrap_or_default(),
        })
    }
}

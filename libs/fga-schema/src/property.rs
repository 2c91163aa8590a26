//! Property descriptors: the per-field building blocks of a [`Schema`](crate::Schema).

use std::fmt;

use serde_json::Value;

/// Wire-level type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    Null,
    /// Recursive alias for the type whose schema declares the property.
    SelfRef,
}

impl PropertyType {
    /// Name used in schemas and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Null => "null",
            Self::SelfRef => "self",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String formats that are parsed into native date/time values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyFormat {
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    /// Timestamp, RFC 3339.
    DateTime,
}

impl PropertyFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::DateTime => "datetime",
        }
    }
}

/// Element descriptor of an `array` property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemsSpec {
    pub item_type: PropertyType,
    /// Registered type each element is materialized as.
    pub class_name: Option<String>,
}

impl ItemsSpec {
    /// Elements of a scalar type (or `SelfRef`).
    #[must_use]
    pub const fn of(item_type: PropertyType) -> Self {
        Self {
            item_type,
            class_name: None,
        }
    }

    /// Elements materialized as the registered type `class_name`.
    #[must_use]
    pub fn class(class_name: impl Into<String>) -> Self {
        Self {
            item_type: PropertyType::Object,
            class_name: Some(class_name.into()),
        }
    }
}

/// One declared field of a schema.
///
/// Built with [`SchemaProperty::new`] and refined with the chaining setters:
///
/// ```
/// use fga_schema::{PropertyFormat, PropertyType, SchemaProperty};
///
/// let created = SchemaProperty::new("created_at", PropertyType::String)
///     .required()
///     .format(PropertyFormat::DateTime);
/// assert!(created.required);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaProperty {
    /// Wire field name.
    pub name: String,
    pub property_type: PropertyType,
    pub required: bool,
    pub format: Option<PropertyFormat>,
    /// Accepted string values; `None` means unrestricted.
    pub enum_values: Option<Vec<String>>,
    /// Only meaningful for `array`.
    pub items: Option<ItemsSpec>,
    /// Only meaningful for `object`.
    pub class_name: Option<String>,
    /// Bound when the field is absent and not required.
    pub default: Option<Value>,
    /// Constructor parameter this field binds to when it differs from `name`.
    pub parameter_name: Option<String>,
}

impl SchemaProperty {
    #[must_use]
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type,
            required: false,
            format: None,
            enum_values: None,
            items: None,
            class_name: None,
            default: None,
            parameter_name: None,
        }
    }

    /// Shorthand for an `object` property materialized as `class_name`.
    #[must_use]
    pub fn object(name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self::new(name, PropertyType::Object).class_name(class_name)
    }

    /// Shorthand for an `array` property with the given element descriptor.
    #[must_use]
    pub fn array(name: impl Into<String>, items: ItemsSpec) -> Self {
        Self::new(name, PropertyType::Array).items(items)
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn format(mut self, format: PropertyFormat) -> Self {
        self.format = Some(format);
        self
    }

    #[must_use]
    pub fn enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn items(mut self, items: ItemsSpec) -> Self {
        self.items = Some(items);
        self
    }

    #[must_use]
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    #[must_use]
    pub fn default_value(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub fn parameter_name(mut self, parameter: impl Into<String>) -> Self {
        self.parameter_name = Some(parameter.into());
        self
    }

    /// Name of the constructor parameter this field binds to.
    #[must_use]
    pub fn binding_name(&self) -> &str {
        self.parameter_name.as_deref().unwrap_or(&self.name)
    }

    /// Human-readable expected type, used in mismatch errors.
    #[must_use]
    pub fn expected(&self) -> String {
        match (self.property_type, self.format, self.class_name.as_deref()) {
            (PropertyType::Object, _, Some(class)) => class.to_owned(),
            (_, Some(format), _) => format!("{} ({})", self.property_type, format.as_str()),
            (ty, None, _) => ty.as_str().to_owned(),
        }
    }

    /// Checks the constraints between fields of this descriptor.
    pub(crate) fn check_structure(&self) -> Result<(), String> {
        if self.items.is_some() && self.property_type != PropertyType::Array {
            return Err(format!(
                "property `{}` declares items but is of type {}",
                self.name, self.property_type
            ));
        }
        if self.class_name.is_some() && self.property_type != PropertyType::Object {
            return Err(format!(
                "property `{}` declares a class but is of type {}",
                self.name, self.property_type
            ));
        }
        if let Some(items) = &self.items
            && items.class_name.is_some()
            && items.item_type != PropertyType::Object
        {
            return Err(format!(
                "items of `{}` declare a class but are of type {}",
                self.name, items.item_type
            ));
        }
        if self.format.is_some() && self.property_type != PropertyType::String {
            return Err(format!(
                "property `{}` declares a format but is of type {}",
                self.name, self.property_type
            ));
        }
        Ok(())
    }
}

//! Constructor-argument binding over a validated object.
//!
//! A parameter resolves, in order, to the field that declares it as its
//! alias (`parameter_name`), the field with exactly that name, then the field
//! whose name matches it case-insensitively once both are snake-cased
//! (`createdAt` binds `created_at`). Each field binds at most once.

use chrono::{DateTime, NaiveDate, Utc};
use heck::ToSnakeCase;
use serde_json::Value;

use crate::error::{SchemaError, SchemaResult};
use crate::model::{Model, ModelCollection};
use crate::transformed::{Transformed, TransformedField, TransformedObject};

/// Validated fields waiting to be bound to constructor parameters.
#[derive(Debug)]
pub struct ConstructorArgs {
    type_name: String,
    fields: Vec<TransformedField>,
}

impl ConstructorArgs {
    #[must_use]
    pub fn new(object: TransformedObject) -> Self {
        Self {
            type_name: object.type_name,
            fields: object.fields,
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    fn position(&self, parameter: &str) -> Option<usize> {
        if let Some(i) = self
            .fields
            .iter()
            .position(|f| f.parameter_name.as_deref() == Some(parameter))
        {
            return Some(i);
        }
        if let Some(i) = self.fields.iter().position(|f| f.name == parameter) {
            return Some(i);
        }
        let wanted = parameter.to_snake_case();
        self.fields.iter().position(|f| {
            f.name.to_snake_case().eq_ignore_ascii_case(&wanted)
                || f
                    .parameter_name
                    .as_deref()
                    .is_some_and(|alias| alias.to_snake_case().eq_ignore_ascii_case(&wanted))
        })
    }

    /// Remove and return the value bound to `parameter`, if any.
    ///
    /// A validated `null` counts as unbound.
    pub fn take(&mut self, parameter: &str) -> Option<Transformed> {
        let index = self.position(parameter)?;
        let field = self.fields.remove(index);
        (!field.value.is_null()).then_some(field.value)
    }

    /// Like [`take`](Self::take), but the parameter must bind.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingRequiredConstructorParameter`] when nothing binds.
    pub fn required(&mut self, parameter: &str) -> SchemaResult<Transformed> {
        self.take(parameter)
            .ok_or_else(|| SchemaError::MissingRequiredConstructorParameter {
                type_name: self.type_name.clone(),
                parameter: parameter.to_owned(),
            })
    }

    /// Fields no parameter consumed, in schema order.
    #[must_use]
    pub fn into_remaining(self) -> Vec<(String, Transformed)> {
        self.fields.into_iter().map(|f| (f.name, f.value)).collect()
    }

    fn mismatch(&self, parameter: &str, expected: &str, got: &Transformed) -> SchemaError {
        SchemaError::invalid_type(
            format!("{}.{parameter}", self.type_name),
            expected,
            got.kind_name(),
        )
    }

    fn convert<T>(
        &self,
        parameter: &str,
        value: Option<Transformed>,
        expected: &str,
        extract: impl FnOnce(Transformed) -> Result<T, Transformed>,
    ) -> SchemaResult<Option<T>> {
        match value {
            None => Ok(None),
            Some(v) => extract(v)
                .map(Some)
                .map_err(|got| self.mismatch(parameter, expected, &got)),
        }
    }

    fn require<T>(&self, parameter: &str, value: Option<T>) -> SchemaResult<T> {
        value.ok_or_else(|| SchemaError::MissingRequiredConstructorParameter {
            type_name: self.type_name.clone(),
            parameter: parameter.to_owned(),
        })
    }

    /// # Errors
    ///
    /// Fails when the bound value is not a string.
    pub fn opt_string(&mut self, parameter: &str) -> SchemaResult<Option<String>> {
        let value = self.take(parameter);
        self.convert(parameter, value, "string", |v| match v {
            Transformed::String(s) => Ok(s),
            other => Err(other),
        })
    }

    /// # Errors
    ///
    /// Fails when nothing binds or the value is not a string.
    pub fn string(&mut self, parameter: &str) -> SchemaResult<String> {
        let value = self.opt_string(parameter)?;
        self.require(parameter, value)
    }

    /// Binds `parameter`, falling back to the parameter's own default.
    ///
    /// # Errors
    ///
    /// Fails when the bound value is not a string.
    pub fn string_or(&mut self, parameter: &str, default: &str) -> SchemaResult<String> {
        Ok(self
            .opt_string(parameter)?
            .unwrap_or_else(|| default.to_owned()))
    }

    /// # Errors
    ///
    /// Fails when the bound value is not an integer.
    pub fn opt_integer(&mut self, parameter: &str) -> SchemaResult<Option<i64>> {
        let value = self.take(parameter);
        self.convert(parameter, value, "integer", |v| match v {
            Transformed::Integer(n) => Ok(n),
            other => Err(other),
        })
    }

    /// # Errors
    ///
    /// Fails when nothing binds or the value is not an integer.
    pub fn integer(&mut self, parameter: &str) -> SchemaResult<i64> {
        let value = self.opt_integer(parameter)?;
        self.require(parameter, value)
    }

    /// Integers are widened to `f64`.
    ///
    /// # Errors
    ///
    /// Fails when the bound value is not numeric.
    #[allow(clippy::cast_precision_loss)]
    pub fn opt_number(&mut self, parameter: &str) -> SchemaResult<Option<f64>> {
        let value = self.take(parameter);
        self.convert(parameter, value, "number", |v| match v {
            Transformed::Number(n) => Ok(n),
            Transformed::Integer(n) => Ok(n as f64),
            other => Err(other),
        })
    }

    /// # Errors
    ///
    /// Fails when nothing binds or the value is not numeric.
    pub fn number(&mut self, parameter: &str) -> SchemaResult<f64> {
        let value = self.opt_number(parameter)?;
        self.require(parameter, value)
    }

    /// # Errors
    ///
    /// Fails when the bound value is not a boolean.
    pub fn opt_boolean(&mut self, parameter: &str) -> SchemaResult<Option<bool>> {
        let value = self.take(parameter);
        self.convert(parameter, value, "boolean", |v| match v {
            Transformed::Bool(b) => Ok(b),
            other => Err(other),
        })
    }

    /// # Errors
    ///
    /// Fails when nothing binds or the value is not a boolean.
    pub fn boolean(&mut self, parameter: &str) -> SchemaResult<bool> {
        let value = self.opt_boolean(parameter)?;
        self.require(parameter, value)
    }

    /// # Errors
    ///
    /// Fails when the bound value is not a boolean.
    pub fn boolean_or(&mut self, parameter: &str, default: bool) -> SchemaResult<bool> {
        Ok(self.opt_boolean(parameter)?.unwrap_or(default))
    }

    /// # Errors
    ///
    /// Fails when the bound value is not a parsed date.
    pub fn opt_date(&mut self, parameter: &str) -> SchemaResult<Option<NaiveDate>> {
        let value = self.take(parameter);
        self.convert(parameter, value, "date", |v| match v {
            Transformed::Date(d) => Ok(d),
            other => Err(other),
        })
    }

    /// # Errors
    ///
    /// Fails when nothing binds or the value is not a parsed date.
    pub fn date(&mut self, parameter: &str) -> SchemaResult<NaiveDate> {
        let value = self.opt_date(parameter)?;
        self.require(parameter, value)
    }

    /// # Errors
    ///
    /// Fails when the bound value is not a parsed timestamp.
    pub fn opt_datetime(&mut self, parameter: &str) -> SchemaResult<Option<DateTime<Utc>>> {
        let value = self.take(parameter);
        self.convert(parameter, value, "datetime", |v| match v {
            Transformed::DateTime(dt) => Ok(dt),
            other => Err(other),
        })
    }

    /// # Errors
    ///
    /// Fails when nothing binds or the value is not a parsed timestamp.
    pub fn datetime(&mut self, parameter: &str) -> SchemaResult<DateTime<Utc>> {
        let value = self.opt_datetime(parameter)?;
        self.require(parameter, value)
    }

    /// # Errors
    ///
    /// Fails when the bound value is not an array of strings.
    pub fn opt_strings(&mut self, parameter: &str) -> SchemaResult<Option<Vec<String>>> {
        let Some(value) = self.take(parameter) else {
            return Ok(None);
        };
        let items = match value {
            Transformed::List(items) => items,
            other => return Err(self.mismatch(parameter, "array", &other)),
        };
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Transformed::String(s) => out.push(s),
                other => return Err(self.mismatch(parameter, "string", &other)),
            }
        }
        Ok(Some(out))
    }

    /// Missing arrays bind as empty.
    ///
    /// # Errors
    ///
    /// Fails when the bound value is not an array of strings.
    pub fn strings(&mut self, parameter: &str) -> SchemaResult<Vec<String>> {
        Ok(self.opt_strings(parameter)?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Fails when the bound value does not materialize as `M`.
    pub fn opt_object<M: Model>(&mut self, parameter: &str) -> SchemaResult<Option<M>> {
        self.take(parameter).map(M::from_transformed).transpose()
    }

    /// # Errors
    ///
    /// Fails when nothing binds or the value does not materialize as `M`.
    pub fn object<M: Model>(&mut self, parameter: &str) -> SchemaResult<M> {
        let value = self.opt_object(parameter)?;
        self.require(parameter, value)
    }

    /// # Errors
    ///
    /// Fails when the bound value does not materialize as `C`.
    pub fn opt_collection<C: ModelCollection>(
        &mut self,
        parameter: &str,
    ) -> SchemaResult<Option<C>> {
        self.take(parameter).map(C::from_transformed).transpose()
    }

    /// # Errors
    ///
    /// Fails when nothing binds or the value does not materialize as `C`.
    pub fn collection<C: ModelCollection>(&mut self, parameter: &str) -> SchemaResult<C> {
        let value = self.opt_collection(parameter)?;
        self.require(parameter, value)
    }

    /// An `array` property whose elements are objects of type `M`.
    ///
    /// # Errors
    ///
    /// Fails when the bound value is not an array or an element does not
    /// materialize as `M`.
    pub fn opt_list<M: Model>(&mut self, parameter: &str) -> SchemaResult<Option<Vec<M>>> {
        let Some(value) = self.take(parameter) else {
            return Ok(None);
        };
        let items = match value {
            Transformed::List(items) => items,
            other => return Err(self.mismatch(parameter, "array", &other)),
        };
        items
            .into_iter()
            .map(M::from_transformed)
            .collect::<SchemaResult<Vec<_>>>()
            .map(Some)
    }

    /// Unvalidated structured data.
    pub fn opaque(&mut self, parameter: &str) -> Option<Value> {
        self.take(parameter).map(|v| match v {
            Transformed::Opaque(raw) => raw,
            other => other.to_json(),
        })
    }
}

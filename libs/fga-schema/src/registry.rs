//! Schema registry keyed by target type name.
//!
//! The registry is an explicit object owned by (or shared with) the
//! validator. It starts empty and fills lazily: [`SchemaRegistry::ensure`]
//! builds a type's schema the first time the type is asked for, so
//! concurrent first accesses construct it exactly once.
//!
//! Lazily built schemas are staged until the outermost `ensure` has
//! registered every dependency, then published together. A reader never
//! sees a type whose dependencies are still missing, and a failed
//! dependency leaves nothing behind.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, RwLock};

use crate::error::{SchemaError, SchemaResult};
use crate::model::Describe;
use crate::schema::SchemaDefinition;

/// Schemas built by an `ensure` call that has not returned yet.
#[derive(Debug, Default)]
struct Staging {
    depth: usize,
    schemas: HashMap<String, Arc<SchemaDefinition>>,
}

/// Thread-safe map from type name to schema definition.
#[derive(Debug)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<String, Arc<SchemaDefinition>>>,
    // Reentrant: `register_dependencies` calls back into `ensure` on the same thread.
    staging: ReentrantMutex<RefCell<Staging>>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            schemas: RwLock::new(HashMap::new()),
            staging: ReentrantMutex::new(RefCell::new(Staging::default())),
        }
    }

    /// Register a schema under its target type.
    ///
    /// Registering an equal definition again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ConflictingSchema`] if a different definition is
    /// already registered for the same type.
    pub fn register(&self, definition: impl Into<SchemaDefinition>) -> SchemaResult<()> {
        let definition = definition.into();
        let type_name = definition.target_type().to_owned();
        let mut schemas = self.schemas.write();
        match schemas.get(&type_name) {
            Some(existing) if **existing == definition => Ok(()),
            Some(_) => {
                tracing::warn!(type_name = %type_name, "rejected conflicting schema registration");
                Err(SchemaError::ConflictingSchema { type_name })
            }
            None => {
                tracing::debug!(type_name = %type_name, "registered schema");
                schemas.insert(type_name, Arc::new(definition));
                Ok(())
            }
        }
    }

    /// Returns `true` if a schema is registered for `type_name`.
    #[must_use]
    pub fn has_schema(&self, type_name: &str) -> bool {
        self.schemas.read().contains_key(type_name)
    }

    /// Look up the schema registered for `type_name`.
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<Arc<SchemaDefinition>> {
        self.schemas.read().get(type_name).cloned()
    }

    /// Look up `type_name`, failing when nothing is registered.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UndefinedItemType`] for unknown types.
    pub fn require(&self, type_name: &str) -> SchemaResult<Arc<SchemaDefinition>> {
        self.get(type_name)
            .ok_or_else(|| SchemaError::UndefinedItemType {
                type_name: type_name.to_owned(),
            })
    }

    /// Return the schema for `type_name`, building it with `build` on first access.
    ///
    /// The second element is `true` when this call inserted the schema.
    ///
    /// # Errors
    ///
    /// Propagates errors from `build`.
    pub fn get_or_register_with<F>(
        &self,
        type_name: &str,
        build: F,
    ) -> SchemaResult<(Arc<SchemaDefinition>, bool)>
    where
        F: FnOnce() -> SchemaResult<SchemaDefinition>,
    {
        if let Some(existing) = self.get(type_name) {
            return Ok((existing, false));
        }
        let mut schemas = self.schemas.write();
        if let Some(existing) = schemas.get(type_name) {
            return Ok((Arc::clone(existing), false));
        }
        let definition = Arc::new(checked_target(type_name, build()?)?);
        schemas.insert(type_name.to_owned(), Arc::clone(&definition));
        tracing::debug!(type_name = %type_name, "constructed schema on first access");
        Ok((definition, true))
    }

    /// Make sure `T` and everything it references by name are registered.
    ///
    /// `T` becomes visible only together with its dependencies. When a
    /// dependency fails, nothing staged by the call is kept and a later call
    /// tries again.
    ///
    /// # Errors
    ///
    /// Propagates definition and registration errors of `T` and its dependencies.
    pub fn ensure<T: Describe>(&self) -> SchemaResult<Arc<SchemaDefinition>> {
        if let Some(existing) = self.get(T::TYPE_NAME) {
            return Ok(existing);
        }
        let staging = self.staging.lock();
        if let Some(existing) = self.get(T::TYPE_NAME) {
            return Ok(existing);
        }
        // A cycle back to a type this thread is still staging.
        let staged = staging.borrow().schemas.get(T::TYPE_NAME).cloned();
        if let Some(staged) = staged {
            return Ok(staged);
        }

        let definition = Arc::new(checked_target(T::TYPE_NAME, T::definition()?)?);
        {
            let mut state = staging.borrow_mut();
            state.depth += 1;
            state
                .schemas
                .insert(T::TYPE_NAME.to_owned(), Arc::clone(&definition));
        }

        let dependencies = T::register_dependencies(self);

        let mut state = staging.borrow_mut();
        state.depth -= 1;
        if let Err(err) = dependencies {
            state.schemas.remove(T::TYPE_NAME);
            if state.depth == 0 {
                state.schemas.clear();
            }
            tracing::debug!(type_name = T::TYPE_NAME, error = %err, "discarded staged schema");
            return Err(err);
        }
        if state.depth == 0 {
            let staged = std::mem::take(&mut state.schemas);
            let mut schemas = self.schemas.write();
            for (type_name, staged) in staged {
                tracing::debug!(type_name = %type_name, "constructed schema on first access");
                schemas.entry(type_name).or_insert(staged);
            }
        }
        Ok(definition)
    }

    /// Number of registered schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.read().is_empty()
    }

    /// Registered type names, sorted.
    #[must_use]
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.read().keys().cloned().collect();
        names.sort();
        names
    }
}

fn checked_target(type_name: &str, definition: SchemaDefinition) -> SchemaResult<SchemaDefinition> {
    if definition.target_type() == type_name {
        return Ok(definition);
    }
    Err(SchemaError::InvalidSchema {
        type_name: type_name.to_owned(),
        reason: format!("definition targets `{}` instead", definition.target_type()),
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::property::{PropertyType, SchemaProperty};
    use crate::schema::{CollectionSchema, Schema};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    struct Item;

    impl Describe for Item {
        const TYPE_NAME: &'static str = "Item";

        fn definition() -> SchemaResult<SchemaDefinition> {
            Ok(Schema::new(
                Self::TYPE_NAME,
                vec![SchemaProperty::new("id", PropertyType::String).required()],
            )?
            .into())
        }
    }

    /// Slow to register its item type, widening the window between building
    /// its own schema and finishing its dependencies.
    struct SlowItems;

    impl Describe for SlowItems {
        const TYPE_NAME: &'static str = "SlowItems";

        fn definition() -> SchemaResult<SchemaDefinition> {
            Ok(CollectionSchema::new(Self::TYPE_NAME, Item::TYPE_NAME).into())
        }

        fn register_dependencies(registry: &SchemaRegistry) -> SchemaResult<()> {
            std::thread::sleep(Duration::from_millis(300));
            registry.ensure::<Item>().map(drop)
        }
    }

    static OWNER_FAILS: AtomicBool = AtomicBool::new(true);

    /// Fails to define itself until `OWNER_FAILS` is cleared.
    struct Owner;

    impl Describe for Owner {
        const TYPE_NAME: &'static str = "Owner";

        fn definition() -> SchemaResult<SchemaDefinition> {
            if OWNER_FAILS.load(Ordering::SeqCst) {
                return Err(SchemaError::InvalidSchema {
                    type_name: Self::TYPE_NAME.to_owned(),
                    reason: "not ready".to_owned(),
                });
            }
            Ok(Schema::new(Self::TYPE_NAME, vec![])?.into())
        }
    }

    struct Folder;

    impl Describe for Folder {
        const TYPE_NAME: &'static str = "Folder";

        fn definition() -> SchemaResult<SchemaDefinition> {
            Ok(Schema::new(
                Self::TYPE_NAME,
                vec![
                    SchemaProperty::object("item", Item::TYPE_NAME),
                    SchemaProperty::object("owner", Owner::TYPE_NAME),
                ],
            )?
            .into())
        }

        fn register_dependencies(registry: &SchemaRegistry) -> SchemaResult<()> {
            registry.ensure::<Item>()?;
            registry.ensure::<Owner>().map(drop)
        }
    }

    fn store_schema() -> Schema {
        Schema::new(
            "Store",
            vec![SchemaProperty::new("id", PropertyType::String).required()],
        )
        .unwrap()
    }

    #[test]
    fn equal_registration_is_idempotent() {
        let registry = SchemaRegistry::new();
        registry.register(store_schema()).unwrap();
        registry.register(store_schema()).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.has_schema("Store"));
    }

    #[test]
    fn conflicting_registration_is_rejected() {
        let registry = SchemaRegistry::new();
        registry.register(store_schema()).unwrap();
        let other = Schema::new("Store", vec![]).unwrap();
        let err = registry.register(other).unwrap_err();
        assert_eq!(
            err,
            SchemaError::ConflictingSchema {
                type_name: "Store".to_owned()
            }
        );
        assert_eq!(
            registry.get("Store").unwrap().as_object().unwrap().properties().len(),
            1
        );
    }

    #[test]
    fn lazy_construction_runs_once() {
        let registry = SchemaRegistry::new();
        let builds = AtomicUsize::new(0);
        for _ in 0..3 {
            let (_, _) = registry
                .get_or_register_with("Stores", || {
                    builds.fetch_add(1, Ordering::SeqCst);
                    Ok(CollectionSchema::new("Stores", "Store").into())
                })
                .unwrap();
        }
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_first_access_constructs_once() {
        let registry = Arc::new(SchemaRegistry::new());
        let builds = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let builds = Arc::clone(&builds);
                std::thread::spawn(move || {
                    registry
                        .get_or_register_with("Store", || {
                            builds.fetch_add(1, Ordering::SeqCst);
                            Ok(store_schema().into())
                        })
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_first_access_sees_collection_with_its_item_type() {
        let registry = Arc::new(SchemaRegistry::new());
        let first = {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || registry.ensure::<SlowItems>().map(drop))
        };
        std::thread::sleep(Duration::from_millis(100));

        registry.ensure::<SlowItems>().unwrap();
        assert!(registry.has_schema("Item"));

        first.join().unwrap().unwrap();
        assert_eq!(registry.type_names(), ["Item", "SlowItems"]);
    }

    #[test]
    fn failed_dependency_leaves_nothing_registered_and_retries() {
        let registry = SchemaRegistry::new();
        let err = registry.ensure::<Folder>().unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidSchema);
        assert!(registry.is_empty());

        OWNER_FAILS.store(false, Ordering::SeqCst);
        registry.ensure::<Folder>().unwrap();
        assert_eq!(registry.type_names(), ["Folder", "Item", "Owner"]);
    }

    #[test]
    fn require_reports_undefined_type() {
        let registry = SchemaRegistry::new();
        let err = registry.require("Missing").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::UndefinedItemType);
    }
}

//! Lifecycle synchronization.
//!
//! Before an entity is inserted or updated, every search vector it declares
//! is recomputed from its sources and written into the target property:
//!
//! 1. Each source is read through [`Searchable::field_value`], in order.
//! 2. Sources the entity does not provide, and null values, are skipped.
//! 3. Lists are flattened with single spaces.
//! 4. The remaining strings are joined with single spaces.
//!
//! The mapping's language and weight are copied into the value unchanged.
//!
//! ```rust
//! # use ftsync_core::*;
//! # #[derive(Default)]
//! # struct Post { title: String, tags: Vec<String>, search: Option<SearchVectorValue> }
//! # impl Searchable for Post {
//! #     fn schema() -> EntitySchema {
//! #         EntitySchema::builder("Post")
//! #             .column("title", ColumnType::String, false)
//! #             .column("tags", ColumnType::SimpleArray, false)
//! #             .search_vector(
//! #                 TsVectorDeclaration::builder("search").fields(["title", "tags"]).build(),
//! #             )
//! #             .build()
//! #     }
//! #     fn field_value(&self, name: &str) -> Option<FieldValue> {
//! #         match name {
//! #             "title" => Some(self.title.as_str().into()),
//! #             "tags" => Some(self.tags.clone().into()),
//! #             _ => None,
//! #         }
//! #     }
//! #     fn set_search_vector(&mut self, _: &str, value: SearchVectorValue) {
//! #         self.search = Some(value);
//! #     }
//! # }
//! let mut posts = vec![Post {
//!     title: "hello".into(),
//!     tags: vec!["x".into(), "y".into()],
//!     ..Default::default()
//! }];
//!
//! let mut sync = Synchronizer::new();
//! sync.pre_insert(&mut posts)?;
//! assert_eq!(posts[0].search.as_ref().unwrap().text, "hello x y");
//! # Ok::<(), ftsync_core::Error>(())
//! ```

use std::fmt;

use crate::entity::Searchable;
use crate::error::Result;
use crate::metadata::{MetadataRegistry, SearchVectorMapping};
use crate::value::SearchVectorValue;

/// Point in the write cycle at which vectors are recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Before a new entity is inserted.
    PreInsert,
    /// Before an existing entity is updated.
    PreUpdate,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreInsert => write!(f, "pre-insert"),
            Self::PreUpdate => write!(f, "pre-update"),
        }
    }
}

/// Compute the value of one mapping for one entity.
pub fn compute_search_vector<E: Searchable + ?Sized>(
    mapping: &SearchVectorMapping,
    entity: &E,
) -> SearchVectorValue {
    let parts: Vec<String> = mapping
        .sources
        .iter()
        .filter_map(|source| entity.field_value(source))
        .filter_map(|value| value.into_text())
        .collect();

    SearchVectorValue {
        text: parts.join(" "),
        language: mapping.language.clone(),
        weight: mapping.weight,
    }
}

/// Recomputes search vectors on pending entities.
#[derive(Debug, Clone, Default)]
pub struct Synchronizer {
    registry: MetadataRegistry,
}

impl Synchronizer {
    /// Create a synchronizer with an empty metadata cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a synchronizer over an existing registry.
    pub fn with_registry(registry: MetadataRegistry) -> Self {
        Self { registry }
    }

    /// The metadata cache.
    pub fn registry(&self) -> &MetadataRegistry {
        &self.registry
    }

    /// Recompute vectors on entities about to be inserted.
    pub fn pre_insert<E: Searchable>(&mut self, entities: &mut [E]) -> Result<usize> {
        self.synchronize(LifecycleEvent::PreInsert, entities)
    }

    /// Recompute vectors on entities about to be updated.
    pub fn pre_update<E: Searchable>(&mut self, entities: &mut [E]) -> Result<usize> {
        self.synchronize(LifecycleEvent::PreUpdate, entities)
    }

    /// Recompute every declared vector on every entity.
    ///
    /// Returns the number of values written. Fails only if the entity's
    /// metadata does not load.
    pub fn synchronize<E: Searchable>(
        &mut self,
        event: LifecycleEvent,
        entities: &mut [E],
    ) -> Result<usize> {
        if entities.is_empty() {
            return Ok(0);
        }

        let schema = E::schema();
        let metadata = self.registry.get_or_load(&schema)?;
        let mut written = 0;

        for entity in entities.iter_mut() {
            for mapping in &metadata.mappings {
                let value = compute_search_vector(mapping, &*entity);
                log::trace!(
                    "{event}: {}::{} <- {:?}",
                    metadata.entity,
                    mapping.field_name,
                    value.text
                );
                entity.set_search_vector(&mapping.field_name, value);
                written += 1;
            }
        }

        log::debug!(
            "{event}: wrote {written} search vector(s) across {} {} entit{}",
            entities.len(),
            metadata.entity,
            if entities.len() == 1 { "y" } else { "ies" }
        );
        Ok(written)
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Pending writes.
//!
//! [`UnitOfWork`] collects entities scheduled for insertion or update and,
//! when the application is ready to write, runs the synchronizer over both
//! groups before handing them over as a [`FlushPlan`].

use crate::entity::Searchable;
use crate::error::Result;
use crate::sync::Synchronizer;

/// Entities with up-to-date search vectors, ready to be written.
#[derive(Debug)]
pub struct FlushPlan<E> {
    /// Entities to insert.
    pub insertions: Vec<E>,
    /// Entities to update.
    pub updates: Vec<E>,
    /// Number of search-vector values written during preparation.
    pub vectors_written: usize,
}

impl<E> FlushPlan<E> {
    /// True when there is nothing to write.
    pub fn is_empty(&self) -> bool {
        self.insertions.is_empty() && self.updates.is_empty()
    }
}

/// Entities scheduled for the next write.
#[derive(Debug)]
pub struct UnitOfWork<E> {
    insertions: Vec<E>,
    updates: Vec<E>,
}

impl<E> Default for UnitOfWork<E> {
    fn default() -> Self {
        Self {
            insertions: Vec::new(),
            updates: Vec::new(),
        }
    }
}

impl<E: Searchable> UnitOfWork<E> {
    /// Create an empty unit of work.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a new entity for insertion.
    pub fn schedule_insert(&mut self, entity: E) {
        self.insertions.push(entity);
    }

    /// Schedule an existing entity for update.
    pub fn schedule_update(&mut self, entity: E) {
        self.updates.push(entity);
    }

    /// Entities scheduled for insertion.
    pub fn scheduled_insertions(&self) -> &[E] {
        &self.insertions
    }

    /// Entities scheduled for update.
    pub fn scheduled_updates(&self) -> &[E] {
        &self.updates
    }

    /// Recompute search vectors and drain the scheduled entities.
    ///
    /// On error nothing is drained, so the caller can fix the metadata and
    /// retry.
    pub fn prepare_flush(&mut self, sync: &mut Synchronizer) -> Result<FlushPlan<E>> {
        let mut vectors_written = sync.pre_insert(&mut self.insertions)?;
        vectors_written += sync.pre_update(&mut self.updates)?;

        Ok(FlushPlan {
            insertions: std::mem::take(&mut self.insertions),
            updates: std::mem::take(&mut self.updates),
            vectors_written,
        })
    }
}

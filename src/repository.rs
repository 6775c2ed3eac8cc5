// 🗂️ Keyed Repository - Ordered in-memory collection with unique identity
// Shared CRUD core for every manager (accounts, products, employees, departments, users)
//
// - Insertion order is preserved, removal keeps the relative order of the rest
// - Missing lookups return None, missing mutations return NotFound
// - Updates go through a Patch so the identity field can never be rewritten

use crate::error::{ManagerError, Result};
use std::fmt;

// ============================================================================
// ENTITY + PATCH
// ============================================================================

/// A record owned by a repository, identified by a unique id
pub trait Entity: Clone {
    type Id: Copy + PartialEq + fmt::Display + fmt::Debug;

    /// Human-readable kind used in errors and log lines (e.g. "account")
    const KIND: &'static str;

    fn id(&self) -> Self::Id;
}

/// Partial set of field updates for an existing entity
///
/// `apply` is a pure merge: it validates and returns the merged entity,
/// leaving `current` untouched. Fields that are `None` keep their value.
pub trait Patch<T: Entity> {
    fn apply(&self, current: &T) -> Result<T>;
}

// ============================================================================
// KEYED REPOSITORY
// ============================================================================

#[derive(Debug, Clone)]
pub struct KeyedRepository<T: Entity> {
    items: Vec<T>,
}

impl<T: Entity> KeyedRepository<T> {
    pub fn new() -> Self {
        KeyedRepository { items: Vec::new() }
    }

    fn position(&self, id: T::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Append an entity; fails if its id is already taken
    pub fn add(&mut self, entity: T) -> Result<()> {
        if self.contains(entity.id()) {
            return Err(ManagerError::duplicate(T::KIND, entity.id()));
        }
        self.items.push(entity);
        Ok(())
    }

    /// Remove and return the entity with this id
    pub fn remove(&mut self, id: T::Id) -> Result<T> {
        let index = self
            .position(id)
            .ok_or_else(|| ManagerError::not_found(T::KIND, id))?;
        Ok(self.items.remove(index))
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: T::Id) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Like `get_mut` but reports a missing id as NotFound
    pub(crate) fn require_mut(&mut self, id: T::Id) -> Result<&mut T> {
        self.get_mut(id)
            .ok_or_else(|| ManagerError::not_found(T::KIND, id))
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.position(id).is_some()
    }

    /// Snapshot of every entity in storage order
    pub fn list_all(&self) -> Vec<T> {
        self.items.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First entity matching the predicate
    pub fn find<F>(&self, predicate: F) -> Option<&T>
    where
        F: Fn(&T) -> bool,
    {
        self.items.iter().find(|item| predicate(item))
    }

    /// All entities matching the predicate, in storage order
    pub fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.items.iter().filter(|item| predicate(item)).cloned().collect()
    }

    /// Merge a patch into an existing entity and return the stored result
    ///
    /// The patch is validated before anything is written back.
    pub fn update<P>(&mut self, id: T::Id, patch: &P) -> Result<T>
    where
        P: Patch<T>,
    {
        let slot = self.require_mut(id)?;
        let merged = patch.apply(slot)?;
        if merged.id() != id {
            return Err(ManagerError::invalid_field("id", "identity cannot change"));
        }
        *slot = merged.clone();
        Ok(merged)
    }

    /// Reduced-field view of one entity, built from a projection type
    pub fn view<P>(&self, id: T::Id) -> Option<P>
    where
        P: for<'a> From<&'a T>,
    {
        self.get(id).map(P::from)
    }
}

impl<T: Entity> Default for KeyedRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

//! Insertion-ordered, in-memory entity collection.
//!
//! Every registry in the workspace stores its entities in an [`EntityList`].
//! Mutations replace whole entries: callers derive a new value from the current
//! one, and the slot is swapped only after the new value has been accepted, so
//! a rejected update never leaves a half-applied entity behind.

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq)]
pub struct EntityList<T> {
    items: Vec<T>,
}

impl<T> Default for EntityList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> EntityList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.position(id).is_some()
    }

    /// Pure lookup.
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|e| e.id() == id)
    }

    /// Lookup that reports a miss as `DomainError::NotFound`.
    pub fn get_required(&self, id: &T::Id) -> DomainResult<&T> {
        self.get(id).ok_or_else(|| DomainError::not_found(T::KIND, id))
    }

    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|e| predicate(e))
    }

    /// Append a new entity. Duplicate identifiers are a conflict.
    pub fn push(&mut self, entity: T) -> DomainResult<&T> {
        if self.contains(entity.id()) {
            return Err(DomainError::conflict(format!(
                "{} with id {} already exists",
                T::KIND,
                entity.id()
            )));
        }
        self.items.push(entity);
        let last = self.items.len() - 1;
        Ok(&self.items[last])
    }

    /// Replace the entity with `id` by the value `f` derives from it.
    ///
    /// `f` may reject the change; the stored entity is then left untouched.
    /// The derived value must keep the same identifier.
    pub fn replace_with<F>(&mut self, id: &T::Id, f: F) -> DomainResult<&T>
    where
        F: FnOnce(&T) -> DomainResult<T>,
    {
        let idx = self
            .position(id)
            .ok_or_else(|| DomainError::not_found(T::KIND, id))?;

        let next = f(&self.items[idx])?;
        if next.id() != id {
            return Err(DomainError::invariant(format!(
                "{} id cannot change on update ({} -> {})",
                T::KIND,
                id,
                next.id()
            )));
        }

        self.items[idx] = next;
        Ok(&self.items[idx])
    }

    /// Remove and return the entity with `id`.
    pub fn remove(&mut self, id: &T::Id) -> DomainResult<T> {
        let idx = self
            .position(id)
            .ok_or_else(|| DomainError::not_found(T::KIND, id))?;
        Ok(self.items.remove(idx))
    }

    fn position(&self, id: &T::Id) -> Option<usize> {
        self.items.iter().position(|e| e.id() == id)
    }
}

impl<'a, T> IntoIterator for &'a EntityList<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

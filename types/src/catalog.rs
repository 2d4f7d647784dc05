//! The ordered catalog of named, reusable prompts.
//!
//! List order is significant: it is the order prompts are offered for
//! invocation, and it is preserved through persistence and import/export.
//! Ids are unique within a catalog and assigned as `max(existing) + 1`, so a
//! deleted id is never implicitly reused while higher ids remain.

use crate::NonEmptyString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a catalog entry, unique within one catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptId(u64);

impl PromptId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PromptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A named, reusable system instruction.
///
/// Field names match the persisted record (`id`, `name`, `prompt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: PromptId,
    pub name: String,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("prompt name must not be empty")]
    BlankName,
    #[error("prompt text must not be empty")]
    BlankText,
    #[error("no prompt with id {0}")]
    UnknownId(PromptId),
}

/// Ordered list of prompts.
///
/// Serializes transparently as a JSON array, matching the persisted
/// `prompts` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptCatalog {
    prompts: Vec<Prompt>,
}

impl PromptCatalog {
    #[must_use]
    pub fn new(prompts: Vec<Prompt>) -> Self {
        Self { prompts }
    }

    /// Append a new prompt, assigning the next free id.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<PromptId, CatalogError> {
        let name = NonEmptyString::new(name).map_err(|_| CatalogError::BlankName)?;
        let text = NonEmptyString::new(text).map_err(|_| CatalogError::BlankText)?;
        let id = self.next_id();
        self.prompts.push(Prompt {
            id,
            name: name.into_inner(),
            prompt: text.into_inner(),
        });
        Ok(id)
    }

    /// Rename an existing prompt in place.
    pub fn rename(&mut self, id: PromptId, name: impl Into<String>) -> Result<(), CatalogError> {
        let name = NonEmptyString::new(name).map_err(|_| CatalogError::BlankName)?;
        let prompt = self.get_mut(id)?;
        prompt.name = name.into_inner();
        Ok(())
    }

    /// Replace an existing prompt's instruction text in place.
    pub fn edit(&mut self, id: PromptId, text: impl Into<String>) -> Result<(), CatalogError> {
        let text = NonEmptyString::new(text).map_err(|_| CatalogError::BlankText)?;
        let prompt = self.get_mut(id)?;
        prompt.prompt = text.into_inner();
        Ok(())
    }

    /// Remove a prompt by id.
    pub fn remove(&mut self, id: PromptId) -> Result<Prompt, CatalogError> {
        let index = self
            .prompts
            .iter()
            .position(|p| p.id == id)
            .ok_or(CatalogError::UnknownId(id))?;
        Ok(self.prompts.remove(index))
    }

    /// Move a prompt to `new_index`, shifting the others.
    ///
    /// `new_index` past the end is clamped to the last position.
    pub fn reorder(&mut self, id: PromptId, new_index: usize) -> Result<(), CatalogError> {
        let from = self
            .prompts
            .iter()
            .position(|p| p.id == id)
            .ok_or(CatalogError::UnknownId(id))?;
        let prompt = self.prompts.remove(from);
        let to = new_index.min(self.prompts.len());
        self.prompts.insert(to, prompt);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: PromptId) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.id == id)
    }

    /// Case-insensitive exact name lookup.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Prompt> {
        let needle = name.trim();
        self.prompts
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(needle))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prompt> {
        self.prompts.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    fn next_id(&self) -> PromptId {
        let max = self.prompts.iter().map(|p| p.id.get()).max().unwrap_or(0);
        PromptId::new(max + 1)
    }

    fn get_mut(&mut self, id: PromptId) -> Result<&mut Prompt, CatalogError> {
        self.prompts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CatalogError::UnknownId(id))
    }
}

impl<'a> IntoIterator for &'a PromptCatalog {
    type Item = &'a Prompt;
    type IntoIter = std::slice::Iter<'a, Prompt>;

    fn into_iter(self) -> Self::IntoIter {
        self.prompts.iter()
    }
}

//! An in-memory store.
//!
//! Backed by plain vectors so collection order is insertion order, which
//! keeps listings and impact output deterministic. Used by the engine's test
//! suite and useful as a scratch store for embedding callers.

use uuid::Uuid;

use super::{
    GlossaryStore, RequirementFilter, RequirementStore, StakeholderDirectory, StorageError,
};
use crate::domain::{GlossaryTerm, Requirement, RequirementKey, Stakeholder};

/// A store holding every record in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    requirements: Vec<Requirement>,
    stakeholders: Vec<Stakeholder>,
    terms: Vec<GlossaryTerm>,
}

impl InMemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RequirementStore for InMemoryStore {
    fn find_by_key(&self, key: RequirementKey) -> Result<Option<Requirement>, StorageError> {
        Ok(self
            .requirements
            .iter()
            .find(|requirement| requirement.key() == key && !requirement.is_archived())
            .cloned())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Requirement>, StorageError> {
        Ok(self
            .requirements
            .iter()
            .find(|requirement| requirement.id() == id)
            .cloned())
    }

    fn save(&mut self, requirement: Requirement) -> Result<Requirement, StorageError> {
        match self
            .requirements
            .iter_mut()
            .find(|existing| existing.id() == requirement.id())
        {
            Some(existing) => *existing = requirement.clone(),
            None => self.requirements.push(requirement.clone()),
        }
        Ok(requirement)
    }

    fn find_all(&self, filter: RequirementFilter) -> Result<Vec<Requirement>, StorageError> {
        Ok(self
            .requirements
            .iter()
            .filter(|requirement| filter.matches(requirement))
            .cloned()
            .collect())
    }

    fn count_by_source(&self, source: Uuid) -> Result<usize, StorageError> {
        Ok(self
            .requirements
            .iter()
            .filter(|requirement| requirement.source() == source)
            .count())
    }
}

impl StakeholderDirectory for InMemoryStore {
    fn find_stakeholder(&self, id: Uuid) -> Result<Option<Stakeholder>, StorageError> {
        Ok(self
            .stakeholders
            .iter()
            .find(|stakeholder| stakeholder.id() == id)
            .cloned())
    }

    fn find_stakeholder_by_email(&self, email: &str) -> Result<Option<Stakeholder>, StorageError> {
        Ok(self
            .stakeholders
            .iter()
            .find(|stakeholder| stakeholder.email() == email)
            .cloned())
    }

    fn save_stakeholder(&mut self, stakeholder: Stakeholder) -> Result<Stakeholder, StorageError> {
        match self
            .stakeholders
            .iter_mut()
            .find(|existing| existing.id() == stakeholder.id())
        {
            Some(existing) => *existing = stakeholder.clone(),
            None => self.stakeholders.push(stakeholder.clone()),
        }
        Ok(stakeholder)
    }

    fn delete_stakeholder(&mut self, id: Uuid) -> Result<bool, StorageError> {
        let before = self.stakeholders.len();
        self.stakeholders.retain(|stakeholder| stakeholder.id() != id);
        Ok(self.stakeholders.len() != before)
    }

    fn stakeholders(&self) -> Result<Vec<Stakeholder>, StorageError> {
        Ok(self.stakeholders.clone())
    }
}

impl GlossaryStore for InMemoryStore {
    fn find_term(&self, id: Uuid) -> Result<Option<GlossaryTerm>, StorageError> {
        Ok(self.terms.iter().find(|term| term.id() == id).cloned())
    }

    fn find_term_by_name(&self, term: &str) -> Result<Option<GlossaryTerm>, StorageError> {
        Ok(self.terms.iter().find(|entry| entry.term() == term).cloned())
    }

    fn save_term(&mut self, term: GlossaryTerm) -> Result<GlossaryTerm, StorageError> {
        match self
            .terms
            .iter_mut()
            .find(|existing| existing.id() == term.id())
        {
            Some(existing) => *existing = term.clone(),
            None => self.terms.push(term.clone()),
        }
        Ok(term)
    }

    fn delete_term(&mut self, id: Uuid) -> Result<bool, StorageError> {
        let before = self.terms.len();
        self.terms.retain(|term| term.id() != id);
        Ok(self.terms.len() != before)
    }

    fn terms(&self) -> Result<Vec<GlossaryTerm>, StorageError> {
        Ok(self.terms.clone())
    }
}

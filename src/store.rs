//! Boundary contracts between the engine and persisted state.
//!
//! The engine orchestrates against these traits and never defines the storage
//! format; the persisted layout is the store's own business. Two
//! implementations ship with the crate: [`memory::InMemoryStore`] and the
//! YAML-file [`directory::DirectoryStore`].
//!
//! Stores are expected to provide per-entity mutual exclusion externally
//! (single-writer discipline); the engine performs no locking itself.

/// Filesystem-backed store, one YAML document per record.
pub mod directory;
/// In-memory store.
pub mod memory;
mod record;

use uuid::Uuid;

use crate::domain::{GlossaryTerm, Requirement, RequirementKey, Stakeholder, Status};

/// Filter applied to requirement listings.
///
/// The default filter excludes archived records; archived versions are kept
/// for history and traceability, not for day-to-day listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequirementFilter {
    /// Include archived versions in the listing.
    pub include_archived: bool,
    /// Restrict to a single lifecycle status.
    pub status: Option<Status>,
}

impl RequirementFilter {
    /// Everything, archived records included.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            include_archived: true,
            status: None,
        }
    }

    /// Whether the given record passes this filter.
    #[must_use]
    pub fn matches(&self, requirement: &Requirement) -> bool {
        (self.include_archived || !requirement.is_archived())
            && self
                .status
                .is_none_or(|status| requirement.status() == status)
    }
}

/// Errors raised by store implementations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A record could not be encoded or decoded.
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// A persisted requirement collection.
///
/// Records are keyed by internal id; the human-facing key resolves to the
/// active (non-archived) record. There is deliberately no delete operation:
/// requirements are only ever archived.
pub trait RequirementStore {
    /// Resolves a key to its active (non-archived) record.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be read.
    fn find_by_key(&self, key: RequirementKey) -> Result<Option<Requirement>, StorageError>;

    /// Looks up any record, archived included, by internal id.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be read.
    fn find_by_id(&self, id: Uuid) -> Result<Option<Requirement>, StorageError>;

    /// Inserts or replaces a record, keyed by internal id.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the record cannot be persisted.
    fn save(&mut self, requirement: Requirement) -> Result<Requirement, StorageError>;

    /// All records matching the filter, in stable collection order.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be read.
    fn find_all(&self, filter: RequirementFilter) -> Result<Vec<Requirement>, StorageError>;

    /// Number of records (archived included) declaring the given source.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be read.
    fn count_by_source(&self, source: Uuid) -> Result<usize, StorageError>;
}

/// A persisted stakeholder directory.
pub trait StakeholderDirectory {
    /// Looks up a stakeholder by internal id.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be read.
    fn find_stakeholder(&self, id: Uuid) -> Result<Option<Stakeholder>, StorageError>;

    /// Looks up a stakeholder by its unique email.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be read.
    fn find_stakeholder_by_email(&self, email: &str) -> Result<Option<Stakeholder>, StorageError>;

    /// Inserts or replaces a stakeholder, keyed by internal id.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the record cannot be persisted.
    fn save_stakeholder(&mut self, stakeholder: Stakeholder) -> Result<Stakeholder, StorageError>;

    /// Removes a stakeholder. Returns `false` if no such record existed.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the record cannot be removed.
    fn delete_stakeholder(&mut self, id: Uuid) -> Result<bool, StorageError>;

    /// All stakeholders, in stable collection order.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be read.
    fn stakeholders(&self) -> Result<Vec<Stakeholder>, StorageError>;
}

/// A persisted project glossary.
pub trait GlossaryStore {
    /// Looks up a term by internal id.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be read.
    fn find_term(&self, id: Uuid) -> Result<Option<GlossaryTerm>, StorageError>;

    /// Looks up a term by its unique name.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be read.
    fn find_term_by_name(&self, term: &str) -> Result<Option<GlossaryTerm>, StorageError>;

    /// Inserts or replaces a term, keyed by internal id.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the record cannot be persisted.
    fn save_term(&mut self, term: GlossaryTerm) -> Result<GlossaryTerm, StorageError>;

    /// Removes a term. Returns `false` if no such record existed.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the record cannot be removed.
    fn delete_term(&mut self, id: Uuid) -> Result<bool, StorageError>;

    /// All terms, in stable collection order.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be read.
    fn terms(&self) -> Result<Vec<GlossaryTerm>, StorageError>;
}

//! Domain models for requirement management.
//!
//! This module contains the core domain types: requirement records and their
//! validated value types (key, version, status), the collaborator entities
//! (stakeholders, glossary terms), and store configuration.

mod config;
pub use config::Config;

/// Glossary term entity.
pub mod glossary;
pub use glossary::{GlossaryTerm, TermEntry};

/// Requirement key parsing and formatting.
pub mod key;
pub use key::{ParseKeyError, RequirementKey};

/// Requirement record and its payload types.
pub mod requirement;
pub use requirement::{Draft, Priority, Requirement, RequirementType, UpdateFields};

/// Stakeholder entity.
pub mod stakeholder;
pub use stakeholder::{Stakeholder, StakeholderProfile};

/// Lifecycle state machine.
pub mod status;
pub use status::{Status, TransitionError};

/// Version labels.
pub mod version;
pub use version::Version;

//! Requirement quality gating, lifecycle and traceability.
//!
//! Candidate requirements pass through a pluggable rule engine before they
//! are persisted, move through a fixed lifecycle with a versioning side
//! effect on approved records, and form an acyclic dependency graph that
//! answers traceability and impact queries.

pub mod domain;
pub use domain::{
    Config, Draft, GlossaryTerm, Priority, Requirement, RequirementKey, RequirementType,
    Stakeholder, StakeholderProfile, Status, TermEntry, TransitionError, UpdateFields, Version,
};

/// The requirement store facade and its error taxonomy.
pub mod engine;
pub use engine::{Engine, Error};

/// Dependency graph construction and cycle detection.
pub mod graph;
pub use graph::DependencyGraph;

/// Quality rule engine.
pub mod quality;
pub use quality::{Candidate, QualityRule, RuleSet, Violation, ViolationKind};

/// Store boundary traits and the bundled implementations.
pub mod store;
pub use store::{
    directory::DirectoryStore, memory::InMemoryStore, GlossaryStore, RequirementFilter,
    RequirementStore, StakeholderDirectory, StorageError,
};

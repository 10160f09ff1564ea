//! The requirement store facade.
//!
//! [`Engine`] orchestrates the quality rules, the lifecycle state machine and
//! the dependency graph against a persisted collection, and exposes the
//! caller-facing contract consumed by outer API layers. Each operation is
//! atomic with respect to the store, with one documented exception: updating
//! an APPROVED requirement commits the archival of the old version before the
//! spawned version is validated, so a failing validation leaves the key
//! without an active record.
//!
//! The engine is synchronous and performs no internal locking; the owning
//! store is expected to provide per-entity mutual exclusion.

use tracing::instrument;
use uuid::Uuid;

use crate::{
    domain::{
        Draft, GlossaryTerm, Requirement, RequirementKey, Stakeholder, StakeholderProfile, Status,
        TermEntry, TransitionError, UpdateFields,
    },
    graph::DependencyGraph,
    quality::{Candidate, RuleSet, Violation},
    store::{
        GlossaryStore, RequirementFilter, RequirementStore, StakeholderDirectory, StorageError,
    },
};

/// Errors surfaced by engine operations.
///
/// Every variant carries enough structured context to render a remediation
/// message; nothing is retried internally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced requirement does not exist.
    #[error("Requisito não encontrado: {0}")]
    RequirementNotFound(String),

    /// A referenced dependency endpoint does not exist.
    #[error("Dependência não encontrada: {0}")]
    DependencyNotFound(Uuid),

    /// A referenced stakeholder does not exist.
    #[error("Stakeholder não encontrado: {0}")]
    StakeholderNotFound(Uuid),

    /// A referenced glossary term does not exist.
    #[error("Termo não encontrado: {0}")]
    TermNotFound(String),

    /// An active requirement already holds the key.
    #[error("Já existe um requisito ativo com a chave {0}")]
    DuplicateKey(RequirementKey),

    /// A stakeholder already holds the email.
    #[error("Stakeholder com este email já existe: {0}")]
    DuplicateEmail(String),

    /// The glossary already defines the term.
    #[error("Termo já existe no glossário: {0}")]
    DuplicateTerm(String),

    /// The candidate text was rejected by a quality rule.
    #[error(transparent)]
    Quality(#[from] Violation),

    /// The requested status change is not in the legal transition table.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Adding the dependency edge would close a cycle.
    #[error("Dependência circular detectada: {dependent} -> {dependency}")]
    CircularDependency {
        /// Key of the requirement that would depend on the other.
        dependent: RequirementKey,
        /// Key of the requirement that would be depended on.
        dependency: RequirementKey,
    },

    /// The stakeholder still owns requirements and cannot be deleted.
    #[error("Não é possível deletar. Stakeholder tem {count} requisito(s) associado(s).")]
    HasDependents {
        /// Internal id of the stakeholder.
        stakeholder: Uuid,
        /// Number of requirements (archived included) declaring it.
        count: usize,
    },

    /// The underlying store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// An unexpected failure outside the domain taxonomy.
    #[error("Erro interno: {0}")]
    Internal(String),
}

/// The facade through which callers mutate and query requirements.
///
/// Generic over the store so the same orchestration runs against the
/// in-memory store in tests and the directory store in the CLI.
#[derive(Debug)]
pub struct Engine<S> {
    store: S,
    rules: RuleSet,
}

impl<S> Engine<S> {
    /// An engine over `store` with the stock IREB rule set.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            rules: RuleSet::default(),
        }
    }

    /// An engine over `store` with a custom rule set.
    #[must_use]
    pub const fn with_rules(store: S, rules: RuleSet) -> Self {
        Self { store, rules }
    }

    /// Read access to the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the engine, returning the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S: RequirementStore + StakeholderDirectory> Engine<S> {
    /// Validates and commits a new DRAFT requirement.
    ///
    /// # Errors
    ///
    /// [`Error::Quality`] when a rule rejects the draft,
    /// [`Error::StakeholderNotFound`] when the declared source is unknown,
    /// [`Error::DuplicateKey`] when an active requirement already holds the
    /// key.
    #[instrument(skip(self, draft), fields(key = %draft.key))]
    pub fn create(&mut self, draft: Draft) -> Result<Requirement, Error> {
        self.rules.check(&Candidate::from_draft(&draft))?;

        if self.store.find_stakeholder(draft.source)?.is_none() {
            return Err(Error::StakeholderNotFound(draft.source));
        }

        let key: RequirementKey = draft
            .key
            .parse()
            .map_err(|e: crate::domain::ParseKeyError| Error::Internal(e.to_string()))?;

        if self.store.find_by_key(key)?.is_some() {
            return Err(Error::DuplicateKey(key));
        }

        let requirement = Requirement::from_draft(key, draft);
        let saved = self.store.save(requirement)?;
        tracing::info!(key = %saved.key(), "requirement created");
        Ok(saved)
    }

    /// Applies new field values to a requirement.
    ///
    /// For an APPROVED record the update does not mutate in place: the record
    /// is archived and a successor version is spawned with the new fields,
    /// status DRAFT and the version label bumped by 0.1. For any other status
    /// the fields are validated and overwritten in place; version and status
    /// are untouched.
    ///
    /// The archival of the old version commits before the successor is
    /// validated. A validation failure therefore returns an error with the
    /// old record already archived and no active record under the key.
    ///
    /// # Errors
    ///
    /// [`Error::RequirementNotFound`] when the id is unknown,
    /// [`Error::Quality`] when a rule rejects the new field values.
    #[instrument(skip(self, fields))]
    pub fn update(&mut self, id: Uuid, fields: UpdateFields) -> Result<Requirement, Error> {
        let mut existing = self.require(id)?;
        let key = existing.key().to_string();

        if existing.status() == Status::Approved {
            existing.archive();
            self.store.save(existing.clone())?;
            tracing::info!(key = %existing.key(), version = %existing.version(), "approved version archived");

            let mut next = existing.spawn_next_version();
            next.apply(fields);
            self.rules.check(&Candidate {
                key: &key,
                description: next.description(),
                rationale: next.rationale(),
                fit_criterion: next.fit_criterion(),
            })?;

            let saved = self.store.save(next)?;
            tracing::info!(key = %saved.key(), version = %saved.version(), "new version spawned");
            return Ok(saved);
        }

        self.rules.check(&Candidate {
            key: &key,
            description: &fields.description,
            rationale: &fields.rationale,
            fit_criterion: fields.fit_criterion.as_deref(),
        })?;

        existing.apply(fields);
        Ok(self.store.save(existing)?)
    }

    /// Archives a requirement: status forced to DEPRECATED, archived flag
    /// set. Idempotent, and never a physical removal.
    ///
    /// # Errors
    ///
    /// [`Error::RequirementNotFound`] when the id is unknown.
    #[instrument(skip(self))]
    pub fn archive(&mut self, id: Uuid) -> Result<Requirement, Error> {
        let mut requirement = self.require(id)?;
        requirement.archive();
        let saved = self.store.save(requirement)?;
        tracing::info!(key = %saved.key(), "requirement archived");
        Ok(saved)
    }

    /// Moves a requirement to `target` along the legal transition table.
    ///
    /// # Errors
    ///
    /// [`Error::RequirementNotFound`] when the id is unknown,
    /// [`Error::Transition`] when the transition is illegal (the error
    /// carries the legal target set).
    #[instrument(skip(self))]
    pub fn change_status(&mut self, id: Uuid, target: Status) -> Result<Requirement, Error> {
        let mut requirement = self.require(id)?;
        let current = requirement.status();

        if !current.can_transition_to(target) {
            return Err(TransitionError {
                from: current,
                to: target,
                allowed: current.allowed_targets(),
            }
            .into());
        }

        requirement.set_status(target);
        let saved = self.store.save(requirement)?;
        tracing::info!(key = %saved.key(), status = %saved.status(), "status changed");
        Ok(saved)
    }

    /// Looks up a requirement record by internal id.
    ///
    /// # Errors
    ///
    /// [`Error::RequirementNotFound`] when the id is unknown.
    pub fn get(&self, id: Uuid) -> Result<Requirement, Error> {
        self.require(id)
    }

    /// Resolves a key to its active record.
    ///
    /// # Errors
    ///
    /// [`Error::RequirementNotFound`] when no active record holds the key.
    pub fn get_by_key(&self, key: RequirementKey) -> Result<Requirement, Error> {
        self.store
            .find_by_key(key)?
            .ok_or_else(|| Error::RequirementNotFound(key.to_string()))
    }

    /// Lists requirements matching the filter.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::Storage`].
    pub fn list(&self, filter: RequirementFilter) -> Result<Vec<Requirement>, Error> {
        Ok(self.store.find_all(filter)?)
    }

    /// Lists requirements in the given lifecycle state, archived included.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::Storage`].
    pub fn list_by_status(&self, status: Status) -> Result<Vec<Requirement>, Error> {
        self.list(RequirementFilter {
            include_archived: true,
            status: Some(status),
        })
    }

    /// Case-insensitive substring search over description and rationale.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::Storage`].
    pub fn search(&self, keyword: &str) -> Result<Vec<Requirement>, Error> {
        let needle = keyword.to_lowercase();
        let mut matches = self.store.find_all(RequirementFilter::all())?;
        matches.retain(|requirement| {
            requirement.description().to_lowercase().contains(&needle)
                || requirement.rationale().to_lowercase().contains(&needle)
        });
        Ok(matches)
    }

    /// Adds the dependency edge `id → depends_on`.
    ///
    /// The current collection is snapshotted, the graph rebuilt and the edge
    /// rejected when it would close a cycle, self-loops included. Re-adding
    /// an existing edge is a successful no-op.
    ///
    /// # Errors
    ///
    /// [`Error::RequirementNotFound`] / [`Error::DependencyNotFound`] for
    /// unknown endpoints, [`Error::CircularDependency`] when the edge would
    /// close a cycle.
    #[instrument(skip(self))]
    pub fn add_dependency(&mut self, id: Uuid, depends_on: Uuid) -> Result<Requirement, Error> {
        let mut requirement = self.require(id)?;
        let dependency = self
            .store
            .find_by_id(depends_on)?
            .ok_or(Error::DependencyNotFound(depends_on))?;

        if requirement.depends_on().contains(&depends_on) {
            tracing::debug!(key = %requirement.key(), "dependency already present");
            return Ok(requirement);
        }

        let snapshot = self.store.find_all(RequirementFilter::all())?;
        let graph = DependencyGraph::from_requirements(&snapshot);
        if graph.would_create_cycle(id, depends_on) {
            return Err(Error::CircularDependency {
                dependent: requirement.key(),
                dependency: dependency.key(),
            });
        }

        requirement.push_dependency(depends_on);
        let saved = self.store.save(requirement)?;
        tracing::info!(key = %saved.key(), dependency = %dependency.key(), "dependency added");
        Ok(saved)
    }

    /// Removes the dependency edge `id → depends_on`.
    ///
    /// Idempotent: removing an absent edge is a successful no-op.
    ///
    /// # Errors
    ///
    /// [`Error::RequirementNotFound`] / [`Error::DependencyNotFound`] for
    /// unknown endpoints.
    #[instrument(skip(self))]
    pub fn remove_dependency(&mut self, id: Uuid, depends_on: Uuid) -> Result<Requirement, Error> {
        let mut requirement = self.require(id)?;
        if self.store.find_by_id(depends_on)?.is_none() {
            return Err(Error::DependencyNotFound(depends_on));
        }

        if requirement.remove_dependency(depends_on) {
            return Ok(self.store.save(requirement)?);
        }
        Ok(requirement)
    }

    /// Enumerates the direct dependency edges of the active record under
    /// `key`, one line per edge in insertion order.
    ///
    /// # Errors
    ///
    /// [`Error::RequirementNotFound`] when no active record holds the key.
    pub fn traceability(&self, key: RequirementKey) -> Result<Vec<String>, Error> {
        let requirement = self.get_by_key(key)?;

        let mut lines = Vec::with_capacity(requirement.depends_on().len());
        for &dependency in requirement.depends_on() {
            let record = self
                .store
                .find_by_id(dependency)?
                .ok_or_else(|| Error::Internal(format!("dependência órfã: {dependency}")))?;
            lines.push(format!(
                "{} ({}) -> {}",
                requirement.key(),
                requirement.version(),
                record.key()
            ));
        }
        Ok(lines)
    }

    /// Enumerates the requirements whose direct dependency set contains the
    /// active record under `key`: one hop, not transitive. Callers needing
    /// the full blast radius compose this recursively themselves.
    ///
    /// # Errors
    ///
    /// [`Error::RequirementNotFound`] when no active record holds the key.
    pub fn impact_analysis(&self, key: RequirementKey) -> Result<Vec<String>, Error> {
        let target = self.get_by_key(key)?;
        let all = self.store.find_all(RequirementFilter::all())?;

        Ok(all
            .iter()
            .filter(|requirement| requirement.depends_on().contains(&target.id()))
            .map(|requirement| format!("{} depende de {}", requirement.key(), key))
            .collect())
    }

    /// Registers a new stakeholder.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateEmail`] when the email is already held.
    #[instrument(skip(self, profile), fields(email = %profile.email))]
    pub fn register_stakeholder(
        &mut self,
        profile: StakeholderProfile,
    ) -> Result<Stakeholder, Error> {
        if self
            .store
            .find_stakeholder_by_email(&profile.email)?
            .is_some()
        {
            return Err(Error::DuplicateEmail(profile.email));
        }
        Ok(self.store.save_stakeholder(Stakeholder::new(profile))?)
    }

    /// Overwrites a stakeholder's contact fields.
    ///
    /// # Errors
    ///
    /// [`Error::StakeholderNotFound`] when the id is unknown,
    /// [`Error::DuplicateEmail`] when the new email is held by another
    /// stakeholder.
    #[instrument(skip(self, profile))]
    pub fn update_stakeholder(
        &mut self,
        id: Uuid,
        profile: StakeholderProfile,
    ) -> Result<Stakeholder, Error> {
        let mut stakeholder = self
            .store
            .find_stakeholder(id)?
            .ok_or(Error::StakeholderNotFound(id))?;

        if let Some(existing) = self.store.find_stakeholder_by_email(&profile.email)? {
            if existing.id() != id {
                return Err(Error::DuplicateEmail(profile.email));
            }
        }

        stakeholder.apply(profile);
        Ok(self.store.save_stakeholder(stakeholder)?)
    }

    /// Deletes a stakeholder.
    ///
    /// Blocked while any requirement, archived versions included, declares
    /// the stakeholder as its source.
    ///
    /// # Errors
    ///
    /// [`Error::StakeholderNotFound`] when the id is unknown,
    /// [`Error::HasDependents`] when requirements still reference it.
    #[instrument(skip(self))]
    pub fn remove_stakeholder(&mut self, id: Uuid) -> Result<(), Error> {
        if self.store.find_stakeholder(id)?.is_none() {
            return Err(Error::StakeholderNotFound(id));
        }

        let count = self.store.count_by_source(id)?;
        if count > 0 {
            return Err(Error::HasDependents {
                stakeholder: id,
                count,
            });
        }

        self.store.delete_stakeholder(id)?;
        Ok(())
    }

    /// Looks up a stakeholder by internal id.
    ///
    /// # Errors
    ///
    /// [`Error::StakeholderNotFound`] when the id is unknown.
    pub fn stakeholder(&self, id: Uuid) -> Result<Stakeholder, Error> {
        self.store
            .find_stakeholder(id)?
            .ok_or(Error::StakeholderNotFound(id))
    }

    /// Lists every stakeholder.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::Storage`].
    pub fn stakeholders(&self) -> Result<Vec<Stakeholder>, Error> {
        Ok(self.store.stakeholders()?)
    }

    /// Number of requirements, archived included, declaring the stakeholder
    /// as their source. Backs the deletion guard of the stakeholder CRUD
    /// layer.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::Storage`].
    pub fn requirement_count_by_source(&self, source: Uuid) -> Result<usize, Error> {
        Ok(self.store.count_by_source(source)?)
    }

    fn require(&self, id: Uuid) -> Result<Requirement, Error> {
        self.store
            .find_by_id(id)?
            .ok_or_else(|| Error::RequirementNotFound(id.to_string()))
    }
}

impl<S: GlossaryStore> Engine<S> {
    /// Defines a new glossary term.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateTerm`] when the term is already defined.
    #[instrument(skip(self, entry), fields(term = %entry.term))]
    pub fn define_term(&mut self, entry: TermEntry) -> Result<GlossaryTerm, Error> {
        if self.store.find_term_by_name(&entry.term)?.is_some() {
            return Err(Error::DuplicateTerm(entry.term));
        }
        Ok(self.store.save_term(GlossaryTerm::new(entry))?)
    }

    /// Overwrites a glossary term's fields.
    ///
    /// # Errors
    ///
    /// [`Error::TermNotFound`] when the id is unknown,
    /// [`Error::DuplicateTerm`] when the new name is held by another term.
    #[instrument(skip(self, entry))]
    pub fn update_term(&mut self, id: Uuid, entry: TermEntry) -> Result<GlossaryTerm, Error> {
        let mut term = self
            .store
            .find_term(id)?
            .ok_or_else(|| Error::TermNotFound(id.to_string()))?;

        if let Some(existing) = self.store.find_term_by_name(&entry.term)? {
            if existing.id() != id {
                return Err(Error::DuplicateTerm(entry.term));
            }
        }

        term.apply(entry);
        Ok(self.store.save_term(term)?)
    }

    /// Removes a glossary term. Terms carry no traceability history, so
    /// removal is physical.
    ///
    /// # Errors
    ///
    /// [`Error::TermNotFound`] when the id is unknown.
    #[instrument(skip(self))]
    pub fn remove_term(&mut self, id: Uuid) -> Result<(), Error> {
        if !self.store.delete_term(id)? {
            return Err(Error::TermNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Looks up a term by internal id.
    ///
    /// # Errors
    ///
    /// [`Error::TermNotFound`] when the id is unknown.
    pub fn term(&self, id: Uuid) -> Result<GlossaryTerm, Error> {
        self.store
            .find_term(id)?
            .ok_or_else(|| Error::TermNotFound(id.to_string()))
    }

    /// Looks up a term by its unique name.
    ///
    /// # Errors
    ///
    /// [`Error::TermNotFound`] when the name is unknown.
    pub fn term_by_name(&self, name: &str) -> Result<GlossaryTerm, Error> {
        self.store
            .find_term_by_name(name)?
            .ok_or_else(|| Error::TermNotFound(name.to_string()))
    }

    /// Lists every term, sorted case-insensitively by name.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::Storage`].
    pub fn terms(&self) -> Result<Vec<GlossaryTerm>, Error> {
        let mut terms = self.store.terms()?;
        terms.sort_by_key(|term| term.term().to_lowercase());
        Ok(terms)
    }

    /// Case-insensitive substring search over term names and definitions.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::Storage`].
    pub fn search_terms(&self, keyword: &str) -> Result<Vec<GlossaryTerm>, Error> {
        let needle = keyword.to_lowercase();
        let mut terms = self.store.terms()?;
        terms.retain(|term| {
            term.term().to_lowercase().contains(&needle)
                || term.definition().to_lowercase().contains(&needle)
        });
        Ok(terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Priority, RequirementType},
        store::memory::InMemoryStore,
    };

    const DESCRIPTION: &str = "O sistema deve permitir login com email e senha";
    const RATIONALE: &str = "Necessário para controlar o acesso ao sistema";

    fn engine() -> (Engine<InMemoryStore>, Uuid) {
        let mut engine = Engine::new(InMemoryStore::new());
        let stakeholder = engine
            .register_stakeholder(StakeholderProfile::new(
                "Ana",
                "Product Owner",
                "ana@example.com",
            ))
            .unwrap();
        (engine, stakeholder.id())
    }

    fn draft(key: &str, source: Uuid) -> Draft {
        Draft {
            key: key.to_string(),
            description: DESCRIPTION.to_string(),
            rationale: RATIONALE.to_string(),
            fit_criterion: None,
            kind: RequirementType::Functional,
            priority: Priority::Medium,
            source,
        }
    }

    fn fields(description: &str) -> UpdateFields {
        UpdateFields {
            description: description.to_string(),
            rationale: RATIONALE.to_string(),
            fit_criterion: None,
            kind: RequirementType::Functional,
            priority: Priority::Medium,
        }
    }

    fn approve(engine: &mut Engine<InMemoryStore>, id: Uuid) {
        engine.change_status(id, Status::Review).unwrap();
        engine.change_status(id, Status::Approved).unwrap();
    }

    #[test]
    fn create_persists_a_draft_at_v1_0() {
        let (mut engine, source) = engine();
        let requirement = engine.create(draft("REQ-001", source)).unwrap();

        assert_eq!(requirement.key().to_string(), "REQ-001");
        assert_eq!(requirement.status(), Status::Draft);
        assert_eq!(requirement.version().as_str(), "v1.0");
        assert!(!requirement.is_archived());
    }

    #[test]
    fn create_rejects_an_unknown_stakeholder() {
        let (mut engine, _) = engine();
        let error = engine.create(draft("REQ-001", Uuid::new_v4())).unwrap_err();
        assert!(matches!(error, Error::StakeholderNotFound(_)));
    }

    #[test]
    fn create_rejects_a_duplicate_active_key() {
        let (mut engine, source) = engine();
        engine.create(draft("REQ-001", source)).unwrap();

        let error = engine.create(draft("REQ-001", source)).unwrap_err();
        assert!(matches!(error, Error::DuplicateKey(_)));
    }

    #[test]
    fn create_reuses_a_key_once_its_holder_is_archived() {
        let (mut engine, source) = engine();
        let first = engine.create(draft("REQ-001", source)).unwrap();
        engine.archive(first.id()).unwrap();

        engine.create(draft("REQ-001", source)).unwrap();
    }

    #[test]
    fn create_rejects_an_ambiguous_description() {
        let (mut engine, source) = engine();
        let mut bad = draft("REQ-001", source);
        bad.description = "O sistema deve ser rápido".to_string();

        let error = engine.create(bad).unwrap_err();
        let Error::Quality(violation) = error else {
            panic!("expected a quality violation");
        };
        assert_eq!(violation.fragment, "rápido");
    }

    #[test]
    fn create_rejects_a_malformed_key() {
        let (mut engine, source) = engine();
        for key in ["REQ-1", "REQ-0001"] {
            let error = engine.create(draft(key, source)).unwrap_err();
            assert!(matches!(error, Error::Quality(_)), "key {key} must fail");
        }
    }

    #[test]
    fn update_in_place_keeps_version_and_status() {
        let (mut engine, source) = engine();
        let requirement = engine.create(draft("REQ-001", source)).unwrap();

        let updated = engine
            .update(
                requirement.id(),
                fields("O sistema deve registrar o total de acessos"),
            )
            .unwrap();

        assert_eq!(updated.id(), requirement.id());
        assert_eq!(updated.version().as_str(), "v1.0");
        assert_eq!(updated.status(), Status::Draft);
        assert_eq!(
            updated.description(),
            "O sistema deve registrar o total de acessos"
        );
    }

    #[test]
    fn update_in_place_validates_the_new_fields() {
        let (mut engine, source) = engine();
        let requirement = engine.create(draft("REQ-001", source)).unwrap();

        let error = engine
            .update(requirement.id(), fields("O sistema deve ser rápido"))
            .unwrap_err();
        assert!(matches!(error, Error::Quality(_)));

        // Nothing was committed.
        let unchanged = engine.get(requirement.id()).unwrap();
        assert_eq!(unchanged.description(), DESCRIPTION);
    }

    #[test]
    fn updating_an_approved_requirement_spawns_a_version() {
        let (mut engine, source) = engine();
        let original = engine.create(draft("REQ-010", source)).unwrap();
        approve(&mut engine, original.id());

        let spawned = engine
            .update(
                original.id(),
                fields("O sistema deve registrar o total de acessos"),
            )
            .unwrap();

        assert_eq!(spawned.key().to_string(), "REQ-010");
        assert_ne!(spawned.id(), original.id());
        assert_eq!(spawned.version().as_str(), "v1.1");
        assert_eq!(spawned.status(), Status::Draft);
        assert!(!spawned.is_archived());

        let archived = engine.get(original.id()).unwrap();
        assert_eq!(archived.status(), Status::Deprecated);
        assert!(archived.is_archived());

        // The key now resolves to the spawned version.
        let active = engine.get_by_key(original.key()).unwrap();
        assert_eq!(active.id(), spawned.id());
    }

    #[test]
    fn spawned_version_copies_the_dependency_set() {
        let (mut engine, source) = engine();
        let dependency = engine.create(draft("REQ-002", source)).unwrap();
        let original = engine.create(draft("REQ-001", source)).unwrap();
        engine
            .add_dependency(original.id(), dependency.id())
            .unwrap();
        approve(&mut engine, original.id());

        let spawned = engine
            .update(
                original.id(),
                fields("O sistema deve registrar o total de acessos"),
            )
            .unwrap();
        assert_eq!(spawned.depends_on(), &[dependency.id()]);
    }

    #[test]
    fn rejected_spawn_leaves_key_without_active_version() {
        // The documented ordering gap: archival of the approved record
        // commits before the spawned version is validated.
        let (mut engine, source) = engine();
        let original = engine.create(draft("REQ-010", source)).unwrap();
        approve(&mut engine, original.id());

        let error = engine
            .update(original.id(), fields("O sistema deve ser rápido"))
            .unwrap_err();
        assert!(matches!(error, Error::Quality(_)));

        let archived = engine.get(original.id()).unwrap();
        assert!(archived.is_archived());
        assert_eq!(archived.status(), Status::Deprecated);

        assert!(matches!(
            engine.get_by_key(original.key()),
            Err(Error::RequirementNotFound(_))
        ));

        // No successor record was committed.
        assert_eq!(engine.list(RequirementFilter::all()).unwrap().len(), 1);
    }

    #[test]
    fn walking_the_full_lifecycle_succeeds() {
        let (mut engine, source) = engine();
        let requirement = engine.create(draft("REQ-001", source)).unwrap();

        for target in [
            Status::Review,
            Status::Approved,
            Status::Implemented,
            Status::Tested,
            Status::Deprecated,
        ] {
            let moved = engine.change_status(requirement.id(), target).unwrap();
            assert_eq!(moved.status(), target);
        }
    }

    #[test]
    fn illegal_transitions_carry_the_legal_target_set() {
        let (mut engine, source) = engine();
        let requirement = engine.create(draft("REQ-001", source)).unwrap();

        let error = engine
            .change_status(requirement.id(), Status::Approved)
            .unwrap_err();
        let Error::Transition(transition) = error else {
            panic!("expected a transition violation");
        };
        assert_eq!(transition.from, Status::Draft);
        assert_eq!(transition.to, Status::Approved);
        assert_eq!(transition.allowed, &[Status::Review, Status::Rejected]);
    }

    #[test]
    fn archive_is_idempotent_and_never_removes() {
        let (mut engine, source) = engine();
        let requirement = engine.create(draft("REQ-001", source)).unwrap();

        engine.archive(requirement.id()).unwrap();
        let again = engine.archive(requirement.id()).unwrap();
        assert_eq!(again.status(), Status::Deprecated);
        assert!(again.is_archived());

        // Still present in the unfiltered collection.
        assert_eq!(engine.list(RequirementFilter::all()).unwrap().len(), 1);
    }

    #[test]
    fn add_dependency_records_the_edge() {
        let (mut engine, source) = engine();
        let a = engine.create(draft("REQ-001", source)).unwrap();
        let b = engine.create(draft("REQ-002", source)).unwrap();

        let linked = engine.add_dependency(a.id(), b.id()).unwrap();
        assert_eq!(linked.depends_on(), &[b.id()]);
    }

    #[test]
    fn add_dependency_rejects_unknown_endpoints() {
        let (mut engine, source) = engine();
        let a = engine.create(draft("REQ-001", source)).unwrap();

        assert!(matches!(
            engine.add_dependency(Uuid::new_v4(), a.id()),
            Err(Error::RequirementNotFound(_))
        ));
        assert!(matches!(
            engine.add_dependency(a.id(), Uuid::new_v4()),
            Err(Error::DependencyNotFound(_))
        ));
    }

    #[test]
    fn add_dependency_rejects_self_loops() {
        let (mut engine, source) = engine();
        let a = engine.create(draft("REQ-001", source)).unwrap();

        assert!(matches!(
            engine.add_dependency(a.id(), a.id()),
            Err(Error::CircularDependency { .. })
        ));
    }

    #[test]
    fn add_dependency_rejects_a_reverse_edge() {
        let (mut engine, source) = engine();
        let a = engine.create(draft("REQ-001", source)).unwrap();
        let b = engine.create(draft("REQ-002", source)).unwrap();

        engine.add_dependency(a.id(), b.id()).unwrap();
        let error = engine.add_dependency(b.id(), a.id()).unwrap_err();
        let Error::CircularDependency {
            dependent,
            dependency,
        } = error
        else {
            panic!("expected a circular dependency");
        };
        assert_eq!(dependent, b.key());
        assert_eq!(dependency, a.key());
    }

    #[test]
    fn add_dependency_rejects_a_transitive_cycle() {
        let (mut engine, source) = engine();
        let a = engine.create(draft("REQ-001", source)).unwrap();
        let b = engine.create(draft("REQ-002", source)).unwrap();
        let c = engine.create(draft("REQ-003", source)).unwrap();

        engine.add_dependency(a.id(), b.id()).unwrap();
        engine.add_dependency(b.id(), c.id()).unwrap();

        assert!(matches!(
            engine.add_dependency(c.id(), a.id()),
            Err(Error::CircularDependency { .. })
        ));
    }

    #[test]
    fn add_dependency_is_idempotent() {
        let (mut engine, source) = engine();
        let a = engine.create(draft("REQ-001", source)).unwrap();
        let b = engine.create(draft("REQ-002", source)).unwrap();

        engine.add_dependency(a.id(), b.id()).unwrap();
        let again = engine.add_dependency(a.id(), b.id()).unwrap();
        assert_eq!(again.depends_on().len(), 1);
    }

    #[test]
    fn shared_sub_dependencies_are_not_cycles() {
        let (mut engine, source) = engine();
        let a = engine.create(draft("REQ-001", source)).unwrap();
        let b = engine.create(draft("REQ-002", source)).unwrap();
        let c = engine.create(draft("REQ-003", source)).unwrap();
        let d = engine.create(draft("REQ-004", source)).unwrap();

        engine.add_dependency(a.id(), b.id()).unwrap();
        engine.add_dependency(a.id(), c.id()).unwrap();
        engine.add_dependency(b.id(), d.id()).unwrap();
        engine.add_dependency(c.id(), d.id()).unwrap();

        assert!(matches!(
            engine.add_dependency(d.id(), a.id()),
            Err(Error::CircularDependency { .. })
        ));
    }

    #[test]
    fn remove_dependency_is_idempotent() {
        let (mut engine, source) = engine();
        let a = engine.create(draft("REQ-001", source)).unwrap();
        let b = engine.create(draft("REQ-002", source)).unwrap();

        engine.add_dependency(a.id(), b.id()).unwrap();
        let removed = engine.remove_dependency(a.id(), b.id()).unwrap();
        assert!(removed.depends_on().is_empty());

        // Removing again is a no-op, not an error.
        engine.remove_dependency(a.id(), b.id()).unwrap();

        assert!(matches!(
            engine.remove_dependency(a.id(), Uuid::new_v4()),
            Err(Error::DependencyNotFound(_))
        ));
    }

    #[test]
    fn traceability_lists_direct_edges_in_insertion_order() {
        let (mut engine, source) = engine();
        let a = engine.create(draft("REQ-001", source)).unwrap();
        let b = engine.create(draft("REQ-002", source)).unwrap();
        let c = engine.create(draft("REQ-003", source)).unwrap();

        engine.add_dependency(a.id(), b.id()).unwrap();
        engine.add_dependency(a.id(), c.id()).unwrap();

        let lines = engine.traceability(a.key()).unwrap();
        assert_eq!(
            lines,
            [
                "REQ-001 (v1.0) -> REQ-002",
                "REQ-001 (v1.0) -> REQ-003",
            ]
        );
    }

    #[test]
    fn traceability_rejects_an_unknown_key() {
        let (engine, _) = engine();
        assert!(matches!(
            engine.traceability("REQ-099".parse().unwrap()),
            Err(Error::RequirementNotFound(_))
        ));
    }

    #[test]
    fn impact_analysis_lists_direct_dependents_only() {
        let (mut engine, source) = engine();
        let a = engine.create(draft("REQ-001", source)).unwrap();
        let b = engine.create(draft("REQ-002", source)).unwrap();
        let c = engine.create(draft("REQ-003", source)).unwrap();

        // c → b → a: the impact of a is b alone, one hop.
        engine.add_dependency(b.id(), a.id()).unwrap();
        engine.add_dependency(c.id(), b.id()).unwrap();

        let lines = engine.impact_analysis(a.key()).unwrap();
        assert_eq!(lines, ["REQ-002 depende de REQ-001"]);
    }

    #[test]
    fn impact_analysis_reports_every_direct_dependent() {
        let (mut engine, source) = engine();
        let a = engine.create(draft("REQ-001", source)).unwrap();
        let b = engine.create(draft("REQ-002", source)).unwrap();
        let c = engine.create(draft("REQ-003", source)).unwrap();

        engine.add_dependency(b.id(), a.id()).unwrap();
        engine.add_dependency(c.id(), a.id()).unwrap();

        let lines = engine.impact_analysis(a.key()).unwrap();
        assert_eq!(
            lines,
            ["REQ-002 depende de REQ-001", "REQ-003 depende de REQ-001"]
        );
    }

    #[test]
    fn search_matches_description_and_rationale_case_insensitively() {
        let (mut engine, source) = engine();
        engine.create(draft("REQ-001", source)).unwrap();
        let mut other = draft("REQ-002", source);
        other.description = "O sistema deve exibir o saldo atual da conta".to_string();
        other.rationale = "Clientes precisam conferir o saldo disponível".to_string();
        engine.create(other).unwrap();

        assert_eq!(engine.search("LOGIN").unwrap().len(), 1);
        assert_eq!(engine.search("saldo").unwrap().len(), 1);
        assert_eq!(engine.search("sistema").unwrap().len(), 2);
        assert!(engine.search("inexistente").unwrap().is_empty());
    }

    #[test]
    fn list_by_status_sees_archived_deprecated_records() {
        let (mut engine, source) = engine();
        let requirement = engine.create(draft("REQ-001", source)).unwrap();
        engine.archive(requirement.id()).unwrap();

        assert!(engine.list(RequirementFilter::default()).unwrap().is_empty());
        assert_eq!(engine.list_by_status(Status::Deprecated).unwrap().len(), 1);
    }

    #[test]
    fn stakeholder_emails_are_unique() {
        let (mut engine, _) = engine();
        let error = engine
            .register_stakeholder(StakeholderProfile::new(
                "Outra",
                "Dev",
                "ana@example.com",
            ))
            .unwrap_err();
        assert!(matches!(error, Error::DuplicateEmail(_)));
    }

    #[test]
    fn stakeholder_update_rejects_someone_elses_email() {
        let (mut engine, _) = engine();
        let other = engine
            .register_stakeholder(StakeholderProfile::new("Bia", "Dev", "bia@example.com"))
            .unwrap();

        let error = engine
            .update_stakeholder(
                other.id(),
                StakeholderProfile::new("Bia", "Dev", "ana@example.com"),
            )
            .unwrap_err();
        assert!(matches!(error, Error::DuplicateEmail(_)));

        // Keeping your own email is fine.
        engine
            .update_stakeholder(
                other.id(),
                StakeholderProfile::new("Bia", "Tech Lead", "bia@example.com"),
            )
            .unwrap();
    }

    #[test]
    fn stakeholder_deletion_is_blocked_while_requirements_reference_it() {
        let (mut engine, source) = engine();
        let requirement = engine.create(draft("REQ-001", source)).unwrap();

        let error = engine.remove_stakeholder(source).unwrap_err();
        assert!(matches!(error, Error::HasDependents { count: 1, .. }));

        // Archival does not release the reference; the history still counts.
        engine.archive(requirement.id()).unwrap();
        assert!(matches!(
            engine.remove_stakeholder(source),
            Err(Error::HasDependents { .. })
        ));
        assert_eq!(engine.requirement_count_by_source(source).unwrap(), 1);
    }

    #[test]
    fn stakeholder_deletion_succeeds_without_references() {
        let (mut engine, _) = engine();
        let other = engine
            .register_stakeholder(StakeholderProfile::new("Bia", "Dev", "bia@example.com"))
            .unwrap();
        engine.remove_stakeholder(other.id()).unwrap();
        assert!(matches!(
            engine.stakeholder(other.id()),
            Err(Error::StakeholderNotFound(_))
        ));
    }

    #[test]
    fn glossary_terms_are_unique_by_name() {
        let (mut engine, _) = engine();
        engine
            .define_term(TermEntry::new("Pedido", "Solicitação de compra do cliente"))
            .unwrap();

        let error = engine
            .define_term(TermEntry::new("Pedido", "Outra definição"))
            .unwrap_err();
        assert!(matches!(error, Error::DuplicateTerm(_)));
    }

    #[test]
    fn glossary_listing_is_sorted_case_insensitively() {
        let (mut engine, _) = engine();
        for (term, definition) in [
            ("pedido", "Solicitação de compra"),
            ("Cliente", "Pessoa que compra"),
            ("Estoque", "Itens disponíveis"),
        ] {
            engine.define_term(TermEntry::new(term, definition)).unwrap();
        }

        let names: Vec<_> = engine
            .terms()
            .unwrap()
            .iter()
            .map(|term| term.term().to_string())
            .collect();
        assert_eq!(names, ["Cliente", "Estoque", "pedido"]);
    }

    #[test]
    fn glossary_search_covers_names_and_definitions() {
        let (mut engine, _) = engine();
        engine
            .define_term(TermEntry::new("Pedido", "Solicitação de compra do cliente"))
            .unwrap();
        engine
            .define_term(TermEntry::new("Estoque", "Itens disponíveis"))
            .unwrap();

        assert_eq!(engine.search_terms("COMPRA").unwrap().len(), 1);
        assert_eq!(engine.search_terms("pedido").unwrap().len(), 1);
        assert!(engine.search_terms("inexistente").unwrap().is_empty());
    }

    #[test]
    fn glossary_updates_and_removal() {
        let (mut engine, _) = engine();
        let term = engine
            .define_term(TermEntry::new("Pedido", "Solicitação de compra"))
            .unwrap();

        let updated = engine
            .update_term(term.id(), TermEntry::new("Pedido", "Solicitação de compra do cliente"))
            .unwrap();
        assert_eq!(updated.definition(), "Solicitação de compra do cliente");
        assert_eq!(engine.term(term.id()).unwrap(), updated);
        assert_eq!(engine.term_by_name("Pedido").unwrap().id(), term.id());

        engine.remove_term(term.id()).unwrap();
        assert!(matches!(
            engine.remove_term(term.id()),
            Err(Error::TermNotFound(_))
        ));
    }
}

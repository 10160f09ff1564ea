use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{key::RequirementKey, status::Status, version::Version};

/// The requirement classes distinguished by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequirementType {
    /// Descreve o QUE o sistema deve fazer.
    #[default]
    Functional,
    /// Descreve COMO o sistema deve fazer (desempenho, segurança).
    Quality,
    /// Limitações no desenvolvimento ou no sistema.
    Constraint,
}

impl fmt::Display for RequirementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Functional => "FUNCTIONAL",
            Self::Quality => "QUALITY",
            Self::Constraint => "CONSTRAINT",
        };
        write!(f, "{name}")
    }
}

/// Error returned when a string names no requirement type.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown requirement type '{0}'")]
pub struct ParseTypeError(String);

impl FromStr for RequirementType {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FUNCTIONAL" => Ok(Self::Functional),
            "QUALITY" => Ok(Self::Quality),
            "CONSTRAINT" => Ok(Self::Constraint),
            _ => Err(ParseTypeError(s.to_string())),
        }
    }
}

/// Ordinal requirement priority: 1 (Alta) to 3 (Baixa).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum Priority {
    /// 1 - Alta.
    High,
    /// 2 - Média.
    #[default]
    Medium,
    /// 3 - Baixa.
    Low,
}

impl Priority {
    /// The ordinal value, 1 to 3.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::High => "Alta",
            Self::Medium => "Média",
            Self::Low => "Baixa",
        };
        write!(f, "{label}")
    }
}

/// Error returned for an ordinal outside 1..=3.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid priority {0}: expected an ordinal between 1 and 3")]
pub struct InvalidPriorityError(u8);

impl TryFrom<u8> for Priority {
    type Error = InvalidPriorityError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::High),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Low),
            other => Err(InvalidPriorityError(other)),
        }
    }
}

/// A candidate requirement submitted for creation.
///
/// The key is carried as a raw string: the rule engine owns format checking,
/// so a malformed key is reported as a quality violation rather than rejected
/// at the type level.
#[derive(Debug, Clone)]
pub struct Draft {
    /// Human-facing key, expected to match `REQ-###`.
    pub key: String,
    /// What the system must do or guarantee.
    pub description: String,
    /// Why the requirement exists.
    pub rationale: String,
    /// Optional acceptance criterion; must be testable when present.
    pub fit_criterion: Option<String>,
    /// Requirement class.
    pub kind: RequirementType,
    /// Ordinal priority.
    pub priority: Priority,
    /// Internal id of the stakeholder that declared the requirement.
    pub source: Uuid,
}

/// Field values applied by an update.
///
/// The key and the source are fixed at creation time and cannot be changed by
/// an update; everything else can.
#[derive(Debug, Clone)]
pub struct UpdateFields {
    /// Replacement description.
    pub description: String,
    /// Replacement rationale.
    pub rationale: String,
    /// Replacement fit criterion.
    pub fit_criterion: Option<String>,
    /// Replacement requirement class.
    pub kind: RequirementType,
    /// Replacement priority.
    pub priority: Priority,
}

/// A persisted requirement record.
///
/// One record is one version: updating an APPROVED requirement archives its
/// record and spawns a successor sharing the same [`RequirementKey`] under a
/// fresh internal id. "Deletion" is archival; records are never physically
/// removed, so the dependency history stays traceable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Internal storage identifier, unique per record.
    pub(crate) id: Uuid,
    /// Human-facing key, shared by all versions of a requirement.
    pub(crate) key: RequirementKey,
    pub(crate) description: String,
    pub(crate) rationale: String,
    pub(crate) fit_criterion: Option<String>,
    pub(crate) kind: RequirementType,
    pub(crate) status: Status,
    pub(crate) priority: Priority,
    pub(crate) version: Version,
    pub(crate) archived: bool,
    pub(crate) created: DateTime<Utc>,
    pub(crate) updated: DateTime<Utc>,
    /// Internal id of the declaring stakeholder.
    pub(crate) source: Uuid,
    /// Direct dependencies, by internal id, in insertion order.
    pub(crate) depends_on: Vec<Uuid>,
}

impl Requirement {
    /// Builds a new DRAFT record from an already-validated draft.
    pub(crate) fn from_draft(key: RequirementKey, draft: Draft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            key,
            description: draft.description,
            rationale: draft.rationale,
            fit_criterion: draft.fit_criterion,
            kind: draft.kind,
            status: Status::Draft,
            priority: draft.priority,
            version: Version::initial(),
            archived: false,
            created: now,
            updated: now,
            source: draft.source,
            depends_on: Vec::new(),
        }
    }

    /// Internal storage identifier of this record.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Human-facing key, shared across versions.
    #[must_use]
    pub const fn key(&self) -> RequirementKey {
        self.key
    }

    /// What the system must do or guarantee.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Why the requirement exists.
    #[must_use]
    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    /// The acceptance criterion, when one was supplied.
    #[must_use]
    pub fn fit_criterion(&self) -> Option<&str> {
        self.fit_criterion.as_deref()
    }

    /// Requirement class.
    #[must_use]
    pub const fn kind(&self) -> RequirementType {
        self.kind
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Ordinal priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Version label of this record.
    #[must_use]
    pub const fn version(&self) -> &Version {
        &self.version
    }

    /// Whether this record has been archived.
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.archived
    }

    /// When the record was created.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// When the record was last mutated.
    #[must_use]
    pub const fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    /// Internal id of the declaring stakeholder.
    #[must_use]
    pub const fn source(&self) -> Uuid {
        self.source
    }

    /// Direct dependencies, by internal id, in insertion order.
    #[must_use]
    pub fn depends_on(&self) -> &[Uuid] {
        &self.depends_on
    }

    pub(crate) fn touch(&mut self) {
        self.updated = Utc::now();
    }

    /// Overwrites the mutable fields and touches the updated timestamp.
    pub(crate) fn apply(&mut self, fields: UpdateFields) {
        self.description = fields.description;
        self.rationale = fields.rationale;
        self.fit_criterion = fields.fit_criterion;
        self.kind = fields.kind;
        self.priority = fields.priority;
        self.touch();
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
        self.touch();
    }

    /// Archives the record: status forced to DEPRECATED, archived flag set.
    ///
    /// Idempotent; archiving an archived record changes nothing but the
    /// updated timestamp.
    pub(crate) fn archive(&mut self) {
        self.status = Status::Deprecated;
        self.archived = true;
        self.touch();
    }

    /// Spawns the next version of this record.
    ///
    /// The successor shares the key, copies every field including the
    /// dependency set (by value), resets the status to DRAFT, bumps the
    /// version label by 0.1, and receives a fresh internal id and timestamps.
    pub(crate) fn spawn_next_version(&self) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            key: self.key,
            description: self.description.clone(),
            rationale: self.rationale.clone(),
            fit_criterion: self.fit_criterion.clone(),
            kind: self.kind,
            status: Status::Draft,
            priority: self.priority,
            version: self.version.bump(),
            archived: false,
            created: now,
            updated: now,
            source: self.source,
            depends_on: self.depends_on.clone(),
        }
    }

    /// Appends a dependency edge. Returns `false` if the edge was already
    /// present.
    pub(crate) fn push_dependency(&mut self, dependency: Uuid) -> bool {
        if self.depends_on.contains(&dependency) {
            return false;
        }
        self.depends_on.push(dependency);
        self.touch();
        true
    }

    /// Removes a dependency edge. Returns `false` if no such edge existed.
    pub(crate) fn remove_dependency(&mut self, dependency: Uuid) -> bool {
        let before = self.depends_on.len();
        self.depends_on.retain(|id| *id != dependency);
        if self.depends_on.len() == before {
            return false;
        }
        self.touch();
        true
    }
}

//! On-disk record formats for the directory store.
//!
//! Records are deliberately separate from the domain types: the store owns
//! its persisted layout, and the domain stays serialization-free. Converting
//! a record back into a domain value re-validates every parsed field, so a
//! hand-edited file cannot smuggle an illegal status or key into the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StorageError;
use crate::domain::{GlossaryTerm, Requirement, Stakeholder};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct RequirementRecord {
    pub id: Uuid,
    pub key: String,
    pub description: String,
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit_criterion: Option<String>,
    pub kind: String,
    pub status: String,
    pub priority: u8,
    pub version: String,
    #[serde(default)]
    pub archived: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub source: Uuid,
    #[serde(default)]
    pub depends_on: Vec<Uuid>,
}

impl From<&Requirement> for RequirementRecord {
    fn from(requirement: &Requirement) -> Self {
        Self {
            id: requirement.id,
            key: requirement.key.to_string(),
            description: requirement.description.clone(),
            rationale: requirement.rationale.clone(),
            fit_criterion: requirement.fit_criterion.clone(),
            kind: requirement.kind.to_string(),
            status: requirement.status.to_string(),
            priority: requirement.priority.ordinal(),
            version: requirement.version.to_string(),
            archived: requirement.archived,
            created: requirement.created,
            updated: requirement.updated,
            source: requirement.source,
            depends_on: requirement.depends_on.clone(),
        }
    }
}

impl TryFrom<RequirementRecord> for Requirement {
    type Error = StorageError;

    fn try_from(record: RequirementRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            key: record.key.parse().map_err(malformed)?,
            description: record.description,
            rationale: record.rationale,
            fit_criterion: record.fit_criterion,
            kind: record.kind.parse().map_err(malformed)?,
            status: record.status.parse().map_err(malformed)?,
            priority: record.priority.try_into().map_err(malformed)?,
            version: record.version.parse().map_err(malformed)?,
            archived: record.archived,
            created: record.created,
            updated: record.updated,
            source: record.source,
            depends_on: record.depends_on,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct StakeholderRecord {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub email: String,
    #[serde(default)]
    pub responsibilities: String,
    #[serde(default = "default_influence_level")]
    pub influence_level: String,
}

fn default_influence_level() -> String {
    "Médio".to_string()
}

impl From<&Stakeholder> for StakeholderRecord {
    fn from(stakeholder: &Stakeholder) -> Self {
        Self {
            id: stakeholder.id,
            name: stakeholder.name.clone(),
            role: stakeholder.role.clone(),
            email: stakeholder.email.clone(),
            responsibilities: stakeholder.responsibilities.clone(),
            influence_level: stakeholder.influence_level.clone(),
        }
    }
}

impl From<StakeholderRecord> for Stakeholder {
    fn from(record: StakeholderRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            role: record.role,
            email: record.email,
            responsibilities: record.responsibilities,
            influence_level: record.influence_level,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct GlossaryRecord {
    pub id: Uuid,
    pub term: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acronym: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_terms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_domain: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl From<&GlossaryTerm> for GlossaryRecord {
    fn from(term: &GlossaryTerm) -> Self {
        Self {
            id: term.id,
            term: term.term.clone(),
            definition: term.definition.clone(),
            acronym: term.acronym.clone(),
            related_terms: term.related_terms.clone(),
            business_domain: term.business_domain.clone(),
            created: term.created,
            updated: term.updated,
        }
    }
}

impl From<GlossaryRecord> for GlossaryTerm {
    fn from(record: GlossaryRecord) -> Self {
        Self {
            id: record.id,
            term: record.term,
            definition: record.definition,
            acronym: record.acronym,
            related_terms: record.related_terms,
            business_domain: record.business_domain,
            created: record.created,
            updated: record.updated,
        }
    }
}

fn malformed(error: impl std::fmt::Display) -> StorageError {
    StorageError::Malformed(error.to_string())
}

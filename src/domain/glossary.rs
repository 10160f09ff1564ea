use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The editable fields of a glossary term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermEntry {
    /// The term itself; unique across the glossary.
    pub term: String,
    /// Definition of the term.
    pub definition: String,
    /// Optional acronym.
    pub acronym: Option<String>,
    /// Optional comma-separated related terms.
    pub related_terms: Option<String>,
    /// Optional business domain the term belongs to.
    pub business_domain: Option<String>,
}

impl TermEntry {
    /// An entry with just a term and its definition.
    #[must_use]
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
            acronym: None,
            related_terms: None,
            business_domain: None,
        }
    }
}

/// A project glossary entry.
///
/// The glossary pins down a shared vocabulary for requirement authors. Unlike
/// requirements, terms carry no traceability history and may be removed
/// physically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossaryTerm {
    pub(crate) id: Uuid,
    pub(crate) term: String,
    pub(crate) definition: String,
    pub(crate) acronym: Option<String>,
    pub(crate) related_terms: Option<String>,
    pub(crate) business_domain: Option<String>,
    pub(crate) created: DateTime<Utc>,
    pub(crate) updated: DateTime<Utc>,
}

impl GlossaryTerm {
    /// Builds a new glossary record from an entry.
    pub(crate) fn new(entry: TermEntry) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            term: entry.term,
            definition: entry.definition,
            acronym: entry.acronym,
            related_terms: entry.related_terms,
            business_domain: entry.business_domain,
            created: now,
            updated: now,
        }
    }

    /// Internal identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The term itself.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Definition of the term.
    #[must_use]
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Acronym, when one was supplied.
    #[must_use]
    pub fn acronym(&self) -> Option<&str> {
        self.acronym.as_deref()
    }

    /// Related terms, when supplied.
    #[must_use]
    pub fn related_terms(&self) -> Option<&str> {
        self.related_terms.as_deref()
    }

    /// Business domain, when supplied.
    #[must_use]
    pub fn business_domain(&self) -> Option<&str> {
        self.business_domain.as_deref()
    }

    /// When the term was defined.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// When the term was last edited.
    #[must_use]
    pub const fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    /// Overwrites the editable fields and touches the updated timestamp.
    pub(crate) fn apply(&mut self, entry: TermEntry) {
        self.term = entry.term;
        self.definition = entry.definition;
        self.acronym = entry.acronym;
        self.related_terms = entry.related_terms;
        self.business_domain = entry.business_domain;
        self.updated = Utc::now();
    }
}

//! Quality gating for requirement text.
//!
//! Candidate requirements pass through an ordered set of independent,
//! composable checks before they are committed. Each check either accepts the
//! candidate or raises a [`Violation`] carrying the violation kind, the
//! offending fragment and a remediation suggestion. A violation aborts the
//! whole operation; nothing is partially committed.
//!
//! Rules are purely evaluative and hold no mutable state, so a [`RuleSet`]
//! can be shared behind either a single-threaded or a thread-per-request
//! model.

mod ambiguity;
mod completeness;

use std::fmt;

pub use ambiguity::Ambiguity;
pub use completeness::Completeness;

use crate::domain::{Config, Draft};

/// The text fields of a candidate requirement, as seen by quality rules.
///
/// A borrowed view, so the create and update paths share one contract. The
/// key is raw text: checking its format is the completeness rule's job.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Human-facing key, unvalidated.
    pub key: &'a str,
    /// Requirement description.
    pub description: &'a str,
    /// Justification for the requirement.
    pub rationale: &'a str,
    /// Optional acceptance criterion.
    pub fit_criterion: Option<&'a str>,
}

impl<'a> Candidate<'a> {
    /// View over a creation draft.
    #[must_use]
    pub fn from_draft(draft: &'a Draft) -> Self {
        Self {
            key: &draft.key,
            description: &draft.description,
            rationale: &draft.rationale,
            fit_criterion: draft.fit_criterion.as_deref(),
        }
    }
}

/// The categories of quality violation the stock rules can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// A subjective adjective in the description.
    Subjectivity,
    /// A universal quantifier in the description.
    UniversalQuantifier,
    /// A verb that names no specific action.
    VagueAction,
    /// A noun derived from a verb, hiding the action.
    Nominalization,
    /// A superlative or intensifier.
    Superlative,
    /// The key does not match `REQ-###`.
    IdFormat,
    /// Description shorter than 10 or longer than 2000 characters.
    DescriptionLength,
    /// Rationale absent or shorter than 10 characters once trimmed.
    RationaleIncomplete,
    /// A fit criterion with no actionable marker and no numeric bound.
    FitCriterionNotTestable,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::Subjectivity => "SUBJECTIVITY",
            Self::UniversalQuantifier => "UNIVERSAL_QUANTIFIER",
            Self::VagueAction => "VAGUE_ACTION",
            Self::Nominalization => "NOMINALIZATION",
            Self::Superlative => "SUPERLATIVE",
            Self::IdFormat => "ID_FORMAT",
            Self::DescriptionLength => "DESCRIPTION_LENGTH",
            Self::RationaleIncomplete => "RATIONALE_INCOMPLETE",
            Self::FitCriterionNotTestable => "FIT_CRITERION_NOT_TESTABLE",
        };
        write!(f, "{code}")
    }
}

/// A quality violation raised by a rule.
///
/// Carries enough structured context for the caller to render a remediation
/// message: the finding itself, the offending fragment, and a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} [{kind}]")]
pub struct Violation {
    /// The category that rejected the candidate.
    pub kind: ViolationKind,
    /// Human-readable finding, as rendered to requirement authors.
    pub message: String,
    /// The offending text fragment.
    pub fragment: String,
    /// How to fix the text.
    pub suggestion: String,
}

impl Violation {
    pub(crate) fn new(
        kind: ViolationKind,
        message: impl Into<String>,
        fragment: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            fragment: fragment.into(),
            suggestion: suggestion.into(),
        }
    }
}

/// A single quality check over candidate text.
///
/// Implementations are stateless and purely evaluative. New rule types can be
/// registered on a [`RuleSet`] without modifying callers.
pub trait QualityRule: Send + Sync {
    /// Evaluates the candidate, returning the first violation found.
    ///
    /// # Errors
    ///
    /// Returns the violation that rejected the candidate.
    fn validate(&self, candidate: &Candidate<'_>) -> Result<(), Violation>;

    /// Short rule name.
    fn name(&self) -> &str;

    /// One-line description of what the rule enforces.
    fn description(&self) -> &str;
}

/// An ordered set of quality rules.
///
/// Rules run in registration order and evaluation stops at the first failing
/// rule; the set is not exhaustive per request.
pub struct RuleSet {
    rules: Vec<Box<dyn QualityRule>>,
}

impl RuleSet {
    /// An empty rule set that accepts everything.
    #[must_use]
    pub const fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The stock IREB-derived rule set: ambiguity first, then completeness.
    #[must_use]
    pub fn ireb() -> Self {
        let mut rules = Self::empty();
        rules.register(Box::new(Ambiguity::new()));
        rules.register(Box::new(Completeness));
        rules
    }

    /// The stock rule set with the lexicon extensions from `config` applied.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut rules = Self::empty();
        rules.register(Box::new(Ambiguity::with_extra_subjective_terms(
            config.extra_subjective_terms.clone(),
        )));
        rules.register(Box::new(Completeness));
        rules
    }

    /// Appends a rule to the evaluation order.
    pub fn register(&mut self, rule: Box<dyn QualityRule>) {
        self.rules.push(rule);
    }

    /// Runs every rule in order, stopping at the first violation.
    ///
    /// # Errors
    ///
    /// Returns the first [`Violation`] raised.
    pub fn check(&self, candidate: &Candidate<'_>) -> Result<(), Violation> {
        for rule in &self.rules {
            rule.validate(candidate)?;
        }
        Ok(())
    }

    /// Iterates over the registered rules.
    pub fn rules(&self) -> impl Iterator<Item = &dyn QualityRule> {
        self.rules.iter().map(AsRef::as_ref)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::ireb()
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| rule.name()))
            .finish()
    }
}

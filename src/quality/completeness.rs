//! Completeness checks over a candidate's attributes.
//!
//! Derived from the IREB guidance on requirement attributes: a requirement
//! needs a well-formed key, a bounded description, a justification, and (when
//! supplied) an objectively checkable fit criterion.

use std::sync::LazyLock;

use regex::Regex;

use super::{Candidate, QualityRule, Violation, ViolationKind};

static KEY_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^REQ-\d{3}$").expect("static pattern is valid"));

/// Markers that make a fit criterion actionable.
const TESTABLE_MARKERS: [&str; 4] = ["deve", "pode", "verificar", "validar"];

/// Checks that a candidate carries every attribute a requirement needs.
///
/// Checks run in a fixed order: key format, description length, rationale,
/// fit criterion. The first failing check wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct Completeness;

impl Completeness {
    fn check_key_format(key: &str) -> Result<(), Violation> {
        if KEY_FORMAT.is_match(key) {
            Ok(())
        } else {
            Err(Violation::new(
                ViolationKind::IdFormat,
                "Formato de ID inválido",
                key,
                "Use o formato: REQ-001, REQ-002, etc.",
            ))
        }
    }

    fn check_description_length(description: &str) -> Result<(), Violation> {
        let length = description.chars().count();

        if length < 10 {
            return Err(Violation::new(
                ViolationKind::DescriptionLength,
                "Descrição muito curta",
                description,
                "A descrição deve ter pelo menos 10 caracteres",
            ));
        }

        if length > 2000 {
            return Err(Violation::new(
                ViolationKind::DescriptionLength,
                "Descrição muito longa",
                length.to_string(),
                "Limite a descrição a 2000 caracteres",
            ));
        }

        Ok(())
    }

    fn check_rationale(rationale: &str) -> Result<(), Violation> {
        if rationale.trim().chars().count() < 10 {
            return Err(Violation::new(
                ViolationKind::RationaleIncomplete,
                "Justificativa insuficiente",
                rationale,
                "Explique POR QUE este requisito é necessário (mínimo 10 caracteres)",
            ));
        }
        Ok(())
    }

    fn check_fit_criterion(fit_criterion: Option<&str>) -> Result<(), Violation> {
        let Some(criterion) = fit_criterion else {
            return Ok(());
        };
        if criterion.trim().is_empty() {
            return Ok(());
        }

        let lower = criterion.to_lowercase();
        let is_testable = TESTABLE_MARKERS
            .iter()
            .any(|marker| lower.contains(marker))
            || lower.chars().any(|c| c.is_ascii_digit());

        if is_testable {
            Ok(())
        } else {
            Err(Violation::new(
                ViolationKind::FitCriterionNotTestable,
                "Critério de aceitação não testável",
                criterion,
                "Especifique como validar o requisito. Ex: 'Tempo de resposta < 2 segundos'",
            ))
        }
    }
}

impl QualityRule for Completeness {
    fn validate(&self, candidate: &Candidate<'_>) -> Result<(), Violation> {
        Self::check_key_format(candidate.key)?;
        Self::check_description_length(candidate.description)?;
        Self::check_rationale(candidate.rationale)?;
        Self::check_fit_criterion(candidate.fit_criterion)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "Completeness Checker"
    }

    fn description(&self) -> &str {
        "Verifica se o requisito possui todos os atributos necessários conforme IREB"
    }
}

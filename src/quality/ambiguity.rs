//! Ambiguity detection for natural-language requirement descriptions.
//!
//! Lexical checks derived from the IREB guidance on documenting requirements
//! in natural language: subjective adjectives, universal quantifiers, vague
//! verbs, nominalizations and superlatives all make a requirement hard to
//! verify.

use std::sync::LazyLock;

use regex::Regex;

use super::{Candidate, QualityRule, Violation, ViolationKind};

/// Subjective adjectives, matched as substrings in lexicon order.
const SUBJECTIVE_TERMS: [&str; 15] = [
    "rápido",
    "lento",
    "fácil",
    "difícil",
    "simples",
    "complexo",
    "intuitivo",
    "amigável",
    "bonito",
    "feio",
    "melhor",
    "pior",
    "eficiente",
    "suficiente",
    "adequado",
];

/// Universal quantifiers, matched as whole words in lexicon order.
const UNIVERSAL_QUANTIFIERS: [&str; 6] = ["todos", "sempre", "nunca", "qualquer", "nenhum", "cada"];

/// Verbs that name no specific action, matched as substrings.
const VAGUE_VERBS: [&str; 5] = ["processar", "manipular", "tratar", "gerenciar", "lidar com"];

// One compiled pattern per quantifier. A single alternation would report the
// first match in text order; the contract is first match in lexicon order.
static QUANTIFIER_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    UNIVERSAL_QUANTIFIERS
        .iter()
        .map(|quantifier| {
            let pattern =
                Regex::new(&format!(r"\b{quantifier}\b")).expect("static pattern is valid");
            (*quantifier, pattern)
        })
        .collect()
});

// Nouns derived from verbs, recognised by suffix.
static NOMINALIZATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\w*(ação|amento|imento|ção|são|tura|ência|ância)\b")
        .expect("static pattern is valid")
});

// Suffix-based superlatives plus the muito/pouco intensifiers.
static SUPERLATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\w+(íssimo|érrimo|ílimo|zinho|inho)\b|\b(muito|pouco)\s+\w+\b")
        .expect("static pattern is valid")
});

/// Rejects descriptions containing ambiguous natural language.
///
/// Categories run in a fixed order: subjectivity, universal quantifiers,
/// vague verbs, nominalization, superlatives. The first match of the first
/// failing category wins; the rule is not exhaustive per candidate. Only the
/// description is inspected, case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct Ambiguity {
    extra_subjective_terms: Vec<String>,
}

impl Ambiguity {
    /// An ambiguity rule over the stock lexicons.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Extends the subjective-term lexicon with site-specific words.
    ///
    /// Extra terms are matched after the stock lexicon, lowercased.
    #[must_use]
    pub fn with_extra_subjective_terms(terms: Vec<String>) -> Self {
        Self {
            extra_subjective_terms: terms
                .into_iter()
                .map(|term| term.to_lowercase())
                .collect(),
        }
    }

    fn check_subjective_terms(&self, text: &str) -> Result<(), Violation> {
        let found = SUBJECTIVE_TERMS
            .iter()
            .copied()
            .chain(self.extra_subjective_terms.iter().map(String::as_str))
            .find(|term| text.contains(term));

        found.map_or(Ok(()), |term| {
            Err(Violation::new(
                ViolationKind::Subjectivity,
                format!("Ambiguidade detectada: '{term}'. Esta palavra é subjetiva."),
                term,
                "Substitua por métricas objetivas. Ex: 'rápido' → 'responder em menos de 2 segundos'",
            ))
        })
    }

    fn check_universal_quantifiers(text: &str) -> Result<(), Violation> {
        let found = QUANTIFIER_PATTERNS
            .iter()
            .find(|(_, pattern)| pattern.is_match(text))
            .map(|(quantifier, _)| *quantifier);

        found.map_or(Ok(()), |quantifier| {
            Err(Violation::new(
                ViolationKind::UniversalQuantifier,
                format!(
                    "Quantificador universal detectado: '{quantifier}'. Verifique se realmente não há exceções."
                ),
                quantifier,
                "Considere usar termos como 'na maioria dos casos', 'geralmente', ou especifique exceções",
            ))
        })
    }

    fn check_vague_verbs(text: &str) -> Result<(), Violation> {
        let found = VAGUE_VERBS.iter().copied().find(|verb| text.contains(verb));

        found.map_or(Ok(()), |verb| {
            Err(Violation::new(
                ViolationKind::VagueAction,
                format!("Verbo vago detectado: '{verb}'. Ação não especificada."),
                verb,
                "Especifique a ação exata. Ex: 'processar' → 'validar, calcular e armazenar'",
            ))
        })
    }

    fn check_nominalizations(text: &str) -> Result<(), Violation> {
        NOMINALIZATION.find(text).map_or(Ok(()), |found| {
            let nominalization = found.as_str();
            Err(Violation::new(
                ViolationKind::Nominalization,
                format!("Nominalização detectada: '{nominalization}'. Pode ocultar ações."),
                nominalization,
                "Use a forma verbal. Ex: 'realização do cálculo' → 'o sistema deve calcular'",
            ))
        })
    }

    fn check_superlatives(text: &str) -> Result<(), Violation> {
        SUPERLATIVE.find(text).map_or(Ok(()), |found| {
            let superlative = found.as_str();
            Err(Violation::new(
                ViolationKind::Superlative,
                format!("Superlativo detectado: '{superlative}'. É subjetivo."),
                superlative,
                "Especifique com números ou critérios objetivos",
            ))
        })
    }
}

impl QualityRule for Ambiguity {
    fn validate(&self, candidate: &Candidate<'_>) -> Result<(), Violation> {
        let text = candidate.description.to_lowercase();

        self.check_subjective_terms(&text)?;
        Self::check_universal_quantifiers(&text)?;
        Self::check_vague_verbs(&text)?;
        Self::check_nominalizations(&text)?;
        Self::check_superlatives(&text)?;

        Ok(())
    }

    fn name(&self) -> &str {
        "Ambiguity Checker"
    }

    fn description(&self) -> &str {
        "Verifica ambiguidades em requisitos documentados em linguagem natural conforme IREB"
    }
}

use std::{fmt, str::FromStr};

/// Lifecycle state of a requirement.
///
/// Requirements are created in [`Status::Draft`] and move along a fixed edge
/// set (see [`Status::allowed_targets`]). `REJECTED` and `DEPRECATED` are
/// terminal: no transition leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Requisito em elaboração inicial.
    Draft,
    /// Em análise pelos stakeholders.
    Review,
    /// Validado e pronto para implementação.
    Approved,
    /// Não será implementado.
    Rejected,
    /// Desenvolvido no sistema.
    Implemented,
    /// Validado através de testes.
    Tested,
    /// Substituído por nova versão, ou arquivado.
    Deprecated,
}

impl Status {
    /// Every lifecycle state, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Draft,
        Self::Review,
        Self::Approved,
        Self::Rejected,
        Self::Implemented,
        Self::Tested,
        Self::Deprecated,
    ];

    /// The states this state may legally transition to.
    #[must_use]
    pub const fn allowed_targets(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Review, Self::Rejected],
            Self::Review => &[Self::Approved, Self::Draft],
            Self::Approved => &[Self::Implemented, Self::Deprecated],
            Self::Implemented => &[Self::Tested],
            Self::Tested => &[Self::Deprecated],
            Self::Rejected | Self::Deprecated => &[],
        }
    }

    /// Whether a direct transition to `target` is legal.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.allowed_targets().contains(&target)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Draft => "DRAFT",
            Self::Review => "REVIEW",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Implemented => "IMPLEMENTED",
            Self::Tested => "TESTED",
            Self::Deprecated => "DEPRECATED",
        };
        write!(f, "{name}")
    }
}

/// Error returned when a string names no lifecycle state.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown requirement status '{0}'")]
pub struct ParseStatusError(String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "REVIEW" => Ok(Self::Review),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            "IMPLEMENTED" => Ok(Self::Implemented),
            "TESTED" => Ok(Self::Tested),
            "DEPRECATED" => Ok(Self::Deprecated),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// Error returned when a status change is not in the legal transition table.
///
/// Carries the current state, the requested target, and the set of targets
/// that would have been legal, so the caller can render a remediation
/// message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Transição de status inválida: {from} -> {to}. Status permitidos: {}", allowed_list(.allowed))]
pub struct TransitionError {
    /// The state the requirement is currently in.
    pub from: Status,
    /// The requested target state.
    pub to: Status,
    /// The targets that are legal from `from`.
    pub allowed: &'static [Status],
}

fn allowed_list(allowed: &[Status]) -> String {
    if allowed.is_empty() {
        "Nenhuma transição permitida".to_string()
    } else {
        allowed
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

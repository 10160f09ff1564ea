use uuid::Uuid;

/// Contact and role details for a stakeholder.
///
/// The email address is unique across the directory; registering or updating
/// a stakeholder with an email already held by another record is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeholderProfile {
    /// Display name.
    pub name: String,
    /// Role, e.g. "Product Owner" or "Usuário Final".
    pub role: String,
    /// Unique contact email.
    pub email: String,
    /// Free-text responsibilities.
    pub responsibilities: String,
    /// Influence classification; defaults to "Médio".
    pub influence_level: String,
}

impl StakeholderProfile {
    /// A profile with the given contact fields and default
    /// responsibilities/influence.
    #[must_use]
    pub fn new(name: impl Into<String>, role: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            email: email.into(),
            responsibilities: String::new(),
            influence_level: "Médio".to_string(),
        }
    }
}

/// A source of requirements.
///
/// Stakeholders own zero or more requirements as their declared source. A
/// stakeholder cannot be deleted while any requirement, archived versions
/// included, still names it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stakeholder {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) role: String,
    pub(crate) email: String,
    pub(crate) responsibilities: String,
    pub(crate) influence_level: String,
}

impl Stakeholder {
    /// Builds a new stakeholder record from a profile.
    pub(crate) fn new(profile: StakeholderProfile) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: profile.name,
            role: profile.role,
            email: profile.email,
            responsibilities: profile.responsibilities,
            influence_level: profile.influence_level,
        }
    }

    /// Internal identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Role description.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Unique contact email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Free-text responsibilities.
    #[must_use]
    pub fn responsibilities(&self) -> &str {
        &self.responsibilities
    }

    /// Influence classification.
    #[must_use]
    pub fn influence_level(&self) -> &str {
        &self.influence_level
    }

    /// Overwrites the contact fields from a profile.
    pub(crate) fn apply(&mut self, profile: StakeholderProfile) {
        self.name = profile.name;
        self.role = profile.role;
        self.email = profile.email;
        self.responsibilities = profile.responsibilities;
        self.influence_level = profile.influence_level;
    }
}

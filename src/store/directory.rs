//! A filesystem backed store of requirements.
//!
//! One YAML document per record, laid out under the store root:
//!
//! ```text
//! root/
//!   config.toml                      (optional)
//!   requirements/REQ-001-v1.0.yaml   (one file per version)
//!   stakeholders/<uuid>.yaml
//!   glossary/<uuid>.yaml
//! ```
//!
//! The whole store is loaded into memory on open and written through on every
//! save. Requirement files are never deleted; archival rewrites the record in
//! place.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use nonempty::NonEmpty;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;
use walkdir::WalkDir;

use super::{
    record::{GlossaryRecord, RequirementRecord, StakeholderRecord},
    GlossaryStore, RequirementFilter, RequirementStore, StakeholderDirectory, StorageError,
};
use crate::domain::{Config, GlossaryTerm, Requirement, RequirementKey, Stakeholder};

const CONFIG_FILE: &str = "config.toml";
const REQUIREMENTS_DIR: &str = "requirements";
const STAKEHOLDERS_DIR: &str = "stakeholders";
const GLOSSARY_DIR: &str = "glossary";

/// A directory-backed store.
#[derive(Debug)]
pub struct DirectoryStore {
    root: PathBuf,
    config: Config,
    requirements: Vec<Requirement>,
    stakeholders: Vec<Stakeholder>,
    terms: Vec<GlossaryTerm>,
}

/// Errors that can occur when opening a store directory.
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    /// The directory could not be read or created.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The store contains YAML files that are not parseable records and the
    /// configuration does not allow skipping them.
    #[error("unrecognised files in store: {}", paths_list(.0))]
    UnrecognisedFiles(NonEmpty<PathBuf>),

    /// The store configuration could not be written.
    #[error("invalid store configuration: {0}")]
    Config(String),
}

fn paths_list(paths: &NonEmpty<PathBuf>) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl DirectoryStore {
    /// Creates the directory layout (and a default `config.toml` when absent)
    /// and opens the store.
    ///
    /// # Errors
    ///
    /// Returns an [`OpenError`] if the layout cannot be created or the store
    /// cannot be loaded.
    pub fn init(root: PathBuf) -> Result<Self, OpenError> {
        for dir in [REQUIREMENTS_DIR, STAKEHOLDERS_DIR, GLOSSARY_DIR] {
            std::fs::create_dir_all(root.join(dir))?;
        }

        let config_path = root.join(CONFIG_FILE);
        if !config_path.exists() {
            Config::default()
                .save(&config_path)
                .map_err(OpenError::Config)?;
        }

        Self::open(root)
    }

    /// Opens a store directory and loads every record into memory.
    ///
    /// Behaviour for unparseable YAML files depends on the
    /// `allow_unrecognised` configuration switch: skipped when `true`,
    /// reported as [`OpenError::UnrecognisedFiles`] when `false` (the
    /// default).
    ///
    /// # Errors
    ///
    /// Returns an [`OpenError`] if the directory cannot be read or contains
    /// unrecognised files.
    pub fn open(root: PathBuf) -> Result<Self, OpenError> {
        let config = load_config(&root);

        let (mut requirements, mut unrecognised) =
            load_records::<RequirementRecord, Requirement>(&root.join(REQUIREMENTS_DIR));
        let (mut stakeholders, skipped) =
            load_records::<StakeholderRecord, Stakeholder>(&root.join(STAKEHOLDERS_DIR));
        unrecognised.extend(skipped);
        let (mut terms, skipped) = load_records::<GlossaryRecord, GlossaryTerm>(&root.join(GLOSSARY_DIR));
        unrecognised.extend(skipped);

        if !config.allow_unrecognised {
            if let Some(paths) = NonEmpty::from_vec(unrecognised) {
                return Err(OpenError::UnrecognisedFiles(paths));
            }
        }

        // Stable collection order across reopen.
        requirements.sort_by(|a, b| {
            (a.key(), a.version()).cmp(&(b.key(), b.version()))
        });
        stakeholders.sort_by(|a, b| a.email().cmp(b.email()));
        terms.sort_by(|a, b| a.term().cmp(b.term()));

        Ok(Self {
            root,
            config,
            requirements,
            stakeholders,
            terms,
        })
    }

    /// The configuration loaded from the store root.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The store root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn requirement_path(&self, requirement: &Requirement) -> PathBuf {
        self.root.join(REQUIREMENTS_DIR).join(format!(
            "{}-{}.yaml",
            requirement.key(),
            requirement.version()
        ))
    }

    fn stakeholder_path(&self, id: uuid::Uuid) -> PathBuf {
        self.root.join(STAKEHOLDERS_DIR).join(format!("{id}.yaml"))
    }

    fn term_path(&self, id: uuid::Uuid) -> PathBuf {
        self.root.join(GLOSSARY_DIR).join(format!("{id}.yaml"))
    }
}

fn load_config(root: &Path) -> Config {
    let path = root.join(CONFIG_FILE);
    Config::load(&path).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    })
}

fn collect_yaml_paths(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension() == Some(OsStr::new("yaml")))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn load_records<R, T>(dir: &Path) -> (Vec<T>, Vec<PathBuf>)
where
    R: serde::de::DeserializeOwned,
    T: TryFrom<R> + Send + std::fmt::Debug,
{
    let paths = collect_yaml_paths(dir);

    let (loaded, unrecognised): (Vec<_>, Vec<_>) = paths
        .par_iter()
        .map(|path| try_load_record::<R, T>(path))
        .partition(Result::is_ok);

    (
        loaded.into_iter().map(Result::unwrap).collect(),
        unrecognised.into_iter().map(Result::unwrap_err).collect(),
    )
}

fn try_load_record<R, T>(path: &Path) -> Result<T, PathBuf>
where
    R: serde::de::DeserializeOwned,
    T: TryFrom<R>,
{
    let content = std::fs::read_to_string(path).map_err(|e| {
        tracing::debug!("Failed to read record at {}: {e}", path.display());
        path.to_path_buf()
    })?;

    let record: R = serde_yaml::from_str(&content).map_err(|e| {
        tracing::debug!("Skipping unparseable record at {}: {e}", path.display());
        path.to_path_buf()
    })?;

    T::try_from(record).map_err(|_| {
        tracing::debug!("Skipping invalid record at {}", path.display());
        path.to_path_buf()
    })
}

fn write_yaml<R: Serialize>(path: &Path, record: &R) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content =
        serde_yaml::to_string(record).map_err(|e| StorageError::Malformed(e.to_string()))?;
    std::fs::write(path, content)?;
    Ok(())
}

impl RequirementStore for DirectoryStore {
    fn find_by_key(&self, key: RequirementKey) -> Result<Option<Requirement>, StorageError> {
        Ok(self
            .requirements
            .iter()
            .find(|requirement| requirement.key() == key && !requirement.is_archived())
            .cloned())
    }

    fn find_by_id(&self, id: uuid::Uuid) -> Result<Option<Requirement>, StorageError> {
        Ok(self
            .requirements
            .iter()
            .find(|requirement| requirement.id() == id)
            .cloned())
    }

    fn save(&mut self, requirement: Requirement) -> Result<Requirement, StorageError> {
        write_yaml(
            &self.requirement_path(&requirement),
            &RequirementRecord::from(&requirement),
        )?;

        match self
            .requirements
            .iter_mut()
            .find(|existing| existing.id() == requirement.id())
        {
            Some(existing) => *existing = requirement.clone(),
            None => self.requirements.push(requirement.clone()),
        }
        Ok(requirement)
    }

    fn find_all(&self, filter: RequirementFilter) -> Result<Vec<Requirement>, StorageError> {
        Ok(self
            .requirements
            .iter()
            .filter(|requirement| filter.matches(requirement))
            .cloned()
            .collect())
    }

    fn count_by_source(&self, source: uuid::Uuid) -> Result<usize, StorageError> {
        Ok(self
            .requirements
            .iter()
            .filter(|requirement| requirement.source() == source)
            .count())
    }
}

impl StakeholderDirectory for DirectoryStore {
    fn find_stakeholder(&self, id: uuid::Uuid) -> Result<Option<Stakeholder>, StorageError> {
        Ok(self
            .stakeholders
            .iter()
            .find(|stakeholder| stakeholder.id() == id)
            .cloned())
    }

    fn find_stakeholder_by_email(&self, email: &str) -> Result<Option<Stakeholder>, StorageError> {
        Ok(self
            .stakeholders
            .iter()
            .find(|stakeholder| stakeholder.email() == email)
            .cloned())
    }

    fn save_stakeholder(&mut self, stakeholder: Stakeholder) -> Result<Stakeholder, StorageError> {
        write_yaml(
            &self.stakeholder_path(stakeholder.id()),
            &StakeholderRecord::from(&stakeholder),
        )?;

        match self
            .stakeholders
            .iter_mut()
            .find(|existing| existing.id() == stakeholder.id())
        {
            Some(existing) => *existing = stakeholder.clone(),
            None => self.stakeholders.push(stakeholder.clone()),
        }
        Ok(stakeholder)
    }

    fn delete_stakeholder(&mut self, id: uuid::Uuid) -> Result<bool, StorageError> {
        let before = self.stakeholders.len();
        self.stakeholders.retain(|stakeholder| stakeholder.id() != id);
        if self.stakeholders.len() == before {
            return Ok(false);
        }

        let path = self.stakeholder_path(id);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(true)
    }

    fn stakeholders(&self) -> Result<Vec<Stakeholder>, StorageError> {
        Ok(self.stakeholders.clone())
    }
}

impl GlossaryStore for DirectoryStore {
    fn find_term(&self, id: uuid::Uuid) -> Result<Option<GlossaryTerm>, StorageError> {
        Ok(self.terms.iter().find(|term| term.id() == id).cloned())
    }

    fn find_term_by_name(&self, term: &str) -> Result<Option<GlossaryTerm>, StorageError> {
        Ok(self.terms.iter().find(|entry| entry.term() == term).cloned())
    }

    fn save_term(&mut self, term: GlossaryTerm) -> Result<GlossaryTerm, StorageError> {
        write_yaml(&self.term_path(term.id()), &GlossaryRecord::from(&term))?;

        match self
            .terms
            .iter_mut()
            .find(|existing| existing.id() == term.id())
        {
            Some(existing) => *existing = term.clone(),
            None => self.terms.push(term.clone()),
        }
        Ok(term)
    }

    fn delete_term(&mut self, id: uuid::Uuid) -> Result<bool, StorageError> {
        let before = self.terms.len();
        self.terms.retain(|term| term.id() != id);
        if self.terms.len() == before {
            return Ok(false);
        }

        let path = self.term_path(id);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(true)
    }

    fn terms(&self) -> Result<Vec<GlossaryTerm>, StorageError> {
        Ok(self.terms.clone())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use uuid::Uuid;

    use super::*;
    use crate::domain::{Draft, Priority, RequirementType, StakeholderProfile, TermEntry};

    fn requirement(index: u16) -> Requirement {
        Requirement::from_draft(
            format!("REQ-{index:03}").parse().unwrap(),
            Draft {
                key: format!("REQ-{index:03}"),
                description: "O sistema deve permitir login com email e senha".to_string(),
                rationale: "Necessário para controlar o acesso ao sistema".to_string(),
                fit_criterion: None,
                kind: RequirementType::Functional,
                priority: Priority::Medium,
                source: Uuid::new_v4(),
            },
        )
    }

    #[test]
    fn init_creates_the_layout_and_a_default_config() {
        let tmp = TempDir::new().unwrap();
        let store = DirectoryStore::init(tmp.path().to_path_buf()).unwrap();

        assert!(tmp.path().join("requirements").is_dir());
        assert!(tmp.path().join("stakeholders").is_dir());
        assert!(tmp.path().join("glossary").is_dir());
        assert!(tmp.path().join("config.toml").is_file());
        assert!(!store.config().allow_unrecognised);
    }

    #[test]
    fn records_round_trip_across_reopen() {
        let tmp = TempDir::new().unwrap();
        let mut store = DirectoryStore::init(tmp.path().to_path_buf()).unwrap();

        let mut record = requirement(1);
        record.push_dependency(Uuid::new_v4());
        store.save(record.clone()).unwrap();

        let stakeholder =
            Stakeholder::new(StakeholderProfile::new("Ana", "Product Owner", "ana@example.com"));
        store.save_stakeholder(stakeholder.clone()).unwrap();

        let term = GlossaryTerm::new(TermEntry::new("Pedido", "Solicitação de compra do cliente"));
        store.save_term(term.clone()).unwrap();

        let reopened = DirectoryStore::open(tmp.path().to_path_buf()).unwrap();
        assert_eq!(reopened.find_by_id(record.id()).unwrap().unwrap(), record);
        assert_eq!(
            reopened
                .find_stakeholder(stakeholder.id())
                .unwrap()
                .unwrap(),
            stakeholder
        );
        assert_eq!(reopened.find_term(term.id()).unwrap().unwrap(), term);
    }

    #[test]
    fn archived_version_and_successor_live_side_by_side() {
        let tmp = TempDir::new().unwrap();
        let mut store = DirectoryStore::init(tmp.path().to_path_buf()).unwrap();

        let mut old = requirement(1);
        old.set_status(crate::domain::Status::Review);
        store.save(old.clone()).unwrap();

        old.archive();
        let successor = old.spawn_next_version();
        store.save(old.clone()).unwrap();
        store.save(successor.clone()).unwrap();

        assert!(tmp.path().join("requirements/REQ-001-v1.0.yaml").is_file());
        assert!(tmp.path().join("requirements/REQ-001-v1.1.yaml").is_file());

        let reopened = DirectoryStore::open(tmp.path().to_path_buf()).unwrap();
        let active = reopened.find_by_key(old.key()).unwrap().unwrap();
        assert_eq!(active.id(), successor.id());
    }

    #[test]
    fn unrecognised_files_fail_a_strict_open() {
        let tmp = TempDir::new().unwrap();
        DirectoryStore::init(tmp.path().to_path_buf()).unwrap();
        std::fs::write(tmp.path().join("requirements/notes.yaml"), "not: a-record").unwrap();

        let error = DirectoryStore::open(tmp.path().to_path_buf()).unwrap_err();
        assert!(matches!(error, OpenError::UnrecognisedFiles(_)));
    }

    #[test]
    fn unrecognised_files_are_skipped_when_allowed() {
        let tmp = TempDir::new().unwrap();
        let mut store = DirectoryStore::init(tmp.path().to_path_buf()).unwrap();
        store.save(requirement(1)).unwrap();

        let config = Config {
            allow_unrecognised: true,
            extra_subjective_terms: Vec::new(),
        };
        config.save(&tmp.path().join("config.toml")).unwrap();
        std::fs::write(tmp.path().join("requirements/notes.yaml"), "not: a-record").unwrap();

        let reopened = DirectoryStore::open(tmp.path().to_path_buf()).unwrap();
        assert_eq!(
            reopened.find_all(RequirementFilter::all()).unwrap().len(),
            1
        );
    }

    #[test]
    fn non_yaml_files_are_ignored() {
        let tmp = TempDir::new().unwrap();
        DirectoryStore::init(tmp.path().to_path_buf()).unwrap();
        std::fs::write(tmp.path().join("requirements/README.md"), "notes").unwrap();

        DirectoryStore::open(tmp.path().to_path_buf()).unwrap();
    }

    #[test]
    fn deleting_a_stakeholder_removes_its_file() {
        let tmp = TempDir::new().unwrap();
        let mut store = DirectoryStore::init(tmp.path().to_path_buf()).unwrap();

        let stakeholder =
            Stakeholder::new(StakeholderProfile::new("Ana", "Product Owner", "ana@example.com"));
        store.save_stakeholder(stakeholder.clone()).unwrap();
        let path = tmp
            .path()
            .join("stakeholders")
            .join(format!("{}.yaml", stakeholder.id()));
        assert!(path.is_file());

        assert!(store.delete_stakeholder(stakeholder.id()).unwrap());
        assert!(!path.exists());
        assert!(!store.delete_stakeholder(stakeholder.id()).unwrap());
    }

    #[test]
    fn reopen_orders_requirements_by_key_and_version() {
        let tmp = TempDir::new().unwrap();
        let mut store = DirectoryStore::init(tmp.path().to_path_buf()).unwrap();
        store.save(requirement(2)).unwrap();
        store.save(requirement(1)).unwrap();

        let reopened = DirectoryStore::open(tmp.path().to_path_buf()).unwrap();
        let keys: Vec<_> = reopened
            .find_all(RequirementFilter::all())
            .unwrap()
            .iter()
            .map(|requirement| requirement.key().to_string())
            .collect();
        assert_eq!(keys, ["REQ-001", "REQ-002"]);
    }
}

use std::{collections::BTreeMap, path::PathBuf};

mod terminal;

use clap::ArgAction;
use openreqs::{
    DependencyGraph, DirectoryStore, Draft, Engine, Priority, Requirement, RequirementFilter,
    RequirementKey, RequirementType, RuleSet, StakeholderProfile, Status, TermEntry, UpdateFields,
};
use terminal::Colorize;
use uuid::Uuid;

/// Parse a requirement key from a string, normalizing to uppercase.
///
/// This is a CLI boundary function that accepts lowercase input and
/// normalizes it before parsing.
fn parse_key(s: &str) -> Result<RequirementKey, String> {
    s.to_uppercase().parse().map_err(|e| format!("{e}"))
}

fn parse_status(s: &str) -> Result<Status, String> {
    s.to_uppercase().parse().map_err(|e| format!("{e}"))
}

fn parse_kind(s: &str) -> Result<RequirementType, String> {
    s.to_uppercase().parse().map_err(|e| format!("{e}"))
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    let ordinal: u8 = s.parse().map_err(|e| format!("{e}"))?;
    ordinal.try_into().map_err(|e| format!("{e}"))
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the requirements store
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        self.command.run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
enum Command {
    /// Initialize a new requirements store
    Init,

    /// Create a new requirement
    Add(Add),

    /// Update the fields of a requirement
    ///
    /// Updating an APPROVED requirement archives it and spawns a new DRAFT
    /// version with the version label bumped by 0.1.
    Update(Update),

    /// Show detailed information about a requirement
    Show(Show),

    /// List requirements
    List(List),

    /// Move a requirement through its lifecycle
    SetStatus(SetStatus),

    /// Archive a requirement (records are never deleted)
    Archive(Archive),

    /// Declare that one requirement depends on another
    Link(Link),

    /// Remove a dependency edge
    Unlink(Unlink),

    /// Show the direct dependencies of a requirement
    Trace(Trace),

    /// Show the requirements that directly depend on one
    Impact(Impact),

    /// Show store health: status counts and dependency cycles
    Status(StatusCmd),

    /// Manage stakeholders
    #[command(subcommand)]
    Stakeholder(StakeholderCmd),

    /// Manage the project glossary
    #[command(subcommand)]
    Glossary(GlossaryCmd),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Init => {
                DirectoryStore::init(root)?;
                println!("{}", "Initialized requirements store".success());
                Ok(())
            }
            Self::Add(command) => command.run(root),
            Self::Update(command) => command.run(root),
            Self::Show(command) => command.run(root),
            Self::List(command) => command.run(root),
            Self::SetStatus(command) => command.run(root),
            Self::Archive(command) => command.run(root),
            Self::Link(command) => command.run(root),
            Self::Unlink(command) => command.run(root),
            Self::Trace(command) => command.run(root),
            Self::Impact(command) => command.run(root),
            Self::Status(command) => command.run(root),
            Self::Stakeholder(command) => command.run(root),
            Self::Glossary(command) => command.run(root),
        }
    }
}

fn open_engine(root: PathBuf) -> anyhow::Result<Engine<DirectoryStore>> {
    let store = DirectoryStore::open(root)?;
    let rules = RuleSet::from_config(store.config());
    Ok(Engine::with_rules(store, rules))
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

fn status_label(status: Status) -> String {
    let label = status.to_string();
    match status {
        Status::Draft => label.dim(),
        Status::Review => label.info(),
        Status::Approved | Status::Implemented | Status::Tested => label.success(),
        Status::Rejected | Status::Deprecated => label.warning(),
    }
}

fn requirement_json(requirement: &Requirement) -> serde_json::Value {
    use serde_json::json;

    json!({
        "id": requirement.id(),
        "key": requirement.key().to_string(),
        "description": requirement.description(),
        "rationale": requirement.rationale(),
        "fit_criterion": requirement.fit_criterion(),
        "type": requirement.kind().to_string(),
        "status": requirement.status().to_string(),
        "priority": requirement.priority().ordinal(),
        "version": requirement.version().to_string(),
        "archived": requirement.is_archived(),
        "source": requirement.source(),
        "depends_on": requirement.depends_on(),
        "created": requirement.created(),
        "updated": requirement.updated(),
    })
}

#[derive(Debug, clap::Parser)]
struct Add {
    /// Human-facing key, e.g. REQ-001
    #[arg(value_parser = parse_key)]
    key: RequirementKey,

    /// What the system must do or guarantee
    #[arg(long, short)]
    description: String,

    /// Why the requirement exists
    #[arg(long)]
    rationale: String,

    /// Optional acceptance criterion
    #[arg(long)]
    fit: Option<String>,

    /// Requirement type (functional, quality, constraint)
    #[arg(long, value_parser = parse_kind, default_value = "functional")]
    kind: RequirementType,

    /// Priority, 1 (alta) to 3 (baixa)
    #[arg(long, value_parser = parse_priority, default_value = "2")]
    priority: Priority,

    /// Id of the stakeholder declaring the requirement
    #[arg(long)]
    source: Uuid,
}

impl Add {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut engine = open_engine(root)?;
        let requirement = engine.create(Draft {
            key: self.key.to_string(),
            description: self.description,
            rationale: self.rationale,
            fit_criterion: self.fit,
            kind: self.kind,
            priority: self.priority,
            source: self.source,
        })?;

        println!(
            "Created {} ({}) [{}]",
            requirement.key().to_string().success(),
            requirement.version(),
            status_label(requirement.status())
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
struct Update {
    /// Key of the requirement to update
    #[arg(value_parser = parse_key)]
    key: RequirementKey,

    /// New description
    #[arg(long, short)]
    description: Option<String>,

    /// New rationale
    #[arg(long)]
    rationale: Option<String>,

    /// New acceptance criterion
    #[arg(long)]
    fit: Option<String>,

    /// New requirement type
    #[arg(long, value_parser = parse_kind)]
    kind: Option<RequirementType>,

    /// New priority, 1 to 3
    #[arg(long, value_parser = parse_priority)]
    priority: Option<Priority>,
}

impl Update {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut engine = open_engine(root)?;
        let current = engine.get_by_key(self.key)?;

        // Unspecified fields keep their current values.
        let fields = UpdateFields {
            description: self
                .description
                .unwrap_or_else(|| current.description().to_string()),
            rationale: self
                .rationale
                .unwrap_or_else(|| current.rationale().to_string()),
            fit_criterion: self
                .fit
                .or_else(|| current.fit_criterion().map(ToString::to_string)),
            kind: self.kind.unwrap_or_else(|| current.kind()),
            priority: self.priority.unwrap_or_else(|| current.priority()),
        };

        let updated = engine.update(current.id(), fields)?;
        println!(
            "Updated {} ({}) [{}]",
            updated.key().to_string().success(),
            updated.version(),
            status_label(updated.status())
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
struct Show {
    /// Key of the requirement to show
    #[arg(value_parser = parse_key)]
    key: RequirementKey,

    /// Output format (table, json)
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Show {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let engine = open_engine(root)?;
        let requirement = engine.get_by_key(self.key)?;

        match self.output {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&requirement_json(&requirement))?
                );
            }
            OutputFormat::Table => {
                println!(
                    "{} ({}) [{}]",
                    requirement.key().to_string().success(),
                    requirement.version(),
                    status_label(requirement.status())
                );
                println!("  type:        {}", requirement.kind());
                println!("  priority:    {}", requirement.priority());
                println!("  description: {}", requirement.description());
                println!("  rationale:   {}", requirement.rationale());
                if let Some(fit) = requirement.fit_criterion() {
                    println!("  fit:         {fit}");
                }
                println!("  source:      {}", requirement.source());
                if !requirement.depends_on().is_empty() {
                    println!("  depends on:  {} edge(s)", requirement.depends_on().len());
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
struct List {
    /// Filter by lifecycle status
    #[arg(long, value_parser = parse_status)]
    status: Option<Status>,

    /// Include archived versions
    #[arg(long)]
    archived: bool,

    /// Case-insensitive substring match against description/rationale
    #[arg(long)]
    contains: Option<String>,

    /// Output format (table, json)
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl List {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let engine = open_engine(root)?;

        let requirements = if let Some(keyword) = &self.contains {
            engine.search(keyword)?
        } else {
            engine.list(RequirementFilter {
                include_archived: self.archived,
                status: self.status,
            })?
        };

        match self.output {
            OutputFormat::Json => {
                let rows: Vec<_> = requirements.iter().map(requirement_json).collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            }
            OutputFormat::Table => {
                if requirements.is_empty() {
                    println!("No requirements found.");
                    return Ok(());
                }
                for requirement in &requirements {
                    println!(
                        "{} {} [{}] {}",
                        requirement.key().to_string().success(),
                        requirement.version().to_string().dim(),
                        status_label(requirement.status()),
                        requirement.description()
                    );
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
struct SetStatus {
    /// Key of the requirement to move
    #[arg(value_parser = parse_key)]
    key: RequirementKey,

    /// Target status
    #[arg(value_parser = parse_status)]
    status: Status,
}

impl SetStatus {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut engine = open_engine(root)?;
        let requirement = engine.get_by_key(self.key)?;
        let moved = engine.change_status(requirement.id(), self.status)?;
        println!(
            "{} is now [{}]",
            moved.key().to_string().success(),
            status_label(moved.status())
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
struct Archive {
    /// Key of the requirement to archive
    #[arg(value_parser = parse_key)]
    key: RequirementKey,
}

impl Archive {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut engine = open_engine(root)?;
        let requirement = engine.get_by_key(self.key)?;
        let archived = engine.archive(requirement.id())?;
        println!(
            "Archived {} ({})",
            archived.key().to_string().warning(),
            archived.version()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
struct Link {
    /// Key of the dependent requirement
    #[arg(value_parser = parse_key)]
    key: RequirementKey,

    /// Key of the requirement it depends on
    #[arg(value_parser = parse_key)]
    depends_on: RequirementKey,
}

impl Link {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut engine = open_engine(root)?;
        let dependent = engine.get_by_key(self.key)?;
        let dependency = engine.get_by_key(self.depends_on)?;
        engine.add_dependency(dependent.id(), dependency.id())?;
        println!(
            "{} now depends on {}",
            dependent.key().to_string().success(),
            dependency.key().to_string().success()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
struct Unlink {
    /// Key of the dependent requirement
    #[arg(value_parser = parse_key)]
    key: RequirementKey,

    /// Key of the dependency to remove
    #[arg(value_parser = parse_key)]
    depends_on: RequirementKey,
}

impl Unlink {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut engine = open_engine(root)?;
        let dependent = engine.get_by_key(self.key)?;
        let dependency = engine.get_by_key(self.depends_on)?;
        engine.remove_dependency(dependent.id(), dependency.id())?;
        println!(
            "{} no longer depends on {}",
            dependent.key(),
            dependency.key()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
struct Trace {
    /// Key of the requirement to trace
    #[arg(value_parser = parse_key)]
    key: RequirementKey,

    /// Output format (table, json)
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Trace {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let engine = open_engine(root)?;
        let lines = engine.traceability(self.key)?;

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&lines)?),
            OutputFormat::Table => {
                if lines.is_empty() {
                    println!("{} has no dependencies.", self.key);
                }
                for line in lines {
                    println!("{line}");
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
struct Impact {
    /// Key of the requirement to analyse
    #[arg(value_parser = parse_key)]
    key: RequirementKey,

    /// Output format (table, json)
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Impact {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let engine = open_engine(root)?;
        let lines = engine.impact_analysis(self.key)?;

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&lines)?),
            OutputFormat::Table => {
                if lines.is_empty() {
                    println!("Nothing depends on {} directly.", self.key);
                }
                for line in lines {
                    println!("{line}");
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser, Default)]
struct StatusCmd {
    /// Output format (table, json)
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl StatusCmd {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let engine = open_engine(root)?;
        let requirements = engine.list(RequirementFilter::all())?;

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for requirement in &requirements {
            *counts.entry(requirement.status().to_string()).or_insert(0) += 1;
        }
        let total = requirements.len();

        // The engine never commits a cycle, but store files are plain YAML
        // and can be edited by hand; surface any damage here.
        let graph = DependencyGraph::from_requirements(&requirements);
        let cycles: Vec<Vec<String>> = graph
            .cycles()
            .iter()
            .map(|cycle| {
                cycle
                    .iter()
                    .filter_map(|id| {
                        requirements
                            .iter()
                            .find(|requirement| requirement.id() == *id)
                            .map(|requirement| requirement.key().to_string())
                    })
                    .collect()
            })
            .collect();

        match self.output {
            OutputFormat::Json => {
                use serde_json::json;

                let output = json!({
                    "total": total,
                    "by_status": counts,
                    "cycles": cycles,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                if total == 0 {
                    println!("No requirements found yet. Create one with 'oreq add'.");
                    return Ok(());
                }
                for (status, count) in &counts {
                    println!("{status:>12}  {count}");
                }
                println!("{:>12}  {total}", "TOTAL");
                if cycles.is_empty() {
                    println!("dependency graph: {}", "acyclic".success());
                } else {
                    for cycle in &cycles {
                        println!("cycle: {}", cycle.join(" -> ").warning());
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
enum StakeholderCmd {
    /// Register a stakeholder
    Add(StakeholderAdd),

    /// List stakeholders
    List,

    /// Remove a stakeholder (blocked while it owns requirements)
    Remove(StakeholderRemove),
}

impl StakeholderCmd {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Add(command) => command.run(root),
            Self::List => {
                let engine = open_engine(root)?;
                let stakeholders = engine.stakeholders()?;
                if stakeholders.is_empty() {
                    println!("No stakeholders registered.");
                    return Ok(());
                }
                for stakeholder in stakeholders {
                    let count = engine.requirement_count_by_source(stakeholder.id())?;
                    println!(
                        "{}  {} <{}> ({}) - {} requisito(s)",
                        stakeholder.id().to_string().dim(),
                        stakeholder.name(),
                        stakeholder.email(),
                        stakeholder.role(),
                        count
                    );
                }
                Ok(())
            }
            Self::Remove(command) => command.run(root),
        }
    }
}

#[derive(Debug, clap::Parser)]
struct StakeholderAdd {
    /// Display name
    name: String,

    /// Role, e.g. "Product Owner"
    #[arg(long)]
    role: String,

    /// Unique contact email
    #[arg(long)]
    email: String,

    /// Free-text responsibilities
    #[arg(long)]
    responsibilities: Option<String>,

    /// Influence classification
    #[arg(long)]
    influence: Option<String>,
}

impl StakeholderAdd {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut engine = open_engine(root)?;
        let mut profile = StakeholderProfile::new(self.name, self.role, self.email);
        if let Some(responsibilities) = self.responsibilities {
            profile.responsibilities = responsibilities;
        }
        if let Some(influence) = self.influence {
            profile.influence_level = influence;
        }

        let stakeholder = engine.register_stakeholder(profile)?;
        println!(
            "Registered {} ({})",
            stakeholder.name().success(),
            stakeholder.id()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
struct StakeholderRemove {
    /// Id of the stakeholder to remove
    id: Uuid,
}

impl StakeholderRemove {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut engine = open_engine(root)?;
        engine.remove_stakeholder(self.id)?;
        println!("Removed stakeholder {}", self.id);
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
enum GlossaryCmd {
    /// Define a term
    Add(GlossaryAdd),

    /// List every term
    List,

    /// Search terms and definitions
    Search(GlossarySearch),
}

impl GlossaryCmd {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Add(command) => command.run(root),
            Self::List => {
                let engine = open_engine(root)?;
                let terms = engine.terms()?;
                if terms.is_empty() {
                    println!("The glossary is empty.");
                    return Ok(());
                }
                for term in terms {
                    print_term(&term);
                }
                Ok(())
            }
            Self::Search(command) => command.run(root),
        }
    }
}

fn print_term(term: &openreqs::GlossaryTerm) {
    match term.acronym() {
        Some(acronym) => println!(
            "{} ({}): {}",
            term.term().info(),
            acronym,
            term.definition()
        ),
        None => println!("{}: {}", term.term().info(), term.definition()),
    }
}

#[derive(Debug, clap::Parser)]
struct GlossaryAdd {
    /// The term to define
    term: String,

    /// Definition of the term
    #[arg(long)]
    definition: String,

    /// Optional acronym
    #[arg(long)]
    acronym: Option<String>,

    /// Optional related terms
    #[arg(long)]
    related: Option<String>,

    /// Optional business domain
    #[arg(long)]
    domain: Option<String>,
}

impl GlossaryAdd {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut engine = open_engine(root)?;
        let mut entry = TermEntry::new(self.term, self.definition);
        entry.acronym = self.acronym;
        entry.related_terms = self.related;
        entry.business_domain = self.domain;

        let term = engine.define_term(entry)?;
        println!("Defined {}", term.term().success());
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
struct GlossarySearch {
    /// Keyword to look for
    keyword: String,
}

impl GlossarySearch {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let engine = open_engine(root)?;
        let terms = engine.search_terms(&self.keyword)?;
        if terms.is_empty() {
            println!("No terms match '{}'.", self.keyword);
            return Ok(());
        }
        for term in terms {
            print_term(&term);
        }
        Ok(())
    }
}

use std::path::PathBuf;

mod case;
mod defect;
mod incident;
mod letter;
mod status;
mod terminal;
mod transfer;

use clap::ArgAction;
use mietlog::{
    domain::{Config, DefectStatus, Identified, TemplateKind, Urgency},
    Document, EntityId, StorageError, Store,
};
use terminal::Colorize;

/// Parse a defect status from the CLI (`open` or `resolved`).
fn parse_status(s: &str) -> Result<DefectStatus, String> {
    DefectStatus::parse(&s.to_lowercase())
        .ok_or_else(|| format!("unknown status '{s}' (expected open or resolved)"))
}

/// Parse an incident urgency from the CLI.
fn parse_urgency(s: &str) -> Result<Urgency, String> {
    Urgency::parse(&s.to_lowercase())
        .ok_or_else(|| format!("unknown urgency '{s}' (expected open, urgent, or resolved)"))
}

/// Parse a letter template key from the CLI.
fn parse_template(s: &str) -> Result<TemplateKind, String> {
    TemplateKind::parse(&s.to_lowercase()).ok_or_else(|| {
        format!("unknown template '{s}' (expected repair-request or rent-reduction)")
    })
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path of the case file (defaults to the configured path, then
    /// ./casefile.json)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = load_config();
        let path = self
            .file
            .or_else(|| config.data_file.clone())
            .unwrap_or_else(|| PathBuf::from("casefile.json"));

        let mut session = Session::open(path, config);
        self.command
            .unwrap_or_else(|| Command::Status(status::Status::default()))
            .run(&mut session)
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

fn load_config() -> Config {
    let path = PathBuf::from(".mietlog.toml");
    if !path.exists() {
        return Config::default();
    }
    Config::load(&path).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    })
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show a summary of the active case (default)
    Status(status::Status),

    /// Manage cases
    Case(case::CaseCmd),

    /// Manage defects of the active case
    Defect(defect::DefectCmd),

    /// Manage timeline incidents of the active case
    Incident(incident::IncidentCmd),

    /// Manage evidence links of an incident
    Evidence(incident::EvidenceCmd),

    /// Manage file attachments of an incident
    Attach(incident::AttachCmd),

    /// Manage document references of the active case
    Doc(case::DocCmd),

    /// Generate and manage letter drafts
    Letter(letter::LetterCmd),

    /// Export the case file or a single case as JSON
    Export(transfer::Export),

    /// Import an exported case or case file
    Import(transfer::Import),
}

impl Command {
    fn run(self, session: &mut Session) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(session),
            Self::Case(command) => command.run(session),
            Self::Defect(command) => command.run(session),
            Self::Incident(command) => command.run(session),
            Self::Evidence(command) => command.run(session),
            Self::Attach(command) => command.run(session),
            Self::Doc(command) => command.run(session),
            Self::Letter(command) => command.run(session),
            Self::Export(command) => command.run(session),
            Self::Import(command) => command.run(session),
        }
    }
}

/// An open case file plus the configuration it was opened under.
///
/// Commands mutate the in-memory document and call [`persist`] once done;
/// every save writes the whole document.
///
/// [`persist`]: Session::persist
pub(crate) struct Session {
    store: Store,
    config: Config,
    document: Document,
}

impl Session {
    fn open(path: PathBuf, config: Config) -> Self {
        let store = Store::new(path);
        let document = store.load();
        Self {
            store,
            config,
            document,
        }
    }

    pub(crate) const fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) const fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) const fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Saves the whole document. A quota failure is a recoverable
    /// warning, not an error: the in-memory state is kept and the user
    /// is asked to free space and retry.
    pub(crate) fn persist(&self) -> anyhow::Result<()> {
        match self.store.save(&self.document) {
            Ok(()) => Ok(()),
            Err(StorageError::QuotaExceeded) => {
                eprintln!(
                    "{}",
                    "⚠️  Could not save: storage is full. Free some space (e.g. remove \
                     attachments) and run the command again."
                        .warning()
                );
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The active case, or an error telling the user to select one.
    pub(crate) fn active_case(&self) -> anyhow::Result<&mietlog::Case> {
        self.document
            .active_case()
            .ok_or_else(|| anyhow::anyhow!("No case selected. Create one with 'miet case new'."))
    }

    /// The active case, mutably.
    pub(crate) fn active_case_mut(&mut self) -> anyhow::Result<&mut mietlog::Case> {
        self.document
            .active_case_mut()
            .ok_or_else(|| anyhow::anyhow!("No case selected. Create one with 'miet case new'."))
    }
}

/// Resolves a full id or unique id prefix against a collection.
///
/// Entity ids are long; letting the user type a unique prefix keeps the
/// commands usable.
pub(crate) fn match_id<T: Identified>(
    items: &[T],
    needle: &str,
    what: &str,
) -> anyhow::Result<EntityId> {
    let matches: Vec<&EntityId> = items
        .iter()
        .map(Identified::id)
        .filter(|id| id.as_str().starts_with(needle))
        .collect();

    match matches.as_slice() {
        [] => anyhow::bail!("No {what} matches id '{needle}'"),
        [id] => Ok((*id).clone()),
        _ => anyhow::bail!("Id '{needle}' is ambiguous ({} {what}s match)", matches.len()),
    }
}

/// The short display form of an id.
pub(crate) fn short(id: &EntityId) -> &str {
    let raw = id.as_str();
    raw.get(..8).unwrap_or(raw)
}

/// Asks for confirmation before a destructive operation.
///
/// `--yes` skips the prompt.
pub(crate) fn confirm(prompt: &str, yes: bool) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }
    let proceed = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    if !proceed {
        println!("Cancelled");
    }
    Ok(proceed)
}

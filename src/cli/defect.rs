use clap::Parser;
use mietlog::domain::{parse_amount, Defect, DefectPatch, DefectStatus};
use tracing::instrument;

use super::{confirm, match_id, parse_status, short, terminal::Colorize, Session};

#[derive(Debug, Parser)]
pub struct DefectCmd {
    #[command(subcommand)]
    command: DefectCommand,
}

#[derive(Debug, Parser)]
enum DefectCommand {
    /// Record a new defect on the active case
    Add {
        /// Short description of the problem
        title: String,

        /// Room or area label
        #[arg(long, default_value = "")]
        room: String,

        /// When the problem started (free text, e.g. 2026-07-01)
        #[arg(long, default_value = "")]
        since: String,

        /// Proposed rent-reduction percentage
        #[arg(long)]
        impact: Option<String>,

        /// Free-text notes
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// List defects of the active case
    List {
        /// Only show defects with this status (open, resolved)
        #[arg(long, value_parser = parse_status)]
        status: Option<DefectStatus>,
    },

    /// Edit a defect
    Edit {
        /// Id (or unique prefix) of the defect
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New room/area label
        #[arg(long)]
        room: Option<String>,

        /// New start date text
        #[arg(long)]
        since: Option<String>,

        /// New status (open, resolved)
        #[arg(long, value_parser = parse_status)]
        status: Option<DefectStatus>,

        /// New impact percentage
        #[arg(long)]
        impact: Option<String>,

        /// New notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Mark a defect as resolved
    Resolve {
        /// Id (or unique prefix) of the defect
        id: String,
    },

    /// Reopen a resolved defect
    Reopen {
        /// Id (or unique prefix) of the defect
        id: String,
    },

    /// Remove a defect
    Remove {
        /// Id (or unique prefix) of the defect
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl DefectCmd {
    #[instrument(skip_all)]
    pub fn run(self, session: &mut Session) -> anyhow::Result<()> {
        match self.command {
            DefectCommand::Add {
                title,
                room,
                since,
                impact,
                notes,
            } => {
                let mut defect = Defect::new(title);
                defect.room = room;
                defect.started = since;
                defect.notes = notes;
                if let Some(impact) = impact {
                    defect.impact_percent = parse_amount(&impact);
                }
                let id = defect.id.clone();
                let title = defect.title.clone();
                session.active_case_mut()?.add_defect(defect);
                session.persist()?;
                println!("{} {title} ({})", "Added defect".success(), short(&id).dim());
            }
            DefectCommand::List { status } => {
                let case = session.active_case()?;
                let defects: Vec<_> = case
                    .defects
                    .iter()
                    .filter(|d| status.is_none_or(|s| d.status == s))
                    .collect();
                if defects.is_empty() {
                    println!("No defects recorded.");
                    return Ok(());
                }
                for defect in defects {
                    let status = match defect.status {
                        DefectStatus::Open => defect.status.as_str().warning(),
                        DefectStatus::Resolved => defect.status.as_str().success(),
                    };
                    let room = if defect.room.is_empty() {
                        String::new()
                    } else {
                        format!(" [{}]", defect.room)
                    };
                    let impact = if defect.impact_percent > 0.0 {
                        format!(" {}%", defect.impact_percent)
                    } else {
                        String::new()
                    };
                    println!(
                        "{} {status} {}{room}{impact}",
                        short(&defect.id).dim(),
                        defect.title
                    );
                }
            }
            DefectCommand::Edit {
                id,
                title,
                room,
                since,
                status,
                impact,
                notes,
            } => {
                let id = match_id(&session.active_case()?.defects, &id, "defect")?;
                let patch = DefectPatch {
                    title,
                    room,
                    started: since,
                    status,
                    impact_percent: impact.map(|i| parse_amount(&i)),
                    notes,
                };
                session.active_case_mut()?.patch_defect(&id, &patch);
                session.persist()?;
                println!("{}", "Updated defect".success());
            }
            DefectCommand::Resolve { id } => {
                Self::set_status(session, &id, DefectStatus::Resolved)?;
                println!("{}", "Marked defect as resolved".success());
            }
            DefectCommand::Reopen { id } => {
                Self::set_status(session, &id, DefectStatus::Open)?;
                println!("Reopened defect");
            }
            DefectCommand::Remove { id, yes } => {
                let id = match_id(&session.active_case()?.defects, &id, "defect")?;
                if !confirm("Remove this defect?", yes)? {
                    return Ok(());
                }
                session.active_case_mut()?.remove_defect(&id);
                session.persist()?;
                println!("Removed defect");
            }
        }
        Ok(())
    }

    fn set_status(session: &mut Session, id: &str, status: DefectStatus) -> anyhow::Result<()> {
        let id = match_id(&session.active_case()?.defects, id, "defect")?;
        let patch = DefectPatch {
            status: Some(status),
            ..DefectPatch::default()
        };
        session.active_case_mut()?.patch_defect(&id, &patch);
        session.persist()
    }
}

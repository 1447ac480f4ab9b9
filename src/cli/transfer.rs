use std::{fs, path::PathBuf};

use clap::Parser;
use mietlog::transfer::{self, Imported};
use tracing::instrument;

use super::{confirm, match_id, terminal::Colorize, Session};

#[derive(Debug, Parser)]
#[command(about = "Export the case file or a single case as JSON")]
pub struct Export {
    /// Export only one case (id or unique prefix) instead of the whole file
    #[arg(long)]
    case: Option<String>,

    /// Output path (defaults to export.json, or a name derived from the
    /// case title)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

impl Export {
    #[instrument(skip_all)]
    pub fn run(self, session: &mut Session) -> anyhow::Result<()> {
        let (payload, path) = if let Some(needle) = self.case {
            let document = session.document();
            let id = match_id(&document.cases, &needle, "case")?;
            let case = document
                .case(&id)
                .ok_or_else(|| anyhow::anyhow!("case vanished during lookup"))?;
            let path = self
                .out
                .unwrap_or_else(|| PathBuf::from(transfer::case_file_name(&case.title)));
            (transfer::export_case(case)?, path)
        } else {
            let path = self.out.unwrap_or_else(|| PathBuf::from("export.json"));
            (transfer::export_document(session.document())?, path)
        };

        fs::write(&path, payload)?;
        println!("{} {}", "Wrote".success(), path.display());
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(about = "Import an exported case or case file")]
pub struct Import {
    /// File to import
    path: PathBuf,

    /// Skip the confirmation prompt when replacing the whole case file
    #[arg(short, long)]
    yes: bool,
}

impl Import {
    #[instrument(skip_all)]
    pub fn run(self, session: &mut Session) -> anyhow::Result<()> {
        let payload = fs::read_to_string(&self.path)?;

        // The import is run against a scratch copy so a rejected or
        // cancelled payload leaves the real document untouched.
        let mut scratch = session.document().clone();
        let outcome = transfer::import(&mut scratch, &payload)?;

        if let Imported::ReplacedDocument { cases } = &outcome {
            let existing = session.document().cases.len();
            if existing > 0 {
                let prompt = format!(
                    "Replace the current case file ({existing} cases) with the import ({cases} cases)?"
                );
                if !confirm(&prompt, self.yes)? {
                    return Ok(());
                }
            }
        }

        *session.document_mut() = scratch;
        session.persist()?;

        match outcome {
            Imported::ReplacedDocument { cases } => {
                println!("{} ({cases} cases)", "Imported case file".success());
            }
            Imported::UpsertedCase { title, .. } => {
                println!("{} {title}", "Imported case".success());
            }
        }
        Ok(())
    }
}

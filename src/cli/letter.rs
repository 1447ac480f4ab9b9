use std::{fs, path::PathBuf};

use clap::Parser;
use mietlog::{
    domain::{LetterPatch, TemplateKind},
    templates, transfer,
};
use tracing::instrument;

use super::{confirm, match_id, parse_template, short, terminal::Colorize, Session};

#[derive(Debug, Parser)]
pub struct LetterCmd {
    #[command(subcommand)]
    command: LetterCommand,
}

#[derive(Debug, Parser)]
enum LetterCommand {
    /// Generate a letter draft from the active case
    Generate {
        /// Template (repair-request, rent-reduction)
        #[arg(value_parser = parse_template)]
        template: TemplateKind,
    },

    /// List letter drafts of the active case
    List,

    /// Print a letter draft
    Show {
        /// Id (or unique prefix) of the letter
        id: String,
    },

    /// Edit the subject or body of a letter draft
    Edit {
        /// Id (or unique prefix) of the letter
        id: String,

        /// New subject line
        #[arg(long)]
        subject: Option<String>,

        /// New body text
        #[arg(long)]
        body: Option<String>,
    },

    /// Write a letter draft to a text file
    Export {
        /// Id (or unique prefix) of the letter
        id: String,

        /// Output path (defaults to letter.txt)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Remove a letter draft
    Remove {
        /// Id (or unique prefix) of the letter
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl LetterCmd {
    #[instrument(skip_all)]
    pub fn run(self, session: &mut Session) -> anyhow::Result<()> {
        match self.command {
            LetterCommand::Generate { template } => {
                let case = session.active_case_mut()?;
                let id = templates::generate(case, template);
                session.persist()?;
                println!(
                    "{} {} ({})",
                    "Generated".success(),
                    templates::title(template),
                    short(&id).dim()
                );
                println!("{}", "Drafts are snapshots; review the bracketed placeholders before sending.".dim());
            }
            LetterCommand::List => {
                let case = session.active_case()?;
                if case.letters.is_empty() {
                    println!("No letters generated yet. Try 'miet letter generate repair-request'.");
                    return Ok(());
                }
                for letter in &case.letters {
                    println!(
                        "{} {} {}",
                        short(&letter.id).dim(),
                        letter.created.format("%Y-%m-%d"),
                        letter.title
                    );
                }
            }
            LetterCommand::Show { id } => {
                let case = session.active_case()?;
                let id = match_id(&case.letters, &id, "letter")?;
                let letter = case
                    .letter(&id)
                    .ok_or_else(|| anyhow::anyhow!("letter vanished during lookup"))?;
                println!("{}", transfer::letter_text(letter));
            }
            LetterCommand::Edit { id, subject, body } => {
                let id = match_id(&session.active_case()?.letters, &id, "letter")?;
                let patch = LetterPatch { subject, body };
                session.active_case_mut()?.patch_letter(&id, &patch);
                session.persist()?;
                println!("{}", "Updated letter".success());
            }
            LetterCommand::Export { id, out } => {
                let case = session.active_case()?;
                let id = match_id(&case.letters, &id, "letter")?;
                let letter = case
                    .letter(&id)
                    .ok_or_else(|| anyhow::anyhow!("letter vanished during lookup"))?;
                let path = out.unwrap_or_else(|| PathBuf::from("letter.txt"));
                fs::write(&path, transfer::letter_text(letter))?;
                println!("{} {}", "Wrote".success(), path.display());
            }
            LetterCommand::Remove { id, yes } => {
                let id = match_id(&session.active_case()?.letters, &id, "letter")?;
                if !confirm("Remove this letter draft?", yes)? {
                    return Ok(());
                }
                session.active_case_mut()?.remove_letter(&id);
                session.persist()?;
                println!("Removed letter");
            }
        }
        Ok(())
    }
}

use clap::Parser;
use mietlog::domain::{parse_amount, Case, CasePatch, DocumentRef, DocumentRefPatch};
use tracing::instrument;

use super::{confirm, match_id, short, terminal::Colorize, Session};

#[derive(Debug, Parser)]
pub struct CaseCmd {
    #[command(subcommand)]
    command: CaseCommand,
}

#[derive(Debug, Parser)]
enum CaseCommand {
    /// Create a new case and make it the active one
    New {
        /// Display title of the case
        title: String,

        /// Address of the rental unit
        #[arg(long, default_value = "")]
        address: String,

        /// Landlord or representative name
        #[arg(long, default_value = "")]
        landlord: String,

        /// Tenant name, used to sign letters
        #[arg(long, default_value = "")]
        tenant: String,

        /// Warm rent in EUR
        #[arg(long)]
        rent: Option<String>,
    },

    /// List all cases
    List,

    /// Make a case the active one
    Select {
        /// Id (or unique prefix) of the case
        id: String,
    },

    /// Edit fields of the active case
    Edit {
        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New address
        #[arg(long)]
        address: Option<String>,

        /// New landlord name
        #[arg(long)]
        landlord: Option<String>,

        /// New tenant name
        #[arg(long)]
        tenant: Option<String>,

        /// New warm rent in EUR
        #[arg(long)]
        rent: Option<String>,

        /// New notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a case and everything it owns
    Delete {
        /// Id (or unique prefix) of the case
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl CaseCmd {
    #[instrument(skip_all)]
    pub fn run(self, session: &mut Session) -> anyhow::Result<()> {
        match self.command {
            CaseCommand::New {
                title,
                address,
                landlord,
                tenant,
                rent,
            } => {
                let mut case = Case::new(title);
                case.address = address;
                case.landlord = landlord;
                case.tenant = tenant;
                if let Some(rent) = rent {
                    case.warm_rent = parse_amount(&rent);
                }
                let id = case.id.clone();
                let title = case.title.clone();
                session.document_mut().add_case(case);
                session.persist()?;
                println!("{} {title} ({})", "Created case".success(), short(&id).dim());
            }
            CaseCommand::List => {
                let document = session.document();
                if document.cases.is_empty() {
                    println!("No cases found yet. Create one with 'miet case new'.");
                    return Ok(());
                }
                for case in &document.cases {
                    let marker = if document.active_case.as_ref() == Some(&case.id) {
                        "*"
                    } else {
                        " "
                    };
                    println!(
                        "{marker} {} {} ({} defects, {} incidents)",
                        short(&case.id).dim(),
                        case.title,
                        case.defects.len(),
                        case.incidents.len()
                    );
                }
            }
            CaseCommand::Select { id } => {
                let id = match_id(&session.document().cases, &id, "case")?;
                session.document_mut().select_case(&id);
                session.persist()?;
                let title = session.document().case(&id).map_or("", |c| c.title.as_str());
                println!("Selected case {title}");
            }
            CaseCommand::Edit {
                title,
                address,
                landlord,
                tenant,
                rent,
                notes,
            } => {
                let patch = CasePatch {
                    title,
                    address,
                    landlord,
                    tenant,
                    warm_rent: rent.map(|r| parse_amount(&r)),
                    notes,
                };
                let id = session.active_case()?.id.clone();
                session.document_mut().patch_case(&id, &patch);
                session.persist()?;
                println!("{}", "Updated case".success());
            }
            CaseCommand::Delete { id, yes } => {
                let id = match_id(&session.document().cases, &id, "case")?;
                let title = session
                    .document()
                    .case(&id)
                    .map_or(String::new(), |c| c.title.clone());
                let prompt = format!(
                    "Delete case '{title}' and all its defects, incidents, and letters?"
                );
                if !confirm(&prompt, yes)? {
                    return Ok(());
                }
                session.document_mut().remove_case(&id);
                session.persist()?;
                println!("Deleted case {title}");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct DocCmd {
    #[command(subcommand)]
    command: DocCommand,
}

#[derive(Debug, Parser)]
enum DocCommand {
    /// Add a document reference to the active case
    Add {
        /// Display name, e.g. "Lease agreement"
        name: String,

        /// Where the document lives
        #[arg(long, default_value = "")]
        url: String,

        /// Free-text notes
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// List document references of the active case
    List,

    /// Edit a document reference
    Edit {
        /// Id (or unique prefix) of the document reference
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New URL
        #[arg(long)]
        url: Option<String>,

        /// New notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Remove a document reference
    Remove {
        /// Id (or unique prefix) of the document reference
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl DocCmd {
    #[instrument(skip_all)]
    pub fn run(self, session: &mut Session) -> anyhow::Result<()> {
        match self.command {
            DocCommand::Add { name, url, notes } => {
                let mut document = DocumentRef::new(name);
                document.url = url;
                document.notes = notes;
                let id = document.id.clone();
                session.active_case_mut()?.add_document(document);
                session.persist()?;
                println!("{} ({})", "Added document".success(), short(&id).dim());
            }
            DocCommand::List => {
                let case = session.active_case()?;
                if case.documents.is_empty() {
                    println!("No documents recorded.");
                    return Ok(());
                }
                for document in &case.documents {
                    let url = if document.url.is_empty() {
                        String::new()
                    } else {
                        format!(" <{}>", document.url)
                    };
                    println!("{} {}{url}", short(&document.id).dim(), document.name);
                }
            }
            DocCommand::Edit {
                id,
                name,
                url,
                notes,
            } => {
                let id = match_id(&session.active_case()?.documents, &id, "document")?;
                let patch = DocumentRefPatch { name, url, notes };
                session.active_case_mut()?.patch_document(&id, &patch);
                session.persist()?;
                println!("{}", "Updated document".success());
            }
            DocCommand::Remove { id, yes } => {
                let id = match_id(&session.active_case()?.documents, &id, "document")?;
                if !confirm("Remove this document reference?", yes)? {
                    return Ok(());
                }
                session.active_case_mut()?.remove_document(&id);
                session.persist()?;
                println!("Removed document");
            }
        }
        Ok(())
    }
}

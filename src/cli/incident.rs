use std::{fs, path::PathBuf};

use base64::Engine as _;
use clap::Parser;
use mietlog::domain::{
    Attachment, EvidenceLink, EvidencePatch, Incident, IncidentPatch, Urgency,
};
use tracing::instrument;

use super::{confirm, match_id, parse_urgency, short, terminal::Colorize, Session};

#[derive(Debug, Parser)]
pub struct IncidentCmd {
    #[command(subcommand)]
    command: IncidentCommand,
}

#[derive(Debug, Parser)]
enum IncidentCommand {
    /// Record a new timeline entry on the active case
    Add {
        /// One-line summary
        summary: String,

        /// When it happened (free text, e.g. "2026-08-20 14:30")
        #[arg(long, default_value = "")]
        at: String,

        /// Categorisation, e.g. "call" or "letter"
        #[arg(long, default_value = "")]
        kind: String,

        /// Multi-line details
        #[arg(long, default_value = "")]
        details: String,

        /// Urgency (open, urgent, resolved)
        #[arg(long, value_parser = parse_urgency)]
        urgency: Option<Urgency>,
    },

    /// List timeline entries of the active case
    List,

    /// Edit a timeline entry
    Edit {
        /// Id (or unique prefix) of the incident
        id: String,

        /// New occurrence date-time text
        #[arg(long)]
        at: Option<String>,

        /// New kind
        #[arg(long)]
        kind: Option<String>,

        /// New summary
        #[arg(long)]
        summary: Option<String>,

        /// New details
        #[arg(long)]
        details: Option<String>,

        /// New urgency (open, urgent, resolved)
        #[arg(long, value_parser = parse_urgency)]
        urgency: Option<Urgency>,
    },

    /// Remove a timeline entry and everything attached to it
    Remove {
        /// Id (or unique prefix) of the incident
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl IncidentCmd {
    #[instrument(skip_all)]
    pub fn run(self, session: &mut Session) -> anyhow::Result<()> {
        match self.command {
            IncidentCommand::Add {
                summary,
                at,
                kind,
                details,
                urgency,
            } => {
                let mut incident = Incident::new(summary);
                incident.occurred = at;
                incident.kind = kind;
                incident.details = details;
                if let Some(urgency) = urgency {
                    incident.urgency = urgency;
                }
                let id = incident.id.clone();
                session.active_case_mut()?.add_incident(incident);
                session.persist()?;
                println!("{} ({})", "Added incident".success(), short(&id).dim());
            }
            IncidentCommand::List => {
                let case = session.active_case()?;
                if case.incidents.is_empty() {
                    println!("No incidents recorded.");
                    return Ok(());
                }
                for incident in &case.incidents {
                    let urgency = match incident.urgency {
                        Urgency::Urgent => incident.urgency.as_str().warning(),
                        Urgency::Open => incident.urgency.as_str().info(),
                        Urgency::Resolved => incident.urgency.as_str().success(),
                    };
                    let extras = match (incident.evidence.len(), incident.attachments.len()) {
                        (0, 0) => String::new(),
                        (e, a) => format!(" ({e} links, {a} files)"),
                    };
                    println!(
                        "{} {} {urgency} {}{extras}",
                        short(&incident.id).dim(),
                        incident.occurred,
                        incident.summary
                    );
                }
            }
            IncidentCommand::Edit {
                id,
                at,
                kind,
                summary,
                details,
                urgency,
            } => {
                let id = match_id(&session.active_case()?.incidents, &id, "incident")?;
                let patch = IncidentPatch {
                    occurred: at,
                    kind,
                    summary,
                    details,
                    urgency,
                };
                session.active_case_mut()?.patch_incident(&id, &patch);
                session.persist()?;
                println!("{}", "Updated incident".success());
            }
            IncidentCommand::Remove { id, yes } => {
                let id = match_id(&session.active_case()?.incidents, &id, "incident")?;
                if !confirm(
                    "Remove this incident and its evidence and attachments?",
                    yes,
                )? {
                    return Ok(());
                }
                session.active_case_mut()?.remove_incident(&id);
                session.persist()?;
                println!("Removed incident");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct EvidenceCmd {
    #[command(subcommand)]
    command: EvidenceCommand,
}

#[derive(Debug, Parser)]
enum EvidenceCommand {
    /// Add an evidence link to an incident
    Add {
        /// Id (or unique prefix) of the incident
        incident: String,

        /// Human-readable label
        label: String,

        /// Where the evidence lives
        url: String,
    },

    /// Edit an evidence link
    Edit {
        /// Id (or unique prefix) of the incident
        incident: String,

        /// Id (or unique prefix) of the link
        id: String,

        /// New label
        #[arg(long)]
        label: Option<String>,

        /// New URL
        #[arg(long)]
        url: Option<String>,
    },

    /// Remove an evidence link from an incident
    Remove {
        /// Id (or unique prefix) of the incident
        incident: String,

        /// Id (or unique prefix) of the link
        id: String,
    },
}

impl EvidenceCmd {
    #[instrument(skip_all)]
    pub fn run(self, session: &mut Session) -> anyhow::Result<()> {
        match self.command {
            EvidenceCommand::Add {
                incident,
                label,
                url,
            } => {
                let incident_id = match_id(&session.active_case()?.incidents, &incident, "incident")?;
                let link = EvidenceLink::new(label, url);
                let id = link.id.clone();
                session
                    .active_case_mut()?
                    .incident_mut(&incident_id)
                    .ok_or_else(|| anyhow::anyhow!("incident vanished during update"))?
                    .add_evidence(link);
                session.persist()?;
                println!("{} ({})", "Added evidence link".success(), short(&id).dim());
            }
            EvidenceCommand::Edit {
                incident,
                id,
                label,
                url,
            } => {
                let incident_id = match_id(&session.active_case()?.incidents, &incident, "incident")?;
                let link_id = {
                    let case = session.active_case()?;
                    let incident = case
                        .incident(&incident_id)
                        .ok_or_else(|| anyhow::anyhow!("incident vanished during update"))?;
                    match_id(&incident.evidence, &id, "evidence link")?
                };
                let patch = EvidencePatch { label, url };
                session
                    .active_case_mut()?
                    .incident_mut(&incident_id)
                    .ok_or_else(|| anyhow::anyhow!("incident vanished during update"))?
                    .patch_evidence(&link_id, &patch);
                session.persist()?;
                println!("{}", "Updated evidence link".success());
            }
            EvidenceCommand::Remove { incident, id } => {
                let incident_id = match_id(&session.active_case()?.incidents, &incident, "incident")?;
                let link_id = {
                    let case = session.active_case()?;
                    let incident = case
                        .incident(&incident_id)
                        .ok_or_else(|| anyhow::anyhow!("incident vanished during update"))?;
                    match_id(&incident.evidence, &id, "evidence link")?
                };
                session
                    .active_case_mut()?
                    .incident_mut(&incident_id)
                    .ok_or_else(|| anyhow::anyhow!("incident vanished during update"))?
                    .remove_evidence(&link_id);
                session.persist()?;
                println!("Removed evidence link");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct AttachCmd {
    #[command(subcommand)]
    command: AttachCommand,
}

#[derive(Debug, Parser)]
enum AttachCommand {
    /// Embed a small file in an incident
    Add {
        /// Id (or unique prefix) of the incident
        incident: String,

        /// File to embed
        path: PathBuf,
    },

    /// Remove an embedded file from an incident
    Remove {
        /// Id (or unique prefix) of the incident
        incident: String,

        /// Id (or unique prefix) of the attachment
        id: String,
    },
}

impl AttachCmd {
    #[instrument(skip_all)]
    pub fn run(self, session: &mut Session) -> anyhow::Result<()> {
        match self.command {
            AttachCommand::Add { incident, path } => {
                let incident_id = match_id(&session.active_case()?.incidents, &incident, "incident")?;

                // Size is checked before the file is read, so an oversized
                // file never makes it into memory, let alone the case file.
                let size = fs::metadata(&path)?.len();
                let limit = session.config().attachment_limit;
                if size > limit {
                    anyhow::bail!(
                        "file is {size} bytes, above the attachment limit of {limit} bytes; \
                         add it as an evidence link instead"
                    );
                }

                let name = path
                    .file_name()
                    .map_or_else(|| "attachment".to_string(), |n| n.to_string_lossy().into_owned());
                let mime = mime_guess::from_path(&path).first_or_octet_stream();
                let bytes = fs::read(&path)?;
                let payload = base64::engine::general_purpose::STANDARD.encode(&bytes);
                let data_url = format!("data:{mime};base64,{payload}");

                let attachment = Attachment::new(name, mime.to_string(), size, data_url);
                let id = attachment.id.clone();
                session
                    .active_case_mut()?
                    .incident_mut(&incident_id)
                    .ok_or_else(|| anyhow::anyhow!("incident vanished during update"))?
                    .add_attachment(attachment);
                session.persist()?;
                println!("{} ({})", "Attached file".success(), short(&id).dim());
            }
            AttachCommand::Remove { incident, id } => {
                let incident_id = match_id(&session.active_case()?.incidents, &incident, "incident")?;
                let attachment_id = {
                    let case = session.active_case()?;
                    let incident = case
                        .incident(&incident_id)
                        .ok_or_else(|| anyhow::anyhow!("incident vanished during update"))?;
                    match_id(&incident.attachments, &id, "attachment")?
                };
                session
                    .active_case_mut()?
                    .incident_mut(&incident_id)
                    .ok_or_else(|| anyhow::anyhow!("incident vanished during update"))?
                    .remove_attachment(&attachment_id);
                session.persist()?;
                println!("Removed attachment");
            }
        }
        Ok(())
    }
}

use clap::Parser;
use mietlog::domain::DefectStatus;
use tracing::instrument;

use super::{
    terminal::{is_narrow, Colorize},
    Session,
};

#[derive(Debug, Parser, Default)]
#[command(about = "Show a summary of the active case")]
pub struct Status {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Status {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, session: &mut Session) -> anyhow::Result<()> {
        let document = session.document();

        if document.cases.is_empty() {
            println!("No cases found yet. Create one with 'miet case new'.");
            return Ok(());
        }

        let Some(case) = document.active_case() else {
            println!("No case selected. Pick one with 'miet case select'.");
            return Ok(());
        };

        let open_defects = case.open_defects().count();
        let resolved_defects = case
            .defects
            .iter()
            .filter(|d| d.status == DefectStatus::Resolved)
            .count();
        let proposed_reduction: f64 = case.open_defects().map(|d| d.impact_percent).sum();
        let attachments: usize = case.incidents.iter().map(|i| i.attachments.len()).sum();

        match self.output {
            OutputFormat::Json => Self::output_json(
                case,
                open_defects,
                resolved_defects,
                proposed_reduction,
                attachments,
            )?,
            OutputFormat::Table => {
                if self.quiet {
                    Self::output_quiet(case, open_defects, proposed_reduction);
                } else {
                    Self::output_table(
                        case,
                        open_defects,
                        resolved_defects,
                        proposed_reduction,
                        attachments,
                    );
                }
            }
        }

        Ok(())
    }

    fn output_json(
        case: &mietlog::Case,
        open_defects: usize,
        resolved_defects: usize,
        proposed_reduction: f64,
        attachments: usize,
    ) -> anyhow::Result<()> {
        use serde_json::json;

        let output = json!({
            "case": {
                "id": case.id,
                "title": case.title,
                "warmRent": case.warm_rent,
            },
            "defects": {
                "open": open_defects,
                "resolved": resolved_defects,
            },
            "incidents": case.incidents.len(),
            "documents": case.documents.len(),
            "letters": case.letters.len(),
            "attachments": attachments,
            "proposedReductionPercent": proposed_reduction,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_quiet(case: &mietlog::Case, open_defects: usize, proposed_reduction: f64) {
        println!(
            "case={} open_defects={open_defects} incidents={} reduction={proposed_reduction}%",
            case.title,
            case.incidents.len()
        );
    }

    fn output_table(
        case: &mietlog::Case,
        open_defects: usize,
        resolved_defects: usize,
        proposed_reduction: f64,
        attachments: usize,
    ) {
        let narrow = is_narrow();

        println!("{}", case.title);
        println!("{}", "──────────────────".dim());

        if !case.address.is_empty() {
            println!("{} {}", "Address:".dim(), case.address);
        }
        if case.warm_rent > 0.0 {
            println!("{} {:.2} EUR", "Warm rent:".dim(), case.warm_rent);
        } else {
            println!("{} {}", "Warm rent:".dim(), "not set".warning());
        }

        println!();

        if narrow {
            println!("Defects open: {open_defects}");
            println!("Defects resolved: {resolved_defects}");
            println!("Incidents: {}", case.incidents.len());
            println!("Documents: {}", case.documents.len());
            println!("Letters: {}", case.letters.len());
            println!("Attachments: {attachments}");
        } else {
            println!("{:<12} {:<6}", "Kind", "Count");
            println!("{:<12} {:<6}", "Defects", format!("{open_defects} open, {resolved_defects} resolved"));
            println!("{:<12} {:<6}", "Incidents", case.incidents.len());
            println!("{:<12} {:<6}", "Documents", case.documents.len());
            println!("{:<12} {:<6}", "Letters", case.letters.len());
            println!("{:<12} {:<6}", "Attachments", attachments);
        }

        println!();

        if open_defects == 0 {
            println!("Open defects: {} ✅", "0".success());
        } else {
            println!(
                "Proposed rent reduction: {}",
                format!("{proposed_reduction}%").warning()
            );
            println!(
                "{}",
                "Run 'miet letter generate rent-reduction' to draft a notice.".dim()
            );
        }
    }
}

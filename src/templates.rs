//! Letter drafting from case data.
//!
//! Rendering is a pure read of the case's defects at generation time:
//! later defect edits never retroactively change an already generated
//! letter. Each body carries a German section and an English section,
//! separated by a divider line; every referenced field that is absent is
//! substituted with a bracketed prompt instead of blank text.

use std::fmt::Write as _;

use crate::domain::{Case, Defect, EntityId, Letter, TemplateKind};

/// Divider between the two language sections of a letter body.
const DIVIDER: &str = "----------------------------------------";

/// A rendered subject and body, not yet attached to a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    /// Subject line.
    pub subject: String,
    /// Bilingual letter body.
    pub body: String,
}

/// Renders the named template from the case's current data.
#[must_use]
pub fn render(kind: TemplateKind, case: &Case) -> Draft {
    match kind {
        TemplateKind::RepairRequest => repair_request(case),
        TemplateKind::RentReduction => rent_reduction(case),
    }
}

/// The display title of a template.
#[must_use]
pub const fn title(kind: TemplateKind) -> &'static str {
    match kind {
        TemplateKind::RepairRequest => "Mängelanzeige / Repair request",
        TemplateKind::RentReduction => "Mietminderung / Rent reduction notice",
    }
}

/// Renders the template and appends the result to the case as a brand-new
/// letter. Repeat invocations append again; existing letters are never
/// overwritten.
pub fn generate(case: &mut Case, kind: TemplateKind) -> EntityId {
    let draft = render(kind, case);
    let letter = Letter::new(kind, title(kind), draft.subject, draft.body);
    let id = letter.id.clone();
    case.add_letter(letter);
    id
}

fn repair_request(case: &Case) -> Draft {
    let address_de = placeholder(&case.address, "[Adresse der Mietwohnung]");
    let address_en = placeholder(&case.address, "[address of rental unit]");
    let landlord_de = placeholder(&case.landlord, "[Vermieter/Hausverwaltung]");
    let landlord_en = placeholder(&case.landlord, "[Landlord/Representative]");
    let tenant_de = placeholder(&case.tenant, "[Name Mieter/in]");
    let tenant_en = placeholder(&case.tenant, "[Tenant name]");

    let defects_de = defect_list(case, Language::German, false);
    let defects_en = defect_list(case, Language::English, false);

    let subject = format!("Mängelanzeige / Repair request – {address_en}");
    let body = format!(
        "An: {landlord_de}\n\
         \n\
         Sehr geehrte Damen und Herren,\n\
         \n\
         hiermit zeige ich Ihnen folgende Mängel in der Mietwohnung {address_de} an:\n\
         \n\
         {defects_de}\n\
         \n\
         Ich bitte Sie, die Mängel innerhalb von 14 Tagen beheben zu lassen.\n\
         \n\
         Mit freundlichen Grüßen\n\
         {tenant_de}\n\
         \n\
         {DIVIDER}\n\
         \n\
         To: {landlord_en}\n\
         \n\
         Dear Sir or Madam,\n\
         \n\
         I hereby notify you of the following defects in the rental unit at {address_en}:\n\
         \n\
         {defects_en}\n\
         \n\
         Please arrange for these defects to be remedied within 14 days.\n\
         \n\
         Kind regards\n\
         {tenant_en}"
    );

    Draft { subject, body }
}

fn rent_reduction(case: &Case) -> Draft {
    let address_de = placeholder(&case.address, "[Adresse der Mietwohnung]");
    let address_en = placeholder(&case.address, "[address of rental unit]");
    let landlord_de = placeholder(&case.landlord, "[Vermieter/Hausverwaltung]");
    let landlord_en = placeholder(&case.landlord, "[Landlord/Representative]");
    let tenant_de = placeholder(&case.tenant, "[Name Mieter/in]");
    let tenant_en = placeholder(&case.tenant, "[Tenant name]");

    let defects_de = defect_list(case, Language::German, true);
    let defects_en = defect_list(case, Language::English, true);

    // The displayed total is deliberately uncapped; only the amount
    // computation clamps it so the reduced rent never goes negative.
    let total: f64 = case.open_defects().map(|d| d.impact_percent).sum();
    let reduced = round2(case.warm_rent * (1.0 - total.min(100.0) / 100.0));

    let (amount_de, amount_en) = if case.warm_rent == 0.0 {
        ("[Betrag]".to_string(), "[amount]".to_string())
    } else {
        (
            format!("{reduced:.2} EUR (statt {:.2} EUR)", case.warm_rent),
            format!("{reduced:.2} EUR (instead of {:.2} EUR)", case.warm_rent),
        )
    };
    let total_text = format_percent(total);

    let subject = format!("Mietminderung / Rent reduction notice – {address_en}");
    let body = format!(
        "An: {landlord_de}\n\
         \n\
         Sehr geehrte Damen und Herren,\n\
         \n\
         aufgrund der folgenden Mängel mindere ich die Miete für die Wohnung {address_de}:\n\
         \n\
         {defects_de}\n\
         \n\
         Gesamte vorgeschlagene Minderung: {total_text}%\n\
         Geminderte Warmmiete: {amount_de}\n\
         \n\
         Die Minderung gilt ab sofort bis zur vollständigen Beseitigung der Mängel.\n\
         \n\
         Mit freundlichen Grüßen\n\
         {tenant_de}\n\
         \n\
         {DIVIDER}\n\
         \n\
         To: {landlord_en}\n\
         \n\
         Dear Sir or Madam,\n\
         \n\
         due to the following defects I am reducing the rent for the unit at {address_en}:\n\
         \n\
         {defects_en}\n\
         \n\
         Total proposed reduction: {total_text}%\n\
         Reduced warm rent: {amount_en}\n\
         \n\
         The reduction applies from today until the defects are fully remedied.\n\
         \n\
         Kind regards\n\
         {tenant_en}"
    );

    Draft { subject, body }
}

#[derive(Clone, Copy)]
enum Language {
    German,
    English,
}

/// Enumerates the open defects, numbered, one per line.
///
/// Line shape: `<n>. <title> (Room: <room>) — since <date>`, with the room
/// clause omitted when empty and a bracketed prompt for a missing date.
/// With no open defects the whole list collapses to a single prompt.
fn defect_list(case: &Case, language: Language, with_impact: bool) -> String {
    let mut lines = String::new();
    for (index, defect) in case.open_defects().enumerate() {
        if index > 0 {
            lines.push('\n');
        }
        let _ = write!(lines, "{}. {}", index + 1, defect_line(defect, language));
        if with_impact {
            let impact = format_percent(defect.impact_percent);
            let clause = match language {
                Language::German => format!(" – vorgeschlagene Minderung: {impact}%"),
                Language::English => format!(" — proposed reduction: {impact}%"),
            };
            lines.push_str(&clause);
        }
    }

    if lines.is_empty() {
        match language {
            Language::German => "[Mängel hier auflisten]".to_string(),
            Language::English => "[List defects here]".to_string(),
        }
    } else {
        lines
    }
}

fn defect_line(defect: &Defect, language: Language) -> String {
    let title = placeholder(&defect.title, "[Mangel]");
    match language {
        Language::German => {
            let since = placeholder(&defect.started, "[Datum]");
            if defect.room.trim().is_empty() {
                format!("{title} – seit {since}")
            } else {
                format!("{title} (Raum: {}) – seit {since}", defect.room)
            }
        }
        Language::English => {
            let since = placeholder(&defect.started, "[date]");
            if defect.room.trim().is_empty() {
                format!("{title} — since {since}")
            } else {
                format!("{title} (Room: {}) — since {since}", defect.room)
            }
        }
    }
}

/// Substitutes a bracketed prompt for an empty field.
fn placeholder<'a>(value: &'a str, prompt: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() { prompt } else { trimmed }
}

/// Formats a percentage without trailing `.0`, keeping fractional
/// proposals like `12.5` intact.
fn format_percent(value: f64) -> String {
    if (value - value.trunc()).abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Defect, DefectStatus};

    fn furnished_case() -> Case {
        let mut case = Case::new("Hauptstr. 5");
        case.address = "Hauptstr. 5, 10115 Berlin".to_string();
        case.landlord = "Hausverwaltung Müller".to_string();
        case.tenant = "Erika Mustermann".to_string();
        case.warm_rent = 1000.0;
        case
    }

    fn open_defect(title: &str, room: &str, impact: f64) -> Defect {
        let mut defect = Defect::new(title);
        defect.room = room.to_string();
        defect.started = "2026-01-10".to_string();
        defect.impact_percent = impact;
        defect
    }

    #[test]
    fn empty_case_renders_placeholders_not_blanks() {
        let case = Case::new("untitled");
        let draft = render(TemplateKind::RepairRequest, &case);

        assert!(draft.body.contains("[Landlord/Representative]"));
        assert!(draft.body.contains("[List defects here]"));
        assert!(draft.body.contains("[Tenant name]"));
        assert!(draft.subject.contains("[address of rental unit]"));
        assert!(!draft.body.contains("undefined"));
        assert!(!draft.body.contains("null"));
    }

    #[test]
    fn lists_open_defects_numbered_with_room_and_date() {
        let mut case = furnished_case();
        case.add_defect(open_defect("Broken heating", "Living room", 20.0));
        case.add_defect(open_defect("Mould", "Bathroom", 10.0));

        let draft = render(TemplateKind::RepairRequest, &case);
        assert!(draft.body.contains("1. Mould (Room: Bathroom) — since 2026-01-10"));
        assert!(
            draft.body.contains("2. Broken heating (Room: Living room) — since 2026-01-10")
        );
    }

    #[test]
    fn room_clause_is_omitted_when_empty_and_missing_date_prompts() {
        let mut case = furnished_case();
        let mut defect = Defect::new("Dripping tap");
        defect.impact_percent = 5.0;
        case.add_defect(defect);

        let draft = render(TemplateKind::RepairRequest, &case);
        assert!(draft.body.contains("1. Dripping tap — since [date]"));
        assert!(!draft.body.contains("(Room: )"));
    }

    #[test]
    fn resolved_defects_are_excluded() {
        let mut case = furnished_case();
        case.add_defect(open_defect("Open one", "", 10.0));
        let mut fixed = open_defect("Fixed one", "", 10.0);
        fixed.status = DefectStatus::Resolved;
        case.add_defect(fixed);

        let draft = render(TemplateKind::RepairRequest, &case);
        assert!(draft.body.contains("Open one"));
        assert!(!draft.body.contains("Fixed one"));
    }

    #[test]
    fn reduction_caps_the_amount_but_not_the_displayed_total() {
        let mut case = furnished_case();
        case.add_defect(open_defect("Heating out", "", 60.0));
        case.add_defect(open_defect("Water damage", "", 70.0));

        let draft = render(TemplateKind::RentReduction, &case);
        assert!(draft.body.contains("Total proposed reduction: 130%"));
        assert!(draft.body.contains("Reduced warm rent: 0.00 EUR"));
    }

    #[test]
    fn reduction_math_rounds_to_two_decimals() {
        let mut case = furnished_case();
        case.warm_rent = 876.43;
        case.add_defect(open_defect("Mould", "Bathroom", 15.0));

        let draft = render(TemplateKind::RentReduction, &case);
        // 876.43 * 0.85 = 744.9655 -> 744.97
        assert!(draft.body.contains("Reduced warm rent: 744.97 EUR"));
        assert!(draft.body.contains("proposed reduction: 15%"));
    }

    #[test]
    fn unset_warm_rent_renders_an_amount_placeholder() {
        let mut case = furnished_case();
        case.warm_rent = 0.0;
        case.add_defect(open_defect("Mould", "", 10.0));

        let draft = render(TemplateKind::RentReduction, &case);
        assert!(draft.body.contains("Reduced warm rent: [amount]"));
        assert!(draft.body.contains("Geminderte Warmmiete: [Betrag]"));
        assert!(!draft.body.contains("0.00 EUR"));
    }

    #[test]
    fn fractional_percentages_are_kept() {
        let mut case = furnished_case();
        case.add_defect(open_defect("Draft", "", 12.5));

        let draft = render(TemplateKind::RentReduction, &case);
        assert!(draft.body.contains("proposed reduction: 12.5%"));
        assert!(draft.body.contains("Total proposed reduction: 12.5%"));
    }

    #[test]
    fn body_has_both_language_sections() {
        let case = furnished_case();
        let draft = render(TemplateKind::RepairRequest, &case);

        let sections: Vec<_> = draft.body.split(DIVIDER).collect();
        assert_eq!(sections.len(), 2);
        assert!(sections[0].contains("Sehr geehrte Damen und Herren"));
        assert!(sections[1].contains("Dear Sir or Madam"));
    }

    #[test]
    fn generate_appends_a_new_letter_each_time() {
        let mut case = furnished_case();
        let first = generate(&mut case, TemplateKind::RepairRequest);
        let second = generate(&mut case, TemplateKind::RepairRequest);

        assert_ne!(first, second);
        assert_eq!(case.letters.len(), 2);
        assert_eq!(case.letters[0].id, second);
        assert_eq!(case.letters[1].id, first);
    }

    #[test]
    fn rendering_is_a_snapshot_of_generation_time() {
        let mut case = furnished_case();
        case.add_defect(open_defect("Mould", "Bathroom", 10.0));
        let id = generate(&mut case, TemplateKind::RepairRequest);
        let body_before = case.letter(&id).unwrap().body.clone();

        let defect_id = case.defects[0].id.clone();
        case.patch_defect(
            &defect_id,
            &crate::domain::DefectPatch {
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(case.letter(&id).unwrap().body, body_before);
    }
}

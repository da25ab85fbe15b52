//! Printable HTML receipt for a successful submission.
//!
//! Section order is fixed: case information, personal information, contact,
//! academic background, submitted documents, important notices, support
//! contact. Every applicant-supplied value is HTML-escaped.

use super::enrolment::EnrollmentCase;
use super::submission::SubmissionResult;

const SUPPORT_EMAIL: &str = "inscriptions@university.com";
const SUPPORT_PHONE: &str = "+33 1 23 45 67 89";
const SUPPORT_HOURS: &str = "Lundi - Vendredi: 9h00 - 17h00";

const NOTICES: [(&str, &str); 4] = [
    (
        "Délai de traitement",
        "Votre dossier sera traité dans un délai de 24 à 48 heures ouvrées.",
    ),
    (
        "Notifications",
        "Vous recevrez un email et un SMS à chaque étape du traitement.",
    ),
    (
        "Suivi",
        "Vous pouvez suivre l'avancement de votre dossier sur votre espace personnel.",
    ),
    (
        "Contact",
        "En cas de question, contactez le service des inscriptions.",
    ),
];

const STYLE: &str = concat!(
    "body{font-family:Arial,sans-serif;max-width:800px;margin:0 auto;padding:20px;color:#333}",
    ".header{text-align:center;border-bottom:3px solid #2563eb;padding-bottom:20px;",
    "margin-bottom:30px}",
    ".section{margin-bottom:25px}",
    ".section-title{font-weight:bold;color:#1e40af;margin-bottom:10px}",
    ".info-row{display:flex;justify-content:space-between;padding:5px 0;",
    "border-bottom:1px solid #e5e7eb}",
    ".label{font-weight:600}",
    ".important{background:#fef3c7;border:1px solid #f59e0b;padding:15px;border-radius:8px}",
    ".footer{margin-top:40px;text-align:center;font-size:12px;color:#6b7280}",
);

/// Rendered receipt ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Suggested file name, `recepisse-inscription-<reference>.html`.
    pub file_name: String,
    /// Complete HTML document.
    pub html: String,
}

/// Escape `value` for inclusion in HTML text or attribute content.
///
/// # Examples
/// ```
/// use portal::domain::escape_html;
///
/// assert_eq!(escape_html("<b>O'Neil & Co</b>"), "&lt;b&gt;O&#39;Neil &amp; Co&lt;/b&gt;");
/// ```
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn or_missing<'a>(value: Option<&'a str>, missing: &'a str) -> &'a str {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => missing,
    }
}

struct Sections {
    html: String,
}

impl Sections {
    fn open(&mut self, title: &str) {
        self.html.push_str(&format!(
            "<div class=\"section\"><div class=\"section-title\">{}</div>",
            escape_html(title)
        ));
    }

    fn row(&mut self, label: &str, value: &str) {
        self.html.push_str(&format!(
            "<div class=\"info-row\"><span class=\"label\">{}:</span>\
             <span class=\"value\">{}</span></div>",
            escape_html(label),
            escape_html(value)
        ));
    }

    fn close(&mut self) {
        self.html.push_str("</div>");
    }
}

/// Render the receipt for `case`.
///
/// Returns `None` unless `result` is a success carrying a case reference.
pub fn render_receipt(case: &EnrollmentCase, result: &SubmissionResult) -> Option<Receipt> {
    if !result.is_success() {
        return None;
    }
    let reference = result.case_reference.as_ref()?;
    let date = result.timestamp.format("%d/%m/%Y").to_string();
    let time = result.timestamp.format("%H:%M:%S").to_string();

    let mut out = Sections {
        html: String::with_capacity(8 * 1024),
    };
    out.html.push_str(&format!(
        "<!DOCTYPE html><html lang=\"fr\"><head><meta charset=\"UTF-8\">\
         <title>Récépissé d'inscription - {reference}</title><style>{STYLE}</style></head><body>\
         <div class=\"header\"><div class=\"logo\">UniPortal</div>\
         <div class=\"title\">RÉCÉPISSÉ D'INSCRIPTION</div></div>",
        reference = escape_html(reference.as_str()),
    ));

    out.open("Informations du dossier");
    out.row("Numéro de dossier", reference.as_str());
    out.row("Date de soumission", &date);
    out.row("Heure de soumission", &time);
    out.row("Statut", "Soumis avec succès");
    out.close();

    let given_names = case.given_names_joined(", ");
    let birth_date = case
        .birth_date
        .map(|date| date.format("%d/%m/%Y").to_string());
    out.open("Informations personnelles");
    out.row("Nom", or_missing(case.family_name.as_deref(), "Non renseigné"));
    out.row("Prénom(s)", or_missing(Some(&given_names), "Non renseigné"));
    out.row("Sexe", or_missing(case.sex.map(|sex| sex.label()), "Non renseigné"));
    out.row("Date de naissance", or_missing(birth_date.as_deref(), "Non renseignée"));
    out.row("Nationalité", or_missing(case.nationality.as_deref(), "Non renseignée"));
    out.row(
        "Pièce d'identité",
        or_missing(case.identity_document.map(|kind| kind.label()), "Non renseignée"),
    );
    out.close();

    let address = format!(
        "{}, {} {}",
        or_missing(case.address.as_deref(), "Non renseignée"),
        case.city.as_deref().unwrap_or_default(),
        case.postal_code.as_deref().unwrap_or_default(),
    );
    out.open("Coordonnées");
    out.row("Email", or_missing(case.email.as_deref(), "Non renseigné"));
    out.row("Téléphone", or_missing(case.phone.as_deref(), "Non renseigné"));
    out.row("Adresse", address.trim_end());
    out.row("Pays", or_missing(case.country.as_deref(), "Non renseigné"));
    out.close();

    let formation_count = case.formations.as_ref().map_or(0, Vec::len);
    out.open("Parcours académique");
    out.row(
        "Dernier établissement",
        or_missing(case.last_institution.as_deref(), "Non renseigné"),
    );
    out.row("Nombre de formations", &format!("{formation_count} formation(s)"));
    out.close();

    out.open("Documents soumis");
    let validated: Vec<_> = case
        .documents
        .iter()
        .flatten()
        .filter(|record| record.is_validated())
        .collect();
    if validated.is_empty() {
        out.html.push_str("<div>Aucun document</div>");
    }
    for record in validated {
        out.row(record.kind.label(), "Validé");
    }
    out.close();

    out.html.push_str(
        "<div class=\"important\">\
         <div class=\"important-title\">Informations importantes</div><ul>",
    );
    for (title, body) in NOTICES {
        out.html.push_str(&format!(
            "<li><strong>{}:</strong> {}</li>",
            escape_html(title),
            escape_html(body)
        ));
    }
    out.html.push_str("</ul></div>");

    out.open("Contact");
    out.row("Service des inscriptions", SUPPORT_EMAIL);
    out.row("Téléphone", SUPPORT_PHONE);
    out.row("Horaires", SUPPORT_HOURS);
    out.close();

    out.html.push_str(&format!(
        "<div class=\"footer\">\
         <p>Ce document a été généré automatiquement le {date} à {time}</p>\
         <p>Conservez précieusement ce récépissé jusqu'à la validation définitive \
         de votre inscription.</p>\
         <p>UniPortal - Plateforme d'inscription universitaire</p></div></body></html>",
    ));

    Some(Receipt {
        file_name: format!("recepisse-inscription-{reference}.html"),
        html: out.html,
    })
}

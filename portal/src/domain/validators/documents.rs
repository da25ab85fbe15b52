//! Documents step.

use crate::domain::{
    DocumentKind, DocumentSlots, DocumentStatus, ValidationErrorSet, ValidationReport,
};

/// Every required kind must hold a verified upload; optional kinds are ignored.
pub fn validate_documents(slots: &DocumentSlots) -> ValidationReport {
    let mut errors = ValidationErrorSet::new();
    for kind in DocumentKind::ALL.into_iter().filter(|kind| kind.is_required()) {
        let message = match slots.status(kind) {
            DocumentStatus::Success => continue,
            DocumentStatus::Pending => "document is required",
            DocumentStatus::Uploading { .. } => "document upload is still in progress",
            DocumentStatus::Error { .. } => "document must be uploaded again",
        };
        errors.insert(kind.as_str(), message);
    }
    ValidationReport::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SelectedFile;
    use rstest::rstest;

    fn verified(slots: &mut DocumentSlots, kind: DocumentKind) {
        let name = match kind.accepted_extensions().first() {
            Some(extension) => format!("file{extension}"),
            None => panic!("every kind accepts at least one extension"),
        };
        let ticket = slots
            .begin_upload(kind, SelectedFile::new(name, 1_000))
            .expect("accepted file");
        assert!(slots.resolve(kind, ticket.attempt, Ok(())));
    }

    #[rstest]
    fn all_required_verified_passes_without_optional() {
        let mut slots = DocumentSlots::new();
        for kind in DocumentKind::ALL.into_iter().filter(|kind| kind.is_required()) {
            verified(&mut slots, kind);
        }
        assert!(validate_documents(&slots).passed());
    }

    #[rstest]
    fn in_flight_and_failed_uploads_block() {
        let mut slots = DocumentSlots::new();
        verified(&mut slots, DocumentKind::Baccalaureate);
        slots
            .begin_upload(DocumentKind::IdCardFront, SelectedFile::new("front.png", 10))
            .expect("accepted file");
        slots
            .begin_upload(DocumentKind::IdCardBack, SelectedFile::new("back.gif", 10))
            .expect_err("gif is not accepted");

        let report = validate_documents(&slots);
        assert_eq!(
            report.errors.get("id_card_front"),
            Some("document upload is still in progress")
        );
        assert_eq!(report.errors.get("id_card_back"), Some("document must be uploaded again"));
        assert_eq!(report.errors.get("identity_photo"), Some("document is required"));
        assert!(!report.errors.contains("baccalaureate"));
        assert!(!report.errors.contains("higher_diplomas"));
    }
}

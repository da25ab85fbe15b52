//! Seeded applications shown on the admin board.

use chrono::NaiveDate;

use crate::domain::{ApplicationStatus, ApplicationSummary};

struct Seed {
    reference: &'static str,
    family_name: &'static str,
    given_name: &'static str,
    phone: &'static str,
    status: ApplicationStatus,
    submitted_day: u32,
    progress: u8,
    documents: (u8, u8),
    level: &'static str,
    specialisation: &'static str,
}

const SEEDS: [Seed; 5] = [
    Seed {
        reference: "INS-2024-ABC123",
        family_name: "Martin",
        given_name: "Jean",
        phone: "+33 1 23 45 67 89",
        status: ApplicationStatus::Pending,
        submitted_day: 15,
        progress: 75,
        documents: (5, 4),
        level: "Licence 3",
        specialisation: "Informatique",
    },
    Seed {
        reference: "INS-2024-DEF456",
        family_name: "Dubois",
        given_name: "Marie",
        phone: "+33 1 98 76 54 32",
        status: ApplicationStatus::Approved,
        submitted_day: 14,
        progress: 100,
        documents: (6, 6),
        level: "Master 2",
        specialisation: "Analyse de données",
    },
    Seed {
        reference: "INS-2024-GHI789",
        family_name: "Leroy",
        given_name: "Pierre",
        phone: "+33 1 11 22 33 44",
        status: ApplicationStatus::Rejected,
        submitted_day: 13,
        progress: 60,
        documents: (4, 2),
        level: "Licence 1",
        specialisation: "Mathématiques",
    },
    Seed {
        reference: "INS-2024-JKL012",
        family_name: "Zitouni",
        given_name: "Sarah",
        phone: "+33 1 55 66 77 88",
        status: ApplicationStatus::Approved,
        submitted_day: 12,
        progress: 100,
        documents: (5, 5),
        level: "Licence 2",
        specialisation: "Physique",
    },
    Seed {
        reference: "INS-2024-MNO345",
        family_name: "Hamii",
        given_name: "Sarahh",
        phone: "+33 1 77 88 99 00",
        status: ApplicationStatus::Approved,
        submitted_day: 11,
        progress: 100,
        documents: (6, 6),
        level: "Master 2",
        specialisation: "Intelligence Artificielle",
    },
];

/// The five applications seeded on the admin board, newest first.
pub fn fixture_applications() -> Vec<ApplicationSummary> {
    SEEDS
        .iter()
        .filter_map(|seed| {
            Some(ApplicationSummary {
                reference: seed.reference.to_owned(),
                family_name: seed.family_name.to_owned(),
                given_name: seed.given_name.to_owned(),
                email: format!(
                    "{}.{}@email.com",
                    seed.given_name.to_lowercase(),
                    seed.family_name.to_lowercase()
                ),
                phone: seed.phone.to_owned(),
                status: seed.status,
                submitted_on: NaiveDate::from_ymd_opt(2024, 1, seed.submitted_day)?,
                progress: seed.progress,
                documents: seed.documents.0,
                documents_validated: seed.documents.1,
                level: seed.level.to_owned(),
                specialisation: seed.specialisation.to_owned(),
            })
        })
        .collect()
}

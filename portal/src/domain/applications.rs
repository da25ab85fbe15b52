//! Admin board over submitted applications.
//!
//! The board holds summaries in memory and answers search, status filter and
//! pagination queries. Status changes replace the summary's status in place.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::error::DomainError;

/// Error returned when a status or filter name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown application status: {0}")]
pub struct UnknownStatus(String);

/// Review status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    /// Awaiting review.
    Pending,
    /// Accepted by an administrator.
    Approved,
    /// Refused by an administrator.
    Rejected,
}

impl ApplicationStatus {
    /// Lower-case name used in filters and output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// Status filter applied by the board.
///
/// Parses from `all` or a status name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every status.
    #[default]
    All,
    /// One status only.
    Only(ApplicationStatus),
}

impl StatusFilter {
    fn admits(self, status: ApplicationStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// One row of the admin board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    /// Case reference, `INS-<year>-<suffix>`.
    pub reference: String,
    /// Applicant family name.
    pub family_name: String,
    /// Applicant first given name.
    pub given_name: String,
    /// Applicant email.
    pub email: String,
    /// Applicant phone.
    pub phone: String,
    /// Review status.
    pub status: ApplicationStatus,
    /// Submission date.
    pub submitted_on: NaiveDate,
    /// Completion percentage of the file.
    pub progress: u8,
    /// Documents submitted.
    pub documents: u8,
    /// Documents already validated.
    pub documents_validated: u8,
    /// Requested study level.
    pub level: String,
    /// Requested specialisation.
    pub specialisation: String,
}

impl ApplicationSummary {
    fn matches(&self, needle: &str) -> bool {
        [
            &self.family_name,
            &self.given_name,
            &self.reference,
            &self.email,
        ]
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Search, filter and page selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationQuery {
    /// Case-insensitive substring; blank matches everything.
    pub search: String,
    /// Status restriction.
    pub status: StatusFilter,
    /// 1-based page number.
    pub page: usize,
    /// Page size; 0 is treated as 1.
    pub per_page: usize,
}

impl Default for ApplicationQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: StatusFilter::All,
            page: 1,
            per_page: 10,
        }
    }
}

/// Page of matching applications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationPage {
    /// Rows on this page.
    pub items: Vec<ApplicationSummary>,
    /// 1-based page number actually served.
    pub page: usize,
    /// Pages available for the query.
    pub total_pages: usize,
    /// Rows matching the query across all pages.
    pub total_items: usize,
}

/// Application counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Every application.
    pub total: usize,
    /// Pending applications.
    pub pending: usize,
    /// Approved applications.
    pub approved: usize,
    /// Rejected applications.
    pub rejected: usize,
}

/// In-memory admin board.
#[derive(Debug, Clone, Default)]
pub struct ApplicationBoard {
    applications: Vec<ApplicationSummary>,
}

impl ApplicationBoard {
    /// Board over `applications`, in display order.
    pub fn new(applications: Vec<ApplicationSummary>) -> Self {
        Self { applications }
    }

    /// Applications admitted by `query`'s search and status filter, in board
    /// order.
    pub fn filter(&self, query: &ApplicationQuery) -> Vec<&ApplicationSummary> {
        let needle = query.search.trim().to_lowercase();
        self.applications
            .iter()
            .filter(|app| query.status.admits(app.status))
            .filter(|app| needle.is_empty() || app.matches(&needle))
            .collect()
    }

    /// Page `query.page` of the filtered applications.
    ///
    /// Page numbers below 1 are treated as 1; pages past the end are empty.
    pub fn page(&self, query: &ApplicationQuery) -> ApplicationPage {
        let matching = self.filter(query);
        let per_page = query.per_page.max(1);
        let page = query.page.max(1);
        let total_items = matching.len();
        let items = matching
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .cloned()
            .collect();
        ApplicationPage {
            items,
            page,
            total_pages: total_items.div_ceil(per_page),
            total_items,
        }
    }

    /// Change the status of the application with `reference`.
    pub fn set_status(
        &mut self,
        reference: &str,
        status: ApplicationStatus,
    ) -> Result<(), DomainError> {
        let application = self
            .applications
            .iter_mut()
            .find(|app| app.reference == reference)
            .ok_or_else(|| {
                DomainError::not_found(format!("no application with reference {reference}"))
            })?;
        application.status = status;
        Ok(())
    }

    /// Application with `reference`.
    pub fn get(&self, reference: &str) -> Option<&ApplicationSummary> {
        self.applications.iter().find(|app| app.reference == reference)
    }

    /// Applications per status.
    pub fn counts(&self) -> StatusCounts {
        self.applications
            .iter()
            .fold(StatusCounts::default(), |mut counts, app| {
                counts.total += 1;
                match app.status {
                    ApplicationStatus::Pending => counts.pending += 1,
                    ApplicationStatus::Approved => counts.approved += 1,
                    ApplicationStatus::Rejected => counts.rejected += 1,
                }
                counts
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::outbound::fixtures::fixture_applications;
    use rstest::{fixture, rstest};

    #[fixture]
    fn board() -> ApplicationBoard {
        ApplicationBoard::new(fixture_applications())
    }

    #[rstest]
    #[case("martin", 1)]
    #[case("SARAH", 2)]
    #[case("ins-2024-def", 1)]
    #[case("@email.com", 5)]
    #[case("   ", 5)]
    #[case("nobody", 0)]
    fn search_is_case_insensitive(
        board: ApplicationBoard,
        #[case] search: &str,
        #[case] expected: usize,
    ) {
        let query = ApplicationQuery {
            search: search.to_owned(),
            ..ApplicationQuery::default()
        };
        assert_eq!(board.filter(&query).len(), expected);
    }

    #[rstest]
    fn status_filter_combines_with_search(board: ApplicationBoard) {
        let query = ApplicationQuery {
            search: "sarah".to_owned(),
            status: "approved".parse().expect("known filter"),
            ..ApplicationQuery::default()
        };
        let references: Vec<_> = board
            .filter(&query)
            .iter()
            .map(|app| app.reference.as_str())
            .collect();
        assert_eq!(references, vec!["INS-2024-JKL012", "INS-2024-MNO345"]);
    }

    #[rstest]
    #[case(1, 2, 2)]
    #[case(3, 2, 1)]
    #[case(4, 2, 0)]
    #[case(0, 2, 2)]
    fn pages_are_one_based(
        board: ApplicationBoard,
        #[case] page: usize,
        #[case] per_page: usize,
        #[case] expected: usize,
    ) {
        let query = ApplicationQuery {
            page,
            per_page,
            ..ApplicationQuery::default()
        };
        let result = board.page(&query);
        assert_eq!(result.items.len(), expected);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.total_items, 5);
    }

    #[rstest]
    fn status_change_updates_counts(mut board: ApplicationBoard) {
        assert_eq!(
            board.counts(),
            StatusCounts {
                total: 5,
                pending: 1,
                approved: 3,
                rejected: 1
            }
        );
        board
            .set_status("INS-2024-ABC123", ApplicationStatus::Approved)
            .expect("known reference");
        assert_eq!(board.counts().approved, 4);
        assert_eq!(board.counts().pending, 0);
    }

    #[rstest]
    fn unknown_reference_is_not_found(mut board: ApplicationBoard) {
        let err = board
            .set_status("INS-2024-XXXXXX", ApplicationStatus::Rejected)
            .expect_err("unknown reference");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    fn unknown_status_filter_is_rejected() {
        let err = "archived".parse::<StatusFilter>().expect_err("unknown filter");
        assert_eq!(err.to_string(), "unknown application status: archived");
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
    }
}

//! Contact step helpers: simulated email and phone verification, and the
//! address lookup that fills address, city and postal code at once.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use regex::Regex;
use tracing::{debug, info};

use super::enrolment::ContactDraft;
use super::ports::Sleeper;
use super::validators::{is_french_phone, is_well_formed_email};

/// Cities offered for every address query, with their postal codes.
pub const SUGGESTED_CITIES: [(&str, &str); 4] = [
    ("Paris", "75001"),
    ("Lyon", "69000"),
    ("Marseille", "13000"),
    ("Toulouse", "31000"),
];

/// Queries of this many characters or fewer get no suggestions.
pub const MIN_QUERY_EXCLUSIVE: usize = 3;

static CITY_POSTAL_RE: OnceLock<Regex> = OnceLock::new();

fn city_postal_regex() -> &'static Regex {
    CITY_POSTAL_RE.get_or_init(|| {
        Regex::new(r"^(.+)\s([0-9]{5})$")
            .unwrap_or_else(|error| panic!("city regex failed to compile: {error}"))
    })
}

/// Suggestions for an address query, `"<query>, <city> <postal code>"`.
///
/// # Examples
/// ```
/// use portal::domain::address_suggestions;
///
/// assert!(address_suggestions("rue").is_empty());
/// assert_eq!(address_suggestions("8 rue Royale")[0], "8 rue Royale, Paris 75001");
/// ```
pub fn address_suggestions(query: &str) -> Vec<String> {
    if query.chars().count() <= MIN_QUERY_EXCLUSIVE {
        return Vec::new();
    }
    SUGGESTED_CITIES
        .iter()
        .map(|(city, postal_code)| format!("{query}, {city} {postal_code}"))
        .collect()
}

impl ContactDraft {
    /// Fill address, city and postal code from a chosen suggestion.
    ///
    /// The text before the first `", "` becomes the address; the next
    /// segment must read `<city> <5 digits>`. Anything else leaves the draft
    /// untouched and returns `false`.
    pub fn select_address(&mut self, suggestion: &str) -> bool {
        let mut parts = suggestion.split(", ");
        let (Some(address), Some(city_part)) = (parts.next(), parts.next()) else {
            return false;
        };
        let Some(captures) = city_postal_regex().captures(city_part) else {
            return false;
        };
        let (Some(city), Some(postal_code)) = (captures.get(1), captures.get(2)) else {
            return false;
        };
        address.clone_into(&mut self.address);
        city.as_str().clone_into(&mut self.city);
        postal_code.as_str().clone_into(&mut self.postal_code);
        true
    }
}

/// Simulated confirmation of the applicant's email and phone.
///
/// Well-formed values are confirmed after a fixed delay; malformed ones are
/// refused at once.
#[derive(Clone)]
pub struct ContactVerifier {
    sleeper: Arc<dyn Sleeper>,
    delay: Duration,
}

impl ContactVerifier {
    /// Verifier waiting `delay` through `sleeper` before confirming.
    pub fn new(sleeper: Arc<dyn Sleeper>, delay: Duration) -> Self {
        Self { sleeper, delay }
    }

    /// Confirm `email` when it is well formed.
    pub async fn verify_email(&self, email: &str) -> bool {
        if !is_well_formed_email(email.trim()) {
            debug!("email not verified, malformed");
            return false;
        }
        self.sleeper.sleep(self.delay).await;
        info!("email verified");
        true
    }

    /// Confirm `phone` when it is a French number.
    pub async fn verify_phone(&self, phone: &str) -> bool {
        if !is_french_phone(phone) {
            debug!("phone not verified, malformed");
            return false;
        }
        self.sleeper.sleep(self.delay).await;
        info!("phone verified");
        true
    }
}

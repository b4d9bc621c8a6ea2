//! Record validation
//!
//! Pure, side-effect-free validation of one raw row into a normalized record
//! or a rejection reason. Rules are applied in order; the first failure wins.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{NormalizedRecord, RawRow, RejectReason, ValidationOutcome};

/// BIC format: 4 letters (institution), 2 letters (country), 2 letters or
/// digits (location), optional 3 letters or digits (branch).
static BIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{4}[A-Za-z]{2}[A-Za-z0-9]{2}([A-Za-z0-9]{3})?$")
        .expect("BIC pattern is a valid regex")
});

const HEADQUARTER_SUFFIX: &str = "XXX";

/// Validate one raw row.
///
/// On success the returned record carries the uppercased SWIFT code and ISO2
/// code; the remaining text fields are uppercased and trimmed as well. An
/// 11-character code ending in `XXX` is classified headquarters regardless of
/// any explicit flag in the row.
pub fn validate_row(row: &RawRow) -> ValidationOutcome {
    let swift_code = row.swift_code.trim();
    if swift_code.is_empty() {
        return ValidationOutcome::Rejected(RejectReason::MissingSwiftCode);
    }

    let len = swift_code.chars().count();
    if len != 8 && len != 11 {
        return ValidationOutcome::Rejected(RejectReason::BadLength(len));
    }

    if !BIC_PATTERN.is_match(swift_code) {
        return ValidationOutcome::Rejected(RejectReason::PatternMismatch);
    }

    let swift_code = swift_code.to_uppercase();
    let is_headquarter = if len == 11 && swift_code.ends_with(HEADQUARTER_SUFFIX) {
        true
    } else {
        row.headquarter_flag.unwrap_or(false)
    };

    let country_iso2 = row.country_iso2.trim();
    if country_iso2.is_empty() {
        return ValidationOutcome::Rejected(RejectReason::MissingCountryIso2);
    }
    if country_iso2.len() != 2 || !country_iso2.chars().all(|c| c.is_ascii_alphabetic()) {
        return ValidationOutcome::Rejected(RejectReason::InvalidCountryIso2);
    }

    let country_name = row.country_name.trim();
    if country_name.is_empty() {
        return ValidationOutcome::Rejected(RejectReason::MissingCountryName);
    }

    let bank_name = row.bank_name.trim();
    if bank_name.is_empty() {
        return ValidationOutcome::Rejected(RejectReason::MissingBankName);
    }

    let address = row.address.trim();
    if address.is_empty() {
        return ValidationOutcome::Rejected(RejectReason::MissingAddress);
    }

    ValidationOutcome::Accepted(NormalizedRecord {
        swift_code,
        bank_name: bank_name.to_uppercase(),
        address: address.to_uppercase(),
        country_iso2: country_iso2.to_uppercase(),
        country_name: country_name.to_uppercase(),
        is_headquarter,
    })
}

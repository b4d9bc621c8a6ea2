use serde::{Deserialize, Serialize};

/// One raw row of the input file, as parsed from CSV. Values are untrimmed
/// except for what the CSV reader strips; empty strings mean the column was
/// present but blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub swift_code: String,
    pub country_iso2: String,
    pub country_name: String,
    pub bank_name: String,
    pub address: String,
    /// Explicit headquarters flag, when the file carries one. An 11-character
    /// code ending in `XXX` overrides this.
    pub headquarter_flag: Option<bool>,
}

/// A validated, normalized record ready for submission to the registry.
///
/// Serializes to the registry's single-record create payload, hence the
/// camelCase wire names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedRecord {
    #[serde(rename = "swiftCode")]
    pub swift_code: String,
    #[serde(rename = "bankName")]
    pub bank_name: String,
    pub address: String,
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    #[serde(rename = "countryName")]
    pub country_name: String,
    #[serde(rename = "isHeadquarter")]
    pub is_headquarter: bool,
}

/// Why a row was rejected by validation. Rendered into the job's error list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("SWIFT code is missing")]
    MissingSwiftCode,

    #[error("SWIFT code must be 8 or 11 characters, got {0}")]
    BadLength(usize),

    #[error("SWIFT code does not match the BIC format")]
    PatternMismatch,

    #[error("country ISO2 code is missing")]
    MissingCountryIso2,

    #[error("country ISO2 code must be exactly 2 letters")]
    InvalidCountryIso2,

    #[error("country name is missing")]
    MissingCountryName,

    #[error("bank name is missing")]
    MissingBankName,

    #[error("address is missing")]
    MissingAddress,
}

/// Result of validating one raw row. Rejections never abort a batch; they are
/// recorded against the job and processing continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted(NormalizedRecord),
    Rejected(RejectReason),
}

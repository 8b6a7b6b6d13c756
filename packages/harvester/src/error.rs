//! Error types for the harvester.
//!
//! Every failure is fatal to the current run: the pipeline stops at the
//! first error and returns it unchanged. Transient transport failures are the
//! only ones retried, and only inside the fetcher.

use thiserror::Error;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// Invalid NUTS region code.
    #[error("Invalid region code: '{0}'. Expected CZ0XX (e.g., CZ010)")]
    InvalidRegionCode(String),

    /// Well-formed region code that names no Czech region.
    #[error("Unknown region code: '{0}'. Run `volby-harvester regions` for the list")]
    UnknownRegion(String),

    /// Election round outside the supported range.
    #[error("Invalid election round: {0}. Expected 1 or 2")]
    InvalidRound(u8),

    /// Results endpoint URL could not be parsed.
    #[error("Invalid results URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// HTTP client construction or a non-retryable request failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Permanent transport failure reported by a transport implementation.
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// All attempts for a region failed with transient errors.
    #[error("Max retries exceeded for region {region} after {attempts} attempts: {message}")]
    MaxRetriesExceeded {
        region: String,
        attempts: u32,
        message: String,
    },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Missing required XML element.
    #[error("Missing required XML element: {element} in {context}")]
    MissingElement { element: String, context: String },

    /// Missing required XML attribute.
    #[error("Missing required attribute {attribute} on <{element}>")]
    MissingAttribute { attribute: String, element: String },

    /// Attribute present but not a non-negative integer.
    #[error("Attribute {attribute} on <{element}> is not a valid count: '{value}'")]
    InvalidNumber {
        attribute: String,
        element: String,
        value: String,
    },

    /// A registry candidate has no entry in the record being displayed.
    #[error("No data for candidate {candidate} (#{ordinal}) in region {region}")]
    MissingCandidateData {
        region: String,
        candidate: String,
        ordinal: u32,
    },

    /// Percentages requested for a record with zero total votes.
    #[error("Region {region} has no recorded votes; percentages are undefined")]
    NoVotes { region: String },

    /// Vote counts of one region add up past `u64::MAX`.
    #[error("Vote counts in region {region} overflow the total")]
    VoteTotalOverflow { region: String },

    /// Candidate registry built with the same ordinal twice.
    #[error("Duplicate candidate ordinal {0} in registry")]
    DuplicateCandidate(u32),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    YamlSerialization(#[from] serde_yaml_ng::Error),
}

impl HarvesterError {
    /// Whether the error came from a malformed or unexpected document.
    #[must_use]
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::MissingElement { .. }
                | Self::MissingAttribute { .. }
                | Self::InvalidNumber { .. }
                | Self::VoteTotalOverflow { .. }
        )
    }
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HarvesterError::InvalidRegionCode("XX999".to_string());
        assert!(err.to_string().contains("XX999"));
        assert!(err.to_string().contains("CZ0XX"));
    }

    #[test]
    fn test_max_retries_display() {
        let err = HarvesterError::MaxRetriesExceeded {
            region: "CZ010".to_string(),
            attempts: 6,
            message: "operation timed out".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Max retries exceeded for region CZ010 after 6 attempts: operation timed out"
        );
    }

    #[test]
    fn test_missing_candidate_display() {
        let err = HarvesterError::MissingCandidateData {
            region: "CZ020".to_string(),
            candidate: "Pavel".to_string(),
            ordinal: 4,
        };
        assert_eq!(
            err.to_string(),
            "No data for candidate Pavel (#4) in region CZ020"
        );
    }

    #[test]
    fn test_schema_error_classification() {
        let missing = HarvesterError::MissingAttribute {
            attribute: "HLASY".to_string(),
            element: "HODN_KAND".to_string(),
        };
        assert!(missing.is_schema_error());
        let overflow = HarvesterError::VoteTotalOverflow {
            region: "CZ010".to_string(),
        };
        assert!(overflow.is_schema_error());
        assert!(!HarvesterError::DuplicateCandidate(1).is_schema_error());
    }
}

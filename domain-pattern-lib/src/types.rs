//! Core data types shared by the classifier and the WHOIS probe.

use crate::availability::{assess_whois_text, Availability};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Aggregate report of a classification run.
///
/// Produced by the persister after every output file is written, and used
/// by the CLI for the console report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationSummary {
    /// Number of domains classified
    pub total_domains: usize,

    /// Domains per pattern, keyed by rendered pattern (ascending order)
    pub pattern_counts: BTreeMap<String, usize>,

    /// Directory the output files were written to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl ClassificationSummary {
    /// Number of distinct patterns found.
    pub fn distinct_patterns(&self) -> usize {
        self.pattern_counts.len()
    }

    /// Sum of the per-pattern counts. Always equals `total_domains`.
    pub fn counted_domains(&self) -> usize {
        self.pattern_counts.values().sum()
    }
}

/// Structured WHOIS record.
///
/// Fields are extracted from the free-text WHOIS response; every field is
/// optional because registries disagree on which ones they publish.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WhoisRecord {
    /// The domain that was queried
    pub query: String,

    /// Domain name as reported by the registry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,

    /// The registrar that manages this domain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrar: Option<String>,

    /// When the domain was first registered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,

    /// When the domain registration expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,

    /// Domain status codes (e.g., "connect", "clientTransferProhibited")
    pub status: Vec<String>,

    /// Nameservers associated with the domain
    pub name_servers: Vec<String>,

    /// WHOIS server that answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    /// Unparsed response text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl WhoisRecord {
    /// Whether any structured field was recognised in the response.
    pub fn has_fields(&self) -> bool {
        self.domain_name.is_some()
            || self.registrar.is_some()
            || self.creation_date.is_some()
            || self.expiration_date.is_some()
            || !self.status.is_empty()
            || !self.name_servers.is_empty()
    }

    /// Verdict read from the raw response text.
    pub fn availability(&self) -> Availability {
        self.raw_text
            .as_deref()
            .map(assess_whois_text)
            .unwrap_or(Availability::Unknown)
    }
}

/// Result of a WHOIS probe.
#[derive(Debug, Clone, PartialEq)]
pub enum WhoisProbe {
    /// Structured lookup succeeded
    Structured(WhoisRecord),

    /// Structured lookup failed; raw output of the system `whois` command
    Fallback {
        /// Why the structured lookup failed
        reason: String,
        /// Raw command output
        output: String,
    },
}

impl WhoisProbe {
    /// Verdict from whichever text the probe obtained.
    pub fn availability(&self) -> Availability {
        match self {
            Self::Structured(record) => record.availability(),
            Self::Fallback { output, .. } => assess_whois_text(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut counts = BTreeMap::new();
        counts.insert("AAAA".to_string(), 2);
        counts.insert("ABAB".to_string(), 3);
        let summary = ClassificationSummary {
            total_domains: 5,
            pattern_counts: counts,
            output_dir: None,
        };
        assert_eq!(summary.distinct_patterns(), 2);
        assert_eq!(summary.counted_domains(), summary.total_domains);
    }

    #[test]
    fn test_summary_json_shape() {
        let mut counts = BTreeMap::new();
        counts.insert("AB".to_string(), 1);
        let summary = ClassificationSummary {
            total_domains: 1,
            pattern_counts: counts,
            output_dir: None,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["total_domains"], 1);
        assert_eq!(json["pattern_counts"]["AB"], 1);
        assert!(json.get("output_dir").is_none());
    }

    #[test]
    fn test_record_has_fields() {
        let mut record = WhoisRecord {
            query: "bun.de".to_string(),
            ..Default::default()
        };
        assert!(!record.has_fields());
        record.status.push("connect".to_string());
        assert!(record.has_fields());
    }

    #[test]
    fn test_availability_from_record_and_fallback() {
        let record = WhoisRecord {
            query: "old.com".to_string(),
            raw_text: Some("Domain Name: OLD.COM\nDomain Status: pendingDelete\n".to_string()),
            ..Default::default()
        };
        assert_eq!(
            record.availability(),
            Availability::SpecialStatus("Pending Delete".to_string())
        );
        assert_eq!(
            WhoisProbe::Structured(WhoisRecord::default()).availability(),
            Availability::Unknown
        );

        let fallback = WhoisProbe::Fallback {
            reason: "timeout".to_string(),
            output: "Domain: bun.de\nStatus: free\n".to_string(),
        };
        assert!(fallback.availability().is_available());
    }
}

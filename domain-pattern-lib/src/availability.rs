//! Availability verdicts read from raw WHOIS text.
//!
//! Registries answer in free text, so the verdict comes from indicator
//! substrings matched case-insensitively. Tables are checked in a fixed
//! order: rate limiting, then availability, reservation, special registry
//! states and finally plain registration. The first table with a hit decides.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Text registries return when they refuse to answer.
const RATE_LIMIT_INDICATORS: &[&str] = &[
    "connection refused",
    "access control",
    "limit exceeded",
    "rate limit",
    "too many requests",
];

const AVAILABLE_INDICATORS: &[&str] = &[
    "no match for",
    "not found",
    "no data found",
    "no entries found",
    "domain not found",
    "no object found",
    "no matching record",
    "status: free",
    "status: available",
    "available for registration",
    "this domain is available",
    "domain is available",
    "domain available",
];

const RESERVED_INDICATORS: &[&str] = &[
    "status: reserved",
    "status: restricted",
    "status: blocked",
    "status: prohibited",
    "status: not available for registration",
    "status: not available for general registration",
    "domain reserved",
    "this domain is reserved",
    "reserved domain",
];

/// Special registry states and their display labels.
///
/// Longer indicators precede their prefixes (`status: pendingdelete` before
/// `status: pending`).
const SPECIAL_STATUS_INDICATORS: &[(&str, &str)] = &[
    ("status: redemptionperiod", "Redemption Period"),
    ("status: redemption period", "Redemption Period"),
    ("status: redemption", "Redemption Period"),
    ("status: pendingdelete", "Pending Delete"),
    ("status: pending delete", "Pending Delete"),
    ("status: pendingtransfer", "Transfer Pending"),
    ("status: transfer", "Transfer Pending"),
    ("status: pending", "Pending Registration"),
    ("status: clienthold", "Client Hold"),
    ("status: client hold", "Client Hold"),
    ("status: serverhold", "Server Hold"),
    ("status: server hold", "Server Hold"),
    ("status: hold", "Hold"),
    ("status: inactive", "Inactive"),
    ("status: suspended", "Suspended"),
    ("status: quarantined", "Quarantined"),
    ("status: grace", "Grace Period"),
    ("status: autorenewperiod", "Auto-Renew Period"),
    ("status: auto renew period", "Auto-Renew Period"),
    ("status: expire", "Expired"),
];

const REGISTERED_INDICATORS: &[&str] = &[
    "registrar:",
    "registrant:",
    "creation date:",
    "created:",
    "updated date:",
    "updated:",
    "expiration date:",
    "expires:",
    "name server:",
    "nserver:",
    "nameserver:",
    "status: registered",
    "status: active",
    "status: client",
    "status: ok",
    "status: locked",
    "status: connect",
    "status:connect",
    "domain name:",
    "domain:",
    "nsentry:",
    "changed:",
];

/// Registration state of a domain as far as its WHOIS text reveals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum Availability {
    /// The registry reports no registration
    Available,
    /// Registered and in normal use
    Registered,
    /// Blocked or reserved by the registry
    Reserved,
    /// Registered but in a transitional registry state (label attached)
    SpecialStatus(String),
    /// The registry refused to answer
    RateLimited,
    /// No indicator matched
    Unknown,
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// Special-status domains belong in the special-status list.
    pub fn is_special(&self) -> bool {
        matches!(self, Self::SpecialStatus(_))
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Registered => write!(f, "registered"),
            Self::Reserved => write!(f, "reserved"),
            Self::SpecialStatus(label) => write!(f, "special status ({})", label),
            Self::RateLimited => write!(f, "rate limited"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Derive an [`Availability`] verdict from raw WHOIS text.
///
/// ```
/// use domain_pattern_lib::{assess_whois_text, Availability};
///
/// assert_eq!(assess_whois_text("Domain: bun.de\nStatus: free\n"), Availability::Available);
/// assert_eq!(
///     assess_whois_text("Domain Status: pendingDelete"),
///     Availability::SpecialStatus("Pending Delete".to_string())
/// );
/// ```
pub fn assess_whois_text(raw: &str) -> Availability {
    let text = raw.to_lowercase();
    let contains_any = |table: &[&str]| table.iter().any(|indicator| text.contains(indicator));

    if contains_any(RATE_LIMIT_INDICATORS) {
        return Availability::RateLimited;
    }
    if contains_any(AVAILABLE_INDICATORS) {
        return Availability::Available;
    }
    if contains_any(RESERVED_INDICATORS) {
        return Availability::Reserved;
    }
    if let Some((_, label)) = SPECIAL_STATUS_INDICATORS
        .iter()
        .find(|(indicator, _)| text.contains(indicator))
    {
        return Availability::SpecialStatus(label.to_string());
    }
    if contains_any(REGISTERED_INDICATORS) {
        return Availability::Registered;
    }
    Availability::Unknown
}

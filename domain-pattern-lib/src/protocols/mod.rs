//! Protocol implementations.
//!
//! Currently only WHOIS: a direct port-43 client with IANA referral and a
//! system-command fallback.

/// WHOIS protocol implementation
pub mod whois;

pub use whois::{parse_iana_refer_response, parse_whois_response, WhoisClient};

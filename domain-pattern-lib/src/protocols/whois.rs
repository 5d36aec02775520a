//! WHOIS probe for a single domain.
//!
//! The structured path talks to WHOIS servers directly over TCP port 43:
//! the authoritative server is found through an IANA referral, queried, and
//! its free-text answer is parsed into a [`WhoisRecord`]. When that fails the
//! probe falls back to the system `whois` command and returns its raw output.

use crate::availability::assess_whois_text;
use crate::error::PatternError;
use crate::types::{WhoisProbe, WhoisRecord};
use regex::Regex;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::process::Command;
use tracing::{debug, warn};

/// IANA root WHOIS server, used for TLD referrals.
pub const IANA_WHOIS_SERVER: &str = "whois.iana.org";

/// Well-known WHOIS port.
pub const WHOIS_PORT: u16 = 43;

lazy_static::lazy_static! {
    static ref DOMAIN_NAME_RE: Regex = field_regex(&["domain name", "domain"]);
    static ref REGISTRAR_RE: Regex =
        field_regex(&["registrar", "sponsoring registrar", "registrar name"]);
    static ref CREATED_RE: Regex = field_regex(&[
        "creation date",
        "created on",
        "created",
        "registered on",
        "registration time",
    ]);
    static ref EXPIRES_RE: Regex = field_regex(&[
        "registry expiry date",
        "registrar registration expiration date",
        "expiration date",
        "expiry date",
        "expires on",
        "expires",
        "expire date",
        "paid-till",
    ]);
    static ref STATUS_RE: Regex = field_regex(&["domain status", "status"]);
    static ref NAME_SERVER_RE: Regex =
        field_regex(&["name server", "name servers", "nameserver", "nserver"]);
}

/// Build a case-insensitive, line-anchored `key: value` matcher.
///
/// Horizontal whitespace only, so an empty value never swallows the next line.
fn field_regex(keys: &[&str]) -> Regex {
    let alternatives: Vec<String> = keys.iter().map(|k| regex::escape(k)).collect();
    let pattern = format!(
        r"(?im)^[ \t]*(?:{})[ \t]*:[ \t]*(\S[^\r\n]*?)[ \t]*\r?$",
        alternatives.join("|")
    );
    Regex::new(&pattern).expect("WHOIS field keys are escaped literals")
}

/// WHOIS client with a system-command fallback.
#[derive(Clone, Debug)]
pub struct WhoisClient {
    /// Bound on every network query and on the fallback command
    timeout: Duration,
    /// Fixed server; when unset the server comes from an IANA referral
    server: Option<String>,
    /// Fallback command name
    command: String,
}

impl WhoisClient {
    /// Create a new WHOIS client with default settings.
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            server: None,
            command: "whois".to_string(),
        }
    }

    /// Create a new WHOIS client with custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::new()
        }
    }

    /// Query this server instead of asking IANA.
    pub fn with_server<S: Into<String>>(mut self, server: S) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Use a different fallback command.
    pub fn with_command<S: Into<String>>(mut self, command: S) -> Self {
        self.command = command.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Structured lookup first, then the system command.
    ///
    /// The domain is trimmed once and the same value feeds both paths.
    /// No retries: if both paths fail the error carries both reasons.
    pub async fn probe(&self, domain: &str) -> crate::Result<WhoisProbe> {
        let domain = domain.trim();
        let structured_error = match self.lookup(domain).await {
            Ok(record) => return Ok(WhoisProbe::Structured(record)),
            Err(e) => e,
        };

        warn!(domain, error = %structured_error, "structured WHOIS lookup failed, trying system command");

        match self.command_lookup(domain).await {
            Ok(output) => Ok(WhoisProbe::Fallback {
                reason: structured_error.to_string(),
                output,
            }),
            Err(command_error) => Err(PatternError::whois(
                domain,
                format!(
                    "structured lookup failed ({}); system whois command failed ({})",
                    structured_error, command_error
                ),
            )),
        }
    }

    /// Structured lookup over TCP port 43.
    ///
    /// # Errors
    ///
    /// Returns `PatternError` if the domain is blank, no server can be
    /// resolved, the query fails or times out, or the response contains no
    /// recognisable fields. A field-less "no match" answer is still a record,
    /// since the registry did answer.
    pub async fn lookup(&self, domain: &str) -> crate::Result<WhoisRecord> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(PatternError::whois(domain, "Domain name cannot be empty"));
        }

        let server = match &self.server {
            Some(server) => server.clone(),
            None => self.discover_server(domain).await?,
        };

        debug!(domain, server = %server, "querying WHOIS server");
        let raw = self.query(&server, domain).await?;

        let mut record = parse_whois_response(domain, &raw);
        record.server = Some(server.clone());

        if !record.has_fields() && !assess_whois_text(&raw).is_available() {
            return Err(PatternError::whois(
                domain,
                format!("No recognisable fields in response from {}", server),
            ));
        }
        Ok(record)
    }

    /// Find the authoritative WHOIS server for the domain's TLD via IANA.
    pub async fn discover_server(&self, domain: &str) -> crate::Result<String> {
        let tld = extract_tld(domain)
            .ok_or_else(|| PatternError::whois(domain, "Domain has no TLD to look up"))?;

        let response = self.query(IANA_WHOIS_SERVER, &tld).await?;
        parse_iana_refer_response(&response).ok_or_else(|| {
            PatternError::whois(domain, format!("IANA knows no WHOIS server for .{}", tld))
        })
    }

    /// Send one query line to `server` and read the whole answer.
    async fn query(&self, server: &str, query: &str) -> crate::Result<String> {
        let exchange = async {
            let mut stream = TcpStream::connect((server, WHOIS_PORT)).await?;
            stream.write_all(format!("{}\r\n", query).as_bytes()).await?;
            let mut buf = Vec::new();
            stream.read_to_end(&mut buf).await?;
            Ok::<_, std::io::Error>(buf)
        };

        let buf = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| PatternError::timeout(format!("WHOIS query to {}", server), self.timeout))?
            .map_err(|e| PatternError::whois(query, format!("{}: {}", server, e)))?;

        let text = String::from_utf8_lossy(&buf).into_owned();
        if text.trim().is_empty() {
            return Err(PatternError::whois(
                query,
                format!("Empty response from {}", server),
            ));
        }
        Ok(text)
    }

    /// Run the system `whois` command and return its raw output.
    ///
    /// stderr is used when stdout is empty. A non-zero exit status is an
    /// error only when the command printed nothing.
    pub async fn command_lookup(&self, domain: &str) -> crate::Result<String> {
        let output = tokio::time::timeout(
            self.timeout,
            Command::new(&self.command).arg(domain).output(),
        )
        .await
        .map_err(|_| PatternError::timeout("system whois command", self.timeout))?
        .map_err(|e| {
            PatternError::whois(
                domain,
                format!(
                    "Failed to execute {} command: {}. Make sure 'whois' is installed.",
                    self.command, e
                ),
            )
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let text = if stdout.trim().is_empty() {
            String::from_utf8_lossy(&output.stderr).into_owned()
        } else {
            stdout
        };

        if text.trim().is_empty() {
            return Err(PatternError::whois(
                domain,
                format!("{} exited with {} and no output", self.command, output.status),
            ));
        }
        if !output.status.success() {
            debug!(domain, status = %output.status, "whois command exited non-zero");
        }
        Ok(text)
    }
}

impl Default for WhoisClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Last dot-separated label of a domain, lowercased.
fn extract_tld(domain: &str) -> Option<String> {
    let trimmed = domain.trim().trim_end_matches('.');
    let (_, tld) = trimmed.rsplit_once('.')?;
    if tld.is_empty() {
        None
    } else {
        Some(tld.to_lowercase())
    }
}

/// Parse an IANA WHOIS response for the authoritative WHOIS server.
///
/// `refer:` wins over `whois:` when both are present.
///
/// ```text
/// whois:        whois.denic.de
/// refer:        whois.denic.de
/// ```
pub fn parse_iana_refer_response(response: &str) -> Option<String> {
    let mut whois_server = None;

    for line in response.lines() {
        let line_trimmed = line.trim();
        if let Some(server) = line_trimmed.strip_prefix("refer:") {
            let server = server.trim();
            if !server.is_empty() {
                return Some(server.to_string());
            }
        } else if let Some(server) = line_trimmed.strip_prefix("whois:") {
            let server = server.trim();
            if !server.is_empty() {
                whois_server = Some(server.to_string());
            }
        }
    }

    whois_server
}

/// Extract structured fields from a raw WHOIS response.
///
/// Single-valued fields take the first match. Status and name server values
/// keep their first token (dropping trailing URLs and glue addresses).
pub fn parse_whois_response(domain: &str, raw: &str) -> WhoisRecord {
    WhoisRecord {
        query: domain.to_string(),
        domain_name: first_value(&DOMAIN_NAME_RE, raw),
        registrar: first_value(&REGISTRAR_RE, raw),
        creation_date: first_value(&CREATED_RE, raw),
        expiration_date: first_value(&EXPIRES_RE, raw),
        status: all_first_tokens(&STATUS_RE, raw, false),
        name_servers: all_first_tokens(&NAME_SERVER_RE, raw, true),
        server: None,
        raw_text: Some(raw.to_string()),
    }
}

fn first_value(re: &Regex, raw: &str) -> Option<String> {
    re.captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .find(|v| !v.is_empty())
}

fn all_first_tokens(re: &Regex, raw: &str, lowercase: bool) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for caps in re.captures_iter(raw) {
        let Some(token) = caps
            .get(1)
            .and_then(|m| m.as_str().split_whitespace().next())
        else {
            continue;
        };
        let token = if lowercase {
            token.trim_end_matches('.').to_lowercase()
        } else {
            token.to_string()
        };
        if !values.contains(&token) {
            values.push(token);
        }
    }
    values
}

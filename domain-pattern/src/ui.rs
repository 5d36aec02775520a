//! Console reports for the domain-pattern CLI.
//!
//! Reports go to stdout, failures to stderr. Uses only the `console` crate.

use console::style;
use domain_pattern_lib::{Availability, ClassificationSummary, PatternError, WhoisRecord};
use std::path::Path;

// ── Classification ───────────────────────────────────────────────────────────

/// Print totals and the per-pattern counts in ascending pattern order.
pub fn print_report(summary: &ClassificationSummary) {
    println!(
        "{} {}",
        style("Processed").bold(),
        style(format!("{} domain{}", summary.total_domains, plural(summary.total_domains))).bold(),
    );
    println!(
        "{}",
        style(format!(
            "Found {} distinct pattern{}:",
            summary.distinct_patterns(),
            plural(summary.distinct_patterns())
        ))
        .dim(),
    );

    let width = summary
        .pattern_counts
        .keys()
        .map(|p| p.len())
        .max()
        .unwrap_or(0);
    for (pattern, count) in &summary.pattern_counts {
        println!("  {}", format_pattern_line(pattern, *count, width));
    }
}

/// Print where the pattern files landed.
pub fn print_completion(output_dir: &Path) {
    println!();
    println!(
        "{} Classification complete, results saved in {}",
        style("✓").green(),
        style(output_dir.display()).cyan(),
    );
}

/// Format one report row, e.g. `ABAB  2 domains`.
pub fn format_pattern_line(pattern: &str, count: usize, width: usize) -> String {
    format!(
        "{:<width$}  {} domain{}",
        pattern,
        count,
        plural(count),
        width = width
    )
}

// ── Special pass ─────────────────────────────────────────────────────────────

pub fn print_special_start(input: &Path) {
    println!(
        "{}",
        style(format!("Processing special domain list {}...", input.display())).dim()
    );
}

pub fn print_special_success() {
    println!(
        "{} {}",
        style("✓").green(),
        style("Special domain classification complete").bold()
    );
}

pub fn print_special_failure(error: &PatternError) {
    eprintln!(
        "{} Error while processing special domains: {}",
        style("✗").red(),
        error
    );
}

// ── WHOIS ────────────────────────────────────────────────────────────────────

pub fn print_whois_start(domain: &str) {
    println!("{} {}", style("Querying domain:").bold(), domain);
}

/// Print the parsed fields, then the raw response text.
pub fn print_whois_record(record: &WhoisRecord) {
    let rows = record_rows(record);
    if rows.is_empty() {
        println!("  {}", style("No fields recognised in response").dim());
    }
    for (label, value) in rows {
        println!("  {} {}", style(format!("{}:", label)).cyan(), value);
    }

    if let Some(server) = &record.server {
        println!("  {} {}", style("Server:").dim(), style(server).dim());
    }

    if let Some(raw) = &record.raw_text {
        println!();
        println!("{}", style("Raw response:").bold());
        println!("{}", raw.trim_end());
    }
}

pub fn print_whois_fallback(reason: &str, output: &str) {
    eprintln!("{} Structured lookup failed: {}", style("!").yellow(), reason);
    println!("{}", style("Output of system whois command:").bold());
    println!("{}", output.trim_end());
}

pub fn print_availability(verdict: &Availability) {
    let text = verdict.to_string();
    let styled = match verdict {
        Availability::Available => style(text).green().bold(),
        Availability::Registered | Availability::Reserved => style(text).red(),
        Availability::SpecialStatus(_) => style(text).yellow().bold(),
        Availability::RateLimited | Availability::Unknown => style(text).dim(),
    };
    println!();
    println!("{} {}", style("Verdict:").bold(), styled);
}

/// Labelled rows for whichever fields the record carries.
pub fn record_rows(record: &WhoisRecord) -> Vec<(&'static str, String)> {
    let mut rows = Vec::new();
    if let Some(name) = &record.domain_name {
        rows.push(("Domain name", name.clone()));
    }
    if let Some(registrar) = &record.registrar {
        rows.push(("Registrar", registrar.clone()));
    }
    if let Some(created) = &record.creation_date {
        rows.push(("Creation date", created.clone()));
    }
    if let Some(expires) = &record.expiration_date {
        rows.push(("Expiration date", expires.clone()));
    }
    if !record.status.is_empty() {
        rows.push(("Status", record.status.join(", ")));
    }
    if !record.name_servers.is_empty() {
        rows.push(("Name servers", record.name_servers.join(", ")));
    }
    rows
}

// ── Generation ───────────────────────────────────────────────────────────────

pub fn print_generated(count: usize, path: &Path) {
    println!(
        "{} Generated {} candidate domain{} into {}",
        style("✓").green(),
        count,
        plural(count),
        style(path.display()).cyan(),
    );
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pattern_line() {
        assert_eq!(format_pattern_line("ABAB", 2, 4), "ABAB  2 domains");
        assert_eq!(format_pattern_line("AA", 1, 4), "AA    1 domain");
    }

    #[test]
    fn test_record_rows_all_fields() {
        let record = WhoisRecord {
            query: "example.com".to_string(),
            domain_name: Some("EXAMPLE.COM".to_string()),
            registrar: Some("RESERVED-Internet Assigned Numbers Authority".to_string()),
            creation_date: Some("1995-08-14T04:00:00Z".to_string()),
            expiration_date: Some("2025-08-13T04:00:00Z".to_string()),
            status: vec!["clientDeleteProhibited".to_string()],
            name_servers: vec!["A.IANA-SERVERS.NET".to_string(), "B.IANA-SERVERS.NET".to_string()],
            ..Default::default()
        };

        let rows = record_rows(&record);
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0], ("Domain name", "EXAMPLE.COM".to_string()));
        assert_eq!(
            rows[5],
            ("Name servers", "A.IANA-SERVERS.NET, B.IANA-SERVERS.NET".to_string())
        );
    }

    #[test]
    fn test_record_rows_partial() {
        let record = WhoisRecord {
            query: "bun.de".to_string(),
            status: vec!["connect".to_string()],
            ..Default::default()
        };
        assert_eq!(record_rows(&record), vec![("Status", "connect".to_string())]);
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(0), "s");
        assert_eq!(plural(1), "");
        assert_eq!(plural(5), "s");
    }
}

//! # Domain Pattern Library
//!
//! Classifies domain names by the repetition pattern of their label and
//! writes one sorted list per pattern. Also carries a candidate generator
//! that produces domain lists to classify, and a single-shot WHOIS probe with
//! a system-command fallback whose text yields an availability verdict.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_pattern_lib::{classify_file, ClassifyConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClassifyConfig::new("available_domains.txt", "domain-check");
//!     let summary = classify_file(&config)?;
//!
//!     println!("{} domains, {} patterns", summary.total_domains, summary.distinct_patterns());
//!     Ok(())
//! }
//! ```
//!
//! ## Patterns
//!
//! ```
//! use domain_pattern_lib::{classify, derive_pattern};
//!
//! assert_eq!(derive_pattern("abab.io").to_string(), "ABAB");
//!
//! let groups = classify(["aaaa.com", "bbbb.net", "abab.io"]);
//! assert_eq!(groups.get("AAAA").map(|d| d.len()), Some(2));
//! ```

pub use availability::{assess_whois_text, Availability};
pub use bucket::{classify, PatternGroups};
pub use config::{
    env_config_from, load_env_config, parse_timeout_string, ClassifySection, ConfigManager,
    EnvConfig, FileConfig, GenerateSection, WhoisSection,
};
pub use error::PatternError;
pub use generate::{
    estimate_count, generate_domains, normalize_suffix, save_candidates, Charset, FilterMode,
    GenerateConfig, MAX_CANDIDATES,
};
pub use input::read_domain_list;
pub use pattern::{derive_pattern, extract_label, Pattern};
pub use persist::{output_path, persist, write_domain_list, OUTPUT_EXTENSION};
pub use pipeline::{
    classify_file, run_special_pass, special_dir, ClassifyConfig, SpecialPassConfig,
    SpecialPassOutcome, SPECIAL_SUBDIR,
};
pub use types::{ClassificationSummary, WhoisProbe, WhoisRecord};

#[cfg(feature = "whois")]
pub use protocols::{parse_iana_refer_response, parse_whois_response, WhoisClient};

mod availability;
mod bucket;
mod config;
mod error;
mod generate;
mod input;
mod pattern;
mod persist;
mod pipeline;
#[cfg(feature = "whois")]
mod protocols;
mod types;

pub type Result<T> = std::result::Result<T, PatternError>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

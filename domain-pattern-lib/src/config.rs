//! Configuration file parsing and management.
//!
//! This module loads TOML configuration files, merges them with proper
//! precedence, and reads `DP_*` environment overrides. Path defaults are not
//! defined here; the CLI supplies them.

use crate::error::PatternError;
use crate::generate::{Charset, FilterMode};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    /// Classification paths
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classify: Option<ClassifySection>,

    /// WHOIS probe settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whois: Option<WhoisSection>,

    /// Candidate generation defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate: Option<GenerateSection>,
}

/// `[classify]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ClassifySection {
    /// Domain list for the primary pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,

    /// Output directory (the special pass writes into `<output_dir>/special`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Domain list for the special-status pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_input: Option<PathBuf>,
}

/// `[whois]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WhoisSection {
    /// Timeout as a string, e.g. "10s", "1m"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Fixed WHOIS server (skips IANA referral)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    /// Domain probed when none is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_domain: Option<String>,
}

/// `[generate]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerateSection {
    /// Label length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,

    /// `d`, `D` or `a`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,

    /// Domain suffix, e.g. ".li"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    /// Regex filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    /// "full" or "prefix"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_mode: Option<String>,

    /// Candidate list destination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl FileConfig {
    /// Parsed WHOIS timeout, if configured.
    pub fn whois_timeout(&self) -> Option<Duration> {
        self.whois
            .as_ref()
            .and_then(|w| w.timeout.as_deref())
            .and_then(parse_timeout_string)
            .map(Duration::from_secs)
    }
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to emit warnings for config issues
    pub verbose: bool,
}

impl ConfigManager {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> crate::Result<FileConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PatternError::file_error(
                path,
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            PatternError::file_error(path, format!("Failed to read configuration file: {}", e))
        })?;

        let config: FileConfig = toml::from_str(&content)?;
        self.validate_config(&config)?;

        debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config < home config < local config; later files win per field.
    pub fn discover_and_load(&self) -> crate::Result<FileConfig> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    merged_config = self.merge_configs(merged_config, config);
                    loaded_files.push(path);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping config file"),
            }
        }

        if self.verbose && loaded_files.len() > 1 {
            for (i, path) in loaded_files.iter().enumerate() {
                let status = if i == loaded_files.len() - 1 {
                    "highest precedence"
                } else {
                    "overridden"
                };
                warn!(path = %path.display(), status, "multiple config files found");
            }
        }

        Ok(merged_config)
    }

    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./domain-pattern.toml", "./.domain-pattern.toml"];

        candidates
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        let candidates = [".domain-pattern.toml", "domain-pattern.toml"];

        candidates
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// Follows the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domain-pattern").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations; values from `higher` win field by field.
    pub fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            classify: match (lower.classify, higher.classify) {
                (Some(lower), Some(higher)) => Some(ClassifySection {
                    input: higher.input.or(lower.input),
                    output_dir: higher.output_dir.or(lower.output_dir),
                    special_input: higher.special_input.or(lower.special_input),
                }),
                (lower, higher) => higher.or(lower),
            },
            whois: match (lower.whois, higher.whois) {
                (Some(lower), Some(higher)) => Some(WhoisSection {
                    timeout: higher.timeout.or(lower.timeout),
                    server: higher.server.or(lower.server),
                    default_domain: higher.default_domain.or(lower.default_domain),
                }),
                (lower, higher) => higher.or(lower),
            },
            generate: match (lower.generate, higher.generate) {
                (Some(lower), Some(higher)) => Some(GenerateSection {
                    length: higher.length.or(lower.length),
                    charset: higher.charset.or(lower.charset),
                    suffix: higher.suffix.or(lower.suffix),
                    filter: higher.filter.or(lower.filter),
                    filter_mode: higher.filter_mode.or(lower.filter_mode),
                    output: higher.output.or(lower.output),
                }),
                (lower, higher) => higher.or(lower),
            },
        }
    }

    fn validate_config(&self, config: &FileConfig) -> crate::Result<()> {
        if let Some(classify) = &config.classify {
            let paths = [
                ("input", &classify.input),
                ("output_dir", &classify.output_dir),
                ("special_input", &classify.special_input),
            ];
            for (name, value) in paths {
                if matches!(value, Some(p) if p.as_os_str().is_empty()) {
                    return Err(PatternError::config(format!(
                        "'classify.{}' cannot be empty",
                        name
                    )));
                }
            }
        }

        if let Some(whois) = &config.whois {
            if let Some(timeout_str) = &whois.timeout {
                match parse_timeout_string(timeout_str) {
                    Some(0) | None => {
                        return Err(PatternError::config(format!(
                            "Invalid timeout format '{}'. Use format like '5s', '30s', '2m'",
                            timeout_str
                        )));
                    }
                    Some(_) => {}
                }
            }
            if matches!(&whois.server, Some(s) if s.trim().is_empty()) {
                return Err(PatternError::config("'whois.server' cannot be empty"));
            }
        }

        if let Some(generate) = &config.generate {
            if generate.length == Some(0) {
                return Err(PatternError::config("'generate.length' must be at least 1"));
            }
            if let Some(charset) = &generate.charset {
                charset.parse::<Charset>()?;
            }
            if let Some(mode) = &generate.filter_mode {
                mode.parse::<FilterMode>()?;
            }
        }

        Ok(())
    }
}

/// Environment variable configuration (`DP_*`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub special_input: Option<PathBuf>,
    pub whois_timeout: Option<Duration>,
    pub whois_server: Option<String>,
    pub config: Option<PathBuf>,
}

/// Load configuration from environment variables.
///
/// Invalid values are logged and ignored.
pub fn load_env_config() -> EnvConfig {
    env_config_from(|key| env::var(key).ok())
}

/// Build an [`EnvConfig`] from an arbitrary variable lookup.
pub fn env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let mut env_config = EnvConfig {
        input: non_empty("DP_INPUT").map(PathBuf::from),
        output_dir: non_empty("DP_OUTPUT_DIR").map(PathBuf::from),
        special_input: non_empty("DP_SPECIAL_INPUT").map(PathBuf::from),
        whois_server: non_empty("DP_WHOIS_SERVER"),
        config: non_empty("DP_CONFIG").map(PathBuf::from),
        ..Default::default()
    };

    if let Some(timeout_str) = non_empty("DP_WHOIS_TIMEOUT") {
        match parse_timeout_string(&timeout_str) {
            Some(secs) if secs > 0 => {
                env_config.whois_timeout = Some(Duration::from_secs(secs));
                debug!(value = %timeout_str, "using DP_WHOIS_TIMEOUT");
            }
            _ => warn!(
                value = %timeout_str,
                "invalid DP_WHOIS_TIMEOUT, use format like '5s', '30s', '2m'"
            ),
        }
    }

    env_config
}

/// Parse a timeout string like "5s", "30s", "2m" into seconds.
///
/// Bare numbers are seconds. Minute values that overflow are rejected.
pub fn parse_timeout_string(timeout_str: &str) -> Option<u64> {
    let timeout_str = timeout_str.trim().to_lowercase();

    if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.trim().parse::<u64>().ok()
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.trim()
            .parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
    } else {
        timeout_str.parse::<u64>().ok()
    }
}

//! Domain Pattern CLI Application
//!
//! Buckets domain lists by character-repetition pattern, generates candidate
//! lists to bucket, and probes WHOIS for single domains. This binary owns
//! every path default; the library only works with the explicit
//! configuration it is handed.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use domain_pattern_lib::{
    classify_file, generate_domains, load_env_config, parse_timeout_string, run_special_pass,
    save_candidates, Charset, ClassificationSummary, ClassifyConfig, ConfigManager, EnvConfig,
    FileConfig, FilterMode, GenerateConfig, PatternError, SpecialPassConfig, SpecialPassOutcome,
    WhoisClient, WhoisProbe,
};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Domain list classified when no input is configured.
pub const DEFAULT_INPUT: &str = "domain-scan-results-combined/available_domains_all.txt";

/// Special-status domain list used when none is configured.
pub const DEFAULT_SPECIAL_INPUT: &str =
    "domain-scan-results-combined/special_status_domains_all.txt";

/// Output directory used when none is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "domain-check";

/// Domain probed by `whois` when none is given.
pub const DEFAULT_WHOIS_DOMAIN: &str = "bun.de";

const DEFAULT_WHOIS_TIMEOUT: Duration = Duration::from_secs(10);

/// Generated label length when none is configured.
pub const DEFAULT_GENERATE_LENGTH: usize = 3;

/// Generated label charset when none is configured.
pub const DEFAULT_CHARSET: &str = "D";

/// Suffix appended to generated labels when none is configured.
pub const DEFAULT_SUFFIX: &str = ".li";

/// CLI arguments for domain-pattern
#[derive(Parser, Debug)]
#[command(name = "domain-pattern")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Sai Dutt G.V <gvs46@protonmail.com>")]
#[command(about = "Bucket domain lists by character-repetition pattern")]
#[command(
    long_about = "Bucket domain lists by character-repetition pattern (AAAA, ABAB, ...).\n\nEach pattern gets its own sorted <PATTERN>.txt file. Candidate lists can be generated by length, charset and suffix, and a WHOIS probe with system-command fallback reports an availability verdict."
)]
#[command(styles = STYLES)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a domain list into <OUTPUT>/<PATTERN>.txt files
    Classify(ClassifyArgs),

    /// Classify the special-status domain list into <OUTPUT>/special
    Special(ClassifyArgs),

    /// Query WHOIS for one domain, falling back to the system whois command
    Whois(WhoisArgs),

    /// Generate a candidate domain list to classify
    Generate(GenerateArgs),
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ClassifyArgs {
    /// Domain list, one domain per line
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output directory (for `special`, the root that receives `special/`)
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(short = 'j', long = "json")]
    pub json: bool,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct WhoisArgs {
    /// Domain to query
    #[arg(value_name = "DOMAIN")]
    pub domain: Option<String>,

    /// Timeout per query, e.g. 10s, 1m
    #[arg(long = "timeout", value_name = "DURATION")]
    pub timeout: Option<String>,

    /// Query this WHOIS server instead of asking IANA
    #[arg(long = "server", value_name = "HOST")]
    pub server: Option<String>,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Label length
    #[arg(short = 'l', long = "length", value_name = "N")]
    pub length: Option<usize>,

    /// Charset: d (digits), D (letters), a (alphanumeric)
    #[arg(short = 'c', long = "charset", value_name = "SET")]
    pub charset: Option<String>,

    /// Domain suffix, e.g. .li
    #[arg(short = 's', long = "suffix", value_name = "SUFFIX")]
    pub suffix: Option<String>,

    /// Keep candidates matching this regex
    #[arg(short = 'r', long = "filter", value_name = "REGEX")]
    pub filter: Option<String>,

    /// Match the filter against the full domain or the label only
    #[arg(long = "filter-mode", value_name = "full|prefix")]
    pub filter_mode: Option<String>,

    /// Keep labels with this repetition pattern only, e.g. ABAB
    #[arg(long = "shape", value_name = "PATTERN")]
    pub shape: Option<String>,

    /// Write the list to FILE instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(&args);

    tracing::info!(
        version = domain_pattern_lib::VERSION,
        "domain-pattern starting"
    );

    let env_config = load_env_config();
    let file_config = match load_file_config(&args, &env_config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let code = match &args.command {
        Commands::Classify(cli) => {
            let config = resolve_classify_config(cli, &env_config, &file_config);
            run_classify(&config, cli.json)
        }
        Commands::Special(cli) => {
            let config = resolve_special_config(cli, &env_config, &file_config);
            run_special(&config, cli.json)
        }
        Commands::Whois(cli) => match resolve_whois(cli, &env_config, &file_config) {
            Ok((client, domain)) => run_whois(&client, &domain).await,
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        Commands::Generate(cli) => match resolve_generate_config(cli, &file_config) {
            Ok((config, output)) => run_generate(&config, output.as_deref()),
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
    };

    process::exit(code);
}

/// Route `tracing` output to stderr. `RUST_LOG` overrides the flags.
fn init_logging(args: &Args) {
    let level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "domain_pattern={level},domain_pattern_lib={level}",
            level = level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load configuration files.
///
/// Precedence for choosing the file: `--config` > `DP_CONFIG` > discovery.
/// An explicitly named file must load; discovery failures fall back to
/// defaults.
fn load_file_config(args: &Args, env_config: &EnvConfig) -> Result<FileConfig, PatternError> {
    let manager = ConfigManager::new(args.verbose);

    if let Some(path) = args.config.as_ref().or(env_config.config.as_ref()) {
        tracing::info!(path = %path.display(), "using explicit config file");
        return manager.load_file(path);
    }

    match manager.discover_and_load() {
        Ok(config) => Ok(config),
        Err(e) => {
            tracing::warn!(error = %e, "config discovery failed, using defaults");
            Ok(FileConfig::default())
        }
    }
}

/// Resolve primary-pass paths: CLI > env > config file > built-in default.
fn resolve_classify_config(
    cli: &ClassifyArgs,
    env_config: &EnvConfig,
    file_config: &FileConfig,
) -> ClassifyConfig {
    let section = file_config.classify.clone().unwrap_or_default();

    let input = cli
        .input
        .clone()
        .or_else(|| env_config.input.clone())
        .or(section.input)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    let output = cli
        .output
        .clone()
        .or_else(|| env_config.output_dir.clone())
        .or(section.output_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    ClassifyConfig::new(input, output)
}

/// Resolve special-pass paths: CLI > env > config file > built-in default.
fn resolve_special_config(
    cli: &ClassifyArgs,
    env_config: &EnvConfig,
    file_config: &FileConfig,
) -> SpecialPassConfig {
    let section = file_config.classify.clone().unwrap_or_default();

    let input = cli
        .input
        .clone()
        .or_else(|| env_config.special_input.clone())
        .or(section.special_input)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SPECIAL_INPUT));
    let root = cli
        .output
        .clone()
        .or_else(|| env_config.output_dir.clone())
        .or(section.output_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    SpecialPassConfig::new(input, root)
}

/// Resolve the WHOIS client and target domain.
fn resolve_whois(
    cli: &WhoisArgs,
    env_config: &EnvConfig,
    file_config: &FileConfig,
) -> Result<(WhoisClient, String), String> {
    let section = file_config.whois.clone().unwrap_or_default();

    let timeout = match &cli.timeout {
        Some(raw) => match parse_timeout_string(raw) {
            Some(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                return Err(format!(
                    "Invalid timeout '{}'. Use format like '5s', '30s', '2m'",
                    raw
                ))
            }
        },
        None => env_config
            .whois_timeout
            .or_else(|| file_config.whois_timeout())
            .unwrap_or(DEFAULT_WHOIS_TIMEOUT),
    };

    let server = cli
        .server
        .clone()
        .or_else(|| env_config.whois_server.clone())
        .or(section.server);

    let domain = cli
        .domain
        .clone()
        .or(section.default_domain)
        .unwrap_or_else(|| DEFAULT_WHOIS_DOMAIN.to_string());

    let mut client = WhoisClient::with_timeout(timeout);
    if let Some(server) = server {
        client = client.with_server(server);
    }
    Ok((client, domain))
}

/// Resolve generation parameters: CLI > config file > built-in default.
fn resolve_generate_config(
    cli: &GenerateArgs,
    file_config: &FileConfig,
) -> Result<(GenerateConfig, Option<PathBuf>), PatternError> {
    let section = file_config.generate.clone().unwrap_or_default();

    let length = cli
        .length
        .or(section.length)
        .unwrap_or(DEFAULT_GENERATE_LENGTH);
    let charset: Charset = cli
        .charset
        .as_deref()
        .or(section.charset.as_deref())
        .unwrap_or(DEFAULT_CHARSET)
        .parse()?;
    let suffix = cli
        .suffix
        .clone()
        .or(section.suffix)
        .unwrap_or_else(|| DEFAULT_SUFFIX.to_string());

    let mut config = GenerateConfig::new(length, charset, suffix);
    if let Some(filter) = cli.filter.clone().or(section.filter) {
        let mode = match cli
            .filter_mode
            .as_deref()
            .or(section.filter_mode.as_deref())
        {
            Some(raw) => raw.parse::<FilterMode>()?,
            None => FilterMode::default(),
        };
        config = config.with_filter(filter, mode);
    }
    if let Some(shape) = &cli.shape {
        config = config.with_shape(shape);
    }

    let output = cli.output.clone().or(section.output);
    Ok((config, output))
}

/// Candidate generation. Names go to stdout unless a file is given.
fn run_generate(config: &GenerateConfig, output: Option<&std::path::Path>) -> i32 {
    let names = match generate_domains(config) {
        Ok(names) => names,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    match output {
        Some(path) => match save_candidates(path, &names) {
            Ok(()) => {
                ui::print_generated(names.len(), path);
                0
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        None => {
            for name in &names {
                println!("{}", name);
            }
            0
        }
    }
}

/// Primary classifier. Exit code 0 on success, 1 on any halt.
fn run_classify(config: &ClassifyConfig, json: bool) -> i32 {
    match classify_file(config) {
        Ok(summary) => match print_summary(&summary, json) {
            Ok(()) => {
                if !json {
                    ui::print_completion(&config.output_dir);
                }
                0
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            if !e.is_clean_halt() {
                eprintln!("Files written before the failure were left in place.");
            }
            1
        }
    }
}

/// Special-status pass. Failures are reported, never fatal.
fn run_special(config: &SpecialPassConfig, json: bool) -> i32 {
    if !json {
        ui::print_special_start(&config.input_path);
    }

    match run_special_pass(config) {
        SpecialPassOutcome::Completed(summary) => {
            if !json {
                ui::print_special_success();
            }
            if let Err(e) = print_summary(&summary, json) {
                eprintln!("Error: {}", e);
            }
        }
        SpecialPassOutcome::Failed(e) => ui::print_special_failure(&e),
    }
    0
}

fn print_summary(summary: &ClassificationSummary, json: bool) -> Result<(), PatternError> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        ui::print_report(summary);
    }
    Ok(())
}

/// WHOIS probe. Exit code 1 only when the fallback fails too.
async fn run_whois(client: &WhoisClient, domain: &str) -> i32 {
    ui::print_whois_start(domain);

    match client.probe(domain).await {
        Ok(probe) => {
            match &probe {
                WhoisProbe::Structured(record) => ui::print_whois_record(record),
                WhoisProbe::Fallback { reason, output } => {
                    ui::print_whois_fallback(reason, output)
                }
            }
            ui::print_availability(&probe.availability());
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

//! The `http-probe` command.
//!
//! Subcommands:
//!
//! - `http-probe post` - plain POSTs: oversized payload, invalid and valid JSON
//! - `http-probe expect` - the same POSTs with `Expect: 100-continue`
//! - `http-probe multipart` - multipart uploads of in-memory files
//! - `http-probe all` - every suite in turn
//! - `http-probe send <path>` - one ad-hoc request
//!
//! Logs go to stderr (`RUST_LOG`, default `warn`); the printout goes to
//! stdout.

use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use http_probe::auth::apply_authorization;
use http_probe::config::{get_config, load_config, load_config_file, update_config, ConfigError};
use http_probe::executor::ExecutionConfig;
use http_probe::models::request::{HttpMethod, HttpRequest, RequestBody};
use http_probe::multipart::VirtualFile;
use http_probe::scenarios::{run_scenarios, run_suite, Expectation, Scenario, Suite, SuiteReport};

#[derive(Parser)]
#[command(name = "http-probe", version, about = "Send crafted requests to a running HTTP server")]
struct Cli {
    /// Base URL of the server under test
    #[arg(long, global = true)]
    url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Authorization for suite requests; a bare token is sent as Bearer
    #[arg(long, global = true)]
    token: Option<String>,

    /// JSON settings file with an "http-probe" object
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print the verdict report as JSON after the run
    #[arg(long, global = true)]
    json: bool,

    /// Exit with status 1 when any scenario fails its expectation
    #[arg(long, global = true)]
    check: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plain POST requests in a rapid sequence
    Post,
    /// POST requests announced with Expect: 100-continue
    Expect,
    /// Multipart uploads of in-memory files
    Multipart,
    /// Every suite, one after another
    All,
    /// Send a single request
    Send {
        /// Path joined onto the base URL, or an absolute http(s) URL
        path: String,

        /// Request method
        #[arg(short = 'X', long, default_value = "POST")]
        method: String,

        /// Header as "Name: value"; may be repeated
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Raw request body
        #[arg(short, long, conflicts_with = "files")]
        data: Option<String>,

        /// File to upload as a multipart part; may be repeated
        #[arg(short = 'F', long = "file")]
        files: Vec<PathBuf>,

        /// Add an Expect: 100-continue header
        #[arg(long = "expect-continue")]
        expect_continue: bool,
    },
}

#[derive(Debug)]
enum CliError {
    Config(ConfigError),
    Usage(String),
    Output(io::Error),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::Usage(_) => 2,
            CliError::Output(_) => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "{}", e),
            CliError::Usage(msg) => write!(f, "{}", msg),
            CliError::Output(e) => write!(f, "failed to write output: {}", e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Output(e)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let check = cli.check;

    match run(cli) {
        Ok(reports) => {
            if check && !reports.iter().all(SuiteReport::all_passed) {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<Vec<SuiteReport>, CliError> {
    configure(&cli)?;
    let config = get_config();
    log::debug!("Target server: {}", config.base_url);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let reports = match cli.command {
        Commands::Post => vec![run_suite(Suite::Post, &config, &mut out)?],
        Commands::Expect => vec![run_suite(Suite::ExpectContinue, &config, &mut out)?],
        Commands::Multipart => vec![run_suite(Suite::Multipart, &config, &mut out)?],
        Commands::All => {
            let mut reports = Vec::new();
            for suite in Suite::all() {
                reports.push(run_suite(suite, &config, &mut out)?);
                writeln!(out)?;
            }
            reports
        }
        Commands::Send {
            path,
            method,
            headers,
            data,
            files,
            expect_continue,
        } => {
            let url = if path.starts_with("http://") || path.starts_with("https://") {
                path
            } else {
                config.url_for(&path)
            };
            let request =
                adhoc_request(&method, url, &headers, data, &files, expect_continue, &config.auth_token)?;
            let description = format!("Sending {} {}...", request.method, request.url);
            let scenario = Scenario::new("send", description, request, Expectation::Handled);
            vec![run_scenarios(
                "send",
                &[scenario],
                &ExecutionConfig::from(&config),
                &mut out,
            )?]
        }
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&reports)
            .map_err(|e| CliError::Output(io::Error::new(io::ErrorKind::Other, e)))?;
        writeln!(out, "{}", json)?;
    }

    Ok(reports)
}

/// Loads the settings file, then lets flags override it.
fn configure(cli: &Cli) -> Result<(), CliError> {
    match &cli.config {
        Some(path) => load_config_file(path)?,
        None => load_config(None)?,
    };

    update_config(|config| {
        if let Some(url) = &cli.url {
            config.base_url = url.clone();
        }
        if let Some(secs) = cli.timeout {
            config.timeout = secs.saturating_mul(1000);
        }
        if let Some(token) = &cli.token {
            config.auth_token = token.clone();
        }
    })?;

    Ok(())
}

fn adhoc_request(
    method: &str,
    url: String,
    headers: &[String],
    data: Option<String>,
    files: &[PathBuf],
    expect_continue: bool,
    auth_token: &str,
) -> Result<HttpRequest, CliError> {
    let method = HttpMethod::from_str(method)
        .ok_or_else(|| CliError::Usage(format!("unknown method '{}'", method)))?;
    let mut request = HttpRequest::new(method, url);

    for header in headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| CliError::Usage(format!("header '{}' is not 'Name: value'", header)))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CliError::Usage(format!("header '{}' has no name", header)));
        }
        request.add_header(name, value.trim());
    }

    if request.header("authorization").is_none() {
        apply_authorization(&mut request, auth_token);
    }

    if !files.is_empty() {
        let files = files
            .iter()
            .map(|path| {
                VirtualFile::from_path(path).map_err(|e| {
                    CliError::Usage(format!("cannot read {}: {}", path.display(), e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        request.body = Some(RequestBody::Multipart(files));
    } else if let Some(data) = data {
        request.set_body(data);
    }

    if expect_continue {
        request.add_header("Expect", "100-continue");
    }

    Ok(request)
}

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use githack::areas::recovery::Recovery;
use githack::areas::remote::{HttpRemote, normalize_base};
use githack::areas::repository::Repository;
use githack::areas::workspace::Workspace;
use githack::artifacts::core::Reporter;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Root of the default output directories
const OUTPUT_ROOT: &str = "githack_output";

#[derive(Parser)]
#[command(
    name = "githack",
    version,
    about = "Recover the files of an exposed .git directory",
    long_about = "Rebuilds the tracked files of a repository from a .git directory \
    that is published over HTTP, using only its index and loose objects. \
    A local repository can be restored from its HEAD commit as well.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[arg(
        index = 1,
        help = "URL of the exposed .git directory, or path of a local repository"
    )]
    target: String,
    #[arg(short = 't', long, value_enum, default_value_t = Mode::Url, help = "Recovery mode")]
    mode: Mode,
    #[arg(
        short,
        long,
        help = "Output directory [default: githack_output/<host or directory name>]"
    )]
    output: Option<PathBuf>,
    #[arg(short, long, help = "Concurrent object downloads [default: 2 x cores]")]
    jobs: Option<usize>,
    #[arg(long, value_name = "SECS", help = "Per-request timeout [default: none]")]
    timeout: Option<u64>,
    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Download the index and loose objects over HTTP
    Url,
    /// Restore HEAD of a repository on disk
    Local,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let output = match &cli.output {
        Some(output) => output.clone(),
        None => default_output(cli.mode, &cli.target)?,
    };
    tracing::info!(output = %output.display(), "writing recovered files");
    let workspace = Workspace::new(&output);

    match cli.mode {
        Mode::Url => {
            let remote = HttpRemote::new(&cli.target, cli.timeout.map(Duration::from_secs))
                .with_context(|| format!("invalid target URL {}", cli.target))?;
            let mut recovery = Recovery::new(remote, workspace, Reporter::stdout());
            if let Some(jobs) = cli.jobs {
                recovery = recovery.with_capacity(jobs);
            }

            recovery.recover().await?;
        }
        Mode::Local => {
            let repository = Repository::open(&cli.target)?;
            let mut reporter = Reporter::stdout();

            repository.restore(&workspace, &mut reporter).await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env()
        .context("invalid RUST_LOG filter")?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}

/// `githack_output/<host[:port]>` for URLs, `githack_output/<directory>` for paths
fn default_output(mode: Mode, target: &str) -> Result<PathBuf> {
    let name = match mode {
        Mode::Url => {
            let url = normalize_base(target)
                .with_context(|| format!("invalid target URL {target}"))?;
            let host = url.host_str().context("target URL has no host")?;

            // repositories on different ports of one host stay apart
            match url.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            }
        }
        Mode::Local => {
            let path = Path::new(target)
                .canonicalize()
                .with_context(|| format!("cannot access {target}"))?;
            // name a bare `.git` target after the work tree holding it
            let path = if path.file_name().is_some_and(|name| name == ".git") {
                path.parent().map(Path::to_path_buf).unwrap_or(path)
            } else {
                path
            };

            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "repository".to_string())
        }
    };

    Ok(Path::new(OUTPUT_ROOT).join(name))
}

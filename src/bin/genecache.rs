use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use genecache::config::{LogConfig, LogFormat, LogLevel, RawSettings, SettingsLoader};
use genecache::engine::Warmer;
use genecache::events::TracingSink;
use genecache::fetch::HttpFetcher;
use genecache::input::RecordReader;
use genecache::logging;
use genecache::urls::DEFAULT_BASE_URL;

#[derive(Parser)]
#[command(name = "genecache")]
#[command(about = "cli for caching all dictybase genes")]
#[command(version)]
struct Cli {
    #[arg(long, value_enum, default_value_t = LogLevel::Info, help = "log level for the application")]
    log_level: LogLevel,

    #[arg(
        long,
        value_enum,
        default_value_t = LogFormat::Json,
        help = "format of the logging out, either of json or text"
    )]
    log_format: LogFormat,

    #[arg(
        short,
        long,
        help = "Input file with list of paired dictybase gene and transcript ids[required]"
    )]
    input: Option<PathBuf>,

    #[arg(long, help = "Name of the output log file, default goes to STDERR")]
    log_file: Option<PathBuf>,

    #[arg(short, long, default_value = DEFAULT_BASE_URL, help = "Base url for dictybase")]
    url: String,

    #[arg(long, default_value_t = 1, help = "Number of genes cached in parallel")]
    workers: usize,

    #[arg(long, help = "Per request timeout in seconds")]
    timeout: Option<u64>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        return ExitCode::from(2);
    }
    ExitCode::SUCCESS
}

fn run() -> miette::Result<()> {
    let cli = Cli::parse();
    let settings = SettingsLoader::resolve(RawSettings {
        input: cli.input,
        base_url: cli.url,
        workers: cli.workers,
        timeout_secs: cli.timeout,
        log: LogConfig {
            level: cli.log_level,
            format: cli.log_format,
            file: cli.log_file,
        },
    })?;
    logging::init(&settings.log)?;

    let records = RecordReader::open(&settings.input)?;
    let fetcher = HttpFetcher::new(settings.timeout)?;
    let warmer = Warmer::new(fetcher, settings.urls);
    let summary = warmer.run_concurrent(records, settings.workers, &TracingSink)?;
    tracing::info!(
        genes = summary.genes,
        panels = summary.panels,
        "finished caching gene list"
    );
    Ok(())
}

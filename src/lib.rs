//! transkribus-iiif: publish Transkribus transcriptions as IIIF.
//!
//! Reads PAGE XML exports with Transkribus custom tags and writes, per
//! diary, a IIIF Presentation 3 manifest plus three Web Annotation pages per
//! page image: layout regions, line transcriptions and tagged entities.
//! Entities linked to Wikidata are enriched with a label and description.
//!
//! # Modules
//!
//! - [`page`]: PAGE XML model and reader
//! - [`iiif`]: manifest, annotation and selector types
//! - [`annotate`]: the three annotation passes
//! - [`resolve`]: memoized Wikidata entity lookups
//! - [`batch`]: the diary-by-diary driver
//! - [`error`]: error types

pub mod annotate;
pub mod batch;
pub mod error;
pub mod http;
pub mod iiif;
pub mod page;
pub mod resolve;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

pub use error::ConvertError;

use annotate::OutputLayout;
use batch::{BatchConfig, BatchRunner, BatchSummary};
use iiif::image_info::HttpImageInfo;
use page::io_page_xml::PageXmlOptions;
use page::DEFAULT_ENTITY_TAGS;
use resolve::wikidata::{WikidataClient, DEFAULT_ENDPOINT};

/// The transkribus-iiif CLI application.
#[derive(Parser)]
#[command(name = "transkribus-iiif")]
#[command(version, author, about)]
struct Cli {
    /// Diary index: a JSON array of {"id", "images"} objects.
    #[arg(long, env = "TRANSKRIBUS_IIIF_DIARIES", default_value = batch::DEFAULT_DIARIES_FILE)]
    diaries: PathBuf,

    /// Directory with one subdirectory of PAGE XML files per diary.
    #[arg(long, env = "TRANSKRIBUS_IIIF_DATA_DIR", default_value = batch::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Directory the public prefix maps to.
    #[arg(long, env = "TRANSKRIBUS_IIIF_OUTPUT_DIR", default_value = batch::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Public URL under which the output directory is served.
    #[arg(
        long,
        env = "TRANSKRIBUS_IIIF_PUBLIC_PREFIX",
        default_value = batch::DEFAULT_PUBLIC_PREFIX,
        value_parser = parse_http_url
    )]
    public_prefix: String,

    /// Wikidata SPARQL endpoint.
    #[arg(
        long,
        env = "TRANSKRIBUS_IIIF_SPARQL_ENDPOINT",
        default_value = DEFAULT_ENDPOINT,
        value_parser = parse_http_url
    )]
    sparql_endpoint: String,

    /// User-Agent header sent with every request.
    #[arg(long, env = "TRANSKRIBUS_IIIF_USER_AGENT", default_value = batch::DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Language tag for canvas labels.
    #[arg(long, env = "TRANSKRIBUS_IIIF_LANGUAGE", default_value = batch::DEFAULT_LANGUAGE)]
    language: String,

    /// Custom tag names treated as entities.
    #[arg(
        long,
        env = "TRANSKRIBUS_IIIF_TAGS",
        value_delimiter = ',',
        default_values_t = DEFAULT_ENTITY_TAGS.iter().map(|tag| tag.to_string()).collect::<Vec<_>>()
    )]
    tags: Vec<String>,

    /// Timeout for each HTTP request, in seconds.
    #[arg(long, env = "TRANSKRIBUS_IIIF_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Fail when a page matches no canvas in its diary's manifest.
    #[arg(long, env = "TRANSKRIBUS_IIIF_STRICT")]
    strict: bool,

    /// Format of the run summary.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

fn parse_http_url(raw: &str) -> Result<String, String> {
    let parsed = url::Url::parse(raw).map_err(|err| format!("invalid URL '{raw}': {err}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(raw.to_string()),
        other => Err(format!("unsupported URL scheme '{other}' (expected http or https)")),
    }
}

/// Run the transkribus-iiif CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), ConvertError> {
    let cli = Cli::parse();

    let config = BatchConfig {
        diaries_file: cli.diaries,
        data_dir: cli.data_dir,
        output: OutputLayout {
            public_prefix: cli.public_prefix,
            output_dir: cli.output_dir,
            language: cli.language,
        },
        page_options: PageXmlOptions {
            entity_tags: cli.tags,
        },
        strict: cli.strict,
    };

    let agent = http::build_agent(Duration::from_secs(cli.timeout_secs));
    let images = HttpImageInfo::new(agent.clone(), cli.user_agent.as_str());
    let wikidata = WikidataClient::new(agent, cli.sparql_endpoint, cli.user_agent);

    let mut runner = BatchRunner::new(&config, &images, wikidata);
    let summary = runner.run()?;
    log::info!("{} entity lookups cached", runner.resolver().cached());

    print_summary(&summary, cli.report)
}

fn print_summary(summary: &BatchSummary, format: ReportFormat) -> Result<(), ConvertError> {
    match format {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(summary).map_err(|source| {
                ConvertError::JsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{json}");
        }
        ReportFormat::Text => print!("{summary}"),
    }
    Ok(())
}

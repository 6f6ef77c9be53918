use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use universal_apidocs::config::{FetchConfig, RateLimitConfig, ServerConfig};
use universal_apidocs::logging::{LoggingConfig, init_logging, parse_level};
use universal_apidocs::models::ApiDoc;
use universal_apidocs::scraper::HttpFetcher;
use universal_apidocs::{DocPipeline, Format, web};

#[derive(Parser)]
#[command(name = "universal-apidocs")]
#[command(about = "Normalize OpenAPI, Swagger and HTML API documentation into one model")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "APIDOCS_LOG", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a local documentation file
    Parse {
        file: PathBuf,
        /// Content-type hint, defaults to one derived from the file extension
        #[arg(long)]
        content_type: Option<String>,
        /// Skip detection and use this format (json, yaml, html)
        #[arg(long)]
        format: Option<Format>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fetch and parse remote documentation
    Fetch {
        url: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Retry failed JSON/YAML extraction as HTML
        #[arg(long)]
        html_fallback: bool,
    },
    /// Start the REST service
    Serve {
        #[arg(long, env = "APIDOCS_HOST", default_value = "127.0.0.1")]
        host: IpAddr,
        #[arg(short, long, env = "APIDOCS_PORT", default_value = "8080")]
        port: u16,
        /// Submissions allowed per domain within the window
        #[arg(long, env = "APIDOCS_RATE_LIMIT", default_value = "1")]
        rate_limit: usize,
        #[arg(long, env = "APIDOCS_RATE_WINDOW_SECS", default_value = "5")]
        rate_window_secs: u64,
        #[arg(long, env = "APIDOCS_HTML_FALLBACK")]
        html_fallback: bool,
        #[arg(long, env = "APIDOCS_FETCH_TIMEOUT_SECS", default_value = "30")]
        fetch_timeout_secs: u64,
    },
}

fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => "application/json",
        Some("yaml") | Some("yml") => "application/yaml",
        Some("html") | Some("htm") => "text/html",
        _ => "",
    }
}

fn write_doc(doc: &ApiDoc, output: Option<PathBuf>) -> Result<()> {
    let rendered = serde_json::to_string_pretty(doc)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "API doc saved");
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn pipeline(fetch: &FetchConfig, html_fallback: bool) -> Result<DocPipeline> {
    let fetcher = Arc::new(HttpFetcher::new(fetch)?);
    Ok(DocPipeline::new(fetcher).with_html_fallback(html_fallback))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        level: parse_level(&cli.log_level),
        use_json: cli.log_json,
    });

    match cli.command {
        Commands::Parse {
            file,
            content_type,
            format,
            description,
            output,
        } => {
            let body = std::fs::read(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let source = file.display().to_string();
            let pipeline = pipeline(&FetchConfig::default(), false)?;

            let doc = match format {
                Some(format) => {
                    pipeline.ingest_with_format(format, &body, &source, description.as_deref())?
                }
                None => {
                    let hint = content_type.as_deref().unwrap_or(content_type_for(&file));
                    pipeline.ingest_bytes(hint, &body, &source, description.as_deref())?
                }
            };
            write_doc(&doc, output)?;
        }
        Commands::Fetch {
            url,
            description,
            output,
            html_fallback,
        } => {
            let pipeline = pipeline(&FetchConfig::default(), html_fallback)?;
            let doc = pipeline.ingest_url(&url, description.as_deref()).await?;
            write_doc(&doc, output)?;
        }
        Commands::Serve {
            host,
            port,
            rate_limit,
            rate_window_secs,
            html_fallback,
            fetch_timeout_secs,
        } => {
            let config = ServerConfig {
                host,
                port,
                rate_limit: RateLimitConfig {
                    max_requests: rate_limit,
                    window: Duration::from_secs(rate_window_secs),
                },
                html_fallback,
                fetch: FetchConfig {
                    timeout: Duration::from_secs(fetch_timeout_secs),
                    ..FetchConfig::default()
                },
            };
            web::run_server(config).await?;
        }
    }

    Ok(())
}

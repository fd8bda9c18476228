use anyhow::{bail, Result};
use antibody_leads::config::{
    find_config_file, get_config, load_config, save_config, Config, LOCAL_CONFIG_FILE,
};
use antibody_leads::crawl::scrape;
use antibody_leads::enrich::{
    extract_emails, fetch_and_summarize, EmailExtractor, KeywordDictionary, Summarizer,
};
use antibody_leads::models::{CrawlRequest, EnrichedArticle, ProgressEvent, SearchQuery, NO_EMAIL};
use antibody_leads::utils::HttpClient;
use clap::{Parser, Subcommand, ValueEnum};
use futures_util::{pin_mut, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Antibody Leads - find antibody research leads in PubMed
#[derive(Parser, Debug)]
#[command(name = "antibody-leads")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Crawl PubMed for antibody research leads", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show supported environment variables
    #[arg(long, global = true)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Table on a terminal, JSON lines otherwise
    Auto,
    /// Progress bar and a summary table
    Table,
    /// One JSON object per line
    Json,
    /// Server-sent-event frames (`data: <json>`)
    Sse,
}

impl OutputFormat {
    fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if std::io::stdout().is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crawl search results and stream enriched leads
    #[command(alias = "s")]
    Scrape {
        /// Protein or topic of interest
        #[arg(long, short, default_value = "")]
        target: String,

        /// Maximum number of articles (default: crawl.default_max_results)
        #[arg(long, short)]
        max_results: Option<usize>,

        /// Skip articles whose first author has more publications than this
        #[arg(long, short = 'p')]
        max_publications: Option<u32>,
    },

    /// Print the search query generated for a target
    Query {
        /// Protein or topic of interest
        #[arg(long, short, default_value = "")]
        target: String,
    },

    /// Fetch one article page and summarize it
    Summarize {
        /// Article URL
        url: String,

        /// Protein or topic of interest
        #[arg(long, short, default_value = "")]
        target: String,
    },

    /// Extract contact emails from one article page
    Emails {
        /// Article URL
        url: String,
    },

    /// Show or create configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Write a default configuration file
    Init {
        /// Destination (default: ./antibody-leads.toml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Print environment variables
fn print_env_vars() {
    println!("Environment Variables:");
    println!();
    println!("Every configuration key can be set as ANTIBODY_LEADS__<SECTION>__<KEY>, e.g.:");
    println!("  ANTIBODY_LEADS__HTTP__TIMEOUT_SECS          Request timeout (default: 30)");
    println!("  ANTIBODY_LEADS__HTTP__MAX_ATTEMPTS          Attempts per retried request (default: 5)");
    println!("  ANTIBODY_LEADS__HTTP__BASE_URL              Site root (default: https://pubmed.ncbi.nlm.nih.gov/)");
    println!("  ANTIBODY_LEADS__CRAWL__CONCURRENCY          Enrichment workers (default: 10)");
    println!("  ANTIBODY_LEADS__CRAWL__PAGE_DELAY_MIN_MS    Pause between pages, lower bound (default: 1000)");
    println!("  ANTIBODY_LEADS__CRAWL__PAGE_DELAY_MAX_MS    Pause between pages, upper bound (default: 3000)");
    println!("  ANTIBODY_LEADS__CRAWL__MAX_PAGE_FAILURES    Abort after this many failures of one page (default: unset)");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG                                    Logging filter (e.g., antibody_leads=debug)");
    std::process::exit(0);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.env {
        print_env_vars();
    }

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("antibody_leads={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = if let Some(config_path) = &cli.config {
        load_config(config_path)?
    } else if let Some(config_path) = find_config_file() {
        tracing::info!("Using config file: {}", config_path.display());
        load_config(&config_path)?
    } else {
        get_config()?
    };

    let format = cli.output.resolve();

    match cli.command {
        Some(Commands::Scrape {
            target,
            max_results,
            max_publications,
        }) => {
            let mut request = CrawlRequest::new(target)
                .max_results(max_results.unwrap_or(config.crawl.default_max_results));
            if let Some(cap) = max_publications {
                request = request.max_publications(cap);
            }
            run_scrape(&config, request, format, cli.quiet).await?;
        }

        Some(Commands::Query { target }) => {
            println!("{}", SearchQuery::for_target(&target));
        }

        Some(Commands::Summarize { url, target }) => {
            let client = HttpClient::from_config(&config.http)?;
            let summarizer =
                Summarizer::new(KeywordDictionary::with_extra(&config.summary.extra_keywords));
            let result = fetch_and_summarize(&client, &summarizer, &url, &target).await;

            match format {
                OutputFormat::Table => {
                    if !result.body.is_empty() {
                        println!("{}", result.body);
                        println!();
                    }
                    println!("{}", result.summary);
                }
                _ => println!("{}", serde_json::to_string_pretty(&result)?),
            }
        }

        Some(Commands::Emails { url }) => {
            let client = HttpClient::from_config(&config.http)?;
            let extractor = EmailExtractor::new()?;
            let emails = extract_emails(&client, &extractor, &url).await;

            match format {
                OutputFormat::Table if emails.is_empty() => println!("{}", NO_EMAIL),
                OutputFormat::Table => emails.iter().for_each(|email| println!("{}", email)),
                _ => println!("{}", serde_json::to_string_pretty(&emails)?),
            }
        }

        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => {
                print!("{}", toml::to_string_pretty(&config)?);
            }
            ConfigAction::Init { path, force } => {
                let path = path.unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE));
                if path.exists() && !force {
                    bail!("{} already exists (use --force to overwrite)", path.display());
                }
                save_config(&Config::default(), &path)?;
                if !cli.quiet {
                    println!("Wrote default configuration to {}", path.display());
                }
            }
        },

        None => {
            println!("Antibody Leads v{}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Run with --help for usage information");
        }
    }

    Ok(())
}

/// Stream a crawl to stdout in the requested format
async fn run_scrape(
    config: &Config,
    request: CrawlRequest,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let events = scrape(config, request);
    pin_mut!(events);

    let progress = if quiet || format != OutputFormat::Table {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:40}] {pos:>3}% {msg}")?
                .progress_chars("=> "),
        );
        bar
    };

    let mut articles = Vec::new();
    let mut failure = None;
    let mut stdout = std::io::stdout();

    while let Some(event) = events.next().await {
        match format {
            OutputFormat::Sse => {
                write!(stdout, "{}", event.to_sse_frame()?)?;
                stdout.flush()?;
            }
            OutputFormat::Json => {
                writeln!(stdout, "{}", serde_json::to_string(&event)?)?;
                stdout.flush()?;
            }
            _ => {}
        }

        let ProgressEvent {
            percent,
            article,
            error,
            ..
        } = event;
        progress.set_position(percent.round() as u64);
        if let Some(article) = article {
            progress.set_message(truncate(&article.title, 40));
            articles.push(article);
        }
        if error.is_some() {
            failure = error;
        }
    }
    progress.finish_and_clear();

    if format == OutputFormat::Table {
        print_articles(&articles);
        if !quiet {
            println!(
                "{} leads found ({})",
                articles.len(),
                chrono::Local::now().format("%Y-%m-%d %H:%M")
            );
        }
    }

    if let Some(error) = failure {
        bail!(error);
    }
    Ok(())
}

fn print_articles(articles: &[EnrichedArticle]) {
    use comfy_table::{Attribute, Cell, Table};

    if articles.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Title", "First author", "Pubs", "Email", "Link"]);

    for article in articles {
        let first_author = article.authors.split(',').next().unwrap_or_default();
        table.add_row(vec![
            Cell::new(truncate(&article.title, 50)).add_attribute(Attribute::Bold),
            Cell::new(truncate(first_author, 25)),
            Cell::new(article.first_author_publications),
            Cell::new(&article.email),
            Cell::new(&article.source_link),
        ]);
    }
    println!("{table}");
}

/// Shorten `text` to at most `max` characters, marking the cut with "..."
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let head = text.chars().take(max.saturating_sub(3)).collect::<String>();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["antibody-leads"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert_eq!(cli.output, OutputFormat::Auto);
        assert!(cli.config.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["antibody-leads", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_output_format() {
        let cli = Cli::parse_from(["antibody-leads", "-o", "sse"]);
        assert_eq!(cli.output, OutputFormat::Sse);

        let cli = Cli::parse_from(["antibody-leads", "--output", "json"]);
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(OutputFormat::Json.resolve(), OutputFormat::Json);
    }

    #[test]
    fn test_cli_scrape_command() {
        let cli = Cli::parse_from([
            "antibody-leads",
            "scrape",
            "--target",
            "CD47",
            "--max-results",
            "25",
            "--max-publications",
            "150",
        ]);
        match cli.command {
            Some(Commands::Scrape {
                target,
                max_results,
                max_publications,
            }) => {
                assert_eq!(target, "CD47");
                assert_eq!(max_results, Some(25));
                assert_eq!(max_publications, Some(150));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_scrape_defaults() {
        let cli = Cli::parse_from(["antibody-leads", "s"]);
        match cli.command {
            Some(Commands::Scrape {
                target,
                max_results,
                max_publications,
            }) => {
                assert_eq!(target, "");
                assert_eq!(max_results, None);
                assert_eq!(max_publications, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_summarize_command() {
        let cli = Cli::parse_from([
            "antibody-leads",
            "summarize",
            "https://pubmed.ncbi.nlm.nih.gov/1/",
            "-t",
            "PD-L1",
        ]);
        assert!(matches!(
            cli.command,
            Some(Commands::Summarize { ref url, ref target })
                if url == "https://pubmed.ncbi.nlm.nih.gov/1/" && target == "PD-L1"
        ));
    }

    #[test]
    fn test_cli_config_init() {
        let cli = Cli::parse_from(["antibody-leads", "config", "init", "/tmp/x.toml", "--force"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigAction::Init { ref path, force: true }
            }) if path.as_deref() == Some(std::path::Path::new("/tmp/x.toml"))
        ));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééééé", 6), "ééé...");
    }
}

//! TUBERAG - Chat with a YouTube channel's transcripts
//!
//! Scrapes the most recent videos of a channel, uploads their transcripts
//! to a Gemini File Search store, and answers questions grounded in them,
//! recording costs and conversation history locally.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive mode - prompts for the channel
//! tuberag
//!
//! # Non-interactive with parameters
//! tuberag --channel="https://youtube.com/@channel" --numvideos=10
//!
//! # Run specific prompts
//! tuberag --channel="..." --prompt="Summarize the main topics" --prompt="What is said about AI?"
//!
//! # Cost reporting
//! tuberag --cost-report
//! tuberag --cost-query="How much did yesterday cost?"
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, bail};
use chrono::Local;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info};
use tuberag_chat::{ChatHistory, GeminiBackend, SessionConfig, SessionLoop, SessionState};
use tuberag_core::{init_logging, DataDir};
use tuberag_cost::{answer_cost_query, render_summary, CostLedger, Pricing};
use tuberag_gemini::{ensure_store, CredentialProvider, FileSearchClient, GeminiConfig, StoreConfig};
use tuberag_ingest::{IngestionCoordinator, TranscriptStore, YoutubeScraper};

/// Logical store key every channel's transcripts are filed under.
const STORE_KEY: &str = "youtube_transcripts";

/// TUBERAG - chat with YouTube channel transcripts using the Gemini API
#[derive(Parser, Debug)]
#[command(name = "tuberag")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YouTube channel URL (e.g., https://youtube.com/@channelname)
    #[arg(long)]
    channel: Option<String>,

    /// Number of videos to retrieve from newest to older
    #[arg(long, default_value_t = 5)]
    numvideos: usize,

    /// Prompt to ask (repeatable; presence switches to non-interactive mode)
    #[arg(long = "prompt")]
    prompts: Vec<String>,

    /// Gemini model to use for query dispatch
    #[arg(long, default_value = "gemini-2.0-flash-exp")]
    model: String,

    /// Skip scraping and use already-ingested transcripts
    #[arg(long)]
    skip_scraping: bool,

    /// Show the full-history cost summary and exit
    #[arg(long)]
    cost_report: bool,

    /// Answer a cost question (e.g. "yesterday", "this week") and exit
    #[arg(long)]
    cost_query: Option<String>,

    /// Data directory (defaults to ~/.tuberag)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Usage error for flag combinations clap can't express.
fn usage_error(cli: &Cli) -> Option<&'static str> {
    if !cli.prompts.is_empty() && cli.channel.is_none() && !cli.skip_scraping {
        return Some("--channel is required in non-interactive mode (or pass --skip-scraping)");
    }
    None
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let data_dir = match DataDir::resolve(cli.data_dir.clone()) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    let _guard = match init_logging(data_dir.logs_dir(), cli.verbose > 0) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::from(1);
        }
    };

    info!("starting tuberag");

    if let Some(message) = usage_error(&cli) {
        eprintln!("Error: {message}");
        return ExitCode::from(2);
    }

    match run(cli, data_dir).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "tuberag failed");
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli, data_dir: DataDir) -> anyhow::Result<ExitCode> {
    let mut ledger =
        CostLedger::load(data_dir.costs_file()).map_err(|e| anyhow!(e.friendly_message()))?;

    // Cost-only queries run against the ledger and exit without
    // authenticating.
    if cli.cost_report {
        print!("{}", render_summary(ledger.events(), Local::now()));
        return Ok(ExitCode::SUCCESS);
    }
    if let Some(query) = &cli.cost_query {
        println!(
            "{}",
            answer_cost_query(ledger.events(), query, Local::now()).render()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let credential = match CredentialProvider::new().authenticate().await {
        Ok(credential) => credential,
        Err(e) => {
            eprintln!("{}", e.friendly_message());
            return Ok(ExitCode::from(1));
        }
    };
    let client = FileSearchClient::new(GeminiConfig::default(), credential)?;

    let mut store_config = StoreConfig::load(data_dir.store_config_file())
        .map_err(|e| anyhow!(e.friendly_message()))?;
    let mut history =
        ChatHistory::load(data_dir.history_file()).map_err(|e| anyhow!(e.friendly_message()))?;

    let interactive = cli.prompts.is_empty();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    // Resolve the channel: flag first, then an interactive prompt.
    let mut numvideos = cli.numvideos;
    let channel = match (&cli.channel, interactive, cli.skip_scraping) {
        (Some(channel), _, _) => Some(channel.clone()),
        (None, true, false) => {
            let channel = ask(&mut stdin, "Enter YouTube channel URL: ").await?;
            if channel.is_empty() {
                eprintln!("Error: Channel URL is required");
                return Ok(ExitCode::from(2));
            }
            let answer = ask(
                &mut stdin,
                &format!("Number of videos to process (default {numvideos}): "),
            )
            .await?;
            if !answer.is_empty() {
                match answer.parse() {
                    Ok(n) => numvideos = n,
                    Err(_) => println!("Invalid number, using default: {numvideos}"),
                }
            }
            Some(channel)
        }
        (None, _, _) => None,
    };

    if !cli.skip_scraping {
        let Some(channel) = &channel else {
            // Interactive channel prompt already rejected an empty answer;
            // non-interactive without a channel was a usage error.
            bail!("no channel to scrape");
        };
        let scraper = YoutubeScraper::new()?;
        let transcripts = TranscriptStore::new(data_dir.transcripts_dir())?;

        let report = IngestionCoordinator::new(
            &scraper,
            &client,
            &mut store_config,
            &mut ledger,
            &transcripts,
        )
        .ingest_channel(channel, numvideos)
        .await?;

        println!("{}", report.render());

        if report.uploaded + report.already_indexed == 0 {
            bail!("No transcripts available. Cannot proceed.");
        }

        let estimate = Pricing::default().storage_estimate(report.estimated_tokens);
        println!(
            "Estimated indexing cost: ${:.6} USD (storage ${:.6}, free tier)\n",
            estimate.indexing_cost_usd, estimate.storage_cost_usd
        );
    } else {
        println!("Skipping scraping, using existing transcripts...");
    }

    let store_id = ensure_store(&client, &mut store_config, STORE_KEY).await?;
    let backend = GeminiBackend::new(client, store_id);

    let mut config = SessionConfig::new(&cli.model);
    if let Some(channel) = &channel {
        config = config.with_channel(channel.clone());
    }
    let mut session = SessionLoop::new(&backend, &mut history, &mut ledger, config);

    let mut stdout = std::io::stdout();
    if interactive {
        print_chat_banner();
        loop {
            print!("\nYou: ");
            stdout.flush()?;

            let Some(line) = stdin.next_line().await? else {
                session.finish();
                break;
            };
            let state = session.handle_input(&line, &mut stdout).await?;
            if state == SessionState::Terminated {
                break;
            }
        }
    } else {
        session.run_batch(cli.prompts.clone(), &mut stdout).await?;
        // Final cost summary after a prompt batch.
        print!("{}", render_summary(ledger.events(), Local::now()));
    }

    info!("tuberag exited normally");
    Ok(ExitCode::SUCCESS)
}

/// Print a prompt and read one trimmed line.
async fn ask(stdin: &mut Lines<BufReader<Stdin>>, prompt: &str) -> anyhow::Result<String> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    Ok(stdin
        .next_line()
        .await?
        .unwrap_or_default()
        .trim()
        .to_string())
}

fn print_chat_banner() {
    let rule = "=".repeat(80);
    println!("\n{rule}");
    println!("CHAT MODE - Ask questions about the video transcripts");
    println!("Type 'quit', 'exit', or 'q' to exit");
    println!("Type 'cost' to see cost summary");
    println!("Type 'history' to see recent chat history");
    println!("{rule}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tuberag").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.numvideos, 5);
        assert_eq!(cli.model, "gemini-2.0-flash-exp");
        assert!(cli.prompts.is_empty());
        assert!(!cli.skip_scraping);
    }

    #[test]
    fn test_repeatable_prompt_flag() {
        let cli = parse(&[
            "--channel=https://youtube.com/@chan",
            "--prompt=first",
            "--prompt=second",
        ]);
        assert_eq!(cli.prompts, vec!["first", "second"]);
    }

    #[test]
    fn test_prompts_without_channel_is_usage_error() {
        let cli = parse(&["--prompt=hello"]);
        assert!(usage_error(&cli).is_some());
    }

    #[test]
    fn test_prompts_with_skip_scraping_is_fine() {
        let cli = parse(&["--prompt=hello", "--skip-scraping"]);
        assert!(usage_error(&cli).is_none());
    }

    #[test]
    fn test_prompts_with_channel_is_fine() {
        let cli = parse(&["--prompt=hello", "--channel=https://youtube.com/@chan"]);
        assert!(usage_error(&cli).is_none());
    }

    #[test]
    fn test_interactive_without_channel_is_not_usage_error() {
        // Interactive mode prompts for the channel instead.
        let cli = parse(&[]);
        assert!(usage_error(&cli).is_none());
    }
}

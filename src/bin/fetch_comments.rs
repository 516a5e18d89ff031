#![forbid(unsafe_code)]

//! Command-line front end for the comment pipeline: fetches a video's
//! metadata and comment pages, applies the search/length filters, and writes
//! the filtered view as CSV.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use ytcomments_tools::client::{CommentClient, DEFAULT_API_BASE_URL};
use ytcomments_tools::config::{DEFAULT_CONFIG_PATH, read_env_config, resolve_api_key};
use ytcomments_tools::error::FetchError;
use ytcomments_tools::export::{comments_to_csv, export_filename, write_csv};
use ytcomments_tools::session::CommentSession;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch, filter, and export YouTube comments.")]
struct Cli {
    /// YouTube video URL (watch, youtu.be, embed, shorts, ...)
    video_url: String,
    #[arg(
        long = "api-key",
        value_name = "KEY",
        help = "YouTube Data API key (falls back to $YOUTUBE_API_KEY, then the config file)"
    )]
    api_key: Option<String>,
    #[arg(long = "config", value_name = "PATH", default_value = DEFAULT_CONFIG_PATH, help = "Path to the config file")]
    config: PathBuf,
    #[arg(
        long = "search",
        value_name = "TERM",
        help = "Keep only comments whose text or author contains TERM (case-insensitive)"
    )]
    search: Option<String>,
    #[arg(
        long = "long-only",
        help = "Keep only comments of 30+ characters with markup stripped"
    )]
    long_only: bool,
    #[arg(
        long = "max-pages",
        value_name = "N",
        default_value_t = 10,
        help = "Fetch at most N pages of 100 comments (including the first)"
    )]
    max_pages: u32,
    #[arg(
        long = "out",
        value_name = "PATH",
        help = "CSV output path (default: a name derived from the video title)"
    )]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let file_cfg = read_env_config(&cli.config)?;
    let api_key = resolve_api_key(cli.api_key.clone(), file_cfg.as_ref()).ok_or_else(|| {
        anyhow!(
            "no API key found; pass --api-key, set $YOUTUBE_API_KEY, or add it to {}",
            cli.config.display()
        )
    })?;
    let base_url = file_cfg
        .as_ref()
        .and_then(|cfg| cfg.api_base_url.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

    let client = CommentClient::with_base_url(base_url);
    let mut session = CommentSession::new();
    session.reset(&cli.video_url);

    if !session.begin_initial_fetch() {
        bail!("not a recognized YouTube video URL: {}", cli.video_url);
    }

    println!("Fetching comments for {}", cli.video_url);
    let (video_id, metadata, page) = match client.fetch_initial_page(&cli.video_url, &api_key) {
        Ok(result) => result,
        Err(err) => {
            session.fail_initial_fetch();
            if matches!(err, FetchError::InvalidCredential) {
                eprintln!("Hint: check the API key and re-enter it.");
            }
            return Err(err).context("fetching the first comment page");
        }
    };
    session.complete_initial_fetch(&video_id, metadata, page);

    let title = session
        .metadata()
        .map(|m| m.video_title.clone())
        .unwrap_or_default();
    println!("Video: {title}");
    if session.comments().is_empty() && session.next_page_token().is_none() {
        println!("No comments available (the video may have comments disabled).");
    }

    let mut pages_fetched = 1;
    while pages_fetched < cli.max_pages && session.can_load_more() {
        let cursor = match session.next_page_token() {
            Some(token) => token.to_owned(),
            None => break,
        };
        if !session.begin_load_more() {
            break;
        }

        match client.fetch_next_page(&cli.video_url, &api_key, &cursor) {
            Ok((video_id, page)) => {
                session.complete_load_more(&video_id, page);
                pages_fetched += 1;
                println!("  Loaded {} comments so far...", session.comments().len());
            }
            Err(err) => {
                // A failed continuation keeps everything fetched so far.
                session.fail_load_more();
                eprintln!("Warning: could not load more comments: {err}");
                break;
            }
        }
    }

    if let Some(term) = &cli.search {
        session.set_search_term(term);
    }
    session.set_long_only(cli.long_only);

    let filtered = session.filtered();
    match session.total_comments() {
        Some(total) => println!(
            "Comments: {} fetched, {} after filters (of {} reported by the service)",
            session.comments().len(),
            filtered.len(),
            total
        ),
        None => println!(
            "Comments: {} fetched, {} after filters",
            session.comments().len(),
            filtered.len()
        ),
    }

    let out_path = cli
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(export_filename(&title)));
    write_csv(&out_path, &comments_to_csv(&filtered))?;
    println!("Wrote {} rows to {}", filtered.len(), out_path.display());

    Ok(())
}

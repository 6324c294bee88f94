// src/cli.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::config::consts::{DEFAULT_BASE_URL, DEFAULT_CATEGORIES, DEFAULT_OUT_DIR};
use crate::config::options::{RetryPolicy, ScrapeOptions};
use crate::core::net;
use crate::error::Result;
use crate::progress::ConsoleProgress;
use crate::runner::{self, RunSummary};
use crate::session::ChromeSession;

#[derive(Debug, Parser)]
#[command(name = "or_scrape", version, about = "Scrape accepted-paper listings into one CSV per category")]
pub struct Args {
    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub scrape: ScrapeArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one file (e.g. a paper PDF) to disk.
    Download {
        url: String,
        /// Destination file
        path: PathBuf,
    },
}

#[derive(Debug, Clone, ClapArgs)]
pub struct ScrapeArgs {
    /// Conference group page listing the categories.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Output directory; one `<category>.csv` per category.
    #[arg(short, long, default_value = DEFAULT_OUT_DIR)]
    pub out: PathBuf,

    /// Category tab to scrape; repeat for several. Default: accept-oral, accept-spotlight, accept-poster.
    #[arg(short, long = "category")]
    pub categories: Vec<String>,

    /// Show the browser window.
    #[arg(long)]
    pub headed: bool,

    /// Give up on a page after this many re-extractions (default: never give up).
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Seconds to wait for the listing to render.
    #[arg(long)]
    pub load_timeout: Option<u64>,

    /// Seconds to wait for a tab or page change.
    #[arg(long)]
    pub wait_timeout: Option<u64>,

    /// Stop at the first failed category.
    #[arg(long)]
    pub fail_fast: bool,

    /// Also download every paper's PDF into `<out>/<category>/`.
    #[arg(long)]
    pub pdfs: bool,
}

impl ScrapeArgs {
    pub fn into_options(self) -> ScrapeOptions {
        let mut opts = ScrapeOptions {
            base_url: self.base_url,
            out_dir: self.out,
            headless: !self.headed,
            fail_fast: self.fail_fast,
            download_pdfs: self.pdfs,
            ..Default::default()
        };
        opts.categories = if self.categories.is_empty() {
            DEFAULT_CATEGORIES.iter().map(|c| s!(*c)).collect()
        } else {
            self.categories
        };
        opts.retry = self.max_retries.map_or(RetryPolicy::unbounded(), RetryPolicy::capped);
        if let Some(secs) = self.load_timeout {
            opts.timeouts.listing = Duration::from_secs(secs);
        }
        if let Some(secs) = self.wait_timeout {
            opts.timeouts.visible = Duration::from_secs(secs);
        }
        opts
    }
}

/// Run the parsed command. Scraping returns its summary; `download` returns an empty one.
pub fn run(args: Args) -> Result<RunSummary> {
    match args.command {
        Some(Command::Download { url, path }) => {
            let client = net::http_client()?;
            let bytes = net::download_to_file(&client, &url, &path)?;
            println!("Wrote {} ({bytes} bytes)", path.display());
            Ok(RunSummary::default())
        }
        None => {
            let opts = args.scrape.into_options();
            if opts.retry.max_page_retries.is_none() {
                tracing::debug!("No retry cap: a page that never renders completely is retried forever");
            }
            let mut session = ChromeSession::launch(opts.headless, &opts.timeouts)?;
            let mut progress = ConsoleProgress::default();
            runner::run(&mut session, &opts, Some(&mut progress))
        }
    }
}

use anyhow::Context;
use clap::{Parser, Subcommand};
use douyin_acquirer::{
    ApiKind, DateRange, LiveOutcome, ProxyConfig, Session, validate_proxy,
};
use tracing::Level;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(version, about = "Enumerate and resolve Douyin account works and live rooms", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crawl every published work of an account and print a summary
    Crawl {
        /// Account link or share link
        url: String,

        /// Batch kind: "post" or "favorite"
        #[arg(long, default_value = "post")]
        kind: String,

        /// Session cookie string
        #[arg(long, env = "ACQUIRER_COOKIE")]
        cookie: String,

        /// Earliest publish date to keep (YYYY/MM/DD)
        #[arg(long)]
        earliest: Option<String>,

        /// Latest publish date to keep (YYYY/MM/DD)
        #[arg(long)]
        latest: Option<String>,

        /// Proxy to probe and use if reachable (e.g. http://127.0.0.1:8080)
        #[arg(long)]
        proxy: Option<String>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve a work link, share link or account-modal link to its work id
    Resolve {
        url: String,

        #[arg(long, env = "ACQUIRER_COOKIE")]
        cookie: String,
    },
    /// Resolve a live-room link to status, title and stream URL
    Live {
        url: String,

        #[arg(long, env = "ACQUIRER_COOKIE")]
        cookie: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(default_level).into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    match args.command {
        Commands::Crawl {
            url,
            kind,
            cookie,
            earliest,
            latest,
            proxy,
            json,
        } => {
            let kind: ApiKind = kind.parse().map_err(anyhow::Error::msg)?;
            let range = DateRange::parse(earliest.as_deref(), latest.as_deref())
                .context("invalid date range")?;
            let proxy = match proxy {
                Some(candidate) => validate_proxy(&candidate).await,
                None => ProxyConfig::Direct,
            };

            let mut session = Session::builder()
                .api(kind)
                .target(url)
                .cookie(cookie)
                .date_range(range)
                .proxy(proxy)
                .build()
                .context("invalid session configuration")?;

            let summary = session.run_crawl().await.context("crawl failed")?;
            if json {
                let payload = serde_json::json!({
                    "account_name": summary.account_name,
                    "videos": summary.videos,
                    "images": summary.images,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("account: {}", summary.account_name);
                println!("videos:  {}", summary.videos.len());
                for id in &summary.videos {
                    println!("  {id}");
                }
                println!("images:  {}", summary.images.len());
                for id in &summary.images {
                    println!("  {id}");
                }
            }
        }
        Commands::Resolve { url, cookie } => {
            let mut session = Session::builder()
                .cookie(cookie)
                .build()
                .context("invalid session configuration")?;
            let id = session
                .resolve_work(&url)
                .await
                .context("failed to resolve work id")?;
            println!("{id}");
        }
        Commands::Live { url, cookie } => {
            let mut session = Session::builder()
                .cookie(cookie)
                .build()
                .context("invalid session configuration")?;
            match session
                .resolve_live(&url)
                .await
                .context("failed to resolve live room")?
            {
                LiveOutcome::Live(room) => {
                    println!("room:     {}", room.room_id);
                    println!("streamer: {}", room.nickname);
                    println!("title:    {}", room.title);
                    println!("stream:   {}", room.stream_url);
                }
                LiveOutcome::Ended => {
                    println!("the broadcast has ended");
                }
            }
        }
    }

    Ok(())
}

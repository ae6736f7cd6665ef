use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use madobe::config::Config;
use madobe::models::WindowPhase;
use madobe::posts::{PostDraft, PostService};
use madobe::scheduler::WindowScheduler;
use madobe::storage::SqliteStore;
use madobe::timeband::format_japanese_time;

#[derive(Parser)]
#[command(
    name = "madobe",
    version,
    about = "Daily posting-window service: one random, time-boxed posting opportunity per user per day",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    /// Path to a TOML config file (defaults to environment variables)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show (materializing if needed) today's posting window for a user
    Window {
        /// User identifier
        #[arg(short, long)]
        user: String,
    },

    /// Submit today's post for a user
    Post {
        /// User identifier
        #[arg(short, long)]
        user: String,

        /// Image URL for the post
        #[arg(short, long)]
        image: String,

        /// Optional caption
        #[arg(long)]
        caption: Option<String>,
    },

    /// Show today's feed (requires the user to have posted today)
    Feed {
        /// User identifier
        #[arg(short, long)]
        user: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    let config = Config::load(cli.config.as_deref())?;
    config.validate()?;

    let store = Arc::new(SqliteStore::new(&config.storage.sqlite_path)?);
    let scheduler = WindowScheduler::new(Arc::clone(&store));
    let service = PostService::new(scheduler, store);

    let now = Utc::now();

    match cli.command {
        Commands::Window { user } => {
            let window = service.scheduler().get_or_create_window(&user, now)?;
            let opens = window.scheduled_time.with_timezone(&Local);
            let closes = window.expires_at.with_timezone(&Local);

            println!("Window for {user} on {}", window.date);
            println!("  opens : {}", format_japanese_time(opens));
            println!("  closes: {}", format_japanese_time(closes));

            match window.phase_at(now) {
                WindowPhase::Unopened => {
                    let wait = window.scheduled_time - now;
                    println!(
                        "  status: unopened, opens in {}m{}s",
                        wait.num_minutes(),
                        wait.num_seconds() % 60
                    );
                }
                WindowPhase::Open => {
                    let left = window.expires_at - now;
                    println!("  status: OPEN, {}s remaining", left.num_seconds());
                }
                WindowPhase::Expired => println!("  status: expired"),
            }
        }

        Commands::Post {
            user,
            image,
            caption,
        } => {
            let mut draft = PostDraft::new(image);
            if let Some(caption) = caption {
                draft = draft.with_caption(caption);
            }

            let post = service.create_post(&user, draft, now)?;
            println!(
                "Posted {} ({}, {})",
                post.id,
                post.timeband.japanese_label(),
                post.day_type.japanese_label()
            );
            println!("  late: {}", if post.is_late { "yes" } else { "no" });
        }

        Commands::Feed { user } => {
            let posts = service.today_feed(&user, now)?;
            if posts.is_empty() {
                println!("No posts yet today");
            }
            for post in posts {
                let at = post.timestamp.with_timezone(&Local);
                println!(
                    "{} {} {} {}{}",
                    format_japanese_time(at),
                    post.user_id,
                    post.timeband.japanese_label(),
                    post.image_url,
                    if post.is_late { " (late)" } else { "" }
                );
            }
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("madobe=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("madobe=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

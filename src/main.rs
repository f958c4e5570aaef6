use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use devfeed::app::AppContext;
use devfeed::cli::{commands, BookmarkAction, Cli, Commands};
use devfeed::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let ctx = if cli.memory {
        AppContext::in_memory(config)?
    } else {
        AppContext::new(config)?
    };

    match cli.command {
        Commands::Articles { pages, bookmark } => {
            commands::show_articles(&ctx, pages, bookmark).await?;
        }
        Commands::Videos { pages } => {
            commands::show_videos(&ctx, pages).await?;
        }
        Commands::Bookmarks { action } => match action {
            BookmarkAction::List => {
                commands::list_bookmarks(&ctx)?;
            }
            BookmarkAction::Add(args) => {
                commands::add_bookmark(&ctx, args.into_item())?;
            }
            BookmarkAction::Toggle(args) => {
                commands::toggle_bookmark(&ctx, args.into_item())?;
            }
            BookmarkAction::Remove { id } => {
                commands::remove_bookmark(&ctx, id)?;
            }
        },
    }

    Ok(())
}

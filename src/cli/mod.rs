pub mod commands;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Author, BookmarkItem, ContentId};

#[derive(Parser)]
#[command(name = "devfeed")]
#[command(about = "Browse the dev.to article and video feeds", long_about = None)]
pub struct Cli {
    /// Path to a config file (defaults to ~/.config/devfeed/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Keep bookmarks in memory for this run only
    #[arg(long, global = true)]
    pub memory: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the article feed
    Articles {
        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,

        /// Toggle the bookmark for this article id after loading
        #[arg(short, long)]
        bookmark: Option<ContentId>,
    },
    /// Show the video feed
    Videos {
        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Manage saved bookmarks
    Bookmarks {
        #[command(subcommand)]
        action: BookmarkAction,
    },
}

#[derive(Subcommand)]
pub enum BookmarkAction {
    /// List saved bookmarks
    List,
    /// Save a bookmark
    Add(BookmarkArgs),
    /// Save a bookmark, or remove it if already saved
    Toggle(BookmarkArgs),
    /// Remove a bookmark by id
    Remove {
        id: ContentId,
    },
}

#[derive(Args)]
pub struct BookmarkArgs {
    #[arg(long)]
    pub id: ContentId,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub url: String,
    /// Author display name
    #[arg(long)]
    pub author: String,
    /// Author avatar URL
    #[arg(long, default_value = "")]
    pub avatar: String,
}

impl BookmarkArgs {
    pub fn into_item(self) -> BookmarkItem {
        BookmarkItem {
            id: self.id,
            title: self.title,
            url: self.url,
            author: Author {
                name: self.author,
                image_uri: self.avatar,
            },
        }
    }
}

//! `quill`: the Quill blogging client from a terminal.
//!
//! Every command drives the same screen handlers an app UI would, then
//! prints the resulting state.

mod commands;

use clap::{Parser, Subcommand};
use quill_core::ClientConfig;

/// Quill CLI.
#[derive(Parser, Debug)]
#[command(name = "quill", about = "Quill blogging client")]
struct Cli {
    /// Path to client config file (default: ~/.quill/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Override the server URL from the config file.
    #[arg(long = "server", global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in.
    Login {
        username: String,
        /// Password (prompted when omitted).
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account and sign in.
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long = "display-name", default_value = "")]
        display_name: String,
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out. Cached and saved posts are kept.
    Logout,

    /// Show the signed-in user.
    Whoami,

    /// Show the home feed from the local cache.
    Feed {
        /// Refresh the cache from the server first.
        #[arg(long)]
        sync: bool,
    },

    /// Show one post.
    Post { id: String },

    /// Like a post.
    Like { id: String },

    /// Remove a like.
    Unlike { id: String },

    /// Bookmark a post locally.
    Save { id: String },

    /// Remove a bookmark.
    Unsave { id: String },

    /// List saved posts.
    Saved,

    /// Follow a user.
    Follow { user: String },

    /// Unfollow a user.
    Unfollow { user: String },

    /// Show a profile and its first page of posts.
    Profile { user: String },

    /// List a user's followers.
    Followers {
        user: String,
        /// Number of pages to load.
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// List who a user follows.
    Following {
        user: String,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// List comments on a post.
    Comments {
        post: String,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Comment on a post.
    Comment { post: String, text: String },

    /// List replies to a comment.
    Replies {
        comment: String,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Reply to a comment.
    Reply { comment: String, text: String },

    /// Show notifications.
    Notifications,

    /// Search posts.
    Search { query: String },

    /// Manage local drafts.
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },

    /// Publish a new post.
    Publish {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
        /// Image file to attach.
        #[arg(long)]
        image: Option<String>,
    },

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum DraftAction {
    /// Save a new draft.
    New {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
        #[arg(long)]
        image: Option<String>,
    },
    /// List drafts.
    List,
    /// Delete a draft.
    Delete { id: String },
    /// Publish a draft and delete it on success.
    Publish { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(std::path::PathBuf::from)
        .unwrap_or_else(ClientConfig::default_path);
    let mut config = ClientConfig::load(&config_path)?;
    if let Some(server) = cli.server {
        config.server = server;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Version = cli.command {
        println!("quill {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let app = commands::context::open(&config).await?;
    let result = match cli.command {
        Commands::Login { username, password } => commands::auth::login(&app, &username, password).await,
        Commands::Register { username, email, display_name, password } => {
            commands::auth::register(&app, &username, &email, &display_name, password).await
        }
        Commands::Logout => commands::auth::logout(&app).await,
        Commands::Whoami => commands::auth::whoami(&app).await,
        Commands::Feed { sync } => commands::posts::feed(&app, sync).await,
        Commands::Post { id } => commands::posts::show(&app, &id).await,
        Commands::Like { id } => commands::posts::like(&app, &id, true).await,
        Commands::Unlike { id } => commands::posts::like(&app, &id, false).await,
        Commands::Save { id } => commands::posts::save(&app, &id, true).await,
        Commands::Unsave { id } => commands::posts::save(&app, &id, false).await,
        Commands::Saved => commands::posts::saved(&app).await,
        Commands::Follow { user } => commands::people::follow(&app, &user, true).await,
        Commands::Unfollow { user } => commands::people::follow(&app, &user, false).await,
        Commands::Profile { user } => commands::people::profile(&app, &user).await,
        Commands::Followers { user, pages } => commands::people::followers(&app, &user, pages).await,
        Commands::Following { user, pages } => commands::people::following(&app, &user, pages).await,
        Commands::Comments { post, pages } => commands::people::comments(&app, &post, pages).await,
        Commands::Comment { post, text } => commands::people::comment(&app, &post, &text).await,
        Commands::Replies { comment, pages } => commands::people::replies(&app, &comment, pages).await,
        Commands::Reply { comment, text } => commands::people::reply(&app, &comment, &text).await,
        Commands::Notifications => commands::people::notifications(&app).await,
        Commands::Search { query } => commands::posts::search(&app, &query).await,
        Commands::Draft { action } => match action {
            DraftAction::New { title, body, image } => commands::compose::new_draft(&app, &title, &body, image).await,
            DraftAction::List => commands::compose::list_drafts(&app).await,
            DraftAction::Delete { id } => commands::compose::delete_draft(&app, &id).await,
            DraftAction::Publish { id } => commands::compose::publish_draft(&app, &id).await,
        },
        Commands::Publish { title, body, image } => commands::compose::publish(&app, &title, &body, image).await,
        Commands::Version => Ok(()),
    };
    app.close();
    result
}

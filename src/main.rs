//! CLI entry point for blogkit

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blogkit::commands::{self, Workspace};
use blogkit::routes::HandlerOptions;

#[derive(Parser)]
#[command(name = "blogkit")]
#[command(version)]
#[command(about = "Markdown blog pipeline: posts, taxonomy, RSS and routes", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Config file (defaults to blog.yml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the markdown posts (defaults to content/posts)
    #[arg(long, global = true)]
    content: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the blog
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Clear cached posts when content changes
        #[arg(short, long)]
        watch: bool,
    },

    /// List blog content
    List {
        /// Type of content to list (post, tag, category)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Print the RSS feed
    Feed {
        /// Site URL to use instead of the configured one
        #[arg(long)]
        site_url: Option<String>,
    },

    /// Print every path to prerender
    Routes,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blogkit=debug,info"
    } else {
        "blogkit=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let workspace = Workspace::new(&base_dir, cli.config, cli.content);

    match cli.command {
        Commands::Serve { port, ip, watch } => {
            let blog = Arc::new(workspace.open()?);
            let options =
                HandlerOptions::default().with_category_descriptions(workspace.category_descriptions());
            let watch_paths = vec![workspace.content_dir.clone()];

            tracing::info!("Starting server at http://{}:{}", ip, port);
            commands::serve::start(blog, options, watch_paths, &ip, port, watch).await?;
        }

        Commands::List { r#type } => {
            let blog = workspace.open()?;
            commands::list::run(&blog, &r#type).await?;
        }

        Commands::Feed { site_url } => {
            let blog = workspace.open()?;
            commands::feed::run(&blog, site_url).await?;
        }

        Commands::Routes => {
            let blog = workspace.open()?;
            commands::routes::run(&blog).await?;
        }

        Commands::Version => {
            println!("blogkit version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

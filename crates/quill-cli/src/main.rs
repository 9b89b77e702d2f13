mod logging;
mod server;
mod server_utils;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use quill::{
    SiteOptions, default_layout, publish,
    routes::RouteTable,
    store::load_posts,
};
use server::{AppState, start_server};

const PORT: u16 = 8000;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Don't print any logs
    #[arg(long, global = true)]
    #[allow(dead_code)] // the log formatters look for it in the raw arguments
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every page into the output directory
    Build {
        #[command(flatten)]
        site: SiteArgs,

        /// Directory to write the pages to
        #[arg(long)]
        output: Option<PathBuf>,

        /// Base URL of the deployed site, e.g. https://example.com. Required for the sitemap
        #[arg(long)]
        base_url: Option<String>,

        /// Keep the existing content of the output directory
        #[arg(long)]
        no_clean: bool,
    },
    /// Serve the blog, rendering pages on every request
    Serve {
        #[command(flatten)]
        site: SiteArgs,

        /// Listen on all interfaces instead of localhost only
        #[arg(long)]
        host: bool,

        /// Port to try first, the next free one is used if it is taken
        #[arg(long, default_value_t = PORT)]
        port: u16,
    },
}

#[derive(Args)]
struct SiteArgs {
    /// Directory containing the post files
    #[arg(long)]
    content: Option<PathBuf>,

    /// Name shown in the navigation bar and in document titles
    #[arg(long)]
    site_name: Option<String>,
}

impl SiteArgs {
    /// Flags take precedence over `QUILL_*` environment variables.
    fn into_options(self) -> SiteOptions {
        let mut options = SiteOptions::from_env();

        if let Some(content) = self.content {
            options.content_dir = content;
        }
        if let Some(site_name) = self.site_name {
            options.site_name = site_name;
        }

        options
    }
}

fn serve(options: SiteOptions, host: bool, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let store = load_posts(&options.content_pattern())?;

    // Links stay relative when serving, whatever the deployed base URL is
    let routes = RouteTable::blogs();
    let layout = default_layout(&options, &routes)?;

    let state = AppState {
        store: Arc::new(store),
        routes: Arc::new(routes),
        shell: Arc::new(layout),
    };

    let async_runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    async_runtime.block_on(start_server(state, host, port))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = match cli.command {
        Commands::Build {
            site,
            output,
            base_url,
            no_clean,
        } => {
            let mut options = site.into_options();
            if let Some(output) = output {
                options.output_dir = output;
            }
            if base_url.is_some() {
                options.base_url = base_url;
            }
            options.clean_output_dir = !no_clean;

            publish(options).map(|_| ()).map_err(Into::into)
        }
        Commands::Serve { site, host, port } => serve(site.into_options(), host, port),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".bold().red(), err);
            ExitCode::FAILURE
        }
    }
}

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use spdlog::{info, warn};

use folio::blog_api::{page_posts, post_detail, query_posts};
use folio::config::Config;
use folio::content::post_loader::PostLoader;
use folio::logger::configure_logger;
use folio::query_string::QueryString;
use folio::server::server_run;

use crate::config::open_config;

mod config;

const CFG_FILE_NAME: &str = "folio.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serves the blog API
    Serve,
    /// Prints a listing as JSON
    List {
        /// Same keys as the HTTP API, e.g. "category=Design&tags=css,ui&sort=title-asc"
        #[arg(short, long, default_value = "")]
        query: String,
        /// Paginate with page and page_size instead of offset and limit
        #[arg(long)]
        paged: bool,
    },
    /// Prints the rendered HTML of a post
    Show {
        slug: String,
    },
    /// Loads every post and fails if any of them is rejected
    Check,
}

fn list(config: &Config, query: &str, paged: bool) -> Result<()> {
    let loader = PostLoader::new(config.paths.posts_dir.clone());
    let posts = loader.load_all();
    let qs = QueryString::from(query);
    let defaults = &config.defaults;

    let json = if paged {
        serde_json::to_string_pretty(&page_posts(&posts, &qs, defaults.sort_order, defaults.page_size))?
    } else {
        serde_json::to_string_pretty(&query_posts(&posts, &qs, defaults.sort_order))?
    };
    println!("{}", json);
    Ok(())
}

fn show(config: &Config, slug: &str) -> Result<()> {
    let loader = PostLoader::new(config.paths.posts_dir.clone());
    let posts = loader.load_all();
    match post_detail(&posts, slug, config.defaults.sort_order)? {
        Some(detail) => println!("{}", detail.html),
        None => bail!("Post {} not found", slug),
    }
    Ok(())
}

fn check(config: &Config) -> Result<()> {
    let loader = PostLoader::new(config.paths.posts_dir.clone());
    let report = loader.load_report();
    for post in report.posts.iter() {
        println!("ok      {}", post.slug());
    }
    for skipped in report.skipped.iter() {
        println!("skipped {}: {}", skipped.slug, skipped.reason);
    }

    if !report.skipped.is_empty() {
        bail!("{} of {} posts were skipped", report.skipped.len(), report.posts.len() + report.skipped.len());
    }
    Ok(())
}

#[ntex::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = args.config_path.map(PathBuf::from);

    let config = match open_config(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Please run folio --help");
            return Ok(());
        }
    };

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    match args.command {
        Command::Serve => {
            info!("Starting Folio =-=-=-=-=-=-=-=-=-=-=-=-=-=-=-");
            info!("Listening on {}:{}", config.server.address, config.server.port);
            server_run(config).await?;
        }
        Command::List { query, paged } => list(&config, &query, paged)?,
        Command::Show { slug } => show(&config, &slug)?,
        Command::Check => check(&config)?,
    }

    Ok(())
}

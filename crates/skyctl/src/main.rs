#![allow(unused)]

use crate::prelude::{println, *};
use clap::Parser;
use std::path::PathBuf;

mod actor;
mod client;
mod config;
mod error;
mod feed;
mod graph;
mod output;
mod prelude;
mod session;
mod transport;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Read Bluesky timelines, feeds, lists and starter packs from the terminal"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Path to the JSON configuration file
    #[clap(long, env = "SKYCTL_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Bluesky handle or email used to log in
    #[clap(long, env = "BSKY_USERNAME", global = true)]
    username: Option<String>,

    /// Bluesky app password
    #[clap(long, env = "BSKY_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    /// Output as JSON
    #[clap(long, global = true)]
    json: bool,

    /// Print the unmapped fields of every entity
    #[clap(long, global = true)]
    rawdata: bool,

    /// Template with `#placeholder#` tokens, replacing the built-in one
    #[clap(long, global = true)]
    template: Option<String>,

    /// Whether to display additional information.
    #[clap(long, env = "SKYCTL_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Home timeline of the logged-in account
    #[clap(name = "timeline")]
    Timeline(feed::TimelineOptions),

    /// Posts of one account
    #[clap(name = "getFeed", alias = "autorfeed")]
    GetFeed(feed::AuthorFeedOptions),

    /// Posts by AT-URI
    #[clap(name = "getPost")]
    GetPost(feed::GetPostOptions),

    /// Full-text post search
    #[clap(name = "searchPosts", alias = "search")]
    SearchPosts(feed::SearchOptions),

    /// Labels by subject pattern and labeler
    #[clap(name = "getByLabel")]
    GetByLabel(actor::LabelOptions),

    /// A list and its members
    #[clap(name = "list")]
    List(graph::ListOptions),

    /// Lists created by an account
    #[clap(name = "listindex")]
    ListIndex(graph::ListIndexOptions),

    /// Profile of an account
    #[clap(name = "getProfil", alias = "getProfile")]
    GetProfil(actor::ProfileOptions),

    /// Starter packs created by an account
    #[clap(name = "getActorStarterPacks")]
    GetActorStarterPacks(graph::ActorStarterPacksOptions),

    /// Starter packs by AT-URI
    #[clap(name = "getStarterPacks")]
    GetStarterPacks(graph::StarterPacksOptions),

    /// Show the loaded configuration
    #[clap(name = "config")]
    Config,
}

fn show_config(global: &Global) -> Result<()> {
    let config = config::load_config(global.config.as_deref())?;
    let mut values = config.all().clone();
    if values.contains_key("bluesky_password") {
        values.insert("bluesky_password".to_string(), "********".into());
    }
    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();
    let global = app.global;

    match app.command {
        SubCommands::Timeline(options) => feed::timeline(options, global).await,
        SubCommands::GetFeed(options) => feed::author_feed(options, global).await,
        SubCommands::GetPost(options) => feed::get_post(options, global).await,
        SubCommands::SearchPosts(options) => feed::search(options, global).await,
        SubCommands::GetByLabel(options) => actor::labels(options, global).await,
        SubCommands::List(options) => graph::list(options, global).await,
        SubCommands::ListIndex(options) => graph::list_index(options, global).await,
        SubCommands::GetProfil(options) => actor::profile(options, global).await,
        SubCommands::GetActorStarterPacks(options) => {
            graph::actor_starter_packs(options, global).await
        }
        SubCommands::GetStarterPacks(options) => graph::starter_packs(options, global).await,
        SubCommands::Config => show_config(&global),
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
